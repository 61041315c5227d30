//! Creature lifecycle and spawn management for a small slime arena.
//!
//! The crate owns hit points, placement, timed damage and respawning. Drawing
//! is left to whoever implements [`game::creatures::CreatureBody`] and
//! [`game::spawning::RenderContainer`].

pub mod config;
pub mod core;
pub mod engine;
pub mod game;

pub use config::ArenaConfig;
pub use game::creatures::{Creature, CreatureId, CreatureStats};
pub use game::spawning::{SpawnError, SpawnEvent, SpawnManager, SpawnOptions};
pub use game::SlimeArena;
