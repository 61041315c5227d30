// Spawn system
//
// Placement of new creatures, the factory registry, timed behavior
// (auto-damage, death hooks, respawn) and the manager that owns them all.

pub mod behavior;
pub mod factory;
pub mod manager;
pub mod options;

pub use behavior::{Behavior, BehaviorConfig, DeathCallback};
pub use factory::{CreatureFactory, SlimeFactory, SpawnRequest};
pub use manager::{NullContainer, RenderContainer, SpawnEvent, SpawnManager};
pub use options::{SpawnBounds, SpawnOptions};

use crate::game::creatures::CreatureId;

/// Reported spawn failures
///
/// None of these are fatal; the manager's state is unchanged and the caller
/// decides whether to retry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SpawnError {
    #[error("No factory registered for creature type: {0}")]
    UnknownType(String),

    #[error("Could not find safe spawn position for {0}")]
    NoSafePosition(String),

    #[error("Factory failed to create {0}")]
    FactoryFailed(String),

    #[error("Factory returned {0} #{1}, which is already tracked")]
    AlreadyTracked(String, CreatureId),
}
