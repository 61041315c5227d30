// Engine modules: fixed-step timing and deferred task scheduling

pub mod game_loop;
pub mod scheduler;

pub use game_loop::{GameLoop, FIXED_TIMESTEP_DURATION};
pub use scheduler::{Scheduler, TimerId};
