// Creature system
//
// This module contains everything related to a single creature:
// - Hit point stats and the values derived from them
// - The lifecycle state machine (alive, dying, removed)
// - The creature handle tracked by the spawn manager
// - The visual proxy seam and the procedural slime animation

pub mod animation;
pub mod body;
pub mod creature;
pub mod state;
pub mod stats;

// Re-export commonly used types
pub use animation::SlimeBody;
pub use body::{CreatureBody, NullBody};
pub use creature::{Creature, CreatureId};
pub use state::{LifeCycle, LifeState};
pub use stats::{
    Condition, CreatureKind, CreatureStats, CreatureStatus, HpRange, RenderHints, StatsError,
    StatsRecord,
};
