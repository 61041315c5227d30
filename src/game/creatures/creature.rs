// Creature handle - the unit tracked by the spawn manager

use super::body::{CreatureBody, NullBody};
use super::state::{LifeCycle, LifeState};
use super::stats::{Condition, CreatureStats, CreatureStatus};
use glam::Vec2;

/// Unique identifier for a creature
pub type CreatureId = u32;

/// A creature with hit points, a position and a visual proxy
#[derive(Debug)]
pub struct Creature {
    /// Unique identifier
    pub id: CreatureId,
    /// Type tag the creature was spawned as (e.g. "slime")
    pub type_name: String,
    /// Hit point state
    pub stats: CreatureStats,
    /// Position of the visual proxy
    pub position: Vec2,
    /// Radius used for spawn placement; `None` means the default
    pub collision_radius: Option<f32>,

    lifecycle: LifeCycle,
    /// Whether the visual proxy is parented to the render container
    attached: bool,
    /// Set once the death animation has been reported finished
    death_complete: bool,
    destroyed: bool,
    body: Box<dyn CreatureBody>,
}

impl Creature {
    /// Create a creature with no presentation
    pub fn new(id: CreatureId, type_name: &str, stats: CreatureStats, position: Vec2) -> Self {
        Self::with_body(id, type_name, stats, position, Box::new(NullBody))
    }

    /// Create a creature with a visual proxy
    pub fn with_body(
        id: CreatureId,
        type_name: &str,
        stats: CreatureStats,
        position: Vec2,
        body: Box<dyn CreatureBody>,
    ) -> Self {
        Self {
            id,
            type_name: type_name.to_string(),
            stats,
            position,
            collision_radius: None,
            lifecycle: LifeCycle::new(),
            attached: false,
            death_complete: false,
            destroyed: false,
            body,
        }
    }

    /// Apply damage and return the remaining HP
    ///
    /// Reaching zero HP starts the death animation exactly once; damage to a
    /// creature that is already dying or removed is ignored.
    pub fn take_damage(&mut self, damage: i32) -> i32 {
        if !self.lifecycle.state().can_be_hurt() {
            return self.stats.hp();
        }

        let hp = self.stats.modify_health(-damage);
        if hp <= 0 {
            self.die();
        }
        hp
    }

    /// Heal and return the new HP; ignored once dying
    pub fn heal(&mut self, amount: i32) -> i32 {
        if !self.lifecycle.state().can_be_hurt() {
            return self.stats.hp();
        }
        self.stats.modify_health(amount)
    }

    /// Start the death animation
    ///
    /// Returns `true` only if this call started it.
    pub fn die(&mut self) -> bool {
        let started = self.lifecycle.begin_dying();
        if started {
            log::debug!("{} #{} is dying", self.type_name, self.id);
        }
        started
    }

    /// Advance one frame of animation
    ///
    /// Returns `true` on the single frame the death animation finishes.
    pub fn animate(&mut self) -> bool {
        if self.destroyed || self.lifecycle.state().is_removed() {
            return false;
        }

        let hints = self.stats.render_hints();
        let dying = self.lifecycle.state().is_dying();
        let finished = self.body.update(&hints, dying);

        if dying && finished && !self.death_complete {
            self.death_complete = true;
            return true;
        }
        false
    }

    /// Tear down the visual proxy and mark the creature removed
    ///
    /// Safe to call more than once; the body is only destroyed the first time.
    pub fn destroy(&mut self) -> bool {
        if self.destroyed {
            return false;
        }
        self.destroyed = true;
        self.attached = false;
        self.lifecycle.mark_removed();
        self.body.destroy();
        true
    }

    pub fn is_alive(&self) -> bool {
        self.stats.is_alive()
    }

    pub fn is_dying(&self) -> bool {
        self.lifecycle.state().is_dying()
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    pub fn death_complete(&self) -> bool {
        self.death_complete
    }

    pub fn state(&self) -> LifeState {
        self.lifecycle.state()
    }

    pub fn condition(&self) -> Condition {
        self.stats.condition()
    }

    pub fn status(&self) -> CreatureStatus {
        self.stats.status()
    }

    /// Check whether the visual proxy is parented to the render container
    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Mark the visual proxy as parented
    pub fn attach(&mut self) {
        if !self.destroyed {
            self.attached = true;
        }
    }

    /// Mark the visual proxy as unparented
    pub fn detach(&mut self) {
        self.attached = false;
    }

    /// Check whether the type tag contains `filter`, case-insensitively
    pub fn matches_type(&self, filter: &str) -> bool {
        self.type_name
            .to_lowercase()
            .contains(&filter.to_lowercase())
    }

    /// Get the visual proxy
    pub fn body(&self) -> &dyn CreatureBody {
        self.body.as_ref()
    }
}
