// Timer-driven creature behavior: periodic damage, death hooks, respawn

use super::options::SpawnOptions;
use crate::config::{DEFAULT_DAMAGE_INTERVAL_MS, DEFAULT_DAMAGE_RANGE, DEFAULT_RESPAWN_DELAY_MS};
use crate::engine::TimerId;
use crate::game::creatures::Creature;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Called once a creature's death animation has finished and it has been removed
pub type DeathCallback = Box<dyn FnMut(&Creature)>;

/// Serializable part of a creature's behavior
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BehaviorConfig {
    /// Apply random damage on a repeating timer
    pub auto_damage: bool,
    pub damage_interval_ms: u64,
    /// Inclusive `[min, max]` damage per tick
    pub damage_range: [i32; 2],
    /// Spawn another creature of the same type after death
    pub auto_respawn: bool,
    pub respawn_delay_ms: u64,
    pub respawn_options: SpawnOptions,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            auto_damage: false,
            damage_interval_ms: DEFAULT_DAMAGE_INTERVAL_MS,
            damage_range: DEFAULT_DAMAGE_RANGE,
            auto_respawn: false,
            respawn_delay_ms: DEFAULT_RESPAWN_DELAY_MS,
            respawn_options: SpawnOptions::default(),
        }
    }
}

impl BehaviorConfig {
    pub fn damage_interval(&self) -> Duration {
        Duration::from_millis(self.damage_interval_ms)
    }

    pub fn respawn_delay(&self) -> Duration {
        Duration::from_millis(self.respawn_delay_ms)
    }
}

/// Behavior attached to one tracked creature
pub struct Behavior {
    pub config: BehaviorConfig,
    pub(crate) on_death: Option<DeathCallback>,
    pub(crate) damage_timer: Option<TimerId>,
}

impl Behavior {
    pub fn new(config: BehaviorConfig) -> Self {
        Self {
            config,
            on_death: None,
            damage_timer: None,
        }
    }

    /// Run `callback` after the creature's death animation completes
    pub fn on_death(mut self, callback: impl FnMut(&Creature) + 'static) -> Self {
        self.on_death = Some(Box::new(callback));
        self
    }

    /// Get the pending damage timer, if any
    pub fn damage_timer(&self) -> Option<TimerId> {
        self.damage_timer
    }
}

impl From<BehaviorConfig> for Behavior {
    fn from(config: BehaviorConfig) -> Self {
        Self::new(config)
    }
}

impl fmt::Debug for Behavior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Behavior")
            .field("config", &self.config)
            .field("on_death", &self.on_death.is_some())
            .field("damage_timer", &self.damage_timer)
            .finish()
    }
}
