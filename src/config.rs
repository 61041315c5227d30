// Game configuration constants and the arena config file

use crate::game::spawning::{BehaviorConfig, SpawnOptions};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Playfield width in world units
pub const GAME_WIDTH: f32 = 800.0;
/// Playfield height in world units
pub const GAME_HEIGHT: f32 = 600.0;

/// Collision radius used when a creature has none of its own
pub const DEFAULT_COLLISION_RADIUS: f32 = 50.0;

/// Random placement attempts before a spawn gives up
pub const SPAWN_ATTEMPTS: u32 = 10;

/// Auto-damage defaults
pub const DEFAULT_DAMAGE_INTERVAL_MS: u64 = 2000;
pub const DEFAULT_DAMAGE_RANGE: [i32; 2] = [1, 3];

pub const DEFAULT_RESPAWN_DELAY_MS: u64 = 1000;

/// Arena configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid arena config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Population rules for the demo arena
///
/// Every field has a default, so a config file only needs the values it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    /// Registered type name of the creatures to keep alive
    pub creature_type: String,
    /// Population to maintain
    pub target_population: usize,
    /// Delay between the initial spawns
    pub spawn_stagger_ms: u64,
    /// Delay before retrying a failed spawn
    pub retry_delay_ms: u64,
    /// Delay before refilling the population after a death
    pub refill_delay_ms: u64,
    /// Interval of the cleanup sweep
    pub cleanup_interval_ms: u64,
    pub spawn: SpawnOptions,
    pub behavior: BehaviorConfig,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            creature_type: "slime".to_string(),
            target_population: 3,
            spawn_stagger_ms: 1000,
            retry_delay_ms: 2000,
            refill_delay_ms: 1000,
            cleanup_interval_ms: 5000,
            spawn: SpawnOptions::default()
                .with_y_range(GAME_HEIGHT / 2.0, GAME_HEIGHT - 150.0)
                .with_health_bar(true),
            behavior: BehaviorConfig {
                auto_damage: true,
                ..BehaviorConfig::default()
            },
        }
    }
}

impl ArenaConfig {
    /// Parse a config from JSON
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a config file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_json_str(&text)?;
        log::info!("Loaded arena config from {}", path.as_ref().display());
        Ok(config)
    }

    pub fn spawn_stagger(&self) -> Duration {
        Duration::from_millis(self.spawn_stagger_ms)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    pub fn refill_delay(&self) -> Duration {
        Duration::from_millis(self.refill_delay_ms)
    }

    pub fn cleanup_interval(&self) -> Duration {
        Duration::from_millis(self.cleanup_interval_ms)
    }
}
