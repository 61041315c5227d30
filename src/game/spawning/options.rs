// Spawn placement and creation options

use crate::config::{DEFAULT_COLLISION_RADIUS, GAME_HEIGHT, GAME_WIDTH};
use serde::{Deserialize, Serialize};

/// Rectangle that spawn positions are drawn from
///
/// Missing fields default to the full playfield.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnBounds {
    pub min_x: f32,
    pub max_x: f32,
    pub min_y: f32,
    pub max_y: f32,
}

impl Default for SpawnBounds {
    fn default() -> Self {
        Self::playfield()
    }
}

impl SpawnBounds {
    /// The whole playfield
    pub fn playfield() -> Self {
        Self {
            min_x: 0.0,
            max_x: GAME_WIDTH,
            min_y: 0.0,
            max_y: GAME_HEIGHT,
        }
    }

    pub fn new(min_x: f32, max_x: f32, min_y: f32, max_y: f32) -> Self {
        Self {
            min_x,
            max_x,
            min_y,
            max_y,
        }
    }

    /// Restrict the horizontal range
    pub fn with_x(mut self, min_x: f32, max_x: f32) -> Self {
        self.min_x = min_x;
        self.max_x = max_x;
        self
    }

    /// Restrict the vertical range
    pub fn with_y(mut self, min_y: f32, max_y: f32) -> Self {
        self.min_y = min_y;
        self.max_y = max_y;
        self
    }
}

/// Options for a single spawn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnOptions {
    /// Where the creature may be placed
    pub bounds: SpawnBounds,
    /// Collision radius used for placement and stored on the creature
    pub radius: f32,
    /// Explicit max HP; anything not positive rolls the type's HP range
    pub hp: Option<i32>,
    /// Whether the creature's presentation shows a health bar
    pub show_health_bar: bool,
}

impl Default for SpawnOptions {
    fn default() -> Self {
        Self {
            bounds: SpawnBounds::playfield(),
            radius: DEFAULT_COLLISION_RADIUS,
            hp: None,
            show_health_bar: false,
        }
    }
}

impl SpawnOptions {
    pub fn with_bounds(mut self, bounds: SpawnBounds) -> Self {
        self.bounds = bounds;
        self
    }

    /// Restrict spawning to a vertical band of the current bounds
    pub fn with_y_range(mut self, min_y: f32, max_y: f32) -> Self {
        self.bounds = self.bounds.with_y(min_y, max_y);
        self
    }

    pub fn with_radius(mut self, radius: f32) -> Self {
        self.radius = radius;
        self
    }

    pub fn with_hp(mut self, hp: i32) -> Self {
        self.hp = Some(hp);
        self
    }

    pub fn with_health_bar(mut self, show: bool) -> Self {
        self.show_health_bar = show;
        self
    }
}
