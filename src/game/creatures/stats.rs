// Creature stats - hit points and everything derived from them

use crate::core::math::{clamp, random_in_range};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Inclusive hit point range used to roll a creature's max HP
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HpRange {
    pub min: i32,
    pub max: i32,
}

impl HpRange {
    pub const fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }

    /// Roll a max HP uniformly within the range
    pub fn roll<R: Rng + ?Sized>(&self, rng: &mut R) -> i32 {
        random_in_range(rng, self.min, self.max)
    }
}

/// Creature kinds with their own HP tables
///
/// Anything that doesn't name a known kind falls back to [`CreatureKind::Generic`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CreatureKind {
    #[default]
    Generic,
    Slime,
    Goblin,
    Dragon,
}

impl CreatureKind {
    /// Resolve a kind from a type name, case-insensitively
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "slime" => Self::Slime,
            "goblin" => Self::Goblin,
            "dragon" => Self::Dragon,
            _ => Self::Generic,
        }
    }

    /// Max HP range for this kind
    pub fn hp_range(&self) -> HpRange {
        match self {
            Self::Generic => HpRange::new(50, 100),
            Self::Slime => HpRange::new(30, 60),
            Self::Goblin => HpRange::new(40, 80),
            Self::Dragon => HpRange::new(200, 400),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Generic => "generic",
            Self::Slime => "slime",
            Self::Goblin => "goblin",
            Self::Dragon => "dragon",
        }
    }
}

/// Coarse health bucket derived from the health percentage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Condition {
    Dead,
    Critical,
    Poor,
    Fair,
    Good,
}

impl Condition {
    /// Bucket a health percentage
    pub fn from_percent(percent: i32) -> Self {
        if percent <= 0 {
            Self::Dead
        } else if percent < 20 {
            Self::Critical
        } else if percent < 50 {
            Self::Poor
        } else if percent < 80 {
            Self::Fair
        } else {
            Self::Good
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dead => "Dead",
            Self::Critical => "Critical",
            Self::Poor => "Poor",
            Self::Fair => "Fair",
            Self::Good => "Good",
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Persisted form of [`CreatureStats`]
///
/// Both fields are optional on load; missing fields leave the current value untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StatsRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hp: Option<i32>,
    #[serde(default, rename = "maxHp", skip_serializing_if = "Option::is_none")]
    pub max_hp: Option<i32>,
}

/// Rejected stats payloads
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StatsError {
    #[error("max HP must be positive, got {0}")]
    NonPositiveMaxHp(i32),

    #[error("HP {hp} is outside 0..={max_hp}")]
    HpOutOfRange { hp: i32, max_hp: i32 },
}

/// Presentation values derived from current health
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderHints {
    pub width: f32,
    pub height: f32,
    /// Dimmer when hurt, never below 0.3
    pub color_intensity: f32,
    pub stroke_width: f32,
    /// Frames per idle bounce radian, slower when hurt
    pub anim_speed: f32,
    /// Idle bounce amplitude, smaller when hurt
    pub bounce_amp: f32,
    /// Health bar fill in `[0, 1]`
    pub health_fraction: f32,
    pub is_active: bool,
}

/// Snapshot of a creature's health for display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CreatureStatus {
    pub hp: i32,
    pub max_hp: i32,
    pub condition: Condition,
}

/// Hit point state of a single creature
///
/// `current_hp` is always within `0..=max_hp`, and `max_hp` is always positive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatureStats {
    max_hp: i32,
    current_hp: i32,
}

impl CreatureStats {
    /// Create stats for a creature kind
    ///
    /// A positive `explicit_hp` wins; otherwise max HP is rolled from the kind's range.
    pub fn new<R: Rng + ?Sized>(explicit_hp: Option<i32>, kind: CreatureKind, rng: &mut R) -> Self {
        let max_hp = match explicit_hp {
            Some(hp) if hp > 0 => hp,
            _ => kind.hp_range().roll(rng),
        };
        Self::with_max_hp(max_hp)
    }

    /// Create stats at full health with a fixed max HP (clamped to at least 1)
    pub fn with_max_hp(max_hp: i32) -> Self {
        let max_hp = max_hp.max(1);
        Self {
            max_hp,
            current_hp: max_hp,
        }
    }

    /// Rebuild stats from a persisted record
    pub fn from_record(record: &StatsRecord) -> Result<Self, StatsError> {
        let max_hp = record.max_hp.or(record.hp).unwrap_or(1);
        let mut stats = Self::with_max_hp(max_hp);
        stats.deserialize(record)?;
        Ok(stats)
    }

    pub fn hp(&self) -> i32 {
        self.current_hp
    }

    pub fn max_hp(&self) -> i32 {
        self.max_hp
    }

    /// Current HP as a rounded percentage of max HP
    pub fn health_percent(&self) -> i32 {
        (self.current_hp as f64 / self.max_hp as f64 * 100.0).round() as i32
    }

    /// Current HP as a fraction of max HP
    pub fn health_factor(&self) -> f32 {
        self.current_hp as f32 / self.max_hp as f32
    }

    /// Health bar fill, clamped to `[0, 1]`
    pub fn health_fraction(&self) -> f32 {
        clamp(self.health_factor(), 0.0, 1.0)
    }

    pub fn is_alive(&self) -> bool {
        self.current_hp > 0
    }

    pub fn is_critical(&self) -> bool {
        self.health_percent() < 20
    }

    /// Apply a health delta (positive heals, negative damages) and return the new HP
    ///
    /// Over- and under-shoot clamp silently.
    pub fn modify_health(&mut self, delta: i32) -> i32 {
        let next = self.current_hp.saturating_add(delta);
        self.current_hp = clamp(next, 0, self.max_hp);
        self.current_hp
    }

    pub fn condition(&self) -> Condition {
        Condition::from_percent(self.health_percent())
    }

    pub fn status(&self) -> CreatureStatus {
        CreatureStatus {
            hp: self.current_hp,
            max_hp: self.max_hp,
            condition: self.condition(),
        }
    }

    /// Presentation values for the current health
    pub fn render_hints(&self) -> RenderHints {
        let factor = self.health_factor();
        RenderHints {
            width: 64.0,
            height: 40.0,
            color_intensity: factor.max(0.3),
            stroke_width: 2.0,
            anim_speed: 20.0 + 10.0 * (1.0 - factor),
            bounce_amp: 2.0 * factor,
            health_fraction: self.health_fraction(),
            is_active: self.current_hp > 0,
        }
    }

    pub fn serialize(&self) -> StatsRecord {
        StatsRecord {
            hp: Some(self.current_hp),
            max_hp: Some(self.max_hp),
        }
    }

    /// Overwrite the fields present in `record`
    ///
    /// The merged result is validated first; an invalid record leaves the stats untouched.
    pub fn deserialize(&mut self, record: &StatsRecord) -> Result<(), StatsError> {
        let max_hp = record.max_hp.unwrap_or(self.max_hp);
        let hp = record.hp.unwrap_or(self.current_hp);

        if max_hp <= 0 {
            return Err(StatsError::NonPositiveMaxHp(max_hp));
        }
        if !(0..=max_hp).contains(&hp) {
            return Err(StatsError::HpOutOfRange { hp, max_hp });
        }

        self.max_hp = max_hp;
        self.current_hp = hp;
        Ok(())
    }
}
