// Procedural slime animation
//
// A slime is a closed path from its bottom-left corner, over a single curved
// top control point, to its bottom-right corner. All motion is expressed as
// movement of that top point and its bezier handles; drawing is left to the
// renderer that owns the real path.

use super::body::CreatureBody;
use super::stats::RenderHints;
use glam::Vec2;

/// Downward speed of the top point while dying (units per frame)
const SINK_PER_FRAME: f32 = 2.0;

/// Handle shrink factor applied every dying frame
const HANDLE_DECAY: f32 = 0.8;

/// Animation state of a slime's top control point
#[derive(Debug, Clone)]
pub struct SlimeBody {
    /// Frames since spawn
    frame: u64,
    /// Top control point, in shape-local coordinates (y grows downward)
    top: Vec2,
    handle_in: Vec2,
    handle_out: Vec2,
    /// Last health bar fill, when the slime shows one
    health_bar: Option<f32>,
    destroyed: bool,
}

impl SlimeBody {
    /// Create a slime resting at its idle pose
    pub fn new(hints: &RenderHints) -> Self {
        Self {
            frame: 0,
            top: Vec2::new(hints.width / 2.0, hints.height / 2.0),
            handle_in: Vec2::new(-hints.width / 2.0, 0.0),
            handle_out: Vec2::new(hints.width / 2.0, 0.0),
            health_bar: None,
            destroyed: false,
        }
    }

    /// Show a health bar above the slime
    pub fn with_health_bar(mut self, hints: &RenderHints) -> Self {
        self.health_bar = Some(hints.health_fraction);
        self
    }

    /// Health bar fill, if the slime shows one
    pub fn health_bar(&self) -> Option<f32> {
        self.health_bar
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Current top control point
    pub fn top(&self) -> Vec2 {
        self.top
    }

    pub fn handles(&self) -> (Vec2, Vec2) {
        (self.handle_in, self.handle_out)
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    fn animate_idle(&mut self, hints: &RenderHints) {
        let bounce = (self.frame as f32 / hints.anim_speed).sin() * hints.bounce_amp;
        self.top.y = hints.height / 2.0 + bounce;
    }

    /// Sink the top point toward the base; returns `true` once flat
    fn animate_dying(&mut self, hints: &RenderHints) -> bool {
        if self.top.y < hints.height {
            self.top.y += SINK_PER_FRAME;
            self.handle_in.y *= HANDLE_DECAY;
            self.handle_out.y *= HANDLE_DECAY;
            return false;
        }
        true
    }
}

impl CreatureBody for SlimeBody {
    fn update(&mut self, hints: &RenderHints, dying: bool) -> bool {
        if self.destroyed {
            return dying;
        }

        self.frame += 1;
        if let Some(fill) = self.health_bar.as_mut() {
            *fill = hints.health_fraction;
        }

        if dying {
            self.animate_dying(hints)
        } else {
            self.animate_idle(hints);
            false
        }
    }

    fn destroy(&mut self) {
        self.destroyed = true;
    }
}
