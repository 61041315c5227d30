// Visual proxy seam between a creature and whatever draws it

use super::stats::RenderHints;
use std::fmt::Debug;

/// Presentation side of a creature
///
/// The spawn core never looks at what a body draws. It only drives the
/// per-frame update, learns when the death animation has finished, and asks
/// the body to tear itself down.
pub trait CreatureBody: Debug {
    /// Advance one frame of animation
    ///
    /// `dying` is set once the creature has entered its death animation.
    /// Returns `true` when that animation has finished.
    fn update(&mut self, hints: &RenderHints, dying: bool) -> bool;

    /// Release whatever the body holds; called once when the creature is torn down
    fn destroy(&mut self) {}
}

/// Body with no presentation; its death animation finishes immediately
#[derive(Debug, Default, Clone, Copy)]
pub struct NullBody;

impl CreatureBody for NullBody {
    fn update(&mut self, _hints: &RenderHints, dying: bool) -> bool {
        dying
    }
}
