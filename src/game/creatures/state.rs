// Creature lifecycle state machine

/// Lifecycle phase of a tracked creature
///
/// Creatures only ever move forward: `Alive -> Dying -> Removed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LifeState {
    /// Can be damaged and healed
    #[default]
    Alive,
    /// HP reached zero, death animation in progress
    Dying,
    /// Untracked and torn down
    Removed,
}

impl LifeState {
    /// Check if the creature still reacts to damage and healing
    pub fn can_be_hurt(&self) -> bool {
        matches!(self, Self::Alive)
    }

    /// Check if the creature is in its death animation
    pub fn is_dying(&self) -> bool {
        matches!(self, Self::Dying)
    }

    pub fn is_removed(&self) -> bool {
        matches!(self, Self::Removed)
    }
}

/// Forward-only lifecycle tracker
#[derive(Debug, Default)]
pub struct LifeCycle {
    current_state: LifeState,
}

impl LifeCycle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the current state
    pub fn state(&self) -> LifeState {
        self.current_state
    }

    /// Enter the dying state
    ///
    /// Returns `true` only on the call that actually started dying.
    pub fn begin_dying(&mut self) -> bool {
        if self.current_state != LifeState::Alive {
            return false;
        }
        self.transition(LifeState::Dying);
        true
    }

    /// Enter the removed state
    ///
    /// Returns `true` only on the first call.
    pub fn mark_removed(&mut self) -> bool {
        if self.current_state == LifeState::Removed {
            return false;
        }
        self.transition(LifeState::Removed);
        true
    }

    fn transition(&mut self, new_state: LifeState) {
        log::trace!("Lifecycle {:?} -> {:?}", self.current_state, new_state);
        self.current_state = new_state;
    }
}
