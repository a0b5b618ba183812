//! Save-in-flight coordination.
//!
//! One state machine owns the "a save is running" fact; the Save button and
//! the autosave timer both have to request a transition instead of checking
//! ad hoc booleans, so at most one persistence request is ever in flight for
//! a given draft.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SaveOrigin {
    Manual,
    Auto,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SaveState {
    Idle,
    Saving(SaveOrigin),
}

impl SaveState {
    /// Tries to start a save. Returns false while another one is running,
    /// whatever its origin.
    pub fn request(&mut self, origin: SaveOrigin) -> bool {
        match self {
            SaveState::Idle => {
                *self = SaveState::Saving(origin);
                true
            }
            SaveState::Saving(_) => false,
        }
    }

    /// Ends the running save, success or not.
    pub fn finish(&mut self) {
        *self = SaveState::Idle;
    }

    pub fn is_idle(&self) -> bool {
        *self == SaveState::Idle
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_one_save_at_a_time() {
        let mut state = SaveState::Idle;
        assert!(state.request(SaveOrigin::Auto));
        assert_eq!(state, SaveState::Saving(SaveOrigin::Auto));

        // a manual click during an autosave is rejected, and vice versa
        assert!(!state.request(SaveOrigin::Manual));
        assert!(!state.request(SaveOrigin::Auto));
        assert_eq!(state, SaveState::Saving(SaveOrigin::Auto));
    }

    #[test]
    fn finishing_reopens_the_machine() {
        let mut state = SaveState::Idle;
        assert!(state.request(SaveOrigin::Manual));
        state.finish();
        assert!(state.is_idle());
        assert!(state.request(SaveOrigin::Auto));
    }
}
