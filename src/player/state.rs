//! Playback transport state
//!
//! The three-state transport machine shared between the command surface and
//! the decode loop. Transitions are validated so every caller agrees on which
//! edges exist, and the current value lives in an atomic cell any task can
//! read without locking.

use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};

/// Playback transport state machine
///
/// Represents the externally observable state of a player. Commands request
/// transitions; the decode loop polls the shared cell and reacts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerState {
    /// No decode loop is consuming the stream; the display shows the stopped glyph
    Stopped,

    /// The decode loop is reading, decoding and presenting frames
    Playing,

    /// The decode loop is parked; the last frame stays on screen
    Paused,
}

impl PlayerState {
    /// Check if this state transition is valid
    pub fn can_transition_to(&self, target: PlayerState) -> bool {
        use PlayerState::*;

        match (self, target) {
            // Play
            (Stopped, Playing) => true,

            // Pause toggle
            (Playing, Paused) => true,
            (Paused, Playing) => true,

            // Stop is always reachable from an active state
            (Playing, Stopped) => true,
            (Paused, Stopped) => true,

            // A stopped player cannot pause
            (Stopped, Paused) => false,

            // Self-transitions are no-ops
            (a, b) if *a == b => true,

            // All other transitions invalid
            _ => false,
        }
    }

    /// Get a human-readable description of this state
    pub fn description(&self) -> &'static str {
        match self {
            PlayerState::Stopped => "Stopped",
            PlayerState::Playing => "Playing",
            PlayerState::Paused => "Paused",
        }
    }

    /// Check if a decode loop should currently exist (playing or paused)
    pub fn is_active(&self) -> bool {
        matches!(self, PlayerState::Playing | PlayerState::Paused)
    }

    /// Check if the player is playing
    pub fn is_playing(&self) -> bool {
        matches!(self, PlayerState::Playing)
    }

    /// Check if the player is paused
    pub fn is_paused(&self) -> bool {
        matches!(self, PlayerState::Paused)
    }

    /// Check if the player is stopped
    pub fn is_stopped(&self) -> bool {
        matches!(self, PlayerState::Stopped)
    }

    fn as_u8(self) -> u8 {
        match self {
            PlayerState::Stopped => 0,
            PlayerState::Playing => 1,
            PlayerState::Paused => 2,
        }
    }

    fn from_u8(raw: u8) -> PlayerState {
        match raw {
            1 => PlayerState::Playing,
            2 => PlayerState::Paused,
            _ => PlayerState::Stopped,
        }
    }
}

impl std::fmt::Display for PlayerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// Shared transport state cell
///
/// One atomic value behind a clonable handle. Writers go through the
/// validated [`try_set`](StateCell::try_set) so invalid edges are rejected at
/// the same place they are defined.
#[derive(Clone)]
pub(crate) struct StateCell {
    state: Arc<AtomicU8>,
}

impl StateCell {
    pub(crate) fn new() -> StateCell {
        StateCell {
            state: Arc::new(AtomicU8::new(PlayerState::Stopped.as_u8())),
        }
    }

    pub(crate) fn get(&self) -> PlayerState {
        PlayerState::from_u8(self.state.load(Ordering::SeqCst))
    }

    /// Unconditional store. Reserved for the session's terminal transitions.
    pub(crate) fn set(&self, value: PlayerState) {
        self.state.store(value.as_u8(), Ordering::SeqCst)
    }

    /// Validated store: applies `target` only while the machine allows the
    /// edge from the current state. Returns whether the store happened.
    pub(crate) fn try_set(&self, target: PlayerState) -> bool {
        loop {
            let current = self.get();
            if !current.can_transition_to(target) {
                return false;
            }
            if self
                .state
                .compare_exchange(
                    current.as_u8(),
                    target.as_u8(),
                    Ordering::SeqCst,
                    Ordering::SeqCst,
                )
                .is_ok()
            {
                return true;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_transitions() {
        let stopped = PlayerState::Stopped;
        let playing = PlayerState::Playing;
        let paused = PlayerState::Paused;

        // Valid transitions
        assert!(stopped.can_transition_to(playing));
        assert!(playing.can_transition_to(paused));
        assert!(paused.can_transition_to(playing));
        assert!(playing.can_transition_to(stopped));
        assert!(paused.can_transition_to(stopped));

        // Self-transitions
        assert!(stopped.can_transition_to(stopped));
        assert!(playing.can_transition_to(playing));
        assert!(paused.can_transition_to(paused));
    }

    #[test]
    fn test_invalid_transitions() {
        // A stopped player has nothing to pause
        assert!(!PlayerState::Stopped.can_transition_to(PlayerState::Paused));
    }

    #[test]
    fn test_state_checks() {
        assert!(PlayerState::Playing.is_active());
        assert!(PlayerState::Playing.is_playing());
        assert!(!PlayerState::Playing.is_paused());
        assert!(!PlayerState::Playing.is_stopped());

        assert!(PlayerState::Paused.is_active());
        assert!(!PlayerState::Paused.is_playing());
        assert!(PlayerState::Paused.is_paused());
        assert!(!PlayerState::Paused.is_stopped());

        assert!(!PlayerState::Stopped.is_active());
        assert!(PlayerState::Stopped.is_stopped());
    }

    #[test]
    fn test_state_cell_validates_edges() {
        let cell = StateCell::new();
        assert_eq!(cell.get(), PlayerState::Stopped);

        // Pause from stopped is rejected, the cell keeps its value
        assert!(!cell.try_set(PlayerState::Paused));
        assert_eq!(cell.get(), PlayerState::Stopped);

        assert!(cell.try_set(PlayerState::Playing));
        assert!(cell.try_set(PlayerState::Paused));
        assert!(cell.try_set(PlayerState::Playing));
        assert!(cell.try_set(PlayerState::Stopped));
        assert_eq!(cell.get(), PlayerState::Stopped);

        // Idempotent stop
        assert!(cell.try_set(PlayerState::Stopped));
    }

    #[test]
    fn test_state_cell_shares_one_value() {
        let cell = StateCell::new();
        let clone = cell.clone();
        assert!(cell.try_set(PlayerState::Playing));
        assert_eq!(clone.get(), PlayerState::Playing);
    }
}
