//! Long-press gesture state machine.
//!
//! A press starts in standard mode and switches to fine adjustment once it
//! has been held past the threshold. The machine owns no real timer: the
//! event loop polls it with the current instant, so at most one pending
//! threshold exists and starting a new press implicitly cancels the old
//! one. Releasing after the threshold commits exactly one fine-precision
//! correction in place of the standard-step action.

use crate::domain::accounting::InputMode;
use shared::TrackerConfig;
use std::time::{Duration, Instant};
use tracing::debug;

/// What a completed gesture should apply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureOutcome {
    /// Released before the threshold: one standard step
    Standard,
    /// Held past the threshold: one fine-precision correction
    Fine,
}

impl GestureOutcome {
    pub fn input_mode(&self) -> InputMode {
        match self {
            GestureOutcome::Standard => InputMode::Standard,
            GestureOutcome::Fine => InputMode::Fine,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PressState {
    Idle,
    Pressed { pressed_at: Instant },
    FineActive,
}

/// Tracks one press-and-hold interaction on a unit button
#[derive(Debug)]
pub struct PressGesture {
    state: PressState,
    long_press: Duration,
}

impl PressGesture {
    pub fn new(config: &TrackerConfig) -> Self {
        Self {
            state: PressState::Idle,
            long_press: Duration::from_millis(config.long_press_ms),
        }
    }

    /// Begin a press. Any gesture already in flight is cancelled.
    pub fn press(&mut self, now: Instant) {
        if self.state != PressState::Idle {
            debug!("new press cancels in-flight gesture");
        }
        self.state = PressState::Pressed { pressed_at: now };
    }

    /// Advance the machine; promotes to fine mode once the hold threshold
    /// has elapsed. Returns true on the tick that promoted.
    pub fn poll(&mut self, now: Instant) -> bool {
        if let PressState::Pressed { pressed_at } = self.state {
            if now.duration_since(pressed_at) >= self.long_press {
                self.state = PressState::FineActive;
                return true;
            }
        }
        false
    }

    /// Whether the gesture has switched to fine adjustment
    pub fn is_fine(&self) -> bool {
        self.state == PressState::FineActive
    }

    /// End the gesture, reporting what to apply. `None` when no press was
    /// in flight.
    pub fn release(&mut self, now: Instant) -> Option<GestureOutcome> {
        let outcome = match self.state {
            PressState::Idle => None,
            // The threshold may have elapsed since the last poll
            PressState::Pressed { pressed_at } => {
                if now.duration_since(pressed_at) >= self.long_press {
                    Some(GestureOutcome::Fine)
                } else {
                    Some(GestureOutcome::Standard)
                }
            }
            PressState::FineActive => Some(GestureOutcome::Fine),
        };
        self.state = PressState::Idle;
        outcome
    }

    /// Abort without committing anything
    pub fn cancel(&mut self) {
        self.state = PressState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gesture() -> PressGesture {
        PressGesture::new(&TrackerConfig::default())
    }

    #[test]
    fn test_quick_tap_is_standard() {
        let mut g = gesture();
        let t0 = Instant::now();
        g.press(t0);
        assert!(!g.poll(t0 + Duration::from_millis(100)));
        assert_eq!(
            g.release(t0 + Duration::from_millis(150)),
            Some(GestureOutcome::Standard)
        );
        // Released gestures leave nothing behind
        assert_eq!(g.release(t0 + Duration::from_millis(200)), None);
    }

    #[test]
    fn test_hold_past_threshold_is_fine() {
        let mut g = gesture();
        let t0 = Instant::now();
        g.press(t0);
        assert!(!g.poll(t0 + Duration::from_millis(499)));
        assert!(g.poll(t0 + Duration::from_millis(500)));
        assert!(g.is_fine());
        assert_eq!(
            g.release(t0 + Duration::from_millis(700)),
            Some(GestureOutcome::Fine)
        );
    }

    #[test]
    fn test_release_after_threshold_without_poll() {
        let mut g = gesture();
        let t0 = Instant::now();
        g.press(t0);
        assert_eq!(
            g.release(t0 + Duration::from_millis(600)),
            Some(GestureOutcome::Fine)
        );
    }

    #[test]
    fn test_new_press_cancels_previous_gesture() {
        let mut g = gesture();
        let t0 = Instant::now();
        g.press(t0);
        g.poll(t0 + Duration::from_millis(600));
        assert!(g.is_fine());
        // Second press restarts from standard mode
        g.press(t0 + Duration::from_millis(700));
        assert!(!g.is_fine());
        assert_eq!(
            g.release(t0 + Duration::from_millis(750)),
            Some(GestureOutcome::Standard)
        );
    }

    #[test]
    fn test_cancel_discards_gesture() {
        let mut g = gesture();
        let t0 = Instant::now();
        g.press(t0);
        g.cancel();
        assert_eq!(g.release(t0 + Duration::from_millis(50)), None);
    }

    #[test]
    fn test_outcome_maps_to_input_mode() {
        assert_eq!(GestureOutcome::Standard.input_mode(), InputMode::Standard);
        assert_eq!(GestureOutcome::Fine.input_mode(), InputMode::Fine);
    }
}
