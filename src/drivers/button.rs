//! Tick-debounced push-button.
//!
//! ## Hardware
//!
//! Active-low momentary switch with external pull-up.  The main loop
//! samples the level once per control tick and feeds it to [`tick`];
//! a press is reported once the level has stayed down for
//! [`DEBOUNCE_MS`], and not again until the button has been released.
//!
//! [`tick`]: DebouncedButton::tick

/// Minimum time the contact must read pressed before it counts.
pub const DEBOUNCE_MS: u64 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonEvent {
    Press,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DebounceState {
    Released,
    DebounceWait { since_ms: u64 },
    Held,
}

#[derive(Debug)]
pub struct DebouncedButton {
    state: DebounceState,
}

impl Default for DebouncedButton {
    fn default() -> Self {
        Self::new()
    }
}

impl DebouncedButton {
    pub fn new() -> Self {
        Self {
            state: DebounceState::Released,
        }
    }

    /// Call from the main loop at each control tick with the sampled
    /// contact state and the current monotonic time.
    pub fn tick(&mut self, pressed: bool, now_ms: u64) -> Option<ButtonEvent> {
        match (self.state, pressed) {
            (_, false) => {
                self.state = DebounceState::Released;
                None
            }
            (DebounceState::Released, true) => {
                self.state = DebounceState::DebounceWait { since_ms: now_ms };
                None
            }
            (DebounceState::DebounceWait { since_ms }, true) => {
                if now_ms.saturating_sub(since_ms) >= DEBOUNCE_MS {
                    self.state = DebounceState::Held;
                    Some(ButtonEvent::Press)
                } else {
                    None
                }
            }
            (DebounceState::Held, true) => None,
        }
    }
}
