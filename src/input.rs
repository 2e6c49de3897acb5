//! Debounced button input.
//!
//! Pure filter over a raw [`InputPin`]: every raw transition restarts the
//! quiet window, and only a contiguous quiet period of `debounce_ms` commits
//! a new stable level. Committed transitions arm one-shot edge events.

use crate::hal::clock::ticks_diff;
use crate::hal::gpio::{ActiveLevel, InputPin};

/// Debounce filter with edge and level queries.
///
/// # Example
///
/// ```
/// use rust_pwm_honker::hal::ActiveLevel;
/// use rust_pwm_honker::input::DebouncedButton;
/// use rust_pwm_honker::mock::MockInputPin;
///
/// let pin = MockInputPin::new(true); // pulled up, released
/// let mut button = DebouncedButton::new(pin.clone(), 50, ActiveLevel::Low, 0);
///
/// pin.set_level(false); // pressed
/// button.update(0);
/// button.update(50);
/// assert!(button.pressed());
/// assert!(!button.pressed()); // consumed
/// assert!(button.is_pressed());
/// ```
pub struct DebouncedButton<I: InputPin> {
    pin: I,
    debounce_ms: u32,
    active: ActiveLevel,

    last_raw: bool,
    stable: bool,
    last_change_ms: u32,

    pressed_event: bool,
    released_event: bool,
}

impl<I: InputPin> DebouncedButton<I> {
    /// Wrap `pin`; the current raw level becomes the initial stable level.
    pub fn new(pin: I, debounce_ms: u32, active: ActiveLevel, now_ms: u32) -> Self {
        let level = pin.is_high();
        Self {
            pin,
            debounce_ms,
            active,
            last_raw: level,
            stable: level,
            last_change_ms: now_ms,
            pressed_event: false,
            released_event: false,
        }
    }

    /// Sample the line once and advance the filter.
    pub fn update(&mut self, now_ms: u32) {
        let raw = self.pin.is_high();

        if raw != self.last_raw {
            // Bounce (or a real edge): restart the quiet window
            self.last_raw = raw;
            self.last_change_ms = now_ms;
        } else if raw != self.stable
            && ticks_diff(now_ms, self.last_change_ms) >= self.debounce_ms as i32
        {
            self.stable = raw;
            if self.active.is_active(raw) {
                self.pressed_event = true;
            } else {
                self.released_event = true;
            }
        }
    }

    /// True once per committed press.
    pub fn pressed(&mut self) -> bool {
        core::mem::take(&mut self.pressed_event)
    }

    /// True once per committed release.
    pub fn released(&mut self) -> bool {
        core::mem::take(&mut self.released_event)
    }

    /// Committed level is the active level. Not consumed.
    #[inline]
    pub fn is_pressed(&self) -> bool {
        self.active.is_active(self.stable)
    }

    pub fn debounce_ms(&self) -> u32 {
        self.debounce_ms
    }
}
