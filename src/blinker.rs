//! Turn-signal blink/tick timer.
//!
//! Pure timing logic around a lamp output and a [`Player`]; the caller
//! supplies the time. Fully testable on host.
//!
//! # States
//!
//! ```text
//!            pressed edge: trigger now
//! Inactive ────────────────────────────▶ Active ──┐ period elapsed:
//!    ▲                                     │  ▲    │ flip lamp, tick/tock
//!    └──────── pressed edge: lamp low ─────┘  └────┘
//! ```
//!
//! Triggers land at `t0, t0+period, t0+2·period, ...` measured from the
//! previous trigger, each late by at most one poll interval, never early.

use crate::audio::sound::{Player, Sound};
use crate::error::{GpioError, HonkError};
use crate::hal::clock::ticks_diff;
use crate::hal::gpio::{InputPin, OutputPin};
use crate::input::DebouncedButton;

/// Periodic re-triggering lamp + tick state machine.
pub struct BlinkTimer<O: OutputPin> {
    output: O,
    period_ms: u32,
    tick: Sound,
    tock: Sound,

    active: bool,
    /// Next trigger plays `tock`
    tock_next: bool,
    lit: bool,
    last_trigger_ms: u32,
    triggers: u32,
}

impl<O: OutputPin> BlinkTimer<O> {
    /// Create an inactive timer; the lamp is driven low right away.
    pub fn new(mut output: O, period_ms: u32, tick: Sound, tock: Sound) -> Result<Self, GpioError> {
        output.set_level(false)?;
        Ok(Self {
            output,
            period_ms,
            tick,
            tock,
            active: false,
            tock_next: false,
            lit: false,
            last_trigger_ms: 0,
            triggers: 0,
        })
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Current lamp level.
    #[inline]
    pub fn is_lit(&self) -> bool {
        self.lit
    }

    /// Triggers since boot.
    pub fn triggers(&self) -> u32 {
        self.triggers
    }

    pub fn period_ms(&self) -> u32 {
        self.period_ms
    }

    /// Flip between inactive and active (bound to a pressed edge).
    pub fn toggle<P: Player>(&mut self, now_ms: u32, player: &mut P) -> Result<bool, HonkError> {
        if self.active {
            self.deactivate()?;
        } else {
            self.activate(now_ms, player)?;
        }
        Ok(self.active)
    }

    /// Enter active state with an immediate trigger. No-op if already active.
    pub fn activate<P: Player>(&mut self, now_ms: u32, player: &mut P) -> Result<(), HonkError> {
        if self.active {
            return Ok(());
        }
        self.active = true;
        self.lit = false;
        self.tock_next = false;
        self.trigger(now_ms, player)
    }

    /// Leave active state: lamp low, no sound.
    pub fn deactivate(&mut self) -> Result<(), HonkError> {
        self.active = false;
        self.lit = false;
        self.tock_next = false;
        self.output.set_level(false)?;
        Ok(())
    }

    /// Trigger if a full period elapsed since the last trigger.
    ///
    /// Only blocks for the tick/tock sound. Returns whether active.
    pub fn handle<P: Player>(&mut self, now_ms: u32, player: &mut P) -> Result<bool, HonkError> {
        if self.active && ticks_diff(now_ms, self.last_trigger_ms) >= self.period_ms as i32 {
            self.trigger(now_ms, player)?;
        }
        Ok(self.active)
    }

    fn trigger<P: Player>(&mut self, now_ms: u32, player: &mut P) -> Result<(), HonkError> {
        // Timestamp first: a failed sound must not cause a retrigger storm
        self.last_trigger_ms = now_ms;
        self.triggers = self.triggers.wrapping_add(1);

        self.output.set_level(!self.lit)?;
        self.lit = !self.lit;

        let sound = if self.tock_next { self.tock } else { self.tick };
        self.tock_next = !self.tock_next;
        player.play_sound(&sound)
    }
}

/// A blink timer toggled by its own debounced button.
pub struct TurnSignal<I: InputPin, O: OutputPin> {
    button: DebouncedButton<I>,
    timer: BlinkTimer<O>,
}

impl<I: InputPin, O: OutputPin> TurnSignal<I, O> {
    pub fn new(button: DebouncedButton<I>, timer: BlinkTimer<O>) -> Self {
        Self { button, timer }
    }

    /// Sample the button, toggle on a press (not on release), service the timer.
    pub fn poll<P: Player>(&mut self, now_ms: u32, player: &mut P) -> Result<bool, HonkError> {
        self.button.update(now_ms);
        if self.button.pressed() {
            self.timer.toggle(now_ms, player)?;
        }
        // Releases carry no meaning here
        self.button.released();

        self.timer.handle(now_ms, player)
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.timer.is_active()
    }

    pub fn timer(&self) -> &BlinkTimer<O> {
        &self.timer
    }

    pub fn button(&self) -> &DebouncedButton<I> {
        &self.button
    }
}
