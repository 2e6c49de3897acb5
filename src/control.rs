//! Cooperative control loop.
//!
//! One execution context, no preemption. Each iteration polls every state
//! machine in fixed priority order:
//!
//! 1. Horn button → horn controller
//! 2. Each turn signal (button → blink timer), in registration order
//!
//! If nothing is active, pending logs are drained and the loop takes a short
//! low-power sleep; otherwise it loops again immediately.
//!
//! Sounds block the loop. A horn sound in progress delays any blink trigger
//! that falls due meanwhile, so trigger skew is bounded by the longest sound
//! asset. Every poll runs behind its own error boundary: faults are recorded
//! and logged, never propagated, so the loop itself cannot fail.

use alloc::vec::Vec;
use core::fmt::Write;

use crate::audio::sound::Player;
use crate::blinker::TurnSignal;
use crate::error::HonkError;
use crate::fault::FaultState;
use crate::hal::clock::{Clock, Sleeper};
use crate::hal::gpio::{InputPin, OutputPin};
use crate::horn::HornController;
use crate::input::DebouncedButton;
use crate::logging::LogStream;
use crate::uart_logger::drain_to;
use crate::{rt_error, rt_info};

/// Record a failed poll and fall back to the component's own view of whether
/// it is still active.
fn contain(
    faults: &FaultState,
    log: &LogStream,
    now_ms: u32,
    source: &str,
    result: Result<bool, HonkError>,
    fallback: bool,
) -> bool {
    match result {
        Ok(active) => active,
        Err(e) => {
            faults.record(&e);
            rt_error!(log, now_ms, "{}: {}", source, e);
            fallback
        }
    }
}

/// Horn + turn-signal scheduler.
pub struct ControlLoop<'a, C, Z, I, O, R>
where
    C: Clock,
    Z: Sleeper,
    I: InputPin,
    O: OutputPin,
    R: Player,
{
    clock: C,
    sleeper: Z,
    player: R,

    horn_button: DebouncedButton<I>,
    horn: HornController,
    signals: Vec<TurnSignal<I, O>>,

    faults: &'a FaultState,
    log: &'a LogStream,
    sink: Option<&'a mut dyn Write>,

    idle_sleep_ms: u32,
    iterations: u32,
}

impl<'a, C, Z, I, O, R> ControlLoop<'a, C, Z, I, O, R>
where
    C: Clock,
    Z: Sleeper,
    I: InputPin,
    O: OutputPin,
    R: Player,
{
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        clock: C,
        sleeper: Z,
        player: R,
        horn_button: DebouncedButton<I>,
        horn: HornController,
        faults: &'a FaultState,
        log: &'a LogStream,
        idle_sleep_ms: u32,
    ) -> Self {
        Self {
            clock,
            sleeper,
            player,
            horn_button,
            horn,
            signals: Vec::new(),
            faults,
            log,
            sink: None,
            idle_sleep_ms,
            iterations: 0,
        }
    }

    /// Append a turn signal; polled after the horn, in the order added.
    pub fn with_signal(mut self, signal: TurnSignal<I, O>) -> Self {
        self.signals.push(signal);
        self
    }

    /// Where pending log lines go right before each idle sleep.
    pub fn with_log_sink(mut self, sink: &'a mut dyn Write) -> Self {
        self.sink = Some(sink);
        self
    }

    /// One pass over every state machine. Returns whether any is active.
    pub fn poll_once(&mut self) -> bool {
        let faults = self.faults;
        let log = self.log;
        self.iterations = self.iterations.wrapping_add(1);

        // 1. Horn
        let now = self.clock.now_ms();
        self.horn_button.update(now);
        let was_honking = self.horn.is_honking();
        let result = self.horn.poll(self.horn_button.is_pressed(), &mut self.player);
        let honking = contain(faults, log, now, "horn", result, self.horn.is_honking());
        if honking != was_honking {
            rt_info!(log, now, "horn {}", if honking { "start" } else { "stop" });
        }

        let mut active = honking;

        // 2. Turn signals; fresh timestamp each, earlier sounds took time
        for (idx, signal) in self.signals.iter_mut().enumerate() {
            let now = self.clock.now_ms();
            let was_on = signal.is_active();
            let result = signal.poll(now, &mut self.player);
            let on = contain(faults, log, now, "signal", result, signal.is_active());
            if on != was_on {
                rt_info!(log, now, "signal {} {}", idx, if on { "on" } else { "off" });
            }
            active |= on;
        }

        active
    }

    /// Poll once; drain logs and sleep if idle.
    pub fn run_iteration(&mut self) -> bool {
        let active = self.poll_once();

        if !active {
            if let Some(sink) = self.sink.as_mut() {
                drain_to(self.log, &mut **sink);
            }
            self.sleeper.sleep_ms(self.idle_sleep_ms);
        }

        active
    }

    /// Run forever.
    pub fn run(&mut self) -> ! {
        loop {
            self.run_iteration();
        }
    }

    pub fn horn(&self) -> &HornController {
        &self.horn
    }

    pub fn signals(&self) -> &[TurnSignal<I, O>] {
        &self.signals
    }

    pub fn player(&self) -> &R {
        &self.player
    }

    /// Iterations since construction.
    pub fn iterations(&self) -> u32 {
        self.iterations
    }
}
