//! Monotonic clock and low-power sleep boundaries.
//!
//! Counters are free-running `u32` values that wrap. Never subtract them
//! directly: use [`ticks_diff`] so comparisons stay correct across wraparound
//! (valid while the two instants are less than 2^31 ticks apart).

/// Monotonic time source.
pub trait Clock {
    /// Microsecond counter (wraps every ~71 minutes).
    fn now_us(&self) -> u32;

    /// Millisecond counter (wraps every ~49 days).
    fn now_ms(&self) -> u32;
}

/// Low-power wait that keeps the clock counters running.
pub trait Sleeper {
    fn sleep_ms(&mut self, ms: u32);
}

/// Signed distance from `start` to `end`, wraparound-safe.
///
/// Positive when `end` is after `start`.
#[inline]
pub fn ticks_diff(end: u32, start: u32) -> i32 {
    end.wrapping_sub(start) as i32
}

/// Advance a tick counter by `delta`, wrapping.
#[inline]
pub fn ticks_add(ticks: u32, delta: u32) -> u32 {
    ticks.wrapping_add(delta)
}

/// Busy-wait until the microsecond counter reaches `deadline_us`.
///
/// Returns immediately if the deadline already passed.
#[inline]
pub fn spin_until<C: Clock + ?Sized>(clock: &C, deadline_us: u32) {
    while ticks_diff(deadline_us, clock.now_us()) > 0 {
        core::hint::spin_loop();
    }
}
