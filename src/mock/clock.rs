//! Mock clock and sleeper

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};

use crate::hal::clock::{Clock, Sleeper};

#[derive(Debug, Default)]
struct ClockInner {
    now_us: Cell<u64>,
    step_us: Cell<u32>,
}

/// Simulated monotonic time in microseconds.
///
/// Every read returns the current time and then advances it by the configured
/// step, so busy-wait loops terminate and an active control loop sees time
/// move.
#[derive(Debug, Clone, Default)]
pub struct MockClock {
    inner: Rc<ClockInner>,
}

impl MockClock {
    /// Clock at t=0 that only moves when told to.
    pub fn new() -> Self {
        Self::default()
    }

    /// Clock at t=0 advancing `step_us` per read.
    pub fn with_step(step_us: u32) -> Self {
        let clock = Self::new();
        clock.set_step(step_us);
        clock
    }

    pub fn set_step(&self, step_us: u32) {
        self.inner.step_us.set(step_us);
    }

    /// Jump to an absolute time (e.g., just before a counter wrap).
    pub fn set_us(&self, us: u64) {
        self.inner.now_us.set(us);
    }

    pub fn advance_us(&self, us: u64) {
        self.inner.now_us.set(self.inner.now_us.get() + us);
    }

    pub fn advance_ms(&self, ms: u64) {
        self.advance_us(ms * 1000);
    }

    /// Current simulated time without advancing (not wrapped).
    pub fn peek_us(&self) -> u64 {
        self.inner.now_us.get()
    }
}

impl Clock for MockClock {
    fn now_us(&self) -> u32 {
        let now = self.inner.now_us.get();
        self.inner.now_us.set(now + self.inner.step_us.get() as u64);
        now as u32
    }

    fn now_ms(&self) -> u32 {
        let now = self.inner.now_us.get();
        self.inner.now_us.set(now + self.inner.step_us.get() as u64);
        (now / 1000) as u32
    }
}

/// Sleeper that advances a [`MockClock`] and records each sleep.
#[derive(Debug, Clone)]
pub struct MockSleeper {
    clock: MockClock,
    sleeps: Rc<RefCell<Vec<u32>>>,
}

impl MockSleeper {
    pub fn new(clock: MockClock) -> Self {
        Self {
            clock,
            sleeps: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// Durations of every sleep taken so far.
    pub fn sleeps(&self) -> Vec<u32> {
        self.sleeps.borrow().clone()
    }
}

impl Sleeper for MockSleeper {
    fn sleep_ms(&mut self, ms: u32) {
        self.sleeps.borrow_mut().push(ms);
        self.clock.advance_ms(ms as u64);
    }
}
