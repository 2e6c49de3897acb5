//! Mock PWM channel for testing

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;

use super::clock::MockClock;
use crate::audio::duty::DutyScale;
use crate::error::PwmError;
use crate::hal::pwm::PwmOutput;

/// One recorded duty write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DutyWrite {
    /// Simulated time of the write
    pub at_us: u64,
    pub duty: u16,
}

#[derive(Debug)]
struct PwmInner {
    scale: DutyScale,
    frequency: u32,
    duty: u16,
    writes: Vec<DutyWrite>,
    frequencies: Vec<u32>,
    /// Non-zero writes allowed before failing
    fail_after: Option<usize>,
    nonzero_writes: usize,
}

/// Mock PWM channel
///
/// Tracks duty and carrier with timestamps from a shared [`MockClock`].
#[derive(Debug, Clone)]
pub struct MockPwm {
    clock: MockClock,
    inner: Rc<RefCell<PwmInner>>,
}

impl MockPwm {
    pub fn new(clock: MockClock, scale: DutyScale) -> Self {
        Self {
            clock,
            inner: Rc::new(RefCell::new(PwmInner {
                scale,
                frequency: 0,
                duty: 0,
                writes: Vec::new(),
                frequencies: Vec::new(),
                fail_after: None,
                nonzero_writes: 0,
            })),
        }
    }

    /// Fail every non-zero duty write after the first `n`.
    ///
    /// Silencing writes still land so the recovery path can be observed.
    pub fn fail_after(&self, n: usize) {
        self.inner.borrow_mut().fail_after = Some(n);
    }

    /// Current duty.
    pub fn duty(&self) -> u16 {
        self.inner.borrow().duty
    }

    /// Current carrier frequency.
    pub fn frequency(&self) -> u32 {
        self.inner.borrow().frequency
    }

    /// Every successful duty write, in order.
    pub fn writes(&self) -> Vec<DutyWrite> {
        self.inner.borrow().writes.clone()
    }

    /// Every carrier frequency set, in order.
    pub fn frequencies(&self) -> Vec<u32> {
        self.inner.borrow().frequencies.clone()
    }

    /// Forget recorded writes (state is kept).
    pub fn clear_log(&self) {
        let mut inner = self.inner.borrow_mut();
        inner.writes.clear();
        inner.frequencies.clear();
    }
}

impl PwmOutput for MockPwm {
    fn duty_scale(&self) -> DutyScale {
        self.inner.borrow().scale
    }

    fn set_frequency(&mut self, hz: u32) -> Result<(), PwmError> {
        if hz == 0 {
            return Err(PwmError::InvalidFrequency);
        }
        let mut inner = self.inner.borrow_mut();
        inner.frequency = hz;
        inner.frequencies.push(hz);
        Ok(())
    }

    fn set_duty(&mut self, duty: u16) -> Result<(), PwmError> {
        let mut inner = self.inner.borrow_mut();
        if duty > inner.scale.max_duty() {
            return Err(PwmError::InvalidDuty);
        }
        if duty != 0 {
            if let Some(limit) = inner.fail_after {
                if inner.nonzero_writes >= limit {
                    return Err(PwmError::Hardware);
                }
            }
            inner.nonzero_writes += 1;
        }
        inner.duty = duty;
        inner.writes.push(DutyWrite {
            at_us: self.clock.peek_us(),
            duty,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_pwm_rejects_out_of_scale() {
        let mut pwm = MockPwm::new(MockClock::new(), DutyScale::Legacy10Bit);
        assert_eq!(pwm.set_duty(1024), Err(PwmError::InvalidDuty));
        assert_eq!(pwm.set_duty(1023), Ok(()));
        assert_eq!(pwm.set_frequency(0), Err(PwmError::InvalidFrequency));
    }

    #[test]
    fn test_fail_after_spares_silence() {
        let mut pwm = MockPwm::new(MockClock::new(), DutyScale::U16);
        pwm.fail_after(1);
        assert!(pwm.set_duty(100).is_ok());
        assert_eq!(pwm.set_duty(200), Err(PwmError::Hardware));
        assert!(pwm.set_duty(0).is_ok());
        assert_eq!(pwm.duty(), 0);
    }
}
