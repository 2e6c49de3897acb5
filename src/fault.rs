//! Fault record for RustPwmHonker.
//!
//! # Philosophy
//!
//! > A horn that stays silent is annoying. A horn stuck at half duty is broken.
//!
//! Every poll in the control loop runs behind an error boundary. A failed
//! sound is dropped (output already forced silent), the fault is recorded
//! here, and the loop keeps servicing the other state machines.

use core::sync::atomic::{AtomicBool, AtomicU32, AtomicU8, Ordering};

use crate::error::{AssetError, HonkError, PeripheralFault};

/// Fault codes indicating why a sound or output was dropped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum FaultCode {
    /// No fault (normal operation).
    None = 0,

    /// Waveform asset missing or unreadable.
    AssetLoad = 1,

    /// PWM adapter rejected a frequency or duty write.
    PwmFault = 2,

    /// Lamp output could not be driven.
    GpioFault = 3,

    /// Sound configured with an unusable sample rate.
    InvalidSampleRate = 4,
}

impl FaultCode {
    /// Convert from raw u8 value.
    pub fn from_u8(value: u8) -> Self {
        match value {
            1 => FaultCode::AssetLoad,
            2 => FaultCode::PwmFault,
            3 => FaultCode::GpioFault,
            4 => FaultCode::InvalidSampleRate,
            _ => FaultCode::None,
        }
    }

    /// Split an error into code + diagnostic payload.
    ///
    /// Payload: asset error kind, or the rejected sample rate.
    pub fn classify(err: &HonkError) -> (FaultCode, u32) {
        match *err {
            HonkError::AssetLoad(e) => {
                let kind = match e {
                    AssetError::NotFound => 1,
                    AssetError::ReadFailed => 2,
                    AssetError::TooLarge => 3,
                };
                (FaultCode::AssetLoad, kind)
            }
            HonkError::Peripheral(PeripheralFault::Pwm(_)) => (FaultCode::PwmFault, 0),
            HonkError::Peripheral(PeripheralFault::Gpio(_)) => (FaultCode::GpioFault, 0),
            HonkError::InvalidSampleRate(rate) => (FaultCode::InvalidSampleRate, rate),
        }
    }
}

impl From<&HonkError> for FaultCode {
    fn from(err: &HonkError) -> Self {
        FaultCode::classify(err).0
    }
}

/// Last-fault record.
///
/// Atomics let it live in a `static` shared by the loop and diagnostics.
///
/// # Usage
///
/// ```ignore
/// static FAULTS: FaultState = FaultState::new();
///
/// // In a poll error boundary:
/// if let Err(e) = horn.poll(pressed, &mut renderer) {
///     FAULTS.record(&e);
/// }
/// ```
pub struct FaultState {
    /// True if the last fault has not been acknowledged.
    active: AtomicBool,

    /// Fault code (reason for fault).
    code: AtomicU8,

    /// Additional data (see [`FaultCode::classify`]).
    data: AtomicU32,

    /// Total fault count since boot (never cleared).
    count: AtomicU32,
}

impl FaultState {
    /// Create new fault state (no fault).
    pub const fn new() -> Self {
        Self {
            active: AtomicBool::new(false),
            code: AtomicU8::new(0),
            data: AtomicU32::new(0),
            count: AtomicU32::new(0),
        }
    }

    /// Set fault state and bump the counter.
    #[inline]
    pub fn set(&self, code: FaultCode, data: u32) {
        self.code.store(code as u8, Ordering::Release);
        self.data.store(data, Ordering::Release);
        self.count.fetch_add(1, Ordering::Relaxed);
        self.active.store(true, Ordering::Release);
    }

    /// Record a playback / output error.
    #[inline]
    pub fn record(&self, err: &HonkError) {
        let (code, data) = FaultCode::classify(err);
        self.set(code, data);
    }

    /// Check if fault is currently active.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// Get fault code (only meaningful if `is_active()` is true).
    #[inline]
    pub fn code(&self) -> FaultCode {
        FaultCode::from_u8(self.code.load(Ordering::Acquire))
    }

    #[inline]
    pub fn data(&self) -> u32 {
        self.data.load(Ordering::Acquire)
    }

    /// Get total fault count since boot.
    #[inline]
    pub fn count(&self) -> u32 {
        self.count.load(Ordering::Relaxed)
    }

    /// Acknowledge the fault. The counter keeps its history.
    #[inline]
    pub fn clear(&self) {
        self.active.store(false, Ordering::Release);
    }

    /// Get a snapshot of the current fault state.
    #[inline]
    pub fn snapshot(&self) -> FaultSnapshot {
        FaultSnapshot {
            active: self.is_active(),
            code: self.code(),
            data: self.data(),
            count: self.count(),
        }
    }
}

impl Default for FaultState {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of fault state at a point in time.
#[derive(Clone, Copy, Debug)]
pub struct FaultSnapshot {
    pub active: bool,
    pub code: FaultCode,
    pub data: u32,
    pub count: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{GpioError, PwmError};

    #[test]
    fn test_fault_state_basic() {
        let fault = FaultState::new();

        assert!(!fault.is_active());
        assert_eq!(fault.code(), FaultCode::None);
        assert_eq!(fault.count(), 0);

        fault.record(&HonkError::AssetLoad(AssetError::ReadFailed));

        assert!(fault.is_active());
        assert_eq!(fault.code(), FaultCode::AssetLoad);
        assert_eq!(fault.data(), 2);
        assert_eq!(fault.count(), 1);

        fault.clear();

        assert!(!fault.is_active());
        assert_eq!(fault.count(), 1); // Count preserved
    }

    #[test]
    fn test_classify() {
        assert_eq!(FaultCode::from(&HonkError::from(PwmError::Hardware)), FaultCode::PwmFault);
        assert_eq!(FaultCode::from(&HonkError::from(GpioError::WriteFailed)), FaultCode::GpioFault);
        assert_eq!(
            FaultCode::classify(&HonkError::InvalidSampleRate(0)),
            (FaultCode::InvalidSampleRate, 0)
        );
    }

    #[test]
    fn test_fault_count_accumulates() {
        let fault = FaultState::new();

        fault.record(&HonkError::from(PwmError::InvalidDuty));
        fault.clear();
        fault.record(&HonkError::from(AssetError::NotFound));
        fault.clear();
        fault.record(&HonkError::from(GpioError::WriteFailed));

        assert_eq!(fault.count(), 3);
        assert_eq!(fault.snapshot().code, FaultCode::GpioFault);
    }
}
