//! Error types for playback and peripheral access.
//!
//! Two kinds matter to callers:
//! - [`AssetError`]: the backing store could not deliver a waveform.
//!   Aborts the current sound, leaves the cache untouched.
//! - [`PeripheralFault`]: an adapter reported an unexpected state.
//!   Never retried; playback stops with the output forced silent.

use core::fmt;

/// Result type for anything that can play a sound.
pub type Result<T> = core::result::Result<T, HonkError>;

/// Backing store errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetError {
    /// No asset under the requested identifier
    NotFound,
    /// Asset exists but reading it failed (corrupt, I/O error)
    ReadFailed,
    /// Asset exceeds the in-memory size limit for preloading
    TooLarge,
}

/// PWM adapter errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PwmError {
    /// Carrier frequency rejected by the timer
    InvalidFrequency,
    /// Duty value outside the adapter's scale
    InvalidDuty,
    /// Driver returned an error code
    Hardware,
}

/// GPIO adapter errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GpioError {
    /// Output level could not be driven
    WriteFailed,
}

/// Hardware adapter returned an unexpected state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeripheralFault {
    Pwm(PwmError),
    Gpio(GpioError),
}

/// Top-level error for sound playback and state machine polls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HonkError {
    /// Waveform could not be loaded or streamed
    AssetLoad(AssetError),
    /// PWM or GPIO adapter fault
    Peripheral(PeripheralFault),
    /// Sample rate is zero or too high for microsecond pacing
    InvalidSampleRate(u32),
}

impl From<AssetError> for HonkError {
    fn from(e: AssetError) -> Self {
        HonkError::AssetLoad(e)
    }
}

impl From<PwmError> for PeripheralFault {
    fn from(e: PwmError) -> Self {
        PeripheralFault::Pwm(e)
    }
}

impl From<GpioError> for PeripheralFault {
    fn from(e: GpioError) -> Self {
        PeripheralFault::Gpio(e)
    }
}

impl From<PeripheralFault> for HonkError {
    fn from(e: PeripheralFault) -> Self {
        HonkError::Peripheral(e)
    }
}

impl From<PwmError> for HonkError {
    fn from(e: PwmError) -> Self {
        HonkError::Peripheral(PeripheralFault::Pwm(e))
    }
}

impl From<GpioError> for HonkError {
    fn from(e: GpioError) -> Self {
        HonkError::Peripheral(PeripheralFault::Gpio(e))
    }
}

impl fmt::Display for AssetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetError::NotFound => write!(f, "asset not found"),
            AssetError::ReadFailed => write!(f, "asset read failed"),
            AssetError::TooLarge => write!(f, "asset too large to preload"),
        }
    }
}

impl fmt::Display for PwmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PwmError::InvalidFrequency => write!(f, "carrier frequency rejected"),
            PwmError::InvalidDuty => write!(f, "duty out of range"),
            PwmError::Hardware => write!(f, "driver error"),
        }
    }
}

impl fmt::Display for GpioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GpioError::WriteFailed => write!(f, "output write failed"),
        }
    }
}

impl fmt::Display for PeripheralFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeripheralFault::Pwm(e) => write!(f, "PWM error: {}", e),
            PeripheralFault::Gpio(e) => write!(f, "GPIO error: {}", e),
        }
    }
}

impl fmt::Display for HonkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HonkError::AssetLoad(e) => write!(f, "asset load error: {}", e),
            HonkError::Peripheral(e) => write!(f, "peripheral fault: {}", e),
            HonkError::InvalidSampleRate(rate) => write!(f, "invalid sample rate: {} Hz", rate),
        }
    }
}
