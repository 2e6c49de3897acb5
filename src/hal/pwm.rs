//! PWM output boundary (single channel).

use crate::error::PwmError;

pub use crate::audio::duty::DutyScale;

/// One PWM channel driving the buzzer.
///
/// Duty values are in the adapter's native [`DutyScale`], which is queried
/// once when the renderer is built.
pub trait PwmOutput {
    /// Duty range this channel accepts.
    fn duty_scale(&self) -> DutyScale;

    /// Set carrier frequency in Hz.
    fn set_frequency(&mut self, hz: u32) -> Result<(), PwmError>;

    /// Set duty in the native scale (0 = silent).
    fn set_duty(&mut self, duty: u16) -> Result<(), PwmError>;
}
