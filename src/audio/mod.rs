//! Audio subsystem: PWM sample playback for horn and tick sounds
//!
//! Architecture:
//! - Duty LUTs: 8-bit sample → 16-bit or legacy 10-bit duty
//! - Waveform cache: one store read per asset, zero-copy replays
//! - Renderer: absolute-deadline busy-wait pacing, silence on every exit
//! - Player seam: state machines ask for a [`Sound`], never touch the PWM

pub mod cache;
pub mod duty;
pub mod renderer;
pub mod sound;

pub use cache::{Waveform, WaveformCache};
pub use duty::{DutyScale, DUTY_LUT_10BIT, DUTY_LUT_U16, LUT_SIZE};
pub use renderer::{sample_period_us, AudioRenderer, PwmSession, MAX_SAMPLE_RATE};
pub use sound::{Player, Sound};
