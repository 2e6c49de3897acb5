//! # RustPwmHonker
//!
//! Horn and turn-signal firmware for a small MCU with a PWM buzzer.
//!
//! ## Architecture
//!
//! A single cooperative loop polls pure state machines; sound goes through
//! one seam:
//! - Buttons are debounced in software, sampled once per poll
//! - [`HornController`] and [`BlinkTimer`] decide *what* to play
//! - [`Player`] renders it; [`AudioRenderer`] drives the PWM carrier
//! - Logging goes to a fixed ring, drained only while idle
//!
//! Hardware sits behind the traits in [`hal`]. Device adapters are in
//! `hal::esp`; host builds get simulated peripherals in [`mock`].

#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod error;
pub mod hal;
pub mod audio;
pub mod config;
pub mod input;
pub mod blinker;
pub mod horn;
pub mod control;
pub mod logging;
pub mod log_globals;
pub mod uart_logger;
pub mod fault;

#[cfg(not(target_os = "espidf"))]
pub mod mock;

pub use audio::{AudioRenderer, Player, Sound, Waveform, WaveformCache};
pub use blinker::{BlinkTimer, TurnSignal};
pub use config::{HonkerConfig, CONFIG};
pub use control::ControlLoop;
pub use error::{HonkError, Result};
pub use fault::{FaultCode, FaultState};
pub use horn::{HornController, HornState};
pub use input::DebouncedButton;
pub use logging::LogStream;
