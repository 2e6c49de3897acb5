//! Hardware Abstraction Layer for RustPwmHonker.
//!
//! Traits at every peripheral boundary. Business logic stays in core modules,
//! HAL is just I/O. ESP-IDF adapters live in [`esp`]; host builds use
//! [`crate::mock`].

pub mod clock;
pub mod gpio;
pub mod pwm;
pub mod storage;

#[cfg(target_os = "espidf")]
pub mod esp;

pub use clock::{spin_until, ticks_add, ticks_diff, Clock, Sleeper};
pub use gpio::{ActiveLevel, InputConfig, InputPin, OutputPin, Pull};
pub use pwm::{DutyScale, PwmOutput};
pub use storage::{AssetReader, AssetStore, MAX_ASSET_BYTES};
