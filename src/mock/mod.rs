//! Simulated peripherals for host builds.
//!
//! Every mock is a cheap `Clone` handle over shared state, so a test keeps a
//! probe while the component under test owns the other half.

mod clock;
mod gpio;
mod player;
mod pwm;
mod storage;

pub use clock::{MockClock, MockSleeper};
pub use gpio::{MockInputPin, MockOutputPin};
pub use player::RecordingPlayer;
pub use pwm::{DutyWrite, MockPwm};
pub use storage::{MemReader, MemStore};
