//! Global log stream and fault record.
//!
//! One producer (the control loop), one consumer (the idle drain).

use crate::fault::FaultState;
use crate::logging::LogStream;

/// Log stream filled by the control loop and drained while idle.
pub static LOG_STREAM: LogStream = LogStream::new();

/// Last fault seen by any poll error boundary.
pub static FAULT_STATE: FaultState = FaultState::new();
