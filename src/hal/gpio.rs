//! Digital I/O boundary for buttons and lamp outputs.

use crate::error::GpioError;

/// Pull resistor applied to an input line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pull {
    None,
    Up,
    Down,
}

/// Electrical level that means "pressed".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveLevel {
    /// Pressed pulls the line to ground (button to GND + pull-up)
    Low,
    /// Pressed drives the line high
    High,
}

impl ActiveLevel {
    /// Whether a raw line level means "pressed".
    #[inline]
    pub fn is_active(self, high: bool) -> bool {
        match self {
            ActiveLevel::Low => !high,
            ActiveLevel::High => high,
        }
    }
}

/// Input pin configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputConfig {
    pub pin: i32,
    pub pull: Pull,
    pub active: ActiveLevel,
    pub debounce_ms: u32,
}

/// Readable digital line.
pub trait InputPin {
    /// Current raw level (`true` = high).
    fn is_high(&self) -> bool;
}

/// Drivable digital line.
pub trait OutputPin {
    fn set_level(&mut self, high: bool) -> Result<(), GpioError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_level() {
        assert!(ActiveLevel::Low.is_active(false));
        assert!(!ActiveLevel::Low.is_active(true));
        assert!(ActiveLevel::High.is_active(true));
        assert!(!ActiveLevel::High.is_active(false));
    }
}
