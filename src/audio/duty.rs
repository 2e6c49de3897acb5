//! Sample-to-duty lookup tables
//!
//! 256-entry tables mapping an unsigned 8-bit PCM sample to a PWM duty value.
//! Built at compile time; the hot path is a single indexed load.

/// Number of entries in each duty LUT
pub const LUT_SIZE: usize = 256;

/// 16-bit linear scale: `(s << 8) | s`, so 0 → 0 and 255 → 65535
pub static DUTY_LUT_U16: [u16; LUT_SIZE] = {
    let mut table = [0u16; LUT_SIZE];
    let mut i = 0;
    while i < LUT_SIZE {
        table[i] = ((i as u16) << 8) | i as u16;
        i += 1;
    }
    table
};

/// Legacy 10-bit scale: `s * 1023 / 255`, so 0 → 0 and 255 → 1023
pub static DUTY_LUT_10BIT: [u16; LUT_SIZE] = {
    let mut table = [0u16; LUT_SIZE];
    let mut i = 0;
    while i < LUT_SIZE {
        table[i] = ((i as u32 * 1023) / 255) as u16;
        i += 1;
    }
    table
};

/// Duty range supported by a PWM adapter.
///
/// Resolved once at startup from the adapter; selects the LUT.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DutyScale {
    /// 0..=65535
    U16,
    /// 0..=1023
    Legacy10Bit,
}

impl DutyScale {
    /// Largest duty value (full on).
    #[inline]
    pub const fn max_duty(self) -> u16 {
        match self {
            DutyScale::U16 => u16::MAX,
            DutyScale::Legacy10Bit => 1023,
        }
    }

    /// Pick the scale matching a driver's reported maximum duty.
    pub fn from_max_duty(max_duty: u32) -> Option<Self> {
        match max_duty {
            65535 => Some(DutyScale::U16),
            1023 => Some(DutyScale::Legacy10Bit),
            _ => None,
        }
    }

    /// Map an 8-bit PCM sample to a duty value.
    #[inline]
    pub fn duty_from_u8(self, sample: u8) -> u16 {
        match self {
            DutyScale::U16 => DUTY_LUT_U16[sample as usize],
            DutyScale::Legacy10Bit => DUTY_LUT_10BIT[sample as usize],
        }
    }

    /// Convert a duty expressed on the 16-bit scale to this scale.
    #[inline]
    pub fn rescale_u16(self, duty: u16) -> u16 {
        match self {
            DutyScale::U16 => duty,
            DutyScale::Legacy10Bit => ((duty as u32 * 1023) / 65535) as u16,
        }
    }
}
