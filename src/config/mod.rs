//! Module: config
//!
//! Purpose: Build-time configuration for RustPwmHonker.
//!
//! Architecture:
//! - [`CONFIG`]: single source of truth for pins, timings and asset paths
//! - Sub-structs hand each component only what it needs
//! - `validate()` runs once at startup; nothing is persisted
//!
//! Safety: Safe. Plain `Copy` data, usable in `const` context.

use core::fmt;

use crate::audio::sound::Sound;
use crate::hal::gpio::{ActiveLevel, InputConfig, Pull};

/// Renderer settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RendererConfig {
    /// PWM pin driving the buzzer
    pub pin: i32,
    /// PWM carrier for PCM playback (ultrasonic)
    pub carrier_hz: u32,
    /// Streaming read buffer size
    pub chunk_bytes: usize,
    /// Tone duty on the 16-bit scale (rescaled for 10-bit adapters)
    pub beep_duty: u16,
}

/// Horn sounds, all raw 8-bit PCM.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HornConfig {
    pub button: InputConfig,
    pub start: Sound,
    pub middle: Sound,
    pub end: Sound,
}

/// One turn signal: toggle button, lamp output, tick/tock sounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignalConfig {
    pub button: InputConfig,
    /// Lamp output pin
    pub lamp_pin: i32,
    /// Trigger period (lamp flips and ticks once per period)
    pub period_ms: u32,
    pub tick: Sound,
    pub tock: Sound,
}

/// Complete firmware configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HonkerConfig {
    pub renderer: RendererConfig,
    pub horn: HornConfig,
    pub left: SignalConfig,
    pub right: SignalConfig,
    /// Low-power wait when no state machine is active
    pub idle_sleep_ms: u32,
    /// SPIFFS mount point holding the assets
    pub asset_base_path: &'static str,
}

/// Sample rate of the bundled horn assets
pub const ASSET_SAMPLE_RATE: u32 = 8000;

const TICK: Sound = Sound::Tone { freq_hz: 1800, duration_ms: 8 };
const TOCK: Sound = Sound::Tone { freq_hz: 1500, duration_ms: 8 };

const fn button(pin: i32, debounce_ms: u32) -> InputConfig {
    InputConfig {
        pin,
        pull: Pull::Up,
        active: ActiveLevel::Low,
        debounce_ms,
    }
}

impl HonkerConfig {
    /// Factory defaults for the reference board.
    pub const fn new() -> Self {
        Self {
            renderer: RendererConfig {
                pin: 0,
                carrier_hz: 64_000,
                chunk_bytes: 4096,
                beep_duty: 10_000,
            },
            horn: HornConfig {
                button: button(1, 20),
                start: Sound::Cached { id: "/spiffs/honk-start.raw", sample_rate: ASSET_SAMPLE_RATE },
                middle: Sound::Cached { id: "/spiffs/honk-middle-short.raw", sample_rate: ASSET_SAMPLE_RATE },
                end: Sound::Cached { id: "/spiffs/honk-end.raw", sample_rate: ASSET_SAMPLE_RATE },
            },
            left: SignalConfig {
                button: button(2, 50),
                lamp_pin: 16,
                period_ms: 500,
                tick: TICK,
                tock: TOCK,
            },
            right: SignalConfig {
                button: button(3, 50),
                lamp_pin: 17,
                period_ms: 500,
                tick: TICK,
                tock: TOCK,
            },
            idle_sleep_ms: 50,
            asset_base_path: "/spiffs",
        }
    }

    /// Asset identifiers worth preloading at boot.
    pub fn preload_ids(&self) -> impl Iterator<Item = &'static str> {
        [self.horn.start, self.horn.middle, self.horn.end]
            .into_iter()
            .filter_map(|sound| match sound {
                Sound::Cached { id, .. } => Some(id),
                _ => None,
            })
    }

    /// Check everything the renderer and timers divide by or pace on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.renderer.carrier_hz == 0 {
            return Err(ConfigError::ZeroCarrier);
        }
        if self.renderer.chunk_bytes == 0 {
            return Err(ConfigError::ZeroChunk);
        }
        if self.left.period_ms == 0 || self.right.period_ms == 0 {
            return Err(ConfigError::ZeroBlinkPeriod);
        }

        let sounds = [
            self.horn.start,
            self.horn.middle,
            self.horn.end,
            self.left.tick,
            self.left.tock,
            self.right.tick,
            self.right.tock,
        ];
        for sound in sounds {
            if let Sound::Cached { sample_rate, .. } | Sound::Streamed { sample_rate, .. } = sound {
                if sample_rate == 0 || sample_rate > crate::audio::MAX_SAMPLE_RATE {
                    return Err(ConfigError::InvalidSampleRate(sample_rate));
                }
            }
        }

        Ok(())
    }
}

impl Default for HonkerConfig {
    fn default() -> Self {
        HonkerConfig::new()
    }
}

/// Firmware configuration.
pub const CONFIG: HonkerConfig = HonkerConfig::new();

/// Configuration rejected at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    ZeroCarrier,
    ZeroChunk,
    ZeroBlinkPeriod,
    InvalidSampleRate(u32),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ZeroCarrier => write!(f, "carrier frequency must be non-zero"),
            ConfigError::ZeroChunk => write!(f, "stream chunk size must be non-zero"),
            ConfigError::ZeroBlinkPeriod => write!(f, "blink period must be non-zero"),
            ConfigError::InvalidSampleRate(rate) => write!(f, "invalid sample rate: {} Hz", rate),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(CONFIG.validate(), Ok(()));
    }

    #[test]
    fn test_preload_ids_are_horn_assets() {
        let ids: Vec<_> = CONFIG.preload_ids().collect();
        assert_eq!(ids.len(), 3);
        assert!(ids.iter().all(|id| id.starts_with(CONFIG.asset_base_path)));
    }

    #[test]
    fn test_validate_rejects_zero_values() {
        let mut cfg = HonkerConfig::default();
        cfg.renderer.carrier_hz = 0;
        assert_eq!(cfg.validate(), Err(ConfigError::ZeroCarrier));

        let mut cfg = HonkerConfig::default();
        cfg.left.period_ms = 0;
        assert_eq!(cfg.validate(), Err(ConfigError::ZeroBlinkPeriod));

        let mut cfg = HonkerConfig::default();
        cfg.horn.middle = Sound::Streamed { id: "x", sample_rate: 0 };
        assert_eq!(cfg.validate(), Err(ConfigError::InvalidSampleRate(0)));
    }
}
