//! ESP-IDF adapters for the HAL traits.
//!
//! - LEDC channel → [`PwmOutput`]
//! - `PinDriver` → [`InputPin`] / [`OutputPin`]
//! - `esp_timer` → [`Clock`], light sleep → [`Sleeper`]
//! - SPIFFS files → [`AssetStore`]

use alloc::ffi::CString;

use esp_idf_svc::hal::gpio::{AnyIOPin, AnyOutputPin, Input, Level, Output, PinDriver};
use esp_idf_svc::hal::gpio::Pull as EspPull;
use esp_idf_svc::hal::ledc::{config::TimerConfig, LedcDriver, LedcTimerDriver, Resolution};
use esp_idf_svc::hal::ledc::{CHANNEL0, TIMER0};
use esp_idf_svc::hal::peripheral::Peripheral;
use esp_idf_svc::hal::units::Hertz;
use esp_idf_svc::sys::{self, EspError};

use super::clock::{Clock, Sleeper};
use super::gpio::{InputConfig, InputPin, OutputPin, Pull};
use super::pwm::{DutyScale, PwmOutput};
use super::storage::{AssetReader, AssetStore};
use crate::error::{AssetError, GpioError, PwmError};
use crate::log_globals::LOG_STREAM;
use crate::rt_warn;

// ============================================================================
// PWM
// ============================================================================

/// LEDC channel 0 on timer 0, low-speed mode.
///
/// 10-bit resolution: the highest the 80 MHz source allows at a 64 kHz carrier.
pub struct LedcPwm<'d> {
    driver: LedcDriver<'d>,
    scale: DutyScale,
}

impl<'d> LedcPwm<'d> {
    pub fn new(
        timer: impl Peripheral<P = TIMER0> + 'd,
        channel: impl Peripheral<P = CHANNEL0> + 'd,
        pin: impl Peripheral<P = impl esp_idf_svc::hal::gpio::OutputPin> + 'd,
        carrier_hz: u32,
    ) -> Result<Self, EspError> {
        let timer_config = TimerConfig::new()
            .frequency(Hertz(carrier_hz))
            .resolution(Resolution::Bits10);
        let timer = LedcTimerDriver::new(timer, &timer_config)?;
        let mut driver = LedcDriver::new(channel, timer, pin)?;
        driver.set_duty(0)?;

        let scale = DutyScale::from_max_duty(driver.get_max_duty())
            .ok_or_else(|| EspError::from_infallible::<{ sys::ESP_ERR_INVALID_ARG }>())?;

        Ok(Self { driver, scale })
    }
}

impl PwmOutput for LedcPwm<'_> {
    fn duty_scale(&self) -> DutyScale {
        self.scale
    }

    fn set_frequency(&mut self, hz: u32) -> Result<(), PwmError> {
        if hz == 0 {
            return Err(PwmError::InvalidFrequency);
        }
        // SAFETY: timer 0 was configured by LedcTimerDriver and is owned by us
        sys::esp!(unsafe {
            sys::ledc_set_freq(sys::ledc_mode_t_LEDC_LOW_SPEED_MODE, sys::ledc_timer_t_LEDC_TIMER_0, hz)
        })
        // Divider cannot reach `hz` at this resolution
        .map_err(|_| PwmError::InvalidFrequency)
    }

    fn set_duty(&mut self, duty: u16) -> Result<(), PwmError> {
        if duty > self.scale.max_duty() {
            return Err(PwmError::InvalidDuty);
        }
        self.driver.set_duty(duty as u32).map_err(|_| PwmError::Hardware)
    }
}

// ============================================================================
// GPIO
// ============================================================================

/// Button line with the configured pull.
pub struct EspInput<'d> {
    pin: PinDriver<'d, AnyIOPin, Input>,
}

impl EspInput<'_> {
    /// Claim the pin numbered in `config`.
    ///
    /// # Safety
    ///
    /// No other driver may own the same GPIO.
    pub unsafe fn from_config(config: &InputConfig) -> Result<Self, EspError> {
        let mut pin = PinDriver::input(AnyIOPin::new(config.pin))?;
        pin.set_pull(match config.pull {
            Pull::None => EspPull::Floating,
            Pull::Up => EspPull::Up,
            Pull::Down => EspPull::Down,
        })?;
        Ok(Self { pin })
    }
}

impl InputPin for EspInput<'_> {
    fn is_high(&self) -> bool {
        self.pin.is_high()
    }
}

/// Push-pull lamp output.
pub struct EspOutput<'d> {
    pin: PinDriver<'d, AnyOutputPin, Output>,
}

impl EspOutput<'_> {
    /// # Safety
    ///
    /// No other driver may own GPIO `pin`.
    pub unsafe fn from_pin(pin: i32) -> Result<Self, EspError> {
        let pin = PinDriver::output(AnyOutputPin::new(pin))?;
        Ok(Self { pin })
    }
}

impl OutputPin for EspOutput<'_> {
    fn set_level(&mut self, high: bool) -> Result<(), GpioError> {
        let level = if high { Level::High } else { Level::Low };
        self.pin.set_level(level).map_err(|_| GpioError::WriteFailed)
    }
}

// ============================================================================
// Time
// ============================================================================

/// `esp_timer` microseconds, truncated to the wrapping u32 domain.
#[derive(Clone, Copy, Default)]
pub struct EspClock;

impl Clock for EspClock {
    #[inline]
    fn now_us(&self) -> u32 {
        // SAFETY: esp_timer is started by the IDF before app_main
        unsafe { sys::esp_timer_get_time() as u32 }
    }

    #[inline]
    fn now_ms(&self) -> u32 {
        // SAFETY: as above
        unsafe { (sys::esp_timer_get_time() / 1000) as u32 }
    }
}

/// Timer-woken light sleep.
///
/// A refused sleep returns at once; the loop just polls again. The first
/// refusal is logged.
#[derive(Default)]
pub struct LightSleeper {
    warned: bool,
}

impl Sleeper for LightSleeper {
    fn sleep_ms(&mut self, ms: u32) {
        // SAFETY: plain IDF calls with no pointer arguments
        let result = sys::esp!(unsafe { sys::esp_sleep_enable_timer_wakeup(ms as u64 * 1000) })
            .and_then(|()| sys::esp!(unsafe { sys::esp_light_sleep_start() }));

        if let Err(e) = result {
            if !self.warned {
                self.warned = true;
                rt_warn!(LOG_STREAM, EspClock.now_ms(), "light sleep failed: {}", e);
            }
        }
    }
}

// ============================================================================
// Storage
// ============================================================================

/// Mount the SPIFFS data partition at `base_path`.
pub fn mount_spiffs(base_path: &str) -> Result<(), EspError> {
    let base = CString::new(base_path)
        .map_err(|_| EspError::from_infallible::<{ sys::ESP_ERR_INVALID_ARG }>())?;
    let conf = sys::esp_vfs_spiffs_conf_t {
        base_path: base.as_ptr(),
        partition_label: core::ptr::null(),
        max_files: 4,
        format_if_mount_failed: false,
    };
    // SAFETY: the VFS copies base_path during registration
    sys::esp!(unsafe { sys::esp_vfs_spiffs_register(&conf) })
}

/// Files on a mounted VFS, opened by absolute path.
#[derive(Default)]
pub struct SpiffsStore;

impl AssetStore for SpiffsStore {
    type Reader = SpiffsFile;

    fn open(&mut self, id: &str) -> Result<SpiffsFile, AssetError> {
        let path = CString::new(id).map_err(|_| AssetError::NotFound)?;
        // SAFETY: both strings are NUL-terminated and outlive the call
        let file = unsafe { sys::fopen(path.as_ptr(), c"rb".as_ptr()) };
        if file.is_null() {
            return Err(AssetError::NotFound);
        }
        Ok(SpiffsFile { file })
    }
}

/// Open `FILE*`, closed on drop.
pub struct SpiffsFile {
    file: *mut sys::FILE,
}

impl AssetReader for SpiffsFile {
    fn read_into(&mut self, buf: &mut [u8]) -> Result<usize, AssetError> {
        // SAFETY: `file` is open until drop; `buf` is valid for len bytes
        unsafe {
            let n = sys::fread(buf.as_mut_ptr().cast(), 1, buf.len() as _, self.file) as usize;
            if n < buf.len() && sys::ferror(self.file) != 0 {
                return Err(AssetError::ReadFailed);
            }
            Ok(n)
        }
    }
}

impl Drop for SpiffsFile {
    fn drop(&mut self) {
        // SAFETY: opened by fopen, closed exactly once
        unsafe {
            sys::fclose(self.file);
        }
    }
}
