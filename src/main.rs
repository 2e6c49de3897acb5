//! RustPwmHonker - Main entry point
//!
//! On the device: mount SPIFFS, build the adapters from [`CONFIG`], preload
//! the horn, run the control loop forever.
//!
//! On a host: run a short scripted session on simulated peripherals and print
//! the log, which is handy for eyeballing loop behavior without hardware.

use rust_pwm_honker::log_globals::{FAULT_STATE, LOG_STREAM};
use rust_pwm_honker::CONFIG;

fn main() {
    #[cfg(target_os = "espidf")]
    esp_idf_svc::sys::link_patches();

    println!("{}", env!("VERSION_STRING"));

    if let Err(e) = CONFIG.validate() {
        println!("invalid configuration: {}", e);
        return;
    }

    #[cfg(target_os = "espidf")]
    if let Err(e) = device::run() {
        println!("startup failed: {}", e);
    }

    #[cfg(not(target_os = "espidf"))]
    simulation::run();

    let faults = FAULT_STATE.snapshot();
    println!("faults: {:?}, pending log lines: {}", faults, LOG_STREAM.pending());
}

#[cfg(target_os = "espidf")]
mod device {
    use esp_idf_svc::hal::peripherals::Peripherals;
    use esp_idf_svc::sys::EspError;

    use rust_pwm_honker::audio::{AudioRenderer, WaveformCache};
    use rust_pwm_honker::blinker::{BlinkTimer, TurnSignal};
    use rust_pwm_honker::config::SignalConfig;
    use rust_pwm_honker::hal::esp::{mount_spiffs, EspClock, EspInput, EspOutput, LedcPwm, LightSleeper, SpiffsStore};
    use rust_pwm_honker::hal::Clock;
    use rust_pwm_honker::horn::HornController;
    use rust_pwm_honker::input::DebouncedButton;
    use rust_pwm_honker::log_globals::{FAULT_STATE, LOG_STREAM};
    use rust_pwm_honker::uart_logger::{esp::UartSink, UartLoggerConfig};
    use rust_pwm_honker::{rt_error, rt_info, ControlLoop, CONFIG};

    type Signal = TurnSignal<EspInput<'static>, EspOutput<'static>>;

    fn signal(config: &SignalConfig, now_ms: u32) -> Result<Signal, EspError> {
        // SAFETY: pin numbers in CONFIG are distinct and claimed once
        let (input, lamp) = unsafe { (EspInput::from_config(&config.button)?, EspOutput::from_pin(config.lamp_pin)?) };
        let button = DebouncedButton::new(input, config.button.debounce_ms, config.button.active, now_ms);
        // Initial lamp-low write failed
        let timer = BlinkTimer::new(lamp, config.period_ms, config.tick, config.tock)
            .map_err(|_| EspError::from_infallible::<{ esp_idf_svc::sys::ESP_ERR_INVALID_STATE }>())?;
        Ok(TurnSignal::new(button, timer))
    }

    pub fn run() -> Result<(), EspError> {
        let peripherals = Peripherals::take()?;
        let mut uart = UartSink::new(peripherals.uart1, peripherals.pins.gpio43, &UartLoggerConfig::default())?;

        mount_spiffs(CONFIG.asset_base_path)?;

        let clock = EspClock;
        let pwm = LedcPwm::new(
            peripherals.ledc.timer0,
            peripherals.ledc.channel0,
            peripherals.pins.gpio0,
            CONFIG.renderer.carrier_hz,
        )?;
        let mut renderer = AudioRenderer::new(pwm, clock, WaveformCache::new(SpiffsStore), &CONFIG.renderer);

        let now = clock.now_ms();
        for id in CONFIG.preload_ids() {
            match renderer.preload(id) {
                Ok(waveform) => rt_info!(LOG_STREAM, now, "preloaded {} ({} frames)", id, waveform.frames()),
                Err(e) => {
                    FAULT_STATE.record(&e);
                    rt_error!(LOG_STREAM, now, "preload {}: {}", id, e);
                }
            }
        }

        // SAFETY: horn pin is not shared with any other driver
        let horn_input = unsafe { EspInput::from_config(&CONFIG.horn.button)? };
        let horn_button = DebouncedButton::new(horn_input, CONFIG.horn.button.debounce_ms, CONFIG.horn.button.active, now);
        let horn = HornController::new(CONFIG.horn.start, CONFIG.horn.middle, CONFIG.horn.end);

        let mut control = ControlLoop::new(
            clock,
            LightSleeper::default(),
            renderer,
            horn_button,
            horn,
            &FAULT_STATE,
            &LOG_STREAM,
            CONFIG.idle_sleep_ms,
        )
        .with_signal(signal(&CONFIG.left, now)?)
        .with_signal(signal(&CONFIG.right, now)?)
        .with_log_sink(&mut uart);

        rt_info!(LOG_STREAM, now, "{} ready", env!("VERSION_STRING"));
        control.run()
    }
}

#[cfg(not(target_os = "espidf"))]
mod simulation {
    use rust_pwm_honker::audio::{AudioRenderer, DutyScale, WaveformCache};
    use rust_pwm_honker::blinker::{BlinkTimer, TurnSignal};
    use rust_pwm_honker::horn::HornController;
    use rust_pwm_honker::input::DebouncedButton;
    use rust_pwm_honker::log_globals::{FAULT_STATE, LOG_STREAM};
    use rust_pwm_honker::mock::{MemStore, MockClock, MockInputPin, MockOutputPin, MockPwm, MockSleeper};
    use rust_pwm_honker::uart_logger::drain_to;
    use rust_pwm_honker::{rt_info, ControlLoop, CONFIG};

    /// Simulated session length
    const SESSION_MS: u64 = 3_000;

    /// Sawtooth standing in for a horn asset.
    fn fake_asset(len: usize) -> Vec<u8> {
        (0..len).map(|i| ((i * 37) % 256) as u8).collect()
    }

    pub fn run() {
        let clock = MockClock::with_step(1);
        let store = MemStore::new();
        for id in CONFIG.preload_ids() {
            store.insert(id, &fake_asset(160));
        }

        let pwm = MockPwm::new(clock.clone(), DutyScale::Legacy10Bit);
        let mut renderer = AudioRenderer::new(pwm.clone(), clock.clone(), WaveformCache::new(store.clone()), &CONFIG.renderer);
        for id in CONFIG.preload_ids() {
            if let Err(e) = renderer.preload(id) {
                println!("preload {}: {}", id, e);
            }
        }

        let horn_pin = MockInputPin::new(true);
        let left_pin = MockInputPin::new(true);
        let left_lamp = MockOutputPin::new();

        let horn_button = DebouncedButton::new(horn_pin.clone(), CONFIG.horn.button.debounce_ms, CONFIG.horn.button.active, 0);
        let horn = HornController::new(CONFIG.horn.start, CONFIG.horn.middle, CONFIG.horn.end);

        let left = TurnSignal::new(
            DebouncedButton::new(left_pin.clone(), CONFIG.left.button.debounce_ms, CONFIG.left.button.active, 0),
            // Mock output writes cannot fail unless told to
            match BlinkTimer::new(left_lamp.clone(), CONFIG.left.period_ms, CONFIG.left.tick, CONFIG.left.tock) {
                Ok(timer) => timer,
                Err(e) => {
                    println!("lamp: {}", e);
                    return;
                }
            },
        );

        let mut out = String::new();
        let mut control = ControlLoop::new(
            clock.clone(),
            MockSleeper::new(clock.clone()),
            renderer,
            horn_button,
            horn,
            &FAULT_STATE,
            &LOG_STREAM,
            CONFIG.idle_sleep_ms,
        )
        .with_signal(left)
        .with_log_sink(&mut out);

        rt_info!(LOG_STREAM, 0, "simulation start");

        // Script: honk 200..600 ms, left signal on at 1000 ms, off at 2500 ms
        while clock.peek_us() < SESSION_MS * 1000 {
            let ms = clock.peek_us() / 1000;
            horn_pin.set_level(!(200..600).contains(&ms));
            left_pin.set_level(!((1000..1100).contains(&ms) || (2500..2600).contains(&ms)));
            control.run_iteration();
        }

        let iterations = control.iterations();
        let frames = control.player().frames_played();
        drop(control);
        drain_to(&LOG_STREAM, &mut out);

        print!("{}", out);
        println!(
            "iterations: {}, frames: {}, duty writes: {}, lamp flips: {}, asset reads: {}",
            iterations,
            frames,
            pwm.writes().len(),
            left_lamp.history().len(),
            store.total_opens(),
        );
    }
}
