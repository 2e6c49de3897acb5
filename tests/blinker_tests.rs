//! Turn-signal blink/tick tests

use rust_pwm_honker::audio::Sound;
use rust_pwm_honker::blinker::{BlinkTimer, TurnSignal};
use rust_pwm_honker::error::{GpioError, HonkError, PeripheralFault};
use rust_pwm_honker::hal::ActiveLevel;
use rust_pwm_honker::input::DebouncedButton;
use rust_pwm_honker::mock::{MockInputPin, MockOutputPin, RecordingPlayer};

const PERIOD_MS: u32 = 500;
const TICK: Sound = Sound::Tone { freq_hz: 1800, duration_ms: 8 };
const TOCK: Sound = Sound::Tone { freq_hz: 1500, duration_ms: 8 };

struct Rig {
    pin: MockInputPin,
    lamp: MockOutputPin,
    player: RecordingPlayer,
    signal: TurnSignal<MockInputPin, MockOutputPin>,
}

fn rig() -> Rig {
    let pin = MockInputPin::new(true);
    let lamp = MockOutputPin::new();
    let button = DebouncedButton::new(pin.clone(), 50, ActiveLevel::Low, 0);
    let timer = BlinkTimer::new(lamp.clone(), PERIOD_MS, TICK, TOCK).unwrap();
    Rig {
        pin,
        lamp,
        player: RecordingPlayer::new(),
        signal: TurnSignal::new(button, timer),
    }
}

impl Rig {
    /// Poll every `step` ms over `from..to`; returns times a trigger happened.
    fn poll(&mut self, from: u32, to: u32, step: u32) -> Vec<u32> {
        let mut fired = Vec::new();
        let mut t = from;
        while t < to {
            let before = self.signal.timer().triggers();
            self.signal.poll(t, &mut self.player).unwrap();
            if self.signal.timer().triggers() != before {
                fired.push(t);
            }
            t += step;
        }
        fired
    }

    /// Hold the button for 100 ms starting at `at`, then release.
    fn click(&mut self, at: u32, step: u32) -> Vec<u32> {
        self.pin.set_level(false);
        let mut fired = self.poll(at, at + 100, step);
        self.pin.set_level(true);
        fired.extend(self.poll(at + 100, at + 200, step));
        fired
    }
}

#[test]
fn test_lamp_low_until_pressed() {
    let mut rig = rig();
    assert!(rig.poll(0, 2_000, 10).is_empty());
    assert_eq!(rig.lamp.history(), vec![false]);
    assert!(rig.player.played().is_empty());
}

#[test]
fn test_press_activates_immediately() {
    let mut rig = rig();
    let fired = rig.click(0, 1);

    // Debounce commits at 50 ms, trigger on the same poll
    assert_eq!(fired, vec![50]);
    assert!(rig.signal.is_active());
    assert!(rig.lamp.level());
    assert_eq!(rig.player.played(), vec![TICK]);
}

#[test]
fn test_release_does_not_toggle() {
    let mut rig = rig();
    rig.click(0, 1);
    rig.poll(200, 400, 1);
    assert!(rig.signal.is_active());
}

#[test]
fn test_triggers_never_early() {
    let mut rig = rig();
    let step = 7;
    let mut fired = rig.click(0, step);
    fired.extend(rig.poll(200, 5_000, step));

    assert!(fired.len() >= 9);
    for pair in fired.windows(2) {
        let gap = pair[1] - pair[0];
        assert!(gap >= PERIOD_MS, "early trigger: {:?}", pair);
        assert!(gap < PERIOD_MS + step, "late by more than one poll: {:?}", pair);
    }
}

#[test]
fn test_lamp_alternates_with_tick_tock() {
    let mut rig = rig();
    rig.click(0, 1);
    rig.poll(200, 1_100, 1);

    // Activation at 50, then 550 and 1050
    assert_eq!(rig.player.played(), vec![TICK, TOCK, TICK]);
    assert_eq!(rig.lamp.history(), vec![false, true, false, true]);
}

#[test]
fn test_second_press_deactivates_silently() {
    let mut rig = rig();
    rig.click(0, 1);
    rig.poll(200, 1_000, 1);
    let sounds = rig.player.played().len();

    rig.click(1_000, 1);
    assert!(!rig.signal.is_active());
    assert!(!rig.lamp.level());

    let writes = rig.lamp.history().len();
    assert!(rig.poll(1_200, 5_000, 10).is_empty());
    assert_eq!(rig.player.played().len(), sounds);
    assert_eq!(rig.lamp.history().len(), writes, "no writes while inactive");
}

#[test]
fn test_failed_sound_does_not_retrigger() {
    let lamp = MockOutputPin::new();
    let mut player = RecordingPlayer::new();
    player.set_failure(Some(HonkError::InvalidSampleRate(0)));
    let mut timer = BlinkTimer::new(lamp.clone(), PERIOD_MS, TICK, TOCK).unwrap();

    assert!(timer.toggle(0, &mut player).is_err());
    assert!(timer.is_active());
    assert_eq!(timer.triggers(), 1);

    // Timestamp was taken before the sound, so no storm
    assert_eq!(timer.handle(10, &mut player), Ok(true));
    assert_eq!(timer.handle(499, &mut player), Ok(true));
    assert_eq!(timer.triggers(), 1);
    assert!(timer.handle(500, &mut player).is_err());
    assert_eq!(timer.triggers(), 2);
}

#[test]
fn test_lamp_write_failure() {
    let lamp = MockOutputPin::new();
    let mut player = RecordingPlayer::new();
    let mut timer = BlinkTimer::new(lamp.clone(), PERIOD_MS, TICK, TOCK).unwrap();

    lamp.set_fail(true);
    assert_eq!(
        timer.toggle(0, &mut player),
        Err(HonkError::Peripheral(PeripheralFault::Gpio(GpioError::WriteFailed)))
    );
    assert!(player.played().is_empty());
}

#[test]
fn test_construction_fails_on_dead_lamp() {
    let lamp = MockOutputPin::new();
    lamp.set_fail(true);
    assert!(BlinkTimer::new(lamp, PERIOD_MS, TICK, TOCK).is_err());
}

#[test]
fn test_period_across_clock_wrap() {
    let lamp = MockOutputPin::new();
    let mut player = RecordingPlayer::new();
    let mut timer = BlinkTimer::new(lamp, PERIOD_MS, TICK, TOCK).unwrap();

    let start = u32::MAX - 100;
    timer.activate(start, &mut player).unwrap();
    timer.handle(start.wrapping_add(PERIOD_MS - 1), &mut player).unwrap();
    assert_eq!(timer.triggers(), 1);
    timer.handle(start.wrapping_add(PERIOD_MS), &mut player).unwrap();
    assert_eq!(timer.triggers(), 2);
}
