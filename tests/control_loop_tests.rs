//! Cooperative control loop tests

use rust_pwm_honker::audio::Sound;
use rust_pwm_honker::blinker::{BlinkTimer, TurnSignal};
use rust_pwm_honker::control::ControlLoop;
use rust_pwm_honker::error::{AssetError, HonkError};
use rust_pwm_honker::fault::{FaultCode, FaultState};
use rust_pwm_honker::hal::{ActiveLevel, Clock};
use rust_pwm_honker::horn::HornController;
use rust_pwm_honker::input::DebouncedButton;
use rust_pwm_honker::logging::{LogLevel, LogStream};
use rust_pwm_honker::mock::{MockClock, MockInputPin, MockOutputPin, MockSleeper, RecordingPlayer};

const IDLE_MS: u32 = 50;
const SOUND_MS: u32 = 100;

const START: Sound = Sound::Cached { id: "start", sample_rate: 8000 };
const MIDDLE: Sound = Sound::Cached { id: "middle", sample_rate: 8000 };
const END: Sound = Sound::Cached { id: "end", sample_rate: 8000 };
const TICK: Sound = Sound::Tone { freq_hz: 1800, duration_ms: 8 };
const TOCK: Sound = Sound::Tone { freq_hz: 1500, duration_ms: 8 };

type Loop<'a> = ControlLoop<'a, MockClock, MockSleeper, MockInputPin, MockOutputPin, RecordingPlayer>;

struct Probes {
    clock: MockClock,
    sleeper: MockSleeper,
    player: RecordingPlayer,
    horn: MockInputPin,
    signal: MockInputPin,
    lamp: MockOutputPin,
}

fn build<'a>(faults: &'a FaultState, log: &'a LogStream) -> (Probes, Loop<'a>) {
    let clock = MockClock::new();
    let sleeper = MockSleeper::new(clock.clone());
    let player = RecordingPlayer::with_clock(clock.clone(), SOUND_MS);

    let horn_pin = MockInputPin::new(true);
    let signal_pin = MockInputPin::new(true);
    let lamp = MockOutputPin::new();

    let horn_button = DebouncedButton::new(horn_pin.clone(), 20, ActiveLevel::Low, 0);
    let signal = TurnSignal::new(
        DebouncedButton::new(signal_pin.clone(), 50, ActiveLevel::Low, 0),
        BlinkTimer::new(lamp.clone(), 500, TICK, TOCK).unwrap(),
    );

    let control = ControlLoop::new(
        clock.clone(),
        sleeper.clone(),
        player.clone(),
        horn_button,
        HornController::new(START, MIDDLE, END),
        faults,
        log,
        IDLE_MS,
    )
    .with_signal(signal);

    let probes = Probes {
        clock,
        sleeper,
        player,
        horn: horn_pin,
        signal: signal_pin,
        lamp,
    };
    (probes, control)
}

fn messages(log: &LogStream) -> Vec<(LogLevel, String)> {
    let mut out = Vec::new();
    while let Some(entry) = log.drain() {
        out.push((entry.level, entry.message().to_string()));
    }
    out
}

#[test]
fn test_idle_loop_sleeps() {
    let faults = FaultState::new();
    let log = LogStream::new();
    let (probes, mut control) = build(&faults, &log);

    for _ in 0..4 {
        assert!(!control.run_iteration());
    }

    assert_eq!(probes.sleeper.sleeps(), vec![IDLE_MS; 4]);
    assert_eq!(probes.clock.now_ms(), 4 * IDLE_MS);
    assert!(probes.player.played().is_empty());
    assert_eq!(control.iterations(), 4);
}

#[test]
fn test_active_loop_does_not_sleep() {
    let faults = FaultState::new();
    let log = LogStream::new();
    let (probes, mut control) = build(&faults, &log);

    probes.horn.set_level(false);
    control.run_iteration(); // raw edge seen, sleeps
    assert!(control.run_iteration()); // committed, honking
    assert!(control.run_iteration());

    assert_eq!(probes.sleeper.sleeps().len(), 1);
    assert_eq!(probes.player.played(), vec![START, MIDDLE]);
}

#[test]
fn test_horn_polled_before_signals_with_fresh_time() {
    let faults = FaultState::new();
    let log = LogStream::new();
    let (probes, mut control) = build(&faults, &log);

    probes.horn.set_level(false);
    probes.signal.set_level(false);
    control.run_iteration(); // t=0: edges seen
    control.run_iteration(); // t=50: both commit

    let timeline = probes.player.timeline();
    assert_eq!(timeline[0], (50_000, START));
    // The signal saw the time after the horn start finished
    assert_eq!(timeline[1], (150_000, TICK));
    assert!(probes.lamp.level());
}

#[test]
fn test_blink_delayed_by_horn_but_never_early() {
    let faults = FaultState::new();
    let log = LogStream::new();
    let (probes, mut control) = build(&faults, &log);

    probes.signal.set_level(false);
    control.run_iteration();
    control.run_iteration(); // t=50: signal on
    probes.signal.set_level(true);
    probes.horn.set_level(false);

    // Time must move while only the blinker is active
    probes.clock.set_step(1000);

    let mut tick_times = vec![50_000u64];
    while probes.clock.peek_us() < 3_000_000 {
        control.run_iteration();
    }
    for (at, sound) in probes.player.timeline() {
        if (sound == TICK || sound == TOCK) && at > 50_000 {
            tick_times.push(at);
        }
    }

    assert!(tick_times.len() >= 4);
    for pair in tick_times.windows(2) {
        let gap = pair[1] - pair[0];
        assert!(gap >= 500_000, "early trigger {:?}", pair);
        // Horn middle sounds block for up to SOUND_MS
        assert!(gap < 500_000 + 2 * SOUND_MS as u64 * 1000, "starved {:?}", pair);
    }
}

#[test]
fn test_error_boundary_records_and_continues() {
    let faults = FaultState::new();
    let log = LogStream::new();
    let (probes, mut control) = build(&faults, &log);

    probes.player.set_failure(Some(HonkError::AssetLoad(AssetError::NotFound)));
    probes.horn.set_level(false);
    control.run_iteration();
    assert!(control.run_iteration(), "horn still honking after a failed start");

    assert!(faults.is_active());
    assert_eq!(faults.code(), FaultCode::AssetLoad);
    assert_eq!(faults.count(), 1);

    // Recovery: the next poll plays the continuation, not the start again
    probes.player.set_failure(None);
    control.run_iteration();
    assert_eq!(probes.player.played(), vec![MIDDLE]);

    let logged = messages(&log);
    assert!(logged.iter().any(|(level, msg)| *level == LogLevel::Error && msg.starts_with("horn")));
}

#[test]
fn test_signal_fault_does_not_stop_horn() {
    let faults = FaultState::new();
    let log = LogStream::new();
    let (probes, mut control) = build(&faults, &log);

    probes.lamp.set_fail(true);
    probes.signal.set_level(false);
    probes.horn.set_level(false);
    control.run_iteration();
    control.run_iteration();

    assert_eq!(faults.code(), FaultCode::GpioFault);
    assert!(control.horn().is_honking());
    assert_eq!(probes.player.played(), vec![START]);
}

#[test]
fn test_logs_state_changes_and_drains_only_when_idle() {
    let faults = FaultState::new();
    let log = LogStream::new();
    let mut out = String::new();
    {
        let (probes, control) = build(&faults, &log);
        let mut control = control.with_log_sink(&mut out);

        probes.horn.set_level(false);
        control.run_iteration();
        control.run_iteration(); // horn start
        assert!(log.has_entries(), "nothing drained while active");

        probes.horn.set_level(true);
        control.run_iteration(); // release seen, middle plays
        assert!(!control.run_iteration()); // end plays, then idle drain
        assert!(!log.has_entries());
    }

    assert!(out.contains("INFO: horn start"));
    assert!(out.contains("INFO: horn stop"));
}
