//! Horn controller tests

use rust_pwm_honker::audio::{AudioRenderer, DutyScale, Sound, WaveformCache};
use rust_pwm_honker::config::CONFIG;
use rust_pwm_honker::error::{AssetError, HonkError};
use rust_pwm_honker::horn::{HornController, HornState};
use rust_pwm_honker::mock::{MemStore, MockClock, MockPwm, RecordingPlayer};

const START: Sound = Sound::Cached { id: "start", sample_rate: 8000 };
const MIDDLE: Sound = Sound::Cached { id: "middle", sample_rate: 8000 };
const END: Sound = Sound::Cached { id: "end", sample_rate: 8000 };

fn horn() -> HornController {
    HornController::new(START, MIDDLE, END)
}

#[test]
fn test_three_poll_scenario() {
    let mut horn = horn();
    let mut player = RecordingPlayer::new();

    assert_eq!(horn.poll(true, &mut player), Ok(true));
    assert_eq!(horn.poll(true, &mut player), Ok(true));
    assert_eq!(horn.poll(false, &mut player), Ok(false));

    assert_eq!(player.played(), vec![START, MIDDLE, END]);
    assert_eq!(horn.state(), HornState::Idle);
}

#[test]
fn test_held_across_three_polls() {
    let mut horn = horn();
    let mut player = RecordingPlayer::new();

    for _ in 0..3 {
        horn.poll(true, &mut player).unwrap();
    }
    horn.poll(false, &mut player).unwrap();

    assert_eq!(player.played(), vec![START, MIDDLE, MIDDLE, END]);
}

#[test]
fn test_idle_release_plays_nothing() {
    let mut horn = horn();
    let mut player = RecordingPlayer::new();

    for _ in 0..10 {
        assert_eq!(horn.poll(false, &mut player), Ok(false));
    }
    assert!(player.played().is_empty());
}

#[test]
fn test_middle_once_per_poll_while_held() {
    let mut horn = horn();
    let mut player = RecordingPlayer::new();

    for _ in 0..6 {
        horn.poll(true, &mut player).unwrap();
    }
    horn.poll(false, &mut player).unwrap();

    let played = player.played();
    assert_eq!(played.first(), Some(&START));
    assert_eq!(played.iter().filter(|s| **s == MIDDLE).count(), 5);
    assert_eq!(played.last(), Some(&END));
    assert_eq!(horn.honks(), 1);
}

#[test]
fn test_failed_start_is_not_replayed() {
    let mut horn = horn();
    let mut player = RecordingPlayer::new();

    player.set_failure(Some(HonkError::AssetLoad(AssetError::NotFound)));
    assert!(horn.poll(true, &mut player).is_err());
    assert!(horn.is_honking());

    player.set_failure(None);
    horn.poll(true, &mut player).unwrap();
    horn.poll(false, &mut player).unwrap();
    assert_eq!(player.played(), vec![MIDDLE, END]);
}

#[test]
fn test_failed_end_still_goes_idle() {
    let mut horn = horn();
    let mut player = RecordingPlayer::new();

    horn.poll(true, &mut player).unwrap();
    player.set_failure(Some(HonkError::AssetLoad(AssetError::ReadFailed)));
    assert!(horn.poll(false, &mut player).is_err());
    assert_eq!(horn.state(), HornState::Idle);

    player.set_failure(None);
    horn.poll(false, &mut player).unwrap();
    assert_eq!(player.played(), vec![START]);
}

#[test]
fn test_horn_through_renderer_is_silent_between_sounds() {
    let clock = MockClock::with_step(1);
    let pwm = MockPwm::new(clock.clone(), DutyScale::Legacy10Bit);
    let store = MemStore::new();
    let ids: Vec<&str> = CONFIG.preload_ids().collect();
    store.insert(ids[0], &[200u8; 40]);
    store.insert(ids[1], &[180u8; 20]);
    store.insert(ids[2], &[160u8; 40]);

    let mut renderer = AudioRenderer::new(pwm.clone(), clock, WaveformCache::new(store.clone()), &CONFIG.renderer);
    let mut horn = HornController::new(CONFIG.horn.start, CONFIG.horn.middle, CONFIG.horn.end);

    horn.poll(true, &mut renderer).unwrap();
    assert_eq!(pwm.duty(), 0);
    horn.poll(true, &mut renderer).unwrap();
    assert_eq!(pwm.duty(), 0);
    horn.poll(false, &mut renderer).unwrap();
    assert_eq!(pwm.duty(), 0);

    assert_eq!(renderer.frames_played(), 100);
    assert_eq!(store.total_opens(), 3);
}
