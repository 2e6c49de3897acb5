//! Player that records requested sounds instead of rendering them

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;

use super::clock::MockClock;
use crate::audio::sound::{Player, Sound};
use crate::error::HonkError;

#[derive(Debug, Default)]
struct PlayerInner {
    played: Vec<(u64, Sound)>,
    fail_with: Option<HonkError>,
}

/// Records every sound; optionally burns simulated time per sound.
#[derive(Debug, Clone, Default)]
pub struct RecordingPlayer {
    inner: Rc<RefCell<PlayerInner>>,
    clock: Option<(MockClock, u32)>,
}

impl RecordingPlayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Each sound advances `clock` by `duration_ms`, like a blocking render.
    pub fn with_clock(clock: MockClock, duration_ms: u32) -> Self {
        Self {
            inner: Rc::default(),
            clock: Some((clock, duration_ms)),
        }
    }

    /// Fail every subsequent sound with `err` (`None` to recover).
    pub fn set_failure(&self, err: Option<HonkError>) {
        self.inner.borrow_mut().fail_with = err;
    }

    /// Sounds played so far, in order.
    pub fn played(&self) -> Vec<Sound> {
        self.inner.borrow().played.iter().map(|(_, s)| *s).collect()
    }

    /// Sounds with their start time in µs (0 without a clock).
    pub fn timeline(&self) -> Vec<(u64, Sound)> {
        self.inner.borrow().played.clone()
    }
}

impl Player for RecordingPlayer {
    fn play_sound(&mut self, sound: &Sound) -> Result<(), HonkError> {
        let mut inner = self.inner.borrow_mut();
        if let Some(err) = inner.fail_with {
            return Err(err);
        }

        let start = self.clock.as_ref().map(|(c, _)| c.peek_us()).unwrap_or(0);
        inner.played.push((start, *sound));

        if let Some((clock, duration_ms)) = &self.clock {
            clock.advance_ms(*duration_ms as u64);
        }
        Ok(())
    }
}
