//! Horn controller finite state machine.
//!
//! Consumes the horn button level once per poll and asks the [`Player`] for
//! start / middle / end sounds. No hardware dependencies.
//!
//! # Sustain cadence
//!
//! The middle sound plays once per poll while the button is held, so the
//! loop's poll rate (plus the length of the middle asset) sets the sustain
//! cadence. There is no separate timer.

use crate::audio::sound::{Player, Sound};
use crate::error::HonkError;

/// Horn state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HornState {
    Idle,
    Honking,
}

/// What a poll decided to play.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HornAction {
    None,
    Start,
    Continue,
    End,
}

/// Horn start/sustain/stop sequencer.
pub struct HornController {
    state: HornState,
    start: Sound,
    middle: Sound,
    end: Sound,
    honks: u32,
}

impl HornController {
    pub fn new(start: Sound, middle: Sound, end: Sound) -> Self {
        Self {
            state: HornState::Idle,
            start,
            middle,
            end,
            honks: 0,
        }
    }

    #[inline]
    pub fn state(&self) -> HornState {
        self.state
    }

    #[inline]
    pub fn is_honking(&self) -> bool {
        self.state == HornState::Honking
    }

    /// Completed-or-started honks since boot.
    pub fn honks(&self) -> u32 {
        self.honks
    }

    /// Advance the state machine without playing anything.
    ///
    /// The transition is committed here, before any sound, so a failed sound
    /// never replays a start or an end.
    pub fn step(&mut self, pressed: bool) -> HornAction {
        match (self.state, pressed) {
            (HornState::Idle, true) => {
                self.state = HornState::Honking;
                self.honks = self.honks.wrapping_add(1);
                HornAction::Start
            }
            (HornState::Honking, true) => HornAction::Continue,
            (HornState::Honking, false) => {
                self.state = HornState::Idle;
                HornAction::End
            }
            (HornState::Idle, false) => HornAction::None,
        }
    }

    /// Poll with the current button level, playing the matching sound.
    ///
    /// Blocks for the sound's duration. Returns whether honking.
    pub fn poll<P: Player>(&mut self, pressed: bool, player: &mut P) -> Result<bool, HonkError> {
        let sound = match self.step(pressed) {
            HornAction::Start => Some(self.start),
            HornAction::Continue => Some(self.middle),
            HornAction::End => Some(self.end),
            HornAction::None => None,
        };

        if let Some(sound) = sound {
            player.play_sound(&sound)?;
        }

        Ok(self.is_honking())
    }
}
