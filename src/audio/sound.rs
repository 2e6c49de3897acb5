//! Sound descriptors and the playback seam used by the state machines.

use crate::error::HonkError;

/// Something the horn or a turn signal can ask to hear.
///
/// PCM sounds play at the renderer's configured carrier frequency.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sound {
    /// Preloaded through the waveform cache, replayed from RAM
    Cached { id: &'static str, sample_rate: u32 },
    /// Read from the store in chunks on every play
    Streamed { id: &'static str, sample_rate: u32 },
    /// Fixed-duty square tone; `freq_hz == 0` is a rest
    Tone { freq_hz: u32, duration_ms: u32 },
}

/// Blocking sound output.
///
/// Returns once the sound finished (or failed) with the output silent.
pub trait Player {
    fn play_sound(&mut self, sound: &Sound) -> Result<(), HonkError>;
}

impl<P: Player + ?Sized> Player for &mut P {
    fn play_sound(&mut self, sound: &Sound) -> Result<(), HonkError> {
        (**self).play_sound(sound)
    }
}
