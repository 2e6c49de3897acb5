//! PWM sample renderer
//!
//! Turns 8-bit unsigned PCM into a deadline-paced sequence of duty writes.
//!
//! # Pacing
//!
//! ```text
//! t0 ──┬── s1 ──┬── s2 ──┬── s3 ── ... ──┬── sN ──┬── duty 0
//!      │ write  │ write  │ write         │ write  │
//!      └ spin to t0+1p   └ spin to t0+3p └ spin to t0+Np
//! ```
//!
//! Every sample has an absolute deadline `t0 + i * period_us`. Late wakeups
//! shorten the next wait instead of pushing every later sample back, so jitter
//! never accumulates into drift. `period_us` is `1_000_000 / sample_rate`
//! (integer division); the truncation error is accepted.
//!
//! # Silence
//!
//! The PWM channel is only driven through a [`PwmSession`], which forces duty
//! to zero on every exit path, including early returns through `?`.

use alloc::vec;
use alloc::vec::Vec;

use super::cache::{Waveform, WaveformCache};
use super::duty::DutyScale;
use super::sound::{Player, Sound};
use crate::config::RendererConfig;
use crate::error::{HonkError, PwmError};
use crate::hal::clock::{spin_until, ticks_add, Clock};
use crate::hal::pwm::PwmOutput;
use crate::hal::storage::{AssetReader, AssetStore};

/// Highest sample rate whose period is still at least 1 µs.
pub const MAX_SAMPLE_RATE: u32 = 1_000_000;

/// Inter-sample period in whole microseconds.
#[inline]
pub fn sample_period_us(sample_rate: u32) -> Result<u32, HonkError> {
    if sample_rate == 0 || sample_rate > MAX_SAMPLE_RATE {
        return Err(HonkError::InvalidSampleRate(sample_rate));
    }
    Ok(1_000_000 / sample_rate)
}

/// Exclusive use of the PWM channel for one sound.
///
/// Acquiring sets the carrier and silences the output; releasing (or
/// dropping) silences it again.
pub struct PwmSession<'a, P: PwmOutput> {
    pwm: &'a mut P,
    released: bool,
}

impl<'a, P: PwmOutput> PwmSession<'a, P> {
    /// Take the channel, set `carrier_hz`, start from duty 0.
    pub fn acquire(pwm: &'a mut P, carrier_hz: u32) -> Result<Self, PwmError> {
        let session = Self {
            pwm,
            released: false,
        };
        session.pwm.set_frequency(carrier_hz)?;
        session.pwm.set_duty(0)?;
        Ok(session)
    }

    #[inline]
    pub fn set_duty(&mut self, duty: u16) -> Result<(), PwmError> {
        self.pwm.set_duty(duty)
    }

    /// Silence the output and give the channel back, reporting failure.
    pub fn release(mut self) -> Result<(), PwmError> {
        self.released = true;
        self.pwm.set_duty(0)
    }
}

impl<P: PwmOutput> Drop for PwmSession<'_, P> {
    fn drop(&mut self) {
        if !self.released {
            // Already unwinding an error; the original error is what the
            // caller sees.
            let _ = self.pwm.set_duty(0);
        }
    }
}

/// Write `samples` one per period, continuing the frame count in `frames`.
#[inline]
fn emit_paced<P: PwmOutput, C: Clock>(
    session: &mut PwmSession<'_, P>,
    clock: &C,
    scale: DutyScale,
    samples: &[u8],
    t0: u32,
    period_us: u32,
    frames: &mut u32,
) -> Result<(), PwmError> {
    for &sample in samples {
        session.set_duty(scale.duty_from_u8(sample))?;
        *frames = frames.wrapping_add(1);
        let deadline = ticks_add(t0, frames.wrapping_mul(period_us));
        spin_until(clock, deadline);
    }
    Ok(())
}

/// Blocking PCM/tone renderer on one PWM channel.
pub struct AudioRenderer<P: PwmOutput, C: Clock, S: AssetStore> {
    pwm: P,
    clock: C,
    cache: WaveformCache<S>,
    scale: DutyScale,
    carrier_hz: u32,
    /// Beep level on the 16-bit scale
    beep_duty: u16,
    chunk: Vec<u8>,
    frames_played: u64,
}

impl<P: PwmOutput, C: Clock, S: AssetStore> AudioRenderer<P, C, S> {
    /// Build a renderer; the duty scale is read from `pwm` here, once.
    pub fn new(pwm: P, clock: C, cache: WaveformCache<S>, config: &RendererConfig) -> Self {
        let scale = pwm.duty_scale();
        Self {
            pwm,
            clock,
            cache,
            scale,
            carrier_hz: config.carrier_hz,
            beep_duty: config.beep_duty,
            chunk: vec![0u8; config.chunk_bytes.max(1)],
            frames_played: 0,
        }
    }

    /// Duty scale resolved at construction.
    pub fn scale(&self) -> DutyScale {
        self.scale
    }

    /// Carrier used for PCM sounds played through [`Player`].
    pub fn carrier_hz(&self) -> u32 {
        self.carrier_hz
    }

    pub fn cache(&self) -> &WaveformCache<S> {
        &self.cache
    }

    /// Total frames emitted by completed PCM sounds.
    pub fn frames_played(&self) -> u64 {
        self.frames_played
    }

    /// Load `id` into the cache ahead of its first play.
    pub fn preload(&mut self, id: &str) -> Result<Waveform, HonkError> {
        Ok(self.cache.preload(id)?)
    }

    /// Play an in-memory waveform to completion.
    pub fn play(&mut self, waveform: &Waveform, sample_rate: u32, carrier_hz: u32) -> Result<(), HonkError> {
        let period_us = sample_period_us(sample_rate)?;
        let mut session = PwmSession::acquire(&mut self.pwm, carrier_hz)?;

        let t0 = self.clock.now_us();
        let mut frames = 0u32;
        emit_paced(
            &mut session,
            &self.clock,
            self.scale,
            waveform.samples(),
            t0,
            period_us,
            &mut frames,
        )?;

        session.release()?;
        self.frames_played += frames as u64;
        Ok(())
    }

    /// Preload (from cache or store) and play.
    pub fn play_cached(&mut self, id: &str, sample_rate: u32, carrier_hz: u32) -> Result<(), HonkError> {
        let waveform = self.cache.preload(id)?;
        self.play(&waveform, sample_rate, carrier_hz)
    }

    /// Play an asset straight from the store in bounded chunks.
    ///
    /// Same pacing as [`play`](Self::play); deadlines follow a running frame
    /// counter so chunk boundaries add no gap. A read failure mid-stream
    /// stops playback with the output silenced.
    pub fn play_stream(&mut self, id: &str, sample_rate: u32, carrier_hz: u32) -> Result<(), HonkError> {
        let period_us = sample_period_us(sample_rate)?;
        let mut reader = self.cache.store_mut().open(id)?;
        let mut session = PwmSession::acquire(&mut self.pwm, carrier_hz)?;

        let t0 = self.clock.now_us();
        let mut frames = 0u32;

        loop {
            let n = reader.read_into(&mut self.chunk)?;
            if n == 0 {
                break;
            }
            emit_paced(
                &mut session,
                &self.clock,
                self.scale,
                &self.chunk[..n],
                t0,
                period_us,
                &mut frames,
            )?;
        }

        session.release()?;
        self.frames_played += frames as u64;
        Ok(())
    }

    /// Fixed-duty square tone for `duration_ms`; `freq_hz == 0` rests.
    pub fn play_tone(&mut self, freq_hz: u32, duration_ms: u32) -> Result<(), HonkError> {
        let duration_us = duration_ms.saturating_mul(1000);

        if freq_hz == 0 {
            self.pwm.set_duty(0)?;
            let start = self.clock.now_us();
            spin_until(&self.clock, ticks_add(start, duration_us));
            return Ok(());
        }

        let mut session = PwmSession::acquire(&mut self.pwm, freq_hz)?;
        session.set_duty(self.scale.rescale_u16(self.beep_duty))?;

        let start = self.clock.now_us();
        spin_until(&self.clock, ticks_add(start, duration_us));

        session.release()?;
        Ok(())
    }
}

impl<P: PwmOutput, C: Clock, S: AssetStore> Player for AudioRenderer<P, C, S> {
    fn play_sound(&mut self, sound: &Sound) -> Result<(), HonkError> {
        let carrier_hz = self.carrier_hz;
        match *sound {
            Sound::Cached { id, sample_rate } => self.play_cached(id, sample_rate, carrier_hz),
            Sound::Streamed { id, sample_rate } => self.play_stream(id, sample_rate, carrier_hz),
            Sound::Tone { freq_hz, duration_ms } => self.play_tone(freq_hz, duration_ms),
        }
    }
}
