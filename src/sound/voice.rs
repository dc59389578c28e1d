//! Playback voices and the mixer that sums them
//!
//! A voice is a single playback of the shared tone buffer. Voices are never
//! reused: every page turn creates a new one, so rapid navigation layers
//! several voices on top of each other.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::sound::envelope::GainRamp;
use crate::sound::tone::ToneBuffer;

/// One playback of a [`ToneBuffer`] through a [`GainRamp`]
#[derive(Debug, Clone)]
pub struct Voice {
    tone: ToneBuffer,
    ramp: GainRamp,
    position: usize,
}

impl Voice {
    pub fn new(tone: ToneBuffer, ramp: GainRamp) -> Self {
        Self {
            tone,
            ramp,
            position: 0,
        }
    }

    /// Produce the next output sample, or `None` once the buffer is exhausted
    pub fn next_sample(&mut self) -> Option<f32> {
        let sample = *self.tone.samples().get(self.position)?;
        let t = self.position as f64 / self.tone.sample_rate().max(1) as f64;
        self.position += 1;
        Some(sample * self.ramp.gain_at(t))
    }

    pub fn is_finished(&self) -> bool {
        self.position >= self.tone.len()
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn tone(&self) -> &ToneBuffer {
        &self.tone
    }
}

/// Thread-safe set of active voices
///
/// Cloning yields another handle to the same voices, so one side (the event
/// loop) can add voices while the other (an audio callback or an offline
/// renderer) pulls samples.
#[derive(Debug, Clone, Default)]
pub struct Mixer {
    voices: Arc<Mutex<Vec<Voice>>>,
}

impl Mixer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a voice; it starts sounding on the next rendered frame
    pub fn add(&self, voice: Voice) {
        self.lock().push(voice);
    }

    /// Number of voices that still have samples left
    pub fn active_voices(&self) -> usize {
        self.lock().len()
    }

    /// Fill an interleaved buffer, writing the mono mix to every channel
    ///
    /// Finished voices are dropped after the buffer is filled. Silence is
    /// written when nothing is playing.
    pub fn render(&self, output: &mut [f32], channels: usize) {
        let channels = channels.max(1);
        let mut voices = self.lock();

        for frame in output.chunks_mut(channels) {
            let mixed: f32 = voices.iter_mut().filter_map(Voice::next_sample).sum();
            for sample_out in frame.iter_mut() {
                *sample_out = mixed;
            }
        }

        voices.retain(|v| !v.is_finished());
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Voice>> {
        // Voices stay valid across a panicked render.
        self.voices.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
