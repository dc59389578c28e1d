//! Page-turn tone synthesis
//!
//! The page-turn sound is a short burst of white noise shaped by an
//! exponential decay, approximating a paper rustle.

use std::sync::Arc;

use rand::Rng;

use crate::config::ToneConfig;

/// Number of samples in a burst of `duration_secs` at `sample_rate`
#[inline]
pub fn tone_length(sample_rate: u32, duration_secs: f32) -> usize {
    (sample_rate as f64 * duration_secs as f64).round() as usize
}

/// Decay envelope value at sample `i` of an `n`-sample burst
///
/// `exp(-i / (decay_fraction * n))`. With the default fraction of 0.2 the
/// envelope reaches `e^-5` at `i = n`.
#[inline]
pub fn decay_envelope(i: usize, n: usize, decay_fraction: f32) -> f32 {
    let time_constant = decay_fraction as f64 * n as f64;
    (-(i as f64) / time_constant).exp() as f32
}

/// Immutable mono sample buffer shared by every playback
///
/// Cloning is cheap; all clones point at the same samples.
#[derive(Debug, Clone, PartialEq)]
pub struct ToneBuffer {
    samples: Arc<[f32]>,
    sample_rate: u32,
}

impl ToneBuffer {
    /// Wrap existing samples
    pub fn from_samples(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples: samples.into(),
            sample_rate,
        }
    }

    /// Synthesize a decaying noise burst
    ///
    /// Each sample is an independent uniform draw from `[-1, 1)` multiplied by
    /// [`decay_envelope`].
    ///
    /// # Example
    /// ```
    /// use folio::config::ToneConfig;
    /// use folio::sound::ToneBuffer;
    /// use rand::SeedableRng;
    ///
    /// let mut rng = rand::rngs::StdRng::seed_from_u64(1);
    /// let tone = ToneBuffer::synthesize(48000, &ToneConfig::default(), &mut rng);
    /// assert_eq!(tone.len(), 14400);
    /// ```
    pub fn synthesize<R: Rng + ?Sized>(sample_rate: u32, config: &ToneConfig, rng: &mut R) -> Self {
        let n = tone_length(sample_rate, config.duration_secs);
        let samples: Vec<f32> = (0..n)
            .map(|i| {
                let noise: f32 = rng.gen_range(-1.0..1.0);
                noise * decay_envelope(i, n, config.decay_fraction)
            })
            .collect();

        log::debug!(
            "[TONE] Synthesized {} samples at {} Hz",
            samples.len(),
            sample_rate
        );

        Self::from_samples(samples, sample_rate)
    }

    #[inline]
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    #[inline]
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.len() as f64 / self.sample_rate as f64
    }

    /// Whether two buffers share the same sample storage
    pub fn shares_samples_with(&self, other: &ToneBuffer) -> bool {
        Arc::ptr_eq(&self.samples, &other.samples)
    }
}
