//! Audio outputs
//!
//! The synthesizer talks to the outside world through two seams:
//! - [`AudioBackend`] opens an output, once, on the first user interaction
//! - [`AudioOutput`] starts a voice for each page turn
//!
//! Two backends ship with the crate: [`DeviceBackend`] plays through the
//! default sound device (requires the `device` feature) and
//! [`OfflineBackend`] mixes into memory for rendering to WAV and for tests.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::{FolioError, Result};
use crate::sound::voice::{Mixer, Voice};

/// An open audio output
pub trait AudioOutput {
    /// Sample rate the output runs at; the tone is synthesized at this rate
    fn sample_rate(&self) -> u32;

    /// Begin playing a voice immediately
    ///
    /// # Errors
    /// * `PlaybackFailure` - if the output can no longer accept voices
    fn start_voice(&self, voice: Voice) -> Result<()>;

    /// Short human-readable name for logging
    fn name(&self) -> &str;
}

/// Factory for an [`AudioOutput`]
pub trait AudioBackend {
    /// Acquire the platform output
    ///
    /// # Errors
    /// * `AudioUnavailable` - if no output can be created
    fn open(&mut self) -> Result<Box<dyn AudioOutput>>;
}

// ============================================================================
// Offline output
// ============================================================================

/// Output that mixes voices into a shared [`Mixer`] for the caller to render
#[derive(Debug, Clone)]
pub struct OfflineOutput {
    sample_rate: u32,
    mixer: Mixer,
}

impl OfflineOutput {
    pub fn new(sample_rate: u32, mixer: Mixer) -> Self {
        Self { sample_rate, mixer }
    }

    /// Render `frames` mono frames of whatever is currently playing
    pub fn render(&self, frames: usize) -> Vec<f32> {
        let mut out = vec![0.0; frames];
        self.mixer.render(&mut out, 1);
        out
    }

    pub fn mixer(&self) -> &Mixer {
        &self.mixer
    }
}

impl AudioOutput for OfflineOutput {
    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn start_voice(&self, voice: Voice) -> Result<()> {
        self.mixer.add(voice);
        Ok(())
    }

    fn name(&self) -> &str {
        "offline"
    }
}

/// Backend producing [`OfflineOutput`]s that share one mixer
///
/// Keep a clone of [`OfflineBackend::mixer`] to pull rendered samples after
/// the backend has been handed to a synthesizer.
#[derive(Debug, Clone)]
pub struct OfflineBackend {
    sample_rate: u32,
    mixer: Mixer,
}

impl OfflineBackend {
    pub fn new(sample_rate: u32) -> Self {
        Self {
            sample_rate,
            mixer: Mixer::new(),
        }
    }

    pub fn mixer(&self) -> Mixer {
        self.mixer.clone()
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}

impl AudioBackend for OfflineBackend {
    fn open(&mut self) -> Result<Box<dyn AudioOutput>> {
        if self.sample_rate == 0 {
            return Err(FolioError::AudioUnavailable {
                reason: "offline sample rate is zero".to_string(),
            });
        }
        Ok(Box::new(OfflineOutput::new(self.sample_rate, self.mixer.clone())))
    }
}

// ============================================================================
// Device output
// ============================================================================

/// Backend for the default system output device
#[derive(Debug, Clone, Copy, Default)]
pub struct DeviceBackend;

impl DeviceBackend {
    pub fn new() -> Self {
        Self
    }
}

impl AudioBackend for DeviceBackend {
    #[cfg(feature = "device")]
    fn open(&mut self) -> Result<Box<dyn AudioOutput>> {
        let output = device::DeviceOutput::open().map_err(|e| FolioError::AudioUnavailable {
            reason: format!("{:#}", e),
        })?;
        Ok(Box::new(output))
    }

    #[cfg(not(feature = "device"))]
    fn open(&mut self) -> Result<Box<dyn AudioOutput>> {
        Err(FolioError::AudioUnavailable {
            reason: "built without the `device` feature".to_string(),
        })
    }
}

/// Error flag shared between an audio stream callback and its output
///
/// The stream's error callback raises it; the next voice start consumes it
/// and reports a single `PlaybackFailure`. Later voices are attempted again.
#[derive(Debug, Clone, Default)]
#[cfg_attr(not(feature = "device"), allow(dead_code))]
pub(crate) struct StreamHealth {
    errored: Arc<AtomicBool>,
}

#[cfg_attr(not(feature = "device"), allow(dead_code))]
impl StreamHealth {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Record a stream error
    pub(crate) fn report_error(&self) {
        self.errored.store(true, Ordering::Relaxed);
    }

    /// Clear the flag, returning whether an error was pending
    pub(crate) fn take_error(&self) -> bool {
        self.errored.swap(false, Ordering::Relaxed)
    }

    /// Fail the current voice start if the stream errored since the last one
    pub(crate) fn check(&self) -> Result<()> {
        if self.take_error() {
            return Err(FolioError::PlaybackFailure {
                reason: "output stream reported an error".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(feature = "device")]
mod device {
    use anyhow::{anyhow, Context};
    use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
    use cpal::{FromSample, SizedSample};

    use super::{AudioOutput, StreamHealth};
    use crate::error::Result;
    use crate::sound::voice::{Mixer, Voice};

    /// Default output device driven by a cpal stream
    pub struct DeviceOutput {
        // The stream must be held to keep the audio running.
        _stream: cpal::Stream,
        mixer: Mixer,
        sample_rate: u32,
        health: StreamHealth,
    }

    impl DeviceOutput {
        pub fn open() -> anyhow::Result<Self> {
            let host = cpal::default_host();
            let device = host
                .default_output_device()
                .ok_or_else(|| anyhow!("No default output device available"))?;

            let supported = device
                .default_output_config()
                .context("failed to query default output config")?;
            let sample_format = supported.sample_format();
            let config: cpal::StreamConfig = supported.into();
            let channels = config.channels as usize;
            let sample_rate = config.sample_rate.0;

            let mixer = Mixer::new();
            let health = StreamHealth::new();

            let stream = match sample_format {
                cpal::SampleFormat::F32 => {
                    build_stream::<f32>(&device, &config, mixer.clone(), health.clone())?
                }
                cpal::SampleFormat::I16 => {
                    build_stream::<i16>(&device, &config, mixer.clone(), health.clone())?
                }
                cpal::SampleFormat::U16 => {
                    build_stream::<u16>(&device, &config, mixer.clone(), health.clone())?
                }
                other => return Err(anyhow!("Unsupported sample format: {:?}", other)),
            };

            stream.play().context("failed to start output stream")?;

            log::info!(
                "[DEVICE] Opened output: {} Hz, {} channel(s), {:?}",
                sample_rate,
                channels,
                sample_format
            );

            Ok(Self {
                _stream: stream,
                mixer,
                sample_rate,
                health,
            })
        }
    }

    /// Build a stream in the device's native sample type
    ///
    /// The mixer always renders `f32`; other formats go through a scratch
    /// buffer and are converted per sample.
    fn build_stream<T>(
        device: &cpal::Device,
        config: &cpal::StreamConfig,
        mixer: Mixer,
        health: StreamHealth,
    ) -> anyhow::Result<cpal::Stream>
    where
        T: SizedSample + FromSample<f32>,
    {
        let channels = config.channels as usize;
        let mut scratch: Vec<f32> = Vec::new();

        let err_fn = move |err: cpal::StreamError| {
            log::warn!("[DEVICE] Output stream error: {}", err);
            health.report_error();
        };

        device
            .build_output_stream(
                config,
                move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                    fill_converted(data, &mut scratch, &mixer, channels);
                },
                err_fn,
                None,
            )
            .context("failed to build output stream")
    }

    fn fill_converted<T>(data: &mut [T], scratch: &mut Vec<f32>, mixer: &Mixer, channels: usize)
    where
        T: SizedSample + FromSample<f32>,
    {
        scratch.resize(data.len(), 0.0);
        mixer.render(scratch, channels);
        for (out, sample) in data.iter_mut().zip(scratch.iter()) {
            *out = T::from_sample(*sample);
        }
    }

    impl AudioOutput for DeviceOutput {
        fn sample_rate(&self) -> u32 {
            self.sample_rate
        }

        fn start_voice(&self, voice: Voice) -> Result<()> {
            self.health.check()?;
            self.mixer.add(voice);
            Ok(())
        }

        fn name(&self) -> &str {
            "device"
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use crate::sound::envelope::GainRamp;
        use crate::sound::tone::ToneBuffer;
        use cpal::Sample;

        fn mixer_with(samples: Vec<f32>) -> Mixer {
            let mixer = Mixer::new();
            let tone = ToneBuffer::from_samples(samples, 8);
            mixer.add(Voice::new(tone, GainRamp::new(1.0, 1.0, 1.0)));
            mixer
        }

        #[test]
        fn test_integer_formats_receive_converted_mix() {
            let mut scratch = Vec::new();

            let mut pcm16 = [1i16; 4];
            fill_converted(&mut pcm16, &mut scratch, &mixer_with(vec![0.5, -0.5]), 2);
            assert!(pcm16[0] > 16000 && pcm16[0] == pcm16[1]);
            assert!(pcm16[2] < -16000);

            let mut unsigned = [0u16; 2];
            fill_converted(&mut unsigned, &mut scratch, &Mixer::new(), 1);
            assert_eq!(unsigned, [u16::from_sample(0.0f32); 2]);
        }
    }
}
