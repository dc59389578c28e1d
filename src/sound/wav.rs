//! WAV export of rendered page-turn audio
//!
//! Mono only; offline renders are mixed down before they get here.

use std::path::Path;

use hound::{SampleFormat, WavSpec, WavWriter};

use crate::error::{FolioError, Result};

/// Export format configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavFormat {
    pub sample_rate: u32,
    /// Bit depth: 16, 24, or 32 (32 is written as float)
    pub bit_depth: u16,
}

impl WavFormat {
    pub fn new(sample_rate: u32, bit_depth: u16) -> Self {
        Self {
            sample_rate,
            bit_depth,
        }
    }
}

impl Default for WavFormat {
    fn default() -> Self {
        Self {
            sample_rate: 48000,
            bit_depth: 16,
        }
    }
}

fn wav_error(context: &str, e: hound::Error) -> FolioError {
    FolioError::WavExport {
        reason: format!("{}: {}", context, e),
        source: Some(e),
    }
}

/// Write mono samples to a WAV file
///
/// Integer formats are clamped to full scale.
///
/// # Errors
/// * `WavExport` - unsupported bit depth, or the file cannot be written
pub fn export_wav(samples: &[f32], path: &Path, format: WavFormat) -> Result<()> {
    let sample_format = match format.bit_depth {
        16 | 24 => SampleFormat::Int,
        32 => SampleFormat::Float,
        other => {
            return Err(FolioError::WavExport {
                reason: format!("{}-bit audio (only 16, 24, 32 supported)", other),
                source: None,
            })
        }
    };

    let spec = WavSpec {
        channels: 1,
        sample_rate: format.sample_rate,
        bits_per_sample: format.bit_depth,
        sample_format,
    };

    let mut writer =
        WavWriter::create(path, spec).map_err(|e| wav_error("failed to create file", e))?;

    match format.bit_depth {
        16 => {
            for &sample in samples {
                let scaled = (sample * 32767.0).clamp(-32768.0, 32767.0) as i16;
                writer
                    .write_sample(scaled)
                    .map_err(|e| wav_error("failed to write sample", e))?;
            }
        }
        24 => {
            for &sample in samples {
                // 24-bit stored as i32 in hound
                let scaled = (sample * 8388607.0).clamp(-8388608.0, 8388607.0) as i32;
                writer
                    .write_sample(scaled)
                    .map_err(|e| wav_error("failed to write sample", e))?;
            }
        }
        _ => {
            for &sample in samples {
                writer
                    .write_sample(sample)
                    .map_err(|e| wav_error("failed to write sample", e))?;
            }
        }
    }

    writer
        .finalize()
        .map_err(|e| wav_error("failed to finalize file", e))?;

    log::info!(
        "Wrote {} samples ({} Hz, {}-bit) to {}",
        samples.len(),
        format.sample_rate,
        format.bit_depth,
        path.display()
    );

    Ok(())
}
