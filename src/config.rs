//! Widget configuration
//!
//! Every field has a default, so a config file only needs the values it
//! overrides.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{FolioError, Result};

/// Delay between a page transition and the reconciliation pass
pub const DEFAULT_RECONCILE_DELAY_MS: u64 = 100;

/// Minimum horizontal travel for a touch to count as a swipe
pub const DEFAULT_SWIPE_THRESHOLD: f32 = 50.0;

/// Sample rate used when no device dictates one
pub const DEFAULT_OFFLINE_SAMPLE_RATE: u32 = 48000;

/// Highest accepted offline sample rate
pub const MAX_SAMPLE_RATE: u32 = 384_000;

/// Longest accepted tone or gain ramp, in seconds
pub const MAX_TONE_SECS: f32 = 10.0;

/// Longest accepted reconcile delay
pub const MAX_RECONCILE_DELAY_MS: u64 = 10_000;

/// Longest gap between scripted events or rendered turns
pub const MAX_TIMELINE_STEP_MS: u64 = 60_000;

/// Parameters of the synthesized page-turn sound
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToneConfig {
    /// Length of the noise burst in seconds
    pub duration_secs: f32,
    /// Decay time constant as a fraction of the buffer length
    pub decay_fraction: f32,
    /// Output gain at the start of each playback
    pub gain_start: f32,
    /// Output gain reached at the end of the ramp
    pub gain_end: f32,
    /// Length of the exponential gain ramp in seconds
    pub ramp_secs: f32,
    /// Fixed RNG seed, for reproducible renders
    pub seed: Option<u64>,
}

impl Default for ToneConfig {
    fn default() -> Self {
        Self {
            duration_secs: 0.3,
            decay_fraction: 0.2,
            gain_start: 0.1,
            gain_end: 0.01,
            ramp_secs: 0.3,
            seed: None,
        }
    }
}

/// Configuration for a [`crate::engine::BookWidget`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetConfig {
    pub reconcile_delay_ms: u64,
    pub swipe_threshold: f32,
    pub offline_sample_rate: u32,
    pub tone: ToneConfig,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            reconcile_delay_ms: DEFAULT_RECONCILE_DELAY_MS,
            swipe_threshold: DEFAULT_SWIPE_THRESHOLD,
            offline_sample_rate: DEFAULT_OFFLINE_SAMPLE_RATE,
            tone: ToneConfig::default(),
        }
    }
}

impl WidgetConfig {
    /// Load a configuration from a JSON file and validate it
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: WidgetConfig = serde_json::from_str(&contents)?;
        config.validate()?;
        log::debug!("Loaded widget config from {}", path.display());
        Ok(config)
    }

    /// The reconcile delay as a [`Duration`]
    pub fn reconcile_delay(&self) -> Duration {
        Duration::from_millis(self.reconcile_delay_ms)
    }

    /// Reject values the synthesizer or gesture tracker cannot work with
    ///
    /// Exponential ramps are undefined for a zero endpoint, so both gains
    /// must be strictly positive.
    pub fn validate(&self) -> Result<()> {
        fn positive(name: &str, value: f32) -> Result<()> {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(FolioError::InvalidConfig {
                    reason: format!("{} must be positive, got {}", name, value),
                })
            }
        }

        fn at_most_secs(name: &str, value: f32) -> Result<()> {
            if value <= MAX_TONE_SECS {
                Ok(())
            } else {
                Err(FolioError::InvalidConfig {
                    reason: format!("{} must be at most {}s, got {}", name, MAX_TONE_SECS, value),
                })
            }
        }

        positive("swipe_threshold", self.swipe_threshold)?;
        positive("tone.duration_secs", self.tone.duration_secs)?;
        positive("tone.decay_fraction", self.tone.decay_fraction)?;
        positive("tone.gain_start", self.tone.gain_start)?;
        positive("tone.gain_end", self.tone.gain_end)?;
        positive("tone.ramp_secs", self.tone.ramp_secs)?;
        at_most_secs("tone.duration_secs", self.tone.duration_secs)?;
        at_most_secs("tone.ramp_secs", self.tone.ramp_secs)?;

        if self.offline_sample_rate == 0 || self.offline_sample_rate > MAX_SAMPLE_RATE {
            return Err(FolioError::InvalidConfig {
                reason: format!(
                    "offline_sample_rate must be between 1 and {}, got {}",
                    MAX_SAMPLE_RATE, self.offline_sample_rate
                ),
            });
        }

        if self.reconcile_delay_ms > MAX_RECONCILE_DELAY_MS {
            return Err(FolioError::InvalidConfig {
                reason: format!(
                    "reconcile_delay_ms must be at most {}, got {}",
                    MAX_RECONCILE_DELAY_MS, self.reconcile_delay_ms
                ),
            });
        }

        Ok(())
    }
}
