//! Output gain ramp
//!
//! A second attenuation stage applied per playback, on top of the decay
//! already baked into the tone buffer.

use crate::config::ToneConfig;

/// Exponential gain ramp from `start` to `end` over `duration_secs`
///
/// Holds `end` once the ramp has finished. Both endpoints must be positive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GainRamp {
    start: f32,
    end: f32,
    duration_secs: f32,
}

impl GainRamp {
    pub fn new(start: f32, end: f32, duration_secs: f32) -> Self {
        Self {
            start,
            end,
            duration_secs,
        }
    }

    pub fn from_config(config: &ToneConfig) -> Self {
        Self::new(config.gain_start, config.gain_end, config.ramp_secs)
    }

    /// Gain at `t` seconds after playback started
    ///
    /// `start * (end / start)^(t / duration)` inside the ramp.
    pub fn gain_at(&self, t: f64) -> f32 {
        if t <= 0.0 {
            return self.start;
        }
        if self.duration_secs <= 0.0 || t >= self.duration_secs as f64 {
            return self.end;
        }

        let progress = t / self.duration_secs as f64;
        let ratio = self.end as f64 / self.start as f64;
        (self.start as f64 * ratio.powf(progress)) as f32
    }

    pub fn start(&self) -> f32 {
        self.start
    }

    pub fn end(&self) -> f32 {
        self.end
    }

    pub fn duration_secs(&self) -> f32 {
        self.duration_secs
    }
}

impl Default for GainRamp {
    fn default() -> Self {
        Self::from_config(&ToneConfig::default())
    }
}
