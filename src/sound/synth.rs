//! Tone Synthesizer
//!
//! Lazily opens an audio output on the first user interaction, synthesizes
//! the page-turn tone once, then replays it through a fresh voice per page
//! turn. Sound is best-effort: no failure here ever reaches navigation.

use std::fmt;

use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::ToneConfig;
use crate::sound::envelope::GainRamp;
use crate::sound::output::{AudioBackend, AudioOutput};
use crate::sound::tone::ToneBuffer;
use crate::sound::voice::Voice;

/// Coarse synthesizer state, for callers that only need to know where it is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SynthStatus {
    Uninitialized,
    Ready,
    /// Initialization failed; all further plays are silent
    Failed,
}

impl fmt::Display for SynthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SynthStatus::Uninitialized => write!(f, "Uninitialized"),
            SynthStatus::Ready => write!(f, "Ready"),
            SynthStatus::Failed => write!(f, "Failed"),
        }
    }
}

/// Result of a single [`ToneSynthesizer::play`] call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayOutcome {
    /// A new voice is sounding
    Started,
    /// Not ready (never initialized, or initialization failed)
    Skipped,
    /// The output rejected the voice; logged and abandoned
    Failed,
}

enum SynthState {
    Uninitialized,
    Ready {
        output: Box<dyn AudioOutput>,
        tone: ToneBuffer,
    },
    Failed {
        reason: String,
    },
}

/// Page-turn sound generator
///
/// State machine: `Uninitialized -> Ready | Failed`, one way, entered by
/// [`ToneSynthesizer::ensure_initialized`].
pub struct ToneSynthesizer {
    state: SynthState,
    backend: Box<dyn AudioBackend>,
    config: ToneConfig,
    ramp: GainRamp,
    voices_started: u64,
}

impl ToneSynthesizer {
    pub fn new(backend: Box<dyn AudioBackend>, config: ToneConfig) -> Self {
        let ramp = GainRamp::from_config(&config);
        Self {
            state: SynthState::Uninitialized,
            backend,
            config,
            ramp,
            voices_started: 0,
        }
    }

    /// Open the output and synthesize the tone, if not done already
    ///
    /// Only the first call does anything. If the backend fails the
    /// synthesizer stays silent for the rest of its life.
    pub fn ensure_initialized(&mut self) -> SynthStatus {
        if !matches!(self.state, SynthState::Uninitialized) {
            return self.status();
        }

        self.state = match self.backend.open() {
            Ok(output) => {
                let mut rng = match self.config.seed {
                    Some(seed) => StdRng::seed_from_u64(seed),
                    None => StdRng::from_entropy(),
                };
                let tone = ToneBuffer::synthesize(output.sample_rate(), &self.config, &mut rng);
                info!(
                    "Page-turn sound ready on {} output ({} samples at {} Hz)",
                    output.name(),
                    tone.len(),
                    tone.sample_rate()
                );
                SynthState::Ready { output, tone }
            }
            Err(e) => {
                warn!("{}; page turns will be silent", e);
                SynthState::Failed {
                    reason: e.to_string(),
                }
            }
        };

        self.status()
    }

    /// Play the page-turn sound once
    ///
    /// Overlapping calls layer voices; nothing is de-duplicated or queued.
    pub fn play(&mut self) -> PlayOutcome {
        let SynthState::Ready { output, tone } = &self.state else {
            debug!("[SYNTH] play() while {}, skipped", self.status());
            return PlayOutcome::Skipped;
        };

        match output.start_voice(Voice::new(tone.clone(), self.ramp)) {
            Ok(()) => {
                self.voices_started += 1;
                debug!("[SYNTH] Voice {} started", self.voices_started);
                PlayOutcome::Started
            }
            Err(e) => {
                warn!("Error playing page-turn sound: {}", e);
                PlayOutcome::Failed
            }
        }
    }

    pub fn status(&self) -> SynthStatus {
        match self.state {
            SynthState::Uninitialized => SynthStatus::Uninitialized,
            SynthState::Ready { .. } => SynthStatus::Ready,
            SynthState::Failed { .. } => SynthStatus::Failed,
        }
    }

    /// The shared tone, once ready
    pub fn tone(&self) -> Option<&ToneBuffer> {
        match &self.state {
            SynthState::Ready { tone, .. } => Some(tone),
            _ => None,
        }
    }

    /// Why initialization failed, if it did
    pub fn failure_reason(&self) -> Option<&str> {
        match &self.state {
            SynthState::Failed { reason } => Some(reason),
            _ => None,
        }
    }

    /// Number of voices successfully started
    pub fn voices_started(&self) -> u64 {
        self.voices_started
    }
}

impl fmt::Debug for ToneSynthesizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToneSynthesizer")
            .field("status", &self.status())
            .field("config", &self.config)
            .field("voices_started", &self.voices_started)
            .finish()
    }
}
