//! Sound Module
//!
//! Page-turn sound synthesis and playback:
//! - Tone buffer synthesis (decaying noise burst)
//! - Per-playback gain ramp
//! - Voices, mixer and audio outputs
//! - WAV export of offline renders

pub mod envelope;
pub mod output;
pub mod synth;
pub mod tone;
pub mod voice;
pub mod wav;

pub use envelope::GainRamp;
pub use output::{AudioBackend, AudioOutput, DeviceBackend, OfflineBackend, OfflineOutput};
pub use synth::{PlayOutcome, SynthStatus, ToneSynthesizer};
pub use tone::{decay_envelope, tone_length, ToneBuffer};
pub use voice::{Mixer, Voice};
pub use wav::{export_wav, WavFormat};
