//! Sound Tests
//!
//! Page-turn tone shape, playback layering and offline rendering.

use std::time::Duration;

use approx::assert_relative_eq;
use rand::rngs::StdRng;
use rand::SeedableRng;

use folio::book::Book;
use folio::cli::commands::{render_turns, run_simulation};
use folio::config::{ToneConfig, WidgetConfig};
use folio::input::InputEvent;
use folio::sound::{
    decay_envelope, export_wav, GainRamp, OfflineBackend, SynthStatus, ToneBuffer,
    ToneSynthesizer, WavFormat,
};

fn peak(samples: &[f32]) -> f32 {
    samples.iter().fold(0.0f32, |acc, s| acc.max(s.abs()))
}

#[test]
fn test_tone_length_matches_output_rate() {
    for rate in [8000u32, 22050, 44100, 48000, 96000] {
        let mut synth = ToneSynthesizer::new(
            Box::new(OfflineBackend::new(rate)),
            ToneConfig {
                seed: Some(rate as u64),
                ..ToneConfig::default()
            },
        );
        assert_eq!(synth.ensure_initialized(), SynthStatus::Ready);
        let expected = (rate as f64 * 0.3).round() as usize;
        assert_eq!(synth.tone().unwrap().len(), expected, "rate {}", rate);
    }
}

#[test]
fn test_last_sample_within_decayed_envelope() {
    // |sample[N-1]| <= |sample[0]|-scale * e^-5, checked on the mean over
    // many generations since individual draws are random.
    let config = ToneConfig::default();
    let mut rng = StdRng::seed_from_u64(2024);
    let generations = 2000;
    let mut first = 0.0f64;
    let mut last = 0.0f64;
    let mut n = 0;

    for _ in 0..generations {
        let tone = ToneBuffer::synthesize(4000, &config, &mut rng);
        n = tone.len();
        first += tone.samples()[0].abs() as f64;
        last += tone.samples()[n - 1].abs() as f64;
    }

    let first_mean = first / generations as f64;
    let last_mean = last / generations as f64;
    let envelope = decay_envelope(n - 1, n, config.decay_fraction) as f64;
    assert_relative_eq!(envelope, (-5.0f64).exp(), max_relative = 0.01);
    assert!(
        last_mean <= first_mean * envelope * 1.25,
        "last {} first {} envelope {}",
        last_mean,
        first_mean,
        envelope
    );
}

#[test]
fn test_single_turn_render_is_attenuated() {
    let mut config = WidgetConfig::default();
    config.offline_sample_rate = 8000;
    config.tone.seed = Some(7);

    let audio = render_turns(&config, 1, Duration::from_millis(0)).unwrap();
    assert_eq!(audio.len(), 2400);

    // Noise is at most 1.0, the gain ramp starts at 0.1
    assert!(peak(&audio) <= 0.1 + 1e-6);
    // Buffer decay and gain ramp together leave the tail near silence
    let ramp = GainRamp::default();
    let tail_bound = decay_envelope(2300, 2400, 0.2) * ramp.gain_at(2300.0 / 8000.0);
    assert!(peak(&audio[2300..]) <= tail_bound + 1e-6);
}

#[test]
fn test_layered_turns_overlap() {
    let mut config = WidgetConfig::default();
    config.offline_sample_rate = 8000;
    config.tone.seed = Some(9);

    let single = render_turns(&config, 1, Duration::from_millis(50)).unwrap();
    let double = render_turns(&config, 2, Duration::from_millis(50)).unwrap();

    // The second voice starts 400 frames in, while the first still sounds
    assert_eq!(double.len(), 400 + 2400);
    assert_eq!(&double[..400], &single[..400]);
    assert!(double[400..800]
        .iter()
        .zip(&single[400..800])
        .any(|(a, b)| (a - b).abs() > 1e-6));
}

#[test]
fn test_simulation_audio_written_to_wav() {
    let mut config = WidgetConfig::default();
    config.offline_sample_rate = 8000;
    config.tone.seed = Some(3);

    let book = Book::new("Sim", vec!["a".into(), "b".into(), "c".into()]).unwrap();
    let events: Vec<InputEvent> = ["next", "next", "next", "key:ArrowLeft"]
        .iter()
        .map(|e| e.parse().unwrap())
        .collect();

    let simulation = run_simulation(book, &config, &events, Duration::from_millis(250)).unwrap();
    assert_eq!(simulation.turns, 3);
    assert_eq!(simulation.final_index, 1);
    assert_eq!(simulation.final_indicator, "Page 2 of 3");
    // Third "next" arrives after the control was disabled by reconciliation
    assert_eq!(simulation.steps[2].transition, None);
    assert!(!simulation.steps[2].next_enabled);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.wav");
    export_wav(&simulation.audio, &path, WavFormat::new(8000, 16)).unwrap();

    let reader = hound::WavReader::open(&path).unwrap();
    assert_eq!(reader.spec().sample_rate, 8000);
    assert_eq!(reader.len() as usize, simulation.audio.len());
}
