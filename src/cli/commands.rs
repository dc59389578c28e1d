//! CLI Command Implementations
//!
//! Implements the actual logic for each CLI command.

use std::io::{self, BufRead, Write};
use std::path::Path;
use std::thread;
use std::time::{Duration, Instant};

use log::{info, warn};
use serde::Serialize;

use crate::book::{Book, PageState};
use crate::config::{WidgetConfig, MAX_TIMELINE_STEP_MS};
use crate::engine::BookWidget;
use crate::error::{FolioError, Result};
use crate::input::{Control, InputEvent, Key};
use crate::sound::{
    export_wav, tone_length, DeviceBackend, OfflineBackend, PlayOutcome, SynthStatus,
    ToneSynthesizer, WavFormat,
};

/// One step of a scripted session
#[derive(Debug, Clone, Serialize)]
pub struct SimulationStep {
    /// Virtual time of the event since the session started
    pub at_ms: u64,
    pub event: String,
    /// `[from, to]` page indices when the event turned a page
    pub transition: Option<[usize; 2]>,
    pub sound: String,
    /// Cursor position after the event
    pub index: usize,
    /// Presentation state after the event, before any pending reconciliation
    pub indicator: String,
    pub prev_enabled: bool,
    pub next_enabled: bool,
    pub pending_reconciles: usize,
    /// Per-page active flag and exit mark after the event
    pub pages: Vec<PageState>,
}

/// A scripted session: every step plus the settled final state
#[derive(Debug, Clone, Serialize)]
pub struct Simulation {
    pub steps: Vec<SimulationStep>,
    pub final_index: usize,
    pub final_indicator: String,
    pub turns: usize,
    #[serde(skip)]
    pub audio: Vec<f32>,
    #[serde(skip)]
    pub sample_rate: u32,
}

/// Replay `events` against `book`, one every `interval` of virtual time
///
/// Page-turn sounds are mixed offline along the same timeline, and all
/// pending reconciliations are allowed to settle at the end.
pub fn run_simulation(
    book: Book,
    config: &WidgetConfig,
    events: &[InputEvent],
    interval: Duration,
) -> Result<Simulation> {
    check_timeline_step("interval", interval)?;
    let sample_rate = config.offline_sample_rate;
    let backend = OfflineBackend::new(sample_rate);
    let mixer = backend.mixer();
    let mut widget = BookWidget::new(book, config, Box::new(backend))?;

    let frames_for = |d: Duration| (d.as_secs_f64() * sample_rate as f64).round() as usize;
    let mut audio = Vec::new();
    let mut render = |frames: usize| {
        let start = audio.len();
        audio.resize(start + frames, 0.0);
        mixer.render(&mut audio[start..], 1);
    };

    let t0 = Instant::now();
    let mut steps = Vec::with_capacity(events.len());
    let mut turns = 0;

    for (i, event) in events.iter().enumerate() {
        let (elapsed, now) = timeline_position(t0, interval, i)?;
        if i > 0 {
            render(frames_for(interval));
        }

        widget.tick(now);
        let outcome = widget.handle_event(event, now);
        if outcome.transition.is_some() {
            turns += 1;
        }

        let presentation = widget.presentation();
        steps.push(SimulationStep {
            at_ms: elapsed.as_millis() as u64,
            event: format!("{:?}", event),
            transition: outcome.transition.map(|t| [t.from, t.to]),
            sound: format!("{:?}", outcome.sound),
            index: widget.cursor().current_index(),
            indicator: presentation.indicator().to_string(),
            prev_enabled: presentation.prev_enabled(),
            next_enabled: presentation.next_enabled(),
            pending_reconciles: widget.pending_reconciles(),
            pages: presentation.pages().to_vec(),
        });
    }

    // Let the last sound ring out and every reconciliation run
    let settle = config
        .reconcile_delay()
        .max(Duration::from_secs_f32(config.tone.duration_secs));
    render(frames_for(settle) + tone_length(sample_rate, config.tone.duration_secs));
    let (_, last_event_at) = timeline_position(t0, interval, events.len().saturating_sub(1))?;
    let settled_at = last_event_at.checked_add(settle).ok_or_else(timeline_overflow)?;
    widget.tick(settled_at);

    Ok(Simulation {
        steps,
        final_index: widget.cursor().current_index(),
        final_indicator: widget.presentation().indicator().to_string(),
        turns,
        audio,
        sample_rate,
    })
}

/// Render `turns` page-turn sounds, `spacing` apart, into one buffer
pub fn render_turns(config: &WidgetConfig, turns: u32, spacing: Duration) -> Result<Vec<f32>> {
    config.validate()?;
    check_timeline_step("spacing", spacing)?;
    let sample_rate = config.offline_sample_rate;
    let backend = OfflineBackend::new(sample_rate);
    let mixer = backend.mixer();
    let mut synth = ToneSynthesizer::new(Box::new(backend), config.tone.clone());

    if synth.ensure_initialized() != SynthStatus::Ready {
        return Err(FolioError::AudioUnavailable {
            reason: synth
                .failure_reason()
                .unwrap_or("offline output failed to open")
                .to_string(),
        });
    }

    let spacing_frames = (spacing.as_secs_f64() * sample_rate as f64).round() as usize;
    let tail_frames = tone_length(sample_rate, config.tone.duration_secs);
    let mut audio = Vec::new();

    for turn in 0..turns {
        if synth.play() != PlayOutcome::Started {
            warn!("Page turn {} did not start", turn + 1);
        }
        let frames = if turn + 1 < turns {
            spacing_frames
        } else {
            tail_frames
        };
        let start = audio.len();
        audio.resize(start + frames, 0.0);
        mixer.render(&mut audio[start..], 1);
    }

    Ok(audio)
}

/// Reject gaps long enough to make the offline render unreasonably large
fn check_timeline_step(name: &str, step: Duration) -> Result<()> {
    if step > Duration::from_millis(MAX_TIMELINE_STEP_MS) {
        return Err(FolioError::InvalidConfig {
            reason: format!(
                "{} must be at most {}ms, got {}ms",
                name,
                MAX_TIMELINE_STEP_MS,
                step.as_millis()
            ),
        });
    }
    Ok(())
}

fn timeline_overflow() -> FolioError {
    FolioError::InvalidConfig {
        reason: "simulated timeline is too long".to_string(),
    }
}

/// Elapsed time and instant of the `n`th event on a fixed-step timeline
fn timeline_position(t0: Instant, step: Duration, n: usize) -> Result<(Duration, Instant)> {
    let elapsed = u32::try_from(n)
        .ok()
        .and_then(|n| step.checked_mul(n))
        .ok_or_else(timeline_overflow)?;
    let at = t0.checked_add(elapsed).ok_or_else(timeline_overflow)?;
    Ok((elapsed, at))
}

/// Load the configuration file if one was given
pub fn load_config(path: Option<&Path>) -> Result<WidgetConfig> {
    match path {
        Some(path) => WidgetConfig::load(path),
        None => Ok(WidgetConfig::default()),
    }
}

/// Replay a scripted event list and print what the widget did.
pub fn simulate(
    book_path: &Path,
    config: &WidgetConfig,
    events: &[String],
    interval_ms: u64,
    json: bool,
    wav: Option<&Path>,
) -> Result<()> {
    let book = Book::load(book_path)?;
    let parsed = events
        .iter()
        .filter(|e| !e.trim().is_empty())
        .map(|e| {
            e.parse::<InputEvent>().map_err(|err| FolioError::InvalidEvent {
                reason: err.to_string(),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    info!("Simulating {} event(s) on {}", parsed.len(), book_path.display());
    let simulation = run_simulation(book, config, &parsed, Duration::from_millis(interval_ms))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&simulation)?);
    } else {
        println!("{:-<60}", "");
        for step in &simulation.steps {
            let turn = match step.transition {
                Some([from, to]) => format!("{} -> {}", from + 1, to + 1),
                None => "-".to_string(),
            };
            println!(
                "{:>6}ms  {:<28} turn: {:<8} sound: {:<8} [{}]",
                step.at_ms, step.event, turn, step.sound, step.indicator
            );
        }
        println!("{:-<60}", "");
        println!(
            "Settled on {} after {} page turn(s)",
            simulation.final_indicator, simulation.turns
        );
    }

    if let Some(path) = wav {
        export_wav(
            &simulation.audio,
            path,
            WavFormat::new(simulation.sample_rate, 16),
        )?;
        println!("Session audio written to: {}", path.display());
    }

    Ok(())
}

/// Render page-turn sounds to a WAV file.
pub fn render_tone(
    out: &Path,
    config: &WidgetConfig,
    turns: u32,
    spacing_ms: u64,
    sample_rate: Option<u32>,
    seed: Option<u64>,
    bit_depth: u16,
) -> Result<()> {
    let mut config = config.clone();
    if let Some(rate) = sample_rate {
        config.offline_sample_rate = rate;
    }
    if seed.is_some() {
        config.tone.seed = seed;
    }
    config.validate()?;

    let audio = render_turns(&config, turns, Duration::from_millis(spacing_ms))?;
    export_wav(
        &audio,
        out,
        WavFormat::new(config.offline_sample_rate, bit_depth),
    )?;

    println!(
        "Rendered {} page turn(s) ({:.3}s) to {}",
        turns,
        audio.len() as f64 / config.offline_sample_rate as f64,
        out.display()
    );

    Ok(())
}

/// Map a line typed at the interactive prompt to an event
fn parse_prompt(line: &str) -> Option<Vec<InputEvent>> {
    let mut words = line.split_whitespace();
    let events = match words.next()? {
        "n" | "next" => vec![InputEvent::Click(Control::Next)],
        "p" | "prev" => vec![InputEvent::Click(Control::Prev)],
        "right" | "ArrowRight" => vec![InputEvent::Key(Key::ArrowRight)],
        "left" | "ArrowLeft" => vec![InputEvent::Key(Key::ArrowLeft)],
        "swipe" => {
            let start = words.next()?.parse::<f32>().ok()?;
            let end = words.next()?.parse::<f32>().ok()?;
            vec![
                InputEvent::TouchStart { x: start },
                InputEvent::TouchEnd { x: end },
            ]
        }
        _ => return None,
    };
    Some(events)
}

fn print_page(widget: &BookWidget) {
    let presentation = widget.presentation();
    println!();
    println!("{:=<60}", "");
    println!("{}", widget.current_page());
    println!("{:=<60}", "");
    println!(
        "{} {} {}",
        if presentation.prev_enabled() { "[< prev]" } else { "[      ]" },
        presentation.indicator(),
        if presentation.next_enabled() { "[next >]" } else { "[      ]" },
    );
}

/// Read a book interactively on the terminal.
pub fn read(book_path: &Path, config: &WidgetConfig) -> Result<()> {
    let book = Book::load(book_path)?;
    let mut widget = BookWidget::new(book, config, Box::new(DeviceBackend::new()))?;

    println!("Reading \"{}\"", widget.book().title);
    println!("Commands: n/next, p/prev, left, right, swipe <start> <end>, q");
    print_page(&widget);

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    loop {
        print!("> ");
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();
        if line == "q" || line == "quit" {
            break;
        }

        let Some(events) = parse_prompt(line) else {
            println!("Unknown command: {}", line);
            continue;
        };

        for event in &events {
            widget.handle_event(event, Instant::now());
        }

        // Wait out the exit animation, then show the reconciled page
        while let Some(deadline) = widget.next_deadline() {
            let now = Instant::now();
            if deadline > now {
                thread::sleep(deadline - now);
            }
            widget.tick(Instant::now());
        }
        print_page(&widget);
    }

    if widget.audio_status() == SynthStatus::Failed {
        info!("Session ended without sound");
    }

    Ok(())
}
