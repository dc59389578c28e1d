//! Navigation Tests
//!
//! End-to-end behaviour of the book widget: boundaries, deferred
//! reconciliation, swipes and silent degradation.

use std::time::{Duration, Instant};

use folio::book::{Book, ExitSide};
use folio::config::WidgetConfig;
use folio::engine::BookWidget;
use folio::error::{FolioError, Result};
use folio::input::{Control, InputEvent, Key};
use folio::sound::{AudioBackend, AudioOutput, OfflineBackend, PlayOutcome, SynthStatus, Voice};

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

fn book(pages: usize) -> Book {
    Book::new("Fixture", (1..=pages).map(|i| format!("Page text {}", i)).collect()).unwrap()
}

fn config() -> WidgetConfig {
    let mut config = WidgetConfig::default();
    config.offline_sample_rate = 8000;
    config.tone.seed = Some(1234);
    config
}

fn offline_widget(pages: usize) -> (BookWidget, folio::sound::Mixer) {
    let backend = OfflineBackend::new(8000);
    let mixer = backend.mixer();
    let widget = BookWidget::new(book(pages), &config(), Box::new(backend)).unwrap();
    (widget, mixer)
}

struct NoDevice;

impl AudioBackend for NoDevice {
    fn open(&mut self) -> Result<Box<dyn AudioOutput>> {
        Err(FolioError::AudioUnavailable {
            reason: "no output device".to_string(),
        })
    }
}

struct BrokenDevice;

impl AudioOutput for BrokenDevice {
    fn sample_rate(&self) -> u32 {
        8000
    }
    fn start_voice(&self, _voice: Voice) -> Result<()> {
        Err(FolioError::PlaybackFailure {
            reason: "device unplugged".to_string(),
        })
    }
    fn name(&self) -> &str {
        "broken"
    }
}

impl AudioBackend for BrokenDevice {
    fn open(&mut self) -> Result<Box<dyn AudioOutput>> {
        Ok(Box::new(BrokenDevice))
    }
}

// === Example Scenario ===

#[test]
fn test_three_page_scenario() {
    let t0 = Instant::now();
    let (mut widget, _) = offline_widget(3);
    let next = InputEvent::Click(Control::Next);

    widget.handle_event(&next, t0);
    widget.tick(t0 + ms(100));
    assert_eq!(widget.cursor().current_index(), 1);
    assert_eq!(widget.presentation().indicator(), "Page 2 of 3");
    assert!(widget.presentation().prev_enabled());
    assert!(widget.presentation().next_enabled());

    widget.handle_event(&next, t0 + ms(200));
    widget.tick(t0 + ms(300));
    assert_eq!(widget.cursor().current_index(), 2);
    assert!(!widget.presentation().next_enabled());

    // Next is disabled now; the arrow key reaches the cursor and is absorbed
    let outcome = widget.handle_event(&InputEvent::Key(Key::ArrowRight), t0 + ms(400));
    assert!(outcome.transition.is_none());
    assert_eq!(widget.cursor().current_index(), 2);
    assert_eq!(widget.pending_reconciles(), 0);
}

// === Boundaries ===

#[test]
fn test_retreat_at_first_page_is_noop() {
    let t0 = Instant::now();
    let (mut widget, mixer) = offline_widget(3);
    let before = widget.presentation().clone();

    let outcome = widget.handle_event(&InputEvent::Key(Key::ArrowLeft), t0);
    assert!(outcome.transition.is_none());
    assert_eq!(outcome.sound, PlayOutcome::Skipped);
    assert_eq!(mixer.active_voices(), 0);
    assert!(widget.presentation().same_view(&before));
}

#[test]
fn test_index_never_leaves_bounds_under_mixed_input() {
    let t0 = Instant::now();
    let (mut widget, _) = offline_widget(4);
    let script = [
        InputEvent::Key(Key::ArrowLeft),
        InputEvent::Key(Key::ArrowRight),
        InputEvent::Key(Key::ArrowRight),
        InputEvent::Key(Key::ArrowRight),
        InputEvent::Key(Key::ArrowRight),
        InputEvent::Key(Key::ArrowRight),
        InputEvent::TouchStart { x: 0.0 },
        InputEvent::TouchEnd { x: 400.0 },
        InputEvent::Key(Key::ArrowLeft),
        InputEvent::Key(Key::ArrowLeft),
        InputEvent::Key(Key::ArrowLeft),
    ];

    for (i, event) in script.iter().enumerate() {
        let now = t0 + ms(10 * i as u64);
        widget.handle_event(event, now);
        widget.tick(now);
        assert!(widget.cursor().current_index() < 4);
    }
    assert_eq!(widget.cursor().current_index(), 0);
}

// === Deferred Reconciliation ===

#[test]
fn test_rapid_transitions_reconcile_to_latest_index() {
    let t0 = Instant::now();
    let (mut widget, mixer) = offline_widget(5);

    // Three turns 20ms apart, all inside one reconcile delay
    for i in 0..3 {
        let outcome = widget.handle_event(&InputEvent::Key(Key::ArrowRight), t0 + ms(20 * i));
        assert_eq!(outcome.sound, PlayOutcome::Started);
    }
    assert_eq!(widget.pending_reconciles(), 3);
    // Overlapping sounds are layered, not de-duplicated
    assert_eq!(mixer.active_voices(), 3);

    // The first reconciliation already reflects the latest index
    assert_eq!(widget.tick(t0 + ms(100)), 1);
    assert_eq!(widget.presentation().indicator(), "Page 4 of 5");
    let after_first = widget.presentation().clone();

    // The remaining ones change nothing
    assert_eq!(widget.tick(t0 + ms(140)), 2);
    assert!(widget.presentation().same_view(&after_first));
    assert_eq!(widget.presentation().active_index(), Some(3));
}

#[test]
fn test_reconcile_sees_index_at_delay_elapse() {
    let t0 = Instant::now();
    let (mut widget, _) = offline_widget(3);

    widget.handle_event(&InputEvent::Key(Key::ArrowRight), t0);
    widget.handle_event(&InputEvent::Key(Key::ArrowLeft), t0 + ms(50));

    widget.tick(t0 + ms(100));
    assert_eq!(widget.presentation().indicator(), "Page 1 of 3");
    assert_eq!(widget.presentation().active_index(), Some(0));
}

#[test]
fn test_exit_marks_cleared_by_reconcile() {
    let t0 = Instant::now();
    let (mut widget, _) = offline_widget(3);

    widget.handle_event(&InputEvent::Key(Key::ArrowRight), t0);
    let leaving = widget.presentation().page(0).copied().unwrap();
    assert!(leaving.active);
    assert_eq!(leaving.exit, Some(ExitSide::Left));

    widget.tick(t0 + ms(100));
    widget.handle_event(&InputEvent::Key(Key::ArrowLeft), t0 + ms(200));
    assert_eq!(
        widget.presentation().page(1).and_then(|p| p.exit),
        Some(ExitSide::Right)
    );

    widget.tick(t0 + ms(300));
    assert!(widget.presentation().pages().iter().all(|p| p.exit.is_none()));
}

// === Swipes ===

#[test]
fn test_swipe_thresholds() {
    let t0 = Instant::now();
    let cases = [
        // (start, end, expected index after swipe from page 2 of 3)
        (300.0, 249.0, 2),
        (300.0, 250.0, 1),
        (300.0, 351.0, 0),
        (300.0, 350.0, 1),
    ];

    for (start, end, expected) in cases {
        let (mut widget, _) = offline_widget(3);
        widget.advance(t0);

        widget.handle_event(&InputEvent::TouchStart { x: start }, t0);
        let outcome = widget.handle_event(&InputEvent::TouchEnd { x: end }, t0);

        assert_eq!(
            widget.cursor().current_index(),
            expected,
            "swipe {} -> {}",
            start,
            end
        );
        assert_eq!(outcome.transition.is_some(), expected != 1);
    }
}

// === Audio Degradation ===

#[test]
fn test_navigation_without_audio_device() {
    let t0 = Instant::now();
    let mut widget = BookWidget::new(book(3), &config(), Box::new(NoDevice)).unwrap();

    let outcome = widget.handle_event(&InputEvent::Click(Control::Next), t0);
    assert_eq!(widget.audio_status(), SynthStatus::Failed);
    assert_eq!(outcome.transition.map(|t| t.to), Some(1));
    assert_eq!(outcome.sound, PlayOutcome::Skipped);

    widget.tick(t0 + ms(100));
    assert_eq!(widget.presentation().indicator(), "Page 2 of 3");
}

#[test]
fn test_playback_failures_do_not_block_navigation() {
    let t0 = Instant::now();
    let mut widget = BookWidget::new(book(3), &config(), Box::new(BrokenDevice)).unwrap();

    for i in 0..2 {
        let outcome = widget.handle_event(&InputEvent::Key(Key::ArrowRight), t0 + ms(200 * i));
        assert_eq!(outcome.sound, PlayOutcome::Failed);
        assert!(outcome.transition.is_some());
    }
    assert_eq!(widget.audio_status(), SynthStatus::Ready);
    assert_eq!(widget.cursor().current_index(), 2);
}

#[test]
fn test_empty_book_rejected() {
    let err = Book::new("Nothing", Vec::new()).unwrap_err();
    assert_eq!(err.error_code(), "EMPTY_BOOK");
}
