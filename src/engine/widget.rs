//! Book Widget
//!
//! Ties the page cursor, presentation, swipe tracking, reconciliation
//! scheduling and the page-turn synthesizer together behind a single event
//! entry point.
//!
//! Event flow:
//! 1. Any input event counts as a user interaction and initializes audio
//!    (first time only).
//! 2. The event is mapped to a direction, if it implies one.
//! 3. On a successful transition the leaving page starts its exit animation,
//!    the page-turn sound plays and a reconciliation is scheduled.
//! 4. [`BookWidget::tick`] runs reconciliations whose delay has elapsed.

use std::time::Instant;

use log::{debug, info};

use crate::book::{Book, Direction, PageCursor, Presentation, Transition};
use crate::config::WidgetConfig;
use crate::engine::scheduler::ReconcileScheduler;
use crate::error::Result;
use crate::input::{Control, InputEvent, SwipeTracker};
use crate::sound::{AudioBackend, PlayOutcome, SynthStatus, ToneSynthesizer};

/// Outcome of handling a single input event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventOutcome {
    /// The page transition the event caused, if any
    pub transition: Option<Transition>,
    /// What happened to the page-turn sound (`Skipped` when nothing moved)
    pub sound: PlayOutcome,
}

impl EventOutcome {
    fn idle() -> Self {
        Self {
            transition: None,
            sound: PlayOutcome::Skipped,
        }
    }
}

/// Paginated content viewer
#[derive(Debug)]
pub struct BookWidget {
    book: Book,
    cursor: PageCursor,
    presentation: Presentation,
    swipe: SwipeTracker,
    scheduler: ReconcileScheduler,
    synth: ToneSynthesizer,
}

impl BookWidget {
    /// Create a widget showing the first page of `book`
    ///
    /// Audio is not touched until the first input event.
    pub fn new(book: Book, config: &WidgetConfig, backend: Box<dyn AudioBackend>) -> Result<Self> {
        config.validate()?;

        let cursor = PageCursor::new(book.len())?;
        let presentation = Presentation::new(&cursor);

        info!("Opened \"{}\": {}", book.title, cursor.label());

        Ok(Self {
            book,
            cursor,
            presentation,
            swipe: SwipeTracker::new(config.swipe_threshold),
            scheduler: ReconcileScheduler::new(config.reconcile_delay()),
            synth: ToneSynthesizer::new(backend, config.tone.clone()),
        })
    }

    /// Handle one input event received at `now`
    pub fn handle_event(&mut self, event: &InputEvent, now: Instant) -> EventOutcome {
        self.synth.ensure_initialized();

        let direction = match event {
            InputEvent::Click(control) => self.control_click(*control),
            InputEvent::Pointer => None,
            InputEvent::Key(key) => InputEvent::key_direction(key),
            InputEvent::TouchStart { x } => {
                self.swipe.touch_start(*x);
                None
            }
            InputEvent::TouchEnd { x } => self.swipe.touch_end(*x),
        };

        match direction {
            Some(direction) => self.turn(direction, now),
            None => EventOutcome::idle(),
        }
    }

    /// Move forward one page programmatically
    ///
    /// Not a user interaction, so it never initializes audio.
    pub fn advance(&mut self, now: Instant) -> EventOutcome {
        self.turn(Direction::Forward, now)
    }

    /// Move back one page programmatically
    pub fn retreat(&mut self, now: Instant) -> EventOutcome {
        self.turn(Direction::Backward, now)
    }

    /// Run every reconciliation whose deadline has passed
    ///
    /// Returns the number of reconciliations applied.
    pub fn tick(&mut self, now: Instant) -> usize {
        let due = self.scheduler.take_due(now);
        for _ in 0..due {
            self.presentation.reconcile(&self.cursor);
        }
        if due > 0 {
            debug!(
                "[WIDGET] Reconciled {} time(s), showing {}",
                due,
                self.presentation.indicator()
            );
        }
        due
    }

    fn control_click(&self, control: Control) -> Option<Direction> {
        let enabled = match control {
            Control::Prev => self.presentation.prev_enabled(),
            Control::Next => self.presentation.next_enabled(),
        };
        if !enabled {
            debug!("[WIDGET] Ignoring click on disabled {:?} control", control);
            return None;
        }
        Some(InputEvent::control_direction(control))
    }

    fn turn(&mut self, direction: Direction, now: Instant) -> EventOutcome {
        let Some(transition) = self.cursor.step(direction) else {
            return EventOutcome::idle();
        };

        self.presentation.begin_exit(&transition);
        let sound = self.synth.play();
        self.scheduler.schedule(now);

        EventOutcome {
            transition: Some(transition),
            sound,
        }
    }

    // ========================================================================
    // State Queries
    // ========================================================================

    pub fn book(&self) -> &Book {
        &self.book
    }

    pub fn cursor(&self) -> &PageCursor {
        &self.cursor
    }

    pub fn presentation(&self) -> &Presentation {
        &self.presentation
    }

    /// Text of the page the cursor is on
    pub fn current_page(&self) -> &str {
        self.book.page(self.cursor.current_index()).unwrap_or_default()
    }

    pub fn audio_status(&self) -> SynthStatus {
        self.synth.status()
    }

    pub fn synth(&self) -> &ToneSynthesizer {
        &self.synth
    }

    pub fn pending_reconciles(&self) -> usize {
        self.scheduler.pending()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.scheduler.next_deadline()
    }
}
