//! Presentation state
//!
//! What a renderer needs to draw the book: which page is active, which page
//! is playing its exit animation, the page indicator and the two controls.

use serde::Serialize;

use crate::book::cursor::{Direction, PageCursor, Transition};

/// Side a page leaves towards during its exit animation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExitSide {
    /// Moving forward: the old page slides out to the left
    Left,
    /// Moving backward: the old page slides out to the right
    Right,
}

impl From<Direction> for ExitSide {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Forward => ExitSide::Left,
            Direction::Backward => ExitSide::Right,
        }
    }
}

/// Visual state of a single page, as reported in `simulate --json`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PageState {
    pub active: bool,
    pub exit: Option<ExitSide>,
}

/// Visual state of the whole widget
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Presentation {
    pages: Vec<PageState>,
    indicator: String,
    prev_enabled: bool,
    next_enabled: bool,
    reconciled: u64,
}

impl Presentation {
    /// Build the initial presentation for a cursor
    pub fn new(cursor: &PageCursor) -> Self {
        let mut presentation = Self {
            pages: vec![PageState::default(); cursor.total()],
            indicator: String::new(),
            prev_enabled: false,
            next_enabled: false,
            reconciled: 0,
        };
        presentation.reconcile(cursor);
        presentation
    }

    /// Start the exit animation of the page being left
    ///
    /// The page keeps its active mark until the next reconciliation.
    pub fn begin_exit(&mut self, transition: &Transition) {
        if let Some(page) = self.pages.get_mut(transition.from) {
            page.exit = Some(transition.direction.into());
        }
    }

    /// Re-derive everything from the cursor
    ///
    /// Clears every exit mark and leaves exactly the current page active.
    /// Applying it twice in a row yields the same state as applying it once.
    pub fn reconcile(&mut self, cursor: &PageCursor) {
        let current = cursor.current_index();
        for (index, page) in self.pages.iter_mut().enumerate() {
            *page = PageState {
                active: index == current,
                exit: None,
            };
        }

        self.indicator = cursor.label();
        self.prev_enabled = cursor.prev_enabled();
        self.next_enabled = cursor.next_enabled();
        self.reconciled += 1;
    }

    pub fn pages(&self) -> &[PageState] {
        &self.pages
    }

    pub fn page(&self, index: usize) -> Option<&PageState> {
        self.pages.get(index)
    }

    /// Index of the first active page, if any
    pub fn active_index(&self) -> Option<usize> {
        self.pages.iter().position(|p| p.active)
    }

    pub fn indicator(&self) -> &str {
        &self.indicator
    }

    pub fn prev_enabled(&self) -> bool {
        self.prev_enabled
    }

    pub fn next_enabled(&self) -> bool {
        self.next_enabled
    }

    /// Number of reconciliation passes applied so far, including the initial one
    pub fn reconcile_count(&self) -> u64 {
        self.reconciled
    }

    /// Compare the visible state, ignoring the pass counter
    pub fn same_view(&self, other: &Presentation) -> bool {
        self.pages == other.pages
            && self.indicator == other.indicator
            && self.prev_enabled == other.prev_enabled
            && self.next_enabled == other.next_enabled
    }
}
