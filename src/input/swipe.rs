//! Horizontal swipe detection from a touch start/end pair

use crate::book::Direction;
use crate::config::DEFAULT_SWIPE_THRESHOLD;

/// Turns a touch start/end pair into at most one navigation direction
///
/// A finger moving left (end < start - threshold) turns forward, moving
/// right turns backward. Travel of exactly `threshold` or less is ignored.
#[derive(Debug, Clone, PartialEq)]
pub struct SwipeTracker {
    threshold: f32,
    start_x: Option<f32>,
}

impl SwipeTracker {
    pub fn new(threshold: f32) -> Self {
        Self {
            threshold,
            start_x: None,
        }
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Record where a touch began, replacing any unfinished touch
    pub fn touch_start(&mut self, x: f32) {
        self.start_x = Some(x);
    }

    /// Finish the touch and classify it
    ///
    /// A touch end without a matching start is ignored.
    pub fn touch_end(&mut self, x: f32) -> Option<Direction> {
        let start = self.start_x.take()?;
        classify(start, x, self.threshold)
    }
}

impl Default for SwipeTracker {
    fn default() -> Self {
        Self::new(DEFAULT_SWIPE_THRESHOLD)
    }
}

/// Classify a completed swipe from `start` to `end`
pub fn classify(start: f32, end: f32, threshold: f32) -> Option<Direction> {
    if end < start - threshold {
        Some(Direction::Forward)
    } else if end > start + threshold {
        Some(Direction::Backward)
    } else {
        None
    }
}
