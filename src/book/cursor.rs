//! Page Cursor for Folio
//!
//! Tracks which page of the book is current. Navigation past either end is
//! absorbed as a no-op rather than treated as an error.

use std::fmt;

use log::debug;

use crate::error::{FolioError, Result};

/// Direction of a page transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Towards the last page
    Forward,
    /// Towards the first page
    Backward,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Forward => write!(f, "Forward"),
            Direction::Backward => write!(f, "Backward"),
        }
    }
}

/// A successful advance or retreat that changed the current index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    /// Index of the page being left
    pub from: usize,
    /// Index of the new current page
    pub to: usize,
    pub direction: Direction,
}

/// Owns the current page index and the page count
///
/// Invariant: `0 <= index < total`, with `total >= 1` fixed at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageCursor {
    index: usize,
    total: usize,
}

impl PageCursor {
    /// Create a cursor positioned on the first page
    ///
    /// # Errors
    /// * `EmptyBook` - if `total` is zero
    ///
    /// # Example
    /// ```
    /// use folio::book::PageCursor;
    /// let cursor = PageCursor::new(3).unwrap();
    /// assert_eq!(cursor.current_index(), 0);
    /// assert_eq!(cursor.label(), "Page 1 of 3");
    /// ```
    pub fn new(total: usize) -> Result<Self> {
        if total == 0 {
            return Err(FolioError::EmptyBook {
                source_name: "page cursor".to_string(),
            });
        }
        Ok(Self { index: 0, total })
    }

    /// Move to the next page
    ///
    /// Returns `None` without changing anything when already on the last page.
    ///
    /// # Example
    /// ```
    /// use folio::book::{Direction, PageCursor};
    /// let mut cursor = PageCursor::new(2).unwrap();
    /// let t = cursor.advance().unwrap();
    /// assert_eq!((t.from, t.to, t.direction), (0, 1, Direction::Forward));
    /// assert!(cursor.advance().is_none());
    /// ```
    pub fn advance(&mut self) -> Option<Transition> {
        if self.index + 1 >= self.total {
            debug!("[CURSOR] Already on last page ({})", self.index);
            return None;
        }

        let from = self.index;
        self.index += 1;
        debug!("[CURSOR] Advance {} -> {}", from, self.index);

        Some(Transition {
            from,
            to: self.index,
            direction: Direction::Forward,
        })
    }

    /// Move to the previous page
    ///
    /// Returns `None` without changing anything when already on the first page.
    pub fn retreat(&mut self) -> Option<Transition> {
        if self.index == 0 {
            debug!("[CURSOR] Already on first page");
            return None;
        }

        let from = self.index;
        self.index -= 1;
        debug!("[CURSOR] Retreat {} -> {}", from, self.index);

        Some(Transition {
            from,
            to: self.index,
            direction: Direction::Backward,
        })
    }

    /// Move one page in the given direction
    pub fn step(&mut self, direction: Direction) -> Option<Transition> {
        match direction {
            Direction::Forward => self.advance(),
            Direction::Backward => self.retreat(),
        }
    }

    // ========================================================================
    // State Queries
    // ========================================================================

    /// Zero-based index of the current page
    pub fn current_index(&self) -> usize {
        self.index
    }

    /// Number of pages
    pub fn total(&self) -> usize {
        self.total
    }

    /// Whether the previous-page control should be enabled
    pub fn prev_enabled(&self) -> bool {
        self.index > 0
    }

    /// Whether the next-page control should be enabled
    pub fn next_enabled(&self) -> bool {
        self.index < self.total - 1
    }

    /// One-based page indicator text
    pub fn label(&self) -> String {
        format!("Page {} of {}", self.index + 1, self.total)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck::QuickCheck;

    // ------------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------------

    #[test]
    fn test_starts_on_first_page() {
        let cursor = PageCursor::new(5).unwrap();
        assert_eq!(cursor.current_index(), 0);
        assert_eq!(cursor.total(), 5);
        assert!(!cursor.prev_enabled());
        assert!(cursor.next_enabled());
    }

    #[test]
    fn test_zero_pages_rejected() {
        let err = PageCursor::new(0).unwrap_err();
        assert_eq!(err.error_code(), "EMPTY_BOOK");
    }

    #[test]
    fn test_single_page_both_controls_disabled() {
        let mut cursor = PageCursor::new(1).unwrap();
        assert!(!cursor.prev_enabled());
        assert!(!cursor.next_enabled());
        assert!(cursor.advance().is_none());
        assert!(cursor.retreat().is_none());
        assert_eq!(cursor.current_index(), 0);
    }

    // ------------------------------------------------------------------------
    // Boundaries
    // ------------------------------------------------------------------------

    #[test]
    fn test_three_page_walkthrough() {
        let mut cursor = PageCursor::new(3).unwrap();

        cursor.advance().unwrap();
        assert_eq!(cursor.current_index(), 1);
        assert_eq!(cursor.label(), "Page 2 of 3");
        assert!(cursor.prev_enabled());
        assert!(cursor.next_enabled());

        cursor.advance().unwrap();
        assert_eq!(cursor.current_index(), 2);
        assert!(!cursor.next_enabled());

        assert!(cursor.advance().is_none());
        assert_eq!(cursor.current_index(), 2);
        assert_eq!(cursor.label(), "Page 3 of 3");
    }

    #[test]
    fn test_advance_at_end_leaves_state_unchanged() {
        let mut cursor = PageCursor::new(2).unwrap();
        cursor.advance();
        let before = cursor.clone();

        assert!(cursor.advance().is_none());
        assert_eq!(cursor, before);
        assert_eq!(cursor.prev_enabled(), before.prev_enabled());
        assert_eq!(cursor.next_enabled(), before.next_enabled());
    }

    #[test]
    fn test_retreat_at_start_is_noop() {
        let mut cursor = PageCursor::new(4).unwrap();
        assert!(cursor.retreat().is_none());
        assert_eq!(cursor.current_index(), 0);
    }

    #[test]
    fn test_retreat_reports_backward_transition() {
        let mut cursor = PageCursor::new(4).unwrap();
        cursor.advance();
        cursor.advance();

        let t = cursor.retreat().unwrap();
        assert_eq!(t.from, 2);
        assert_eq!(t.to, 1);
        assert_eq!(t.direction, Direction::Backward);
    }

    #[test]
    fn test_step_dispatches_on_direction() {
        let mut cursor = PageCursor::new(3).unwrap();
        assert_eq!(cursor.step(Direction::Forward).map(|t| t.to), Some(1));
        assert_eq!(cursor.step(Direction::Backward).map(|t| t.to), Some(0));
    }

    // ------------------------------------------------------------------------
    // Properties
    // ------------------------------------------------------------------------

    #[test]
    fn test_index_always_in_bounds() {
        fn property(total: u8, moves: Vec<bool>) -> bool {
            let total = total as usize % 20 + 1;
            let mut cursor = PageCursor::new(total).unwrap();
            for forward in moves {
                let before = cursor.current_index();
                let moved = if forward {
                    cursor.advance()
                } else {
                    cursor.retreat()
                };
                let after = cursor.current_index();
                if after >= total {
                    return false;
                }
                match moved {
                    Some(t) if t.from != before || t.to != after => return false,
                    None if before != after => return false,
                    _ => {}
                }
            }
            true
        }

        QuickCheck::new()
            .tests(200)
            .quickcheck(property as fn(u8, Vec<bool>) -> bool);
    }

    #[test]
    fn test_direction_display() {
        assert_eq!(format!("{}", Direction::Forward), "Forward");
        assert_eq!(format!("{}", Direction::Backward), "Backward");
    }
}
