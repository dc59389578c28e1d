//! Book Module
//!
//! Page content, the page cursor and the derived presentation state.

pub mod cursor;
pub mod pages;
pub mod presentation;

pub use cursor::{Direction, PageCursor, Transition};
pub use pages::{Book, PAGE_SEPARATOR};
pub use presentation::{ExitSide, PageState, Presentation};
