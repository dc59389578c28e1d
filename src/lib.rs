//! Folio - Paginated Book Viewer
//!
//! A small book widget: a fixed set of pages navigated by control clicks,
//! arrow keys or horizontal swipes, with a synthesized page-turn sound.
//!
//! # Architecture
//!
//! - `book`: page content, the bounded page cursor and presentation state
//! - `input`: input events and swipe detection
//! - `sound`: noise-burst synthesis, gain ramp, voices and audio outputs
//! - `engine`: the widget that routes events, plays sounds and runs
//!   deferred reconciliation
//!
//! Sound is best-effort throughout: audio failures are logged and the widget
//! keeps navigating silently.

pub mod book;
pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod input;
pub mod sound;

pub use error::{FolioError, Result};
