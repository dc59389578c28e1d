//! Input Module
//!
//! Discrete user input events and their mapping onto page navigation.

pub mod swipe;

use std::fmt;
use std::str::FromStr;

use crate::book::Direction;

pub use swipe::SwipeTracker;

/// The two on-screen navigation controls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Prev,
    Next,
}

/// Keyboard keys the widget distinguishes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    ArrowLeft,
    ArrowRight,
    Other(String),
}

impl FromStr for Key {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "ArrowLeft" => Key::ArrowLeft,
            "ArrowRight" => Key::ArrowRight,
            other => Key::Other(other.to_string()),
        })
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::ArrowLeft => write!(f, "ArrowLeft"),
            Key::ArrowRight => write!(f, "ArrowRight"),
            Key::Other(name) => write!(f, "{}", name),
        }
    }
}

/// A user input event delivered to the widget
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Primary-button activation of a navigation control
    Click(Control),
    /// Click anywhere else; only counts as a user interaction
    Pointer,
    Key(Key),
    /// Touch began at horizontal position `x`
    TouchStart { x: f32 },
    /// Touch ended at horizontal position `x`
    TouchEnd { x: f32 },
}

impl InputEvent {
    /// Direction implied by a key press, if any
    pub fn key_direction(key: &Key) -> Option<Direction> {
        match key {
            Key::ArrowRight => Some(Direction::Forward),
            Key::ArrowLeft => Some(Direction::Backward),
            Key::Other(_) => None,
        }
    }

    /// Direction implied by a control click
    pub fn control_direction(control: Control) -> Direction {
        match control {
            Control::Next => Direction::Forward,
            Control::Prev => Direction::Backward,
        }
    }
}

/// Error parsing a scripted event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseEventError(pub String);

impl fmt::Display for ParseEventError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unrecognized event '{}'", self.0)
    }
}

impl std::error::Error for ParseEventError {}

impl FromStr for InputEvent {
    type Err = ParseEventError;

    /// Parse the scripted event syntax used by the CLI
    ///
    /// `next`, `prev`, `click`, `key:<name>`, `touchstart:<x>`, `touchend:<x>`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let err = || ParseEventError(s.to_string());
        let (kind, arg) = match s.split_once(':') {
            Some((kind, arg)) => (kind, Some(arg)),
            None => (s, None),
        };

        match (kind, arg) {
            ("next", None) => Ok(InputEvent::Click(Control::Next)),
            ("prev", None) => Ok(InputEvent::Click(Control::Prev)),
            ("click", None) => Ok(InputEvent::Pointer),
            ("key", Some(name)) if !name.is_empty() => {
                let key = name.parse::<Key>().map_err(|_| err())?;
                Ok(InputEvent::Key(key))
            }
            ("touchstart", Some(x)) => x
                .parse::<f32>()
                .map(|x| InputEvent::TouchStart { x })
                .map_err(|_| err()),
            ("touchend", Some(x)) => x
                .parse::<f32>()
                .map(|x| InputEvent::TouchEnd { x })
                .map_err(|_| err()),
            _ => Err(err()),
        }
    }
}
