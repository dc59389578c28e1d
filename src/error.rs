//! Error handling for Folio
//!
//! Audio errors are never propagated out of navigation; they are logged and
//! the widget carries on silently. The remaining variants cover loading books
//! and configuration.

use thiserror::Error;

/// Result type alias for Folio operations
pub type Result<T> = std::result::Result<T, FolioError>;

/// Main error type for Folio operations
#[derive(Error, Debug)]
pub enum FolioError {
    // Audio Errors
    #[error("Audio output unavailable: {reason}")]
    AudioUnavailable { reason: String },

    #[error("Playback failed: {reason}")]
    PlaybackFailure { reason: String },

    // Book Errors
    #[error("Book not found: {path}")]
    BookNotFound {
        path: String,
        #[source]
        source: Option<std::io::Error>,
    },

    #[error("Book has no pages: {source_name}")]
    EmptyBook { source_name: String },

    // Configuration Errors
    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    #[error("Invalid input event: {reason}")]
    InvalidEvent { reason: String },

    // Export Errors
    #[error("WAV export failed: {reason}")]
    WavExport {
        reason: String,
        #[source]
        source: Option<hound::Error>,
    },

    // I/O Errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization Errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl FolioError {
    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            FolioError::AudioUnavailable { .. } => "AUDIO_UNAVAILABLE",
            FolioError::PlaybackFailure { .. } => "PLAYBACK_FAILURE",
            FolioError::BookNotFound { .. } => "BOOK_NOT_FOUND",
            FolioError::EmptyBook { .. } => "EMPTY_BOOK",
            FolioError::InvalidConfig { .. } => "INVALID_CONFIG",
            FolioError::InvalidEvent { .. } => "INVALID_EVENT",
            FolioError::WavExport { .. } => "WAV_EXPORT",
            FolioError::Io(_) => "IO_ERROR",
            FolioError::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }

    /// Check if this error is recoverable
    ///
    /// Audio failures degrade to silent navigation, so they never stop the
    /// widget.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            FolioError::AudioUnavailable { .. }
                | FolioError::PlaybackFailure { .. }
                | FolioError::BookNotFound { .. }
                | FolioError::InvalidConfig { .. }
        )
    }

    /// Get recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            FolioError::AudioUnavailable { .. } => vec![
                "Navigation still works, page turns are silent",
                "Rebuild with `--features device` to enable speaker output",
                "Check that an output device is connected",
            ],
            FolioError::PlaybackFailure { .. } => vec![
                "The next page turn will try again",
                "Check the output device is still connected",
            ],
            FolioError::BookNotFound { .. } => vec![
                "Check the book path is correct",
                "Books are plain text with pages separated by `---`, or JSON",
            ],
            FolioError::EmptyBook { .. } => vec![
                "Add at least one page to the book",
            ],
            FolioError::InvalidConfig { .. } => vec![
                "Remove the offending field to fall back to its default",
                "Durations, gains and the swipe threshold must be positive",
            ],
            FolioError::InvalidEvent { .. } => vec![
                "Events are next, prev, click, key:<name>, touchstart:<x>, touchend:<x>",
            ],
            _ => vec![],
        }
    }
}
