//! Error types for deck generation, persistence and editing.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while generating, storing or editing a deck.
#[derive(Error, Debug)]
pub enum Error {
    /// A required configuration value is missing or blank.
    #[error("Missing configuration: {0} is not set")]
    MissingConfig(&'static str),

    /// The prompt was empty after trimming.
    #[error("Prompt is empty")]
    EmptyPrompt,

    /// The generation endpoint answered with a non-success status.
    #[error("Generation request failed ({status}): {detail}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Best-effort error detail extracted from the body.
        detail: String,
    },

    /// The request could not be sent or the body could not be read.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The generation endpoint answered with a body that is not JSON.
    #[error("Invalid response ({status}): {detail}")]
    InvalidResponse {
        /// HTTP status code.
        status: u16,
        /// Parser message.
        detail: String,
    },

    /// Failed to read or write the persistent store.
    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    /// Failed to serialize a deck.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// An edit was submitted while the session is not in edit mode.
    #[error("Not in edit mode")]
    NotEditing,

    /// A slide index does not exist in the deck.
    #[error("Slide index {index} out of range (deck has {len} slides)")]
    SlideOutOfRange {
        /// Requested 0-based index.
        index: usize,
        /// Number of slides in the deck.
        len: usize,
    },

    /// A session was opened on a deck with no slides.
    #[error("Deck has no slides")]
    EmptyDeck,
}
