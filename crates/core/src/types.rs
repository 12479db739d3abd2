//! Domain types for representing a generated slide deck.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Title used when neither the response nor the stored data carries one.
pub const DEFAULT_DECK_TITLE: &str = "Slide Deck";

/// Marker prepended to bullet lines in flattened slide content.
pub const BULLET_MARKER: char = '•';

/// A generated deck: a title plus slides in presentation order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deck {
    /// Deck title shown above every slide.
    #[serde(rename = "deckTitle", alias = "title")]
    pub title: String,

    /// Slides in presentation order.
    pub slides: Vec<Slide>,
}

impl Deck {
    /// Create a new deck with the given title and slides.
    pub fn new(title: impl Into<String>, slides: Vec<Slide>) -> Self {
        Self {
            title: title.into(),
            slides,
        }
    }

    /// Create a deck with no slides.
    pub fn empty(title: impl Into<String>) -> Self {
        Self::new(title, Vec::new())
    }

    /// Number of slides in the deck.
    pub fn len(&self) -> usize {
        self.slides.len()
    }

    /// Whether the deck has no slides.
    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    /// Get the slide at a 0-based index.
    pub fn slide(&self, index: usize) -> Option<&Slide> {
        self.slides.get(index)
    }
}

/// A single slide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slide {
    /// Identifier, unique within its deck.
    pub id: String,

    /// Slide heading.
    pub title: String,

    /// Flattened display text, one line per bullet or paragraph.
    pub content: String,

    /// The structured content the slide was built from, kept as-is.
    #[serde(rename = "rawContent", default, skip_serializing_if = "Option::is_none")]
    pub raw_content: Option<Value>,
}

impl Slide {
    /// Create a new slide without raw content.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            content: content.into(),
            raw_content: None,
        }
    }

    /// Attach the original structured payload.
    pub fn with_raw_content(mut self, raw: Value) -> Self {
        self.raw_content = Some(raw);
        self
    }
}
