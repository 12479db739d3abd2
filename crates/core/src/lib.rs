//! Core deck types, generation-response normalization, deck persistence
//! and slide navigation for the AI deck builder.

pub mod error;
pub mod navigator;
pub mod normalize;
pub mod render;
pub mod storage;
pub mod types;

pub use error::{Error, Result};
pub use navigator::{DeckEdit, DeckSession, EditField, SlideNavigator};
pub use normalize::{ResponseNormalizer, ResponseShape};
pub use storage::{DeckStore, FileStore, KeyValueStore, MemoryStore, DECK_KEY};
pub use types::{Deck, Slide, BULLET_MARKER, DEFAULT_DECK_TITLE};
