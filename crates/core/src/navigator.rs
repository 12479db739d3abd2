//! Slide navigation, edit commands and the editing session.

use crate::storage::{DeckStore, KeyValueStore};
use crate::types::Deck;
use crate::{Error, Result};

/// Cursor and edit-mode state for one loaded deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlideNavigator {
    cursor: usize,
    editing: bool,
    slide_count: usize,
}

impl SlideNavigator {
    /// Start at the first slide, not editing.
    pub fn new(slide_count: usize) -> Self {
        Self {
            cursor: 0,
            editing: false,
            slide_count,
        }
    }

    /// Current 0-based slide index.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Whether edit mode is on.
    pub fn is_editing(&self) -> bool {
        self.editing
    }

    /// Number of slides being navigated.
    pub fn slide_count(&self) -> usize {
        self.slide_count
    }

    /// Whether the cursor is on the first slide.
    pub fn is_first(&self) -> bool {
        self.cursor == 0
    }

    /// Whether the cursor is on the last slide.
    pub fn is_last(&self) -> bool {
        self.cursor + 1 >= self.slide_count
    }

    /// Move to the next slide, if any. Always leaves edit mode.
    pub fn next(&mut self) {
        if self.cursor + 1 < self.slide_count {
            self.cursor += 1;
        }
        self.editing = false;
    }

    /// Move to the previous slide, if any. Always leaves edit mode.
    pub fn previous(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
        }
        self.editing = false;
    }

    /// Jump to a 0-based index. Out-of-range indices leave the cursor alone.
    /// Always leaves edit mode.
    pub fn jump_to(&mut self, index: usize) {
        if index < self.slide_count {
            self.cursor = index;
        }
        self.editing = false;
    }

    /// Flip edit mode without moving the cursor.
    pub fn toggle_edit(&mut self) {
        self.editing = !self.editing;
    }
}

/// A single edit to a deck.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeckEdit {
    /// Replace the title of the slide at an index.
    SlideTitle(usize, String),
    /// Replace the content of the slide at an index.
    SlideContent(usize, String),
    /// Replace the deck title.
    DeckTitle(String),
}

impl Deck {
    /// Produce a new deck with the edit applied. `self` is left unchanged.
    pub fn apply(&self, edit: &DeckEdit) -> Result<Deck> {
        let mut deck = self.clone();
        match edit {
            DeckEdit::SlideTitle(index, title) => {
                deck.slide_mut(*index)?.title = title.clone();
            }
            DeckEdit::SlideContent(index, content) => {
                deck.slide_mut(*index)?.content = content.clone();
            }
            DeckEdit::DeckTitle(title) => {
                deck.title = title.clone();
            }
        }
        Ok(deck)
    }

    fn slide_mut(&mut self, index: usize) -> Result<&mut crate::Slide> {
        let len = self.slides.len();
        self.slides
            .get_mut(index)
            .ok_or(Error::SlideOutOfRange { index, len })
    }
}

/// Field of the current slide (or the deck) targeted by an edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditField {
    /// The current slide's title.
    SlideTitle,
    /// The current slide's content.
    SlideContent,
    /// The deck title.
    DeckTitle,
}

/// A loaded deck with its navigator, persisting every edit.
#[derive(Debug)]
pub struct DeckSession<S> {
    deck: Deck,
    navigator: SlideNavigator,
    store: DeckStore<S>,
}

impl<S: KeyValueStore> DeckSession<S> {
    /// Open a session on a deck. Empty decks are rejected.
    pub fn new(deck: Deck, store: DeckStore<S>) -> Result<Self> {
        if deck.is_empty() {
            return Err(Error::EmptyDeck);
        }
        let navigator = SlideNavigator::new(deck.len());
        Ok(Self {
            deck,
            navigator,
            store,
        })
    }

    /// Load the stored deck and open a session on it.
    ///
    /// Returns `None` when nothing usable is stored.
    pub fn load(store: DeckStore<S>) -> Option<Self> {
        let deck = store.load()?;
        Self::new(deck, store).ok()
    }

    /// The current deck.
    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    /// The navigator state.
    pub fn navigator(&self) -> &SlideNavigator {
        &self.navigator
    }

    /// Mutable access to the navigator for movement and edit toggling.
    pub fn navigator_mut(&mut self) -> &mut SlideNavigator {
        &mut self.navigator
    }

    /// The store backing this session.
    pub fn store(&self) -> &DeckStore<S> {
        &self.store
    }

    /// Replace a field at the cursor and persist the whole deck.
    ///
    /// Fails with [`Error::NotEditing`] outside edit mode. On a storage
    /// failure the in-memory deck is left unchanged.
    pub fn edit(&mut self, field: EditField, value: impl Into<String>) -> Result<()> {
        if !self.navigator.is_editing() {
            return Err(Error::NotEditing);
        }

        let value = value.into();
        let cursor = self.navigator.cursor();
        let edit = match field {
            EditField::SlideTitle => DeckEdit::SlideTitle(cursor, value),
            EditField::SlideContent => DeckEdit::SlideContent(cursor, value),
            EditField::DeckTitle => DeckEdit::DeckTitle(value),
        };

        let updated = self.deck.apply(&edit)?;
        self.store.save(&updated)?;
        log::debug!("Applied {:?} and saved deck", edit);
        self.deck = updated;
        Ok(())
    }
}
