//! Deck persistence over a pluggable key-value store.
//!
//! The whole deck lives under a single fixed key. Two stored shapes are
//! accepted on load: the current `{ deckTitle, slides }` object and a bare
//! array of slides written by older versions.

use crate::normalize::dedupe_ids;
use crate::types::{Deck, Slide, DEFAULT_DECK_TITLE};
use crate::Result;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;

/// Key under which the deck is stored.
pub const DECK_KEY: &str = "slidedeck";

/// A string key-value store.
pub trait KeyValueStore {
    /// Read the value stored under `key`.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &S {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }
}

/// In-memory store, mainly for tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Store keeping one `<key>.json` file per key in a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Create a store rooted at `dir`. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path of the file backing `key`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        fs::create_dir_all(&self.dir)?;

        // Readers only ever see a complete file: write aside, then rename.
        let path = self.path_for(key);
        let tmp = self.dir.join(format!(".{}.json.tmp", key));
        {
            let mut file = fs::File::create(&tmp)?;
            file.write_all(value.as_bytes())?;
            file.sync_all()?;
        }
        fs::rename(&tmp, &path)?;

        log::debug!("Wrote {} bytes to {}", value.len(), path.display());
        Ok(())
    }
}

/// Reads and writes the deck under [`DECK_KEY`].
#[derive(Debug, Clone)]
pub struct DeckStore<S> {
    store: S,
}

impl<S: KeyValueStore> DeckStore<S> {
    /// Wrap a key-value store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// The underlying key-value store.
    pub fn inner(&self) -> &S {
        &self.store
    }

    /// Serialize and store the deck, overwriting any previous one.
    pub fn save(&self, deck: &Deck) -> Result<()> {
        let json = serde_json::to_string(deck)?;
        self.store.set(DECK_KEY, &json)
    }

    /// Load the stored deck.
    ///
    /// Returns `None` when nothing is stored, the store cannot be read, or
    /// the stored value does not parse.
    pub fn load(&self) -> Option<Deck> {
        let raw = match self.store.get(DECK_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                log::warn!("Failed to read stored deck: {}", e);
                return None;
            }
        };

        match serde_json::from_str::<StoredDeck>(&raw) {
            Ok(stored) => Some(stored.into_deck()),
            Err(e) => {
                log::warn!("Ignoring unparseable stored deck: {}", e);
                None
            }
        }
    }
}

/// The shapes a stored deck can take.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StoredDeck {
    Current {
        #[serde(rename = "deckTitle", alias = "title")]
        title: String,
        slides: Vec<StoredSlide>,
    },
    Legacy(Vec<StoredSlide>),
}

/// A stored slide; fields written by older versions may be missing.
#[derive(Debug, Deserialize)]
struct StoredSlide {
    #[serde(default)]
    id: Option<Value>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    content: String,
    #[serde(rename = "rawContent", default)]
    raw_content: Option<Value>,
}

impl StoredDeck {
    fn into_deck(self) -> Deck {
        let (title, slides) = match self {
            Self::Current { title, slides } => (title, slides),
            Self::Legacy(slides) => (DEFAULT_DECK_TITLE.to_string(), slides),
        };

        let mut slides: Vec<Slide> = slides
            .into_iter()
            .enumerate()
            .map(|(idx, s)| s.into_slide(idx + 1))
            .collect();
        dedupe_ids(&mut slides);

        Deck::new(title, slides)
    }
}

impl StoredSlide {
    /// Fill in only the fields older versions did not write; stored values,
    /// blank ones included, are kept as saved.
    fn into_slide(self, position: usize) -> Slide {
        let id = match self.id {
            Some(Value::String(s)) => s,
            Some(Value::Number(n)) => n.to_string(),
            _ => position.to_string(),
        };

        Slide {
            id,
            title: self.title.unwrap_or_else(|| format!("Slide {}", position)),
            content: self.content,
            raw_content: self.raw_content,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_deck() -> Deck {
        Deck::new(
            "Aggro Deck",
            vec![
                Slide::new("1", "Intro", "• Fast curve")
                    .with_raw_content(json!([{ "type": "bullet", "text": "Fast curve" }])),
                Slide::new("2", "Sideboard", "Plan for control\n\n• Duress"),
            ],
        )
    }

    #[test]
    fn test_round_trip_memory() {
        let store = DeckStore::new(MemoryStore::new());
        let deck = sample_deck();

        store.save(&deck).unwrap();
        assert_eq!(store.load(), Some(deck));
    }

    #[test]
    fn test_round_trip_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = DeckStore::new(FileStore::new(dir.path().join("nested")));
        let deck = sample_deck();

        assert_eq!(store.load(), None);
        store.save(&deck).unwrap();
        assert_eq!(store.load(), Some(deck));
        assert!(store.inner().path_for(DECK_KEY).exists());
    }

    #[test]
    fn test_save_overwrites() {
        let store = DeckStore::new(MemoryStore::new());
        store.save(&sample_deck()).unwrap();

        let replacement = Deck::new("Control", vec![Slide::new("1", "Counters", "")]);
        store.save(&replacement).unwrap();

        assert_eq!(store.load(), Some(replacement));
    }

    #[test]
    fn test_load_absent() {
        let store = DeckStore::new(MemoryStore::new());
        assert_eq!(store.load(), None);
    }

    #[test]
    fn test_load_legacy_array() {
        let kv = MemoryStore::new();
        kv.set(DECK_KEY, r#"[{"title":"A","content":"x"}]"#).unwrap();

        let deck = DeckStore::new(&kv).load().unwrap();

        assert_eq!(deck, Deck::new(DEFAULT_DECK_TITLE, vec![Slide::new("1", "A", "x")]));
    }

    #[test]
    fn test_load_legacy_array_keeps_ids() {
        let kv = MemoryStore::new();
        kv.set(DECK_KEY, r#"[{"id":"a","title":"A","content":"x"},{"id":9,"content":"y"}]"#)
            .unwrap();

        let deck = DeckStore::new(&kv).load().unwrap();

        assert_eq!(deck.slides[0].id, "a");
        assert_eq!(deck.slides[1].id, "9");
        assert_eq!(deck.slides[1].title, "Slide 2");
    }

    #[test]
    fn test_load_corrupt_is_absent() {
        let kv = MemoryStore::new();
        let store = DeckStore::new(&kv);

        for raw in ["{not json", "42", r#"{"deckTitle":"x"}"#, r#""just a string""#] {
            kv.set(DECK_KEY, raw).unwrap();
            assert_eq!(store.load(), None, "expected absent for {raw}");
        }
    }

    #[test]
    fn test_load_keeps_blank_deck_title() {
        let kv = MemoryStore::new();
        kv.set(DECK_KEY, r#"{"deckTitle":"","slides":[{"id":"1","title":"A","content":""}]}"#)
            .unwrap();

        let deck = DeckStore::new(&kv).load().unwrap();
        assert_eq!(deck.title, "");
    }

    #[test]
    fn test_round_trip_blank_fields() {
        let store = DeckStore::new(MemoryStore::new());
        let deck = Deck::new(
            "",
            vec![Slide::new("1", "A", "x"), Slide::new("", "", "y"), Slide::new("3", "  ", "")],
        );

        store.save(&deck).unwrap();
        assert_eq!(store.load(), Some(deck));
    }

    #[test]
    fn test_round_trip_null_content_payload() {
        let response = json!([{ "id": "1", "title": "A", "content": null }]);
        let deck = crate::ResponseNormalizer::new().normalize(&response);
        let store = DeckStore::new(MemoryStore::new());

        store.save(&deck).unwrap();
        assert_eq!(store.load(), Some(deck));
    }

    #[test]
    fn test_load_dedupes_legacy_ids() {
        let kv = MemoryStore::new();
        kv.set(DECK_KEY, r#"[{"id":"2","content":"a"},{"content":"b"}]"#).unwrap();

        let deck = DeckStore::new(&kv).load().unwrap();
        assert_eq!(deck.slides[0].id, "2");
        assert_eq!(deck.slides[1].id, "2-2");
    }

    #[test]
    fn test_file_store_get_missing() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        assert_eq!(store.get("nothing").unwrap(), None);
    }
}
