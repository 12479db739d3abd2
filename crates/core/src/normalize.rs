//! Normalization of generation responses into decks.
//!
//! The generation endpoint is loosely typed. Payloads are first classified
//! into a closed set of shapes, and only the known shapes produce slides;
//! everything else yields an empty deck.

use crate::types::{Deck, Slide, BULLET_MARKER, DEFAULT_DECK_TITLE};
use serde_json::Value;
use std::collections::HashSet;

/// Content item type that is rendered with a bullet marker.
const BULLET_ITEM_TYPE: &str = "bullet";

/// Fields consulted, in order, when a slide has no usable `content`.
const FALLBACK_TEXT_FIELDS: &[&str] = &["text", "body"];

/// The shapes a generation response can take.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseShape<'a> {
    /// `{ success, data: { deckTitle?, slides: [...] }, error? }`
    Envelope {
        /// Value of the `success` flag; absent counts as false.
        success: bool,
        /// Deck title from `data.deckTitle` (or `data.title`).
        title: Option<&'a str>,
        /// Slide-like objects from `data.slides`, if that is an array.
        slides: Option<&'a [Value]>,
        /// Error message carried by the envelope, if any.
        error: Option<&'a str>,
    },

    /// A bare array of slide-like objects.
    LegacyArray(&'a [Value]),

    /// Anything else.
    Unrecognized,
}

impl<'a> ResponseShape<'a> {
    /// Classify a parsed response body.
    pub fn classify(value: &'a Value) -> Self {
        match value {
            Value::Array(items) => Self::LegacyArray(items.as_slice()),
            Value::Object(map) if map.contains_key("success") || map.contains_key("data") => {
                let data = map.get("data");
                Self::Envelope {
                    success: map.get("success").and_then(Value::as_bool).unwrap_or(false),
                    title: data
                        .and_then(|d| d.get("deckTitle").or_else(|| d.get("title")))
                        .and_then(Value::as_str),
                    slides: data
                        .and_then(|d| d.get("slides"))
                        .and_then(Value::as_array)
                        .map(Vec::as_slice),
                    error: envelope_error(value),
                }
            }
            _ => Self::Unrecognized,
        }
    }

    /// Error message reported by a failed envelope.
    pub fn error_message(&self) -> Option<&'a str> {
        match self {
            Self::Envelope { error, .. } => *error,
            _ => None,
        }
    }
}

/// Pull `error` (string) or `error.message` out of an envelope.
fn envelope_error(value: &Value) -> Option<&str> {
    let error = value.get("error")?;
    error
        .as_str()
        .or_else(|| error.get("message").and_then(Value::as_str))
        .filter(|s| !s.trim().is_empty())
}

/// Converts generation responses into decks.
#[derive(Debug, Clone)]
pub struct ResponseNormalizer {
    /// Title used when the response has none.
    default_title: String,
}

impl Default for ResponseNormalizer {
    fn default() -> Self {
        Self {
            default_title: DEFAULT_DECK_TITLE.to_string(),
        }
    }
}

impl ResponseNormalizer {
    /// Create a normalizer with the standard default title.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the title used when the response carries none.
    pub fn with_default_title(mut self, title: impl Into<String>) -> Self {
        let title = title.into();
        if !title.trim().is_empty() {
            self.default_title = title;
        }
        self
    }

    /// Normalize a response body into a deck.
    ///
    /// Never fails: unknown shapes, failed envelopes and missing or empty
    /// slide arrays all produce a deck with zero slides.
    pub fn normalize(&self, value: &Value) -> Deck {
        match ResponseShape::classify(value) {
            ResponseShape::Envelope {
                success: true,
                title,
                slides: Some(slides),
                ..
            } => Deck::new(self.deck_title(title), self.normalize_slides(slides)),
            ResponseShape::Envelope { success, title, .. } => {
                log::debug!("Envelope produced no slides (success={})", success);
                Deck::empty(self.deck_title(title))
            }
            ResponseShape::LegacyArray(slides) => {
                Deck::new(self.default_title.clone(), self.normalize_slides(slides))
            }
            ResponseShape::Unrecognized => {
                log::debug!("Unrecognized response shape");
                Deck::empty(self.default_title.clone())
            }
        }
    }

    /// Normalize slide-like objects, one slide per element.
    pub fn normalize_slides(&self, raw: &[Value]) -> Vec<Slide> {
        let mut slides: Vec<Slide> = raw
            .iter()
            .enumerate()
            .map(|(idx, value)| normalize_slide(value, idx + 1))
            .collect();
        dedupe_ids(&mut slides);
        slides
    }

    fn deck_title(&self, title: Option<&str>) -> String {
        match title {
            Some(t) if !t.trim().is_empty() => t.to_string(),
            _ => self.default_title.clone(),
        }
    }
}

/// Build a slide from one slide-like object at a 1-based position.
fn normalize_slide(value: &Value, position: usize) -> Slide {
    let title = value
        .get("title")
        .and_then(Value::as_str)
        .filter(|t| !t.trim().is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("Slide {}", position));

    // A null payload would not survive a save/load cycle.
    let raw_content = value.get("content").filter(|v| !v.is_null()).cloned();

    Slide {
        id: slide_id(value.get("id"), position),
        title,
        content: flatten_content(value),
        raw_content,
    }
}

/// Use a non-empty string or numeric id, otherwise the 1-based position.
fn slide_id(id: Option<&Value>, position: usize) -> String {
    match id {
        Some(Value::String(s)) if !s.trim().is_empty() => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => position.to_string(),
    }
}

/// Make slide ids unique within a deck.
///
/// The first slide keeps a contested id; later ones get a `-2`, `-3`, ...
/// suffix. Decks whose ids are already unique are left untouched.
pub(crate) fn dedupe_ids(slides: &mut [Slide]) {
    let mut used: HashSet<String> = HashSet::with_capacity(slides.len());
    for slide in slides.iter_mut() {
        if used.insert(slide.id.clone()) {
            continue;
        }
        let base = slide.id.clone();
        let mut n = 2;
        let mut candidate = format!("{}-{}", base, n);
        while used.contains(&candidate) {
            n += 1;
            candidate = format!("{}-{}", base, n);
        }
        log::debug!("Renamed duplicate slide id {:?} to {:?}", base, candidate);
        used.insert(candidate.clone());
        slide.id = candidate;
    }
}

/// Flatten a slide's content into display text.
fn flatten_content(value: &Value) -> String {
    match value.get("content") {
        Some(Value::Array(items)) => items
            .iter()
            .map(flatten_item)
            .collect::<Vec<_>>()
            .join("\n"),
        Some(Value::String(s)) => s.clone(),
        _ => FALLBACK_TEXT_FIELDS
            .iter()
            .find_map(|field| value.get(*field).and_then(Value::as_str))
            .unwrap_or_default()
            .to_string(),
    }
}

/// Flatten a single typed content item.
fn flatten_item(item: &Value) -> String {
    if let Some(s) = item.as_str() {
        return s.to_string();
    }

    let text = item.get("text").and_then(Value::as_str).unwrap_or_default();
    match item.get("type").and_then(Value::as_str) {
        Some(BULLET_ITEM_TYPE) => format!("{} {}", BULLET_MARKER, text),
        _ => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_aggro_deck_scenario() {
        let response = json!({
            "success": true,
            "data": {
                "deckTitle": "Aggro Deck",
                "slides": [
                    { "title": "Intro", "content": [{ "type": "bullet", "text": "Fast curve" }] }
                ]
            }
        });

        let deck = ResponseNormalizer::new().normalize(&response);

        assert_eq!(deck.title, "Aggro Deck");
        assert_eq!(deck.len(), 1);
        assert_eq!(deck.slides[0].id, "1");
        assert_eq!(deck.slides[0].title, "Intro");
        assert_eq!(deck.slides[0].content, "• Fast curve");
        assert_eq!(
            deck.slides[0].raw_content,
            Some(json!([{ "type": "bullet", "text": "Fast curve" }]))
        );
    }

    #[test]
    fn test_failed_envelope_yields_no_slides() {
        let normalizer = ResponseNormalizer::new();

        assert!(normalizer.normalize(&json!({ "success": false })).is_empty());
        assert!(normalizer
            .normalize(&json!({ "success": false, "data": { "slides": [{ "title": "A" }] } }))
            .is_empty());
    }

    #[test]
    fn test_missing_or_empty_slides_yield_no_slides() {
        let normalizer = ResponseNormalizer::new();

        assert!(normalizer.normalize(&json!({ "success": true })).is_empty());
        assert!(normalizer.normalize(&json!({ "success": true, "data": {} })).is_empty());
        assert!(normalizer
            .normalize(&json!({ "success": true, "data": { "slides": [] } }))
            .is_empty());
        assert!(normalizer
            .normalize(&json!({ "success": true, "data": { "slides": "nope" } }))
            .is_empty());
    }

    #[test]
    fn test_success_flag_absent_counts_as_failure() {
        let deck = ResponseNormalizer::new()
            .normalize(&json!({ "data": { "slides": [{ "title": "A" }] } }));
        assert!(deck.is_empty());
    }

    #[test]
    fn test_unrecognized_shapes_yield_no_slides() {
        let normalizer = ResponseNormalizer::new();

        for value in [json!(null), json!(42), json!("text"), json!({ "slides": [1] })] {
            let deck = normalizer.normalize(&value);
            assert!(deck.is_empty());
            assert_eq!(deck.title, DEFAULT_DECK_TITLE);
        }
    }

    #[test]
    fn test_slide_count_matches_input_and_fields_non_empty() {
        let response = json!({
            "success": true,
            "data": {
                "slides": [
                    { "title": "First", "content": "plain" },
                    {},
                    "not an object",
                    { "title": "", "id": "" },
                    { "id": 7, "content": { "weird": true } }
                ]
            }
        });

        let deck = ResponseNormalizer::new().normalize(&response);

        assert_eq!(deck.len(), 5);
        assert_eq!(deck.title, DEFAULT_DECK_TITLE);
        for slide in &deck.slides {
            assert!(!slide.id.is_empty());
            assert!(!slide.title.is_empty());
        }
        assert_eq!(deck.slides[1].title, "Slide 2");
        assert_eq!(deck.slides[2].id, "3");
        assert_eq!(deck.slides[3].title, "Slide 4");
        assert_eq!(deck.slides[3].id, "4");
        assert_eq!(deck.slides[4].id, "7");
        assert_eq!(deck.slides[4].content, "");
    }

    #[test]
    fn test_mixed_items_flatten_in_order() {
        let response = json!({
            "success": true,
            "data": {
                "slides": [{
                    "title": "Curve",
                    "content": [
                        { "type": "paragraph", "text": "Top end" },
                        { "type": "bullet", "text": "Goblin Guide" },
                        { "type": "bullet", "text": "Monastery Swiftspear" },
                        "loose line",
                        { "type": "bullet" }
                    ]
                }]
            }
        });

        let deck = ResponseNormalizer::new().normalize(&response);

        assert_eq!(
            deck.slides[0].content,
            "Top end\n• Goblin Guide\n• Monastery Swiftspear\nloose line\n• "
        );
    }

    #[test]
    fn test_fallback_text_fields() {
        let response = json!({
            "success": true,
            "data": {
                "slides": [
                    { "text": "from text", "body": "ignored" },
                    { "body": "from body" },
                    { "content": 12, "text": "numeric content falls back" }
                ]
            }
        });

        let deck = ResponseNormalizer::new().normalize(&response);

        assert_eq!(deck.slides[0].content, "from text");
        assert_eq!(deck.slides[0].raw_content, None);
        assert_eq!(deck.slides[1].content, "from body");
        assert_eq!(deck.slides[2].content, "numeric content falls back");
        assert_eq!(deck.slides[2].raw_content, Some(json!(12)));
    }

    #[test]
    fn test_null_content_is_not_kept_as_raw() {
        let deck = ResponseNormalizer::new().normalize(&json!({
            "success": true,
            "data": { "slides": [{ "title": "A", "content": null, "text": "fallback" }] }
        }));

        assert_eq!(deck.slides[0].raw_content, None);
        assert_eq!(deck.slides[0].content, "fallback");

        let text = serde_json::to_string(&deck).unwrap();
        assert_eq!(serde_json::from_str::<Deck>(&text).unwrap(), deck);
    }

    #[test]
    fn test_duplicate_ids_are_made_unique() {
        let deck = ResponseNormalizer::new().normalize(&json!([
            { "id": "2" },
            {},
            { "id": "2" },
            { "id": "2-2" }
        ]));

        let ids: Vec<&str> = deck.slides.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "2-2", "2-3", "2-2-2"]);
    }

    #[test]
    fn test_unique_ids_are_unchanged() {
        let deck = ResponseNormalizer::new().normalize(&json!([{ "id": "a" }, {}, { "id": 9 }]));

        let ids: Vec<&str> = deck.slides.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "2", "9"]);
    }

    #[test]
    fn test_legacy_array_uses_default_title() {
        let deck = ResponseNormalizer::new()
            .with_default_title("Untitled")
            .normalize(&json!([{ "title": "A", "content": "x" }]));

        assert_eq!(deck.title, "Untitled");
        assert_eq!(deck.slides[0], Slide::new("1", "A", "x").with_raw_content(json!("x")));
    }

    #[test]
    fn test_blank_deck_title_uses_default() {
        let deck = ResponseNormalizer::new().normalize(&json!({
            "success": true,
            "data": { "deckTitle": "   ", "slides": [{ "title": "A" }] }
        }));
        assert_eq!(deck.title, DEFAULT_DECK_TITLE);
    }

    #[test]
    fn test_classify_error_message() {
        let value = json!({ "success": false, "error": { "message": "quota exceeded" } });
        assert_eq!(ResponseShape::classify(&value).error_message(), Some("quota exceeded"));

        let value = json!({ "success": false, "error": "bad prompt" });
        assert_eq!(ResponseShape::classify(&value).error_message(), Some("bad prompt"));

        let value = json!([]);
        assert_eq!(ResponseShape::classify(&value), ResponseShape::LegacyArray(&[]));
        assert_eq!(ResponseShape::classify(&value).error_message(), None);
    }
}
