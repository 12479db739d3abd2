//! Plain-text rendering of slides for terminal display.
//!
//! Bullet lines get a hanging indent, paragraphs are printed as-is and
//! blank lines become spacers.

use crate::types::{Deck, Slide, BULLET_MARKER};
use crate::SlideNavigator;
use regex::Regex;
use std::sync::LazyLock;

/// Matches a bullet line and captures its text.
static BULLET_LINE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*•\s*(.*?)\s*$").unwrap());

/// Maximum characters of a slide title shown in the thumbnail strip.
const STRIP_TITLE_WIDTH: usize = 24;

/// One display line of slide content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentLine<'a> {
    /// A line starting with the bullet marker; holds the text after it.
    Bullet(&'a str),
    /// A non-blank line without a bullet marker.
    Paragraph(&'a str),
    /// A blank line.
    Spacer,
}

/// Classify each line of slide content.
pub fn content_lines(content: &str) -> Vec<ContentLine<'_>> {
    content
        .split('\n')
        .map(|line| {
            if let Some(caps) = BULLET_LINE_REGEX.captures(line) {
                ContentLine::Bullet(caps.get(1).map_or("", |m| m.as_str()))
            } else if line.trim().is_empty() {
                ContentLine::Spacer
            } else {
                ContentLine::Paragraph(line)
            }
        })
        .collect()
}

/// Render the body of a single slide: its title followed by its content.
pub fn render_slide_body(slide: &Slide) -> String {
    let mut out = String::new();
    out.push_str(&slide.title);
    out.push('\n');
    out.push_str(&"=".repeat(slide.title.chars().count().max(1)));
    out.push('\n');

    for line in content_lines(&slide.content) {
        match line {
            ContentLine::Bullet(text) => {
                out.push_str("  ");
                out.push(BULLET_MARKER);
                out.push(' ');
                out.push_str(text);
            }
            ContentLine::Paragraph(text) => out.push_str(text),
            ContentLine::Spacer => {}
        }
        out.push('\n');
    }

    out
}

/// Render the current slide with the deck title and position indicator.
pub fn render_slide(deck: &Deck, navigator: &SlideNavigator) -> String {
    let Some(slide) = deck.slide(navigator.cursor()) else {
        return render_empty_state();
    };

    let mut out = format!(
        "{}    Slide {} of {}{}\n\n",
        deck.title,
        navigator.cursor() + 1,
        deck.len(),
        if navigator.is_editing() { "  [editing]" } else { "" }
    );
    out.push_str(&render_slide_body(slide));
    out
}

/// Render the thumbnail strip: numbered, truncated titles with the current
/// slide bracketed.
pub fn render_strip(deck: &Deck, current: usize) -> String {
    deck.slides
        .iter()
        .enumerate()
        .map(|(idx, slide)| {
            let label = format!("{} {}", idx + 1, truncate(&slide.title, STRIP_TITLE_WIDTH));
            if idx == current {
                format!("[{}]", label)
            } else {
                format!(" {} ", label)
            }
        })
        .collect::<Vec<_>>()
        .join("|")
}

/// Message shown when no deck is available.
pub fn render_empty_state() -> String {
    "No slides found\nPlease generate a deck first.\n".to_string()
}

/// Truncate to `width` characters, appending an ellipsis when cut.
fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
    cut.push('…');
    cut
}
