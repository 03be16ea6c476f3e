use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Upper bound on the character length of a lookup key.
pub const MAX_WORD_KEY_CHARS: usize = 100;

/// Normalized lookup key for a word or short phrase.
///
/// Always lowercase, trimmed, with internal whitespace collapsed to single
/// spaces. Construction rejects anything without at least one alphabetic
/// character, so purely numeric or punctuation-only strings never become keys.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WordKey(String);

impl WordKey {
    pub fn new(raw: &str) -> Option<Self> {
        let normalized = raw
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase();

        if normalized.is_empty() || normalized.chars().count() > MAX_WORD_KEY_CHARS {
            return None;
        }
        if !normalized.chars().any(char::is_alphabetic) {
            return None;
        }

        Some(WordKey(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A 2D point. Whether it is in client or page coordinates depends on where
/// it came from; anchor points handed to the transient UI are always page
/// coordinates (client rect plus scroll offsets).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Bounding rectangle of a selection, in client (viewport) coordinates,
/// captured at gesture time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn right(&self) -> f64 {
        self.x + self.width
    }
}

/// Current scroll offsets of the page, sampled at gesture time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub scroll_x: f64,
    pub scroll_y: f64,
}

/// How a selection event originated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectionSource {
    PointerSelection,
    DoubleClick,
    HighlightClick,
}

/// A resolved user gesture, consumed immediately by the interaction
/// controller. Never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectionEvent {
    pub raw_text: String,
    pub anchor: Point,
    pub source: SelectionSource,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Phonetic {
    pub uk: String,
    pub us: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AudioLinks {
    pub uk: String,
    pub us: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Definition {
    pub part_of_speech: String,
    pub definition: String,
    pub example: String,
    pub translation: String,
}

/// Dictionary payload for one word, in the fixed shape returned by the
/// lookup boundary. At most five definitions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordData {
    pub word: String,
    pub phonetic: Phonetic,
    pub audio: AudioLinks,
    pub definitions: Vec<Definition>,
}

/// One persisted collection entry for a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectedEntry {
    pub word: WordKey,
    pub data: WordData,
    pub collected_at: DateTime<Utc>,
}

/// Order entries most recently collected first, for listing surfaces.
pub fn newest_first(mut entries: Vec<CollectedEntry>) -> Vec<CollectedEntry> {
    entries.sort_by(|a, b| b.collected_at.cmp(&a.collected_at));
    entries
}
