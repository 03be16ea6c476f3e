//! Selection resolution.
//!
//! Turns raw gestures (a pointer text selection or a double-click on a text
//! node) into a normalized `WordKey`, or nothing when the gesture should be
//! ignored. Pure over the current document; never mutates it.

use crate::page::{Document, NodeId};
use crate::shared::error::{AppError, AppResult};
use crate::shared::types::{Point, Rect, WordKey, MAX_WORD_KEY_CHARS};
use unicode_segmentation::UnicodeSegmentation;

/// A pointer text selection, as captured by the host at gesture time.
#[derive(Debug, Clone)]
pub struct RawSelection {
    /// The selection's string content, before any normalization.
    pub text: String,
    /// True when the selection has no extent.
    pub collapsed: bool,
    /// Node the selection is anchored in.
    pub anchor_node: NodeId,
    /// Bounding rectangle in client coordinates.
    pub rect: Rect,
}

/// A double-click on a text node.
#[derive(Debug, Clone)]
pub struct DoubleClick {
    /// The text node under the cursor.
    pub node: NodeId,
    /// Byte offset of the click within the node's text.
    pub offset: usize,
    /// Click position in client coordinates.
    pub point: Point,
}

#[derive(Debug, Clone)]
pub enum Gesture {
    Selection(RawSelection),
    DoubleClick(DoubleClick),
}

/// Resolve a gesture to a lookup key, or `None` when it must be ignored.
pub fn resolve(doc: &Document, gesture: &Gesture) -> Option<WordKey> {
    match gesture {
        Gesture::Selection(selection) => resolve_selection(doc, selection),
        Gesture::DoubleClick(click) => resolve_double_click(doc, click),
    }
}

/// Resolve a gesture, classifying a non-resolving one as `InvalidSelection`
/// for callers that report errors across a host boundary instead of
/// branching on `Option`. Invalid selections are still silent: nothing is
/// surfaced to the user.
pub fn try_resolve(doc: &Document, gesture: &Gesture) -> AppResult<WordKey> {
    resolve(doc, gesture).ok_or(AppError::InvalidSelection)
}

fn resolve_selection(doc: &Document, selection: &RawSelection) -> Option<WordKey> {
    if selection.collapsed {
        return None;
    }
    let text = selection.text.trim();
    if text.is_empty() || text.chars().count() > MAX_WORD_KEY_CHARS {
        return None;
    }
    // Purely numeric, punctuation or whitespace content is not a word.
    if !text.chars().any(char::is_alphabetic) {
        return None;
    }
    // Never interfere with user-authored text.
    if doc.is_inside_editable(selection.anchor_node) {
        return None;
    }
    WordKey::new(text)
}

fn resolve_double_click(doc: &Document, click: &DoubleClick) -> Option<WordKey> {
    if doc.is_inside_editable(click.node) {
        return None;
    }
    let text = doc.text(click.node)?;
    let run = alphabetic_run_at(text, click.offset)?;
    // Single-character hits are noise.
    if run.chars().count() < 2 {
        return None;
    }
    WordKey::new(run)
}

/// The longest contiguous alphabetic run inside the word touching `offset`.
///
/// Double-clicking "hello123" anywhere in the token yields "hello": the token
/// touching the click is located with UAX #29 segmentation, then trailing or
/// embedded digits are discarded in favor of its longest alphabetic run.
fn alphabetic_run_at(text: &str, offset: usize) -> Option<&str> {
    let (start, word) = text
        .unicode_word_indices()
        .find(|(index, word)| offset >= *index && offset <= index + word.len())?;

    let mut best: Option<(usize, usize)> = None;
    let mut run_start: Option<usize> = None;
    for (i, ch) in word.char_indices().chain(std::iter::once((word.len(), ' '))) {
        if ch.is_alphabetic() {
            run_start.get_or_insert(i);
        } else if let Some(s) = run_start.take() {
            if best.map_or(true, |(bs, be)| i - s > be - bs) {
                best = Some((s, i));
            }
        }
    }

    best.map(|(s, e)| &text[start + s..start + e])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc_with_text(text: &str) -> (Document, NodeId) {
        let mut doc = Document::new();
        let p = doc.create_element("p");
        let t = doc.create_text(text);
        doc.append_child(doc.body(), p);
        doc.append_child(p, t);
        (doc, t)
    }

    fn selection(text: &str, anchor: NodeId) -> Gesture {
        Gesture::Selection(RawSelection {
            text: text.to_string(),
            collapsed: false,
            anchor_node: anchor,
            rect: Rect {
                x: 0.0,
                y: 0.0,
                width: 10.0,
                height: 10.0,
            },
        })
    }

    fn double_click(node: NodeId, offset: usize) -> Gesture {
        Gesture::DoubleClick(DoubleClick {
            node,
            offset,
            point: Point { x: 0.0, y: 0.0 },
        })
    }

    #[test]
    fn test_collapsed_selection_resolves_to_none() {
        let (doc, t) = doc_with_text("hello");
        let gesture = Gesture::Selection(RawSelection {
            text: String::new(),
            collapsed: true,
            anchor_node: t,
            rect: Rect {
                x: 0.0,
                y: 0.0,
                width: 0.0,
                height: 0.0,
            },
        });
        assert!(resolve(&doc, &gesture).is_none());
    }

    #[test]
    fn test_digits_punctuation_whitespace_rejected() {
        let (doc, t) = doc_with_text("irrelevant");
        for s in ["123", "12.5", "?!", "...", "  ", "12, 34!", "(555) 867-5309"] {
            assert!(resolve(&doc, &selection(s, t)).is_none(), "accepted {:?}", s);
        }
    }

    #[test]
    fn test_mixed_alphanumeric_selection_accepted() {
        // Contains alphabetic characters, so the digits/punctuation-only rule
        // does not apply; stored lowercased, otherwise unchanged.
        let (doc, t) = doc_with_text("irrelevant");
        let key = resolve(&doc, &selection("Hello123", t)).unwrap();
        assert_eq!(key.as_str(), "hello123");
    }

    #[test]
    fn test_over_length_selection_rejected() {
        let (doc, t) = doc_with_text("irrelevant");
        let long = "word ".repeat(30);
        assert!(resolve(&doc, &selection(&long, t)).is_none());
    }

    #[test]
    fn test_selection_in_editable_surface_rejected() {
        let mut doc = Document::new();
        let area = doc.create_element("textarea");
        let t = doc.create_text("typed words");
        doc.append_child(doc.body(), area);
        doc.append_child(area, t);
        assert!(resolve(&doc, &selection("typed", t)).is_none());
    }

    #[test]
    fn test_phrase_selection_normalized() {
        let (doc, t) = doc_with_text("irrelevant");
        let key = resolve(&doc, &selection("  Ice   Cream ", t)).unwrap();
        assert_eq!(key.as_str(), "ice cream");
    }

    #[test]
    fn test_double_click_extracts_lowercased_word() {
        let (doc, t) = doc_with_text("Something Wonderful happened");
        let key = resolve(&doc, &double_click(t, 12)).unwrap();
        assert_eq!(key.as_str(), "wonderful");
    }

    #[test]
    fn test_double_click_on_mixed_token_keeps_alphabetic_run() {
        // The extraction side of the boundary rule: digits are discarded.
        let (doc, t) = doc_with_text("see hello123 there");
        let key = resolve(&doc, &double_click(t, 6)).unwrap();
        assert_eq!(key.as_str(), "hello");
    }

    #[test]
    fn test_double_click_on_digits_resolves_to_none() {
        let (doc, t) = doc_with_text("call 8675309 now");
        assert!(resolve(&doc, &double_click(t, 7)).is_none());
    }

    #[test]
    fn test_double_click_single_character_rejected() {
        let (doc, t) = doc_with_text("a boat");
        assert!(resolve(&doc, &double_click(t, 0)).is_none());
    }

    #[test]
    fn test_double_click_in_editable_rejected() {
        let mut doc = Document::new();
        let div = doc.create_element("div");
        doc.set_content_editable(div, true);
        let t = doc.create_text("editable words");
        doc.append_child(doc.body(), div);
        doc.append_child(div, t);
        assert!(resolve(&doc, &double_click(t, 2)).is_none());
    }

    #[test]
    fn test_try_resolve_classifies_invalid_gestures() {
        let (doc, t) = doc_with_text("irrelevant");
        assert!(matches!(
            try_resolve(&doc, &selection("123", t)),
            Err(AppError::InvalidSelection)
        ));
        assert!(try_resolve(&doc, &selection("word", t)).is_ok());
    }

    #[test]
    fn test_alphabetic_run_picks_longest_in_token() {
        assert_eq!(alphabetic_run_at("ab12cdef", 0), Some("cdef"));
        assert_eq!(alphabetic_run_at("hello123", 7), Some("hello"));
        assert_eq!(alphabetic_run_at("42", 1), None);
    }
}
