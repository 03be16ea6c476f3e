//! Highlight engine.
//!
//! Keeps every occurrence of a collected word wrapped in a clickable marker
//! element across the live document, including content that arrives after the
//! initial pass. Scanning is a single multi-pattern pass per text node
//! (Aho-Corasick, leftmost-longest, ASCII case-insensitive) with whole-word
//! filtering on the match edges, so cost stays bounded as the collection
//! grows. Marked text is detected through the typed marker field and skipped,
//! which makes repeated passes idempotent and keeps the mutation-triggered
//! re-scan from feeding on its own output.
//!
//! The engine is additive within a document's lifetime: removing a word from
//! the collection stops future wrapping but does not scrub marks already in
//! the page. A fresh document always starts unmarked.

use crate::page::{batch_adds_elements, Document, MutationRecord, NodeId};
use crate::shared::types::{Point, SelectionEvent, SelectionSource, WordKey};
use aho_corasick::{AhoCorasick, AhoCorasickBuilder, MatchKind};
use std::collections::BTreeSet;
use std::sync::{Arc, Mutex, MutexGuard};

/// Elements whose text is never rendered and never scanned.
const UNRENDERED_TAGS: [&str; 3] = ["script", "style", "noscript"];

/// The set of collected word keys that drives highlighting.
///
/// A projection of the authoritative store for the current user. The
/// interaction controller is the single writer; the engine reads an immutable
/// snapshot per scan, so it can never observe a half-applied update. The
/// version counter lets the engine reuse its automaton while the set is
/// unchanged.
#[derive(Clone)]
pub struct CollectionSet {
    inner: Arc<Mutex<SetInner>>,
}

struct SetInner {
    words: BTreeSet<WordKey>,
    version: u64,
}

impl CollectionSet {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(SetInner {
                words: BTreeSet::new(),
                version: 0,
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, SetInner> {
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                eprintln!("[CollectionSet] Mutex poisoned, recovering...");
                poisoned.into_inner()
            }
        }
    }

    /// Replace the whole set with a fresh projection of the store.
    pub fn replace(&self, words: impl IntoIterator<Item = WordKey>) {
        let mut inner = self.lock();
        inner.words = words.into_iter().collect();
        inner.version += 1;
    }

    pub fn insert(&self, word: WordKey) -> bool {
        let mut inner = self.lock();
        let inserted = inner.words.insert(word);
        if inserted {
            inner.version += 1;
        }
        inserted
    }

    pub fn remove(&self, word: &WordKey) -> bool {
        let mut inner = self.lock();
        let removed = inner.words.remove(word);
        if removed {
            inner.version += 1;
        }
        removed
    }

    pub fn contains(&self, word: &WordKey) -> bool {
        self.lock().words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.lock().words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().words.is_empty()
    }

    /// Version plus sorted contents, taken under one lock.
    fn snapshot(&self) -> (u64, Vec<WordKey>) {
        let inner = self.lock();
        (inner.version, inner.words.iter().cloned().collect())
    }
}

impl Default for CollectionSet {
    fn default() -> Self {
        Self::new()
    }
}

struct CachedMatcher {
    version: u64,
    words: Vec<WordKey>,
    automaton: AhoCorasick,
}

pub struct HighlightEngine {
    collection: CollectionSet,
    cached: Option<CachedMatcher>,
}

impl HighlightEngine {
    pub fn new(collection: CollectionSet) -> Self {
        Self {
            collection,
            cached: None,
        }
    }

    pub fn collection(&self) -> &CollectionSet {
        &self.collection
    }

    /// Full pass: wrap every unwrapped whole-word occurrence of a collected
    /// word under the document body. Returns the number of marks created.
    pub fn sync_all(&mut self, doc: &mut Document) -> usize {
        self.refresh_matcher();
        let Some(cache) = self.cached.as_ref() else {
            return 0;
        };

        let candidates: Vec<NodeId> = doc
            .text_nodes_under(doc.body())
            .into_iter()
            .filter(|&id| Self::eligible(doc, id))
            .collect();

        let mut marks = 0;
        for id in candidates {
            marks += Self::wrap_matches(doc, id, &cache.automaton, &cache.words);
        }
        if marks > 0 {
            println!("[HighlightEngine] Wrapped {} occurrence(s)", marks);
        }
        marks
    }

    /// Mutation-batch handler: re-run the full pass when element nodes were
    /// added. Batches that only touch character data are ignored.
    pub fn handle_mutations(&mut self, doc: &mut Document, batch: &[MutationRecord]) -> usize {
        if !batch_adds_elements(doc, batch) {
            return 0;
        }
        self.sync_all(doc)
    }

    /// The marker key at a click target, if the click landed on a highlight.
    pub fn marker_at(doc: &Document, node: NodeId) -> Option<WordKey> {
        doc.marker_for(node).cloned()
    }

    /// Build the selection event a click on a highlight marker produces.
    pub fn highlight_click(doc: &Document, node: NodeId, anchor: Point) -> Option<SelectionEvent> {
        let word = Self::marker_at(doc, node)?;
        Some(SelectionEvent {
            raw_text: word.to_string(),
            anchor,
            source: SelectionSource::HighlightClick,
        })
    }

    /// Rebuild the automaton only when the collection set has changed.
    fn refresh_matcher(&mut self) {
        let (version, words) = self.collection.snapshot();
        if words.is_empty() {
            self.cached = None;
            return;
        }
        if let Some(cache) = &self.cached {
            if cache.version == version {
                return;
            }
        }

        let patterns: Vec<&str> = words.iter().map(|w| w.as_str()).collect();
        match AhoCorasickBuilder::new()
            .match_kind(MatchKind::LeftmostLongest)
            .ascii_case_insensitive(true)
            .build(&patterns)
        {
            Ok(automaton) => {
                self.cached = Some(CachedMatcher {
                    version,
                    words,
                    automaton,
                });
            }
            Err(e) => {
                eprintln!("[HighlightEngine] Failed to build matcher: {}", e);
                self.cached = None;
            }
        }
    }

    /// A text node is scanned only when nothing above it disqualifies it:
    /// unrendered containers, existing markers, editable surfaces.
    fn eligible(doc: &Document, id: NodeId) -> bool {
        let mut current = doc.parent(id);
        while let Some(node) = current {
            if let Some(el) = doc.element(node) {
                if el.marker.is_some() || el.is_editable() {
                    return false;
                }
                if UNRENDERED_TAGS.contains(&el.tag.as_str()) {
                    return false;
                }
            }
            current = doc.parent(node);
        }
        true
    }

    /// Scan one text node and replace it with a marked-up fragment when any
    /// collected word occurs in it. All collected words are handled in the
    /// single pass. Returns the number of marks created.
    fn wrap_matches(
        doc: &mut Document,
        node: NodeId,
        automaton: &AhoCorasick,
        words: &[WordKey],
    ) -> usize {
        let text = match doc.text(node) {
            Some(t) => t.to_string(),
            None => return 0,
        };

        let mut spans: Vec<(usize, usize, usize)> = Vec::new();
        for m in automaton.find_iter(text.as_str()) {
            if has_word_boundaries(&text, m.start(), m.end()) {
                spans.push((m.start(), m.end(), m.pattern().as_usize()));
            }
        }
        if spans.is_empty() {
            return 0;
        }

        let mut fragment = Vec::with_capacity(spans.len() * 2 + 1);
        let mut cursor = 0;
        for &(start, end, pattern) in &spans {
            if start > cursor {
                let lead = doc.create_text(&text[cursor..start]);
                fragment.push(lead);
            }
            let marker = doc.create_marker(words[pattern].clone(), &text[start..end]);
            fragment.push(marker);
            cursor = end;
        }
        if cursor < text.len() {
            let tail = doc.create_text(&text[cursor..]);
            fragment.push(tail);
        }

        doc.replace_with_fragment(node, fragment);
        spans.len()
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Whole-word check on the edges of a candidate match.
fn has_word_boundaries(text: &str, start: usize, end: usize) -> bool {
    let before_ok = text[..start]
        .chars()
        .next_back()
        .map_or(true, |c| !is_word_char(c));
    let after_ok = text[end..].chars().next().map_or(true, |c| !is_word_char(c));
    before_ok && after_ok
}
