//! Page session.
//!
//! Wires one document to the highlight engine and the interaction
//! controller, and is the entry point the host drives: gestures come in
//! here, mutation batches get pumped from here. One session per page.

use crate::core::controller::InteractionController;
use crate::core::highlight::{CollectionSet, HighlightEngine};
use crate::core::lookup::LookupClient;
use crate::core::position;
use crate::core::selection::{self, DoubleClick, Gesture, RawSelection};
use crate::page::{Document, NodeId};
use crate::shared::events::EventSink;
use crate::shared::settings::UserSettings;
use crate::shared::types::{Point, SelectionEvent, SelectionSource, Viewport, WordKey};
use crate::storage::CollectionStore;
use std::sync::Arc;

/// Upper bound on consecutive reconcile passes in one pump. The marker-skip
/// rule makes the engine reach a fixpoint after one extra pass; the cap only
/// guards against a runaway host feeding mutations from a handler.
const MAX_RECONCILE_PASSES: usize = 8;

pub struct PageSession {
    pub document: Document,
    engine: HighlightEngine,
    pub controller: InteractionController,
    settings: UserSettings,
    viewport: Viewport,
}

impl PageSession {
    pub fn new(
        document: Document,
        lookup: Arc<dyn LookupClient>,
        store: Arc<dyn CollectionStore>,
        settings: UserSettings,
        events: EventSink,
    ) -> Self {
        let collection = CollectionSet::new();
        let engine = HighlightEngine::new(collection.clone());
        let controller = InteractionController::new(lookup, store, collection, &settings, events);
        Self {
            document,
            engine,
            controller,
            settings,
            viewport: Viewport::default(),
        }
    }

    pub fn settings(&self) -> &UserSettings {
        &self.settings
    }

    /// Record the scroll position sampled with the next gesture.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Load the user's collection and run the initial highlight pass.
    pub async fn start(&mut self) {
        self.controller.load_collection().await;
        self.engine.sync_all(&mut self.document);
        self.reconcile();
    }

    /// Drain pending mutation batches into the engine until the document is
    /// quiet. Call after the host mutates the document.
    pub fn reconcile(&mut self) {
        for _ in 0..MAX_RECONCILE_PASSES {
            let batch = self.document.take_mutations();
            if batch.is_empty() {
                return;
            }
            self.engine.handle_mutations(&mut self.document, &batch);
        }
        eprintln!("[PageSession] Reconcile pass limit reached; remaining mutations deferred");
    }

    /// A pointer selection settled (mouseup). Invalid selections hide the
    /// button rather than leaving a stale one up.
    pub fn pointer_selection(&mut self, raw: RawSelection) {
        let gesture = Gesture::Selection(raw.clone());
        match selection::resolve(&self.document, &gesture) {
            Some(word) => {
                let event = SelectionEvent {
                    raw_text: raw.text,
                    anchor: position::selection_anchor(&raw.rect, &self.viewport),
                    source: SelectionSource::PointerSelection,
                };
                self.controller.selection_detected(word, event.anchor);
            }
            None => self.controller.selection_cleared(),
        }
    }

    /// A double-click on a text node.
    pub fn double_click(&mut self, raw: DoubleClick) {
        let gesture = Gesture::DoubleClick(raw.clone());
        if let Some(word) = selection::resolve(&self.document, &gesture) {
            let event = SelectionEvent {
                raw_text: word.to_string(),
                anchor: position::double_click_anchor(&raw.point, &self.viewport),
                source: SelectionSource::DoubleClick,
            };
            self.controller.selection_detected(word, event.anchor);
        }
    }

    /// The floating button was clicked: open the popup and run the lookup.
    pub async fn activate_button(&mut self) {
        if let Some(ticket) = self.controller.button_activated() {
            self.controller.run_lookup(ticket).await;
        }
    }

    /// A plain click somewhere in the document. Clicks on highlight markers
    /// open the popup for the bound word; anything else counts as an outside
    /// interaction and tears the transient UI down.
    pub async fn click(&mut self, target: Option<NodeId>, point: Point) {
        if let Some(node) = target {
            let anchor = position::highlight_click_anchor(&point, &self.viewport);
            if let Some(event) = HighlightEngine::highlight_click(&self.document, node, anchor) {
                self.handle_highlight_event(event).await;
                return;
            }
        }
        self.controller.popup_closed();
        self.controller.selection_cleared();
    }

    async fn handle_highlight_event(&mut self, event: SelectionEvent) {
        debug_assert_eq!(event.source, SelectionSource::HighlightClick);
        let Some(word) = WordKey::new(&event.raw_text) else {
            return;
        };
        if let Some(ticket) = self.controller.highlight_clicked(word, event.anchor) {
            self.controller.run_lookup(ticket).await;
        }
    }

    /// Toggle the popup's word in the collection, then re-run the highlight
    /// pass so a newly added word shows up immediately. Removals stay
    /// additive-only: existing marks are left alone.
    pub async fn toggle_collection(&mut self) {
        self.controller.toggle_collection().await;
        self.engine.sync_all(&mut self.document);
        self.reconcile();
    }
}
