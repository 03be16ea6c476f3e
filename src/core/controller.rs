//! Interaction controller.
//!
//! Owns the transient-UI state machine: floating button, popup lifecycle,
//! lookup dispatch and the collection toggle. At most one popup exists at a
//! time; opening a new one tears the old one down first. A lookup completion
//! is applied only when the controller is still waiting for that exact
//! request, so a stale response can never overwrite a newer state.

use crate::core::highlight::CollectionSet;
use crate::core::lookup::LookupClient;
use crate::core::position;
use crate::shared::error::AppResult;
use crate::shared::events::{EventSink, UiEvent};
use crate::shared::settings::UserSettings;
use crate::shared::types::{CollectedEntry, Point, WordData, WordKey};
use crate::storage::CollectionStore;
use chrono::Utc;
use std::sync::Arc;

/// Message shown in the popup when a lookup fails, regardless of cause.
const LOOKUP_FAILED_MESSAGE: &str = "Failed to load word data";

/// Transient-UI state. One instance per page session.
#[derive(Debug, Clone, PartialEq)]
pub enum PopupState {
    Idle,
    ButtonVisible {
        word: WordKey,
        anchor: Point,
    },
    PopupLoading {
        word: WordKey,
        anchor: Point,
    },
    PopupReady {
        word: WordKey,
        anchor: Point,
        data: WordData,
    },
    PopupError {
        word: WordKey,
        anchor: Point,
        message: String,
    },
}

/// Handle for an in-flight lookup. Completions carry it back so the
/// controller can tell current requests from stale ones.
#[derive(Debug, Clone)]
pub struct LookupTicket {
    word: WordKey,
    generation: u64,
}

pub struct InteractionController {
    state: PopupState,
    collection: CollectionSet,
    lookup: Arc<dyn LookupClient>,
    store: Arc<dyn CollectionStore>,
    username: String,
    click_to_show_popup: bool,
    events: EventSink,
    generation: u64,
}

impl InteractionController {
    pub fn new(
        lookup: Arc<dyn LookupClient>,
        store: Arc<dyn CollectionStore>,
        collection: CollectionSet,
        settings: &UserSettings,
        events: EventSink,
    ) -> Self {
        Self {
            state: PopupState::Idle,
            collection,
            lookup,
            store,
            username: settings.username.clone(),
            click_to_show_popup: settings.click_to_show_popup,
            events,
            generation: 0,
        }
    }

    pub fn state(&self) -> &PopupState {
        &self.state
    }

    pub fn collection(&self) -> &CollectionSet {
        &self.collection
    }

    fn emit(&self, event: UiEvent) {
        (self.events)(event);
    }

    /// Project the user's stored entries into the collection set. Store
    /// failures degrade to an empty collection for this session.
    pub async fn load_collection(&mut self) {
        if self.username.is_empty() {
            eprintln!("[Controller] No username set; starting with an empty collection");
            return;
        }
        match self.store.get(&self.username).await {
            Ok(entries) => {
                self.collection.replace(entries.into_iter().map(|e| e.word));
                println!(
                    "[Controller] Loaded {} collected word(s) for '{}'",
                    self.collection.len(),
                    self.username
                );
            }
            Err(e) => {
                eprintln!("[Controller] Store unavailable, highlights disabled: {}", e);
            }
        }
    }

    /// A valid pointer selection or double-click resolved to `word`. Shows
    /// the floating button; any open popup is torn down first.
    pub fn selection_detected(&mut self, word: WordKey, anchor: Point) {
        self.teardown_popup();
        self.state = PopupState::ButtonVisible {
            word,
            anchor,
        };
        self.emit(UiEvent::ButtonShown { anchor });
    }

    /// The selection collapsed, became invalid, or the user moved on.
    pub fn selection_cleared(&mut self) {
        if matches!(self.state, PopupState::ButtonVisible { .. }) {
            self.state = PopupState::Idle;
            self.emit(UiEvent::ButtonHidden);
        }
    }

    /// The floating button was activated: open the popup below it and start
    /// the lookup. Returns the ticket for the in-flight request, or `None`
    /// when no button is showing.
    pub fn button_activated(&mut self) -> Option<LookupTicket> {
        let (word, button_anchor) = match &self.state {
            PopupState::ButtonVisible { word, anchor } => (word.clone(), *anchor),
            _ => return None,
        };
        self.emit(UiEvent::ButtonHidden);
        self.emit(UiEvent::ClearSelection);
        Some(self.begin_lookup(word, position::popup_anchor(&button_anchor)))
    }

    /// A highlight marker was clicked: open the popup right there, skipping
    /// the button step. Gated by the click-to-show-popup setting.
    pub fn highlight_clicked(&mut self, word: WordKey, anchor: Point) -> Option<LookupTicket> {
        if !self.click_to_show_popup {
            return None;
        }
        if matches!(self.state, PopupState::ButtonVisible { .. }) {
            self.emit(UiEvent::ButtonHidden);
        }
        self.teardown_popup();
        Some(self.begin_lookup(word, anchor))
    }

    fn begin_lookup(&mut self, word: WordKey, anchor: Point) -> LookupTicket {
        self.generation += 1;
        self.state = PopupState::PopupLoading {
            word: word.clone(),
            anchor,
        };
        self.emit(UiEvent::PopupOpened {
            word: word.clone(),
            anchor,
        });
        LookupTicket {
            word,
            generation: self.generation,
        }
    }

    /// Apply a lookup completion. Dropped when the controller has moved on to
    /// a different word or torn the popup down since the request started.
    pub fn apply_lookup(&mut self, ticket: &LookupTicket, result: AppResult<WordData>) {
        let (current_word, anchor) = match &self.state {
            PopupState::PopupLoading { word, anchor } => (word.clone(), *anchor),
            _ => {
                println!(
                    "[Controller] Discarding lookup result for '{}': popup no longer loading",
                    ticket.word
                );
                return;
            }
        };
        if ticket.generation != self.generation || ticket.word != current_word {
            println!(
                "[Controller] Discarding stale lookup result for '{}'",
                ticket.word
            );
            return;
        }
        match result {
            Ok(data) => {
                self.state = PopupState::PopupReady {
                    word: current_word.clone(),
                    anchor,
                    data,
                };
                self.emit(UiEvent::PopupReady { word: current_word });
            }
            Err(e) => {
                eprintln!("[Controller] Lookup failed for '{}': {}", current_word, e);
                self.state = PopupState::PopupError {
                    word: current_word.clone(),
                    anchor,
                    message: LOOKUP_FAILED_MESSAGE.to_string(),
                };
                self.emit(UiEvent::PopupFailed {
                    word: current_word,
                    message: LOOKUP_FAILED_MESSAGE.to_string(),
                });
            }
        }
    }

    /// Run the lookup for a ticket to completion and apply the result.
    pub async fn run_lookup(&mut self, ticket: LookupTicket) {
        let result = self.lookup.fetch(ticket.word.as_str()).await;
        self.apply_lookup(&ticket, result);
    }

    /// The popup was dismissed: outside click or explicit close.
    pub fn popup_closed(&mut self) {
        self.teardown_popup();
    }

    fn teardown_popup(&mut self) {
        if matches!(
            self.state,
            PopupState::PopupLoading { .. }
                | PopupState::PopupReady { .. }
                | PopupState::PopupError { .. }
        ) {
            // Invalidate any in-flight lookup for the dismissed popup.
            self.generation += 1;
            self.state = PopupState::Idle;
            self.emit(UiEvent::PopupClosed);
        }
    }

    /// Toggle the popup's word in the collection. Available only while word
    /// data is loaded. The in-memory set always updates; persistence failures
    /// are logged and skipped, so the session keeps working unpersisted.
    pub async fn toggle_collection(&mut self) {
        let (word, data) = match &self.state {
            PopupState::PopupReady { word, data, .. } => (word.clone(), data.clone()),
            _ => return,
        };

        if self.collection.contains(&word) {
            self.collection.remove(&word);
            self.persist_remove(&word).await;
        } else {
            self.collection.insert(word.clone());
            self.persist_add(CollectedEntry {
                word,
                data,
                collected_at: Utc::now(),
            })
            .await;
        }
    }

    /// Remove a word from the collection outside the popup flow (the
    /// collection list surface). Existing page marks stay until reload.
    pub async fn remove_word(&mut self, word: &WordKey) {
        self.collection.remove(word);
        self.persist_remove(word).await;
    }

    async fn persist_add(&self, entry: CollectedEntry) {
        if self.username.is_empty() {
            eprintln!("[Controller] No username set; collection not persisted");
            return;
        }
        let result: AppResult<()> = async {
            let mut entries = self.store.get(&self.username).await?;
            if entries.iter().any(|e| e.word == entry.word) {
                return Ok(());
            }
            entries.push(entry);
            self.store.set(&self.username, &entries).await
        }
        .await;
        if let Err(e) = result {
            eprintln!("[Controller] Failed to persist collection add: {}", e);
        }
    }

    async fn persist_remove(&self, word: &WordKey) {
        if self.username.is_empty() {
            eprintln!("[Controller] No username set; collection not persisted");
            return;
        }
        let result: AppResult<()> = async {
            let entries = self.store.get(&self.username).await?;
            let filtered: Vec<CollectedEntry> =
                entries.into_iter().filter(|e| &e.word != word).collect();
            self.store.set(&self.username, &filtered).await
        }
        .await;
        if let Err(e) = result {
            eprintln!("[Controller] Failed to persist collection removal: {}", e);
        }
    }
}
