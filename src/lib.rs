//! wordvault
//!
//! Select a word on a page, look it up, collect it, and keep every collected
//! word highlighted and clickable as the page keeps changing. The crate is
//! the engine behind that flow: the host supplies the document, the gesture
//! stream and the presentation chrome; everything between lives here.
//!
//! Typical wiring:
//!
//! ```no_run
//! use std::sync::Arc;
//! use wordvault::core::{DictionaryApiClient, PageSession};
//! use wordvault::page::Document;
//! use wordvault::shared::events::null_sink;
//! use wordvault::shared::settings::UserSettings;
//! use wordvault::storage::open_store;
//!
//! # async fn run() {
//! let settings = UserSettings::load().await.unwrap_or_default();
//! let mut session = PageSession::new(
//!     Document::new(),
//!     Arc::new(DictionaryApiClient::new()),
//!     open_store(),
//!     settings,
//!     null_sink(),
//! );
//! session.start().await;
//! # }
//! ```

pub mod core;
pub mod export;
pub mod page;
pub mod shared;
pub mod storage;

pub use crate::core::{CollectionSet, HighlightEngine, InteractionController, PageSession, PopupState};
pub use crate::page::{Document, NodeId};
pub use crate::shared::error::{AppError, AppResult};
pub use crate::shared::types::{CollectedEntry, SelectionEvent, SelectionSource, WordData, WordKey};
