//! Transient-UI lifecycle events.
//!
//! The floating button and lookup popup are rendered by the host; the
//! controller drives their lifecycle by emitting these events through a sink
//! the host installs. The core never touches presentation itself.

use super::types::{Point, WordKey};
use serde::Serialize;
use std::sync::Arc;

/// Events the interaction controller emits toward the presentation layer.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "payload")]
pub enum UiEvent {
    /// Show the floating trigger button at the given page anchor.
    ButtonShown { anchor: Point },
    /// Hide the floating trigger button.
    ButtonHidden,
    /// The host should collapse the live text selection.
    ClearSelection,
    /// A popup opened and is loading word data.
    PopupOpened { word: WordKey, anchor: Point },
    /// The popup's lookup resolved.
    PopupReady { word: WordKey },
    /// The popup's lookup failed; `message` is user-visible.
    PopupFailed { word: WordKey, message: String },
    /// The popup was torn down.
    PopupClosed,
}

/// Host-installed event sink.
pub type EventSink = Arc<dyn Fn(UiEvent) + Send + Sync>;

/// A sink that drops every event, for headless use and tests.
pub fn null_sink() -> EventSink {
    Arc::new(|_| {})
}
