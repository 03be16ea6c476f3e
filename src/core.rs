//! Engine core
//!
//! Selection resolution, anchor computation, highlighting, the transient-UI
//! state machine, the dictionary lookup boundary, and the session glue that
//! ties them to one document.

pub mod controller;
pub mod highlight;
pub mod lookup;
pub mod position;
pub mod selection;
pub mod session;

pub use controller::{InteractionController, LookupTicket, PopupState};
pub use highlight::{CollectionSet, HighlightEngine};
pub use lookup::{DictionaryApiClient, LookupClient};
pub use selection::{DoubleClick, Gesture, RawSelection};
pub use session::PageSession;
