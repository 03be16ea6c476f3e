//! Page document model
//!
//! The live document tree plus batched mutation observation. The engine in
//! `core` treats this as its host page surface.

pub mod dom;
pub mod observer;

pub use dom::{Document, ElementData, NodeId, MARKER_TAG};
pub use observer::{batch_adds_elements, MutationRecord};
