//! Subtree mutation records.
//!
//! Structural document changes accumulate into batches on the document
//! itself; the page session drains each batch and hands it to the highlight
//! engine. Delivery is always after the triggering change has fully applied,
//! and always a batch, mirroring how mutation observers deliver records on
//! real pages. Handlers must treat a batch as a trigger to re-scan, not as an
//! exact diff.

use super::dom::{Document, NodeId};

/// One observed structural change.
#[derive(Debug, Clone)]
pub enum MutationRecord {
    /// Children were added to or removed from `parent`.
    ChildrenChanged {
        parent: NodeId,
        added: Vec<NodeId>,
        removed: Vec<NodeId>,
    },
    /// A text node's character data changed.
    TextChanged { node: NodeId },
}

impl MutationRecord {
    /// Nodes added by this record, if any.
    pub fn added(&self) -> &[NodeId] {
        match self {
            MutationRecord::ChildrenChanged { added, .. } => added,
            MutationRecord::TextChanged { .. } => &[],
        }
    }
}

/// Whether any record in the batch added an element node. This is the
/// re-scan trigger: element insertions mean new subtrees of text may have
/// arrived.
pub fn batch_adds_elements(doc: &Document, batch: &[MutationRecord]) -> bool {
    batch
        .iter()
        .any(|record| record.added().iter().any(|&id| doc.is_element(id)))
}
