//! In-memory document tree the highlight engine operates on.
//!
//! An arena of element and text nodes. Structural changes go through
//! `Document` methods so every change lands in the mutation journal, which is
//! how observers learn about new content. Node ids are stable for the life of
//! the document; detached nodes stay in the arena (documents are page-lifetime
//! bound, so this never accumulates across navigations).

use super::observer::MutationRecord;
use crate::shared::types::WordKey;

/// Tag used for highlight marker elements.
pub const MARKER_TAG: &str = "mark";

/// Tags whose contents are user-authored text and must never be touched.
const EDITABLE_TAGS: [&str; 2] = ["input", "textarea"];

/// Handle to a node in a `Document` arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug)]
pub struct ElementData {
    pub tag: String,
    /// True for contenteditable surfaces.
    pub content_editable: bool,
    /// Set when this element is a highlight marker; carries the matched key.
    /// A typed field rather than a class-name convention, so "already marked"
    /// detection cannot drift from styling.
    pub marker: Option<WordKey>,
    children: Vec<NodeId>,
}

impl ElementData {
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn is_editable(&self) -> bool {
        self.content_editable || EDITABLE_TAGS.contains(&self.tag.as_str())
    }
}

#[derive(Debug)]
enum NodeData {
    Element(ElementData),
    Text(String),
}

#[derive(Debug)]
struct Node {
    parent: Option<NodeId>,
    data: NodeData,
}

pub struct Document {
    nodes: Vec<Node>,
    body: NodeId,
    journal: Vec<MutationRecord>,
}

impl Document {
    /// Create an empty document with a body element as root.
    pub fn new() -> Self {
        let mut doc = Self {
            nodes: Vec::new(),
            body: NodeId(0),
            journal: Vec::new(),
        };
        doc.body = doc.push_node(NodeData::Element(ElementData {
            tag: "body".to_string(),
            content_editable: false,
            marker: None,
            children: Vec::new(),
        }));
        doc
    }

    pub fn body(&self) -> NodeId {
        self.body
    }

    fn push_node(&mut self, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node { parent: None, data });
        id
    }

    /// Create a detached element node.
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.push_node(NodeData::Element(ElementData {
            tag: tag.to_lowercase(),
            content_editable: false,
            marker: None,
            children: Vec::new(),
        }))
    }

    /// Create a detached text node.
    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.push_node(NodeData::Text(text.to_string()))
    }

    /// Create a detached highlight marker wrapping `text`, bound to `word`.
    pub fn create_marker(&mut self, word: WordKey, text: &str) -> NodeId {
        let child = self.create_text(text);
        let marker = self.push_node(NodeData::Element(ElementData {
            tag: MARKER_TAG.to_string(),
            content_editable: false,
            marker: Some(word),
            children: vec![child],
        }));
        self.nodes[child.0].parent = Some(marker);
        marker
    }

    /// Mark an element as a contenteditable surface.
    pub fn set_content_editable(&mut self, id: NodeId, editable: bool) {
        if let NodeData::Element(el) = &mut self.nodes[id.0].data {
            el.content_editable = editable;
        }
    }

    /// Attach a detached node as the last child of `parent`.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        match &mut self.nodes[parent.0].data {
            NodeData::Element(el) => el.children.push(child),
            NodeData::Text(_) => panic!("text nodes cannot have children"),
        }
        self.nodes[child.0].parent = Some(parent);
        self.journal.push(MutationRecord::ChildrenChanged {
            parent,
            added: vec![child],
            removed: Vec::new(),
        });
    }

    /// Replace an attached node with a sequence of nodes, in place.
    ///
    /// This is how the highlight pass swaps a text node for the fragment of
    /// plain-text pieces and marker elements produced from it.
    pub fn replace_with_fragment(&mut self, target: NodeId, fragment: Vec<NodeId>) {
        let parent = self.nodes[target.0]
            .parent
            .expect("cannot replace a detached node");
        let position = match &self.nodes[parent.0].data {
            NodeData::Element(el) => el
                .children
                .iter()
                .position(|&c| c == target)
                .expect("target not found under its parent"),
            NodeData::Text(_) => unreachable!("parent is always an element"),
        };

        if let NodeData::Element(el) = &mut self.nodes[parent.0].data {
            el.children.splice(position..=position, fragment.iter().copied());
        }
        self.nodes[target.0].parent = None;
        for &id in &fragment {
            self.nodes[id.0].parent = Some(parent);
        }

        self.journal.push(MutationRecord::ChildrenChanged {
            parent,
            added: fragment,
            removed: vec![target],
        });
    }

    /// Overwrite the content of a text node.
    pub fn set_text(&mut self, id: NodeId, text: &str) {
        if let NodeData::Text(content) = &mut self.nodes[id.0].data {
            *content = text.to_string();
            self.journal.push(MutationRecord::TextChanged { node: id });
        }
    }

    pub fn text(&self, id: NodeId) -> Option<&str> {
        match &self.nodes[id.0].data {
            NodeData::Text(content) => Some(content),
            NodeData::Element(_) => None,
        }
    }

    pub fn element(&self, id: NodeId) -> Option<&ElementData> {
        match &self.nodes[id.0].data {
            NodeData::Element(el) => Some(el),
            NodeData::Text(_) => None,
        }
    }

    pub fn is_element(&self, id: NodeId) -> bool {
        matches!(self.nodes[id.0].data, NodeData::Element(_))
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    /// The marker key on this node or its nearest marker ancestor, if any.
    pub fn marker_for(&self, id: NodeId) -> Option<&WordKey> {
        let mut current = Some(id);
        while let Some(node) = current {
            if let Some(el) = self.element(node) {
                if let Some(word) = &el.marker {
                    return Some(word);
                }
            }
            current = self.parent(node);
        }
        None
    }

    /// Whether this node sits inside an editable surface (itself included).
    pub fn is_inside_editable(&self, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(node) = current {
            if let Some(el) = self.element(node) {
                if el.is_editable() {
                    return true;
                }
            }
            current = self.parent(node);
        }
        false
    }

    /// All text nodes under `root` in document order.
    pub fn text_nodes_under(&self, root: NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            match &self.nodes[id.0].data {
                NodeData::Text(_) => result.push(id),
                NodeData::Element(el) => {
                    for &child in el.children.iter().rev() {
                        stack.push(child);
                    }
                }
            }
        }
        result
    }

    /// Concatenated text content under `root`.
    pub fn collect_text(&self, root: NodeId) -> String {
        self.text_nodes_under(root)
            .iter()
            .filter_map(|&id| self.text(id))
            .collect()
    }

    /// Drain the accumulated mutation batch.
    ///
    /// Mutation delivery is batched: observers see the records only when the
    /// driver drains them, never mid-change.
    pub fn take_mutations(&mut self) -> Vec<MutationRecord> {
        std::mem::take(&mut self.journal)
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(s: &str) -> WordKey {
        WordKey::new(s).unwrap()
    }

    #[test]
    fn test_build_and_collect_text() {
        let mut doc = Document::new();
        let p = doc.create_element("p");
        let t = doc.create_text("hello world");
        doc.append_child(doc.body(), p);
        doc.append_child(p, t);

        assert_eq!(doc.collect_text(doc.body()), "hello world");
        assert_eq!(doc.text_nodes_under(doc.body()), vec![t]);
    }

    #[test]
    fn test_replace_with_fragment_preserves_order() {
        let mut doc = Document::new();
        let p = doc.create_element("p");
        let t = doc.create_text("an apple a day");
        doc.append_child(doc.body(), p);
        doc.append_child(p, t);
        doc.take_mutations();

        let before = doc.create_text("an ");
        let marker = doc.create_marker(word("apple"), "apple");
        let after = doc.create_text(" a day");
        doc.replace_with_fragment(t, vec![before, marker, after]);

        assert_eq!(doc.collect_text(doc.body()), "an apple a day");
        assert!(doc.parent(t).is_none());
        assert_eq!(doc.element(p).unwrap().children().len(), 3);

        let batch = doc.take_mutations();
        assert_eq!(batch.len(), 1);
    }

    #[test]
    fn test_marker_for_walks_ancestors() {
        let mut doc = Document::new();
        let marker = doc.create_marker(word("apple"), "Apple");
        doc.append_child(doc.body(), marker);

        let inner_text = doc.element(marker).unwrap().children()[0];
        assert_eq!(doc.marker_for(inner_text).unwrap().as_str(), "apple");
        assert_eq!(doc.marker_for(marker).unwrap().as_str(), "apple");
        assert!(doc.marker_for(doc.body()).is_none());
    }

    #[test]
    fn test_editable_detection() {
        let mut doc = Document::new();
        let area = doc.create_element("textarea");
        let t = doc.create_text("typed text");
        doc.append_child(doc.body(), area);
        doc.append_child(area, t);

        let div = doc.create_element("div");
        doc.set_content_editable(div, true);
        let t2 = doc.create_text("editable div");
        doc.append_child(doc.body(), div);
        doc.append_child(div, t2);

        let plain = doc.create_text("plain");
        doc.append_child(doc.body(), plain);

        assert!(doc.is_inside_editable(t));
        assert!(doc.is_inside_editable(t2));
        assert!(!doc.is_inside_editable(plain));
    }
}
