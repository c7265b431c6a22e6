//! TextTree - Minimal text-node view of a document tree
//!
//! The annotation pass only needs three things from a document: which text
//! nodes are visible, what a node currently says, and the ability to rewrite
//! it. `TextTree` captures exactly that, so the pass logic is testable
//! natively against `MemTree` and runs in the browser against the `DomTree`
//! adapter.

use std::hash::Hash;

// ==================== CONSTANTS ====================

/// Parent tags whose text content is never annotated
pub const SKIPPED_PARENT_TAGS: [&str; 3] = ["SCRIPT", "STYLE", "NOSCRIPT"];

/// Case-insensitive check against `SKIPPED_PARENT_TAGS`.
pub fn tag_is_skipped(tag: &str) -> bool {
    SKIPPED_PARENT_TAGS.iter().any(|t| tag.eq_ignore_ascii_case(t))
}

// ==================== TRAIT ====================

/// A live tree of text nodes addressable by stable ids.
///
/// Ids must stay valid for the lifetime of the tree; a detached node keeps
/// its id but reads back as `None`. Implementations must not require the
/// annotator to hold on to node objects themselves.
pub trait TextTree {
    type NodeId: Copy + Eq + Hash;

    /// Text nodes currently eligible for annotation: attached, non-blank
    /// content, and not parented by a skipped tag.
    fn eligible_nodes(&mut self) -> Vec<Self::NodeId>;

    /// Current content of the node, or `None` once it left the tree.
    fn text(&self, id: Self::NodeId) -> Option<String>;

    /// Rewrite the node's content. Returns `false` if the node is gone.
    fn set_text(&mut self, id: Self::NodeId, text: &str) -> bool;
}

// ==================== IN-MEMORY IMPLEMENTATION ====================

struct MemNode {
    parent_tag: String,
    text: String,
    attached: bool,
}

/// Arena-backed `TextTree` for native tests and host embedding.
#[derive(Default)]
pub struct MemTree {
    nodes: Vec<MemNode>,
}

impl MemTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a text node under a parent with the given tag; returns its id.
    pub fn add_text(&mut self, parent_tag: &str, text: &str) -> usize {
        self.nodes.push(MemNode {
            parent_tag: parent_tag.to_string(),
            text: text.to_string(),
            attached: true,
        });
        self.nodes.len() - 1
    }

    /// Simulate the node being removed from the document.
    pub fn detach(&mut self, id: usize) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.attached = false;
        }
    }
}

impl TextTree for MemTree {
    type NodeId = usize;

    fn eligible_nodes(&mut self) -> Vec<usize> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| {
                n.attached && !tag_is_skipped(&n.parent_tag) && !n.text.trim().is_empty()
            })
            .map(|(i, _)| i)
            .collect()
    }

    fn text(&self, id: usize) -> Option<String> {
        let node = self.nodes.get(id)?;
        node.attached.then(|| node.text.clone())
    }

    fn set_text(&mut self, id: usize, text: &str) -> bool {
        match self.nodes.get_mut(id) {
            Some(node) if node.attached => {
                node.text = text.to_string();
                true
            }
            _ => false,
        }
    }
}

// ==================== TESTS ====================
