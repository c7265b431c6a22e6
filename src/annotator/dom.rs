//! DomTree - Live DOM adapter for the annotation pass
//!
//! Walks the real document subtree via `web-sys`, skipping SCRIPT/STYLE/
//! NOSCRIPT elements, and interns `Text` handles into a registry so the
//! annotator can address nodes by stable integer ids. Registry slots are
//! vacated (never reused) once a node leaves the document, so a stale id
//! can never alias a different node and the ledger never pins DOM memory
//! beyond the handle itself.

use wasm_bindgen::JsCast;
use web_sys::{Element, Node, Text};

use super::tree::{tag_is_skipped, TextTree};

// ==================== MAIN IMPLEMENTATION ====================

/// `TextTree` over a live DOM subtree.
pub struct DomTree {
    root: Node,
    registry: Vec<Option<Text>>,
}

impl DomTree {
    pub fn new(root: Node) -> Self {
        Self { root, registry: Vec::new() }
    }

    /// Bind to `document.body`, the content-script default.
    pub fn for_document_body() -> Option<Self> {
        let body = web_sys::window()?.document()?.body()?;
        Some(Self::new(body.into()))
    }

    /// Depth-first collection of non-blank text nodes, not descending into
    /// skipped elements.
    fn collect(node: &Node, out: &mut Vec<Text>) {
        let children = node.child_nodes();
        for i in 0..children.length() {
            let Some(child) = children.item(i) else { continue };
            match child.node_type() {
                Node::TEXT_NODE => {
                    if let Ok(text) = child.dyn_into::<Text>() {
                        if !text.data().trim().is_empty() {
                            out.push(text);
                        }
                    }
                }
                Node::ELEMENT_NODE => {
                    let skip = child
                        .dyn_ref::<Element>()
                        .map(|el| tag_is_skipped(&el.tag_name()))
                        .unwrap_or(true);
                    if !skip {
                        Self::collect(&child, out);
                    }
                }
                _ => {}
            }
        }
    }

    /// Id of an already-registered handle, or a fresh slot.
    fn intern(&mut self, node: Text) -> usize {
        for (id, slot) in self.registry.iter().enumerate() {
            if let Some(existing) = slot {
                if existing.is_same_node(Some(node.as_ref())) {
                    return id;
                }
            }
        }
        self.registry.push(Some(node));
        self.registry.len() - 1
    }

    /// Release handles for nodes that left the document.
    fn release_disconnected(&mut self) {
        for slot in self.registry.iter_mut() {
            if slot.as_ref().is_some_and(|n| !n.is_connected()) {
                *slot = None;
            }
        }
    }

    /// Number of live handles currently registered.
    pub fn live_handles(&self) -> usize {
        self.registry.iter().filter(|s| s.is_some()).count()
    }
}

impl TextTree for DomTree {
    type NodeId = usize;

    fn eligible_nodes(&mut self) -> Vec<usize> {
        self.release_disconnected();
        let root = self.root.clone();
        let mut found = Vec::new();
        Self::collect(&root, &mut found);
        found.into_iter().map(|t| self.intern(t)).collect()
    }

    fn text(&self, id: usize) -> Option<String> {
        let node = self.registry.get(id)?.as_ref()?;
        if !node.is_connected() {
            return None;
        }
        Some(node.data())
    }

    fn set_text(&mut self, id: usize, text: &str) -> bool {
        match self.registry.get(id).and_then(|s| s.as_ref()) {
            Some(node) if node.is_connected() => {
                node.set_data(text);
                true
            }
            _ => false,
        }
    }
}

// ==================== TESTS (browser only) ====================
