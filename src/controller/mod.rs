//! AnnotationController - Command dispatch over the live vocabulary
//!
//! Owns the in-page vocabulary (an order-preserving list keyed by canonical
//! form), recompiles the matcher on every state change, and re-runs one full
//! annotation pass. Commands never fail observably: malformed payloads are
//! dropped and no-op mutations skip the rescan entirely.
//!
//! Capacity is deliberately not enforced here. The persisted store (an
//! external collaborator) is the bounded one; this map mirrors whatever
//! vocabulary state it is handed.

use serde::{Deserialize, Serialize};

use crate::annotator::{TextAnnotator, TextTree, VocabMatcher};
use crate::vocab::{canonicalize, RawEntry, VocabEntry};

pub mod selection;

pub use selection::SelectionDebouncer;

// ==================== TYPE DEFINITIONS ====================

/// Inbound command, one per extension message.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Command {
    /// Apply one translation: `{type: "apply", term, translation, kind?}`
    Apply {
        #[serde(flatten)]
        entry: RawEntry,
    },
    /// Remove one translation: `{type: "remove", term}`
    Remove { term: String },
    /// Replace the whole vocabulary: `{type: "replaceAll", items: [...]}`
    ReplaceAll {
        #[serde(default)]
        items: Vec<RawEntry>,
    },
    /// Restore the page: `{type: "reset"}`
    Reset,
}

// ==================== MAIN IMPLEMENTATION ====================

/// State machine gluing vocabulary mutations to annotation passes.
pub struct AnnotationController<Id> {
    vocab: Vec<VocabEntry>,
    matcher: VocabMatcher,
    annotator: TextAnnotator<Id>,
    pass_count: u64,
}

impl<Id: Copy + Eq + std::hash::Hash> Default for AnnotationController<Id> {
    fn default() -> Self {
        Self {
            vocab: Vec::new(),
            matcher: VocabMatcher::empty(),
            annotator: TextAnnotator::new(),
            pass_count: 0,
        }
    }
}

impl<Id: Copy + Eq + std::hash::Hash> AnnotationController<Id> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[VocabEntry] {
        &self.vocab
    }

    pub fn vocab_len(&self) -> usize {
        self.vocab.len()
    }

    pub fn rule_count(&self) -> usize {
        self.matcher.rule_count()
    }

    pub fn pass_count(&self) -> u64 {
        self.pass_count
    }

    pub fn tracked_nodes(&self) -> usize {
        self.annotator.tracked_count()
    }

    /// Single dispatch point for inbound messages.
    pub fn handle<T: TextTree<NodeId = Id>>(&mut self, tree: &mut T, command: Command) {
        match command {
            Command::Apply { entry } => self.set_entry(tree, &entry),
            Command::Remove { term } => self.remove_entry(tree, &term),
            Command::ReplaceAll { items } => self.replace_all(tree, &items),
            Command::Reset => self.reset(tree),
        }
    }

    /// Upsert one entry into the live vocabulary. Invalid payloads and
    /// no-op updates (same translation and kind) are silently skipped.
    pub fn set_entry<T: TextTree<NodeId = Id>>(&mut self, tree: &mut T, raw: &RawEntry) {
        let Ok(entry) = VocabEntry::validate(raw) else { return };

        if let Some(pos) = self.vocab.iter().position(|e| e.canonical == entry.canonical) {
            let existing = &self.vocab[pos];
            let merged = VocabEntry {
                term: existing.term.clone(),
                created_at: existing.created_at.clone(),
                ..entry
            };
            if merged == *existing {
                return;
            }
            self.vocab[pos] = merged;
        } else {
            self.vocab.push(entry);
        }

        self.rescan(tree);
    }

    /// Delete by canonical term. A miss (or blank term) skips the rescan.
    pub fn remove_entry<T: TextTree<NodeId = Id>>(&mut self, tree: &mut T, term: &str) {
        let canonical = canonicalize(term);
        if canonical.is_empty() {
            return;
        }
        let before = self.vocab.len();
        self.vocab.retain(|e| e.canonical != canonical);
        if self.vocab.len() == before {
            return;
        }
        self.rescan(tree);
    }

    /// Clear and repopulate the live vocabulary. Invalid items are skipped;
    /// duplicates collapse to the first occurrence.
    pub fn replace_all<T: TextTree<NodeId = Id>>(&mut self, tree: &mut T, items: &[RawEntry]) {
        let mut vocab: Vec<VocabEntry> = Vec::new();
        for raw in items {
            let Ok(entry) = VocabEntry::validate(raw) else { continue };
            if vocab.iter().any(|e| e.canonical == entry.canonical) {
                continue;
            }
            vocab.push(entry);
        }
        self.vocab = vocab;
        self.rescan(tree);
    }

    /// Drop the vocabulary and restore the page.
    pub fn reset<T: TextTree<NodeId = Id>>(&mut self, tree: &mut T) {
        self.replace_all(tree, &[]);
    }

    /// Re-run the current pass without a state change (e.g. after dynamic
    /// DOM growth).
    pub fn refresh<T: TextTree<NodeId = Id>>(&mut self, tree: &mut T) {
        self.run_pass(tree);
    }

    fn rescan<T: TextTree<NodeId = Id>>(&mut self, tree: &mut T) {
        self.matcher = VocabMatcher::compile(&self.vocab);
        self.run_pass(tree);
    }

    fn run_pass<T: TextTree<NodeId = Id>>(&mut self, tree: &mut T) {
        self.annotator.annotate(tree, &self.matcher);
        self.pass_count += 1;
    }
}

// ==================== TESTS ====================
