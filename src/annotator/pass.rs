//! TextAnnotator - Reversible annotation pass over a text tree
//!
//! Per-node state machine: CLEAN (no ledger row, content is the page's own)
//! -> ANNOTATED (content rewritten, pristine original recorded) -> CLEAN
//! (content restored, row dropped). Matching always runs against the
//! recorded pristine baseline, never the already-annotated text, which makes
//! repeated passes idempotent and every mutation reversible.

use std::collections::HashMap;
use std::hash::Hash;

use super::matcher::VocabMatcher;
use super::tree::TextTree;

// ==================== MAIN IMPLEMENTATION ====================

/// Owns the pristine-text ledger for one document subtree.
///
/// The ledger holds node ids, not nodes: detached nodes are swept after
/// every pass, so the annotator never keeps DOM memory alive.
pub struct TextAnnotator<Id> {
    pristine: HashMap<Id, String>,
}

impl<Id: Copy + Eq + Hash> Default for TextAnnotator<Id> {
    fn default() -> Self {
        Self { pristine: HashMap::new() }
    }
}

impl<Id: Copy + Eq + Hash> TextAnnotator<Id> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of nodes currently tracked as annotated.
    pub fn tracked_count(&self) -> usize {
        self.pristine.len()
    }

    /// True when no node diverges from its pristine content.
    pub fn is_clean(&self) -> bool {
        self.pristine.is_empty()
    }

    /// One full annotation pass: make every eligible node reflect `matcher`.
    pub fn annotate<T: TextTree<NodeId = Id>>(&mut self, tree: &mut T, matcher: &VocabMatcher) {
        if matcher.is_empty() {
            self.restore_all(tree);
            return;
        }

        for id in tree.eligible_nodes() {
            // Node vanished mid-pass: skip, the sweep below drops its row
            let Some(current) = tree.text(id) else { continue };

            let base = match self.pristine.get(&id) {
                Some(p) => p.clone(),
                None => current.clone(),
            };

            let next = if matcher.prefilter_hit(&base) {
                matcher.apply(&base)
            } else {
                base.clone()
            };

            if next != base {
                self.pristine.entry(id).or_insert_with(|| base.clone());
                if next != current {
                    tree.set_text(id, &next);
                }
            } else if let Some(pristine) = self.pristine.remove(&id) {
                // Previously annotated, nothing matches anymore: restore
                if current != pristine {
                    tree.set_text(id, &pristine);
                }
            }
        }

        self.sweep(tree);
    }

    /// Fast full-reset path: put every tracked node back to its pristine
    /// content and clear the ledger.
    pub fn restore_all<T: TextTree<NodeId = Id>>(&mut self, tree: &mut T) {
        for (id, pristine) in self.pristine.drain() {
            if let Some(current) = tree.text(id) {
                if current != pristine {
                    tree.set_text(id, &pristine);
                }
            }
        }
    }

    /// Drop ledger rows whose node has left the tree.
    fn sweep<T: TextTree<NodeId = Id>>(&mut self, tree: &T) {
        self.pristine.retain(|id, _| tree.text(*id).is_some());
    }
}

// ==================== TESTS ====================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotator::tree::MemTree;
    use crate::vocab::{RawEntry, VocabEntry};

    fn matcher(pairs: &[(&str, &str)]) -> VocabMatcher {
        let entries: Vec<VocabEntry> = pairs
            .iter()
            .map(|(term, translation)| {
                let mut raw = RawEntry::from_term(term);
                raw.translation = Some(translation.to_string());
                VocabEntry::validate_at(&raw, "2024-01-01T00:00:00.000Z").unwrap()
            })
            .collect();
        VocabMatcher::compile(&entries)
    }

    #[test]
    fn test_annotates_matching_nodes() {
        let mut tree = MemTree::new();
        let a = tree.add_text("P", "a cat sat");
        let b = tree.add_text("P", "no match here");

        let mut annotator = TextAnnotator::new();
        annotator.annotate(&mut tree, &matcher(&[("cat", "猫")]));

        assert_eq!(tree.text(a).unwrap(), "a cat(猫) sat");
        assert_eq!(tree.text(b).unwrap(), "no match here");
        assert_eq!(annotator.tracked_count(), 1);
    }

    #[test]
    fn test_idempotent_across_passes() {
        let mut tree = MemTree::new();
        let id = tree.add_text("P", "cat and dog");
        let m = matcher(&[("cat", "X"), ("dog", "Y")]);

        let mut annotator = TextAnnotator::new();
        annotator.annotate(&mut tree, &m);
        let first = tree.text(id).unwrap();
        annotator.annotate(&mut tree, &m);
        annotator.annotate(&mut tree, &m);

        assert_eq!(tree.text(id).unwrap(), first);
        assert_eq!(first, "cat(X) and dog(Y)");
    }

    #[test]
    fn test_reversible_with_empty_vocabulary() {
        let mut tree = MemTree::new();
        let a = tree.add_text("P", "a cat sat");
        let b = tree.add_text("DIV", "dogs everywhere");

        let mut annotator = TextAnnotator::new();
        annotator.annotate(&mut tree, &matcher(&[("cat", "X"), ("dogs", "Y")]));
        annotator.annotate(&mut tree, &VocabMatcher::empty());

        assert_eq!(tree.text(a).unwrap(), "a cat sat");
        assert_eq!(tree.text(b).unwrap(), "dogs everywhere");
        assert!(annotator.is_clean());
    }

    #[test]
    fn test_removed_term_restores_node() {
        let mut tree = MemTree::new();
        let a = tree.add_text("P", "a cat sat");
        let b = tree.add_text("P", "a dog ran");

        let mut annotator = TextAnnotator::new();
        annotator.annotate(&mut tree, &matcher(&[("cat", "X"), ("dog", "Y")]));
        assert_eq!(annotator.tracked_count(), 2);

        // "cat" removed from the vocabulary; its node reverts, "dog" stays
        annotator.annotate(&mut tree, &matcher(&[("dog", "Y")]));
        assert_eq!(tree.text(a).unwrap(), "a cat sat");
        assert_eq!(tree.text(b).unwrap(), "a dog(Y) ran");
        assert_eq!(annotator.tracked_count(), 1);
    }

    #[test]
    fn test_vocabulary_change_recomputes_from_pristine() {
        let mut tree = MemTree::new();
        let id = tree.add_text("P", "a cat sat");

        let mut annotator = TextAnnotator::new();
        annotator.annotate(&mut tree, &matcher(&[("cat", "X")]));
        annotator.annotate(&mut tree, &matcher(&[("cat", "Y")]));

        // Translation update replaces the old marker instead of stacking
        assert_eq!(tree.text(id).unwrap(), "a cat(Y) sat");
    }

    #[test]
    fn test_detached_node_is_swept() {
        let mut tree = MemTree::new();
        let a = tree.add_text("P", "a cat sat");
        let b = tree.add_text("P", "another cat");
        let m = matcher(&[("cat", "X")]);

        let mut annotator = TextAnnotator::new();
        annotator.annotate(&mut tree, &m);
        assert_eq!(annotator.tracked_count(), 2);

        tree.detach(a);
        annotator.annotate(&mut tree, &m);
        assert_eq!(annotator.tracked_count(), 1);
        assert_eq!(tree.text(b).unwrap(), "another cat(X)");
    }

    #[test]
    fn test_script_and_style_content_untouched() {
        let mut tree = MemTree::new();
        let script = tree.add_text("SCRIPT", "var cat = 1;");
        let style = tree.add_text("STYLE", ".cat {}");

        let mut annotator = TextAnnotator::new();
        annotator.annotate(&mut tree, &matcher(&[("cat", "X")]));

        assert_eq!(tree.text(script).unwrap(), "var cat = 1;");
        assert_eq!(tree.text(style).unwrap(), ".cat {}");
        assert!(annotator.is_clean());
    }

    #[test]
    fn test_restore_all_tolerates_detached_nodes() {
        let mut tree = MemTree::new();
        let a = tree.add_text("P", "a cat sat");
        let b = tree.add_text("P", "cat again");

        let mut annotator = TextAnnotator::new();
        annotator.annotate(&mut tree, &matcher(&[("cat", "X")]));
        tree.detach(a);

        annotator.annotate(&mut tree, &VocabMatcher::empty());
        assert!(annotator.is_clean());
        assert_eq!(tree.text(b).unwrap(), "cat again");
    }

    #[test]
    fn test_node_text_changed_externally_becomes_new_baseline() {
        let mut tree = MemTree::new();
        let id = tree.add_text("P", "plain text");
        let m = matcher(&[("cat", "X")]);

        let mut annotator = TextAnnotator::new();
        annotator.annotate(&mut tree, &m);
        assert!(annotator.is_clean());

        // Page script rewrote the node; the next pass picks it up fresh
        tree.set_text(id, "now a cat lives here");
        annotator.annotate(&mut tree, &m);
        assert_eq!(tree.text(id).unwrap(), "now a cat(X) lives here");
    }
}
