//! VocabMatcher - Compiled word-boundary term matching
//!
//! Compiles the current vocabulary into one case-insensitive `\b…\b` regex
//! per annotatable entry, in vocabulary order, plus an Aho-Corasick
//! prefilter for cheap "does this node contain anything at all" checks.
//!
//! # Features
//! - Whole-word matching ("cat" never matches inside "concatenate")
//! - Terms are regex-escaped, so "C++" or "e.g." match literally
//! - Matched substring keeps its original casing; the translation is
//!   appended as a `(translation)` suffix
//! - Entries with a blank translation compile to no rule at all

use aho_corasick::AhoCorasick;
use regex::{Captures, Regex, RegexBuilder};

use crate::vocab::VocabEntry;

// ==================== TYPE DEFINITIONS ====================

/// One compiled annotation rule
struct Rule {
    pattern: Regex,
    translation: String,
}

/// Compiled, ordered ruleset for one vocabulary snapshot
#[derive(Default)]
pub struct VocabMatcher {
    rules: Vec<Rule>,
    /// Lowercased-term automaton used as a containment prefilter
    prefilter: Option<AhoCorasick>,
}

// ==================== MAIN IMPLEMENTATION ====================

impl VocabMatcher {
    /// Matcher with no rules; `apply` is the identity.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Compile rules for every entry with a non-blank translation, in the
    /// iteration order of `entries`.
    pub fn compile(entries: &[VocabEntry]) -> Self {
        let mut rules = Vec::new();
        let mut prefilter_terms = Vec::new();

        for entry in entries {
            if !entry.has_translation() {
                continue;
            }
            let pattern = format!(r"\b{}\b", regex::escape(&entry.term));
            // Escaped literals always compile; skip defensively rather than fail
            let Ok(regex) = RegexBuilder::new(&pattern).case_insensitive(true).build() else {
                continue;
            };
            rules.push(Rule {
                pattern: regex,
                translation: entry.translation.clone(),
            });
            prefilter_terms.push(entry.term.to_lowercase());
        }

        let prefilter = if prefilter_terms.is_empty() {
            None
        } else {
            AhoCorasick::new(&prefilter_terms).ok()
        };

        Self { rules, prefilter }
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// O(n) containment check; `false` guarantees `apply` is the identity.
    /// Boundary-blind by design, so hits may still produce no annotation.
    /// Without an automaton the check degrades to "hit whenever rules
    /// exist", so a failed prefilter build can never suppress annotation.
    pub fn prefilter_hit(&self, text: &str) -> bool {
        match &self.prefilter {
            Some(ac) => ac.is_match(&text.to_lowercase()),
            None => !self.rules.is_empty(),
        }
    }

    /// Fold every rule over `base` sequentially: rule N's output is rule
    /// N+1's input, so later terms can match text produced by earlier ones.
    pub fn apply(&self, base: &str) -> String {
        let mut text = base.to_string();
        for rule in &self.rules {
            if !rule.pattern.is_match(&text) {
                continue;
            }
            text = rule
                .pattern
                .replace_all(&text, |caps: &Captures| {
                    format!("{}({})", &caps[0], rule.translation)
                })
                .into_owned();
        }
        text
    }
}

// ==================== TESTS ====================
