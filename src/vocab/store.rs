//! VocabStore - Canonical, deduplicated, capacity-bounded vocabulary
//!
//! Insertion order is preserved; an upsert that replaces an existing entry
//! keeps its position, original-casing `term`, and `createdAt`. Every
//! operation returns a new store so callers can diff old vs. new state.

use serde::{Deserialize, Serialize};

use super::entry::{canonicalize, VocabEntry};
use super::VocabError;

// ==================== CONSTANTS ====================

/// Hard cap on entries per store
pub const MAX_VOCAB: usize = 500;

// ==================== TYPE DEFINITIONS ====================

/// What an upsert did to the store
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpsertOutcome {
    Inserted,
    Replaced,
}

/// Order-preserving vocabulary collection, unique by canonical form
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VocabStore {
    entries: Vec<VocabEntry>,
}

// ==================== MAIN IMPLEMENTATION ====================

impl VocabStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: Vec<VocabEntry>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[VocabEntry] {
        &self.entries
    }

    /// Look up an entry by its canonical form.
    pub fn get(&self, canonical: &str) -> Option<&VocabEntry> {
        self.entries.iter().find(|e| e.canonical == canonical)
    }

    /// Case-insensitive membership test on a user-facing term.
    pub fn contains_term(&self, term: &str) -> bool {
        self.get(&canonicalize(term)).is_some()
    }

    /// Insert or replace by canonical form.
    ///
    /// A replace merges the incoming mutable fields (translation, kind,
    /// length, lastUsedAt) into the existing slot, preserving the first
    /// insertion's `term` and `createdAt`. An insert appends, unless the
    /// store is at `MAX_VOCAB`, in which case `LimitExceeded` is returned
    /// and the store is left untouched.
    pub fn upsert(&self, entry: VocabEntry) -> Result<(VocabStore, UpsertOutcome), VocabError> {
        let mut next = self.entries.clone();

        if let Some(pos) = next.iter().position(|e| e.canonical == entry.canonical) {
            let existing = &next[pos];
            let merged = VocabEntry {
                term: existing.term.clone(),
                created_at: existing.created_at.clone(),
                ..entry
            };
            next[pos] = merged;
            return Ok((VocabStore { entries: next }, UpsertOutcome::Replaced));
        }

        if next.len() >= MAX_VOCAB {
            return Err(VocabError::LimitExceeded);
        }

        next.push(entry);
        Ok((VocabStore { entries: next }, UpsertOutcome::Inserted))
    }

    /// Remove the entry matching `canonicalize(term)`, if any.
    ///
    /// Missing or blank terms are a no-op reporting `removed = false`.
    pub fn remove_by_term(&self, term: &str) -> (VocabStore, bool) {
        let canonical = canonicalize(term);
        if canonical.is_empty() || self.get(&canonical).is_none() {
            return (self.clone(), false);
        }

        let entries = self
            .entries
            .iter()
            .filter(|e| e.canonical != canonical)
            .cloned()
            .collect();
        (VocabStore { entries }, true)
    }
}

// ==================== TESTS ====================
