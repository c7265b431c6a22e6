//! Vocabulary domain: entries, the deduplicated store, and import/export.

use serde::{Deserialize, Serialize};

pub mod codec;
pub mod entry;
pub mod store;

pub use codec::{ImportFailure, ImportReport};
pub use entry::{canonicalize, now_iso, EntryKind, RawEntry, VocabEntry};
pub use store::{UpsertOutcome, VocabStore, MAX_VOCAB};

// ==================== ERROR TAXONOMY ====================

/// Everything that can go wrong in the vocabulary core. Always returned as a
/// value, never panicked; the string codes are part of the exchange format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VocabError {
    InvalidTerm,
    LimitExceeded,
    InvalidJson,
}

impl VocabError {
    pub fn as_str(&self) -> &'static str {
        match self {
            VocabError::InvalidTerm => "INVALID_TERM",
            VocabError::LimitExceeded => "LIMIT_EXCEEDED",
            VocabError::InvalidJson => "INVALID_JSON",
        }
    }
}

impl std::fmt::Display for VocabError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
