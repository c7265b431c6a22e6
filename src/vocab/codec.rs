//! Import/export codec for vocabulary exchange
//!
//! Two formats:
//! - Plain text: one term per line (translations are not carried)
//! - JSON envelope: `{version: 1, exportedAt: <ISO-8601>, items: [...]}`
//!
//! Imports merge into an existing store through the normal validate/upsert
//! pipeline and report per-line failures instead of aborting. Once the store
//! cap is hit mid-batch, no further insertions happen and every remaining
//! non-empty line is classified `LIMIT_EXCEEDED`.

use serde::{Deserialize, Serialize};

use super::entry::{now_iso, RawEntry, VocabEntry};
use super::store::{UpsertOutcome, VocabStore};
use super::VocabError;

// ==================== TYPE DEFINITIONS ====================

/// Current JSON envelope version
pub const EXPORT_VERSION: u32 = 1;

#[derive(Debug, Serialize)]
struct ExportEnvelope<'a> {
    version: u32,
    #[serde(rename = "exportedAt")]
    exported_at: String,
    items: &'a [VocabEntry],
}

/// One rejected line/item of a batch import. `line` is 1-based in the source
/// (0 means the payload itself was unreadable).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportFailure {
    pub line: usize,
    pub reason: VocabError,
}

/// Result of a batch import
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ImportReport {
    #[serde(rename = "list")]
    pub store: VocabStore,
    #[serde(rename = "insertedCount")]
    pub inserted_count: usize,
    pub failed: Vec<ImportFailure>,
}

// ==================== EXPORT ====================

/// Plain-text export: terms only, ascending by `createdAt`, newline-joined.
///
/// ISO-8601 timestamps in the uniform export format sort lexicographically,
/// and the sort is stable, so equal timestamps keep their insertion order.
pub fn export_text(store: &VocabStore) -> String {
    let mut entries: Vec<&VocabEntry> = store.entries().iter().collect();
    entries.sort_by(|a, b| a.created_at.cmp(&b.created_at));
    entries
        .iter()
        .map(|e| e.term.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

/// JSON export with an explicit call timestamp (for tests).
pub fn export_json_at(store: &VocabStore, now: &str) -> String {
    let envelope = ExportEnvelope {
        version: EXPORT_VERSION,
        exported_at: now.to_string(),
        items: store.entries(),
    };
    // Envelope of plain data; serialization cannot fail
    serde_json::to_string(&envelope).unwrap_or_default()
}

/// JSON export stamped with the current time.
pub fn export_json(store: &VocabStore) -> String {
    export_json_at(store, &now_iso())
}

// ==================== IMPORT ====================

/// Shared validate -> upsert step for one candidate. Returns the failure to
/// record, if any, and flips `limit_hit` once the cap rejects an insert.
fn import_one(
    store: &mut VocabStore,
    raw: &RawEntry,
    now: &str,
    inserted: &mut usize,
    limit_hit: &mut bool,
) -> Option<VocabError> {
    if *limit_hit {
        return Some(VocabError::LimitExceeded);
    }

    let entry = match VocabEntry::validate_at(raw, now) {
        Ok(e) => e,
        Err(reason) => return Some(reason),
    };

    match store.upsert(entry) {
        Ok((next, UpsertOutcome::Inserted)) => {
            *store = next;
            *inserted += 1;
            None
        }
        Ok((next, UpsertOutcome::Replaced)) => {
            *store = next;
            None
        }
        Err(reason) => {
            *limit_hit = true;
            Some(reason)
        }
    }
}

/// Merge a plain-text payload (one term per line) into `existing`.
///
/// Lines are trimmed; blank lines are skipped silently. Line numbers in the
/// failure report are 1-based positions in the source text (after CRLF
/// normalization), counting blank lines.
pub fn import_text(text: &str, existing: &VocabStore) -> ImportReport {
    let now = now_iso();
    let mut store = existing.clone();
    let mut inserted = 0usize;
    let mut failed = Vec::new();
    let mut limit_hit = false;

    let normalized = text.replace("\r\n", "\n");
    for (idx, line) in normalized.split('\n').enumerate() {
        let term = line.trim();
        if term.is_empty() {
            continue;
        }

        let raw = RawEntry::from_term(term);
        if let Some(reason) = import_one(&mut store, &raw, &now, &mut inserted, &mut limit_hit) {
            failed.push(ImportFailure { line: idx + 1, reason });
        }
    }

    ImportReport { store, inserted_count: inserted, failed }
}

/// Merge a JSON envelope payload into `existing`.
///
/// An unparseable payload reports a single `{line: 0, INVALID_JSON}` failure
/// and leaves the store untouched. A missing or non-array `items` field reads
/// as an empty batch. Item indices in the failure report are 1-based.
pub fn import_json(text: &str, existing: &VocabStore) -> ImportReport {
    let parsed: serde_json::Value = match serde_json::from_str(text) {
        Ok(v) => v,
        Err(_) => {
            return ImportReport {
                store: existing.clone(),
                inserted_count: 0,
                failed: vec![ImportFailure { line: 0, reason: VocabError::InvalidJson }],
            }
        }
    };

    let items = parsed
        .get("items")
        .and_then(|v| v.as_array())
        .cloned()
        .unwrap_or_default();

    let now = now_iso();
    let mut store = existing.clone();
    let mut inserted = 0usize;
    let mut failed = Vec::new();
    let mut limit_hit = false;

    for (idx, item) in items.into_iter().enumerate() {
        let raw: RawEntry = match serde_json::from_value(item) {
            Ok(r) => r,
            Err(_) => {
                let reason = if limit_hit { VocabError::LimitExceeded } else { VocabError::InvalidTerm };
                failed.push(ImportFailure { line: idx + 1, reason });
                continue;
            }
        };

        if let Some(reason) = import_one(&mut store, &raw, &now, &mut inserted, &mut limit_hit) {
            failed.push(ImportFailure { line: idx + 1, reason });
        }
    }

    ImportReport { store, inserted_count: inserted, failed }
}

// ==================== TESTS ====================
