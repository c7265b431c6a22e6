//! Vocabulary entries and validation
//!
//! A `VocabEntry` is one saved term/translation pair. Uniqueness is decided by
//! the canonical form (lowercased, trimmed term); the original casing of the
//! first insertion is what the user sees forever after.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use super::VocabError;

// ==================== TYPE DEFINITIONS ====================

/// Classification of an entry. Does not affect matching.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Word,
    Phrase,
}

impl EntryKind {
    /// Anything other than the exact string "phrase" is a word.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("phrase") => EntryKind::Phrase,
            _ => EntryKind::Word,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EntryKind::Word => "word",
            EntryKind::Phrase => "phrase",
        }
    }
}

/// A single vocabulary entry
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VocabEntry {
    /// Original-casing term, trimmed; immutable once created
    pub term: String,
    /// Lowercased trimmed term; the uniqueness key
    pub canonical: String,
    /// Saved translation; empty means "do not annotate yet"
    #[serde(default)]
    pub translation: String,
    #[serde(default = "default_kind")]
    pub kind: EntryKind,
    /// Character count of `term`, informational
    pub length: usize,
    /// ISO-8601, set at first insertion and preserved across upserts
    #[serde(rename = "createdAt")]
    pub created_at: String,
    #[serde(rename = "lastUsedAt", default, skip_serializing_if = "Option::is_none")]
    pub last_used_at: Option<String>,
}

fn default_kind() -> EntryKind {
    EntryKind::Word
}

/// Permissive mirror of an incoming entry payload (import item, inbound
/// command). `term` is kept as a raw JSON value so that a non-string term is
/// distinguishable from a missing one during validation.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RawEntry {
    #[serde(default)]
    pub term: Option<serde_json::Value>,
    #[serde(default)]
    pub translation: Option<String>,
    #[serde(default)]
    pub kind: Option<String>,
    #[serde(rename = "createdAt", default)]
    pub created_at: Option<String>,
    #[serde(rename = "lastUsedAt", default)]
    pub last_used_at: Option<String>,
}

impl RawEntry {
    /// Shorthand for a term-only candidate (one line of a plain-text import).
    pub fn from_term(term: &str) -> Self {
        Self {
            term: Some(serde_json::Value::String(term.to_string())),
            ..Self::default()
        }
    }
}

// ==================== MAIN IMPLEMENTATION ====================

/// Lowercased, trimmed form of a term; the store's uniqueness key.
pub fn canonicalize(term: &str) -> String {
    term.trim().to_lowercase()
}

/// Current time as an ISO-8601 string (millisecond precision, `Z` suffix,
/// matching the exchange format produced by `Date.toISOString()`).
pub fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

impl VocabEntry {
    /// Validate a raw payload into a fully populated entry.
    ///
    /// Fails with `InvalidTerm` when the term is missing, not a string, or
    /// trims to empty. `kind` defaults to word, `createdAt` to `now`.
    pub fn validate_at(raw: &RawEntry, now: &str) -> Result<VocabEntry, VocabError> {
        let term = match raw.term.as_ref().and_then(|v| v.as_str()) {
            Some(t) => t.trim(),
            None => return Err(VocabError::InvalidTerm),
        };
        if term.is_empty() {
            return Err(VocabError::InvalidTerm);
        }

        Ok(VocabEntry {
            term: term.to_string(),
            canonical: canonicalize(term),
            translation: raw.translation.clone().unwrap_or_default(),
            kind: EntryKind::parse(raw.kind.as_deref()),
            length: term.chars().count(),
            created_at: raw
                .created_at
                .clone()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| now.to_string()),
            last_used_at: raw.last_used_at.clone(),
        })
    }

    /// `validate_at` with the real clock.
    pub fn validate(raw: &RawEntry) -> Result<VocabEntry, VocabError> {
        Self::validate_at(raw, &now_iso())
    }

    /// True when the translation would actually produce an annotation.
    pub fn has_translation(&self) -> bool {
        !self.translation.trim().is_empty()
    }
}

// ==================== TESTS ====================

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(term: &str) -> RawEntry {
        RawEntry::from_term(term)
    }

    #[test]
    fn test_canonicalize() {
        assert_eq!(canonicalize("  Hello World "), "hello world");
        assert_eq!(canonicalize("CAT"), "cat");
    }

    #[test]
    fn test_validate_populates_fields() {
        let mut r = raw("  Hello ");
        r.translation = Some("bonjour".to_string());
        let entry = VocabEntry::validate_at(&r, "2024-01-01T00:00:00.000Z").unwrap();

        assert_eq!(entry.term, "Hello");
        assert_eq!(entry.canonical, "hello");
        assert_eq!(entry.translation, "bonjour");
        assert_eq!(entry.kind, EntryKind::Word);
        assert_eq!(entry.length, 5);
        assert_eq!(entry.created_at, "2024-01-01T00:00:00.000Z");
        assert_eq!(entry.last_used_at, None);
    }

    #[test]
    fn test_validate_rejects_missing_term() {
        assert_eq!(
            VocabEntry::validate_at(&RawEntry::default(), "t"),
            Err(VocabError::InvalidTerm)
        );
    }

    #[test]
    fn test_validate_rejects_non_string_term() {
        let r = RawEntry {
            term: Some(serde_json::json!(42)),
            ..RawEntry::default()
        };
        assert_eq!(VocabEntry::validate_at(&r, "t"), Err(VocabError::InvalidTerm));
    }

    #[test]
    fn test_validate_rejects_blank_term() {
        assert_eq!(
            VocabEntry::validate_at(&raw("   "), "t"),
            Err(VocabError::InvalidTerm)
        );
    }

    #[test]
    fn test_kind_defaults_to_word_unless_exactly_phrase() {
        let mut r = raw("take off");
        r.kind = Some("phrase".to_string());
        assert_eq!(VocabEntry::validate_at(&r, "t").unwrap().kind, EntryKind::Phrase);

        r.kind = Some("Phrase".to_string());
        assert_eq!(VocabEntry::validate_at(&r, "t").unwrap().kind, EntryKind::Word);

        r.kind = None;
        assert_eq!(VocabEntry::validate_at(&r, "t").unwrap().kind, EntryKind::Word);
    }

    #[test]
    fn test_provided_created_at_is_kept() {
        let mut r = raw("cat");
        r.created_at = Some("1999-12-31T23:59:59.000Z".to_string());
        let entry = VocabEntry::validate_at(&r, "2024-01-01T00:00:00.000Z").unwrap();
        assert_eq!(entry.created_at, "1999-12-31T23:59:59.000Z");
    }

    #[test]
    fn test_serde_field_names_match_exchange_format() {
        let entry = VocabEntry::validate_at(&raw("cat"), "2024-01-01T00:00:00.000Z").unwrap();
        let json = serde_json::to_value(&entry).unwrap();

        assert!(json.get("createdAt").is_some());
        assert_eq!(json.get("kind").unwrap(), "word");
        // lastUsedAt omitted when absent
        assert!(json.get("lastUsedAt").is_none());
    }
}
