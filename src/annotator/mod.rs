//! In-page annotation engine: compiled matching, the reversible pass, and
//! tree adapters (in-memory and live DOM).

pub mod dom;
pub mod matcher;
pub mod pass;
pub mod tree;

pub use dom::DomTree;
pub use matcher::VocabMatcher;
pub use pass::TextAnnotator;
pub use tree::{tag_is_skipped, MemTree, TextTree, SKIPPED_PARENT_TAGS};
