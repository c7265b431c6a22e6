//! GlossCore: In-page vocabulary annotation engine
//!
//! A Rust/WASM implementation of the vocabulary content-script core: keep a
//! deduplicated, capacity-bounded vocabulary of term/translation pairs and
//! make the visible text of a live page reflect it, reversibly.
//!
//! # Architecture
//!
//! ## Vocabulary (`vocab/`)
//! - `entry.rs` - VocabEntry: canonical form, validation, exchange format
//! - `store.rs` - VocabStore: order-preserving dedupe under a 500-entry cap
//! - `codec.rs` - Import/export: plain text + versioned JSON envelope
//!
//! ## Annotation (`annotator/`)
//! - `matcher.rs` - VocabMatcher: compiled `\b…\b` rules + Aho-Corasick prefilter
//! - `tree.rs` - TextTree abstraction + in-memory MemTree
//! - `pass.rs` - TextAnnotator: pristine-text ledger, idempotent reversible pass
//! - `dom.rs` - DomTree: live web-sys adapter
//!
//! ## Control (`controller/`)
//! - `mod.rs` - AnnotationController: command dispatch + full-pass rescan
//! - `selection.rs` - Debounced selection-change notifier
//!
//! # Usage (WASM)
//! ```javascript,ignore
//! import init, { PageAnnotator } from 'glosscore';
//!
//! await init();
//! const page = new PageAnnotator(null);
//!
//! // Inbound extension messages
//! page.handleCommand({ type: 'apply', term: 'cat', translation: '猫' });
//! page.handleCommand({ type: 'remove', term: 'cat' });
//! page.handleCommand({ type: 'replaceAll', items: savedVocabulary });
//! page.handleCommand({ type: 'reset' });
//!
//! console.log(page.getStatus());
//! ```

pub mod annotator;
pub mod controller;
pub mod page;
pub mod vocab;

pub use annotator::{DomTree, MemTree, TextAnnotator, TextTree, VocabMatcher};
pub use controller::{AnnotationController, Command, SelectionDebouncer};
pub use page::PageAnnotator;
pub use vocab::{VocabEntry, VocabError, VocabStore, MAX_VOCAB};

use wasm_bindgen::prelude::*;

// When the `wee_alloc` feature is enabled, use `wee_alloc` as the global
// allocator for smaller WASM bundle size.
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

/// Initialize panic hook for better error messages in browser console
#[wasm_bindgen(start)]
pub fn main() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Get version information
#[wasm_bindgen]
pub fn version() -> String {
    format!("glosscore v{}", env!("CARGO_PKG_VERSION"))
}
