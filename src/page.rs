//! PageAnnotator - JS-facing facade for the content script
//!
//! Binds the annotation controller to `document.body` and exposes the
//! inbound command surface plus the debounced selection channel. Commands
//! never throw back to the page: malformed payloads are logged and dropped,
//! matching the availability-over-validation contract of the controller.
//!
//! # Usage (JavaScript)
//! ```javascript,ignore
//! import init, { PageAnnotator, importText } from 'glosscore';
//!
//! await init();
//! const page = new PageAnnotator(null);
//! page.applyEntry({ term: 'cat', translation: '猫' });
//! document.addEventListener('selectionchange', () => {
//!   page.offerSelection(String(getSelection()));
//! });
//! setInterval(() => {
//!   const text = page.pollSelection();
//!   if (text !== null) chrome.runtime.sendMessage({ selectionText: text });
//! }, 100);
//! ```

use instant::Instant;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use wasm_bindgen::prelude::*;

use crate::annotator::DomTree;
use crate::controller::{AnnotationController, Command, SelectionDebouncer};
use crate::vocab::{self, RawEntry, VocabEntry, VocabStore};

// ==================== TYPE DEFINITIONS ====================

/// Configuration for the PageAnnotator
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct PageConfig {
    /// Selection settle window in milliseconds
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

fn default_debounce_ms() -> u64 {
    300
}

impl Default for PageConfig {
    fn default() -> Self {
        Self { debounce_ms: default_debounce_ms() }
    }
}

#[derive(Deserialize)]
struct ItemsWrapper {
    #[serde(default)]
    items: Vec<RawEntry>,
}

// ==================== MAIN IMPLEMENTATION ====================

/// In-page vocabulary annotation engine bound to the live document.
#[wasm_bindgen]
pub struct PageAnnotator {
    tree: DomTree,
    controller: AnnotationController<usize>,
    selection: SelectionDebouncer,
    last_pass_ms: f64,
}

#[wasm_bindgen]
impl PageAnnotator {
    /// Create a PageAnnotator bound to `document.body`.
    ///
    /// # Arguments
    /// * `config` - Optional JSON configuration object
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<PageAnnotator, JsValue> {
        let config: PageConfig = if config.is_null() || config.is_undefined() {
            PageConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)
                .map_err(|e| JsValue::from_str(&format!("Invalid config: {}", e)))?
        };

        let tree = DomTree::for_document_body()
            .ok_or_else(|| JsValue::from_str("No document body to annotate"))?;

        Ok(Self {
            tree,
            controller: AnnotationController::new(),
            selection: SelectionDebouncer::new(Duration::from_millis(config.debounce_ms)),
            last_pass_ms: 0.0,
        })
    }

    /// Apply one translation: `{term, translation, kind?}`.
    #[wasm_bindgen(js_name = applyEntry)]
    pub fn apply_entry(&mut self, payload: JsValue) {
        let raw: RawEntry = match serde_wasm_bindgen::from_value(payload) {
            Ok(r) => r,
            Err(e) => {
                web_sys::console::warn_1(&format!("glosscore: bad apply payload: {}", e).into());
                return;
            }
        };
        let t0 = js_sys::Date::now();
        self.controller.set_entry(&mut self.tree, &raw);
        self.last_pass_ms = js_sys::Date::now() - t0;
    }

    /// Remove one translation by term (case-insensitive).
    #[wasm_bindgen(js_name = removeEntry)]
    pub fn remove_entry(&mut self, term: &str) {
        let t0 = js_sys::Date::now();
        self.controller.remove_entry(&mut self.tree, term);
        self.last_pass_ms = js_sys::Date::now() - t0;
    }

    /// Replace the whole vocabulary. Accepts a bare array or `{items: [...]}`.
    #[wasm_bindgen(js_name = replaceAll)]
    pub fn replace_all(&mut self, items: JsValue) {
        let items: Vec<RawEntry> = match serde_wasm_bindgen::from_value::<Vec<RawEntry>>(items.clone())
        {
            Ok(list) => list,
            Err(_) => match serde_wasm_bindgen::from_value::<ItemsWrapper>(items) {
                Ok(w) => w.items,
                Err(e) => {
                    web_sys::console::warn_1(
                        &format!("glosscore: bad replaceAll payload: {}", e).into(),
                    );
                    return;
                }
            },
        };
        let t0 = js_sys::Date::now();
        self.controller.replace_all(&mut self.tree, &items);
        self.last_pass_ms = js_sys::Date::now() - t0;
    }

    /// Drop the vocabulary and restore every touched node.
    #[wasm_bindgen(js_name = reset)]
    pub fn reset(&mut self) {
        let t0 = js_sys::Date::now();
        self.controller.reset(&mut self.tree);
        self.last_pass_ms = js_sys::Date::now() - t0;
    }

    /// Re-run the current pass, e.g. from a MutationObserver tick.
    #[wasm_bindgen(js_name = refresh)]
    pub fn refresh(&mut self) {
        let t0 = js_sys::Date::now();
        self.controller.refresh(&mut self.tree);
        self.last_pass_ms = js_sys::Date::now() - t0;
    }

    /// Dispatch a tagged command object (`{type: "apply" | "remove" |
    /// "replaceAll" | "reset", ...}`).
    #[wasm_bindgen(js_name = handleCommand)]
    pub fn handle_command(&mut self, command: JsValue) {
        let command: Command = match serde_wasm_bindgen::from_value(command) {
            Ok(c) => c,
            Err(e) => {
                web_sys::console::warn_1(&format!("glosscore: bad command: {}", e).into());
                return;
            }
        };
        let t0 = js_sys::Date::now();
        self.controller.handle(&mut self.tree, command);
        self.last_pass_ms = js_sys::Date::now() - t0;
    }

    /// Stage the current selection text for debounced reporting.
    #[wasm_bindgen(js_name = offerSelection)]
    pub fn offer_selection(&mut self, text: &str) {
        self.selection.offer(text, Instant::now());
    }

    /// The selection to report now, or `null`. At most once per distinct
    /// value per settle window.
    #[wasm_bindgen(js_name = pollSelection)]
    pub fn poll_selection(&mut self) -> JsValue {
        match self.selection.poll(Instant::now()) {
            Some(text) => JsValue::from_str(&text),
            None => JsValue::NULL,
        }
    }

    /// Current engine status.
    #[wasm_bindgen(js_name = getStatus)]
    pub fn get_status(&self) -> JsValue {
        let status = serde_json::json!({
            "vocab_count": self.controller.vocab_len(),
            "rule_count": self.controller.rule_count(),
            "pass_count": self.controller.pass_count(),
            "tracked_nodes": self.controller.tracked_nodes(),
            "live_handles": self.tree.live_handles(),
            "selection_pending": self.selection.has_pending(),
            "last_pass_ms": self.last_pass_ms,
        });
        JsValue::from_str(&status.to_string())
    }
}

// ==================== CODEC EXPORTS ====================

fn parse_store(entries: JsValue) -> Result<VocabStore, JsValue> {
    let entries: Vec<VocabEntry> = serde_wasm_bindgen::from_value(entries)
        .map_err(|e| JsValue::from_str(&format!("Invalid entry list: {}", e)))?;
    Ok(VocabStore::from_entries(entries))
}

/// Plain-text export: one term per line, ascending by creation time.
#[wasm_bindgen(js_name = exportText)]
pub fn export_text_js(entries: JsValue) -> Result<String, JsValue> {
    Ok(vocab::codec::export_text(&parse_store(entries)?))
}

/// Versioned JSON export: `{version: 1, exportedAt, items}`.
#[wasm_bindgen(js_name = exportJson)]
pub fn export_json_js(entries: JsValue) -> Result<String, JsValue> {
    Ok(vocab::codec::export_json(&parse_store(entries)?))
}

/// Merge a plain-text payload into an entry list; returns
/// `{list, insertedCount, failed: [{line, reason}]}`.
#[wasm_bindgen(js_name = importText)]
pub fn import_text_js(text: &str, existing: JsValue) -> Result<JsValue, JsValue> {
    let report = vocab::codec::import_text(text, &parse_store(existing)?);
    serde_wasm_bindgen::to_value(&report)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

/// Merge a JSON envelope payload into an entry list.
#[wasm_bindgen(js_name = importJson)]
pub fn import_json_js(text: &str, existing: JsValue) -> Result<JsValue, JsValue> {
    let report = vocab::codec::import_json(text, &parse_store(existing)?);
    serde_wasm_bindgen::to_value(&report)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

// ==================== TESTS ====================
