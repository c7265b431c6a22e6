//! Debounced selection-change notifier
//!
//! The content script reports the user's current text selection to the
//! extension background, but only after the selection has been stable for a
//! short window, and only when it actually changed. Poll-based: the host
//! calls `offer` on every selectionchange event and `poll` on a timer tick;
//! delivery itself is fire-and-forget and out of scope here.

use instant::Instant;
use std::time::Duration;

// ==================== CONSTANTS ====================

/// Default settle window before a selection is reported
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

// ==================== MAIN IMPLEMENTATION ====================

struct Pending {
    text: String,
    due: Instant,
}

/// Coalescing debouncer over selection text.
pub struct SelectionDebouncer {
    delay: Duration,
    pending: Option<Pending>,
    last_fired: Option<String>,
}

impl Default for SelectionDebouncer {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

impl SelectionDebouncer {
    pub fn new(delay: Duration) -> Self {
        Self { delay, pending: None, last_fired: None }
    }

    /// Stage a selection. A newer offer supersedes any pending one (implicit
    /// cancellation); a blank selection just clears the pending state.
    pub fn offer(&mut self, text: &str, now: Instant) {
        let text = text.trim();
        if text.is_empty() {
            self.pending = None;
            return;
        }
        self.pending = Some(Pending {
            text: text.to_string(),
            due: now + self.delay,
        });
    }

    /// Take the staged selection once its window has elapsed. Fires at most
    /// once per distinct value: a value equal to the last fired one is
    /// swallowed.
    pub fn poll(&mut self, now: Instant) -> Option<String> {
        if now < self.pending.as_ref()?.due {
            return None;
        }
        let text = self.pending.take()?.text;
        if self.last_fired.as_deref() == Some(text.as_str()) {
            return None;
        }
        self.last_fired = Some(text.clone());
        Some(text)
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }
}

// ==================== TESTS ====================

#[cfg(test)]
mod tests {
    use super::*;

    const DELAY: Duration = Duration::from_millis(300);

    #[test]
    fn test_fires_after_window() {
        let mut d = SelectionDebouncer::new(DELAY);
        let t0 = Instant::now();

        d.offer("hello", t0);
        assert_eq!(d.poll(t0), None);
        assert_eq!(d.poll(t0 + Duration::from_millis(100)), None);
        assert_eq!(d.poll(t0 + DELAY), Some("hello".to_string()));
        // Consumed
        assert_eq!(d.poll(t0 + DELAY * 2), None);
    }

    #[test]
    fn test_newer_offer_supersedes_pending() {
        let mut d = SelectionDebouncer::new(DELAY);
        let t0 = Instant::now();

        d.offer("first", t0);
        d.offer("second", t0 + Duration::from_millis(200));

        // The first offer's deadline passes unfired
        assert_eq!(d.poll(t0 + DELAY), None);
        assert_eq!(d.poll(t0 + Duration::from_millis(200) + DELAY), Some("second".to_string()));
    }

    #[test]
    fn test_same_value_fires_once() {
        let mut d = SelectionDebouncer::new(DELAY);
        let t0 = Instant::now();

        d.offer("hello", t0);
        assert_eq!(d.poll(t0 + DELAY), Some("hello".to_string()));

        d.offer("hello", t0 + DELAY);
        assert_eq!(d.poll(t0 + DELAY * 2), None);

        d.offer("world", t0 + DELAY * 2);
        assert_eq!(d.poll(t0 + DELAY * 3), Some("world".to_string()));
    }

    #[test]
    fn test_blank_selection_clears_pending() {
        let mut d = SelectionDebouncer::new(DELAY);
        let t0 = Instant::now();

        d.offer("hello", t0);
        d.offer("   ", t0 + Duration::from_millis(100));

        assert!(!d.has_pending());
        assert_eq!(d.poll(t0 + DELAY * 2), None);
    }
}
