//! TextSearchState: the current search query text

use crate::events::TextSearchEvent;
use mapstate_concurrency::{LockableState, Notifier, Subscription};
use tracing::debug;

/// Single text value with change-on-write notification
pub struct TextSearchState {
    text: LockableState<String>,
    notifier: Notifier<TextSearchEvent>,
}

impl Default for TextSearchState {
    fn default() -> Self {
        Self::new(String::new())
    }
}

impl TextSearchState {
    /// Create a store holding `initial`
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            text: LockableState::new("text_search", initial.into()),
            notifier: Notifier::new(),
        }
    }

    /// Register an observer for this store's events
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&TextSearchEvent) + Send + Sync + 'static,
    {
        self.notifier.subscribe(callback)
    }

    /// Current search text
    pub fn search_text(&self) -> String {
        self.text.read_lock().clone()
    }

    /// Replace the search text
    ///
    /// Setting the current value again is a no-op and emits nothing, so a
    /// text field re-emitting on every re-render does not cause a storm.
    /// Returns whether the value changed.
    pub fn set_search_text(&self, value: impl Into<String>) -> bool {
        let value = value.into();
        let changed = {
            let mut guard = self.text.write_lock();
            if *guard == value {
                false
            } else {
                *guard = value.clone();
                true
            }
        };
        if changed {
            debug!(len = value.len(), "search text changed");
            self.notifier.emit(&TextSearchEvent::Changed(value));
        }
        changed
    }
}
