//! ResultListState: the current query result
//!
//! Query string, per-cell result and flattened item list are replaced
//! together under one exclusive hold. A reader never observes a mix of an
//! old and a new result.

use crate::events::ResultListEvent;
use mapstate_concurrency::{LockableState, Notifier, Subscription};
use mapstate_core::{CellQueryResult, Error, ItemId, ItemIndex, Result};
use tracing::debug;

/// Consistent copy of a result
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResultSnapshot {
    /// Query that produced the result
    pub query: String,
    /// Per-cell result from the completer
    pub cqr: CellQueryResult,
    /// Flattened result item ids
    pub items: ItemIndex,
}

/// Result list store
pub struct ResultListState {
    result: LockableState<ResultSnapshot>,
    notifier: Notifier<ResultListEvent>,
}

impl Default for ResultListState {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultListState {
    /// Create an empty result list
    pub fn new() -> Self {
        Self {
            result: LockableState::new("result_list", ResultSnapshot::default()),
            notifier: Notifier::new(),
        }
    }

    /// Register an observer for this store's events
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&ResultListEvent) + Send + Sync + 'static,
    {
        self.notifier.subscribe(callback)
    }

    /// Replace query, cell result and items as one unit
    pub fn set_result(&self, query: impl Into<String>, cqr: CellQueryResult, items: ItemIndex) {
        let next = ResultSnapshot {
            query: query.into(),
            cqr,
            items,
        };
        let (cells, count) = (next.cqr.cell_count(), next.items.len());
        *self.result.write_lock() = next;
        debug!(cells, items = count, "result list replaced");
        self.notifier.emit(&ResultListEvent::Changed);
    }

    /// Query string of the current result
    pub fn query_string(&self) -> String {
        self.result.read_lock().query.clone()
    }

    /// Per-cell result
    pub fn cqr(&self) -> CellQueryResult {
        self.result.read_lock().cqr.clone()
    }

    /// Flattened result item ids
    pub fn items(&self) -> ItemIndex {
        self.result.read_lock().items.clone()
    }

    /// Item id at `pos` of the flattened result
    pub fn item_id(&self, pos: usize) -> Result<ItemId> {
        let guard = self.result.read_lock();
        guard
            .items
            .at(pos)
            .ok_or_else(|| Error::out_of_range(pos, guard.items.len()))
    }

    /// Number of result items
    pub fn size(&self) -> usize {
        self.result.read_lock().items.len()
    }

    /// All three fields read under one shared hold
    pub fn snapshot(&self) -> ResultSnapshot {
        self.result.read_lock().clone()
    }
}
