//! Events emitted by the stores
//!
//! Every event is delivered after the mutation that caused it is complete
//! and the store's write lock has been released.

use mapstate_core::ItemId;

/// Emitted by [`crate::SearchGeometryState`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchGeometryEvent {
    /// An entry was added or removed; previously held positions may be stale
    Structural,
    /// The entry at this position changed in place
    Changed(usize),
}

/// Emitted by [`crate::ItemGeometryState`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemGeometryEvent {
    /// The set of entries or their flags changed
    Changed,
    /// Request to recenter the view on an item; not a data change
    ZoomToItem(ItemId),
}

/// Emitted by [`crate::TextSearchState`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextSearchEvent {
    /// The search text changed to this value
    Changed(String),
}

/// Emitted by [`crate::ResultListState`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultListEvent {
    /// Query, cell result and items were replaced together
    Changed,
}
