//! Collaborator traits
//!
//! The state layer never implements search or geometry lookup itself. These
//! traits are the boundary to the engine that does. Implementations must be
//! safe for concurrent shared access; stores call them from whichever thread
//! issues the mutation.

use crate::error::Result;
use crate::index::{CellQueryResult, ItemIndex};
use crate::types::{GeometryKind, ItemId, LineString};
use std::sync::Arc;

/// Lookup of item geometry in the backing object store
pub trait ObjectStore: Send + Sync {
    /// Fetch the geometry of `item_id`
    ///
    /// Called while the item-geometry store holds its write lock, so this
    /// must be an in-process lookup, not network I/O.
    fn fetch_geometry(&self, item_id: ItemId) -> Result<(GeometryKind, LineString)>;
}

/// Search engine producing query results and spatial covers
pub trait Completer: Send + Sync {
    /// Run a text query
    ///
    /// Returns the per-cell result and the flattened set of matching items.
    fn complete(&self, query: &str) -> Result<(CellQueryResult, ItemIndex)>;

    /// Cells of the spatial partition covered by a geometry
    fn cells_for(&self, kind: GeometryKind, data: &LineString) -> Result<ItemIndex>;

    /// Triangles of the spatial partition covered by a geometry
    fn triangles_for(&self, kind: GeometryKind, data: &LineString) -> Result<ItemIndex>;

    /// Object store backing the indexed items
    fn object_store(&self) -> Arc<dyn ObjectStore>;
}
