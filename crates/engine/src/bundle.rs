//! StateBundle: the stores of one session plus the completer feeding them
//!
//! Built once at session start and cloned into every UI component. All
//! members are shared handles, so clones observe the same stores.
//!
//! ## Driving the Completer
//!
//! The completer is never called while a store lock is held. Each driver
//! reads what it needs under a shared hold, releases, calls the completer,
//! then writes the result back under an exclusive hold:
//!
//! ```text
//! run_query:            text_search (read) -> complete() -> result_list (write)
//! compute_search_cover: search_geometry (read) -> cells_for()/triangles_for()
//!                       -> search_geometry (write)
//! show_result_item:     result_list (read) -> item_geometry (write)
//! ```

use crate::config::StatesConfig;
use mapstate_core::{ActiveFlags, Completer, Error, ItemId, Result};
use mapstate_primitives::{
    ItemGeometryState, ResultListState, SearchGeometryState, TextSearchState,
};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// Shared handles to the session's completer and stores
#[derive(Clone)]
pub struct StateBundle {
    /// Search engine producing results and covers
    pub completer: Arc<dyn Completer>,
    /// User-drawn search geometries
    pub search_geometry: Arc<SearchGeometryState>,
    /// Highlighted item geometries
    pub item_geometry: Arc<ItemGeometryState>,
    /// Current search text
    pub text_search: Arc<TextSearchState>,
    /// Current query result
    pub result_list: Arc<ResultListState>,
}

impl StateBundle {
    /// Build all stores for a session
    pub fn new(completer: Arc<dyn Completer>, config: &StatesConfig) -> Self {
        let item_geometry = ItemGeometryState::new(completer.object_store())
            .with_zoom_on_show(config.zoom_on_show);
        Self {
            search_geometry: Arc::new(SearchGeometryState::with_capacity(
                config.search_geometry_capacity,
            )),
            item_geometry: Arc::new(item_geometry),
            text_search: Arc::new(TextSearchState::new(config.initial_search_text.clone())),
            result_list: Arc::new(ResultListState::new()),
            completer,
        }
    }

    /// Build all stores with the default configuration
    pub fn with_defaults(completer: Arc<dyn Completer>) -> Self {
        Self::new(completer, &StatesConfig::default())
    }

    /// Run the current search text through the completer and publish the result
    ///
    /// Returns the number of result items. On failure the previous result
    /// stays in place.
    pub fn run_query(&self) -> Result<usize> {
        let query = self.text_search.search_text();
        let (cqr, items) = self.completer.complete(&query).map_err(|e| {
            warn!(query = %query, error = %e, "query failed");
            completer_error(e)
        })?;
        let count = items.len();
        debug!(query = %query, items = count, "query completed");
        self.result_list.set_result(query, cqr, items);
        Ok(count)
    }

    /// Set the search text, then run it
    pub fn run_query_for(&self, text: impl Into<String>) -> Result<usize> {
        self.text_search.set_search_text(text);
        self.run_query()
    }

    /// Compute and cache the cells and triangles covered by the search
    /// geometry at `pos`
    ///
    /// The position is read and written in two separate holds. A concurrent
    /// `remove` in between shifts positions; callers that remove geometries
    /// from other threads must re-resolve positions after `Structural`.
    pub fn compute_search_cover(&self, pos: usize) -> Result<()> {
        let entry = self.search_geometry.entry(pos)?;
        let cells = self
            .completer
            .cells_for(entry.kind, &entry.data)
            .map_err(completer_error)?;
        let triangles = self
            .completer
            .triangles_for(entry.kind, &entry.data)
            .map_err(completer_error)?;
        debug!(
            pos,
            cells = cells.len(),
            triangles = triangles.len(),
            "search cover computed"
        );
        self.search_geometry.set_cells(pos, cells)?;
        self.search_geometry.set_triangles(pos, triangles)
    }

    /// Show the geometry of the result item at `pos`
    ///
    /// Returns the item id that was activated.
    pub fn show_result_item(&self, pos: usize) -> Result<ItemId> {
        let item_id = self.result_list.item_id(pos)?;
        self.item_geometry.activate(item_id, ActiveFlags::SHOW)?;
        Ok(item_id)
    }
}

impl fmt::Debug for StateBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateBundle")
            .field("search_geometries", &self.search_geometry.size())
            .field("item_geometries", &self.item_geometry.size())
            .field("results", &self.result_list.size())
            .finish()
    }
}

fn completer_error(e: Error) -> Error {
    match e {
        Error::Completer(_) => e,
        other => Error::Completer(other.to_string()),
    }
}
