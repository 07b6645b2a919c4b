//! mapstate - Concurrent UI state for map and search front-ends
//!
//! mapstate holds the mutable state shared between a search backend and an
//! interactive map/list UI: user-drawn search geometries, highlighted item
//! geometries, the current query text and the current result list. Each
//! store is read from rendering threads and written from input threads
//! concurrently, and notifies subscribers after every change.
//!
//! # Quick Start
//!
//! ```ignore
//! use mapstate::{ActiveFlags, StateBundle, StatesConfig};
//!
//! let states = StateBundle::new(completer, &StatesConfig::default());
//!
//! // Redraw the result list whenever it changes
//! let _sub = states.result_list.subscribe(|_| request_redraw());
//!
//! // Type a query and publish its result
//! states.run_query_for("coffee")?;
//!
//! // Highlight the first result on the map
//! let item = states.show_result_item(0)?;
//! assert!(states.item_geometry.active(item).contains(ActiveFlags::SHOW));
//! ```
//!
//! # Architecture
//!
//! - `mapstate-core`: value types, errors, collaborator traits
//! - `mapstate-concurrency`: `LockableState` and `Notifier`
//! - `mapstate-primitives`: the four stores
//! - `mapstate-engine`: `StateBundle` and configuration

pub use mapstate_concurrency::{LockKind, LockableState, Notifier, ScopedLock, Subscription};
pub use mapstate_core::*;
pub use mapstate_engine::{StateBundle, StatesConfig, CONFIG_FILE_NAME};
pub use mapstate_primitives::{
    FlagOp, GeometryEntry, ItemGeometryEvent, ItemGeometryState, ResultListEvent,
    ResultListState, ResultSnapshot, SearchGeometryEvent, SearchGeometryState, TextSearchEvent,
    TextSearchState,
};
