//! State stores for mapstate
//!
//! Four independent stores, each guarding its own collection with a
//! reader/writer lock and notifying subscribers after every mutation:
//! - **SearchGeometryState**: user-drawn search geometries, by position
//! - **ItemGeometryState**: highlighted item geometries, by item id
//! - **TextSearchState**: the current query text
//! - **ResultListState**: the current query result
//!
//! ## Locking Discipline
//!
//! Every mutator takes the store's exclusive lock, mutates, releases, then
//! emits. Readers take the shared lock and return owned copies, so no guard
//! escapes a call. Stores lock independently; there are no cross-store
//! transactions.
//!
//! Callbacks passed to `for_each` run under the shared lock and must not
//! call any method of the same store, readers included. A nested read
//! queues behind any writer waiting on another thread, and that writer
//! waits for the outer read: deadlock. Collect what the callback needs and
//! act after `for_each` returns:
//!
//! ```ignore
//! let mut shown = Vec::new();
//! states.search_geometry.for_each(|pos, e| {
//!     if e.active.contains(ActiveFlags::SHOW) {
//!         shown.push(pos);
//!     }
//! });
//! for pos in shown {
//!     states.search_geometry.deactivate(pos, ActiveFlags::SHOW)?;
//! }
//! ```
//!
//! Subscribers run after release and may call anything.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod entry;
pub mod entry_store;
pub mod events;
pub mod item_geometry;
pub mod result_list;
pub mod search_geometry;
pub mod text_search;

pub use entry::{FlagOp, GeometryEntry};
pub use entry_store::{EntrySlots, EntryStore};
pub use events::{ItemGeometryEvent, ResultListEvent, SearchGeometryEvent, TextSearchEvent};
pub use item_geometry::ItemGeometryState;
pub use result_list::{ResultListState, ResultSnapshot};
pub use search_geometry::SearchGeometryState;
pub use text_search::TextSearchState;
