//! Core types and traits for mapstate
//!
//! This crate defines the foundational types used throughout the system:
//! - Coordinate / LineString: geometry payload carried by entries
//! - GeometryKind: discriminates how a LineString is interpreted
//! - ActiveFlags: display facets toggled per entry
//! - ItemIndex / CellQueryResult: id sets produced by the search engine
//! - Error: error type hierarchy
//! - Traits: collaborator boundary (ObjectStore, Completer)

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod index;
pub mod traits;
pub mod types;

pub use error::{Error, Result};
pub use index::{CellMatch, CellQueryResult, ItemIndex};
pub use traits::{Completer, ObjectStore};
pub use types::{ActiveFlags, BoundingBox, Coordinate, GeometryKind, ItemId, LineString};
