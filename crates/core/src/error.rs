//! Error types for mapstate
//!
//! This module defines all error types used throughout the state layer.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.

use crate::types::ItemId;
use std::io;
use thiserror::Error;

/// Result type alias for mapstate operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the state stores
#[derive(Debug, Error)]
pub enum Error {
    /// A positional access fell outside the store
    ///
    /// Positions shift after removals, so this usually means the caller kept
    /// a position across a structural change.
    #[error("Position {pos} out of range (len {len})")]
    PositionOutOfRange {
        /// Requested position
        pos: usize,
        /// Number of entries at the time of the access
        len: usize,
    },

    /// Geometry payload does not match its kind
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    /// The backing object store could not produce an item's geometry
    #[error("Object store lookup failed for item {item_id}: {reason}")]
    ObjectStore {
        /// Item that was requested
        item_id: ItemId,
        /// Collaborator-provided reason
        reason: String,
    },

    /// The search completer failed
    #[error("Completer error: {0}")]
    Completer(String),

    /// Configuration could not be parsed or validated
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error (reading configuration files)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    /// Build an out-of-range error for position `pos` in a store of `len` entries
    pub fn out_of_range(pos: usize, len: usize) -> Self {
        Error::PositionOutOfRange { pos, len }
    }

    /// Build an object-store failure for `item_id`
    pub fn object_store(item_id: ItemId, reason: impl Into<String>) -> Self {
        Error::ObjectStore {
            item_id,
            reason: reason.into(),
        }
    }

    /// True for programmer errors (bad positions, malformed geometry)
    ///
    /// Collaborator and configuration failures return false.
    pub fn is_contract_violation(&self) -> bool {
        matches!(
            self,
            Error::PositionOutOfRange { .. } | Error::InvalidGeometry(_)
        )
    }
}
