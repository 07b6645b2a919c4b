//! GeometryEntry: the unit stored by both geometry stores

use mapstate_core::{ActiveFlags, Error, GeometryKind, ItemIndex, LineString, Result};

/// A named geometry with display flags and cached spatial covers
///
/// Invariant: an entry of kind `Invalid` has no data and no active flags.
/// The constructors and [`GeometryEntry::apply_flag`] enforce it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GeometryEntry {
    /// Display label
    pub name: String,
    /// Coordinates, read according to `kind`
    pub data: LineString,
    /// How `data` is interpreted
    pub kind: GeometryKind,
    /// Active display facets
    pub active: ActiveFlags,
    /// Covering triangles, empty until set
    pub triangles: ItemIndex,
    /// Covering cells, empty until set
    pub cells: ItemIndex,
}

impl GeometryEntry {
    /// Create an inactive entry, rejecting data that contradicts `kind`
    pub fn new(name: impl Into<String>, data: LineString, kind: GeometryKind) -> Result<Self> {
        kind.validate(&data)?;
        Ok(Self {
            name: name.into(),
            data,
            kind,
            ..Self::default()
        })
    }

    /// True unless the entry is an uninitialized placeholder
    pub fn is_valid(&self) -> bool {
        self.kind != GeometryKind::Invalid
    }

    /// Apply a flag operation, returning the new mask
    ///
    /// Fails without touching the mask if the result would activate a facet
    /// on an Invalid entry.
    pub fn apply_flag(&mut self, op: FlagOp, flag: ActiveFlags) -> Result<ActiveFlags> {
        let next = op.apply(self.active, flag);
        if !self.is_valid() && !next.is_empty() {
            return Err(Error::InvalidGeometry(format!(
                "cannot activate {:?} on uninitialized entry '{}'",
                flag, self.name
            )));
        }
        self.active = next;
        Ok(next)
    }
}

/// Flag operation applied to an entry's active mask
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagOp {
    /// Set the flag
    Activate,
    /// Clear the flag
    Deactivate,
    /// Flip the flag
    Toggle,
}

impl FlagOp {
    /// Result of applying this operation to `mask`
    pub fn apply(self, mask: ActiveFlags, flag: ActiveFlags) -> ActiveFlags {
        match self {
            FlagOp::Activate => mask.with(flag),
            FlagOp::Deactivate => mask.without(flag),
            FlagOp::Toggle => mask.toggled(flag),
        }
    }
}
