//! Geometry value types shared by every store
//!
//! - Coordinate / LineString: the minimal coordinate payload carried by entries
//! - GeometryKind: how a LineString is interpreted by the renderer
//! - ActiveFlags: independently togglable display facets of an entry

use crate::error::{Error, Result};
use bitflags::bitflags;
use std::fmt;

/// Identifier of an item in the external object store
pub type ItemId = u32;

/// A WGS84 coordinate in degrees
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Coordinate {
    /// Latitude in degrees
    pub lat: f64,
    /// Longitude in degrees
    pub lon: f64,
}

impl Coordinate {
    /// Create a coordinate from latitude and longitude
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Axis-aligned bounds of a LineString
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    /// South-west corner
    pub min: Coordinate,
    /// North-east corner
    pub max: Coordinate,
}

impl BoundingBox {
    /// Center of the box, used to recenter a view on an item
    pub fn center(&self) -> Coordinate {
        Coordinate::new(
            (self.min.lat + self.max.lat) / 2.0,
            (self.min.lon + self.max.lon) / 2.0,
        )
    }
}

/// Ordered sequence of coordinates
///
/// Point, rect and polygon geometries are all carried as a LineString; the
/// entry's [`GeometryKind`] says how to read it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LineString {
    points: Vec<Coordinate>,
}

impl LineString {
    /// Create an empty line string
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a coordinate
    pub fn push(&mut self, c: Coordinate) {
        self.points.push(c);
    }

    /// Number of coordinates
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True if there are no coordinates
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Iterate coordinates in order
    pub fn iter(&self) -> impl Iterator<Item = &Coordinate> + '_ {
        self.points.iter()
    }

    /// Coordinates as a slice
    pub fn as_slice(&self) -> &[Coordinate] {
        &self.points
    }

    /// Bounds of all coordinates, `None` when empty
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        let first = *self.points.first()?;
        let bbox = self.points.iter().skip(1).fold(
            BoundingBox {
                min: first,
                max: first,
            },
            |mut acc, c| {
                acc.min.lat = acc.min.lat.min(c.lat);
                acc.min.lon = acc.min.lon.min(c.lon);
                acc.max.lat = acc.max.lat.max(c.lat);
                acc.max.lon = acc.max.lon.max(c.lon);
                acc
            },
        );
        Some(bbox)
    }
}

impl From<Vec<Coordinate>> for LineString {
    fn from(points: Vec<Coordinate>) -> Self {
        Self { points }
    }
}

impl FromIterator<Coordinate> for LineString {
    fn from_iter<I: IntoIterator<Item = Coordinate>>(iter: I) -> Self {
        Self {
            points: iter.into_iter().collect(),
        }
    }
}

/// How an entry's LineString is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GeometryKind {
    /// Not yet initialized; carries no data
    #[default]
    Invalid,
    /// A single coordinate
    Point,
    /// Two opposite corners
    Rect,
    /// An open path
    Path,
    /// A closed ring
    Polygon,
}

impl GeometryKind {
    /// Check that `data` is consistent with this kind
    ///
    /// Invalid geometries must be empty. Every other kind accepts any
    /// number of coordinates, including none while a shape is being drawn.
    pub fn validate(self, data: &LineString) -> Result<()> {
        if self == GeometryKind::Invalid && !data.is_empty() {
            return Err(Error::InvalidGeometry(format!(
                "invalid geometry carries {} coordinates",
                data.len()
            )));
        }
        Ok(())
    }

    /// Name used in logs
    pub fn as_str(self) -> &'static str {
        match self {
            GeometryKind::Invalid => "invalid",
            GeometryKind::Point => "point",
            GeometryKind::Rect => "rect",
            GeometryKind::Path => "path",
            GeometryKind::Polygon => "polygon",
        }
    }
}

impl fmt::Display for GeometryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

bitflags! {
    /// Display facets of a geometry entry
    ///
    /// Each facet toggles independently: the geometry itself, its covering
    /// triangles and its covering cells.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ActiveFlags: u8 {
        /// Draw the geometry
        const SHOW = 0x1;
        /// Draw the covering triangles
        const TRIANGLES = 0x2;
        /// Draw the covering cells
        const CELLS = 0x4;
    }
}

impl ActiveFlags {
    /// No facet active
    pub const NONE: ActiveFlags = ActiveFlags::empty();

    /// Copy of `self` with `flag` set
    #[must_use]
    pub fn with(self, flag: ActiveFlags) -> Self {
        self | flag
    }

    /// Copy of `self` with `flag` cleared
    #[must_use]
    pub fn without(self, flag: ActiveFlags) -> Self {
        self - flag
    }

    /// Copy of `self` with `flag` flipped
    #[must_use]
    pub fn toggled(self, flag: ActiveFlags) -> Self {
        self ^ flag
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn path3() -> LineString {
        vec![
            Coordinate::new(48.0, 9.0),
            Coordinate::new(48.5, 9.5),
            Coordinate::new(47.5, 10.0),
        ]
        .into()
    }

    #[test]
    fn test_bounding_box() {
        let bbox = path3().bounding_box().unwrap();
        assert_eq!(bbox.min, Coordinate::new(47.5, 9.0));
        assert_eq!(bbox.max, Coordinate::new(48.5, 10.0));
        assert_eq!(bbox.center(), Coordinate::new(48.0, 9.5));
        assert!(LineString::new().bounding_box().is_none());
    }

    #[test]
    fn test_invalid_kind_requires_empty_data() {
        assert!(GeometryKind::Invalid.validate(&LineString::new()).is_ok());
        let err = GeometryKind::Invalid.validate(&path3()).unwrap_err();
        assert!(matches!(err, Error::InvalidGeometry(_)));
    }

    #[test]
    fn test_concrete_kind_accepts_any_data() {
        assert!(GeometryKind::Path.validate(&path3()).is_ok());
        assert!(GeometryKind::Path.validate(&LineString::new()).is_ok());
        assert!(GeometryKind::Point.validate(&LineString::new()).is_ok());
        assert!(GeometryKind::Polygon.validate(&path3()).is_ok());
    }

    #[test]
    fn test_default_kind_and_flags() {
        assert_eq!(GeometryKind::default(), GeometryKind::Invalid);
        assert_eq!(ActiveFlags::default(), ActiveFlags::NONE);
        assert!(ActiveFlags::NONE.is_empty());
    }

    #[test]
    fn test_flag_algebra() {
        let f = ActiveFlags::SHOW.with(ActiveFlags::CELLS);
        assert!(f.contains(ActiveFlags::SHOW));
        assert!(f.contains(ActiveFlags::CELLS));
        assert!(!f.contains(ActiveFlags::TRIANGLES));
        assert_eq!(f.without(ActiveFlags::SHOW), ActiveFlags::CELLS);
        assert_eq!(f.toggled(ActiveFlags::TRIANGLES), ActiveFlags::all());
        assert_eq!(f & ActiveFlags::CELLS, ActiveFlags::CELLS);
    }

    fn any_flags() -> impl Strategy<Value = ActiveFlags> {
        (0u8..8).prop_map(ActiveFlags::from_bits_truncate)
    }

    proptest! {
        #[test]
        fn prop_toggle_twice_is_identity(mask in any_flags(), flag in any_flags()) {
            prop_assert_eq!(mask.toggled(flag).toggled(flag), mask);
        }

        #[test]
        fn prop_without_after_with_restores_unset_bits(mask in any_flags(), flag in any_flags()) {
            let restored = mask.with(flag).without(flag);
            prop_assert_eq!(restored, mask - flag);
            if (mask & flag).is_empty() {
                prop_assert_eq!(restored, mask);
            }
        }
    }
}
