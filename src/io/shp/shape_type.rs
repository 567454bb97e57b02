//! Shapefile shape-type discriminator.

use std::fmt;

use crate::error::{DecodeError, Result};

/// Shape-type tag stored in the shapefile header and at the start of every
/// record body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeType {
    NullShape,
    Point,
    Polyline,
    Polygon,
    MultiPoint,
    PointZ,
    PolylineZ,
    PolygonZ,
    MultiPointZ,
    PointM,
    PolylineM,
    PolygonM,
    MultiPointM,
    MultiPatch,
}

/// The geometric family a shape type decodes as. The Z and M variants of a
/// family share one decode path; the extra coordinate arrays are appended
/// after the base layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    Null,
    Point,
    Polyline,
    Polygon,
    MultiPoint,
    MultiPatch,
}

impl ShapeType {
    /// Map the on-disk i32 shape-type value to a variant.
    pub fn from_raw(value: i32) -> Result<Self> {
        Ok(match value {
            0 => Self::NullShape,
            1 => Self::Point,
            3 => Self::Polyline,
            5 => Self::Polygon,
            8 => Self::MultiPoint,
            11 => Self::PointZ,
            13 => Self::PolylineZ,
            15 => Self::PolygonZ,
            18 => Self::MultiPointZ,
            21 => Self::PointM,
            23 => Self::PolylineM,
            25 => Self::PolygonM,
            28 => Self::MultiPointM,
            31 => Self::MultiPatch,
            other => return Err(DecodeError::InvalidShapeType(other)),
        })
    }

    /// The on-disk i32 value.
    pub fn as_raw(&self) -> i32 {
        match self {
            Self::NullShape => 0,
            Self::Point => 1,
            Self::Polyline => 3,
            Self::Polygon => 5,
            Self::MultiPoint => 8,
            Self::PointZ => 11,
            Self::PolylineZ => 13,
            Self::PolygonZ => 15,
            Self::MultiPointZ => 18,
            Self::PointM => 21,
            Self::PolylineM => 23,
            Self::PolygonM => 25,
            Self::MultiPointM => 28,
            Self::MultiPatch => 31,
        }
    }

    /// The decode family for this type.
    pub fn kind(&self) -> ShapeKind {
        match self {
            Self::NullShape => ShapeKind::Null,
            Self::Point | Self::PointZ | Self::PointM => ShapeKind::Point,
            Self::Polyline | Self::PolylineZ | Self::PolylineM => ShapeKind::Polyline,
            Self::Polygon | Self::PolygonZ | Self::PolygonM => ShapeKind::Polygon,
            Self::MultiPoint | Self::MultiPointZ | Self::MultiPointM => ShapeKind::MultiPoint,
            Self::MultiPatch => ShapeKind::MultiPatch,
        }
    }

    /// Whether records of this type carry a Z coordinate array.
    pub fn has_z(&self) -> bool {
        matches!(
            self,
            Self::PointZ | Self::PolylineZ | Self::PolygonZ | Self::MultiPointZ
        )
    }

    /// Whether records of this type may carry measure values. Z variants
    /// carry an optional M block after the Z block.
    pub fn has_m(&self) -> bool {
        self.has_z()
            || matches!(
                self,
                Self::PointM | Self::PolylineM | Self::PolygonM | Self::MultiPointM
            )
    }
}

impl fmt::Display for ShapeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}
