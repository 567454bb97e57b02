//! Decoded shapefile structures.

use crate::notification::NotificationCollection;
use crate::types::{BoundingBox2D, BoundingBox3D, Vector3};

use super::shape_type::ShapeType;

/// One decoded vertex: position plus the optional measure value carried by
/// the M/Z shape variants.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapePoint {
    pub position: Vector3,
    pub m: Option<f64>,
}

impl ShapePoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            position: Vector3::new(x, y, 0.0),
            m: None,
        }
    }

    pub fn with_z(x: f64, y: f64, z: f64) -> Self {
        Self {
            position: Vector3::new(x, y, z),
            m: None,
        }
    }
}

/// Flat multi-part payload shared by polyline and polygon records: the wire
/// format stores a part-index table into one vertex array, and raw decode
/// mirrors that directly. Ring/hole grouping happens later in
/// [`crate::geometry::rings`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PolyShape {
    pub bbox: BoundingBox2D,
    /// Start index of each part in `points`.
    pub parts: Vec<u32>,
    pub points: Vec<ShapePoint>,
}

impl PolyShape {
    /// Number of parts (rings or paths).
    pub fn part_count(&self) -> usize {
        self.parts.len()
    }
}

/// Type-specific payload of one shape record.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Point(ShapePoint),
    MultiPoint {
        bbox: BoundingBox2D,
        points: Vec<ShapePoint>,
    },
    Polyline(PolyShape),
    Polygon(PolyShape),
    /// MultiPatch records are recognized but their payload is not decoded;
    /// the record's declared content length is skipped so the stream stays
    /// aligned.
    MultiPatch,
}

/// One geometry record from the record stream.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeRecord {
    /// 1-based record number from the record header.
    pub record_number: i32,
    pub shape: Shape,
}

/// Decoded 100-byte shapefile header.
#[derive(Debug, Clone, PartialEq)]
pub struct ShpHeader {
    /// Declared total file length, in 16-bit words.
    pub file_length_words: i32,
    pub version: i32,
    /// File-level shape type all records must match (Null excepted).
    pub shape_type: ShapeType,
    pub bbox: BoundingBox3D,
    pub m_min: f64,
    pub m_max: f64,
}

/// Full decode output: the header, the ordered non-null records, and any
/// non-fatal conditions encountered along the way.
#[derive(Debug, Clone)]
pub struct ShapeCollection {
    pub header: ShpHeader,
    pub records: Vec<ShapeRecord>,
    pub notifications: NotificationCollection,
}

impl ShapeCollection {
    /// Number of decoded records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True iff no records were decoded.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterate over the decoded records.
    pub fn iter(&self) -> std::slice::Iter<'_, ShapeRecord> {
        self.records.iter()
    }
}
