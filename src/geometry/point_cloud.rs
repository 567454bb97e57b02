//! Point-cloud assembly from decoded LAS records.
//!
//! Raw integer coordinates become world positions by multiplying with the
//! header scale triple. The header offset is not added per point; it is
//! carried once on the [`PointCloud`] so callers keep full double precision
//! near the origin. A configured world offset rebases the cloud instead:
//! each position gets `header_offset - world_offset` added and the cloud
//! reports the configured offset.

use ahash::AHashMap;
use once_cell::sync::Lazy;

use crate::io::las::{Classification, LasHeader, RawPoint, VariableLengthRecord};
use crate::notification::NotificationCollection;
use crate::types::{BoundingBox3D, Rgb, Vector3};

/// Display colors for the ASPRS standard classes.
static CLASSIFICATION_COLORS: Lazy<AHashMap<Classification, Rgb>> = Lazy::new(|| {
    let mut map = AHashMap::new();
    map.insert(Classification::Created, Rgb::new(120, 120, 120));
    map.insert(Classification::Unclassified, Rgb::new(180, 180, 180));
    map.insert(Classification::Ground, Rgb::new(125, 95, 5));
    map.insert(Classification::LowVegetation, Rgb::new(0, 128, 0));
    map.insert(Classification::MediumVegetation, Rgb::new(0, 160, 0));
    map.insert(Classification::HighVegetation, Rgb::new(0, 192, 0));
    map.insert(Classification::Building, Rgb::new(160, 64, 32));
    map.insert(Classification::LowPoint, Rgb::new(64, 64, 64));
    map.insert(Classification::ModelKeyPoint, Rgb::new(255, 0, 255));
    map.insert(Classification::Water, Rgb::new(0, 64, 192));
    map.insert(Classification::OverlapPoints, Rgb::new(255, 255, 0));
    map
});

/// Color for a classification, if it is one of the standard mapped classes.
pub fn classification_color(class: Classification) -> Option<Rgb> {
    CLASSIFICATION_COLORS.get(&class).copied()
}

/// One colored point in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CloudPoint {
    pub position: Vector3,
    pub color: Rgb,
    pub classification: Classification,
    pub intensity: u16,
}

/// A bounded slice of the cloud, at most the configured chunk size.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PointChunk {
    pub points: Vec<CloudPoint>,
}

/// The decoded cloud: header, VLRs, chunked points and overall bounds.
#[derive(Debug)]
pub struct PointCloud {
    pub header: LasHeader,
    pub vlrs: Vec<VariableLengthRecord>,
    /// Offset the positions are relative to.
    pub offset: Vector3,
    pub bounds: BoundingBox3D,
    pub chunks: Vec<PointChunk>,
    pub notifications: NotificationCollection,
}

impl PointCloud {
    pub fn point_count(&self) -> usize {
        self.chunks.iter().map(|c| c.points.len()).sum()
    }

    pub fn iter_points(&self) -> impl Iterator<Item = &CloudPoint> {
        self.chunks.iter().flat_map(|c| c.points.iter())
    }
}

/// Convert raw records into chunked world-space points.
///
/// Color precedence per point: embedded RGB channels, then the standard
/// classification color, then a grayscale from intensity normalized against
/// the full 16-bit range.
pub fn assemble_point_cloud(
    header: LasHeader,
    vlrs: Vec<VariableLengthRecord>,
    raw_points: Vec<RawPoint>,
    world_offset: Option<Vector3>,
    chunk_size: usize,
    notifications: NotificationCollection,
) -> PointCloud {
    let core = header.core();
    let scale = core.scale;
    let rebase = world_offset.map(|w| core.offset - w);
    let offset = world_offset.unwrap_or(core.offset);

    let chunk_size = chunk_size.max(1);
    let mut bounds = BoundingBox3D::empty();
    let mut chunks = Vec::with_capacity(raw_points.len().div_ceil(chunk_size));
    let mut current = PointChunk {
        points: Vec::with_capacity(chunk_size.min(raw_points.len())),
    };

    for raw in raw_points {
        let mut position =
            Vector3::new(raw.x as f64, raw.y as f64, raw.z as f64).scale(scale);
        if let Some(shift) = rebase {
            position = position + shift;
        }
        bounds.extend(position);

        current.points.push(CloudPoint {
            position,
            color: point_color(&raw),
            classification: raw.classification,
            intensity: raw.intensity,
        });
        if current.points.len() == chunk_size {
            chunks.push(std::mem::take(&mut current));
        }
    }
    if !current.points.is_empty() {
        chunks.push(current);
    }

    PointCloud {
        header,
        vlrs,
        offset,
        bounds,
        chunks,
        notifications,
    }
}

fn point_color(raw: &RawPoint) -> Rgb {
    if let Some(rgb) = raw.color {
        return Rgb::from_u16_channels(rgb.red, rgb.green, rgb.blue);
    }
    if let Some(color) = classification_color(raw.classification) {
        return color;
    }
    Rgb::gray(raw.intensity as f64 / u16::MAX as f64)
}
