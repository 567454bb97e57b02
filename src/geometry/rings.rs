//! Ring classification and polygon assembly for shapefile geometry.
//!
//! Shapefile polygons store all rings of all polygons in one flat vertex
//! array with a part-start index table. Outer rings wind clockwise (negative
//! shoelace area in a y-up frame), holes counter-clockwise. Assembly splits
//! the parts, classifies each ring by winding and assigns every hole to the
//! first outer ring that contains one of its vertices.

use crate::io::shp::{PolyShape, ShapePoint};
use crate::types::Vector2;

/// An outer ring with the holes punched into it.
#[derive(Debug, Clone, PartialEq)]
pub struct PolygonGroup {
    pub outer: Vec<ShapePoint>,
    pub holes: Vec<Vec<ShapePoint>>,
}

/// Shoelace sum. Negative for clockwise rings in a y-up frame.
pub fn signed_area(ring: &[ShapePoint]) -> f64 {
    if ring.len() < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..ring.len() {
        let a = ring[i].position;
        let b = ring[(i + 1) % ring.len()].position;
        sum += a.x * b.y - b.x * a.y;
    }
    sum / 2.0
}

pub fn is_clockwise(ring: &[ShapePoint]) -> bool {
    signed_area(ring) < 0.0
}

/// Even-odd ray cast against the ring edges.
pub fn point_in_ring(point: Vector2, ring: &[ShapePoint]) -> bool {
    if ring.len() < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = ring.len() - 1;
    for i in 0..ring.len() {
        let a = ring[i].position;
        let b = ring[j].position;
        if (a.y > point.y) != (b.y > point.y)
            && point.x < (b.x - a.x) * (point.y - a.y) / (b.y - a.y) + a.x
        {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Slice the flat vertex array at the part-start indices. Starts past the
/// vertex array and inverted ranges yield empty parts instead of panicking,
/// so hand-built shapes that bypass decode validation stay safe.
pub fn split_parts(shape: &PolyShape) -> Vec<Vec<ShapePoint>> {
    let mut parts = Vec::with_capacity(shape.parts.len());
    for (i, &start) in shape.parts.iter().enumerate() {
        let start = (start as usize).min(shape.points.len());
        let end = shape
            .parts
            .get(i + 1)
            .map(|&next| next as usize)
            .unwrap_or(shape.points.len())
            .clamp(start, shape.points.len());
        parts.push(shape.points[start..end].to_vec());
    }
    parts
}

/// Group the rings of a polygon shape into outer-plus-holes polygons.
///
/// Outer rings keep their part order. A hole joins the first outer ring, in
/// part order, that contains any of its vertices; a hole contained by no
/// outer becomes its own single-ring group at the end.
pub fn assemble_polygons(shape: &PolyShape) -> Vec<PolygonGroup> {
    let rings = split_parts(shape);
    let mut groups: Vec<PolygonGroup> = Vec::new();
    let mut holes: Vec<Vec<ShapePoint>> = Vec::new();

    for ring in rings {
        if is_clockwise(&ring) {
            groups.push(PolygonGroup {
                outer: ring,
                holes: Vec::new(),
            });
        } else {
            holes.push(ring);
        }
    }

    for hole in holes {
        let owner = groups.iter_mut().find(|group| {
            hole.iter()
                .any(|p| point_in_ring(p.position.xy(), &group.outer))
        });
        match owner {
            Some(group) => group.holes.push(hole),
            None => groups.push(PolygonGroup {
                outer: hole,
                holes: Vec::new(),
            }),
        }
    }
    groups
}

/// Polyline parts as independent paths. No winding semantics apply.
pub fn assemble_paths(shape: &PolyShape) -> Vec<Vec<ShapePoint>> {
    split_parts(shape)
}
