//! Bounding box types for decoded geometry

use super::vector::{Vector2, Vector3};

/// Axis-aligned 2D bounding box (shapefile record extents)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BoundingBox2D {
    pub min: Vector2,
    pub max: Vector2,
}

impl BoundingBox2D {
    /// Create from min/max corner coordinates
    pub const fn new(x_min: f64, y_min: f64, x_max: f64, y_max: f64) -> Self {
        BoundingBox2D {
            min: Vector2::new(x_min, y_min),
            max: Vector2::new(x_max, y_max),
        }
    }

    /// Width along X
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    /// Height along Y
    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    /// Center point
    pub fn center(&self) -> Vector2 {
        Vector2::new(
            (self.min.x + self.max.x) * 0.5,
            (self.min.y + self.max.y) * 0.5,
        )
    }

    /// Whether a point lies inside (inclusive of the boundary)
    pub fn contains(&self, p: Vector2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
}

/// Axis-aligned 3D bounding box (LAS extents, shapefile header box)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BoundingBox3D {
    pub min: Vector3,
    pub max: Vector3,
}

impl BoundingBox3D {
    /// Create from corner vectors
    pub const fn from_corners(min: Vector3, max: Vector3) -> Self {
        BoundingBox3D { min, max }
    }

    /// Center point
    pub fn center(&self) -> Vector3 {
        (self.min + self.max) * 0.5
    }

    /// Extent along each axis
    pub fn size(&self) -> Vector3 {
        self.max - self.min
    }

    /// Grow to include a point
    pub fn extend(&mut self, p: Vector3) {
        self.min.x = self.min.x.min(p.x);
        self.min.y = self.min.y.min(p.y);
        self.min.z = self.min.z.min(p.z);
        self.max.x = self.max.x.max(p.x);
        self.max.y = self.max.y.max(p.y);
        self.max.z = self.max.z.max(p.z);
    }

    /// An inverted box that [`extend`](Self::extend) can grow from.
    pub fn empty() -> Self {
        BoundingBox3D {
            min: Vector3::new(f64::INFINITY, f64::INFINITY, f64::INFINITY),
            max: Vector3::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }
}
