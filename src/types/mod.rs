//! Shared value types: vectors, colors, bounding boxes.

mod bounds;
mod color;
mod vector;

pub use bounds::{BoundingBox2D, BoundingBox3D};
pub use color::Rgb;
pub use vector::{Vector2, Vector3};
