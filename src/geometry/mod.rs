//! Geometry assembly on top of the decoded records: polygon ring grouping
//! for shapefiles and world-space point-cloud construction for LAS.

pub mod point_cloud;
pub mod rings;

pub use point_cloud::{
    assemble_point_cloud, classification_color, CloudPoint, PointChunk, PointCloud,
};
pub use rings::{
    assemble_paths, assemble_polygons, is_clockwise, point_in_ring, signed_area, split_parts,
    PolygonGroup,
};
