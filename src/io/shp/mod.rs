//! ESRI Shapefile (SHP) decoding.
//!
//! A shapefile is a 100-byte fixed header followed by sequential
//! variable-length geometry records. [`ShpReader`] decodes a resident byte
//! buffer into a [`ShapeCollection`] of raw records; ring/hole grouping for
//! polygons is a separate post-process in [`crate::geometry::rings`].

mod reader;
mod record;
mod shape_type;

pub use reader::{read_file, ShpReader};
pub use record::{PolyShape, Shape, ShapeCollection, ShapePoint, ShapeRecord, ShpHeader};
pub use shape_type::{ShapeKind, ShapeType};
