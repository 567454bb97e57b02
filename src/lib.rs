//! # gisbin
//!
//! A pure Rust library for decoding binary GIS formats: ESRI shapefiles
//! (SHP), dBase attribute tables (DBF) and LAS LiDAR point clouds.
//!
//! All three readers share one cursor over an in-memory buffer, so a decode
//! either returns a complete result or a single fatal error; recoverable
//! oddities in a file are reported through a notification side-channel
//! instead of aborting the read.
//!
//! ## Features
//!
//! - Shapefile geometry: points, polylines, polygons, multipoints, with the
//!   optional Z and M blocks
//! - dBase tables across the dBase II through IV header layouts, with
//!   language-driver aware text decoding
//! - LAS 1.0 through 1.4, point formats 0 through 10, variable length
//!   records
//! - Polygon ring assembly and colored point-cloud construction
//! - Cancellation tokens and progress reporting for large files
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use gisbin::io::{dbf, las, shp};
//!
//! let shapes = shp::read_file("parcels.shp")?;
//! for record in shapes.records.iter() {
//!     println!("shape #{}: {:?}", record.record_number, record.shape);
//! }
//!
//! let table = dbf::read_file("parcels.dbf")?;
//! let cloud = las::read_file("survey.las")?;
//! println!("{} points", cloud.point_count());
//! # Ok::<(), gisbin::error::DecodeError>(())
//! ```

#![allow(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod error;
pub mod geometry;
pub mod io;
pub mod notification;
pub mod types;

// Re-export commonly used types
pub use error::{DecodeError, Result};
pub use notification::{Notification, NotificationCollection, NotificationType};
pub use types::{BoundingBox2D, BoundingBox3D, Rgb, Vector2, Vector3};

// Re-export reader entry points
pub use io::dbf::{DbfReader, DbfTable};
pub use io::las::LasReader;
pub use io::shp::{ShapeCollection, ShpReader};
pub use io::{ByteCursor, Endianness};

// Re-export assembled geometry
pub use geometry::{PointCloud, PolygonGroup};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
