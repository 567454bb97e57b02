//! LAS LiDAR point-cloud decoding.
//!
//! Handles versions 1.0 through 1.4 and point-data formats 0 through 10.
//! The reader validates the `LASF` signature, peeks the version to select a
//! header layout, walks the variable length records and then decodes the
//! point loop into a [`crate::geometry::point_cloud::PointCloud`].
//! Compressed LAZ streams are out of scope.

mod header;
mod point;
mod reader;
mod vlr;

pub use header::{GlobalEncoding, LasHeader, LasHeaderCore};
pub use point::{Classification, PointFormatId, PointRgb, RawPoint, WavePacket};
pub use reader::{read_file, LasReadOptions, LasReader, ProgressCallback};
pub use vlr::{
    ClassificationLookupEntry, GeoKeyEntry, VariableLengthRecord, VlrContent, VLR_HEADER_SIZE,
};
