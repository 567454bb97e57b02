//! ESRI Shapefile (SHP) reader.
//!
//! The 100-byte header mixes byte orders: the signature and file length are
//! big-endian, everything from the version field on is little-endian. Each
//! record then carries a big-endian record header followed by a little-endian
//! body whose first field repeats the shape type. The endianness switch
//! points below are part of the documented decode sequence, not incidental.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::{DecodeError, Result};
use crate::io::cursor::{ByteCursor, Endianness};
use crate::notification::{NotificationCollection, NotificationType};
use crate::types::{BoundingBox2D, BoundingBox3D, Vector3};

use super::record::{PolyShape, Shape, ShapeCollection, ShapePoint, ShapeRecord, ShpHeader};
use super::shape_type::{ShapeKind, ShapeType};

/// Magic value at the start of every shapefile.
const SHP_SIGNATURE: i32 = 9994;
/// Fixed size of the file header in bytes.
const HEADER_SIZE: usize = 100;
/// Cancellation token is polled every this many records.
const CANCEL_CHECK_INTERVAL: usize = 1024;

/// Shapefile reader. Decodes an in-memory SHP buffer into a
/// [`ShapeCollection`].
pub struct ShpReader<'a> {
    data: &'a [u8],
    cancel: Option<Arc<AtomicBool>>,
    notifications: NotificationCollection,
}

impl<'a> ShpReader<'a> {
    /// Create a reader over a fully resident byte buffer.
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            cancel: None,
            notifications: NotificationCollection::new(),
        }
    }

    /// Attach a cancellation token, polled between records.
    pub fn with_cancel_token(mut self, token: Arc<AtomicBool>) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Decode the whole buffer. Fatal conditions abort with a typed error
    /// and no partial output; non-fatal conditions land in
    /// [`ShapeCollection::notifications`].
    pub fn read(mut self) -> Result<ShapeCollection> {
        let mut cursor = ByteCursor::new(self.data, Endianness::Big);

        let header = self.read_header(&mut cursor)?;

        cursor.seek_to(HEADER_SIZE)?;
        let mut records = Vec::new();
        while !cursor.at_end() {
            if records.len() % CANCEL_CHECK_INTERVAL == 0 {
                if let Some(token) = &self.cancel {
                    if token.load(Ordering::Relaxed) {
                        return Err(DecodeError::Cancelled);
                    }
                }
            }
            if let Some(record) = self.read_record(&mut cursor, header.shape_type)? {
                records.push(record);
            }
        }

        Ok(ShapeCollection {
            header,
            records,
            notifications: self.notifications,
        })
    }

    fn read_header(&mut self, cursor: &mut ByteCursor<'_>) -> Result<ShpHeader> {
        let signature = cursor.read_i32()?;
        if signature != SHP_SIGNATURE {
            return Err(DecodeError::InvalidSignature(format!(
                "expected shapefile code {SHP_SIGNATURE}, got {signature}"
            )));
        }
        cursor.skip(20)?;
        let file_length_words = cursor.read_i32()?;
        let file_length_bytes = file_length_words as i64 * 2;
        if file_length_bytes < HEADER_SIZE as i64 {
            return Err(DecodeError::TruncatedFile(format!(
                "declared file length {file_length_bytes} bytes is below the {HEADER_SIZE}-byte header"
            )));
        }

        cursor.set_endianness(Endianness::Little);
        let version = cursor.read_i32()?;
        if version < 1000 {
            self.notifications.notify(
                NotificationType::Warning,
                format!("unexpected shapefile version {version}"),
            );
        }
        let shape_type = ShapeType::from_raw(cursor.read_i32()?)?;

        let x_min = cursor.read_f64()?;
        let y_min = cursor.read_f64()?;
        let x_max = cursor.read_f64()?;
        let y_max = cursor.read_f64()?;
        let z_min = cursor.read_f64()?;
        let z_max = cursor.read_f64()?;
        let m_min = cursor.read_f64()?;
        let m_max = cursor.read_f64()?;

        Ok(ShpHeader {
            file_length_words,
            version,
            shape_type,
            bbox: BoundingBox3D::from_corners(
                Vector3::new(x_min, y_min, z_min),
                Vector3::new(x_max, y_max, z_max),
            ),
            m_min,
            m_max,
        })
    }

    /// Decode one record. Returns `None` for Null records, which contribute
    /// no geometry regardless of the file-level shape type.
    fn read_record(
        &mut self,
        cursor: &mut ByteCursor<'_>,
        file_type: ShapeType,
    ) -> Result<Option<ShapeRecord>> {
        cursor.set_endianness(Endianness::Big);
        let record_number = cursor.read_i32()?;
        let content_words = cursor.read_i32()?;
        if content_words < 0 {
            return Err(DecodeError::TruncatedFile(format!(
                "record {record_number} declares negative content length"
            )));
        }
        let content_bytes = content_words as usize * 2;

        cursor.set_endianness(Endianness::Little);
        let body_start = cursor.position();
        let record_end = body_start + content_bytes;
        if record_end > cursor.len() {
            return Err(DecodeError::TruncatedFile(format!(
                "record {record_number} content passes the buffer end"
            )));
        }

        let tag = cursor.read_i32()?;
        if tag == ShapeType::NullShape.as_raw() {
            cursor.seek_to(record_end)?;
            return Ok(None);
        }
        if tag != file_type.as_raw() {
            return Err(DecodeError::InvalidShapeType(tag));
        }

        let shape = match file_type.kind() {
            ShapeKind::Null => {
                cursor.seek_to(record_end)?;
                return Ok(None);
            }
            ShapeKind::Point => self.read_point(cursor, file_type, record_end)?,
            ShapeKind::MultiPoint => self.read_multi_point(cursor, file_type, record_end)?,
            ShapeKind::Polyline => {
                Shape::Polyline(self.read_poly(cursor, file_type, record_end)?)
            }
            ShapeKind::Polygon => Shape::Polygon(self.read_poly(cursor, file_type, record_end)?),
            ShapeKind::MultiPatch => {
                self.notifications.notify(
                    NotificationType::NotImplemented,
                    format!("MultiPatch payload skipped in record {record_number}"),
                );
                Shape::MultiPatch
            }
        };

        // Always resynchronize on the declared content length so a decode
        // that consumed less (optional M block, MultiPatch) stays aligned.
        cursor.seek_to(record_end)?;

        Ok(Some(ShapeRecord {
            record_number,
            shape,
        }))
    }

    fn read_point(
        &mut self,
        cursor: &mut ByteCursor<'_>,
        shape_type: ShapeType,
        record_end: usize,
    ) -> Result<Shape> {
        let x = cursor.read_f64()?;
        let y = cursor.read_f64()?;
        let mut point = ShapePoint::new(x, y);
        if shape_type.has_z() {
            point.position.z = cursor.read_f64()?;
        }
        if shape_type.has_m() {
            // The M value is optional for Z points; only read it when the
            // declared content length has room.
            let required = if shape_type.has_z() {
                record_end.saturating_sub(cursor.position()) >= 8
            } else {
                true
            };
            if required {
                point.m = Some(cursor.read_f64()?);
            }
        }
        Ok(Shape::Point(point))
    }

    fn read_multi_point(
        &mut self,
        cursor: &mut ByteCursor<'_>,
        shape_type: ShapeType,
        record_end: usize,
    ) -> Result<Shape> {
        let bbox = read_bbox(cursor)?;
        let num_points = read_count(cursor, "point count")?;
        ensure_room(cursor, num_points, 16, "multipoint vertices")?;

        let mut points = Vec::with_capacity(num_points);
        for _ in 0..num_points {
            let x = cursor.read_f64()?;
            let y = cursor.read_f64()?;
            points.push(ShapePoint::new(x, y));
        }
        if shape_type.has_z() {
            read_z_block(cursor, &mut points)?;
        }
        if shape_type.has_m() {
            read_m_block(cursor, &mut points, record_end)?;
        }
        Ok(Shape::MultiPoint { bbox, points })
    }

    fn read_poly(
        &mut self,
        cursor: &mut ByteCursor<'_>,
        shape_type: ShapeType,
        record_end: usize,
    ) -> Result<PolyShape> {
        let bbox = read_bbox(cursor)?;
        let num_parts = read_count(cursor, "part count")?;
        let num_points = read_count(cursor, "point count")?;
        ensure_room(cursor, num_parts * 4 + num_points * 16, 1, "part and vertex arrays")?;

        let mut parts: Vec<u32> = Vec::with_capacity(num_parts);
        for _ in 0..num_parts {
            let p = cursor.read_i32()?;
            if p < 0 || p as usize > num_points {
                return Err(DecodeError::TruncatedFile(format!(
                    "part index {p} outside vertex range {num_points}"
                )));
            }
            // Part starts must not decrease; a decreasing table would
            // describe overlapping negative-length rings.
            if let Some(&prev) = parts.last() {
                if (p as u32) < prev {
                    return Err(DecodeError::TruncatedFile(format!(
                        "part index {p} decreases from previous start {prev}"
                    )));
                }
            }
            parts.push(p as u32);
        }
        let mut points = Vec::with_capacity(num_points);
        for _ in 0..num_points {
            let x = cursor.read_f64()?;
            let y = cursor.read_f64()?;
            points.push(ShapePoint::new(x, y));
        }
        if shape_type.has_z() {
            read_z_block(cursor, &mut points)?;
        }
        if shape_type.has_m() {
            read_m_block(cursor, &mut points, record_end)?;
        }
        Ok(PolyShape {
            bbox,
            parts,
            points,
        })
    }
}

/// Load a shapefile from disk and decode it.
pub fn read_file<P: AsRef<Path>>(path: P) -> Result<ShapeCollection> {
    let data = std::fs::read(path)?;
    ShpReader::new(&data).read()
}

fn read_bbox(cursor: &mut ByteCursor<'_>) -> Result<BoundingBox2D> {
    let x_min = cursor.read_f64()?;
    let y_min = cursor.read_f64()?;
    let x_max = cursor.read_f64()?;
    let y_max = cursor.read_f64()?;
    Ok(BoundingBox2D::new(x_min, y_min, x_max, y_max))
}

fn read_count(cursor: &mut ByteCursor<'_>, what: &str) -> Result<usize> {
    let n = cursor.read_i32()?;
    if n < 0 {
        return Err(DecodeError::TruncatedFile(format!("negative {what}: {n}")));
    }
    Ok(n as usize)
}

/// Validate a declared element count against the bytes actually left, so a
/// corrupt count fails cleanly instead of reserving an absurd allocation.
fn ensure_room(
    cursor: &ByteCursor<'_>,
    count: usize,
    element_size: usize,
    what: &str,
) -> Result<()> {
    let needed = count.saturating_mul(element_size);
    if needed > cursor.remaining() {
        return Err(DecodeError::TruncatedFile(format!(
            "{what}: {needed} bytes declared, {} left in buffer",
            cursor.remaining()
        )));
    }
    Ok(())
}

/// Z block: z-range pair then one z per vertex.
fn read_z_block(cursor: &mut ByteCursor<'_>, points: &mut [ShapePoint]) -> Result<()> {
    let _z_min = cursor.read_f64()?;
    let _z_max = cursor.read_f64()?;
    for point in points.iter_mut() {
        point.position.z = cursor.read_f64()?;
    }
    Ok(())
}

/// M block: m-range pair then one measure per vertex. The block is optional
/// on disk; it is read only when the record's declared length has room.
fn read_m_block(
    cursor: &mut ByteCursor<'_>,
    points: &mut [ShapePoint],
    record_end: usize,
) -> Result<()> {
    let needed = 16 + points.len() * 8;
    if record_end.saturating_sub(cursor.position()) < needed {
        return Ok(());
    }
    let _m_min = cursor.read_f64()?;
    let _m_max = cursor.read_f64()?;
    for point in points.iter_mut() {
        point.m = Some(cursor.read_f64()?);
    }
    Ok(())
}
