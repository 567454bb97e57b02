//! LAS reader: signature check, version peek, header parse, VLR walk and
//! the point-record loop.

use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::{DecodeError, Result};
use crate::geometry::point_cloud::{assemble_point_cloud, PointCloud};
use crate::io::cursor::{ByteCursor, Endianness};
use crate::notification::{NotificationCollection, NotificationType};
use crate::types::Vector3;

use super::header::LasHeader;
use super::point::RawPoint;
use super::vlr::VariableLengthRecord;

const LAS_SIGNATURE: &[u8; 4] = b"LASF";
/// Byte offset of the major/minor version pair in every header layout.
const VERSION_OFFSET: usize = 24;

/// Progress callback: (records decoded so far, declared total).
pub type ProgressCallback<'p> = Box<dyn FnMut(u64, u64) + 'p>;

/// Knobs for the point-record loop.
pub struct LasReadOptions {
    /// Maximum points per output chunk.
    pub chunk_size: usize,
    /// Records between progress reports and cancellation polls. Zero is
    /// treated as one.
    pub progress_interval: u64,
    /// Rebase positions onto this offset instead of the header's.
    pub world_offset: Option<Vector3>,
}

impl Default for LasReadOptions {
    fn default() -> Self {
        Self {
            chunk_size: 1_000_000,
            progress_interval: 100_000,
            world_offset: None,
        }
    }
}

pub struct LasReader<'a, 'p> {
    data: &'a [u8],
    options: LasReadOptions,
    cancel: Option<Arc<AtomicBool>>,
    progress: Option<ProgressCallback<'p>>,
    notifications: NotificationCollection,
}

impl<'a, 'p> LasReader<'a, 'p> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            options: LasReadOptions::default(),
            cancel: None,
            progress: None,
            notifications: NotificationCollection::new(),
        }
    }

    pub fn with_options(mut self, options: LasReadOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_cancel_token(mut self, token: Arc<AtomicBool>) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn with_progress(mut self, callback: impl FnMut(u64, u64) + 'p) -> Self {
        self.progress = Some(Box::new(callback));
        self
    }

    pub fn read(mut self) -> Result<PointCloud> {
        let mut cursor = ByteCursor::new(self.data, Endianness::Little);

        if cursor.read_bytes(4)? != LAS_SIGNATURE {
            return Err(DecodeError::InvalidSignature(
                "expected LASF file signature".to_string(),
            ));
        }

        // Peek the version to pick the header layout, then parse the whole
        // header from the start.
        cursor.seek_to(VERSION_OFFSET)?;
        let major = cursor.read_u8()?;
        let minor = cursor.read_u8()?;
        if major != 1 {
            return Err(DecodeError::InvalidVersion(major));
        }
        if minor > 4 {
            return Err(DecodeError::InvalidVersion(minor));
        }
        cursor.seek_to(0)?;
        let header = LasHeader::decode(&mut cursor, minor)?;
        let core = header.core();

        // VLRs start at the declared header size, which can exceed what the
        // layout parser consumed (user padding).
        cursor.seek_to(core.header_size as usize)?;
        let mut vlrs = Vec::with_capacity(core.vlr_count as usize);
        for _ in 0..core.vlr_count {
            vlrs.push(VariableLengthRecord::decode(
                &mut cursor,
                &mut self.notifications,
            )?);
        }

        if cursor.position() != core.point_data_offset as usize {
            self.notifications.notify(
                NotificationType::Warning,
                format!(
                    "point data offset {} does not follow the VLRs (position {})",
                    core.point_data_offset,
                    cursor.position()
                ),
            );
            cursor.seek_to(core.point_data_offset as usize)?;
        }

        let format = core.point_format;
        if core.point_record_length != format.record_length() {
            return Err(DecodeError::TruncatedFile(format!(
                "declared point record length {} does not match format {} length {}",
                core.point_record_length,
                format.as_raw(),
                format.record_length()
            )));
        }

        let point_count = header.point_count();
        let needed = point_count
            .checked_mul(format.record_length() as u64)
            .ok_or_else(|| {
                DecodeError::TruncatedFile(format!(
                    "point count {point_count} overflows the record size computation"
                ))
            })?;
        if needed > cursor.remaining() as u64 {
            return Err(DecodeError::TruncatedFile(format!(
                "{point_count} point records need {needed} bytes, {} remain",
                cursor.remaining()
            )));
        }

        // A zero interval would divide by zero below; treat it as "every record".
        let interval = self.options.progress_interval.max(1);
        let mut raw_points = Vec::with_capacity(point_count as usize);
        for decoded in 0..point_count {
            if decoded % interval == 0 && decoded > 0 {
                if let Some(token) = &self.cancel {
                    if token.load(Ordering::Relaxed) {
                        return Err(DecodeError::Cancelled);
                    }
                }
                if let Some(progress) = &mut self.progress {
                    progress(decoded, point_count);
                }
            }
            raw_points.push(RawPoint::decode(&mut cursor, format)?);
        }
        if let Some(progress) = &mut self.progress {
            progress(point_count, point_count);
        }

        Ok(assemble_point_cloud(
            header,
            vlrs,
            raw_points,
            self.options.world_offset,
            self.options.chunk_size,
            self.notifications,
        ))
    }
}

/// Load a LAS file from disk and decode it with default options.
pub fn read_file(path: impl AsRef<Path>) -> Result<PointCloud> {
    let data = fs::read(path)?;
    LasReader::new(&data).read()
}
