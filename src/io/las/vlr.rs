//! Variable length records.
//!
//! Every VLR carries a 54-byte header followed by `content_length` payload
//! bytes. Known record types get a typed parse; anything else is kept as raw
//! bytes so nothing in the file is silently dropped. The decoder always
//! consumes exactly the declared content length, whatever the payload parse
//! did.

use crate::error::Result;
use crate::io::cursor::ByteCursor;
use crate::notification::{NotificationCollection, NotificationType};

use super::header::trim_nul;
use super::point::Classification;

pub const VLR_HEADER_SIZE: usize = 54;

const USER_PROJECTION: &str = "LASF_Projection";
const USER_SPEC: &str = "LASF_Spec";

/// One GeoTIFF key from a GeoKeyDirectory record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeoKeyEntry {
    pub key_id: u16,
    pub tiff_tag_location: u16,
    pub count: u16,
    pub value_offset: u16,
}

/// One class-to-description pair from a classification lookup record.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationLookupEntry {
    pub class: Classification,
    pub description: String,
}

/// Parsed or preserved VLR payload.
#[derive(Debug, Clone, PartialEq)]
pub enum VlrContent {
    GeoKeyDirectory(Vec<GeoKeyEntry>),
    GeoDoubleParams(Vec<f64>),
    GeoAsciiParams(String),
    ClassificationLookup(Vec<ClassificationLookupEntry>),
    /// Unrecognized record kept verbatim.
    Raw(Vec<u8>),
    /// Recognized but unsupported record, skipped with a notification.
    Unparsed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VariableLengthRecord {
    pub user_id: String,
    pub record_id: u16,
    pub description: String,
    pub content: VlrContent,
}

impl VariableLengthRecord {
    pub fn decode(
        cursor: &mut ByteCursor<'_>,
        notifications: &mut NotificationCollection,
    ) -> Result<Self> {
        cursor.skip(2)?; // reserved
        let user_id = trim_nul(&cursor.read_fixed_string(16)?);
        let record_id = cursor.read_u16()?;
        let content_length = cursor.read_u16()? as usize;
        let description = trim_nul(&cursor.read_fixed_string(32)?);

        let content_start = cursor.position();
        let content = Self::decode_content(
            cursor,
            &user_id,
            record_id,
            content_length,
            notifications,
        )?;
        // Whatever the payload parse consumed, land exactly past the record.
        cursor.seek_to(content_start + content_length)?;

        Ok(Self {
            user_id,
            record_id,
            description,
            content,
        })
    }

    fn decode_content(
        cursor: &mut ByteCursor<'_>,
        user_id: &str,
        record_id: u16,
        content_length: usize,
        notifications: &mut NotificationCollection,
    ) -> Result<VlrContent> {
        Ok(match (user_id, record_id) {
            (USER_PROJECTION, 34735) => {
                VlrContent::GeoKeyDirectory(read_geo_key_directory(cursor, content_length)?)
            }
            (USER_PROJECTION, 34736) => {
                let mut doubles = Vec::with_capacity(content_length / 8);
                for _ in 0..content_length / 8 {
                    doubles.push(cursor.read_f64()?);
                }
                VlrContent::GeoDoubleParams(doubles)
            }
            (USER_PROJECTION, 34737) => {
                VlrContent::GeoAsciiParams(trim_nul(&cursor.read_fixed_string(content_length)?))
            }
            (USER_PROJECTION, 2111 | 2112) => {
                notifications.notify(
                    NotificationType::NotImplemented,
                    format!("OGC WKT coordinate system record {record_id} is not parsed"),
                );
                VlrContent::Unparsed
            }
            (USER_SPEC, 0) => {
                VlrContent::ClassificationLookup(read_classification_lookup(cursor, content_length)?)
            }
            (USER_SPEC, 3) => {
                notifications.notify(
                    NotificationType::NotImplemented,
                    "point return histogram record is not parsed",
                );
                VlrContent::Unparsed
            }
            (USER_SPEC, 100..=354) => {
                notifications.notify(
                    NotificationType::NotImplemented,
                    format!("waveform packet descriptor record {record_id} is not parsed"),
                );
                VlrContent::Unparsed
            }
            _ => VlrContent::Raw(cursor.read_bytes(content_length)?.to_vec()),
        })
    }
}

/// GeoKeyDirectory: an 8-byte directory header (version, revision, minor,
/// key count) followed by 8-byte key entries.
fn read_geo_key_directory(
    cursor: &mut ByteCursor<'_>,
    content_length: usize,
) -> Result<Vec<GeoKeyEntry>> {
    if content_length < 8 {
        return Ok(Vec::new());
    }
    cursor.skip(6)?;
    let declared = cursor.read_u16()? as usize;
    // The directory header can disagree with the content length; the
    // content length wins because it bounds the payload.
    let count = declared.min((content_length - 8) / 8);
    let mut entries = Vec::with_capacity(count);
    for _ in 0..count {
        entries.push(GeoKeyEntry {
            key_id: cursor.read_u16()?,
            tiff_tag_location: cursor.read_u16()?,
            count: cursor.read_u16()?,
            value_offset: cursor.read_u16()?,
        });
    }
    Ok(entries)
}

/// Classification lookup: 16-byte entries of class number plus a 15-byte
/// padded description.
fn read_classification_lookup(
    cursor: &mut ByteCursor<'_>,
    content_length: usize,
) -> Result<Vec<ClassificationLookupEntry>> {
    let count = content_length / 16;
    let mut entries = Vec::with_capacity(count);
    for _ in 0..count {
        let class = Classification::from_raw(cursor.read_u8()?);
        let description = trim_nul(&cursor.read_fixed_string(15)?);
        entries.push(ClassificationLookupEntry { class, description });
    }
    Ok(entries)
}
