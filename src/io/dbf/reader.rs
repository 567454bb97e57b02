//! dBase (DBF) table reader.
//!
//! The leading version byte selects one of four header layouts; the header
//! declares the field descriptors, and the record stream is decoded
//! fixed-width per descriptor in declaration order. Endianness flips at the
//! documented points inside the V2.5/V3/V4 preambles and flips back before
//! the descriptor block.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use encoding_rs::Encoding;
use indexmap::IndexMap;

use crate::error::{DecodeError, Result};
use crate::io::cursor::{ByteCursor, Endianness};
use crate::notification::{NotificationCollection, NotificationType};

use super::field::{
    parse_int_prefix, DbfFieldDescriptor, DbfFieldType, DbfRecord, DbfValue,
};
use super::version::{DbfVersion, HeaderLayout};

/// Expected byte after the field-descriptor block.
const FIELD_TERMINATOR: u8 = 0x0D;
/// Leading record byte marking a deleted row.
const DELETED_MARKER: u8 = 0x1A;
/// Cancellation token is polled every this many records.
const CANCEL_CHECK_INTERVAL: usize = 1024;

/// Header metadata common to all layouts; layout-specific fields are `None`
/// where a layout does not carry them.
#[derive(Debug, Clone, PartialEq)]
pub struct DbfHeader {
    pub version: DbfVersion,
    /// Last-update date: (year, month, day); the on-disk year is an offset
    /// from 1900.
    pub last_update: (u16, u8, u8),
    pub record_count: u32,
    /// Declared total header size in bytes (V2.5/V3/V4).
    pub header_bytes: Option<u16>,
    /// Declared per-record byte length.
    pub record_bytes: Option<u16>,
    pub incomplete_transaction: Option<i8>,
    pub encryption: Option<i8>,
    pub mdx_flag: Option<i8>,
    pub language_driver_id: Option<u8>,
    pub language_driver_name: Option<String>,
}

/// Full decode output for one DBF buffer.
#[derive(Debug, Clone)]
pub struct DbfTable {
    pub header: DbfHeader,
    pub fields: Vec<DbfFieldDescriptor>,
    pub records: Vec<DbfRecord>,
    pub notifications: NotificationCollection,
}

impl DbfTable {
    /// Look up a field descriptor by name.
    pub fn field(&self, name: &str) -> Option<&DbfFieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// DBF table reader. Decodes an in-memory DBF buffer into a [`DbfTable`].
pub struct DbfReader<'a> {
    data: &'a [u8],
    cancel: Option<Arc<AtomicBool>>,
    notifications: NotificationCollection,
}

impl<'a> DbfReader<'a> {
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

    /// Decode the whole buffer.
    ///
    /// An unknown version byte returns [`DecodeError::InvalidVersion`];
    /// callers probing arbitrary uploads can treat that as "not a DBF file".
    pub fn read(mut self) -> Result<DbfTable> {
        let mut cursor = ByteCursor::new(self.data, Endianness::Big);

        let version = DbfVersion::from_raw(cursor.read_u8()?)?;
        let (header, fields) = match version.layout() {
            HeaderLayout::V2 => self.read_header_v2(&mut cursor, version)?,
            HeaderLayout::V2_5 => self.read_header_v2_5(&mut cursor, version)?,
            HeaderLayout::V3 => self.read_header_v3(&mut cursor, version, false)?,
            HeaderLayout::V4 => self.read_header_v3(&mut cursor, version, true)?,
        };

        let terminator = cursor.read_u8()?;
        if terminator != FIELD_TERMINATOR {
            self.notifications.notify(
                NotificationType::Warning,
                format!(
                    "field terminator {terminator:#04X} where {FIELD_TERMINATOR:#04X} was expected"
                ),
            );
        }

        // The record area starts at the declared header size; the descriptor
        // walk may have left the cursor short of it.
        if let Some(header_bytes) = header.header_bytes {
            cursor.seek_to(header_bytes as usize)?;
        }

        if let Some(encoding) = header
            .language_driver_id
            .map(encoding_from_language_driver)
        {
            cursor.set_encoding(encoding);
        }

        let records = self.read_records(&mut cursor, &header, &fields)?;

        Ok(DbfTable {
            header,
            fields,
            records,
            notifications: self.notifications,
        })
    }

    /// dBase II layout. The 16-bit record count also counts the field
    /// descriptors; that quirk of the format is preserved as-is.
    fn read_header_v2(
        &mut self,
        cursor: &mut ByteCursor<'_>,
        version: DbfVersion,
    ) -> Result<(DbfHeader, Vec<DbfFieldDescriptor>)> {
        let record_count = cursor.read_i16()?;
        if record_count < 0 {
            return Err(DecodeError::TruncatedFile(format!(
                "negative record count {record_count}"
            )));
        }
        let year = 1900 + cursor.read_i8()? as u16;
        let month = cursor.read_u8()?;
        let day = cursor.read_u8()?;
        let record_bytes = cursor.read_i16()? as u16;

        let field_count = record_count as usize;
        ensure_descriptor_room(cursor, field_count, 16)?;
        let mut fields = Vec::with_capacity(field_count);
        for _ in 0..field_count {
            let name = clean_name(&cursor.read_fixed_string(11)?);
            let field_type = self.field_type(cursor.read_char()?, &name)?;
            let length = cursor.read_u8()?;
            let mem_addr = cursor.read_i16()? as i32;
            let decimals = cursor.read_i8()? as u8;
            fields.push(DbfFieldDescriptor {
                name,
                field_type,
                length,
                decimals,
                mem_addr,
                work_area: 0,
                mdx_flag: 0,
                next_autoincrement: None,
            });
        }

        Ok((
            DbfHeader {
                version,
                last_update: (year, month, day),
                record_count: record_count as u32,
                header_bytes: None,
                record_bytes: Some(record_bytes),
                incomplete_transaction: None,
                encryption: None,
                mdx_flag: None,
                language_driver_id: None,
                language_driver_name: None,
            },
            fields,
        ))
    }

    /// dBase III layout: little-endian count block, 20 reserved bytes, then
    /// a fixed descriptor count derived from the declared header size.
    fn read_header_v2_5(
        &mut self,
        cursor: &mut ByteCursor<'_>,
        version: DbfVersion,
    ) -> Result<(DbfHeader, Vec<DbfFieldDescriptor>)> {
        let year = 1900 + cursor.read_i8()? as u16;
        let month = cursor.read_u8()?;
        let day = cursor.read_u8()?;

        cursor.set_endianness(Endianness::Little);
        let record_count = cursor.read_i32()?;
        let header_bytes = cursor.read_i16()? as u16;
        let record_bytes = cursor.read_i16()? as u16;
        cursor.set_endianness(Endianness::Big);
        cursor.skip(20)?;

        if record_count < 0 {
            return Err(DecodeError::TruncatedFile(format!(
                "negative record count {record_count}"
            )));
        }

        // Preamble is 32 bytes and the terminator 1; each descriptor read
        // consumes 25.
        let field_count = (header_bytes as usize).saturating_sub(33) / 25;
        ensure_descriptor_room(cursor, field_count, 25)?;
        let mut fields = Vec::with_capacity(field_count);
        for _ in 0..field_count {
            fields.push(self.read_descriptor(cursor)?);
        }

        Ok((
            DbfHeader {
                version,
                last_update: (year, month, day),
                record_count: record_count as u32,
                header_bytes: Some(header_bytes),
                record_bytes: Some(record_bytes),
                incomplete_transaction: None,
                encryption: None,
                mdx_flag: None,
                language_driver_id: None,
                language_driver_name: None,
            },
            fields,
        ))
    }

    /// dBase IV layout, extended for V4 (`wide_names`): descriptors are read
    /// until the cursor reaches `header_bytes - 1`, not a fixed count.
    fn read_header_v3(
        &mut self,
        cursor: &mut ByteCursor<'_>,
        version: DbfVersion,
        wide_names: bool,
    ) -> Result<(DbfHeader, Vec<DbfFieldDescriptor>)> {
        let year = 1900 + cursor.read_i8()? as u16;
        let month = cursor.read_u8()?;
        let day = cursor.read_u8()?;

        cursor.set_endianness(Endianness::Little);
        let record_count = cursor.read_i32()?;
        let header_bytes = cursor.read_i16()? as u16;
        let record_bytes = cursor.read_i16()? as u16;
        cursor.set_endianness(Endianness::Big);

        let incomplete_transaction = cursor.read_i8()?;
        let encryption = cursor.read_i8()?;
        cursor.skip(12)?;
        let mdx_flag = cursor.read_i8()?;
        let language_driver_id = cursor.read_u8()?;
        cursor.skip(2)?;

        let language_driver_name = if wide_names {
            Some(clean_name(&cursor.read_fixed_string(32)?))
        } else {
            None
        };

        if record_count < 0 {
            return Err(DecodeError::TruncatedFile(format!(
                "negative record count {record_count}"
            )));
        }
        if (header_bytes as usize) > cursor.len() {
            return Err(DecodeError::TruncatedFile(format!(
                "declared header size {header_bytes} passes the buffer end"
            )));
        }

        let descriptor_end = (header_bytes as usize).saturating_sub(1);
        let mut fields = Vec::new();
        while cursor.position() < descriptor_end {
            fields.push(if wide_names {
                self.read_descriptor_wide(cursor)?
            } else {
                self.read_descriptor(cursor)?
            });
        }

        Ok((
            DbfHeader {
                version,
                last_update: (year, month, day),
                record_count: record_count as u32,
                header_bytes: Some(header_bytes),
                record_bytes: Some(record_bytes),
                incomplete_transaction: Some(incomplete_transaction),
                encryption: Some(encryption),
                mdx_flag: Some(mdx_flag),
                language_driver_id: Some(language_driver_id),
                language_driver_name,
            },
            fields,
        ))
    }

    /// 11-byte-name field descriptor (V2.5/V3 layouts).
    fn read_descriptor(&mut self, cursor: &mut ByteCursor<'_>) -> Result<DbfFieldDescriptor> {
        let name = clean_name(&cursor.read_fixed_string(11)?);
        let field_type = self.field_type(cursor.read_char()?, &name)?;
        let mem_addr = cursor.read_i32()?;
        let length = cursor.read_u8()?;
        let decimals = cursor.read_u8()?;
        cursor.skip(2)?;
        let work_area = cursor.read_i8()?;
        cursor.skip(2)?;
        let mdx_flag = cursor.read_i8()?;
        cursor.skip(1)?;
        Ok(DbfFieldDescriptor {
            name,
            field_type,
            length,
            decimals,
            mem_addr,
            work_area,
            mdx_flag,
            next_autoincrement: None,
        })
    }

    /// 32-byte-name field descriptor with autoincrement (V4 layout).
    fn read_descriptor_wide(&mut self, cursor: &mut ByteCursor<'_>) -> Result<DbfFieldDescriptor> {
        let name = clean_name(&cursor.read_fixed_string(32)?);
        let field_type = self.field_type(cursor.read_char()?, &name)?;
        let length = cursor.read_u8()?;
        let decimals = cursor.read_u8()?;
        cursor.skip(2)?;
        let mdx_flag = cursor.read_i8()?;
        cursor.skip(2)?;
        let next_autoincrement = cursor.read_i32()?;
        cursor.skip(4)?;
        Ok(DbfFieldDescriptor {
            name,
            field_type,
            length,
            decimals,
            mem_addr: 0,
            work_area: 0,
            mdx_flag,
            next_autoincrement: Some(next_autoincrement),
        })
    }

    fn field_type(&mut self, tag: char, field_name: &str) -> Result<DbfFieldType> {
        let field_type = DbfFieldType::from_tag(tag)?;
        if field_type == DbfFieldType::Timestamp {
            self.notifications.notify(
                NotificationType::NotImplemented,
                format!("timestamp field {field_name:?} is consumed but not decoded"),
            );
        }
        Ok(field_type)
    }

    fn read_records(
        &mut self,
        cursor: &mut ByteCursor<'_>,
        header: &DbfHeader,
        fields: &[DbfFieldDescriptor],
    ) -> Result<Vec<DbfRecord>> {
        let record_count = header.record_count as usize;
        if let Some(record_bytes) = header.record_bytes {
            let needed = record_count.saturating_mul(record_bytes as usize);
            if needed > cursor.remaining() {
                return Err(DecodeError::TruncatedFile(format!(
                    "{record_count} records of {record_bytes} bytes declared, {} bytes left",
                    cursor.remaining()
                )));
            }
        }

        let mut length_mismatch_reported = false;
        let mut records = Vec::with_capacity(record_count);
        for index in 0..record_count {
            if index % CANCEL_CHECK_INTERVAL == 0 {
                if let Some(token) = &self.cancel {
                    if token.load(Ordering::Relaxed) {
                        return Err(DecodeError::Cancelled);
                    }
                }
            }

            let record_start = cursor.position();
            let deleted = cursor.read_u8()? == DELETED_MARKER;
            let mut values = IndexMap::with_capacity_and_hasher(
                fields.len(),
                ahash::RandomState::new(),
            );
            for field in fields {
                if let Some(value) = self.read_value(cursor, field)? {
                    values.insert(field.name.clone(), value);
                }
            }

            // Resynchronize on the declared record length when the field
            // spans do not add up to it.
            if let Some(record_bytes) = header.record_bytes {
                let consumed = cursor.position() - record_start;
                if consumed != record_bytes as usize {
                    if !length_mismatch_reported {
                        self.notifications.notify(
                            NotificationType::Warning,
                            format!(
                                "record {index} spans {consumed} bytes where the header declares {record_bytes}"
                            ),
                        );
                        length_mismatch_reported = true;
                    }
                    cursor.seek_to(record_start + record_bytes as usize)?;
                }
            }

            records.push(DbfRecord { deleted, values });
        }
        Ok(records)
    }

    /// Decode one field's byte span. Returns `None` for types that are
    /// consumed without producing a value (Timestamp).
    fn read_value(
        &mut self,
        cursor: &mut ByteCursor<'_>,
        field: &DbfFieldDescriptor,
    ) -> Result<Option<DbfValue>> {
        let length = field.length as usize;
        Ok(match field.field_type {
            // Fixed-length text, padding preserved.
            DbfFieldType::Character
            | DbfFieldType::Date
            | DbfFieldType::Memo
            | DbfFieldType::Ole => Some(DbfValue::Character(cursor.read_fixed_string(length)?)),

            // Text parsed as an integer. Float goes through the same path:
            // decimals are dropped, mirroring the parseInt-based original.
            DbfFieldType::Numeric | DbfFieldType::Binary | DbfFieldType::Float => {
                let text = cursor.read_fixed_string(length)?;
                Some(match parse_int_prefix(&text) {
                    Some(v) => DbfValue::Integer(v),
                    None => DbfValue::Null,
                })
            }

            DbfFieldType::Logical => {
                let c = cursor.read_char()?;
                Some(match c {
                    't' | 'y' | 'T' | 'Y' => DbfValue::Boolean(true),
                    'f' | 'n' | 'F' | 'N' => DbfValue::Boolean(false),
                    other => {
                        self.notifications.notify(
                            NotificationType::Warning,
                            format!(
                                "logical value {other:?} in field {:?} decoded as null",
                                field.name
                            ),
                        );
                        DbfValue::Null
                    }
                })
            }

            DbfFieldType::Long | DbfFieldType::Autoincrement => {
                Some(DbfValue::Integer(cursor.read_i32()? as i64))
            }

            DbfFieldType::Double => Some(DbfValue::Float(cursor.read_f64()?)),

            // Consumed for stream alignment, never decoded.
            DbfFieldType::Timestamp => {
                cursor.skip(8)?;
                None
            }
        })
    }
}

/// Load a DBF table from disk and decode it.
pub fn read_file<P: AsRef<Path>>(path: P) -> Result<DbfTable> {
    let data = std::fs::read(path)?;
    DbfReader::new(&data).read()
}

/// Strip a fixed-width name field: cut at the first NUL, trim space padding.
fn clean_name(raw: &str) -> String {
    let cut = raw.split('\0').next().unwrap_or(raw);
    cut.trim_end_matches(' ').to_string()
}

/// Map a DBF language-driver byte to a text encoding.
///
/// Covers the common drivers; everything else falls back to Windows-1252.
fn encoding_from_language_driver(ldid: u8) -> &'static Encoding {
    match ldid {
        0x01 | 0x03 | 0x57 => encoding_rs::WINDOWS_1252,
        0xC8 => encoding_rs::WINDOWS_1250, // Central European
        0xC9 => encoding_rs::WINDOWS_1251, // Cyrillic
        0xCB => encoding_rs::WINDOWS_1253, // Greek
        0xCA => encoding_rs::WINDOWS_1254, // Turkish
        0x7D => encoding_rs::WINDOWS_1255, // Hebrew
        0x7E => encoding_rs::WINDOWS_1256, // Arabic
        0x13 | 0x7B => encoding_rs::SHIFT_JIS, // Japanese
        0x7A => encoding_rs::GBK,          // Simplified Chinese
        0x79 => encoding_rs::EUC_KR,       // Korean
        0x78 => encoding_rs::BIG5,         // Traditional Chinese
        _ => encoding_rs::WINDOWS_1252,
    }
}

/// Validate a declared descriptor count against the bytes actually left.
fn ensure_descriptor_room(
    cursor: &ByteCursor<'_>,
    count: usize,
    descriptor_size: usize,
) -> Result<()> {
    let needed = count.saturating_mul(descriptor_size);
    if needed > cursor.remaining() {
        return Err(DecodeError::TruncatedFile(format!(
            "{count} field descriptors declared, {} bytes left in buffer",
            cursor.remaining()
        )));
    }
    Ok(())
}
