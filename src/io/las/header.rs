//! LAS public header block, versions 1.0 through 1.4.

use bitflags::bitflags;

use crate::error::{DecodeError, Result};
use crate::io::cursor::ByteCursor;
use crate::types::Vector3;

use super::point::PointFormatId;

bitflags! {
    /// 16-bit global-encoding word, present from LAS 1.2 on.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct GlobalEncoding: u16 {
        /// GPS time is adjusted standard GPS time rather than week time.
        const ADJUSTED_STANDARD_GPS_TIME = 1 << 0;
        /// Waveform packets are stored inside this file.
        const WAVEFORM_INTERNAL = 1 << 1;
        /// Waveform packets are stored in an external file.
        const WAVEFORM_EXTERNAL = 1 << 2;
        /// Return numbers were synthetically generated.
        const SYNTHETIC_RETURN_NUMBERS = 1 << 3;
        /// CRS is OGC WKT rather than GeoTIFF keys (1.4).
        const WKT_CRS = 1 << 4;
    }
}

/// Header fields shared by every LAS version.
///
/// `scale` and `offset` turn raw integer point coordinates into world space;
/// per the conversion rules the offset is carried on the output container,
/// not re-added to each point.
#[derive(Debug, Clone, PartialEq)]
pub struct LasHeaderCore {
    pub file_source_id: u16,
    pub guid: [u8; 16],
    pub version_major: u8,
    pub version_minor: u8,
    pub system_identifier: String,
    pub generating_software: String,
    pub creation_day_of_year: u16,
    pub creation_year: u16,
    pub header_size: u16,
    pub point_data_offset: u32,
    pub vlr_count: u32,
    pub point_format: PointFormatId,
    pub point_record_length: u16,
    pub legacy_point_count: u32,
    pub legacy_points_by_return: [u32; 5],
    pub scale: Vector3,
    pub offset: Vector3,
    pub min: Vector3,
    pub max: Vector3,
}

/// Version-tagged header.
///
/// Five layouts keyed by major.minor; each extends the previous one with the
/// fields its version introduced.
#[derive(Debug, Clone, PartialEq)]
pub enum LasHeader {
    V1_0(LasHeaderCore),
    V1_1(LasHeaderCore),
    V1_2 {
        core: LasHeaderCore,
        global_encoding: GlobalEncoding,
    },
    V1_3 {
        core: LasHeaderCore,
        global_encoding: GlobalEncoding,
        waveform_start: u64,
    },
    V1_4 {
        core: LasHeaderCore,
        global_encoding: GlobalEncoding,
        waveform_start: u64,
        first_evlr_offset: u64,
        evlr_count: u32,
        point_count: u64,
        points_by_return: [u64; 15],
    },
}

impl LasHeader {
    /// Decode a header from the start of the buffer. `minor` was peeked at
    /// the fixed version offset by the reader; it selects the layout before
    /// the sequential parse begins.
    pub fn decode(cursor: &mut ByteCursor<'_>, minor: u8) -> Result<Self> {
        // Signature already validated by the reader.
        cursor.skip(4)?;

        // 1.0 has a 4-byte reserved block where 1.1+ store the file source
        // id, and 1.2+ the global-encoding word.
        let (file_source_id, global_encoding) = match minor {
            0 => {
                cursor.skip(4)?;
                (0, GlobalEncoding::empty())
            }
            1 => {
                let id = cursor.read_u16()?;
                cursor.skip(2)?;
                (id, GlobalEncoding::empty())
            }
            _ => {
                let id = cursor.read_u16()?;
                let encoding = GlobalEncoding::from_bits_truncate(cursor.read_u16()?);
                (id, encoding)
            }
        };

        let mut guid = [0u8; 16];
        guid.copy_from_slice(cursor.read_bytes(16)?);
        let version_major = cursor.read_u8()?;
        let version_minor = cursor.read_u8()?;
        let system_identifier = trim_nul(&cursor.read_fixed_string(32)?);
        let generating_software = trim_nul(&cursor.read_fixed_string(32)?);
        let creation_day_of_year = cursor.read_u16()?;
        let creation_year = cursor.read_u16()?;
        let header_size = cursor.read_u16()?;
        let point_data_offset = cursor.read_u32()?;
        let vlr_count = cursor.read_u32()?;
        let point_format = PointFormatId::from_raw(cursor.read_u8()?)?;
        let point_record_length = cursor.read_u16()?;
        let legacy_point_count = cursor.read_u32()?;
        let mut legacy_points_by_return = [0u32; 5];
        for slot in legacy_points_by_return.iter_mut() {
            *slot = cursor.read_u32()?;
        }

        let scale = read_vec3(cursor)?;
        let offset = read_vec3(cursor)?;
        let max_x = cursor.read_f64()?;
        let min_x = cursor.read_f64()?;
        let max_y = cursor.read_f64()?;
        let min_y = cursor.read_f64()?;
        let max_z = cursor.read_f64()?;
        let min_z = cursor.read_f64()?;

        let core = LasHeaderCore {
            file_source_id,
            guid,
            version_major,
            version_minor,
            system_identifier,
            generating_software,
            creation_day_of_year,
            creation_year,
            header_size,
            point_data_offset,
            vlr_count,
            point_format,
            point_record_length,
            legacy_point_count,
            legacy_points_by_return,
            scale,
            offset,
            min: Vector3::new(min_x, min_y, min_z),
            max: Vector3::new(max_x, max_y, max_z),
        };

        Ok(match minor {
            0 => Self::V1_0(core),
            1 => Self::V1_1(core),
            2 => Self::V1_2 {
                core,
                global_encoding,
            },
            3 => Self::V1_3 {
                core,
                global_encoding,
                waveform_start: cursor.read_u64()?,
            },
            4 => {
                let waveform_start = cursor.read_u64()?;
                let first_evlr_offset = cursor.read_u64()?;
                let evlr_count = cursor.read_u32()?;
                let point_count = cursor.read_u64()?;
                let mut points_by_return = [0u64; 15];
                for slot in points_by_return.iter_mut() {
                    *slot = cursor.read_u64()?;
                }
                Self::V1_4 {
                    core,
                    global_encoding,
                    waveform_start,
                    first_evlr_offset,
                    evlr_count,
                    point_count,
                    points_by_return,
                }
            }
            other => return Err(DecodeError::InvalidVersion(other)),
        })
    }

    /// The fields common to all versions.
    pub fn core(&self) -> &LasHeaderCore {
        match self {
            Self::V1_0(core) | Self::V1_1(core) => core,
            Self::V1_2 { core, .. } | Self::V1_3 { core, .. } | Self::V1_4 { core, .. } => core,
        }
    }

    /// Major.minor version of the layout this header decoded with.
    pub fn version(&self) -> (u8, u8) {
        match self {
            Self::V1_0(_) => (1, 0),
            Self::V1_1(_) => (1, 1),
            Self::V1_2 { .. } => (1, 2),
            Self::V1_3 { .. } => (1, 3),
            Self::V1_4 { .. } => (1, 4),
        }
    }

    /// Global-encoding word for headers that carry one (1.2+).
    pub fn global_encoding(&self) -> Option<GlobalEncoding> {
        match self {
            Self::V1_0(_) | Self::V1_1(_) => None,
            Self::V1_2 {
                global_encoding, ..
            }
            | Self::V1_3 {
                global_encoding, ..
            }
            | Self::V1_4 {
                global_encoding, ..
            } => Some(*global_encoding),
        }
    }

    /// Declared number of point records: the 64-bit count for 1.4, the
    /// legacy 32-bit count for everything older.
    pub fn point_count(&self) -> u64 {
        match self {
            Self::V1_4 { point_count, .. } => *point_count,
            _ => self.core().legacy_point_count as u64,
        }
    }
}

fn read_vec3(cursor: &mut ByteCursor<'_>) -> Result<Vector3> {
    let x = cursor.read_f64()?;
    let y = cursor.read_f64()?;
    let z = cursor.read_f64()?;
    Ok(Vector3::new(x, y, z))
}

/// LAS strings are NUL-padded.
pub(crate) fn trim_nul(raw: &str) -> String {
    raw.trim_end_matches('\0').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_encoding_bits() {
        let e = GlobalEncoding::from_bits_truncate(0b1_0001);
        assert!(e.contains(GlobalEncoding::ADJUSTED_STANDARD_GPS_TIME));
        assert!(e.contains(GlobalEncoding::WKT_CRS));
        assert!(!e.contains(GlobalEncoding::WAVEFORM_INTERNAL));
    }

    #[test]
    fn test_trim_nul() {
        assert_eq!(trim_nul("libLAS\0\0\0\0"), "libLAS");
        assert_eq!(trim_nul("exact"), "exact");
    }
}
