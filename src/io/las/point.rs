//! LAS point-data record formats 0 through 10.
//!
//! Formats 0-5 are the legacy 1.0-1.3 layouts with a single bit-packed flag
//! byte; formats 6-10 are the extended 1.4 layouts with a 16-bit packed flag
//! word, a full-range classification byte and a 16-bit scan angle. The
//! optional trailing blocks (GPS time, RGB, NIR, waveform packet) compose
//! onto the base layout per format.

use crate::error::{DecodeError, Result};
use crate::io::cursor::ByteCursor;

/// Point-data record format id from the public header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointFormatId {
    Format0,
    Format1,
    Format2,
    Format3,
    Format4,
    Format5,
    Format6,
    Format7,
    Format8,
    Format9,
    Format10,
}

impl PointFormatId {
    pub fn from_raw(value: u8) -> Result<Self> {
        Ok(match value {
            0 => Self::Format0,
            1 => Self::Format1,
            2 => Self::Format2,
            3 => Self::Format3,
            4 => Self::Format4,
            5 => Self::Format5,
            6 => Self::Format6,
            7 => Self::Format7,
            8 => Self::Format8,
            9 => Self::Format9,
            10 => Self::Format10,
            other => return Err(DecodeError::InvalidPointFormat(other)),
        })
    }

    pub fn as_raw(self) -> u8 {
        match self {
            Self::Format0 => 0,
            Self::Format1 => 1,
            Self::Format2 => 2,
            Self::Format3 => 3,
            Self::Format4 => 4,
            Self::Format5 => 5,
            Self::Format6 => 6,
            Self::Format7 => 7,
            Self::Format8 => 8,
            Self::Format9 => 9,
            Self::Format10 => 10,
        }
    }

    /// Fixed record byte length for this format. The header's declared
    /// per-record length must match this exactly.
    pub fn record_length(self) -> u16 {
        match self {
            Self::Format0 => 20,
            Self::Format1 => 28,
            Self::Format2 => 26,
            Self::Format3 => 34,
            Self::Format4 => 57,
            Self::Format5 => 63,
            Self::Format6 => 30,
            Self::Format7 => 36,
            Self::Format8 => 38,
            Self::Format9 => 59,
            Self::Format10 => 67,
        }
    }

    pub fn has_gps_time(self) -> bool {
        !matches!(self, Self::Format0 | Self::Format2)
    }

    pub fn has_color(self) -> bool {
        matches!(
            self,
            Self::Format2 | Self::Format3 | Self::Format5 | Self::Format7 | Self::Format8 | Self::Format10
        )
    }

    pub fn has_nir(self) -> bool {
        matches!(self, Self::Format8 | Self::Format10)
    }

    pub fn has_waveform(self) -> bool {
        matches!(self, Self::Format4 | Self::Format5 | Self::Format9 | Self::Format10)
    }

    /// Extended 1.4 layouts with the 16-bit flag word.
    pub fn is_extended(self) -> bool {
        self.as_raw() >= 6
    }
}

/// ASPRS standard point classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Classification {
    Created,
    Unclassified,
    Ground,
    LowVegetation,
    MediumVegetation,
    HighVegetation,
    Building,
    LowPoint,
    ModelKeyPoint,
    Water,
    OverlapPoints,
    Other(u8),
}

impl Classification {
    pub fn from_raw(value: u8) -> Self {
        match value {
            0 => Self::Created,
            1 => Self::Unclassified,
            2 => Self::Ground,
            3 => Self::LowVegetation,
            4 => Self::MediumVegetation,
            5 => Self::HighVegetation,
            6 => Self::Building,
            7 => Self::LowPoint,
            8 => Self::ModelKeyPoint,
            9 => Self::Water,
            12 => Self::OverlapPoints,
            other => Self::Other(other),
        }
    }
}

/// Embedded 16-bit-per-channel color block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointRgb {
    pub red: u16,
    pub green: u16,
    pub blue: u16,
}

/// Waveform packet pointer block (formats 4, 5, 9, 10).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WavePacket {
    pub descriptor_index: u8,
    pub byte_offset: u64,
    pub size: u32,
    pub return_point_location: f32,
    pub dx: f32,
    pub dy: f32,
    pub dz: f32,
}

/// One decoded point record, coordinates still in raw integer space.
#[derive(Debug, Clone, PartialEq)]
pub struct RawPoint {
    pub x: i32,
    pub y: i32,
    pub z: i32,
    pub intensity: u16,
    pub return_number: u8,
    pub number_of_returns: u8,
    pub scan_direction: bool,
    pub edge_of_flight_line: bool,
    pub classification: Classification,
    pub classification_flags: u8,
    pub scanner_channel: u8,
    pub scan_angle: i16,
    pub user_data: u8,
    pub point_source_id: u16,
    pub gps_time: Option<f64>,
    pub color: Option<PointRgb>,
    pub nir: Option<u16>,
    pub wave_packet: Option<WavePacket>,
}

impl RawPoint {
    /// Decode one record at the cursor. Consumes exactly
    /// `format.record_length()` bytes.
    pub fn decode(cursor: &mut ByteCursor<'_>, format: PointFormatId) -> Result<Self> {
        let x = cursor.read_i32()?;
        let y = cursor.read_i32()?;
        let z = cursor.read_i32()?;
        let intensity = cursor.read_u16()?;

        let mut point = if format.is_extended() {
            Self::decode_extended_flags(cursor, x, y, z, intensity)?
        } else {
            Self::decode_legacy_flags(cursor, x, y, z, intensity)?
        };

        if format.has_gps_time() {
            point.gps_time = Some(cursor.read_f64()?);
        }
        if format.has_color() {
            point.color = Some(PointRgb {
                red: cursor.read_u16()?,
                green: cursor.read_u16()?,
                blue: cursor.read_u16()?,
            });
        }
        if format.has_nir() {
            point.nir = Some(cursor.read_u16()?);
        }
        if format.has_waveform() {
            point.wave_packet = Some(WavePacket {
                descriptor_index: cursor.read_u8()?,
                byte_offset: cursor.read_u64()?,
                size: cursor.read_u32()?,
                return_point_location: cursor.read_f32()?,
                dx: cursor.read_f32()?,
                dy: cursor.read_f32()?,
                dz: cursor.read_f32()?,
            });
        }
        Ok(point)
    }

    /// Formats 0-5: one packed flag byte, then a classification byte whose
    /// top three bits are synthetic/key-point/withheld flags, then a signed
    /// 8-bit scan angle rank.
    fn decode_legacy_flags(
        cursor: &mut ByteCursor<'_>,
        x: i32,
        y: i32,
        z: i32,
        intensity: u16,
    ) -> Result<Self> {
        let return_number = cursor.read_bits(3)?;
        let number_of_returns = cursor.read_bits(3)?;
        let scan_direction = cursor.read_bits(1)? != 0;
        let edge_of_flight_line = cursor.read_bits(1)? != 0;
        let class_value = cursor.read_bits(5)?;
        let classification_flags = cursor.read_bits(3)?;
        let scan_angle = cursor.read_i8()? as i16;
        let user_data = cursor.read_u8()?;
        let point_source_id = cursor.read_u16()?;
        Ok(Self {
            x,
            y,
            z,
            intensity,
            return_number,
            number_of_returns,
            scan_direction,
            edge_of_flight_line,
            classification: Classification::from_raw(class_value),
            classification_flags,
            scanner_channel: 0,
            scan_angle,
            user_data,
            point_source_id,
            gps_time: None,
            color: None,
            nir: None,
            wave_packet: None,
        })
    }

    /// Formats 6-10: a 16-bit packed flag word, a full-range classification
    /// byte and a signed 16-bit scan angle.
    fn decode_extended_flags(
        cursor: &mut ByteCursor<'_>,
        x: i32,
        y: i32,
        z: i32,
        intensity: u16,
    ) -> Result<Self> {
        let return_number = cursor.read_bits16(4)? as u8;
        let number_of_returns = cursor.read_bits16(4)? as u8;
        let classification_flags = cursor.read_bits16(4)? as u8;
        let scanner_channel = cursor.read_bits16(2)? as u8;
        let scan_direction = cursor.read_bits16(1)? != 0;
        let edge_of_flight_line = cursor.read_bits16(1)? != 0;
        let class_value = cursor.read_u8()?;
        let user_data = cursor.read_u8()?;
        let scan_angle = cursor.read_i16()?;
        let point_source_id = cursor.read_u16()?;
        Ok(Self {
            x,
            y,
            z,
            intensity,
            return_number,
            number_of_returns,
            scan_direction,
            edge_of_flight_line,
            classification: Classification::from_raw(class_value),
            classification_flags,
            scanner_channel,
            scan_angle,
            user_data,
            point_source_id,
            gps_time: None,
            color: None,
            nir: None,
            wave_packet: None,
        })
    }
}
