//! DBF version byte and header-layout dispatch.

use std::fmt;

use crate::error::{DecodeError, Result};

/// Table format version, read from the leading byte of the file.
///
/// An unknown byte yields [`DecodeError::InvalidVersion`]; callers that probe
/// arbitrary buffers can treat that variant as "not a DBF file" instead of a
/// hard failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DbfVersion {
    DBase2,
    DBase3,
    DBase3WithMemo,
    DBase4SqlTable,
    DBase4SqlSystem,
    DBase4WithMemo,
    DBase4SqlTableWithMemo,
    DBase7,
    VisualFoxPro,
    VisualFoxProAutoincrement,
    VisualFoxProVarchar,
    FoxPro2WithMemo,
    FoxBase,
    HiPerSix,
}

/// The four header layouts the version byte dispatches to. Several versions
/// share one layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderLayout {
    /// dBase II: 16-bit record count doubling as the field-descriptor count.
    V2,
    /// dBase III: fixed preamble, fixed descriptor count from header size.
    V2_5,
    /// dBase IV: descriptors read until the declared header size is reached.
    V3,
    /// dBase V / FoxPro 2.x / HiPerSix: 32-byte field names, autoincrement.
    V4,
}

impl DbfVersion {
    /// Map the on-disk version byte to a variant.
    pub fn from_raw(value: u8) -> Result<Self> {
        Ok(match value {
            0x02 => Self::DBase2,
            0x03 => Self::DBase3,
            0x83 => Self::DBase3WithMemo,
            0x43 => Self::DBase4SqlTable,
            0x63 => Self::DBase4SqlSystem,
            0x8B => Self::DBase4WithMemo,
            0xCB => Self::DBase4SqlTableWithMemo,
            0x04 => Self::DBase7,
            0x30 => Self::VisualFoxPro,
            0x31 => Self::VisualFoxProAutoincrement,
            0x32 => Self::VisualFoxProVarchar,
            0xF5 => Self::FoxPro2WithMemo,
            0xFB => Self::FoxBase,
            0xE5 => Self::HiPerSix,
            other => return Err(DecodeError::InvalidVersion(other)),
        })
    }

    /// The on-disk version byte.
    pub fn as_raw(&self) -> u8 {
        match self {
            Self::DBase2 => 0x02,
            Self::DBase3 => 0x03,
            Self::DBase3WithMemo => 0x83,
            Self::DBase4SqlTable => 0x43,
            Self::DBase4SqlSystem => 0x63,
            Self::DBase4WithMemo => 0x8B,
            Self::DBase4SqlTableWithMemo => 0xCB,
            Self::DBase7 => 0x04,
            Self::VisualFoxPro => 0x30,
            Self::VisualFoxProAutoincrement => 0x31,
            Self::VisualFoxProVarchar => 0x32,
            Self::FoxPro2WithMemo => 0xF5,
            Self::FoxBase => 0xFB,
            Self::HiPerSix => 0xE5,
        }
    }

    /// The header layout this version decodes with.
    pub fn layout(&self) -> HeaderLayout {
        match self {
            Self::DBase2 => HeaderLayout::V2,
            Self::DBase3 | Self::DBase3WithMemo | Self::FoxBase => HeaderLayout::V2_5,
            Self::DBase4SqlTable
            | Self::DBase4SqlSystem
            | Self::DBase4WithMemo
            | Self::DBase4SqlTableWithMemo => HeaderLayout::V3,
            Self::DBase7
            | Self::VisualFoxPro
            | Self::VisualFoxProAutoincrement
            | Self::VisualFoxProVarchar
            | Self::FoxPro2WithMemo
            | Self::HiPerSix => HeaderLayout::V4,
        }
    }
}

impl fmt::Display for DbfVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} ({:#04X})", self, self.as_raw())
    }
}
