//! Error types for gisbin decoding operations

use std::io;
use thiserror::Error;

/// Main error type for gisbin decode operations
///
/// Every fatal condition aborts the whole `read()` call; there is no
/// partial-result return, so callers never mistake truncated data for a
/// complete decode. Non-fatal conditions are reported through the
/// notification side-channel instead (see [`crate::notification`]).
#[derive(Debug, Error)]
pub enum DecodeError {
    /// IO error occurred while loading a file into memory
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// A read or seek would pass the end of the buffer
    #[error("read of {wanted} bytes at offset {offset} passes buffer end ({len} bytes)")]
    OutOfBounds {
        offset: usize,
        wanted: usize,
        len: usize,
    },

    /// Leading magic bytes/value do not match the expected format marker
    #[error("invalid file signature: {0}")]
    InvalidSignature(String),

    /// A version discriminator did not match any known enumerated case
    #[error("unknown format version: {0:#04X}")]
    InvalidVersion(u8),

    /// A shapefile shape-type value outside the enumerated set
    #[error("invalid shape type: {0}")]
    InvalidShapeType(i32),

    /// A LAS point-data format id outside the enumerated set
    #[error("unknown LAS point format: {0}")]
    InvalidPointFormat(u8),

    /// A DBF field type tag outside the enumerated set
    #[error("invalid DBF field type tag: {0:?}")]
    InvalidFieldType(char),

    /// Declared length or record count is inconsistent with the buffer size
    #[error("truncated file: {0}")]
    TruncatedFile(String),

    /// The caller's cancellation token was set mid-decode
    #[error("decode cancelled")]
    Cancelled,

    /// Generic error with custom message
    #[error("{0}")]
    Custom(String),
}

/// Result type alias for gisbin operations
pub type Result<T> = std::result::Result<T, DecodeError>;

impl From<String> for DecodeError {
    fn from(s: String) -> Self {
        DecodeError::Custom(s)
    }
}

impl From<&str> for DecodeError {
    fn from(s: &str) -> Self {
        DecodeError::Custom(s.to_string())
    }
}
