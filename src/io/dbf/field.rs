//! DBF field descriptors, type tags, and decoded values.

use std::fmt;

use ahash::RandomState;
use indexmap::IndexMap;

use crate::error::{DecodeError, Result};

/// One-letter field type tag from the field descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DbfFieldType {
    Binary,
    Character,
    Date,
    Numeric,
    Logical,
    Memo,
    Timestamp,
    Long,
    Autoincrement,
    Float,
    Double,
    Ole,
}

impl DbfFieldType {
    /// Map a descriptor type character to a variant. An unknown tag is fatal
    /// for the whole parse: the record byte spans cannot be interpreted
    /// without knowing every field's type.
    pub fn from_tag(tag: char) -> Result<Self> {
        Ok(match tag {
            'B' => Self::Binary,
            'C' => Self::Character,
            'D' => Self::Date,
            'N' => Self::Numeric,
            'L' => Self::Logical,
            'M' => Self::Memo,
            '@' => Self::Timestamp,
            'I' => Self::Long,
            '+' => Self::Autoincrement,
            'F' => Self::Float,
            'O' => Self::Double,
            'G' => Self::Ole,
            other => return Err(DecodeError::InvalidFieldType(other)),
        })
    }

    /// The descriptor type character.
    pub fn as_tag(&self) -> char {
        match self {
            Self::Binary => 'B',
            Self::Character => 'C',
            Self::Date => 'D',
            Self::Numeric => 'N',
            Self::Logical => 'L',
            Self::Memo => 'M',
            Self::Timestamp => '@',
            Self::Long => 'I',
            Self::Autoincrement => '+',
            Self::Float => 'F',
            Self::Double => 'O',
            Self::Ole => 'G',
        }
    }
}

impl fmt::Display for DbfFieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// One field descriptor from the header's descriptor block.
#[derive(Debug, Clone, PartialEq)]
pub struct DbfFieldDescriptor {
    /// Field name with trailing NUL/space padding stripped.
    pub name: String,
    pub field_type: DbfFieldType,
    /// Declared byte length of the field's span in every record.
    pub length: u8,
    /// Decimal places for numeric types.
    pub decimals: u8,
    /// In-memory address (legacy, kept verbatim from the descriptor).
    pub mem_addr: i32,
    pub work_area: i8,
    pub mdx_flag: i8,
    /// Next autoincrement value (V4 layout only).
    pub next_autoincrement: Option<i32>,
}

/// A decoded field value.
///
/// Numeric/Binary/Float fields decode through a `parseInt`-style text-to-
/// integer conversion, so they land in `Integer` (or `Null` when the text
/// has no digit prefix); only binary Double fields produce `Float`.
#[derive(Debug, Clone, PartialEq)]
pub enum DbfValue {
    Character(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Null,
}

impl DbfValue {
    /// The text of a character-class field, if this is one.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Character(s) => Some(s),
            _ => None,
        }
    }

    /// The integer value, if this is one.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(v) => Some(*v),
            _ => None,
        }
    }

    /// The float value, if this is one.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// The boolean value, if this is one.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(v) => Some(*v),
            _ => None,
        }
    }

    /// True for `Null`.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

/// Field name → value map preserving field declaration order.
pub type DbfValueMap = IndexMap<String, DbfValue, RandomState>;

/// One decoded table row.
#[derive(Debug, Clone, PartialEq)]
pub struct DbfRecord {
    /// Set when the record's leading byte carries the deleted marker (0x1A).
    pub deleted: bool,
    pub values: DbfValueMap,
}

impl DbfRecord {
    /// Look up a field value by name.
    pub fn get(&self, name: &str) -> Option<&DbfValue> {
        self.values.get(name)
    }
}

/// Emulates JavaScript's `parseInt`: skip leading whitespace/NULs, take an
/// optional sign and the longest digit prefix, ignore the rest. Returns
/// `None` (→ `DbfValue::Null`) when no digits are present.
pub(crate) fn parse_int_prefix(text: &str) -> Option<i64> {
    let trimmed = text.trim_start_matches(|c: char| c.is_whitespace() || c == '\0');
    let bytes = trimmed.as_bytes();
    let mut i = 0;
    let negative = match bytes.first() {
        Some(b'-') => {
            i += 1;
            true
        }
        Some(b'+') => {
            i += 1;
            false
        }
        _ => false,
    };
    let start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    if i == start {
        return None;
    }
    let magnitude: i64 = trimmed[start..i].parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_type_roundtrip() {
        for tag in ['B', 'C', 'D', 'N', 'L', 'M', '@', 'I', '+', 'F', 'O', 'G'] {
            let ft = DbfFieldType::from_tag(tag).unwrap();
            assert_eq!(ft.as_tag(), tag);
        }
    }

    #[test]
    fn test_unknown_tag_is_fatal() {
        assert!(matches!(
            DbfFieldType::from_tag('X'),
            Err(DecodeError::InvalidFieldType('X'))
        ));
    }

    #[test]
    fn test_parse_int_prefix() {
        assert_eq!(parse_int_prefix("  42"), Some(42));
        assert_eq!(parse_int_prefix("-17 "), Some(-17));
        assert_eq!(parse_int_prefix("+5"), Some(5));
        // Decimal tail is dropped, mirroring parseInt.
        assert_eq!(parse_int_prefix("42.5"), Some(42));
        assert_eq!(parse_int_prefix("HELLO"), None);
        assert_eq!(parse_int_prefix(""), None);
        assert_eq!(parse_int_prefix("\0\0 12x"), Some(12));
    }

    #[test]
    fn test_value_accessors() {
        assert_eq!(DbfValue::Integer(3).as_i64(), Some(3));
        assert_eq!(DbfValue::Boolean(true).as_bool(), Some(true));
        assert!(DbfValue::Null.is_null());
        assert_eq!(DbfValue::Character("x".into()).as_str(), Some("x"));
    }
}
