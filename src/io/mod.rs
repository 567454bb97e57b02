//! Binary format readers and the shared byte cursor they decode through.

pub mod cursor;
pub mod dbf;
pub mod las;
pub mod shp;

pub use cursor::{ByteCursor, Endianness};
