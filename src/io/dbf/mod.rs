//! dBase table (DBF) decoding.
//!
//! DBF files open with a version discriminator byte that selects one of four
//! header layouts, followed by field descriptors and a fixed-width record
//! stream. [`DbfReader`] decodes a resident byte buffer into a [`DbfTable`]
//! of typed field values.

mod field;
mod reader;
mod version;

pub use field::{DbfFieldDescriptor, DbfFieldType, DbfRecord, DbfValue, DbfValueMap};
pub use reader::{read_file, DbfHeader, DbfReader, DbfTable};
pub use version::{DbfVersion, HeaderLayout};
