//! CSV reading utilities.

mod encoding;
mod reader;

pub use encoding::{decode_strict, resolve_encoding};
pub use reader::{CsvData, parse_records, read_csv_file};
