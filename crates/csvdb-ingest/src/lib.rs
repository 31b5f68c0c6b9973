//! CSV import ingestion utilities.
//!
//! This crate finds import pairs in a directory, decodes CSV files according
//! to their descriptor, and maps the records onto destination table rows.
//!
//! # Features
//!
//! - **Pair Discovery**: Match `name.csv` with its `name.json` descriptor
//! - **CSV Loading**: Strict decoding with any `encoding_rs` encoding, custom delimiters
//! - **Row Mapping**: Header-name or positional lookup with type coercion
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use csvdb_ingest::{discover_pairs, map_rows, read_csv_file};
//! use csvdb_model::load_descriptor;
//!
//! let discovery = discover_pairs(Path::new("import"), "csv", "json")?;
//! for pair in &discovery.pairs {
//!     let descriptor = load_descriptor(&pair.descriptor_path)?;
//!     let data = read_csv_file(&pair.data_path, &descriptor.csv_settings)?;
//!     let rows = map_rows(&data, &descriptor.column_mappings);
//! }
//! ```

mod csv;
mod discovery;
mod error;
mod mapper;

// === Error Types ===
pub use error::{IngestError, Result};

// === CSV Reading ===
pub use self::csv::{CsvData, decode_strict, parse_records, read_csv_file, resolve_encoding};

// === File Discovery ===
pub use discovery::{
    DATA_EXTENSION, DESCRIPTOR_EXTENSION, Discovery, ImportPair, discover_pairs,
    list_files_with_extension,
};

// === Row Mapping ===
pub use mapper::{RowMapper, coerce, map_rows};
