//! Data model for CSV-to-SQLite imports.
//!
//! An import is driven by a JSON descriptor that sits next to each CSV file.
//! The descriptor names the target table, describes how the CSV is encoded,
//! and lists the column mappings in table column order.
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use csvdb_model::{ColumnType, load_descriptor};
//!
//! let descriptor = load_descriptor(Path::new("import/orders.json"))?;
//! for mapping in &descriptor.column_mappings {
//!     if mapping.data_type.kind() == ColumnType::Integer {
//!         println!("{} is numeric", mapping.db_column);
//!     }
//! }
//! ```

pub mod descriptor;
pub mod error;
pub mod loader;
pub mod value;

pub use descriptor::{ColumnMapping, ColumnType, CsvSettings, DataType, ImportDescriptor};
pub use error::{ConfigError, Result};
pub use loader::{REQUIRED_KEYS, REQUIRED_SETTINGS_KEYS, load_descriptor, parse_descriptor};
pub use value::CellValue;
