//! Import descriptor types.
//!
//! These mirror the JSON side-car file one-to-one. The only derived piece is
//! [`DataType`], which resolves the declared type string into a
//! [`ColumnType`] once, at load time, so per-cell coercion never re-parses it.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Per-file import configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportDescriptor {
    /// Destination table name.
    pub table_name: String,
    /// How to decode and split the CSV file.
    pub csv_settings: CsvSettings,
    /// Column rules, in destination table column order.
    pub column_mappings: Vec<ColumnMapping>,
}

impl ImportDescriptor {
    /// Destination column names in mapping order.
    pub fn db_columns(&self) -> Vec<&str> {
        self.column_mappings
            .iter()
            .map(|mapping| mapping.db_column.as_str())
            .collect()
    }
}

/// CSV decoding rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CsvSettings {
    /// Text encoding label, e.g. `utf-8` or `shift_jis`.
    pub encoding: String,
    /// Field delimiter; must be a single ASCII character.
    pub delimiter: String,
    /// Whether the first record holds column names.
    pub has_header: bool,
}

/// One source-column to destination-column rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnMapping {
    /// Header name in the CSV (ignored when the file has no header).
    pub csv_column: String,
    /// Column name in the destination table.
    pub db_column: String,
    /// Declared column type.
    pub data_type: DataType,
}

/// Semantic type used for value coercion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ColumnType {
    /// Values pass through unchanged.
    #[default]
    Text,
    /// Values parse as `i64`, defaulting to 0.
    Integer,
    /// Values parse as `f64`, defaulting to 0.0.
    Real,
}

impl ColumnType {
    /// Resolves a declared type name.
    ///
    /// Only `INTEGER` and `REAL` (any ASCII case) are recognized; every other
    /// declaration, including the empty string, behaves as text.
    pub fn from_declared(declared: &str) -> Self {
        if declared.eq_ignore_ascii_case("INTEGER") {
            ColumnType::Integer
        } else if declared.eq_ignore_ascii_case("REAL") {
            ColumnType::Real
        } else {
            ColumnType::Text
        }
    }

    /// Returns the canonical SQLite type name.
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnType::Text => "TEXT",
            ColumnType::Integer => "INTEGER",
            ColumnType::Real => "REAL",
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A declared column type: the verbatim string plus its resolved kind.
///
/// The verbatim string is what goes into `CREATE TABLE`; the kind drives
/// coercion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct DataType {
    declared: String,
    kind: ColumnType,
}

impl DataType {
    pub fn new(declared: impl Into<String>) -> Self {
        let declared = declared.into();
        let kind = ColumnType::from_declared(&declared);
        Self { declared, kind }
    }

    /// The type string exactly as written in the descriptor.
    pub fn declared(&self) -> &str {
        &self.declared
    }

    pub fn kind(&self) -> ColumnType {
        self.kind
    }
}

impl From<String> for DataType {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&str> for DataType {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<DataType> for String {
    fn from(value: DataType) -> Self {
        value.declared
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.declared)
    }
}
