//! CSV file reading with descriptor-driven encoding, delimiter, and header policy.

use std::path::Path;

use ::csv::ReaderBuilder;
use csvdb_model::CsvSettings;

use crate::error::{IngestError, Result};

use super::encoding::{decode_strict, resolve_encoding};

/// Decoded CSV contents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CsvData {
    /// Header names, empty when the file has no header row.
    pub headers: Vec<String>,
    /// Data records in file order.
    pub rows: Vec<Vec<String>>,
}

impl CsvData {
    pub fn has_headers(&self) -> bool {
        !self.headers.is_empty()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// Reads the whole file into memory and splits it into records.
///
/// - The file is decoded strictly with `settings.encoding`.
/// - `settings.delimiter` must be a single ASCII character.
/// - With `has_header`, the first record becomes [`CsvData::headers`];
///   otherwise every record is data.
///
/// Records may have differing lengths.
pub fn read_csv_file(path: &Path, settings: &CsvSettings) -> Result<CsvData> {
    let encoding =
        resolve_encoding(&settings.encoding).ok_or_else(|| IngestError::UnknownEncoding {
            path: path.to_path_buf(),
            label: settings.encoding.clone(),
        })?;
    let delimiter = parse_delimiter(&settings.delimiter).ok_or_else(|| {
        IngestError::InvalidDelimiter {
            path: path.to_path_buf(),
            delimiter: settings.delimiter.clone(),
        }
    })?;

    let bytes = std::fs::read(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            IngestError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            IngestError::FileRead {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })?;

    let (text, used) = decode_strict(&bytes, encoding).ok_or_else(|| IngestError::Decode {
        path: path.to_path_buf(),
        encoding: encoding.name(),
    })?;
    tracing::debug!(
        path = %path.display(),
        encoding = used.name(),
        bytes = bytes.len(),
        "decoded CSV file"
    );

    parse_records(&text, delimiter, settings.has_header, path)
}

/// Splits decoded text into records.
pub fn parse_records(text: &str, delimiter: u8, has_header: bool, path: &Path) -> Result<CsvData> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(text.as_bytes());

    let mut records = reader.records();
    let mut data = CsvData::default();

    if has_header {
        match records.next() {
            Some(record) => {
                let record = record.map_err(|e| IngestError::CsvParse {
                    path: path.to_path_buf(),
                    source: e,
                })?;
                data.headers = record.iter().map(str::to_string).collect();
            }
            None => {
                return Err(IngestError::MissingHeader {
                    path: path.to_path_buf(),
                });
            }
        }
    }

    for record in records {
        let record = record.map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            source: e,
        })?;
        data.rows.push(record.iter().map(str::to_string).collect());
    }

    Ok(data)
}

/// Accepts exactly one ASCII character.
fn parse_delimiter(value: &str) -> Option<u8> {
    match value.as_bytes() {
        [byte] if byte.is_ascii() => Some(*byte),
        _ => None,
    }
}
