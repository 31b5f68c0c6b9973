//! Mapping CSV records onto destination columns.
//!
//! Values are resolved by header name when the file has headers, otherwise
//! strictly by position: the n-th mapping takes the n-th cell. Coercion never
//! fails; unparseable numbers become zero.

use std::collections::HashMap;

use csvdb_model::{CellValue, ColumnMapping, ColumnType};

use crate::csv::CsvData;

/// Maps source records to rows aligned with the destination column order.
#[derive(Debug)]
pub struct RowMapper<'a> {
    mappings: &'a [ColumnMapping],
    header_index: Option<HashMap<&'a str, usize>>,
}

impl<'a> RowMapper<'a> {
    /// Builds the header lookup once. With an empty `headers` slice the
    /// mapper works positionally.
    pub fn new(headers: &'a [String], mappings: &'a [ColumnMapping]) -> Self {
        let header_index = if headers.is_empty() {
            None
        } else {
            // Later duplicates overwrite earlier ones.
            Some(
                headers
                    .iter()
                    .enumerate()
                    .map(|(idx, header)| (header.as_str(), idx))
                    .collect(),
            )
        };
        Self {
            mappings,
            header_index,
        }
    }

    /// Returns true when values are looked up by header name.
    pub fn by_header(&self) -> bool {
        self.header_index.is_some()
    }

    /// Maps one source record.
    pub fn map_row(&self, row: &[String]) -> Vec<CellValue> {
        let mut mapped = Vec::with_capacity(self.mappings.len());
        for mapping in self.mappings {
            let raw = self.resolve(mapping, row, mapped.len());
            mapped.push(coerce(raw, mapping.data_type.kind()));
        }
        mapped
    }

    fn resolve<'r>(&self, mapping: &ColumnMapping, row: &'r [String], position: usize) -> &'r str {
        let idx = match &self.header_index {
            Some(index) => index.get(mapping.csv_column.as_str()).copied(),
            None => Some(position),
        };
        idx.and_then(|idx| row.get(idx))
            .map(String::as_str)
            .unwrap_or("")
    }
}

/// Maps every data record of `data`.
pub fn map_rows(data: &CsvData, mappings: &[ColumnMapping]) -> Vec<Vec<CellValue>> {
    let mapper = RowMapper::new(&data.headers, mappings);
    let rows: Vec<Vec<CellValue>> = data.rows.iter().map(|row| mapper.map_row(row)).collect();
    tracing::debug!(
        rows = rows.len(),
        columns = mappings.len(),
        by_header = mapper.by_header(),
        "mapped CSV rows"
    );
    rows
}

/// Converts a raw cell to the column's semantic type.
///
/// - `Integer`: trimmed `i64` parse, `0` when blank or invalid.
/// - `Real`: trimmed `f64` parse, `0.0` when blank or invalid.
/// - `Text`: unchanged.
pub fn coerce(raw: &str, kind: ColumnType) -> CellValue {
    match kind {
        ColumnType::Integer => CellValue::Integer(raw.trim().parse().unwrap_or(0)),
        ColumnType::Real => CellValue::Real(raw.trim().parse().unwrap_or(0.0)),
        ColumnType::Text => CellValue::Text(raw.to_string()),
    }
}
