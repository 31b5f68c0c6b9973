//! Tests for loading descriptors from disk.

use std::fs;

use csvdb_model::{ColumnType, ConfigError, load_descriptor};
use tempfile::TempDir;

#[test]
fn load_descriptor_from_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("orders.json");
    fs::write(
        &path,
        r#"{
            "table_name": "orders",
            "csv_settings": {"encoding": "shift_jis", "delimiter": "\t", "has_header": false},
            "column_mappings": [
                {"csv_column": "id", "db_column": "order_id", "data_type": "integer"},
                {"csv_column": "total", "db_column": "total", "data_type": "REAL"},
                {"csv_column": "note", "db_column": "note", "data_type": "VARCHAR(40)"}
            ]
        }"#,
    )
    .unwrap();

    let descriptor = load_descriptor(&path).unwrap();

    assert_eq!(descriptor.table_name, "orders");
    assert_eq!(descriptor.csv_settings.encoding, "shift_jis");
    assert_eq!(descriptor.csv_settings.delimiter, "\t");
    assert!(!descriptor.csv_settings.has_header);
    assert_eq!(descriptor.db_columns(), vec!["order_id", "total", "note"]);

    let kinds: Vec<ColumnType> = descriptor
        .column_mappings
        .iter()
        .map(|mapping| mapping.data_type.kind())
        .collect();
    assert_eq!(
        kinds,
        vec![ColumnType::Integer, ColumnType::Real, ColumnType::Text]
    );
    assert_eq!(descriptor.column_mappings[2].data_type.declared(), "VARCHAR(40)");
}

#[test]
fn load_descriptor_missing_file() {
    let dir = TempDir::new().unwrap();
    let err = load_descriptor(&dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, ConfigError::Read { .. }));
}

#[test]
fn load_descriptor_mapping_missing_field() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.json");
    fs::write(
        &path,
        r#"{
            "table_name": "t",
            "csv_settings": {"encoding": "utf-8", "delimiter": ",", "has_header": true},
            "column_mappings": [{"csv_column": "a", "db_column": "a"}]
        }"#,
    )
    .unwrap();

    let err = load_descriptor(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { .. }));
}
