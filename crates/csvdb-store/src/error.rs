//! Error types for the SQLite store.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database parent directory could not be created.
    #[error("failed to create database directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Database file could not be opened.
    #[error("failed to open database {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Database file expected to exist was not found.
    #[error("database not found: {path}")]
    DatabaseNotFound { path: PathBuf },

    /// Table or column name rejected by the identifier policy.
    #[error("invalid identifier {name:?}: {reason}")]
    InvalidIdentifier { name: String, reason: &'static str },

    /// Declared column type rejected by the type policy.
    #[error("invalid type {declared:?} for column {column:?}")]
    InvalidType { column: String, declared: String },

    /// `CREATE TABLE` or the registry update was rejected.
    #[error("failed to create table {table}: {source}")]
    Schema {
        table: String,
        #[source]
        source: rusqlite::Error,
    },

    /// Bulk insert was rejected; nothing from the batch was kept.
    #[error("failed to insert into {table}: {source}")]
    Insert {
        table: String,
        #[source]
        source: rusqlite::Error,
    },

    /// Bulk insert called with no rows.
    #[error("no rows to insert into {table}")]
    EmptyBatch { table: String },

    /// Table does not exist.
    #[error("table not found: {table}")]
    TableNotFound { table: String },

    /// Read query failed.
    #[error("failed to query {table}: {source}")]
    Query {
        table: String,
        #[source]
        source: rusqlite::Error,
    },

    /// Registry column list could not be serialized.
    #[error("failed to encode registry columns for {table}: {source}")]
    Registry {
        table: String,
        #[source]
        source: serde_json::Error,
    },

    /// Other SQLite failure.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
