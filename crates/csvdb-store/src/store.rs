//! SQLite-backed store.
//!
//! Every public operation runs in its own transaction and commits before
//! returning; nothing spans more than one call.

use std::fs;
use std::path::{Path, PathBuf};

use csvdb_model::CellValue;
use rusqlite::types::{Value, ValueRef};
use rusqlite::{Connection, OpenFlags, OptionalExtension, params, params_from_iter};
use serde::{Deserialize, Serialize};

use crate::error::{Result, StoreError};
use crate::identifier::{
    quote_identifier, quote_table_name, rowid_alias, validate_rowid_access,
    validate_type_declaration,
};

/// Name of the table recording every table created by an import.
pub const REGISTRY_TABLE: &str = "import_tables";

fn create_registry_sql() -> String {
    format!(
        "CREATE TABLE IF NOT EXISTS {REGISTRY_TABLE} (
    table_name TEXT PRIMARY KEY COLLATE NOCASE,
    columns TEXT NOT NULL,
    created_at TEXT DEFAULT CURRENT_TIMESTAMP
)"
    )
}

/// A destination column: name plus the declared type, verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDef {
    pub name: String,
    #[serde(rename = "type")]
    pub column_type: String,
}

impl ColumnDef {
    pub fn new(name: impl Into<String>, column_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            column_type: column_type.into(),
        }
    }
}

/// One registry row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryEntry {
    pub table_name: String,
    pub columns: Vec<ColumnDef>,
    pub created_at: String,
}

/// A page of table rows plus the table's total row count.
#[derive(Debug, Clone, PartialEq)]
pub struct TablePage {
    pub table: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
    pub total: usize,
    pub limit: usize,
    pub offset: usize,
}

impl TablePage {
    /// Number of pages of `limit` rows needed for `total` rows (at least 1).
    pub fn page_count(&self) -> usize {
        if self.limit == 0 {
            return 1;
        }
        self.total.div_ceil(self.limit).max(1)
    }

    /// 1-based number of this page.
    pub fn page_number(&self) -> usize {
        if self.limit == 0 {
            return 1;
        }
        self.offset / self.limit + 1
    }
}

/// Handle to the import database.
pub struct Store {
    conn: Connection,
    path: Option<PathBuf>,
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store").field("path", &self.path).finish()
    }
}

impl Store {
    /// Opens (creating if needed) the database file and the registry table.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|source| StoreError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let flags = OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_CREATE;
        let conn =
            Connection::open_with_flags(path, flags).map_err(|source| StoreError::Open {
                path: path.to_path_buf(),
                source,
            })?;
        tracing::debug!(path = %path.display(), "opened database");

        let store = Self {
            conn,
            path: Some(path.to_path_buf()),
        };
        store.init()?;
        Ok(store)
    }

    /// Opens a database file that must already exist.
    ///
    /// Never creates the file or its directories, so a mistyped path fails
    /// with [`StoreError::DatabaseNotFound`] instead of leaving an empty
    /// database behind.
    pub fn open_existing(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(StoreError::DatabaseNotFound {
                path: path.to_path_buf(),
            });
        }

        let conn = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_WRITE)
            .map_err(|source| StoreError::Open {
                path: path.to_path_buf(),
                source,
            })?;
        tracing::debug!(path = %path.display(), "opened existing database");

        let store = Self {
            conn,
            path: Some(path.to_path_buf()),
        };
        store.init()?;
        Ok(store)
    }

    /// Opens a private in-memory database with the registry table.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn, path: None };
        store.init()?;
        Ok(store)
    }

    /// Creates the registry table if absent.
    pub fn init(&self) -> Result<()> {
        self.conn.execute(&create_registry_sql(), [])?;
        Ok(())
    }

    /// Returns true if the table exists. Names match case-insensitively, as
    /// SQLite resolves them.
    pub fn table_exists(&self, table: &str) -> Result<bool> {
        let found = self
            .conn
            .query_row(
                "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1 COLLATE NOCASE",
                [table],
                |_| Ok(()),
            )
            .optional()?;
        Ok(found.is_some())
    }

    /// `CREATE TABLE IF NOT EXISTS` with the given columns, in order.
    pub fn create_table(&mut self, table: &str, columns: &[ColumnDef]) -> Result<()> {
        let sql = create_table_sql(table, columns)?;
        let tx = self.conn.transaction()?;
        tx.execute(&sql, []).map_err(|source| StoreError::Schema {
            table: table.to_string(),
            source,
        })?;
        tx.commit()?;
        Ok(())
    }

    /// Creates the table and records it in the registry in one transaction.
    ///
    /// Either both happen or neither does.
    pub fn create_and_register(&mut self, entry: &RegistryEntry) -> Result<()> {
        let sql = create_table_sql(&entry.table_name, &entry.columns)?;
        let tx = self.conn.transaction()?;
        tx.execute(&sql, []).map_err(|source| StoreError::Schema {
            table: entry.table_name.clone(),
            source,
        })?;
        upsert_registry(&tx, entry)?;
        tx.commit().map_err(|source| StoreError::Schema {
            table: entry.table_name.clone(),
            source,
        })?;
        tracing::debug!(
            table = %entry.table_name,
            columns = entry.columns.len(),
            "table provisioned"
        );
        Ok(())
    }

    /// Inserts every row in a single transaction.
    ///
    /// The placeholder count comes from the first row and values bind in the
    /// table's physical column order. Any failing row rolls back the batch.
    pub fn insert_rows(&mut self, table: &str, rows: &[Vec<CellValue>]) -> Result<usize> {
        let Some(first) = rows.first() else {
            return Err(StoreError::EmptyBatch {
                table: table.to_string(),
            });
        };

        let placeholders = vec!["?"; first.len()].join(", ");
        let sql = format!(
            "INSERT INTO {} VALUES ({})",
            quote_table_name(table)?,
            placeholders
        );
        let insert_error = |source| StoreError::Insert {
            table: table.to_string(),
            source,
        };

        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(&sql).map_err(insert_error)?;
            for row in rows {
                stmt.execute(params_from_iter(row.iter().map(to_sql_value)))
                    .map_err(insert_error)?;
            }
        }
        tx.commit().map_err(insert_error)?;

        tracing::debug!(table, rows = rows.len(), "rows inserted");
        Ok(rows.len())
    }

    /// Reads `limit` rows starting at `offset`, in insertion order.
    ///
    /// Returns [`StoreError::TableNotFound`] for unknown tables.
    pub fn read_page(&self, table: &str, limit: usize, offset: usize) -> Result<TablePage> {
        let quoted = quote_table_name(table)?;
        let columns = self.table_columns(table)?;
        let query_error = |source| StoreError::Query {
            table: table.to_string(),
            source,
        };

        let total: i64 = self
            .conn
            .query_row(&format!("SELECT COUNT(*) FROM {quoted}"), [], |row| {
                row.get(0)
            })
            .map_err(query_error)?;

        // A column may shadow `rowid`; order by whichever alias is still free.
        let order = rowid_alias(&columns)
            .map(|alias| format!(" ORDER BY {alias}"))
            .unwrap_or_default();
        let mut stmt = self
            .conn
            .prepare(&format!(
                "SELECT * FROM {quoted}{order} LIMIT ?1 OFFSET ?2"
            ))
            .map_err(query_error)?;
        let width = columns.len();

        let rows = stmt
            .query_map(params![to_i64(limit), to_i64(offset)], |row| {
                (0..width)
                    .map(|idx| row.get_ref(idx).map(from_value_ref))
                    .collect::<rusqlite::Result<Vec<CellValue>>>()
            })
            .map_err(query_error)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(query_error)?;

        Ok(TablePage {
            table: table.to_string(),
            columns,
            rows,
            total: usize::try_from(total).unwrap_or(0),
            limit,
            offset,
        })
    }

    /// Registry rows, newest first.
    pub fn list_tables(&self) -> Result<Vec<RegistryEntry>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT table_name, columns, created_at FROM {REGISTRY_TABLE}
             ORDER BY created_at DESC, table_name"
        ))?;
        let entries = stmt
            .query_map([], registry_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(entries)
    }

    /// Registry row for one table, if any. Names match case-insensitively.
    pub fn registry_entry(&self, table: &str) -> Result<Option<RegistryEntry>> {
        let entry = self
            .conn
            .query_row(
                &format!(
                    "SELECT table_name, columns, created_at FROM {REGISTRY_TABLE}
                     WHERE table_name = ?1"
                ),
                [table],
                registry_from_row,
            )
            .optional()?;
        Ok(entry)
    }

    /// Column names of an existing table in physical order.
    pub fn table_columns(&self, table: &str) -> Result<Vec<String>> {
        let quoted = quote_table_name(table)?;
        if !self.table_exists(table)? {
            return Err(StoreError::TableNotFound {
                table: table.to_string(),
            });
        }
        let stmt = self.conn.prepare(&format!("SELECT * FROM {quoted} LIMIT 0"))?;
        Ok(stmt
            .column_names()
            .into_iter()
            .map(str::to_string)
            .collect())
    }
}

/// Builds the `CREATE TABLE IF NOT EXISTS` statement after identifier checks.
pub fn create_table_sql(table: &str, columns: &[ColumnDef]) -> Result<String> {
    let table_sql = quote_table_name(table)?;
    let names: Vec<&str> = columns.iter().map(|c| c.name.as_str()).collect();
    validate_rowid_access(table, &names)?;
    let mut defs = Vec::with_capacity(columns.len());
    for column in columns {
        validate_type_declaration(&column.name, &column.column_type)?;
        let name = quote_identifier(&column.name)?;
        if column.column_type.is_empty() {
            defs.push(name);
        } else {
            defs.push(format!("{name} {}", column.column_type));
        }
    }
    Ok(format!(
        "CREATE TABLE IF NOT EXISTS {table_sql} ({})",
        defs.join(", ")
    ))
}

fn upsert_registry(conn: &Connection, entry: &RegistryEntry) -> Result<()> {
    let columns_json =
        serde_json::to_string(&entry.columns).map_err(|source| StoreError::Registry {
            table: entry.table_name.clone(),
            source,
        })?;
    conn.execute(
        &format!(
            "INSERT OR REPLACE INTO {REGISTRY_TABLE} (table_name, columns, created_at)
             VALUES (?1, ?2, ?3)"
        ),
        params![entry.table_name, columns_json, entry.created_at],
    )
    .map_err(|source| StoreError::Schema {
        table: entry.table_name.clone(),
        source,
    })?;
    Ok(())
}

fn registry_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RegistryEntry> {
    let table_name: String = row.get(0)?;
    let columns_json: String = row.get(1)?;
    let created_at: Option<String> = row.get(2)?;
    let columns = serde_json::from_str(&columns_json).unwrap_or_else(|err| {
        tracing::warn!(table = %table_name, error = %err, "unreadable registry columns");
        Vec::new()
    });
    Ok(RegistryEntry {
        table_name,
        columns,
        created_at: created_at.unwrap_or_default(),
    })
}

fn to_sql_value(value: &CellValue) -> Value {
    match value {
        CellValue::Null => Value::Null,
        CellValue::Integer(v) => Value::Integer(*v),
        CellValue::Real(v) => Value::Real(*v),
        CellValue::Text(v) => Value::Text(v.clone()),
        CellValue::Blob(v) => Value::Blob(v.clone()),
    }
}

fn from_value_ref(value: ValueRef<'_>) -> CellValue {
    match value {
        ValueRef::Null => CellValue::Null,
        ValueRef::Integer(v) => CellValue::Integer(v),
        ValueRef::Real(v) => CellValue::Real(v),
        ValueRef::Text(text) => CellValue::Text(String::from_utf8_lossy(text).into_owned()),
        ValueRef::Blob(blob) => CellValue::Blob(blob.to_vec()),
    }
}

fn to_i64(value: usize) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}
