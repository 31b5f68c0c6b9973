//! SQLite store for imported CSV data.
//!
//! [`Store`] wraps a single `rusqlite` connection and owns the
//! `import_tables` registry. Tables are created from descriptors with
//! [`provision_table`], filled with [`Store::insert_rows`] and read back a
//! page at a time with [`Store::read_page`].
//!
//! Every table and column name is validated and quoted before it reaches
//! SQL text; see [`identifier`].

pub mod error;
pub mod identifier;
pub mod schema;
pub mod store;

pub use error::{Result, StoreError};
pub use identifier::{quote_identifier, quote_table_name, validate_identifier, validate_table_name};
pub use schema::{TableSchema, build_table_schema, provision_table, validate_schema};
pub use store::{ColumnDef, REGISTRY_TABLE, RegistryEntry, Store, TablePage, create_table_sql};
