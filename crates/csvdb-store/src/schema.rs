//! Table provisioning from import descriptors.

use csvdb_model::ImportDescriptor;

use crate::error::Result;
use crate::identifier::{
    validate_identifier, validate_rowid_access, validate_table_name, validate_type_declaration,
};
use crate::store::{ColumnDef, RegistryEntry, Store};

/// Timestamp format recorded in the registry. Sorts lexicographically.
const CREATED_AT_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// Destination table layout derived from a descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSchema {
    pub table_name: String,
    pub columns: Vec<ColumnDef>,
}

impl TableSchema {
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }
}

/// Columns follow the mapping order; types are the declared strings.
pub fn build_table_schema(descriptor: &ImportDescriptor) -> TableSchema {
    TableSchema {
        table_name: descriptor.table_name.clone(),
        columns: descriptor
            .column_mappings
            .iter()
            .map(|m| ColumnDef::new(m.db_column.clone(), m.data_type.declared()))
            .collect(),
    }
}

/// Checks every name and declared type without touching the database.
pub fn validate_schema(schema: &TableSchema) -> Result<()> {
    validate_table_name(&schema.table_name)?;
    for column in &schema.columns {
        validate_identifier(&column.name)?;
        validate_type_declaration(&column.name, &column.column_type)?;
    }
    validate_rowid_access(&schema.table_name, &schema.column_names())
}

/// Ensures the destination table exists and registers it.
///
/// An existing table keeps its layout; only the registry row is refreshed.
pub fn provision_table(store: &mut Store, descriptor: &ImportDescriptor) -> Result<TableSchema> {
    let schema = build_table_schema(descriptor);
    validate_schema(&schema)?;

    let existed = store.table_exists(&schema.table_name)?;
    let entry = RegistryEntry {
        table_name: schema.table_name.clone(),
        columns: schema.columns.clone(),
        created_at: chrono::Local::now().format(CREATED_AT_FORMAT).to_string(),
    };
    store.create_and_register(&entry)?;

    if existed {
        tracing::info!(table = %schema.table_name, "table already exists, registry refreshed");
    } else {
        tracing::info!(
            table = %schema.table_name,
            columns = schema.columns.len(),
            "table created"
        );
    }
    Ok(schema)
}
