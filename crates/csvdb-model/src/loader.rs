//! Descriptor loading and required-key validation.

use std::path::Path;

use serde_json::Value;

use crate::descriptor::ImportDescriptor;
use crate::error::{ConfigError, Result};

/// Top-level keys every descriptor must carry, in check order.
pub const REQUIRED_KEYS: [&str; 3] = ["table_name", "csv_settings", "column_mappings"];

/// Keys required inside `csv_settings`, in check order.
pub const REQUIRED_SETTINGS_KEYS: [&str; 3] = ["encoding", "delimiter", "has_header"];

/// Reads and validates a descriptor file.
///
/// The file is read as UTF-8 JSON. Required keys are checked before the
/// typed conversion so a missing key is reported by name rather than as a
/// generic deserialization failure.
pub fn load_descriptor(path: &Path) -> Result<ImportDescriptor> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_descriptor(&content, path)
}

/// Parses descriptor text. `path` is only used in error messages.
pub fn parse_descriptor(content: &str, path: &Path) -> Result<ImportDescriptor> {
    let value: Value = serde_json::from_str(content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    validate_descriptor(&value, path)?;

    let descriptor: ImportDescriptor =
        serde_json::from_value(value).map_err(|source| ConfigError::Invalid {
            path: path.to_path_buf(),
            source,
        })?;

    if descriptor.column_mappings.is_empty() {
        tracing::warn!(
            path = %path.display(),
            table = %descriptor.table_name,
            "descriptor has no column mappings"
        );
    }

    Ok(descriptor)
}

/// Checks that all required keys are present.
///
/// Only presence is checked here; value shapes are enforced by the typed
/// conversion that follows.
pub fn validate_descriptor(value: &Value, path: &Path) -> Result<()> {
    let Some(root) = value.as_object() else {
        return Err(ConfigError::NotAnObject {
            path: path.to_path_buf(),
        });
    };

    for key in REQUIRED_KEYS {
        if !root.contains_key(key) {
            return Err(ConfigError::MissingKey {
                path: path.to_path_buf(),
                key,
            });
        }
    }

    let settings = root.get("csv_settings").and_then(Value::as_object);
    for key in REQUIRED_SETTINGS_KEYS {
        if !settings.is_some_and(|settings| settings.contains_key(key)) {
            return Err(ConfigError::MissingSettingsKey {
                path: path.to_path_buf(),
                key,
            });
        }
    }

    Ok(())
}
