//! Errors raised while loading import descriptors.

use std::path::PathBuf;

use thiserror::Error;

/// Descriptor could not be read, parsed, or is missing required keys.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Descriptor file could not be read.
    #[error("failed to read descriptor {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Descriptor is not valid JSON.
    #[error("failed to parse descriptor {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Descriptor root is not a JSON object.
    #[error("descriptor {path} must be a JSON object")]
    NotAnObject { path: PathBuf },

    /// A required top-level key is absent.
    #[error("descriptor {path} is missing required key '{key}'")]
    MissingKey { path: PathBuf, key: &'static str },

    /// A required key inside `csv_settings` is absent.
    #[error("descriptor {path} is missing required csv_settings key '{key}'")]
    MissingSettingsKey { path: PathBuf, key: &'static str },

    /// Keys are present but a value has the wrong shape.
    #[error("invalid descriptor {path}: {source}")]
    Invalid {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Result type for descriptor operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
