//! Error types for the import pipeline and settings.

use std::fmt;
use std::path::PathBuf;

use csvdb_ingest::IngestError;
use csvdb_model::ConfigError;
use csvdb_store::StoreError;
use thiserror::Error;

/// Pipeline stage a pair failed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportStage {
    Config,
    Read,
    Schema,
    Insert,
    Archive,
}

impl ImportStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImportStage::Config => "config",
            ImportStage::Read => "read",
            ImportStage::Schema => "schema",
            ImportStage::Insert => "insert",
            ImportStage::Archive => "archive",
        }
    }
}

impl fmt::Display for ImportStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure of a single import pair. The run continues with the next pair.
#[derive(Debug, Error)]
pub enum ImportError {
    /// Descriptor missing, malformed or incomplete.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Data file unreadable, undecodable or unparseable.
    #[error(transparent)]
    Read(#[from] IngestError),

    /// Table could not be created or registered.
    #[error("{0}")]
    Schema(#[source] StoreError),

    /// Rows were rejected. The table may exist and stay empty.
    #[error("{0}")]
    Insert(#[source] StoreError),

    /// Data is committed but an input file could not be moved.
    #[error("failed to archive {path}: {source}")]
    Archive {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ImportError {
    pub fn stage(&self) -> ImportStage {
        match self {
            ImportError::Config(_) => ImportStage::Config,
            ImportError::Read(_) => ImportStage::Read,
            ImportError::Schema(_) => ImportStage::Schema,
            ImportError::Insert(_) => ImportStage::Insert,
            ImportError::Archive { .. } => ImportStage::Archive,
        }
    }
}

/// Failure that stops a run before any pair is processed.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Discovery(#[from] IngestError),
}

/// Settings file could not be loaded.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse settings {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Result type for pipeline runs.
pub type Result<T> = std::result::Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_tags() {
        let err = ImportError::Insert(StoreError::EmptyBatch {
            table: "people".to_string(),
        });
        assert_eq!(err.stage(), ImportStage::Insert);
        assert_eq!(err.to_string(), "no rows to insert into people");

        let err = ImportError::from(ConfigError::NotAnObject {
            path: PathBuf::from("a.json"),
        });
        assert_eq!(err.stage().to_string(), "config");
    }

    #[test]
    fn test_archive_display() {
        let err = ImportError::Archive {
            path: PathBuf::from("import/a.csv"),
            source: std::io::Error::other("disk full"),
        };
        assert_eq!(err.stage(), ImportStage::Archive);
        assert_eq!(err.to_string(), "failed to archive import/a.csv: disk full");
    }
}
