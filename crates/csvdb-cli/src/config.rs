//! Persistent settings, read from a TOML file.
//!
//! Lookup order: an explicit `--config` path, then `csvdb.toml` in the
//! working directory, then built-in defaults. Relative paths are resolved
//! against `CSVDB_HOME` when it is set.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::SettingsError;
use crate::pipeline::ImportSettings;

/// Settings file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "csvdb.toml";

/// Environment variable that relative paths are resolved against.
pub const HOME_ENV: &str = "CSVDB_HOME";

/// Importer settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Directory scanned for data/descriptor pairs.
    pub import_dir: PathBuf,

    /// Directory processed files are moved to.
    pub archive_dir: PathBuf,

    /// SQLite database file.
    pub database: PathBuf,

    /// Rows per page for `view`.
    pub page_size: usize,

    pub data_extension: String,
    pub descriptor_extension: String,
}

impl Default for Settings {
    fn default() -> Self {
        let import = ImportSettings::default();
        Self {
            import_dir: import.import_dir,
            archive_dir: import.archive_dir,
            database: import.database,
            page_size: 100,
            data_extension: import.data_extension,
            descriptor_extension: import.descriptor_extension,
        }
    }
}

impl Settings {
    /// Loads settings following the lookup order and rebases relative paths
    /// onto `home`.
    ///
    /// An explicit path that does not exist is an error; a missing
    /// `csvdb.toml` is not.
    pub fn load(explicit: Option<&Path>, home: Option<&Path>) -> Result<Self, SettingsError> {
        let settings = match explicit {
            Some(path) => Self::load_from(path)?,
            None => {
                let default_path = Path::new(CONFIG_FILE_NAME);
                if default_path.is_file() {
                    Self::load_from(default_path)?
                } else {
                    Self::default()
                }
            }
        };
        Ok(match home {
            Some(home) => settings.rebase(home),
            None => settings,
        })
    }

    /// Load settings from a specific path.
    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = toml::from_str(&content).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "loaded settings");
        Ok(settings)
    }

    /// Joins every relative path onto `home`.
    #[must_use]
    pub fn rebase(mut self, home: &Path) -> Self {
        for path in [
            &mut self.import_dir,
            &mut self.archive_dir,
            &mut self.database,
        ] {
            if path.is_relative() {
                *path = home.join(&*path);
            }
        }
        self
    }

    /// Settings handed to the importer.
    pub fn import_settings(&self, dry_run: bool) -> ImportSettings {
        ImportSettings {
            import_dir: self.import_dir.clone(),
            archive_dir: self.archive_dir.clone(),
            database: self.database.clone(),
            data_extension: self.data_extension.clone(),
            descriptor_extension: self.descriptor_extension.clone(),
            dry_run,
        }
    }
}
