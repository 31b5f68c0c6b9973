//! Import pair discovery.
//!
//! A pair is a data file plus a descriptor file with the same base name,
//! e.g. `orders.csv` + `orders.json`.

use std::path::{Path, PathBuf};

use crate::error::{IngestError, Result};

/// Default data file extension.
pub const DATA_EXTENSION: &str = "csv";

/// Default descriptor file extension.
pub const DESCRIPTOR_EXTENSION: &str = "json";

/// A data file and its descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportPair {
    pub data_path: PathBuf,
    pub descriptor_path: PathBuf,
    /// Shared file stem, used for archive names.
    pub base_name: String,
}

/// Outcome of scanning an import directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Discovery {
    /// Complete pairs, sorted by data file name.
    pub pairs: Vec<ImportPair>,
    /// Data files without a descriptor.
    pub skipped: Vec<PathBuf>,
}

/// Lists all files with the given extension (case-insensitive) in a directory.
///
/// Returns files sorted by filename.
pub fn list_files_with_extension(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(IngestError::DirectoryNotFound {
            path: dir.to_path_buf(),
        });
    }

    let mut files = Vec::new();

    let entries = std::fs::read_dir(dir).map_err(|e| IngestError::DirectoryRead {
        path: dir.to_path_buf(),
        source: e,
    })?;

    for entry_result in entries {
        let entry = entry_result.map_err(|e| IngestError::DirectoryRead {
            path: dir.to_path_buf(),
            source: e,
        })?;

        let path = entry.path();

        // Skip directories
        if !path.is_file() {
            continue;
        }

        let matches = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(extension));

        if matches {
            files.push(path);
        }
    }

    // Sort by filename
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    Ok(files)
}

/// Pairs every data file in `dir` with `<stem>.<descriptor_extension>`.
///
/// Data files without a descriptor are logged and returned in
/// [`Discovery::skipped`]; they are not errors.
pub fn discover_pairs(
    dir: &Path,
    data_extension: &str,
    descriptor_extension: &str,
) -> Result<Discovery> {
    let mut discovery = Discovery::default();

    for data_path in list_files_with_extension(dir, data_extension)? {
        let Some(base_name) = data_path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .map(str::to_string)
        else {
            tracing::warn!(path = %data_path.display(), "skipping file with non UTF-8 name");
            discovery.skipped.push(data_path);
            continue;
        };

        let descriptor_path = dir.join(format!("{base_name}.{descriptor_extension}"));
        if descriptor_path.is_file() {
            discovery.pairs.push(ImportPair {
                data_path,
                descriptor_path,
                base_name,
            });
        } else {
            tracing::warn!(
                path = %data_path.display(),
                expected = %descriptor_path.display(),
                "no descriptor found, skipping"
            );
            discovery.skipped.push(data_path);
        }
    }

    Ok(discovery)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(dir: &TempDir, name: &str) {
        std::fs::write(dir.path().join(name), "header\ndata").unwrap();
    }

    #[test]
    fn test_list_files_with_extension() {
        let dir = TempDir::new().unwrap();
        for name in ["b.csv", "a.CSV", "notes.txt"] {
            touch(&dir, name);
        }
        let files = list_files_with_extension(dir.path(), DATA_EXTENSION).unwrap();

        assert_eq!(files.len(), 2);
        // Should be sorted by filename
        assert_eq!(files[0].file_name().unwrap(), "a.CSV");
        assert_eq!(files[1].file_name().unwrap(), "b.csv");
    }

    #[test]
    fn test_list_empty_dir() {
        let dir = TempDir::new().unwrap();
        let files = list_files_with_extension(dir.path(), "csv").unwrap();
        assert!(files.is_empty());
    }

    #[test]
    fn test_list_not_a_directory() {
        let dir = TempDir::new().unwrap();
        let file_path = dir.path().join("test.csv");
        std::fs::write(&file_path, "data").unwrap();

        let result = list_files_with_extension(&file_path, "csv");
        assert!(matches!(result, Err(IngestError::DirectoryNotFound { .. })));
    }

    #[test]
    fn test_list_skips_directories() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("nested.csv")).unwrap();
        assert!(list_files_with_extension(dir.path(), "csv").unwrap().is_empty());
    }

    #[test]
    fn test_discover_pairs() {
        let dir = TempDir::new().unwrap();
        for name in ["orders.csv", "orders.json", "stock.csv", "lonely.json"] {
            touch(&dir, name);
        }

        let discovery = discover_pairs(dir.path(), "csv", "json").unwrap();

        assert_eq!(discovery.pairs.len(), 1);
        let pair = &discovery.pairs[0];
        assert_eq!(pair.base_name, "orders");
        assert_eq!(pair.data_path, dir.path().join("orders.csv"));
        assert_eq!(pair.descriptor_path, dir.path().join("orders.json"));
        assert_eq!(discovery.skipped, vec![dir.path().join("stock.csv")]);
    }

    #[test]
    fn test_discover_pairs_uppercase_data_extension() {
        let dir = TempDir::new().unwrap();
        touch(&dir, "Report.CSV");
        touch(&dir, "Report.json");

        let discovery = discover_pairs(dir.path(), "csv", "json").unwrap();
        assert_eq!(discovery.pairs.len(), 1);
        assert_eq!(discovery.pairs[0].base_name, "Report");
    }

    #[test]
    fn test_discover_pairs_missing_dir() {
        let dir = TempDir::new().unwrap();
        let result = discover_pairs(&dir.path().join("absent"), "csv", "json");
        assert!(result.is_err());
    }
}
