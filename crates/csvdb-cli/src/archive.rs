//! Moving processed inputs into the archive directory.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use csvdb_ingest::ImportPair;

use crate::error::ImportError;

/// Timestamp suffix format for archived files.
pub const ARCHIVE_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Current local time in [`ARCHIVE_TIMESTAMP_FORMAT`].
pub fn archive_timestamp() -> String {
    chrono::Local::now()
        .format(ARCHIVE_TIMESTAMP_FORMAT)
        .to_string()
}

/// `{base}_{timestamp}.{ext}`, keeping `source`'s extension as written.
pub fn archive_name(base: &str, timestamp: &str, source: &Path) -> String {
    match source.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => format!("{base}_{timestamp}.{ext}"),
        None => format!("{base}_{timestamp}"),
    }
}

/// Renames `from` to `to`, falling back to copy and remove when the rename
/// fails (e.g. across filesystems).
pub fn move_file(from: &Path, to: &Path) -> io::Result<()> {
    let Err(rename_error) = fs::rename(from, to) else {
        return Ok(());
    };
    if rename_error.kind() == io::ErrorKind::NotFound {
        return Err(rename_error);
    }

    tracing::debug!(
        from = %from.display(),
        to = %to.display(),
        error = %rename_error,
        "rename failed, copying instead"
    );
    if fs::copy(from, to).is_err() {
        return Err(rename_error);
    }
    fs::remove_file(from)
}

/// Moves both files of a pair into `archive_dir` under one timestamp.
///
/// Returns the archived paths, data file first.
pub fn archive_pair(
    pair: &ImportPair,
    archive_dir: &Path,
    timestamp: &str,
) -> Result<Vec<PathBuf>, ImportError> {
    let mut archived = Vec::with_capacity(2);
    for source in [&pair.data_path, &pair.descriptor_path] {
        let target = archive_dir.join(archive_name(&pair.base_name, timestamp, source));
        move_file(source, &target).map_err(|e| ImportError::Archive {
            path: source.clone(),
            source: e,
        })?;
        tracing::debug!(from = %source.display(), to = %target.display(), "archived");
        archived.push(target);
    }
    Ok(archived)
}
