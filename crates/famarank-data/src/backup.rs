//! Versioned copies of output files.

use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::Result;

/// First unused backup path for `path`: `<stem>_v<N>.<ext>`, N starting at 1.
#[must_use]
pub fn backup_path(path: &Path) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let extension = path.extension().map(|e| e.to_string_lossy().into_owned());

    (1..)
        .map(|n| {
            let name = match &extension {
                Some(ext) => format!("{stem}_v{n}.{ext}"),
                None => format!("{stem}_v{n}"),
            };
            path.with_file_name(name)
        })
        .find(|candidate| !candidate.exists())
        .unwrap_or_else(|| path.to_path_buf())
}

/// Copies an existing file to its next backup path.
///
/// Returns the backup path, or `None` when `path` does not exist.
///
/// # Errors
///
/// Fails if the copy fails.
pub fn backup_file(path: &Path) -> Result<Option<PathBuf>> {
    if !path.exists() {
        return Ok(None);
    }
    let target = backup_path(path);
    fs::copy(path, &target)?;
    Ok(Some(target))
}
