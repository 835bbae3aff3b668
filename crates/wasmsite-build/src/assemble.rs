//! Filesystem operations that compose the output directory.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::BuildError;
use crate::layout::WasmArtifacts;

/// Remove the output directory tree. A missing directory is not an error.
pub fn clean_output(output_dir: &Path) -> Result<bool, BuildError> {
    match fs::remove_dir_all(output_dir) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(BuildError::io("Failed to remove", output_dir, e)),
    }
}

/// Create every missing directory above `file`.
pub fn ensure_parent(file: &Path) -> Result<(), BuildError> {
    match file.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent)
            .map_err(|e| BuildError::io("Failed to create directory", parent, e)),
        _ => Ok(()),
    }
}

/// Recursively copy `src` into `dst` with merge semantics.
///
/// Directories are created as needed, files that already exist at the same
/// relative path are overwritten and anything else in `dst` is left alone.
/// Returns the relative paths of the copied files in walk order.
pub fn copy_tree(src: &Path, dst: &Path) -> Result<Vec<PathBuf>, BuildError> {
    let mut copied = Vec::new();

    for entry in WalkDir::new(src).follow_links(true).sort_by_file_name() {
        let entry = entry.map_err(|source| BuildError::Walk {
            root: src.to_path_buf(),
            source,
        })?;

        let relative = entry.path().strip_prefix(src).unwrap_or(entry.path());
        let target = dst.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)
                .map_err(|e| BuildError::io("Failed to create directory", &target, e))?;
            continue;
        }

        fs::copy(entry.path(), &target)
            .map_err(|e| BuildError::io("Failed to copy", entry.path(), e))?;
        copied.push(relative.to_path_buf());
    }

    Ok(copied)
}

/// Copy the packaging tool's artifacts into the top of the output directory.
pub fn place_artifacts(
    package_dir: &Path,
    artifacts: &WasmArtifacts,
    output_dir: &Path,
) -> Result<Vec<PathBuf>, BuildError> {
    fs::create_dir_all(output_dir)
        .map_err(|e| BuildError::io("Failed to create directory", output_dir, e))?;

    artifacts
        .file_names()
        .into_iter()
        .map(|name| -> Result<PathBuf, BuildError> {
            let from = package_dir.join(&name);
            let to = output_dir.join(&name);
            fs::copy(&from, &to).map_err(|e| BuildError::io("Failed to copy", &from, e))?;
            Ok(to)
        })
        .collect()
}
