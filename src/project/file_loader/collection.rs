use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use super::{LoadError, TURTLE_EXTENSION};

/// Every `.ttl` file below `dir`, sorted by path.
///
/// Unreadable entries are skipped.
pub fn collect_file_paths(dir: &Path) -> Result<Vec<PathBuf>, LoadError> {
    if !dir.is_dir() {
        return Err(LoadError::DirectoryNotFound(dir.to_path_buf()));
    }
    let mut paths: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| path.extension().is_some_and(|ext| ext == TURTLE_EXTENSION))
        .collect();
    paths.sort();
    Ok(paths)
}
