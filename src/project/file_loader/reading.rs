use std::fs;
use std::path::Path;

use super::{LoadError, TURTLE_EXTENSION, collect_file_paths};

/// A document read from disk, keyed by its `file://` URI.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceDocument {
    pub uri: String,
    pub text: String,
}

pub fn get_extension(path: &Path) -> Result<&str, LoadError> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .ok_or_else(|| LoadError::NoExtension(path.to_path_buf()))
}

pub fn validate_extension(path: &Path) -> Result<(), LoadError> {
    let ext = get_extension(path)?;
    if ext.eq_ignore_ascii_case(TURTLE_EXTENSION) {
        Ok(())
    } else {
        Err(LoadError::UnsupportedExtension(ext.to_string()))
    }
}

pub fn load_file(path: &Path) -> Result<String, LoadError> {
    validate_extension(path)?;
    fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

pub fn path_to_uri(path: &Path) -> String {
    let absolute = path
        .canonicalize()
        .unwrap_or_else(|_| path.to_path_buf());
    let text = absolute.to_string_lossy().replace('\\', "/");
    if text.starts_with('/') {
        format!("file://{text}")
    } else {
        format!("file:///{text}")
    }
}

/// Read every Turtle file below `dir`.
///
/// Fails on the first unreadable file.
pub fn load_directory(dir: &Path) -> Result<Vec<SourceDocument>, LoadError> {
    collect_file_paths(dir)?
        .into_iter()
        .map(|path| {
            Ok(SourceDocument {
                text: load_file(&path)?,
                uri: path_to_uri(&path),
            })
        })
        .collect()
}
