//! Collecting and reading Turtle files from disk.

mod collection;
mod reading;

use std::path::PathBuf;

use thiserror::Error;

pub use collection::collect_file_paths;
pub use reading::{SourceDocument, get_extension, load_directory, load_file, path_to_uri, validate_extension};

/// Extension of the files a workspace load picks up.
pub const TURTLE_EXTENSION: &str = "ttl";

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Directory not found: {}", .0.display())]
    DirectoryNotFound(PathBuf),
    #[error("No file extension: {}", .0.display())]
    NoExtension(PathBuf),
    #[error("Unsupported file extension: {0}")]
    UnsupportedExtension(String),
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
