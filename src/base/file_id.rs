//! Compact identifiers for tracked documents.

use std::fmt;

/// Identifies a document tracked by the [`DocumentStore`](crate::syntax::DocumentStore).
///
/// Cheap to copy and compare; the store owns the mapping back to the URI.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FileId(u32);

impl FileId {
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "file#{}", self.0)
    }
}
