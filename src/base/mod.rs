//! Foundation types for the skosttl toolchain.
//!
//! This module provides fundamental types used throughout the crate:
//! - [`FileId`] - Compact document identifiers
//! - [`TextRange`], [`TextSize`] - Source positions (byte offsets)
//! - [`LineIndex`] - Offset to line/character conversion
//! - [`Position`], [`Range`] - Line/character positions for editor features
//! - [`vocab`] - RDF/SKOS IRIs the engine understands
//!
//! This module has NO dependencies on other skosttl modules.

mod file_id;
mod line_index;
mod position;
pub mod vocab;

pub use file_id::FileId;
pub use line_index::LineIndex;
pub use position::{Position, Range};

// Re-export text-size types for convenience
pub use text_size;
pub use text_size::{TextRange, TextSize};
