//! Syntax: Documents, edits, occurrences and prefix tables.
//!
//! Everything here is about *where* text is and how it moves: the document
//! store owns the current text, [`ContentChange`] carries edits and the offset
//! arithmetic that follows them, [`Occurrence`] binds a byte range to a
//! document, and [`PrefixManager`] resolves prefixed names per document.

mod change;
mod document;
mod occurrence;
mod prefix;

pub use change::{ContentChange, DocumentChange, connect_ranges};
pub use document::{Document, DocumentStore};
pub use occurrence::{Occurrence, OccurrenceMatch};
pub use prefix::{PrefixManager, apply_prefix, resolve_prefixed};
