//! Parser: Regex-driven Turtle scanning.
//!
//! Turtle is located and decomposed with composed regular expressions rather
//! than a recursive-descent parser. Scanning is pure: it works on a text and
//! byte ranges and never touches the resource graph, so several documents can
//! be scanned in parallel before their results are merged.
//!
//! ## Layers
//!
//! ```text
//! grammar   → Turtle token patterns and their compiled regexes
//!   ↓
//! scrub     → comment/directive removal with offset recovery
//!   ↓
//! scan      → blocks → subject → predicate-object lists → objects
//! ```

mod error;
pub mod grammar;
mod scan;
mod scrub;

pub use error::ParseError;
pub use scan::{
    ObjectKind, ScannedBlock, ScannedObject, ScannedStatement, ScannedSubject, ScannedToken,
    SpanMatch, full_range, match_spans, prefix_declarations, scan_ranges,
};
pub use scrub::{RemovedKind, RemovedSpan, ScrubbedText};

/// A `short → long` prefix declaration found in a document.
///
/// `short` keeps its trailing `:`, `long` keeps its angle brackets.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PrefixDecl {
    pub short: smol_str::SmolStr,
    pub long: smol_str::SmolStr,
}
