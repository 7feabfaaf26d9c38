use thiserror::Error;

/// Internal invariant violations hit while scanning.
///
/// Malformed Turtle is never an error; unmatched text is skipped. These
/// variants signal that a grammar assumption did not hold and abort the
/// current parse call.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("match at offset {offset} has no '{group}' group")]
    MissingGroup { group: &'static str, offset: u32 },
}

impl ParseError {
    pub fn missing_group(group: &'static str, offset: u32) -> Self {
        Self::MissingGroup { group, offset }
    }
}
