//! IDE layer tests
//!
//! End-to-end queries through `AnalysisHost`.

pub mod tests_edits;
pub mod tests_navigation;
pub mod tests_outline;
