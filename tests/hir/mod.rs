//! HIR layer tests
//!
//! Tests for the resource graph and its checks:
//! - Reference bookkeeping and garbage collection
//! - Semantic diagnostics
//! - Incremental re-parsing against a fresh parse

pub mod tests_diagnostics;
pub mod tests_graph;
pub mod tests_incremental;
