//! # skosttl-base
//!
//! Core library for incremental parsing and semantic analysis of SKOS
//! vocabularies written in Turtle.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! ide       → Outline, hover, goto-def, references, text insertion
//!   ↓
//! project   → Directory loading, configuration, load/edit cycles
//!   ↓
//! hir       → Resource graph, evaluation, semantic checks
//!   ↓
//! syntax    → Documents, content changes, occurrences, prefix tables
//!   ↓
//! parser    → Turtle grammar regexes, block scanner, scrubbing
//!   ↓
//! base      → Primitives (FileId, LineIndex, Position, vocabulary IRIs)
//! ```

// ============================================================================
// MODULES (dependency order: base → parser → syntax → hir → project → ide)
// ============================================================================

/// Foundation types: FileId, LineIndex, Position/Range, SKOS vocabulary
pub mod base;

/// Parser: Turtle grammar and the block scanner
pub mod parser;

/// Syntax: documents, content changes, occurrences, prefixes
pub mod syntax;

/// High-level IR: resource graph and semantic checks
pub mod hir;

/// Project management: loading, configuration, edit cycles
pub mod project;

/// IDE features: outline, hover, navigation, insertion
pub mod ide;

// Re-export foundation types
pub use base::{FileId, LineIndex, Position, Range, TextRange, TextSize};
