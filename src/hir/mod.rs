//! High-level IR (HIR): The resource graph and its semantic checks.
//!
//! Scanned Turtle blocks are merged into a [`ResourceGraph`]: one
//! [`Resource`] per resolved subject IRI, holding raw [`Statement`]s and, once
//! evaluated, typed [`Reference`]s to other resources. The graph is updated
//! incrementally as documents change, and [`check_semantics`] re-checks only
//! the resources an edit affected.
//!
//! ## Key Types
//!
//! - [`RootDatabase`]: Documents, prefix tables, graph and diagnostics
//! - [`ResourceGraph`]: Arena of resources keyed by resolved IRI
//! - [`Resource`]: A subject merged across all its blocks
//! - [`Reference`]: One side of a typed edge between two resources
//! - [`DiagnosticStore`]: Published diagnostics, prunable per owner
//!
//! ## Pipeline
//!
//! ```text
//! scan_document(file)          ← pure, parallel per document
//!     │
//!     ▼
//! merge_document               ← blocks → resources, statements
//!     │
//!     ▼
//! evaluate_predicate_objects   ← types, notations, references, icons
//!     │
//!     ▼
//! check_semantics(subset)      ← labels, types, prefixes, duplicates, cycles
//! ```

mod checks;
mod db;
mod diagnostics;
mod evaluate;
mod graph;
mod ingest;
mod options;
mod resource;

/// Name prefix of resources standing for anonymous subjects.
pub const BLANK_PREFIX: &str = "_BLANK_";

pub use checks::{
    DUPLICATE_MESSAGE, INVALID_TYPE_MESSAGE, MISSING_ENGLISH_LABEL_MESSAGE, MISSING_TYPE_MESSAGE,
    RECURSION_MESSAGE, SemanticChecker, check_semantics, collect_diagnostics,
};
pub use db::RootDatabase;
pub use diagnostics::{
    Diagnostic, DiagnosticCollector, DiagnosticStore, RelatedInfo, Severity, codes,
};
pub use graph::{ChangeImpact, ResourceGraph};
pub use ingest::{ParseOutcome, ScannedDocument, merge_document, parse_text_document, scan_document};
pub use options::{EvaluationOptions, HierarchyPredicates, IconPattern, IconRule, IconTarget};
pub use resource::{
    BlockId, BlockOccurrence, Direction, Hierarchy, PredicateKind, Reference, Resource,
    ResourceId, Statement, StatementId, SubjectType, Term, TypeDecl,
};
