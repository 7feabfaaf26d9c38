//! Diagnostics: Semantic error reporting.
//!
//! Diagnostics are anchored at occurrences, not at fixed positions: offsets
//! follow edits through [`DiagnosticStore::adjust`] and line/character
//! locations are recomputed from the current text with
//! [`DiagnosticStore::refresh_locations`] before publishing.

use std::sync::Arc;

use rustc_hash::FxHashSet;

use super::resource::ResourceId;
use crate::base::{FileId, Range};
use crate::syntax::{ContentChange, DocumentStore, Occurrence};

// ============================================================================
// DIAGNOSTIC TYPES
// ============================================================================

/// Severity level of a diagnostic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Severity {
    Error,
    Warning,
    Info,
    Hint,
}

impl Severity {
    /// Convert to LSP severity number.
    pub fn to_lsp(&self) -> u32 {
        match self {
            Severity::Error => 1,
            Severity::Warning => 2,
            Severity::Info => 3,
            Severity::Hint => 4,
        }
    }
}

/// A diagnostic message anchored at an occurrence.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    /// Resource owning the primary occurrence.
    pub owner: ResourceId,
    pub occurrence: Occurrence,
    /// Line/character range, valid as of the last refresh.
    pub location: Range,
    pub severity: Severity,
    /// Error/warning code (e.g., "E0001").
    pub code: Option<Arc<str>>,
    pub message: Arc<str>,
    pub related: Vec<RelatedInfo>,
}

/// Related information for a diagnostic.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RelatedInfo {
    pub owner: ResourceId,
    pub occurrence: Occurrence,
    pub location: Range,
    pub message: Arc<str>,
}

impl RelatedInfo {
    pub fn new(owner: ResourceId, occurrence: Occurrence, message: impl Into<Arc<str>>) -> Self {
        Self {
            owner,
            occurrence,
            location: Range::default(),
            message: message.into(),
        }
    }
}

impl Diagnostic {
    fn new(
        severity: Severity,
        owner: ResourceId,
        occurrence: Occurrence,
        message: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            owner,
            occurrence,
            location: Range::default(),
            severity,
            code: None,
            message: message.into(),
            related: Vec::new(),
        }
    }

    /// Create a new error diagnostic.
    pub fn error(owner: ResourceId, occurrence: Occurrence, message: impl Into<Arc<str>>) -> Self {
        Self::new(Severity::Error, owner, occurrence, message)
    }

    /// Create a new warning diagnostic.
    pub fn warning(
        owner: ResourceId,
        occurrence: Occurrence,
        message: impl Into<Arc<str>>,
    ) -> Self {
        Self::new(Severity::Warning, owner, occurrence, message)
    }

    pub fn info(owner: ResourceId, occurrence: Occurrence, message: impl Into<Arc<str>>) -> Self {
        Self::new(Severity::Info, owner, occurrence, message)
    }

    /// Set the error code.
    pub fn with_code(mut self, code: impl Into<Arc<str>>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Add related information.
    pub fn with_related(mut self, info: RelatedInfo) -> Self {
        self.related.push(info);
        self
    }

    pub fn file(&self) -> FileId {
        self.occurrence.file
    }

    fn same_as(&self, other: &Diagnostic) -> bool {
        self.occurrence == other.occurrence
            && self.severity == other.severity
            && self.message == other.message
    }
}

// ============================================================================
// DIAGNOSTIC CODES
// ============================================================================

/// Standard diagnostic codes for semantic checks.
///
/// ## Error Code Ranges
///
/// - **E0001-E0099**: Errors
/// - **W0001-W0099**: Warnings
/// - **I0001-I0099**: Information
pub mod codes {
    /// A prefixed name whose prefix is not declared.
    pub const PREFIX_NOT_FOUND: &str = "E0001";
    /// More than one SKOS class declared.
    pub const INVALID_TYPE_COMBINATION: &str = "E0002";
    /// Conflicting `skos:prefLabel`s for one language.
    pub const DUPLICATE_LANGUAGE_LABEL: &str = "E0003";
    /// A cycle of broader/narrower statements.
    pub const HIERARCHICAL_RECURSION: &str = "E0004";

    /// No SKOS class declared.
    pub const MISSING_TYPE: &str = "W0001";
    /// No English `skos:prefLabel`.
    pub const MISSING_ENGLISH_LABEL: &str = "W0002";

    /// The same predicate/object pair stated twice.
    pub const DUPLICATE_STATEMENT: &str = "I0001";
}

// ============================================================================
// DIAGNOSTIC COLLECTOR
// ============================================================================

/// Collects diagnostics during one run of the checks.
#[derive(Clone, Debug, Default)]
pub struct DiagnosticCollector {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticCollector {
    /// Create a new empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a diagnostic.
    pub fn add(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Get all diagnostics.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Get the number of errors.
    pub fn error_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .count()
    }

    /// Get the number of warnings.
    pub fn warning_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
            .count()
    }

    /// Check if there are any errors.
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }

    /// Take all diagnostics, leaving the collector empty.
    pub fn take(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }
}

// ============================================================================
// DIAGNOSTIC STORE
// ============================================================================

/// Published diagnostics of the whole workspace.
///
/// Prunable per owning resource and per document.
#[derive(Clone, Debug, Default)]
pub struct DiagnosticStore {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn all(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Add `diagnostic` unless an identical one is already stored.
    pub fn insert(&mut self, diagnostic: Diagnostic) -> bool {
        if self.diagnostics.iter().any(|d| d.same_as(&diagnostic)) {
            return false;
        }
        self.diagnostics.push(diagnostic);
        true
    }

    pub fn extend(&mut self, diagnostics: impl IntoIterator<Item = Diagnostic>) {
        for diagnostic in diagnostics {
            self.insert(diagnostic);
        }
    }

    /// Drop diagnostics whose primary occurrence belongs to one of `owners`.
    ///
    /// Diagnostics that only mention them in related information stay.
    pub fn remove_owned_by(&mut self, owners: &FxHashSet<ResourceId>) {
        self.diagnostics.retain(|d| !owners.contains(&d.owner));
    }

    /// Drop diagnostics whose owner no longer passes `alive`.
    pub fn retain_owners(&mut self, alive: impl Fn(ResourceId) -> bool) {
        self.diagnostics.retain(|d| alive(d.owner));
    }

    pub fn remove_file(&mut self, file: FileId) {
        self.diagnostics.retain(|d| d.file() != file);
    }

    /// Owners linked to `owners` through related information, in either
    /// direction.
    pub fn cross_linked_owners(&self, owners: &FxHashSet<ResourceId>) -> FxHashSet<ResourceId> {
        let mut linked = FxHashSet::default();
        for d in &self.diagnostics {
            let related_owners = d.related.iter().map(|r| r.owner);
            if owners.contains(&d.owner) {
                linked.extend(related_owners);
            } else if d.related.iter().any(|r| owners.contains(&r.owner)) {
                linked.insert(d.owner);
            }
        }
        linked
    }

    pub fn for_file(&self, file: FileId) -> Vec<&Diagnostic> {
        self.diagnostics.iter().filter(|d| d.file() == file).collect()
    }

    /// Files that currently carry diagnostics.
    pub fn files(&self) -> Vec<FileId> {
        let mut files: Vec<FileId> = self.diagnostics.iter().map(Diagnostic::file).collect();
        files.sort();
        files.dedup();
        files
    }

    /// Shift every anchor in `file` through `change`.
    pub fn adjust(&mut self, file: FileId, change: &ContentChange) {
        for d in &mut self.diagnostics {
            d.occurrence.adjust(file, change);
            for r in &mut d.related {
                r.occurrence.adjust(file, change);
            }
        }
    }

    /// Recompute line/character locations from the current texts.
    pub fn refresh_locations(&mut self, documents: &DocumentStore) {
        for d in &mut self.diagnostics {
            if let Some(doc) = documents.get(d.occurrence.file) {
                d.location = d.occurrence.location(doc);
            }
            for r in &mut d.related {
                if let Some(doc) = documents.get(r.occurrence.file) {
                    r.location = r.occurrence.location(doc);
                }
            }
        }
    }
}
