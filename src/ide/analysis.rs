//! AnalysisHost and Analysis: Unified state management for IDE features.
//!
//! The `AnalysisHost` owns the database, the configuration and the outline,
//! and runs load/edit cycles against them. Queries go through an
//! [`Analysis`] snapshot borrowed from the host.
//!
//! ## Usage
//!
//! ```ignore
//! let mut host = AnalysisHost::new();
//! host.load_documents(docs, None, &CancellationToken::new());
//! host.apply_changes(vec![change], None, &CancellationToken::new());
//!
//! let analysis = host.analysis();
//! let hover = analysis.hover("file:///vocab.ttl", position)?;
//! ```

use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use thiserror::Error;
use tokio_util::sync::CancellationToken;

use super::edits::{self, TextEdit};
use super::hover::{self, HoverResult};
use super::navigation::{self, NavigationTarget};
use super::outline::{OutlineNode, build_outline, link_tree_nodes};
use crate::base::{FileId, Position, Range};
use crate::hir::{Diagnostic, ResourceId, RootDatabase};
use crate::project::{
    ChangeQueue, Config, CycleReport, LoadError, LoadingHandler, LoadingHost, ProgressSink,
    SourceDocument, load_directory,
};
use crate::syntax::DocumentChange;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AnalysisError {
    #[error("unknown document: {0}")]
    UnknownDocument(String),
}

/// Owns all mutable state for the IDE layer.
#[derive(Debug, Default)]
pub struct AnalysisHost {
    db: RootDatabase,
    config: Config,
    loading: LoadingHandler,
    outline: Vec<OutlineNode>,
}

impl LoadingHost for AnalysisHost {
    fn db(&mut self) -> &mut RootDatabase {
        &mut self.db
    }

    fn rebuild_tree(&mut self) {
        self.outline = build_outline(&self.db.graph);
        link_tree_nodes(&mut self.db.graph, &self.outline);
    }
}

impl AnalysisHost {
    /// Create a new empty AnalysisHost.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: Config) -> Self {
        let mut host = Self::new();
        host.set_config(config);
        host
    }

    /// Replace the configuration. It takes effect with the next cycle.
    pub fn set_config(&mut self, config: Config) {
        self.db.graph.set_options(config.evaluation_options());
        self.config = config;
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// A handle for submitting edit batches from other threads.
    pub fn queue(&self) -> ChangeQueue {
        self.loading.queue()
    }

    pub fn load_documents(
        &mut self,
        documents: Vec<SourceDocument>,
        sink: Option<&dyn ProgressSink>,
        cancel: &CancellationToken,
    ) -> CycleReport {
        let loading = self.loading.clone();
        loading.load_documents(self, documents, sink, cancel)
    }

    /// Load every Turtle file below `dir`.
    pub fn load_directory(
        &mut self,
        dir: &Path,
        sink: Option<&dyn ProgressSink>,
        cancel: &CancellationToken,
    ) -> Result<CycleReport, LoadError> {
        let documents = load_directory(dir)?;
        Ok(self.load_documents(documents, sink, cancel))
    }

    pub fn apply_changes(
        &mut self,
        batch: Vec<DocumentChange>,
        sink: Option<&dyn ProgressSink>,
        cancel: &CancellationToken,
    ) -> Vec<CycleReport> {
        let loading = self.loading.clone();
        loading.submit_changes(self, batch, sink, cancel)
    }

    /// Get a consistent snapshot for querying.
    pub fn analysis(&self) -> Analysis<'_> {
        Analysis {
            db: &self.db,
            outline: &self.outline,
        }
    }
}

/// An immutable snapshot of the analysis state.
pub struct Analysis<'a> {
    db: &'a RootDatabase,
    outline: &'a [OutlineNode],
}

impl<'a> Analysis<'a> {
    pub fn db(&self) -> &'a RootDatabase {
        self.db
    }

    pub fn outline(&self) -> &'a [OutlineNode] {
        self.outline
    }

    pub fn file_id(&self, uri: &str) -> Result<FileId, AnalysisError> {
        self.db
            .documents
            .file_id(uri)
            .ok_or_else(|| AnalysisError::UnknownDocument(uri.to_string()))
    }

    fn offset(&self, uri: &str, position: Position) -> Result<(FileId, text_size::TextSize), AnalysisError> {
        let file = self.file_id(uri)?;
        let offset = self
            .db
            .documents
            .get(file)
            .map(|doc| doc.offset_at(position))
            .unwrap_or_default();
        Ok((file, offset))
    }

    // ==================== Diagnostics ====================

    pub fn diagnostics(&self, uri: &str) -> Result<Vec<&'a Diagnostic>, AnalysisError> {
        let file = self.file_id(uri)?;
        Ok(self.db.diagnostics.for_file(file))
    }

    // ==================== Navigation ====================

    pub fn hover(&self, uri: &str, position: Position) -> Result<Option<HoverResult>, AnalysisError> {
        let (file, offset) = self.offset(uri, position)?;
        Ok(hover::hover(self.db, file, offset))
    }

    pub fn goto_definition(
        &self,
        uri: &str,
        position: Position,
    ) -> Result<Vec<NavigationTarget>, AnalysisError> {
        let (file, offset) = self.offset(uri, position)?;
        Ok(navigation::goto_definition(self.db, file, offset))
    }

    pub fn find_references(
        &self,
        uri: &str,
        position: Position,
    ) -> Result<Vec<NavigationTarget>, AnalysisError> {
        let (file, offset) = self.offset(uri, position)?;
        Ok(navigation::find_references(self.db, file, offset))
    }

    pub fn find_implementations(
        &self,
        uri: &str,
        position: Position,
    ) -> Result<Vec<NavigationTarget>, AnalysisError> {
        let (file, offset) = self.offset(uri, position)?;
        Ok(navigation::find_implementations(self.db, file, offset))
    }

    /// Resources with a block touching `range`.
    pub fn resources_at(&self, uri: &str, range: Range) -> Result<Vec<ResourceId>, AnalysisError> {
        let file = self.file_id(uri)?;
        Ok(navigation::intersection_resources(self.db, file, range))
    }

    // ==================== Edits ====================

    pub fn add_concept(&self, parent: ResourceId) -> Vec<TextEdit> {
        let suffix = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or_default();
        edits::add_concept(self.db, parent, suffix)
    }

    pub fn append_to_scheme(&self, id: ResourceId, scheme: &str) -> Vec<TextEdit> {
        edits::append_to_scheme(self.db, id, scheme)
    }

    pub fn append_subtree_to_scheme(&self, id: ResourceId, scheme: &str) -> Vec<TextEdit> {
        edits::append_subtree_to_scheme(self.db, id, scheme)
    }
}
