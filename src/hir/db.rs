//! The root database: all mutable state of one workspace.

use text_size::TextRange;

use super::diagnostics::DiagnosticStore;
use super::graph::ResourceGraph;
use super::ingest::{ParseOutcome, parse_text_document};
use super::options::EvaluationOptions;
use crate::base::FileId;
use crate::parser::ParseError;
use crate::syntax::{DocumentStore, PrefixManager};

/// Documents, prefix tables, the resource graph and published diagnostics.
///
/// There is one per workspace; every cycle borrows it mutably, so no two
/// cycles ever interleave.
#[derive(Clone, Debug, Default)]
pub struct RootDatabase {
    pub documents: DocumentStore,
    pub prefixes: PrefixManager,
    pub graph: ResourceGraph,
    pub diagnostics: DiagnosticStore,
}

impl RootDatabase {
    /// Create a new, empty database.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: EvaluationOptions) -> Self {
        Self {
            graph: ResourceGraph::with_options(options),
            ..Self::default()
        }
    }

    /// Parse `ranges` of a tracked document, or all of it.
    pub fn parse_document(
        &mut self,
        file: FileId,
        ranges: Option<&[TextRange]>,
        progress: impl FnMut(f32),
    ) -> Result<ParseOutcome, ParseError> {
        let source = self.documents.text(file);
        parse_text_document(
            &mut self.graph,
            &mut self.prefixes,
            file,
            source,
            ranges,
            progress,
        )
    }
}
