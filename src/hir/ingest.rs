//! Merging scanned Turtle into the resource graph.
//!
//! Parsing a document is split in two: [`scan_document`] is pure and can run
//! for several documents in parallel, [`merge_document`] folds one scan into
//! the graph and must run on the thread owning it.

use rustc_hash::FxHashSet;
use text_size::TextRange;

use super::graph::ResourceGraph;
use super::resource::{BlockOccurrence, ResourceId, Statement, Term};
use crate::base::FileId;
use crate::parser::{
    ObjectKind, ParseError, PrefixDecl, ScannedBlock, ScannedSubject, ScannedToken, full_range,
    prefix_declarations, scan_ranges,
};
use crate::syntax::{Occurrence, PrefixManager};

/// Scan result of one document, not yet merged.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScannedDocument {
    pub file: FileId,
    pub prefixes: Vec<PrefixDecl>,
    /// The whole document was scanned, so its old blocks must go.
    pub full: bool,
    pub blocks: Vec<ScannedBlock>,
}

/// What merging a scan did to the graph.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ParseOutcome {
    /// Resources that gained or lost blocks, each once.
    pub touched: Vec<ResourceId>,
    /// The prefix table changed, or no ranges were given.
    pub full_reparse: bool,
}

/// Scan `ranges` of `source`, or all of it.
///
/// A prefix table that differs from `previous` (or no previous table at all)
/// discards `ranges` and scans the whole document.
pub fn scan_document(
    file: FileId,
    source: &str,
    ranges: Option<&[TextRange]>,
    previous: Option<&[PrefixDecl]>,
    progress: impl FnMut(f32),
) -> Result<ScannedDocument, ParseError> {
    let prefixes = prefix_declarations(source);
    let prefixes_changed = previous.is_none_or(|p| p != prefixes.as_slice());
    let whole = [full_range(source)];
    let (full, ranges) = match ranges {
        Some(ranges) if !prefixes_changed => (false, ranges),
        _ => (true, &whole[..]),
    };
    if full && prefixes_changed && previous.is_some() {
        tracing::debug!(%file, "prefix table changed, reparsing whole document");
    }
    let blocks = scan_ranges(source, ranges, progress)?;
    Ok(ScannedDocument {
        file,
        prefixes,
        full,
        blocks,
    })
}

/// Fold a scanned document into `graph`.
pub fn merge_document(
    graph: &mut ResourceGraph,
    prefixes: &mut PrefixManager,
    scanned: ScannedDocument,
) -> ParseOutcome {
    let file = scanned.file;
    prefixes.set_prefixes(file, scanned.prefixes);

    let mut touched = Vec::new();
    let mut seen = FxHashSet::default();
    if scanned.full {
        for id in graph.remove_file_blocks(file) {
            if seen.insert(id) {
                touched.push(id);
            }
        }
    }

    for block in scanned.blocks {
        let id = merge_block(graph, prefixes, file, block);
        if seen.insert(id) {
            touched.push(id);
        }
    }

    ParseOutcome {
        touched,
        full_reparse: scanned.full,
    }
}

/// Scan and merge in one go.
pub fn parse_text_document(
    graph: &mut ResourceGraph,
    prefixes: &mut PrefixManager,
    file: FileId,
    source: &str,
    ranges: Option<&[TextRange]>,
    progress: impl FnMut(f32),
) -> Result<ParseOutcome, ParseError> {
    let scanned = scan_document(file, source, ranges, prefixes.table(file), progress)?;
    Ok(merge_document(graph, prefixes, scanned))
}

fn term(prefixes: &PrefixManager, file: FileId, token: &ScannedToken, literal: bool) -> Term {
    let resolved = if literal {
        token.text.clone()
    } else {
        prefixes
            .resolve(file, &token.text)
            .unwrap_or_else(|| token.text.clone())
    };
    Term {
        occurrence: Occurrence::new(file, token.range),
        raw: token.text.clone(),
        resolved,
    }
}

fn merge_block(
    graph: &mut ResourceGraph,
    prefixes: &PrefixManager,
    file: FileId,
    block: ScannedBlock,
) -> ResourceId {
    let name = match &block.subject {
        ScannedSubject::Anonymous => graph.next_blank_name(),
        ScannedSubject::Named(token) => term(prefixes, file, token, false).resolved,
    };
    let id = graph.get_or_create(&name);
    let block_id = graph.next_block_id();

    let mut statements = Vec::with_capacity(block.statements.len());
    for s in &block.statements {
        let literal = s.object.kind == ObjectKind::Literal;
        statements.push(Statement {
            id: graph.next_statement_id(),
            block: block_id,
            occurrence: Occurrence::new(file, s.range),
            predicate: term(prefixes, file, &s.predicate, false),
            object: term(prefixes, file, &s.object.token, literal),
            object_kind: s.object.kind,
            literal: s.object.literal.clone(),
            lang: s.object.lang.clone(),
            datatype: s.object.datatype.clone(),
        });
    }

    if let Some(resource) = graph.get_mut(id) {
        resource.occurrences.push(BlockOccurrence {
            block: block_id,
            occurrence: Occurrence::new(file, block.range),
        });
        if let ScannedSubject::Named(token) = &block.subject {
            resource.id_occurrences.push(BlockOccurrence {
                block: block_id,
                occurrence: Occurrence::new(file, token.range),
            });
        }
        resource.statements.extend(statements);
    }
    id
}
