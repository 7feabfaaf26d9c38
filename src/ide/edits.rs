//! Text insertion: new concepts and scheme memberships.

use text_size::TextSize;

use crate::base::vocab::{BROADER, CONCEPT, IN_SCHEME, PREF_LABEL};
use crate::base::{FileId, Position};
use crate::hir::{ResourceId, RootDatabase, SubjectType};
use crate::syntax::ContentChange;

/// Where text goes relative to a resource's first block.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InsertMode {
    /// Inside the block, before its terminating `.`.
    Append,
    /// After the block, separated by a blank line.
    After,
}

/// An insertion into one document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextEdit {
    pub file: FileId,
    pub offset: TextSize,
    pub position: Position,
    pub text: String,
}

impl TextEdit {
    pub fn to_change(&self) -> ContentChange {
        ContentChange::insert(self.offset.into(), self.text.clone())
    }
}

/// Statements for a fresh concept below `parent`, in absolute IRIs.
pub fn new_concept_snippet(parent: &str, suffix: u64) -> String {
    format!(
        ":NEWCONCEPT{suffix} a {CONCEPT} ;\n\t{BROADER} {parent} ;\n\t{PREF_LABEL} \"New Concept\"@en ;\n."
    )
}

pub fn in_scheme_snippet(scheme: &str) -> String {
    format!("\t{IN_SCHEME} {scheme} ;")
}

/// Insert `text` at the first block of every resource in `resources`.
///
/// Prefixes of the target document are applied to `text`. Edits come
/// ordered from the last document and offset backwards, so applying them in
/// order keeps the remaining offsets valid.
pub fn insert_text(
    db: &RootDatabase,
    resources: &[ResourceId],
    text: &str,
    mode: InsertMode,
) -> Vec<TextEdit> {
    let mut edits = Vec::new();
    for &id in resources {
        let Some(resource) = db.graph.get(id) else {
            continue;
        };
        let Some(first) = resource.occurrences.first() else {
            tracing::warn!(resource = %resource.id, "resource occurs nowhere, nothing inserted");
            continue;
        };
        let file = first.occurrence.file;
        let Some(document) = db.documents.get(file) else {
            continue;
        };
        let source = document.text();
        let block = first.occurrence.text(source);
        let body = db.prefixes.apply_prefixes_on_text(file, text);

        let (offset, text) = match mode {
            InsertMode::Append => {
                let end = first.occurrence.range.end();
                let inner = block.strip_suffix('.').unwrap_or(block);
                let offset = end - TextSize::of(&block[inner.len()..]);
                let separator = if inner.trim_end().ends_with(';') {
                    ""
                } else {
                    " ;\n"
                };
                (offset, format!("{separator}{body}\n"))
            }
            InsertMode::After => (first.occurrence.range.end(), format!("\n\n{body}")),
        };
        edits.push(TextEdit {
            file,
            offset,
            position: document.position_at(offset),
            text,
        });
    }
    edits.sort_by(|a, b| (b.file, b.offset).cmp(&(a.file, a.offset)));
    edits
}

/// A new concept inserted after the block of `parent`.
pub fn add_concept(db: &RootDatabase, parent: ResourceId, suffix: u64) -> Vec<TextEdit> {
    let Some(resource) = db.graph.get(parent) else {
        return Vec::new();
    };
    let snippet = new_concept_snippet(&resource.id, suffix);
    insert_text(db, &[parent], &snippet, InsertMode::After)
}

fn in_scheme(db: &RootDatabase, id: ResourceId, scheme: &str) -> bool {
    db.graph.get(id).is_some_and(|r| {
        r.primary_type() == SubjectType::ConceptScheme
            || r.statements_of(IN_SCHEME).any(|s| s.object.resolved == scheme)
    })
}

/// Add `skos:inScheme scheme` to `id`; schemes themselves are skipped.
pub fn append_to_scheme(db: &RootDatabase, id: ResourceId, scheme: &str) -> Vec<TextEdit> {
    if in_scheme(db, id, scheme) {
        return Vec::new();
    }
    insert_text(db, &[id], &in_scheme_snippet(scheme), InsertMode::Append)
}

/// Add `skos:inScheme scheme` to `id` and every descendant not yet in it.
pub fn append_subtree_to_scheme(db: &RootDatabase, id: ResourceId, scheme: &str) -> Vec<TextEdit> {
    let members: Vec<ResourceId> = db
        .graph
        .subtree(id)
        .into_iter()
        .filter(|&member| !in_scheme(db, member, scheme))
        .collect();
    insert_text(db, &members, &in_scheme_snippet(scheme), InsertMode::Append)
}
