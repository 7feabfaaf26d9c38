//! Cursor lookups: resources under a selection, definitions and references.

use text_size::{TextRange, TextSize};

use crate::base::{FileId, Range};
use crate::hir::{Direction, ResourceId, RootDatabase};
use crate::parser::grammar::IRI_RE;
use crate::syntax::Occurrence;

/// A location to jump to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NavigationTarget {
    pub file: FileId,
    pub range: TextRange,
    pub location: Range,
}

impl NavigationTarget {
    fn from_occurrence(db: &RootDatabase, occurrence: Occurrence) -> Option<Self> {
        let document = db.documents.get(occurrence.file)?;
        Some(Self {
            file: occurrence.file,
            range: occurrence.range,
            location: occurrence.location(document),
        })
    }
}

/// The IRI token (absolute or prefixed) touching `offset`.
pub fn iri_at(text: &str, offset: TextSize) -> Option<TextRange> {
    let offset = usize::from(offset);
    IRI_RE
        .find_iter(text)
        .take_while(|m| m.start() <= offset)
        .find(|m| offset <= m.end())
        .map(|m| TextRange::new((m.start() as u32).into(), (m.end() as u32).into()))
}

/// The resource named by the token under `offset`.
pub fn resource_at(db: &RootDatabase, file: FileId, offset: TextSize) -> Option<ResourceId> {
    let text = db.documents.text(file);
    let token = Occurrence::new(file, iri_at(text, offset)?);
    db.graph.lookup(&token.prefix_resolved_text(text, &db.prefixes))
}

/// Resources with a block touching the line/character `range` of `file`.
pub fn intersection_resources(db: &RootDatabase, file: FileId, range: Range) -> Vec<ResourceId> {
    let Some(document) = db.documents.get(file) else {
        return Vec::new();
    };
    let start = document.offset_at(range.start);
    let end = document.offset_at(range.end).max(start);
    db.graph.intersection_resources(file, TextRange::new(start, end))
}

/// Every block declaring the resource under `offset`.
pub fn goto_definition(db: &RootDatabase, file: FileId, offset: TextSize) -> Vec<NavigationTarget> {
    let Some(resource) = resource_at(db, file, offset).and_then(|id| db.graph.get(id)) else {
        return Vec::new();
    };
    let targets = resource
        .occurrences
        .iter()
        .filter_map(|o| NavigationTarget::from_occurrence(db, o.occurrence))
        .collect();
    sort_targets(targets)
}

/// Object tokens elsewhere that point at the resource under `offset`.
pub fn find_references(db: &RootDatabase, file: FileId, offset: TextSize) -> Vec<NavigationTarget> {
    let Some(resource) = resource_at(db, file, offset).and_then(|id| db.graph.get(id)) else {
        return Vec::new();
    };
    let targets = resource
        .references
        .iter()
        .filter(|r| r.direction == Direction::External)
        .filter_map(|r| NavigationTarget::from_occurrence(db, r.occurrence))
        .collect();
    sort_targets(targets)
}

/// Blocks of the resources that point at the resource under `offset`.
pub fn find_implementations(
    db: &RootDatabase,
    file: FileId,
    offset: TextSize,
) -> Vec<NavigationTarget> {
    let Some(resource) = resource_at(db, file, offset).and_then(|id| db.graph.get(id)) else {
        return Vec::new();
    };
    let mut referrers: Vec<ResourceId> = resource
        .references
        .iter()
        .filter(|r| r.direction == Direction::External)
        .map(|r| r.target)
        .collect();
    referrers.sort();
    referrers.dedup();

    let targets = referrers
        .into_iter()
        .filter_map(|id| db.graph.get(id))
        .flat_map(|r| r.occurrences.iter())
        .filter_map(|o| NavigationTarget::from_occurrence(db, o.occurrence))
        .collect();
    sort_targets(targets)
}

/// Order by document, then by offset.
fn sort_targets(mut targets: Vec<NavigationTarget>) -> Vec<NavigationTarget> {
    targets.sort_by_key(|t| (t.file, t.range.start(), t.range.end()));
    targets.dedup();
    targets
}
