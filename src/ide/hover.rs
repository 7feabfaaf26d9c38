//! Hover information implementation.

use text_size::TextSize;

use super::navigation::{iri_at, resource_at};
use crate::base::{FileId, Range};
use crate::hir::{ResourceId, RootDatabase};

/// Result of a hover request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HoverResult {
    /// Markdown: the label, then every path from a root down to the resource.
    pub contents: String,
    pub resource: ResourceId,
    /// The hovered token.
    pub range: Range,
}

/// Describe the resource named by the token under `offset`.
pub fn hover(db: &RootDatabase, file: FileId, offset: TextSize) -> Option<HoverResult> {
    let document = db.documents.get(file)?;
    let token = iri_at(document.text(), offset)?;
    let id = resource_at(db, file, offset)?;
    let contents = match db.graph.get(id)?.description.clone() {
        Some(description) => description,
        None => db.graph.describe(id),
    };
    Some(HoverResult {
        contents,
        resource: id,
        range: document.range_of(token),
    })
}
