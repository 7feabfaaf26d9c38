//! Database setup through the loading handler, as an editor would drive it.

use skosttl::hir::{Diagnostic, ResourceId, RootDatabase};
use skosttl::project::{CycleReport, LoadingHandler, SourceDocument};
use skosttl::syntax::{ContentChange, DocumentChange};
use tokio_util::sync::CancellationToken;

use super::source_fixtures::URI;

pub fn load(text: &str) -> RootDatabase {
    load_many(&[(URI, text)])
}

pub fn load_many(documents: &[(&str, &str)]) -> RootDatabase {
    let mut db = RootDatabase::new();
    LoadingHandler::new().load_documents(
        &mut db,
        documents
            .iter()
            .map(|(uri, text)| SourceDocument {
                uri: uri.to_string(),
                text: text.to_string(),
            })
            .collect(),
        None,
        &CancellationToken::new(),
    );
    db
}

/// Apply `changes` to the default document in one cycle.
pub fn edit(db: &mut RootDatabase, changes: Vec<ContentChange>) -> CycleReport {
    let mut reports = LoadingHandler::new().submit_changes(
        db,
        vec![DocumentChange::new(URI, changes)],
        None,
        &CancellationToken::new(),
    );
    assert_eq!(reports.len(), 1, "expected exactly one cycle");
    reports.remove(0)
}

/// Replace the first occurrence of `needle` in the current text.
pub fn replace(db: &mut RootDatabase, needle: &str, with: &str) -> CycleReport {
    let file = db.documents.file_id(URI).expect("document loaded");
    let start = db
        .documents
        .text(file)
        .find(needle)
        .unwrap_or_else(|| panic!("'{needle}' not in document"));
    edit(
        db,
        vec![ContentChange::new(start as u32, needle.len() as u32, with)],
    )
}

pub fn id(db: &RootDatabase, local: &str) -> ResourceId {
    db.graph
        .lookup(&format!("<http://e/{local}>"))
        .unwrap_or_else(|| panic!("no resource {local}"))
}

pub fn with_code<'a>(db: &'a RootDatabase, code: &str) -> Vec<&'a Diagnostic> {
    db.diagnostics
        .all()
        .iter()
        .filter(|d| d.code.as_deref() == Some(code))
        .collect()
}
