use std::fs;
use std::sync::Mutex;

use skosttl::hir::codes;
use skosttl::ide::AnalysisHost;
use skosttl::project::file_loader::path_to_uri;
use skosttl::project::{Config, LoadError, SourceDocument};
use skosttl::syntax::{ContentChange, DocumentChange};
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

use crate::helpers::source_fixtures::{PREFIXES, URI, with_prefixes};

fn vocabulary_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("animals.ttl"),
        with_prefixes(":Animal a skos:Concept ; skos:prefLabel \"Animal\"@en .\n"),
    )
    .unwrap();
    fs::create_dir(dir.path().join("birds")).unwrap();
    fs::write(
        dir.path().join("birds").join("birds.ttl"),
        with_prefixes(":Bird a skos:Concept ; skos:prefLabel \"Bird\"@en ; skos:broader :Animal .\n"),
    )
    .unwrap();
    fs::write(dir.path().join("notes.txt"), "not turtle").unwrap();
    dir
}

// ============================================================================
// DIRECTORY LOADING
// ============================================================================

#[test]
fn test_load_directory_links_across_files() {
    let dir = vocabulary_dir();
    let mut host = AnalysisHost::new();
    let report = host
        .load_directory(dir.path(), None, &CancellationToken::new())
        .unwrap();
    assert_eq!(report.parsed_documents, 2);

    let analysis = host.analysis();
    let graph = &analysis.db().graph;
    let bird = graph.lookup("<http://e/Bird>").unwrap();
    let animal = graph.lookup("<http://e/Animal>").unwrap();
    assert_eq!(graph.parents(bird), vec![animal]);

    let birds_uri = path_to_uri(&dir.path().join("birds").join("birds.ttl"));
    assert!(analysis.file_id(&birds_uri).is_ok());
    assert!(analysis.diagnostics(&birds_uri).unwrap().is_empty());
}

#[test]
fn test_load_missing_directory() {
    let dir = TempDir::new().unwrap();
    let mut host = AnalysisHost::new();
    let result = host.load_directory(&dir.path().join("gone"), None, &CancellationToken::new());
    assert!(matches!(result, Err(LoadError::DirectoryNotFound(_))));
}

#[test]
fn test_progress_reaches_completion() {
    let dir = vocabulary_dir();
    let seen = Mutex::new(Vec::new());
    let sink = |pct: u32, message: &str| seen.lock().unwrap().push((pct, message.to_string()));
    let mut host = AnalysisHost::new();
    host.load_directory(dir.path(), Some(&sink), &CancellationToken::new())
        .unwrap();

    let seen = seen.into_inner().unwrap();
    assert_eq!(seen.last().map(|(pct, _)| *pct), Some(100));
    assert!(seen.windows(2).all(|w| w[0].0 < w[1].0));
}

// ============================================================================
// CONFIGURATION
// ============================================================================

#[test]
fn test_custom_broader_predicate_builds_hierarchy() {
    let config = Config::from_json_str(
        r#"{ "customHierarchicalReferencePredicatesBroader": ["http://e/partOf"] }"#,
    )
    .unwrap();
    let mut host = AnalysisHost::with_config(config);
    host.load_documents(
        vec![SourceDocument {
            uri: URI.to_string(),
            text: with_prefixes(
                ":Car a skos:Concept ; skos:prefLabel \"Car\"@en .\n\
:Wheel a skos:Concept ; skos:prefLabel \"Wheel\"@en ; :partOf :Car .\n",
            ),
        }],
        None,
        &CancellationToken::new(),
    );
    let analysis = host.analysis();
    assert_eq!(analysis.outline().len(), 1);
    assert_eq!(analysis.outline()[0].label, "Car");
    assert_eq!(analysis.outline()[0].children[0].label, "Wheel");
}

#[test]
fn test_custom_icon_reaches_outline() {
    let config = Config::from_json_str(
        r#"{ "customIcons": [ { "rule": { "object": "<http://e/Special>" }, "icon": "star" } ] }"#,
    )
    .unwrap();
    let mut host = AnalysisHost::with_config(config);
    host.load_documents(
        vec![SourceDocument {
            uri: URI.to_string(),
            text: with_prefixes(
                ":A a skos:Concept ; skos:prefLabel \"A\"@en ; :kind :Special .\n",
            ),
        }],
        None,
        &CancellationToken::new(),
    );
    assert_eq!(host.analysis().outline()[0].icon.as_deref(), Some("star"));
}

// ============================================================================
// EDIT BATCHES
// ============================================================================

#[test]
fn test_queued_batch_runs_after_current_cycle() {
    let mut host = AnalysisHost::new();
    host.load_documents(
        vec![SourceDocument {
            uri: URI.to_string(),
            text: format!("{PREFIXES}:A a skos:Concept ; skos:prefLabel \"A\"@en .\n"),
        }],
        None,
        &CancellationToken::new(),
    );
    let queue = host.queue();
    assert!(queue.push(Vec::new()));
    let end = host.analysis().db().documents.text(host.analysis().file_id(URI).unwrap()).len();

    // the cycle is owned elsewhere, so this only queues
    let reports = host.apply_changes(
        vec![DocumentChange::new(
            URI,
            vec![ContentChange::insert(end as u32, ":B a skos:Concept .\n")],
        )],
        None,
        &CancellationToken::new(),
    );
    assert!(reports.is_empty());
    assert_eq!(queue.pending_len(), 1);
    assert!(host.analysis().db().graph.lookup("<http://e/B>").is_none());
}

#[test]
fn test_label_warning_after_edit() {
    let mut host = AnalysisHost::new();
    let text = with_prefixes(":A a skos:Concept ; skos:prefLabel \"A\"@en .\n");
    host.load_documents(
        vec![SourceDocument {
            uri: URI.to_string(),
            text: text.clone(),
        }],
        None,
        &CancellationToken::new(),
    );
    let start = text.find("@en").unwrap() as u32;
    host.apply_changes(
        vec![DocumentChange::new(URI, vec![ContentChange::new(start, 3, "@de")])],
        None,
        &CancellationToken::new(),
    );
    let analysis = host.analysis();
    let diagnostics = analysis.diagnostics(URI).unwrap();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].code.as_deref(), Some(codes::MISSING_ENGLISH_LABEL));
}
