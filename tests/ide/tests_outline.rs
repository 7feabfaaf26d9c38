use skosttl::base::{Position, Range};
use skosttl::hir::SubjectType;
use skosttl::ide::{AnalysisHost, OutlineNode};
use skosttl::project::SourceDocument;
use skosttl::syntax::{ContentChange, DocumentChange};
use tokio_util::sync::CancellationToken;

use crate::helpers::source_fixtures::{SCHEME, URI};

fn host(text: &str) -> AnalysisHost {
    let mut host = AnalysisHost::new();
    host.load_documents(
        vec![SourceDocument {
            uri: URI.to_string(),
            text: text.to_string(),
        }],
        None,
        &CancellationToken::new(),
    );
    host
}

fn labels(nodes: &[OutlineNode]) -> Vec<&str> {
    nodes.iter().map(|n| n.label.as_str()).collect()
}

#[test]
fn test_scheme_outline_shape() {
    let host = host(SCHEME);
    let outline = host.analysis().outline();

    assert_eq!(labels(outline), vec!["Scheme"]);
    let scheme = &outline[0];
    assert_eq!(scheme.ty, SubjectType::ConceptScheme);
    assert_eq!(scheme.icon.as_deref(), Some("dependency"));
    assert_eq!(scheme.id, "/<http://e/S>");

    assert_eq!(labels(&scheme.children), vec!["Animal", "Plant"]);
    let animal = &scheme.children[0];
    assert_eq!(animal.id, "<http://e/S>/<http://e/Animal>");
    assert_eq!(labels(&animal.children), vec!["Bird", "Fish"]);

    let fish = &animal.children[1];
    assert!(fish.is_leaf());
    assert_eq!(fish.description, "\"F\"");
    assert_eq!(fish.icon, None);
}

#[test]
fn test_tree_nodes_point_at_outline() {
    let host = host(SCHEME);
    let analysis = host.analysis();
    let bird = analysis.db().graph.resource("<http://e/Bird>").unwrap();
    assert_eq!(
        bird.tree_node.as_deref(),
        Some("<http://e/Animal>/<http://e/Bird>")
    );
}

#[test]
fn test_edit_moves_subtree() {
    let mut host = host(SCHEME);
    let line = SCHEME.lines().position(|l| l.starts_with(":Bird")).unwrap() as u32;
    let column = SCHEME.lines().nth(line as usize).unwrap().find(":Animal").unwrap() as u32;
    let change = {
        let analysis = host.analysis();
        let file = analysis.file_id(URI).unwrap();
        let document = analysis.db().documents.get(file).unwrap();
        ContentChange::from_range(
            document,
            Range::new(Position::new(line, column), Position::new(line, column + 7)),
            ":Plant",
        )
    };
    let reports = host.apply_changes(
        vec![DocumentChange::new(URI, vec![change])],
        None,
        &CancellationToken::new(),
    );
    assert_eq!(reports.len(), 1);

    let outline = host.analysis().outline();
    let scheme = &outline[0];
    assert_eq!(labels(&scheme.children[0].children), vec!["Fish"]);
    assert_eq!(labels(&scheme.children[1].children), vec!["Bird"]);
}

#[test]
fn test_untyped_roots_sort_last() {
    let host = host(
        "@prefix : <http://e/> .\n\
@prefix skos: <http://www.w3.org/2004/02/skos/core#> .\n\
:Z a skos:Concept ; skos:prefLabel \"Zebra\"@en .\n\
:X :p :Y .\n\
:C a skos:Collection ; skos:prefLabel \"Group\"@en .\n",
    );
    let outline = host.analysis().outline();
    let order: Vec<SubjectType> = outline.iter().map(|n| n.ty).collect();
    assert_eq!(
        order,
        vec![
            SubjectType::Collection,
            SubjectType::Concept,
            SubjectType::Unclassified
        ]
    );
    assert_eq!(outline[0].icon.as_deref(), Some("folder"));
}
