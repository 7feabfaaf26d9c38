use skosttl::hir::PredicateKind;
use skosttl::ide::{AnalysisHost, TextEdit};
use skosttl::project::SourceDocument;
use skosttl::syntax::DocumentChange;
use tokio_util::sync::CancellationToken;

use crate::helpers::source_fixtures::{SCHEME, URI};

fn host() -> AnalysisHost {
    let mut host = AnalysisHost::new();
    host.load_documents(
        vec![SourceDocument {
            uri: URI.to_string(),
            text: SCHEME.to_string(),
        }],
        None,
        &CancellationToken::new(),
    );
    host
}

fn apply(host: &mut AnalysisHost, edits: &[TextEdit]) {
    let changes = edits.iter().map(TextEdit::to_change).collect();
    let reports = host.apply_changes(
        vec![DocumentChange::new(URI, changes)],
        None,
        &CancellationToken::new(),
    );
    assert_eq!(reports.len(), 1);
}

#[test]
fn test_add_concept_lands_below_parent() {
    let mut host = host();
    let animal = host.analysis().db().graph.lookup("<http://e/Animal>").unwrap();
    let edits = host.analysis().add_concept(animal);
    assert_eq!(edits.len(), 1);
    apply(&mut host, &edits);

    let analysis = host.analysis();
    let graph = &analysis.db().graph;
    let (created, _) = graph
        .iter()
        .find(|(_, r)| r.id.starts_with("<http://e/NEWCONCEPT"))
        .unwrap();
    assert_eq!(graph.parents(created), vec![animal]);
    assert!(analysis.diagnostics(URI).unwrap().is_empty());
}

#[test]
fn test_append_subtree_to_scheme() {
    let mut host = host();
    let animal = host.analysis().db().graph.lookup("<http://e/Animal>").unwrap();
    let edits = host.analysis().append_subtree_to_scheme(animal, "<http://e/S>");
    // Animal already is a member; Bird and Fish are not.
    assert_eq!(edits.len(), 2);
    apply(&mut host, &edits);

    let analysis = host.analysis();
    for name in ["<http://e/Bird>", "<http://e/Fish>"] {
        let resource = analysis.db().graph.resource(name).unwrap();
        assert!(
            resource
                .references
                .iter()
                .any(|r| r.kind == PredicateKind::InScheme),
            "{name} not in scheme"
        );
    }
    assert!(analysis.diagnostics(URI).unwrap().is_empty());
    assert!(
        analysis
            .append_subtree_to_scheme(animal, "<http://e/S>")
            .is_empty()
    );
}
