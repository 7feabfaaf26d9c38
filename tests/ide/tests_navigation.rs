use rstest::rstest;
use skosttl::base::{Position, Range};
use skosttl::ide::{Analysis, AnalysisError, AnalysisHost};
use skosttl::project::SourceDocument;
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

/// Position of the `nth` occurrence of `needle` in the fixture.
fn position_of(needle: &str, nth: usize) -> Position {
    let offset = SCHEME.match_indices(needle).nth(nth).unwrap().0;
    let line = SCHEME[..offset].matches('\n').count() as u32;
    let line_start = SCHEME[..offset].rfind('\n').map_or(0, |i| i + 1);
    Position::new(line, (offset - line_start) as u32 + 1)
}

fn lines(targets: &[skosttl::ide::NavigationTarget]) -> Vec<u32> {
    targets.iter().map(|t| t.location.start.line).collect()
}

fn names(analysis: &Analysis<'_>, ids: &[skosttl::hir::ResourceId]) -> Vec<String> {
    let mut names: Vec<String> = ids
        .iter()
        .map(|&id| analysis.db().graph.get(id).unwrap().id.to_string())
        .collect();
    names.sort();
    names
}

// ============================================================================
// DEFINITIONS & REFERENCES
// ============================================================================

#[rstest]
#[case::from_object(":Animal", 0, vec![3])]
#[case::from_subject(":Animal", 1, vec![3])]
#[case::prefixed_predicate_has_no_block("skos:broader", 0, vec![])]
fn test_goto_definition(#[case] needle: &str, #[case] nth: usize, #[case] expected: Vec<u32>) {
    let host = host();
    let targets = host
        .analysis()
        .goto_definition(URI, position_of(needle, nth))
        .unwrap();
    assert_eq!(lines(&targets), expected);
}

#[test]
fn test_find_references_lists_every_pointer() {
    let host = host();
    let targets = host
        .analysis()
        .find_references(URI, position_of(":Animal a", 0))
        .unwrap();
    assert_eq!(lines(&targets), vec![2, 5, 6]);
    assert!(targets.iter().all(|t| &SCHEME[t.range] == ":Animal"));
}

#[test]
fn test_find_implementations_through_generic_link() {
    let host = host();
    let targets = host
        .analysis()
        .find_implementations(URI, position_of(":Plant a", 0))
        .unwrap();
    assert_eq!(lines(&targets), vec![5]);
}

// ============================================================================
// HOVER & SELECTION
// ============================================================================

#[test]
fn test_hover_lists_root_path() {
    let host = host();
    let hover = host
        .analysis()
        .hover(URI, position_of(":Fish", 0))
        .unwrap()
        .unwrap();
    assert_eq!(hover.contents, "Fish\n---\n- Scheme\n    - Animal\n        - Fish\n");
    assert_eq!(hover.range.start.line, 6);
}

#[test]
fn test_resources_at_selection() {
    let host = host();
    let analysis = host.analysis();
    let ids = analysis
        .resources_at(URI, Range::new(Position::new(4, 0), Position::new(5, 3)))
        .unwrap();
    assert_eq!(names(&analysis, &ids), vec!["<http://e/Bird>", "<http://e/Plant>"]);
}

#[test]
fn test_queries_on_unknown_document() {
    let host = host();
    let analysis = host.analysis();
    assert_eq!(
        analysis.find_references("file:///nope.ttl", Position::new(0, 0)),
        Err(AnalysisError::UnknownDocument("file:///nope.ttl".into()))
    );
}
