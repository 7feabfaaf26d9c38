//! Semantic diagnostics produced by a full load and by edits.

use rstest::rstest;
use skosttl::hir::{MISSING_TYPE_MESSAGE, RECURSION_MESSAGE, Severity, codes};

use crate::helpers::db_helpers::{id, load, replace, with_code};
use crate::helpers::source_fixtures::{
    DUPLICATE_LABEL, MISSING_TYPE, RECURSION, SCHEME, UNKNOWN_PREFIX, with_prefixes,
};

// ============================================================================
// CODE COUNTS
// ============================================================================

#[rstest]
#[case::missing_type(MISSING_TYPE, codes::MISSING_TYPE, 1, 0)]
#[case::duplicate_label(DUPLICATE_LABEL, codes::DUPLICATE_LANGUAGE_LABEL, 2, 1)]
#[case::unknown_prefix(UNKNOWN_PREFIX, codes::PREFIX_NOT_FOUND, 1, 0)]
#[case::recursion(RECURSION, codes::HIERARCHICAL_RECURSION, 3, 2)]
fn test_diagnostic_counts(
    #[case] source: &str,
    #[case] code: &str,
    #[case] count: usize,
    #[case] related: usize,
) {
    let db = load(source);
    let found = with_code(&db, code);
    assert_eq!(found.len(), count, "{:?}", db.diagnostics.all());
    assert!(found.iter().all(|d| d.related.len() == related));
}

#[test]
fn test_clean_scheme_has_no_diagnostics() {
    let db = load(SCHEME);
    assert!(db.diagnostics.is_empty(), "{:?}", db.diagnostics.all());
}

// ============================================================================
// SCENARIOS
// ============================================================================

#[test]
fn test_missing_type_anchored_at_block() {
    let db = load(MISSING_TYPE);
    assert_eq!(db.diagnostics.len(), 1);
    let diag = &db.diagnostics.all()[0];
    assert_eq!(diag.severity, Severity::Warning);
    assert_eq!(&*diag.message, MISSING_TYPE_MESSAGE);
    assert_eq!(diag.owner, id(&db, "A"));
    assert_eq!(diag.location.start.line, 2);
    assert_eq!(diag.location.start.character, 0);
}

#[test]
fn test_unknown_prefix_message() {
    let db = load(UNKNOWN_PREFIX);
    assert_eq!(db.diagnostics.len(), 1);
    let diag = &db.diagnostics.all()[0];
    assert_eq!(diag.severity, Severity::Error);
    assert_eq!(&*diag.message, "Prefix not found for 'unknownPrefix:X'.");
    assert_eq!(diag.owner, db.graph.lookup("unknownPrefix:X").unwrap());
    assert_eq!(diag.location.start.line, 1);
    assert_eq!(diag.location.end.character, 15);
}

#[test]
fn test_recursion_edges_are_reported() {
    let db = load(RECURSION);
    let cycle = with_code(&db, codes::HIERARCHICAL_RECURSION);
    assert!(cycle.iter().all(|d| &*d.message == RECURSION_MESSAGE));
    let mut owners: Vec<_> = cycle.iter().map(|d| d.owner).collect();
    owners.sort();
    let mut expected = vec![id(&db, "A"), id(&db, "B"), id(&db, "C")];
    expected.sort();
    assert_eq!(owners, expected);
}

#[test]
fn test_duplicate_statement_is_info() {
    let db = load(&with_prefixes(
        ":A a skos:Concept ; skos:prefLabel \"A\"@en ; skos:broader :B , :B .\n",
    ));
    let found = with_code(&db, codes::DUPLICATE_STATEMENT);
    assert_eq!(found.len(), 2);
    assert!(found.iter().all(|d| d.severity == Severity::Info));
    assert!(found.iter().all(|d| d.related.len() == 1));
    assert_eq!(db.diagnostics.len(), 2);
}

#[test]
fn test_language_tags_compare_case_insensitively() {
    let db = load(&with_prefixes(
        ":A a skos:Concept ; skos:prefLabel \"A\"@en ; skos:prefLabel \"B\"@EN .\n",
    ));
    assert_eq!(with_code(&db, codes::DUPLICATE_LANGUAGE_LABEL).len(), 2);
}

#[test]
fn test_plain_rdf_resource_is_not_checked() {
    let db = load(&with_prefixes(":X :p :Y .\n"));
    assert!(db.diagnostics.is_empty());
}

// ============================================================================
// EDITS
// ============================================================================

#[test]
fn test_breaking_cycle_clears_every_member() {
    let mut db = load(RECURSION);
    assert_eq!(with_code(&db, codes::HIERARCHICAL_RECURSION).len(), 3);

    replace(&mut db, "skos:broader :A", "skos:related :A");
    assert!(with_code(&db, codes::HIERARCHICAL_RECURSION).is_empty());
    assert!(db.diagnostics.is_empty(), "{:?}", db.diagnostics.all());
}

#[test]
fn test_fixing_type_clears_warning() {
    let mut db = load(MISSING_TYPE);
    replace(&mut db, ":A skos", ":A a skos:Concept ; skos");
    assert!(db.diagnostics.is_empty(), "{:?}", db.diagnostics.all());
}

#[test]
fn test_diagnostics_follow_edits_above_them() {
    let mut db = load(MISSING_TYPE);
    let before = db.diagnostics.all()[0].location.start.line;
    replace(&mut db, "@prefix skos:", "# comment\n@prefix skos:");
    assert_eq!(db.diagnostics.len(), 1);
    assert_eq!(db.diagnostics.all()[0].location.start.line, before + 1);
}
