//! Reference bookkeeping, placeholders and garbage collection.

use skosttl::hir::{Direction, PredicateKind, RootDatabase};

use crate::helpers::db_helpers::{id, load, load_many, replace};
use crate::helpers::source_fixtures::{BASIC_HIERARCHY, OTHER_URI, SCHEME, URI, with_prefixes};

fn assert_symmetric(db: &RootDatabase) {
    for (holder, resource) in db.graph.iter() {
        for r in &resource.references {
            if r.target == holder {
                continue;
            }
            let other = db.graph.get(r.target).expect("reference target alive");
            let mirrored = other.references.iter().any(|m| {
                m.target == holder
                    && m.statement == r.statement
                    && m.kind == r.kind
                    && m.direction != r.direction
            });
            assert!(mirrored, "{} -> {} has no mirror", resource.id, other.id);
        }
    }
}

// ============================================================================
// SCENARIOS
// ============================================================================

#[test]
fn test_basic_hierarchy() {
    let db = load(BASIC_HIERARCHY);
    let (a, b) = (id(&db, "A"), id(&db, "B"));

    let a_refs = &db.graph.get(a).unwrap().references;
    assert_eq!(a_refs.len(), 1);
    assert_eq!(a_refs[0].kind, PredicateKind::Broader);
    assert_eq!(a_refs[0].direction, Direction::External);
    assert_eq!(a_refs[0].target, b);

    let b_refs = &db.graph.get(b).unwrap().references;
    assert_eq!(b_refs.len(), 1);
    assert_eq!(b_refs[0].kind, PredicateKind::Broader);
    assert_eq!(b_refs[0].direction, Direction::Internal);
    assert_eq!(b_refs[0].target, a);

    assert!(db.diagnostics.is_empty());
}

#[test]
fn test_reference_symmetry_after_load() {
    let db = load(SCHEME);
    assert_symmetric(&db);
}

#[test]
fn test_reference_symmetry_after_edit() {
    let mut db = load(SCHEME);
    replace(&mut db, "skos:broader :Animal ; :seeAlso", "skos:broader :Plant ; :seeAlso");
    assert_symmetric(&db);
    let bird = id(&db, "Bird");
    assert_eq!(db.graph.parents(bird), vec![id(&db, "Plant")]);
}

#[test]
fn test_self_reference_is_one_sided() {
    let db = load(&with_prefixes(":A a skos:Concept ; skos:broader :A .\n"));
    let a = db.graph.get(id(&db, "A")).unwrap();
    assert_eq!(a.references.len(), 1);
    assert_eq!(a.references[0].direction, Direction::Internal);
}

// ============================================================================
// MERGING & PLACEHOLDERS
// ============================================================================

#[test]
fn test_blocks_merge_into_one_resource() {
    let db = load(&with_prefixes(
        ":A a skos:Concept .\n:A skos:prefLabel \"A\"@en .\n",
    ));
    let a = db.graph.get(id(&db, "A")).unwrap();
    assert_eq!(a.occurrences.len(), 2);
    assert_eq!(a.statements.len(), 2);
    assert!(db.diagnostics.is_empty());
}

#[test]
fn test_resource_merges_across_documents() {
    let db = load_many(&[
        (URI, &with_prefixes(":A a skos:Concept .\n")),
        (OTHER_URI, &with_prefixes(":A skos:prefLabel \"A\"@en .\n:B a skos:Concept ; skos:prefLabel \"B\"@en ; skos:broader :A .\n")),
    ]);
    let a = id(&db, "A");
    let files: Vec<_> = db
        .graph
        .get(a)
        .unwrap()
        .occurrences
        .iter()
        .map(|o| o.occurrence.file)
        .collect();
    assert_eq!(files.len(), 2);
    assert_ne!(files[0], files[1]);
    assert_eq!(db.graph.children(a), vec![id(&db, "B")]);
}

#[test]
fn test_forward_reference_creates_placeholder() {
    let db = load(&with_prefixes(
        ":B a skos:Concept ; skos:prefLabel \"B\"@en ; skos:broader :Missing .\n",
    ));
    let missing = db.graph.get(id(&db, "Missing")).unwrap();
    assert!(missing.occurrences.is_empty());
    assert_eq!(missing.references.len(), 1);
    assert_eq!(missing.label(), "<http://e/Missing>");
}

// ============================================================================
// GARBAGE COLLECTION
// ============================================================================

#[test]
fn test_removing_last_mention_collects_resource() {
    let mut db = load(&with_prefixes(
        ":B a skos:Concept ; skos:prefLabel \"B\"@en ; :seeAlso :X .\n\
:X a skos:Concept ; skos:prefLabel \"X\"@en .\n",
    ));
    let b = id(&db, "B");
    assert_eq!(db.graph.get(b).unwrap().references.len(), 1);

    let report = replace(&mut db, ":X a skos:Concept ; skos:prefLabel \"X\"@en .\n", "");
    assert!(report.collected.iter().any(|name| name == "<http://e/X>"));
    assert!(db.graph.lookup("<http://e/X>").is_none());
    assert!(db.graph.get(b).unwrap().references.is_empty());
}

#[test]
fn test_no_orphans_after_cycle() {
    let mut db = load(SCHEME);
    replace(&mut db, ":Fish a skos:Concept ; skos:prefLabel \"Fish\"@en ; skos:broader :Animal ; skos:notation \"F\" .\n", "");
    replace(&mut db, ":Bird", ":Robin");
    assert!(db.graph.iter().all(|(_, r)| !r.is_orphan()));
    assert!(db.graph.lookup("<http://e/Bird>").is_none());
    assert!(db.graph.lookup("<http://e/Fish>").is_none());
}

#[test]
fn test_hierarchical_target_survives_without_block() {
    let mut db = load(SCHEME);
    replace(
        &mut db,
        ":Animal a skos:Concept ; skos:prefLabel \"Animal\"@en ; skos:inScheme :S .\n",
        "",
    );
    let animal = db.graph.get(id(&db, "Animal")).unwrap();
    assert!(animal.occurrences.is_empty());
    assert!(animal.types.is_empty());
    assert_eq!(db.graph.children(id(&db, "Animal")).len(), 2);
}
