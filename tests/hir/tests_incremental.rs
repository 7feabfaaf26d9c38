//! Incremental re-parsing must agree with parsing from scratch.

use std::collections::BTreeMap;

use proptest::prelude::*;
use skosttl::hir::{RootDatabase, SubjectType};
use skosttl::syntax::{ContentChange, Occurrence};
use text_size::{TextRange, TextSize};

use crate::helpers::db_helpers::{edit, load, replace};
use crate::helpers::source_fixtures::{PREFIXES, SCHEME, URI, with_prefixes};

type Snapshot = BTreeMap<String, (Vec<SubjectType>, Vec<TextRange>, Vec<String>)>;

/// Graph state keyed by names, independent of arena indices.
fn snapshot(db: &RootDatabase) -> Snapshot {
    db.graph
        .iter()
        .map(|(_, resource)| {
            let mut occurrences: Vec<TextRange> =
                resource.occurrences.iter().map(|o| o.occurrence.range).collect();
            occurrences.sort_by_key(|r| (r.start(), r.end()));
            let mut references: Vec<String> = resource
                .references
                .iter()
                .map(|r| {
                    format!(
                        "{} {:?} {:?} {:?}",
                        db.graph.get(r.target).map(|t| t.id.as_str()).unwrap_or("?"),
                        r.kind,
                        r.direction,
                        r.occurrence.range
                    )
                })
                .collect();
            references.sort();
            (
                resource.id.to_string(),
                (resource.distinct_types(), occurrences, references),
            )
        })
        .collect()
}

fn current_text(db: &RootDatabase) -> String {
    let file = db.documents.file_id(URI).unwrap();
    db.documents.text(file).to_string()
}

fn assert_matches_fresh_load(db: &RootDatabase) {
    let fresh = load(&current_text(db));
    assert_eq!(snapshot(db), snapshot(&fresh));
    assert_eq!(db.diagnostics.len(), fresh.diagnostics.len());
}

/// Byte range of line `index`, including its newline.
fn line_range(text: &str, index: usize) -> TextRange {
    let start: usize = text.split_inclusive('\n').take(index).map(str::len).sum();
    let len = text.split_inclusive('\n').nth(index).map_or(0, str::len);
    TextRange::at((start as u32).into(), (len as u32).into())
}

// ============================================================================
// PREFIX CHANGES
// ============================================================================

#[test]
fn test_prefix_change_reparses_document() {
    let mut db = load(&with_prefixes(":A a skos:Concept ; skos:prefLabel \"A\"@en .\n"));
    assert!(db.graph.lookup("<http://e/A>").is_some());

    replace(&mut db, "<http://e/>", "<http://f/>");
    assert!(db.graph.lookup("<http://e/A>").is_none());
    let a = db.graph.resource("<http://f/A>").unwrap();
    assert_eq!(a.primary_type(), SubjectType::Concept);
    assert_matches_fresh_load(&db);
}

// ============================================================================
// EDIT EQUIVALENCE
// ============================================================================

#[test]
fn test_rename_matches_fresh_load() {
    let mut db = load(SCHEME);
    replace(&mut db, ":Animal a", ":Creature a");
    assert_matches_fresh_load(&db);
}

#[test]
fn test_several_changes_in_one_batch() {
    let mut db = load(SCHEME);
    let text = current_text(&db);
    let bird = text.find(":Bird a").unwrap() as u32;
    let plant = text.find(":Plant a").unwrap() as u32;
    // Changes are sequential: the second one sees the text after the first.
    edit(
        &mut db,
        vec![
            ContentChange::insert(bird, ":Cat a skos:Concept ; skos:broader :Animal .\n"),
            ContentChange::new(plant, 6, ":Tree"),
        ],
    );
    assert!(db.graph.lookup("<http://e/Cat>").is_some());
    assert!(db.graph.lookup("<http://e/Plant>").is_none());
    assert!(db.graph.lookup("<http://e/Tree>").is_some());
    assert_matches_fresh_load(&db);
}

#[test]
fn test_whitespace_edit_inside_block() {
    let mut db = load(SCHEME);
    replace(&mut db, "; skos:inScheme", ";\n\tskos:inScheme");
    assert_matches_fresh_load(&db);
}

// ============================================================================
// TYPING
// ============================================================================

/// Insert `text` at `at` one character per cycle, checking the graph against
/// a fresh load after every keystroke.
fn type_text(db: &mut RootDatabase, at: usize, text: &str) {
    let mut at = at as u32;
    for (i, ch) in text.char_indices() {
        edit(db, vec![ContentChange::insert(at, ch.to_string())]);
        at += ch.len_utf8() as u32;
        let fresh = load(&current_text(db));
        assert_eq!(snapshot(db), snapshot(&fresh), "after typing {:?}", &text[..=i]);
    }
}

#[test]
fn test_typing_scheme_matches_fresh_load() {
    let mut db = load(PREFIXES);
    type_text(&mut db, PREFIXES.len(), &SCHEME[PREFIXES.len()..]);
    assert_eq!(current_text(&db), SCHEME);
    assert_eq!(db.graph.roots().len(), load(SCHEME).graph.roots().len());
}

#[test]
fn test_typing_before_following_statement() {
    let mut db = load(SCHEME);
    let at = SCHEME.find(":S .\n:Plant").unwrap() + ":S .".len();
    type_text(&mut db, at, " :Cat skos:broader :Animal .");
    assert!(db.graph.lookup("<http://e/Cat>").is_some());
    assert!(db.graph.lookup("<http://e/Plant>").is_some());
}

#[test]
fn test_object_completed_before_following_statement() {
    let mut db = load(&with_prefixes(":A a skos:Concept .\n:Z skos\n:B skos:broader :A .\n"));
    assert!(db.graph.lookup("<http://e/B>").is_some());

    let at = current_text(&db).find(":Z skos").unwrap() + ":Z skos".len();
    edit(&mut db, vec![ContentChange::insert(at as u32, ":")]);
    // `:B` is now the object of `:Z` and no longer a subject
    let b = db.graph.resource("<http://e/B>");
    assert!(b.is_none_or(|b| b.occurrences.is_empty()));
    let fresh = load(&current_text(&db));
    assert_eq!(snapshot(&db), snapshot(&fresh));
}

// ============================================================================
// PROPERTIES
// ============================================================================

const NEW_LINES: [&str; 3] = [
    ":N a skos:Concept ; skos:prefLabel \"N\"@en ; skos:broader :Animal .\n",
    ":M a skos:Concept ; skos:prefLabel \"M\"@en ; :seeAlso :Fish .\n",
    ":Fish skos:altLabel \"Pisces\"@en .\n",
];

proptest! {
    /// Deleting a statement line or inserting one before it leaves the graph
    /// as a fresh parse of the resulting text would.
    #[test]
    fn prop_line_edit_matches_fresh_load(
        line in 2usize..7,
        insert in proptest::option::of(0usize..NEW_LINES.len()),
    ) {
        let mut db = load(SCHEME);
        let range = line_range(SCHEME, line);
        let change = match insert {
            Some(i) => ContentChange::insert(range.start().into(), NEW_LINES[i]),
            None => ContentChange::delete(range),
        };
        edit(&mut db, vec![change]);

        let fresh = load(&current_text(&db));
        prop_assert_eq!(snapshot(&db), snapshot(&fresh));
    }

    /// A wider edit never yields a narrower re-parse window.
    #[test]
    fn prop_window_grows_with_change(
        mut points in proptest::collection::vec(0u32..SCHEME.len() as u32, 4),
    ) {
        points.sort_unstable();
        let db = load(SCHEME);
        let file = db.documents.file_id(URI).unwrap();
        let len = TextSize::of(SCHEME);

        let window = |start: u32, end: u32| {
            let mut graph = db.graph.clone();
            let change = ContentChange::new(start, end - start, "");
            graph.remove_intersecting_occurrences(&[Occurrence::new(file, change.range())]);
            graph.window_for_change(file, &change, len)
        };
        let small = window(points[1], points[2]);
        let large = window(points[0], points[3]);
        prop_assert!(large.start() <= small.start());
        prop_assert!(large.end() >= small.end());
        prop_assert!(small.contains_range(TextRange::new(points[1].into(), points[2].into())));
    }

    /// Text after a change is found at the adjusted offset.
    #[test]
    fn prop_adjusted_offset_tracks_text(
        text in "[a-z .;\n]{1,40}",
        start in 0usize..40,
        len in 0usize..10,
        inserted in "[A-Z]{0,8}",
        offset in 0usize..40,
    ) {
        let start = start.min(text.len());
        let end = (start + len).min(text.len());
        let offset = offset.min(text.len());
        prop_assume!(offset >= end && (offset > start || inserted.is_empty()));

        let change = ContentChange::new(start as u32, (end - start) as u32, inserted.clone());
        let edited = format!("{}{}{}", &text[..start], inserted, &text[end..]);
        let moved = usize::from(change.adjust_offset((offset as u32).into()));
        prop_assert_eq!(&edited[moved..], &text[offset..]);
    }
}

#[test]
fn test_offsets_before_change_stay_put() {
    let change = ContentChange::new(10, 4, "xy");
    assert_eq!(change.adjust_offset(3.into()), TextSize::from(3));
    assert_eq!(change.adjust_offset(10.into()), TextSize::from(10));
    assert_eq!(change.adjust_offset(12.into()), TextSize::from(12));
    assert_eq!(change.adjust_offset(20.into()), TextSize::from(18));
}
