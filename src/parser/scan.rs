//! Block scanning by nested relative matching.
//!
//! A block is located in a range, its subject is matched at the start of the
//! block, predicate-object lists are matched in the rest of the block, and
//! objects are matched inside each object list. Each level runs its regex on
//! the scrubbed text of the enclosing span only and maps the results back to
//! absolute source offsets.

use regex::Regex;
use smol_str::SmolStr;
use text_size::{TextRange, TextSize};

use super::grammar::{
    BLOCK_RE, BNPL_START_RE, LITERAL_GROUPS, NUMERIC_OR_BOOLEAN_RE, OBJECT_RE,
    PREDICATE_OBJECTS_RE, PREFIX_DECL_RE, SUBJECT_RE,
};
use super::scrub::{RemovedKind, ScrubbedText};
use super::{ParseError, PrefixDecl};

/// Progress is reported once per this many blocks.
const PROGRESS_STRIDE: usize = 100;

// ============================================================================
// SUB-MATCHING
// ============================================================================

/// One regex match mapped back to absolute source offsets.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpanMatch {
    pub range: TextRange,
    groups: Vec<(SmolStr, TextRange)>,
}

impl SpanMatch {
    /// Range of a named group, if it took part in the match.
    pub fn group(&self, name: &str) -> Option<TextRange> {
        self.groups
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, range)| *range)
    }

    pub fn groups(&self) -> impl Iterator<Item = (&str, TextRange)> {
        self.groups.iter().map(|(n, r)| (n.as_str(), *r))
    }
}

/// Run `regex` on the scrubbed text of `source[within]`.
///
/// Match and named-group ranges are returned in absolute source offsets.
/// With `only_first`, at most one match is returned. A `within` range that
/// is out of bounds yields no matches.
pub fn match_spans(
    source: &str,
    within: TextRange,
    regex: &Regex,
    only_first: bool,
) -> Vec<SpanMatch> {
    let Some(slice) = source.get(usize::from(within.start())..usize::from(within.end())) else {
        return Vec::new();
    };
    let scrubbed = ScrubbedText::new(slice);
    let origin = within.start();
    let names: Vec<(usize, &str)> = regex
        .capture_names()
        .enumerate()
        .filter_map(|(i, name)| name.map(|n| (i, n)))
        .collect();

    let mut matches = Vec::new();
    for caps in regex.captures_iter(scrubbed.text()) {
        let Some(whole) = caps.get(0) else { continue };
        let range = scrubbed.to_source_range(whole.start(), whole.end()) + origin;
        let groups = names
            .iter()
            .filter_map(|&(i, name)| {
                caps.get(i).map(|g| {
                    (
                        SmolStr::new(name),
                        scrubbed.to_source_range(g.start(), g.end()) + origin,
                    )
                })
            })
            .collect();
        matches.push(SpanMatch { range, groups });
        if only_first {
            break;
        }
    }
    matches
}

// ============================================================================
// SCAN RESULTS
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    Iri,
    BlankNode,
    Collection,
    Literal,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScannedToken {
    pub text: SmolStr,
    pub range: TextRange,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScannedSubject {
    /// An IRI, prefixed name or labelled blank node.
    Named(ScannedToken),
    /// `[]`, a blank-node property list or a collection.
    Anonymous,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScannedObject {
    pub token: ScannedToken,
    pub kind: ObjectKind,
    /// Lexical form of a literal, without quotes.
    pub literal: Option<SmolStr>,
    pub lang: Option<SmolStr>,
    pub datatype: Option<SmolStr>,
}

/// One predicate/object pair.
///
/// `range` covers the whole predicate-object list the pair came from, so all
/// objects of a list share it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScannedStatement {
    pub range: TextRange,
    pub predicate: ScannedToken,
    pub object: ScannedObject,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScannedBlock {
    pub range: TextRange,
    pub subject: ScannedSubject,
    pub statements: Vec<ScannedStatement>,
}

// ============================================================================
// SCANNING
// ============================================================================

/// Scan every block inside `ranges` of `source`.
///
/// Ranges are processed in order. Blocks whose subject does not match are
/// skipped. `progress` receives the processed fraction of the ranges in
/// `0.0..=1.0`, at most once every hundred blocks and once per range.
pub fn scan_ranges(
    source: &str,
    ranges: &[TextRange],
    mut progress: impl FnMut(f32),
) -> Result<Vec<ScannedBlock>, ParseError> {
    let total: u32 = ranges.iter().map(|r| u32::from(r.len())).sum::<u32>().max(1);
    let mut done = 0u32;
    let mut blocks = Vec::new();

    for &range in ranges {
        let matches = match_spans(source, range, &BLOCK_RE, false);
        for (i, m) in matches.iter().enumerate() {
            if let Some(block) = scan_block(source, m.range)? {
                blocks.push(block);
            }
            if i % PROGRESS_STRIDE == 0 {
                let within = u32::from(m.range.end() - range.start());
                progress((done + within) as f32 / total as f32);
            }
        }
        done += u32::from(range.len());
        progress(done as f32 / total as f32);
    }
    Ok(blocks)
}

fn token(source: &str, range: TextRange) -> ScannedToken {
    ScannedToken {
        text: SmolStr::new(&source[range]),
        range,
    }
}

fn scan_block(source: &str, range: TextRange) -> Result<Option<ScannedBlock>, ParseError> {
    let (subject, rest_start) =
        if let Some(m) = match_spans(source, range, &SUBJECT_RE, true).pop() {
            let Some(subject_range) = m.group("subject") else {
                return Ok(None);
            };
            let text = &source[subject_range];
            let subject = if text.starts_with('[') || text.starts_with('(') {
                ScannedSubject::Anonymous
            } else {
                ScannedSubject::Named(token(source, subject_range))
            };
            (subject, m.range.end())
        } else if let Some(m) = match_spans(source, range, &BNPL_START_RE, true).pop() {
            (ScannedSubject::Anonymous, m.range.end())
        } else {
            tracing::trace!(?range, "block without subject skipped");
            return Ok(None);
        };

    let rest = TextRange::new(rest_start, range.end());
    let mut statements = Vec::new();
    for po in match_spans(source, rest, &PREDICATE_OBJECTS_RE, false) {
        let offset = u32::from(po.range.start());
        let predicate = po
            .group("predicate")
            .ok_or_else(|| ParseError::missing_group("predicate", offset))?;
        let object_list = po
            .group("objectList")
            .ok_or_else(|| ParseError::missing_group("objectList", offset))?;

        for object in match_spans(source, object_list, &OBJECT_RE, false) {
            let object_range = object
                .group("object")
                .ok_or_else(|| ParseError::missing_group("object", offset))?;
            statements.push(ScannedStatement {
                range: po.range,
                predicate: token(source, predicate),
                object: scan_object(source, object_range, &object),
            });
        }
    }

    Ok(Some(ScannedBlock {
        range,
        subject,
        statements,
    }))
}

fn scan_object(source: &str, range: TextRange, m: &SpanMatch) -> ScannedObject {
    let text = &source[range];
    let literal = LITERAL_GROUPS
        .iter()
        .find_map(|g| m.group(g))
        .map(|r| SmolStr::new(&source[r]));
    let lang = m.group("lang").map(|r| SmolStr::new(&source[r]));
    let datatype = m.group("datatype").map(|r| SmolStr::new(&source[r]));

    let (kind, literal) = if literal.is_some() {
        (ObjectKind::Literal, literal)
    } else if NUMERIC_OR_BOOLEAN_RE.is_match(text) {
        (ObjectKind::Literal, Some(SmolStr::new(text)))
    } else if text.starts_with("_:") || text.starts_with('[') {
        (ObjectKind::BlankNode, None)
    } else if text.starts_with('(') {
        (ObjectKind::Collection, None)
    } else {
        (ObjectKind::Iri, None)
    };

    ScannedObject {
        token: token(source, range),
        kind,
        literal,
        lang,
        datatype,
    }
}

// ============================================================================
// PREFIXES
// ============================================================================

/// All `@prefix` and SPARQL `PREFIX` declarations of `source`, in order.
///
/// Declarations inside comments or string literals are ignored.
pub fn prefix_declarations(source: &str) -> Vec<PrefixDecl> {
    let scrubbed = ScrubbedText::new(source);
    scrubbed
        .removed()
        .iter()
        .filter(|r| r.kind == RemovedKind::Directive)
        .filter_map(|r| {
            let caps = PREFIX_DECL_RE.captures(&source[r.source])?;
            let short = caps.name("short").or_else(|| caps.name("sparql_short"))?;
            let long = caps.name("long").or_else(|| caps.name("sparql_long"))?;
            Some(PrefixDecl {
                short: SmolStr::new(short.as_str()),
                long: SmolStr::new(long.as_str()),
            })
        })
        .collect()
}

/// Whole-text range of `source`.
pub fn full_range(source: &str) -> TextRange {
    TextRange::up_to(TextSize::from(source.len() as u32))
}
