//! Turtle token grammar as composable regular-expression fragments.
//!
//! Fragments follow the productions of the W3C Turtle grammar. Two kinds of
//! productions are left out on purpose: nested collections and blank-node
//! property lists used as objects. Both are recursive and cannot be expressed
//! as a regular language.
//!
//! Fragments are plain pattern strings so they can be composed further; the
//! `*_RE` statics are the compiled patterns the scanner runs.

use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};

// ============================================================================
// TERMINALS
// ============================================================================

pub const HEX: &str = "[0-9A-Fa-f]";

pub const PN_LOCAL_ESC: &str = r"\\[_~.!$&'()*+,;=/?#@%\-]";

pub const PN_CHARS_BASE: &str = concat!(
    r"[A-Za-z\x{00C0}-\x{00D6}\x{00D8}-\x{00F6}\x{00F8}-\x{02FF}\x{0370}-\x{037D}",
    r"\x{037F}-\x{1FFF}\x{200C}-\x{200D}\x{2070}-\x{218F}\x{2C00}-\x{2FEF}",
    r"\x{3001}-\x{D7FF}\x{F900}-\x{FDCF}\x{FDF0}-\x{FFFD}\x{10000}-\x{EFFFF}]"
);

pub const WS: &str = r"[\x20\t\r\n]";

pub const ECHAR: &str = r#"\\[tbnrf"'\\]"#;

pub const EXPONENT: &str = "[eE][+-]?[0-9]+";

pub const DECIMAL: &str = r"[+-]?[0-9]*\.[0-9]+";

pub const INTEGER: &str = "[+-]?[0-9]+";

pub const LANGTAG: &str = "@[a-zA-Z]+(?:-[a-zA-Z0-9]+)*";

pub const BOOLEAN_LITERAL: &str = "(?:true|false)";

pub static PERCENT: Lazy<String> = Lazy::new(|| format!("%{HEX}{HEX}"));

pub static PLX: Lazy<String> = Lazy::new(|| format!("(?:{}|{PN_LOCAL_ESC})", *PERCENT));

pub static PN_CHARS_U: Lazy<String> = Lazy::new(|| format!("(?:{PN_CHARS_BASE}|_)"));

pub static PN_CHARS: Lazy<String> = Lazy::new(|| {
    format!(
        r"(?:{}|-|[0-9\x{{00B7}}\x{{0300}}-\x{{036F}}\x{{203F}}-\x{{2040}}])",
        *PN_CHARS_U
    )
});

pub static PN_PREFIX: Lazy<String> =
    Lazy::new(|| format!(r"{PN_CHARS_BASE}(?:(?:{pc}|\.)*{pc})?", pc = *PN_CHARS));

pub static PN_LOCAL: Lazy<String> = Lazy::new(|| {
    format!(
        r"(?:{u}|:|[0-9]|{plx})(?:(?:{pc}|\.|:|{plx})*(?:{pc}|:|{plx}))?",
        u = *PN_CHARS_U,
        pc = *PN_CHARS,
        plx = *PLX
    )
});

pub static ANON: Lazy<String> = Lazy::new(|| format!(r"\[{WS}*\]"));

pub static UCHAR: Lazy<String> = Lazy::new(|| {
    format!(r"(?:\\u{HEX}{HEX}{HEX}{HEX}|\\U{HEX}{HEX}{HEX}{HEX}{HEX}{HEX}{HEX}{HEX})")
});

pub static STRING_LITERAL_LONG_QUOTE: Lazy<String> = Lazy::new(|| {
    format!(
        r#""""(?:(?:"|"")?(?:[^"\\]|{ECHAR}|{}))*""""#,
        *UCHAR
    )
});

pub static STRING_LITERAL_LONG_SINGLE_QUOTE: Lazy<String> = Lazy::new(|| {
    format!(r"'''(?:(?:'|'')?(?:[^'\\]|{ECHAR}|{}))*'''", *UCHAR)
});

pub static STRING_LITERAL_QUOTE: Lazy<String> =
    Lazy::new(|| format!(r#""(?:[^"\\\n\r]|{ECHAR}|{})*""#, *UCHAR));

pub static STRING_LITERAL_SINGLE_QUOTE: Lazy<String> =
    Lazy::new(|| format!(r"'(?:[^'\\\n\r]|{ECHAR}|{})*'", *UCHAR));

pub static DOUBLE: Lazy<String> = Lazy::new(|| {
    format!(r"[+-]?(?:[0-9]+\.[0-9]*{EXPONENT}|\.[0-9]+{EXPONENT}|[0-9]+{EXPONENT})")
});

pub static BLANK_NODE_LABEL: Lazy<String> = Lazy::new(|| {
    format!(
        r"_:(?:{}|[0-9])(?:(?:{pc}|\.)*{pc})?",
        *PN_CHARS_U,
        pc = *PN_CHARS
    )
});

pub static PNAME_NS: Lazy<String> = Lazy::new(|| format!("(?:{})?:", *PN_PREFIX));

pub static PNAME_LN: Lazy<String> = Lazy::new(|| format!("{}{}", *PNAME_NS, *PN_LOCAL));

pub static IRIREF: Lazy<String> =
    Lazy::new(|| format!(r#"<(?:[^\x00-\x20<>"{{}}|\^`\\]|{})*>"#, *UCHAR));

// ============================================================================
// PRODUCTIONS
// ============================================================================

pub static BLANK_NODE: Lazy<String> =
    Lazy::new(|| format!("(?:{}|{})", *BLANK_NODE_LABEL, *ANON));

pub static PREFIXED_NAME: Lazy<String> =
    Lazy::new(|| format!("(?:{}|{})", *PNAME_LN, *PNAME_NS));

pub static IRI: Lazy<String> = Lazy::new(|| format!("(?:{}|{})", *IRIREF, *PREFIXED_NAME));

pub static STRING: Lazy<String> = Lazy::new(|| {
    format!(
        "(?:{}|{}|{}|{})",
        *STRING_LITERAL_LONG_SINGLE_QUOTE,
        *STRING_LITERAL_LONG_QUOTE,
        *STRING_LITERAL_QUOTE,
        *STRING_LITERAL_SINGLE_QUOTE
    )
});

pub static RDF_LITERAL: Lazy<String> =
    Lazy::new(|| format!(r"{}(?:{LANGTAG}|\^\^{})?", *STRING, *IRI));

/// Longest alternatives first so `1.5e3` is never cut short at `1`.
pub static NUMERIC_LITERAL: Lazy<String> =
    Lazy::new(|| format!("(?:{}|{DECIMAL}|{INTEGER})", *DOUBLE));

pub static LITERAL: Lazy<String> = Lazy::new(|| {
    format!(
        "(?:{}|{}|{BOOLEAN_LITERAL})",
        *RDF_LITERAL, *NUMERIC_LITERAL
    )
});

pub static VERB: Lazy<String> = Lazy::new(|| format!(r"(?:{}|(?-u:\b)a)", *IRI));

/// Flat collections only.
pub static COLLECTION: Lazy<String> = Lazy::new(|| {
    format!(
        r"\((?:\s*(?:{}|{}|{}))*\s*\)",
        *IRI, *BLANK_NODE, *LITERAL
    )
});

/// Blank-node property lists are not accepted as objects.
pub static OBJECT: Lazy<String> = Lazy::new(|| {
    format!(
        "(?:{}|{}|{}|{})",
        *IRI, *BLANK_NODE, *COLLECTION, *LITERAL
    )
});

pub static SUBJECT: Lazy<String> =
    Lazy::new(|| format!("(?:{}|{}|{})", *IRI, *BLANK_NODE, *COLLECTION));

pub static OBJECT_LIST: Lazy<String> =
    Lazy::new(|| format!(r"{o}(?:\s*,\s*{o})*", o = *OBJECT));

pub static PREDICATE_OBJECT_LIST: Lazy<String> = Lazy::new(|| {
    format!(
        r"{v}\s*{ol}(?:\s*;(?:\s*{v}\s*{ol})?)*",
        v = *VERB,
        ol = *OBJECT_LIST
    )
});

pub static BLANK_NODE_PROPERTY_LIST: Lazy<String> =
    Lazy::new(|| format!(r"\[\s*{}\s*\]", *PREDICATE_OBJECT_LIST));

pub static TRIPLES: Lazy<String> = Lazy::new(|| {
    format!(
        r"(?:{s}\s+{pol}|{bnpl}(?:\s+{pol})?)",
        s = *SUBJECT,
        pol = *PREDICATE_OBJECT_LIST,
        bnpl = *BLANK_NODE_PROPERTY_LIST
    )
});

pub static PREFIX_ID: Lazy<String> =
    Lazy::new(|| format!(r"@prefix\s+{}\s+{}\s*\.", *PNAME_NS, *IRIREF));

pub static BASE: Lazy<String> = Lazy::new(|| format!(r"@base\s+{}\s*\.", *IRIREF));

/// SPARQL keywords are case-insensitive, so they are only recognised at the
/// start of a line to keep `ex:Base <…>` objects from looking like directives.
pub static SPARQL_PREFIX: Lazy<String> = Lazy::new(|| {
    format!(
        r"(?m:^)[ \t]*(?i:PREFIX)\s+{}\s+{}",
        *PNAME_NS, *IRIREF
    )
});

pub static SPARQL_BASE: Lazy<String> =
    Lazy::new(|| format!(r"(?m:^)[ \t]*(?i:BASE)\s+{}", *IRIREF));

pub static DIRECTIVE: Lazy<String> = Lazy::new(|| {
    format!(
        "(?:{}|{}|{}|{})",
        *PREFIX_ID, *BASE, *SPARQL_PREFIX, *SPARQL_BASE
    )
});

// ============================================================================
// NAMED-GROUP VARIANTS
// ============================================================================

pub static STRING_NAMED: Lazy<String> = Lazy::new(|| {
    let u = &*UCHAR;
    format!(
        concat!(
            r"(?:'''(?P<sllsq>(?:(?:'|'')?(?:[^'\\]|{e}|{u}))*)'''",
            r#"|"""(?P<sllq>(?:(?:"|"")?(?:[^"\\]|{e}|{u}))*)""""#,
            r#"|"(?P<slq>(?:[^"\\\n\r]|{e}|{u})*)""#,
            r"|'(?P<slsq>(?:[^'\\\n\r]|{e}|{u})*)')"
        ),
        e = ECHAR,
        u = u
    )
});

pub static LITERAL_NAMED: Lazy<String> = Lazy::new(|| {
    format!(
        r"(?:{}(?:@(?P<lang>[a-zA-Z]+(?:-[a-zA-Z0-9]+)*)|\^\^(?P<datatype>{}))?|{}|{BOOLEAN_LITERAL})",
        *STRING_NAMED, *IRI, *NUMERIC_LITERAL
    )
});

/// Literal capture groups in the order they are tried.
pub const LITERAL_GROUPS: [&str; 4] = ["slq", "slsq", "sllq", "sllsq"];

// ============================================================================
// COMPILED PATTERNS
// ============================================================================

/// The composed patterns are large once the Unicode classes are expanded.
const SIZE_LIMIT: usize = 256 * (1 << 20);

fn compile(pattern: &str) -> Regex {
    RegexBuilder::new(pattern)
        .size_limit(SIZE_LIMIT)
        .dfa_size_limit(SIZE_LIMIT)
        .build()
        .expect("valid regex")
}

/// One triples statement, including its terminating `.` when present.
pub static BLOCK_RE: Lazy<Regex> = Lazy::new(|| compile(&format!(r"{}(?:\s*\.)?", *TRIPLES)));

/// Subject at the very start of a block.
pub static SUBJECT_RE: Lazy<Regex> =
    Lazy::new(|| compile(&format!("^(?P<subject>{})", *SUBJECT)));

/// Blank-node property list opening a block.
pub static BNPL_START_RE: Lazy<Regex> = Lazy::new(|| compile(r"^\[\s*"));

pub static PREDICATE_OBJECTS_RE: Lazy<Regex> = Lazy::new(|| {
    compile(&format!(
        r"(?P<predicate>{})\s+(?P<objectList>{})",
        *VERB, *OBJECT_LIST
    ))
});

pub static OBJECT_RE: Lazy<Regex> = Lazy::new(|| {
    compile(&format!(
        "(?P<object>{}|{}|{}|{})",
        *IRI, *BLANK_NODE, *COLLECTION, *LITERAL_NAMED
    ))
});

pub static PREFIX_DECL_RE: Lazy<Regex> = Lazy::new(|| {
    compile(&format!(
        r"@prefix\s+(?P<short>{ns})\s+(?P<long>{iri})|(?i:PREFIX)\s+(?P<sparql_short>{ns})\s+(?P<sparql_long>{iri})",
        ns = *PNAME_NS,
        iri = *IRIREF
    ))
});

/// Text kept verbatim by the scrubber, comments, and directives.
pub static SCRUB_RE: Lazy<Regex> = Lazy::new(|| {
    compile(&format!(
        "(?P<keep>{}|{})|(?P<comment>#[^\n]*)|(?P<directive>{})",
        *IRIREF, *STRING, *DIRECTIVE
    ))
});

pub static IRIREF_RE: Lazy<Regex> = Lazy::new(|| compile(&IRIREF));

pub static IRIREF_EXACT_RE: Lazy<Regex> = Lazy::new(|| compile(&format!("^{}$", *IRIREF)));

/// Any IRI token, absolute or prefixed.
pub static IRI_RE: Lazy<Regex> = Lazy::new(|| compile(&IRI));

/// A `.` closing a statement.
pub static TERMINATOR_RE: Lazy<Regex> = Lazy::new(|| compile(r"\.(?:\s|$)"));

pub static NON_BLANK_RE: Lazy<Regex> = Lazy::new(|| compile(r"\S"));

pub static NUMERIC_OR_BOOLEAN_RE: Lazy<Regex> =
    Lazy::new(|| compile(&format!("^(?:{}|{BOOLEAN_LITERAL})$", *NUMERIC_LITERAL)));
