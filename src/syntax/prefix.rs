//! Per-document prefix tables.

use rustc_hash::FxHashMap;
use smol_str::SmolStr;

use crate::base::FileId;
use crate::base::vocab::{RDF_TYPE, SKOS_BASE};
use crate::parser::PrefixDecl;
use crate::parser::grammar::IRIREF_RE;

/// Resolve `token` against `prefixes`.
///
/// `a` always resolves to `rdf:type`. A prefixed name whose prefix is
/// declared resolves to `<long-form + local-name>`. Anything else is `None`.
pub fn resolve_prefixed(prefixes: &[PrefixDecl], token: &str) -> Option<SmolStr> {
    if token == "a" {
        return Some(SmolStr::new_static(RDF_TYPE));
    }
    let colon = token.find(':')?;
    let (short, local) = token.split_at(colon + 1);
    let prefix = prefixes.iter().find(|p| p.short == short)?;
    let long = prefix.long.strip_suffix('>').unwrap_or(&prefix.long);
    Some(SmolStr::from(format!("{long}{local}>")))
}

/// Shorten a resolved IRI with the first prefix whose long form it extends.
pub fn apply_prefix(prefixes: &[PrefixDecl], iri: &str) -> Option<SmolStr> {
    prefixes.iter().find_map(|p| {
        let long = p.long.strip_suffix('>').unwrap_or(&p.long);
        let local = iri.strip_prefix(long)?.strip_suffix('>')?;
        Some(SmolStr::from(format!("{}{local}", p.short)))
    })
}

/// Prefix tables of every tracked document.
#[derive(Clone, Debug, Default)]
pub struct PrefixManager {
    tables: FxHashMap<FileId, Vec<PrefixDecl>>,
}

impl PrefixManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the table of `file`. Returns whether it differs from before.
    pub fn set_prefixes(&mut self, file: FileId, prefixes: Vec<PrefixDecl>) -> bool {
        match self.tables.get(&file) {
            Some(old) if *old == prefixes => false,
            _ => {
                self.tables.insert(file, prefixes);
                true
            }
        }
    }

    pub fn prefixes(&self, file: FileId) -> &[PrefixDecl] {
        self.tables.get(&file).map(Vec::as_slice).unwrap_or_default()
    }

    /// The table of `file`, `None` if it was never set.
    pub fn table(&self, file: FileId) -> Option<&[PrefixDecl]> {
        self.tables.get(&file).map(Vec::as_slice)
    }

    pub fn resolve(&self, file: FileId, token: &str) -> Option<SmolStr> {
        resolve_prefixed(self.prefixes(file), token)
    }

    pub fn apply(&self, file: FileId, iri: &str) -> Option<SmolStr> {
        apply_prefix(self.prefixes(file), iri)
    }

    /// Short form declared for `long`, e.g. `skos:` for the SKOS namespace.
    pub fn prefix_for(&self, file: FileId, long: &str) -> Option<&str> {
        self.prefixes(file)
            .iter()
            .find(|p| p.long == long)
            .map(|p| p.short.as_str())
    }

    pub fn skos_prefix(&self, file: FileId) -> Option<&str> {
        self.prefix_for(file, SKOS_BASE)
    }

    /// Rewrite every absolute IRI in `text` to its prefixed form where a
    /// prefix of `file` allows it.
    pub fn apply_prefixes_on_text(&self, file: FileId, text: &str) -> String {
        IRIREF_RE
            .replace_all(text, |caps: &regex::Captures<'_>| {
                let iri = &caps[0];
                self.apply(file, iri)
                    .map(|short| short.to_string())
                    .unwrap_or_else(|| iri.to_string())
            })
            .into_owned()
    }

    pub fn remove(&mut self, file: FileId) {
        self.tables.remove(&file);
    }
}
