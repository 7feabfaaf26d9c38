//! Inputs that shape evaluation: custom hierarchy predicates and icon rules.

use serde::Deserialize;
use smol_str::SmolStr;

/// Extra predicates that count as broader-like or narrower-like.
///
/// Entries are stored in resolved form; bare IRIs are wrapped in angle
/// brackets.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HierarchyPredicates {
    broader: Vec<SmolStr>,
    narrower: Vec<SmolStr>,
}

fn bracketed(iri: &str) -> SmolStr {
    if iri.starts_with('<') {
        SmolStr::new(iri)
    } else {
        SmolStr::from(format!("<{iri}>"))
    }
}

impl HierarchyPredicates {
    pub fn new<B, N>(broader: B, narrower: N) -> Self
    where
        B: IntoIterator,
        B::Item: AsRef<str>,
        N: IntoIterator,
        N::Item: AsRef<str>,
    {
        Self {
            broader: broader.into_iter().map(|s| bracketed(s.as_ref())).collect(),
            narrower: narrower.into_iter().map(|s| bracketed(s.as_ref())).collect(),
        }
    }

    pub fn is_broader(&self, iri: &str) -> bool {
        self.broader.iter().any(|p| p == iri)
    }

    pub fn is_narrower(&self, iri: &str) -> bool {
        self.narrower.iter().any(|p| p == iri)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IconTarget {
    #[default]
    Subject,
    Object,
}

/// Statement pattern of an icon rule. Missing parts match anything.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct IconPattern {
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub predicate: Option<String>,
    #[serde(default)]
    pub object: Option<String>,
}

/// Assigns `icon` to the subject or object of every matching statement.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct IconRule {
    pub rule: IconPattern,
    pub icon: String,
    #[serde(default)]
    pub target: IconTarget,
}

impl IconRule {
    /// Whether the rule matches a statement, all parts in resolved form.
    pub fn matches(&self, subject: &str, predicate: &str, object: &str) -> bool {
        let part = |pattern: &Option<String>, value: &str| {
            pattern.as_deref().is_none_or(|p| p == value)
        };
        part(&self.rule.subject, subject)
            && part(&self.rule.predicate, predicate)
            && part(&self.rule.object, object)
    }
}

/// Static inputs of one evaluation cycle.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EvaluationOptions {
    pub hierarchy: HierarchyPredicates,
    pub icons: Vec<IconRule>,
}
