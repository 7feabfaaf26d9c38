//! Semantic checks over a set of resources.
//!
//! Five passes run over the checked set: labels, types, prefixes, duplicate
//! statements and hierarchical recursion. Each pass only looks at the set,
//! but may emit diagnostics owned by other resources (a recursion cycle
//! leaving the set, for instance).

use indexmap::IndexMap;
use rustc_hash::FxHashSet;
use smol_str::SmolStr;

use super::diagnostics::{
    Diagnostic, DiagnosticCollector, DiagnosticStore, RelatedInfo, codes,
};
use super::graph::ResourceGraph;
use super::resource::{Direction, Resource, ResourceId, Statement};
use crate::base::vocab::PREF_LABEL;
use crate::parser::ObjectKind;
use crate::parser::grammar::IRIREF_EXACT_RE;
use crate::syntax::Occurrence;

pub const MISSING_TYPE_MESSAGE: &str =
    "No 'skos:ConceptScheme', 'skos:Collection' or 'skos:Concept' type defined.";
pub const INVALID_TYPE_MESSAGE: &str = "Invalid SKOS type combination.";
pub const MISSING_ENGLISH_LABEL_MESSAGE: &str = "No english 'skos:prefLabel' defined.";
pub const DUPLICATE_MESSAGE: &str = "Duplicate entry.";
pub const RECURSION_MESSAGE: &str = "Hierarchical recursion:";

/// One broader-like step of the recursion walk.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Edge {
    target: ResourceId,
    occurrence: Occurrence,
    /// Resource declaring the statement.
    owner: ResourceId,
}

// ============================================================================
// SEMANTIC CHECKER
// ============================================================================

/// Runs the checks for one batch of resources.
pub struct SemanticChecker<'a> {
    graph: &'a ResourceGraph,
    collector: DiagnosticCollector,
    /// Resources whose ancestors were fully walked during this batch.
    checked: FxHashSet<ResourceId>,
}

impl<'a> SemanticChecker<'a> {
    pub fn new(graph: &'a ResourceGraph) -> Self {
        Self {
            graph,
            collector: DiagnosticCollector::new(),
            checked: FxHashSet::default(),
        }
    }

    /// Run all passes over `ids`, reporting progress per pass.
    pub fn check(&mut self, ids: &[ResourceId], mut progress: impl FnMut(f32)) {
        let passes: [fn(&mut Self, ResourceId); 5] = [
            Self::check_labels,
            Self::check_types,
            Self::check_prefixes,
            Self::check_duplicates,
            Self::check_recursion,
        ];
        for (i, pass) in passes.iter().enumerate() {
            for &id in ids {
                pass(self, id);
            }
            progress((i + 1) as f32 / passes.len() as f32);
        }
    }

    pub fn finish(self) -> DiagnosticCollector {
        self.collector
    }

    fn resource(&self, id: ResourceId) -> Option<&'a Resource> {
        self.graph.get(id)
    }

    // ------------------------------------------------------------------------
    // Labels
    // ------------------------------------------------------------------------

    /// Conflicting `skos:prefLabel`s per language, and a missing English one.
    pub fn check_labels(&mut self, id: ResourceId) {
        let Some(resource) = self.resource(id) else {
            return;
        };
        if !resource.is_skos {
            return;
        }

        let mut by_lang: IndexMap<String, Vec<&Statement>> = IndexMap::new();
        for label in resource.statements_of(PREF_LABEL) {
            let lang = label.lang.as_deref().unwrap_or_default().to_ascii_lowercase();
            by_lang.entry(lang).or_default().push(label);
        }

        for (lang, labels) in &by_lang {
            let mut values: Vec<Option<&str>> = labels.iter().map(|l| l.literal.as_deref()).collect();
            values.sort();
            values.dedup();
            if values.len() < 2 {
                continue;
            }
            for label in labels {
                let mut diag = Diagnostic::error(
                    id,
                    label.object.occurrence,
                    format!(
                        "The 'skos:prefLabel' for this resource and language '{lang}' has been declared more than once."
                    ),
                )
                .with_code(codes::DUPLICATE_LANGUAGE_LABEL);
                for other in labels.iter().filter(|o| o.id != label.id) {
                    let text = other.literal.as_deref().unwrap_or(&other.object.raw);
                    diag = diag.with_related(RelatedInfo::new(id, other.object.occurrence, text));
                }
                self.collector.add(diag);
            }
        }

        if !by_lang.contains_key("en") {
            for occ in &resource.occurrences {
                self.collector.add(
                    Diagnostic::warning(id, occ.occurrence, MISSING_ENGLISH_LABEL_MESSAGE)
                        .with_code(codes::MISSING_ENGLISH_LABEL),
                );
            }
        }
    }

    // ------------------------------------------------------------------------
    // Types
    // ------------------------------------------------------------------------

    /// Exactly one of Concept, ConceptScheme and Collection.
    pub fn check_types(&mut self, id: ResourceId) {
        let Some(resource) = self.resource(id) else {
            return;
        };
        if !resource.is_skos {
            return;
        }

        if resource.types.is_empty() {
            for occ in &resource.occurrences {
                self.collector.add(
                    Diagnostic::warning(id, occ.occurrence, MISSING_TYPE_MESSAGE)
                        .with_code(codes::MISSING_TYPE),
                );
            }
            return;
        }
        if resource.distinct_types().len() < 2 {
            return;
        }

        let declared: Vec<(Occurrence, &str)> = resource
            .types
            .iter()
            .filter_map(|t| {
                resource
                    .statement(t.statement)
                    .map(|s| (s.object.occurrence, t.ty.display()))
            })
            .collect();
        for (i, (occurrence, _)) in declared.iter().enumerate() {
            let mut diag = Diagnostic::error(id, *occurrence, INVALID_TYPE_MESSAGE)
                .with_code(codes::INVALID_TYPE_COMBINATION);
            for (j, (other, ty)) in declared.iter().enumerate() {
                if i != j {
                    diag = diag.with_related(RelatedInfo::new(id, *other, *ty));
                }
            }
            self.collector.add(diag);
        }
    }

    // ------------------------------------------------------------------------
    // Prefixes
    // ------------------------------------------------------------------------

    fn prefix_not_found(&mut self, id: ResourceId, occurrence: Occurrence, text: &str) {
        self.collector.add(
            Diagnostic::error(id, occurrence, format!("Prefix not found for '{text}'."))
                .with_code(codes::PREFIX_NOT_FOUND),
        );
    }

    /// Subject, predicates and IRI objects must resolve to absolute IRIs.
    pub fn check_prefixes(&mut self, id: ResourceId) {
        let Some(resource) = self.resource(id) else {
            return;
        };

        if !resource.is_blank() && !IRIREF_EXACT_RE.is_match(&resource.id) {
            for occ in &resource.id_occurrences {
                self.prefix_not_found(id, occ.occurrence, &resource.id);
            }
        }
        for s in &resource.statements {
            if !IRIREF_EXACT_RE.is_match(&s.predicate.resolved) {
                self.prefix_not_found(id, s.predicate.occurrence, &s.predicate.raw);
            }
            if s.object_kind == ObjectKind::Iri && !IRIREF_EXACT_RE.is_match(&s.object.resolved) {
                self.prefix_not_found(id, s.object.occurrence, &s.object.raw);
            }
        }
    }

    // ------------------------------------------------------------------------
    // Duplicates
    // ------------------------------------------------------------------------

    /// The same resolved predicate/object pair stated more than once.
    pub fn check_duplicates(&mut self, id: ResourceId) {
        let Some(resource) = self.resource(id) else {
            return;
        };

        let mut by_key: IndexMap<SmolStr, Vec<&Statement>> = IndexMap::new();
        for s in &resource.statements {
            let key = SmolStr::from(format!("{} {}", s.predicate.resolved, s.object.resolved));
            by_key.entry(key).or_default().push(s);
        }

        for statements in by_key.values().filter(|v| v.len() > 1) {
            for s in statements {
                let mut diag = Diagnostic::info(id, s.object.occurrence, DUPLICATE_MESSAGE)
                    .with_code(codes::DUPLICATE_STATEMENT);
                for other in statements.iter().filter(|o| o.id != s.id) {
                    diag = diag.with_related(RelatedInfo::new(
                        id,
                        other.object.occurrence,
                        format!("{} {}", other.predicate.raw, other.object.raw),
                    ));
                }
                self.collector.add(diag);
            }
        }
    }

    // ------------------------------------------------------------------------
    // Recursion
    // ------------------------------------------------------------------------

    fn broader_edges(&self, id: ResourceId) -> Vec<Edge> {
        let Some(resource) = self.resource(id) else {
            return Vec::new();
        };
        resource
            .references
            .iter()
            .filter(|r| r.leads_up())
            .map(|r| Edge {
                target: r.target,
                occurrence: r.occurrence,
                owner: match r.direction {
                    Direction::Internal => id,
                    Direction::External => r.target,
                },
            })
            .collect()
    }

    /// Cycles of broader-like edges reachable from `id`.
    pub fn check_recursion(&mut self, id: ResourceId) {
        let mut loops = Vec::new();
        self.walk_ancestors(id, &mut Vec::new(), &mut Vec::new(), &mut loops);

        for cycle in loops {
            for (i, edge) in cycle.iter().enumerate() {
                let mut diag = Diagnostic::error(edge.owner, edge.occurrence, RECURSION_MESSAGE)
                    .with_code(codes::HIERARCHICAL_RECURSION);
                for (j, other) in cycle.iter().enumerate() {
                    if i != j {
                        let name = self
                            .resource(other.owner)
                            .map(|r| r.id.as_str())
                            .unwrap_or_default();
                        diag = diag.with_related(RelatedInfo::new(
                            other.owner,
                            other.occurrence,
                            name,
                        ));
                    }
                }
                self.collector.add(diag);
            }
        }
    }

    /// Depth-first walk up from `id`. `nodes[k]` is the source of `path[k]`;
    /// an edge back to a node on the stack closes the loop running from it.
    fn walk_ancestors(
        &mut self,
        id: ResourceId,
        nodes: &mut Vec<ResourceId>,
        path: &mut Vec<Edge>,
        loops: &mut Vec<Vec<Edge>>,
    ) {
        if self.checked.contains(&id) {
            return;
        }
        nodes.push(id);
        for edge in self.broader_edges(id) {
            match nodes.iter().position(|&n| n == edge.target) {
                Some(pos) => {
                    let mut cycle = path[pos..].to_vec();
                    cycle.push(edge);
                    loops.push(cycle);
                }
                None => {
                    path.push(edge);
                    self.walk_ancestors(edge.target, nodes, path, loops);
                    path.pop();
                }
            }
        }
        nodes.pop();
        self.checked.insert(id);
    }
}

// ============================================================================
// ENTRY POINTS
// ============================================================================

/// Diagnostics of `ids`, without touching any store.
pub fn collect_diagnostics(graph: &ResourceGraph, ids: &[ResourceId]) -> Vec<Diagnostic> {
    let mut checker = SemanticChecker::new(graph);
    checker.check(ids, |_| {});
    checker.finish().take()
}

/// Re-check `subset` (or the whole graph) and update `store`.
///
/// Diagnostics owned by the checked resources are dropped first; the set is
/// widened by every owner cross-linked with it through related information,
/// so a broken cycle clears on all its members. Returns the checked set.
pub fn check_semantics(
    graph: &ResourceGraph,
    store: &mut DiagnosticStore,
    subset: Option<&[ResourceId]>,
    progress: impl FnMut(f32),
) -> Vec<ResourceId> {
    store.retain_owners(|owner| graph.contains(owner));

    let mut scope: FxHashSet<ResourceId> = match subset {
        Some(ids) => ids.iter().copied().collect(),
        None => graph.ids().collect(),
    };
    let linked = store.cross_linked_owners(&scope);
    scope.extend(linked);
    store.remove_owned_by(&scope);

    let mut ids: Vec<ResourceId> = scope.into_iter().filter(|&id| graph.contains(id)).collect();
    ids.sort();

    let mut checker = SemanticChecker::new(graph);
    checker.check(&ids, progress);
    let mut collector = checker.finish();
    tracing::debug!(
        checked = ids.len(),
        errors = collector.error_count(),
        warnings = collector.warning_count(),
        "semantic checks finished"
    );
    store.extend(collector.take());
    ids
}
