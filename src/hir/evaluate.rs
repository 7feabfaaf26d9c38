//! Turning raw statements into types, notations, icons and references.

use rustc_hash::FxHashSet;

use super::graph::{ReferencePair, ResourceGraph};
use super::options::IconTarget;
use super::resource::{Hierarchy, PredicateKind, ResourceId, SubjectType, TypeDecl};
use crate::base::vocab::is_skos_iri;

/// What one statement contributes, computed before the graph is mutated.
struct Contribution {
    kind: PredicateKind,
    hierarchy: Option<Hierarchy>,
    subject_icon: Option<String>,
    object_icon: Option<String>,
}

impl ResourceGraph {
    /// Evaluate the statements of `ids`.
    ///
    /// Every resource is reset first, so evaluating twice yields the same
    /// graph. Relation statements create their target as a placeholder when
    /// needed; other non-literal statements link to a target only if it
    /// exists. Resources created since the last call get linked from any
    /// statement elsewhere that names them.
    pub fn evaluate_predicate_objects(&mut self, ids: &[ResourceId], mut progress: impl FnMut(f32)) {
        self.reset_resource_evaluations(ids);
        let total = ids.len().max(1) as f32;

        for (i, &id) in ids.iter().enumerate() {
            self.evaluate_relations(id);
            if i % 100 == 0 {
                progress(i as f32 / total * 0.9);
            }
        }

        let mut generic: Vec<ResourceId> = ids.to_vec();
        let created: Vec<ResourceId> = self
            .take_created()
            .into_iter()
            .filter(|&c| self.contains(c))
            .collect();
        for created in created {
            if let Some(name) = self.get(created).map(|r| r.id.clone()) {
                generic.extend(self.dangling_referrers(&name));
            }
        }
        let mut seen = FxHashSet::default();
        generic.retain(|id| seen.insert(*id));
        for &id in &generic {
            self.evaluate_generic_references(id);
        }

        self.refresh_descriptions(ids);
        progress(1.0);
        tracing::debug!(count = ids.len(), "resources evaluated");
    }

    fn contribution(&self, subject: &str, predicate: &str, object: &str) -> Contribution {
        let options = self.options();
        let kind = PredicateKind::classify(predicate, &options.hierarchy);
        let mut subject_icon = None;
        let mut object_icon = None;
        for rule in &options.icons {
            if rule.matches(subject, predicate, object) {
                match rule.target {
                    IconTarget::Subject => subject_icon = Some(rule.icon.clone()),
                    IconTarget::Object => object_icon = Some(rule.icon.clone()),
                }
            }
        }
        Contribution {
            kind,
            hierarchy: Hierarchy::of(kind, predicate),
            subject_icon,
            object_icon,
        }
    }

    fn evaluate_relations(&mut self, id: ResourceId) {
        let Some(resource) = self.get(id) else {
            return;
        };
        let subject = resource.id.clone();
        let statements = resource.statements.clone();

        let mut types = Vec::new();
        let mut notations = Vec::new();
        let mut icon = None;
        let mut is_skos = false;

        for statement in &statements {
            is_skos |= is_skos_iri(&statement.predicate.resolved);
            let c = self.contribution(
                &subject,
                &statement.predicate.resolved,
                &statement.object.resolved,
            );
            if let Some(i) = c.subject_icon {
                icon = Some(i.into());
            }
            match c.kind {
                PredicateKind::Type => {
                    let ty = SubjectType::from_iri(&statement.object.resolved);
                    if ty != SubjectType::Unclassified {
                        types.push(TypeDecl {
                            ty,
                            statement: statement.id,
                        });
                    }
                }
                PredicateKind::Notation => notations.push(statement.object.clone()),
                kind if kind.is_relation() && !statement.is_literal() => {
                    let target = self.get_or_create(&statement.object.resolved);
                    self.add_reference_pair(ReferencePair {
                        source: id,
                        target,
                        statement: statement.id,
                        occurrence: statement.object.occurrence,
                        kind,
                        hierarchy: c.hierarchy,
                        icon: c.object_icon.map(Into::into),
                    });
                }
                _ => {}
            }
        }

        if let Some(resource) = self.get_mut(id) {
            resource.types = types;
            resource.notations = notations;
            resource.icon = icon;
            resource.is_skos = is_skos;
        }
    }

    fn evaluate_generic_references(&mut self, id: ResourceId) {
        let Some(resource) = self.get(id) else {
            return;
        };
        let subject = resource.id.clone();
        let pending: Vec<_> = resource
            .statements
            .iter()
            .filter(|s| !s.is_literal() && !resource.has_reference_for(s.id))
            .cloned()
            .collect();

        for statement in pending {
            let c = self.contribution(
                &subject,
                &statement.predicate.resolved,
                &statement.object.resolved,
            );
            if c.kind != PredicateKind::Unclassified {
                continue;
            }
            let Some(target) = self.lookup(&statement.object.resolved) else {
                continue;
            };
            self.add_reference_pair(ReferencePair {
                source: id,
                target,
                statement: statement.id,
                occurrence: statement.object.occurrence,
                kind: c.kind,
                hierarchy: None,
                icon: c.object_icon.map(Into::into),
            });
        }
    }

    /// Resources with an unlinked generic statement naming `name`.
    fn dangling_referrers(&self, name: &str) -> Vec<ResourceId> {
        let hierarchy = &self.options().hierarchy;
        self.iter()
            .filter(|(_, r)| {
                r.statements.iter().any(|s| {
                    !s.is_literal()
                        && s.object.resolved == name
                        && !r.has_reference_for(s.id)
                        && PredicateKind::classify(&s.predicate.resolved, hierarchy)
                            == PredicateKind::Unclassified
                })
            })
            .map(|(id, _)| id)
            .collect()
    }
}
