//! The resource graph: an arena of resources keyed by resolved IRI.
//!
//! Resources are addressed by [`ResourceId`], a slot in the arena that is
//! never reused. References between resources hold ids, never pointers, so
//! removing a resource only ever requires dropping the references that
//! mention it.

use indexmap::IndexMap;
use rustc_hash::FxHashSet;
use smol_str::SmolStr;
use text_size::{TextRange, TextSize};

use super::options::EvaluationOptions;
use super::resource::{
    BlockId, Direction, Hierarchy, PredicateKind, Reference, Resource, ResourceId, StatementId,
};
use super::BLANK_PREFIX;
use crate::base::FileId;
use crate::parser::grammar::{NON_BLANK_RE, TERMINATOR_RE};
use crate::syntax::{ContentChange, Document, Occurrence, connect_ranges};

/// Outcome of feeding one document's content changes to the graph.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChangeImpact {
    /// Resources that lost at least one block.
    pub affected: Vec<ResourceId>,
    /// Merged re-parse windows, in post-edit offsets.
    pub windows: Vec<TextRange>,
}

/// Both endpoints and the payload of a new reference pair.
pub(crate) struct ReferencePair {
    pub source: ResourceId,
    pub target: ResourceId,
    pub statement: StatementId,
    pub occurrence: Occurrence,
    pub kind: PredicateKind,
    pub hierarchy: Option<Hierarchy>,
    pub icon: Option<SmolStr>,
}

#[derive(Clone, Debug, Default)]
pub struct ResourceGraph {
    /// The single owner of every resource; `None` marks a collected slot.
    resources: Vec<Option<Resource>>,
    /// Resolved IRI → slot (insertion ordered).
    by_id: IndexMap<SmolStr, ResourceId>,
    next_statement: u32,
    next_block: u32,
    next_blank: u32,
    /// Resources created since the last evaluation.
    created: Vec<ResourceId>,
    options: EvaluationOptions,
}

impl ResourceGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: EvaluationOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    pub fn options(&self) -> &EvaluationOptions {
        &self.options
    }

    pub fn set_options(&mut self, options: EvaluationOptions) {
        self.options = options;
    }

    // ------------------------------------------------------------------------
    // Registry
    // ------------------------------------------------------------------------

    /// Number of live resources.
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    pub fn contains(&self, id: ResourceId) -> bool {
        self.get(id).is_some()
    }

    pub fn get(&self, id: ResourceId) -> Option<&Resource> {
        self.resources.get(id.index()).and_then(Option::as_ref)
    }

    pub(crate) fn get_mut(&mut self, id: ResourceId) -> Option<&mut Resource> {
        self.resources.get_mut(id.index()).and_then(Option::as_mut)
    }

    /// Slot of the resource named `name`.
    pub fn lookup(&self, name: &str) -> Option<ResourceId> {
        self.by_id.get(name).copied()
    }

    pub fn resource(&self, name: &str) -> Option<&Resource> {
        self.lookup(name).and_then(|id| self.get(id))
    }

    /// Live resource ids, in insertion order.
    pub fn ids(&self) -> impl Iterator<Item = ResourceId> + '_ {
        self.by_id.values().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ResourceId, &Resource)> + '_ {
        self.ids().filter_map(|id| self.get(id).map(|r| (id, r)))
    }

    /// Register `resource`, merging it into an existing one of the same name.
    pub fn add_resource(&mut self, resource: Resource) -> ResourceId {
        if let Some(id) = self.lookup(&resource.id) {
            if let Some(existing) = self.get_mut(id) {
                existing.statements.extend(resource.statements);
                existing.occurrences.extend(resource.occurrences);
                existing.id_occurrences.extend(resource.id_occurrences);
            }
            return id;
        }
        let id = ResourceId(self.resources.len() as u32);
        self.by_id.insert(resource.id.clone(), id);
        self.resources.push(Some(resource));
        self.created.push(id);
        id
    }

    /// Slot of `name`, creating an empty placeholder when unknown.
    pub fn get_or_create(&mut self, name: &str) -> ResourceId {
        match self.lookup(name) {
            Some(id) => id,
            None => self.add_resource(Resource::new(name)),
        }
    }

    pub(crate) fn take_created(&mut self) -> Vec<ResourceId> {
        std::mem::take(&mut self.created)
    }

    pub(crate) fn next_statement_id(&mut self) -> StatementId {
        self.next_statement += 1;
        StatementId(self.next_statement)
    }

    pub(crate) fn next_block_id(&mut self) -> BlockId {
        self.next_block += 1;
        BlockId(self.next_block)
    }

    /// A fresh name for an anonymous subject.
    pub(crate) fn next_blank_name(&mut self) -> SmolStr {
        self.next_blank += 1;
        SmolStr::from(format!("{BLANK_PREFIX}{}", self.next_blank))
    }

    pub fn set_tree_node(&mut self, id: ResourceId, node: Option<SmolStr>) {
        if let Some(resource) = self.get_mut(id) {
            resource.tree_node = node;
        }
    }

    // ------------------------------------------------------------------------
    // References
    // ------------------------------------------------------------------------

    pub(crate) fn add_reference_pair(&mut self, pair: ReferencePair) {
        let internal = Reference {
            target: pair.target,
            statement: pair.statement,
            occurrence: pair.occurrence,
            kind: pair.kind,
            hierarchy: pair.hierarchy,
            direction: Direction::Internal,
            icon: pair.icon,
        };
        if pair.source != pair.target {
            let external = Reference {
                target: pair.source,
                direction: Direction::External,
                ..internal.clone()
            };
            if let Some(target) = self.get_mut(pair.target) {
                target.references.push(external);
            }
        }
        tracing::trace!(
            source = %pair.source,
            target = %pair.target,
            kind = ?pair.kind,
            "reference added"
        );
        if let Some(source) = self.get_mut(pair.source) {
            source.references.push(internal);
        }
    }

    /// Drop every reference `id` declared, together with its mirror, and clear
    /// everything evaluation derived for it.
    pub fn reset_resource_evaluations(&mut self, ids: &[ResourceId]) {
        for &id in ids {
            let Some(resource) = self.get_mut(id) else {
                continue;
            };
            let internal: Vec<(ResourceId, StatementId)> = resource
                .references
                .iter()
                .filter(|r| r.direction == Direction::Internal)
                .map(|r| (r.target, r.statement))
                .collect();
            resource
                .references
                .retain(|r| r.direction != Direction::Internal);
            resource.clear_evaluation();

            for (target, statement) in internal {
                if target == id {
                    continue;
                }
                if let Some(other) = self.get_mut(target) {
                    other.references.retain(|r| {
                        !(r.direction == Direction::External && r.statement == statement)
                    });
                }
            }
        }
    }

    // ------------------------------------------------------------------------
    // Damage tracking
    // ------------------------------------------------------------------------

    /// Remove every block that touches one of `edited`.
    ///
    /// Returns the resources that lost a block.
    pub fn remove_intersecting_occurrences(&mut self, edited: &[Occurrence]) -> Vec<ResourceId> {
        self.remove_blocks_where(|occurrence| {
            edited
                .iter()
                .any(|e| occurrence.intersects(e.file, e.range))
        })
    }

    /// Remove every block of `file`.
    pub fn remove_file_blocks(&mut self, file: FileId) -> Vec<ResourceId> {
        self.remove_blocks_where(|occurrence| occurrence.file == file)
    }

    fn remove_blocks_where(&mut self, hit: impl Fn(&Occurrence) -> bool) -> Vec<ResourceId> {
        let mut affected = Vec::new();
        for (idx, slot) in self.resources.iter_mut().enumerate() {
            let Some(resource) = slot else { continue };
            let blocks: Vec<BlockId> = resource
                .occurrences
                .iter()
                .filter(|o| hit(&o.occurrence))
                .map(|o| o.block)
                .collect();
            if blocks.is_empty() {
                continue;
            }
            resource.occurrences.retain(|o| !blocks.contains(&o.block));
            resource.id_occurrences.retain(|o| !blocks.contains(&o.block));
            resource.statements.retain(|s| !blocks.contains(&s.block));
            affected.push(ResourceId(idx as u32));
        }
        affected
    }

    /// Remove the blocks of `file` that the text around `change` may continue.
    ///
    /// Walking backwards, a block is continued when it lacks a final `.` or
    /// only whitespace and comments lie between it and the change. Walking
    /// forwards, a block is continued when no statement terminator lies
    /// between the change and it. `source` is the text before the change.
    pub fn remove_continued_blocks(
        &mut self,
        file: FileId,
        change: &ContentChange,
        source: &str,
    ) -> Vec<ResourceId> {
        let edited = change.range();
        let mut affected = Vec::new();

        while let Some(block) = self.nearest_block(file, |r| r.end() <= edited.start(), true) {
            let closed = Occurrence::new(file, block).text(source).trim_end().ends_with('.');
            let gap = Occurrence::new(file, TextRange::new(block.end(), edited.start()));
            if closed && !gap.sub_occurrences(source, &NON_BLANK_RE, true).is_empty() {
                break;
            }
            affected.extend(self.remove_blocks_where(|o| o.file == file && o.range == block));
        }

        while let Some(block) = self.nearest_block(file, |r| r.start() >= edited.end(), false) {
            let gap = Occurrence::new(file, TextRange::new(edited.end(), block.start()));
            if !gap.sub_occurrences(source, &TERMINATOR_RE, true).is_empty() {
                break;
            }
            affected.extend(self.remove_blocks_where(|o| o.file == file && o.range == block));
        }
        affected
    }

    /// Range of the block of `file` matching `side` that lies closest to the
    /// change: the latest ending one when `before`, else the earliest starting.
    fn nearest_block(
        &self,
        file: FileId,
        side: impl Fn(TextRange) -> bool,
        before: bool,
    ) -> Option<TextRange> {
        let ranges = self
            .iter()
            .flat_map(|(_, r)| r.occurrences.iter().map(|o| o.occurrence))
            .filter(|o| o.file == file && side(o.range))
            .map(|o| o.range);
        if before {
            ranges.max_by_key(|r| (r.end(), r.start()))
        } else {
            ranges.min_by_key(|r| (r.start(), r.end()))
        }
    }

    /// The re-parse window for `change`, in pre-edit offsets.
    ///
    /// Spans from the end of the nearest block of `file` ending at or before
    /// the change to the start of the nearest block starting at or after it.
    /// Blocks touched by the change must already be removed.
    pub fn window_for_change(
        &self,
        file: FileId,
        change: &ContentChange,
        document_len: TextSize,
    ) -> TextRange {
        let edited = change.range();
        let mut lower = TextSize::from(0);
        let mut upper = document_len;
        for (_, resource) in self.iter() {
            for occ in resource.occurrences.iter().map(|o| o.occurrence) {
                if occ.file != file {
                    continue;
                }
                if occ.range.end() <= edited.start() {
                    lower = lower.max(occ.range.end());
                }
                if occ.range.start() >= edited.end() {
                    upper = upper.min(occ.range.start());
                }
            }
        }
        TextRange::new(lower, upper.max(lower).max(edited.end()))
    }

    /// Feed the content changes of one document through the graph.
    ///
    /// `document` holds the text before the first change. Per change, in
    /// order: blocks touching or continued by it are removed, its window is
    /// computed from the still stale offsets, then every location and every
    /// earlier window is shifted through it.
    pub fn new_locations_to_parse(
        &mut self,
        file: FileId,
        changes: &[ContentChange],
        document: &Document,
    ) -> ChangeImpact {
        let mut affected = FxHashSet::default();
        let mut windows: Vec<TextRange> = Vec::with_capacity(changes.len());
        let mut document = document.clone();

        for change in changes {
            let edited = Occurrence::new(file, change.range());
            affected.extend(self.remove_intersecting_occurrences(&[edited]));
            affected.extend(self.remove_continued_blocks(file, change, document.text()));
            let window = self.window_for_change(file, change, document.len());
            for window in &mut windows {
                *window = change.adjust_range(*window);
            }
            // the window spans the change, so its end moves with the edit
            let end = window.end() - change.range_length + change.inserted_len();
            windows.push(TextRange::new(window.start(), end));
            self.adjust_locations(file, change);
            document.apply_change(change);
        }

        let mut affected: Vec<ResourceId> = affected.into_iter().collect();
        affected.sort();
        ChangeImpact {
            affected,
            windows: connect_ranges(windows),
        }
    }

    /// Shift every tracked occurrence of `file` through `change`.
    pub fn adjust_locations(&mut self, file: FileId, change: &ContentChange) {
        for resource in self.resources.iter_mut().flatten() {
            for o in resource
                .occurrences
                .iter_mut()
                .chain(resource.id_occurrences.iter_mut())
            {
                o.occurrence.adjust(file, change);
            }
            for s in &mut resource.statements {
                s.occurrence.adjust(file, change);
                s.predicate.occurrence.adjust(file, change);
                s.object.occurrence.adjust(file, change);
            }
            for n in &mut resource.notations {
                n.occurrence.adjust(file, change);
            }
            for r in &mut resource.references {
                r.occurrence.adjust(file, change);
            }
        }
    }

    /// Collect resources without occurrences that nothing but generic
    /// references keep alive.
    ///
    /// Returns the names of the removed resources.
    pub fn remove_resources_without_occurrence_or_reference(&mut self) -> Vec<SmolStr> {
        let doomed: Vec<ResourceId> = self
            .iter()
            .filter(|(_, r)| {
                r.occurrences.is_empty()
                    && r.references.iter().all(|reference| {
                        reference.direction == Direction::External
                            && reference.kind == PredicateKind::Unclassified
                    })
            })
            .map(|(id, _)| id)
            .collect();

        let mut removed = Vec::with_capacity(doomed.len());
        for id in doomed {
            let Some(resource) = self.resources.get_mut(id.index()).and_then(Option::take) else {
                continue;
            };
            for reference in &resource.references {
                if let Some(referrer) = self.get_mut(reference.target) {
                    referrer
                        .references
                        .retain(|r| r.statement != reference.statement);
                }
            }
            self.by_id.shift_remove(&resource.id);
            removed.push(resource.id);
        }
        if !removed.is_empty() {
            tracing::debug!(count = removed.len(), "resources collected");
        }
        removed
    }

    // ------------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------------

    /// Resources with a block touching `range` of `file`.
    pub fn intersection_resources(&self, file: FileId, range: TextRange) -> Vec<ResourceId> {
        self.iter()
            .filter(|(_, r)| {
                r.occurrences
                    .iter()
                    .any(|o| o.occurrence.intersects(file, range))
            })
            .map(|(id, _)| id)
            .collect()
    }

    pub fn label(&self, id: ResourceId) -> &str {
        self.get(id).map(Resource::label).unwrap_or_default()
    }

    fn neighbours(&self, id: ResourceId, up: bool) -> Vec<ResourceId> {
        let mut result = Vec::new();
        let Some(resource) = self.get(id) else {
            return result;
        };
        for r in &resource.references {
            let follows = if up { r.leads_up() } else { r.leads_down() };
            if follows && r.target != id && !result.contains(&r.target) && self.contains(r.target) {
                result.push(r.target);
            }
        }
        result
    }

    /// Direct ancestors through broader-like edges.
    pub fn parents(&self, id: ResourceId) -> Vec<ResourceId> {
        self.neighbours(id, true)
    }

    /// Direct descendants through narrower-like edges.
    pub fn children(&self, id: ResourceId) -> Vec<ResourceId> {
        self.neighbours(id, false)
    }

    /// Resources without ancestors.
    pub fn roots(&self) -> Vec<ResourceId> {
        self.ids().filter(|&id| self.parents(id).is_empty()).collect()
    }

    /// `id` followed by all its descendants, depth first, each once.
    pub fn subtree(&self, id: ResourceId) -> Vec<ResourceId> {
        let mut seen = FxHashSet::default();
        let mut result = Vec::new();
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            if !self.contains(next) || !seen.insert(next) {
                continue;
            }
            result.push(next);
            let mut children = self.children(next);
            children.reverse();
            stack.extend(children);
        }
        result
    }

    /// Every path from a root down to `id`, cycle guarded.
    pub fn ancestor_paths(&self, id: ResourceId) -> Vec<Vec<ResourceId>> {
        let mut paths = Vec::new();
        let mut path = vec![id];
        self.collect_paths(id, &mut path, &mut paths);
        for p in &mut paths {
            p.reverse();
        }
        paths
    }

    fn collect_paths(
        &self,
        id: ResourceId,
        path: &mut Vec<ResourceId>,
        paths: &mut Vec<Vec<ResourceId>>,
    ) {
        let parents: Vec<ResourceId> = self
            .parents(id)
            .into_iter()
            .filter(|p| !path.contains(p))
            .collect();
        if parents.is_empty() {
            paths.push(path.clone());
            return;
        }
        for parent in parents {
            path.push(parent);
            self.collect_paths(parent, path, paths);
            path.pop();
        }
    }

    /// Markdown description: the label, then every root path as a nested list.
    pub fn describe(&self, id: ResourceId) -> String {
        let mut out = format!("{}\n---\n", self.label(id));
        for path in self.ancestor_paths(id) {
            for (depth, step) in path.iter().enumerate() {
                out.push_str(&"    ".repeat(depth));
                out.push_str("- ");
                out.push_str(self.label(*step));
                out.push('\n');
            }
        }
        out
    }

    /// Recompute the cached description of `ids` and all their descendants.
    pub fn refresh_descriptions(&mut self, ids: &[ResourceId]) {
        let mut seen = FxHashSet::default();
        let mut targets = Vec::new();
        for &id in ids {
            for member in self.subtree(id) {
                if seen.insert(member) {
                    targets.push(member);
                }
            }
        }
        for id in targets {
            let description = self.describe(id);
            if let Some(resource) = self.get_mut(id) {
                resource.description = Some(description);
            }
        }
    }

    /// Icon of `id`: its own, else one an object rule attached to a
    /// reference pointing at it.
    pub fn icon(&self, id: ResourceId) -> Option<&str> {
        let resource = self.get(id)?;
        resource.icon.as_deref().or_else(|| {
            resource
                .references
                .iter()
                .filter(|r| r.direction == Direction::External)
                .find_map(|r| r.icon.as_deref())
        })
    }
}
