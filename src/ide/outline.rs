//! Outline tree of schemes, collections and concepts.

use std::cmp::Ordering;

use smol_str::SmolStr;

use crate::hir::{ResourceGraph, ResourceId, SubjectType};

/// Labels starting with one of these sort after all others.
const SUBORDERED_START: [char; 3] = ['_', '<', ':'];

/// One node of the outline.
///
/// A resource with several parents shows up once below each of them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutlineNode {
    pub resource: ResourceId,
    /// Unique per node: parent concept and own concept joined by `/`.
    pub id: SmolStr,
    pub concept: SmolStr,
    pub label: String,
    pub ty: SubjectType,
    /// Notations joined by `,`.
    pub description: String,
    pub icon: Option<SmolStr>,
    pub children: Vec<OutlineNode>,
}

impl OutlineNode {
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Preorder walk over this node and its descendants.
    pub fn walk(&self, f: &mut impl FnMut(&OutlineNode)) {
        f(self);
        for child in &self.children {
            child.walk(f);
        }
    }
}

/// Default icon of a type when no custom icon applies.
pub fn default_icon(ty: SubjectType) -> Option<&'static str> {
    match ty {
        SubjectType::ConceptScheme => Some("dependency"),
        SubjectType::Collection => Some("folder"),
        SubjectType::Concept | SubjectType::Unclassified => None,
    }
}

/// Build the outline from every resource without a parent.
///
/// Roots are grouped schemes, collections, concepts, then untyped; each
/// level is sorted by label.
pub fn build_outline(graph: &ResourceGraph) -> Vec<OutlineNode> {
    let mut path = Vec::new();
    let mut roots: Vec<OutlineNode> = graph
        .roots()
        .into_iter()
        .filter_map(|id| build_node(graph, id, "", &mut path))
        .collect();
    roots.sort_by(compare_nodes);
    roots
}

fn build_node(
    graph: &ResourceGraph,
    id: ResourceId,
    parent: &str,
    path: &mut Vec<ResourceId>,
) -> Option<OutlineNode> {
    let resource = graph.get(id)?;
    path.push(id);
    let next: Vec<ResourceId> = graph
        .children(id)
        .into_iter()
        .filter(|child| !path.contains(child))
        .collect();
    let mut children: Vec<OutlineNode> = next
        .into_iter()
        .filter_map(|child| build_node(graph, child, &resource.id, path))
        .collect();
    path.pop();
    children.sort_by(compare_nodes);

    let ty = resource.primary_type();
    let icon = graph
        .icon(id)
        .map(SmolStr::from)
        .or_else(|| default_icon(ty).map(SmolStr::new_static));
    let description = resource
        .notations
        .iter()
        .map(|n| n.raw.as_str())
        .collect::<Vec<_>>()
        .join(",");

    Some(OutlineNode {
        resource: id,
        id: SmolStr::from(format!("{parent}/{}", resource.id)),
        concept: resource.id.clone(),
        label: resource.label().to_string(),
        ty,
        description,
        icon,
        children,
    })
}

fn type_rank(ty: SubjectType) -> u8 {
    match ty {
        SubjectType::ConceptScheme => 0,
        SubjectType::Collection => 1,
        SubjectType::Concept => 2,
        SubjectType::Unclassified => 3,
    }
}

fn is_subordered(label: &str) -> bool {
    label.starts_with(SUBORDERED_START)
}

/// Type group first, then labels with a plain start before the others,
/// then the label itself.
pub fn compare_nodes(a: &OutlineNode, b: &OutlineNode) -> Ordering {
    type_rank(a.ty)
        .cmp(&type_rank(b.ty))
        .then_with(|| is_subordered(&a.label).cmp(&is_subordered(&b.label)))
        .then_with(|| a.label.cmp(&b.label))
}

/// Point every resource at the first node showing it, in preorder.
pub fn link_tree_nodes(graph: &mut ResourceGraph, outline: &[OutlineNode]) {
    let ids: Vec<ResourceId> = graph.ids().collect();
    for id in ids {
        graph.set_tree_node(id, None);
    }
    let mut first: Vec<(ResourceId, SmolStr)> = Vec::new();
    for root in outline {
        root.walk(&mut |node| {
            if !first.iter().any(|(id, _)| *id == node.resource) {
                first.push((node.resource, node.id.clone()));
            }
        });
    }
    for (id, node) in first {
        graph.set_tree_node(id, Some(node));
    }
}
