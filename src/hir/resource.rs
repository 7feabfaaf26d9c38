//! Resources, statements and typed references.

use std::fmt;

use smol_str::SmolStr;

use crate::base::vocab::{
    BROADER, COLLECTION, CONCEPT, CONCEPT_SCHEME, HAS_TOP_CONCEPT, IN_SCHEME, MEMBER, NARROWER,
    NOTATION, PREF_LABEL, RDF_TYPE, TOP_CONCEPT_OF,
};
use crate::parser::ObjectKind;
use crate::syntax::Occurrence;

use super::options::HierarchyPredicates;

// ============================================================================
// IDS
// ============================================================================

macro_rules! index_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub(crate) u32);

        impl $name {
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }
    };
}

index_id!(
    /// Slot of a resource in the graph arena. Never reused.
    ResourceId
);
index_id!(
    /// Identity of one predicate/object statement across the whole graph.
    StatementId
);
index_id!(
    /// Identity of one parsed subject block.
    BlockId
);

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "r{}", self.0)
    }
}

// ============================================================================
// CLASSIFICATION
// ============================================================================

/// SKOS class a resource declares through `rdf:type`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SubjectType {
    ConceptScheme,
    Collection,
    Concept,
    Unclassified,
}

impl SubjectType {
    pub fn from_iri(iri: &str) -> Self {
        match iri {
            CONCEPT => Self::Concept,
            CONCEPT_SCHEME => Self::ConceptScheme,
            COLLECTION => Self::Collection,
            _ => Self::Unclassified,
        }
    }

    pub fn display(&self) -> &'static str {
        match self {
            Self::Concept => "skos:Concept",
            Self::ConceptScheme => "skos:ConceptScheme",
            Self::Collection => "skos:Collection",
            Self::Unclassified => "unclassified",
        }
    }
}

/// Semantic relation a predicate stands for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PredicateKind {
    Unclassified,
    Type,
    Label,
    Notation,
    Broader,
    /// `skos:inScheme` and `skos:topConceptOf`.
    InScheme,
    HasTopConcept,
    Narrower,
    Member,
}

impl PredicateKind {
    /// Classify a resolved predicate IRI.
    ///
    /// Custom hierarchical predicates count as `Broader`/`Narrower`.
    pub fn classify(iri: &str, custom: &HierarchyPredicates) -> Self {
        match iri {
            RDF_TYPE => Self::Type,
            PREF_LABEL => Self::Label,
            NOTATION => Self::Notation,
            BROADER => Self::Broader,
            IN_SCHEME | TOP_CONCEPT_OF => Self::InScheme,
            HAS_TOP_CONCEPT => Self::HasTopConcept,
            NARROWER => Self::Narrower,
            MEMBER => Self::Member,
            _ if custom.is_broader(iri) => Self::Broader,
            _ if custom.is_narrower(iri) => Self::Narrower,
            _ => Self::Unclassified,
        }
    }

    /// Whether statements of this kind link the subject to another resource.
    pub fn is_relation(&self) -> bool {
        matches!(
            self,
            Self::Broader | Self::InScheme | Self::HasTopConcept | Self::Narrower | Self::Member
        )
    }
}

/// Direction of a hierarchical edge, seen from the declaring subject.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Hierarchy {
    /// The object is an ancestor of the subject.
    Up,
    /// The object is a descendant of the subject.
    Down,
}

impl Hierarchy {
    pub fn of(kind: PredicateKind, predicate: &str) -> Option<Self> {
        match kind {
            PredicateKind::Broader => Some(Self::Up),
            PredicateKind::InScheme if predicate == TOP_CONCEPT_OF => Some(Self::Up),
            PredicateKind::Narrower | PredicateKind::Member | PredicateKind::HasTopConcept => {
                Some(Self::Down)
            }
            _ => None,
        }
    }
}

// ============================================================================
// STATEMENTS
// ============================================================================

/// A token with its raw and prefix-resolved text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Term {
    pub occurrence: Occurrence,
    pub raw: SmolStr,
    pub resolved: SmolStr,
}

/// One predicate/object pair of a subject block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Statement {
    pub id: StatementId,
    pub block: BlockId,
    /// The predicate-object list the pair came from.
    pub occurrence: Occurrence,
    pub predicate: Term,
    pub object: Term,
    pub object_kind: ObjectKind,
    pub literal: Option<SmolStr>,
    pub lang: Option<SmolStr>,
    pub datatype: Option<SmolStr>,
}

impl Statement {
    pub fn is_literal(&self) -> bool {
        self.object_kind == ObjectKind::Literal
    }

    pub fn has_lang(&self, lang: &str) -> bool {
        self.lang
            .as_deref()
            .is_some_and(|l| l.eq_ignore_ascii_case(lang))
    }
}

/// An occurrence contributed by one block.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlockOccurrence {
    pub block: BlockId,
    pub occurrence: Occurrence,
}

// ============================================================================
// REFERENCES
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Declared by the holder.
    Internal,
    /// Declared by the other endpoint about the holder.
    External,
}

/// A typed edge held by one endpoint.
///
/// Every internal reference from `A` to `B` is mirrored by an external
/// reference on `B` whose `target` is `A`, except when `A == B`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reference {
    pub target: ResourceId,
    pub statement: StatementId,
    /// Object occurrence of the originating statement.
    pub occurrence: Occurrence,
    pub kind: PredicateKind,
    pub hierarchy: Option<Hierarchy>,
    pub direction: Direction,
    pub icon: Option<SmolStr>,
}

impl Reference {
    /// Whether following this reference leads to an ancestor of the holder.
    pub fn leads_up(&self) -> bool {
        matches!(
            (self.direction, self.hierarchy),
            (Direction::Internal, Some(Hierarchy::Up)) | (Direction::External, Some(Hierarchy::Down))
        )
    }

    /// Whether following this reference leads to a descendant of the holder.
    pub fn leads_down(&self) -> bool {
        matches!(
            (self.direction, self.hierarchy),
            (Direction::Internal, Some(Hierarchy::Down)) | (Direction::External, Some(Hierarchy::Up))
        )
    }
}

/// A declared SKOS type and the statement declaring it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TypeDecl {
    pub ty: SubjectType,
    pub statement: StatementId,
}

// ============================================================================
// RESOURCE
// ============================================================================

/// A subject of the graph, merged over every block that mentions it.
#[derive(Clone, Debug, Default)]
pub struct Resource {
    pub id: SmolStr,
    pub types: Vec<TypeDecl>,
    pub statements: Vec<Statement>,
    /// Whole subject blocks.
    pub occurrences: Vec<BlockOccurrence>,
    /// Subject tokens.
    pub id_occurrences: Vec<BlockOccurrence>,
    pub notations: Vec<Term>,
    pub references: Vec<Reference>,
    pub description: Option<String>,
    pub icon: Option<SmolStr>,
    /// Outline node showing this resource first.
    pub tree_node: Option<SmolStr>,
    /// Uses at least one SKOS predicate.
    pub is_skos: bool,
}

impl Resource {
    pub fn new(id: impl Into<SmolStr>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn statement(&self, id: StatementId) -> Option<&Statement> {
        self.statements.iter().find(|s| s.id == id)
    }

    pub fn statements_of<'a>(
        &'a self,
        predicate: &'a str,
    ) -> impl Iterator<Item = &'a Statement> + 'a {
        self.statements
            .iter()
            .filter(move |s| s.predicate.resolved == predicate)
    }

    /// Distinct declared types, in declaration order.
    pub fn distinct_types(&self) -> Vec<SubjectType> {
        let mut types: Vec<SubjectType> = Vec::new();
        for decl in &self.types {
            if !types.contains(&decl.ty) {
                types.push(decl.ty);
            }
        }
        types
    }

    /// First declared type, `Unclassified` if none.
    pub fn primary_type(&self) -> SubjectType {
        self.types
            .first()
            .map(|t| t.ty)
            .unwrap_or(SubjectType::Unclassified)
    }

    /// First English `skos:prefLabel` literal.
    pub fn english_label(&self) -> Option<&str> {
        self.statements_of(PREF_LABEL)
            .find(|s| s.has_lang("en"))
            .and_then(|s| s.literal.as_deref())
    }

    /// English label, else the id.
    pub fn label(&self) -> &str {
        self.english_label().unwrap_or(&self.id)
    }

    pub fn is_blank(&self) -> bool {
        self.id.starts_with(super::BLANK_PREFIX) || self.id.starts_with("_:")
    }

    /// Neither textual occurrences nor references.
    pub fn is_orphan(&self) -> bool {
        self.occurrences.is_empty() && self.references.is_empty()
    }

    pub fn has_reference_for(&self, statement: StatementId) -> bool {
        self.references.iter().any(|r| r.statement == statement)
    }

    pub(crate) fn clear_evaluation(&mut self) {
        self.types.clear();
        self.notations.clear();
        self.description = None;
        self.icon = None;
        self.is_skos = false;
    }
}
