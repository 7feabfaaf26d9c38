//! RDF and SKOS IRIs, in resolved (angle-bracketed) form.

pub const SKOS_NAMESPACE: &str = "http://www.w3.org/2004/02/skos/core#";

pub const SKOS_BASE: &str = "<http://www.w3.org/2004/02/skos/core#>";

pub const RDF_TYPE: &str = "<http://www.w3.org/1999/02/22-rdf-syntax-ns#type>";

pub const CONCEPT: &str = "<http://www.w3.org/2004/02/skos/core#Concept>";
pub const CONCEPT_SCHEME: &str = "<http://www.w3.org/2004/02/skos/core#ConceptScheme>";
pub const COLLECTION: &str = "<http://www.w3.org/2004/02/skos/core#Collection>";

pub const PREF_LABEL: &str = "<http://www.w3.org/2004/02/skos/core#prefLabel>";
pub const NOTATION: &str = "<http://www.w3.org/2004/02/skos/core#notation>";
pub const BROADER: &str = "<http://www.w3.org/2004/02/skos/core#broader>";
pub const NARROWER: &str = "<http://www.w3.org/2004/02/skos/core#narrower>";
pub const MEMBER: &str = "<http://www.w3.org/2004/02/skos/core#member>";
pub const IN_SCHEME: &str = "<http://www.w3.org/2004/02/skos/core#inScheme>";
pub const TOP_CONCEPT_OF: &str = "<http://www.w3.org/2004/02/skos/core#topConceptOf>";
pub const HAS_TOP_CONCEPT: &str = "<http://www.w3.org/2004/02/skos/core#hasTopConcept>";

/// Whether a resolved IRI lies in the SKOS namespace.
pub fn is_skos_iri(iri: &str) -> bool {
    iri.strip_prefix('<')
        .is_some_and(|rest| rest.starts_with(SKOS_NAMESPACE))
}
