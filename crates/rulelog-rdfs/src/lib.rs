//! RDFS (RDF Schema) reasoning for rulelog
//!
//! This crate implements the schema side of RDFS:
//! - transitive closure of rdfs:subClassOf
//! - transitive closure of rdfs:subPropertyOf
//! - rdfs:domain and rdfs:range indices
//! - rdf:type entailment from the closures

pub mod entailment;
pub mod taxonomy;
pub mod vocabulary;

pub use entailment::RdfsEntailment;
pub use taxonomy::Taxonomy;
pub use vocabulary::{Vocabulary, VocabularyConfig};

/// RDFS configuration errors
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RdfsError {
    #[error("vocabulary IRI for {role} is empty")]
    EmptyVocabularyIri { role: String },

    #[error("vocabulary IRI {iri} is used for both {first} and {second}")]
    DuplicateVocabularyIri { iri: String, first: String, second: String },
}
