//! RDF / RDFS vocabulary IRIs

use crate::RdfsError;
use rulelog_core::Node;
use serde::{Deserialize, Serialize};

pub const RDFS_SUBCLASS_OF: &str = "http://www.w3.org/2000/01/rdf-schema#subClassOf";
pub const RDFS_SUBPROPERTY_OF: &str = "http://www.w3.org/2000/01/rdf-schema#subPropertyOf";
pub const RDFS_DOMAIN: &str = "http://www.w3.org/2000/01/rdf-schema#domain";
pub const RDFS_RANGE: &str = "http://www.w3.org/2000/01/rdf-schema#range";
pub const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
pub const RDFS_CLASS: &str = "http://www.w3.org/2000/01/rdf-schema#Class";
pub const RDF_PROPERTY: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#Property";

/// Schema predicates in the engine's term space
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vocabulary<T> {
    pub subclass_of: T,
    pub subproperty_of: T,
    pub domain: T,
    pub range: T,
    pub rdf_type: T,
}

impl<T> Vocabulary<T> {
    /// Convert the standard RDFS IRIs into `T`
    ///
    /// This is the one place where an external IRI becomes an engine term.
    pub fn from_iris(mut convert: impl FnMut(&str) -> T) -> Self {
        Self {
            subclass_of: convert(RDFS_SUBCLASS_OF),
            subproperty_of: convert(RDFS_SUBPROPERTY_OF),
            domain: convert(RDFS_DOMAIN),
            range: convert(RDFS_RANGE),
            rdf_type: convert(RDF_TYPE),
        }
    }

    /// Whether `predicate` is one of the four schema edge predicates
    pub fn is_schema_predicate(&self, predicate: &T) -> bool
    where
        T: PartialEq,
    {
        *predicate == self.subclass_of
            || *predicate == self.subproperty_of
            || *predicate == self.domain
            || *predicate == self.range
    }
}

impl Vocabulary<Node> {
    pub fn rdfs() -> Self {
        Self::from_iris(|iri| Node::new(iri))
    }

    /// Vocabulary with IRIs taken from configuration
    pub fn from_config(config: &VocabularyConfig) -> Result<Self, RdfsError> {
        config.validate()?;
        Ok(Self {
            subclass_of: Node::new(&config.subclass_of),
            subproperty_of: Node::new(&config.subproperty_of),
            domain: Node::new(&config.domain),
            range: Node::new(&config.range),
            rdf_type: Node::new(&config.rdf_type),
        })
    }
}

/// Configurable schema IRIs, defaulting to RDF / RDFS
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VocabularyConfig {
    pub subclass_of: String,
    pub subproperty_of: String,
    pub domain: String,
    pub range: String,
    pub rdf_type: String,
}

impl VocabularyConfig {
    /// Every role needs its own non-empty IRI
    pub fn validate(&self) -> Result<(), RdfsError> {
        let roles = [
            ("subclass_of", &self.subclass_of),
            ("subproperty_of", &self.subproperty_of),
            ("domain", &self.domain),
            ("range", &self.range),
            ("rdf_type", &self.rdf_type),
        ];

        for (i, (role, iri)) in roles.iter().enumerate() {
            if iri.trim().is_empty() {
                return Err(RdfsError::EmptyVocabularyIri { role: role.to_string() });
            }
            if let Some((other, _)) = roles[..i].iter().find(|(_, seen)| seen == iri) {
                return Err(RdfsError::DuplicateVocabularyIri {
                    iri: iri.to_string(),
                    first: other.to_string(),
                    second: role.to_string(),
                });
            }
        }
        Ok(())
    }
}

impl Default for VocabularyConfig {
    fn default() -> Self {
        Self {
            subclass_of: RDFS_SUBCLASS_OF.to_string(),
            subproperty_of: RDFS_SUBPROPERTY_OF.to_string(),
            domain: RDFS_DOMAIN.to_string(),
            range: RDFS_RANGE.to_string(),
            rdf_type: RDF_TYPE.to_string(),
        }
    }
}
