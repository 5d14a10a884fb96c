//! Engine errors

use crate::options::EngineKind;

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("Missing required field `{0}`")]
    MissingField(&'static str),

    #[error("Engine kind `{0}` has no implementation")]
    UnsupportedEngine(EngineKind),

    #[error("Engine kind `{0}` does not apply RDFS entailment; drop the taxonomy or pick a forward kind")]
    TaxonomyUnsupported(EngineKind),

    #[error("Invalid variable base `{0}`: expected an identifier")]
    InvalidVarBase(String),

    #[error("Unknown engine kind `{0}`")]
    UnknownEngineKind(String),

    #[error("Rule set is recursive ({cycle}); the SLD resolver only accepts acyclic predicate dependencies")]
    RecursiveRuleSet { cycle: String },

    #[error("Round limit ({0}) reached before fixpoint")]
    RoundLimit(usize),

    #[error("Evaluation timeout after {0}ms")]
    Timeout(u64),

    #[error("Evaluation cancelled")]
    Cancelled,

    #[error("Invalid rule set: {0}")]
    Rule(#[from] rulelog_core::RuleError),

    #[error("Invalid vocabulary: {0}")]
    Rdfs(#[from] rulelog_rdfs::RdfsError),

    #[error("Invalid engine options: {0}")]
    InvalidOptions(#[from] serde_json::Error),
}
