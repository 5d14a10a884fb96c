//! Parse errors

use rulelog_core::RuleError;

/// Syntax or validation failure, located in the source text
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("{line}:{column}: {kind}")]
pub struct ParseError {
    /// 1-based line
    pub line: usize,
    /// 1-based column, in characters
    pub column: usize,
    pub kind: ParseErrorKind,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    #[error("unrecognised input `{0}`")]
    InvalidToken(String),

    #[error("expected {expected}, found `{found}`")]
    UnexpectedToken { expected: String, found: String },

    #[error("expected {expected}, found end of input")]
    UnexpectedEnd { expected: String },

    #[error("the triple relation takes 3 terms, found {0}")]
    TripleArity(usize),

    #[error("rules are not allowed in a fact document")]
    RuleInFacts,

    #[error("fact `{0}` is not ground")]
    NonGroundFact(String),

    #[error(transparent)]
    Rule(#[from] RuleError),
}
