//! Rule model errors

/// Raised when a rule set is validated at build time
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RuleError {
    #[error("Unsafe rule `{rule}`: head variable {variable} does not occur in the body")]
    UnsafeRule { rule: String, variable: String },

    #[error("Unsafe rule `{rule}`: wildcard `_` in the head")]
    WildcardInHead { rule: String },

    #[error("Embedded fact `{fact}` is not ground")]
    NonGroundFact { fact: String },
}
