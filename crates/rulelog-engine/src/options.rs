//! Engine selection and evaluation limits

use crate::error::EngineError;
use rulelog_core::DEFAULT_VAR_BASE;
use rulelog_rdfs::VocabularyConfig;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Closed set of evaluation strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EngineKind {
    ForwardNaive,
    #[default]
    ForwardSemiNaive,
    ForwardJacobi,
    ForwardGaussSeidel,
    BackwardSld,
    BackwardQsqr,
    BackwardQsqi,
}

impl EngineKind {
    pub const ALL: [EngineKind; 7] = [
        EngineKind::ForwardNaive,
        EngineKind::ForwardSemiNaive,
        EngineKind::ForwardJacobi,
        EngineKind::ForwardGaussSeidel,
        EngineKind::BackwardSld,
        EngineKind::BackwardQsqr,
        EngineKind::BackwardQsqi,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EngineKind::ForwardNaive => "forward-naive",
            EngineKind::ForwardSemiNaive => "forward-semi-naive",
            EngineKind::ForwardJacobi => "forward-jacobi",
            EngineKind::ForwardGaussSeidel => "forward-gauss-seidel",
            EngineKind::BackwardSld => "backward-sld",
            EngineKind::BackwardQsqr => "backward-qsqr",
            EngineKind::BackwardQsqi => "backward-qsqi",
        }
    }

    pub fn is_forward(&self) -> bool {
        matches!(
            self,
            EngineKind::ForwardNaive
                | EngineKind::ForwardSemiNaive
                | EngineKind::ForwardJacobi
                | EngineKind::ForwardGaussSeidel
        )
    }

    /// Whether a factory exists for this kind
    pub fn is_implemented(&self) -> bool {
        matches!(
            self,
            EngineKind::ForwardNaive | EngineKind::ForwardSemiNaive | EngineKind::BackwardSld
        )
    }
}

impl fmt::Display for EngineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EngineKind {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EngineKind::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| EngineError::UnknownEngineKind(s.to_string()))
    }
}

/// Evaluation options, loadable from JSON
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineOptions {
    pub kind: EngineKind,
    /// Upper bound on forward rounds; unbounded when absent
    pub max_rounds: Option<usize>,
    /// Wall-clock budget for a forward run, checked between rounds
    pub timeout_ms: Option<u64>,
    /// Prefix of the variables generated by renaming
    pub var_base: String,
    /// Treat schema triples found in the data as vocabulary
    pub include_derived_data_rdfs: bool,
    pub vocabulary: VocabularyConfig,
}

impl EngineOptions {
    pub fn from_json(json: &str) -> Result<Self, EngineError> {
        let options: Self = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    /// `var_base` must be a non-empty identifier
    pub fn validate(&self) -> Result<(), EngineError> {
        let mut chars = self.var_base.chars();
        let valid = chars.next().is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
            && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
        if !valid {
            return Err(EngineError::InvalidVarBase(self.var_base.clone()));
        }
        Ok(())
    }

    pub fn with_kind(mut self, kind: EngineKind) -> Self {
        self.kind = kind;
        self
    }
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            kind: EngineKind::default(),
            max_rounds: None,
            timeout_ms: None,
            var_base: DEFAULT_VAR_BASE.to_string(),
            include_derived_data_rdfs: false,
            vocabulary: VocabularyConfig::default(),
        }
    }
}

/// Shared cancellation switch, polled between forward rounds
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    pub fn reset(&self) {
        self.0.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_kind_names_round_trip() {
        for kind in EngineKind::ALL {
            assert_eq!(kind.as_str().parse::<EngineKind>().unwrap(), kind);
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind));
        }
        assert!(matches!(
            "forward".parse::<EngineKind>(),
            Err(EngineError::UnknownEngineKind(_))
        ));
    }

    #[test]
    fn test_implemented_kinds() {
        let implemented: Vec<_> = EngineKind::ALL.into_iter().filter(EngineKind::is_implemented).collect();
        assert_eq!(
            implemented,
            vec![EngineKind::ForwardNaive, EngineKind::ForwardSemiNaive, EngineKind::BackwardSld]
        );
        assert!(EngineKind::ForwardJacobi.is_forward());
        assert!(!EngineKind::BackwardQsqr.is_forward());
    }

    #[test]
    fn test_default_options() {
        let options = EngineOptions::default();
        assert_eq!(options.kind, EngineKind::ForwardSemiNaive);
        assert_eq!(options.max_rounds, None);
        assert_eq!(options.var_base, "_v");
        assert!(!options.include_derived_data_rdfs);
    }

    #[test]
    fn test_options_from_json() {
        let options = EngineOptions::from_json(r#"{"kind": "backward-sld", "max_rounds": 12, "var_base": "_g"}"#).unwrap();
        assert_eq!(options.kind, EngineKind::BackwardSld);
        assert_eq!(options.max_rounds, Some(12));
        assert_eq!(options.var_base, "_g");
        assert_eq!(options.timeout_ms, None);

        assert!(matches!(
            EngineOptions::from_json(r#"{"kind": "sideways"}"#),
            Err(EngineError::InvalidOptions(_))
        ));
    }

    #[test]
    fn test_var_base_must_be_an_identifier() {
        for base in ["", "?v", "v#", "9v", "a b"] {
            let json = format!(r#"{{"var_base": "{}"}}"#, base);
            assert!(matches!(
                EngineOptions::from_json(&json),
                Err(EngineError::InvalidVarBase(_))
            ));
        }
        assert!(EngineOptions::from_json(r#"{"var_base": "_fresh_1"}"#).is_ok());
        assert!(EngineOptions::default().validate().is_ok());
    }

    #[test]
    fn test_cancel_flag_is_shared() {
        let flag = CancelFlag::new();
        let handle = flag.clone();
        assert!(!flag.is_cancelled());
        handle.cancel();
        assert!(flag.is_cancelled());
        flag.reset();
        assert!(!handle.is_cancelled());
    }
}
