//! # Rulelog Engine
//!
//! Evaluators for rule sets over ground fact stores:
//! - forward chaining to a fixpoint, naive or semi-naive
//! - goal-directed SLD resolution for acyclic rule sets
//! - an inference view answering patterns over base data plus rules
//!
//! Engines are selected by [`EngineKind`] through [`EngineBuilder`].

pub mod backward;
pub mod depgraph;
pub mod engine;
pub mod error;
pub mod forward;
pub mod options;
pub mod query;
pub mod view;

pub use backward::{SldResolver, Solutions};
pub use depgraph::{DependencyGraph, PredicateKey};
pub use engine::{exec_with_stats, Answers, EngineBuilder, Reasoner};
pub use error::EngineError;
pub use forward::{ChainStats, ForwardChainer};
pub use options::{CancelFlag, EngineKind, EngineOptions};
pub use query::BodyQuery;
pub use view::{InferenceView, InferenceViewBuilder};
