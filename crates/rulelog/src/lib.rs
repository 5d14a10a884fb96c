//! # Rulelog - Rule Engine for Relations and Triples
//!
//! Rulelog evaluates Datalog-style rules over ground relations and RDF
//! triples. Rules can be run to a fixpoint with naive or semi-naive
//! forward chaining, or answered on demand by SLD resolution over
//! acyclic rule sets. An RDFS taxonomy closure supplies subclass,
//! subproperty, domain and range reasoning.
//!
//! ## Quick Start
//!
//! ```rust
//! use rulelog::prelude::*;
//!
//! let rules = parse_rule_set(
//!     "ancestor(?x, ?y) <- parent(?x, ?y) .
//!      ancestor(?x, ?z) <- ancestor(?x, ?y), parent(?y, ?z) .",
//! )?;
//! let data = parse_facts("parent(:ann, :bob) . parent(:bob, :cid) .")?;
//!
//! let engine = EngineBuilder::new()
//!     .kind(EngineKind::ForwardSemiNaive)
//!     .rules(rules)
//!     .build()?;
//! let closure = engine.exec(&data)?;
//! assert_eq!(closure.len(), 5);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Architecture
//!
//! - **`rulelog-core`**: terms, relations, rules, bindings and unification
//! - **`rulelog-store`**: ground fact store and union views
//! - **`rulelog-rdfs`**: RDFS vocabulary, taxonomy closure and entailment
//! - **`rulelog-rules`**: textual syntax for rule sets and fact documents
//! - **`rulelog-engine`**: forward and backward evaluators, inference view
//! - **`rulelog-cli`**: the `rulelog` command-line tool
//!
//! ## Feature Flags
//!
//! - `full` (default): All crates included
//! - `core`: Only the data model
//! - `store`: Fact store
//! - `rdfs`: Taxonomy closure and RDFS entailment
//! - `rules`: Rule syntax
//! - `engine`: Evaluators and inference view
//! - `cli`: Command-line library

#[cfg(feature = "rulelog-core")]
pub use rulelog_core as core;

#[cfg(feature = "rulelog-store")]
pub use rulelog_store as store;

#[cfg(feature = "rulelog-rdfs")]
pub use rulelog_rdfs as rdfs;

#[cfg(feature = "rulelog-rules")]
pub use rulelog_rules as rules;

#[cfg(feature = "rulelog-engine")]
pub use rulelog_engine as engine;

#[cfg(feature = "rulelog-cli")]
pub use rulelog_cli as cli;

// Convenience re-exports for common types (feature-gated)
#[cfg(feature = "rulelog-core")]
pub use rulelog_core::{Binding, Node, Rel, Rule, RuleError, RuleSet, Term, Var};

#[cfg(feature = "rulelog-store")]
pub use rulelog_store::{combine, RelSource, RelStore};

#[cfg(feature = "rulelog-rdfs")]
pub use rulelog_rdfs::{RdfsEntailment, Taxonomy, Vocabulary};

#[cfg(feature = "rulelog-rules")]
pub use rulelog_rules::{parse_atom, parse_facts, parse_rule_set, ParseError};

#[cfg(feature = "rulelog-engine")]
pub use rulelog_engine::{EngineBuilder, EngineError, EngineKind, EngineOptions, InferenceView, Reasoner};

// Commonly used external dependencies
pub use anyhow;
pub use serde;
pub use serde_json;

/// Prelude module for convenient imports
///
/// ```rust
/// use rulelog::prelude::*;
/// ```
pub mod prelude {
    #[cfg(feature = "rulelog-core")]
    pub use rulelog_core::{unify, Binding, Node, Rel, Rule, RuleSet, Term, TermValue, Var};

    #[cfg(feature = "rulelog-store")]
    pub use rulelog_store::{combine, RelSource, RelStore};

    #[cfg(feature = "rulelog-rdfs")]
    pub use rulelog_rdfs::{RdfsEntailment, Taxonomy, Vocabulary};

    #[cfg(feature = "rulelog-rules")]
    pub use rulelog_rules::{parse_atom, parse_facts, parse_rule_set};

    #[cfg(feature = "rulelog-engine")]
    pub use rulelog_engine::{
        CancelFlag, ChainStats, EngineBuilder, EngineError, EngineKind, EngineOptions, ForwardChainer, InferenceView,
        Reasoner, SldResolver,
    };

    // Common external types
    pub use serde::{Deserialize, Serialize};
    pub use serde_json::Value;
}

/// Current version of rulelog
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Compiled-in modules and engine kinds, for diagnostics
pub fn info() -> serde_json::Value {
    #[cfg(feature = "rulelog-engine")]
    let engines: Vec<&str> = rulelog_engine::EngineKind::ALL
        .into_iter()
        .filter(|kind| kind.is_implemented())
        .map(|kind| kind.as_str())
        .collect();
    #[cfg(not(feature = "rulelog-engine"))]
    let engines: Vec<&str> = Vec::new();

    serde_json::json!({
        "version": VERSION,
        "modules": {
            "core": cfg!(feature = "rulelog-core"),
            "store": cfg!(feature = "rulelog-store"),
            "rdfs": cfg!(feature = "rulelog-rdfs"),
            "rules": cfg!(feature = "rulelog-rules"),
            "engine": cfg!(feature = "rulelog-engine"),
            "cli": cfg!(feature = "rulelog-cli"),
        },
        "engines": engines,
    })
}
