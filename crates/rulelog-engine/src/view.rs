//! Pattern queries over a base store augmented by inference

use crate::backward::SldResolver;
use crate::engine::EngineBuilder;
use crate::error::EngineError;
use crate::options::{CancelFlag, EngineKind, EngineOptions};
use rulelog_core::{unify, Binding, Rel, RuleSet, Term, TermValue};
use rulelog_rdfs::Taxonomy;
use rulelog_store::{RelSource, RelStore};
use std::collections::HashSet;
use std::sync::Arc;

enum Backend<T> {
    /// Forward kinds: the closure, computed once at build time
    Materialized(RelStore<T>),
    /// Backward kind: resolved per query
    Resolver(SldResolver<T>),
}

/// Read-only view answering patterns as if against the entailed store
///
/// Results are ground relations, each reported once however many
/// proofs it has.
pub struct InferenceView<'b, T> {
    base: &'b dyn RelSource<T>,
    kind: EngineKind,
    backend: Backend<T>,
}

impl<'b, T: TermValue> InferenceView<'b, T> {
    pub fn builder() -> InferenceViewBuilder<'b, T> {
        InferenceViewBuilder::new()
    }

    pub fn kind(&self) -> EngineKind {
        self.kind
    }

    pub fn base(&self) -> &'b dyn RelSource<T> {
        self.base
    }

    /// Distinct ground relations matching `pattern`, lazily
    pub fn find<'v>(&'v self, pattern: &Rel<T>) -> Box<dyn Iterator<Item = Rel<T>> + 'v> {
        match &self.backend {
            Backend::Materialized(store) => {
                let candidates = store.find(pattern);
                // `find` ignores repeated variables; unification does not
                let pattern = pattern.clone();
                Box::new(
                    candidates
                        .filter(move |fact| unify(&pattern, fact, &Binding::new()).is_some())
                        .cloned(),
                )
            }
            Backend::Resolver(resolver) => {
                let mut seen: HashSet<Rel<T>> = HashSet::new();
                Box::new(
                    resolver
                        .instances(self.base, pattern)
                        .filter(move |rel| seen.insert(rel.clone())),
                )
            }
        }
    }

    pub fn contains(&self, pattern: &Rel<T>) -> bool {
        self.find(pattern).next().is_some()
    }

    /// Number of distinct triples in the view
    pub fn size(&self) -> usize {
        self.find(&Rel::triple(Term::Any, Term::Any, Term::Any)).count()
    }
}

/// Builder for [`InferenceView`]; `base` and `rules` are required
pub struct InferenceViewBuilder<'b, T> {
    base: Option<&'b dyn RelSource<T>>,
    engine: EngineBuilder<T>,
    has_rules: bool,
    kind: Option<EngineKind>,
    options: EngineOptions,
}

impl<'b, T: TermValue> InferenceViewBuilder<'b, T> {
    pub fn new() -> Self {
        Self {
            base: None,
            engine: EngineBuilder::new(),
            has_rules: false,
            kind: None,
            options: EngineOptions::default(),
        }
    }

    pub fn base(mut self, base: &'b dyn RelSource<T>) -> Self {
        self.base = Some(base);
        self
    }

    pub fn rules(mut self, rules: RuleSet<T>) -> Self {
        self.engine = self.engine.rules(rules);
        self.has_rules = true;
        self
    }

    pub fn kind(mut self, kind: EngineKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn options(mut self, options: EngineOptions) -> Self {
        self.options = options;
        self
    }

    pub fn taxonomy(mut self, taxonomy: Arc<Taxonomy<T>>) -> Self {
        self.engine = self.engine.taxonomy(taxonomy);
        self
    }

    pub fn cancel(mut self, cancel: CancelFlag) -> Self {
        self.engine = self.engine.cancel(cancel);
        self
    }

    pub fn build(self) -> Result<InferenceView<'b, T>, EngineError> {
        let base = self.base.ok_or(EngineError::MissingField("base"))?;
        if !self.has_rules {
            return Err(EngineError::MissingField("rules"));
        }

        let kind = self.kind.unwrap_or(self.options.kind);
        let engine = self.engine.kind(kind).options(self.options);

        let backend = if kind.is_forward() {
            Backend::Materialized(engine.build_forward()?.exec(base)?)
        } else {
            Backend::Resolver(engine.build_backward()?)
        };

        Ok(InferenceView { base, kind, backend })
    }
}

impl<'b, T: TermValue> Default for InferenceViewBuilder<'b, T> {
    fn default() -> Self {
        Self::new()
    }
}
