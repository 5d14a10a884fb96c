//! Common evaluator interface and the factory keyed by engine kind

use crate::backward::SldResolver;
use crate::error::EngineError;
use crate::forward::{ChainStats, ForwardChainer};
use crate::options::{CancelFlag, EngineKind, EngineOptions};
use rulelog_core::{unify, Binding, Rel, RuleSet, TermValue};
use rulelog_rdfs::Taxonomy;
use rulelog_store::{RelSource, RelStore};
use std::sync::Arc;
use tracing::info;

/// Answers sequence returned by [`Reasoner::solve`]
pub type Answers<'a, T> = Box<dyn Iterator<Item = Binding<T>> + 'a>;

/// Capability shared by every evaluator
pub trait Reasoner<T: TermValue> {
    fn kind(&self) -> EngineKind;

    /// Every fact derivable from `data`, data included
    fn exec(&self, data: &dyn RelSource<T>) -> Result<RelStore<T>, EngineError>;

    /// Bindings of the variables of `query` that make it derivable
    fn solve<'a>(&'a self, data: &'a dyn RelSource<T>, query: &Rel<T>) -> Result<Answers<'a, T>, EngineError>;
}

impl<T: TermValue> ForwardChainer<T> {
    pub fn exec(&self, data: &dyn RelSource<T>) -> Result<RelStore<T>, EngineError> {
        self.exec_with_stats(data).map(|(store, _)| store)
    }
}

impl<T: TermValue> Reasoner<T> for ForwardChainer<T> {
    fn kind(&self) -> EngineKind {
        ForwardChainer::kind(self)
    }

    fn exec(&self, data: &dyn RelSource<T>) -> Result<RelStore<T>, EngineError> {
        ForwardChainer::exec(self, data)
    }

    /// Materialises, then matches `query` against the result
    fn solve<'a>(&'a self, data: &'a dyn RelSource<T>, query: &Rel<T>) -> Result<Answers<'a, T>, EngineError> {
        let store = ForwardChainer::exec(self, data)?;
        let vars: Vec<_> = query.variables().into_iter().cloned().collect();
        let answers: Vec<Binding<T>> = store
            .find(query)
            .filter_map(|fact| unify(query, fact, &Binding::new()))
            .map(|binding| binding.project(&vars))
            .collect();
        Ok(Box::new(answers.into_iter()))
    }
}

impl<T: TermValue> Reasoner<T> for SldResolver<T> {
    fn kind(&self) -> EngineKind {
        EngineKind::BackwardSld
    }

    fn exec(&self, data: &dyn RelSource<T>) -> Result<RelStore<T>, EngineError> {
        Ok(SldResolver::exec(self, data))
    }

    fn solve<'a>(&'a self, data: &'a dyn RelSource<T>, query: &Rel<T>) -> Result<Answers<'a, T>, EngineError> {
        Ok(Box::new(SldResolver::solve(self, data, query)))
    }
}

/// Builds the evaluator for an engine kind
///
/// `rules` is required. An explicit `kind` overrides the one in the
/// options.
#[derive(Debug, Clone)]
pub struct EngineBuilder<T> {
    kind: Option<EngineKind>,
    rules: Option<RuleSet<T>>,
    options: EngineOptions,
    taxonomy: Option<Arc<Taxonomy<T>>>,
    cancel: CancelFlag,
}

impl<T: TermValue> EngineBuilder<T> {
    pub fn new() -> Self {
        Self {
            kind: None,
            rules: None,
            options: EngineOptions::default(),
            taxonomy: None,
            cancel: CancelFlag::new(),
        }
    }

    pub fn kind(mut self, kind: EngineKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn rules(mut self, rules: RuleSet<T>) -> Self {
        self.rules = Some(rules);
        self
    }

    pub fn options(mut self, options: EngineOptions) -> Self {
        self.options = options;
        self
    }

    /// RDFS entailment; only the forward engines accept one
    pub fn taxonomy(mut self, taxonomy: Arc<Taxonomy<T>>) -> Self {
        self.taxonomy = Some(taxonomy);
        self
    }

    pub fn cancel(mut self, cancel: CancelFlag) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn build_forward(self) -> Result<ForwardChainer<T>, EngineError> {
        let kind = self.kind.unwrap_or(self.options.kind);
        let rules = self.rules.ok_or(EngineError::MissingField("rules"))?;
        self.options.validate()?;

        let chainer = match kind {
            EngineKind::ForwardNaive => ForwardChainer::naive(rules),
            EngineKind::ForwardSemiNaive => ForwardChainer::semi_naive(rules),
            other => return Err(EngineError::UnsupportedEngine(other)),
        };
        let chainer = chainer.with_options(self.options).with_cancel(self.cancel);
        Ok(match self.taxonomy {
            Some(taxonomy) => chainer.with_taxonomy(taxonomy),
            None => chainer,
        })
    }

    pub fn build_backward(self) -> Result<SldResolver<T>, EngineError> {
        let kind = self.kind.unwrap_or(self.options.kind);
        let rules = self.rules.ok_or(EngineError::MissingField("rules"))?;
        self.options.validate()?;

        match kind {
            EngineKind::BackwardSld if self.taxonomy.is_some() => Err(EngineError::TaxonomyUnsupported(kind)),
            EngineKind::BackwardSld => SldResolver::with_options(rules, self.options),
            other => Err(EngineError::UnsupportedEngine(other)),
        }
    }

    pub fn build(self) -> Result<Box<dyn Reasoner<T>>, EngineError> {
        let kind = self.kind.unwrap_or(self.options.kind);
        if !kind.is_implemented() {
            return Err(EngineError::UnsupportedEngine(kind));
        }
        info!(%kind, "building engine");

        if kind.is_forward() {
            Ok(Box::new(self.build_forward()?))
        } else {
            Ok(Box::new(self.build_backward()?))
        }
    }
}

impl<T: TermValue> Default for EngineBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Materialise `data` under `rules` with a forward engine, returning stats
pub fn exec_with_stats<T: TermValue>(
    kind: EngineKind,
    rules: RuleSet<T>,
    data: &dyn RelSource<T>,
) -> Result<(RelStore<T>, ChainStats), EngineError> {
    EngineBuilder::new()
        .kind(kind)
        .rules(rules)
        .build_forward()?
        .exec_with_stats(data)
}
