//! Naive and semi-naive forward chaining to a fixpoint

use crate::error::EngineError;
use crate::options::{CancelFlag, EngineKind, EngineOptions};
use crate::query::BodyQuery;
use rulelog_core::{Rel, Rule, RuleSet, Term, TermValue};
use rulelog_rdfs::{RdfsEntailment, Taxonomy};
use rulelog_store::{combine, RelSource, RelStore};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Counters of one forward run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainStats {
    /// Rounds evaluated, including the final empty one
    pub rounds: usize,
    pub rules_fired: usize,
    /// Rules skipped because the previous delta could not feed them
    pub rules_skipped: usize,
    pub facts_derived: usize,
    pub execution_time_ms: u64,
}

/// Forward-chaining evaluator
///
/// Every round evaluates the rule bodies against the current generation
/// plus what the round has derived so far, and stops at the first round
/// that derives nothing. The semi-naive variant skips a rule from the
/// second round on when no relation of the previous delta can match any
/// of its body relations.
#[derive(Debug, Clone)]
pub struct ForwardChainer<T> {
    semi_naive: bool,
    rules: RuleSet<T>,
    options: EngineOptions,
    taxonomy: Option<Arc<Taxonomy<T>>>,
    cancel: CancelFlag,
}

impl<T: TermValue> ForwardChainer<T> {
    pub fn naive(rules: RuleSet<T>) -> Self {
        Self::new(rules, false)
    }

    pub fn semi_naive(rules: RuleSet<T>) -> Self {
        Self::new(rules, true)
    }

    fn new(rules: RuleSet<T>, semi_naive: bool) -> Self {
        Self {
            semi_naive,
            rules,
            options: EngineOptions::default(),
            taxonomy: None,
            cancel: CancelFlag::new(),
        }
    }

    pub fn with_options(mut self, options: EngineOptions) -> Self {
        self.options = options;
        self
    }

    /// Apply RDFS entailment to every round's delta
    pub fn with_taxonomy(mut self, taxonomy: Arc<Taxonomy<T>>) -> Self {
        self.taxonomy = Some(taxonomy);
        self
    }

    pub fn with_cancel(mut self, cancel: CancelFlag) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn kind(&self) -> EngineKind {
        if self.semi_naive {
            EngineKind::ForwardSemiNaive
        } else {
            EngineKind::ForwardNaive
        }
    }

    pub fn rules(&self) -> &RuleSet<T> {
        &self.rules
    }

    /// The full entailed store of `data` plus the embedded facts
    pub fn exec_with_stats<S: RelSource<T> + ?Sized>(&self, data: &S) -> Result<(RelStore<T>, ChainStats), EngineError> {
        let started = Instant::now();
        let mut stats = ChainStats::default();

        let mut generation = RelStore::new();
        generation.extend_from(data);
        generation.add_all(self.rules.facts().iter().cloned());

        if let Some(taxonomy) = &self.taxonomy {
            let derived = RdfsEntailment::new(taxonomy.as_ref()).entail(&generation);
            stats.facts_derived += generation.extend_from(&derived);
        }

        // None until the first round has run: every rule is needed then
        let mut previous: Option<RelStore<T>> = None;

        loop {
            self.check_limits(&stats, started)?;
            stats.rounds += 1;

            let mut delta = RelStore::new();
            for rule in self.rules.iter() {
                if self.semi_naive && previous.as_ref().is_some_and(|prev| !Self::is_needed(rule, prev)) {
                    stats.rules_skipped += 1;
                    continue;
                }
                stats.rules_fired += 1;

                let derived = Self::fire(rule, &combine(&generation, &delta));
                delta.add_all(derived);
            }

            if let Some(taxonomy) = &self.taxonomy {
                let derived = self.entail_delta(taxonomy, &generation, &delta);
                delta.extend_from(&derived);
            }

            debug!(
                round = stats.rounds,
                delta = delta.len(),
                fired = stats.rules_fired,
                skipped = stats.rules_skipped,
                "forward round"
            );

            if delta.is_empty() {
                break;
            }
            stats.facts_derived += generation.extend_from(&delta);
            previous = Some(delta);
        }

        stats.execution_time_ms = started.elapsed().as_millis() as u64;
        info!(
            kind = %self.kind(),
            rounds = stats.rounds,
            derived = stats.facts_derived,
            total = generation.len(),
            "fixpoint reached"
        );
        Ok((generation, stats))
    }

    /// Ground head instances of `rule` not yet in `known`
    fn fire<S: RelSource<T> + ?Sized>(rule: &Rule<T>, known: &S) -> Vec<Rel<T>> {
        let mut heads = Vec::new();
        BodyQuery::new(rule.body()).for_each(known, &Default::default(), &mut |binding| {
            if let Some(head) = binding.ground(rule.head()) {
                if !known.contains(&head) {
                    heads.push(head);
                }
            }
        });
        heads
    }

    /// Whether some body relation of `rule` could match a fact of `delta`
    ///
    /// A triple relation with a variable predicate is fed by any triple.
    fn is_needed(rule: &Rule<T>, delta: &RelStore<T>) -> bool {
        rule.body().iter().any(|atom| match atom.predicate() {
            Some(Term::Const(predicate)) => delta.contains_triple_predicate(predicate),
            Some(_) => delta.contains_predicate(""),
            None => delta.contains_predicate(atom.name().as_str()),
        })
    }

    fn entail_delta(&self, taxonomy: &Taxonomy<T>, generation: &RelStore<T>, delta: &RelStore<T>) -> RelStore<T> {
        let known = combine(generation, delta);
        let entailment = RdfsEntailment::new(taxonomy);
        if taxonomy.include_derived_data_rdfs() {
            // New schema triples may reach facts of earlier rounds
            entailment.entail(&known)
        } else {
            let triples = Rel::triple(Term::Any, Term::Any, Term::Any);
            entailment.entail_triples(&known, delta.find(&triples))
        }
    }

    fn check_limits(&self, stats: &ChainStats, started: Instant) -> Result<(), EngineError> {
        if self.cancel.is_cancelled() {
            return Err(EngineError::Cancelled);
        }
        if let Some(max_rounds) = self.options.max_rounds {
            if stats.rounds >= max_rounds {
                return Err(EngineError::RoundLimit(max_rounds));
            }
        }
        if let Some(timeout_ms) = self.options.timeout_ms {
            if started.elapsed().as_millis() as u64 >= timeout_ms {
                return Err(EngineError::Timeout(timeout_ms));
            }
        }
        Ok(())
    }
}
