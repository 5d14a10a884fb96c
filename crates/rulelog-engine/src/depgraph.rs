//! Predicate dependency graph of a rule set

use itertools::Itertools;
use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use rulelog_core::{Node, Rel, RuleSet, Term, TermValue};
use std::collections::HashMap;
use std::fmt;

/// What a relation can be resolved against
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PredicateKey<T> {
    Named(Node),
    /// Triple; `None` when the predicate is not a constant
    Triple(Option<T>),
}

impl<T: TermValue> PredicateKey<T> {
    pub fn of(rel: &Rel<T>) -> Self {
        match rel.predicate() {
            Some(Term::Const(predicate)) => PredicateKey::Triple(Some(predicate.clone())),
            Some(_) => PredicateKey::Triple(None),
            None => PredicateKey::Named(rel.name().clone()),
        }
    }

    /// Whether a goal with this key may unify with a head with `other`
    fn overlaps(&self, other: &Self) -> bool {
        match (self, other) {
            (PredicateKey::Named(a), PredicateKey::Named(b)) => a == b,
            (PredicateKey::Triple(Some(a)), PredicateKey::Triple(Some(b))) => a == b,
            (PredicateKey::Triple(_), PredicateKey::Triple(_)) => true,
            _ => false,
        }
    }
}

impl<T: fmt::Debug> fmt::Display for PredicateKey<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PredicateKey::Named(name) => write!(f, "{}", name),
            PredicateKey::Triple(Some(predicate)) => write!(f, "(_, {:?}, _)", predicate),
            PredicateKey::Triple(None) => f.write_str("(_, ?, _)"),
        }
    }
}

/// Edge `head -> body` for every body relation that a rule head can resolve
#[derive(Debug)]
pub struct DependencyGraph<T> {
    graph: DiGraph<PredicateKey<T>, ()>,
}

impl<T: TermValue> DependencyGraph<T> {
    pub fn new(rules: &RuleSet<T>) -> Self {
        let mut graph = DiGraph::new();
        let mut heads: HashMap<PredicateKey<T>, NodeIndex> = HashMap::new();

        for rule in rules {
            heads
                .entry(PredicateKey::of(rule.head()))
                .or_insert_with_key(|key| graph.add_node(key.clone()));
        }

        for rule in rules {
            let from = heads[&PredicateKey::of(rule.head())];
            for atom in rule.body() {
                let goal = PredicateKey::of(atom);
                for (head, &to) in &heads {
                    if goal.overlaps(head) && graph.find_edge(from, to).is_none() {
                        graph.add_edge(from, to, ());
                    }
                }
            }
        }

        Self { graph }
    }

    /// One dependency cycle, if any, rendered as `a -> b -> a`
    pub fn find_cycle(&self) -> Option<String> {
        tarjan_scc(&self.graph)
            .into_iter()
            .find(|component| {
                component.len() > 1 || self.graph.find_edge(component[0], component[0]).is_some()
            })
            .map(|component| {
                component
                    .iter()
                    .chain(component.first())
                    .map(|&index| self.graph[index].to_string())
                    .join(" -> ")
            })
    }

    pub fn is_recursive(&self) -> bool {
        self.find_cycle().is_some()
    }

    pub fn predicate_count(&self) -> usize {
        self.graph.node_count()
    }
}
