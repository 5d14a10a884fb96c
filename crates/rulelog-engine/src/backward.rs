//! Non-recursive SLD resolution
//!
//! The resolver is a pull-based state machine: a stack of choice points,
//! each holding the goals still to prove, the selected goal, the
//! substitution so far and the alternatives (facts, then rules in
//! declaration order) not tried yet. Every call to `next` resumes the
//! depth-first search where the previous answer left it.

use crate::depgraph::DependencyGraph;
use crate::error::EngineError;
use crate::options::EngineOptions;
use rulelog_core::{Binding, Rel, Rule, RuleSet, Term, TermValue, Var, VarAlloc};
use rulelog_store::{combine, Combined, RelSource, RelStore};
use std::collections::HashMap;

/// Substitution over variables, whose values may still be variables
///
/// Only used while a proof is open; answers are projected into a
/// [`Binding`] once every query variable is ground.
#[derive(Debug, Clone)]
struct Subst<T> {
    values: HashMap<Var, Term<T>>,
}

impl<T: TermValue> Subst<T> {
    fn new() -> Self {
        Self { values: HashMap::new() }
    }

    /// Follow variable-to-variable links to the representative term
    fn walk<'t>(&'t self, mut term: &'t Term<T>) -> &'t Term<T> {
        while let Term::Var(var) = term {
            match self.values.get(var) {
                Some(next) => term = next,
                None => break,
            }
        }
        term
    }

    fn apply(&self, rel: &Rel<T>) -> Rel<T> {
        rel.map_terms(|term| self.walk(term).clone())
    }

    fn unify_terms(&mut self, left: &Term<T>, right: &Term<T>) -> bool {
        let left = self.walk(left).clone();
        let right = self.walk(right).clone();
        match (left, right) {
            (Term::Any, _) | (_, Term::Any) => true,
            (Term::Const(a), Term::Const(b)) => a == b,
            (Term::Var(a), Term::Var(b)) if a == b => true,
            (Term::Var(var), other) | (other, Term::Var(var)) => {
                self.values.insert(var, other);
                true
            }
        }
    }

    /// Unify two relations position by position, or leave `self` unusable
    fn unify(mut self, goal: &Rel<T>, other: &Rel<T>) -> Option<Self> {
        if !goal.same_shape(other) {
            return None;
        }
        for (left, right) in goal.terms().iter().zip(other.terms()) {
            if !self.unify_terms(left, right) {
                return None;
            }
        }
        Some(self)
    }

    fn answer(&self, vars: &[Var]) -> Binding<T> {
        vars.iter()
            .filter_map(|var| match self.walk(&Term::Var(var.clone())) {
                Term::Const(value) => Some((var.clone(), value.clone())),
                _ => None,
            })
            .collect()
    }
}

/// Resolver for acyclic rule sets
#[derive(Debug, Clone)]
pub struct SldResolver<T> {
    rules: RuleSet<T>,
    facts: RelStore<T>,
    options: EngineOptions,
}

impl<T: TermValue> SldResolver<T> {
    /// Fails when the predicate dependencies of `rules` contain a cycle
    pub fn new(rules: RuleSet<T>) -> Result<Self, EngineError> {
        Self::with_options(rules, EngineOptions::default())
    }

    pub fn with_options(rules: RuleSet<T>, options: EngineOptions) -> Result<Self, EngineError> {
        let graph = DependencyGraph::new(&rules);
        if let Some(cycle) = graph.find_cycle() {
            return Err(EngineError::RecursiveRuleSet { cycle });
        }

        let facts: RelStore<T> = rules.facts().iter().cloned().collect();
        tracing::debug!(
            rules = rules.len(),
            facts = facts.len(),
            predicates = graph.predicate_count(),
            "sld resolver ready"
        );
        Ok(Self { rules, facts, options })
    }

    pub fn rules(&self) -> &RuleSet<T> {
        &self.rules
    }

    /// Lazily enumerate the answers of `query` over `data`
    ///
    /// Answers bind exactly the variables of `query`; the same answer
    /// may come back once per proof.
    pub fn solve<'a>(&'a self, data: &'a dyn RelSource<T>, query: &Rel<T>) -> Solutions<'a, T> {
        let vars: Vec<Var> = query.variables().into_iter().cloned().collect();
        self.search(data, query, vars).1
    }

    /// Ground instances of `query` over `data`, one per proof
    ///
    /// `_` positions are filled in too, so every item is a ground relation.
    pub fn instances<'a>(&'a self, data: &'a dyn RelSource<T>, query: &Rel<T>) -> impl Iterator<Item = Rel<T>> + 'a {
        let (goal, solutions) = self.search(data, query, Vec::new());
        let vars: Vec<Var> = goal.variables().into_iter().cloned().collect();
        let solutions = Solutions { vars, ..solutions };
        solutions.filter_map(move |binding| binding.ground(&goal))
    }

    /// Replace `_` by generated variables and open the search
    fn search<'a>(&'a self, data: &'a dyn RelSource<T>, query: &Rel<T>, vars: Vec<Var>) -> (Rel<T>, Solutions<'a, T>) {
        let mut alloc = VarAlloc::new(&self.options.var_base);
        let goal = query.map_terms(|term| match term {
            Term::Any => Term::Var(alloc.fresh()),
            other => other.clone(),
        });

        let solutions = Solutions {
            rules: self.rules.rules(),
            source: combine(data, &self.facts),
            alloc,
            vars,
            pending: Some((vec![goal.clone()], Subst::new())),
            stack: Vec::new(),
            answers: 0,
        };
        (goal, solutions)
    }

    /// Materialise every derivable fact of `data`
    ///
    /// Solves one all-variable query per distinct head shape.
    pub fn exec(&self, data: &dyn RelSource<T>) -> RelStore<T> {
        let mut store = RelStore::new();
        store.extend_from(data);
        store.extend_from(&self.facts);

        let mut shapes: Vec<Rel<T>> = Vec::new();
        for rule in self.rules.iter() {
            let head = rule.head();
            let shape = match head.predicate() {
                Some(Term::Const(predicate)) => Rel::triple(Term::var("s"), Term::Const(predicate.clone()), Term::var("o")),
                Some(_) => Rel::triple(Term::var("s"), Term::var("p"), Term::var("o")),
                None => Rel::new(head.name().clone(), (0..head.arity()).map(|i| Term::var(format!("a{}", i)))),
            };
            if !shapes.contains(&shape) {
                shapes.push(shape);
            }
        }

        let derived: Vec<Rel<T>> = shapes
            .iter()
            .flat_map(|shape| self.solve(data, shape).filter_map(move |binding| binding.ground(shape)))
            .collect();
        store.add_all(derived);
        store
    }
}

/// Open alternatives for one selected goal
struct Choice<'a, T> {
    goals: Vec<Rel<T>>,
    goal: Rel<T>,
    subst: Subst<T>,
    facts: Box<dyn Iterator<Item = &'a Rel<T>> + 'a>,
    next_rule: usize,
}

/// Lazy answer sequence of one query
///
/// Dropping it, or simply not pulling further, stops the search.
pub struct Solutions<'a, T> {
    rules: &'a [Rule<T>],
    source: Combined<'a, T, dyn RelSource<T> + 'a, RelStore<T>>,
    alloc: VarAlloc,
    vars: Vec<Var>,
    /// Resolvent waiting to have its next goal selected
    pending: Option<(Vec<Rel<T>>, Subst<T>)>,
    stack: Vec<Choice<'a, T>>,
    answers: usize,
}

impl<'a, T: TermValue> Solutions<'a, T> {
    /// Fresh variables allocated so far in this run
    pub fn renamed_variables(&self) -> u64 {
        self.alloc.allocated()
    }
}

impl<'a, T: TermValue> Iterator for Solutions<'a, T> {
    type Item = Binding<T>;

    fn next(&mut self) -> Option<Binding<T>> {
        loop {
            if let Some((mut goals, subst)) = self.pending.take() {
                match goals.pop() {
                    None => {
                        self.answers += 1;
                        return Some(subst.answer(&self.vars));
                    }
                    Some(goal) => {
                        let goal = subst.apply(&goal);
                        let facts = Box::new(self.source.lookup(&goal).fuse());
                        self.stack.push(Choice {
                            goals,
                            goal,
                            subst,
                            facts,
                            next_rule: 0,
                        });
                    }
                }
            }

            let Some(choice) = self.stack.last_mut() else {
                tracing::trace!(answers = self.answers, "sld search exhausted");
                return None;
            };

            // Facts first
            if let Some(fact) = choice.facts.next() {
                if let Some(subst) = choice.subst.clone().unify(&choice.goal, fact) {
                    self.pending = Some((choice.goals.clone(), subst));
                }
                continue;
            }

            // Then rules, in declaration order
            while let Some(rule) = self.rules.get(choice.next_rule) {
                choice.next_rule += 1;
                if !rule.head().same_shape(&choice.goal) {
                    continue;
                }

                let renamed = rule.rename(&mut self.alloc);
                if let Some(subst) = choice.subst.clone().unify(&choice.goal, renamed.head()) {
                    let mut goals = choice.goals.clone();
                    goals.extend(renamed.body().iter().rev().cloned());
                    self.pending = Some((goals, subst));
                    break;
                }
            }

            if self.pending.is_none() {
                self.stack.pop();
            }
        }
    }
}
