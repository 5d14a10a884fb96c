//! Variable bindings and positional unification

use crate::node::TermValue;
use crate::relation::Rel;
use crate::term::{Term, Var};
use std::collections::HashMap;
use std::fmt;

/// Finite mapping from variables to constants
///
/// The value side never holds a variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding<T> {
    values: HashMap<Var, T>,
}

impl<T> Default for Binding<T> {
    fn default() -> Self {
        Self {
            values: HashMap::new(),
        }
    }
}

impl<T: TermValue> Binding<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, var: &Var) -> Option<&T> {
        self.values.get(var)
    }

    /// Look a variable up by name (with or without the leading `?`)
    pub fn value_of(&self, name: &str) -> Option<&T> {
        self.values.get(&Var::new(name))
    }

    pub fn contains(&self, var: &Var) -> bool {
        self.values.contains_key(var)
    }

    /// Bind `var`, failing if it is already bound to a different value
    pub fn bind(&mut self, var: Var, value: T) -> bool {
        match self.values.get(&var) {
            Some(existing) => *existing == value,
            None => {
                self.values.insert(var, value);
                true
            }
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Var, &T)> {
        self.values.iter()
    }

    /// Resolve a single term under this binding
    pub fn resolve(&self, term: &Term<T>) -> Term<T> {
        match term {
            Term::Var(var) => match self.values.get(var) {
                Some(value) => Term::Const(value.clone()),
                None => term.clone(),
            },
            other => other.clone(),
        }
    }

    /// Substitute bound variables into `rel`; unbound ones stay in place
    pub fn apply(&self, rel: &Rel<T>) -> Rel<T> {
        rel.map_terms(|term| self.resolve(term))
    }

    /// Substitute and require the result to be ground
    pub fn ground(&self, rel: &Rel<T>) -> Option<Rel<T>> {
        let applied = self.apply(rel);
        applied.is_ground().then_some(applied)
    }

    /// Keep only the given variables
    pub fn project<'v>(&self, vars: impl IntoIterator<Item = &'v Var>) -> Binding<T> {
        let mut projected = Binding::new();
        for var in vars {
            if let Some(value) = self.values.get(var) {
                projected.values.insert(var.clone(), value.clone());
            }
        }
        projected
    }
}

impl<T: TermValue> FromIterator<(Var, T)> for Binding<T> {
    fn from_iter<I: IntoIterator<Item = (Var, T)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

impl<T: TermValue + fmt::Display> fmt::Display for Binding<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut entries: Vec<_> = self.values.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        f.write_str("{")?;
        for (i, (var, value)) in entries.into_iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{} = {}", var, value)?;
        }
        f.write_str("}")
    }
}

/// Unify `pattern` against a ground `fact`, extending `binding`
///
/// Fails if names or arities differ, or if any position conflicts with
/// the current binding. Total or nothing: no partial result is
/// returned. A non-constant position in `fact` only matches `_`.
pub fn unify<T: TermValue>(pattern: &Rel<T>, fact: &Rel<T>, binding: &Binding<T>) -> Option<Binding<T>> {
    if !pattern.same_shape(fact) {
        return None;
    }

    let mut extended = binding.clone();
    for (term, value) in pattern.terms().iter().zip(fact.terms()) {
        match (term, value) {
            (Term::Any, _) => {}
            (Term::Const(expected), Term::Const(actual)) => {
                if expected != actual {
                    return None;
                }
            }
            (Term::Var(var), Term::Const(actual)) => {
                if !extended.bind(var.clone(), actual.clone()) {
                    return None;
                }
            }
            _ => return None,
        }
    }

    Some(extended)
}
