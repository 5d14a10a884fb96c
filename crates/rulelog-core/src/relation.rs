//! Named tuples of terms

use crate::node::Node;
use crate::term::{Term, Var};
use smallvec::SmallVec;
use std::fmt;

/// Terms of a relation; triples stay inline
pub type Terms<T> = SmallVec<[Term<T>; 3]>;

/// Position of the predicate in a triple
pub const PREDICATE_POSITION: usize = 1;

/// Ordered tuple `(name, terms)`
///
/// The empty name is the built-in positional triple relation
/// `(subject, predicate, object)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Rel<T> {
    name: Node,
    terms: Terms<T>,
}

impl<T> Rel<T> {
    pub fn new(name: impl Into<Node>, terms: impl IntoIterator<Item = Term<T>>) -> Self {
        Self {
            name: name.into(),
            terms: terms.into_iter().collect(),
        }
    }

    /// Unnamed triple relation
    pub fn triple(subject: Term<T>, predicate: Term<T>, object: Term<T>) -> Self {
        Self {
            name: Node::new(""),
            terms: SmallVec::from_buf([subject, predicate, object]),
        }
    }

    /// Ground triple from three constants
    pub fn fact(subject: T, predicate: T, object: T) -> Self {
        Self::triple(Term::Const(subject), Term::Const(predicate), Term::Const(object))
    }

    pub fn name(&self) -> &Node {
        &self.name
    }

    pub fn is_triple(&self) -> bool {
        self.name.is_empty()
    }

    pub fn arity(&self) -> usize {
        self.terms.len()
    }

    pub fn terms(&self) -> &[Term<T>] {
        &self.terms
    }

    pub fn term(&self, position: usize) -> Option<&Term<T>> {
        self.terms.get(position)
    }

    /// Predicate term of a triple; `None` for named relations
    pub fn predicate(&self) -> Option<&Term<T>> {
        if self.is_triple() {
            self.terms.get(PREDICATE_POSITION)
        } else {
            None
        }
    }

    /// True when every term is a constant
    pub fn is_ground(&self) -> bool {
        self.terms.iter().all(Term::is_ground)
    }

    /// Same name and arity
    pub fn same_shape<U>(&self, other: &Rel<U>) -> bool {
        self.name == other.name && self.terms.len() == other.terms.len()
    }

    /// Variables in order of first occurrence
    pub fn variables(&self) -> Vec<&Var> {
        let mut seen: Vec<&Var> = Vec::new();
        for var in self.terms.iter().filter_map(Term::as_var) {
            if !seen.contains(&var) {
                seen.push(var);
            }
        }
        seen
    }

    /// Rebuild the relation with every term passed through `f`
    pub fn map_terms(&self, mut f: impl FnMut(&Term<T>) -> Term<T>) -> Self {
        Self {
            name: self.name.clone(),
            terms: self.terms.iter().map(|term| f(term)).collect(),
        }
    }
}

impl<T: PartialEq> Rel<T> {
    /// Positional match against a ground relation
    ///
    /// Variables and wildcards in `self` match any value; repeated
    /// variables are not checked against each other (use unification for
    /// that).
    pub fn matches(&self, fact: &Rel<T>) -> bool {
        self.same_shape(fact)
            && self.terms.iter().zip(fact.terms.iter()).all(|(pattern, value)| match pattern {
                Term::Const(expected) => matches!(value, Term::Const(actual) if actual == expected),
                Term::Var(_) | Term::Any => true,
            })
    }
}

impl<T: fmt::Display> fmt::Display for Rel<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        for (i, term) in self.terms.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", term)?;
        }
        f.write_str(")")
    }
}
