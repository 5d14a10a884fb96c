//! Constants, variables and the wildcard

use crate::node::Node;
use std::fmt;
use std::sync::Arc;

/// Placeholder, scoped to one rule instantiation
///
/// Named variables come from rule text and are equal when their names
/// match. Generated variables come from [`VarAlloc`](crate::VarAlloc) and
/// are never equal to a named one, whatever the name.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Var(Repr);

#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
enum Repr {
    Named(Node),
    Fresh { base: Arc<str>, id: u64 },
}

impl Var {
    pub fn new(name: impl AsRef<str>) -> Self {
        let name = name.as_ref();
        Var(Repr::Named(Node::new(name.strip_prefix('?').unwrap_or(name))))
    }

    /// Generated variable; not interned
    pub(crate) fn fresh(base: Arc<str>, id: u64) -> Self {
        Var(Repr::Fresh { base, id })
    }

    /// Name of a named variable; `None` for generated ones
    pub fn name(&self) -> Option<&str> {
        match &self.0 {
            Repr::Named(name) => Some(name.as_str()),
            Repr::Fresh { .. } => None,
        }
    }

    pub fn is_fresh(&self) -> bool {
        matches!(self.0, Repr::Fresh { .. })
    }
}

// `#` starts a comment in rule text, so generated names cannot be written back
impl fmt::Display for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Repr::Named(name) => write!(f, "?{}", name),
            Repr::Fresh { base, id } => write!(f, "?{}#{}", base, id),
        }
    }
}

impl fmt::Debug for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

/// A position in a relation
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Term<T> {
    Const(T),
    Var(Var),
    /// `_`: matches anything and binds nothing
    Any,
}

impl<T> Term<T> {
    pub fn var(name: impl AsRef<str>) -> Self {
        Term::Var(Var::new(name))
    }

    pub fn is_ground(&self) -> bool {
        matches!(self, Term::Const(_))
    }

    pub fn is_any(&self) -> bool {
        matches!(self, Term::Any)
    }

    pub fn as_const(&self) -> Option<&T> {
        match self {
            Term::Const(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_var(&self) -> Option<&Var> {
        match self {
            Term::Var(var) => Some(var),
            _ => None,
        }
    }
}

impl<T> From<Var> for Term<T> {
    fn from(var: Var) -> Self {
        Term::Var(var)
    }
}

impl From<&str> for Term<Node> {
    fn from(value: &str) -> Self {
        Term::Const(Node::new(value))
    }
}

impl From<Node> for Term<Node> {
    fn from(value: Node) -> Self {
        Term::Const(value)
    }
}

impl<T: fmt::Display> fmt::Display for Term<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Const(value) => write!(f, "{}", value),
            Term::Var(var) => write!(f, "{}", var),
            Term::Any => f.write_str("_"),
        }
    }
}
