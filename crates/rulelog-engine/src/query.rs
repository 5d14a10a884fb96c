//! Conjunctive evaluation of rule bodies

use rulelog_core::{unify, Binding, Rel, TermValue};
use rulelog_store::RelSource;

/// A conjunction of relations evaluated left to right
///
/// Each relation is narrowed by the bindings of the ones before it, so
/// a bound predicate or name reaches the store index.
#[derive(Debug, Clone, Copy)]
pub struct BodyQuery<'r, T> {
    body: &'r [Rel<T>],
}

impl<'r, T: TermValue> BodyQuery<'r, T> {
    pub fn new(body: &'r [Rel<T>]) -> Self {
        Self { body }
    }

    /// Every binding under which all relations match `source`
    pub fn execute<S: RelSource<T> + ?Sized>(&self, source: &S) -> Vec<Binding<T>> {
        let mut results = Vec::new();
        self.for_each(source, &Binding::new(), &mut |binding| results.push(binding.clone()));
        results
    }

    /// Call `f` for every binding that extends `seed`
    pub fn for_each<S, F>(&self, source: &S, seed: &Binding<T>, f: &mut F)
    where
        S: RelSource<T> + ?Sized,
        F: FnMut(&Binding<T>),
    {
        self.execute_recursive(source, 0, seed, f);
    }

    fn execute_recursive<S, F>(&self, source: &S, index: usize, binding: &Binding<T>, f: &mut F)
    where
        S: RelSource<T> + ?Sized,
        F: FnMut(&Binding<T>),
    {
        let Some(atom) = self.body.get(index) else {
            f(binding);
            return;
        };

        let pattern = binding.apply(atom);
        for fact in source.find(&pattern) {
            if let Some(extended) = unify(&pattern, fact, binding) {
                self.execute_recursive(source, index + 1, &extended, f);
            }
        }
    }
}
