//! Read-only access to ground facts, and layered union views

use rulelog_core::{Rel, TermValue};
use std::marker::PhantomData;

/// Read capability shared by stores and views
///
/// `find` is lazy: implementations narrow by relation name (and by
/// predicate for triples) before filtering, and never materialise the
/// whole source.
pub trait RelSource<T: TermValue> {
    /// Relations matching `pattern`; variables and `_` match anything
    fn find<'a>(&'a self, pattern: &Rel<T>) -> Box<dyn Iterator<Item = &'a Rel<T>> + 'a>;

    /// Every relation in the source
    fn iter<'a>(&'a self) -> Box<dyn Iterator<Item = &'a Rel<T>> + 'a>;

    fn contains(&self, rel: &Rel<T>) -> bool;

    /// True when some relation carries `name` (the empty name means triples)
    fn contains_predicate(&self, name: &str) -> bool;

    /// True when some triple uses `predicate` in predicate position
    fn contains_triple_predicate(&self, predicate: &T) -> bool;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Logical union of two sources, built without copying
///
/// Relations present in both sides are reported once.
pub struct Combined<'a, T, A: ?Sized, B: ?Sized> {
    first: &'a A,
    second: &'a B,
    _values: PhantomData<fn() -> T>,
}

/// Union view over `first` and `second`
pub fn combine<'a, T, A, B>(first: &'a A, second: &'a B) -> Combined<'a, T, A, B>
where
    T: TermValue,
    A: RelSource<T> + ?Sized,
    B: RelSource<T> + ?Sized,
{
    Combined {
        first,
        second,
        _values: PhantomData,
    }
}

impl<'a, T, A: ?Sized, B: ?Sized> Combined<'a, T, A, B> {
    pub fn first(&self) -> &'a A {
        self.first
    }

    pub fn second(&self) -> &'a B {
        self.second
    }
}

impl<'v, T, A, B> Combined<'v, T, A, B>
where
    T: TermValue,
    A: RelSource<T> + ?Sized,
    B: RelSource<T> + ?Sized,
{
    /// Same as `find`, but the iterator borrows the underlying sources
    /// instead of the view, so it can outlive a temporary `Combined`
    pub fn lookup(&self, pattern: &Rel<T>) -> Box<dyn Iterator<Item = &'v Rel<T>> + 'v> {
        let first = self.first;
        Box::new(
            first
                .find(pattern)
                .chain(self.second.find(pattern).filter(move |rel| !first.contains(rel))),
        )
    }
}

impl<'a, T, A: ?Sized, B: ?Sized> Clone for Combined<'a, T, A, B> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, T, A: ?Sized, B: ?Sized> Copy for Combined<'a, T, A, B> {}

impl<'v, T, A, B> RelSource<T> for Combined<'v, T, A, B>
where
    T: TermValue,
    A: RelSource<T> + ?Sized,
    B: RelSource<T> + ?Sized,
{
    fn find<'a>(&'a self, pattern: &Rel<T>) -> Box<dyn Iterator<Item = &'a Rel<T>> + 'a> {
        let first: &'a A = self.first;
        let second: &'a B = self.second;
        Box::new(
            first
                .find(pattern)
                .chain(second.find(pattern).filter(move |rel| !first.contains(rel))),
        )
    }

    fn iter<'a>(&'a self) -> Box<dyn Iterator<Item = &'a Rel<T>> + 'a> {
        let first = self.first;
        Box::new(first.iter().chain(self.second.iter().filter(move |rel| !first.contains(rel))))
    }

    fn contains(&self, rel: &Rel<T>) -> bool {
        self.first.contains(rel) || self.second.contains(rel)
    }

    fn contains_predicate(&self, name: &str) -> bool {
        self.first.contains_predicate(name) || self.second.contains_predicate(name)
    }

    fn contains_triple_predicate(&self, predicate: &T) -> bool {
        self.first.contains_triple_predicate(predicate) || self.second.contains_triple_predicate(predicate)
    }

    fn len(&self) -> usize {
        self.first.len() + self.second.iter().filter(|rel| !self.first.contains(rel)).count()
    }

    fn is_empty(&self) -> bool {
        self.first.is_empty() && self.second.is_empty()
    }
}
