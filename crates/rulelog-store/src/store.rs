//! In-memory ground fact store

use crate::source::RelSource;
use rulelog_core::{Node, Rel, Term, TermValue};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Set of ground relations
///
/// Named relations are indexed by name, triples by their predicate
/// constant. Adding a relation twice keeps one copy.
#[derive(Debug, Clone)]
pub struct RelStore<T> {
    /// Named relations, keyed by relation name
    named: HashMap<Node, HashSet<Rel<T>>>,
    /// Triples, keyed by predicate
    triples: HashMap<T, HashSet<Rel<T>>>,
    len: usize,
}

impl<T: TermValue> RelStore<T> {
    pub fn new() -> Self {
        Self {
            named: HashMap::new(),
            triples: HashMap::new(),
            len: 0,
        }
    }

    pub fn builder() -> RelStoreBuilder<T> {
        RelStoreBuilder::new()
    }

    /// Insert a ground relation; returns false if it was already present
    ///
    /// Non-ground relations are not facts and are ignored.
    pub fn add(&mut self, rel: Rel<T>) -> bool {
        if !rel.is_ground() {
            tracing::warn!(arity = rel.arity(), "ignoring non-ground relation");
            return false;
        }

        let inserted = match Self::triple_key(&rel) {
            Some(predicate) => self.triples.entry(predicate).or_default().insert(rel),
            None => self.named.entry(rel.name().clone()).or_default().insert(rel),
        };
        if inserted {
            self.len += 1;
        }
        inserted
    }

    /// Insert many relations; returns how many were new
    pub fn add_all(&mut self, rels: impl IntoIterator<Item = Rel<T>>) -> usize {
        let mut added = 0;
        for rel in rels {
            if self.add(rel) {
                added += 1;
            }
        }
        added
    }

    /// Copy every relation of another source into this store
    pub fn extend_from<S: RelSource<T> + ?Sized>(&mut self, other: &S) -> usize {
        self.add_all(other.iter().cloned())
    }

    /// Remove a relation; returns false if it was absent
    pub fn delete(&mut self, rel: &Rel<T>) -> bool {
        let removed = match Self::triple_key(rel) {
            Some(predicate) => Self::remove_from(&mut self.triples, &predicate, rel),
            None => Self::remove_from(&mut self.named, rel.name(), rel),
        };
        if removed {
            self.len -= 1;
        }
        removed
    }

    /// Distinct names of the stored non-triple relations
    pub fn names(&self) -> impl Iterator<Item = &Node> {
        self.named.keys()
    }

    /// Distinct predicates used by triples
    pub fn triple_predicates(&self) -> impl Iterator<Item = &T> {
        self.triples.keys()
    }

    pub fn statistics(&self) -> StoreStats {
        let triples = self.triples.values().map(HashSet::len).sum();
        StoreStats {
            relations: self.len,
            triples,
            named_relations: self.len - triples,
            distinct_names: self.named.len(),
            distinct_predicates: self.triples.len(),
        }
    }

    pub fn clear(&mut self) {
        self.named.clear();
        self.triples.clear();
        self.len = 0;
    }

    /// Relations sorted, for stable output
    pub fn sorted(&self) -> Vec<&Rel<T>> {
        let mut rels: Vec<&Rel<T>> = RelSource::iter(self).collect();
        rels.sort();
        rels
    }

    fn triple_key(rel: &Rel<T>) -> Option<T> {
        if rel.is_triple() {
            rel.predicate().and_then(Term::as_const).cloned()
        } else {
            None
        }
    }

    fn remove_from<K: std::hash::Hash + Eq>(index: &mut HashMap<K, HashSet<Rel<T>>>, key: &K, rel: &Rel<T>) -> bool {
        let Some(bucket) = index.get_mut(key) else {
            return false;
        };
        let removed = bucket.remove(rel);
        if bucket.is_empty() {
            index.remove(key);
        }
        removed
    }
}

impl<T: TermValue> RelSource<T> for RelStore<T> {
    fn find<'a>(&'a self, pattern: &Rel<T>) -> Box<dyn Iterator<Item = &'a Rel<T>> + 'a> {
        let pattern = pattern.clone();

        if pattern.is_triple() {
            let keyed = pattern.predicate().and_then(Term::as_const).map(|predicate| self.triples.get(predicate));
            match keyed {
                Some(Some(bucket)) => Box::new(bucket.iter().filter(move |rel| pattern.matches(rel))),
                Some(None) => Box::new(std::iter::empty()),
                None => Box::new(
                    self.triples
                        .values()
                        .flat_map(HashSet::iter)
                        .filter(move |rel| pattern.matches(rel)),
                ),
            }
        } else {
            let bucket = self.named.get(pattern.name().as_str());
            match bucket {
                Some(bucket) => Box::new(bucket.iter().filter(move |rel| pattern.matches(rel))),
                None => Box::new(std::iter::empty()),
            }
        }
    }

    fn iter<'a>(&'a self) -> Box<dyn Iterator<Item = &'a Rel<T>> + 'a> {
        Box::new(
            self.named
                .values()
                .flat_map(HashSet::iter)
                .chain(self.triples.values().flat_map(HashSet::iter)),
        )
    }

    fn contains(&self, rel: &Rel<T>) -> bool {
        match Self::triple_key(rel) {
            Some(predicate) => self.triples.get(&predicate).is_some_and(|bucket| bucket.contains(rel)),
            None => self.named.get(rel.name()).is_some_and(|bucket| bucket.contains(rel)),
        }
    }

    fn contains_predicate(&self, name: &str) -> bool {
        if name.is_empty() {
            !self.triples.is_empty()
        } else {
            self.named.contains_key(name)
        }
    }

    fn contains_triple_predicate(&self, predicate: &T) -> bool {
        self.triples.contains_key(predicate)
    }

    fn len(&self) -> usize {
        self.len
    }
}

impl<T: TermValue> Default for RelStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: TermValue> PartialEq for RelStore<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && RelSource::iter(self).all(|rel| other.contains(rel))
    }
}

impl<T: TermValue> Eq for RelStore<T> {}

impl<T: TermValue> FromIterator<Rel<T>> for RelStore<T> {
    fn from_iter<I: IntoIterator<Item = Rel<T>>>(iter: I) -> Self {
        let mut store = RelStore::new();
        store.add_all(iter);
        store
    }
}

impl<T: TermValue> Extend<Rel<T>> for RelStore<T> {
    fn extend<I: IntoIterator<Item = Rel<T>>>(&mut self, iter: I) {
        self.add_all(iter);
    }
}

impl<T: TermValue + fmt::Display> fmt::Display for RelStore<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rel in self.sorted() {
            writeln!(f, "{} .", rel)?;
        }
        Ok(())
    }
}

/// Store statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreStats {
    pub relations: usize,
    pub triples: usize,
    pub named_relations: usize,
    pub distinct_names: usize,
    pub distinct_predicates: usize,
}

/// Accumulates additions and deletions, then hands over the store
#[derive(Debug, Clone)]
pub struct RelStoreBuilder<T> {
    store: RelStore<T>,
}

impl<T: TermValue> RelStoreBuilder<T> {
    pub fn new() -> Self {
        Self { store: RelStore::new() }
    }

    pub fn add(mut self, rel: Rel<T>) -> Self {
        self.store.add(rel);
        self
    }

    pub fn add_all(mut self, rels: impl IntoIterator<Item = Rel<T>>) -> Self {
        self.store.add_all(rels);
        self
    }

    pub fn add_store<S: RelSource<T> + ?Sized>(mut self, other: &S) -> Self {
        self.store.extend_from(other);
        self
    }

    pub fn delete(mut self, rel: &Rel<T>) -> Self {
        self.store.delete(rel);
        self
    }

    pub fn build(self) -> RelStore<T> {
        self.store
    }
}

impl<T: TermValue> Default for RelStoreBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}
