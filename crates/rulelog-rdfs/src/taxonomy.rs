//! Frozen subclass / subproperty / domain / range closure tables

use crate::vocabulary::Vocabulary;
use rulelog_core::{Rel, Term, TermValue};
use rulelog_store::RelSource;
use std::collections::{HashMap, HashSet};

type Index<T> = HashMap<T, HashSet<T>>;

/// Direct schema edges as read from a vocabulary source
#[derive(Debug, Clone)]
struct SchemaEdges<T> {
    subclass_of: Index<T>,
    subproperty_of: Index<T>,
    domain: Index<T>,
    range: Index<T>,
}

impl<T: TermValue> SchemaEdges<T> {
    fn new() -> Self {
        Self {
            subclass_of: HashMap::new(),
            subproperty_of: HashMap::new(),
            domain: HashMap::new(),
            range: HashMap::new(),
        }
    }

    /// Read every schema triple of `source`; returns how many edges were new
    fn load<S: RelSource<T> + ?Sized>(&mut self, source: &S, vocabulary: &Vocabulary<T>) -> usize {
        let tables = [
            (&vocabulary.subclass_of, &mut self.subclass_of),
            (&vocabulary.subproperty_of, &mut self.subproperty_of),
            (&vocabulary.domain, &mut self.domain),
            (&vocabulary.range, &mut self.range),
        ];

        let mut added = 0;
        for (predicate, index) in tables {
            let pattern = Rel::triple(Term::Any, Term::Const(predicate.clone()), Term::Any);
            for edge in source.find(&pattern) {
                let (Some(Term::Const(subject)), Some(Term::Const(object))) = (edge.term(0), edge.term(2)) else {
                    continue;
                };
                if index.entry(subject.clone()).or_default().insert(object.clone()) {
                    added += 1;
                }
            }
        }
        added
    }
}

/// Transitive closure of `edges`, one reachability set per source term
fn transitive_closure<T: TermValue>(edges: &Index<T>) -> Index<T> {
    let mut closure = HashMap::with_capacity(edges.len());

    for start in edges.keys() {
        let mut reached: HashSet<T> = HashSet::new();
        let mut stack: Vec<&T> = vec![start];

        while let Some(current) = stack.pop() {
            let Some(next) = edges.get(current) else {
                continue;
            };
            for target in next {
                if reached.insert(target.clone()) {
                    stack.push(target);
                }
            }
        }

        closure.insert(start.clone(), reached);
    }
    closure
}

fn invert<T: TermValue>(index: &Index<T>) -> Index<T> {
    let mut inverse: Index<T> = HashMap::new();
    for (from, targets) in index {
        for to in targets {
            inverse.entry(to.clone()).or_default().insert(from.clone());
        }
    }
    inverse
}

/// Closure plus the term itself, for every term that ends an edge
fn reflexive<T: TermValue>(closure: &Index<T>, edges: &Index<T>) -> Index<T> {
    let mut inclusive = closure.clone();
    let endpoints = edges
        .iter()
        .flat_map(|(from, targets)| std::iter::once(from).chain(targets.iter()));

    for term in endpoints {
        inclusive.entry(term.clone()).or_default().insert(term.clone());
    }
    inclusive
}

/// Build-once taxonomy over a vocabulary store
///
/// Lookups for a term with no entry return an empty set rather than
/// failing. Domain and range are the direct declarations only.
#[derive(Debug, Clone)]
pub struct Taxonomy<T> {
    vocabulary: Vocabulary<T>,
    include_derived_data_rdfs: bool,
    edges: SchemaEdges<T>,

    super_classes: Index<T>,
    super_classes_inc: Index<T>,
    sub_classes: Index<T>,
    sub_classes_inc: Index<T>,

    super_properties: Index<T>,
    super_properties_inc: Index<T>,
    sub_properties: Index<T>,
    sub_properties_inc: Index<T>,

    properties_with_domain: Index<T>,
    properties_with_range: Index<T>,

    empty: HashSet<T>,
}

impl<T: TermValue> Taxonomy<T> {
    pub fn new<S: RelSource<T> + ?Sized>(
        vocab_store: &S,
        vocabulary: &Vocabulary<T>,
        include_derived_data_rdfs: bool,
    ) -> Self {
        let mut edges = SchemaEdges::new();
        edges.load(vocab_store, vocabulary);
        Self::from_edges(edges, vocabulary.clone(), include_derived_data_rdfs)
    }

    fn from_edges(edges: SchemaEdges<T>, vocabulary: Vocabulary<T>, include_derived_data_rdfs: bool) -> Self {
        let super_classes = transitive_closure(&edges.subclass_of);
        let sub_classes = invert(&super_classes);
        let super_properties = transitive_closure(&edges.subproperty_of);
        let sub_properties = invert(&super_properties);

        let taxonomy = Self {
            super_classes_inc: reflexive(&super_classes, &edges.subclass_of),
            sub_classes_inc: reflexive(&sub_classes, &edges.subclass_of),
            super_properties_inc: reflexive(&super_properties, &edges.subproperty_of),
            sub_properties_inc: reflexive(&sub_properties, &edges.subproperty_of),
            properties_with_domain: invert(&edges.domain),
            properties_with_range: invert(&edges.range),
            super_classes,
            sub_classes,
            super_properties,
            sub_properties,
            edges,
            vocabulary,
            include_derived_data_rdfs,
            empty: HashSet::new(),
        };

        tracing::debug!(
            classes = taxonomy.super_classes_inc.len(),
            properties = taxonomy.super_properties_inc.len(),
            domains = taxonomy.edges.domain.len(),
            ranges = taxonomy.edges.range.len(),
            "taxonomy built"
        );
        taxonomy
    }

    /// Taxonomy augmented with the schema triples found in `data`
    ///
    /// Returns `None` when the flag is off or `data` adds no new edge.
    pub fn with_data_schema<S: RelSource<T> + ?Sized>(&self, data: &S) -> Option<Self> {
        if !self.include_derived_data_rdfs {
            return None;
        }
        let mut edges = self.edges.clone();
        if edges.load(data, &self.vocabulary) == 0 {
            return None;
        }
        Some(Self::from_edges(edges, self.vocabulary.clone(), true))
    }

    fn lookup<'a>(&'a self, index: &'a Index<T>, term: &T) -> &'a HashSet<T> {
        index.get(term).unwrap_or(&self.empty)
    }

    pub fn vocabulary(&self) -> &Vocabulary<T> {
        &self.vocabulary
    }

    pub fn include_derived_data_rdfs(&self) -> bool {
        self.include_derived_data_rdfs
    }

    pub fn super_classes(&self, class: &T) -> &HashSet<T> {
        self.lookup(&self.super_classes, class)
    }

    pub fn super_classes_inc(&self, class: &T) -> &HashSet<T> {
        self.lookup(&self.super_classes_inc, class)
    }

    pub fn sub_classes(&self, class: &T) -> &HashSet<T> {
        self.lookup(&self.sub_classes, class)
    }

    pub fn sub_classes_inc(&self, class: &T) -> &HashSet<T> {
        self.lookup(&self.sub_classes_inc, class)
    }

    pub fn super_properties(&self, property: &T) -> &HashSet<T> {
        self.lookup(&self.super_properties, property)
    }

    pub fn super_properties_inc(&self, property: &T) -> &HashSet<T> {
        self.lookup(&self.super_properties_inc, property)
    }

    pub fn sub_properties(&self, property: &T) -> &HashSet<T> {
        self.lookup(&self.sub_properties, property)
    }

    pub fn sub_properties_inc(&self, property: &T) -> &HashSet<T> {
        self.lookup(&self.sub_properties_inc, property)
    }

    /// Classes declared as the domain of `property`
    pub fn domain(&self, property: &T) -> &HashSet<T> {
        self.lookup(&self.edges.domain, property)
    }

    /// Classes declared as the range of `property`
    pub fn range(&self, property: &T) -> &HashSet<T> {
        self.lookup(&self.edges.range, property)
    }

    pub fn properties_with_domain(&self, class: &T) -> &HashSet<T> {
        self.lookup(&self.properties_with_domain, class)
    }

    pub fn properties_with_range(&self, class: &T) -> &HashSet<T> {
        self.lookup(&self.properties_with_range, class)
    }

    pub fn has_domain_declarations(&self) -> bool {
        !self.edges.domain.is_empty()
    }

    pub fn has_range_declarations(&self) -> bool {
        !self.edges.range.is_empty()
    }

    /// True when no schema edge was loaded
    pub fn is_empty(&self) -> bool {
        self.edges.subclass_of.is_empty()
            && self.edges.subproperty_of.is_empty()
            && self.edges.domain.is_empty()
            && self.edges.range.is_empty()
    }
}
