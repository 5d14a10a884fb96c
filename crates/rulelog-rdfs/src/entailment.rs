//! RDFS type and property entailment over a data source

use crate::taxonomy::Taxonomy;
use rulelog_core::{Rel, Term, TermValue};
use rulelog_store::{RelSource, RelStore};
use std::borrow::Cow;

/// Applies the subproperty, domain, range and subclass rules of RDFS
///
/// Every derivation depends on a single input triple, so entailing a
/// delta is sound on its own. One call reaches the fixpoint for the
/// given taxonomy.
#[derive(Debug, Clone, Copy)]
pub struct RdfsEntailment<'t, T> {
    taxonomy: &'t Taxonomy<T>,
}

impl<'t, T: TermValue> RdfsEntailment<'t, T> {
    pub fn new(taxonomy: &'t Taxonomy<T>) -> Self {
        Self { taxonomy }
    }

    pub fn taxonomy(&self) -> &'t Taxonomy<T> {
        self.taxonomy
    }

    /// Facts entailed by `data` that `data` does not already contain
    pub fn entail<S: RelSource<T> + ?Sized>(&self, data: &S) -> RelStore<T> {
        self.entail_triples(data, data.find(&Rel::triple(Term::Any, Term::Any, Term::Any)))
    }

    /// Entailments of `triples`, judged new against `known`
    pub fn entail_triples<'a, S: RelSource<T> + ?Sized>(
        &self,
        known: &S,
        triples: impl Iterator<Item = &'a Rel<T>>,
    ) -> RelStore<T> {
        let taxonomy: Cow<'_, Taxonomy<T>> = match self.taxonomy.with_data_schema(known) {
            Some(augmented) => Cow::Owned(augmented),
            None => Cow::Borrowed(self.taxonomy),
        };
        let rdf_type = &taxonomy.vocabulary().rdf_type;

        let mut derived = RelStore::new();
        let mut emit = |fact: Rel<T>| {
            if !known.contains(&fact) {
                derived.add(fact);
            }
        };

        for triple in triples {
            let [Term::Const(subject), Term::Const(predicate), Term::Const(object)] = triple.terms() else {
                continue;
            };

            let properties = std::iter::once(predicate).chain(taxonomy.super_properties(predicate));
            for property in properties {
                if property != predicate {
                    emit(Rel::fact(subject.clone(), property.clone(), object.clone()));
                }

                for class in taxonomy.domain(property) {
                    Self::emit_type(&taxonomy, subject, class, &mut emit);
                }
                for class in taxonomy.range(property) {
                    Self::emit_type(&taxonomy, object, class, &mut emit);
                }
                if property == rdf_type {
                    Self::emit_type(&taxonomy, subject, object, &mut emit);
                }
            }
        }

        tracing::trace!(derived = derived.len(), "rdfs entailment");
        derived
    }

    /// `(x rdf:type class)` and the same for every super-class
    fn emit_type(taxonomy: &Taxonomy<T>, instance: &T, class: &T, emit: &mut impl FnMut(Rel<T>)) {
        let rdf_type = &taxonomy.vocabulary().rdf_type;
        emit(Rel::fact(instance.clone(), rdf_type.clone(), class.clone()));
        for parent in taxonomy.super_classes(class) {
            emit(Rel::fact(instance.clone(), rdf_type.clone(), parent.clone()));
        }
    }
}
