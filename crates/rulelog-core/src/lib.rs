//! # Rulelog Core
//!
//! Data model shared by every rulelog crate: constants, variables,
//! relations, rules and rule sets, plus positional unification and
//! fresh-variable renaming.
//!
//! All engine code is generic over a [`TermValue`]; [`Node`] is the
//! interned-string term space used by the parser and the CLI.

pub mod binding;
pub mod error;
pub mod node;
pub mod relation;
pub mod rename;
pub mod rule;
pub mod term;

pub use binding::{unify, Binding};
pub use error::RuleError;
pub use node::{Node, TermValue};
pub use relation::{Rel, Terms, PREDICATE_POSITION};
pub use rename::{VarAlloc, DEFAULT_VAR_BASE};
pub use rule::{Rule, RuleSet, RuleSetBuilder};
pub use term::{Term, Var};

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn constant() -> impl Strategy<Value = Term<Node>> {
        prop_oneof![Just(":a"), Just(":b"), Just(":c")].prop_map(Term::from)
    }

    fn pattern_term() -> impl Strategy<Value = Term<Node>> {
        prop_oneof![
            constant(),
            prop_oneof![Just("x"), Just("y")].prop_map(Term::var),
            Just(Term::Any),
        ]
    }

    proptest! {
        #[test]
        fn unify_result_grounds_the_pattern(
            pattern in proptest::collection::vec(pattern_term(), 3),
            fact in proptest::collection::vec(constant(), 3),
        ) {
            let pattern = Rel::new("r", pattern);
            let fact = Rel::new("r", fact);

            if let Some(binding) = unify(&pattern, &fact, &Binding::new()) {
                // Every variable is bound and substitution reproduces the fact
                // in every non-wildcard position.
                let applied = binding.apply(&pattern);
                for (term, value) in applied.terms().iter().zip(fact.terms()) {
                    if !term.is_any() {
                        prop_assert_eq!(term, value);
                    }
                }
            } else {
                prop_assert!(!pattern.matches(&fact) || pattern.variables().len() < pattern.terms().iter().filter(|t| t.as_var().is_some()).count());
            }
        }

        #[test]
        fn renaming_is_injective_within_a_run(firings in 1usize..6) {
            let rule = Rule::new(
                Rel::new("p", [Term::var("x"), Term::var("y")]),
                vec![Rel::new("q", [Term::<Node>::var("x"), Term::var("y")])],
            );
            let mut alloc = VarAlloc::default();
            let mut names = std::collections::HashSet::new();
            for _ in 0..firings {
                let renamed = rule.rename(&mut alloc);
                for var in renamed.head().variables() {
                    prop_assert!(names.insert(var.clone()));
                }
            }
        }
    }
}
