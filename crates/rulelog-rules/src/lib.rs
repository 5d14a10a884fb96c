//! # Rulelog Rules
//!
//! Textual syntax for rule sets and fact documents.
//!
//! ```text
//! @prefix ex: <http://example.org/> .
//!
//! ex:parent(:alice, :bob) .
//! ancestor(?x, ?y) <- ex:parent(?x, ?y) .
//! ancestor(?x, ?z) :- ancestor(?x, ?y), ancestor(?y, ?z) .
//! (?x, <http://www.w3.org/1999/02/22-rdf-syntax-ns#type>, ex:Person) <- ancestor(?x, _) .
//! ```
//!
//! A relation without a name is the positional triple relation.

pub mod error;
pub mod lexer;
pub mod parser;

pub use error::{ParseError, ParseErrorKind};
pub use parser::{parse_atom, parse_document, parse_facts, parse_rule_set, Document, Statement};

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rulelog_core::{Node, Rel, Term};
    use std::collections::BTreeMap;

    proptest! {
        #[test]
        fn displayed_atoms_parse_back(
            name in "[a-z][a-z0-9]{0,6}",
            args in proptest::collection::vec(prop_oneof![
                "[a-z][a-z0-9]{0,5}".prop_map(|s| Term::Const(Node::new(format!(":{}", s)))),
                "[a-z][a-z0-9]{0,5}".prop_map(Term::var),
                Just(Term::Any),
            ], 1..5),
        ) {
            let atom = Rel::new(name, args);
            let parsed = parse_atom(&atom.to_string(), &BTreeMap::new()).unwrap();
            prop_assert_eq!(parsed, atom);
        }
    }
}
