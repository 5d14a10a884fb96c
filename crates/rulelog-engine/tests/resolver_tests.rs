//! SLD resolution

use rulelog_core::{Binding, Node, Rel, Term};
use rulelog_engine::*;
use rulelog_rules::{parse_atom, parse_facts, parse_rule_set};
use rulelog_store::{RelSource, RelStore};
use std::collections::{BTreeMap, BTreeSet};

const FAMILY: &str = r#"
grandparent(?x, ?z) <- parent(?x, ?y), parent(?y, ?z) .
greatgrandparent(?x, ?w) <- grandparent(?x, ?y), parent(?y, ?w) .
relative(?x, ?y) <- parent(?x, ?y) .
relative(?x, ?y) <- grandparent(?x, ?y) .
"#;

const PARENTS: &str = "parent(:a, :b) . parent(:b, :c) . parent(:c, :d) . parent(:a, :e) .";

fn resolver() -> SldResolver<Node> {
    SldResolver::new(parse_rule_set(FAMILY).unwrap()).unwrap()
}

fn query(text: &str) -> Rel<Node> {
    parse_atom(text, &BTreeMap::new()).unwrap()
}

fn answers(resolver: &SldResolver<Node>, data: &RelStore<Node>, pattern: &str) -> BTreeSet<String> {
    resolver
        .solve(data, &query(pattern))
        .map(|binding| binding.to_string())
        .collect()
}

#[test]
fn test_facts_only() {
    let data = parse_facts(PARENTS).unwrap();
    assert_eq!(
        answers(&resolver(), &data, "parent(:a, ?y)"),
        BTreeSet::from(["{?y = :b}".to_string(), "{?y = :e}".to_string()])
    );
}

#[test]
fn test_one_rule_step() {
    let data = parse_facts(PARENTS).unwrap();
    assert_eq!(
        answers(&resolver(), &data, "grandparent(?x, :c)"),
        BTreeSet::from(["{?x = :a}".to_string()])
    );
}

#[test]
fn test_nested_rules() {
    let data = parse_facts(PARENTS).unwrap();
    assert_eq!(
        answers(&resolver(), &data, "greatgrandparent(?x, ?w)"),
        BTreeSet::from(["{?w = :d, ?x = :a}".to_string()])
    );
}

#[test]
fn test_alternative_rules_in_order() {
    let data = parse_facts(PARENTS).unwrap();
    let resolver = resolver();
    let found: Vec<String> = resolver
        .solve(&data, &query("relative(:a, ?y)"))
        .map(|binding| binding.to_string())
        .collect();

    // Direct parents (first rule) come before grandchildren (second rule)
    assert_eq!(found.len(), 3);
    assert_eq!(found.last().map(String::as_str), Some("{?y = :c}"));
}

#[test]
fn test_ground_query() {
    let data = parse_facts(PARENTS).unwrap();
    let resolver = resolver();
    let mut proofs = resolver.solve(&data, &query("grandparent(:a, :c)"));
    assert_eq!(proofs.next(), Some(Binding::new()));
    assert_eq!(proofs.next(), None);

    assert_eq!(resolver.solve(&data, &query("grandparent(:a, :b)")).count(), 0);
}

#[test]
fn test_wildcards_are_not_reported() {
    let data = parse_facts(PARENTS).unwrap();
    let found = answers(&resolver(), &data, "grandparent(?x, _)");
    assert_eq!(found, BTreeSet::from(["{?x = :a}".to_string(), "{?x = :b}".to_string()]));
}

#[test]
fn test_embedded_facts_are_visible() {
    let rules = parse_rule_set("p(?x) <- q(?x) . q(:inside) .").unwrap();
    let resolver = SldResolver::new(rules).unwrap();
    let data = parse_facts("q(:outside) .").unwrap();

    let found: BTreeSet<String> = resolver
        .solve(&data, &query("p(?x)"))
        .map(|binding| binding.to_string())
        .collect();
    assert_eq!(found.len(), 2);
}

#[test]
fn test_renaming_keeps_firings_apart() {
    // Both body atoms use the same rule; their variables must not collide
    let data = parse_facts(PARENTS).unwrap();
    let resolver = resolver();
    let mut solutions = resolver.solve(&data, &query("greatgrandparent(?x, ?w)"));

    let first = solutions.next().unwrap();
    assert_eq!(first.value_of("x"), Some(&Node::new(":a")));
    assert_eq!(first.value_of("w"), Some(&Node::new(":d")));
    assert!(solutions.renamed_variables() >= 5);
}

#[test]
fn test_solve_is_restartable() {
    let data = parse_facts(PARENTS).unwrap();
    let resolver = resolver();
    let first = answers(&resolver, &data, "relative(?x, ?y)");
    let second = answers(&resolver, &data, "relative(?x, ?y)");
    assert_eq!(first, second);
    assert_eq!(first.len(), 6);
}

#[test]
fn test_recursive_rule_set_is_rejected() {
    let rules = parse_rule_set("ancestor(?x, ?z) <- ancestor(?x, ?y), parent(?y, ?z) .").unwrap();
    match SldResolver::new(rules) {
        Err(EngineError::RecursiveRuleSet { cycle }) => assert_eq!(cycle, "ancestor -> ancestor"),
        other => panic!("expected a recursion error, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_exec_materialises_every_head() {
    let data = parse_facts(PARENTS).unwrap();
    let store = resolver().exec(&data);

    assert!(store.contains(&Rel::new("grandparent", [Term::from(":a"), Term::from(":c")])));
    assert!(store.contains(&Rel::new("greatgrandparent", [Term::from(":a"), Term::from(":d")])));
    // 4 parents, 2 grandparents, 1 great-grandparent, 6 relatives
    assert_eq!(store.len(), 13);
}

#[test]
fn test_builder_dispatch() {
    let rules = parse_rule_set(FAMILY).unwrap();

    let engine = EngineBuilder::new().kind(EngineKind::BackwardSld).rules(rules.clone()).build().unwrap();
    assert_eq!(engine.kind(), EngineKind::BackwardSld);

    for kind in [EngineKind::BackwardQsqr, EngineKind::BackwardQsqi, EngineKind::ForwardJacobi, EngineKind::ForwardGaussSeidel] {
        let result = EngineBuilder::new().kind(kind).rules(rules.clone()).build();
        assert!(matches!(result, Err(EngineError::UnsupportedEngine(k)) if k == kind));
    }

    assert!(matches!(
        EngineBuilder::<Node>::new().build(),
        Err(EngineError::MissingField("rules"))
    ));
}

#[test]
fn test_reasoner_trait_objects_agree() {
    let data = parse_facts(PARENTS).unwrap();
    let rules = parse_rule_set(FAMILY).unwrap();
    let pattern = query("relative(?x, ?y)");

    let mut results = Vec::new();
    for kind in [EngineKind::ForwardNaive, EngineKind::ForwardSemiNaive, EngineKind::BackwardSld] {
        let engine = EngineBuilder::new().kind(kind).rules(rules.clone()).build().unwrap();
        let found: BTreeSet<String> = engine
            .solve(&data, &pattern)
            .unwrap()
            .map(|binding| binding.to_string())
            .collect();
        results.push(found);

        assert_eq!(engine.exec(&data).unwrap().len(), 13);
    }
    assert_eq!(results[0], results[1]);
    assert_eq!(results[1], results[2]);
}

#[test]
fn test_query_variables_never_meet_renamed_ones() {
    let rules = parse_rule_set("p(?x, ?y) <- q(?x), r(?y) .").unwrap();
    let data = parse_facts("q(:a) . r(:b) .").unwrap();
    let resolver = SldResolver::new(rules).unwrap();

    for text in ["p(?s, ?t)", "p(?_v1, ?_v0)", "p(?_v0, ?_v1)"] {
        let pattern = query(text);
        let found: Vec<Binding<Node>> = resolver.solve(&data, &pattern).collect();
        assert_eq!(found.len(), 1, "{}", text);

        let vars = pattern.variables();
        assert_eq!(found[0].get(vars[0]), Some(&Node::new(":a")), "{}", text);
        assert_eq!(found[0].get(vars[1]), Some(&Node::new(":b")), "{}", text);
    }
}

#[test]
fn test_backward_rejects_a_taxonomy() {
    let vocab = parse_facts("(:Dog, <http://www.w3.org/2000/01/rdf-schema#subClassOf>, :Animal) .").unwrap();
    let taxonomy = std::sync::Arc::new(rulelog_rdfs::Taxonomy::new(&vocab, &rulelog_rdfs::Vocabulary::rdfs(), false));

    let result = EngineBuilder::new()
        .kind(EngineKind::BackwardSld)
        .rules(parse_rule_set(FAMILY).unwrap())
        .taxonomy(taxonomy)
        .build();
    assert!(matches!(result, Err(EngineError::TaxonomyUnsupported(EngineKind::BackwardSld))));
}

#[test]
fn test_invalid_var_base_fails_the_build() {
    let options = EngineOptions {
        var_base: "v#".to_string(),
        ..EngineOptions::default()
    };
    let result = EngineBuilder::new()
        .kind(EngineKind::BackwardSld)
        .rules(parse_rule_set(FAMILY).unwrap())
        .options(options)
        .build();
    assert!(matches!(result, Err(EngineError::InvalidVarBase(base)) if base == "v#"));
}
