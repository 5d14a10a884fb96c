//! Forward chaining

use rulelog_core::{Node, Rel, RuleSet, Term};
use rulelog_engine::*;
use rulelog_rdfs::vocabulary::{RDFS_SUBCLASS_OF, RDF_TYPE};
use rulelog_rdfs::{Taxonomy, Vocabulary};
use rulelog_rules::{parse_facts, parse_rule_set};
use rulelog_store::{RelSource, RelStore};
use std::sync::Arc;

const ANCESTOR: &str = r#"
ancestor(:a, :b) .
ancestor(:b, :c) .
ancestor(:c, :d) .
ancestor(?x, ?z) <- ancestor(?x, ?y), ancestor(?y, ?z) .
"#;

fn ancestor(x: &str, y: &str) -> Rel<Node> {
    Rel::new("ancestor", [Term::from(x), Term::from(y)])
}

fn build(kind: EngineKind, rules: RuleSet<Node>) -> ForwardChainer<Node> {
    EngineBuilder::new().kind(kind).rules(rules).build_forward().unwrap()
}

#[test]
fn test_ancestor_fixpoint() {
    for kind in [EngineKind::ForwardNaive, EngineKind::ForwardSemiNaive] {
        let rules = parse_rule_set(ANCESTOR).unwrap();
        let (store, stats) = build(kind, rules).exec_with_stats(&RelStore::new()).unwrap();

        assert_eq!(store.len(), 6, "{}", kind);
        assert!(store.contains(&ancestor(":a", ":c")));
        assert!(store.contains(&ancestor(":a", ":d")));
        assert!(store.contains(&ancestor(":b", ":d")));
        assert_eq!(stats.facts_derived, 3);
        assert!(stats.rounds <= 4, "{} took {} rounds", kind, stats.rounds);
    }
}

#[test]
fn test_data_and_embedded_facts_are_merged() {
    let rules = parse_rule_set("ancestor(?x, ?y) <- parent(?x, ?y) . parent(:b, :c) .").unwrap();
    let data = parse_facts("parent(:a, :b) .").unwrap();

    let store = build(EngineKind::ForwardSemiNaive, rules).exec(&data).unwrap();
    assert!(store.contains(&ancestor(":a", ":b")));
    assert!(store.contains(&ancestor(":b", ":c")));
    assert_eq!(store.len(), 4);
}

#[test]
fn test_semi_naive_skips_unaffected_rules() {
    let rules = parse_rule_set(
        r#"
        q(?x) <- p(?x) .
        r(?x) <- q(?x) .
        s(?x) <- t(?x) .
        "#,
    )
    .unwrap();
    let data = parse_facts("p(:a) . t(:b) .").unwrap();

    let (semi, semi_stats) = build(EngineKind::ForwardSemiNaive, rules.clone()).exec_with_stats(&data).unwrap();
    let (naive, naive_stats) = build(EngineKind::ForwardNaive, rules).exec_with_stats(&data).unwrap();

    assert_eq!(semi, naive);
    assert_eq!(naive_stats.rules_skipped, 0);
    assert!(semi_stats.rules_skipped > 0);
    assert!(semi_stats.rules_fired < naive_stats.rules_fired);
}

#[test]
fn test_triple_rules() {
    let rules = parse_rule_set(
        r#"
        (?y, :knows, ?x) <- (?x, :knows, ?y) .
        friend(?x, ?y) <- (?x, :knows, ?y), (?y, :knows, ?x) .
        "#,
    )
    .unwrap();
    let data = parse_facts("(:alice, :knows, :bob) .").unwrap();

    let store = build(EngineKind::ForwardSemiNaive, rules).exec(&data).unwrap();
    assert!(store.contains(&Rel::fact(Node::new(":bob"), Node::new(":knows"), Node::new(":alice"))));
    assert!(store.contains(&Rel::new("friend", [Term::from(":alice"), Term::from(":bob")])));
    assert!(store.contains(&Rel::new("friend", [Term::from(":bob"), Term::from(":alice")])));
}

#[test]
fn test_round_limit() {
    let rules = parse_rule_set(ANCESTOR).unwrap();
    let options = EngineOptions {
        max_rounds: Some(1),
        ..EngineOptions::default()
    };
    let chainer = EngineBuilder::new().rules(rules).options(options).build_forward().unwrap();

    assert!(matches!(chainer.exec(&RelStore::new()), Err(EngineError::RoundLimit(1))));
}

#[test]
fn test_cancellation() {
    let cancel = CancelFlag::new();
    let chainer = EngineBuilder::new()
        .rules(parse_rule_set(ANCESTOR).unwrap())
        .cancel(cancel.clone())
        .build_forward()
        .unwrap();

    cancel.cancel();
    assert!(matches!(chainer.exec(&RelStore::new()), Err(EngineError::Cancelled)));

    cancel.reset();
    assert!(chainer.exec(&RelStore::new()).is_ok());
}

#[test]
fn test_rdfs_entailment_each_round() {
    let vocab: RelStore<Node> = vec![Rel::fact(
        Node::new(":Dog"),
        Node::new(RDFS_SUBCLASS_OF),
        Node::new(":Animal"),
    )]
    .into_iter()
    .collect();
    let taxonomy = Arc::new(Taxonomy::new(&vocab, &Vocabulary::rdfs(), false));

    let source = format!(
        "(?x, <{ty}>, :Dog) <- barks(?x) . pet(?x) <- (?x, <{ty}>, :Animal) .",
        ty = RDF_TYPE
    );
    let rules = parse_rule_set(&source).unwrap();
    let data = parse_facts("barks(:rex) .").unwrap();

    let store = EngineBuilder::new()
        .rules(rules)
        .taxonomy(taxonomy)
        .build_forward()
        .unwrap()
        .exec(&data)
        .unwrap();

    assert!(store.contains(&Rel::fact(Node::new(":rex"), Node::new(RDF_TYPE), Node::new(":Animal"))));
    assert!(store.contains(&Rel::new("pet", [Term::from(":rex")])));
}

#[test]
fn test_exec_with_stats_helper() {
    let (store, stats) = exec_with_stats(
        EngineKind::ForwardNaive,
        parse_rule_set(ANCESTOR).unwrap(),
        &RelStore::new(),
    )
    .unwrap();
    assert_eq!(store.len(), 6);
    assert_eq!(stats.rules_skipped, 0);

    assert!(matches!(
        exec_with_stats(EngineKind::BackwardSld, parse_rule_set(ANCESTOR).unwrap(), &RelStore::new()),
        Err(EngineError::UnsupportedEngine(EngineKind::BackwardSld))
    ));
}

#[test]
fn test_generic_term_space() {
    let mut builder = RuleSet::<u32>::builder();
    builder.add(rulelog_core::Rule::new(
        Rel::new("reach", [Term::var("x"), Term::var("z")]),
        vec![
            Rel::new("reach", [Term::var("x"), Term::var("y")]),
            Rel::new("edge", [Term::var("y"), Term::var("z")]),
        ],
    ));
    builder.add(rulelog_core::Rule::new(
        Rel::new("reach", [Term::var("x"), Term::var("y")]),
        vec![Rel::new("edge", [Term::var("x"), Term::var("y")])],
    ));
    let rules = builder.build().unwrap();

    let data: RelStore<u32> = (0..5u32)
        .map(|i| Rel::new("edge", [Term::Const(i), Term::Const(i + 1)]))
        .collect();
    let store = ForwardChainer::semi_naive(rules).exec(&data).unwrap();

    // 5 edges + 15 reachability pairs over a path of 6 nodes
    assert_eq!(store.len(), 20);
}
