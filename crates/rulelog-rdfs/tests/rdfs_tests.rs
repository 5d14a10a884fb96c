use rulelog_core::{Node, Rel};
use rulelog_rdfs::vocabulary::{RDFS_DOMAIN, RDFS_RANGE, RDFS_SUBCLASS_OF, RDFS_SUBPROPERTY_OF, RDF_TYPE};
use rulelog_rdfs::*;
use rulelog_store::{RelSource, RelStore};
use std::collections::HashSet;

fn triple(subject: &str, predicate: &str, object: &str) -> Rel<Node> {
    Rel::fact(Node::new(subject), Node::new(predicate), Node::new(object))
}

fn set(terms: &[&str]) -> HashSet<Node> {
    terms.iter().map(Node::new).collect()
}

fn animal_ontology() -> RelStore<Node> {
    vec![
        triple(":Dog", RDFS_SUBCLASS_OF, ":Animal"),
        triple(":Animal", RDFS_SUBCLASS_OF, ":Thing"),
        triple(":hasLeg", RDFS_SUBPROPERTY_OF, ":hasPart"),
        triple(":hasPart", RDFS_SUBPROPERTY_OF, ":relatedTo"),
        triple(":hasLeg", RDFS_DOMAIN, ":Animal"),
        triple(":hasLeg", RDFS_RANGE, ":Leg"),
    ]
    .into_iter()
    .collect()
}

fn taxonomy() -> Taxonomy<Node> {
    Taxonomy::new(&animal_ontology(), &Vocabulary::rdfs(), false)
}

#[test]
fn test_subclass_hierarchy() {
    let taxonomy = taxonomy();
    let dog = Node::new(":Dog");

    assert_eq!(taxonomy.super_classes(&dog), &set(&[":Animal", ":Thing"]));
    assert_eq!(taxonomy.super_classes_inc(&dog), &set(&[":Dog", ":Animal", ":Thing"]));
    assert!(taxonomy.super_classes(&Node::new(":Unknown")).is_empty());
    assert!(taxonomy.super_classes_inc(&Node::new(":Unknown")).is_empty());
}

#[test]
fn test_subclass_inverse() {
    let taxonomy = taxonomy();
    let thing = Node::new(":Thing");

    assert_eq!(taxonomy.sub_classes(&thing), &set(&[":Dog", ":Animal"]));
    assert_eq!(taxonomy.sub_classes_inc(&thing), &set(&[":Dog", ":Animal", ":Thing"]));
    assert!(taxonomy.sub_classes(&Node::new(":Dog")).is_empty());
    assert_eq!(taxonomy.sub_classes_inc(&Node::new(":Dog")), &set(&[":Dog"]));
    assert_eq!(taxonomy.super_classes_inc(&thing), &set(&[":Thing"]));
}

#[test]
fn test_property_hierarchy() {
    let taxonomy = taxonomy();
    let has_leg = Node::new(":hasLeg");

    assert_eq!(taxonomy.super_properties(&has_leg), &set(&[":hasPart", ":relatedTo"]));
    assert_eq!(
        taxonomy.super_properties_inc(&has_leg),
        &set(&[":hasLeg", ":hasPart", ":relatedTo"])
    );
    assert_eq!(
        taxonomy.sub_properties(&Node::new(":relatedTo")),
        &set(&[":hasLeg", ":hasPart"])
    );
    assert_eq!(taxonomy.sub_properties_inc(&Node::new(":hasPart")), &set(&[":hasPart", ":hasLeg"]));
}

#[test]
fn test_domain_and_range_are_direct() {
    let taxonomy = taxonomy();

    assert_eq!(taxonomy.domain(&Node::new(":hasLeg")), &set(&[":Animal"]));
    assert_eq!(taxonomy.range(&Node::new(":hasLeg")), &set(&[":Leg"]));
    // Not inherited through subPropertyOf
    assert!(taxonomy.domain(&Node::new(":hasPart")).is_empty());

    assert_eq!(taxonomy.properties_with_domain(&Node::new(":Animal")), &set(&[":hasLeg"]));
    assert_eq!(taxonomy.properties_with_range(&Node::new(":Leg")), &set(&[":hasLeg"]));
    assert!(taxonomy.properties_with_range(&Node::new(":Animal")).is_empty());

    assert!(taxonomy.has_domain_declarations());
    assert!(taxonomy.has_range_declarations());
}

#[test]
fn test_empty_vocabulary() {
    let taxonomy = Taxonomy::new(&RelStore::<Node>::new(), &Vocabulary::rdfs(), true);
    assert!(taxonomy.is_empty());
    assert!(!taxonomy.has_domain_declarations());
    assert!(!taxonomy.has_range_declarations());
    assert!(taxonomy.include_derived_data_rdfs());
}

#[test]
fn test_entailment_types_and_properties() {
    let taxonomy = taxonomy();
    let data: RelStore<Node> = vec![triple(":rex", ":hasLeg", ":leg1"), triple(":fido", RDF_TYPE, ":Dog")]
        .into_iter()
        .collect();

    let derived = RdfsEntailment::new(&taxonomy).entail(&data);

    let expected: RelStore<Node> = vec![
        triple(":rex", ":hasPart", ":leg1"),
        triple(":rex", ":relatedTo", ":leg1"),
        triple(":rex", RDF_TYPE, ":Animal"),
        triple(":rex", RDF_TYPE, ":Thing"),
        triple(":leg1", RDF_TYPE, ":Leg"),
        triple(":fido", RDF_TYPE, ":Animal"),
        triple(":fido", RDF_TYPE, ":Thing"),
    ]
    .into_iter()
    .collect();
    assert_eq!(derived, expected);
}

#[test]
fn test_entailment_returns_only_new_facts() {
    let taxonomy = taxonomy();
    let data: RelStore<Node> = vec![
        triple(":fido", RDF_TYPE, ":Dog"),
        triple(":fido", RDF_TYPE, ":Animal"),
    ]
    .into_iter()
    .collect();

    let derived = RdfsEntailment::new(&taxonomy).entail(&data);
    assert_eq!(derived.len(), 1);
    assert!(derived.contains(&triple(":fido", RDF_TYPE, ":Thing")));
}

#[test]
fn test_entailment_is_a_fixpoint() {
    let taxonomy = taxonomy();
    let mut data: RelStore<Node> = vec![triple(":rex", ":hasLeg", ":leg1")].into_iter().collect();

    let entailment = RdfsEntailment::new(&taxonomy);
    let derived = entailment.entail(&data);
    data.extend_from(&derived);

    assert!(entailment.entail(&data).is_empty());
}

#[test]
fn test_data_schema_only_with_flag() {
    let data: RelStore<Node> = vec![
        triple(":Cat", RDFS_SUBCLASS_OF, ":Animal"),
        triple(":tom", RDF_TYPE, ":Cat"),
    ]
    .into_iter()
    .collect();

    let strict = Taxonomy::new(&animal_ontology(), &Vocabulary::rdfs(), false);
    assert!(strict.with_data_schema(&data).is_none());
    let derived = RdfsEntailment::new(&strict).entail(&data);
    assert!(derived.is_empty());

    let open = Taxonomy::new(&animal_ontology(), &Vocabulary::rdfs(), true);
    let augmented = open.with_data_schema(&data).unwrap();
    assert_eq!(augmented.super_classes(&Node::new(":Cat")), &set(&[":Animal", ":Thing"]));

    let derived = RdfsEntailment::new(&open).entail(&data);
    assert!(derived.contains(&triple(":tom", RDF_TYPE, ":Animal")));
    assert!(derived.contains(&triple(":tom", RDF_TYPE, ":Thing")));
}

#[test]
fn test_generic_term_space() {
    let vocabulary = Vocabulary::from_iris(|iri| match iri {
        RDFS_SUBCLASS_OF => 1u32,
        RDFS_SUBPROPERTY_OF => 2,
        RDFS_DOMAIN => 3,
        RDFS_RANGE => 4,
        _ => 5,
    });
    let store: RelStore<u32> = vec![Rel::fact(10, 1, 11), Rel::fact(11, 1, 12)].into_iter().collect();

    let taxonomy = Taxonomy::new(&store, &vocabulary, false);
    assert_eq!(taxonomy.super_classes(&10), &HashSet::from([11, 12]));
    assert_eq!(taxonomy.sub_classes_inc(&12), &HashSet::from([10, 11, 12]));
}
