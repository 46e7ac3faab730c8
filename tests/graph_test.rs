//! Tests for the graph model's construction and read surface, exercised the
//! way an emitter or programmatic builder would use it.

use onya_core::{
    graph::{AssertionOwner, Graph, MatchedValue, Origin},
    iri::Iri,
};
use test_log::test;

fn t(suffix: &str) -> Iri {
    Iri::new(format!("http://example.org/{suffix}"))
}

fn s(suffix: &str) -> Iri {
    Iri::new(format!("https://schema.org/{suffix}"))
}

#[test]
fn build_and_traverse_programmatically() {
    let mut g = Graph::new();

    let spam = g.node(t("spam"), [t("Thing")]);
    let spam_ref = g.node_ref(spam);
    assert_eq!(spam_ref.iri().as_str(), "http://example.org/spam");
    assert_eq!(spam_ref.types().len(), 1);
    assert_eq!(spam_ref.properties().count(), 0);

    g.add_property(Origin::Node(spam), t("title"), "Give me a cookie!");
    g.add_property(Origin::Node(spam), t("genre"), "troublemaker");
    assert_eq!(g.node_ref(spam).properties().count(), 2);

    let homer = g.node(t("Homer"), [t("Agent")]);
    let maker = g.add_edge(Origin::Node(spam), t("maker"), homer);
    assert_eq!(g.node_ref(spam).properties().count(), 2);
    assert_eq!(g.node_ref(spam).edges().count(), 1);

    let traversed: Vec<_> = g.node_ref(spam).traverse("http://example.org/maker").collect();
    assert_eq!(traversed.len(), 1);
    assert_eq!(traversed[0].id(), maker);
    // Same fact, different idiom.
    let targets: Vec<_> = g
        .node_ref(spam)
        .traverse("http://example.org/maker")
        .filter_map(|e| e.target())
        .map(|n| n.id())
        .collect();
    assert_eq!(targets, vec![homer]);
}

#[test]
fn demo_workflow_people_graph() {
    // The shape the diagram emitters consume: a few typed nodes, literal
    // properties, a knows-cycle, and a reified relationship.
    let mut g = Graph::new();

    let chuks = g.node(t("people/Chuks"), [s("Person")]);
    let ify = g.node(t("people/Ify"), [s("Person")]);
    let ada = g.node(t("people/Ada"), [s("Person")]);

    g.add_property(Origin::Node(chuks), s("name"), "Chukwuemeka Okafor");
    g.add_property(Origin::Node(chuks), s("jobTitle"), "Software Engineer");
    g.add_property(Origin::Node(ify), s("name"), "Ifeoma Eze");
    g.add_property(Origin::Node(ada), s("name"), "Ada Nwankwo");

    g.add_edge(Origin::Node(chuks), s("knows"), ify);
    g.add_edge(Origin::Node(ify), s("knows"), ada);
    let back = g.add_edge(Origin::Node(ada), s("knows"), chuks);
    g.add_property(Origin::Assertion(back), s("since"), "2019");

    assert_eq!(g.len(), 3);
    assert_eq!(g.size(), 8);

    let person_types = [s("Person")];
    let people: Vec<_> = g.typematch(&person_types).collect();
    assert_eq!(people.len(), 3);

    // Who knows Chuks?
    let chuks_ref = g.node_ref(chuks);
    let known_by: Vec<_> = chuks_ref
        .reverse("https://schema.org/knows")
        .map(|e| e.origin())
        .collect();
    assert_eq!(known_by, vec![Origin::Node(ada)]);

    // The reified edge exposes its annotation in the flattened view.
    let matches: Vec<_> = g
        .match_assertions(None, Some("https://schema.org/knows"), None)
        .collect();
    assert_eq!(matches.len(), 3);
    let annotated: Vec<_> = matches
        .iter()
        .filter(|m| !m.annotations.is_empty())
        .collect();
    assert_eq!(annotated.len(), 1);
    assert_eq!(annotated[0].value, MatchedValue::Node(&t("people/Chuks")));
    assert_eq!(
        annotated[0].annotations.get(&s("since")).copied(),
        Some("2019")
    );
}

#[test]
fn match_value_filter_covers_text_and_targets() {
    let mut g = Graph::new();
    let a = g.get_or_create(t("A"));
    let b = g.get_or_create(t("B"));
    g.add_property(Origin::Node(a), s("name"), "Alice");
    g.add_edge(Origin::Node(a), s("knows"), b);

    let by_text: Vec<_> = g.match_assertions(None, None, Some("Alice")).collect();
    assert_eq!(by_text.len(), 1);
    assert_eq!(by_text[0].label, &s("name"));

    let by_target: Vec<_> = g
        .match_assertions(None, None, Some("http://example.org/B"))
        .collect();
    assert_eq!(by_target.len(), 1);
    assert_eq!(by_target[0].label, &s("knows"));
}

#[test]
fn removal_prunes_the_read_surface() {
    let mut g = Graph::new();
    let n = g.get_or_create(t("n"));
    let keep = g.add_property(Origin::Node(n), s("keep"), "yes");
    let drop = g.add_property(Origin::Node(n), s("drop"), "no");
    let target = g.get_or_create(t("m"));
    let edge = g.add_edge(Origin::Node(n), s("link"), target);

    assert!(g.remove_property(Origin::Node(n), drop));
    assert!(g.remove_edge(Origin::Node(n), edge));
    assert!(!g.remove_edge(Origin::Node(n), edge));

    let n_ref = g.node_ref(n);
    let remaining: Vec<_> = n_ref.properties().map(|p| p.id()).collect();
    assert_eq!(remaining, vec![keep]);
    assert_eq!(n_ref.edges().count(), 0);
    assert_eq!(g.size(), 1);
}

#[test]
fn graph_serializes_and_restores() {
    let mut g = Graph::new();
    let a = g.get_or_create(t("A"));
    let b = g.get_or_create(t("B"));
    let knows = g.add_edge(Origin::Node(a), s("knows"), b);
    g.add_property(Origin::Assertion(knows), s("since"), "2020");

    let json = serde_json::to_string(&g).unwrap();
    let restored: Graph = serde_json::from_str(&json).unwrap();
    assert_eq!(restored.len(), g.len());
    assert_eq!(restored.size(), g.size());
    let a = restored.get("http://example.org/A").unwrap();
    let knows: Vec<_> = a.traverse("https://schema.org/knows").collect();
    assert_eq!(knows[0].annotations().get(&s("since")).copied(), Some("2020"));
}
