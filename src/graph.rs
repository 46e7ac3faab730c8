//! The Onya graph model.
//!
//! - A graph is a collection of nodes, keyed by absolute IRI.
//! - Each node has an identifier, a set of type IRIs, and a set of
//!   assertions (edges and properties).
//! - Edges connect nodes to nodes via IRI labels; properties connect nodes
//!   to string values via IRI labels.
//! - Every assertion can itself be the origin of further assertions, so
//!   metadata-on-metadata nests naturally.
//!
//! Nodes and assertions live in arenas owned by the [`Graph`]; [`NodeId`] and
//! [`AssertionId`] are typed indices into those arenas, and an assertion
//! holds a non-owning [`Origin`] back-reference instead of a strong cycle.
//! Ids are only meaningful for the graph that produced them.
//!
//! Assertion identity is per-instance: an origin may carry several assertions
//! with the same label and even the same value, and nothing merges them.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::iri::Iri;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AssertionId(usize);

/// Non-owning back-reference from an assertion to whatever carries it. Both
/// variants expose the same assertion-owning capability through
/// [`Graph::add_property`] and [`Graph::add_edge`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Origin {
    Node(NodeId),
    Assertion(AssertionId),
}

/// What an assertion asserts: a literal string (property) or another node
/// (edge). Decided at creation, never re-inspected structurally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssertionValue {
    Text(String),
    Target(NodeId),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct NodeData {
    id: Iri,
    types: BTreeSet<Iri>,
    properties: Vec<AssertionId>,
    edges: Vec<AssertionId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct AssertionData {
    origin: Origin,
    label: Iri,
    value: AssertionValue,
    properties: Vec<AssertionId>,
    edges: Vec<AssertionId>,
}

/// A collection of nodes managed and queried together.
///
/// Nodes are unique per identifier: [`Graph::get_or_create`] looks the IRI up
/// before creating, so re-parsing another document into the same graph merges
/// on identity. Assertions are reachable only through their origin.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Graph {
    nodes: Vec<NodeData>,
    assertions: Vec<AssertionData>,
    index: BTreeMap<Iri, NodeId>,
}

impl Graph {
    pub fn new() -> Self {
        Graph::default()
    }

    /// Number of nodes in the graph.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn node_id(&self, id: &str) -> Option<NodeId> {
        self.index.get(id).copied()
    }

    pub fn get(&self, id: &str) -> Option<NodeRef<'_>> {
        self.node_id(id).map(|id| NodeRef { graph: self, id })
    }

    pub fn node_ref(&self, id: NodeId) -> NodeRef<'_> {
        NodeRef { graph: self, id }
    }

    pub fn assertion_ref(&self, id: AssertionId) -> AssertionRef<'_> {
        AssertionRef { graph: self, id }
    }

    /// Look the identifier up, creating the node on first reference.
    pub fn get_or_create(&mut self, id: Iri) -> NodeId {
        if let Some(existing) = self.index.get(id.as_str()) {
            return *existing;
        }
        let node_id = NodeId(self.nodes.len());
        self.nodes.push(NodeData {
            id: id.clone(),
            types: BTreeSet::new(),
            properties: Vec::new(),
            edges: Vec::new(),
        });
        self.index.insert(id, node_id);
        node_id
    }

    /// Convenience for constructing a node with initial types, merging with
    /// any node already registered under `id`.
    pub fn node(&mut self, id: Iri, types: impl IntoIterator<Item = Iri>) -> NodeId {
        let node_id = self.get_or_create(id);
        self.nodes[node_id.0].types.extend(types);
        node_id
    }

    pub fn add_type(&mut self, node: NodeId, type_iri: Iri) {
        self.nodes[node.0].types.insert(type_iri);
    }

    /// Attach a property assertion to `origin` and return its id.
    pub fn add_property(
        &mut self,
        origin: Origin,
        label: Iri,
        value: impl Into<String>,
    ) -> AssertionId {
        let id = AssertionId(self.assertions.len());
        self.assertions.push(AssertionData {
            origin,
            label,
            value: AssertionValue::Text(value.into()),
            properties: Vec::new(),
            edges: Vec::new(),
        });
        self.owned_list_mut(origin, false).push(id);
        id
    }

    /// Attach an edge assertion from `origin` to `target` and return its id.
    pub fn add_edge(&mut self, origin: Origin, label: Iri, target: NodeId) -> AssertionId {
        let id = AssertionId(self.assertions.len());
        self.assertions.push(AssertionData {
            origin,
            label,
            value: AssertionValue::Target(target),
            properties: Vec::new(),
            edges: Vec::new(),
        });
        self.owned_list_mut(origin, true).push(id);
        id
    }

    /// Unlink a property assertion from `origin`. The arena slot is retained
    /// but the assertion (and anything nested under it) becomes unreachable.
    /// Returns whether the assertion was present.
    pub fn remove_property(&mut self, origin: Origin, assertion: AssertionId) -> bool {
        let list = self.owned_list_mut(origin, false);
        match list.iter().position(|id| *id == assertion) {
            Some(pos) => {
                list.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Unlink an edge assertion from `origin`; see [`Graph::remove_property`].
    pub fn remove_edge(&mut self, origin: Origin, assertion: AssertionId) -> bool {
        let list = self.owned_list_mut(origin, true);
        match list.iter().position(|id| *id == assertion) {
            Some(pos) => {
                list.remove(pos);
                true
            }
            None => false,
        }
    }

    fn owned_list_mut(&mut self, origin: Origin, edges: bool) -> &mut Vec<AssertionId> {
        match (origin, edges) {
            (Origin::Node(id), false) => &mut self.nodes[id.0].properties,
            (Origin::Node(id), true) => &mut self.nodes[id.0].edges,
            (Origin::Assertion(id), false) => &mut self.assertions[id.0].properties,
            (Origin::Assertion(id), true) => &mut self.assertions[id.0].edges,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = NodeRef<'_>> {
        (0..self.nodes.len()).map(move |idx| NodeRef {
            graph: self,
            id: NodeId(idx),
        })
    }

    /// Total count of reachable assertions, nested ones included.
    pub fn size(&self) -> usize {
        fn count(graph: &Graph, ids: &[AssertionId]) -> usize {
            ids.iter()
                .map(|id| {
                    let data = &graph.assertions[id.0];
                    1 + count(graph, &data.properties) + count(graph, &data.edges)
                })
                .sum()
        }
        self.nodes
            .iter()
            .map(|node| count(self, &node.properties) + count(self, &node.edges))
            .sum()
    }

    /// Nodes whose type set intersects `types`.
    pub fn typematch<'g>(&'g self, types: &'g [Iri]) -> impl Iterator<Item = NodeRef<'g>> + 'g {
        self.iter()
            .filter(move |node| node.types().iter().any(|t| types.contains(t)))
    }

    /// Enumerate top-level assertions as (origin, label, value, annotations)
    /// records, optionally filtered on any of the three positions. This is
    /// the flattened view diagram and graph emitters consume.
    pub fn match_assertions<'g, 'q>(
        &'g self,
        origin: Option<&'q str>,
        label: Option<&'q str>,
        value: Option<&'q str>,
    ) -> impl Iterator<Item = Match<'g>> + 'q
    where
        'g: 'q,
    {
        self.iter()
            .filter(move |node| origin.is_none_or(|o| node.iri().as_str() == o))
            .flat_map(|node| {
                node.properties()
                    .chain(node.edges())
                    .map(move |assertion| (node, assertion))
            })
            .filter(move |(_, a)| label.is_none_or(|l| a.label().as_str() == l))
            .filter(move |(_, a)| value.is_none_or(|v| a.matched_value().as_str() == v))
            .map(|(node, assertion)| Match {
                origin: node.iri(),
                label: assertion.label(),
                value: assertion.matched_value(),
                annotations: assertion.annotations(),
            })
    }
}

/// One record yielded by [`Graph::match_assertions`].
#[derive(Debug, Clone)]
pub struct Match<'g> {
    pub origin: &'g Iri,
    pub label: &'g Iri,
    pub value: MatchedValue<'g>,
    /// The assertion's own direct simple properties, label → value.
    pub annotations: BTreeMap<&'g Iri, &'g str>,
}

/// Value position of a [`Match`]: literal text or the target node's IRI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchedValue<'g> {
    Text(&'g str),
    Node(&'g Iri),
}

impl MatchedValue<'_> {
    pub fn as_str(&self) -> &str {
        match self {
            MatchedValue::Text(text) => text,
            MatchedValue::Node(iri) => iri.as_str(),
        }
    }
}

/// Read capability shared by everything that owns assertions — graph nodes
/// and assertions alike. Mutation goes through [`Graph::add_property`] /
/// [`Graph::add_edge`] with the owner's [`AssertionOwner::as_origin`] handle.
pub trait AssertionOwner<'g>: Copy {
    fn graph(&self) -> &'g Graph;

    /// This owner as an attachment origin for new assertions.
    fn as_origin(&self) -> Origin;

    fn property_ids(&self) -> &'g [AssertionId];

    fn edge_ids(&self) -> &'g [AssertionId];

    fn properties(self) -> impl Iterator<Item = AssertionRef<'g>> + 'g {
        let graph = self.graph();
        self.property_ids()
            .iter()
            .map(move |id| AssertionRef { graph, id: *id })
    }

    fn edges(self) -> impl Iterator<Item = AssertionRef<'g>> + 'g {
        let graph = self.graph();
        self.edge_ids()
            .iter()
            .map(move |id| AssertionRef { graph, id: *id })
    }

    /// Properties with a given label.
    fn getprop<'q>(self, label: &'q str) -> impl Iterator<Item = AssertionRef<'g>> + 'q
    where
        'g: 'q,
    {
        self.properties()
            .filter(move |prop| prop.label().as_str() == label)
    }

    /// Edges with a given label.
    fn getedge<'q>(self, label: &'q str) -> impl Iterator<Item = AssertionRef<'g>> + 'q
    where
        'g: 'q,
    {
        self.edges()
            .filter(move |edge| edge.label().as_str() == label)
    }
}

/// Borrowed view of a node.
#[derive(Clone, Copy)]
pub struct NodeRef<'g> {
    graph: &'g Graph,
    id: NodeId,
}

impl<'g> NodeRef<'g> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn iri(&self) -> &'g Iri {
        &self.graph.nodes[self.id.0].id
    }

    pub fn types(&self) -> &'g BTreeSet<Iri> {
        &self.graph.nodes[self.id.0].types
    }

    /// Outgoing edges with a given label.
    pub fn traverse<'q>(self, label: &'q str) -> impl Iterator<Item = AssertionRef<'g>> + 'q
    where
        'g: 'q,
    {
        self.getedge(label)
    }

    /// Top-level edges elsewhere in the graph targeting this node with a
    /// given label.
    pub fn reverse<'q>(self, label: &'q str) -> impl Iterator<Item = AssertionRef<'g>> + 'q
    where
        'g: 'q,
    {
        let target = self.id;
        self.graph
            .iter()
            .flat_map(move |node| node.getedge(label))
            .filter(move |edge| edge.target().map(|t| t.id()) == Some(target))
    }
}

impl<'g> AssertionOwner<'g> for NodeRef<'g> {
    fn graph(&self) -> &'g Graph {
        self.graph
    }

    fn as_origin(&self) -> Origin {
        Origin::Node(self.id)
    }

    fn property_ids(&self) -> &'g [AssertionId] {
        &self.graph.nodes[self.id.0].properties
    }

    fn edge_ids(&self) -> &'g [AssertionId] {
        &self.graph.nodes[self.id.0].edges
    }
}

/// Borrowed view of an assertion (property or edge).
#[derive(Clone, Copy)]
pub struct AssertionRef<'g> {
    graph: &'g Graph,
    id: AssertionId,
}

impl<'g> AssertionRef<'g> {
    pub fn id(&self) -> AssertionId {
        self.id
    }

    pub fn label(&self) -> &'g Iri {
        &self.graph.assertions[self.id.0].label
    }

    pub fn value(&self) -> &'g AssertionValue {
        &self.graph.assertions[self.id.0].value
    }

    /// The origin this assertion is attached to.
    pub fn origin(&self) -> Origin {
        self.graph.assertions[self.id.0].origin
    }

    pub fn is_edge(&self) -> bool {
        matches!(self.value(), AssertionValue::Target(_))
    }

    /// Literal value for properties, `None` for edges.
    pub fn text(&self) -> Option<&'g str> {
        match self.value() {
            AssertionValue::Text(text) => Some(text),
            AssertionValue::Target(_) => None,
        }
    }

    /// Target node for edges, `None` for properties.
    pub fn target(&self) -> Option<NodeRef<'g>> {
        match self.value() {
            AssertionValue::Target(id) => Some(self.graph.node_ref(*id)),
            AssertionValue::Text(_) => None,
        }
    }

    fn matched_value(&self) -> MatchedValue<'g> {
        match self.value() {
            AssertionValue::Text(text) => MatchedValue::Text(text),
            AssertionValue::Target(id) => MatchedValue::Node(self.graph.node_ref(*id).iri()),
        }
    }

    /// Flatten this assertion's direct simple properties into a label →
    /// value map. Nested edges and deeper annotation levels are not
    /// included; on duplicate labels the last property wins.
    pub fn annotations(&self) -> BTreeMap<&'g Iri, &'g str> {
        self.properties()
            .filter_map(|prop| prop.text().map(|text| (prop.label(), text)))
            .collect()
    }
}

impl<'g> AssertionOwner<'g> for AssertionRef<'g> {
    fn graph(&self) -> &'g Graph {
        self.graph
    }

    fn as_origin(&self) -> Origin {
        Origin::Assertion(self.id)
    }

    fn property_ids(&self) -> &'g [AssertionId] {
        &self.graph.assertions[self.id.0].properties
    }

    fn edge_ids(&self) -> &'g [AssertionId] {
        &self.graph.assertions[self.id.0].edges
    }
}
