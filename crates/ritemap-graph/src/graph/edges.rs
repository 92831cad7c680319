//! Directed reference edges and the deduplicated edge set.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use ritemap_core::NodeId;

/// A reference `source → target`.
///
/// Serializes as a two-element array `[source, target]`. Identity follows
/// [`NodeId`]: display metadata does not distinguish edges.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "(NodeId, NodeId)", into = "(NodeId, NodeId)")]
pub struct Edge {
    pub source: NodeId,
    pub target: NodeId,
}

impl Edge {
    #[must_use]
    pub const fn new(source: NodeId, target: NodeId) -> Self {
        Self { source, target }
    }
}

impl From<(NodeId, NodeId)> for Edge {
    fn from((source, target): (NodeId, NodeId)) -> Self {
        Self { source, target }
    }
}

impl From<Edge> for (NodeId, NodeId) {
    fn from(edge: Edge) -> Self {
        (edge.source, edge.target)
    }
}

/// A set of edges with no duplicate `(source, target)` identities.
///
/// Iteration order is deterministic: by source, then target. When the same
/// edge is inserted twice, the metadata of the first insertion is kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EdgeSet {
    edges: BTreeSet<Edge>,
}

impl EdgeSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an edge. Returns `false` if it was already present.
    pub fn insert(&mut self, source: NodeId, target: NodeId) -> bool {
        self.edges.insert(Edge::new(source, target))
    }

    #[must_use]
    pub fn contains(&self, source: &NodeId, target: &NodeId) -> bool {
        self.edges.contains(&Edge::new(source.bare(), target.bare()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Edge> {
        self.edges.iter()
    }

    /// Every node that appears as a source or target.
    #[must_use]
    pub fn nodes(&self) -> BTreeSet<&NodeId> {
        self.edges
            .iter()
            .flat_map(|edge| [&edge.source, &edge.target])
            .collect()
    }

    /// `true` if any edge points at an event node.
    #[must_use]
    pub fn has_event_targets(&self) -> bool {
        self.edges.iter().any(|edge| edge.target.is_event())
    }
}

impl FromIterator<Edge> for EdgeSet {
    fn from_iter<I: IntoIterator<Item = Edge>>(iter: I) -> Self {
        Self {
            edges: iter.into_iter().collect(),
        }
    }
}

impl FromIterator<(NodeId, NodeId)> for EdgeSet {
    fn from_iter<I: IntoIterator<Item = (NodeId, NodeId)>>(iter: I) -> Self {
        iter.into_iter().map(Edge::from).collect()
    }
}

impl IntoIterator for EdgeSet {
    type Item = Edge;
    type IntoIter = std::collections::btree_set::IntoIter<Edge>;

    fn into_iter(self) -> Self::IntoIter {
        self.edges.into_iter()
    }
}

impl<'a> IntoIterator for &'a EdgeSet {
    type Item = &'a Edge;
    type IntoIter = std::collections::btree_set::Iter<'a, Edge>;

    fn into_iter(self) -> Self::IntoIter {
        self.edges.iter()
    }
}
