//! Summary statistics for an extracted edge set.
//!
//! # Statistics Provided
//!
//! - **node_count** / **edge_count**: size of the graph.
//! - **event_count** / **rite_count**: nodes by kind.
//! - **cycle_count**: strongly connected components with more than one
//!   member, plus self-referencing nodes. Events and rites referencing each
//!   other circularly show up here.
//! - **source_only_count**: nodes with no incoming edge (after the entry
//!   point is attached, normally just the entry point itself).
//! - **max_in_degree** / **max_out_degree**: busiest nodes.
//! - **content_hash**: BLAKE3 of the sorted edge list. Changes only when
//!   the set of edges changes; metadata is not hashed.

use std::collections::HashMap;

use petgraph::{
    Direction,
    algo::tarjan_scc,
    graph::{DiGraph, NodeIndex},
};
use serde::Serialize;

use ritemap_core::{NodeId, NodeKind};

use crate::graph::edges::EdgeSet;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphStats {
    pub node_count: usize,
    pub edge_count: usize,
    pub event_count: usize,
    pub rite_count: usize,
    pub cycle_count: usize,
    pub source_only_count: usize,
    pub max_in_degree: usize,
    pub max_out_degree: usize,
    pub content_hash: String,
}

impl GraphStats {
    #[must_use]
    pub fn from_edges(edges: &EdgeSet) -> Self {
        let graph = to_digraph(edges);

        let event_count = graph
            .node_indices()
            .filter(|&idx| graph[idx].kind == NodeKind::Event)
            .count();
        let rite_count = graph.node_count() - event_count;

        let cycle_count = tarjan_scc(&graph)
            .into_iter()
            .filter(|scc| match scc.as_slice() {
                [single] => graph.contains_edge(*single, *single),
                members => members.len() > 1,
            })
            .count();

        let degree = |idx: NodeIndex, dir: Direction| graph.neighbors_directed(idx, dir).count();
        let source_only_count = graph
            .node_indices()
            .filter(|&idx| degree(idx, Direction::Incoming) == 0)
            .count();
        let max_in_degree = graph
            .node_indices()
            .map(|idx| degree(idx, Direction::Incoming))
            .max()
            .unwrap_or(0);
        let max_out_degree = graph
            .node_indices()
            .map(|idx| degree(idx, Direction::Outgoing))
            .max()
            .unwrap_or(0);

        Self {
            node_count: graph.node_count(),
            edge_count: graph.edge_count(),
            event_count,
            rite_count,
            cycle_count,
            source_only_count,
            max_in_degree,
            max_out_degree,
            content_hash: content_hash(edges),
        }
    }
}

/// Load an edge set into a petgraph [`DiGraph`] keyed by node identity.
#[must_use]
pub fn to_digraph(edges: &EdgeSet) -> DiGraph<&NodeId, ()> {
    let mut graph = DiGraph::new();
    let mut index: HashMap<&NodeId, NodeIndex> = HashMap::new();

    for edge in edges {
        let source = *index
            .entry(&edge.source)
            .or_insert_with(|| graph.add_node(&edge.source));
        let target = *index
            .entry(&edge.target)
            .or_insert_with(|| graph.add_node(&edge.target));
        graph.add_edge(source, target, ());
    }
    graph
}

/// BLAKE3 fingerprint of the edge identities, in set order.
#[must_use]
pub fn content_hash(edges: &EdgeSet) -> String {
    let mut hasher = blake3::Hasher::new();
    for edge in edges {
        for node in [&edge.source, &edge.target] {
            hasher.update(node.kind.as_str().as_bytes());
            hasher.update(b"\x00");
            hasher.update(node.id.as_bytes());
            hasher.update(b"\x00");
        }
    }
    format!("blake3:{}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(pairs: &[(NodeId, NodeId)]) -> EdgeSet {
        pairs.iter().cloned().collect()
    }

    #[test]
    fn empty_graph() {
        let stats = GraphStats::from_edges(&EdgeSet::new());
        assert_eq!(stats.node_count, 0);
        assert_eq!(stats.edge_count, 0);
        assert_eq!(stats.max_in_degree, 0);
        assert!(stats.content_hash.starts_with("blake3:"));
    }

    #[test]
    fn counts_kinds_and_degrees() {
        let stats = GraphStats::from_edges(&set(&[
            (NodeId::event("0"), NodeId::event("1")),
            (NodeId::event("0"), NodeId::rite("2")),
            (NodeId::event("1"), NodeId::rite("2")),
        ]));
        assert_eq!(stats.node_count, 3);
        assert_eq!(stats.edge_count, 3);
        assert_eq!(stats.event_count, 2);
        assert_eq!(stats.rite_count, 1);
        assert_eq!(stats.source_only_count, 1);
        assert_eq!(stats.max_in_degree, 2);
        assert_eq!(stats.max_out_degree, 2);
        assert_eq!(stats.cycle_count, 0);
    }

    #[test]
    fn detects_reference_cycles() {
        let stats = GraphStats::from_edges(&set(&[
            (NodeId::event("1"), NodeId::rite("2")),
            (NodeId::rite("2"), NodeId::event("1")),
            (NodeId::rite("3"), NodeId::rite("3")),
        ]));
        assert_eq!(stats.cycle_count, 2);
    }

    #[test]
    fn hash_ignores_metadata() {
        let plain = set(&[(NodeId::event("1"), NodeId::rite("2"))]);
        let labelled = set(&[(
            NodeId::event("1").with_metadata("one", ""),
            NodeId::rite("2").with_metadata("two", "desc"),
        )]);
        assert_eq!(content_hash(&plain), content_hash(&labelled));

        let other = set(&[(NodeId::event("1"), NodeId::rite("3"))]);
        assert_ne!(content_hash(&plain), content_hash(&other));
    }
}
