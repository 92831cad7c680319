//! Event collapse: remove event nodes as edge targets.
//!
//! # Overview
//!
//! Intermediate events are narrative bookkeeping. In the collapsed view an
//! edge only lands on a rite. [`collapse_events`] rewrites every edge
//! `source → event` into `source → rite` for each rite reachable from that
//! event through chains of further events.
//!
//! ## Reachability
//!
//! For each distinct event target a depth-first search follows outgoing
//! edges. An edge into a rite contributes that rite and ends the branch; an
//! edge into an event not on the current search path is followed. The
//! visited set is path-local: a node may be re-entered from a different
//! branch, so event cycles terminate while diamond shapes still contribute
//! every rite leaf.
//!
//! Edges into events that reach no rite are dropped. Edges into rites are
//! kept unchanged. The transform is idempotent.

use std::collections::{BTreeSet, HashMap, HashSet};

use tracing::{debug, instrument};

use ritemap_core::NodeId;

use crate::graph::edges::EdgeSet;

type Adjacency<'a> = HashMap<&'a NodeId, Vec<&'a NodeId>>;

/// Rewrite `edges` so that no edge targets an event node.
#[must_use]
#[instrument(skip(edges), fields(edges = edges.len()))]
pub fn collapse_events(edges: &EdgeSet) -> EdgeSet {
    let adjacency = adjacency(edges);

    let mut reachable: HashMap<&NodeId, BTreeSet<&NodeId>> = HashMap::new();
    for edge in edges {
        if edge.target.is_event() && !reachable.contains_key(&edge.target) {
            let rites = reachable_rites(&adjacency, &edge.target);
            reachable.insert(&edge.target, rites);
        }
    }
    debug!(events = reachable.len(), "computed rite reachability");

    let mut collapsed = EdgeSet::new();
    for edge in edges {
        if edge.target.is_rite() {
            collapsed.insert(edge.source.clone(), edge.target.clone());
            continue;
        }
        for rite in reachable.get(&edge.target).into_iter().flatten() {
            collapsed.insert(edge.source.clone(), (*rite).clone());
        }
    }
    collapsed
}

/// Every rite reachable from `event` through event-only hops.
#[must_use]
pub fn rites_reachable_from(edges: &EdgeSet, event: &NodeId) -> BTreeSet<NodeId> {
    let adjacency = adjacency(edges);
    reachable_rites(&adjacency, event)
        .into_iter()
        .cloned()
        .collect()
}

fn adjacency(edges: &EdgeSet) -> Adjacency<'_> {
    let mut adjacency: Adjacency<'_> = HashMap::new();
    for edge in edges {
        adjacency.entry(&edge.source).or_default().push(&edge.target);
    }
    adjacency
}

fn reachable_rites<'a>(adjacency: &Adjacency<'a>, event: &'a NodeId) -> BTreeSet<&'a NodeId> {
    let mut rites = BTreeSet::new();
    let mut path = HashSet::new();
    collect_rites(adjacency, event, &mut path, &mut rites);
    rites
}

fn collect_rites<'a>(
    adjacency: &Adjacency<'a>,
    node: &'a NodeId,
    path: &mut HashSet<&'a NodeId>,
    rites: &mut BTreeSet<&'a NodeId>,
) {
    if !path.insert(node) {
        return;
    }

    for &next in adjacency.get(node).into_iter().flatten() {
        if next.is_rite() {
            rites.insert(next);
        } else if !path.contains(next) {
            collect_rites(adjacency, next, path, rites);
        }
    }

    path.remove(node);
}
