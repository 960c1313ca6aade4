//! Processing order of conflict ids.
//!
//! A conflict id must be resolved after every id that can be its parent,
//! so ids are ordered topologically over the "conflict id graph" (an edge
//! A -> B whenever a node of A has a child of B). Cycles collapse into
//! strongly connected components whose members keep discovery order.

use std::collections::HashMap;

use mvtree_core::coordinate::ConflictId;
use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};

use crate::graph::RawGraph;

/// Conflict ids of `graph` in processing order.
pub fn conflict_order(graph: &RawGraph) -> Vec<ConflictId> {
    let mut ids: DiGraph<ConflictId, ()> = DiGraph::new();
    let mut index: HashMap<ConflictId, NodeIndex> = HashMap::new();
    let mut discovery: HashMap<NodeIndex, usize> = HashMap::new();

    let mut id_of = |ids: &mut DiGraph<ConflictId, ()>, cid: ConflictId| -> NodeIndex {
        *index.entry(cid.clone()).or_insert_with(|| {
            let idx = ids.add_node(cid);
            discovery.insert(idx, discovery.len());
            idx
        })
    };

    for node in graph.pre_order() {
        let from = id_of(&mut ids, graph.node(node).conflict_id());
        for child in graph.children(node) {
            let to = id_of(&mut ids, graph.node(child).conflict_id());
            if !ids.contains_edge(from, to) {
                ids.add_edge(from, to, ());
            }
        }
    }

    // tarjan_scc yields components in reverse topological order.
    let mut components = tarjan_scc(&ids);
    components.reverse();

    let mut order = Vec::with_capacity(ids.node_count());
    for mut component in components {
        component.sort_by_key(|idx| discovery.get(idx).copied().unwrap_or(usize::MAX));
        order.extend(component.into_iter().map(|idx| ids[idx].clone()));
    }
    order
}
