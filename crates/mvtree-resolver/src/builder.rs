//! Final tree assembly from a resolved raw graph.

use mvtree_core::artifact_filter::ArtifactFilter;
use mvtree_graph::{ConflictData, DependencyTree, NodeAttributes, NodeId, TreeAssembly};
use petgraph::graph::NodeIndex;

use crate::graph::{RawGraph, RawNode};
use crate::transform::{ConflictOutcomes, LoserInfo, WinnerInfo};

/// Assemble the output tree.
///
/// Winners are emitted with their effective scope and optionality. In
/// verbose mode every node carries [`ConflictData`] and losers are emitted
/// without children; otherwise losers are left out. A child whose
/// coordinate `filter` rejects is dropped with its whole subtree.
pub fn build_tree(
    graph: &RawGraph,
    outcomes: &ConflictOutcomes,
    verbose: bool,
    filter: Option<&dyn ArtifactFilter>,
) -> DependencyTree {
    let root = graph.root();
    let mut root_attrs = base_attributes(graph.node(root));
    if verbose {
        root_attrs.conflict_data = Some(ConflictData::winner());
    }
    let mut assembly = TreeAssembly::new(root_attrs);

    let mut stack: Vec<(NodeIndex, NodeId)> = vec![(root, assembly.root())];
    while let Some((raw, parent)) = stack.pop() {
        let mut expand = Vec::new();
        for child in graph.children(raw) {
            let node = graph.node(child);
            if filter.is_some_and(|f| !f.include(&node.coordinate)) {
                tracing::trace!("filtered out {}", node.coordinate);
                continue;
            }
            if let Some(info) = outcomes.winner(child) {
                let id = assembly.add_child(parent, winner_attributes(node, info, verbose));
                expand.push((child, id));
            } else if let Some(info) = outcomes.loser(child) {
                if verbose {
                    assembly.add_child(parent, loser_attributes(node, info));
                }
            } else {
                tracing::trace!("{} is unreachable through winners", node.coordinate);
            }
        }
        stack.extend(expand.into_iter().rev());
    }

    assembly.freeze()
}

fn base_attributes(node: &RawNode) -> NodeAttributes {
    NodeAttributes {
        coordinate: node.coordinate.clone(),
        scope: node.scope.clone(),
        optional: node.optional,
        premanaged_version: node.premanaged_version.clone(),
        premanaged_scope: node.premanaged_scope.clone(),
        version_constraint: node.hard_constraint().map(ToString::to_string),
        exclusions: node.exclusions.clone(),
        conflict_data: None,
    }
}

fn winner_attributes(node: &RawNode, info: &WinnerInfo, verbose: bool) -> NodeAttributes {
    let mut attrs = base_attributes(node);
    attrs.scope = info.scope.clone();
    attrs.optional = info.optional;
    if verbose {
        attrs.conflict_data = Some(ConflictData {
            ignored_scope: info.ignored_scope.clone(),
            ..ConflictData::winner()
        });
    }
    attrs
}

fn loser_attributes(node: &RawNode, info: &LoserInfo) -> NodeAttributes {
    let mut attrs = base_attributes(node);
    attrs.scope = Some(info.derived_scope.clone());
    attrs.optional = info.optional;
    attrs.conflict_data = Some(ConflictData {
        winner_version: Some(info.winner_version.clone()),
        original_scope: Some(info.original_scope.clone()),
        original_optional: Some(info.original_optional),
        ignored_scope: None,
    });
    attrs
}
