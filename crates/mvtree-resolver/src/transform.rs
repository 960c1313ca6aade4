//! Conflict resolution over a collected raw graph.
//!
//! Conflict ids are processed in [`conflict_order`]. For each id the items
//! are gathered by a depth-first walk from the root that only descends
//! through winners of already processed ids. A winner is selected and its
//! effective scope and optionality are fixed for its children.

use std::collections::{HashMap, HashSet};

use mvtree_core::config::ResolverConfig;
use mvtree_core::coordinate::ConflictId;
use mvtree_core::scope::{derive_scope, Scope};
use petgraph::graph::NodeIndex;

use crate::conflict::{select_winner, ConflictItem, Selection};
use crate::error::ResolveError;
use crate::graph::RawGraph;
use crate::optionality::{contributed_optionality, merge_optionality};
use crate::ordering::conflict_order;
use crate::report::{ConflictReport, LossReason, VersionConflict};
use crate::scope::{ignored_scope, select_scope};

/// Effective values of a group winner.
#[derive(Debug, Clone, PartialEq)]
pub struct WinnerInfo {
    /// `None` only for the root.
    pub scope: Option<Scope>,
    pub optional: bool,
    pub ignored_scope: Option<Scope>,
}

/// What a losing occurrence keeps for diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct LoserInfo {
    pub winner: NodeIndex,
    pub winner_version: String,
    pub derived_scope: Scope,
    pub optional: bool,
    pub original_scope: Scope,
    pub original_optional: bool,
}

/// Winners and losers of every conflict group of a raw graph.
#[derive(Debug, Default)]
pub struct ConflictOutcomes {
    winners: HashMap<NodeIndex, WinnerInfo>,
    losers: HashMap<NodeIndex, LoserInfo>,
    pub report: ConflictReport,
}

impl ConflictOutcomes {
    pub fn winner(&self, node: NodeIndex) -> Option<&WinnerInfo> {
        self.winners.get(&node)
    }

    pub fn loser(&self, node: NodeIndex) -> Option<&LoserInfo> {
        self.losers.get(&node)
    }
}

/// Resolve every conflict group of `graph`.
///
/// The root wins its own conflict id. Its group is settled last, once every
/// parent of another occurrence of the root artifact has effective values.
pub fn resolve_conflicts(
    graph: &RawGraph,
    config: &ResolverConfig,
) -> Result<ConflictOutcomes, ResolveError> {
    let mut outcomes = ConflictOutcomes::default();
    let root = graph.root();
    outcomes.winners.insert(
        root,
        WinnerInfo {
            scope: None,
            optional: false,
            ignored_scope: None,
        },
    );

    let root_cid = graph.node(root).conflict_id();
    let mut processed: HashSet<ConflictId> = HashSet::new();
    processed.insert(root_cid.clone());

    for cid in conflict_order(graph) {
        if processed.contains(&cid) {
            continue;
        }
        let items = gather_items(graph, &cid, &processed, &outcomes);
        processed.insert(cid.clone());
        if items.is_empty() {
            tracing::debug!("no reachable occurrence of {cid}");
            continue;
        }

        let selection = select_winner(&items).map_err(|_| ResolveError::UnsolvableConflict {
            conflict_id: cid.clone(),
            paths: items.iter().map(|i| graph.path_string(i.node)).collect(),
        })?;
        let winner = &items[selection.winner];
        let scope = select_scope(&items, winner);
        let optional = merge_optionality(&items);
        let ignored = ignored_scope(&items, &scope, config);
        tracing::debug!(
            "{cid}: selected {} ({scope}) out of {} occurrence(s)",
            graph.node(winner.node).coordinate.version,
            items.len()
        );

        for (i, item) in items.iter().enumerate() {
            if i != selection.winner {
                let reason = loss_reason(item, winner, &selection);
                record_loser(graph, &mut outcomes, &cid, item, winner.node, reason);
            }
        }
        outcomes.winners.insert(
            winner.node,
            WinnerInfo {
                scope: Some(scope),
                optional,
                ignored_scope: ignored,
            },
        );
    }

    let repeats = gather_items(graph, &root_cid, &processed, &outcomes);
    if !repeats.is_empty() {
        tracing::debug!("{root_cid}: {} occurrence(s) lose to the root", repeats.len());
    }
    let root_version = &graph.node(root).coordinate.version;
    for item in &repeats {
        let reason = if item.version.as_str() == root_version {
            LossReason::Duplicate
        } else {
            LossReason::Nearest {
                winner_depth: 0,
                depth: item.depth,
            }
        };
        record_loser(graph, &mut outcomes, &root_cid, item, root, reason);
    }

    Ok(outcomes)
}

fn record_loser(
    graph: &RawGraph,
    outcomes: &mut ConflictOutcomes,
    cid: &ConflictId,
    item: &ConflictItem,
    winner: NodeIndex,
    reason: LossReason,
) {
    let winner_version = graph.node(winner).coordinate.version.clone();
    outcomes.report.record(VersionConflict {
        conflict_id: cid.clone(),
        requested: graph.node(item.node).coordinate.version.clone(),
        resolved: winner_version.clone(),
        reason,
        path: graph.path_string(item.node),
    });
    outcomes.losers.insert(
        item.node,
        LoserInfo {
            winner,
            winner_version,
            derived_scope: item.derived_scope.clone(),
            optional: item.optional,
            original_scope: item.declared_scope.clone(),
            original_optional: item.declared_optional,
        },
    );
}

/// Range exclusions take precedence; a loser that every accepted range
/// admits lost to mediation.
fn loss_reason(item: &ConflictItem, winner: &ConflictItem, selection: &Selection) -> LossReason {
    if item.version.as_str() == winner.version.as_str() {
        LossReason::Duplicate
    } else if let Some(range) = selection.excluding(&item.version) {
        LossReason::Range(range.clone())
    } else if item.is_sibling(winner) {
        LossReason::Sibling
    } else if winner.depth < item.depth {
        LossReason::Nearest {
            winner_depth: winner.depth,
            depth: item.depth,
        }
    } else {
        LossReason::FirstFound { depth: item.depth }
    }
}

/// Occurrences of `target` reachable through winners, in pre-order.
fn gather_items(
    graph: &RawGraph,
    target: &ConflictId,
    processed: &HashSet<ConflictId>,
    outcomes: &ConflictOutcomes,
) -> Vec<ConflictItem> {
    let mut items = Vec::new();
    let mut stack = vec![graph.root()];

    while let Some(idx) = stack.pop() {
        let node = graph.node(idx);
        let cid = node.conflict_id();

        if idx != graph.root() && cid == *target {
            if let Some(parent) = graph.parent(idx) {
                items.push(make_item(graph, idx, parent, outcomes));
            }
        }

        let descend = idx == graph.root()
            || !processed.contains(&cid)
            || outcomes.winners.contains_key(&idx);
        if descend {
            stack.extend(graph.children(idx).into_iter().rev());
        }
    }
    items
}

fn make_item(
    graph: &RawGraph,
    idx: NodeIndex,
    parent: NodeIndex,
    outcomes: &ConflictOutcomes,
) -> ConflictItem {
    let node = graph.node(idx);
    // A parent of a still unresolved id (cycles only) falls back to its
    // declared values.
    let (parent_scope, parent_optional) = match outcomes.winners.get(&parent) {
        Some(info) => (info.scope.clone(), info.optional),
        None => {
            let p = graph.node(parent);
            (p.scope.clone(), p.optional)
        }
    };
    let declared_scope = node.declared_scope();
    ConflictItem {
        node: idx,
        parent: Some(parent),
        depth: node.depth,
        version: node.version(),
        hard_constraint: node.hard_constraint().cloned(),
        derived_scope: derive_scope(parent_scope.as_ref(), &declared_scope),
        declared_scope,
        declared_optional: node.optional,
        optional: contributed_optionality(node.optional, node.depth, parent_optional),
    }
}
