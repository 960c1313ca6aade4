//! Raw dependency graph produced by collection, backed by petgraph.
//!
//! Every occurrence of an artifact gets its own node; nothing is
//! deduplicated across paths, so the graph is a tree rooted at the project.

use std::fmt;

use mvtree_core::coordinate::{ConflictId, Coordinate, Exclusion};
use mvtree_core::scope::Scope;
use mvtree_core::version::{MavenVersion, VersionConstraint};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;

/// One occurrence of an artifact in the raw graph.
#[derive(Debug, Clone)]
pub struct RawNode {
    pub coordinate: Coordinate,
    /// Declared scope after management; `None` for the root.
    pub scope: Option<Scope>,
    /// Declared optional flag after management.
    pub optional: bool,
    pub premanaged_version: Option<String>,
    pub premanaged_scope: Option<Scope>,
    /// The constraint the version was taken from.
    pub constraint: Option<VersionConstraint>,
    pub exclusions: Vec<Exclusion>,
    pub depth: usize,
    /// Set when expansion stopped because the artifact is already on the path.
    pub cyclic: bool,
}

impl RawNode {
    pub fn root(coordinate: Coordinate) -> Self {
        Self {
            coordinate,
            scope: None,
            optional: false,
            premanaged_version: None,
            premanaged_scope: None,
            constraint: None,
            exclusions: Vec::new(),
            depth: 0,
            cyclic: false,
        }
    }

    pub fn conflict_id(&self) -> ConflictId {
        self.coordinate.conflict_id()
    }

    pub fn version(&self) -> MavenVersion {
        MavenVersion::parse(&self.coordinate.version)
    }

    /// The constraint when it restricts the version (a range), else `None`.
    pub fn hard_constraint(&self) -> Option<&VersionConstraint> {
        self.constraint.as_ref().filter(|c| c.is_hard())
    }

    /// Declared scope, `compile` when none was given.
    pub fn declared_scope(&self) -> Scope {
        self.scope.clone().unwrap_or_default()
    }
}

impl fmt::Display for RawNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.coordinate)?;
        if let Some(c) = self.hard_constraint() {
            write!(f, " (from {c})")?;
        }
        Ok(())
    }
}

/// The collected graph.
#[derive(Debug, Clone)]
pub struct RawGraph {
    graph: DiGraph<RawNode, ()>,
    root: NodeIndex,
}

impl RawGraph {
    pub fn new(root: RawNode) -> Self {
        let mut graph = DiGraph::new();
        let root = graph.add_node(root);
        Self { graph, root }
    }

    pub fn root(&self) -> NodeIndex {
        self.root
    }

    /// Append `node` as the last child of `parent`.
    pub fn add_child(&mut self, parent: NodeIndex, node: RawNode) -> NodeIndex {
        let idx = self.graph.add_node(node);
        self.graph.add_edge(parent, idx, ());
        idx
    }

    pub fn node(&self, idx: NodeIndex) -> &RawNode {
        &self.graph[idx]
    }

    /// Children of a node in the order they were added.
    pub fn children(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        let mut edges: Vec<_> = self
            .graph
            .edges_directed(idx, Direction::Outgoing)
            .map(|e| (e.id(), e.target()))
            .collect();
        edges.sort_by_key(|(id, _)| *id);
        edges.into_iter().map(|(_, target)| target).collect()
    }

    pub fn parent(&self, idx: NodeIndex) -> Option<NodeIndex> {
        self.graph
            .edges_directed(idx, Direction::Incoming)
            .next()
            .map(|e| e.source())
    }

    /// Nodes from the root down to `idx`, both included.
    pub fn path_to(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        let mut path: Vec<_> = std::iter::successors(Some(idx), |&n| self.parent(n)).collect();
        path.reverse();
        path
    }

    /// `root -> ... -> node` rendering of [`RawGraph::path_to`].
    pub fn path_string(&self, idx: NodeIndex) -> String {
        self.path_to(idx)
            .into_iter()
            .map(|n| self.graph[n].to_string())
            .collect::<Vec<_>>()
            .join(" -> ")
    }

    /// All nodes in depth-first pre-order from the root.
    pub fn pre_order(&self) -> Vec<NodeIndex> {
        let mut order = Vec::with_capacity(self.graph.node_count());
        let mut stack = vec![self.root];
        while let Some(idx) = stack.pop() {
            order.push(idx);
            stack.extend(self.children(idx).into_iter().rev());
        }
        order
    }

    /// Number of nodes, root included.
    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }
}
