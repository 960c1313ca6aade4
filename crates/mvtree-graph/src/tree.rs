//! Arena-backed resolved dependency tree.
//!
//! A tree is assembled with [`TreeAssembly`] and frozen into an immutable
//! [`DependencyTree`]. Nodes are addressed by [`NodeId`] and read through
//! [`DependencyNode`] handles, which borrow the tree they belong to.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::ptr;

use mvtree_core::coordinate::{Coordinate, Exclusion};
use mvtree_core::scope::Scope;
use serde::Serialize;

use crate::traversal::DependencyNodeVisitor;

/// Index of a node inside its [`DependencyTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Conflict provenance attached to a node in verbose mode.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConflictData {
    /// Version of the winner of this node's conflict group; `None` when
    /// this node is the winner.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub winner_version: Option<String>,

    /// Scope this node declared before it lost its conflict.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_scope: Option<Scope>,

    /// Optionality this node declared before it lost its conflict.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_optional: Option<bool>,

    /// A wider scope requested elsewhere in the group that was not applied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ignored_scope: Option<Scope>,
}

impl ConflictData {
    pub fn winner() -> Self {
        Self::default()
    }

    pub fn loser(winner_version: &str) -> Self {
        Self {
            winner_version: Some(winner_version.to_string()),
            ..Self::default()
        }
    }

    pub fn is_winner(&self) -> bool {
        self.winner_version.is_none()
    }
}

/// Everything a node carries besides its position in the tree.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeAttributes {
    pub coordinate: Coordinate,
    /// Effective scope; `None` for the root.
    pub scope: Option<Scope>,
    pub optional: bool,
    pub premanaged_version: Option<String>,
    pub premanaged_scope: Option<Scope>,
    /// The hard constraint the version was selected from.
    pub version_constraint: Option<String>,
    pub exclusions: Vec<Exclusion>,
    pub conflict_data: Option<ConflictData>,
}

impl NodeAttributes {
    pub fn new(coordinate: Coordinate) -> Self {
        Self {
            coordinate,
            scope: None,
            optional: false,
            premanaged_version: None,
            premanaged_scope: None,
            version_constraint: None,
            exclusions: Vec::new(),
            conflict_data: None,
        }
    }

    pub fn with_scope(mut self, scope: Scope) -> Self {
        self.scope = Some(scope);
        self
    }

    pub fn with_optional(mut self, optional: bool) -> Self {
        self.optional = optional;
        self
    }

    pub fn with_conflict_data(mut self, data: ConflictData) -> Self {
        self.conflict_data = Some(data);
        self
    }
}

#[derive(Debug, Clone)]
struct NodeData {
    attributes: NodeAttributes,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// Mutable tree under construction. Consumed by [`TreeAssembly::freeze`].
#[derive(Debug)]
pub struct TreeAssembly {
    nodes: Vec<NodeData>,
}

impl TreeAssembly {
    pub fn new(root: NodeAttributes) -> Self {
        Self {
            nodes: vec![NodeData {
                attributes: root,
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Append a child as the last child of `parent`.
    ///
    /// # Panics
    ///
    /// Panics if `parent` was not returned by this assembly.
    pub fn add_child(&mut self, parent: NodeId, attributes: NodeAttributes) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeData {
            attributes,
            parent: Some(parent),
            children: Vec::new(),
        });
        self.nodes[parent.0].children.push(id);
        id
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn freeze(self) -> DependencyTree {
        DependencyTree { nodes: self.nodes }
    }
}

/// An immutable resolved dependency tree.
#[derive(Debug, Clone)]
pub struct DependencyTree {
    nodes: Vec<NodeData>,
}

impl DependencyTree {
    pub fn root(&self) -> DependencyNode<'_> {
        DependencyNode {
            tree: self,
            id: NodeId(0),
        }
    }

    pub fn node(&self, id: NodeId) -> Option<DependencyNode<'_>> {
        (id.0 < self.nodes.len()).then_some(DependencyNode { tree: self, id })
    }

    /// Number of nodes, root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All nodes in pre-order.
    pub fn nodes(&self) -> impl Iterator<Item = DependencyNode<'_>> {
        let mut stack = vec![NodeId(0)];
        std::iter::from_fn(move || {
            let id = stack.pop()?;
            stack.extend(self.nodes[id.0].children.iter().rev().copied());
            Some(DependencyNode { tree: self, id })
        })
    }

    /// Walk the tree from the root. See [`DependencyNode::accept`].
    pub fn accept<'t, V>(&'t self, visitor: &mut V) -> bool
    where
        V: DependencyNodeVisitor<'t> + ?Sized,
    {
        self.root().accept(visitor)
    }
}

/// A borrowed handle to one node of a [`DependencyTree`].
///
/// Two handles are equal when they point at the same node of the same tree.
#[derive(Clone, Copy)]
pub struct DependencyNode<'t> {
    tree: &'t DependencyTree,
    id: NodeId,
}

impl<'t> DependencyNode<'t> {
    fn data(&self) -> &'t NodeData {
        &self.tree.nodes[self.id.0]
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn tree(&self) -> &'t DependencyTree {
        self.tree
    }

    pub fn attributes(&self) -> &'t NodeAttributes {
        &self.data().attributes
    }

    pub fn coordinate(&self) -> &'t Coordinate {
        &self.data().attributes.coordinate
    }

    pub fn scope(&self) -> Option<&'t Scope> {
        self.data().attributes.scope.as_ref()
    }

    pub fn optional(&self) -> bool {
        self.data().attributes.optional
    }

    pub fn premanaged_version(&self) -> Option<&'t str> {
        self.data().attributes.premanaged_version.as_deref()
    }

    pub fn premanaged_scope(&self) -> Option<&'t Scope> {
        self.data().attributes.premanaged_scope.as_ref()
    }

    pub fn version_constraint(&self) -> Option<&'t str> {
        self.data().attributes.version_constraint.as_deref()
    }

    pub fn exclusions(&self) -> &'t [Exclusion] {
        &self.data().attributes.exclusions
    }

    pub fn conflict_data(&self) -> Option<&'t ConflictData> {
        self.data().attributes.conflict_data.as_ref()
    }

    pub fn parent(&self) -> Option<DependencyNode<'t>> {
        let tree = self.tree;
        self.data().parent.map(|id| DependencyNode { tree, id })
    }

    pub fn children(&self) -> impl DoubleEndedIterator<Item = DependencyNode<'t>> + ExactSizeIterator + 't {
        let tree = self.tree;
        self.data()
            .children
            .iter()
            .map(move |&id| DependencyNode { tree, id })
    }

    pub fn child_count(&self) -> usize {
        self.data().children.len()
    }

    pub fn is_root(&self) -> bool {
        self.data().parent.is_none()
    }

    /// Distance from the root; the root has depth 0.
    pub fn depth(&self) -> usize {
        self.ancestors().count()
    }

    /// Strict ancestors, nearest first.
    pub fn ancestors(&self) -> impl Iterator<Item = DependencyNode<'t>> + 't {
        std::iter::successors(self.parent(), |n| n.parent())
    }

    /// Whether this node kept its place in its conflict group. Nodes
    /// without conflict data are always winners.
    pub fn is_winner(&self) -> bool {
        self.conflict_data().map_or(true, ConflictData::is_winner)
    }

    /// Depth-first traversal: `visit`, then children in order until one
    /// signals stop, then `end_visit`, whose result is returned.
    pub fn accept<V>(self, visitor: &mut V) -> bool
    where
        V: DependencyNodeVisitor<'t> + ?Sized,
    {
        if visitor.visit(self) {
            for child in self.children() {
                if !child.accept(visitor) {
                    break;
                }
            }
        }
        visitor.end_visit(self)
    }

    /// `group:artifact:type[:classifier]:version[:scope]`.
    pub fn artifact_string(&self) -> String {
        match self.scope() {
            Some(scope) => format!("{}:{scope}", self.coordinate()),
            None => self.coordinate().to_string(),
        }
    }

    /// One-line rendering used by tree dumps.
    pub fn to_node_string(&self) -> String {
        let Some(data) = self.conflict_data() else {
            let mut line = self.artifact_string();
            if self.optional() {
                line.push_str(" (optional)");
            }
            return line;
        };

        let mut items = Vec::new();
        if let Some(v) = self.premanaged_version() {
            items.push(format!("version managed from {v}"));
        }
        if let Some(s) = self.premanaged_scope() {
            items.push(format!("scope managed from {s}"));
        }
        if let Some(s) = &data.ignored_scope {
            items.push(format!("scope not updated to {s}"));
        }

        match &data.winner_version {
            None => {
                let mut line = self.artifact_string();
                if !items.is_empty() {
                    line.push_str(&format!(" ({})", items.join("; ")));
                }
                line
            }
            Some(winner) => {
                if *winner == self.coordinate().version {
                    items.push("omitted for duplicate".to_string());
                } else {
                    items.push(format!("omitted for conflict with {winner}"));
                }
                format!("({} - {})", self.artifact_string(), items.join("; "))
            }
        }
    }
}

impl PartialEq for DependencyNode<'_> {
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(self.tree, other.tree) && self.id == other.id
    }
}

impl Eq for DependencyNode<'_> {}

impl Hash for DependencyNode<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        ptr::hash(self.tree, state);
        self.id.hash(state);
    }
}

impl fmt::Debug for DependencyNode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DependencyNode")
            .field("id", &self.id.0)
            .field("coordinate", &self.coordinate().to_string())
            .finish()
    }
}

impl fmt::Display for DependencyNode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_node_string())
    }
}
