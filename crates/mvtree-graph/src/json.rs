//! Serde view of a resolved tree, for machine-readable output.

use mvtree_core::coordinate::Exclusion;
use mvtree_core::scope::Scope;
use serde::Serialize;

use crate::filter::DependencyNodeFilter;
use crate::tree::{ConflictData, DependencyNode};

/// Owned, serialisable snapshot of a node and its accepted descendants.
#[derive(Debug, Clone, Serialize)]
pub struct JsonNode {
    pub coordinate: String,
    pub group: String,
    pub artifact: String,
    pub version: String,
    #[serde(rename = "type")]
    pub type_: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub classifier: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<Scope>,
    pub optional: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub premanaged_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub premanaged_scope: Option<Scope>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version_constraint: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub exclusions: Vec<Exclusion>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conflict: Option<ConflictData>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<JsonNode>,
}

impl JsonNode {
    pub fn from_node(node: DependencyNode<'_>) -> Self {
        Self::build(node, &|_: DependencyNode<'_>| true)
    }

    /// Snapshot keeping only the nodes `filter` accepts. Children of a
    /// rejected node are dropped with it.
    pub fn from_node_filtered(node: DependencyNode<'_>, filter: &dyn DependencyNodeFilter) -> Self {
        Self::build(node, filter)
    }

    fn build(node: DependencyNode<'_>, filter: &dyn DependencyNodeFilter) -> Self {
        let attrs = node.attributes();
        let coord = &attrs.coordinate;
        Self {
            coordinate: node.artifact_string(),
            group: coord.group_id.clone(),
            artifact: coord.artifact_id.clone(),
            version: coord.version.clone(),
            type_: coord.type_.clone(),
            classifier: coord.classifier.clone(),
            scope: attrs.scope.clone(),
            optional: attrs.optional,
            premanaged_version: attrs.premanaged_version.clone(),
            premanaged_scope: attrs.premanaged_scope.clone(),
            version_constraint: attrs.version_constraint.clone(),
            exclusions: attrs.exclusions.clone(),
            conflict: attrs.conflict_data.clone(),
            children: node
                .children()
                .filter(|c| filter.accept(*c))
                .map(|c| Self::build(c, filter))
                .collect(),
        }
    }
}

/// Pretty-printed JSON for the tree rooted at `root`.
pub fn to_json_string(root: DependencyNode<'_>) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&JsonNode::from_node(root))
}
