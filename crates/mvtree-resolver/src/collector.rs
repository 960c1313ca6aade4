//! Raw graph collection.
//!
//! Walks the metadata provider depth-first from the project's direct
//! dependencies. At each edge the closest managed-dependency override is
//! applied, accumulated exclusions and transitive selection rules drop
//! edges, and version ranges are expanded into one node per matching
//! available version.

use std::collections::{HashMap, HashSet, VecDeque};

use mvtree_core::config::ResolverConfig;
use mvtree_core::coordinate::{ConflictId, Coordinate, Exclusion};
use mvtree_core::dependency::Dependency;
use mvtree_core::request::ResolutionRequest;
use mvtree_core::scope::Scope;
use mvtree_core::version::{MavenVersion, VersionConstraint};
use petgraph::graph::NodeIndex;

use crate::error::{CollectionCause, ResolveError};
use crate::graph::{RawGraph, RawNode};
use crate::provider::{ArtifactDescriptor, MetadataProvider};

/// Managed entries keyed by conflict id; the shallowest declaration wins.
type ManagementMap = HashMap<ConflictId, Dependency>;

/// A dependency after management was applied.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ManagedDependency {
    pub dependency: Dependency,
    pub premanaged_version: Option<String>,
    pub premanaged_scope: Option<Scope>,
}

/// Rewrite `dep` (declared at `depth`) with the matching managed entry.
///
/// Transitive edges take the managed version, scope and exclusions and
/// remember what they declared. Direct edges only take a managed version
/// when they declare none.
pub(crate) fn apply_management(
    dep: &Dependency,
    depth: usize,
    managed: &ManagementMap,
) -> ManagedDependency {
    let mut result = ManagedDependency {
        dependency: dep.clone(),
        premanaged_version: None,
        premanaged_scope: None,
    };
    let Some(entry) = managed.get(&dep.conflict_id()) else {
        return result;
    };
    let target = &mut result.dependency;

    if depth < 2 {
        if target.version.trim().is_empty() {
            target.version = entry.version.clone();
        }
        return result;
    }

    if !entry.version.trim().is_empty() && entry.version != target.version {
        if !target.version.trim().is_empty() {
            result.premanaged_version = Some(target.version.clone());
        }
        target.version = entry.version.clone();
    }
    if let Some(scope) = &entry.scope {
        let declared = target.declared_scope();
        if *scope != declared {
            result.premanaged_scope = Some(declared);
            target.scope = Some(scope.clone());
        }
    }
    for exclusion in &entry.exclusions {
        if !target.exclusions.contains(exclusion) {
            target.exclusions.push(exclusion.clone());
        }
    }
    result
}

/// Whether an edge declared at `depth` is followed at all, judged on its
/// declared (pre-management) scope and optionality.
pub(crate) fn is_selected(dep: &Dependency, depth: usize, config: &ResolverConfig) -> bool {
    if depth < 2 {
        return true;
    }
    if !config.follows_transitive_scope(&dep.declared_scope()) {
        return false;
    }
    !(dep.optional && config.skip_transitive_optional)
}

struct Frame {
    node: NodeIndex,
    depth: usize,
    /// `None` until the node's descriptor has been loaded.
    pending: Option<VecDeque<Dependency>>,
    managed: ManagementMap,
    exclusions: Vec<Exclusion>,
    path: HashSet<ConflictId>,
}

/// Builds a [`RawGraph`] for one request. Descriptor and version lookups
/// are memoised for the lifetime of the collector.
pub struct Collector<'a> {
    provider: &'a dyn MetadataProvider,
    config: &'a ResolverConfig,
    descriptors: HashMap<Coordinate, ArtifactDescriptor>,
    versions: HashMap<ConflictId, Vec<MavenVersion>>,
}

impl<'a> Collector<'a> {
    pub fn new(provider: &'a dyn MetadataProvider, config: &'a ResolverConfig) -> Self {
        Self {
            provider,
            config,
            descriptors: HashMap::new(),
            versions: HashMap::new(),
        }
    }

    /// Collect the raw graph below `root`.
    pub async fn collect(
        &mut self,
        root: &Coordinate,
        direct: &[Dependency],
        managed: &[Dependency],
    ) -> Result<RawGraph, ResolveError> {
        let mut graph = RawGraph::new(RawNode::root(root.clone()));

        let mut root_managed = ManagementMap::new();
        merge_managed(&mut root_managed, managed);

        let mut stack = vec![Frame {
            node: graph.root(),
            depth: 0,
            pending: Some(direct.iter().cloned().collect()),
            managed: root_managed,
            exclusions: Vec::new(),
            path: HashSet::from([root.conflict_id()]),
        }];

        while let Some(frame) = stack.last_mut() {
            if frame.pending.is_none() {
                let coordinate = graph.node(frame.node).coordinate.clone();
                let descriptor = self.descriptor(&coordinate).await?;
                merge_managed(&mut frame.managed, &descriptor.managed_dependencies);
                frame.pending = Some(descriptor.dependencies.into_iter().collect());
            }
            let Some(dep) = frame.pending.as_mut().and_then(VecDeque::pop_front) else {
                stack.pop();
                continue;
            };

            let depth = frame.depth + 1;
            if !is_selected(&dep, depth, self.config) {
                tracing::trace!("skipping {dep} at depth {depth}");
                continue;
            }
            if let Some(ex) = frame
                .exclusions
                .iter()
                .find(|ex| ex.matches(&dep.group_id, &dep.artifact_id))
            {
                tracing::debug!("excluding {dep} (matched {ex})");
                continue;
            }

            let managed = apply_management(&dep, depth, &frame.managed);
            let nodes = self.expand(&managed, depth).await?;
            let cid = dep.conflict_id();
            let cyclic = frame.path.contains(&cid);

            let mut children = Vec::with_capacity(nodes.len());
            for mut node in nodes {
                node.cyclic = cyclic;
                if cyclic {
                    tracing::debug!("cycle at {}, not expanding", node.coordinate);
                } else {
                    tracing::debug!("expanding {} at depth {depth}", node.coordinate);
                }
                let mut exclusions = frame.exclusions.clone();
                exclusions.extend(node.exclusions.iter().cloned());
                let idx = graph.add_child(frame.node, node);
                if !cyclic {
                    let mut path = frame.path.clone();
                    path.insert(cid.clone());
                    children.push(Frame {
                        node: idx,
                        depth,
                        pending: None,
                        managed: frame.managed.clone(),
                        exclusions,
                        path,
                    });
                }
            }
            // First version on top so sibling subtrees expand in order.
            stack.extend(children.into_iter().rev());
        }

        Ok(graph)
    }

    /// Turn a managed dependency into one raw node per selected version.
    async fn expand(
        &mut self,
        managed: &ManagedDependency,
        depth: usize,
    ) -> Result<Vec<RawNode>, ResolveError> {
        let dep = &managed.dependency;
        let fail = |cause: CollectionCause| ResolveError::Collection {
            coordinate: dep.coordinate(&dep.version),
            cause,
        };

        let constraint = dep
            .constraint()
            .map_err(|e| fail(e.into()))?
            .ok_or_else(|| {
                fail(CollectionCause::MissingVersion {
                    conflict_id: dep.conflict_id(),
                })
            })?;

        let versions: Vec<String> = match &constraint {
            VersionConstraint::Version(v) => vec![v.as_str().to_string()],
            VersionConstraint::Ranges(_) => {
                let available = self.available_versions(dep).await?;
                let matching: Vec<String> = available
                    .iter()
                    .filter(|v| constraint.contains(v))
                    .map(|v| v.as_str().to_string())
                    .collect();
                if matching.is_empty() {
                    return Err(fail(CollectionCause::NoMatchingVersion {
                        conflict_id: dep.conflict_id(),
                        constraint: constraint.to_string(),
                    }));
                }
                matching
            }
        };

        Ok(versions
            .into_iter()
            .map(|version| RawNode {
                coordinate: dep.coordinate(&version),
                scope: Some(dep.declared_scope()),
                optional: dep.optional,
                premanaged_version: managed.premanaged_version.clone(),
                premanaged_scope: managed.premanaged_scope.clone(),
                constraint: Some(constraint.clone()),
                exclusions: dep.exclusions.clone(),
                depth,
                cyclic: false,
            })
            .collect())
    }

    async fn descriptor(&mut self, coordinate: &Coordinate) -> Result<ArtifactDescriptor, ResolveError> {
        if let Some(cached) = self.descriptors.get(coordinate) {
            return Ok(cached.clone());
        }
        let descriptor = self
            .provider
            .descriptor(coordinate)
            .await
            .map_err(|e| ResolveError::Collection {
                coordinate: coordinate.clone(),
                cause: e.into(),
            })?;
        self.descriptors
            .insert(coordinate.clone(), descriptor.clone());
        Ok(descriptor)
    }

    /// Available versions of `dep`'s artifact, ascending.
    async fn available_versions(&mut self, dep: &Dependency) -> Result<Vec<MavenVersion>, ResolveError> {
        let id = dep.conflict_id();
        if let Some(cached) = self.versions.get(&id) {
            return Ok(cached.clone());
        }
        let raw = self
            .provider
            .versions(&id)
            .await
            .map_err(|e| ResolveError::Collection {
                coordinate: dep.coordinate(&dep.version),
                cause: e.into(),
            })?;
        let mut versions: Vec<MavenVersion> = raw.iter().map(|v| MavenVersion::parse(v)).collect();
        versions.sort();
        versions.dedup();
        self.versions.insert(id, versions.clone());
        Ok(versions)
    }
}

fn merge_managed(map: &mut ManagementMap, entries: &[Dependency]) {
    for entry in entries {
        map.entry(entry.conflict_id()).or_insert_with(|| entry.clone());
    }
}

/// Collect the raw graph for a request.
pub async fn collect(
    request: &ResolutionRequest,
    provider: &dyn MetadataProvider,
) -> Result<RawGraph, ResolveError> {
    Collector::new(provider, &request.resolver)
        .collect(&request.project, &request.dependencies, &request.managed)
        .await
}
