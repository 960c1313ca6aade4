//! Resolution entry points.

use mvtree_core::artifact_filter::{ArtifactFilter, PatternArtifactFilter};
use mvtree_core::request::ResolutionRequest;
use mvtree_graph::DependencyTree;

use crate::builder::build_tree;
use crate::collector::Collector;
use crate::error::ResolveError;
use crate::graph::RawGraph;
use crate::provider::MetadataProvider;
use crate::report::ConflictReport;
use crate::transform::{resolve_conflicts, ConflictOutcomes};

/// The output of a resolution request.
#[derive(Debug)]
pub struct Resolution {
    pub tree: DependencyTree,
    pub conflicts: ConflictReport,
}

/// Working state of one request between collection and tree building.
/// Consumed by [`ResolutionSession::build`].
#[derive(Debug)]
pub struct ResolutionSession {
    graph: RawGraph,
    outcomes: ConflictOutcomes,
    verbose: bool,
}

impl ResolutionSession {
    pub fn graph(&self) -> &RawGraph {
        &self.graph
    }

    pub fn outcomes(&self) -> &ConflictOutcomes {
        &self.outcomes
    }

    pub fn build(self, filter: Option<&dyn ArtifactFilter>) -> Resolution {
        let tree = build_tree(&self.graph, &self.outcomes, self.verbose, filter);
        Resolution {
            tree,
            conflicts: self.outcomes.report,
        }
    }
}

/// Resolves requests against one metadata provider.
pub struct Resolver<'p> {
    provider: &'p dyn MetadataProvider,
    filter: Option<Box<dyn ArtifactFilter + 'p>>,
}

impl<'p> Resolver<'p> {
    pub fn new(provider: &'p dyn MetadataProvider) -> Self {
        Self {
            provider,
            filter: None,
        }
    }

    /// A node reaches the tree only if `filter` includes it and every one of
    /// its ancestors; a rejected node takes its whole subtree with it.
    /// Combined with the request's own `include` patterns.
    pub fn with_filter(mut self, filter: impl ArtifactFilter + 'p) -> Self {
        self.filter = Some(Box::new(filter));
        self
    }

    /// Collect the raw graph and resolve its conflicts.
    pub async fn session(&self, request: &ResolutionRequest) -> Result<ResolutionSession, ResolveError> {
        tracing::debug!(
            "resolving {} ({} direct, {} managed)",
            request.project,
            request.dependencies.len(),
            request.managed.len()
        );
        let graph = Collector::new(self.provider, &request.resolver)
            .collect(&request.project, &request.dependencies, &request.managed)
            .await?;
        let outcomes = resolve_conflicts(&graph, &request.resolver)?;
        Ok(ResolutionSession {
            graph,
            outcomes,
            verbose: request.verbose,
        })
    }

    /// Resolve `request` into its final tree.
    pub async fn resolve(&self, request: &ResolutionRequest) -> Result<Resolution, ResolveError> {
        let patterns = PatternArtifactFilter::new(&request.include)?;
        let session = self.session(request).await?;

        let combined = |c: &mvtree_core::coordinate::Coordinate| {
            patterns.include(c) && self.filter.as_ref().map_or(true, |f| f.include(c))
        };
        Ok(session.build(Some(&combined)))
    }
}

/// Resolve `request` against `provider` with no extra filter.
pub async fn resolve(
    request: &ResolutionRequest,
    provider: &dyn MetadataProvider,
) -> Result<Resolution, ResolveError> {
    Resolver::new(provider).resolve(request).await
}
