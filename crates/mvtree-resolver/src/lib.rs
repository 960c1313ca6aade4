//! Dependency resolution engine: collects the raw dependency graph from a
//! metadata provider, resolves version conflicts nearest-wins with
//! backtracking over hard constraints, selects scopes and optionality per
//! conflict group, and builds the final [`mvtree_graph::DependencyTree`].

pub mod builder;
pub mod collector;
pub mod conflict;
pub mod error;
pub mod graph;
pub mod optionality;
pub mod ordering;
pub mod provider;
pub mod report;
pub mod resolver;
pub mod scope;
pub mod transform;

pub use error::{CollectionCause, ResolveError};
pub use provider::{ArtifactDescriptor, InMemoryProvider, MetadataProvider, ProviderError};
pub use resolver::{resolve, Resolution, ResolutionSession, Resolver};
