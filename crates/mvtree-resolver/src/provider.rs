//! The metadata provider seam and an in-memory implementation.

use std::collections::HashMap;

use async_trait::async_trait;
use mvtree_core::coordinate::{ConflictId, Coordinate};
use mvtree_core::dependency::Dependency;
use thiserror::Error;

/// What a coordinate declares about its own dependencies.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArtifactDescriptor {
    /// Direct dependencies, in declaration order.
    pub dependencies: Vec<Dependency>,
    /// Managed-dependency overrides for everything below this coordinate.
    pub managed_dependencies: Vec<Dependency>,
}

impl ArtifactDescriptor {
    pub fn new(dependencies: Vec<Dependency>) -> Self {
        Self {
            dependencies,
            managed_dependencies: Vec::new(),
        }
    }

    pub fn with_managed(mut self, managed: Vec<Dependency>) -> Self {
        self.managed_dependencies = managed;
        self
    }
}

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("artifact descriptor not found for {0}")]
    NotFound(Coordinate),

    #[error("no versions available for {0}")]
    NoVersions(ConflictId),

    #[error("failed to read metadata for {subject}: {message}")]
    Unreadable { subject: String, message: String },
}

/// Source of artifact descriptors and available versions.
#[async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Direct and managed dependencies declared by `coordinate`.
    async fn descriptor(&self, coordinate: &Coordinate) -> Result<ArtifactDescriptor, ProviderError>;

    /// Every published version of the artifact, in any order.
    async fn versions(&self, id: &ConflictId) -> Result<Vec<String>, ProviderError>;
}

/// Provider backed by maps, for embedding and tests.
///
/// Coordinates registered without a descriptor are leaves; versions are
/// collected from every registered coordinate.
#[derive(Debug, Default, Clone)]
pub struct InMemoryProvider {
    descriptors: HashMap<Coordinate, ArtifactDescriptor>,
    versions: HashMap<ConflictId, Vec<String>>,
}

impl InMemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `coordinate` with the given direct dependencies.
    pub fn add(&mut self, coordinate: Coordinate, dependencies: Vec<Dependency>) -> &mut Self {
        self.add_descriptor(coordinate, ArtifactDescriptor::new(dependencies))
    }

    pub fn add_descriptor(
        &mut self,
        coordinate: Coordinate,
        descriptor: ArtifactDescriptor,
    ) -> &mut Self {
        let versions = self.versions.entry(coordinate.conflict_id()).or_default();
        if !versions.contains(&coordinate.version) {
            versions.push(coordinate.version.clone());
        }
        self.descriptors.insert(coordinate, descriptor);
        self
    }

    /// Register a coordinate with no dependencies.
    pub fn add_leaf(&mut self, coordinate: Coordinate) -> &mut Self {
        self.add(coordinate, Vec::new())
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

#[async_trait]
impl MetadataProvider for InMemoryProvider {
    async fn descriptor(&self, coordinate: &Coordinate) -> Result<ArtifactDescriptor, ProviderError> {
        self.descriptors
            .get(coordinate)
            .cloned()
            .ok_or_else(|| ProviderError::NotFound(coordinate.clone()))
    }

    async fn versions(&self, id: &ConflictId) -> Result<Vec<String>, ProviderError> {
        self.versions
            .get(id)
            .cloned()
            .ok_or_else(|| ProviderError::NoVersions(id.clone()))
    }
}
