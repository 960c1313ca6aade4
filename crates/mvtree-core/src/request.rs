use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::ResolverConfig;
use crate::coordinate::Coordinate;
use crate::dependency::Dependency;

/// Everything needed to resolve one project's dependency tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolutionRequest {
    /// Attach conflict provenance to every node and keep losing nodes.
    #[serde(default)]
    pub verbose: bool,

    /// Artifact patterns a node must match to appear in the tree.
    #[serde(default)]
    pub include: Vec<String>,

    pub project: Coordinate,

    #[serde(default)]
    pub dependencies: Vec<Dependency>,

    /// Managed dependencies: overrides, not graph edges.
    #[serde(default)]
    pub managed: Vec<Dependency>,

    #[serde(default)]
    pub resolver: ResolverConfig,
}

impl ResolutionRequest {
    pub fn new(project: Coordinate) -> Self {
        Self {
            verbose: false,
            include: Vec::new(),
            project,
            dependencies: Vec::new(),
            managed: Vec::new(),
            resolver: ResolverConfig::default(),
        }
    }

    pub fn with_dependency(mut self, dependency: Dependency) -> Self {
        self.dependencies.push(dependency);
        self
    }

    pub fn with_managed(mut self, dependency: Dependency) -> Self {
        self.managed.push(dependency);
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Parse a request descriptor from a TOML string.
    pub fn parse_toml(content: &str) -> miette::Result<Self> {
        toml::from_str(content).map_err(|e| {
            mvtree_util::errors::MvtreeError::Request {
                message: e.to_string(),
            }
            .into()
        })
    }

    /// Load and parse a request descriptor from disk.
    pub fn from_path(path: &Path) -> miette::Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            mvtree_util::errors::MvtreeError::Request {
                message: format!("Failed to read {}: {e}", path.display()),
            }
        })?;
        Self::parse_toml(&content)
    }
}
