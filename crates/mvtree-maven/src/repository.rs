//! A local Maven repository directory as a metadata provider.
//!
//! Layout: `<root>/<group as path>/<artifact>/<version>/<artifact>-<version>.pom`,
//! with an optional artifact-level `maven-metadata.xml` listing versions.

use std::collections::{HashSet, VecDeque};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use mvtree_core::coordinate::{ConflictId, Coordinate};
use mvtree_core::version::MavenVersion;
use mvtree_resolver::{ArtifactDescriptor, MetadataProvider, ProviderError};
use mvtree_util::errors::MvtreeError;

use crate::metadata::parse_version_listing;
use crate::pom::{parse_pom, Pom, PomDependency};

/// How many parent POMs are followed before giving up.
pub const DEFAULT_MAX_PARENT_DEPTH: usize = 16;

/// A Maven repository laid out on the local file system.
#[derive(Debug, Clone)]
pub struct LocalRepository {
    root: PathBuf,
    max_parent_depth: usize,
}

impl LocalRepository {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            max_parent_depth: DEFAULT_MAX_PARENT_DEPTH,
        }
    }

    pub fn with_max_parent_depth(mut self, depth: usize) -> Self {
        self.max_parent_depth = depth;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Standard Maven layout path for a given coordinate.
    ///
    /// `org.example:lib:1.0` becomes `org/example/lib/1.0`
    pub fn coordinate_path(group: &str, artifact: &str, version: &str) -> String {
        format!("{}/{}/{}", group.replace('.', "/"), artifact, version)
    }

    /// Directory holding every version of an artifact.
    pub fn artifact_dir(&self, group: &str, artifact: &str) -> PathBuf {
        self.root.join(group.replace('.', "/")).join(artifact)
    }

    pub fn pom_path(&self, group: &str, artifact: &str, version: &str) -> PathBuf {
        self.root
            .join(Self::coordinate_path(group, artifact, version))
            .join(format!("{artifact}-{version}.pom"))
    }

    /// Path to the `maven-metadata.xml` at the artifact level (version listing).
    pub fn metadata_path(&self, group: &str, artifact: &str) -> PathBuf {
        self.artifact_dir(group, artifact).join("maven-metadata.xml")
    }

    /// Read and parse one POM as written, `None` when it does not exist.
    pub async fn read_pom(&self, group: &str, artifact: &str, version: &str) -> miette::Result<Option<Pom>> {
        let path = self.pom_path(group, artifact, version);
        let xml = match tokio::fs::read_to_string(&path).await {
            Ok(xml) => xml,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(MvtreeError::Io(e).into()),
        };
        tracing::trace!("read {}", path.display());
        parse_pom(&xml).map(Some)
    }

    /// The POM with its parent chain applied and properties interpolated.
    async fn load_with_parents(&self, group: &str, artifact: &str, version: &str) -> miette::Result<Option<Pom>> {
        let Some(pom) = self.read_pom(group, artifact, version).await? else {
            return Ok(None);
        };

        let mut seen = HashSet::from([format!("{group}:{artifact}:{version}")]);
        let mut chain = vec![pom];
        while let Some(parent) = chain.last().and_then(|p| p.parent.clone()) {
            let key = format!("{}:{}:{}", parent.group_id, parent.artifact_id, parent.version);
            if chain.len() > self.max_parent_depth {
                return Err(MvtreeError::Repository {
                    message: format!(
                        "parent chain of {group}:{artifact}:{version} is deeper than {}",
                        self.max_parent_depth
                    ),
                }
                .into());
            }
            if !seen.insert(key.clone()) {
                return Err(MvtreeError::Repository {
                    message: format!("parent cycle at {key} below {group}:{artifact}:{version}"),
                }
                .into());
            }
            let parent_pom = self
                .read_pom(&parent.group_id, &parent.artifact_id, &parent.version)
                .await?
                .ok_or_else(|| MvtreeError::Repository {
                    message: format!("parent POM {key} of {group}:{artifact}:{version} not found"),
                })?;
            chain.push(parent_pom);
        }

        let Some(mut effective) = chain.pop() else {
            return Ok(None);
        };
        while let Some(mut child) = chain.pop() {
            child.apply_parent(&effective);
            effective = child;
        }
        effective.resolve_properties();
        Ok(Some(effective))
    }

    /// Merge the dependency management of every imported BOM, depth first
    /// in declaration order. Entries already managed are kept.
    async fn import_boms(&self, pom: &mut Pom) -> miette::Result<()> {
        let mut queue: VecDeque<PomDependency> = pom.bom_imports().into_iter().cloned().collect();
        pom.strip_bom_imports();

        let mut seen = HashSet::new();
        while let Some(import) = queue.pop_front() {
            let version = import.version.clone().unwrap_or_default();
            let key = format!("{}:{}:{version}", import.group_id, import.artifact_id);
            if !seen.insert(key.clone()) {
                continue;
            }
            let mut bom = self
                .load_with_parents(&import.group_id, &import.artifact_id, &version)
                .await?
                .ok_or_else(|| MvtreeError::Repository {
                    message: format!("imported BOM {key} not found"),
                })?;
            tracing::debug!("importing {} managed entries from {key}", bom.dependency_management.len());
            for nested in bom.bom_imports().into_iter().rev() {
                queue.push_front(nested.clone());
            }
            bom.strip_bom_imports();
            pom.merge_management(&bom.dependency_management);
        }
        Ok(())
    }

    /// The effective model of `group:artifact:version`: parents applied,
    /// properties interpolated, BOMs imported and managed versions injected
    /// into declared dependencies.
    pub async fn effective_pom(&self, group: &str, artifact: &str, version: &str) -> miette::Result<Option<Pom>> {
        let Some(mut pom) = self.load_with_parents(group, artifact, version).await? else {
            return Ok(None);
        };
        self.import_boms(&mut pom).await?;
        pom.inject_management();
        Ok(Some(pom))
    }

    /// Published versions of an artifact, ascending.
    ///
    /// Taken from `maven-metadata.xml` when it lists any for this artifact,
    /// otherwise from the version directories that contain a POM.
    pub async fn available_versions(&self, group: &str, artifact: &str) -> miette::Result<Vec<String>> {
        let path = self.metadata_path(group, artifact);
        let mut versions = match tokio::fs::read_to_string(&path).await {
            Ok(xml) => {
                let listing = parse_version_listing(&xml)?;
                if listing.describes(artifact) {
                    listing.versions
                } else {
                    tracing::warn!("ignoring {}: it describes another artifact", path.display());
                    Vec::new()
                }
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(MvtreeError::Io(e).into()),
        };
        if versions.is_empty() {
            versions = self.version_directories(group, artifact).await?;
        }
        versions.sort_by_cached_key(|v| MavenVersion::parse(v));
        Ok(versions)
    }

    async fn version_directories(&self, group: &str, artifact: &str) -> miette::Result<Vec<String>> {
        let dir = self.artifact_dir(group, artifact);
        let mut entries = match tokio::fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(MvtreeError::Io(e).into()),
        };

        let mut versions = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(MvtreeError::Io)? {
            if !entry.file_type().await.map_err(MvtreeError::Io)?.is_dir() {
                continue;
            }
            let Some(version) = entry.file_name().to_str().map(str::to_string) else {
                continue;
            };
            let pom = self.pom_path(group, artifact, &version);
            if tokio::fs::try_exists(&pom).await.map_err(MvtreeError::Io)? {
                versions.push(version);
            }
        }
        Ok(versions)
    }
}

#[async_trait]
impl MetadataProvider for LocalRepository {
    async fn descriptor(&self, coordinate: &Coordinate) -> Result<ArtifactDescriptor, ProviderError> {
        let pom = self
            .effective_pom(&coordinate.group_id, &coordinate.artifact_id, &coordinate.version)
            .await
            .map_err(|e| ProviderError::Unreadable {
                subject: coordinate.to_string(),
                message: e.to_string(),
            })?
            .ok_or_else(|| ProviderError::NotFound(coordinate.clone()))?;

        Ok(ArtifactDescriptor::new(
            pom.dependencies.iter().map(PomDependency::to_dependency).collect(),
        )
        .with_managed(
            pom.dependency_management
                .iter()
                .map(PomDependency::to_dependency)
                .collect(),
        ))
    }

    async fn versions(&self, id: &ConflictId) -> Result<Vec<String>, ProviderError> {
        let versions = self
            .available_versions(&id.group_id, &id.artifact_id)
            .await
            .map_err(|e| ProviderError::Unreadable {
                subject: id.to_string(),
                message: e.to_string(),
            })?;
        if versions.is_empty() {
            return Err(ProviderError::NoVersions(id.clone()));
        }
        Ok(versions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinate_path_replaces_dots() {
        let path = LocalRepository::coordinate_path("org.example.platform", "lib", "1.8.0");
        assert_eq!(path, "org/example/platform/lib/1.8.0");
    }

    #[test]
    fn pom_path_format() {
        let repo = LocalRepository::new("/repo");
        assert_eq!(
            repo.pom_path("org.example", "lib", "1.0"),
            PathBuf::from("/repo/org/example/lib/1.0/lib-1.0.pom")
        );
    }

    #[test]
    fn metadata_path_format() {
        let repo = LocalRepository::new("/repo");
        assert_eq!(
            repo.metadata_path("org.example", "lib"),
            PathBuf::from("/repo/org/example/lib/maven-metadata.xml")
        );
    }
}
