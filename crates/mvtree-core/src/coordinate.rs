//! Artifact coordinates, conflict identities and exclusions.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Default artifact type when none is declared.
pub const DEFAULT_TYPE: &str = "jar";

/// A fully specified artifact coordinate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coordinate {
    #[serde(rename = "group")]
    pub group_id: String,
    #[serde(rename = "artifact")]
    pub artifact_id: String,
    #[serde(default)]
    pub version: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub classifier: String,
    #[serde(rename = "type", default = "default_type")]
    pub type_: String,
}

fn default_type() -> String {
    DEFAULT_TYPE.to_string()
}

impl Coordinate {
    pub fn new(group_id: &str, artifact_id: &str, version: &str) -> Self {
        Self {
            group_id: group_id.to_string(),
            artifact_id: artifact_id.to_string(),
            version: version.to_string(),
            classifier: String::new(),
            type_: default_type(),
        }
    }

    /// Parse `group:artifact[:type[:classifier]]:version`.
    pub fn parse(s: &str) -> Option<Self> {
        let parts: Vec<&str> = s.split(':').collect();
        if parts.iter().any(|p| p.trim().is_empty()) {
            return None;
        }
        let mut coord = match parts.as_slice() {
            [g, a, v] => Self::new(g, a, v),
            [g, a, t, v] => Self::new(g, a, v).with_type(t),
            [g, a, t, c, v] => Self::new(g, a, v).with_type(t).with_classifier(c),
            _ => return None,
        };
        coord.group_id = coord.group_id.trim().to_string();
        coord.artifact_id = coord.artifact_id.trim().to_string();
        Some(coord)
    }

    pub fn with_type(mut self, type_: &str) -> Self {
        self.type_ = type_.to_string();
        self
    }

    pub fn with_classifier(mut self, classifier: &str) -> Self {
        self.classifier = classifier.to_string();
        self
    }

    /// A copy of this coordinate carrying a different version.
    pub fn with_version(&self, version: &str) -> Self {
        Self {
            version: version.to_string(),
            ..self.clone()
        }
    }

    /// Identity of this artifact for conflict resolution (version excluded).
    pub fn conflict_id(&self) -> ConflictId {
        ConflictId {
            group_id: self.group_id.clone(),
            artifact_id: self.artifact_id.clone(),
            classifier: self.classifier.clone(),
            type_: self.type_.clone(),
        }
    }

    /// `group:artifact` identifier (without version).
    pub fn key(&self) -> String {
        format!("{}:{}", self.group_id, self.artifact_id)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group_id, self.artifact_id, self.type_)?;
        if !self.classifier.is_empty() {
            write!(f, ":{}", self.classifier)?;
        }
        write!(f, ":{}", self.version)
    }
}

/// Version-less artifact identity; all requests sharing one compete.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConflictId {
    pub group_id: String,
    pub artifact_id: String,
    pub classifier: String,
    pub type_: String,
}

impl fmt::Display for ConflictId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group_id, self.artifact_id, self.type_)?;
        if !self.classifier.is_empty() {
            write!(f, ":{}", self.classifier)?;
        }
        Ok(())
    }
}

/// A transitive dependency to exclude. `*` matches any group or artifact.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Exclusion {
    #[serde(rename = "group")]
    pub group_id: String,
    #[serde(rename = "artifact", default = "wildcard")]
    pub artifact_id: String,
}

fn wildcard() -> String {
    "*".to_string()
}

impl Exclusion {
    pub fn new(group_id: &str, artifact_id: &str) -> Self {
        Self {
            group_id: group_id.to_string(),
            artifact_id: artifact_id.to_string(),
        }
    }

    /// Whether this exclusion rules out the given artifact.
    pub fn matches(&self, group_id: &str, artifact_id: &str) -> bool {
        (self.group_id == "*" || self.group_id == group_id)
            && (self.artifact_id == "*" || self.artifact_id == artifact_id)
    }
}

impl fmt::Display for Exclusion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.group_id, self.artifact_id)
    }
}
