use std::fmt;

use serde::{Deserialize, Serialize};

use crate::coordinate::{ConflictId, Coordinate, Exclusion, DEFAULT_TYPE};
use crate::scope::Scope;
use crate::version::{VersionConstraint, VersionError};

/// A declared dependency: the request an edge of the graph makes.
///
/// `version` holds the raw version specification (a plain version, one or
/// more ranges, or empty when the version is expected from management).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dependency {
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
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<Scope>,
    #[serde(default)]
    pub optional: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclusions: Vec<Exclusion>,
}

fn default_type() -> String {
    DEFAULT_TYPE.to_string()
}

impl Dependency {
    pub fn new(group_id: &str, artifact_id: &str, version: &str) -> Self {
        Self {
            group_id: group_id.to_string(),
            artifact_id: artifact_id.to_string(),
            version: version.to_string(),
            classifier: String::new(),
            type_: default_type(),
            scope: None,
            optional: false,
            exclusions: Vec::new(),
        }
    }

    /// Parse `group:artifact[:type[:classifier]]:version` shorthand.
    pub fn parse(s: &str) -> Option<Self> {
        let coord = Coordinate::parse(s)?;
        let mut dep = Self::new(&coord.group_id, &coord.artifact_id, &coord.version);
        dep.type_ = coord.type_;
        dep.classifier = coord.classifier;
        Some(dep)
    }

    pub fn with_scope(mut self, scope: Scope) -> Self {
        self.scope = Some(scope);
        self
    }

    pub fn with_optional(mut self, optional: bool) -> Self {
        self.optional = optional;
        self
    }

    pub fn with_exclusion(mut self, exclusion: Exclusion) -> Self {
        self.exclusions.push(exclusion);
        self
    }

    pub fn with_classifier(mut self, classifier: &str) -> Self {
        self.classifier = classifier.to_string();
        self
    }

    pub fn conflict_id(&self) -> ConflictId {
        ConflictId {
            group_id: self.group_id.clone(),
            artifact_id: self.artifact_id.clone(),
            classifier: self.classifier.clone(),
            type_: self.type_.clone(),
        }
    }

    /// The coordinate this dependency points at once `version` is selected.
    pub fn coordinate(&self, version: &str) -> Coordinate {
        Coordinate {
            group_id: self.group_id.clone(),
            artifact_id: self.artifact_id.clone(),
            version: version.to_string(),
            classifier: self.classifier.clone(),
            type_: self.type_.clone(),
        }
    }

    pub fn constraint(&self) -> Result<Option<VersionConstraint>, VersionError> {
        VersionConstraint::parse(&self.version)
    }

    /// The declared scope, `compile` when none was given.
    pub fn declared_scope(&self) -> Scope {
        self.scope.clone().unwrap_or_default()
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.coordinate(&self.version))?;
        if let Some(scope) = &self.scope {
            write!(f, " ({scope})")?;
        }
        Ok(())
    }
}
