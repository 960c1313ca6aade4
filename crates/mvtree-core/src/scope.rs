//! Dependency scopes and the transitive scope lattice.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Maven-compatible dependency scope.
///
/// The five well-known scopes get their own variants; any other token is
/// kept verbatim so custom scopes survive a round trip.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Scope {
    Compile,
    Runtime,
    Provided,
    Test,
    System,
    Other(String),
}

impl Scope {
    pub fn as_str(&self) -> &str {
        match self {
            Scope::Compile => "compile",
            Scope::Runtime => "runtime",
            Scope::Provided => "provided",
            Scope::Test => "test",
            Scope::System => "system",
            Scope::Other(s) => s,
        }
    }

    /// Parse an optional scope token; blank means "no scope".
    pub fn parse_opt(token: Option<&str>) -> Option<Scope> {
        token
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| Scope::from(s.to_string()))
    }
}

impl Default for Scope {
    fn default() -> Self {
        Self::Compile
    }
}

impl From<String> for Scope {
    fn from(token: String) -> Self {
        match token.as_str() {
            "compile" => Scope::Compile,
            "runtime" => Scope::Runtime,
            "provided" => Scope::Provided,
            "test" => Scope::Test,
            "system" => Scope::System,
            _ => Scope::Other(token),
        }
    }
}

impl From<Scope> for String {
    fn from(scope: Scope) -> Self {
        scope.as_str().to_string()
    }
}

impl FromStr for Scope {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Scope::from(s.to_string()))
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Derive the effective scope of an edge from the effective scope of its
/// parent and the scope the edge declares.
///
/// `parent` is `None` for edges leaving the root.
pub fn derive_scope(parent: Option<&Scope>, child: &Scope) -> Scope {
    match (parent, child) {
        (_, Scope::System | Scope::Test) => child.clone(),
        (None | Some(Scope::Compile), _) => child.clone(),
        (Some(Scope::Other(p)), _) if p.is_empty() => child.clone(),
        (Some(p @ (Scope::Test | Scope::Runtime)), _) => p.clone(),
        (Some(Scope::System | Scope::Provided), _) => Scope::Provided,
        _ => Scope::Runtime,
    }
}
