use serde::{Deserialize, Serialize};

use crate::scope::Scope;

/// Tunables of dependency collection and conflict annotation, read from the
/// `[resolver]` table of a request file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Scopes whose edges are not followed below the direct dependencies.
    #[serde(
        default = "default_transitive_excluded_scopes",
        rename = "transitive-excluded-scopes"
    )]
    pub transitive_excluded_scopes: Vec<Scope>,

    /// Drop optional edges below the direct dependencies.
    #[serde(default = "default_true", rename = "skip-transitive-optional")]
    pub skip_transitive_optional: bool,

    /// Ranking used to pick the "scope not updated to" diagnostic, lowest
    /// priority first.
    #[serde(
        default = "default_ignored_scope_priority",
        rename = "ignored-scope-priority"
    )]
    pub ignored_scope_priority: Vec<Scope>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            transitive_excluded_scopes: default_transitive_excluded_scopes(),
            skip_transitive_optional: true,
            ignored_scope_priority: default_ignored_scope_priority(),
        }
    }
}

fn default_transitive_excluded_scopes() -> Vec<Scope> {
    vec![Scope::Test, Scope::Provided]
}

fn default_true() -> bool {
    true
}

fn default_ignored_scope_priority() -> Vec<Scope> {
    vec![Scope::Compile, Scope::Runtime, Scope::Provided, Scope::Test]
}

impl ResolverConfig {
    /// Position of `scope` in the ignored-scope priority table.
    ///
    /// Scopes missing from the table rank below every listed scope.
    pub fn scope_rank(&self, scope: &Scope) -> Option<usize> {
        self.ignored_scope_priority.iter().position(|s| s == scope)
    }

    /// Whether an edge declared with `scope` is followed at depth two or more.
    pub fn follows_transitive_scope(&self, scope: &Scope) -> bool {
        !self.transitive_excluded_scopes.contains(scope)
    }
}
