//! Scope selection for a conflict group's winner.

use mvtree_core::config::ResolverConfig;
use mvtree_core::scope::Scope;

use crate::conflict::ConflictItem;

const PREFERENCE: [Scope; 4] = [Scope::Compile, Scope::Runtime, Scope::Provided, Scope::Test];

/// Effective scope of the group's winner.
///
/// A `system` winner keeps its scope. Otherwise the first item at depth one
/// or less decides with its declared scope; failing that the widest derived
/// scope is taken, `system` only when it is the sole scope present.
pub fn select_scope(items: &[ConflictItem], winner: &ConflictItem) -> Scope {
    if winner.declared_scope == Scope::System {
        return Scope::System;
    }
    if let Some(direct) = items.iter().find(|i| i.depth <= 1) {
        return direct.declared_scope.clone();
    }

    let mut scopes: Vec<&Scope> = Vec::new();
    for item in items {
        if !scopes.contains(&&item.derived_scope) {
            scopes.push(&item.derived_scope);
        }
    }
    if scopes.len() > 1 {
        scopes.retain(|s| **s != Scope::System);
    }
    if let [only] = scopes.as_slice() {
        return (*only).clone();
    }
    PREFERENCE
        .iter()
        .find(|p| scopes.contains(p))
        .cloned()
        .unwrap_or_else(|| winner.derived_scope.clone())
}

/// A scope requested in the group that the winner was not widened to, for
/// verbose output. The highest-ranked distinct derived scope other than
/// `selected` is reported.
pub fn ignored_scope(items: &[ConflictItem], selected: &Scope, config: &ResolverConfig) -> Option<Scope> {
    let mut best: Option<(&Scope, Option<usize>)> = None;
    for item in items {
        let scope = &item.derived_scope;
        if scope == selected {
            continue;
        }
        let rank = config.scope_rank(scope);
        // `None` ranks below every listed scope.
        if best.map_or(true, |(_, r)| rank > r) {
            best = Some((scope, rank));
        }
    }
    best.map(|(s, _)| s.clone())
}
