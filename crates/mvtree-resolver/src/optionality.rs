//! Optionality merging across a conflict group.

use crate::conflict::ConflictItem;

/// Effective optional flag of a group's winner.
///
/// The first item at depth one or less decides with its declared flag.
/// Otherwise the group is optional unless some item contributes
/// `optional = false`.
pub fn merge_optionality(items: &[ConflictItem]) -> bool {
    let mut optional = true;
    for item in items {
        if item.depth <= 1 {
            return item.declared_optional;
        }
        if !item.optional {
            optional = false;
        }
    }
    optional
}

/// Optionality an item contributes: its own flag, or its parent's when it
/// sits below a direct dependency that is optional.
pub fn contributed_optionality(declared: bool, depth: usize, parent_optional: bool) -> bool {
    declared || (depth > 1 && parent_optional)
}
