use miette::Diagnostic;
use mvtree_core::coordinate::{ConflictId, Coordinate};
use mvtree_core::version::VersionError;
use mvtree_util::errors::MvtreeError;
use thiserror::Error;

use crate::provider::ProviderError;

/// Failure of a resolution request. No partial tree is produced.
#[derive(Debug, Error, Diagnostic)]
pub enum ResolveError {
    /// The raw graph could not be collected.
    #[error("Failed to collect dependencies of {coordinate}")]
    #[diagnostic(code(mvtree::collection))]
    Collection {
        coordinate: Coordinate,
        #[source]
        cause: CollectionCause,
    },

    /// No version satisfies every hard constraint of a conflict group.
    #[error("Could not resolve version conflict for {conflict_id} among:\n  {}", .paths.join("\n  "))]
    #[diagnostic(
        code(mvtree::unsolvable_conflict),
        help("Align the version ranges requested along these paths, or manage the version")
    )]
    UnsolvableConflict {
        conflict_id: ConflictId,
        paths: Vec<String>,
    },

    /// An inclusion pattern was invalid.
    #[error(transparent)]
    #[diagnostic(transparent)]
    Filter(#[from] MvtreeError),
}

/// Why a coordinate could not be expanded.
#[derive(Debug, Error)]
pub enum CollectionCause {
    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Constraint(#[from] VersionError),

    #[error("no available version of {conflict_id} matches {constraint}")]
    NoMatchingVersion {
        conflict_id: ConflictId,
        constraint: String,
    },

    #[error("{conflict_id} declares no version and none is managed")]
    MissingVersion { conflict_id: ConflictId },
}
