//! Requests that lost their conflict group to another version.
//!
//! Every loser whose version differs from the selected one is recorded with
//! a typed [`LossReason`], so callers can tell range exclusions apart from
//! plain nearest-wins mediation.

use std::fmt;

use mvtree_core::coordinate::ConflictId;
use mvtree_core::version::VersionConstraint;

/// Why an occurrence lost its conflict group.
#[derive(Debug, Clone, PartialEq)]
pub enum LossReason {
    /// Same version as the winner; never reported.
    Duplicate,
    /// An accepted range does not contain the requested version.
    Range(VersionConstraint),
    /// A sibling declared a higher version.
    Sibling,
    /// The winner sits closer to the root.
    Nearest { winner_depth: usize, depth: usize },
    /// Same depth under another parent; the earlier occurrence won.
    FirstFound { depth: usize },
}

impl LossReason {
    /// Whether the loss was forced by a hard constraint.
    pub fn is_range(&self) -> bool {
        matches!(self, LossReason::Range(_))
    }
}

impl fmt::Display for LossReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LossReason::Duplicate => f.write_str("duplicate of the selected version"),
            LossReason::Range(range) => write!(f, "excluded by version range {range}"),
            LossReason::Sibling => f.write_str("higher sibling version wins"),
            LossReason::Nearest {
                winner_depth,
                depth,
            } => write!(f, "nearest wins (depth {winner_depth} vs {depth})"),
            LossReason::FirstFound { depth } => {
                write!(f, "first found at depth {depth} wins")
            }
        }
    }
}

/// One losing request.
#[derive(Debug, Clone, PartialEq)]
pub struct VersionConflict {
    pub conflict_id: ConflictId,
    pub requested: String,
    pub resolved: String,
    pub reason: LossReason,
    /// Root-to-request path of the losing occurrence.
    pub path: String,
}

impl fmt::Display for VersionConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} -> {}: {}",
            self.conflict_id, self.requested, self.resolved, self.reason
        )
    }
}

/// Losing requests of one resolution, in conflict processing order.
#[derive(Debug, Default, Clone)]
pub struct ConflictReport {
    conflicts: Vec<VersionConflict>,
}

impl ConflictReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a loss. Duplicates of the selected version are skipped.
    pub fn record(&mut self, conflict: VersionConflict) {
        if conflict.reason != LossReason::Duplicate {
            self.conflicts.push(conflict);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.conflicts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.conflicts.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &VersionConflict> {
        self.conflicts.iter()
    }

    /// Losses forced by version ranges.
    pub fn range_exclusions(&self) -> impl Iterator<Item = &VersionConflict> {
        self.iter().filter(|c| c.reason.is_range())
    }
}

impl fmt::Display for ConflictReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return writeln!(f, "no conflicting versions");
        }
        let ranged = self.range_exclusions().count();
        writeln!(
            f,
            "{} conflicting request(s), {ranged} excluded by version ranges",
            self.len()
        )?;
        for conflict in self.iter() {
            writeln!(f, "{conflict}")?;
            writeln!(f, "    at {}", conflict.path)?;
        }
        Ok(())
    }
}
