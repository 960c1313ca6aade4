//! Nearest-wins version selection with backtracking over hard constraints.

use mvtree_core::scope::Scope;
use mvtree_core::version::{MavenVersion, VersionConstraint};
use petgraph::graph::NodeIndex;

/// One occurrence of a conflict id, as seen by the selector.
#[derive(Debug, Clone)]
pub struct ConflictItem {
    pub node: NodeIndex,
    /// Parent node; items sharing one are siblings.
    pub parent: Option<NodeIndex>,
    pub depth: usize,
    pub version: MavenVersion,
    /// Set only for range requests.
    pub hard_constraint: Option<VersionConstraint>,
    /// Declared scope of the edge.
    pub declared_scope: Scope,
    /// Scope derived from the parent's effective scope.
    pub derived_scope: Scope,
    /// Declared optional flag of the edge.
    pub declared_optional: bool,
    /// Optionality contributed to the group.
    pub optional: bool,
}

impl ConflictItem {
    pub fn is_sibling(&self, other: &ConflictItem) -> bool {
        self.parent == other.parent
    }

    /// Siblings: the higher version is nearer. Otherwise the shallower item.
    pub fn is_nearer(&self, other: &ConflictItem) -> bool {
        if self.is_sibling(other) {
            self.version > other.version
        } else {
            self.depth < other.depth
        }
    }
}

/// Running state of one conflict group.
#[derive(Debug, Default)]
pub struct ConflictGroup {
    accepted: Vec<VersionConstraint>,
    candidates: Vec<usize>,
    winner: Option<usize>,
}

/// No item satisfies every accepted hard constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unsolvable;

impl ConflictGroup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn winner(&self) -> Option<usize> {
        self.winner
    }

    pub fn accepted_constraints(&self) -> &[VersionConstraint] {
        &self.accepted
    }

    fn is_acceptable(&self, version: &MavenVersion) -> bool {
        self.accepted.iter().all(|c| c.contains(version))
    }

    /// Feed the item at `index` of `items`.
    pub fn offer(&mut self, items: &[ConflictItem], index: usize) -> Result<(), Unsolvable> {
        let item = &items[index];
        let mut backtrack = false;

        if let Some(constraint) = &item.hard_constraint {
            if !self.accepted.contains(constraint) {
                self.accepted.push(constraint.clone());
                if let Some(w) = self.winner {
                    if !constraint.contains(&items[w].version) {
                        backtrack = true;
                    }
                }
            }
        }

        if self.is_acceptable(&item.version) {
            self.candidates.push(index);
            if backtrack {
                self.backtrack(items)?;
            } else if self.winner.map_or(true, |w| item.is_nearer(&items[w])) {
                self.winner = Some(index);
            }
        } else if backtrack {
            self.backtrack(items)?;
        }
        Ok(())
    }

    fn backtrack(&mut self, items: &[ConflictItem]) -> Result<(), Unsolvable> {
        self.winner = None;
        let accepted = &self.accepted;
        self.candidates
            .retain(|&i| accepted.iter().all(|c| c.contains(&items[i].version)));
        for &i in &self.candidates {
            if self.winner.map_or(true, |w| items[i].is_nearer(&items[w])) {
                self.winner = Some(i);
            }
        }
        self.winner.map(|_| ()).ok_or(Unsolvable)
    }
}

/// Outcome of a solved group.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    /// Index of the winning item.
    pub winner: usize,
    /// Every hard constraint the group accepted along the way.
    pub accepted: Vec<VersionConstraint>,
}

impl Selection {
    /// The first accepted constraint `version` falls outside of.
    pub fn excluding(&self, version: &MavenVersion) -> Option<&VersionConstraint> {
        self.accepted.iter().find(|c| !c.contains(version))
    }
}

/// Select the winning item of a group, items in discovery order.
pub fn select_winner(items: &[ConflictItem]) -> Result<Selection, Unsolvable> {
    let mut group = ConflictGroup::new();
    for index in 0..items.len() {
        group.offer(items, index)?;
    }
    let winner = group.winner().ok_or(Unsolvable)?;
    Ok(Selection {
        winner,
        accepted: group.accepted_constraints().to_vec(),
    })
}
