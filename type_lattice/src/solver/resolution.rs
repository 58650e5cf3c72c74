use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use super::term::{Owner, VarId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConflictKind {
    /// The two sides belong to different structured families, or are
    /// function types of different arity.
    StructuralMismatch,
    /// The sides have compatible structure but the order does not hold.
    UnsatisfiedConstraint,
    /// A settable variable resolved to a type its owner cannot accept.
    UnacceptableResolution,
    /// The variable was still changing when the pass limit was reached.
    NonConvergent,
}

impl fmt::Display for ConflictKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ConflictKind::StructuralMismatch => "structural mismatch",
            ConflictKind::UnsatisfiedConstraint => "unsatisfied constraint",
            ConflictKind::UnacceptableResolution => "unacceptable resolution",
            ConflictKind::NonConvergent => "did not converge",
        };
        f.write_str(s)
    }
}

/// One problem found by a resolution run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conflict {
    pub kind: ConflictKind,
    pub owners: BTreeSet<Owner>,
    pub variables: Vec<VarId>,
    /// Rendered value of the lesser side, for inequality conflicts.
    pub lesser: Option<String>,
    /// Rendered value of the greater side, for inequality conflicts.
    pub greater: Option<String>,
    pub detail: String,
}

impl fmt::Display for Conflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.detail)?;
        if let (Some(lesser), Some(greater)) = (&self.lesser, &self.greater) {
            write!(f, " [{} <= {}]", lesser, greater)?;
        }
        Ok(())
    }
}

/// Outcome of a resolution run. Conflicts do not make the run fail.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Resolution {
    pub conflicts: Vec<Conflict>,
    /// Number of passes of the fixed-point loop.
    pub passes: usize,
    pub converged: bool,
}

impl Resolution {
    pub fn is_success(&self) -> bool {
        self.conflicts.is_empty()
    }

    /// Every model element blamed by at least one conflict.
    pub fn conflicted_owners(&self) -> BTreeSet<Owner> {
        self.conflicts
            .iter()
            .flat_map(|c| c.owners.iter().cloned())
            .collect()
    }

    pub fn conflicts_of_kind(&self, kind: ConflictKind) -> impl Iterator<Item = &Conflict> {
        self.conflicts.iter().filter(move |c| c.kind == kind)
    }

    pub fn is_conflicted(&self, var: VarId) -> bool {
        self.conflicts.iter().any(|c| c.variables.contains(&var))
    }
}
