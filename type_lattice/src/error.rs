//! Error types for type construction, in-place updates and resolution.
//!
//! Conflicts found while resolving a constraint set are not errors: they are
//! reported as [`Conflict`](crate::solver::Conflict) values on a successful
//! [`Resolution`](crate::solver::Resolution). `TypeError` covers contract
//! violations by the caller and malformed input.

use thiserror::Error;
use type_lattice_parser::ParseError;

use crate::solver::VarId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeError {
    /// An operand handed to the solver violates its contract.
    #[error("malformed operand: {0}")]
    MalformedOperand(String),

    #[error("unknown type variable {0}")]
    UnknownVariable(VarId),

    #[error("cannot update {target} to {candidate}: not a substitution instance")]
    NotSubstitutionInstance { target: String, candidate: String },

    #[error("type {ty} is constant and cannot be changed to {candidate}")]
    ConstantType { ty: String, candidate: String },

    #[error("duplicate label '{0}'")]
    DuplicateLabel(String),

    #[error("unknown type name '{0}'")]
    UnknownTypeName(String),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl TypeError {
    /// Whether this error aborts a resolution run.
    pub fn is_malformed_operand(&self) -> bool {
        matches!(
            self,
            TypeError::MalformedOperand(_) | TypeError::UnknownVariable(_)
        )
    }

    pub(crate) fn not_substitution_instance(
        target: &impl std::fmt::Display,
        candidate: &impl std::fmt::Display,
    ) -> Self {
        TypeError::NotSubstitutionInstance {
            target: target.to_string(),
            candidate: candidate.to_string(),
        }
    }
}

pub type TypeResult<T> = Result<T, TypeError>;
