//! Constraint-based type resolution.
//!
//! Types of model elements are held in a [`TypeVariables`] arena. Relations
//! between them are expressed as [`Inequality`] constraints over [`Term`]s:
//! fixed types, variables, or [monotonic functions](MonotonicFunction) of
//! other terms. [`InequalitySolver`] finds the least (or greatest) solution
//! by fixed-point iteration and reports every constraint it could not
//! satisfy as a [`Conflict`].
//!
//! ```
//! use type_lattice::solver::{Inequality, InequalitySolver, TypeVariables};
//! use type_lattice::{ResolverConfig, Type, TypeLattice};
//!
//! let mut vars = TypeVariables::new();
//! let x = vars.add("X", Type::UNKNOWN);
//! let constraints = [
//!     Inequality::new(Type::INT, x),
//!     Inequality::new(x, Type::DOUBLE),
//! ];
//!
//! let lattice = TypeLattice::new();
//! let solver = InequalitySolver::new(&lattice, ResolverConfig::default());
//! let resolution = solver.resolve(&mut vars, &constraints).unwrap();
//! assert!(resolution.is_success());
//! assert_eq!(vars.value(x).unwrap(), &Type::INT);
//! ```

pub mod engine;
pub mod functions;
pub mod resolution;
pub mod term;
pub mod typeable;
pub mod variables;

pub use engine::InequalitySolver;
pub use functions::{ArrayOf, ElementOf, FieldOf, MonotonicFn, MonotonicFunction, RecordOf, ReturnOf};
pub use resolution::{Conflict, ConflictKind, Resolution};
pub use term::{Inequality, Owner, Term, VarId};
pub use typeable::{Typeable, TypedObject};
pub use variables::{Acceptance, TypeVariable, TypeVariables, VarState};
