// Prevent accidental debug output in library code; conflicts and traces
// go through `Resolution` and `DiagnosticsCollector`.
#![deny(clippy::print_stderr)]

//! type_lattice
//!
//! Structural type lattice for dataflow port types and a constraint-based
//! type resolver over it.
//!
//! - [`types`]: the [`Type`] values (base types, matrices, arrays, records,
//!   unions, functions, objects) and their textual form
//! - [`lattice`]: [`TypeLattice`], the partial order with compare/glb/lub
//! - [`solver`]: type variables, inequality constraints and
//!   [`InequalitySolver`]
//! - [`report`]: text and JSON rendering of resolution outcomes

// Order theory on finite graphs
pub mod graph;

// Type values and the lattice over them
pub mod lattice;
pub mod types;

// Resolution
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod report;
pub mod solver;

pub use config::{ResolverConfig, SolveMode, MAX_RESOLUTION_PASSES};
pub use error::{TypeError, TypeResult};
pub use graph::{Cpo, CpoOrdering};
pub use lattice::TypeLattice;
pub use report::{format_report, OutputFormat, ResolutionReport};
pub use solver::{
    Conflict, ConflictKind, Inequality, InequalitySolver, Resolution, Term, TypeVariables, VarId,
};
pub use types::{BaseType, MatrixKind, Type, TypeShape};

/// Parse a type from its canonical textual form.
pub fn parse_type(source: &str) -> TypeResult<Type> {
    source.parse()
}

/// Get the crate version
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
