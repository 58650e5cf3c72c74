//! Shared helpers for integration tests
// Not every test target uses every helper.
#![allow(dead_code)]

use type_lattice::solver::{Inequality, TypeVariables};
use type_lattice::*;

/// Parse a type, panicking on malformed test input.
pub fn ty(source: &str) -> Type {
    source
        .parse()
        .unwrap_or_else(|e| panic!("bad type {:?}: {}", source, e))
}

/// Resolve with the given config on a fresh lattice.
pub fn resolve_with(
    vars: &mut TypeVariables,
    constraints: &[Inequality],
    config: ResolverConfig,
) -> Resolution {
    let lattice = TypeLattice::from_config(&config);
    InequalitySolver::new(&lattice, config)
        .resolve(vars, constraints)
        .expect("resolution aborted")
}

/// Resolve with the default (least solution) config.
pub fn resolve(vars: &mut TypeVariables, constraints: &[Inequality]) -> Resolution {
    resolve_with(vars, constraints, ResolverConfig::default())
}

/// Owners blamed by a resolution, as plain strings.
pub fn blamed(resolution: &Resolution) -> Vec<String> {
    resolution
        .conflicted_owners()
        .into_iter()
        .map(|o| o.to_string())
        .collect()
}
