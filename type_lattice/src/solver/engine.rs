//! Fixed-point resolution of inequality constraints.
//!
//! In [`SolveMode::Least`] every settable variable starts at `unknown` and
//! is raised to the lub of its lower bounds until nothing changes. In
//! [`SolveMode::Greatest`] it starts at `general` and is lowered to the glb
//! of its upper bounds. Constraints that do not drive a variable are only
//! checked once the loop has settled.
//!
//! The run works on a private copy of the variable values; the store is
//! updated only when the run completes without a contract error.

use std::collections::BTreeSet;

use super::resolution::{Conflict, ConflictKind, Resolution};
use super::term::{Inequality, Owner, Term, VarId};
use super::typeable::Typeable;
use super::variables::{TypeVariables, VarState};
use crate::config::{ResolverConfig, SolveMode};
use crate::diagnostics::{
    emit_constant_violation, emit_fixed_point_divergence, emit_not_substitution_instance,
    emit_unacceptable, emit_unsatisfied, DiagnosticReason,
};
use crate::error::{TypeError, TypeResult};
use crate::lattice::TypeLattice;
use crate::types::{Type, TypeShape};

#[derive(Debug, Clone)]
pub struct InequalitySolver<'a> {
    lattice: &'a TypeLattice,
    config: ResolverConfig,
}

impl<'a> InequalitySolver<'a> {
    pub fn new(lattice: &'a TypeLattice, config: ResolverConfig) -> Self {
        Self { lattice, config }
    }

    pub fn lattice(&self) -> &TypeLattice {
        self.lattice
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Resolve `constraints` over `vars`.
    ///
    /// Type conflicts are reported on the returned [`Resolution`]. An `Err`
    /// means the constraint set itself is malformed (a term refers to a
    /// missing variable, a function rejected its arguments); in that case
    /// `vars` is left untouched.
    pub fn resolve(
        &self,
        vars: &mut TypeVariables,
        constraints: &[Inequality],
    ) -> TypeResult<Resolution> {
        self.validate(vars, constraints)?;
        let (resolution, values, states) = Run::new(self, vars, constraints).execute()?;
        vars.commit(values, states);
        Ok(resolution)
    }

    /// Collect the constraints of every object and resolve them together.
    pub fn resolve_typeables(
        &self,
        vars: &mut TypeVariables,
        objects: &[&dyn Typeable],
    ) -> TypeResult<Resolution> {
        let constraints: Vec<Inequality> = objects
            .iter()
            .flat_map(|object| object.type_constraints())
            .collect();
        self.resolve(vars, &constraints)
    }

    fn validate(&self, vars: &TypeVariables, constraints: &[Inequality]) -> TypeResult<()> {
        if self.config.max_passes == 0 {
            return Err(TypeError::Config("max_passes must be at least 1".to_string()));
        }
        for inequality in constraints {
            if let Some(missing) = inequality
                .variables()
                .into_iter()
                .find(|id| !vars.contains(*id))
            {
                return Err(TypeError::UnknownVariable(missing));
            }
        }
        Ok(())
    }
}

/// State of one resolution run.
struct Run<'r> {
    lattice: &'r TypeLattice,
    config: &'r ResolverConfig,
    vars: &'r TypeVariables,
    constraints: &'r [Inequality],
    values: Vec<Type>,
    states: Vec<VarState>,
    conflicts: Vec<Conflict>,
}

/// Constraint indices grouped by their role in the run.
struct Plan {
    /// For each variable, the constraints that move it.
    updates: Vec<Vec<usize>>,
    /// Constraints with no settable variable on either side.
    constant: Vec<usize>,
    /// Every other constraint, checked after the loop.
    checked: Vec<usize>,
}

impl<'r> Run<'r> {
    fn new(
        solver: &'r InequalitySolver<'_>,
        vars: &'r TypeVariables,
        constraints: &'r [Inequality],
    ) -> Self {
        let init = match solver.config.mode {
            SolveMode::Least => Type::UNKNOWN,
            SolveMode::Greatest => Type::GENERAL,
        };
        let values = vars
            .iter()
            .map(|(_, var)| {
                let declared = var.declared();
                if !var.is_settable() {
                    declared.clone()
                } else if declared.is_unknown() {
                    init.clone()
                } else {
                    let mut value = declared.clone();
                    value.initialize(&init);
                    value
                }
            })
            .collect();
        Self {
            lattice: solver.lattice,
            config: &solver.config,
            vars,
            constraints,
            values,
            states: vec![VarState::Unbound; vars.len()],
            conflicts: Vec::new(),
        }
    }

    fn execute(mut self) -> TypeResult<(Resolution, Vec<Type>, Vec<VarState>)> {
        let plan = self.plan();

        for &k in &plan.constant {
            self.check(k, true)?;
        }

        let (passes, converged, diverging) = self.iterate(&plan.updates)?;
        if !converged {
            self.report_divergence(passes, &diverging);
        }

        for &k in &plan.checked {
            self.check(k, false)?;
        }

        if self.config.check_acceptability {
            self.check_acceptability();
        }

        let states = self.final_states();
        let resolution = Resolution {
            conflicts: self.conflicts,
            passes,
            converged,
        };
        Ok((resolution, self.values, states))
    }

    fn is_settable(&self, id: VarId) -> bool {
        self.vars.get(id).map(|v| v.is_settable()).unwrap_or(false)
    }

    fn owner(&self, id: VarId) -> String {
        self.vars
            .owner(id)
            .map(Owner::to_string)
            .unwrap_or_else(|_| id.to_string())
    }

    fn plan(&self) -> Plan {
        let mut plan = Plan {
            updates: vec![Vec::new(); self.values.len()],
            constant: Vec::new(),
            checked: Vec::new(),
        };
        for (k, inequality) in self.constraints.iter().enumerate() {
            let has_settable = inequality
                .variables()
                .into_iter()
                .any(|id| self.is_settable(id));
            if !has_settable {
                plan.constant.push(k);
                continue;
            }
            plan.checked.push(k);
            let driven = match self.config.mode {
                SolveMode::Least => &inequality.greater,
                SolveMode::Greatest => &inequality.lesser,
            };
            if let Some(id) = driven.as_variable() {
                if self.is_settable(id) {
                    plan.updates[id.index()].push(k);
                }
            }
        }
        plan
    }

    /// Run passes until no variable changes. Returns the pass count,
    /// whether the loop settled, and the variables changed in the last pass.
    fn iterate(&mut self, updates: &[Vec<usize>]) -> TypeResult<(usize, bool, Vec<VarId>)> {
        let active: Vec<usize> = (0..updates.len())
            .filter(|&i| !updates[i].is_empty())
            .collect();
        if active.is_empty() {
            return Ok((0, true, Vec::new()));
        }

        let constraints = self.constraints;
        let vars = self.vars;
        let mode = self.config.mode;
        let mut last_changed = Vec::new();
        for pass in 1..=self.config.max_passes {
            let mut changed = Vec::new();
            for &i in &active {
                if self.states[i] == VarState::Conflicted {
                    continue;
                }
                let bounds = updates[i]
                    .iter()
                    .map(|&k| match mode {
                        SolveMode::Least => self.eval(&constraints[k].lesser),
                        SolveMode::Greatest => self.eval(&constraints[k].greater),
                    })
                    .collect::<TypeResult<Vec<_>>>()?;

                let id = VarId(i);
                let declared = vars.declared(id)?;
                // The initialized form of an unbound variable is not always the
                // bottom of its declared form: `{unknown}` lies above every
                // `arrayType(unknown,n)`. Try the plain lub of the bounds first.
                let fresh = if mode == SolveMode::Least && self.states[i] == VarState::Unbound {
                    let raw = self.fold_bounds(&Type::UNKNOWN, &bounds);
                    if raw.is_unknown() {
                        None
                    } else {
                        conform(declared, &raw)
                    }
                } else {
                    None
                };
                if let Some(value) = fresh {
                    if value != self.values[i] {
                        self.values[i] = value;
                        self.states[i] = VarState::Tentative;
                        changed.push(id);
                    }
                    continue;
                }

                let candidate = self.fold_bounds(&self.values[i], &bounds);
                if candidate == self.values[i] {
                    continue;
                }
                match conform(declared, &candidate) {
                    Some(value) => {
                        self.values[i] = value;
                        self.states[i] = VarState::Tentative;
                        changed.push(id);
                    }
                    None => {
                        emit_not_substitution_instance(
                            &self.owner(id),
                            &candidate.to_string(),
                            &self.values[i].to_string(),
                        );
                        self.states[i] = VarState::Conflicted;
                    }
                }
            }
            if changed.is_empty() {
                return Ok((pass, true, Vec::new()));
            }
            last_changed = changed;
        }
        Ok((self.config.max_passes, false, last_changed))
    }

    fn fold_bounds(&self, start: &Type, bounds: &[Type]) -> Type {
        bounds.iter().fold(start.clone(), |acc, bound| match self.config.mode {
            SolveMode::Least => self.lattice.lub(&acc, bound),
            SolveMode::Greatest => self.lattice.glb(&acc, bound),
        })
    }

    fn report_divergence(&mut self, passes: usize, diverging: &[VarId]) {
        let owners: Vec<String> = diverging.iter().map(|&id| self.owner(id)).collect();
        emit_fixed_point_divergence(passes, &owners);
        for (&id, owner) in diverging.iter().zip(owners) {
            self.conflicts.push(Conflict {
                kind: ConflictKind::NonConvergent,
                owners: BTreeSet::from([Owner::new(owner)]),
                variables: vec![id],
                lesser: None,
                greater: None,
                detail: format!("still changing after {} passes", passes),
            });
        }
    }

    fn eval(&self, term: &Term) -> TypeResult<Type> {
        match term {
            Term::Constant(ty) => Ok(ty.clone()),
            Term::Variable(id) => self
                .values
                .get(id.index())
                .cloned()
                .ok_or(TypeError::UnknownVariable(*id)),
            Term::Function(f) => {
                let args = f
                    .arguments()
                    .iter()
                    .map(|arg| self.eval(arg))
                    .collect::<TypeResult<Vec<_>>>()?;
                f.apply(&args, self.lattice)
            }
        }
    }

    fn check(&mut self, k: usize, constant: bool) -> TypeResult<()> {
        let constraints = self.constraints;
        let inequality = &constraints[k];
        let lesser = self.eval(&inequality.lesser)?;
        let greater = self.eval(&inequality.greater)?;
        if self.lattice.compare(&lesser, &greater).is_at_most() {
            return Ok(());
        }

        let kind = if is_structural_mismatch(&lesser, &greater) {
            ConflictKind::StructuralMismatch
        } else {
            ConflictKind::UnsatisfiedConstraint
        };
        let detail = format!(
            "{} <= {}",
            self.describe(&inequality.lesser),
            self.describe(&inequality.greater)
        );
        if constant {
            emit_constant_violation(&detail);
        } else {
            let reason = match kind {
                ConflictKind::StructuralMismatch => DiagnosticReason::StructuralMismatch,
                _ => DiagnosticReason::UnsatisfiedConstraint,
            };
            emit_unsatisfied(reason, &detail);
        }

        let mut owners = BTreeSet::new();
        self.collect_owners(&inequality.lesser, &mut owners);
        self.collect_owners(&inequality.greater, &mut owners);
        self.conflicts.push(Conflict {
            kind,
            owners,
            variables: inequality.variables(),
            lesser: Some(lesser.to_string()),
            greater: Some(greater.to_string()),
            detail,
        });
        Ok(())
    }

    fn collect_owners(&self, term: &Term, owners: &mut BTreeSet<Owner>) {
        match term {
            Term::Constant(_) => {}
            Term::Variable(id) => {
                if let Ok(owner) = self.vars.owner(*id) {
                    owners.insert(owner.clone());
                }
            }
            Term::Function(f) => {
                if let Some(owner) = f.owner() {
                    owners.insert(owner.clone());
                }
                for arg in f.arguments() {
                    self.collect_owners(arg, owners);
                }
            }
        }
    }

    fn describe(&self, term: &Term) -> String {
        match term {
            Term::Constant(ty) => ty.to_string(),
            Term::Variable(id) => self.owner(*id),
            Term::Function(f) => {
                let args: Vec<String> = f.arguments().iter().map(|a| self.describe(a)).collect();
                format!("{}({})", f.name(), args.join(", "))
            }
        }
    }

    fn check_acceptability(&mut self) {
        let vars = self.vars;
        for (id, var) in vars.iter() {
            if !var.is_settable() {
                continue;
            }
            let value = &self.values[id.index()];
            if var.acceptance().accepts(value) {
                continue;
            }
            let owner = var.owner().clone();
            emit_unacceptable(owner.as_str(), &value.to_string());
            self.conflicts.push(Conflict {
                kind: ConflictKind::UnacceptableResolution,
                detail: format!("{} resolved to {}", owner, value),
                owners: BTreeSet::from([owner]),
                variables: vec![id],
                lesser: None,
                greater: None,
            });
        }
    }

    fn final_states(&self) -> Vec<VarState> {
        self.vars
            .iter()
            .map(|(id, var)| {
                let i = id.index();
                let blamed = self.conflicts.iter().any(|c| c.variables.contains(&id));
                if blamed || self.states[i] == VarState::Conflicted {
                    VarState::Conflicted
                } else if !var.is_settable() || self.states[i] == VarState::Tentative {
                    VarState::Resolved
                } else {
                    VarState::Unbound
                }
            })
            .collect()
    }
}

/// Fit `candidate` into the declared form of a variable, or `None` if it
/// is not a substitution instance of it.
fn conform(declared: &Type, candidate: &Type) -> Option<Type> {
    if declared.is_unknown() {
        return Some(candidate.clone());
    }
    if !declared.is_substitution_instance(candidate) {
        return None;
    }
    let mut value = declared.clone();
    value.update_type(candidate).ok()?;
    Some(value)
}

/// Whether a failed inequality is down to the shape of its sides rather
/// than to their components.
fn is_structural_mismatch(lesser: &Type, greater: &Type) -> bool {
    if lesser.is_bound() || greater.is_bound() {
        return false;
    }
    match (lesser, greater) {
        (Type::Function(a), Type::Function(b)) => a.arity() != b.arity(),
        _ => match (lesser.shape(), greater.shape()) {
            (Some(a), Some(b)) => a != b,
            (Some(shape), None) | (None, Some(shape)) => shape != TypeShape::Array,
            (None, None) => false,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::functions::ArrayOf;

    fn ty(s: &str) -> Type {
        s.parse().unwrap()
    }

    fn solve(
        vars: &mut TypeVariables,
        constraints: &[Inequality],
        config: ResolverConfig,
    ) -> Resolution {
        let lattice = TypeLattice::new();
        InequalitySolver::new(&lattice, config)
            .resolve(vars, constraints)
            .unwrap()
    }

    #[test]
    fn test_least_solution_between_bounds() {
        let mut vars = TypeVariables::new();
        let x = vars.add("X", Type::UNKNOWN);
        let constraints = [
            Inequality::new(Type::INT, x),
            Inequality::new(x, Type::DOUBLE),
        ];
        let resolution = solve(&mut vars, &constraints, ResolverConfig::default());
        assert!(resolution.is_success());
        assert!(resolution.converged);
        assert_eq!(vars.value(x).unwrap(), &Type::INT);
        assert_eq!(vars.state(x).unwrap(), VarState::Resolved);
    }

    #[test]
    fn test_greatest_solution_between_bounds() {
        let mut vars = TypeVariables::new();
        let x = vars.add("X", Type::UNKNOWN);
        let constraints = [
            Inequality::new(Type::INT, x),
            Inequality::new(x, Type::DOUBLE),
        ];
        let config = ResolverConfig::default().with_mode(SolveMode::Greatest);
        let resolution = solve(&mut vars, &constraints, config);
        assert!(resolution.is_success());
        assert_eq!(vars.value(x).unwrap(), &Type::DOUBLE);
    }

    #[test]
    fn test_chain_propagates_in_one_run() {
        let mut vars = TypeVariables::new();
        let x = vars.add("X", Type::UNKNOWN);
        let y = vars.add("Y", Type::UNKNOWN);
        let z = vars.add("Z", Type::UNKNOWN);
        let constraints = [
            Inequality::new(y, z),
            Inequality::new(x, y),
            Inequality::new(Type::INT, x),
            Inequality::new(Type::DOUBLE, y),
        ];
        let resolution = solve(&mut vars, &constraints, ResolverConfig::default());
        assert!(resolution.is_success());
        assert_eq!(vars.value(x).unwrap(), &Type::INT);
        assert_eq!(vars.value(y).unwrap(), &Type::DOUBLE);
        assert_eq!(vars.value(z).unwrap(), &Type::DOUBLE);
    }

    #[test]
    fn test_constant_violation_is_reported() {
        let mut vars = TypeVariables::new();
        let a = vars.add("A", Type::DOUBLE);
        let b = vars.add("B", Type::INT);
        let resolution = solve(
            &mut vars,
            &[Inequality::new(a, b)],
            ResolverConfig::default(),
        );
        assert_eq!(resolution.conflicts.len(), 1);
        let conflict = &resolution.conflicts[0];
        assert_eq!(conflict.kind, ConflictKind::UnsatisfiedConstraint);
        assert_eq!(conflict.detail, "A <= B");
        assert_eq!(conflict.lesser.as_deref(), Some("double"));
        assert_eq!(vars.state(a).unwrap(), VarState::Conflicted);
        assert_eq!(vars.state(b).unwrap(), VarState::Conflicted);
    }

    #[test]
    fn test_declared_form_is_kept() {
        let mut vars = TypeVariables::new();
        let x = vars.add("X", ty("{x = unknown}"));
        let constraints = [Inequality::new(ty("{x = int, y = boolean}"), x)];
        let resolution = solve(&mut vars, &constraints, ResolverConfig::default());
        assert!(resolution.is_success());
        assert_eq!(vars.value(x).unwrap(), &ty("{x = int}"));
    }

    #[test]
    fn test_candidate_outside_declared_form() {
        let mut vars = TypeVariables::new();
        let x = vars.add("X", ty("{x = unknown}"));
        let resolution = solve(
            &mut vars,
            &[Inequality::new(ty("{|a = int|}"), x)],
            ResolverConfig::default(),
        );
        assert!(!resolution.is_success());
        assert_eq!(vars.state(x).unwrap(), VarState::Conflicted);
        assert_eq!(
            resolution.conflicts[0].kind,
            ConflictKind::StructuralMismatch
        );
    }

    #[test]
    fn test_nonconvergence() {
        let mut vars = TypeVariables::new();
        let x = vars.add("X", Type::UNKNOWN);
        let constraints = [Inequality::new(Term::function(ArrayOf::new(x)), x)];
        let config = ResolverConfig::default().with_max_passes(5);
        let resolution = solve(&mut vars, &constraints, config);
        assert!(!resolution.converged);
        assert_eq!(resolution.passes, 5);
        assert_eq!(
            resolution.conflicts_of_kind(ConflictKind::NonConvergent).count(),
            1
        );
        assert_eq!(vars.value(x).unwrap().depth(), 6);
    }

    #[test]
    fn test_unknown_variable_leaves_store_untouched() {
        let mut vars = TypeVariables::new();
        let x = vars.add("X", Type::UNKNOWN);
        let mut other = TypeVariables::new();
        other.add("A", Type::UNKNOWN);
        let stray = other.add("B", Type::UNKNOWN);

        let lattice = TypeLattice::new();
        let err = InequalitySolver::new(&lattice, ResolverConfig::default())
            .resolve(
                &mut vars,
                &[Inequality::new(Type::INT, x), Inequality::new(x, stray)],
            )
            .unwrap_err();
        assert_eq!(err, TypeError::UnknownVariable(stray));
        assert_eq!(vars.value(x).unwrap(), &Type::UNKNOWN);
        assert_eq!(vars.state(x).unwrap(), VarState::Unbound);
    }

    #[test]
    fn test_structural_mismatch_classification() {
        assert!(is_structural_mismatch(&ty("{x = int}"), &ty("{|x = int|}")));
        assert!(is_structural_mismatch(
            &ty("(function(a0:int) int)"),
            &ty("(function(a0:int, a1:int) int)")
        ));
        assert!(is_structural_mismatch(&ty("{x = int}"), &Type::INT));
        assert!(!is_structural_mismatch(&ty("{int}"), &Type::INT));
        assert!(!is_structural_mismatch(&Type::GENERAL, &ty("{x = int}")));
        assert!(!is_structural_mismatch(&Type::DOUBLE, &Type::INT));
    }
}
