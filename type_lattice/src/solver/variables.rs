use serde::{Deserialize, Serialize};
use std::fmt;

use super::term::{Owner, VarId};
use crate::error::{TypeError, TypeResult};
use crate::types::Type;

/// Lifecycle of a type variable across a resolution run.
///
/// ```text
/// Unbound ──> Tentative ──> Resolved
///    │            │
///    └────────────┴───────> Conflicted
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VarState {
    /// No bound has been applied yet.
    Unbound,
    /// Raised (or lowered) at least once during the current run.
    Tentative,
    /// The run finished and every constraint on the variable holds.
    Resolved,
    /// Some constraint involving the variable could not be satisfied.
    Conflicted,
}

impl fmt::Display for VarState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            VarState::Unbound => "unbound",
            VarState::Tentative => "tentative",
            VarState::Resolved => "resolved",
            VarState::Conflicted => "conflicted",
        };
        f.write_str(s)
    }
}

/// What counts as an acceptable final value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Acceptance {
    /// The value must be instantiable (no `unknown`, `general`, ...).
    #[default]
    Instantiable,
    /// Any value, including abstract ones.
    AllowAbstract,
}

impl Acceptance {
    pub fn accepts(&self, ty: &Type) -> bool {
        match self {
            Acceptance::Instantiable => ty.is_instantiable(),
            Acceptance::AllowAbstract => true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TypeVariable {
    owner: Owner,
    declared: Type,
    value: Type,
    state: VarState,
    acceptance: Acceptance,
}

impl TypeVariable {
    pub fn owner(&self) -> &Owner {
        &self.owner
    }

    pub fn declared(&self) -> &Type {
        &self.declared
    }

    pub fn value(&self) -> &Type {
        &self.value
    }

    pub fn state(&self) -> VarState {
        self.state
    }

    pub fn acceptance(&self) -> Acceptance {
        self.acceptance
    }

    /// Only variables with an abstract declared type are refined by the solver.
    pub fn is_settable(&self) -> bool {
        !self.declared.is_constant()
    }

    pub fn is_acceptable(&self) -> bool {
        self.acceptance.accepts(&self.value)
    }
}

/// Arena of type variables addressed by [`VarId`].
#[derive(Debug, Clone, Default)]
pub struct TypeVariables {
    vars: Vec<TypeVariable>,
}

impl TypeVariables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a variable. Its value starts out as the declared type.
    pub fn add(&mut self, owner: impl Into<Owner>, declared: Type) -> VarId {
        let id = VarId(self.vars.len());
        self.vars.push(TypeVariable {
            owner: owner.into(),
            value: declared.clone(),
            declared,
            state: VarState::Unbound,
            acceptance: Acceptance::default(),
        });
        id
    }

    pub fn get(&self, id: VarId) -> TypeResult<&TypeVariable> {
        self.vars.get(id.0).ok_or(TypeError::UnknownVariable(id))
    }

    fn get_mut(&mut self, id: VarId) -> TypeResult<&mut TypeVariable> {
        self.vars.get_mut(id.0).ok_or(TypeError::UnknownVariable(id))
    }

    pub fn contains(&self, id: VarId) -> bool {
        id.0 < self.vars.len()
    }

    pub fn value(&self, id: VarId) -> TypeResult<&Type> {
        self.get(id).map(TypeVariable::value)
    }

    pub fn declared(&self, id: VarId) -> TypeResult<&Type> {
        self.get(id).map(TypeVariable::declared)
    }

    pub fn owner(&self, id: VarId) -> TypeResult<&Owner> {
        self.get(id).map(TypeVariable::owner)
    }

    pub fn state(&self, id: VarId) -> TypeResult<VarState> {
        self.get(id).map(TypeVariable::state)
    }

    pub fn is_settable(&self, id: VarId) -> TypeResult<bool> {
        self.get(id).map(TypeVariable::is_settable)
    }

    /// Replace the declared type. A constant type pins the variable; an
    /// abstract one makes it settable again.
    pub fn set_declared(&mut self, id: VarId, declared: Type) -> TypeResult<()> {
        let var = self.get_mut(id)?;
        var.value = declared.clone();
        var.declared = declared;
        var.state = VarState::Unbound;
        Ok(())
    }

    pub fn set_acceptance(&mut self, id: VarId, acceptance: Acceptance) -> TypeResult<()> {
        self.get_mut(id)?.acceptance = acceptance;
        Ok(())
    }

    pub fn is_type_acceptable(&self, id: VarId) -> TypeResult<bool> {
        self.get(id).map(TypeVariable::is_acceptable)
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = VarId> {
        (0..self.vars.len()).map(VarId)
    }

    pub fn iter(&self) -> impl Iterator<Item = (VarId, &TypeVariable)> {
        self.vars.iter().enumerate().map(|(i, v)| (VarId(i), v))
    }

    /// Overwrite values and states with the outcome of a run.
    pub(crate) fn commit(&mut self, values: Vec<Type>, states: Vec<VarState>) {
        debug_assert_eq!(values.len(), self.vars.len());
        for ((var, value), state) in self.vars.iter_mut().zip(values).zip(states) {
            var.value = value;
            var.state = state;
        }
    }
}
