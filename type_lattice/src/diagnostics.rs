//! Resolution diagnostics.
//!
//! The solver never aborts on a user-level type conflict; it records the
//! conflict on the [`Resolution`](crate::solver::Resolution) and carries on.
//! This module additionally traces *why* a variable ended up where it did,
//! in the order events happened during the fixed-point loop.
//!
//! # Usage
//!
//! Diagnostics are disabled by default to avoid overhead. Enable them via:
//! - `DiagnosticsCollector::enable()` - enable diagnostics collection
//! - `DiagnosticsCollector::disable()` - disable diagnostics collection
//! - `DiagnosticsCollector::take()` - retrieve and clear collected diagnostics

use std::cell::RefCell;

/// What happened to a variable or constraint.
#[derive(Clone, Debug, PartialEq)]
pub enum DiagnosticReason {
    /// An inequality between two fixed types does not hold.
    ConstantConstraintViolated,

    /// The bound computed for a variable does not fit its declared form.
    /// Contains the rejected candidate.
    NotSubstitutionInstance(String),

    /// Variables were still changing when the pass limit was reached.
    /// Contains the number of passes run.
    FixedPointDivergence(usize),

    /// The final value of a variable is abstract.
    UnacceptableResolution,

    /// Two sides of an inequality belong to different structured families.
    StructuralMismatch,

    /// Two sides of an inequality are of compatible shape but ordered wrong.
    UnsatisfiedConstraint,
}

impl std::fmt::Display for DiagnosticReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DiagnosticReason::ConstantConstraintViolated => {
                write!(f, "constraint between fixed types does not hold")
            }
            DiagnosticReason::NotSubstitutionInstance(candidate) => {
                write!(f, "bound {} does not fit the declared type", candidate)
            }
            DiagnosticReason::FixedPointDivergence(passes) => {
                write!(f, "resolution didn't converge after {} passes", passes)
            }
            DiagnosticReason::UnacceptableResolution => {
                write!(f, "resolved to an abstract type")
            }
            DiagnosticReason::StructuralMismatch => {
                write!(f, "types have incompatible structure")
            }
            DiagnosticReason::UnsatisfiedConstraint => write!(f, "constraint not satisfied"),
        }
    }
}

#[derive(Clone, Debug)]
pub struct ResolutionDiagnostic {
    pub reason: DiagnosticReason,
    /// Owner or inequality the diagnostic is about.
    pub context: Option<String>,
    /// Value of the variable when the event happened, if any.
    pub resolved_to: Option<String>,
}

impl ResolutionDiagnostic {
    pub fn new(reason: DiagnosticReason) -> Self {
        Self {
            reason,
            context: None,
            resolved_to: None,
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn with_resolved_to(mut self, ty: impl Into<String>) -> Self {
        self.resolved_to = Some(ty.into());
        self
    }
}

impl std::fmt::Display for ResolutionDiagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "type resolution: {}", self.reason)?;
        if let Some(ctx) = &self.context {
            write!(f, " ({})", ctx)?;
        }
        if let Some(ty) = &self.resolved_to {
            write!(f, " -> {}", ty)?;
        }
        Ok(())
    }
}

thread_local! {
    static DIAGNOSTICS_ENABLED: RefCell<bool> = const { RefCell::new(false) };
    static DIAGNOSTICS: RefCell<Vec<ResolutionDiagnostic>> = const { RefCell::new(Vec::new()) };
}

/// Thread-local collector for resolution diagnostics.
#[derive(Debug)]
pub struct DiagnosticsCollector;

impl DiagnosticsCollector {
    pub fn enable() {
        DIAGNOSTICS_ENABLED.with(|enabled| {
            *enabled.borrow_mut() = true;
        });
    }

    pub fn disable() {
        DIAGNOSTICS_ENABLED.with(|enabled| {
            *enabled.borrow_mut() = false;
        });
    }

    pub fn is_enabled() -> bool {
        DIAGNOSTICS_ENABLED.with(|enabled| *enabled.borrow())
    }

    /// Add a diagnostic to the collection (if enabled).
    pub fn emit(diagnostic: ResolutionDiagnostic) {
        if Self::is_enabled() {
            DIAGNOSTICS.with(|diags| {
                diags.borrow_mut().push(diagnostic);
            });
        }
    }

    /// Take all collected diagnostics, clearing the collection.
    pub fn take() -> Vec<ResolutionDiagnostic> {
        DIAGNOSTICS.with(|diags| std::mem::take(&mut *diags.borrow_mut()))
    }

    pub fn clear() {
        DIAGNOSTICS.with(|diags| {
            diags.borrow_mut().clear();
        });
    }

    pub fn count() -> usize {
        DIAGNOSTICS.with(|diags| diags.borrow().len())
    }
}

pub fn emit_constant_violation(inequality: &str) {
    DiagnosticsCollector::emit(
        ResolutionDiagnostic::new(DiagnosticReason::ConstantConstraintViolated)
            .with_context(inequality),
    );
}

pub fn emit_not_substitution_instance(owner: &str, candidate: &str, kept: &str) {
    DiagnosticsCollector::emit(
        ResolutionDiagnostic::new(DiagnosticReason::NotSubstitutionInstance(
            candidate.to_string(),
        ))
        .with_context(owner)
        .with_resolved_to(kept),
    );
}

pub fn emit_fixed_point_divergence(passes: usize, owners: &[String]) {
    let context = if owners.is_empty() {
        "constraint set".to_string()
    } else {
        format!("variables: {}", owners.join(", "))
    };
    DiagnosticsCollector::emit(
        ResolutionDiagnostic::new(DiagnosticReason::FixedPointDivergence(passes))
            .with_context(context),
    );
}

pub fn emit_unacceptable(owner: &str, resolved: &str) {
    DiagnosticsCollector::emit(
        ResolutionDiagnostic::new(DiagnosticReason::UnacceptableResolution)
            .with_context(owner)
            .with_resolved_to(resolved),
    );
}

pub fn emit_unsatisfied(reason: DiagnosticReason, inequality: &str) {
    DiagnosticsCollector::emit(ResolutionDiagnostic::new(reason).with_context(inequality));
}
