//! Resolution reports.
//!
//! A [`ResolutionReport`] snapshots the variable store and the conflicts of
//! one run, and can be rendered as text or JSON.

use serde::{Deserialize, Serialize};

use crate::solver::{Conflict, Resolution, TypeVariables, VarState};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ReportSummary {
    pub total_variables: usize,
    pub resolved_count: usize,
    pub conflicted_count: usize,
    pub unbound_count: usize,
    pub passes: usize,
    pub converged: bool,
}

impl ReportSummary {
    pub fn resolved_percentage(&self) -> f64 {
        if self.total_variables == 0 {
            100.0
        } else {
            (self.resolved_count as f64 / self.total_variables as f64) * 100.0
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableReport {
    pub owner: String,
    pub declared: String,
    pub value: String,
    pub state: VarState,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionReport {
    pub summary: ReportSummary,
    pub variables: Vec<VariableReport>,
    pub conflicts: Vec<Conflict>,
}

impl ResolutionReport {
    pub fn new(resolution: &Resolution, vars: &TypeVariables) -> Self {
        let variables: Vec<VariableReport> = vars
            .iter()
            .map(|(_, var)| VariableReport {
                owner: var.owner().to_string(),
                declared: var.declared().to_string(),
                value: var.value().to_string(),
                state: var.state(),
            })
            .collect();
        let count = |state: VarState| variables.iter().filter(|v| v.state == state).count();
        let summary = ReportSummary {
            total_variables: variables.len(),
            resolved_count: count(VarState::Resolved),
            conflicted_count: count(VarState::Conflicted),
            unbound_count: count(VarState::Unbound),
            passes: resolution.passes,
            converged: resolution.converged,
        };
        Self {
            summary,
            variables,
            conflicts: resolution.conflicts.clone(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.conflicts.is_empty()
    }
}

/// Formats the report as human-readable text.
pub fn format_text_report(report: &ResolutionReport) -> String {
    let mut output = String::new();

    output.push_str("Type Resolution Report\n");
    output.push_str("======================\n\n");

    output.push_str("Summary:\n");
    output.push_str(&format!(
        "  Variables: {}\n",
        report.summary.total_variables
    ));
    output.push_str(&format!(
        "  Resolved: {} ({:.1}%)\n",
        report.summary.resolved_count,
        report.summary.resolved_percentage()
    ));
    if report.summary.conflicted_count > 0 {
        output.push_str(&format!(
            "  Conflicted: {}\n",
            report.summary.conflicted_count
        ));
    }
    if report.summary.unbound_count > 0 {
        output.push_str(&format!("  Unbound: {}\n", report.summary.unbound_count));
    }
    output.push_str(&format!(
        "  Passes: {}{}\n",
        report.summary.passes,
        if report.summary.converged {
            ""
        } else {
            " (not converged)"
        }
    ));
    output.push('\n');

    output.push_str("Variables:\n");
    output.push_str("----------\n");
    for var in &report.variables {
        output.push_str(&format_variable(var));
    }
    output.push('\n');

    if report.conflicts.is_empty() {
        output.push_str("All constraints satisfied.\n");
    } else {
        output.push_str("Conflicts:\n");
        output.push_str("----------\n\n");
        for (idx, conflict) in report.conflicts.iter().enumerate() {
            output.push_str(&format_conflict(idx + 1, conflict));
        }
    }

    output
}

fn format_variable(var: &VariableReport) -> String {
    if var.declared == var.value {
        format!("  {}: {} [{}]\n", var.owner, var.value, var.state)
    } else {
        format!(
            "  {}: {} (declared {}) [{}]\n",
            var.owner, var.value, var.declared, var.state
        )
    }
}

fn format_conflict(index: usize, conflict: &Conflict) -> String {
    let mut output = format!("{}. {}\n", index, conflict.kind);
    output.push_str(&format!("   Constraint: {}\n", conflict.detail));
    if let (Some(lesser), Some(greater)) = (&conflict.lesser, &conflict.greater) {
        output.push_str(&format!("   Values: {} <= {}\n", lesser, greater));
    }
    let owners: Vec<&str> = conflict.owners.iter().map(|o| o.as_str()).collect();
    output.push_str(&format!("   Owners: {}\n", owners.join(", ")));
    output
}

/// Formats the report as JSON.
pub fn format_json_report(report: &ResolutionReport) -> Result<String, String> {
    serde_json::to_string_pretty(report).map_err(|e| format!("JSON serialization error: {}", e))
}

/// Formats the report as compact JSON.
pub fn format_json_compact(report: &ResolutionReport) -> Result<String, String> {
    serde_json::to_string(report).map_err(|e| format!("JSON serialization error: {}", e))
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    /// Pretty-printed JSON.
    Json,
    JsonCompact,
}

pub fn format_report(report: &ResolutionReport, format: OutputFormat) -> Result<String, String> {
    match format {
        OutputFormat::Text => Ok(format_text_report(report)),
        OutputFormat::Json => format_json_report(report),
        OutputFormat::JsonCompact => format_json_compact(report),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ResolverConfig;
    use crate::lattice::TypeLattice;
    use crate::solver::{Inequality, InequalitySolver};
    use crate::types::Type;

    fn run(conflicting: bool) -> ResolutionReport {
        let mut vars = TypeVariables::new();
        let x = vars.add("gain.output", Type::UNKNOWN);
        let limit = vars.add("sink.input", Type::INT);
        let mut constraints = vec![Inequality::new(Type::INT, x)];
        if conflicting {
            constraints.push(Inequality::new(Type::DOUBLE, x));
            constraints.push(Inequality::new(x, limit));
        }
        let lattice = TypeLattice::new();
        let resolution = InequalitySolver::new(&lattice, ResolverConfig::default())
            .resolve(&mut vars, &constraints)
            .unwrap();
        ResolutionReport::new(&resolution, &vars)
    }

    #[test]
    fn test_format_text_report() {
        let report = run(true);
        let text = format_text_report(&report);

        assert!(text.contains("Type Resolution Report"));
        assert!(text.contains("gain.output: double (declared unknown) [conflicted]"));
        assert!(text.contains("1. unsatisfied constraint"));
        assert!(text.contains("Constraint: gain.output <= sink.input"));
        assert!(text.contains("Owners: gain.output, sink.input"));
    }

    #[test]
    fn test_all_satisfied_message() {
        let report = run(false);
        assert!(report.is_success());
        assert_eq!(report.summary.resolved_count, 2);

        let text = format_text_report(&report);
        assert!(text.contains("Resolved: 2 (100.0%)"));
        assert!(text.contains("All constraints satisfied."));
    }

    #[test]
    fn test_format_json_report() {
        let report = run(true);
        let json = format_json_report(&report).unwrap();
        assert!(json.contains("\"owner\": \"gain.output\""));
        assert!(json.contains("\"UnsatisfiedConstraint\""));

        let parsed: ResolutionReport =
            serde_json::from_str(&format_json_compact(&report).unwrap()).unwrap();
        assert_eq!(parsed, report);
    }

    #[test]
    fn test_format_report_dispatch() {
        let report = run(false);
        let text = format_report(&report, OutputFormat::Text).unwrap();
        assert!(text.starts_with("Type Resolution Report"));
        let compact = format_report(&report, OutputFormat::JsonCompact).unwrap();
        assert!(!compact.contains('\n'));
    }
}
