//! LP solve over a built [`Model`] with a discriminated outcome.
//!
//! Infeasible, unbounded and failed solves are ordinary outcome values rather
//! than errors so that callers can branch on them directly. There is no retry
//! and no timeout in this layer.

use std::fmt;
use std::str::FromStr;
use std::time::Instant;

use good_lp::{ResolutionError, Solution, Solver, SolverModel};
use serde::Deserialize;
use tracing::{info, instrument, warn};

use crate::error::ConfigError;
use crate::model::{Model, ModelVariables, ObjectiveTerms, Technology};

/// LP solver backend, selectable by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Pure-Rust simplex solver.
    #[default]
    MicroLp,
    /// HiGHS, available with the `highs` cargo feature.
    Highs,
}

impl Backend {
    /// Accepted backend names.
    pub const NAMES: &[&str] = &["microlp", "highs"];

    pub fn name(self) -> &'static str {
        match self {
            Backend::MicroLp => "microlp",
            Backend::Highs => "highs",
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Backend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "microlp" => Ok(Backend::MicroLp),
            "highs" => Ok(Backend::Highs),
            other => Err(ConfigError::new(
                "solver.backend",
                format!(
                    "unknown backend \"{other}\", available: {}",
                    Self::NAMES.join(", ")
                ),
            )),
        }
    }
}

/// Bare status of a solve, without the assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveStatus {
    Solved,
    Infeasible,
    Unbounded,
    SolverError,
}

impl fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SolveStatus::Solved => "solved",
            SolveStatus::Infeasible => "infeasible",
            SolveStatus::Unbounded => "unbounded",
            SolveStatus::SolverError => "solver_error",
        })
    }
}

/// Optimal values of every decision variable.
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    /// Dispatch per technology and step (MW), outer index is [`Technology::index`].
    pub dispatch: Vec<Vec<f64>>,
    /// Optimized residual generator capacity (MW).
    pub residual_capacity_mw: f64,
    /// Residual generator dispatch per step (MW).
    pub residual_dispatch_mw: Vec<f64>,
    /// Battery charging power per step (MW).
    pub charge_mw: Vec<f64>,
    /// Battery discharging power per step (MW).
    pub discharge_mw: Vec<f64>,
    /// Battery state of charge at the end of each step (MWh).
    pub soc_mwh: Vec<f64>,
    /// Objective value at the optimum (EUR).
    pub objective: f64,
}

impl Assignment {
    /// Dispatch of `tech` per step (MW).
    pub fn dispatch_mw(&self, tech: Technology) -> &[f64] {
        &self.dispatch[tech.index()]
    }

    /// Number of time steps.
    pub fn horizon(&self) -> usize {
        self.residual_dispatch_mw.len()
    }

    /// Battery net power at step `t`, positive when discharging (MW).
    pub fn battery_net_mw(&self, t: usize) -> f64 {
        self.discharge_mw[t] - self.charge_mw[t]
    }

    fn read(vars: &ModelVariables, terms: ObjectiveTerms, solution: &impl Solution) -> Self {
        let values = |v: &[good_lp::Variable]| -> Vec<f64> {
            v.iter().map(|&x| solution.value(x)).collect()
        };

        let dispatch: Vec<Vec<f64>> = Technology::ALL
            .iter()
            .map(|&tech| values(vars.dispatch(tech)))
            .collect();
        let residual_capacity_mw = solution.value(vars.residual_capacity);
        let residual_dispatch_mw = values(&vars.residual_dispatch);

        let w = terms.step_hours;
        let renewable_energy: f64 = dispatch.iter().flatten().sum::<f64>() * w;
        let residual_energy: f64 = residual_dispatch_mw.iter().sum::<f64>() * w;
        let objective = terms.residual_capital_cost * residual_capacity_mw
            + terms.residual_marginal_cost * residual_energy
            + terms.tie_break_cost * renewable_energy;

        Self {
            dispatch,
            residual_capacity_mw,
            residual_dispatch_mw,
            charge_mw: values(&vars.charge),
            discharge_mw: values(&vars.discharge),
            soc_mwh: values(&vars.soc),
            objective,
        }
    }
}

/// Result of a solve. Only [`SolveOutcome::Solved`] carries an assignment.
#[derive(Debug, Clone, PartialEq)]
pub enum SolveOutcome {
    Solved(Assignment),
    Infeasible,
    Unbounded,
    SolverError(String),
}

impl SolveOutcome {
    pub fn status(&self) -> SolveStatus {
        match self {
            SolveOutcome::Solved(_) => SolveStatus::Solved,
            SolveOutcome::Infeasible => SolveStatus::Infeasible,
            SolveOutcome::Unbounded => SolveStatus::Unbounded,
            SolveOutcome::SolverError(_) => SolveStatus::SolverError,
        }
    }

    /// The assignment, `None` for every non-solved status.
    pub fn assignment(&self) -> Option<&Assignment> {
        match self {
            SolveOutcome::Solved(assignment) => Some(assignment),
            _ => None,
        }
    }

    pub fn into_assignment(self) -> Option<Assignment> {
        match self {
            SolveOutcome::Solved(assignment) => Some(assignment),
            _ => None,
        }
    }
}

/// Solves `model` with the given backend.
#[instrument(skip_all, fields(backend = %backend, steps = model.horizon()))]
pub fn solve(model: Model, backend: Backend) -> SolveOutcome {
    let started = Instant::now();
    let outcome = match backend {
        #[cfg(feature = "microlp")]
        Backend::MicroLp => solve_with(model, good_lp::microlp),
        #[cfg(feature = "highs")]
        Backend::Highs => solve_with(model, good_lp::highs),
        #[allow(unreachable_patterns)]
        other => SolveOutcome::SolverError(format!(
            "backend \"{other}\" is not compiled in, enable the \"{other}\" cargo feature"
        )),
    };

    match &outcome {
        SolveOutcome::Solved(assignment) => info!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            objective = assignment.objective,
            residual_capacity_mw = assignment.residual_capacity_mw,
            "optimization solved"
        ),
        SolveOutcome::SolverError(message) => warn!(%message, "solver failed"),
        other => warn!(status = %other.status(), "optimization not solved"),
    }
    outcome
}

/// Solves `model` with any `good_lp` solver that reports [`ResolutionError`].
pub fn solve_with<S>(model: Model, solver: S) -> SolveOutcome
where
    S: Solver,
    S::Model: SolverModel<Error = ResolutionError>,
{
    let (problem, objective, constraints, vars, terms) = model.into_parts();

    let mut lp = problem.minimise(objective).using(solver);
    for c in constraints {
        lp = lp.with(c);
    }

    match lp.solve() {
        Ok(solution) => SolveOutcome::Solved(Assignment::read(&vars, terms, &solution)),
        Err(ResolutionError::Infeasible) => SolveOutcome::Infeasible,
        Err(ResolutionError::Unbounded) => SolveOutcome::Unbounded,
        Err(other) => SolveOutcome::SolverError(other.to_string()),
    }
}
