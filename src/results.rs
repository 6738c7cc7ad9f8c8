//! Per-step result table derived from a solved assignment.

use std::fmt;

use chrono::NaiveDateTime;

use crate::model::{ProfileSeries, Scenario, Technology};
use crate::optimizer::Assignment;
use crate::power_balance::{curtailed_mw, residual_load_mw};

/// Complete record of one time step.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultRow {
    pub time: NaiveDateTime,
    /// Installed capacity times availability, per technology (MW).
    pub available_mw: [f64; Technology::COUNT],
    /// Dispatched power per technology (MW).
    pub dispatched_mw: [f64; Technology::COUNT],
    /// Battery net power (MW; positive=discharge, negative=charge).
    pub battery_mw: f64,
    /// Battery state of charge at the end of the step (MWh).
    pub battery_soc_mwh: f64,
    /// Residual generator dispatch from the solve (MW).
    pub residual_dispatch_mw: f64,
    pub load_mw: f64,
    /// Available minus dispatched renewables (MW, >= 0).
    pub curtailed_re_mw: f64,
    /// `load - dispatched renewables - battery` (MW).
    pub residual_load_mw: f64,
}

impl ResultRow {
    pub fn available(&self, tech: Technology) -> f64 {
        self.available_mw[tech.index()]
    }

    pub fn dispatched(&self, tech: Technology) -> f64 {
        self.dispatched_mw[tech.index()]
    }

    pub fn total_available_mw(&self) -> f64 {
        self.available_mw.iter().sum()
    }

    pub fn total_dispatched_mw(&self) -> f64 {
        self.dispatched_mw.iter().sum()
    }
}

impl fmt::Display for ResultRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | load={:>10.1} MW  re={:>10.1} MW  bat={:>9.1} MW  \
             residual={:>9.1} MW  curtailed={:>9.1} MW",
            self.time.format("%Y-%m-%d %H:%M"),
            self.load_mw,
            self.total_dispatched_mw(),
            self.battery_mw,
            self.residual_load_mw,
            self.curtailed_re_mw,
        )
    }
}

/// Result rows plus the scalar outputs of the solve.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultTable {
    pub rows: Vec<ResultRow>,
    /// Step width in hours.
    pub step_hours: f64,
    /// Optimized residual generator capacity (MW).
    pub residual_capacity_mw: f64,
    /// Objective value (EUR).
    pub total_cost: f64,
}

impl ResultTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Derives the result table from the solved assignment and the model inputs.
///
/// Available power is computed from the inputs alone; dispatch and battery
/// flows come from the assignment. By the balance constraint `residual_load_mw`
/// equals the residual dispatch up to solver tolerance.
///
/// `assignment` must come from a model of `profiles`. Debug builds panic
/// when the horizon lengths differ; release builds cover only the common
/// prefix of both.
pub fn extract_results(
    scenario: &Scenario,
    profiles: &ProfileSeries,
    assignment: &Assignment,
) -> ResultTable {
    debug_assert_eq!(
        profiles.len(),
        assignment.horizon(),
        "assignment horizon must match the profile series"
    );

    let load = profiles.load_mw(scenario.annual_load_mwh);
    let rows = profiles
        .points()
        .iter()
        .zip(load)
        .take(assignment.horizon())
        .enumerate()
        .map(|(t, (point, load_mw))| {
            let mut available_mw = [0.0; Technology::COUNT];
            let mut dispatched_mw = [0.0; Technology::COUNT];
            for tech in Technology::ALL {
                available_mw[tech.index()] =
                    scenario.capacities.get(tech) * point.availability(tech);
                dispatched_mw[tech.index()] = assignment.dispatch_mw(tech)[t];
            }

            let available: f64 = available_mw.iter().sum();
            let dispatched: f64 = dispatched_mw.iter().sum();
            let battery_mw = assignment.battery_net_mw(t);

            ResultRow {
                time: point.time,
                available_mw,
                dispatched_mw,
                battery_mw,
                battery_soc_mwh: assignment.soc_mwh[t],
                residual_dispatch_mw: assignment.residual_dispatch_mw[t],
                load_mw,
                curtailed_re_mw: curtailed_mw(available, dispatched),
                residual_load_mw: residual_load_mw(load_mw, dispatched, battery_mw),
            }
        })
        .collect();

    ResultTable {
        rows,
        step_hours: profiles.step_hours(),
        residual_capacity_mw: assignment.residual_capacity_mw,
        total_cost: assignment.objective,
    }
}
