//! Post-hoc summary figures computed from a result table.

use std::fmt;

use crate::results::ResultTable;

/// Aggregate indicators of a solved scenario.
///
/// Computed post-hoc from the [`ResultTable`] so that reported figures and
/// per-step data cannot disagree.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    /// Peak positive residual load (MW).
    pub backup_capacity_mw: f64,
    /// Residual generator capacity chosen by the optimizer (MW).
    pub optimized_capacity_mw: f64,
    /// Energy supplied by the residual generator (MWh).
    pub backup_energy_mwh: f64,
    /// Renewable energy available but not dispatched (MWh).
    pub curtailed_energy_mwh: f64,
    /// Load energy over the horizon (MWh).
    pub load_energy_mwh: f64,
    /// Share of load energy met by dispatched renewables, in percent.
    pub renewable_share_pct: f64,
    /// Battery energy throughput (MWh, sum of |power| * dt).
    pub battery_throughput_mwh: f64,
    /// Battery equivalent full cycles (throughput / 2*capacity).
    pub battery_equivalent_full_cycles: f64,
    /// Objective value at the optimum (EUR).
    pub total_cost: f64,
}

impl Summary {
    /// Computes all figures from the complete result table.
    ///
    /// # Arguments
    ///
    /// * `table` - Result table of a solved scenario
    /// * `battery_energy_mwh` - Battery energy capacity for cycle calculation
    pub fn from_table(table: &ResultTable, battery_energy_mwh: f64) -> Self {
        let dt = table.step_hours;
        let mut peak_residual = 0.0_f64;
        let mut backup_energy = 0.0;
        let mut curtailed = 0.0;
        let mut load_energy = 0.0;
        let mut re_energy = 0.0;
        let mut throughput = 0.0;

        for r in &table.rows {
            if r.residual_load_mw > 0.0 {
                peak_residual = peak_residual.max(r.residual_load_mw);
                backup_energy += r.residual_load_mw * dt;
            }
            curtailed += r.curtailed_re_mw * dt;
            load_energy += r.load_mw * dt;
            re_energy += r.total_dispatched_mw() * dt;
            throughput += r.battery_mw.abs() * dt;
        }

        let renewable_share_pct = if load_energy > 0.0 {
            100.0 * re_energy / load_energy
        } else {
            0.0
        };

        let cycles = if battery_energy_mwh > 0.0 {
            throughput / (2.0 * battery_energy_mwh)
        } else {
            0.0
        };

        Self {
            backup_capacity_mw: peak_residual,
            optimized_capacity_mw: table.residual_capacity_mw,
            backup_energy_mwh: backup_energy,
            curtailed_energy_mwh: curtailed,
            load_energy_mwh: load_energy,
            renewable_share_pct,
            battery_throughput_mwh: throughput,
            battery_equivalent_full_cycles: cycles,
            total_cost: table.total_cost,
        }
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Residual Mix Report ---")?;
        writeln!(
            f,
            "Installed backup capacity:  {:.3} GW",
            self.backup_capacity_mw / 1e3
        )?;
        writeln!(
            f,
            "Optimized backup capacity:  {:.3} GW",
            self.optimized_capacity_mw / 1e3
        )?;
        writeln!(
            f,
            "Backup energy:              {:.3} TWh",
            self.backup_energy_mwh / 1e6
        )?;
        writeln!(
            f,
            "Curtailed renewables:       {:.3} TWh",
            self.curtailed_energy_mwh / 1e6
        )?;
        writeln!(
            f,
            "Renewable share:            {:.1}%",
            self.renewable_share_pct
        )?;
        writeln!(
            f,
            "Battery throughput:         {:.3} TWh ({:.1} equiv. cycles)",
            self.battery_throughput_mwh / 1e6,
            self.battery_equivalent_full_cycles
        )?;
        write!(f, "Total cost:                 {:.3} bn EUR", self.total_cost / 1e9)
    }
}
