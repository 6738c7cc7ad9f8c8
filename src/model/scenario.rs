//! Immutable scenario parameters: installed capacities, storage and residual economics.

use std::fmt;

use crate::error::ConfigError;

/// Fixed-capacity generation technologies with an availability profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Technology {
    Pv,
    WindOnshore,
    WindOffshore,
    Biomass,
    Hydro,
}

impl Technology {
    /// Number of fixed-capacity technologies.
    pub const COUNT: usize = 5;

    /// All technologies in merit/stacking order.
    pub const ALL: [Technology; Self::COUNT] = [
        Technology::Pv,
        Technology::WindOnshore,
        Technology::WindOffshore,
        Technology::Biomass,
        Technology::Hydro,
    ];

    /// Position of this technology in [`Technology::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    /// Short name used for result columns.
    pub fn name(self) -> &'static str {
        match self {
            Technology::Pv => "pv",
            Technology::WindOnshore => "wind_on",
            Technology::WindOffshore => "wind_off",
            Technology::Biomass => "biomass",
            Technology::Hydro => "hydro",
        }
    }

    /// Column name of the availability profile in a profile table.
    pub fn profile_column(self) -> &'static str {
        match self {
            Technology::Pv => "pv_profile",
            Technology::WindOnshore => "wind_on_profile",
            Technology::WindOffshore => "wind_off_profile",
            Technology::Biomass => "biomass_profile",
            Technology::Hydro => "hydro_profile",
        }
    }
}

impl fmt::Display for Technology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Installed capacity per fixed-capacity technology (MW).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Capacities {
    pub pv_mw: f64,
    pub wind_onshore_mw: f64,
    pub wind_offshore_mw: f64,
    pub biomass_mw: f64,
    pub hydro_mw: f64,
}

impl Capacities {
    /// Installed capacity of `tech` in MW.
    pub fn get(&self, tech: Technology) -> f64 {
        match tech {
            Technology::Pv => self.pv_mw,
            Technology::WindOnshore => self.wind_onshore_mw,
            Technology::WindOffshore => self.wind_offshore_mw,
            Technology::Biomass => self.biomass_mw,
            Technology::Hydro => self.hydro_mw,
        }
    }

    fn field(tech: Technology) -> &'static str {
        match tech {
            Technology::Pv => "capacities.pv_mw",
            Technology::WindOnshore => "capacities.wind_onshore_mw",
            Technology::WindOffshore => "capacities.wind_offshore_mw",
            Technology::Biomass => "capacities.biomass_mw",
            Technology::Hydro => "capacities.hydro_mw",
        }
    }
}

/// Battery storage unit parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatteryParams {
    /// Charge and discharge power rating (MW).
    pub power_mw: f64,
    /// Energy-to-power ratio (hours).
    pub duration_hours: f64,
    /// Fraction of charged energy that reaches the store, in (0, 1].
    pub charge_efficiency: f64,
    /// Fraction of withdrawn energy delivered to the bus, in (0, 1].
    pub discharge_efficiency: f64,
    /// Fraction of stored energy lost per hour, in [0, 1).
    pub standing_loss: f64,
}

impl BatteryParams {
    /// Usable energy capacity: `power_mw * duration_hours` (MWh).
    pub fn energy_capacity_mwh(&self) -> f64 {
        self.power_mw * self.duration_hours
    }
}

/// Economics and bounds of the extendable residual (backup) generator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResidualParams {
    /// Variable cost per dispatched energy (EUR/MWh).
    pub marginal_cost: f64,
    /// Fixed cost per installed capacity (EUR/MW).
    pub capital_cost: f64,
    /// Lower bound on the optimized capacity (MW).
    pub min_installed_mw: f64,
    /// Optional upper bound on the optimized capacity (MW).
    pub max_installed_mw: Option<f64>,
}

/// Complete, immutable scenario definition. The model layer has no defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct Scenario {
    pub capacities: Capacities,
    pub battery: BatteryParams,
    /// Load energy over the profile horizon (MWh), distributed by the load profile.
    pub annual_load_mwh: f64,
    pub residual: ResidualParams,
    /// Nominal marginal cost of every fixed-capacity technology (EUR/MWh).
    ///
    /// Only orders renewables against each other; it must stay small relative
    /// to the residual marginal cost.
    pub tie_break_cost: f64,
}

impl Scenario {
    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if the scenario is valid. Costs of the residual
    /// generator may be negative: a degenerate cost structure is reported by
    /// the optimizer as unbounded, not rejected here.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        for tech in Technology::ALL {
            non_negative(&mut errors, Capacities::field(tech), self.capacities.get(tech));
        }

        let bat = &self.battery;
        non_negative(&mut errors, "battery.power_mw", bat.power_mw);
        non_negative(&mut errors, "battery.duration_hours", bat.duration_hours);
        efficiency(&mut errors, "battery.charge_efficiency", bat.charge_efficiency);
        efficiency(&mut errors, "battery.discharge_efficiency", bat.discharge_efficiency);
        if !(0.0..1.0).contains(&bat.standing_loss) {
            errors.push(ConfigError::new(
                "battery.standing_loss",
                "must be in [0.0, 1.0)",
            ));
        }

        non_negative(&mut errors, "demand.annual_load_mwh", self.annual_load_mwh);

        let res = &self.residual;
        finite(&mut errors, "residual.marginal_cost", res.marginal_cost);
        finite(&mut errors, "residual.capital_cost", res.capital_cost);
        non_negative(&mut errors, "residual.min_installed_mw", res.min_installed_mw);
        if let Some(max) = res.max_installed_mw {
            non_negative(&mut errors, "residual.max_installed_mw", max);
        }

        non_negative(&mut errors, "solver.tie_break_cost", self.tie_break_cost);

        errors
    }
}

fn finite(errors: &mut Vec<ConfigError>, field: &str, value: f64) {
    if !value.is_finite() {
        errors.push(ConfigError::new(field, "must be a finite number"));
    }
}

fn non_negative(errors: &mut Vec<ConfigError>, field: &str, value: f64) {
    if !value.is_finite() || value < 0.0 {
        errors.push(ConfigError::new(field, "must be a finite number >= 0"));
    }
}

fn efficiency(errors: &mut Vec<ConfigError>, field: &str, value: f64) {
    if !(value > 0.0 && value <= 1.0) {
        errors.push(ConfigError::new(field, "must be in (0.0, 1.0]"));
    }
}
