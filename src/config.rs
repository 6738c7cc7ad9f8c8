//! TOML-based scenario configuration and preset definitions.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime};
use serde::Deserialize;

use crate::error::ConfigError;
use crate::io::profiles::read_profiles_file;
use crate::model::{BatteryParams, Capacities, ProfileSeries, ResidualParams, Scenario};
use crate::optimizer::Backend;
use crate::synthetic::SyntheticProfiles;

/// Hours in a reference year; annual energy is scaled to the horizon by this.
pub const HOURS_PER_YEAR: f64 = 8760.0;

/// Top-level scenario configuration parsed from TOML.
///
/// All fields have defaults matching the baseline scenario. Load from
/// TOML with [`ScenarioConfig::from_toml_file`] or use
/// [`ScenarioConfig::baseline`] for the built-in default.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Installed fixed capacities.
    #[serde(default)]
    pub capacities: CapacitiesConfig,
    /// Battery storage parameters.
    #[serde(default)]
    pub battery: BatteryConfig,
    /// Demand level.
    #[serde(default)]
    pub demand: DemandConfig,
    /// Residual generator economics.
    #[serde(default)]
    pub residual: ResidualConfig,
    /// LP backend and tie-break cost.
    #[serde(default)]
    pub solver: SolverConfig,
    /// Profile source.
    #[serde(default)]
    pub profiles: ProfilesConfig,
}

/// Installed capacity per technology (MW).
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CapacitiesConfig {
    pub pv_mw: f64,
    pub wind_onshore_mw: f64,
    pub wind_offshore_mw: f64,
    pub biomass_mw: f64,
    pub hydro_mw: f64,
}

impl Default for CapacitiesConfig {
    fn default() -> Self {
        Self {
            pv_mw: 215_000.0,
            wind_onshore_mw: 115_000.0,
            wind_offshore_mw: 30_000.0,
            biomass_mw: 5_200.0,
            hydro_mw: 2_100.0,
        }
    }
}

/// Battery storage parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BatteryConfig {
    /// Charge/discharge power rating (MW).
    pub power_mw: f64,
    /// Energy-to-power ratio (hours).
    pub duration_hours: f64,
    pub charge_efficiency: f64,
    pub discharge_efficiency: f64,
    /// Fraction of stored energy lost per hour.
    pub standing_loss: f64,
}

impl Default for BatteryConfig {
    fn default() -> Self {
        Self {
            power_mw: 25_000.0,
            duration_hours: 4.0,
            charge_efficiency: 0.90,
            discharge_efficiency: 1.0,
            standing_loss: 0.0001,
        }
    }
}

/// Demand level.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DemandConfig {
    /// Load energy of a full year (MWh). Synthetic horizons get a pro-rata share.
    pub annual_load_mwh: f64,
}

impl Default for DemandConfig {
    fn default() -> Self {
        Self {
            annual_load_mwh: 750_000_000.0,
        }
    }
}

/// Residual generator economics.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResidualConfig {
    /// EUR/MWh.
    pub marginal_cost: f64,
    /// EUR/MW.
    pub capital_cost: f64,
    pub min_installed_mw: f64,
    pub max_installed_mw: Option<f64>,
}

impl Default for ResidualConfig {
    fn default() -> Self {
        Self {
            marginal_cost: 100.0,
            capital_cost: 1_000.0,
            min_installed_mw: 0.0,
            max_installed_mw: None,
        }
    }
}

/// LP backend selection.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SolverConfig {
    /// `"microlp"` or `"highs"`.
    pub backend: Backend,
    /// Marginal cost of every fixed-capacity technology (EUR/MWh).
    pub tie_break_cost: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            backend: Backend::default(),
            tie_break_cost: 0.1,
        }
    }
}

/// Profile source: a CSV table, or the seeded synthetic generator.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProfilesConfig {
    /// CSV profile table. When unset, profiles are generated.
    pub csv: Option<PathBuf>,
    /// Seed of the synthetic generator.
    pub seed: u64,
    /// Number of generated days (must be > 0).
    pub days: usize,
    /// Calendar year the generated series starts in (1 January, 00:00).
    pub start_year: i32,
}

impl Default for ProfilesConfig {
    fn default() -> Self {
        Self {
            csv: None,
            seed: 42,
            days: 365,
            start_year: 2030,
        }
    }
}

impl ProfilesConfig {
    fn start(&self) -> Option<NaiveDateTime> {
        NaiveDate::from_ymd_opt(self.start_year, 1, 1).and_then(|d| d.and_hms_opt(0, 0, 0))
    }
}

impl ScenarioConfig {
    /// Returns the baseline scenario.
    pub fn baseline() -> Self {
        Self::default()
    }

    /// Returns the high-storage preset: four times the battery power with
    /// eight hours of duration.
    pub fn high_storage() -> Self {
        Self {
            battery: BatteryConfig {
                power_mw: 100_000.0,
                duration_hours: 8.0,
                ..BatteryConfig::default()
            },
            ..Self::default()
        }
    }

    /// Returns the backup-floor preset: a 60 GW minimum backup fleet and a
    /// higher fuel cost.
    pub fn backup_floor() -> Self {
        Self {
            residual: ResidualConfig {
                marginal_cost: 150.0,
                min_installed_mw: 60_000.0,
                ..ResidualConfig::default()
            },
            ..Self::default()
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["baseline", "high_storage", "backup_floor"];

    /// Loads a scenario from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "baseline" => Ok(Self::baseline()),
            "high_storage" => Ok(Self::high_storage()),
            "backup_floor" => Ok(Self::backup_floor()),
            _ => Err(ConfigError::new(
                "preset",
                format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            )),
        }
    }

    /// Parses a scenario from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::new("scenario", format!("cannot read \"{}\": {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a scenario from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e: toml::de::Error| ConfigError::new("toml", e.to_string()))
    }

    /// Validates the fields owned by the config layer.
    ///
    /// Physical scenario fields are checked again by the model builder; this
    /// pass reports them early together with the profile-source settings.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = self.to_scenario(HOURS_PER_YEAR).validate();

        let p = &self.profiles;
        if p.csv.is_none() {
            if p.days == 0 {
                errors.push(ConfigError::new("profiles.days", "must be > 0"));
            }
            if p.start().is_none() {
                errors.push(ConfigError::new(
                    "profiles.start_year",
                    format!("not a representable year: {}", p.start_year),
                ));
            }
        }

        errors
    }

    /// Builds the model-layer scenario for a horizon of `horizon_hours`.
    ///
    /// A CSV profile table is taken to cover the year its load profile is
    /// normalized over, so it receives `annual_load_mwh` unchanged whatever
    /// its length (8760 or 8784 hours). Synthetic series receive the share
    /// `horizon_hours / 8760` of the annual load.
    pub fn to_scenario(&self, horizon_hours: f64) -> Scenario {
        let c = &self.capacities;
        let b = &self.battery;
        let r = &self.residual;
        Scenario {
            capacities: Capacities {
                pv_mw: c.pv_mw,
                wind_onshore_mw: c.wind_onshore_mw,
                wind_offshore_mw: c.wind_offshore_mw,
                biomass_mw: c.biomass_mw,
                hydro_mw: c.hydro_mw,
            },
            battery: BatteryParams {
                power_mw: b.power_mw,
                duration_hours: b.duration_hours,
                charge_efficiency: b.charge_efficiency,
                discharge_efficiency: b.discharge_efficiency,
                standing_loss: b.standing_loss,
            },
            annual_load_mwh: self.horizon_load_mwh(horizon_hours),
            residual: ResidualParams {
                marginal_cost: r.marginal_cost,
                capital_cost: r.capital_cost,
                min_installed_mw: r.min_installed_mw,
                max_installed_mw: r.max_installed_mw,
            },
            tie_break_cost: self.solver.tie_break_cost,
        }
    }

    /// Load energy over the horizon (MWh).
    pub fn horizon_load_mwh(&self, horizon_hours: f64) -> f64 {
        match self.profiles.csv {
            Some(_) => self.demand.annual_load_mwh,
            None => self.demand.annual_load_mwh * horizon_hours / HOURS_PER_YEAR,
        }
    }

    /// Loads the configured profile series.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the CSV cannot be read or the synthetic
    /// start year is not representable.
    pub fn load_profiles(&self) -> Result<ProfileSeries, ConfigError> {
        let p = &self.profiles;
        match &p.csv {
            Some(path) => read_profiles_file(path)
                .map_err(|e| ConfigError::new("profiles.csv", e.to_string())),
            None => {
                let start = p.start().ok_or_else(|| {
                    ConfigError::new(
                        "profiles.start_year",
                        format!("not a representable year: {}", p.start_year),
                    )
                })?;
                Ok(SyntheticProfiles::new(start, p.days, p.seed).generate())
            }
        }
    }
}

/// Total duration covered by `profiles` in hours.
pub fn horizon_hours(profiles: &ProfileSeries) -> f64 {
    profiles.len() as f64 * profiles.step_hours()
}
