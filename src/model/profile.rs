//! Time-indexed availability and load profiles.

use chrono::NaiveDateTime;

use super::scenario::Technology;
use crate::error::ConfigError;

/// Allowed deviation of the load profile sum from 1.0.
pub const LOAD_SUM_TOLERANCE: f64 = 1e-3;

/// Normalized profile values for one time step.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfilePoint {
    /// Start of the time step.
    pub time: NaiveDateTime,
    /// PV availability as a fraction of installed capacity.
    pub pv: f64,
    /// Onshore wind availability as a fraction of installed capacity.
    pub wind_on: f64,
    /// Offshore wind availability as a fraction of installed capacity.
    pub wind_off: f64,
    /// Biomass availability as a fraction of installed capacity.
    pub biomass: f64,
    /// Hydro availability as a fraction of installed capacity.
    pub hydro: f64,
    /// Share of the horizon's load energy falling into this step.
    pub load: f64,
}

impl ProfilePoint {
    /// Availability fraction of `tech` at this step.
    pub fn availability(&self, tech: Technology) -> f64 {
        match tech {
            Technology::Pv => self.pv,
            Technology::WindOnshore => self.wind_on,
            Technology::WindOffshore => self.wind_off,
            Technology::Biomass => self.biomass,
            Technology::Hydro => self.hydro,
        }
    }
}

/// Profile table over a uniform time index.
///
/// Construction does not validate; [`ProfileSeries::validate`] is run by the
/// model builder so that all problems are reported together.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileSeries {
    points: Vec<ProfilePoint>,
}

impl ProfileSeries {
    pub fn new(points: Vec<ProfilePoint>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[ProfilePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Step width in hours, taken from the first two timestamps.
    ///
    /// A series with fewer than two points is treated as hourly.
    pub fn step_hours(&self) -> f64 {
        match self.points.as_slice() {
            [first, second, ..] => (second.time - first.time).num_seconds() as f64 / 3600.0,
            _ => 1.0,
        }
    }

    /// Load power per step (MW) such that the energy over the horizon equals
    /// `annual_load_mwh`.
    pub fn load_mw(&self, annual_load_mwh: f64) -> Vec<f64> {
        let step_hours = self.step_hours();
        self.points
            .iter()
            .map(|p| p.load * annual_load_mwh / step_hours)
            .collect()
    }

    /// Validates values and the time index and returns a list of errors.
    ///
    /// Each column reports at most its first offending row. An empty series
    /// yields no errors here; the builder rejects it separately.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        if self.points.is_empty() {
            return errors;
        }

        for tech in Technology::ALL {
            if let Some((row, value)) = self.first_outside_unit(|p| p.availability(tech)) {
                errors.push(ConfigError::new(
                    format!("profiles[{row}].{}", tech.profile_column()),
                    format!("must be in [0.0, 1.0], got {value}"),
                ));
            }
        }

        if let Some((row, value)) = self.first_outside_unit(|p| p.load) {
            errors.push(ConfigError::new(
                format!("profiles[{row}].load_profile"),
                format!("must be in [0.0, 1.0], got {value}"),
            ));
        }

        let load_sum: f64 = self.points.iter().map(|p| p.load).sum();
        if !((load_sum - 1.0).abs() <= LOAD_SUM_TOLERANCE) {
            errors.push(ConfigError::new(
                "profiles.load_profile",
                format!("must sum to 1.0 over the horizon, got {load_sum:.6}"),
            ));
        }

        if let Some(err) = self.time_index_error() {
            errors.push(err);
        }

        errors
    }

    fn first_outside_unit(&self, value: impl Fn(&ProfilePoint) -> f64) -> Option<(usize, f64)> {
        self.points
            .iter()
            .map(value)
            .enumerate()
            .find(|(_, v)| !(0.0..=1.0).contains(v))
    }

    fn time_index_error(&self) -> Option<ConfigError> {
        let mut expected = None;
        for (row, pair) in self.points.windows(2).enumerate() {
            let step = pair[1].time - pair[0].time;
            if step.num_seconds() <= 0 {
                return Some(ConfigError::new(
                    format!("profiles[{}].time", row + 1),
                    "time index must be strictly increasing",
                ));
            }
            match expected {
                None => expected = Some(step),
                Some(width) if width != step => {
                    return Some(ConfigError::new(
                        format!("profiles[{}].time", row + 1),
                        format!(
                            "time index must use a fixed step width of {} min, got {} min",
                            width.num_minutes(),
                            step.num_minutes()
                        ),
                    ));
                }
                Some(_) => {}
            }
        }
        None
    }
}

impl FromIterator<ProfilePoint> for ProfileSeries {
    fn from_iter<I: IntoIterator<Item = ProfilePoint>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
