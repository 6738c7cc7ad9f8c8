//! Deterministic, seeded profile series for runs without measured data.
//!
//! Shapes are stylized central-European patterns. They are not a substitute
//! for transparency-platform exports, but give the optimizer realistic
//! structure: diurnal PV, persistent wind lulls, seasonal hydro and a load
//! with daily and weekly rhythm.

use chrono::{Datelike, Duration, NaiveDateTime, Timelike, Weekday};
use rand::{Rng, rngs::StdRng};
use tracing::debug;

use crate::model::{ProfilePoint, ProfileSeries};

/// Demand shape with daily, weekly and seasonal components.
pub mod load;
/// Slowly varying seasonal availability (biomass, hydro).
pub mod seasonal;
/// PV availability with an AR(1) cloud multiplier.
pub mod solar;
/// AR(1) wind capacity factor.
pub mod wind;

pub use load::LoadShape;
pub use seasonal::SeasonalShape;
pub use solar::SolarShape;
pub use wind::WindShape;

/// Days in the reference year used for seasonal phases.
pub const DAYS_PER_YEAR: f64 = 365.0;

/// Calendar position of one time step, passed to every shape.
#[derive(Debug, Clone, Copy)]
pub struct StepContext {
    /// Step index from the start of the horizon.
    pub index: usize,
    /// Hour of day in [0, 24).
    pub hour: f64,
    /// Zero-based day of year.
    pub day_of_year: u32,
    pub weekday: Weekday,
}

impl StepContext {
    pub fn new(index: usize, time: NaiveDateTime) -> Self {
        Self {
            index,
            hour: f64::from(time.hour()) + f64::from(time.minute()) / 60.0,
            day_of_year: time.ordinal0(),
            weekday: time.weekday(),
        }
    }

    /// Seasonal phase in radians, zero on `peak_day`.
    pub fn season_angle(&self, peak_day: f64) -> f64 {
        2.0 * std::f64::consts::PI * (f64::from(self.day_of_year) - peak_day) / DAYS_PER_YEAR
    }
}

/// A generator of one profile column.
///
/// Implementations keep their own random state, so successive calls must be
/// made in time order.
pub trait Shape {
    /// Returns the profile value at the given step.
    fn value(&mut self, ctx: &StepContext) -> f64;

    /// Returns a human-readable name for the shape.
    fn name(&self) -> &'static str;
}

/// Generates Gaussian noise using the Box-Muller transform.
///
/// # Returns
///
/// Random value from a Gaussian distribution with mean 0 and the given
/// standard deviation; 0.0 for a non-positive deviation.
pub fn gaussian_noise(rng: &mut StdRng, std_dev: f64) -> f64 {
    if std_dev <= 0.0 {
        return 0.0;
    }

    let u1: f64 = rng.random::<f64>().clamp(1e-9, 1.0);
    let u2: f64 = rng.random::<f64>();
    let z0 = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
    z0 * std_dev
}

/// Seed offsets keeping the per-column random streams uncorrelated.
const PV_SEED_OFFSET: u64 = 11;
const WIND_ON_SEED_OFFSET: u64 = 23;
const WIND_OFF_SEED_OFFSET: u64 = 37;
const BIOMASS_SEED_OFFSET: u64 = 41;
const HYDRO_SEED_OFFSET: u64 = 53;
const LOAD_SEED_OFFSET: u64 = 67;

/// Hourly synthetic profile series starting at `start`.
#[derive(Debug, Clone)]
pub struct SyntheticProfiles {
    pub start: NaiveDateTime,
    pub days: usize,
    pub seed: u64,
}

impl SyntheticProfiles {
    pub fn new(start: NaiveDateTime, days: usize, seed: u64) -> Self {
        Self { start, days, seed }
    }

    /// Number of hourly steps generated.
    pub fn steps(&self) -> usize {
        self.days * 24
    }

    /// Generates the series. The load column is normalized to sum to 1.
    ///
    /// Identical parameters always produce identical series.
    pub fn generate(&self) -> ProfileSeries {
        let s = self.seed;
        let mut pv = SolarShape::central_europe(s.wrapping_add(PV_SEED_OFFSET));
        let mut wind_on = WindShape::onshore(s.wrapping_add(WIND_ON_SEED_OFFSET));
        let mut wind_off = WindShape::offshore(s.wrapping_add(WIND_OFF_SEED_OFFSET));
        let mut biomass = SeasonalShape::biomass(s.wrapping_add(BIOMASS_SEED_OFFSET));
        let mut hydro = SeasonalShape::run_of_river(s.wrapping_add(HYDRO_SEED_OFFSET));
        let mut load = LoadShape::national(s.wrapping_add(LOAD_SEED_OFFSET));

        let mut points = Vec::with_capacity(self.steps());
        for i in 0..self.steps() {
            let time = self.start + Duration::hours(i as i64);
            let ctx = StepContext::new(i, time);
            points.push(ProfilePoint {
                time,
                pv: pv.value(&ctx),
                wind_on: wind_on.value(&ctx),
                wind_off: wind_off.value(&ctx),
                biomass: biomass.value(&ctx),
                hydro: hydro.value(&ctx),
                load: load.value(&ctx),
            });
        }

        let total: f64 = points.iter().map(|p| p.load).sum();
        if total > 0.0 {
            for p in &mut points {
                p.load /= total;
            }
        }

        debug!(
            steps = points.len(),
            seed = self.seed,
            shapes = ?[pv.name(), wind_on.name(), wind_off.name(), biomass.name(), hydro.name(), load.name()],
            "generated synthetic profiles"
        );
        ProfileSeries::new(points)
    }
}
