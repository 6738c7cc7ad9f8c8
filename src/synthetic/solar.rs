use rand::{SeedableRng, rngs::StdRng};

use super::{Shape, StepContext, gaussian_noise};

/// Minimum cloud multiplier (heavy overcast).
const MULTIPLIER_MIN: f64 = 0.1;
/// Maximum cloud multiplier (clear sky).
const MULTIPLIER_MAX: f64 = 1.0;

/// PV availability with seasonal day length and correlated cloud cover.
///
/// The clear-sky value is a half cosine between sunrise and sunset whose peak
/// and width follow the season. A cloud multiplier evolves as a mean-reverting
/// AR(1) process:
/// ```text
/// m(t) = alpha * m(t-1) + (1 - alpha) * mean + epsilon(t)
/// ```
/// clamped to \[0.1, 1.0\]. The multiplier advances every step, including at
/// night, so cloud fronts persist across dawn.
#[derive(Debug, Clone)]
pub struct SolarShape {
    /// Clear-sky peak availability at the summer solstice.
    pub summer_peak: f64,
    /// Clear-sky peak availability at the winter solstice.
    pub winter_peak: f64,
    /// Day length at the summer solstice (hours).
    pub summer_daylight_hours: f64,
    /// Day length at the winter solstice (hours).
    pub winter_daylight_hours: f64,
    pub alpha: f64,
    pub cloud_mean: f64,
    pub cloud_noise_std: f64,
    multiplier: f64,
    rng: StdRng,
}

const SUMMER_SOLSTICE_DAY: f64 = 171.0;

impl SolarShape {
    /// Central European latitude: 16 h summer days, 8 h winter days.
    pub fn central_europe(seed: u64) -> Self {
        Self {
            summer_peak: 0.8,
            winter_peak: 0.1,
            summer_daylight_hours: 16.0,
            winter_daylight_hours: 8.0,
            alpha: 0.9,
            cloud_mean: 0.7,
            cloud_noise_std: 0.08,
            multiplier: 0.7,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Interpolates between winter and summer by a cosine of the season.
    fn seasonal(&self, ctx: &StepContext, winter: f64, summer: f64) -> f64 {
        let s = 0.5 * (1.0 + ctx.season_angle(SUMMER_SOLSTICE_DAY).cos());
        winter + (summer - winter) * s
    }

    /// Clear-sky availability, zero outside daylight.
    fn clear_sky(&self, ctx: &StepContext) -> f64 {
        let daylight = self.seasonal(ctx, self.winter_daylight_hours, self.summer_daylight_hours);
        let sunrise = 12.0 - daylight / 2.0;
        // centre of the hour
        let x = (ctx.hour + 0.5 - sunrise) / daylight;
        if !(0.0..=1.0).contains(&x) {
            return 0.0;
        }
        let peak = self.seasonal(ctx, self.winter_peak, self.summer_peak);
        peak * (std::f64::consts::PI * x).sin()
    }

    fn advance_multiplier(&mut self) -> f64 {
        let epsilon = gaussian_noise(&mut self.rng, self.cloud_noise_std);
        self.multiplier =
            self.alpha * self.multiplier + (1.0 - self.alpha) * self.cloud_mean + epsilon;
        self.multiplier = self.multiplier.clamp(MULTIPLIER_MIN, MULTIPLIER_MAX);
        self.multiplier
    }
}

impl Shape for SolarShape {
    fn value(&mut self, ctx: &StepContext) -> f64 {
        let m = self.advance_multiplier();
        (self.clear_sky(ctx) * m).clamp(0.0, 1.0)
    }

    fn name(&self) -> &'static str {
        "solar_ar1"
    }
}
