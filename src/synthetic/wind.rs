use rand::{SeedableRng, rngs::StdRng};

use super::{Shape, StepContext, gaussian_noise};

/// Day of year with the highest mean wind (mid January).
const WINTER_PEAK_DAY: f64 = 15.0;

/// Wind capacity factor as a mean-reverting AR(1) process.
///
/// The long-run mean follows the season (windier winters). Hourly
/// persistence is high, which produces the multi-day lulls that drive
/// storage and backup sizing.
#[derive(Debug, Clone)]
pub struct WindShape {
    /// Annual mean capacity factor.
    pub mean: f64,
    /// Amplitude of the seasonal swing of the mean.
    pub seasonal_amplitude: f64,
    pub alpha: f64,
    pub noise_std: f64,
    name: &'static str,
    state: f64,
    rng: StdRng,
}

impl WindShape {
    pub fn onshore(seed: u64) -> Self {
        Self::new("wind_onshore", 0.22, 0.08, 0.95, 0.04, seed)
    }

    pub fn offshore(seed: u64) -> Self {
        Self::new("wind_offshore", 0.40, 0.10, 0.95, 0.05, seed)
    }

    fn new(
        name: &'static str,
        mean: f64,
        seasonal_amplitude: f64,
        alpha: f64,
        noise_std: f64,
        seed: u64,
    ) -> Self {
        Self {
            mean,
            seasonal_amplitude,
            alpha: alpha.clamp(0.0, 1.0),
            noise_std: noise_std.max(0.0),
            name,
            state: mean,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Long-run mean capacity factor on the given day.
    pub fn seasonal_mean(&self, ctx: &StepContext) -> f64 {
        self.mean + self.seasonal_amplitude * ctx.season_angle(WINTER_PEAK_DAY).cos()
    }
}

impl Shape for WindShape {
    fn value(&mut self, ctx: &StepContext) -> f64 {
        let target = self.seasonal_mean(ctx);
        let epsilon = gaussian_noise(&mut self.rng, self.noise_std);
        self.state = (self.alpha * self.state + (1.0 - self.alpha) * target + epsilon).clamp(0.0, 1.0);
        self.state
    }

    fn name(&self) -> &'static str {
        self.name
    }
}
