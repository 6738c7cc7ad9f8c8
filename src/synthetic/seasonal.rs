use rand::{SeedableRng, rngs::StdRng};

use super::{Shape, StepContext, gaussian_noise};

/// Availability around a seasonal cosine with small independent noise.
#[derive(Debug, Clone)]
pub struct SeasonalShape {
    pub mean: f64,
    pub amplitude: f64,
    /// Day of year with the highest availability.
    pub peak_day: f64,
    pub noise_std: f64,
    name: &'static str,
    rng: StdRng,
}

impl SeasonalShape {
    /// Near-constant biomass plant availability.
    pub fn biomass(seed: u64) -> Self {
        Self {
            mean: 0.75,
            amplitude: 0.05,
            peak_day: 15.0,
            noise_std: 0.02,
            name: "biomass",
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Run-of-river hydro peaking with the early summer melt.
    pub fn run_of_river(seed: u64) -> Self {
        Self {
            mean: 0.45,
            amplitude: 0.15,
            peak_day: 150.0,
            noise_std: 0.02,
            name: "hydro",
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Shape for SeasonalShape {
    fn value(&mut self, ctx: &StepContext) -> f64 {
        let base = self.mean + self.amplitude * ctx.season_angle(self.peak_day).cos();
        (base + gaussian_noise(&mut self.rng, self.noise_std)).clamp(0.0, 1.0)
    }

    fn name(&self) -> &'static str {
        self.name
    }
}
