use chrono::Weekday;
use rand::{SeedableRng, rngs::StdRng};

use super::{Shape, StepContext, gaussian_noise};

/// Day of year with the highest seasonal demand (mid January).
const WINTER_PEAK_DAY: f64 = 15.0;

/// Unnormalized national demand shape.
///
/// Combines a baseline, a sinusoidal daily pattern, a seasonal swing and a
/// weekend reduction, plus small Gaussian noise. Values are relative; the
/// generator normalizes the column to sum to 1 over the horizon.
#[derive(Debug, Clone)]
pub struct LoadShape {
    pub base: f64,
    /// Amplitude of the daily sinusoid relative to `base`.
    pub daily_amplitude: f64,
    /// Phase offset of the daily sinusoid in radians.
    pub phase_rad: f64,
    /// Amplitude of the seasonal swing relative to `base`.
    pub seasonal_amplitude: f64,
    /// Demand multiplier on Saturdays and Sundays.
    pub weekend_factor: f64,
    pub noise_std: f64,
    rng: StdRng,
}

impl LoadShape {
    /// Daily peak around 13:00, 15 % higher winter demand, 15 % lower weekends.
    pub fn national(seed: u64) -> Self {
        Self {
            base: 1.0,
            daily_amplitude: 0.2,
            // peak at 13:00: sin(2*pi*13/24 + phase) = 1
            phase_rad: std::f64::consts::FRAC_PI_2 - 2.0 * std::f64::consts::PI * 13.0 / 24.0,
            seasonal_amplitude: 0.15,
            weekend_factor: 0.85,
            noise_std: 0.01,
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Shape for LoadShape {
    fn value(&mut self, ctx: &StepContext) -> f64 {
        let angle = 2.0 * std::f64::consts::PI * ctx.hour / 24.0 + self.phase_rad;
        let daily = self.daily_amplitude * angle.sin();
        let seasonal = self.seasonal_amplitude * ctx.season_angle(WINTER_PEAK_DAY).cos();
        let weekday = match ctx.weekday {
            Weekday::Sat | Weekday::Sun => self.weekend_factor,
            _ => 1.0,
        };
        let noise = gaussian_noise(&mut self.rng, self.noise_std);

        // no negative demand
        (self.base * (1.0 + daily + seasonal) * weekday + noise).max(0.0)
    }

    fn name(&self) -> &'static str {
        "load"
    }
}
