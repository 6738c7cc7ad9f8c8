//! Shared test fixtures for integration tests.
#![allow(dead_code)]

use chrono::{Duration, NaiveDate, NaiveDateTime};
use residual_mix::model::{
    BatteryParams, Capacities, ProfilePoint, ProfileSeries, ResidualParams, Scenario,
};
use residual_mix::optimizer::{Assignment, Backend, SolveOutcome, solve};
use residual_mix::model::build_model;

/// Absolute part of the float tolerance (MW / MWh).
pub const ABS_TOL: f64 = 1e-6;
/// Relative part of the float tolerance.
pub const REL_TOL: f64 = 1e-5;

/// Start of every fixture series (2030-01-01 00:00).
pub fn t0() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2030, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .expect("valid timestamp")
}

/// Per-step availability for one fixture row: `[pv, wind_on, wind_off, biomass, hydro]`.
pub type Availability = [f64; 5];

/// Hourly series with the given availabilities and load shares.
pub fn hourly_series(rows: &[(Availability, f64)]) -> ProfileSeries {
    rows.iter()
        .enumerate()
        .map(|(h, &(a, load))| ProfilePoint {
            time: t0() + Duration::hours(h as i64),
            pv: a[0],
            wind_on: a[1],
            wind_off: a[2],
            biomass: a[3],
            hydro: a[4],
            load,
        })
        .collect()
}

/// Hourly series of `n` steps with flat load and the same availability everywhere.
pub fn flat_series(n: usize, availability: Availability) -> ProfileSeries {
    let rows: Vec<_> = (0..n).map(|_| (availability, 1.0 / n as f64)).collect();
    hourly_series(&rows)
}

/// Scenario without renewables or storage; load energy `load_mwh` over the horizon.
pub fn zero_scenario(load_mwh: f64) -> Scenario {
    Scenario {
        capacities: Capacities::default(),
        battery: BatteryParams {
            power_mw: 0.0,
            duration_hours: 0.0,
            charge_efficiency: 1.0,
            discharge_efficiency: 1.0,
            standing_loss: 0.0,
        },
        annual_load_mwh: load_mwh,
        residual: ResidualParams {
            marginal_cost: 100.0,
            capital_cost: 1_000.0,
            min_installed_mw: 0.0,
            max_installed_mw: None,
        },
        tie_break_cost: 0.1,
    }
}

/// Small mixed scenario: PV and onshore wind with a lossy 10 MW / 4 h battery.
pub fn mixed_scenario(load_mwh: f64) -> Scenario {
    Scenario {
        capacities: Capacities {
            pv_mw: 120.0,
            wind_onshore_mw: 60.0,
            ..Capacities::default()
        },
        battery: BatteryParams {
            power_mw: 10.0,
            duration_hours: 4.0,
            charge_efficiency: 0.9,
            discharge_efficiency: 1.0,
            standing_loss: 0.0001,
        },
        ..zero_scenario(load_mwh)
    }
}

/// A day of PV-shaped sun and a steady breeze with a flat load.
pub fn sunny_day() -> ProfileSeries {
    let rows: Vec<_> = (0..24)
        .map(|h| {
            let pv = if (6..18).contains(&h) {
                (std::f64::consts::PI * (h as f64 - 5.5) / 12.0).sin()
            } else {
                0.0
            };
            let wind = 0.2 + 0.1 * ((h % 5) as f64 / 4.0);
            ([pv, wind, 0.0, 0.0, 0.0], 1.0 / 24.0)
        })
        .collect();
    hourly_series(&rows)
}

/// Builds and solves with the default backend.
pub fn solve_default(scenario: &Scenario, profiles: &ProfileSeries) -> SolveOutcome {
    let model = build_model(scenario, profiles).expect("fixture model should build");
    solve(model, Backend::default())
}

/// Builds and solves, expecting an optimal assignment.
pub fn solve_ok(scenario: &Scenario, profiles: &ProfileSeries) -> Assignment {
    match solve_default(scenario, profiles) {
        SolveOutcome::Solved(a) => a,
        other => panic!("expected solved, got {}", other.status()),
    }
}

/// Asserts `actual` is within tolerance of `expected`.
#[track_caller]
pub fn assert_close(actual: f64, expected: f64, what: &str) {
    let tol = ABS_TOL + REL_TOL * expected.abs().max(actual.abs());
    assert!(
        (actual - expected).abs() <= tol,
        "{what}: expected {expected}, got {actual} (tol {tol})"
    );
}

/// Tolerance for comparisons against `scale`.
pub fn tol(scale: f64) -> f64 {
    ABS_TOL + REL_TOL * scale.abs()
}
