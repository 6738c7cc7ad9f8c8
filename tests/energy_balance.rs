//! Properties of solved dispatch on small hourly scenarios.

mod common;

use common::{assert_close, mixed_scenario, solve_ok, sunny_day, tol};
use residual_mix::kpi::Summary;
use residual_mix::model::Technology;
use residual_mix::power_balance::balance_error_mw;
use residual_mix::results::{ResultTable, extract_results};

/// 80 MW flat load over the sunny day.
const LOAD_MWH: f64 = 24.0 * 80.0;

fn solved_table() -> (residual_mix::model::Scenario, ResultTable) {
    let scenario = mixed_scenario(LOAD_MWH);
    let profiles = sunny_day();
    let assignment = solve_ok(&scenario, &profiles);
    let table = extract_results(&scenario, &profiles, &assignment);
    (scenario, table)
}

#[test]
fn available_power_is_capacity_times_availability() {
    let scenario = mixed_scenario(LOAD_MWH);
    let profiles = sunny_day();
    let assignment = solve_ok(&scenario, &profiles);
    let table = extract_results(&scenario, &profiles, &assignment);

    for (row, point) in table.rows.iter().zip(profiles.points()) {
        for tech in Technology::ALL {
            let expected = scenario.capacities.get(tech) * point.availability(tech);
            assert_close(row.available(tech), expected, tech.name());
            assert!(row.dispatched(tech) <= expected + tol(expected));
            assert!(row.dispatched(tech) >= -tol(expected));
        }
    }
}

#[test]
fn energy_balance_holds_every_step() {
    let (_, table) = solved_table();
    for (t, row) in table.rows.iter().enumerate() {
        let error = balance_error_mw(
            row.total_dispatched_mw(),
            row.residual_dispatch_mw,
            row.battery_mw,
            row.load_mw,
        );
        assert!(error.abs() <= tol(row.load_mw), "step {t}: imbalance {error} MW");
    }
}

#[test]
fn residual_load_equals_residual_dispatch() {
    let (_, table) = solved_table();
    for (t, row) in table.rows.iter().enumerate() {
        assert!(
            (row.residual_load_mw - row.residual_dispatch_mw).abs() <= tol(row.load_mw),
            "step {t}: residual load {} vs dispatch {}",
            row.residual_load_mw,
            row.residual_dispatch_mw
        );
    }
}

#[test]
fn curtailment_is_non_negative() {
    let (_, table) = solved_table();
    assert!(table.rows.iter().all(|r| r.curtailed_re_mw >= 0.0));
    // the noon surplus exceeds what the battery can absorb
    assert!(table.rows.iter().any(|r| r.curtailed_re_mw > 1.0));
}

#[test]
fn no_curtailment_while_renewables_fit_load_and_charging() {
    let scenario = mixed_scenario(LOAD_MWH);
    let profiles = sunny_day();
    let assignment = solve_ok(&scenario, &profiles);
    let table = extract_results(&scenario, &profiles, &assignment);

    for (t, row) in table.rows.iter().enumerate() {
        let sink = row.load_mw + assignment.charge_mw[t];
        if row.total_available_mw() <= sink {
            assert!(
                row.curtailed_re_mw <= tol(sink),
                "step {t}: {} MW curtailed with {} MW available and {} MW sink",
                row.curtailed_re_mw,
                row.total_available_mw(),
                sink
            );
        }
    }
}

#[test]
fn state_of_charge_is_cyclic_and_bounded() {
    let scenario = mixed_scenario(LOAD_MWH);
    let profiles = sunny_day();
    let a = solve_ok(&scenario, &profiles);
    let bat = scenario.battery;
    let capacity = bat.energy_capacity_mwh();
    let w = profiles.step_hours();
    let retention = (1.0 - bat.standing_loss).powf(w);
    let n = a.horizon();

    for t in 0..n {
        let prev = if t == 0 { n - 1 } else { t - 1 };
        let expected = a.soc_mwh[prev] * retention + w * bat.charge_efficiency * a.charge_mw[t]
            - w / bat.discharge_efficiency * a.discharge_mw[t];
        assert_close(a.soc_mwh[t], expected, &format!("soc at step {t}"));
        assert!(a.soc_mwh[t] >= -tol(capacity));
        assert!(a.soc_mwh[t] <= capacity + tol(capacity));
        assert!(a.charge_mw[t] <= bat.power_mw + tol(bat.power_mw));
        assert!(a.discharge_mw[t] <= bat.power_mw + tol(bat.power_mw));
    }

    // the battery is actually used
    assert!(a.discharge_mw.iter().sum::<f64>() > 1.0);
}

#[test]
fn residual_capacity_covers_dispatch_and_minimum() {
    let mut scenario = mixed_scenario(LOAD_MWH);
    scenario.residual.min_installed_mw = 5.0;
    let profiles = sunny_day();
    let a = solve_ok(&scenario, &profiles);

    assert!(a.residual_capacity_mw >= 5.0 - tol(5.0));
    for &r in &a.residual_dispatch_mw {
        assert!(r >= -tol(r));
        assert!(r <= a.residual_capacity_mw + tol(a.residual_capacity_mw));
    }
}

#[test]
fn battery_lowers_backup_capacity() {
    let profiles = sunny_day();

    let mut without = mixed_scenario(LOAD_MWH);
    without.battery.power_mw = 0.0;
    let bare = solve_ok(&without, &profiles);

    let with = solve_ok(&mixed_scenario(LOAD_MWH), &profiles);

    assert!(
        with.residual_capacity_mw + 1.0 < bare.residual_capacity_mw,
        "battery should shave the peak: {} MW vs {} MW",
        with.residual_capacity_mw,
        bare.residual_capacity_mw
    );
}

#[test]
fn summary_matches_table() {
    let (scenario, table) = solved_table();
    let summary = Summary::from_table(&table, scenario.battery.energy_capacity_mwh());

    // with a positive capital cost the capacity is exactly the peak residual load
    assert_close(
        summary.backup_capacity_mw,
        summary.optimized_capacity_mw,
        "backup capacity",
    );
    assert_close(summary.load_energy_mwh, LOAD_MWH, "load energy");

    let backup: f64 = table.rows.iter().map(|r| r.residual_dispatch_mw).sum();
    assert!((summary.backup_energy_mwh - backup).abs() <= tol(LOAD_MWH) * table.len() as f64);
    assert!(summary.total_cost > 0.0);
}

#[test]
fn reported_cost_matches_objective_terms() {
    let scenario = mixed_scenario(LOAD_MWH);
    let profiles = sunny_day();
    let a = solve_ok(&scenario, &profiles);

    let renewable: f64 = a.dispatch.iter().flatten().sum();
    let residual: f64 = a.residual_dispatch_mw.iter().sum();
    let expected = scenario.residual.capital_cost * a.residual_capacity_mw
        + scenario.residual.marginal_cost * residual
        + scenario.tie_break_cost * renewable;
    assert_close(a.objective, expected, "objective");
}

#[test]
fn identical_inputs_give_identical_dispatch() {
    let scenario = mixed_scenario(LOAD_MWH);
    let profiles = sunny_day();
    assert_eq!(solve_ok(&scenario, &profiles), solve_ok(&scenario, &profiles));
}
