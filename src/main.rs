//! residual-mix entry point: CLI wiring and config-driven model construction.

use std::process::ExitCode;

use anyhow::{Context, bail};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use residual_mix::config::{ScenarioConfig, horizon_hours};
use residual_mix::io::export::export_csv;
use residual_mix::kpi::Summary;
use residual_mix::model::build_model;
use residual_mix::optimizer::solve;
use residual_mix::results::extract_results;

mod cli;

use cli::CliArgs;

fn init_tracing(verbose: bool) {
    let default = if verbose { "residual_mix=debug" } else { "residual_mix=info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .with_writer(std::io::stderr)
        .init();
}

/// Loads the configuration: --scenario takes priority, then --preset, then baseline.
fn load_config(cli: &CliArgs) -> anyhow::Result<ScenarioConfig> {
    let mut cfg = if let Some(path) = &cli.scenario {
        ScenarioConfig::from_toml_file(path)?
    } else if let Some(name) = &cli.preset {
        ScenarioConfig::from_preset(name)?
    } else {
        ScenarioConfig::baseline()
    };
    cli.apply_overrides(&mut cfg);

    let errors = cfg.validate();
    if !errors.is_empty() {
        for e in &errors {
            error!(field = %e.field, "{}", e.message);
        }
        bail!("{} invalid configuration field(s)", errors.len());
    }
    Ok(cfg)
}

fn run(cli: &CliArgs) -> anyhow::Result<ExitCode> {
    let cfg = load_config(cli)?;

    let profiles = cfg.load_profiles()?;
    info!(
        steps = profiles.len(),
        step_hours = profiles.step_hours(),
        source = if cfg.profiles.csv.is_some() { "csv" } else { "synthetic" },
        "profiles loaded"
    );

    let scenario = cfg.to_scenario(horizon_hours(&profiles));
    let model = build_model(&scenario, &profiles).context("cannot build the energy balance model")?;

    let outcome = solve(model, cfg.solver.backend);
    let status = outcome.status();
    let Some(assignment) = outcome.into_assignment() else {
        error!(%status, "no optimal dispatch, nothing to report");
        return Ok(ExitCode::FAILURE);
    };

    let table = extract_results(&scenario, &profiles, &assignment);
    let summary = Summary::from_table(&table, scenario.battery.energy_capacity_mwh());
    println!("{summary}");

    if let Some(path) = &cli.results_out {
        export_csv(&table, path)
            .with_context(|| format!("failed to write results to \"{}\"", path.display()))?;
        info!(path = %path.display(), rows = table.len(), "results written");
    }

    Ok(ExitCode::SUCCESS)
}

fn main() -> ExitCode {
    let cli = CliArgs::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(code) => code,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}
