use std::path::PathBuf;

use clap::Parser;
use clap::builder::PossibleValuesParser;
use residual_mix::config::ScenarioConfig;
use residual_mix::optimizer::Backend;
use tracing::warn;

/// Estimate residual (backup) power demand for a renewable build-out.
///
/// If no --scenario or --preset is given, the baseline preset is used.
#[derive(Debug, Parser)]
#[command(name = "residual-mix", version, about)]
pub struct CliArgs {
    /// Load scenario from TOML config file
    #[arg(long, value_name = "PATH", conflicts_with = "preset")]
    pub scenario: Option<PathBuf>,

    /// Use a built-in preset
    #[arg(
        long,
        value_name = "NAME",
        value_parser = PossibleValuesParser::new(ScenarioConfig::PRESETS.iter().copied())
    )]
    pub preset: Option<String>,

    /// Read profiles from a CSV table instead of generating them
    #[arg(long, value_name = "PATH")]
    pub profiles: Option<PathBuf>,

    /// Export the per-step result table to CSV
    #[arg(long, value_name = "PATH")]
    pub results_out: Option<PathBuf>,

    /// LP solver backend (microlp, highs)
    #[arg(long, value_name = "NAME")]
    pub backend: Option<Backend>,

    /// Override the synthetic profile seed
    #[arg(long)]
    pub seed: Option<u64>,

    /// Override the number of synthetic days
    #[arg(long)]
    pub days: Option<usize>,

    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long)]
    pub verbose: bool,
}

impl CliArgs {
    /// Synthetic-only flags that were given while a CSV source is configured.
    pub fn ignored_overrides(&self, cfg: &ScenarioConfig) -> Vec<&'static str> {
        if self.profiles.is_none() && cfg.profiles.csv.is_none() {
            return Vec::new();
        }
        let mut ignored = Vec::new();
        if self.seed.is_some() {
            ignored.push("--seed");
        }
        if self.days.is_some() {
            ignored.push("--days");
        }
        ignored
    }

    /// Applies command-line overrides on top of a loaded configuration.
    pub fn apply_overrides(&self, cfg: &mut ScenarioConfig) {
        for flag in self.ignored_overrides(cfg) {
            warn!(flag, "profiles are read from CSV, synthetic override has no effect");
        }
        if let Some(path) = &self.profiles {
            cfg.profiles.csv = Some(path.clone());
        }
        if let Some(backend) = self.backend {
            cfg.solver.backend = backend;
        }
        if let Some(seed) = self.seed {
            cfg.profiles.seed = seed;
        }
        if let Some(days) = self.days {
            cfg.profiles.days = days;
        }
    }
}
