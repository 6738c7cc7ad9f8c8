//! Single-bus energy balance model for estimating residual (backup) power demand
//! under a renewable build-out scenario.

pub mod config;
pub mod error;
/// CSV readers and writers for profile series and result tables.
pub mod io;
pub mod kpi;
/// Scenario inputs, profile series and the linear program builder.
pub mod model;
pub mod optimizer;
pub mod power_balance;
pub mod results;
/// Seeded synthetic profile generators.
pub mod synthetic;
