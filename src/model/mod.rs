pub mod builder;
/// Time-indexed profile series.
pub mod profile;
/// Scenario parameters and technology catalogue.
pub mod scenario;

pub use builder::{Model, ModelVariables, ObjectiveTerms, build_model};
pub use profile::{ProfilePoint, ProfileSeries};
pub use scenario::{BatteryParams, Capacities, ResidualParams, Scenario, Technology};
