//! Error types shared by the configuration layer and the model builder.

use thiserror::Error;

/// A single invalid field with its dotted path and the violated constraint.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("config error: {field}: {message}")]
pub struct ConfigError {
    /// Dotted field path (e.g., `"battery.charge_efficiency"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl ConfigError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Rejection raised by the model builder before any solver is invoked.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    /// The profile series has no time steps.
    #[error("profile series is empty, the model needs at least one time step")]
    EmptyHorizon,

    /// One or more scenario or profile fields violate their invariants.
    #[error("{} invalid field(s): {}", .0.len(), join_errors(.0))]
    InvalidFields(Vec<ConfigError>),
}

impl ConfigurationError {
    /// Returns the offending fields, empty for [`ConfigurationError::EmptyHorizon`].
    pub fn errors(&self) -> &[ConfigError] {
        match self {
            Self::EmptyHorizon => &[],
            Self::InvalidFields(errors) => errors,
        }
    }
}

fn join_errors(errors: &[ConfigError]) -> String {
    errors
        .iter()
        .map(|e| format!("{} ({})", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_lists_every_field() {
        let err = ConfigurationError::InvalidFields(vec![
            ConfigError::new("capacities.pv_mw", "must be >= 0"),
            ConfigError::new("battery.standing_loss", "must be in [0.0, 1.0)"),
        ]);
        let s = err.to_string();
        assert!(s.starts_with("2 invalid field(s)"));
        assert!(s.contains("capacities.pv_mw"));
        assert!(s.contains("battery.standing_loss"));
    }

    #[test]
    fn empty_horizon_has_no_field_errors() {
        assert!(ConfigurationError::EmptyHorizon.errors().is_empty());
    }
}
