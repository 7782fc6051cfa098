//! Crate-level error type.

use thiserror::Error;

use crate::config::ConfigError;

#[derive(Debug, Error)]
pub enum SimError {
    /// Scenario could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Scenario loaded but failed validation; carries every violation.
    #[error("invalid scenario:\n{}", join_lines(.0))]
    InvalidConfig(Vec<ConfigError>),
    /// Two runs compared for demand reduction end in different years.
    #[error("cannot compare runs ending in {run} and {counterfactual}")]
    YearMismatch { run: i32, counterfactual: i32 },
}

fn join_lines(errors: &[ConfigError]) -> String {
    errors
        .iter()
        .map(|e| format!("  {e}"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScenarioConfig;

    #[test]
    fn invalid_config_lists_every_field() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.simulation.end_year = 2000;
        cfg.battery.lithium_kg = 0.0;
        let msg = SimError::InvalidConfig(cfg.validate()).to_string();
        assert!(msg.contains("simulation.end_year"));
        assert!(msg.contains("battery.lithium_kg"));
    }
}
