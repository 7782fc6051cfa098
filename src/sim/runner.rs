//! Drives a [`SimulationState`] year by year to completion.

use log::{info, warn};

use crate::config::ScenarioConfig;
use crate::error::SimError;

use super::state::SimulationState;
use super::types::YearRecord;

/// Records produced by one run.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    /// One record per simulated year, in year order.
    pub records: Vec<YearRecord>,
    /// Number of years simulated.
    pub steps: usize,
    /// `true` if the step cap stopped the run before `end_year`.
    pub hit_step_cap: bool,
}

/// Year loop with a hard step cap.
#[derive(Debug, Clone)]
pub struct Runner {
    max_steps: usize,
    progress_interval: usize,
}

impl Runner {
    /// Creates a runner.
    ///
    /// # Arguments
    ///
    /// * `max_steps` - Maximum number of years to simulate
    /// * `progress_interval` - Log progress every this many years (0 disables)
    pub fn new(max_steps: usize, progress_interval: usize) -> Self {
        Self {
            max_steps,
            progress_interval,
        }
    }

    pub fn from_config(cfg: &ScenarioConfig) -> Self {
        Self::new(
            cfg.simulation.max_steps,
            cfg.simulation.progress_interval_years,
        )
    }

    /// Steps `state` until it stops running or the step cap is reached.
    ///
    /// Hitting the cap is not an error: the completed years are returned
    /// and `hit_step_cap` is set.
    pub fn run(&self, state: &mut SimulationState) -> RunOutcome {
        info!(
            "simulating {} to {}",
            state.current_year(),
            state.end_year()
        );

        let mut records = Vec::new();
        while records.len() < self.max_steps {
            if self.progress_interval > 0 && records.len() % self.progress_interval == 0 {
                info!("  simulating year {}...", state.current_year());
            }
            let Some(record) = state.step() else {
                break;
            };
            records.push(record);
        }

        let hit_step_cap = state.is_running();
        if hit_step_cap {
            warn!(
                "stopped after the maximum of {} steps at year {} (end year {})",
                self.max_steps,
                state.current_year(),
                state.end_year()
            );
        }
        info!("run complete: {} years", records.len());

        RunOutcome {
            steps: records.len(),
            records,
            hit_step_cap,
        }
    }
}

/// Builds a state from `cfg` and runs it to completion.
///
/// # Errors
///
/// Returns `SimError::InvalidConfig` if the scenario fails validation.
pub fn run_scenario(cfg: &ScenarioConfig) -> Result<RunOutcome, SimError> {
    let mut state = SimulationState::new(cfg)?;
    Ok(Runner::from_config(cfg).run(&mut state))
}
