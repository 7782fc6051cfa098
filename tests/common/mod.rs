//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use ev_recycling_sim::config::ScenarioConfig;
use ev_recycling_sim::sim::runner::{RunOutcome, run_scenario};

/// Baseline scenario over `2024..=end_year`.
pub fn baseline_until(end_year: i32) -> ScenarioConfig {
    let mut cfg = ScenarioConfig::baseline();
    cfg.simulation.end_year = end_year;
    cfg
}

/// Baseline scenario with a mixed-age fleet, so end-of-life events start
/// in the first year.
pub fn mixed_fleet_until(end_year: i32) -> ScenarioConfig {
    let mut cfg = baseline_until(end_year);
    cfg.population.randomize_initial_battery_age = true;
    cfg
}

/// Runs a scenario that is expected to be valid.
pub fn run(cfg: &ScenarioConfig) -> RunOutcome {
    run_scenario(cfg).expect("scenario should be valid")
}

/// Asserts `a` and `b` agree to within a relative tolerance.
pub fn assert_close(a: f64, b: f64, what: &str) {
    let tol = 1e-9 * a.abs().max(b.abs()).max(1.0);
    assert!((a - b).abs() <= tol, "{what}: {a} != {b}");
}
