//! Simulator entry point: CLI wiring and config-driven runs.

mod cli;

use std::path::Path;
use std::process;

use ev_recycling_sim::config::ScenarioConfig;
use ev_recycling_sim::error::SimError;
use ev_recycling_sim::io::export::export_csv;
use ev_recycling_sim::sim::runner::run_scenario;
use ev_recycling_sim::sim::summary::{DemandReduction, RunSummary};

use cli::CliOptions;

/// Loads the scenario: `--scenario` first, then `--preset`, then baseline.
fn load_scenario(cli: &CliOptions) -> Result<ScenarioConfig, SimError> {
    let mut scenario = match (&cli.scenario, &cli.preset) {
        (Some(path), _) => ScenarioConfig::from_toml_file(path)?,
        (None, Some(name)) => ScenarioConfig::from_preset(name)?,
        (None, None) => ScenarioConfig::baseline(),
    };
    apply_overrides(cli, &mut scenario);
    Ok(scenario)
}

fn apply_overrides(cli: &CliOptions, scenario: &mut ScenarioConfig) {
    if let Some(seed) = cli.seed {
        scenario.simulation.seed = seed;
    }
    if let Some(end_year) = cli.end_year {
        scenario.simulation.end_year = end_year;
    }
}

/// Reruns `scenario` with the recycling settings of the `--compare` preset
/// and reports final-year demand reduction against it.
fn compare_against(
    scenario: &ScenarioConfig,
    summary: &RunSummary,
    name: &str,
) -> Result<DemandReduction, SimError> {
    let counterfactual = scenario.with_preset_recycling(name)?;
    let other = run_scenario(&counterfactual)?;
    DemandReduction::between(summary, &RunSummary::from_records(&other.records))
}

fn main() {
    env_logger::init();

    let cli = match cli::parse_args() {
        Ok(cli) => cli,
        Err(e) => {
            eprintln!("error: {e}");
            cli::print_help();
            process::exit(1);
        }
    };
    if cli.help {
        cli::print_help();
        return;
    }

    let run = load_scenario(&cli).and_then(|s| run_scenario(&s).map(|outcome| (s, outcome)));
    let (scenario, outcome) = match run {
        Ok(run) => run,
        Err(e) => {
            eprintln!("{e}");
            process::exit(1);
        }
    };

    for r in &outcome.records {
        println!("{r}");
    }

    let summary = RunSummary::from_records(&outcome.records);
    println!("\n{summary}");

    if let Some(ref name) = cli.compare {
        match compare_against(&scenario, &summary, name) {
            Ok(reduction) => println!("\n{reduction}"),
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        }
    }

    if let Some(ref path) = cli.records_out {
        if let Err(e) = export_csv(&outcome.records, Path::new(path)) {
            eprintln!("error: failed to write CSV: {e}");
            process::exit(1);
        }
        eprintln!("Records written to {}", path.display());
    }
}
