use std::path::PathBuf;

/// Parsed CLI arguments.
#[derive(Debug, Default)]
pub struct CliOptions {
    pub scenario: Option<PathBuf>,
    pub preset: Option<String>,
    pub seed: Option<u64>,
    pub end_year: Option<i32>,
    pub records_out: Option<PathBuf>,
    pub compare: Option<String>,
    pub help: bool,
}

pub fn parse_args() -> Result<CliOptions, String> {
    parse_args_from(std::env::args().skip(1))
}

pub fn parse_args_from(args: impl IntoIterator<Item = String>) -> Result<CliOptions, String> {
    let mut args = args.into_iter();
    let mut opts = CliOptions::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--help" | "-h" => opts.help = true,
            "--scenario" => {
                let path = value(&mut args, "--scenario", "a TOML file path")?;
                if opts.scenario.replace(PathBuf::from(path)).is_some() {
                    return Err("--scenario provided more than once".to_string());
                }
            }
            "--preset" => {
                let name = value(&mut args, "--preset", "a preset name")?;
                if opts.preset.replace(name).is_some() {
                    return Err("--preset provided more than once".to_string());
                }
            }
            "--seed" => {
                let raw = value(&mut args, "--seed", "a u64")?;
                let seed = raw
                    .parse::<u64>()
                    .map_err(|_| format!("--seed value \"{raw}\" is not a valid u64"))?;
                opts.seed = Some(seed);
            }
            "--end-year" => {
                let raw = value(&mut args, "--end-year", "a year")?;
                let year = raw
                    .parse::<i32>()
                    .map_err(|_| format!("--end-year value \"{raw}\" is not a valid year"))?;
                opts.end_year = Some(year);
            }
            "--records-out" => {
                let path = value(&mut args, "--records-out", "a file path")?;
                opts.records_out = Some(PathBuf::from(path));
            }
            "--compare" => {
                opts.compare = Some(value(&mut args, "--compare", "a preset name")?);
            }
            other => return Err(format!("unknown argument \"{other}\"")),
        }
    }

    if opts.scenario.is_some() && opts.preset.is_some() {
        return Err(
            "arguments `--scenario` and `--preset` are mutually exclusive; choose one source"
                .to_string(),
        );
    }

    Ok(opts)
}

fn value(args: &mut impl Iterator<Item = String>, flag: &str, expected: &str) -> Result<String, String> {
    args.next()
        .ok_or_else(|| format!("missing value for {flag} (expected {expected})"))
}

pub fn print_help() {
    eprintln!("ev-recycling-sim — EV battery material-flow simulator");
    eprintln!();
    eprintln!("Usage: ev-recycling-sim [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --scenario <path>      Load scenario from TOML config file");
    eprintln!("  --preset <name>        Use a built-in preset (baseline, no_recycling, high_efficiency)");
    eprintln!("  --seed <u64>           Override random seed");
    eprintln!("  --end-year <year>      Override the last simulated year");
    eprintln!("  --records-out <path>   Export year records to CSV");
    eprintln!("  --compare <preset>     Report demand reduction against another preset");
    eprintln!("  --help                 Show this help message");
    eprintln!();
    eprintln!("If no --scenario or --preset is given, the baseline preset is used.");
    eprintln!("Set RUST_LOG=info (or debug) for progress output.");
}
