use std::env;
use std::path::PathBuf;

/// Parsed command-line options.
#[derive(Debug, Default)]
pub struct CliOptions {
    pub config: Option<PathBuf>,
    pub preset: Option<String>,
    /// Overrides `location.cities_csv` from the config.
    pub cities: Option<PathBuf>,
    pub csv_out: Option<PathBuf>,
    pub json: bool,
    pub verbose: bool,
    pub help: bool,
}

pub fn parse_args() -> Result<CliOptions, String> {
    let args: Vec<String> = env::args().skip(1).collect();
    parse_args_from(&args)
}

/// Parses arguments without the program name.
///
/// Without `--config` or `--preset`, the `default` preset is selected.
///
/// # Errors
///
/// Returns a message for unknown flags, missing values, repeated options,
/// or when both `--config` and `--preset` are given.
pub fn parse_args_from(args: &[String]) -> Result<CliOptions, String> {
    let mut opts = CliOptions::default();
    let mut i = 0usize;

    while i < args.len() {
        match args[i].as_str() {
            "--config" => {
                i += 1;
                let path =
                    args.next_or_err(i, "missing value for --config (expected a TOML file path)")?;
                if opts.config.replace(PathBuf::from(path)).is_some() {
                    return Err("--config provided more than once".to_string());
                }
            }
            "--preset" => {
                i += 1;
                let name =
                    args.next_or_err(i, "missing value for --preset (expected a preset name)")?;
                if opts.preset.replace(name.to_string()).is_some() {
                    return Err("--preset provided more than once".to_string());
                }
            }
            "--cities" => {
                i += 1;
                let path =
                    args.next_or_err(i, "missing value for --cities (expected a CSV file path)")?;
                if opts.cities.replace(PathBuf::from(path)).is_some() {
                    return Err("--cities provided more than once".to_string());
                }
            }
            "--csv-out" => {
                i += 1;
                let path =
                    args.next_or_err(i, "missing value for --csv-out (expected a file path)")?;
                if opts.csv_out.replace(PathBuf::from(path)).is_some() {
                    return Err("--csv-out provided more than once".to_string());
                }
            }
            "--json" => opts.json = true,
            "--verbose" | "-v" => opts.verbose = true,
            "--help" | "-h" => opts.help = true,
            other => return Err(format!("unknown argument: {other}")),
        }
        i += 1;
    }

    if opts.config.is_some() && opts.preset.is_some() {
        return Err(
            "arguments `--config` and `--preset` are mutually exclusive; choose one source"
                .to_string(),
        );
    }

    if opts.config.is_none() && opts.preset.is_none() {
        opts.preset = Some("default".to_string());
    }

    Ok(opts)
}

trait SliceArgExt {
    fn next_or_err(&self, index: usize, err: &str) -> Result<&str, String>;
}

impl SliceArgExt for [String] {
    fn next_or_err(&self, index: usize, err: &str) -> Result<&str, String> {
        self.get(index)
            .map(String::as_str)
            .ok_or_else(|| err.to_string())
    }
}

pub fn print_usage() {
    eprintln!("microgrid-results: solar-plus-battery sizing for healthcare facilities");
    eprintln!();
    eprintln!("Usage: microgrid-results [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --config <path>     Load assessment from TOML config file");
    eprintln!("  --preset <name>     Use a built-in preset");
    eprintln!("                      (default, chu, rural_center, existing_pv)");
    eprintln!("  --cities <path>     City catalog CSV (name,latitude,longitude,tier)");
    eprintln!("  --csv-out <path>    Export results to CSV");
    eprintln!("  --json              Print results as JSON instead of a report");
    eprintln!("  --verbose, -v       Log pipeline stages at debug level");
    eprintln!("  --help, -h          Show this help message");
}
