//! Microgrid results entry point: CLI wiring and config-driven assessment.

use std::path::Path;
use std::process;

use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use microgrid_results::cli::{CliOptions, parse_args, print_usage};
use microgrid_results::config::AssessmentConfig;
use microgrid_results::error::AssessmentError;
use microgrid_results::io::export::export_csv;
use microgrid_results::runner::{Assessment, assess, load_catalog};

fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("warning: logging unavailable: {e}");
    }
}

fn load_config(cli: &CliOptions) -> Result<AssessmentConfig, String> {
    let mut cfg = match (&cli.config, &cli.preset) {
        (Some(path), _) => AssessmentConfig::from_toml_file(path),
        (None, Some(name)) => AssessmentConfig::from_preset(name),
        (None, None) => Ok(AssessmentConfig::default()),
    }
    .map_err(|e| e.to_string())?;

    if let Some(cities) = &cli.cities {
        cfg.location.cities_csv = Some(cities.clone());
    }
    Ok(cfg)
}

fn print_assessment(assessment: &Assessment) {
    println!("Facility: {}", assessment.facility_name);
    if let Some(loc) = &assessment.location {
        let city = loc
            .nearest_city
            .as_ref()
            .map_or("none within range", |c| c.name.as_str());
        println!(
            "Location: tier {}{} (nearest city: {city}), ~{} inhabitants served",
            loc.irradiation_tier,
            if loc.tier_inferred { " inferred" } else { "" },
            loc.estimated_population
        );
    }
    println!("\n{}", assessment.results);
}

fn main() {
    let cli = match parse_args() {
        Ok(cli) => cli,
        Err(e) => {
            eprintln!("error: {e}");
            print_usage();
            process::exit(2);
        }
    };
    if cli.help {
        print_usage();
        return;
    }

    init_logging(cli.verbose);

    let cfg = load_config(&cli).unwrap_or_else(|e| {
        eprintln!("{e}");
        process::exit(1);
    });

    let catalog = load_catalog(&cfg.location).unwrap_or_else(|e| {
        eprintln!("error: {e}");
        process::exit(1);
    });

    let assessment = match assess(&cfg, catalog.as_ref()) {
        Ok(a) => a,
        Err(e) => {
            eprintln!("error: {e}");
            if let AssessmentError::Invalid(errors) = &e {
                for err in errors {
                    eprintln!("  {err}");
                }
            }
            process::exit(1);
        }
    };

    if cli.json {
        match serde_json::to_string_pretty(&assessment) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("error: failed to serialize results: {e}");
                process::exit(1);
            }
        }
    } else {
        print_assessment(&assessment);
    }

    if let Some(path) = &cli.csv_out {
        if let Err(e) = export_csv(&assessment.results, Path::new(path)) {
            eprintln!("error: failed to write CSV: {e}");
            process::exit(1);
        }
        eprintln!("Results written to {}", path.display());
    }
}
