// Occupancy Closure Simulator - Main Entry Point
//
// You can run it via Cargo:
//
// ```console
// $ cargo build --release
// $ ./target/release/occupancy-sim --seed 42
// ```
//
// Or with a custom design and a refit:
//
// ```console
// $ ./target/release/occupancy-sim --n-pt 2000 --n-rep 6 --fit --output obs.csv --output-format csv
// ```

use anyhow::Context;
use clap::Parser;
use occupancy_closure_sim::data::export;
use occupancy_closure_sim::fitting::{FittingInput, MaximumLikelihoodFitter, OccupancyFitter};
use occupancy_closure_sim::perf_span;
use occupancy_closure_sim::random::RandomSource;
use occupancy_closure_sim::simulation::{
    fit_dataset, DatasetStatistics, LoggingConfig, OccupancyDataGenerator, SimulationError,
};
use occupancy_closure_sim::types::config::CliArgs;
use occupancy_closure_sim::types::{OutputFormat, SimulationConfig};
use occupancy_closure_sim::SimulatedDataset;
use std::io;
use std::process;
use tracing::{error, info};

fn main() {
    // Parse CLI arguments first to check for special flags
    let args = CliArgs::parse();

    // Handle special CLI flags that don't require full initialization
    if args.print_config {
        match SimulationConfig::default().print_json() {
            Ok(json) => {
                println!("{}", json);
                return;
            }
            Err(e) => {
                eprintln!("Failed to serialize default configuration: {}", e);
                process::exit(1);
            }
        }
    }

    // Initialize logging based on CLI flags
    let logging_result = if args.debug {
        LoggingConfig::init_debug()
    } else if args.verbose {
        LoggingConfig::init_verbose()
    } else {
        LoggingConfig::new().with_level(tracing::Level::WARN).init()
    };

    if let Err(e) = logging_result {
        eprintln!("Failed to initialize logging: {}", e);
        process::exit(1);
    }

    info!("Starting Occupancy Closure Simulator");

    // Load configuration from CLI arguments and optional config file
    let config = match SimulationConfig::from_cli_args(args.clone()) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            eprintln!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = config.validate() {
        error!("Configuration validation failed: {}", e);
        eprintln!("Configuration validation failed: {}", e);
        process::exit(1);
    }

    info!("Configuration loaded and validated successfully");

    if args.dry_run {
        eprintln!("Configuration validation successful!");
        eprintln!("Dry run mode - simulation will not be executed.");
        print_configuration_summary(&config);
        return;
    }

    print_startup_banner(&config);

    if let Err(e) = run(config) {
        match e.downcast_ref::<SimulationError>() {
            Some(simulation_error) => simulation_error.log(),
            None => error!("Simulation failed: {:#}", e),
        }
        eprintln!("Simulation failed: {:#}", e);
        process::exit(1);
    }

    info!("Occupancy Closure Simulator completed successfully");
}

/// Generate, export and optionally refit one dataset
fn run(config: SimulationConfig) -> anyhow::Result<()> {
    let format = config.get_output_format()?;
    let generator = OccupancyDataGenerator::new(config.clone())?;
    let mut source = RandomSource::from_optional_seed(config.seed);

    let dataset = {
        let _span = perf_span!("generate_dataset", n_pt = config.n_pt, n_rep = config.n_rep).entered();
        generator.generate(&mut source)?
    };

    write_outputs(&config, format, &dataset)?;

    let stats = DatasetStatistics::from_dataset(&dataset);
    eprintln!("{}", stats.summary_report());

    if config.fit {
        eprintln!("Fitting occupancy model...");
        let fitter = MaximumLikelihoodFitter::new();
        let summary = {
            let _span = perf_span!("fit_dataset", fitter = fitter.name()).entered();
            fit_dataset(&fitter, &dataset)?
        };
        eprintln!("{}", summary.recovery_report(&dataset.coefficients));
    }

    Ok(())
}

/// Write the observation table and, when requested, the answer key
fn write_outputs(
    config: &SimulationConfig,
    format: OutputFormat,
    dataset: &SimulatedDataset,
) -> anyhow::Result<()> {
    let input = FittingInput::from_dataset(dataset);

    match &config.output {
        Some(path) => {
            export::save_observations(&input, format, path)
                .with_context(|| format!("Failed to write observation table to '{}'", path))?;
            eprintln!("Observation table written to: {}", path);
        }
        None => {
            let stdout = io::stdout();
            export::write_observations(&input, format, stdout.lock())
                .context("Failed to write observation table to stdout")?;
        }
    }

    if let Some(path) = &config.truth_output {
        export::save_truth(dataset, path)
            .with_context(|| format!("Failed to write answer key to '{}'", path))?;
        eprintln!("Answer key written to: {}", path);
    }

    Ok(())
}

/// Print startup banner and configuration summary
fn print_startup_banner(config: &SimulationConfig) {
    eprintln!("Occupancy Closure Simulator");
    eprintln!("===========================");
    eprintln!("Synthetic detection/non-detection data under closure");
    eprintln!();

    print_configuration_summary(config);
}

/// Print configuration summary
fn print_configuration_summary(config: &SimulationConfig) {
    eprintln!("Configuration:");
    eprintln!("  Sampling Units: {}", config.n_pt);
    eprintln!("  Events per Unit: {}", config.n_rep);
    eprintln!(
        "  Occupancy: logit(psi) = {} + {} * pt_cov",
        config.alpha_occ, config.beta_occ
    );
    eprintln!(
        "  Detection: logit(theta) = {} + {} * pt_cov + {} * event_cov",
        config.alpha_det, config.beta_det_1, config.beta_det_2
    );
    eprintln!("  Output Format: {}", config.output_format);
    if let Some(seed) = config.seed {
        eprintln!("  Random Seed: {}", seed);
    }
    if config.fit {
        eprintln!("  Refit: maximum likelihood");
    }
    eprintln!();
}
