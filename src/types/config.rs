//! Configuration structures for the occupancy simulator
//!
//! This module contains the simulation configuration structure and validation logic
//! used to control the study design and the generating coefficients.

use super::OutputFormat;
use crate::model::ModelCoefficients;
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::fs;
use std::mem;
use std::path::Path;

/// Design and coefficients of the worked closure example
pub mod worked_example {
    /// Number of sampling units
    pub const N_PT: usize = 200;

    /// Number of repeat events per unit
    pub const N_REP: usize = 4;

    /// Occupancy intercept
    pub const ALPHA_OCC: f64 = 0.0;

    /// Occupancy slope on the unit covariate
    pub const BETA_OCC: f64 = 1.0;

    /// Detection intercept
    pub const ALPHA_DET: f64 = -1.0;

    /// Detection slope on the unit covariate
    pub const BETA_DET_1: f64 = -1.0;

    /// Detection slope on the event covariate
    pub const BETA_DET_2: f64 = 0.5;
}

/// Command line arguments structure
#[derive(Debug, Clone, Parser)]
#[command(
    name = "occupancy-sim",
    version = "0.1.0",
    about = "Occupancy Closure Simulator - Generates synthetic detection/non-detection data",
    long_about = "Generates detection/non-detection data for a single-season, single-species occupancy model. Every sampling unit is closed across its repeat events and detections are impossible at unoccupied units.

EXAMPLES:
    # Run the worked example (200 units, 4 events each)
    occupancy-sim --seed 42

    # Use a configuration file
    occupancy-sim --config design.json

    # Override specific settings
    occupancy-sim --n-pt 1000 --n-rep 6 --beta-occ=-0.5

    # Write the observation table as CSV plus the latent truth
    occupancy-sim --output-format csv --output obs.csv --truth-output truth.jsonl

    # Refit the model and compare estimates against the truth
    occupancy-sim --n-pt 2000 --seed 7 --fit

    # Generate configuration template
    occupancy-sim --print-config > design.json

CONFIGURATION:
    Configuration can be provided via:
    1. Command line arguments (highest priority)
    2. Configuration file (--config flag)
    3. Default values (lowest priority)

    Supported configuration file formats: JSON (.json)"
)]
pub struct CliArgs {
    /// Configuration file path (JSON format)
    #[arg(
        short,
        long,
        help = "Configuration file path (JSON format)",
        long_help = "Path to a JSON configuration file. CLI arguments will override file settings."
    )]
    pub config: Option<String>,

    /// Number of sampling units
    #[arg(
        long,
        help = "Number of sampling units",
        long_help = "Number of spatial sampling units surveyed repeatedly. Must be greater than 0. Default: 200"
    )]
    pub n_pt: Option<usize>,

    /// Number of repeat events per unit
    #[arg(
        long,
        help = "Number of repeat events per unit",
        long_help = "Number of repeat sampling events at every unit. Must be greater than 0. Default: 4"
    )]
    pub n_rep: Option<usize>,

    /// Occupancy intercept
    #[arg(long, allow_negative_numbers = true, help = "Occupancy intercept")]
    pub alpha_occ: Option<f64>,

    /// Occupancy slope on the unit covariate
    #[arg(long, allow_negative_numbers = true, help = "Occupancy slope on the unit covariate")]
    pub beta_occ: Option<f64>,

    /// Detection intercept
    #[arg(long, allow_negative_numbers = true, help = "Detection intercept")]
    pub alpha_det: Option<f64>,

    /// Detection slope on the unit covariate
    #[arg(long = "beta-det-1", allow_negative_numbers = true, help = "Detection slope on the unit covariate")]
    pub beta_det_1: Option<f64>,

    /// Detection slope on the event covariate
    #[arg(long = "beta-det-2", allow_negative_numbers = true, help = "Detection slope on the event covariate")]
    pub beta_det_2: Option<f64>,

    /// Output format for the observation table
    #[arg(
        long,
        help = "Output format (json or csv)",
        long_help = "Output format for the observation table handed to a fitting routine. Supported formats: json, csv. Default: json"
    )]
    pub output_format: Option<String>,

    /// Output path for the observation table
    #[arg(long, help = "Output path for the observation table (stdout if omitted)")]
    pub output: Option<String>,

    /// Output path for the latent occupancy answer key
    #[arg(long, help = "Output path for the latent occupancy JSONL file")]
    pub truth_output: Option<String>,

    /// Random seed for reproducible results
    #[arg(long, help = "Random seed for reproducible results")]
    pub seed: Option<u64>,

    /// Refit the model with the maximum-likelihood fitter
    #[arg(long, help = "Refit the model and report parameter recovery")]
    pub fit: bool,

    /// Enable verbose logging
    #[arg(short, long, help = "Enable verbose logging")]
    pub verbose: bool,

    /// Enable debug logging
    #[arg(short, long, help = "Enable debug logging")]
    pub debug: bool,

    /// Dry run mode - validate configuration without generating data
    #[arg(long, help = "Validate configuration without generating data")]
    pub dry_run: bool,

    /// Print default configuration and exit
    #[arg(long, help = "Print default configuration in JSON format and exit")]
    pub print_config: bool,
}

/// Configuration file structure (allows partial configuration)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConfigFile {
    /// Number of sampling units
    pub n_pt: Option<usize>,

    /// Number of repeat events per unit
    pub n_rep: Option<usize>,

    /// Occupancy intercept
    pub alpha_occ: Option<f64>,

    /// Occupancy slope on the unit covariate
    pub beta_occ: Option<f64>,

    /// Detection intercept
    pub alpha_det: Option<f64>,

    /// Detection slope on the unit covariate
    pub beta_det_1: Option<f64>,

    /// Detection slope on the event covariate
    pub beta_det_2: Option<f64>,

    /// Output format for the observation table
    pub output_format: Option<String>,

    /// Output path for the observation table
    pub output: Option<String>,

    /// Output path for the latent occupancy answer key
    pub truth_output: Option<String>,

    /// Random seed for reproducible results
    pub seed: Option<u64>,

    /// Refit the model after generation
    pub fit: Option<bool>,
}

/// Configuration for one occupancy simulation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Number of sampling units
    pub n_pt: usize,

    /// Number of repeat events per unit
    pub n_rep: usize,

    /// Occupancy intercept
    pub alpha_occ: f64,

    /// Occupancy slope on the unit covariate
    pub beta_occ: f64,

    /// Detection intercept
    pub alpha_det: f64,

    /// Detection slope on the unit covariate
    pub beta_det_1: f64,

    /// Detection slope on the event covariate
    pub beta_det_2: f64,

    /// Output format for the observation table
    pub output_format: String,

    /// Output path for the observation table (stdout when absent)
    pub output: Option<String>,

    /// Output path for the latent occupancy answer key
    pub truth_output: Option<String>,

    /// Random seed for reproducible results
    pub seed: Option<u64>,

    /// Refit the model after generation
    pub fit: bool,
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Configuration file not found
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    /// Configuration file read error
    #[error("Failed to read configuration file: {0}")]
    ReadError(#[from] std::io::Error),

    /// JSON parsing error
    #[error("Failed to parse JSON configuration: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Unsupported configuration file format
    #[error("Unsupported configuration file format: {0} (supported: .json)")]
    UnsupportedFormat(String),
}

/// Validation errors for simulation configuration and supplied covariates
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigValidationError {
    /// Unit count is invalid
    #[error("Number of sampling units must be greater than 0, got {0}")]
    InvalidUnitCount(usize),

    /// Event count is invalid
    #[error("Number of repeat events must be greater than 0, got {0}")]
    InvalidEventCount(usize),

    /// The design has more unit-event pairs than one table can hold
    #[error("Design of {n_pt} units x {n_rep} events is too large")]
    DesignTooLarge {
        /// Requested number of units
        n_pt: usize,
        /// Requested number of events per unit
        n_rep: usize,
    },

    /// A coefficient is NaN or infinite
    #[error("Coefficient {field} must be finite, got {value}")]
    NonFiniteCoefficient {
        /// Name of the offending coefficient
        field: String,
        /// The non-finite value
        value: f64,
    },

    /// A supplied covariate value is NaN or infinite
    #[error("Covariate {name} must be finite at position {index}, got {value}")]
    NonFiniteCovariate {
        /// Name of the covariate
        name: String,
        /// Flat (row-major) position of the value
        index: usize,
        /// The non-finite value
        value: f64,
    },

    /// A supplied covariate does not match the study design
    #[error("Covariate {name} has shape {actual}, expected {expected}")]
    CovariateShape {
        /// Name of the covariate
        name: String,
        /// Shape implied by the configuration
        expected: String,
        /// Shape that was supplied
        actual: String,
    },

    /// Output format is not recognised
    #[error("Unknown output format: {0}")]
    InvalidOutputFormat(String),
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            n_pt: worked_example::N_PT,
            n_rep: worked_example::N_REP,
            alpha_occ: worked_example::ALPHA_OCC,
            beta_occ: worked_example::BETA_OCC,
            alpha_det: worked_example::ALPHA_DET,
            beta_det_1: worked_example::BETA_DET_1,
            beta_det_2: worked_example::BETA_DET_2,
            output_format: "json".to_string(),
            output: None,
            truth_output: None,
            seed: None,
            fit: false,
        }
    }
}

impl SimulationConfig {
    /// Create a new configuration from command line arguments and optional config file
    pub fn from_args() -> Result<Self, ConfigError> {
        let args = CliArgs::parse();
        Self::from_cli_args(args)
    }

    /// Create configuration from parsed CLI arguments
    pub fn from_cli_args(args: CliArgs) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(config_path) = &args.config {
            config = Self::from_file(config_path)?;
        }

        // CLI takes precedence over the file
        Self::apply_cli_overrides(&mut config, args);

        Ok(config)
    }

    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }

        let content = fs::read_to_string(path)?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => {
                let config_file: ConfigFile = serde_json::from_str(&content)?;
                Ok(Self::from_config_file(config_file))
            }
            Some(ext) => Err(ConfigError::UnsupportedFormat(ext.to_string())),
            None => Err(ConfigError::UnsupportedFormat("no extension".to_string())),
        }
    }

    /// Create configuration from a config file, merging with defaults
    fn from_config_file(config_file: ConfigFile) -> Self {
        let defaults = Self::default();

        Self {
            n_pt: config_file.n_pt.unwrap_or(defaults.n_pt),
            n_rep: config_file.n_rep.unwrap_or(defaults.n_rep),
            alpha_occ: config_file.alpha_occ.unwrap_or(defaults.alpha_occ),
            beta_occ: config_file.beta_occ.unwrap_or(defaults.beta_occ),
            alpha_det: config_file.alpha_det.unwrap_or(defaults.alpha_det),
            beta_det_1: config_file.beta_det_1.unwrap_or(defaults.beta_det_1),
            beta_det_2: config_file.beta_det_2.unwrap_or(defaults.beta_det_2),
            output_format: config_file.output_format.unwrap_or(defaults.output_format),
            output: config_file.output.or(defaults.output),
            truth_output: config_file.truth_output.or(defaults.truth_output),
            seed: config_file.seed.or(defaults.seed),
            fit: config_file.fit.unwrap_or(defaults.fit),
        }
    }

    /// Apply CLI argument overrides to configuration
    fn apply_cli_overrides(config: &mut Self, args: CliArgs) {
        if let Some(value) = args.n_pt {
            config.n_pt = value;
        }
        if let Some(value) = args.n_rep {
            config.n_rep = value;
        }
        if let Some(value) = args.alpha_occ {
            config.alpha_occ = value;
        }
        if let Some(value) = args.beta_occ {
            config.beta_occ = value;
        }
        if let Some(value) = args.alpha_det {
            config.alpha_det = value;
        }
        if let Some(value) = args.beta_det_1 {
            config.beta_det_1 = value;
        }
        if let Some(value) = args.beta_det_2 {
            config.beta_det_2 = value;
        }
        if let Some(value) = args.output_format {
            config.output_format = value;
        }
        if let Some(value) = args.output {
            config.output = Some(value);
        }
        if let Some(value) = args.truth_output {
            config.truth_output = Some(value);
        }
        if let Some(value) = args.seed {
            config.seed = Some(value);
        }

        // A flag can only switch fitting on
        if args.fit {
            config.fit = true;
        }
    }

    /// Print configuration as JSON
    pub fn print_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Validate the configuration parameters
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.n_pt == 0 {
            return Err(ConfigValidationError::InvalidUnitCount(self.n_pt));
        }

        if self.n_rep == 0 {
            return Err(ConfigValidationError::InvalidEventCount(self.n_rep));
        }

        // Every n_pt x n_rep table must be addressable as one allocation
        let fits = self
            .n_pt
            .checked_mul(self.n_rep)
            .and_then(|cells| cells.checked_mul(mem::size_of::<f64>()))
            .is_some_and(|bytes| bytes <= isize::MAX as usize);
        if !fits {
            return Err(ConfigValidationError::DesignTooLarge { n_pt: self.n_pt, n_rep: self.n_rep });
        }

        if let Some((field, value)) = self.coefficients().first_non_finite() {
            return Err(ConfigValidationError::NonFiniteCoefficient {
                field: field.to_string(),
                value,
            });
        }

        self.get_output_format()?;

        Ok(())
    }

    /// Get the generating coefficients
    pub fn coefficients(&self) -> ModelCoefficients {
        ModelCoefficients {
            alpha_occ: self.alpha_occ,
            beta_occ: self.beta_occ,
            alpha_det: self.alpha_det,
            beta_det_1: self.beta_det_1,
            beta_det_2: self.beta_det_2,
        }
    }

    /// Get the study design as `(n_pt, n_rep)`
    pub fn design(&self) -> (usize, usize) {
        (self.n_pt, self.n_rep)
    }

    /// Total number of unit-event pairs in the design
    ///
    /// Saturates at `usize::MAX`; [`validate`](Self::validate) rejects such designs.
    pub fn total_events(&self) -> usize {
        self.n_pt.saturating_mul(self.n_rep)
    }

    /// Get the output format as an enum value
    pub fn get_output_format(&self) -> Result<OutputFormat, ConfigValidationError> {
        self.output_format
            .parse::<OutputFormat>()
            .map_err(|_| ConfigValidationError::InvalidOutputFormat(self.output_format.clone()))
    }
}
