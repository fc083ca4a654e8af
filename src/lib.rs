//! Occupancy Closure Simulator
//!
//! Generates synthetic detection/non-detection data for a single-season,
//! single-species occupancy model so that model-fitting routines can be checked
//! against a known truth.
//!
//! # Overview
//!
//! Each sampling unit is either occupied or not for the whole season (closure)
//! and a unit that is not occupied can never yield a detection (no false
//! positives). Occupancy and detection probabilities follow logistic-linear
//! sub-models with one shared unit covariate and one event covariate.
//!
//! ## Key Features
//!
//! - **Seeded generation**: a fixed seed reproduces covariates, latent states and detections exactly
//! - **Pluggable randomness**: the generator draws through the [`random::DrawSource`] trait
//! - **Answer key**: latent occupancy and probabilities are exported separately from the observation table
//! - **Fitting seam**: datasets convert to a [`fitting::FittingInput`] for any [`fitting::OccupancyFitter`]
//! - **Reference fitter**: a maximum-likelihood fitter for parameter-recovery checks
//!
//! ## Quick Start
//!
//! ```rust
//! use occupancy_closure_sim::*;
//!
//! let config = SimulationConfig {
//!     n_pt: 100,
//!     seed: Some(42),
//!     ..Default::default()
//! };
//!
//! let generator = OccupancyDataGenerator::new(config)?;
//! let dataset = generator.generate(&mut RandomSource::from_seed(42))?;
//!
//! // No detections at unoccupied units
//! assert!(dataset.masking_violations().is_empty());
//!
//! let stats = DatasetStatistics::from_dataset(&dataset);
//! println!("{}", stats);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Module Organization
//!
//! - [`types`]: Configuration, identifiers and output formats
//! - [`model`]: Logistic link and the occupancy/detection sub-models
//! - [`random`]: Seeded random draws
//! - [`data`]: Generated datasets and their export
//! - [`simulation`]: Generator, statistics, truth checks, errors and logging
//! - [`fitting`]: Fitter contract and the maximum-likelihood reference fitter
#![warn(missing_docs, missing_debug_implementations, unreachable_pub)]

// Module declarations
pub mod data;
pub mod fitting;
pub mod model;
pub mod random;
pub mod simulation;
pub mod types;

// Core types and configuration
pub use types::{
    ConfigError, ConfigValidationError, OutputFormat, RunId, SimulationConfig,
};

// Model
pub use model::{DetectionModel, ModelCoefficients, OccupancyModel};

// Randomness
pub use random::{DrawSource, RandomSource};

// Data
pub use data::{Matrix, SimulatedDataset, UnitTruth};

// Simulation
pub use simulation::{
    DatasetStatistics, LoggingConfig, OccupancyDataGenerator, ReplicationSummary,
    SimulationError, SimulationResult,
};

// Fitting
pub use fitting::{
    FitError, FitSummary, FittingInput, MaximumLikelihoodFitter, OccupancyFitter,
    ParameterRecovery,
};
