//! Simulation runs and their reporting
//!
//! This module contains the generator, error handling, logging setup,
//! dataset statistics and the truth checks built on top of the generator.
//!
//! # Overview
//!
//! - **OccupancyDataGenerator**: draws covariates, latent occupancy and detections
//! - **DatasetStatistics**: naive vs true occupancy, detection frequencies
//! - **fit_dataset / replicate_with_fixed_covariates**: checks against the truth
//! - **SimulationError**: error type for every fallible operation
//! - **LoggingConfig**: tracing subscriber setup
//!
//! # Usage Example
//!
//! ```rust
//! use occupancy_closure_sim::random::RandomSource;
//! use occupancy_closure_sim::simulation::*;
//! use occupancy_closure_sim::types::SimulationConfig;
//!
//! let config = SimulationConfig { n_pt: 50, n_rep: 3, ..Default::default() };
//! let generator = OccupancyDataGenerator::new(config).unwrap();
//! let dataset = generator.generate(&mut RandomSource::from_seed(42)).unwrap();
//!
//! let stats = DatasetStatistics::from_dataset(&dataset);
//! assert!(stats.naive_occupancy() <= stats.true_occupancy());
//! ```

pub mod error;
pub mod generator;
pub mod logging;
pub mod recovery;
pub mod statistics;

// Re-export all public types for convenience
pub use error::*;
pub use generator::*;
pub use logging::*;
pub use recovery::*;
pub use statistics::*;
