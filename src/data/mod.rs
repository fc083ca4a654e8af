//! Generated data and its export
//!
//! - [`Matrix`]: rectangular unit × event tables
//! - [`SimulatedDataset`]: everything one run produces, latent truth included
//! - [`export`]: writers for the observation table and the answer key

pub mod dataset;
pub mod export;
pub mod matrix;

pub use dataset::*;
pub use export::{save_observations, save_truth, unit_truths, UnitTruth};
pub use matrix::*;
