//! The generative occupancy-detection model
//!
//! Two logistic-linear sub-models share the unit covariate:
//!
//! - [`OccupancyModel`]: unit covariate to occupancy probability `psi`
//! - [`DetectionModel`]: unit and event covariates to detection probability `theta`
//!
//! Both use the numerically stable [`link::logistic`].

pub mod coefficients;
pub mod link;
pub mod submodels;

pub use coefficients::*;
pub use link::{logistic, logit};
pub use submodels::*;
