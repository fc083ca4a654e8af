//! Seam to the model-fitting routine
//!
//! The simulator's output is meant to be refit so that recovered estimates can
//! be checked against the generating coefficients. This module defines what a
//! fitter receives ([`FittingInput`]), what it returns ([`FitSummary`]) and how
//! it fails ([`FitError`]). [`MaximumLikelihoodFitter`] is a self-contained
//! implementation of the contract; any external routine can stand in for it
//! through [`OccupancyFitter`].

pub mod fitter;
pub mod input;
mod likelihood;
mod linalg;
pub mod mle;

pub use fitter::*;
pub use input::*;
pub use mle::*;
