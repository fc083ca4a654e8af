//! Occupancy and detection sub-models

use serde::{Deserialize, Serialize};

use super::link::logistic;
use crate::data::{Matrix, MatrixShapeError};

/// Logistic-linear map from the unit covariate to occupancy probability
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OccupancyModel {
    /// Intercept on the logit scale
    pub intercept: f64,
    /// Slope on the unit covariate
    pub slope: f64,
}

impl OccupancyModel {
    /// Create a new occupancy sub-model
    pub fn new(intercept: f64, slope: f64) -> Self {
        Self { intercept, slope }
    }

    /// Linear predictor `mu_occ` for one unit
    pub fn linear_predictor(&self, pt_cov: f64) -> f64 {
        self.intercept + self.slope * pt_cov
    }

    /// Occupancy probability `psi` for one unit
    pub fn probability(&self, pt_cov: f64) -> f64 {
        logistic(self.linear_predictor(pt_cov))
    }

    /// Occupancy probabilities for every unit
    pub fn probabilities(&self, pt_cov: &[f64]) -> Vec<f64> {
        pt_cov.iter().map(|&x| self.probability(x)).collect()
    }
}

/// Logistic-linear map from unit and event covariates to detection probability
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DetectionModel {
    /// Intercept on the logit scale
    pub intercept: f64,
    /// Slope on the unit covariate
    pub unit_slope: f64,
    /// Slope on the event covariate
    pub event_slope: f64,
}

impl DetectionModel {
    /// Create a new detection sub-model
    pub fn new(intercept: f64, unit_slope: f64, event_slope: f64) -> Self {
        Self { intercept, unit_slope, event_slope }
    }

    /// Part of the linear predictor shared by every event of a unit
    pub fn unit_term(&self, pt_cov: f64) -> f64 {
        self.intercept + self.unit_slope * pt_cov
    }

    /// Linear predictor from a precomputed unit term
    pub fn linear_predictor_from_unit_term(&self, unit_term: f64, event_cov: f64) -> f64 {
        unit_term + self.event_slope * event_cov
    }

    /// Linear predictor `mu_det` for one unit-event pair
    pub fn linear_predictor(&self, pt_cov: f64, event_cov: f64) -> f64 {
        self.linear_predictor_from_unit_term(self.unit_term(pt_cov), event_cov)
    }

    /// Detection probability `theta` for one unit-event pair
    pub fn probability(&self, pt_cov: f64, event_cov: f64) -> f64 {
        logistic(self.linear_predictor(pt_cov, event_cov))
    }

    /// Detection probabilities for a whole design
    ///
    /// The unit term is computed once per row and broadcast across the row's
    /// columns, so every event of a unit sees the identical unit contribution.
    /// Fails unless `pt_cov` has one value per row of `event_cov`.
    pub fn probabilities(
        &self,
        pt_cov: &[f64],
        event_cov: &Matrix<f64>,
    ) -> Result<Matrix<f64>, MatrixShapeError> {
        if pt_cov.len() != event_cov.rows() {
            return Err(MatrixShapeError::RowCount {
                expected: event_cov.rows(),
                actual: pt_cov.len(),
            });
        }

        let unit_terms: Vec<f64> = pt_cov.iter().map(|&x| self.unit_term(x)).collect();
        Ok(Matrix::from_fn(event_cov.rows(), event_cov.cols(), |i, j| {
            logistic(self.linear_predictor_from_unit_term(unit_terms[i], event_cov[(i, j)]))
        }))
    }
}
