//! Generating coefficients of the occupancy-detection model

use serde::{Deserialize, Serialize};

use super::{DetectionModel, OccupancyModel};

/// Coefficients of both linear predictors
///
/// ```text
/// logit(psi[i])     = alpha_occ + beta_occ * pt_cov[i]
/// logit(theta[i,j]) = alpha_det + beta_det_1 * pt_cov[i] + beta_det_2 * event_cov[i,j]
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelCoefficients {
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
}

impl ModelCoefficients {
    /// Number of coefficients
    pub const COUNT: usize = 5;

    /// Coefficient names in canonical order
    pub const NAMES: [&'static str; Self::COUNT] =
        ["alpha_occ", "beta_occ", "alpha_det", "beta_det_1", "beta_det_2"];

    /// Coefficients in canonical order
    pub fn to_array(&self) -> [f64; Self::COUNT] {
        [self.alpha_occ, self.beta_occ, self.alpha_det, self.beta_det_1, self.beta_det_2]
    }

    /// Build from values in canonical order
    pub fn from_array(values: [f64; Self::COUNT]) -> Self {
        let [alpha_occ, beta_occ, alpha_det, beta_det_1, beta_det_2] = values;
        Self { alpha_occ, beta_occ, alpha_det, beta_det_1, beta_det_2 }
    }

    /// Name and value of the first non-finite coefficient, if any
    pub fn first_non_finite(&self) -> Option<(&'static str, f64)> {
        Self::NAMES
            .iter()
            .zip(self.to_array())
            .find(|(_, value)| !value.is_finite())
            .map(|(name, value)| (*name, value))
    }

    /// Occupancy sub-model
    pub fn occupancy(&self) -> OccupancyModel {
        OccupancyModel::new(self.alpha_occ, self.beta_occ)
    }

    /// Detection sub-model
    pub fn detection(&self) -> DetectionModel {
        DetectionModel::new(self.alpha_det, self.beta_det_1, self.beta_det_2)
    }
}
