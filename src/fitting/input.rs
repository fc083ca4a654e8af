//! The table handed to a fitting routine
//!
//! A [`FittingInput`] carries exactly what an occupancy fitter needs: the
//! detection/non-detection table, one covariate value per unit, one covariate
//! value per unit-event pair and the two model formulas. The latent occupancy
//! state is deliberately absent.

use serde::{Deserialize, Serialize};

use super::FitError;
use crate::data::{Matrix, SimulatedDataset};
use crate::types::RunId;

/// Formula for the occupancy linear predictor
pub const OCCUPANCY_FORMULA: &str = "~ pt_cov";

/// Formula for the detection linear predictor
pub const DETECTION_FORMULA: &str = "~ pt_cov + event_cov";

/// Observation table plus covariates, indexed consistently by unit and event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FittingInput {
    /// Run the table came from, when known
    pub run_id: Option<RunId>,
    /// Detection (1) / non-detection (0), `n_pt × n_rep`
    pub detections: Matrix<u8>,
    /// Unit-level covariate, one value per unit
    pub pt_cov: Vec<f64>,
    /// Event-level covariate, `n_pt × n_rep`
    pub event_cov: Matrix<f64>,
    /// Occupancy sub-model formula
    pub occupancy_formula: String,
    /// Detection sub-model formula
    pub detection_formula: String,
}

impl FittingInput {
    /// Build an input table, checking that all indexing agrees
    pub fn new(
        detections: Matrix<u8>,
        pt_cov: Vec<f64>,
        event_cov: Matrix<f64>,
    ) -> Result<Self, FitError> {
        let input = Self {
            run_id: None,
            detections,
            pt_cov,
            event_cov,
            occupancy_formula: OCCUPANCY_FORMULA.to_string(),
            detection_formula: DETECTION_FORMULA.to_string(),
        };
        input.validate()?;
        Ok(input)
    }

    /// Extract the fitter-visible part of a generated dataset
    pub fn from_dataset(dataset: &SimulatedDataset) -> Self {
        Self {
            run_id: Some(dataset.run_id),
            detections: dataset.observations.map(|&d| u8::from(d)),
            pt_cov: dataset.unit_covariate.clone(),
            event_cov: dataset.event_covariate.clone(),
            occupancy_formula: OCCUPANCY_FORMULA.to_string(),
            detection_formula: DETECTION_FORMULA.to_string(),
        }
    }

    /// Number of sampling units
    pub fn n_pt(&self) -> usize {
        self.detections.rows()
    }

    /// Number of events per unit
    pub fn n_rep(&self) -> usize {
        self.detections.cols()
    }

    /// Check shapes, outcome coding and covariate finiteness
    pub fn validate(&self) -> Result<(), FitError> {
        let (n_pt, n_rep) = self.detections.shape();

        if n_pt == 0 || n_rep == 0 {
            return Err(FitError::EmptyInput);
        }

        if self.pt_cov.len() != n_pt {
            return Err(FitError::InputShape {
                what: "pt_cov".to_string(),
                expected: format!("{}", n_pt),
                actual: format!("{}", self.pt_cov.len()),
            });
        }

        if self.event_cov.shape() != (n_pt, n_rep) {
            let (rows, cols) = self.event_cov.shape();
            return Err(FitError::InputShape {
                what: "event_cov".to_string(),
                expected: format!("{}x{}", n_pt, n_rep),
                actual: format!("{}x{}", rows, cols),
            });
        }

        if self.detections.iter().any(|&y| y > 1) {
            return Err(FitError::InvalidInput(
                "detections must be coded 0 or 1".to_string(),
            ));
        }

        if self.pt_cov.iter().chain(self.event_cov.iter()).any(|v| !v.is_finite()) {
            return Err(FitError::InvalidInput("covariates must be finite".to_string()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detections() -> Matrix<u8> {
        Matrix::from_rows(vec![vec![1, 0, 1], vec![0, 0, 0]]).unwrap()
    }

    #[test]
    fn test_new_accepts_consistent_input() {
        let input = FittingInput::new(
            detections(),
            vec![0.5, -0.5],
            Matrix::from_fn(2, 3, |_, _| 0.0),
        )
        .unwrap();

        assert_eq!(input.n_pt(), 2);
        assert_eq!(input.n_rep(), 3);
        assert_eq!(input.occupancy_formula, "~ pt_cov");
        assert_eq!(input.detection_formula, "~ pt_cov + event_cov");
    }

    #[test]
    fn test_new_rejects_wrong_unit_covariate_length() {
        let err = FittingInput::new(detections(), vec![0.5], Matrix::from_fn(2, 3, |_, _| 0.0))
            .unwrap_err();
        assert!(matches!(err, FitError::InputShape { ref what, .. } if what == "pt_cov"));
    }

    #[test]
    fn test_new_rejects_wrong_event_covariate_shape() {
        let err = FittingInput::new(detections(), vec![0.5, 0.1], Matrix::from_fn(2, 2, |_, _| 0.0))
            .unwrap_err();
        assert!(matches!(err, FitError::InputShape { ref what, .. } if what == "event_cov"));
    }

    #[test]
    fn test_new_rejects_empty_and_bad_coding() {
        let empty = FittingInput::new(Matrix::from_fn(0, 0, |_, _| 0), vec![], Matrix::from_fn(0, 0, |_, _| 0.0));
        assert!(matches!(empty, Err(FitError::EmptyInput)));

        let bad = Matrix::from_rows(vec![vec![2u8]]).unwrap();
        let result = FittingInput::new(bad, vec![0.0], Matrix::from_fn(1, 1, |_, _| 0.0));
        assert!(matches!(result, Err(FitError::InvalidInput(_))));
    }
}
