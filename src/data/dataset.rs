//! Output of one simulation run

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Matrix;
use crate::model::ModelCoefficients;
use crate::types::RunId;

/// A per-unit or per-event table disagrees with the observation table
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Dataset field {field} has shape {actual}, expected {expected}")]
pub struct DatasetShapeError {
    /// Name of the misaligned field
    pub field: &'static str,
    /// Shape implied by `observations`
    pub expected: String,
    /// Shape found
    pub actual: String,
}

/// Everything one generator run produces
///
/// `occupancy` is the latent truth and is never part of what a fitting routine
/// sees; `observations` is the only outcome table handed on. Deserialization
/// rejects tables whose shapes disagree.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "DatasetRecord")]
pub struct SimulatedDataset {
    /// Identifier of the run that produced this dataset
    pub run_id: RunId,
    /// When the dataset was generated
    pub generated_at: DateTime<Utc>,
    /// Seed of the random source that made the draws, when it had one
    pub seed: Option<u64>,
    /// Coefficients the data were generated from
    pub coefficients: ModelCoefficients,
    /// Unit covariate `pt_cov`, one value per unit
    pub unit_covariate: Vec<f64>,
    /// Event covariate `event_cov`, `n_pt × n_rep`
    pub event_covariate: Matrix<f64>,
    /// Occupancy probability `psi`, one value per unit
    pub psi: Vec<f64>,
    /// Detection probability `theta`, `n_pt × n_rep`
    pub theta: Matrix<f64>,
    /// Latent occupancy state `Z`
    pub occupancy: Vec<bool>,
    /// Observed detection outcomes `obs`, `n_pt × n_rep`
    pub observations: Matrix<bool>,
}

impl SimulatedDataset {
    /// Number of sampling units
    pub fn n_pt(&self) -> usize {
        self.observations.rows()
    }

    /// Number of events per unit
    pub fn n_rep(&self) -> usize {
        self.observations.cols()
    }

    /// Detection history of unit `i`
    pub fn detection_history(&self, i: usize) -> &[bool] {
        self.observations.row(i)
    }

    /// Number of detections at unit `i`
    pub fn detections_at(&self, i: usize) -> usize {
        self.detection_history(i).iter().filter(|&&d| d).count()
    }

    /// Whether unit `i` was detected at least once
    pub fn was_detected(&self, i: usize) -> bool {
        self.detection_history(i).iter().any(|&d| d)
    }

    /// Number of truly occupied units
    pub fn occupied_count(&self) -> usize {
        self.occupancy.iter().filter(|&&z| z).count()
    }

    /// Number of units with at least one detection
    pub fn detected_count(&self) -> usize {
        (0..self.n_pt()).filter(|&i| self.was_detected(i)).count()
    }

    /// Total number of detections across all units and events
    pub fn total_detections(&self) -> usize {
        self.observations.iter().filter(|&&d| d).count()
    }

    /// Units with a detection despite being unoccupied
    ///
    /// Always empty for data from the generator; useful when checking data
    /// loaded from elsewhere. Units without an occupancy entry are skipped.
    pub fn masking_violations(&self) -> Vec<usize> {
        self.occupancy
            .iter()
            .zip(self.observations.iter_rows())
            .enumerate()
            .filter(|(_, (occupied, history))| !**occupied && history.iter().any(|&d| d))
            .map(|(i, _)| i)
            .collect()
    }

    /// Check that every per-unit and per-event table agrees on `n_pt × n_rep`
    pub fn check_shape(&self) -> Result<(), DatasetShapeError> {
        let (n_pt, n_rep) = self.observations.shape();

        let units = [
            ("unit_covariate", self.unit_covariate.len()),
            ("psi", self.psi.len()),
            ("occupancy", self.occupancy.len()),
        ];
        for (field, len) in units {
            if len != n_pt {
                return Err(DatasetShapeError {
                    field,
                    expected: n_pt.to_string(),
                    actual: len.to_string(),
                });
            }
        }

        let tables = [("event_covariate", self.event_covariate.shape()), ("theta", self.theta.shape())];
        for (field, (rows, cols)) in tables {
            if (rows, cols) != (n_pt, n_rep) {
                return Err(DatasetShapeError {
                    field,
                    expected: format!("{}x{}", n_pt, n_rep),
                    actual: format!("{}x{}", rows, cols),
                });
            }
        }

        Ok(())
    }

    /// Whether every per-unit and per-event table agrees on `n_pt × n_rep`
    pub fn has_consistent_shape(&self) -> bool {
        self.check_shape().is_ok()
    }
}

#[derive(Deserialize)]
struct DatasetRecord {
    run_id: RunId,
    generated_at: DateTime<Utc>,
    seed: Option<u64>,
    coefficients: ModelCoefficients,
    unit_covariate: Vec<f64>,
    event_covariate: Matrix<f64>,
    psi: Vec<f64>,
    theta: Matrix<f64>,
    occupancy: Vec<bool>,
    observations: Matrix<bool>,
}

impl TryFrom<DatasetRecord> for SimulatedDataset {
    type Error = DatasetShapeError;

    fn try_from(record: DatasetRecord) -> Result<Self, Self::Error> {
        let dataset = Self {
            run_id: record.run_id,
            generated_at: record.generated_at,
            seed: record.seed,
            coefficients: record.coefficients,
            unit_covariate: record.unit_covariate,
            event_covariate: record.event_covariate,
            psi: record.psi,
            theta: record.theta,
            occupancy: record.occupancy,
            observations: record.observations,
        };
        dataset.check_shape()?;
        Ok(dataset)
    }
}
