//! Checking generated data against the truth
//!
//! Two checks use the generator as a ground-truth oracle: refitting the model to
//! see whether the generating coefficients come back, and replicating the
//! occupancy draws over many seeds with the covariates held fixed to see whether
//! the realised occupancy averages out to the mean of `psi`.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use super::{OccupancyDataGenerator, SimulationResult};
use crate::data::{Matrix, SimulatedDataset};
use crate::fitting::{FitSummary, FittingInput, OccupancyFitter};
use crate::random::RandomSource;

/// Refit a generated dataset
///
/// Only the fitter-visible part of the dataset is passed on. Fitter failures
/// come back unchanged as [`SimulationError::Fitting`](super::SimulationError::Fitting).
#[instrument(skip_all, fields(fitter = fitter.name(), run_id = %dataset.run_id))]
pub fn fit_dataset<F: OccupancyFitter + ?Sized>(
    fitter: &F,
    dataset: &SimulatedDataset,
) -> SimulationResult<FitSummary> {
    let input = FittingInput::from_dataset(dataset);
    let summary = fitter.fit(&input)?;
    info!(log_likelihood = summary.log_likelihood, "Refit complete");
    Ok(summary)
}

/// Realised against expected occupancy over replicate runs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplicationSummary {
    /// Number of replicate runs
    pub runs: usize,
    /// Mean occupancy probability for the fixed covariates
    pub mean_psi: f64,
    /// Mean over runs of the proportion of occupied units
    pub mean_occupancy: f64,
    /// Standard deviation over runs of the proportion of occupied units
    pub occupancy_sd: f64,
}

impl ReplicationSummary {
    /// Standard error of [`mean_occupancy`](Self::mean_occupancy)
    pub fn standard_error(&self) -> f64 {
        if self.runs == 0 {
            0.0
        } else {
            self.occupancy_sd / (self.runs as f64).sqrt()
        }
    }

    /// `mean_occupancy - mean_psi`
    pub fn discrepancy(&self) -> f64 {
        self.mean_occupancy - self.mean_psi
    }
}

/// Repeat the occupancy and detection draws once per seed with fixed covariates
pub fn replicate_with_fixed_covariates(
    generator: &OccupancyDataGenerator,
    pt_cov: &[f64],
    event_cov: &Matrix<f64>,
    seeds: impl IntoIterator<Item = u64>,
) -> SimulationResult<ReplicationSummary> {
    let mut proportions = Vec::new();
    let mut mean_psi = 0.0;

    for seed in seeds {
        let mut source = RandomSource::from_seed(seed);
        let dataset =
            generator.generate_with_covariates(pt_cov.to_vec(), event_cov.clone(), &mut source)?;
        mean_psi = dataset.psi.iter().sum::<f64>() / dataset.n_pt() as f64;
        let proportion = dataset.occupied_count() as f64 / dataset.n_pt() as f64;
        debug!(seed, proportion, "Replicate run");
        proportions.push(proportion);
    }

    let runs = proportions.len();
    let (mean_occupancy, occupancy_sd) = if runs == 0 {
        (0.0, 0.0)
    } else {
        let mean = proportions.iter().sum::<f64>() / runs as f64;
        let var = if runs > 1 {
            proportions.iter().map(|p| (p - mean).powi(2)).sum::<f64>() / (runs - 1) as f64
        } else {
            0.0
        };
        (mean, var.sqrt())
    };

    Ok(ReplicationSummary { runs, mean_psi, mean_occupancy, occupancy_sd })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fitting::FitError;
    use crate::simulation::SimulationError;
    use crate::types::SimulationConfig;

    struct FailingFitter;

    impl OccupancyFitter for FailingFitter {
        fn name(&self) -> &str {
            "failing"
        }

        fn fit(&self, _input: &FittingInput) -> Result<FitSummary, FitError> {
            Err(FitError::External("divergent transitions: 12".to_string()))
        }
    }

    #[test]
    fn test_fitter_failure_passes_through() {
        let generator = OccupancyDataGenerator::new(SimulationConfig::default()).unwrap();
        let dataset = generator.generate(&mut RandomSource::from_seed(1)).unwrap();

        let err = fit_dataset(&FailingFitter, &dataset).unwrap_err();
        assert!(matches!(err, SimulationError::Fitting(FitError::External(_))));
        assert_eq!(err.to_string(), "divergent transitions: 12");
    }

    #[test]
    fn test_replication_summary_fields() {
        let config = SimulationConfig { n_pt: 10, n_rep: 2, ..Default::default() };
        let generator = OccupancyDataGenerator::new(config).unwrap();
        let pt_cov = vec![0.0; 10];
        let event_cov = Matrix::from_fn(10, 2, |_, _| 0.0);

        let summary = replicate_with_fixed_covariates(&generator, &pt_cov, &event_cov, 0..20).unwrap();

        assert_eq!(summary.runs, 20);
        // alpha_occ = 0 and pt_cov = 0 give psi = 0.5 everywhere
        assert_eq!(summary.mean_psi, 0.5);
        assert!(summary.mean_occupancy > 0.0 && summary.mean_occupancy < 1.0);
        assert!(summary.standard_error() > 0.0);
    }

    #[test]
    fn test_replication_with_no_seeds() {
        let generator = OccupancyDataGenerator::new(SimulationConfig::default()).unwrap();
        let summary = replicate_with_fixed_covariates(
            &generator,
            &[],
            &Matrix::from_fn(0, 0, |_, _| 0.0),
            std::iter::empty(),
        )
        .unwrap();
        assert_eq!(summary.runs, 0);
        assert_eq!(summary.standard_error(), 0.0);
    }
}
