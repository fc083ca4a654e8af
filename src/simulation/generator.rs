//! Synthetic occupancy data generator
//!
//! Produces one closed, single-season dataset per call:
//!
//! ```text
//! pt_cov[i]      ~ N(0, 1)
//! event_cov[i,j] ~ N(0, 1)
//! psi[i]         = logistic(alpha_occ + beta_occ * pt_cov[i])
//! theta[i,j]     = logistic(alpha_det + beta_det_1 * pt_cov[i] + beta_det_2 * event_cov[i,j])
//! Z[i]           ~ Bernoulli(psi[i])
//! raw[i,j]       ~ Bernoulli(theta[i,j])
//! obs[i,j]       = raw[i,j] * Z[i]
//! ```
//!
//! Draws are taken in exactly this order (units before events, rows before
//! columns), so a seeded source reproduces a dataset bit for bit.

use chrono::Utc;
use tracing::{debug, info, instrument};

use crate::data::{Matrix, SimulatedDataset};
use crate::random::DrawSource;
use crate::simulation::SimulationResult;
use crate::types::{ConfigValidationError, RunId, SimulationConfig};

/// Generator for closed single-season occupancy data
#[derive(Debug, Clone)]
pub struct OccupancyDataGenerator {
    config: SimulationConfig,
}

impl OccupancyDataGenerator {
    /// Create a generator, rejecting an invalid configuration
    pub fn new(config: SimulationConfig) -> SimulationResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Configuration this generator was built from
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Draw fresh covariates and simulate occupancy and detection
    #[instrument(skip(self, source), fields(n_pt = self.config.n_pt, n_rep = self.config.n_rep))]
    pub fn generate<R: DrawSource + ?Sized>(
        &self,
        source: &mut R,
    ) -> SimulationResult<SimulatedDataset> {
        let (n_pt, n_rep) = self.config.design();

        let pt_cov: Vec<f64> = (0..n_pt).map(|_| source.standard_normal()).collect();
        let event_cov = Matrix::from_fn(n_pt, n_rep, |_, _| source.standard_normal());

        self.simulate(pt_cov, event_cov, source)
    }

    /// Simulate occupancy and detection for caller-supplied covariates
    ///
    /// `pt_cov` must hold `n_pt` values and `event_cov` must be `n_pt × n_rep`;
    /// every value must be finite. Only the Bernoulli draws consume the source.
    #[instrument(skip_all, fields(n_pt = self.config.n_pt, n_rep = self.config.n_rep))]
    pub fn generate_with_covariates<R: DrawSource + ?Sized>(
        &self,
        pt_cov: Vec<f64>,
        event_cov: Matrix<f64>,
        source: &mut R,
    ) -> SimulationResult<SimulatedDataset> {
        self.validate_covariates(&pt_cov, &event_cov)?;
        self.simulate(pt_cov, event_cov, source)
    }

    fn validate_covariates(
        &self,
        pt_cov: &[f64],
        event_cov: &Matrix<f64>,
    ) -> Result<(), ConfigValidationError> {
        let (n_pt, n_rep) = self.config.design();

        if pt_cov.len() != n_pt {
            return Err(ConfigValidationError::CovariateShape {
                name: "pt_cov".to_string(),
                expected: format!("{}", n_pt),
                actual: format!("{}", pt_cov.len()),
            });
        }

        if event_cov.shape() != (n_pt, n_rep) {
            let (rows, cols) = event_cov.shape();
            return Err(ConfigValidationError::CovariateShape {
                name: "event_cov".to_string(),
                expected: format!("{}x{}", n_pt, n_rep),
                actual: format!("{}x{}", rows, cols),
            });
        }

        let covariates = [("pt_cov", pt_cov), ("event_cov", event_cov.as_slice())];
        for (name, values) in covariates {
            if let Some((index, &value)) = values.iter().enumerate().find(|(_, v)| !v.is_finite()) {
                return Err(ConfigValidationError::NonFiniteCovariate {
                    name: name.to_string(),
                    index,
                    value,
                });
            }
        }

        Ok(())
    }

    fn simulate<R: DrawSource + ?Sized>(
        &self,
        pt_cov: Vec<f64>,
        event_cov: Matrix<f64>,
        source: &mut R,
    ) -> SimulationResult<SimulatedDataset> {
        let (n_pt, n_rep) = self.config.design();
        let coefficients = self.config.coefficients();

        let psi = coefficients.occupancy().probabilities(&pt_cov);
        let theta = coefficients.detection().probabilities(&pt_cov, &event_cov)?;

        let occupancy = psi
            .iter()
            .map(|&p| source.bernoulli(p))
            .collect::<SimulationResult<Vec<bool>>>()?;
        let raw = theta
            .iter()
            .map(|&p| source.bernoulli(p))
            .collect::<SimulationResult<Vec<bool>>>()?;

        // Closure with no false positives: an unoccupied unit keeps an all-zero row
        let observations = Matrix::from_fn(n_pt, n_rep, |i, j| raw[i * n_rep + j] && occupancy[i]);

        let dataset = SimulatedDataset {
            run_id: RunId::new(),
            generated_at: Utc::now(),
            seed: source.seed(),
            coefficients,
            unit_covariate: pt_cov,
            event_covariate: event_cov,
            psi,
            theta,
            occupancy,
            observations,
        };

        debug!(
            raw_detections = raw.iter().filter(|&&d| d).count(),
            masked = raw.iter().filter(|&&d| d).count() - dataset.total_detections(),
            "Applied occupancy mask"
        );
        info!(
            run_id = %dataset.run_id,
            occupied = dataset.occupied_count(),
            detected = dataset.detected_count(),
            detections = dataset.total_detections(),
            "Generated occupancy dataset"
        );

        Ok(dataset)
    }
}

/// Generate one dataset from `config`, drawing from `source`
pub fn generate<R: DrawSource + ?Sized>(
    config: &SimulationConfig,
    source: &mut R,
) -> SimulationResult<SimulatedDataset> {
    OccupancyDataGenerator::new(config.clone())?.generate(source)
}
