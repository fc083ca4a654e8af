//! Reference maximum-likelihood fitter
//!
//! Damped Newton ascent on the single-season occupancy likelihood. The
//! information matrix comes from central differences of the analytical
//! gradient; its inverse at the optimum gives the standard errors.

use tracing::{debug, info, instrument, warn};

use super::likelihood::{OccupancyLikelihood, PARAMS};
use super::linalg::{dot, invert, mat_vec, max_abs};
use super::{Estimate, FitError, FitSummary, FittingInput, OccupancyFitter};
use crate::model::ModelCoefficients;

/// Sufficient-increase constant of the backtracking line search
const ARMIJO: f64 = 1e-4;

/// Smallest step fraction tried before giving up on a direction
const MIN_STEP: f64 = 1e-10;

/// Maximum-likelihood fitter for the occupancy-detection model
#[derive(Debug, Clone, PartialEq)]
pub struct MaximumLikelihoodFitter {
    /// Maximum Newton iterations
    pub max_iterations: usize,
    /// Convergence threshold on the largest component of the per-unit mean gradient
    pub tolerance: f64,
    /// Cap on the largest component of a single parameter update
    pub max_step: f64,
}

impl Default for MaximumLikelihoodFitter {
    fn default() -> Self {
        Self { max_iterations: 200, tolerance: 1e-6, max_step: 5.0 }
    }
}

impl MaximumLikelihoodFitter {
    /// Create a fitter with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the iteration limit
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Set the gradient tolerance
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Newton direction when the information matrix is usable, otherwise the
    /// per-unit mean gradient; capped at `max_step`
    fn search_direction(
        &self,
        likelihood: &OccupancyLikelihood<'_>,
        params: &[f64; PARAMS],
        grad: &[f64; PARAMS],
    ) -> [f64; PARAMS] {
        let newton = invert(likelihood.information(params)).map(|cov| mat_vec(&cov, grad));

        let mut direction = match newton {
            Some(step) if dot(grad, &step) > 0.0 => step,
            _ => {
                debug!("Information matrix not positive definite, using gradient direction");
                let n = likelihood.units() as f64;
                grad.map(|g| g / n)
            }
        };

        let largest = max_abs(&direction);
        if largest > self.max_step {
            let scale = self.max_step / largest;
            for d in direction.iter_mut() {
                *d *= scale;
            }
        }
        direction
    }
}

impl OccupancyFitter for MaximumLikelihoodFitter {
    fn name(&self) -> &str {
        "maximum-likelihood"
    }

    #[instrument(skip(self, input), fields(n_pt = input.n_pt(), n_rep = input.n_rep()))]
    fn fit(&self, input: &FittingInput) -> Result<FitSummary, FitError> {
        input.validate()?;

        let likelihood = OccupancyLikelihood::new(input);
        let n = likelihood.units() as f64;

        let mut params = [0.0; PARAMS];
        let mut log_lik = likelihood.log_likelihood(&params);
        let mut grad = likelihood.gradient(&params);
        let mut iterations = 0;

        while max_abs(&grad) / n >= self.tolerance && iterations < self.max_iterations {
            iterations += 1;

            let direction = self.search_direction(&likelihood, &params, &grad);
            let slope = dot(&grad, &direction);

            let mut step = 1.0;
            let mut accepted = None;
            while step >= MIN_STEP {
                let candidate: [f64; PARAMS] =
                    std::array::from_fn(|k| params[k] + step * direction[k]);
                let candidate_log_lik = likelihood.log_likelihood(&candidate);
                if candidate_log_lik.is_finite()
                    && candidate_log_lik >= log_lik + ARMIJO * step * slope
                {
                    accepted = Some((candidate, candidate_log_lik));
                    break;
                }
                step *= 0.5;
            }

            let Some((next, next_log_lik)) = accepted else {
                debug!(iteration = iterations, "Line search found no ascent");
                break;
            };

            params = next;
            log_lik = next_log_lik;
            grad = likelihood.gradient(&params);
            debug!(
                iteration = iterations,
                log_likelihood = log_lik,
                step = step,
                gradient = max_abs(&grad) / n,
                "Newton step accepted"
            );
        }

        let gradient_norm = max_abs(&grad) / n;
        if gradient_norm >= self.tolerance {
            warn!(iterations, gradient_norm, "Maximum-likelihood fit did not converge");
            return Err(FitError::NonConvergence { iterations, gradient_norm });
        }

        let covariance = invert(likelihood.information(&params)).ok_or(FitError::SingularHessian)?;
        if (0..PARAMS).any(|k| covariance[k][k].is_nan() || covariance[k][k] <= 0.0) {
            return Err(FitError::SingularHessian);
        }

        let estimates = ModelCoefficients::NAMES
            .iter()
            .zip(params)
            .enumerate()
            .map(|(k, (name, value))| Estimate {
                name: name.to_string(),
                value,
                std_error: covariance[k][k].sqrt(),
            })
            .collect();

        info!(iterations, log_likelihood = log_lik, "Maximum-likelihood fit converged");

        Ok(FitSummary {
            fitter: self.name().to_string(),
            estimates,
            log_likelihood: log_lik,
            iterations,
            converged: true,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Matrix;

    #[test]
    fn test_default_settings() {
        let fitter = MaximumLikelihoodFitter::new();
        assert_eq!(fitter.max_iterations, 200);
        assert_eq!(fitter.tolerance, 1e-6);
        assert_eq!(fitter.name(), "maximum-likelihood");

        let tuned = MaximumLikelihoodFitter::new().with_max_iterations(10).with_tolerance(1e-4);
        assert_eq!(tuned.max_iterations, 10);
        assert_eq!(tuned.tolerance, 1e-4);
    }

    #[test]
    fn test_rejects_invalid_input() {
        let input = FittingInput {
            run_id: None,
            detections: Matrix::from_fn(2, 2, |_, _| 0),
            pt_cov: vec![0.0],
            event_cov: Matrix::from_fn(2, 2, |_, _| 0.0),
            occupancy_formula: String::new(),
            detection_formula: String::new(),
        };
        let result = MaximumLikelihoodFitter::new().fit(&input);
        assert!(matches!(result, Err(FitError::InputShape { .. })));
    }

    #[test]
    fn test_zero_iterations_reports_non_convergence() {
        let input = FittingInput::new(
            Matrix::from_rows(vec![vec![1, 0], vec![0, 0], vec![1, 1]]).unwrap(),
            vec![0.5, -1.0, 1.5],
            Matrix::from_rows(vec![vec![0.1, 0.2], vec![-0.3, 0.4], vec![1.0, -1.0]]).unwrap(),
        )
        .unwrap();

        let result = MaximumLikelihoodFitter::new().with_max_iterations(0).fit(&input);
        assert!(matches!(result, Err(FitError::NonConvergence { iterations: 0, .. })));
    }
}
