//! Contract between the simulator and a model-fitting routine

use serde::{Deserialize, Serialize};
use std::fmt;

use super::FittingInput;
use crate::model::ModelCoefficients;

/// Failures reported by a fitting routine
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FitError {
    /// The observation table has no units or no events
    #[error("Cannot fit an empty observation table")]
    EmptyInput,

    /// A covariate does not line up with the observation table
    #[error("Input {what} has shape {actual}, expected {expected}")]
    InputShape {
        /// Which input is misaligned
        what: String,
        /// Shape implied by the observation table
        expected: String,
        /// Shape that was supplied
        actual: String,
    },

    /// Input values a fitter cannot use
    #[error("Invalid input values: {0}")]
    InvalidInput(String),

    /// The optimiser stopped before the gradient vanished
    #[error("Fit did not converge after {iterations} iterations (max |gradient| = {gradient_norm:e})")]
    NonConvergence {
        /// Iterations completed
        iterations: usize,
        /// Largest absolute component of the mean gradient at the last iterate
        gradient_norm: f64,
    },

    /// The information matrix could not be inverted
    #[error("Information matrix is singular; standard errors are undefined")]
    SingularHessian,

    /// Failure reported verbatim by an external fitting routine
    #[error("{0}")]
    External(String),
}

/// A routine that recovers coefficients from an observation table
///
/// Implementations must not see the latent occupancy state; everything they
/// receive is in [`FittingInput`].
pub trait OccupancyFitter {
    /// Human-readable name of the routine
    fn name(&self) -> &str;

    /// Fit both sub-models to `input`
    fn fit(&self, input: &FittingInput) -> Result<FitSummary, FitError>;
}

/// Point estimate and standard error of one coefficient
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Estimate {
    /// Coefficient name
    pub name: String,
    /// Point estimate
    pub value: f64,
    /// Standard error of the estimate
    pub std_error: f64,
}

/// Result of a fit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitSummary {
    /// Name of the routine that produced the fit
    pub fitter: String,
    /// Estimates in the order of [`ModelCoefficients::NAMES`]
    pub estimates: Vec<Estimate>,
    /// Maximised log-likelihood
    pub log_likelihood: f64,
    /// Iterations used
    pub iterations: usize,
    /// Whether the convergence criterion was met
    pub converged: bool,
}

impl FitSummary {
    /// Look up an estimate by coefficient name
    pub fn estimate(&self, name: &str) -> Option<&Estimate> {
        self.estimates.iter().find(|e| e.name == name)
    }

    /// Point estimates as coefficients, if all five are present
    pub fn coefficients(&self) -> Option<ModelCoefficients> {
        let mut values = [0.0; ModelCoefficients::COUNT];
        for (slot, name) in values.iter_mut().zip(ModelCoefficients::NAMES) {
            *slot = self.estimate(name)?.value;
        }
        Some(ModelCoefficients::from_array(values))
    }

    /// Compare estimates with the generating coefficients
    pub fn compare(&self, truth: &ModelCoefficients) -> Vec<ParameterRecovery> {
        ModelCoefficients::NAMES
            .iter()
            .zip(truth.to_array())
            .filter_map(|(name, true_value)| {
                self.estimate(name).map(|e| ParameterRecovery {
                    name: e.name.clone(),
                    truth: true_value,
                    estimate: e.value,
                    std_error: e.std_error,
                })
            })
            .collect()
    }

    /// Text table of truth against estimate for every coefficient
    pub fn recovery_report(&self, truth: &ModelCoefficients) -> String {
        let mut report = String::new();
        report.push_str(&format!(
            "Parameter recovery ({}, logLik = {:.3}, {} iterations{})\n",
            self.fitter,
            self.log_likelihood,
            self.iterations,
            if self.converged { "" } else { ", NOT converged" }
        ));
        report.push_str("  parameter      truth   estimate   std.err      error\n");
        for row in self.compare(truth) {
            report.push_str(&format!("  {}\n", row));
        }
        report
    }
}

/// One row of a parameter-recovery table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterRecovery {
    /// Coefficient name
    pub name: String,
    /// Generating value
    pub truth: f64,
    /// Recovered value
    pub estimate: f64,
    /// Standard error of the recovered value
    pub std_error: f64,
}

impl ParameterRecovery {
    /// `estimate - truth`
    pub fn error(&self) -> f64 {
        self.estimate - self.truth
    }

    /// Error in units of standard error
    pub fn z_score(&self) -> f64 {
        self.error() / self.std_error
    }

    /// Whether the truth lies within `z` standard errors of the estimate
    pub fn covered(&self, z: f64) -> bool {
        self.error().abs() <= z * self.std_error
    }
}

impl fmt::Display for ParameterRecovery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<11} {:>8.3} {:>10.3} {:>9.3} {:>10.3}",
            self.name,
            self.truth,
            self.estimate,
            self.std_error,
            self.error()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary() -> FitSummary {
        let values = [0.1, 0.9, -1.2, -0.8, 0.55];
        FitSummary {
            fitter: "test".to_string(),
            estimates: ModelCoefficients::NAMES
                .iter()
                .zip(values)
                .map(|(name, value)| Estimate { name: name.to_string(), value, std_error: 0.1 })
                .collect(),
            log_likelihood: -123.4,
            iterations: 9,
            converged: true,
        }
    }

    #[test]
    fn test_coefficients_from_estimates() {
        let coefficients = summary().coefficients().unwrap();
        assert_eq!(coefficients.beta_occ, 0.9);
        assert_eq!(coefficients.beta_det_2, 0.55);

        let mut partial = summary();
        partial.estimates.pop();
        assert!(partial.coefficients().is_none());
    }

    #[test]
    fn test_compare_against_truth() {
        let truth = ModelCoefficients::from_array([0.0, 1.0, -1.0, -1.0, 0.5]);
        let rows = summary().compare(&truth);

        assert_eq!(rows.len(), 5);
        assert_eq!(rows[0].name, "alpha_occ");
        assert!((rows[0].error() - 0.1).abs() < 1e-12);
        assert!(rows[0].covered(1.96));
        assert!(!rows[2].covered(1.0));
        assert!((rows[2].z_score() + 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_recovery_report_lists_every_parameter() {
        let truth = ModelCoefficients::from_array([0.0, 1.0, -1.0, -1.0, 0.5]);
        let report = summary().recovery_report(&truth);
        for name in ModelCoefficients::NAMES {
            assert!(report.contains(name));
        }
        assert!(!report.contains("NOT converged"));
    }

    #[test]
    fn test_external_errors_pass_through_verbatim() {
        let err = FitError::External("sampler diverged: R-hat 1.3".to_string());
        assert_eq!(err.to_string(), "sampler diverged: R-hat 1.3");
    }
}
