//! Single-season occupancy likelihood
//!
//! For unit `i` with detection history `y[i,·]`:
//!
//! ```text
//! L_i = psi_i * prod_j theta_ij^y_ij * (1 - theta_ij)^(1 - y_ij) + (1 - psi_i) * 1[sum_j y_ij = 0]
//! ```
//!
//! Parameters are ordered as in [`ModelCoefficients::NAMES`](crate::model::ModelCoefficients::NAMES).

use super::FittingInput;
use crate::model::link::{log_logistic, log_one_minus_logistic, logistic};

/// Number of free parameters
pub(crate) const PARAMS: usize = 5;

/// Log-likelihood and its gradient over a fixed observation table
#[derive(Debug)]
pub(crate) struct OccupancyLikelihood<'a> {
    input: &'a FittingInput,
    detected: Vec<bool>,
}

impl<'a> OccupancyLikelihood<'a> {
    pub(crate) fn new(input: &'a FittingInput) -> Self {
        let detected = input.detections.iter_rows().map(|row| row.iter().any(|&y| y == 1)).collect();
        Self { input, detected }
    }

    /// Number of units
    pub(crate) fn units(&self) -> usize {
        self.detected.len()
    }

    /// Total log-likelihood
    pub(crate) fn log_likelihood(&self, params: &[f64; PARAMS]) -> f64 {
        (0..self.units()).map(|i| self.unit_terms(params, i).0).sum()
    }

    /// Gradient of the total log-likelihood
    pub(crate) fn gradient(&self, params: &[f64; PARAMS]) -> [f64; PARAMS] {
        let mut grad = [0.0; PARAMS];
        for i in 0..self.units() {
            let (_, unit_grad) = self.unit_terms(params, i);
            for (g, u) in grad.iter_mut().zip(unit_grad) {
                *g += u;
            }
        }
        grad
    }

    /// Observed information `-H`, from central differences of the gradient
    pub(crate) fn information(&self, params: &[f64; PARAMS]) -> [[f64; PARAMS]; PARAMS] {
        let mut hessian = [[0.0; PARAMS]; PARAMS];

        for k in 0..PARAMS {
            let h = 1e-5 * params[k].abs().max(1.0);
            let mut up = *params;
            let mut down = *params;
            up[k] += h;
            down[k] -= h;
            let g_up = self.gradient(&up);
            let g_down = self.gradient(&down);
            for r in 0..PARAMS {
                hessian[r][k] = (g_up[r] - g_down[r]) / (2.0 * h);
            }
        }

        let mut information = [[0.0; PARAMS]; PARAMS];
        for r in 0..PARAMS {
            for c in 0..PARAMS {
                information[r][c] = -0.5 * (hessian[r][c] + hessian[c][r]);
            }
        }
        information
    }

    /// Log-likelihood contribution and gradient of unit `i`
    fn unit_terms(&self, params: &[f64; PARAMS], i: usize) -> (f64, [f64; PARAMS]) {
        let [alpha_occ, beta_occ, alpha_det, beta_det_1, beta_det_2] = *params;
        let x = self.input.pt_cov[i];
        let history = self.input.detections.row(i);
        let events = self.input.event_cov.row(i);

        let eta_occ = alpha_occ + beta_occ * x;
        let psi = logistic(eta_occ);
        let log_psi = log_logistic(eta_occ);

        // log P(history | occupied), with per-event residuals y - theta
        let unit_term = alpha_det + beta_det_1 * x;
        let mut log_history = 0.0;
        let mut residuals = Vec::with_capacity(history.len());
        for (&y, &w) in history.iter().zip(events) {
            let eta_det = unit_term + beta_det_2 * w;
            log_history += if y == 1 { log_logistic(eta_det) } else { log_one_minus_logistic(eta_det) };
            residuals.push(f64::from(y) - logistic(eta_det));
        }

        // posterior probability of occupancy given the history
        let (log_lik, posterior) = if self.detected[i] {
            (log_psi + log_history, 1.0)
        } else {
            let occupied = log_psi + log_history;
            let vacant = log_one_minus_logistic(eta_occ);
            let total = log_sum_exp(occupied, vacant);
            (total, (occupied - total).exp())
        };

        let occ_score = posterior - psi;
        let mut grad = [0.0; PARAMS];
        grad[0] = occ_score;
        grad[1] = occ_score * x;
        for (r, &w) in residuals.iter().zip(events) {
            grad[2] += posterior * r;
            grad[3] += posterior * r * x;
            grad[4] += posterior * r * w;
        }

        (log_lik, grad)
    }
}

fn log_sum_exp(a: f64, b: f64) -> f64 {
    let m = a.max(b);
    if m == f64::NEG_INFINITY {
        return m;
    }
    m + ((a - m).exp() + (b - m).exp()).ln()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Matrix;

    fn input() -> FittingInput {
        FittingInput::new(
            Matrix::from_rows(vec![vec![1, 0, 1], vec![0, 0, 0], vec![0, 1, 0], vec![0, 0, 0]])
                .unwrap(),
            vec![0.3, -1.1, 0.8, 1.7],
            Matrix::from_rows(vec![
                vec![0.2, -0.5, 1.0],
                vec![-1.3, 0.4, 0.0],
                vec![0.9, 0.1, -0.7],
                vec![0.0, 2.0, -2.0],
            ])
            .unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_hand_computed_unit_likelihood() {
        let single = FittingInput::new(
            Matrix::from_rows(vec![vec![0u8, 0]]).unwrap(),
            vec![0.0],
            Matrix::from_fn(1, 2, |_, _| 0.0),
        )
        .unwrap();
        let likelihood = OccupancyLikelihood::new(&single);

        // psi = 0.5, theta = 0.5: L = 0.5 * 0.25 + 0.5
        let ll = likelihood.log_likelihood(&[0.0; PARAMS]);
        assert!((ll - 0.625f64.ln()).abs() < 1e-12);
    }

    #[test]
    fn test_gradient_matches_finite_differences() {
        let input = input();
        let likelihood = OccupancyLikelihood::new(&input);
        let params = [0.2, 0.7, -0.9, -0.4, 0.6];
        let grad = likelihood.gradient(&params);

        for k in 0..PARAMS {
            let h = 1e-6;
            let mut up = params;
            let mut down = params;
            up[k] += h;
            down[k] -= h;
            let numeric =
                (likelihood.log_likelihood(&up) - likelihood.log_likelihood(&down)) / (2.0 * h);
            assert!(
                (numeric - grad[k]).abs() < 1e-6,
                "component {}: analytic {} vs numeric {}",
                k,
                grad[k],
                numeric
            );
        }
    }

    #[test]
    fn test_information_is_symmetric() {
        let input = input();
        let likelihood = OccupancyLikelihood::new(&input);
        let info = likelihood.information(&[0.0, 0.5, -1.0, 0.0, 0.5]);

        for r in 0..PARAMS {
            assert!(info[r][r].is_finite());
            for c in 0..PARAMS {
                assert_eq!(info[r][c], info[c][r]);
            }
        }
    }

    #[test]
    fn test_log_sum_exp() {
        assert!((log_sum_exp(0.0, 0.0) - 2f64.ln()).abs() < 1e-15);
        assert!((log_sum_exp(-1000.0, 0.0)).abs() < 1e-15);
    }
}
