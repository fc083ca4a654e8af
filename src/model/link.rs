//! Logistic link and its companions
//!
//! All functions here are numerically stable for any finite input: the
//! exponential is only ever evaluated on a non-positive argument.

/// Smallest probability the logistic link returns
pub const MIN_PROBABILITY: f64 = f64::MIN_POSITIVE;

/// Largest probability the logistic link returns (the largest `f64` below one)
pub const MAX_PROBABILITY: f64 = 1.0 - f64::EPSILON / 2.0;

/// Logistic link `1 / (1 + exp(-x))`
///
/// The result lies in the open interval (0, 1) for every finite `x`. Very large
/// magnitudes saturate at [`MIN_PROBABILITY`] / [`MAX_PROBABILITY`] instead of
/// rounding to exactly 0 or 1.
pub fn logistic(x: f64) -> f64 {
    let p = if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let e = x.exp();
        e / (1.0 + e)
    };
    p.clamp(MIN_PROBABILITY, MAX_PROBABILITY)
}

/// Inverse of [`logistic`] for `p` in (0, 1)
pub fn logit(p: f64) -> f64 {
    p.ln() - (-p).ln_1p()
}

/// `ln(1 + exp(x))` without overflow
pub fn softplus(x: f64) -> f64 {
    x.max(0.0) + (-x.abs()).exp().ln_1p()
}

/// `ln(logistic(x))`, exact in the tails where `logistic` saturates
pub fn log_logistic(x: f64) -> f64 {
    -softplus(-x)
}

/// `ln(1 - logistic(x))`
pub fn log_one_minus_logistic(x: f64) -> f64 {
    -softplus(x)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logistic_midpoint() {
        assert_eq!(logistic(0.0), 0.5);
    }

    #[test]
    fn test_logistic_stays_inside_open_interval() {
        for x in [-1.0e6, -800.0, -40.0, 40.0, 800.0, 1.0e6, f64::MAX, f64::MIN] {
            let p = logistic(x);
            assert!(p > 0.0 && p < 1.0, "logistic({}) = {} escaped (0,1)", x, p);
        }
    }

    #[test]
    fn test_logistic_symmetry() {
        for x in [0.3, 1.0, 2.5, 7.0] {
            assert!((logistic(-x) - (1.0 - logistic(x))).abs() < 1e-15);
        }
    }

    #[test]
    fn test_logistic_strictly_increasing() {
        let xs = [-20.0, -3.0, -0.5, 0.0, 0.25, 1.0, 4.0, 20.0];
        for pair in xs.windows(2) {
            assert!(logistic(pair[0]) < logistic(pair[1]));
        }
    }

    #[test]
    fn test_logit_inverts_logistic() {
        for x in [-6.0, -1.0, 0.0, 0.5, 3.0] {
            assert!((logit(logistic(x)) - x).abs() < 1e-10);
        }
    }

    #[test]
    fn test_log_forms_in_the_tails() {
        // logistic saturates here but the log form does not
        assert!((log_logistic(-1000.0) + 1000.0).abs() < 1e-9);
        assert!((log_one_minus_logistic(1000.0) + 1000.0).abs() < 1e-9);
        assert!((log_logistic(0.0) - 0.5f64.ln()).abs() < 1e-15);
        assert!(softplus(1000.0).is_finite());
    }
}
