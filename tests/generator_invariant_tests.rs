//! Tests for the structural guarantees of every generated dataset
//!
//! Closure with no false positives, probabilities strictly inside (0, 1),
//! monotone response to the covariates and the smallest valid design.

use occupancy_closure_sim::data::Matrix;
use occupancy_closure_sim::model::logit;
use occupancy_closure_sim::random::{DrawSource, RandomSource};
use occupancy_closure_sim::simulation::{OccupancyDataGenerator, SimulationError, SimulationResult};
use occupancy_closure_sim::types::{ConfigValidationError, SimulationConfig};

fn generator(config: SimulationConfig) -> OccupancyDataGenerator {
    OccupancyDataGenerator::new(config).unwrap()
}

/// Normal draws of zero, then Bernoulli outcomes from a fixed script
struct ScriptedDraws {
    outcomes: Vec<bool>,
    next: usize,
}

impl DrawSource for ScriptedDraws {
    fn standard_normal(&mut self) -> f64 {
        0.0
    }

    fn bernoulli(&mut self, _p: f64) -> SimulationResult<bool> {
        let outcome = self.outcomes[self.next % self.outcomes.len()];
        self.next += 1;
        Ok(outcome)
    }
}

/// No unoccupied unit ever records a detection, across many seeds
#[test]
fn test_unoccupied_units_have_all_zero_histories() {
    let generator = generator(SimulationConfig {
        n_pt: 300,
        n_rep: 5,
        alpha_occ: -0.5,
        alpha_det: 1.5,
        ..Default::default()
    });

    for seed in 0..25 {
        let dataset = generator.generate(&mut RandomSource::from_seed(seed)).unwrap();

        for i in 0..dataset.n_pt() {
            if !dataset.occupancy[i] {
                assert!(
                    dataset.detection_history(i).iter().all(|&d| !d),
                    "seed {}: unoccupied unit {} has a detection",
                    seed,
                    i
                );
            }
        }
        assert!(dataset.masking_violations().is_empty());
        assert!(dataset.detected_count() <= dataset.occupied_count());
    }
}

/// Raw detections drawn at unoccupied units are discarded
#[test]
fn test_mask_applies_to_scripted_raw_detections() {
    let (n_pt, n_rep) = (4, 3);
    // Z draws come first: units 0 and 2 occupied, 1 and 3 not; every raw draw is a detection
    let mut outcomes = vec![true, false, true, false];
    outcomes.extend(std::iter::repeat(true).take(n_pt * n_rep));
    let mut source = ScriptedDraws { outcomes, next: 0 };

    let generator = generator(SimulationConfig { n_pt, n_rep, ..Default::default() });
    let dataset = generator.generate(&mut source).unwrap();

    assert_eq!(dataset.occupancy, vec![true, false, true, false]);
    for i in 0..n_pt {
        assert_eq!(dataset.detections_at(i), if dataset.occupancy[i] { n_rep } else { 0 });
    }
    assert_eq!(source.next, n_pt + n_pt * n_rep);
}

/// Probabilities stay strictly inside (0, 1) even for extreme coefficients
#[test]
fn test_probabilities_inside_open_interval() {
    for (alpha, beta) in [(0.0, 1.0), (60.0, 40.0), (-60.0, -40.0), (800.0, 0.0), (-800.0, 0.0)] {
        let generator = generator(SimulationConfig {
            n_pt: 100,
            n_rep: 3,
            alpha_occ: alpha,
            beta_occ: beta,
            alpha_det: alpha,
            beta_det_1: beta,
            beta_det_2: beta,
            ..Default::default()
        });
        let dataset = generator.generate(&mut RandomSource::from_seed(5)).unwrap();

        for &psi in &dataset.psi {
            assert!(psi > 0.0 && psi < 1.0, "psi = {} for alpha {}", psi, alpha);
        }
        for &theta in dataset.theta.iter() {
            assert!(theta > 0.0 && theta < 1.0, "theta = {} for alpha {}", theta, alpha);
        }
    }
}

/// Saturated probabilities produce the degenerate outcomes
#[test]
fn test_saturated_coefficients() {
    let always = generator(SimulationConfig {
        n_pt: 50,
        n_rep: 2,
        alpha_occ: 800.0,
        beta_occ: 0.0,
        alpha_det: 800.0,
        beta_det_1: 0.0,
        beta_det_2: 0.0,
        ..Default::default()
    });
    let dataset = always.generate(&mut RandomSource::from_seed(1)).unwrap();
    assert_eq!(dataset.occupied_count(), 50);
    assert_eq!(dataset.total_detections(), 100);

    let never = generator(SimulationConfig {
        n_pt: 50,
        n_rep: 2,
        alpha_occ: -800.0,
        beta_occ: 0.0,
        ..Default::default()
    });
    let dataset = never.generate(&mut RandomSource::from_seed(1)).unwrap();
    assert_eq!(dataset.occupied_count(), 0);
    assert_eq!(dataset.total_detections(), 0);
}

/// psi rises with pt_cov when beta_occ > 0
#[test]
fn test_psi_monotone_in_unit_covariate() {
    let generator = generator(SimulationConfig { n_pt: 500, ..Default::default() });
    let dataset = generator.generate(&mut RandomSource::from_seed(17)).unwrap();

    let mut pairs: Vec<(f64, f64)> = dataset
        .unit_covariate
        .iter()
        .copied()
        .zip(dataset.psi.iter().copied())
        .collect();
    pairs.sort_by(|a, b| a.0.total_cmp(&b.0));

    for window in pairs.windows(2) {
        assert!(window[0].1 <= window[1].1, "psi decreased between {:?} and {:?}", window[0], window[1]);
    }
}

/// With beta_det_1 < 0 and beta_det_2 > 0, theta falls in pt_cov and rises in event_cov
#[test]
fn test_theta_monotone_in_both_covariates() {
    let generator = generator(SimulationConfig { n_pt: 3, n_rep: 3, ..Default::default() });
    let pt_cov = vec![-1.0, 0.0, 1.0];
    let event_cov = Matrix::from_rows(vec![vec![-1.0, 0.0, 1.0]; 3]).unwrap();

    let dataset = generator
        .generate_with_covariates(pt_cov, event_cov, &mut RandomSource::from_seed(3))
        .unwrap();

    for i in 0..3 {
        for j in 1..3 {
            assert!(dataset.theta[(i, j)] > dataset.theta[(i, j - 1)]);
        }
    }
    for j in 0..3 {
        for i in 1..3 {
            assert!(dataset.theta[(i, j)] < dataset.theta[(i - 1, j)]);
        }
    }
}

/// Moving one unit's covariate shifts logit(theta) by beta_det_1 times the move
/// on every event of that unit and leaves the other units untouched
#[test]
fn test_unit_covariate_broadcast_across_events() {
    let config = SimulationConfig {
        n_pt: 4,
        n_rep: 5,
        alpha_det: 0.2,
        beta_det_1: -0.8,
        beta_det_2: 0.6,
        ..Default::default()
    };
    let generator = generator(config.clone());
    let pt_cov = vec![-1.2, 0.3, 0.9, -0.4];
    let event_cov =
        Matrix::from_fn(4, 5, |i, j| ((i * 5 + j) as f64 * 0.37).sin() * 1.5);

    let moved_unit = 2;
    let shift = 1.25;
    let mut moved_pt_cov = pt_cov.clone();
    moved_pt_cov[moved_unit] += shift;

    let base = generator
        .generate_with_covariates(pt_cov, event_cov.clone(), &mut RandomSource::from_seed(9))
        .unwrap();
    let moved = generator
        .generate_with_covariates(moved_pt_cov, event_cov, &mut RandomSource::from_seed(9))
        .unwrap();

    for j in 0..5 {
        let delta = logit(moved.theta[(moved_unit, j)]) - logit(base.theta[(moved_unit, j)]);
        assert!(
            (delta - config.beta_det_1 * shift).abs() < 1e-9,
            "event {}: logit moved by {}, expected {}",
            j,
            delta,
            config.beta_det_1 * shift
        );
    }
    for i in (0..4).filter(|&i| i != moved_unit) {
        assert_eq!(moved.theta.row(i), base.theta.row(i), "unit {} changed", i);
        assert_eq!(moved.psi[i], base.psi[i]);
    }
}

/// The smallest design still honours the mask
#[test]
fn test_single_unit_single_event() {
    let generator = generator(SimulationConfig { n_pt: 1, n_rep: 1, ..Default::default() });

    for seed in 0..50 {
        let dataset = generator.generate(&mut RandomSource::from_seed(seed)).unwrap();

        assert_eq!(dataset.observations.shape(), (1, 1));
        assert_eq!(dataset.theta.shape(), (1, 1));
        assert_eq!(dataset.psi.len(), 1);
        assert!(!dataset.observations[(0, 0)] || dataset.occupancy[0]);
    }
}

/// Zero units or events is an error, never an empty dataset
#[test]
fn test_empty_design_rejected() {
    let result = OccupancyDataGenerator::new(SimulationConfig { n_pt: 0, ..Default::default() });
    assert!(matches!(
        result,
        Err(SimulationError::InvalidConfiguration(ConfigValidationError::InvalidUnitCount(0)))
    ));

    let result = OccupancyDataGenerator::new(SimulationConfig { n_rep: 0, ..Default::default() });
    assert!(matches!(
        result,
        Err(SimulationError::InvalidConfiguration(ConfigValidationError::InvalidEventCount(0)))
    ));
}

/// Supplied covariates must match the design and be finite
#[test]
fn test_supplied_covariates_checked() {
    let generator = generator(SimulationConfig { n_pt: 2, n_rep: 2, ..Default::default() });
    let event_cov = Matrix::from_rows(vec![vec![0.0, 0.0], vec![0.0, 0.0]]).unwrap();

    let short = generator.generate_with_covariates(
        vec![0.0],
        event_cov.clone(),
        &mut RandomSource::from_seed(1),
    );
    assert!(matches!(
        short,
        Err(SimulationError::InvalidConfiguration(ConfigValidationError::CovariateShape { .. }))
    ));

    let nan = generator.generate_with_covariates(
        vec![0.0, f64::NAN],
        event_cov,
        &mut RandomSource::from_seed(1),
    );
    assert!(matches!(
        nan,
        Err(SimulationError::InvalidConfiguration(ConfigValidationError::NonFiniteCovariate {
            index: 1,
            ..
        }))
    ));
}
