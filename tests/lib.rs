// Integration tests test your crate's public API. They only have access to items
// in your crate that are marked pub. See the Cargo Targets page of the Cargo Book
// for more information.
//
//   https://doc.rust-lang.org/cargo/reference/cargo-targets.html#integration-tests
//

use occupancy_closure_sim::*;

mod generator_invariant_tests;

#[test]
fn test_run_id_format() {
    let run_id = RunId::new();

    assert_ne!(run_id, RunId::new());
    assert!(run_id.to_string().starts_with("RUN_"));
}

#[test]
fn test_output_formats() {
    for (text, format) in [("json", OutputFormat::Json), ("CSV", OutputFormat::Csv)] {
        assert_eq!(text.parse::<OutputFormat>().unwrap(), format);
        assert!(!format.to_string().is_empty());
    }
    assert!("parquet".parse::<OutputFormat>().is_err());
}

#[test]
fn test_default_configuration_is_worked_example() {
    let config = SimulationConfig::default();

    assert_eq!(config.design(), (200, 4));
    assert_eq!(
        config.coefficients(),
        ModelCoefficients {
            alpha_occ: 0.0,
            beta_occ: 1.0,
            alpha_det: -1.0,
            beta_det_1: -1.0,
            beta_det_2: 0.5,
        }
    );
    config.validate().unwrap();
}

#[test]
fn test_end_to_end_generation_and_statistics() {
    let config = SimulationConfig { seed: Some(2024), ..Default::default() };
    let generator = OccupancyDataGenerator::new(config).unwrap();
    let dataset = generator.generate(&mut RandomSource::from_seed(2024)).unwrap();

    assert!(dataset.has_consistent_shape());
    assert!(dataset.masking_violations().is_empty());

    let stats = DatasetStatistics::from_dataset(&dataset);
    assert_eq!(stats.units, 200);
    assert_eq!(stats.detection_frequency.iter().sum::<usize>(), 200);
    assert!(stats.detected_units <= stats.occupied_units);
}
