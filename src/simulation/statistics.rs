//! Statistics collection and reporting
//!
//! Summaries of a generated dataset that make the closure argument concrete:
//! how many occupied units exist, how many of them the survey actually
//! detected, and how detection probability accumulates over repeat events.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::data::SimulatedDataset;

/// Summary statistics for one simulated dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetStatistics {
    /// Number of sampling units
    pub units: usize,
    /// Number of events per unit
    pub events_per_unit: usize,
    /// Number of truly occupied units
    pub occupied_units: usize,
    /// Number of units with at least one detection
    pub detected_units: usize,
    /// Occupied units whose every event was a non-detection
    pub missed_occupied_units: usize,
    /// Total detections across all unit-event pairs
    pub total_detections: usize,
    /// Mean occupancy probability over units
    pub mean_psi: f64,
    /// Mean detection probability over unit-event pairs
    pub mean_theta: f64,
    /// Mean probability, over occupied units, of at least one detection
    pub mean_cumulative_detection: f64,
    /// `detection_frequency[k]` is the number of units detected exactly `k` times
    pub detection_frequency: Vec<usize>,
}

impl DatasetStatistics {
    /// Compute statistics for a dataset
    pub fn from_dataset(dataset: &SimulatedDataset) -> Self {
        let units = dataset.n_pt();
        let events_per_unit = dataset.n_rep();

        let mut detection_frequency = vec![0; events_per_unit + 1];
        let mut missed_occupied_units = 0;
        let mut cumulative_sum = 0.0;

        for history in dataset.observations.iter_rows() {
            detection_frequency[history.iter().filter(|&&d| d).count()] += 1;
        }

        // Tables that disagree in length are cut to the shortest
        let units_with_truth = dataset
            .occupancy
            .iter()
            .zip(dataset.observations.iter_rows())
            .zip(dataset.theta.iter_rows());
        for ((&occupied, history), theta) in units_with_truth {
            if occupied {
                if !history.iter().any(|&d| d) {
                    missed_occupied_units += 1;
                }
                let never_detected: f64 = theta.iter().map(|t| 1.0 - t).product();
                cumulative_sum += 1.0 - never_detected;
            }
        }

        let occupied_units = dataset.occupied_count();

        Self {
            units,
            events_per_unit,
            occupied_units,
            detected_units: dataset.detected_count(),
            missed_occupied_units,
            total_detections: dataset.total_detections(),
            mean_psi: mean(dataset.psi.iter().copied()),
            mean_theta: mean(dataset.theta.iter().copied()),
            mean_cumulative_detection: if occupied_units == 0 {
                0.0
            } else {
                cumulative_sum / occupied_units as f64
            },
            detection_frequency,
        }
    }

    /// Proportion of units truly occupied
    pub fn true_occupancy(&self) -> f64 {
        ratio(self.occupied_units, self.units)
    }

    /// Proportion of units with at least one detection
    ///
    /// Never exceeds [`true_occupancy`](Self::true_occupancy): detections are
    /// impossible at unoccupied units.
    pub fn naive_occupancy(&self) -> f64 {
        ratio(self.detected_units, self.units)
    }

    /// Proportion of detections among all unit-event pairs
    pub fn detection_rate(&self) -> f64 {
        ratio(self.total_detections, self.units * self.events_per_unit)
    }

    /// Multi-line summary for the console
    pub fn summary_report(&self) -> String {
        let mut report = String::new();
        report.push_str("Dataset Summary\n");
        report.push_str("===============\n");
        report.push_str(&format!(
            "  Design: {} units x {} events\n",
            self.units, self.events_per_unit
        ));
        report.push_str(&format!(
            "  Occupied units: {} ({:.1}%)\n",
            self.occupied_units,
            self.true_occupancy() * 100.0
        ));
        report.push_str(&format!(
            "  Detected units: {} ({:.1}% naive occupancy)\n",
            self.detected_units,
            self.naive_occupancy() * 100.0
        ));
        report.push_str(&format!(
            "  Occupied but never detected: {}\n",
            self.missed_occupied_units
        ));
        report.push_str(&format!(
            "  Detections: {} ({:.1}% of events)\n",
            self.total_detections,
            self.detection_rate() * 100.0
        ));
        report.push_str(&format!("  Mean psi: {:.3}\n", self.mean_psi));
        report.push_str(&format!("  Mean theta: {:.3}\n", self.mean_theta));
        report.push_str(&format!(
            "  Mean P(detected at least once | occupied): {:.3}\n",
            self.mean_cumulative_detection
        ));
        report.push_str("  Detection frequency:");
        for (k, count) in self.detection_frequency.iter().enumerate() {
            report.push_str(&format!(" {}:{}", k, count));
        }
        report.push('\n');
        report
    }
}

impl fmt::Display for DatasetStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} units, {} occupied, {} detected, {} detections",
            self.units, self.occupied_units, self.detected_units, self.total_detections
        )
    }
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}
