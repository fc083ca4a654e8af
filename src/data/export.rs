//! Writers for the observation table and the answer key
//!
//! The observation table (what a fitting routine is allowed to see) and the
//! latent truth go to separate outputs so the truth cannot leak into a fit.

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

use super::SimulatedDataset;
use crate::fitting::FittingInput;
use crate::simulation::SimulationResult;
use crate::types::OutputFormat;

/// CSV header of the long-format observation table
pub const CSV_HEADER: &str = "unit,event,pt_cov,event_cov,detected";

/// Ground truth for one sampling unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitTruth {
    /// Unit index (row of the observation table)
    pub unit: usize,
    /// Latent occupancy state
    pub occupied: bool,
    /// Occupancy probability
    pub psi: f64,
    /// Unit covariate
    pub pt_cov: f64,
}

/// One [`UnitTruth`] per unit, in unit order
pub fn unit_truths(dataset: &SimulatedDataset) -> Vec<UnitTruth> {
    dataset
        .occupancy
        .iter()
        .zip(&dataset.psi)
        .zip(&dataset.unit_covariate)
        .enumerate()
        .map(|(unit, ((&occupied, &psi), &pt_cov))| UnitTruth { unit, occupied, psi, pt_cov })
        .collect()
}

/// Write the observation table in the requested format
pub fn write_observations<W: Write>(
    input: &FittingInput,
    format: OutputFormat,
    writer: W,
) -> SimulationResult<()> {
    match format {
        OutputFormat::Json => write_json(input, writer),
        OutputFormat::Csv => write_csv(input, writer),
    }
}

/// Pretty-printed JSON document of the observation table
pub fn write_json<W: Write>(input: &FittingInput, mut writer: W) -> SimulationResult<()> {
    serde_json::to_writer_pretty(&mut writer, input)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

/// Long-format CSV, one row per unit-event pair in row-major order
pub fn write_csv<W: Write>(input: &FittingInput, mut writer: W) -> SimulationResult<()> {
    writeln!(writer, "{}", CSV_HEADER)?;
    for (unit, row) in input.detections.iter_rows().enumerate() {
        let pt_cov = input.pt_cov[unit];
        for (event, &detected) in row.iter().enumerate() {
            writeln!(
                writer,
                "{},{},{},{},{}",
                unit,
                event,
                pt_cov,
                input.event_cov[(unit, event)],
                detected
            )?;
        }
    }
    writer.flush()?;
    Ok(())
}

/// Answer key as JSON lines, one [`UnitTruth`] per line
pub fn write_truth_jsonl<W: Write>(dataset: &SimulatedDataset, mut writer: W) -> SimulationResult<()> {
    for truth in unit_truths(dataset) {
        let line = serde_json::to_string(&truth)?;
        writeln!(writer, "{}", line)?;
    }
    writer.flush()?;
    Ok(())
}

/// Write the observation table to a file
pub fn save_observations<P: AsRef<Path>>(
    input: &FittingInput,
    format: OutputFormat,
    path: P,
) -> SimulationResult<()> {
    let path = path.as_ref();
    let file = File::create(path)?;
    write_observations(input, format, BufWriter::new(file))?;
    info!(path = %path.display(), format = %format, "Observation table written");
    Ok(())
}

/// Write the answer key to a file
pub fn save_truth<P: AsRef<Path>>(dataset: &SimulatedDataset, path: P) -> SimulationResult<()> {
    let path = path.as_ref();
    let file = File::create(path)?;
    write_truth_jsonl(dataset, BufWriter::new(file))?;
    info!(path = %path.display(), units = dataset.n_pt(), "Answer key written");
    Ok(())
}
