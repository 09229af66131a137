//! The `irrigation` command: SAR and RSC per sample.

use crate::input::read_samples;
use crate::settings::Settings;
use fontus_chem::irrigation::{irrigation_indices, IrrigationIndices};
use fontus_chem::{IonRegistry, Sample};
use fontus_utils::numeric::round_to;
use log::{info, warn};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Indices of every sample; samples with invalid concentrations are skipped.
pub fn compute_indices(samples: &[Sample], registry: &IonRegistry, settings: &Settings) -> Vec<IrrigationIndices> {
    samples
        .iter()
        .filter_map(|sample| {
            match irrigation_indices(sample, registry, settings.carbonate_basis, settings.alkalinity_unit) {
                Ok(indices) => Some(indices),
                Err(e) => {
                    warn!("irrigation: skipped sample {}: {}", sample.id, e);
                    None
                }
            }
        })
        .collect()
}

fn cell(value: Option<f64>) -> String {
    value.map(|v| round_to(v, 3).to_string()).unwrap_or_default()
}

/// Write `sample_id,sar,sar_class,rsc,rsc_class`; undefined indices are empty.
pub fn write_indices_csv<W: Write>(writer: W, rows: &[IrrigationIndices]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(["sample_id", "sar", "sar_class", "rsc", "rsc_class"])?;
    for row in rows {
        wtr.write_record([
            row.sample_id.clone(),
            cell(row.sar),
            row.sar_class.map(|c| c.to_string()).unwrap_or_default(),
            cell(row.rsc),
            row.rsc_class.map(|c| c.to_string()).unwrap_or_default(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn run_irrigation(samples_csv: &str, output: &str, config: Option<&str>) -> anyhow::Result<()> {
    let settings = Settings::load(config)?;
    let registry = settings.registry(config.and_then(|c| Path::new(c).parent()))?;
    let samples = read_samples(samples_csv, &settings)?;
    let rows = compute_indices(&samples, &registry, &settings);
    write_indices_csv(BufWriter::new(File::create(output)?), &rows)?;
    info!("Irrigation indices for {} of {} samples. Output: {}", rows.len(), samples.len(), output);
    Ok(())
}
