//! Reading sample files.

use crate::settings::Settings;
use fontus_chem::Sample;
use log::{info, warn};

/// Parse samples from CSV text and add the derived time fields.
pub fn parse_samples(csv_data: &str, settings: &Settings) -> anyhow::Result<Vec<Sample>> {
    let mut samples = Sample::parse_sample_csv(csv_data, &settings.sample_columns())
        .map_err(|e| anyhow::anyhow!("Failed to parse samples CSV: {}", e))?;
    for sample in samples.iter_mut() {
        sample.add_time_fields(settings.hemisphere);
    }
    report_non_numeric(&samples);
    Ok(samples)
}

/// Read and parse the samples CSV at `path`.
pub fn read_samples(path: &str, settings: &Settings) -> anyhow::Result<Vec<Sample>> {
    let data = std::fs::read_to_string(path).map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path, e))?;
    let samples = parse_samples(&data, settings)?;
    info!("Read {} samples from {}", samples.len(), path);
    Ok(samples)
}

fn report_non_numeric(samples: &[Sample]) {
    for sample in samples {
        for (ion, value) in &sample.concentrations {
            if value.is_nan() {
                warn!("sample {}: {} is not a number", sample.id, ion);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fontus_chem::IonKey;

    #[test]
    fn test_parse_samples_adds_time_fields() {
        let csv = "\
sample_id,station,sample_date,ca,mg,na,cl,so4,hco3
S1,Well A,2021-07-04,40.1,12.2,23.0,35.5,48.0,183.0
S2,Well B,,52.0,10.0,18.5,41.0,60.0,201.0
";
        let samples = parse_samples(csv, &Settings::default()).unwrap();
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].group("year"), Some("2021"));
        assert_eq!(samples[0].group("month"), Some("7"));
        assert_eq!(samples[0].group("season"), Some("summer"));
        assert_eq!(samples[0].group("station"), Some("Well A"));
        assert_eq!(samples[1].group("year"), None);
        assert_eq!(samples[1].concentration(IonKey::Hco3), Some(201.0));
    }

    #[test]
    fn test_parse_samples_keeps_non_numeric_as_nan() {
        let csv = "sample_id,ca,mg\nS1,abc,n/a\n";
        let samples = parse_samples(csv, &Settings::default()).unwrap();
        assert!(samples[0].concentration(IonKey::Ca).unwrap().is_nan());
        assert_eq!(samples[0].concentration(IonKey::Mg), None);
    }
}
