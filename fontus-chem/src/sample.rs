use crate::error::ChemError;
use crate::ion::IonKey;
use chrono::NaiveDate;
use csv::ReaderBuilder;
use fontus_utils::dates::{parse_sample_date, time_fields, Hemisphere};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// How inorganic carbon is represented in a dataset.
///
/// Chosen once for the whole dataset; a sample carrying both `hco3` and `alk`
/// only ever contributes the column selected here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum CarbonateBasis {
    /// HCO3, plus CO3 when present
    #[default]
    #[serde(rename = "hco3")]
    Hco3Co3,
    /// Total alkalinity
    #[serde(rename = "alk")]
    Alkalinity,
}

impl CarbonateBasis {
    pub fn label(&self) -> &'static str {
        match self {
            CarbonateBasis::Hco3Co3 => "HCO3- + CO3--",
            CarbonateBasis::Alkalinity => "Alkalinity",
        }
    }
}

impl fmt::Display for CarbonateBasis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for CarbonateBasis {
    type Err = ChemError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "hco3" => Ok(CarbonateBasis::Hco3Co3),
            "alk" => Ok(CarbonateBasis::Alkalinity),
            _ => Err(ChemError::UnknownCarbonateBasis(s.to_string())),
        }
    }
}

impl TryFrom<String> for CarbonateBasis {
    type Error = ChemError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Normalised name of a sample column or grouping field.
///
/// Headers are matched case-insensitively, so `Station` and `station` name the
/// same field.
pub fn field_key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// One water-quality observation.
///
/// Concentrations are in mg/L; an ion without a value is simply absent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sample {
    pub id: String,
    pub concentrations: BTreeMap<IonKey, f64>,
    /// Grouping fields (station, aquifer, ...) used for legends and plot splits
    pub groups: BTreeMap<String, String>,
    pub date: Option<NaiveDate>,
}

impl Sample {
    pub fn new(id: impl Into<String>) -> Self {
        Sample {
            id: id.into(),
            concentrations: BTreeMap::new(),
            groups: BTreeMap::new(),
            date: None,
        }
    }

    pub fn with_concentration(mut self, ion: IonKey, mass_mgpl: f64) -> Self {
        self.concentrations.insert(ion, mass_mgpl);
        self
    }

    pub fn with_group(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        let field: String = field.into();
        self.groups.insert(field_key(&field), value.into());
        self
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn concentration(&self, ion: IonKey) -> Option<f64> {
        self.concentrations.get(&ion).copied()
    }

    pub fn group(&self, field: &str) -> Option<&str> {
        self.groups.get(&field_key(field)).map(String::as_str)
    }

    /// Add `year`, `month` and `season` group fields from the sample date.
    /// Fields the sample already carries are left alone.
    pub fn add_time_fields(&mut self, hemisphere: Hemisphere) {
        if let Some(date) = self.date {
            for (field, value) in time_fields(&date, hemisphere) {
                self.groups.entry(field.to_string()).or_insert(value);
            }
        }
    }

    /// Parse a concentration cell. Empty and null markers are missing values;
    /// anything else that is not a number becomes NaN so that it is reported
    /// downstream instead of being dropped.
    pub fn parse_concentration(ess: &str) -> Option<f64> {
        let ess_lowered = ess.trim().to_lowercase();
        match ess_lowered.as_str() {
            "" | "null" | "na" | "n/a" | "none" => None,
            s => Some(s.parse::<f64>().unwrap_or(f64::NAN)),
        }
    }

    /// Parse a CSV string of samples in the one-row-per-sample format.
    ///
    /// Columns named after an ion key (case-insensitive) are concentrations,
    /// the `id_field` column is the sample identifier (the 1-based row number
    /// when absent), the `date_field` column is the sample date, and every
    /// other column becomes a grouping field.
    ///
    /// # Example CSV
    /// ```text
    /// sample_id,station,ca,mg,na,k,hco3,so4,cl
    /// S1,Well A,40.1,12.2,23.0,1.1,183.0,48.0,35.5
    /// ```
    pub fn parse_sample_csv(csv_object: &str, columns: &SampleColumns) -> Result<Vec<Sample>, ChemError> {
        let mut rdr = ReaderBuilder::new()
            .delimiter(columns.delimiter)
            .has_headers(true)
            .flexible(true)
            .from_reader(csv_object.as_bytes());
        let headers: Vec<String> = rdr
            .headers()?
            .iter()
            .map(field_key)
            .collect();
        let id_field = field_key(&columns.id_field);
        let date_field = columns.date_field.as_deref().map(field_key);

        let mut samples: Vec<Sample> = Vec::new();
        for (row_number, row) in rdr.records().enumerate() {
            let record = row?;
            let mut sample = Sample::new((row_number + 1).to_string());
            for (header, cell) in headers.iter().zip(record.iter()) {
                if *header == id_field {
                    if !cell.trim().is_empty() {
                        sample.id = cell.trim().to_string();
                    }
                } else if Some(header) == date_field.as_ref() {
                    if cell.trim().is_empty() {
                        continue;
                    }
                    match parse_sample_date(cell) {
                        Ok(date) => sample.date = Some(date),
                        Err(e) => log::warn!("sample row {}: {}", row_number + 1, e),
                    }
                } else if let Ok(ion) = header.parse::<IonKey>() {
                    if let Some(value) = Sample::parse_concentration(cell) {
                        sample.concentrations.insert(ion, value);
                    }
                } else if !cell.trim().is_empty() {
                    sample.groups.insert(header.clone(), cell.trim().to_string());
                }
            }
            samples.push(sample);
        }
        log::info!("sample loader: parsed {} samples", samples.len());
        Ok(samples)
    }
}

/// Column conventions for the sample CSV.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleColumns {
    pub id_field: String,
    pub date_field: Option<String>,
    pub delimiter: u8,
}

impl Default for SampleColumns {
    fn default() -> Self {
        SampleColumns {
            id_field: "sample_id".to_string(),
            date_field: Some("sample_date".to_string()),
            delimiter: b',',
        }
    }
}
