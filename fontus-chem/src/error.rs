use crate::ion::IonKey;
use std::fmt;

/// Errors raised while looking up ions or converting concentrations.
#[derive(Debug, Clone, PartialEq)]
pub enum ChemError {
    /// The ion key is not part of the registry.
    InvalidIon(String),
    /// A mass concentration is negative, NaN or infinite.
    InvalidConcentration { ion: IonKey, value: f64 },
    /// A registry entry has a non-positive formula weight or valence.
    InvalidIonSpec { ion: IonKey, reason: String },
    /// The carbonate basis is neither `hco3` nor `alk`.
    UnknownCarbonateBasis(String),
    /// The registry or sample CSV could not be read.
    Registry(String),
}

impl fmt::Display for ChemError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChemError::InvalidIon(key) => write!(f, "Invalid ion: {:?} is not in the ion registry", key),
            ChemError::InvalidConcentration { ion, value } => {
                write!(f, "Invalid concentration for {}: {} mg/L", ion, value)
            }
            ChemError::InvalidIonSpec { ion, reason } => write!(f, "Invalid ion spec for {}: {}", ion, reason),
            ChemError::UnknownCarbonateBasis(value) => {
                write!(f, "Unknown carbonate basis {:?}, expected \"hco3\" or \"alk\"", value)
            }
            ChemError::Registry(msg) => write!(f, "Registry error: {}", msg),
        }
    }
}

impl std::error::Error for ChemError {}

impl From<csv::Error> for ChemError {
    fn from(err: csv::Error) -> Self {
        ChemError::Registry(err.to_string())
    }
}
