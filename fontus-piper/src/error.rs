use fontus_chem::{ChemError, IonGroup, IonKey};
use std::fmt;

/// Reasons a single sample is left out of the diagram.
///
/// These never abort a batch; they are collected next to the projected samples.
#[derive(Debug, Clone, PartialEq)]
pub enum SampleError {
    /// A required ion has no value.
    MissingIon(IonKey),
    /// A concentration is negative, NaN or infinite.
    InvalidConcentration { ion: IonKey, value: f64 },
    /// The cation or anion charge-equivalents sum to zero.
    DegenerateGroup(IonGroup),
}

impl fmt::Display for SampleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SampleError::MissingIon(ion) => write!(f, "missing value for {}", ion),
            SampleError::InvalidConcentration { ion, value } => {
                write!(f, "invalid concentration for {}: {} mg/L", ion, value)
            }
            SampleError::DegenerateGroup(group) => write!(f, "{} sum is zero", group),
        }
    }
}

impl std::error::Error for SampleError {}

/// Errors that make a whole batch unusable.
#[derive(Debug, Clone, PartialEq)]
pub enum BatchError {
    /// The registry has no entry for an ion the diagram needs.
    InvalidIon(String),
    /// The diagram layout is not drawable.
    InvalidLayout(String),
    /// Any other registry problem.
    Registry(String),
}

impl fmt::Display for BatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BatchError::InvalidIon(key) => write!(f, "ion registry has no entry for {}", key),
            BatchError::InvalidLayout(msg) => write!(f, "invalid diagram layout: {}", msg),
            BatchError::Registry(msg) => write!(f, "registry error: {}", msg),
        }
    }
}

impl std::error::Error for BatchError {}

impl From<ChemError> for BatchError {
    fn from(err: ChemError) -> Self {
        match err {
            ChemError::InvalidIon(key) => BatchError::InvalidIon(key),
            other => BatchError::Registry(other.to_string()),
        }
    }
}
