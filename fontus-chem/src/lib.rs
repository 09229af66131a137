//! Water chemistry primitives shared by the Fontus crates.
//!
//! - `ion`: the major-ion registry (formula weight, valence, group)
//! - `equivalents`: mg/L to meq/L conversion and carbonate handling
//! - `sample`: one water-quality observation and its CSV loader
//! - `irrigation`: SAR and RSC irrigation suitability indices
//! - `error`: the chemistry error type

pub mod equivalents;
pub mod error;
pub mod ion;
pub mod irrigation;
pub mod sample;

pub use equivalents::{to_meq, AlkalinityUnit};
pub use error::ChemError;
pub use ion::{IonGroup, IonKey, IonRegistry, IonSpec};
pub use sample::{field_key, CarbonateBasis, Sample, SampleColumns};
