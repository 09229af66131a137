//! Irrigation suitability indices.
//!
//! Classification bands follow the Oklahoma State turf water-quality tables
//! for SAR and Lloyd & Heathcote for RSC.

use crate::equivalents::{carbonate_meq, ion_meq, AlkalinityUnit};
use crate::error::ChemError;
use crate::ion::{IonKey, IonRegistry};
use crate::sample::{CarbonateBasis, Sample};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SarClass {
    Excellent,
    Good,
    Fair,
    Poor,
    VeryPoor,
    Unacceptable,
}

impl SarClass {
    pub fn classify(sar: f64) -> SarClass {
        if sar < 1.0 {
            SarClass::Excellent
        } else if sar < 2.0 {
            SarClass::Good
        } else if sar < 4.0 {
            SarClass::Fair
        } else if sar < 8.0 {
            SarClass::Poor
        } else if sar < 15.0 {
            SarClass::VeryPoor
        } else {
            SarClass::Unacceptable
        }
    }
}

impl fmt::Display for SarClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SarClass::Excellent => "Excellent",
            SarClass::Good => "Good",
            SarClass::Fair => "Fair",
            SarClass::Poor => "Poor",
            SarClass::VeryPoor => "Very Poor",
            SarClass::Unacceptable => "Unacceptable",
        };
        write!(f, "{}", label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RscClass {
    Suitable,
    Marginal,
    NotSuitable,
}

impl RscClass {
    pub fn classify(rsc: f64) -> RscClass {
        if rsc < 1.25 {
            RscClass::Suitable
        } else if rsc < 2.5 {
            RscClass::Marginal
        } else {
            RscClass::NotSuitable
        }
    }
}

impl fmt::Display for RscClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RscClass::Suitable => "Suitable",
            RscClass::Marginal => "Marginal",
            RscClass::NotSuitable => "Not suitable",
        };
        write!(f, "{}", label)
    }
}

/// Sodium adsorption ratio, all inputs in meq/L.
///
/// Undefined unless sodium, calcium and magnesium are all present.
pub fn sodium_adsorption_ratio(na_meq: f64, ca_meq: f64, mg_meq: f64) -> Option<f64> {
    if na_meq > 0.0 && ca_meq > 0.0 && mg_meq > 0.0 {
        Some(na_meq / (0.5 * (ca_meq + mg_meq)).sqrt())
    } else {
        None
    }
}

/// Residual sodium carbonate in meq/L.
pub fn residual_sodium_carbonate(carbonate_meq: f64, ca_meq: f64, mg_meq: f64) -> f64 {
    carbonate_meq - (ca_meq + mg_meq)
}

/// SAR and RSC of one sample with their classifications.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IrrigationIndices {
    pub sample_id: String,
    pub sar: Option<f64>,
    pub sar_class: Option<SarClass>,
    pub rsc: Option<f64>,
    pub rsc_class: Option<RscClass>,
}

/// Compute the irrigation indices of a sample.
///
/// Missing ions leave the affected index undefined; negative or non-finite
/// concentrations are errors.
pub fn irrigation_indices(
    sample: &Sample,
    registry: &IonRegistry,
    basis: CarbonateBasis,
    unit: AlkalinityUnit,
) -> Result<IrrigationIndices, ChemError> {
    let na = ion_meq(sample, registry.get(IonKey::Na)?)?;
    let ca = ion_meq(sample, registry.get(IonKey::Ca)?)?;
    let mg = ion_meq(sample, registry.get(IonKey::Mg)?)?;
    let carbonate = carbonate_meq(sample, registry, basis, unit)?;

    let (sar, rsc) = match (na, ca, mg) {
        (Some(na), Some(ca), Some(mg)) => {
            let sar = sodium_adsorption_ratio(na, ca, mg);
            let rsc = match (sar, carbonate) {
                (Some(_), Some(carbonate)) if carbonate > 0.0 => {
                    Some(residual_sodium_carbonate(carbonate, ca, mg))
                }
                _ => None,
            };
            (sar, rsc)
        }
        _ => (None, None),
    };

    Ok(IrrigationIndices {
        sample_id: sample.id.clone(),
        sar,
        sar_class: sar.map(SarClass::classify),
        rsc,
        rsc_class: rsc.map(RscClass::classify),
    })
}
