//! Mass concentration (mg/L) to charge-equivalent concentration (meq/L).

use crate::error::ChemError;
use crate::ion::{IonKey, IonRegistry, IonSpec};
use crate::sample::{CarbonateBasis, Sample};
use serde::{Deserialize, Serialize};

impl IonSpec {
    /// Convert a mass concentration to meq/L:
    /// `mass / formula_weight * valence`.
    pub fn to_meq(&self, mass_mgpl: f64) -> Result<f64, ChemError> {
        if !mass_mgpl.is_finite() || mass_mgpl < 0.0 {
            return Err(ChemError::InvalidConcentration {
                ion: self.key,
                value: mass_mgpl,
            });
        }
        Ok(mass_mgpl / self.formula_weight * self.valence as f64)
    }
}

/// Convert a mass concentration of the ion named `ion` to meq/L.
pub fn to_meq(mass_mgpl: f64, ion: &str, registry: &IonRegistry) -> Result<f64, ChemError> {
    registry.get_by_name(ion)?.to_meq(mass_mgpl)
}

/// Unit in which alkalinity values are reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AlkalinityUnit {
    #[default]
    #[serde(rename = "mg/L CaCO3")]
    MgPerLCaCO3,
    #[serde(rename = "meq/L")]
    MeqPerL,
}

/// meq/L of one ion in a sample, `None` when the sample has no value for it.
pub fn ion_meq(sample: &Sample, spec: &IonSpec) -> Result<Option<f64>, ChemError> {
    sample
        .concentration(spec.key)
        .map(|mass| spec.to_meq(mass))
        .transpose()
}

/// meq/L of the carbonate end member.
///
/// With `Hco3Co3` this is HCO3 plus CO3 when present; with `Alkalinity` it is
/// the alkalinity value, already in meq/L when `unit` says so. `None` when the
/// principal carbonate value is missing.
pub fn carbonate_meq(
    sample: &Sample,
    registry: &IonRegistry,
    basis: CarbonateBasis,
    unit: AlkalinityUnit,
) -> Result<Option<f64>, ChemError> {
    match basis {
        CarbonateBasis::Hco3Co3 => {
            let hco3 = match ion_meq(sample, registry.get(IonKey::Hco3)?)? {
                Some(value) => value,
                None => return Ok(None),
            };
            let co3 = ion_meq(sample, registry.get(IonKey::Co3)?)?.unwrap_or(0.0);
            Ok(Some(hco3 + co3))
        }
        CarbonateBasis::Alkalinity => match unit {
            AlkalinityUnit::MgPerLCaCO3 => ion_meq(sample, registry.get(IonKey::Alk)?),
            AlkalinityUnit::MeqPerL => sample
                .concentration(IonKey::Alk)
                .map(|value| {
                    if value.is_finite() && value >= 0.0 {
                        Ok(value)
                    } else {
                        Err(ChemError::InvalidConcentration {
                            ion: IonKey::Alk,
                            value,
                        })
                    }
                })
                .transpose(),
        },
    }
}
