use crate::error::ChemError;
use csv::ReaderBuilder;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Major ions used in water analysis, keyed the way sample columns are named.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IonKey {
    Ca,
    Mg,
    Na,
    K,
    Cl,
    So4,
    Hco3,
    Co3,
    /// Total alkalinity, expressed as CaCO3.
    Alk,
}

impl IonKey {
    pub const ALL: [IonKey; 9] = [
        IonKey::Ca,
        IonKey::Mg,
        IonKey::Na,
        IonKey::K,
        IonKey::Cl,
        IonKey::So4,
        IonKey::Hco3,
        IonKey::Co3,
        IonKey::Alk,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            IonKey::Ca => "ca",
            IonKey::Mg => "mg",
            IonKey::Na => "na",
            IonKey::K => "k",
            IonKey::Cl => "cl",
            IonKey::So4 => "so4",
            IonKey::Hco3 => "hco3",
            IonKey::Co3 => "co3",
            IonKey::Alk => "alk",
        }
    }

    pub fn group(&self) -> IonGroup {
        match self {
            IonKey::Ca | IonKey::Mg | IonKey::Na | IonKey::K => IonGroup::Cation,
            _ => IonGroup::Anion,
        }
    }
}

impl fmt::Display for IonKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for IonKey {
    type Err = ChemError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase();
        IonKey::ALL
            .iter()
            .copied()
            .find(|key| key.as_str() == lowered)
            .ok_or_else(|| ChemError::InvalidIon(s.to_string()))
    }
}

/// Charge sign of an ion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IonGroup {
    Cation,
    Anion,
}

impl fmt::Display for IonGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IonGroup::Cation => write!(f, "cation"),
            IonGroup::Anion => write!(f, "anion"),
        }
    }
}

/// Immutable registry entry for one ion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IonSpec {
    pub key: IonKey,
    /// Formula weight in g/mol
    pub formula_weight: f64,
    /// Valence magnitude; the sign follows from `group`
    pub valence: u8,
    pub group: IonGroup,
}

impl IonSpec {
    pub const fn new(key: IonKey, formula_weight: f64, valence: u8, group: IonGroup) -> Self {
        IonSpec {
            key,
            formula_weight,
            valence,
            group,
        }
    }

    /// Rejects entries that would make the meq conversion meaningless.
    pub fn validate(&self) -> Result<(), ChemError> {
        if !self.formula_weight.is_finite() || self.formula_weight <= 0.0 {
            return Err(ChemError::InvalidIonSpec {
                ion: self.key,
                reason: format!("formula weight must be > 0, got {}", self.formula_weight),
            });
        }
        if self.valence == 0 {
            return Err(ChemError::InvalidIonSpec {
                ion: self.key,
                reason: "valence must be > 0".to_string(),
            });
        }
        if self.group != self.key.group() {
            return Err(ChemError::InvalidIonSpec {
                ion: self.key,
                reason: format!("{} is not a {}", self.key, self.group),
            });
        }
        Ok(())
    }
}

/// Default formula weights and valences of the major ions.
///
/// Alkalinity is carried as CaCO3 with an equivalent weight of 50 g/eq.
pub static ION_REGISTRY: &[IonSpec] = &[
    IonSpec::new(IonKey::Ca, 40.078, 2, IonGroup::Cation),
    IonSpec::new(IonKey::Mg, 24.305, 2, IonGroup::Cation),
    IonSpec::new(IonKey::Na, 22.990, 1, IonGroup::Cation),
    IonSpec::new(IonKey::K, 39.098, 1, IonGroup::Cation),
    IonSpec::new(IonKey::Cl, 35.45, 1, IonGroup::Anion),
    IonSpec::new(IonKey::So4, 96.0, 2, IonGroup::Anion),
    IonSpec::new(IonKey::Hco3, 61.0168, 1, IonGroup::Anion),
    IonSpec::new(IonKey::Co3, 60.008, 2, IonGroup::Anion),
    IonSpec::new(IonKey::Alk, 50.0, 1, IonGroup::Anion),
];

/// Lookup table of ion specs, either the built-in one or loaded from CSV.
#[derive(Debug, Clone, PartialEq)]
pub struct IonRegistry {
    specs: Vec<IonSpec>,
}

impl Default for IonRegistry {
    fn default() -> Self {
        IonRegistry {
            specs: ION_REGISTRY.to_vec(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RegistryRow {
    key: String,
    formula_weight: f64,
    valence: u8,
}

impl IonRegistry {
    /// Look up an ion. Fails with `InvalidIon` when the registry has no entry.
    pub fn get(&self, key: IonKey) -> Result<&IonSpec, ChemError> {
        self.specs
            .iter()
            .find(|spec| spec.key == key)
            .ok_or_else(|| ChemError::InvalidIon(key.to_string()))
    }

    /// Look up an ion by its column name.
    pub fn get_by_name(&self, name: &str) -> Result<&IonSpec, ChemError> {
        let key: IonKey = name.parse()?;
        self.get(key)
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// Replace entries of this registry with those of `overrides`, keyed by
    /// ion. Ions `overrides` does not mention keep their current spec.
    pub fn with_overrides(mut self, overrides: IonRegistry) -> IonRegistry {
        for spec in overrides.specs {
            match self.specs.iter_mut().find(|s| s.key == spec.key) {
                Some(existing) => *existing = spec,
                None => self.specs.push(spec),
            }
        }
        self
    }

    /// Parse registry entries.
    ///
    /// Expected CSV columns (with headers): `key,formula_weight,valence`
    ///
    /// # Example CSV
    /// ```text
    /// key,formula_weight,valence
    /// ca,40.078,2
    /// so4,96.06,2
    /// ```
    pub fn parse_registry_csv(csv_object: &str) -> Result<IonRegistry, ChemError> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(csv_object.as_bytes());
        let mut specs: Vec<IonSpec> = Vec::new();
        for row in rdr.deserialize() {
            let row: RegistryRow = row?;
            let key: IonKey = row.key.parse()?;
            if specs.iter().any(|spec| spec.key == key) {
                return Err(ChemError::Registry(format!("duplicate registry entry for {}", key)));
            }
            let spec = IonSpec::new(key, row.formula_weight, row.valence, key.group());
            spec.validate()?;
            specs.push(spec);
        }
        log::info!("ion registry: loaded {} ion specs", specs.len());
        Ok(IonRegistry { specs })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_registry_is_valid() {
        let registry = IonRegistry::default();
        assert_eq!(registry.len(), IonKey::ALL.len());
        for key in IonKey::ALL {
            let spec = registry.get(key).unwrap();
            assert!(spec.validate().is_ok(), "{} should be valid", key);
            assert_eq!(spec.group, key.group());
        }
    }

    #[test]
    fn test_ion_key_parsing() {
        assert_eq!("Ca".parse::<IonKey>().unwrap(), IonKey::Ca);
        assert_eq!(" SO4 ".parse::<IonKey>().unwrap(), IonKey::So4);
        assert_eq!("hco3".parse::<IonKey>().unwrap(), IonKey::Hco3);
        assert_eq!(
            "fe".parse::<IonKey>(),
            Err(ChemError::InvalidIon("fe".to_string()))
        );
    }

    #[test]
    fn test_groups() {
        assert_eq!(IonKey::K.group(), IonGroup::Cation);
        assert_eq!(IonKey::Alk.group(), IonGroup::Anion);
        assert_eq!(IonKey::Co3.group(), IonGroup::Anion);
    }

    #[test]
    fn test_parse_registry_csv() {
        let csv = "\
key,formula_weight,valence
ca,40.078,2
SO4,96.06,2
";
        let registry = IonRegistry::parse_registry_csv(csv).unwrap();
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get(IonKey::So4).unwrap().formula_weight, 96.06);
        assert_eq!(
            registry.get(IonKey::Mg),
            Err(ChemError::InvalidIon("mg".to_string()))
        );
    }

    #[test]
    fn test_overrides_keep_unlisted_ions() {
        let overrides = IonRegistry::parse_registry_csv("key,formula_weight,valence\nso4,96.06,2\n").unwrap();
        let registry = IonRegistry::default().with_overrides(overrides);
        assert_eq!(registry.len(), IonKey::ALL.len());
        assert_eq!(registry.get(IonKey::So4).unwrap().formula_weight, 96.06);
        assert_eq!(registry.get(IonKey::K).unwrap().formula_weight, 39.098);
        assert_eq!(registry.get(IonKey::Co3).unwrap().valence, 2);
    }

    #[test]
    fn test_parse_registry_csv_rejects_bad_entries() {
        let zero_weight = "key,formula_weight,valence\nna,0,1\n";
        assert!(matches!(
            IonRegistry::parse_registry_csv(zero_weight),
            Err(ChemError::InvalidIonSpec { ion: IonKey::Na, .. })
        ));

        let unknown = "key,formula_weight,valence\nfe,55.845,2\n";
        assert!(matches!(
            IonRegistry::parse_registry_csv(unknown),
            Err(ChemError::InvalidIon(_))
        ));

        let duplicate = "key,formula_weight,valence\nca,40.078,2\nca,40.08,2\n";
        assert!(matches!(
            IonRegistry::parse_registry_csv(duplicate),
            Err(ChemError::Registry(_))
        ));
    }
}
