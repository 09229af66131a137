//! Settings file for the `fontus` commands.
//!
//! Every field is optional in the JSON file; missing fields take their
//! defaults.
//!
//! # Example JSON
//! ```text
//! {
//!   "carbonate_basis": "alk",
//!   "alkalinity_unit": "meq/L",
//!   "legend_field": "station",
//!   "style": { "palette": "Dark2", "mode": "paired" }
//! }
//! ```

use anyhow::Context;
use fontus_chem::{AlkalinityUnit, CarbonateBasis, IonRegistry, SampleColumns};
use fontus_piper::layout::DEFAULT_GAP;
use fontus_piper::{PiperLayout, PiperOptions};
use fontus_style::{StyleConfig, Styler};
use fontus_utils::dates::Hemisphere;
use log::info;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub carbonate_basis: CarbonateBasis,
    pub alkalinity_unit: AlkalinityUnit,
    pub gap: f64,
    pub id_field: String,
    pub date_field: Option<String>,
    pub hemisphere: Hemisphere,
    /// Group field that decides the series style; `None` plots one series
    pub legend_field: Option<String>,
    /// Group field that splits the batch into one plot per value
    pub group_plot_by: Option<String>,
    /// Ion registry entries (`key,formula_weight,valence`) that override the
    /// built-in ones; unlisted ions keep their defaults
    pub registry_csv: Option<String>,
    pub style: StyleConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            carbonate_basis: CarbonateBasis::default(),
            alkalinity_unit: AlkalinityUnit::default(),
            gap: DEFAULT_GAP,
            id_field: "sample_id".to_string(),
            date_field: Some("sample_date".to_string()),
            hemisphere: Hemisphere::default(),
            legend_field: None,
            group_plot_by: None,
            registry_csv: None,
            style: StyleConfig::default(),
        }
    }
}

impl Settings {
    /// Parse settings from a JSON string and validate them.
    pub fn from_json(json: &str) -> anyhow::Result<Settings> {
        let settings: Settings = serde_json::from_str(json).context("invalid settings JSON")?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from `path`, or the defaults when no path is given.
    pub fn load(path: Option<&str>) -> anyhow::Result<Settings> {
        match path {
            Some(path) => {
                let json = std::fs::read_to_string(path).with_context(|| format!("failed to read settings {}", path))?;
                let settings = Settings::from_json(&json).with_context(|| format!("in settings file {}", path))?;
                info!("Loaded settings from {}", path);
                Ok(settings)
            }
            None => Ok(Settings::default()),
        }
    }

    /// Reject settings that would make every run fail.
    pub fn validate(&self) -> anyhow::Result<()> {
        PiperLayout::validated(self.gap)?;
        self.style.build()?;
        if self.id_field.trim().is_empty() {
            anyhow::bail!("id_field must not be empty");
        }
        Ok(())
    }

    pub fn piper_options(&self) -> PiperOptions {
        PiperOptions {
            carbonate_basis: self.carbonate_basis,
            alkalinity_unit: self.alkalinity_unit,
            gap: self.gap,
        }
    }

    pub fn sample_columns(&self) -> SampleColumns {
        SampleColumns {
            id_field: self.id_field.clone(),
            date_field: self.date_field.clone(),
            ..SampleColumns::default()
        }
    }

    pub fn styler(&self) -> anyhow::Result<Styler> {
        Ok(self.style.build()?)
    }

    /// The built-in ion registry with the `registry_csv` entries applied,
    /// relative paths resolved against `base`.
    pub fn registry(&self, base: Option<&Path>) -> anyhow::Result<IonRegistry> {
        let Some(registry_csv) = &self.registry_csv else {
            return Ok(IonRegistry::default());
        };
        let path = match base {
            Some(base) if Path::new(registry_csv).is_relative() => base.join(registry_csv),
            _ => Path::new(registry_csv).to_path_buf(),
        };
        let data = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read ion registry {}", path.display()))?;
        let overrides = IonRegistry::parse_registry_csv(&data)
            .map_err(|e| anyhow::anyhow!("Failed to parse ion registry {}: {}", path.display(), e))?;
        info!("Applied {} ion registry entries from {}", overrides.len(), path.display());
        Ok(IonRegistry::default().with_overrides(overrides))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fontus_chem::IonKey;
    use fontus_piper::PiperPipeline;
    use fontus_style::StyleMode;

    #[test]
    fn test_empty_json_gives_defaults() {
        let settings = Settings::from_json("{}").unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.gap, 20.0);
        assert_eq!(settings.carbonate_basis, CarbonateBasis::Hco3Co3);
        assert_eq!(settings.style.max_legend_items, 20);
    }

    #[test]
    fn test_partial_json() {
        let json = r#"{
            "carbonate_basis": "alk",
            "alkalinity_unit": "meq/L",
            "hemisphere": "s",
            "legend_field": "station",
            "style": { "palette": "Dark2", "mode": "paired" }
        }"#;
        let settings = Settings::from_json(json).unwrap();
        assert_eq!(settings.carbonate_basis, CarbonateBasis::Alkalinity);
        assert_eq!(settings.alkalinity_unit, AlkalinityUnit::MeqPerL);
        assert_eq!(settings.hemisphere, Hemisphere::Southern);
        assert_eq!(settings.legend_field.as_deref(), Some("station"));
        assert_eq!(settings.style.mode, StyleMode::Paired);
        assert_eq!(settings.style.color_number, 11);
        assert_eq!(settings.piper_options().carbonate_basis, CarbonateBasis::Alkalinity);
    }

    #[test]
    fn test_invalid_settings_are_rejected() {
        assert!(Settings::from_json(r#"{"gap": -1}"#).is_err());
        assert!(Settings::from_json(r#"{"style": {"palette": "Nope"}}"#).is_err());
        assert!(Settings::from_json(r#"{"style": {"markers": []}}"#).is_err());
        assert!(Settings::from_json(r#"{"style": {"color_number": 0}}"#).is_err());
        assert!(Settings::from_json("not json").is_err());
    }

    #[test]
    fn test_unknown_carbonate_basis() {
        let err = Settings::from_json(r#"{"carbonate_basis": "co2"}"#).unwrap_err();
        let message = format!("{:#}", err);
        assert!(message.contains("Unknown carbonate basis \"co2\""), "{}", message);
        let upper = Settings::from_json(r#"{"carbonate_basis": "ALK"}"#).unwrap();
        assert_eq!(upper.carbonate_basis, CarbonateBasis::Alkalinity);
    }

    #[test]
    fn test_partial_registry_csv_keeps_optional_ions() {
        let dir = std::env::temp_dir().join(format!("fontus-settings-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("registry.csv"), "key,formula_weight,valence\nso4,96.06,2\n").unwrap();

        let settings = Settings::from_json(r#"{"registry_csv": "registry.csv"}"#).unwrap();
        let registry = settings.registry(Some(&dir)).unwrap();
        assert_eq!(registry.get(IonKey::So4).unwrap().formula_weight, 96.06);
        assert_eq!(registry.get(IonKey::K), IonRegistry::default().get(IonKey::K));
        assert!(PiperPipeline::new(&registry, settings.piper_options()).is_ok());

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_default_registry() {
        let registry = Settings::default().registry(None).unwrap();
        assert_eq!(registry, IonRegistry::default());
    }

    #[test]
    fn test_sample_columns() {
        let settings = Settings {
            id_field: "Lab_ID".to_string(),
            date_field: None,
            ..Settings::default()
        };
        let columns = settings.sample_columns();
        assert_eq!(columns.id_field, "Lab_ID");
        assert_eq!(columns.date_field, None);
        assert_eq!(columns.delimiter, b',');
    }
}
