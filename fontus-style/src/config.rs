use crate::assign::{assign, single_series, StyleMode, StyleReport};
use crate::error::StyleError;
use crate::marker::{MarkerKind, DEFAULT_MARKERS};
use crate::palette::{Palette, PaletteName};
use serde::{Deserialize, Serialize};

pub const DEFAULT_COLOR_NUMBER: usize = 11;
pub const MAX_LEGEND_ITEMS: usize = 20;

/// Style settings as they appear in a settings file. Names are checked by
/// [`StyleConfig::build`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    pub palette: String,
    pub color_number: usize,
    pub markers: Vec<String>,
    pub mode: StyleMode,
    pub max_legend_items: usize,
}

impl Default for StyleConfig {
    fn default() -> Self {
        StyleConfig {
            palette: PaletteName::default().to_string(),
            color_number: DEFAULT_COLOR_NUMBER,
            markers: DEFAULT_MARKERS.iter().map(|m| m.to_string()).collect(),
            mode: StyleMode::default(),
            max_legend_items: MAX_LEGEND_ITEMS,
        }
    }
}

impl StyleConfig {
    /// Resolve palette and marker names into a ready-to-use [`Styler`].
    pub fn build(&self) -> Result<Styler, StyleError> {
        let palette_name: PaletteName = self.palette.parse()?;
        let palette = Palette::named(palette_name, self.color_number)?;
        let markers = self
            .markers
            .iter()
            .map(|name| name.parse::<MarkerKind>())
            .collect::<Result<Vec<_>, _>>()?;
        if markers.is_empty() {
            return Err(StyleError::EmptyMarkers);
        }
        if self.max_legend_items == 0 {
            return Err(StyleError::InvalidLegendCap(self.max_legend_items));
        }
        Ok(Styler {
            palette,
            markers,
            mode: self.mode,
            max_legend_items: self.max_legend_items,
        })
    }
}

/// Validated style configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Styler {
    pub palette: Palette,
    pub markers: Vec<MarkerKind>,
    pub mode: StyleMode,
    pub max_legend_items: usize,
}

impl Styler {
    pub fn assign(&self, group_values: &[String]) -> Result<StyleReport, StyleError> {
        assign(group_values, &self.palette, &self.markers, self.mode)
    }

    pub fn single_series(&self) -> Result<(String, MarkerKind), StyleError> {
        single_series(&self.palette, &self.markers)
    }
}
