//! Categorical color palettes.
//!
//! The tables hold the largest variant of each palette; smaller variants are
//! prefixes of it.

use crate::error::StyleError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const CATEGORY10: &[&str] = &[
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f", "#bcbd22", "#17becf",
];

const CATEGORY20: &[&str] = &[
    "#1f77b4", "#aec7e8", "#ff7f0e", "#ffbb78", "#2ca02c", "#98df8a", "#d62728", "#ff9896", "#9467bd", "#c5b0d5",
    "#8c564b", "#c49c94", "#e377c2", "#f7b6d2", "#7f7f7f", "#c7c7c7", "#bcbd22", "#dbdb8d", "#17becf", "#9edae5",
];

const COLORBLIND: &[&str] = &[
    "#0072B2", "#E69F00", "#F0E442", "#009E73", "#56B4E9", "#D55E00", "#CC79A7", "#000000",
];

const DARK2: &[&str] = &[
    "#1b9e77", "#d95f02", "#7570b3", "#e7298a", "#66a61e", "#e6ab02", "#a6761d", "#666666",
];

const PAIRED: &[&str] = &[
    "#a6cee3", "#1f78b4", "#b2df8a", "#33a02c", "#fb9a99", "#e31a1c", "#fdbf6f", "#ff7f00", "#cab2d6", "#6a3d9a",
    "#ffff99", "#b15928",
];

const SET1: &[&str] = &[
    "#e41a1c", "#377eb8", "#4daf4a", "#984ea3", "#ff7f00", "#ffff33", "#a65628", "#f781bf", "#999999",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PaletteName {
    Category10,
    #[default]
    Category20,
    Colorblind,
    Dark2,
    Paired,
    Set1,
}

impl PaletteName {
    pub const ALL: [PaletteName; 6] = [
        PaletteName::Category10,
        PaletteName::Category20,
        PaletteName::Colorblind,
        PaletteName::Dark2,
        PaletteName::Paired,
        PaletteName::Set1,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PaletteName::Category10 => "Category10",
            PaletteName::Category20 => "Category20",
            PaletteName::Colorblind => "Colorblind",
            PaletteName::Dark2 => "Dark2",
            PaletteName::Paired => "Paired",
            PaletteName::Set1 => "Set1",
        }
    }

    /// Every color of the palette, in order.
    pub fn colors(&self) -> &'static [&'static str] {
        match self {
            PaletteName::Category10 => CATEGORY10,
            PaletteName::Category20 => CATEGORY20,
            PaletteName::Colorblind => COLORBLIND,
            PaletteName::Dark2 => DARK2,
            PaletteName::Paired => PAIRED,
            PaletteName::Set1 => SET1,
        }
    }

    pub fn max_colors(&self) -> usize {
        self.colors().len()
    }
}

impl fmt::Display for PaletteName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PaletteName {
    type Err = StyleError;

    /// Case-insensitive palette lookup.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        PaletteName::ALL
            .into_iter()
            .find(|name| name.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| StyleError::UnknownPalette(s.to_string()))
    }
}

/// An ordered list of colors to assign from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    colors: Vec<String>,
}

impl Palette {
    /// The first `color_number` colors of a named palette. Asking for more
    /// colors than the palette has yields the whole palette.
    pub fn named(name: PaletteName, color_number: usize) -> Result<Self, StyleError> {
        if color_number == 0 {
            return Err(StyleError::EmptyPalette);
        }
        let available = name.max_colors();
        if color_number > available {
            log::warn!(
                "palette {} has {} colors, {} requested; using {}",
                name,
                available,
                color_number,
                available
            );
        }
        let colors = name
            .colors()
            .iter()
            .take(color_number)
            .map(|c| c.to_string())
            .collect();
        Ok(Palette { colors })
    }

    /// A caller-supplied list of colors.
    pub fn custom(colors: Vec<String>) -> Result<Self, StyleError> {
        if colors.is_empty() {
            return Err(StyleError::EmptyPalette);
        }
        Ok(Palette { colors })
    }

    pub fn colors(&self) -> &[String] {
        &self.colors
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Color at `index`, wrapping around the end of the palette.
    pub fn get_color(&self, index: usize) -> &str {
        &self.colors[index % self.colors.len()]
    }
}
