//! Series style assignment: one (color, marker) pair per group value.
//!
//! The assigner must see every distinct group value before it runs, so it is
//! a separate pass after the samples have been projected.

use crate::error::StyleError;
use crate::marker::MarkerKind;
use crate::palette::Palette;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// Order in which colors and markers are enumerated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StyleMode {
    /// Cycle through the markers first, then move to the next color.
    #[default]
    SymbolFirst,
    /// Cycle through the colors first, then move to the next marker.
    ColorFirst,
    /// Advance color and marker together.
    Paired,
}

impl fmt::Display for StyleMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StyleMode::SymbolFirst => write!(f, "symbol-first"),
            StyleMode::ColorFirst => write!(f, "color-first"),
            StyleMode::Paired => write!(f, "paired"),
        }
    }
}

impl FromStr for StyleMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "symbol-first" => Ok(StyleMode::SymbolFirst),
            "color-first" => Ok(StyleMode::ColorFirst),
            "paired" => Ok(StyleMode::Paired),
            other => Err(format!("unknown style mode {:?}", other)),
        }
    }
}

/// Style of one group value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StyleAssignment {
    pub group_value: String,
    pub color: String,
    pub marker: MarkerKind,
    pub color_index: usize,
    pub marker_index: usize,
}

/// Raised when styles had to be reused. Not an error: every group value is
/// still styled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyleOverflow {
    pub group_count: usize,
    /// Number of different (color, marker) pairs handed out
    pub distinct_styles: usize,
    /// Group values whose color or marker index wrapped around
    pub wrapped: usize,
}

impl fmt::Display for StyleOverflow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} groups share {} distinct styles ({} wrapped); some series look alike",
            self.group_count, self.distinct_styles, self.wrapped
        )
    }
}

/// Legend items that fit under the legend cap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Legend<'a> {
    pub items: &'a [StyleAssignment],
    /// Group values styled but left out of the legend
    pub hidden: usize,
}

/// Outcome of one assignment run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleReport {
    pub assignments: Vec<StyleAssignment>,
    pub overflow: Option<StyleOverflow>,
}

impl StyleReport {
    pub fn get(&self, group_value: &str) -> Option<&StyleAssignment> {
        self.assignments.iter().find(|a| a.group_value == group_value)
    }

    /// The first `max_items` assignments, in group order.
    pub fn legend(&self, max_items: usize) -> Legend<'_> {
        let shown = self.assignments.len().min(max_items);
        let hidden = self.assignments.len() - shown;
        if hidden > 0 {
            log::warn!(
                "legend has {} items, only the first {} are shown",
                self.assignments.len(),
                max_items
            );
        }
        Legend {
            items: &self.assignments[..shown],
            hidden,
        }
    }
}

/// Distinct values in order of first appearance.
pub fn distinct_values<'a, I>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = HashSet::new();
    let mut ordered = Vec::new();
    for value in values {
        if seen.insert(value) {
            ordered.push(value.to_string());
        }
    }
    ordered
}

/// Raw (color, marker) indices of the i-th group value before wrapping.
fn raw_indices(i: usize, colors: usize, markers: usize, mode: StyleMode) -> (usize, usize) {
    match mode {
        StyleMode::SymbolFirst => (i / markers, i % markers),
        StyleMode::ColorFirst => (i % markers, i / markers),
        StyleMode::Paired => {
            let index = i % colors.min(markers);
            (index, index)
        }
    }
}

/// Assign a color and a marker to every group value.
///
/// Indices past the end of the palette or the marker list wrap around; when
/// that happens, or when two values end up with the same pair, the report
/// carries a [`StyleOverflow`].
pub fn assign(
    group_values: &[String],
    palette: &Palette,
    markers: &[MarkerKind],
    mode: StyleMode,
) -> Result<StyleReport, StyleError> {
    if palette.is_empty() {
        return Err(StyleError::EmptyPalette);
    }
    if markers.is_empty() {
        return Err(StyleError::EmptyMarkers);
    }

    let mut wrapped = 0;
    let mut pairs = HashSet::new();
    let assignments: Vec<StyleAssignment> = group_values
        .iter()
        .enumerate()
        .map(|(i, value)| {
            let (raw_color, raw_marker) = raw_indices(i, palette.len(), markers.len(), mode);
            if raw_color >= palette.len() || raw_marker >= markers.len() {
                wrapped += 1;
            }
            let color_index = raw_color % palette.len();
            let marker_index = raw_marker % markers.len();
            pairs.insert((color_index, marker_index));
            StyleAssignment {
                group_value: value.clone(),
                color: palette.get_color(color_index).to_string(),
                marker: markers[marker_index],
                color_index,
                marker_index,
            }
        })
        .collect();

    let overflow = if wrapped > 0 || pairs.len() < assignments.len() {
        let overflow = StyleOverflow {
            group_count: assignments.len(),
            distinct_styles: pairs.len(),
            wrapped,
        };
        log::warn!("style assignment: {}", overflow);
        Some(overflow)
    } else {
        None
    };

    Ok(StyleReport { assignments, overflow })
}

/// Style shared by every sample when no legend field is set.
pub fn single_series(palette: &Palette, markers: &[MarkerKind]) -> Result<(String, MarkerKind), StyleError> {
    let color = palette.colors().first().ok_or(StyleError::EmptyPalette)?;
    let marker = markers.first().ok_or(StyleError::EmptyMarkers)?;
    Ok((color.clone(), *marker))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::marker::DEFAULT_MARKERS;

    fn values(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("group-{}", i)).collect()
    }

    fn palette(n: usize) -> Palette {
        Palette::custom((0..n).map(|i| format!("c{}", i)).collect()).unwrap()
    }

    fn indices(report: &StyleReport) -> Vec<(usize, usize)> {
        report
            .assignments
            .iter()
            .map(|a| (a.color_index, a.marker_index))
            .collect()
    }

    #[test]
    fn test_symbol_first() {
        let report = assign(&values(7), &palette(3), &DEFAULT_MARKERS, StyleMode::SymbolFirst).unwrap();
        let fifth = &report.assignments[5];
        assert_eq!(fifth.marker_index, 0);
        assert_eq!(fifth.color_index, 1);
        assert_eq!(fifth.color, "c1");
        assert_eq!(fifth.marker, MarkerKind::Circle);
        assert_eq!(report.overflow, None);
    }

    #[test]
    fn test_color_first() {
        let report = assign(&values(4), &palette(5), &DEFAULT_MARKERS[..2], StyleMode::ColorFirst).unwrap();
        assert_eq!(indices(&report), vec![(0, 0), (1, 0), (0, 1), (1, 1)]);
        assert_eq!(report.overflow, None);
    }

    #[test]
    fn test_paired() {
        let report = assign(&values(4), &palette(3), &DEFAULT_MARKERS, StyleMode::Paired).unwrap();
        assert_eq!(indices(&report), vec![(0, 0), (1, 1), (2, 2), (0, 0)]);
        let overflow = report.overflow.unwrap();
        assert_eq!(overflow.group_count, 4);
        assert_eq!(overflow.distinct_styles, 3);
        assert_eq!(overflow.wrapped, 0);
    }

    #[test]
    fn test_overflow_wraps_instead_of_failing() {
        // 2 colors x 5 markers = 10 styles for 12 values
        let report = assign(&values(12), &palette(2), &DEFAULT_MARKERS, StyleMode::SymbolFirst).unwrap();
        assert_eq!(report.assignments.len(), 12);
        assert_eq!(report.assignments[10].color_index, 0);
        assert_eq!(report.assignments[10].marker_index, 0);
        let overflow = report.overflow.unwrap();
        assert_eq!(overflow.wrapped, 2);
        assert_eq!(overflow.distinct_styles, 10);
    }

    #[test]
    fn test_assignment_is_deterministic() {
        let groups = values(9);
        let first = assign(&groups, &palette(4), &DEFAULT_MARKERS, StyleMode::ColorFirst).unwrap();
        let second = assign(&groups, &palette(4), &DEFAULT_MARKERS, StyleMode::ColorFirst).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_inputs() {
        assert_eq!(
            assign(&values(3), &palette(3), &[], StyleMode::Paired),
            Err(StyleError::EmptyMarkers)
        );
        let report = assign(&[], &palette(3), &DEFAULT_MARKERS, StyleMode::Paired).unwrap();
        assert!(report.assignments.is_empty());
        assert_eq!(report.overflow, None);
    }

    #[test]
    fn test_legend_cap() {
        let report = assign(&values(25), &palette(10), &DEFAULT_MARKERS, StyleMode::SymbolFirst).unwrap();
        let legend = report.legend(20);
        assert_eq!(legend.items.len(), 20);
        assert_eq!(legend.hidden, 5);
        assert_eq!(legend.items[19].group_value, "group-19");
        assert!(report.get("group-24").is_some());

        let small = report.legend(100);
        assert_eq!(small.items.len(), 25);
        assert_eq!(small.hidden, 0);
    }

    #[test]
    fn test_distinct_values_keeps_first_seen_order() {
        let raw = ["b", "a", "b", "c", "a"];
        assert_eq!(distinct_values(raw), vec!["b", "a", "c"]);
    }

    #[test]
    fn test_single_series() {
        let (color, marker) = single_series(&palette(3), &DEFAULT_MARKERS).unwrap();
        assert_eq!(color, "c0");
        assert_eq!(marker, MarkerKind::Circle);
    }

    #[test]
    fn test_style_mode_names() {
        assert_eq!("color-first".parse::<StyleMode>(), Ok(StyleMode::ColorFirst));
        assert_eq!(StyleMode::Paired.to_string(), "paired");
        assert!("rainbow".parse::<StyleMode>().is_err());
    }
}
