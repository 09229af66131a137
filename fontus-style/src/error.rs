use std::fmt;

/// Errors raised while building a style configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StyleError {
    /// No colors to assign from.
    EmptyPalette,
    /// No marker kinds to assign from.
    EmptyMarkers,
    /// The palette name is not one of the known palettes.
    UnknownPalette(String),
    /// The marker name is not a known marker kind.
    UnknownMarker(String),
    /// The legend must be able to show at least one item.
    InvalidLegendCap(usize),
}

impl fmt::Display for StyleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StyleError::EmptyPalette => write!(f, "palette has no colors"),
            StyleError::EmptyMarkers => write!(f, "marker list is empty"),
            StyleError::UnknownPalette(name) => write!(f, "unknown palette {:?}", name),
            StyleError::UnknownMarker(name) => write!(f, "unknown marker {:?}", name),
            StyleError::InvalidLegendCap(cap) => write!(f, "max legend items must be >= 1, got {}", cap),
        }
    }
}

impl std::error::Error for StyleError {}
