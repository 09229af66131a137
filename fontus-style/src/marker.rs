use crate::error::StyleError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Scatter marker shapes understood by common plotting backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerKind {
    Circle,
    Square,
    Triangle,
    Diamond,
    InvertedTriangle,
    Hex,
    Asterisk,
    CircleCross,
    CircleDot,
    CircleX,
    CircleY,
    Cross,
    Dash,
    DiamondCross,
    DiamondDot,
    Dot,
    HexDot,
    Plus,
    SquareCross,
    SquareDot,
    SquarePin,
    SquareX,
    Star,
    StarDot,
    TriangleDot,
    TrianglePin,
    X,
    Y,
}

/// Markers used when none are configured.
pub const DEFAULT_MARKERS: [MarkerKind; 5] = [
    MarkerKind::Circle,
    MarkerKind::Square,
    MarkerKind::Triangle,
    MarkerKind::Diamond,
    MarkerKind::InvertedTriangle,
];

impl MarkerKind {
    pub const ALL: [MarkerKind; 28] = [
        MarkerKind::Circle,
        MarkerKind::Square,
        MarkerKind::Triangle,
        MarkerKind::Diamond,
        MarkerKind::InvertedTriangle,
        MarkerKind::Hex,
        MarkerKind::Asterisk,
        MarkerKind::CircleCross,
        MarkerKind::CircleDot,
        MarkerKind::CircleX,
        MarkerKind::CircleY,
        MarkerKind::Cross,
        MarkerKind::Dash,
        MarkerKind::DiamondCross,
        MarkerKind::DiamondDot,
        MarkerKind::Dot,
        MarkerKind::HexDot,
        MarkerKind::Plus,
        MarkerKind::SquareCross,
        MarkerKind::SquareDot,
        MarkerKind::SquarePin,
        MarkerKind::SquareX,
        MarkerKind::Star,
        MarkerKind::StarDot,
        MarkerKind::TriangleDot,
        MarkerKind::TrianglePin,
        MarkerKind::X,
        MarkerKind::Y,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MarkerKind::Circle => "circle",
            MarkerKind::Square => "square",
            MarkerKind::Triangle => "triangle",
            MarkerKind::Diamond => "diamond",
            MarkerKind::InvertedTriangle => "inverted_triangle",
            MarkerKind::Hex => "hex",
            MarkerKind::Asterisk => "asterisk",
            MarkerKind::CircleCross => "circle_cross",
            MarkerKind::CircleDot => "circle_dot",
            MarkerKind::CircleX => "circle_x",
            MarkerKind::CircleY => "circle_y",
            MarkerKind::Cross => "cross",
            MarkerKind::Dash => "dash",
            MarkerKind::DiamondCross => "diamond_cross",
            MarkerKind::DiamondDot => "diamond_dot",
            MarkerKind::Dot => "dot",
            MarkerKind::HexDot => "hex_dot",
            MarkerKind::Plus => "plus",
            MarkerKind::SquareCross => "square_cross",
            MarkerKind::SquareDot => "square_dot",
            MarkerKind::SquarePin => "square_pin",
            MarkerKind::SquareX => "square_x",
            MarkerKind::Star => "star",
            MarkerKind::StarDot => "star_dot",
            MarkerKind::TriangleDot => "triangle_dot",
            MarkerKind::TrianglePin => "triangle_pin",
            MarkerKind::X => "x",
            MarkerKind::Y => "y",
        }
    }
}

impl fmt::Display for MarkerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for MarkerKind {
    type Err = StyleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace(['-', ' '], "_");
        MarkerKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == wanted)
            .ok_or_else(|| StyleError::UnknownMarker(s.to_string()))
    }
}
