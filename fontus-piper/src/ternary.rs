//! Ternary projection onto the cation and anion triangles.
//!
//! Each triangle has side 100 with its left apex at `(x_offset, 0)`, right
//! apex at `(x_offset + 100, 0)` and top apex at `(x_offset + 50, 100·sin60)`.

use crate::composition::TernaryComposition;
use serde::{Deserialize, Serialize};

pub const SIN60: f64 = 0.866_025_403_784_438_6;
pub const TAN60: f64 = 1.732_050_807_568_877_2;

/// Side length of each triangle in diagram units.
pub const SIDE: f64 = 100.0;

/// A position in diagram coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }
}

/// Placement of one triangle along the x axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriangleLayout {
    pub x_offset: f64,
}

impl TriangleLayout {
    /// The cation triangle sits at the origin.
    pub fn cation() -> Self {
        TriangleLayout { x_offset: 0.0 }
    }

    /// The anion triangle sits to the right of the cation triangle, `gap` apart.
    pub fn anion(gap: f64) -> Self {
        TriangleLayout { x_offset: SIDE + gap }
    }

    /// Left, right and top apex.
    pub fn apexes(&self) -> [Point; 3] {
        [
            Point::new(self.x_offset, 0.0),
            Point::new(self.x_offset + SIDE, 0.0),
            Point::new(self.x_offset + SIDE / 2.0, SIDE * SIN60),
        ]
    }

    /// True when `point` lies inside the triangle or on its edges.
    pub fn contains(&self, point: Point, tolerance: f64) -> bool {
        let x = point.x - self.x_offset;
        point.y >= -tolerance
            && point.y <= TAN60 * x + tolerance
            && point.y <= TAN60 * (SIDE - x) + tolerance
    }
}

/// Map a composition onto its triangle.
///
/// A pure end member lands exactly on its apex. Otherwise the point is found
/// on the base at `x0 = b/(a+b)·100` and moved along the line towards the top
/// apex in proportion to `c`.
pub fn project_ternary(pct: &TernaryComposition, layout: &TriangleLayout) -> Point {
    let (a, b, c) = (pct.a(), pct.b(), pct.c());
    let [left, right, top] = layout.apexes();
    if a == 100.0 {
        return left;
    }
    if b == 100.0 {
        return right;
    }
    if c == 100.0 {
        return top;
    }

    let x0 = b / (a + b) * SIDE;
    let x = if x0 != SIDE / 2.0 {
        // line through (x0, 0) and the top apex: y = m·x + q
        let m = SIDE / (SIDE / 2.0 - x0);
        let q = -(m * x0);
        (c - q) / m
    } else {
        SIDE / 2.0
    };
    Point::new(x + layout.x_offset, SIN60 * c)
}
