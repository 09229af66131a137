//! Frame geometry of the diagram: outlines, grid and plot extent.
//!
//! Everything here is in diagram units, so any rendering backend can draw
//! the frame under the projected points without recomputing it.

use crate::error::BatchError;
use crate::ternary::{Point, TriangleLayout, SIDE, SIN60};
use serde::Serialize;

/// Default horizontal gap between the two triangles.
pub const DEFAULT_GAP: f64 = 20.0;

pub const PADDING_LEFT: f64 = 10.0;
pub const PADDING_RIGHT: f64 = 10.0;
pub const PADDING_TOP: f64 = 10.0;
pub const PADDING_BOTTOM: f64 = 20.0;

/// Grid lines are drawn every 20%.
const GRID_STEPS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Segment {
    pub from: Point,
    pub to: Point,
}

impl Segment {
    fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Segment {
            from: Point::new(x0, y0),
            to: Point::new(x1, y1),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Extent {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

/// Everything a renderer needs to draw the empty diagram.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiagramFrame {
    pub gap: f64,
    pub cation_triangle: Vec<Point>,
    pub anion_triangle: Vec<Point>,
    pub diamond: Vec<Point>,
    pub grid: Vec<Segment>,
    pub extent: Extent,
}

/// Arrangement of the two triangles and the diamond.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PiperLayout {
    gap: f64,
}

impl Default for PiperLayout {
    fn default() -> Self {
        PiperLayout { gap: DEFAULT_GAP }
    }
}

impl PiperLayout {
    pub fn new(gap: f64) -> Self {
        PiperLayout { gap }
    }

    /// A layout with a finite, non-negative gap.
    pub fn validated(gap: f64) -> Result<Self, BatchError> {
        if !gap.is_finite() || gap < 0.0 {
            return Err(BatchError::InvalidLayout(format!("gap must be >= 0, got {}", gap)));
        }
        Ok(PiperLayout { gap })
    }

    pub fn gap(&self) -> f64 {
        self.gap
    }

    pub fn cation_triangle(&self) -> TriangleLayout {
        TriangleLayout::cation()
    }

    pub fn anion_triangle(&self) -> TriangleLayout {
        TriangleLayout::anion(self.gap)
    }

    /// Closed outline of a triangle: left, right, top, left.
    pub fn triangle_outline(triangle: &TriangleLayout) -> [Point; 4] {
        let [left, right, top] = triangle.apexes();
        [left, right, top, left]
    }

    /// Closed outline of the diamond: bottom, left, top, right, bottom.
    pub fn diamond_outline(&self) -> [Point; 5] {
        let g = self.gap;
        let bottom = Point::new(SIDE + g / 2.0, SIN60 * g);
        [
            bottom,
            Point::new(SIDE / 2.0 + g / 2.0, SIN60 * (SIDE + g)),
            Point::new(SIDE + g / 2.0, SIN60 * (2.0 * SIDE + g)),
            Point::new(1.5 * SIDE + g / 2.0, SIN60 * (SIDE + g)),
            bottom,
        ]
    }

    /// True when `point` lies inside the diamond or on its edges.
    pub fn diamond_contains(&self, point: Point, tolerance: f64) -> bool {
        let [bottom, _, top, _, _] = self.diamond_outline();
        let cx = bottom.x;
        let cy = (bottom.y + top.y) / 2.0;
        let half_height = (top.y - bottom.y) / 2.0;
        let half_width = SIDE / 2.0;
        (point.x - cx).abs() / half_width + (point.y - cy).abs() / half_height <= 1.0 + tolerance
    }

    /// Dotted 20% grid of both triangles and the diamond, plus the diamond's
    /// horizontal middle line.
    pub fn grid_lines(&self) -> Vec<Segment> {
        let g = self.gap;
        let s = SIN60;
        let mut lines = Vec::with_capacity(6 * GRID_STEPS * 2 + 1);
        for delta in [0.0, SIDE + g] {
            for i in 1..=GRID_STEPS {
                let i = i as f64;
                lines.push(Segment::new(i * 10.0 + delta, i * 20.0 * s, 100.0 - i * 10.0 + delta, i * 20.0 * s));
                lines.push(Segment::new(i * 20.0 + delta, 0.0, 50.0 + i * 10.0 + delta, (100.0 - i * 20.0) * s));
                lines.push(Segment::new(i * 20.0 + delta, 0.0, i * 10.0 + delta, i * 20.0 * s));
            }
        }
        for i in 1..=GRID_STEPS {
            let i = i as f64;
            lines.push(Segment::new(
                50.0 + g / 2.0 + i * 10.0,
                (100.0 + g + i * 20.0) * s,
                100.0 + g / 2.0 + i * 10.0,
                (g + i * 20.0) * s,
            ));
            lines.push(Segment::new(
                100.0 + g / 2.0 + i * 10.0,
                (200.0 + g - i * 20.0) * s,
                50.0 + g / 2.0 + i * 10.0,
                (100.0 + g - i * 20.0) * s,
            ));
            lines.push(Segment::new(
                50.0 + g / 2.0 + i * 10.0,
                (100.0 + g + i * 20.0) * s,
                150.0 + g / 2.0 - i * 10.0,
                (100.0 + g + i * 20.0) * s,
            ));
            lines.push(Segment::new(
                100.0 + g / 2.0 + i * 10.0,
                (g + i * 20.0) * s,
                100.0 + g / 2.0 - i * 10.0,
                (g + i * 20.0) * s,
            ));
        }
        lines.push(Segment::new(50.0 + g / 2.0, (100.0 + g) * s, 150.0 + g / 2.0, (100.0 + g) * s));
        lines
    }

    /// Plot ranges with padding around the frame.
    pub fn extent(&self) -> Extent {
        Extent {
            x_min: -PADDING_LEFT,
            x_max: 2.0 * SIDE + self.gap + PADDING_RIGHT,
            y_min: -PADDING_BOTTOM,
            y_max: (2.0 * SIDE + self.gap + PADDING_TOP) * SIN60,
        }
    }

    pub fn frame(&self) -> DiagramFrame {
        DiagramFrame {
            gap: self.gap,
            cation_triangle: Self::triangle_outline(&self.cation_triangle()).to_vec(),
            anion_triangle: Self::triangle_outline(&self.anion_triangle()).to_vec(),
            diamond: self.diamond_outline().to_vec(),
            grid: self.grid_lines(),
            extent: self.extent(),
        }
    }
}
