//! Projection of a sample's cation and anion points into the central diamond.

use crate::ternary::{Point, TAN60};

/// Intersect the line of slope `tan60` through the cation point with the line
/// of slope `-tan60` through the anion point.
///
/// Both points must come from the same sample, the anion point already
/// shifted into the anion triangle.
pub fn project_diamond(cation: Point, anion: Point) -> Point {
    let m = TAN60;
    let q1 = cation.y - m * cation.x;
    let q2 = anion.y + m * anion.x;
    let x = (q2 - q1) / (2.0 * m);
    let y = m * x + q1;
    Point::new(x, y)
}
