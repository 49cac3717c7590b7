use super::{Point2, TOLERANCE};

/// Winding direction of a closed 2D polygon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Winding {
    CounterClockwise,
    Clockwise,
    /// Zero signed area (colinear or empty).
    Degenerate,
}

/// Computes the signed area of a polygon (shoelace formula).
///
/// The last point connects back to the first implicitly; a repeated closing
/// point adds a zero-area term and does not change the result.
/// Positive for counter-clockwise, negative for clockwise.
#[must_use]
pub fn signed_area_2d(points: &[Point2]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        sum += points[i].x * points[j].y - points[j].x * points[i].y;
    }
    sum * 0.5
}

/// Classifies the winding of a polygon from its signed area.
#[must_use]
pub fn winding_2d(points: &[Point2]) -> Winding {
    let area = signed_area_2d(points);
    if area > TOLERANCE {
        Winding::CounterClockwise
    } else if area < -TOLERANCE {
        Winding::Clockwise
    } else {
        Winding::Degenerate
    }
}
