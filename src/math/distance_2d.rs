use super::vector_2d::cross_2d;
use super::{Point2, TOLERANCE};

/// Squared length below which a segment or line is treated as a single point.
const DEGENERATE_LEN_SQ: f64 = TOLERANCE * TOLERANCE;

/// Returns the minimum distance from `p` to the segment `a`-`b`.
#[must_use]
pub fn point_to_segment_dist(p: &Point2, a: &Point2, b: &Point2) -> f64 {
    let d = b - a;
    let len_sq = d.norm_squared();

    if len_sq < DEGENERATE_LEN_SQ {
        return (p - a).norm();
    }

    // Project onto the infinite line, clamp to [0, 1].
    let t = ((p - a).dot(&d) / len_sq).clamp(0.0, 1.0);
    (p - (a + d * t)).norm()
}

/// Closest point to `p` on the infinite line through `a` and `b`.
///
/// Returns `None` if `a` and `b` coincide (the line has no direction).
#[must_use]
pub fn closest_point_on_line(p: &Point2, a: &Point2, b: &Point2) -> Option<Point2> {
    let d = b - a;
    let len_sq = d.norm_squared();
    if len_sq < DEGENERATE_LEN_SQ {
        return None;
    }
    let t = (p - a).dot(&d) / len_sq;
    Some(a + d * t)
}

/// Signed distance from `p` to the infinite line through `a` and `b`.
///
/// Positive when `p` lies to the left of the direction `a -> b`. Returns
/// `None` if `a` and `b` coincide.
#[must_use]
pub fn point_to_line_dist(p: &Point2, a: &Point2, b: &Point2) -> Option<f64> {
    let d = b - a;
    let len = d.norm();
    if len < TOLERANCE {
        return None;
    }
    Some(cross_2d(&d, &(p - a)) / len)
}
