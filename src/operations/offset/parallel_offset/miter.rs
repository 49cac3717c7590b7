use crate::math::vector_2d::{cross_2d, perp_ccw};
use crate::math::{Point2, Vector2};

use super::MIN_SEGMENT_LENGTH;

/// Corners with `disc / (ac + b²)` below this are treated as colinear.
///
/// For unit vectors the ratio is `sin²θ / (1 + cos²θ)`; this is its value at
/// θ = 0.25°. Near-reversals (θ close to 180°) fall under it as well.
pub const PARALLEL_THRESHOLD: f64 = 9.519e-6;

const MIN_SEGMENT_LENGTH_SQ: f64 = MIN_SEGMENT_LENGTH * MIN_SEGMENT_LENGTH;

/// Outcome of mitering a single vertex.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) enum CornerSolution {
    /// The vertex lies on both offset lines. `convex` is true when the local
    /// turn agrees with the reference orientation.
    Miter { point: Point2, convex: bool },
    /// Near-parallel corner or near-zero-length neighbour; left for repair.
    Degenerate,
}

/// Miters `vertex` between the offset lines of `prev` (ending at the vertex)
/// and `next` (starting at it).
///
/// With `a = |p|²`, `c = |n|²`, `b = p·n` and `w = offN - offP`, the
/// intersection `offP + s·p = offN + t·n` has
/// `s = (c(w·p) - b(w·n)) / (ac - b²)`.
pub(super) fn solve(
    vertex: &Point2,
    prev: &Vector2,
    next: &Vector2,
    prev_distance: f64,
    next_distance: f64,
    reference: f64,
) -> CornerSolution {
    let a = prev.norm_squared();
    let c = next.norm_squared();
    if a < MIN_SEGMENT_LENGTH_SQ || c < MIN_SEGMENT_LENGTH_SQ {
        return CornerSolution::Degenerate;
    }

    let b = prev.dot(next);
    let disc = a * c - b * b;
    // a, c > 0 so the denominator is strictly positive.
    let rel = disc / (a * c + b * b);
    if rel < PARALLEL_THRESHOLD {
        return CornerSolution::Degenerate;
    }

    let prev_shift = perp_ccw(prev) * (reference * prev_distance / a.sqrt());
    let next_shift = perp_ccw(next) * (reference * next_distance / c.sqrt());
    let off_prev = vertex + prev_shift;
    let off_next = vertex + next_shift;

    let w = off_next - off_prev;
    let s = (c * w.dot(prev) - b * w.dot(next)) / disc;

    CornerSolution::Miter {
        point: off_prev + prev * s,
        convex: cross_2d(prev, next) * reference > 0.0,
    }
}
