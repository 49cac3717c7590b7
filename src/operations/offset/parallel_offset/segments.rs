use crate::math::{Point2, Vector2};

/// Builds one `next - this` vector per edge.
///
/// Looped input gets `n` vectors, the last one wrapping back to point 0;
/// open input gets `n - 1`.
pub(super) fn build(points: &[Point2], looped: bool) -> Vec<Vector2> {
    let n = points.len();
    let mut vectors: Vec<Vector2> = points.windows(2).map(|w| w[1] - w[0]).collect();
    if looped && n > 0 {
        vectors.push(points[0] - points[n - 1]);
    }
    vectors
}
