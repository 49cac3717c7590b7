use super::{Vector2, TOLERANCE};

/// Z component of the 3D cross product of two XY vectors.
///
/// Positive when `b` turns counter-clockwise from `a`.
#[must_use]
pub fn cross_2d(a: &Vector2, b: &Vector2) -> f64 {
    a.x * b.y - a.y * b.x
}

/// Rotates a vector by +90° (counter-clockwise): `(x, y) -> (-y, x)`.
#[must_use]
pub fn perp_ccw(v: &Vector2) -> Vector2 {
    Vector2::new(-v.y, v.x)
}

/// Returns the unit vector along `v`, or `None` if `|v| <= min_len`.
#[must_use]
pub fn unitize(v: &Vector2, min_len: f64) -> Option<Vector2> {
    let len = v.norm();
    if len <= min_len.max(TOLERANCE) {
        return None;
    }
    Some(v / len)
}

/// Unsigned angle between two vectors in `[0, π]`.
///
/// Uses `atan2(|a × b|, a · b)`, which stays accurate near 0 and π where an
/// `acos` of the normalized dot product loses precision.
#[must_use]
pub fn angle_between(a: &Vector2, b: &Vector2) -> f64 {
    cross_2d(a, b).abs().atan2(a.dot(b))
}
