use crate::math::vector_2d::{perp_ccw, unitize};
use crate::math::{Point2, Vector2};

use super::MIN_SEGMENT_LENGTH;

/// The offset line of a single segment.
///
/// Used where a vertex has only one usable neighbouring segment: the free
/// ends of an open polyline, and colinear runs that reach a free end.
#[derive(Debug, Clone, Copy)]
pub struct OffsetFrame {
    anchor: Point2,
    direction: Vector2,
}

impl OffsetFrame {
    /// Builds the frame for the segment starting at `start` with vector
    /// `segment`, shifted by `distance` towards the `reference` side.
    ///
    /// Returns `None` for segments shorter than [`MIN_SEGMENT_LENGTH`].
    #[must_use]
    pub fn new(start: &Point2, segment: &Vector2, distance: f64, reference: f64) -> Option<Self> {
        let direction = unitize(segment, MIN_SEGMENT_LENGTH)?;
        Some(Self {
            anchor: start + perp_ccw(&direction) * (distance * reference),
            direction,
        })
    }

    /// A point on the offset line.
    #[must_use]
    pub fn anchor(&self) -> &Point2 {
        &self.anchor
    }

    /// Unit direction of the offset line.
    #[must_use]
    pub fn direction(&self) -> &Vector2 {
        &self.direction
    }

    /// Closest point to `p` on the offset line.
    #[must_use]
    pub fn project(&self, p: &Point2) -> Point2 {
        let t = (p - self.anchor).dot(&self.direction);
        self.anchor + self.direction * t
    }
}
