use crate::error::{GeometryError, Result};
use crate::math::intersect_2d::line_line_intersect_2d;
use crate::math::vector_2d::{cross_2d, perp_ccw};
use crate::math::{Point2, Vector2, TOLERANCE};

/// An infinite line in the plane defined by an origin point and a unit
/// direction.
///
/// The parametric form is: `P(t) = origin + t * direction`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line2 {
    origin: Point2,
    direction: Vector2,
}

impl Line2 {
    /// Creates a new line from an origin and direction.
    ///
    /// # Errors
    ///
    /// Returns an error if the direction vector is zero-length.
    pub fn new(origin: Point2, direction: Vector2) -> Result<Self> {
        let direction = direction
            .try_normalize(TOLERANCE)
            .ok_or(GeometryError::ZeroVector)?;
        Ok(Self { origin, direction })
    }

    /// Creates the line through two points, directed from `a` to `b`.
    ///
    /// # Errors
    ///
    /// Returns an error if the points coincide.
    pub fn through(a: &Point2, b: &Point2) -> Result<Self> {
        Self::new(*a, b - a)
    }

    /// Returns the origin point of the line.
    #[must_use]
    pub fn origin(&self) -> &Point2 {
        &self.origin
    }

    /// Returns the unit direction vector of the line.
    #[must_use]
    pub fn direction(&self) -> &Vector2 {
        &self.direction
    }

    #[must_use]
    pub fn evaluate(&self, t: f64) -> Point2 {
        self.origin + self.direction * t
    }

    /// Parameter of the closest point to `p`.
    #[must_use]
    pub fn parameter_of(&self, p: &Point2) -> f64 {
        (p - self.origin).dot(&self.direction)
    }

    /// Closest point to `p` on the line.
    #[must_use]
    pub fn closest_point(&self, p: &Point2) -> Point2 {
        self.evaluate(self.parameter_of(p))
    }

    /// Signed distance from `p`, positive to the left of the direction.
    #[must_use]
    pub fn signed_distance(&self, p: &Point2) -> f64 {
        cross_2d(&self.direction, &(p - self.origin))
    }

    /// The parallel line shifted by `distance` to the left.
    #[must_use]
    pub fn offset(&self, distance: f64) -> Self {
        Self {
            origin: self.origin + perp_ccw(&self.direction) * distance,
            direction: self.direction,
        }
    }

    /// Intersection point with another line, or `None` if they are parallel.
    #[must_use]
    pub fn intersect(&self, other: &Self) -> Option<Point2> {
        let (t, _) =
            line_line_intersect_2d(&self.origin, &self.direction, &other.origin, &other.direction)?;
        Some(self.evaluate(t))
    }
}
