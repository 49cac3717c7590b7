use crate::error::{GeometryError, Result};
use crate::math::polygon_2d::signed_area_2d;
use crate::math::Point2;
use crate::operations::offset::{ParallelOffset2D, CLOSURE_TOLERANCE};

use super::Aabb2;

/// An ordered sequence of at least two 2D points joined by straight segments.
///
/// The polyline is closed when its first and last points coincide within
/// [`CLOSURE_TOLERANCE`]. Points are owned and only exposed as a borrowed
/// slice; operations return new polylines.
#[derive(Debug, Clone, PartialEq)]
pub struct Polyline2 {
    points: Vec<Point2>,
}

impl Polyline2 {
    /// Creates a polyline from its points.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::Degenerate` for fewer than 2 points.
    pub fn new(points: Vec<Point2>) -> Result<Self> {
        if points.len() < 2 {
            return Err(GeometryError::Degenerate(format!(
                "polyline needs at least 2 points, got {}",
                points.len()
            ))
            .into());
        }
        Ok(Self { points })
    }

    /// Creates a closed polyline, appending the first point if needed.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::Degenerate` for fewer than 2 points.
    pub fn closed(mut points: Vec<Point2>) -> Result<Self> {
        if let (Some(&first), Some(last)) = (points.first(), points.last()) {
            if points.len() > 1 && (first - last).norm() > CLOSURE_TOLERANCE {
                points.push(first);
            }
        }
        Self::new(points)
    }

    #[must_use]
    pub fn points(&self) -> &[Point2] {
        &self.points
    }

    #[must_use]
    pub fn into_points(self) -> Vec<Point2> {
        self.points
    }

    #[must_use]
    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    /// Whether the first and last points coincide.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        let n = self.points.len();
        (self.points[0] - self.points[n - 1]).norm() <= CLOSURE_TOLERANCE
    }

    /// Number of segments between consecutive points. A closed polyline's
    /// repeated end point makes this the number of distinct edges.
    #[must_use]
    pub fn segment_count(&self) -> usize {
        self.points.len() - 1
    }

    /// Iterates over `(start, end)` of every segment.
    pub fn segments(&self) -> impl Iterator<Item = (Point2, Point2)> + '_ {
        self.points.windows(2).map(|w| (w[0], w[1]))
    }

    /// Total length of all segments.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.segments().map(|(a, b)| (b - a).norm()).sum()
    }

    /// Signed enclosed area, positive for counter-clockwise. Open polylines
    /// are measured as if closed by a straight segment.
    #[must_use]
    pub fn signed_area(&self) -> f64 {
        signed_area_2d(&self.points)
    }

    #[must_use]
    pub fn bounding_box(&self) -> Aabb2 {
        let first = self.points[0];
        self.points[1..]
            .iter()
            .fold(Aabb2 { min: first, max: first }, |b, p| b.including(p))
    }

    /// The same polyline walked in the opposite direction.
    #[must_use]
    pub fn reversed(&self) -> Self {
        Self {
            points: self.points.iter().rev().copied().collect(),
        }
    }

    /// Prepares a parallel offset of this polyline with one distance per
    /// segment (or a single broadcast distance). Configure the returned
    /// operation and call `execute`.
    #[must_use]
    pub fn parallel_offset(&self, distances: Vec<f64>) -> ParallelOffset2D {
        ParallelOffset2D::new(self.points.clone(), distances)
    }

    /// Offsets every segment by `distance`, positive towards the inside.
    ///
    /// # Errors
    ///
    /// Propagates the errors of [`ParallelOffset2D::execute`].
    pub fn offset(&self, distance: f64) -> Result<Self> {
        let points = self.parallel_offset(vec![distance]).execute()?;
        Ok(Self { points })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::TOLERANCE;

    fn pts(coords: &[(f64, f64)]) -> Vec<Point2> {
        coords.iter().map(|&(x, y)| Point2::new(x, y)).collect()
    }

    #[test]
    fn needs_two_points() {
        assert!(Polyline2::new(pts(&[(0.0, 0.0)])).is_err());
        assert!(Polyline2::new(pts(&[(0.0, 0.0), (1.0, 0.0)])).is_ok());
    }

    #[test]
    fn closed_appends_first_point_once() {
        let pl = Polyline2::closed(pts(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)])).unwrap();
        assert_eq!(pl.point_count(), 4);
        assert!(pl.is_closed());
        let again = Polyline2::closed(pl.points().to_vec()).unwrap();
        assert_eq!(again.point_count(), 4);
    }

    #[test]
    fn length_area_and_box() {
        let pl = Polyline2::closed(pts(&[(0.0, 0.0), (4.0, 0.0), (4.0, 3.0), (0.0, 3.0)])).unwrap();
        assert_eq!(pl.segment_count(), 4);
        assert!((pl.length() - 14.0).abs() < TOLERANCE);
        assert!((pl.signed_area() - 12.0).abs() < TOLERANCE);
        assert!((pl.reversed().signed_area() + 12.0).abs() < TOLERANCE);
        let b = pl.bounding_box();
        assert_eq!(b.min, Point2::new(0.0, 0.0));
        assert_eq!(b.max, Point2::new(4.0, 3.0));
    }

    #[test]
    fn offset_returns_new_polyline() {
        let pl = Polyline2::closed(pts(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)]))
            .unwrap();
        let inner = pl.offset(1.0).unwrap();
        assert!(inner.is_closed());
        assert_eq!(inner.point_count(), pl.point_count());
        let b = inner.bounding_box();
        assert!((b.min - Point2::new(1.0, 1.0)).norm() < 1e-9);
        assert!((b.max - Point2::new(9.0, 9.0)).norm() < 1e-9);
        // The source is untouched.
        assert_eq!(pl.points()[0], Point2::new(0.0, 0.0));
    }

    #[test]
    fn configured_offset() {
        let pl = Polyline2::new(pts(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)])).unwrap();
        let result = pl.parallel_offset(vec![1.0]).looped(true).execute().unwrap();
        assert_eq!(result.len(), 4);
        assert!((result[3] - Point2::new(1.0, 9.0)).norm() < 1e-9);
    }
}
