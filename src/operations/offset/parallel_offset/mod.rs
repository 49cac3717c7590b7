mod frame;
mod miter;
mod orientation;
mod repair;
mod segments;

use tracing::{debug, trace};

use crate::error::{OffsetError, OperationError, Result};
use crate::math::{Point2, Vector2, TOLERANCE};

use self::miter::CornerSolution;

pub use frame::OffsetFrame;
pub use miter::PARALLEL_THRESHOLD;
pub use orientation::{detect as detect_orientation, Orientation, TURN_NOISE_ANGLE};

/// First and last points closer than this make a polyline closed.
pub const CLOSURE_TOLERANCE: f64 = 1e-9;

/// Segments shorter than this have no usable direction.
pub const MIN_SEGMENT_LENGTH: f64 = 1e-6;

/// How the ends of the input are connected for corner computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topology {
    /// First and last points coincide; the duplicate is stripped and restored.
    Closed,
    /// Open input treated as if the last point connected back to the first.
    OpenLooped,
    /// Open input with two free ends.
    Open,
}

impl Topology {
    /// Whether corners wrap around from the last vertex to the first.
    #[must_use]
    pub fn is_looped(self) -> bool {
        !matches!(self, Self::Open)
    }
}

/// Parallel offset of a 2D polyline with per-segment distances.
///
/// Each edge is shifted along its normal and adjacent shifted edges are
/// joined with true miters. Near-parallel corners and near-zero-length
/// segments are repaired from their valid neighbours instead.
///
/// # Sign Convention
///
/// Positive distances shift towards the inside of the loop: left of the
/// walking direction for counter-clockwise input, right for clockwise. The
/// orientation is detected from the accumulated turning angle unless
/// [`reference_orient`](Self::reference_orient) forces it.
///
/// # Distances
///
/// Either a single value for every segment, or one per segment: `n - 1`
/// for open and closed input (closed input counts its repeated end point),
/// `n` for open input with [`looped`](Self::looped) set.
#[derive(Debug, Clone)]
pub struct ParallelOffset2D {
    points: Vec<Point2>,
    distances: Vec<f64>,
    looped: bool,
    reference_orient: f64,
    oblique_offsets: bool,
}

impl ParallelOffset2D {
    /// Creates a new parallel offset operation.
    #[must_use]
    pub fn new(points: Vec<Point2>, distances: Vec<f64>) -> Self {
        Self {
            points,
            distances,
            looped: false,
            reference_orient: 0.0,
            oblique_offsets: false,
        }
    }

    /// Connects the ends of an open polyline for corner computation only.
    /// Ignored for closed input.
    #[must_use]
    pub fn looped(mut self, looped: bool) -> Self {
        self.looped = looped;
        self
    }

    /// `0.0` detects the orientation; positive forces counter-clockwise,
    /// negative forces clockwise.
    #[must_use]
    pub fn reference_orient(mut self, reference_orient: f64) -> Self {
        self.reference_orient = reference_orient;
        self
    }

    /// Allows colinear segments with different distances. Their shared
    /// vertices are projected onto the line through the nearest mitered
    /// neighbours, giving an oblique edge instead of an error.
    #[must_use]
    pub fn oblique_offsets(mut self, oblique_offsets: bool) -> Self {
        self.oblique_offsets = oblique_offsets;
        self
    }

    /// Classifies the input by closure and the `looped` flag.
    #[must_use]
    pub fn topology(&self) -> Topology {
        match (self.points.first(), self.points.last()) {
            (Some(first), Some(last))
                if self.points.len() > 1 && (first - last).norm() <= CLOSURE_TOLERANCE =>
            {
                Topology::Closed
            }
            _ if self.looped => Topology::OpenLooped,
            _ => Topology::Open,
        }
    }

    /// Executes the offset and returns a new point sequence with the same
    /// number of points as the input.
    ///
    /// # Errors
    ///
    /// - `OffsetError::TooFewPoints` for fewer than 2 points
    /// - `OffsetError::DistanceCountMismatch` if the distance list is not 1
    ///   long or one per segment
    /// - `OffsetError::DegeneratePolyline` if every vertex is colinear or
    ///   duplicate
    /// - `OffsetError::InconsistentColinearOffsets` if colinear segments have
    ///   different distances and oblique offsets are disabled
    /// - `OperationError::InvalidInput` for non-finite coordinates or distances
    pub fn execute(&self) -> Result<Vec<Point2>> {
        let n = self.points.len();
        if n < 2 {
            return Err(OffsetError::TooFewPoints { count: n }.into());
        }
        self.validate_finite()?;

        let topology = self.topology();
        let working = match topology {
            Topology::Closed => &self.points[..n - 1],
            Topology::OpenLooped | Topology::Open => &self.points[..],
        };
        let segment_count = match topology {
            Topology::OpenLooped => n,
            Topology::Closed | Topology::Open => n - 1,
        };
        let distances = expand_distances(&self.distances, segment_count)?;

        if distances.iter().all(|d| d.abs() < TOLERANCE) {
            return Ok(self.points.clone());
        }
        if working.len() < 2 {
            return Err(OffsetError::DegeneratePolyline.into());
        }

        let looped = topology.is_looped();
        let vectors = segments::build(working, looped);
        let reference = if self.reference_orient > 0.0 {
            1.0
        } else if self.reference_orient < 0.0 {
            -1.0
        } else {
            let orientation = orientation::detect(working, &vectors, looped)?;
            debug!(
                reference = orientation.reference,
                positive_turn = orientation.positive_turn,
                negative_turn = orientation.negative_turn,
                "detected offset orientation"
            );
            orientation.reference
        };
        debug!(?topology, points = working.len(), reference, "parallel offset");

        let pass = Pass {
            points: working,
            vectors: &vectors,
            distances: &distances,
            reference,
            looped,
            oblique_offsets: self.oblique_offsets,
        };

        let mut result = working.to_vec();
        let mut colinear = vec![false; working.len()];
        for i in pass.corner_indices() {
            match pass.corner(i) {
                CornerSolution::Miter { point, convex } => {
                    if !convex {
                        trace!(index = i, "reflex corner");
                    }
                    result[i] = point;
                }
                CornerSolution::Degenerate => colinear[i] = true,
            }
        }

        repair::run(&pass, &mut result, &colinear)?;

        match topology {
            Topology::Closed => result.push(result[0]),
            Topology::Open => pass.fix_endpoints(&mut result)?,
            Topology::OpenLooped => {}
        }
        Ok(result)
    }

    fn validate_finite(&self) -> Result<()> {
        if let Some(i) = self
            .points
            .iter()
            .position(|p| !(p.x.is_finite() && p.y.is_finite()))
        {
            return Err(OperationError::InvalidInput(format!("point {i} is not finite")).into());
        }
        if let Some(i) = self.distances.iter().position(|d| !d.is_finite()) {
            return Err(
                OperationError::InvalidInput(format!("offset distance {i} is not finite")).into(),
            );
        }
        Ok(())
    }
}

/// Broadcasts a single distance or checks the per-segment count.
fn expand_distances(distances: &[f64], segment_count: usize) -> Result<Vec<f64>> {
    match distances {
        [d] => Ok(vec![*d; segment_count]),
        _ if distances.len() == segment_count => Ok(distances.to_vec()),
        _ => Err(OffsetError::DistanceCountMismatch {
            expected: segment_count,
            actual: distances.len(),
        }
        .into()),
    }
}

/// Per-call view shared by the corner and repair passes.
struct Pass<'a> {
    points: &'a [Point2],
    vectors: &'a [Vector2],
    distances: &'a [f64],
    reference: f64,
    looped: bool,
    oblique_offsets: bool,
}

impl Pass<'_> {
    fn len(&self) -> usize {
        self.points.len()
    }

    /// Vertices with a segment on both sides.
    fn corner_indices(&self) -> std::ops::Range<usize> {
        if self.looped {
            0..self.len()
        } else {
            1..self.len() - 1
        }
    }

    /// Segment ending at vertex `i`.
    fn prev_segment(&self, i: usize) -> Option<usize> {
        if i > 0 {
            Some(i - 1)
        } else if self.looped {
            Some(self.len() - 1)
        } else {
            None
        }
    }

    /// Segment starting at vertex `i`.
    fn next_segment(&self, i: usize) -> Option<usize> {
        (i < self.vectors.len()).then_some(i)
    }

    fn is_live(&self, segment: usize) -> bool {
        self.vectors[segment].norm() >= MIN_SEGMENT_LENGTH
    }

    fn corner(&self, i: usize) -> CornerSolution {
        match (self.prev_segment(i), self.next_segment(i)) {
            (Some(prev), Some(next)) => self.miter(i, prev, next),
            _ => CornerSolution::Degenerate,
        }
    }

    /// Miters vertex `i` between the offset lines of two segments.
    fn miter(&self, i: usize, prev: usize, next: usize) -> CornerSolution {
        miter::solve(
            &self.points[i],
            &self.vectors[prev],
            &self.vectors[next],
            self.distances[prev],
            self.distances[next],
            self.reference,
        )
    }

    fn frame(&self, segment: usize) -> Option<OffsetFrame> {
        OffsetFrame::new(
            &self.points[segment],
            &self.vectors[segment],
            self.distances[segment],
            self.reference,
        )
    }

    /// Places the free ends of an open polyline on the offset lines of the
    /// first and last usable segments.
    fn fix_endpoints(&self, result: &mut [Point2]) -> Result<()> {
        let segments = 0..self.vectors.len();
        let first = segments.clone().find(|&s| self.is_live(s));
        let last = segments.rev().find(|&s| self.is_live(s));
        let (Some(first), Some(last)) = (
            first.and_then(|s| self.frame(s)),
            last.and_then(|s| self.frame(s)),
        ) else {
            return Err(OffsetError::DegeneratePolyline.into());
        };
        let end = self.len() - 1;
        result[0] = first.project(&self.points[0]);
        result[end] = last.project(&self.points[end]);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::GeomkitError;

    fn pts(coords: &[(f64, f64)]) -> Vec<Point2> {
        coords.iter().map(|&(x, y)| Point2::new(x, y)).collect()
    }

    fn assert_points_near(result: &[Point2], expected: &[(f64, f64)], tol: f64, label: &str) {
        assert_eq!(
            result.len(),
            expected.len(),
            "{label}: point count mismatch, got {}, expected {}",
            result.len(),
            expected.len()
        );
        for (i, (r, &(x, y))) in result.iter().zip(expected).enumerate() {
            let d = ((r.x - x).powi(2) + (r.y - y).powi(2)).sqrt();
            assert!(d < tol, "{label} point {i}: expected ({x}, {y}), got ({}, {}), dist={d}", r.x, r.y);
        }
    }

    fn offset_error(op: &ParallelOffset2D) -> OffsetError {
        match op.execute().unwrap_err() {
            GeomkitError::Offset(e) => e,
            other => panic!("expected an offset error, got {other:?}"),
        }
    }

    fn square() -> Vec<Point2> {
        pts(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0), (0.0, 0.0)])
    }

    // ── Topology ──────────────────────────────────────────────────────

    #[test]
    fn topology_classification() {
        assert_eq!(ParallelOffset2D::new(square(), vec![1.0]).topology(), Topology::Closed);
        let open = pts(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)]);
        assert_eq!(
            ParallelOffset2D::new(open.clone(), vec![1.0]).topology(),
            Topology::Open
        );
        assert_eq!(
            ParallelOffset2D::new(open, vec![1.0]).looped(true).topology(),
            Topology::OpenLooped
        );
        // Closure wins over the loop flag.
        assert_eq!(
            ParallelOffset2D::new(square(), vec![1.0]).looped(true).topology(),
            Topology::Closed
        );
    }

    #[test]
    fn expand_distances_counts() {
        assert_eq!(expand_distances(&[2.0], 3).unwrap(), vec![2.0; 3]);
        assert_eq!(expand_distances(&[1.0, 2.0], 2).unwrap(), vec![1.0, 2.0]);
        assert!(expand_distances(&[], 2).is_err());
        assert!(expand_distances(&[1.0, 2.0], 3).is_err());
    }

    // ── Closed ────────────────────────────────────────────────────────

    #[test]
    fn closed_square_inward() {
        let result = ParallelOffset2D::new(square(), vec![1.0]).execute().unwrap();
        assert_points_near(
            &result,
            &[(1.0, 1.0), (9.0, 1.0), (9.0, 9.0), (1.0, 9.0), (1.0, 1.0)],
            1e-9,
            "square inward",
        );
    }

    #[test]
    fn closed_square_outward() {
        let result = ParallelOffset2D::new(square(), vec![-1.0]).execute().unwrap();
        assert_points_near(
            &result,
            &[(-1.0, -1.0), (11.0, -1.0), (11.0, 11.0), (-1.0, 11.0), (-1.0, -1.0)],
            1e-9,
            "square outward",
        );
    }

    #[test]
    fn clockwise_square_is_still_inward() {
        let mut points = square();
        points.reverse();
        let result = ParallelOffset2D::new(points, vec![1.0]).execute().unwrap();
        assert_points_near(
            &result,
            &[(1.0, 1.0), (1.0, 9.0), (9.0, 9.0), (9.0, 1.0), (1.0, 1.0)],
            1e-9,
            "cw square",
        );
    }

    #[test]
    fn forced_orientation_overrides_detection() {
        // Forcing clockwise on a CCW square turns an inward offset outward.
        let result = ParallelOffset2D::new(square(), vec![1.0])
            .reference_orient(-1.0)
            .execute()
            .unwrap();
        assert!((result[0].x + 1.0).abs() < 1e-9);
        assert!((result[0].y + 1.0).abs() < 1e-9);
    }

    #[test]
    fn per_segment_distances() {
        let result = ParallelOffset2D::new(square(), vec![1.0, 2.0, 3.0, 4.0])
            .execute()
            .unwrap();
        assert_points_near(
            &result,
            &[(4.0, 1.0), (8.0, 1.0), (8.0, 7.0), (4.0, 7.0), (4.0, 1.0)],
            1e-9,
            "per-segment",
        );
    }

    #[test]
    fn l_shape_reflex_corner() {
        let points = pts(&[
            (0.0, 0.0),
            (4.0, 0.0),
            (4.0, 2.0),
            (2.0, 2.0),
            (2.0, 4.0),
            (0.0, 4.0),
            (0.0, 0.0),
        ]);
        let result = ParallelOffset2D::new(points, vec![0.5]).execute().unwrap();
        assert_points_near(
            &result,
            &[
                (0.5, 0.5),
                (3.5, 0.5),
                (3.5, 1.5),
                (1.5, 1.5),
                (1.5, 3.5),
                (0.5, 3.5),
                (0.5, 0.5),
            ],
            1e-9,
            "L inward",
        );
    }

    #[test]
    fn colinear_midpoint_is_projected() {
        let points = pts(&[(0.0, 0.0), (5.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0), (0.0, 0.0)]);
        let result = ParallelOffset2D::new(points, vec![1.0]).execute().unwrap();
        assert_points_near(
            &result,
            &[(1.0, 1.0), (5.0, 1.0), (9.0, 1.0), (9.0, 9.0), (1.0, 9.0), (1.0, 1.0)],
            1e-9,
            "colinear midpoint",
        );
    }

    #[test]
    fn duplicate_corner_point_is_mitered() {
        let points = pts(&[
            (0.0, 0.0),
            (10.0, 0.0),
            (10.0, 0.0),
            (10.0, 10.0),
            (0.0, 10.0),
            (0.0, 0.0),
        ]);
        let result = ParallelOffset2D::new(points, vec![1.0]).execute().unwrap();
        assert_points_near(
            &result,
            &[(1.0, 1.0), (9.0, 1.0), (9.0, 1.0), (9.0, 9.0), (1.0, 9.0), (1.0, 1.0)],
            1e-9,
            "duplicate corner",
        );
    }

    #[test]
    fn colinear_with_different_distances_fails() {
        let points = pts(&[(0.0, 0.0), (5.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0), (0.0, 0.0)]);
        let op = ParallelOffset2D::new(points, vec![1.0, 2.0, 1.0, 1.0, 1.0]);
        assert!(matches!(
            offset_error(&op),
            OffsetError::InconsistentColinearOffsets { index: 1, .. }
        ));
    }

    #[test]
    fn oblique_offsets_blend_colinear_distances() {
        let points = pts(&[(0.0, 0.0), (5.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0), (0.0, 0.0)]);
        let result = ParallelOffset2D::new(points, vec![1.0, 3.0, 1.0, 1.0, 1.0])
            .oblique_offsets(true)
            .execute()
            .unwrap();
        // Neighbours are mitered at (1, 1) and (9, 3); (5, 0) drops onto the
        // line between them at its perpendicular foot.
        assert_points_near(
            &result[..3],
            &[(1.0, 1.0), (1.0 + 120.0 / 34.0, 1.0 + 30.0 / 34.0), (9.0, 3.0)],
            1e-9,
            "oblique",
        );
    }

    #[test]
    fn colinear_loop_is_degenerate() {
        let points = pts(&[(0.0, 0.0), (5.0, 0.0), (10.0, 0.0), (0.0, 0.0)]);
        let op = ParallelOffset2D::new(points, vec![1.0]);
        assert_eq!(offset_error(&op), OffsetError::DegeneratePolyline);
    }

    #[test]
    fn wrong_distance_count() {
        let op = ParallelOffset2D::new(square(), vec![1.0, 2.0]);
        assert_eq!(
            offset_error(&op),
            OffsetError::DistanceCountMismatch {
                expected: 4,
                actual: 2
            }
        );
    }

    // ── Open ──────────────────────────────────────────────────────────

    #[test]
    fn open_l_shape() {
        // Left turn: positive distance shifts to the left (inside the turn).
        let points = pts(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)]);
        let result = ParallelOffset2D::new(points, vec![1.0]).execute().unwrap();
        assert_points_near(&result, &[(0.0, 1.0), (9.0, 1.0), (9.0, 10.0)], 1e-9, "open L");
    }

    #[test]
    fn open_straight_line_uses_corner_frames() {
        let points = pts(&[(0.0, 0.0), (3.0, 0.0), (6.0, 0.0), (9.0, 0.0)]);
        let result = ParallelOffset2D::new(points, vec![2.0]).execute().unwrap();
        assert_points_near(
            &result,
            &[(0.0, 2.0), (3.0, 2.0), (6.0, 2.0), (9.0, 2.0)],
            1e-9,
            "straight",
        );
    }

    #[test]
    fn open_colinear_run_at_free_end() {
        // (0,0)-(5,0)-(10,0) is colinear up to the free start.
        let points = pts(&[(0.0, 0.0), (5.0, 0.0), (10.0, 0.0), (10.0, 10.0)]);
        let result = ParallelOffset2D::new(points, vec![1.0]).execute().unwrap();
        assert_points_near(
            &result,
            &[(0.0, 1.0), (5.0, 1.0), (9.0, 1.0), (9.0, 10.0)],
            1e-9,
            "free-end run",
        );
    }

    #[test]
    fn open_leading_duplicate_point() {
        let points = pts(&[(0.0, 0.0), (0.0, 0.0), (10.0, 0.0), (10.0, 10.0)]);
        let result = ParallelOffset2D::new(points, vec![1.0]).execute().unwrap();
        assert_points_near(
            &result,
            &[(0.0, 1.0), (0.0, 1.0), (9.0, 1.0), (9.0, 10.0)],
            1e-9,
            "leading duplicate",
        );
    }

    #[test]
    fn open_two_points() {
        let points = pts(&[(0.0, 0.0), (0.0, 5.0)]);
        let result = ParallelOffset2D::new(points, vec![1.0]).execute().unwrap();
        // Straight line: no turn, counter-clockwise convention, shift left.
        assert_points_near(&result, &[(-1.0, 0.0), (-1.0, 5.0)], 1e-9, "two points");
    }

    #[test]
    fn open_distance_count_is_segment_count() {
        let points = pts(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)]);
        assert!(ParallelOffset2D::new(points.clone(), vec![1.0, 2.0]).execute().is_ok());
        let op = ParallelOffset2D::new(points, vec![1.0, 2.0, 3.0]);
        assert_eq!(
            offset_error(&op),
            OffsetError::DistanceCountMismatch {
                expected: 2,
                actual: 3
            }
        );
    }

    #[test]
    fn open_all_duplicate_points_is_degenerate() {
        let points = pts(&[(1.0, 1.0), (1.0, 1.0)]);
        let op = ParallelOffset2D::new(points, vec![1.0]);
        assert_eq!(offset_error(&op), OffsetError::DegeneratePolyline);
    }

    // ── Open, looped ──────────────────────────────────────────────────

    #[test]
    fn looped_open_square_keeps_point_count() {
        let points = pts(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)]);
        let result = ParallelOffset2D::new(points, vec![1.0])
            .looped(true)
            .execute()
            .unwrap();
        assert_points_near(
            &result,
            &[(1.0, 1.0), (9.0, 1.0), (9.0, 9.0), (1.0, 9.0)],
            1e-9,
            "looped",
        );
    }

    #[test]
    fn looped_distance_count_is_point_count() {
        let points = pts(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)]);
        let op = ParallelOffset2D::new(points, vec![1.0, 1.0, 1.0]).looped(true);
        assert_eq!(
            offset_error(&op),
            OffsetError::DistanceCountMismatch {
                expected: 4,
                actual: 3
            }
        );
    }

    // ── Input validation ──────────────────────────────────────────────

    #[test]
    fn fewer_than_two_points() {
        let op = ParallelOffset2D::new(pts(&[(0.0, 0.0)]), vec![1.0]);
        assert_eq!(offset_error(&op), OffsetError::TooFewPoints { count: 1 });
    }

    #[test]
    fn zero_distance_returns_copy() {
        let points = square();
        let result = ParallelOffset2D::new(points.clone(), vec![0.0]).execute().unwrap();
        assert_eq!(result, points);
    }

    #[test]
    fn non_finite_distance_is_rejected() {
        let err = ParallelOffset2D::new(square(), vec![f64::NAN])
            .execute()
            .unwrap_err();
        assert!(matches!(err, GeomkitError::Operation(_)));
    }
}
