use tracing::trace;

use crate::error::{OffsetError, Result};
use crate::math::distance_2d::closest_point_on_line;
use crate::math::{Point2, TOLERANCE};

use super::miter::CornerSolution;
use super::Pass;

/// Replaces every vertex flagged by the corner pass.
///
/// Flagged vertices either sit next to a near-zero-length segment, in which
/// case the live segments around them are mitered directly, or inside a
/// colinear run, in which case they are projected onto the line through the
/// nearest mitered vertices. Runs that reach a free end of an open polyline
/// use the offset line of the adjacent segment instead.
pub(super) fn run(pass: &Pass<'_>, result: &mut [Point2], colinear: &[bool]) -> Result<()> {
    for (i, &flagged) in colinear.iter().enumerate() {
        if flagged {
            let repaired = repair_vertex(pass, result, colinear, i)?;
            result[i] = repaired;
        }
    }
    Ok(())
}

fn repair_vertex(pass: &Pass<'_>, result: &[Point2], colinear: &[bool], i: usize) -> Result<Point2> {
    let vertex = &pass.points[i];
    let before = live_segment_before(pass, i);
    let after = live_segment_after(pass, i);

    // Short segments next to the vertex may hide a real corner.
    let skipped_short = before != pass.prev_segment(i) || after != pass.next_segment(i);
    if let (true, Some(b), Some(a)) = (skipped_short, before, after) {
        if b != a {
            if let CornerSolution::Miter { point, .. } = pass.miter(i, b, a) {
                trace!(index = i, before = b, after = a, "mitered across short segment");
                return Ok(point);
            }
        }
    }

    let prev_valid = valid_vertex_before(pass, colinear, i);
    let next_valid = valid_vertex_after(pass, colinear, i);
    if pass.looped {
        match (prev_valid, next_valid) {
            (Some(p), Some(n)) if p != n => {}
            _ => return Err(OffsetError::DegeneratePolyline.into()),
        }
    }

    if let (Some(p), Some(n)) = (prev_valid, next_valid) {
        check_run_distances(pass, i, p, n)?;
        if let Some(point) = closest_point_on_line(vertex, &result[p], &result[n]) {
            trace!(index = i, prev = p, next = n, "projected colinear vertex");
            return Ok(point);
        }
    }

    corner_frame(pass, i, before, after)
}

/// Offsets vertex `i` using only the segments directly around it, for runs
/// that have no mitered vertex on one side.
fn corner_frame(
    pass: &Pass<'_>,
    i: usize,
    before: Option<usize>,
    after: Option<usize>,
) -> Result<Point2> {
    if let (Some(b), Some(a)) = (before, after) {
        let (first, second) = (pass.distances[b], pass.distances[a]);
        if !pass.oblique_offsets && !same_distance(first, second) {
            return Err(OffsetError::InconsistentColinearOffsets {
                index: i,
                first,
                second,
            }
            .into());
        }
    }

    let vertex = &pass.points[i];
    let projections: Vec<Point2> = [before, after]
        .into_iter()
        .flatten()
        .filter_map(|s| pass.frame(s))
        .map(|frame| frame.project(vertex))
        .collect();

    match projections.as_slice() {
        [only] => Ok(*only),
        [first, second] => Ok(nalgebra::center(first, second)),
        _ => Err(OffsetError::DegeneratePolyline.into()),
    }
}

/// Every live segment between two mitered vertices must share a distance
/// unless oblique offsets are enabled.
fn check_run_distances(pass: &Pass<'_>, i: usize, from: usize, to: usize) -> Result<()> {
    if pass.oblique_offsets {
        return Ok(());
    }
    let count = pass.vectors.len();
    let first = pass.distances[from];
    let mut segment = from;
    loop {
        let second = pass.distances[segment];
        if pass.is_live(segment) && !same_distance(first, second) {
            return Err(OffsetError::InconsistentColinearOffsets {
                index: i,
                first,
                second,
            }
            .into());
        }
        segment = (segment + 1) % count;
        if segment == to {
            return Ok(());
        }
    }
}

fn same_distance(a: f64, b: f64) -> bool {
    (a - b).abs() <= TOLERANCE * a.abs().max(b.abs()).max(1.0)
}

/// Nearest unflagged vertex before `i`, wrapping for looped input. Free ends
/// of open input never count.
fn valid_vertex_before(pass: &Pass<'_>, colinear: &[bool], i: usize) -> Option<usize> {
    let n = pass.len();
    if pass.looped {
        (1..n).map(|k| (i + n - k) % n).find(|&j| !colinear[j])
    } else {
        (1..i).rev().find(|&j| !colinear[j])
    }
}

fn valid_vertex_after(pass: &Pass<'_>, colinear: &[bool], i: usize) -> Option<usize> {
    let n = pass.len();
    if pass.looped {
        (1..n).map(|k| (i + k) % n).find(|&j| !colinear[j])
    } else {
        (i + 1..n.saturating_sub(1)).find(|&j| !colinear[j])
    }
}

/// Nearest segment with a usable direction ending at or before vertex `i`.
fn live_segment_before(pass: &Pass<'_>, i: usize) -> Option<usize> {
    let n = pass.vectors.len();
    if pass.looped {
        (1..=n).map(|k| (i + n - k) % n).find(|&s| pass.is_live(s))
    } else {
        (0..i).rev().find(|&s| pass.is_live(s))
    }
}

/// Nearest segment with a usable direction starting at or after vertex `i`.
fn live_segment_after(pass: &Pass<'_>, i: usize) -> Option<usize> {
    let n = pass.vectors.len();
    if pass.looped {
        (0..n).map(|k| (i + k) % n).find(|&s| pass.is_live(s))
    } else {
        (i..n).find(|&s| pass.is_live(s))
    }
}
