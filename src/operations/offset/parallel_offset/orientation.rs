use std::f64::consts::PI;

use crate::error::{OffsetError, Result};
use crate::math::polygon_2d::signed_area_2d;
use crate::math::vector_2d::{angle_between, cross_2d, unitize};
use crate::math::{Point2, Vector2, TOLERANCE};

use super::MIN_SEGMENT_LENGTH;

/// Turns at or below this angle are noise and are not counted on their own.
pub const TURN_NOISE_ANGLE: f64 = 2.0 * PI / 180.0;

/// Result of the turning-angle sweep.
///
/// `reference` is `+1.0` when the dominant winding is counter-clockwise and
/// `-1.0` when it is clockwise. Positive offset distances shift towards
/// `reference * perp_ccw(segment)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Orientation {
    pub reference: f64,
    /// Total turning angle agreeing with the signed-area winding.
    pub positive_turn: f64,
    /// Total turning angle against the signed-area winding.
    pub negative_turn: f64,
    /// Segment index of the first counted turn in each bucket.
    pub first_positive: Option<usize>,
    pub first_negative: Option<usize>,
}

/// Derives the reference orientation of a polyline from its accumulated
/// turning angle.
///
/// The signed area alone is unreliable on non-convex shapes, so the sweep
/// sums the turning angle on each side and lets the larger total decide. A
/// turn below [`TURN_NOISE_ANGLE`] does not advance the sweep, so finely
/// sampled curves still add up to a counted turn.
///
/// # Errors
///
/// Returns `OffsetError::DegeneratePolyline` if every segment is shorter
/// than [`MIN_SEGMENT_LENGTH`].
pub fn detect(points: &[Point2], vectors: &[Vector2], looped: bool) -> Result<Orientation> {
    let units: Vec<Option<Vector2>> = vectors
        .iter()
        .map(|v| unitize(v, MIN_SEGMENT_LENGTH))
        .collect();

    let area = signed_area_2d(points);
    let provisional = if area.abs() > TOLERANCE {
        area.signum()
    } else {
        1.0
    };

    let (mut seed, start) = if looped {
        let Some(last) = units.iter().rev().flatten().next() else {
            return Err(OffsetError::DegeneratePolyline.into());
        };
        (*last, 0)
    } else {
        let Some((first, u)) = units
            .iter()
            .enumerate()
            .find_map(|(i, u)| u.map(|u| (i, u)))
        else {
            return Err(OffsetError::DegeneratePolyline.into());
        };
        (u, first + 1)
    };

    let mut orientation = Orientation {
        reference: provisional,
        positive_turn: 0.0,
        negative_turn: 0.0,
        first_positive: None,
        first_negative: None,
    };

    for (i, unit) in units.iter().enumerate().skip(start) {
        let Some(unit) = unit else { continue };
        let angle = angle_between(&seed, unit);
        if angle <= TURN_NOISE_ANGLE {
            continue;
        }
        let cross = cross_2d(&seed, unit);
        seed = *unit;
        // A reversal says nothing about which side is outside.
        if cross.abs() < TOLERANCE {
            continue;
        }
        if cross * provisional > 0.0 {
            orientation.positive_turn += angle;
            orientation.first_positive.get_or_insert(i);
        } else {
            orientation.negative_turn += angle;
            orientation.first_negative.get_or_insert(i);
        }
    }

    if orientation.negative_turn > orientation.positive_turn {
        orientation.reference = -provisional;
    }
    Ok(orientation)
}
