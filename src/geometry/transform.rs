use crate::error::{GeometryError, Result};
use crate::math::{Matrix3, Matrix4, Point3, Vector3, TOLERANCE};

use super::Plane;

/// An affine transform of 3D space stored as a homogeneous 4x4 matrix.
///
/// Compose with [`then`](Self::then): `a.then(&b)` applies `a` first.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform3 {
    matrix: Matrix4,
}

impl Default for Transform3 {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform3 {
    #[must_use]
    pub fn identity() -> Self {
        Self {
            matrix: Matrix4::identity(),
        }
    }

    /// Wraps an arbitrary homogeneous matrix.
    #[must_use]
    pub fn from_matrix(matrix: Matrix4) -> Self {
        Self { matrix }
    }

    #[must_use]
    pub fn translation(displacement: &Vector3) -> Self {
        Self::from_matrix(Matrix4::new_translation(displacement))
    }

    /// Uniform scale about `center`.
    #[must_use]
    pub fn scale(center: &Point3, factor: f64) -> Self {
        Self::scale_xyz(center, &Vector3::repeat(factor))
    }

    /// Per-axis scale about `center`.
    #[must_use]
    pub fn scale_xyz(center: &Point3, factors: &Vector3) -> Self {
        Self::about(center, Matrix4::new_nonuniform_scaling(factors))
    }

    /// Rotation by `angle` radians around the axis through `origin` along
    /// `direction` (right-hand rule).
    ///
    /// # Errors
    ///
    /// Returns an error if the axis direction is zero-length.
    pub fn rotation(origin: &Point3, direction: &Vector3, angle: f64) -> Result<Self> {
        let axis = direction
            .try_normalize(TOLERANCE)
            .ok_or(GeometryError::ZeroVector)?;
        Ok(Self::about(origin, rotation_matrix(&axis, angle)))
    }

    /// Reflection across a plane.
    #[must_use]
    pub fn mirror(plane: &Plane) -> Self {
        let n = plane.normal();
        let reflect = Matrix3::identity() - n * n.transpose() * 2.0;
        Self::about(plane.origin(), reflect.to_homogeneous())
    }

    /// Conjugates `linear` so it acts about `center` instead of the origin.
    fn about(center: &Point3, linear: Matrix4) -> Self {
        let t_neg = Matrix4::new_translation(&(-center.coords));
        let t_pos = Matrix4::new_translation(&center.coords);
        Self::from_matrix(t_pos * linear * t_neg)
    }

    /// Returns the underlying matrix.
    #[must_use]
    pub fn matrix(&self) -> &Matrix4 {
        &self.matrix
    }

    /// The transform applying `self` first and `next` second.
    #[must_use]
    pub fn then(&self, next: &Self) -> Self {
        Self::from_matrix(next.matrix * self.matrix)
    }

    /// The inverse transform, or `None` if the matrix is singular (for
    /// example a zero scale).
    #[must_use]
    pub fn inverse(&self) -> Option<Self> {
        self.matrix.try_inverse().map(Self::from_matrix)
    }

    /// Transforms a point (homogeneous coordinates).
    #[must_use]
    pub fn apply_point(&self, point: &Point3) -> Point3 {
        let v = self.matrix * point.to_homogeneous();
        Point3::new(v.x, v.y, v.z)
    }

    /// Transforms a direction vector (ignoring translation).
    #[must_use]
    pub fn apply_vector(&self, vector: &Vector3) -> Vector3 {
        let v = self.matrix * vector.to_homogeneous();
        Vector3::new(v.x, v.y, v.z)
    }
}

/// Builds a 4x4 rotation matrix around a unit axis by an angle (Rodrigues).
#[allow(clippy::many_single_char_names)]
fn rotation_matrix(axis: &Vector3, angle: f64) -> Matrix4 {
    let c = angle.cos();
    let s = angle.sin();
    let t = 1.0 - c;
    let (x, y, z) = (axis.x, axis.y, axis.z);

    #[allow(clippy::suspicious_operation_groupings)]
    #[rustfmt::skip]
    let m = Matrix4::new(
        t * x * x + c,     t * x * y - s * z, t * x * z + s * y, 0.0,
        t * x * y + s * z, t * y * y + c,     t * y * z - s * x, 0.0,
        t * x * z - s * y, t * y * z + s * x, t * z * z + c,     0.0,
        0.0,               0.0,               0.0,               1.0,
    );
    m
}
