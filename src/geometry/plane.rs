use crate::error::{GeometryError, Result};
use crate::math::{Point3, Vector3, TOLERANCE};

/// An infinite plane in 3D space.
///
/// Defined by an origin point, and two orthogonal direction vectors
/// (`u_dir`, `v_dir`). The normal is `u_dir × v_dir`.
///
/// Parametric form: `P(u, v) = origin + u * u_dir + v * v_dir`.
#[derive(Debug, Clone, PartialEq)]
pub struct Plane {
    origin: Point3,
    u_dir: Vector3,
    v_dir: Vector3,
    normal: Vector3,
}

impl Plane {
    /// Creates a new plane from an origin and two direction vectors.
    ///
    /// `v_dir` is re-orthogonalized against `u_dir`, so any non-parallel pair
    /// spanning the plane is accepted.
    ///
    /// # Errors
    ///
    /// Returns an error if the direction vectors are zero-length
    /// or parallel (degenerate plane).
    pub fn new(origin: Point3, u_dir: Vector3, v_dir: Vector3) -> Result<Self> {
        let u_dir = u_dir
            .try_normalize(TOLERANCE)
            .ok_or(GeometryError::ZeroVector)?;
        if v_dir.norm() < TOLERANCE {
            return Err(GeometryError::ZeroVector.into());
        }

        let normal = u_dir
            .cross(&v_dir)
            .try_normalize(TOLERANCE)
            .ok_or_else(|| GeometryError::Degenerate("plane directions are parallel".into()))?;
        let v_dir = normal.cross(&u_dir);

        Ok(Self {
            origin,
            u_dir,
            v_dir,
            normal,
        })
    }

    /// Creates a plane from an origin and a normal vector.
    ///
    /// The U and V directions are computed automatically.
    ///
    /// # Errors
    ///
    /// Returns an error if the normal vector is zero-length.
    pub fn from_normal(origin: Point3, normal: Vector3) -> Result<Self> {
        let normal = normal
            .try_normalize(TOLERANCE)
            .ok_or(GeometryError::ZeroVector)?;

        // Any reference not parallel to the normal.
        let reference = if normal.x.abs() < 0.9 {
            Vector3::x()
        } else {
            Vector3::y()
        };

        let u_dir = reference.cross(&normal).normalize();
        let v_dir = normal.cross(&u_dir);

        Ok(Self {
            origin,
            u_dir,
            v_dir,
            normal,
        })
    }

    /// Creates the plane through three points, oriented so that `a -> b -> c`
    /// is counter-clockwise seen from the normal side.
    ///
    /// # Errors
    ///
    /// Returns an error if the points are colinear or coincide.
    pub fn from_three_points(a: &Point3, b: &Point3, c: &Point3) -> Result<Self> {
        Self::new(*a, b - a, c - a)
    }

    /// Best-fit plane through a closed loop of points using Newell's method,
    /// centred on the centroid.
    ///
    /// # Errors
    ///
    /// Returns an error if the loop has no area.
    pub fn from_points(points: &[Point3]) -> Result<Self> {
        let n = points.len();
        let mut normal = Vector3::zeros();
        for i in 0..n {
            let curr = &points[i];
            let next = &points[(i + 1) % n];
            normal.x += (curr.y - next.y) * (curr.z + next.z);
            normal.y += (curr.z - next.z) * (curr.x + next.x);
            normal.z += (curr.x - next.x) * (curr.y + next.y);
        }

        if normal.norm() < TOLERANCE {
            return Err(GeometryError::Degenerate(
                "polygon has no area: cannot compute normal".into(),
            )
            .into());
        }

        #[allow(clippy::cast_precision_loss)]
        let inv_n = 1.0 / n as f64;
        let centroid = Point3::from(points.iter().map(|p| p.coords).sum::<Vector3>() * inv_n);

        Self::from_normal(centroid, normal)
    }

    /// Returns the origin point of the plane.
    #[must_use]
    pub fn origin(&self) -> &Point3 {
        &self.origin
    }

    /// Returns the U direction vector.
    #[must_use]
    pub fn u_dir(&self) -> &Vector3 {
        &self.u_dir
    }

    /// Returns the V direction vector.
    #[must_use]
    pub fn v_dir(&self) -> &Vector3 {
        &self.v_dir
    }

    /// Returns the unit normal of the plane.
    #[must_use]
    pub fn normal(&self) -> &Vector3 {
        &self.normal
    }

    /// Evaluates `origin + u * u_dir + v * v_dir`.
    #[must_use]
    pub fn evaluate(&self, u: f64, v: f64) -> Point3 {
        self.origin + self.u_dir * u + self.v_dir * v
    }

    /// Signed distance from `p` to the plane, positive on the normal side.
    #[must_use]
    pub fn signed_distance(&self, p: &Point3) -> f64 {
        (p - self.origin).dot(&self.normal)
    }

    /// Orthogonal projection of `p` onto the plane.
    #[must_use]
    pub fn project(&self, p: &Point3) -> Point3 {
        p - self.normal * self.signed_distance(p)
    }

    /// Plane coordinates `(u, v)` of the projection of `p`.
    #[must_use]
    pub fn parameters_of(&self, p: &Point3) -> (f64, f64) {
        let d = p - self.origin;
        (d.dot(&self.u_dir), d.dot(&self.v_dir))
    }
}
