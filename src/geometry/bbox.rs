use crate::math::{Point2, Point3};

/// An axis-aligned bounding box in the plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb2 {
    /// Minimum corner of the bounding box.
    pub min: Point2,
    /// Maximum corner of the bounding box.
    pub max: Point2,
}

/// An axis-aligned bounding box in space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb3 {
    /// Minimum corner of the bounding box.
    pub min: Point3,
    /// Maximum corner of the bounding box.
    pub max: Point3,
}

macro_rules! impl_aabb {
    ($aabb:ident, $point:ty, $vector:ty) => {
        impl $aabb {
            /// Smallest box containing every point, or `None` for no points.
            #[must_use]
            pub fn from_points<'a, I>(points: I) -> Option<Self>
            where
                I: IntoIterator<Item = &'a $point>,
            {
                let mut iter = points.into_iter();
                let first = *iter.next()?;
                Some(iter.fold(Self { min: first, max: first }, |b, p| b.including(p)))
            }

            /// The box grown to contain `p`.
            #[must_use]
            pub fn including(&self, p: &$point) -> Self {
                Self {
                    min: self.min.inf(p),
                    max: self.max.sup(p),
                }
            }

            /// Smallest box containing both boxes.
            #[must_use]
            pub fn union(&self, other: &Self) -> Self {
                Self {
                    min: self.min.inf(&other.min),
                    max: self.max.sup(&other.max),
                }
            }

            /// The box grown by `margin` on every side. A negative margin
            /// shrinks it and may produce an empty (inverted) box.
            #[must_use]
            pub fn expanded(&self, margin: f64) -> Self {
                let m = <$vector>::repeat(margin);
                Self {
                    min: self.min - m,
                    max: self.max + m,
                }
            }

            /// Whether `p` lies inside or on the boundary.
            #[must_use]
            pub fn contains(&self, p: &$point) -> bool {
                self.min
                    .iter()
                    .zip(self.max.iter())
                    .zip(p.iter())
                    .all(|((lo, hi), v)| lo <= v && v <= hi)
            }

            /// Whether the two boxes overlap or touch.
            #[must_use]
            pub fn intersects(&self, other: &Self) -> bool {
                self.min
                    .iter()
                    .zip(self.max.iter())
                    .zip(other.min.iter().zip(other.max.iter()))
                    .all(|((a_lo, a_hi), (b_lo, b_hi))| a_lo <= b_hi && b_lo <= a_hi)
            }

            /// Edge lengths along each axis.
            #[must_use]
            pub fn extents(&self) -> $vector {
                self.max - self.min
            }

            #[must_use]
            pub fn center(&self) -> $point {
                nalgebra::center(&self.min, &self.max)
            }
        }
    };
}

impl_aabb!(Aabb2, Point2, crate::math::Vector2);
impl_aabb!(Aabb3, Point3, crate::math::Vector3);
