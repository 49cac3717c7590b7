pub mod bbox;
pub mod line;
pub mod plane;
pub mod polyline;
pub mod transform;

pub use bbox::{Aabb2, Aabb3};
pub use line::Line2;
pub use plane::Plane;
pub use polyline::Polyline2;
pub use transform::Transform3;
