pub mod curve;
pub mod polygon;

pub use curve::Curve2;
pub use polygon::{GeneralPolygon2, Polygon2};
