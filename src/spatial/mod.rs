pub mod aabb;
pub mod boundary_field;
mod cells;
pub mod point_grid;
pub mod segment_grid;

pub use aabb::Aabb;
pub use boundary_field::{BoundaryDistanceField, BoundaryHit, SignedDistance};
pub use point_grid::PointHashGrid;
pub use segment_grid::SegmentHashGrid;
