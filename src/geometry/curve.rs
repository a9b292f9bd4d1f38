use crate::graph::VertexId;
use crate::math::polygon_2d::polyline_length;
use crate::math::Point2;

/// A polyline walked out of a graph.
///
/// `vertices[i]` is the graph vertex that `points[i]` was read from. A closed
/// curve does not repeat its first point at the end.
#[derive(Debug, Clone, PartialEq)]
pub struct Curve2 {
    pub vertices: Vec<VertexId>,
    pub points: Vec<Point2>,
    pub closed: bool,
}

impl Curve2 {
    /// Total length, including the closing segment for closed curves.
    #[must_use]
    pub fn length(&self) -> f64 {
        polyline_length(&self.points, self.closed)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
