use crate::error::{OperationError, Result};
use crate::graph::Graph2;
use crate::spatial::BoundaryDistanceField;

/// Spread of signed boundary distances over a graph's vertices.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Deviation {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    /// Number of vertices measured.
    pub samples: usize,
}

/// Measures how far each vertex of a graph sits from a boundary.
#[derive(Debug)]
pub struct DistanceDeviation<'a> {
    graph: &'a Graph2,
    field: &'a BoundaryDistanceField,
}

impl<'a> DistanceDeviation<'a> {
    /// Creates a new `DistanceDeviation` query.
    #[must_use]
    pub fn new(graph: &'a Graph2, field: &'a BoundaryDistanceField) -> Self {
        Self { graph, field }
    }

    /// Executes the measurement.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::InvalidInput` if there is nothing to measure:
    /// the graph has no vertices or the field has no segments.
    pub fn execute(&self) -> Result<Deviation> {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut sum = 0.0;
        let mut samples = 0;
        for (_, data) in self.graph.vertices() {
            let Some(sd) = self.field.signed_distance(&data.position) else {
                continue;
            };
            min = min.min(sd.distance);
            max = max.max(sd.distance);
            sum += sd.distance;
            samples += 1;
        }
        if samples == 0 {
            return Err(OperationError::InvalidInput("no vertex could be measured".to_owned()).into());
        }
        #[allow(clippy::cast_precision_loss)]
        let mean = sum / samples as f64;
        Ok(Deviation {
            min,
            max,
            mean,
            samples,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::geometry::polygon::Polygon2;
    use crate::math::Point2;

    #[test]
    fn measures_inner_square() {
        let field = BoundaryDistanceField::new(
            &Polygon2::new(vec![
                Point2::new(0.0, 0.0),
                Point2::new(10.0, 0.0),
                Point2::new(10.0, 10.0),
                Point2::new(0.0, 10.0),
            ])
            .into(),
        );
        let mut g = Graph2::new();
        g.append_polygon(&[
            Point2::new(1.0, 1.0),
            Point2::new(9.0, 1.0),
            Point2::new(9.0, 9.0),
            Point2::new(1.0, 9.0),
        ]);
        g.append_vertex(Point2::new(5.0, 3.0));
        let dev = DistanceDeviation::new(&g, &field).execute().unwrap();
        assert_eq!(dev.samples, 5);
        assert_relative_eq!(dev.min, 1.0, epsilon = 1e-12);
        assert_relative_eq!(dev.max, 3.0, epsilon = 1e-12);
        assert_relative_eq!(dev.mean, 7.0 / 5.0, epsilon = 1e-12);
    }

    #[test]
    fn empty_graph_is_an_error() {
        let field = BoundaryDistanceField::new(&Polygon2::circle(Point2::origin(), 1.0, 8).into());
        assert!(DistanceDeviation::new(&Graph2::new(), &field)
            .execute()
            .is_err());
    }
}
