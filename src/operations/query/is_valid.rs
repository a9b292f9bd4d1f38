use tracing::trace;

use crate::error::GraphError;
use crate::graph::Graph2;

/// Checks the structural invariants of a [`Graph2`].
///
/// Every edge must join two distinct live vertices, every incidence list
/// must agree with the edge records, and no unordered vertex pair may be
/// joined twice.
#[derive(Debug)]
pub struct GraphIsValid<'a> {
    graph: &'a Graph2,
}

impl<'a> GraphIsValid<'a> {
    /// Creates a new `GraphIsValid` query.
    #[must_use]
    pub fn new(graph: &'a Graph2) -> Self {
        Self { graph }
    }

    /// Executes the check.
    ///
    /// # Errors
    ///
    /// Returns the first violation found:
    /// - [`GraphError::VertexNotFound`] for an edge with a dead endpoint,
    /// - [`GraphError::SelfEdge`] for an edge joining a vertex to itself,
    /// - [`GraphError::EdgeNotFound`] when an incidence list and the edge
    ///   records disagree,
    /// - [`GraphError::DuplicateEdge`] for a pair joined twice.
    pub fn execute(&self) -> Result<(), GraphError> {
        let g = self.graph;
        for (id, e) in g.edges() {
            if !g.contains_vertex(e.a) || !g.contains_vertex(e.b) {
                trace!(?id, "edge references a dead vertex");
                return Err(GraphError::VertexNotFound);
            }
            if e.a == e.b {
                return Err(GraphError::SelfEdge);
            }
            if !g.vertex_edges(e.a).contains(&id) || !g.vertex_edges(e.b).contains(&id) {
                trace!(?id, "edge missing from an incidence list");
                return Err(GraphError::EdgeNotFound);
            }
        }

        for (v, data) in g.vertices() {
            let edges = data.edges();
            for (i, &e) in edges.iter().enumerate() {
                let rec = g.edge(e)?;
                if !rec.has(v) {
                    trace!(?v, ?e, "incidence list names a foreign edge");
                    return Err(GraphError::EdgeNotFound);
                }
                for &other in &edges[i + 1..] {
                    if other == e {
                        return Err(GraphError::EdgeNotFound);
                    }
                    if g.edge(other).is_ok_and(|o| o.same_pair(rec)) {
                        trace!(?v, ?e, ?other, "vertex pair joined twice");
                        return Err(GraphError::DuplicateEdge);
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::Point2;

    #[test]
    fn fresh_polygon_is_valid() {
        let mut g = Graph2::new();
        g.append_polygon(&[
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(0.0, 1.0),
        ]);
        assert!(GraphIsValid::new(&g).execute().is_ok());
        assert!(GraphIsValid::new(&Graph2::new()).execute().is_ok());
    }

    #[test]
    fn dangling_edge_is_reported() {
        let mut g = Graph2::new();
        let ids = g.append_polyline(&[Point2::new(0.0, 0.0), Point2::new(1.0, 0.0)]);
        // Drop the vertex record without touching the edge arena.
        g.vertices.remove(ids[1]);
        assert_eq!(
            GraphIsValid::new(&g).execute(),
            Err(GraphError::VertexNotFound)
        );
    }

    #[test]
    fn doubled_pair_is_reported() {
        let mut g = Graph2::new();
        let ids = g.append_polyline(&[Point2::new(0.0, 0.0), Point2::new(1.0, 0.0)]);
        // Bypass the duplicate check of `append_edge`.
        g.link(ids[0], ids[1]);
        assert_eq!(
            GraphIsValid::new(&g).execute(),
            Err(GraphError::DuplicateEdge)
        );
    }
}
