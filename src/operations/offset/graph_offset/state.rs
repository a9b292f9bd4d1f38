use crate::error::GraphError;
use crate::graph::{EdgeCollapse, EdgeId, EdgeSplit, Graph2, VertexId};
use crate::math::Point2;
use crate::spatial::PointHashGrid;

/// The evolving front: the graph plus a vertex grid kept in step with it.
///
/// All structural and positional edits go through here so the grid is
/// updated in the same call as the graph. Parallel phases borrow `graph`
/// immutably and hand their results back to [`move_vertex`](Self::move_vertex).
#[derive(Debug)]
pub(crate) struct FrontState {
    pub(crate) graph: Graph2,
    pub(crate) grid: PointHashGrid<VertexId>,
}

impl FrontState {
    pub(crate) fn new(cell_size: f64) -> Self {
        Self {
            graph: Graph2::new(),
            grid: PointHashGrid::new(cell_size),
        }
    }

    pub(crate) fn append_loop(&mut self, points: &[Point2]) {
        for v in self.graph.append_polygon(points) {
            if let Ok(p) = self.graph.position(v) {
                self.grid.insert(v, &p);
            }
        }
    }

    pub(crate) fn move_vertex(&mut self, v: VertexId, to: Point2) -> Result<(), GraphError> {
        let from = self.graph.position(v)?;
        self.graph.set_position(v, to)?;
        self.grid.update(v, &from, &to);
        Ok(())
    }

    pub(crate) fn split_edge(&mut self, e: EdgeId) -> Result<EdgeSplit, GraphError> {
        let split = self.graph.split_edge(e)?;
        let p = self.graph.position(split.vertex)?;
        self.grid.insert(split.vertex, &p);
        Ok(split)
    }

    /// Collapses `remove` into `keep` and places `keep` at `at`.
    pub(crate) fn collapse(
        &mut self,
        keep: VertexId,
        remove: VertexId,
        at: Point2,
    ) -> Result<EdgeCollapse, GraphError> {
        let removed_at = self.graph.position(remove)?;
        let collapse = self.graph.collapse_edge(keep, remove)?;
        self.grid.remove(remove, &removed_at);
        self.move_vertex(keep, at)?;
        Ok(collapse)
    }

    pub(crate) fn append_vertex(&mut self, p: Point2) -> VertexId {
        let v = self.graph.append_vertex(p);
        self.grid.insert(v, &p);
        v
    }

    pub(crate) fn remove_vertex(&mut self, v: VertexId) -> Result<(), GraphError> {
        let p = self.graph.position(v)?;
        self.graph.remove_vertex(v)?;
        self.grid.remove(v, &p);
        Ok(())
    }

    pub(crate) fn remove_edge(&mut self, e: EdgeId, remove_isolated: bool) -> Result<(), GraphError> {
        let (a, b) = self.graph.edge_vertices(e)?;
        let pa = self.graph.position(a)?;
        let pb = self.graph.position(b)?;
        let removal = self.graph.remove_edge(e, remove_isolated)?;
        for v in removal.removed_vertices {
            self.grid.remove(v, if v == a { &pa } else { &pb });
        }
        Ok(())
    }

    pub(crate) fn into_graph(self) -> Graph2 {
        self.graph
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn nearest(state: &FrontState, q: Point2, r: f64) -> Option<VertexId> {
        let g = &state.graph;
        state
            .grid
            .find_nearest_in_radius(
                &q,
                r,
                |v| g.position(v).map_or(f64::INFINITY, |p| (p - q).norm()),
                |_| false,
            )
            .map(|(v, _)| v)
    }

    #[test]
    fn grid_follows_edits() {
        let mut s = FrontState::new(0.5);
        s.append_loop(&[
            Point2::new(0.0, 0.0),
            Point2::new(4.0, 0.0),
            Point2::new(4.0, 4.0),
        ]);
        assert_eq!(s.grid.len(), 3);

        let e = s.graph.edge_ids()[0];
        let m = s.split_edge(e).unwrap().vertex;
        assert_eq!(s.grid.len(), 4);
        assert_eq!(nearest(&s, Point2::new(2.0, 0.1), 0.2), Some(m));

        s.move_vertex(m, Point2::new(2.0, 1.0)).unwrap();
        assert!(nearest(&s, Point2::new(2.0, 0.1), 0.2).is_none());
        assert_eq!(nearest(&s, Point2::new(2.0, 0.9), 0.2), Some(m));

        let a = s.graph.neighbors(m).next().unwrap();
        s.collapse(a, m, Point2::new(1.0, 0.5)).unwrap();
        assert_eq!(s.grid.len(), 3);
        assert_eq!(nearest(&s, Point2::new(1.0, 0.5), 0.1), Some(a));

        let e = s.graph.vertex_edges(a)[0];
        s.remove_edge(e, true).unwrap();
        assert_eq!(s.grid.len(), s.graph.vertex_count());
    }
}
