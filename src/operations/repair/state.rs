use crate::error::GraphError;
use crate::graph::{EdgeId, Graph2, VertexId};
use crate::math::Point2;

use super::self_distance::SelfDistanceIndex;

/// A graph under repair with its self-distance index and running counters.
#[derive(Debug)]
pub(super) struct RepairState<'g> {
    pub(super) graph: &'g mut Graph2,
    index: SelfDistanceIndex,
    overlap_radius: f64,
    pub(super) removed_edges: usize,
    pub(super) removed_vertices: usize,
}

impl<'g> RepairState<'g> {
    pub(super) fn new(graph: &'g mut Graph2, overlap_radius: f64, chain_radius: f64) -> Self {
        let index = SelfDistanceIndex::new(graph, overlap_radius, chain_radius);
        Self {
            graph,
            index,
            overlap_radius,
            removed_edges: 0,
            removed_vertices: 0,
        }
    }

    pub(super) fn self_distance(&self, v: VertexId) -> f64 {
        self.index.query(&*self.graph, v)
    }

    /// True if `v` is live and closer than the overlap radius to a
    /// non-local part of the graph.
    pub(super) fn violates(&self, v: VertexId) -> bool {
        self.graph.contains_vertex(v) && self.self_distance(v) < self.overlap_radius
    }

    pub(super) fn remove_edge(&mut self, e: EdgeId) -> Result<(), GraphError> {
        let (a, b) = self.graph.edge_segment(e)?;
        self.graph.remove_edge(e, false)?;
        self.index.remove(e, &a, &b);
        self.removed_edges += 1;
        Ok(())
    }

    /// Deletes `v` if it has no edges left. Returns whether it was deleted.
    pub(super) fn remove_if_isolated(&mut self, v: VertexId) -> bool {
        if self.graph.contains_vertex(v)
            && self.graph.degree(v) == 0
            && self.graph.remove_vertex(v).is_ok()
        {
            self.removed_vertices += 1;
            return true;
        }
        false
    }

    /// Collapses `remove` into `keep`, re-indexing the edges that move.
    pub(super) fn collapse(&mut self, keep: VertexId, remove: VertexId) -> Result<(), GraphError> {
        let moved: Vec<(EdgeId, (Point2, Point2))> = self
            .graph
            .vertex_edges(remove)
            .iter()
            .filter_map(|&e| Some((e, self.graph.edge_segment(e).ok()?)))
            .collect();
        self.graph.collapse_edge(keep, remove)?;
        for (e, (a, b)) in moved {
            self.index.remove(e, &a, &b);
            if let Ok((a, b)) = self.graph.edge_segment(e) {
                self.index.insert(e, &a, &b);
            } else {
                self.removed_edges += 1;
            }
        }
        self.removed_vertices += 1;
        Ok(())
    }
}
