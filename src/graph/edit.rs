//! Structural edit primitives.
//!
//! Every edit restores the graph invariants before returning: no edge ever
//! references a removed vertex, and no unordered pair is joined twice.

use smallvec::SmallVec;

use super::{EdgeId, Graph2, VertexId, VertexTag};
use crate::error::GraphError;

/// Result of [`Graph2::split_edge`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeSplit {
    /// The inserted midpoint vertex.
    pub vertex: VertexId,
    /// The original edge, now running from its first endpoint to `vertex`.
    pub original: EdgeId,
    /// The new edge from `vertex` to the original second endpoint.
    pub edge: EdgeId,
}

/// Result of [`Graph2::collapse_edge`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeCollapse {
    pub kept: VertexId,
    pub removed: VertexId,
    /// The edge that joined the pair and no longer exists.
    pub collapsed_edge: EdgeId,
    /// Edges of `removed` dropped because `kept` already had the same
    /// neighbour.
    pub merged_edges: usize,
}

/// Result of [`Graph2::remove_edge`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeRemoval {
    pub a: VertexId,
    pub b: VertexId,
    /// Endpoints deleted because they became isolated.
    pub removed_vertices: SmallVec<[VertexId; 2]>,
}

impl Graph2 {
    /// Splits an edge at its midpoint.
    ///
    /// Edge `(a, b)` becomes `(a, m)` (keeping its id) plus a new edge
    /// `(m, b)`. The new vertex interpolates the endpoint tags when both carry
    /// tags of the same length.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::EdgeNotFound`] if `edge` is not live.
    pub fn split_edge(&mut self, edge: EdgeId) -> Result<EdgeSplit, GraphError> {
        let (a, b) = self.edge_vertices(edge)?;
        let va = self.vertex(a)?;
        let vb = self.vertex(b)?;
        let mid = nalgebra::center(&va.position, &vb.position);
        let tag: VertexTag = if !va.tag.is_empty() && va.tag.len() == vb.tag.len() {
            va.tag
                .iter()
                .zip(vb.tag.iter())
                .map(|(x, y)| 0.5 * (x + y))
                .collect()
        } else {
            VertexTag::new()
        };

        let m = self.append_vertex_tagged(mid, &tag);
        if let Some(rec) = self.edges.get_mut(edge) {
            rec.b = m;
        }
        let new_edge = self.edges.insert(super::EdgeData::new(m, b));
        if let Some(vb) = self.vertices.get_mut(b) {
            vb.replace_edge(edge, new_edge);
        }
        if let Some(vm) = self.vertices.get_mut(m) {
            vm.edges.push(edge);
            vm.edges.push(new_edge);
        }

        Ok(EdgeSplit {
            vertex: m,
            original: edge,
            edge: new_edge,
        })
    }

    /// Merges `remove` into `keep` along the edge joining them.
    ///
    /// Other edges of `remove` are re-pointed to `keep`; those that would
    /// duplicate an existing edge of `keep` are deleted instead. The position
    /// of `keep` is left unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::SelfEdge`] if `keep == remove`,
    /// [`GraphError::VertexNotFound`] if either id is dead and
    /// [`GraphError::NotAdjacent`] if no edge joins them.
    pub fn collapse_edge(
        &mut self,
        keep: VertexId,
        remove: VertexId,
    ) -> Result<EdgeCollapse, GraphError> {
        if keep == remove {
            return Err(GraphError::SelfEdge);
        }
        if !self.contains_vertex(keep) || !self.contains_vertex(remove) {
            return Err(GraphError::VertexNotFound);
        }
        let collapsed_edge = self.find_edge(keep, remove).ok_or(GraphError::NotAdjacent)?;

        self.edges.remove(collapsed_edge);
        if let Some(vk) = self.vertices.get_mut(keep) {
            vk.detach(collapsed_edge);
        }

        let removed_data = self
            .vertices
            .remove(remove)
            .ok_or(GraphError::VertexNotFound)?;
        let mut merged_edges = 0;
        for e in removed_data.edges {
            if e == collapsed_edge {
                continue;
            }
            let Some(other) = self.edges.get(e).and_then(|ed| ed.other(remove)) else {
                continue;
            };
            if self.find_edge(keep, other).is_some() {
                self.edges.remove(e);
                if let Some(vo) = self.vertices.get_mut(other) {
                    vo.detach(e);
                }
                merged_edges += 1;
            } else {
                if let Some(rec) = self.edges.get_mut(e) {
                    rec.repoint(remove, keep);
                }
                if let Some(vk) = self.vertices.get_mut(keep) {
                    vk.edges.push(e);
                }
            }
        }

        Ok(EdgeCollapse {
            kept: keep,
            removed: remove,
            collapsed_edge,
            merged_edges,
        })
    }

    /// Deletes an edge, optionally deleting endpoints left without edges.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::EdgeNotFound`] if `edge` is not live.
    pub fn remove_edge(
        &mut self,
        edge: EdgeId,
        remove_isolated: bool,
    ) -> Result<EdgeRemoval, GraphError> {
        let rec = self.edges.remove(edge).ok_or(GraphError::EdgeNotFound)?;
        let mut removed_vertices = SmallVec::new();
        for v in [rec.a, rec.b] {
            let Some(data) = self.vertices.get_mut(v) else {
                continue;
            };
            data.detach(edge);
            if remove_isolated && data.edges.is_empty() {
                self.vertices.remove(v);
                removed_vertices.push(v);
            }
        }
        Ok(EdgeRemoval {
            a: rec.a,
            b: rec.b,
            removed_vertices,
        })
    }

    /// Deletes a vertex together with all of its incident edges.
    ///
    /// Neighbours are kept even if they become isolated. Returns the removed
    /// edges.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::VertexNotFound`] if `v` is not live.
    pub fn remove_vertex(&mut self, v: VertexId) -> Result<SmallVec<[EdgeId; 4]>, GraphError> {
        let data = self.vertices.remove(v).ok_or(GraphError::VertexNotFound)?;
        for &e in &data.edges {
            if let Some(rec) = self.edges.remove(e) {
                if let Some(other) = rec.other(v) {
                    if let Some(vo) = self.vertices.get_mut(other) {
                        vo.detach(e);
                    }
                }
            }
        }
        Ok(data.edges)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::Point2;
    use crate::operations::query::is_valid::GraphIsValid;

    fn triangle() -> (Graph2, Vec<VertexId>) {
        let mut g = Graph2::new();
        let ids = g.append_polygon(&[
            Point2::new(0.0, 0.0),
            Point2::new(4.0, 0.0),
            Point2::new(0.0, 3.0),
        ]);
        (g, ids)
    }

    #[test]
    fn split_inserts_midpoint() {
        let (mut g, ids) = triangle();
        let e = g.find_edge(ids[0], ids[1]).unwrap();
        let split = g.split_edge(e).unwrap();

        assert_eq!(g.vertex_count(), 4);
        assert_eq!(g.edge_count(), 4);
        assert_eq!(g.position(split.vertex).unwrap(), Point2::new(2.0, 0.0));
        assert_eq!(g.degree(split.vertex), 2);
        assert!(g.find_edge(ids[0], ids[1]).is_none());
        assert_eq!(g.find_edge(ids[0], split.vertex), Some(split.original));
        assert_eq!(g.find_edge(split.vertex, ids[1]), Some(split.edge));
        assert!(GraphIsValid::new(&g).execute().is_ok());
    }

    #[test]
    fn split_interpolates_matching_tags() {
        let mut g = Graph2::new();
        let a = g.append_vertex_tagged(Point2::new(0.0, 0.0), &[1.0, 0.0]);
        let b = g.append_vertex_tagged(Point2::new(2.0, 0.0), &[3.0, 2.0]);
        let c = g.append_vertex(Point2::new(4.0, 0.0));
        let ab = g.append_edge(a, b).unwrap();
        let bc = g.append_edge(b, c).unwrap();

        let m = g.split_edge(ab).unwrap().vertex;
        assert_eq!(g.tag(m).unwrap(), &[2.0, 1.0]);
        let n = g.split_edge(bc).unwrap().vertex;
        assert!(g.tag(n).unwrap().is_empty());
    }

    #[test]
    fn split_then_collapse_restores_single_edge() {
        for keep_first in [true, false] {
            let (mut g, ids) = triangle();
            let e = g.find_edge(ids[0], ids[1]).unwrap();
            let m = g.split_edge(e).unwrap().vertex;
            let keep = if keep_first { ids[0] } else { ids[1] };
            let c = g.collapse_edge(keep, m).unwrap();

            assert_eq!(c.kept, keep);
            assert_eq!(c.removed, m);
            assert!(!g.contains_vertex(m));
            assert_eq!(g.vertex_count(), 3);
            assert_eq!(g.edge_count(), 3);
            assert!(g.find_edge(ids[0], ids[1]).is_some());
            assert!(GraphIsValid::new(&g).execute().is_ok());
        }
    }

    #[test]
    fn collapse_merges_duplicate_edges() {
        // Collapsing one triangle edge leaves a single edge to the apex.
        let (mut g, ids) = triangle();
        let c = g.collapse_edge(ids[0], ids[1]).unwrap();
        assert_eq!(c.merged_edges, 1);
        assert_eq!(g.vertex_count(), 2);
        assert_eq!(g.edge_count(), 1);
        assert_eq!(g.degree(ids[0]), 1);
        assert_eq!(g.degree(ids[2]), 1);
        assert!(GraphIsValid::new(&g).execute().is_ok());
    }

    #[test]
    fn collapse_keeps_position_of_kept_vertex() {
        let (mut g, ids) = triangle();
        g.collapse_edge(ids[1], ids[2]).unwrap();
        assert_eq!(g.position(ids[1]).unwrap(), Point2::new(4.0, 0.0));
    }

    #[test]
    fn collapse_reports_structural_errors() {
        let mut g = Graph2::new();
        let a = g.append_vertex(Point2::new(0.0, 0.0));
        let b = g.append_vertex(Point2::new(1.0, 0.0));
        assert_eq!(g.collapse_edge(a, a), Err(GraphError::SelfEdge));
        assert_eq!(g.collapse_edge(a, b), Err(GraphError::NotAdjacent));
        g.remove_vertex(b).unwrap();
        assert_eq!(g.collapse_edge(a, b), Err(GraphError::VertexNotFound));
    }

    #[test]
    fn remove_edge_optionally_drops_isolated_endpoints() {
        let mut g = Graph2::new();
        let ids = g.append_polyline(&[
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(2.0, 0.0),
        ]);
        let e01 = g.find_edge(ids[0], ids[1]).unwrap();
        let e12 = g.find_edge(ids[1], ids[2]).unwrap();

        let r = g.remove_edge(e01, true).unwrap();
        assert_eq!(r.removed_vertices.as_slice(), &[ids[0]]);
        assert!(g.contains_vertex(ids[1]));

        let r = g.remove_edge(e12, false).unwrap();
        assert!(r.removed_vertices.is_empty());
        assert_eq!(g.vertex_count(), 2);
        assert_eq!(g.remove_edge(e12, false), Err(GraphError::EdgeNotFound));
    }

    #[test]
    fn remove_vertex_drops_incident_edges() {
        let (mut g, ids) = triangle();
        let removed = g.remove_vertex(ids[0]).unwrap();
        assert_eq!(removed.len(), 2);
        assert_eq!(g.edge_count(), 1);
        assert_eq!(g.degree(ids[1]), 1);
        assert!(GraphIsValid::new(&g).execute().is_ok());
    }
}
