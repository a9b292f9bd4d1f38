pub mod edge;
pub mod edit;
pub mod vertex;
pub mod walk;

pub use edge::{EdgeData, EdgeId};
pub use edit::{EdgeCollapse, EdgeRemoval, EdgeSplit};
pub use vertex::{VertexData, VertexId, VertexTag};

use slotmap::SlotMap;

use crate::error::GraphError;
use crate::math::Point2;

/// Editable planar graph of 2D vertices and undirected edges.
///
/// Vertices and edges live in generational arenas: removed slots are
/// recycled, and a stale id is reported as not found instead of aliasing
/// whatever now occupies the slot. Every edge references two distinct live
/// vertices and at most one edge joins any unordered pair.
#[derive(Debug, Clone, Default)]
pub struct Graph2 {
    pub(crate) vertices: SlotMap<VertexId, VertexData>,
    pub(crate) edges: SlotMap<EdgeId, EdgeData>,
}

impl Graph2 {
    /// Creates a new, empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Vertex operations ---

    /// Inserts an untagged vertex and returns its ID.
    pub fn append_vertex(&mut self, position: Point2) -> VertexId {
        self.vertices.insert(VertexData::new(position))
    }

    /// Inserts a vertex carrying an auxiliary tag and returns its ID.
    pub fn append_vertex_tagged(&mut self, position: Point2, tag: &[f64]) -> VertexId {
        self.vertices.insert(VertexData::with_tag(position, tag))
    }

    /// Returns a reference to the vertex data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::VertexNotFound`] for a dead or stale id.
    pub fn vertex(&self, id: VertexId) -> Result<&VertexData, GraphError> {
        self.vertices.get(id).ok_or(GraphError::VertexNotFound)
    }

    /// Returns a mutable reference to the vertex data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::VertexNotFound`] for a dead or stale id.
    pub fn vertex_mut(&mut self, id: VertexId) -> Result<&mut VertexData, GraphError> {
        self.vertices.get_mut(id).ok_or(GraphError::VertexNotFound)
    }

    #[must_use]
    pub fn contains_vertex(&self, id: VertexId) -> bool {
        self.vertices.contains_key(id)
    }

    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Live vertex ids in arena order.
    #[must_use]
    pub fn vertex_ids(&self) -> Vec<VertexId> {
        self.vertices.keys().collect()
    }

    /// Iterates live vertices in arena order.
    pub fn vertices(&self) -> impl Iterator<Item = (VertexId, &VertexData)> {
        self.vertices.iter()
    }

    /// Position of a vertex.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::VertexNotFound`] for a dead or stale id.
    pub fn position(&self, id: VertexId) -> Result<Point2, GraphError> {
        self.vertex(id).map(|v| v.position)
    }

    /// Moves a vertex.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::VertexNotFound`] for a dead or stale id.
    pub fn set_position(&mut self, id: VertexId, position: Point2) -> Result<(), GraphError> {
        self.vertex_mut(id)?.position = position;
        Ok(())
    }

    /// Auxiliary tag of a vertex (empty when untagged).
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::VertexNotFound`] for a dead or stale id.
    pub fn tag(&self, id: VertexId) -> Result<&[f64], GraphError> {
        self.vertex(id).map(|v| v.tag.as_slice())
    }

    /// Replaces the auxiliary tag of a vertex.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::VertexNotFound`] for a dead or stale id.
    pub fn set_tag(&mut self, id: VertexId, tag: &[f64]) -> Result<(), GraphError> {
        self.vertex_mut(id)?.tag = VertexTag::from_slice(tag);
        Ok(())
    }

    /// Number of incident edges; `0` for a dead id.
    #[must_use]
    pub fn degree(&self, id: VertexId) -> usize {
        self.vertices.get(id).map_or(0, VertexData::degree)
    }

    /// Incident edges of a vertex; empty for a dead id.
    #[must_use]
    pub fn vertex_edges(&self, id: VertexId) -> &[EdgeId] {
        self.vertices.get(id).map_or(&[][..], VertexData::edges)
    }

    /// Graph neighbours of a vertex, in incidence order.
    pub fn neighbors(&self, id: VertexId) -> impl Iterator<Item = VertexId> + '_ {
        self.vertex_edges(id)
            .iter()
            .filter_map(move |&e| self.edges.get(e).and_then(|ed| ed.other(id)))
    }

    // --- Edge operations ---

    /// Connects two distinct live vertices.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::SelfEdge`] if `a == b`,
    /// [`GraphError::VertexNotFound`] if either id is dead, and
    /// [`GraphError::DuplicateEdge`] if the pair is already connected.
    pub fn append_edge(&mut self, a: VertexId, b: VertexId) -> Result<EdgeId, GraphError> {
        if a == b {
            return Err(GraphError::SelfEdge);
        }
        if !self.contains_vertex(a) || !self.contains_vertex(b) {
            return Err(GraphError::VertexNotFound);
        }
        if self.find_edge(a, b).is_some() {
            return Err(GraphError::DuplicateEdge);
        }
        Ok(self.link(a, b))
    }

    /// Inserts an edge and registers it on both endpoints. Callers guarantee
    /// the endpoints are live, distinct and not yet connected.
    pub(crate) fn link(&mut self, a: VertexId, b: VertexId) -> EdgeId {
        let e = self.edges.insert(EdgeData::new(a, b));
        if let Some(va) = self.vertices.get_mut(a) {
            va.edges.push(e);
        }
        if let Some(vb) = self.vertices.get_mut(b) {
            vb.edges.push(e);
        }
        e
    }

    /// Returns the edge record, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::EdgeNotFound`] for a dead or stale id.
    pub fn edge(&self, id: EdgeId) -> Result<&EdgeData, GraphError> {
        self.edges.get(id).ok_or(GraphError::EdgeNotFound)
    }

    #[must_use]
    pub fn contains_edge(&self, id: EdgeId) -> bool {
        self.edges.contains_key(id)
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Live edge ids in arena order.
    #[must_use]
    pub fn edge_ids(&self) -> Vec<EdgeId> {
        self.edges.keys().collect()
    }

    /// Iterates live edges in arena order.
    pub fn edges(&self) -> impl Iterator<Item = (EdgeId, &EdgeData)> {
        self.edges.iter()
    }

    /// Endpoints of an edge.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::EdgeNotFound`] for a dead or stale id.
    pub fn edge_vertices(&self, id: EdgeId) -> Result<(VertexId, VertexId), GraphError> {
        self.edge(id).map(|e| (e.a, e.b))
    }

    /// Endpoint of `edge` opposite to `v`.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::EdgeNotFound`] for a dead edge and
    /// [`GraphError::NotAdjacent`] if `v` is not one of its endpoints.
    pub fn edge_other(&self, edge: EdgeId, v: VertexId) -> Result<VertexId, GraphError> {
        self.edge(edge)?.other(v).ok_or(GraphError::NotAdjacent)
    }

    /// Endpoint positions of an edge.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::EdgeNotFound`] for a dead or stale id.
    pub fn edge_segment(&self, id: EdgeId) -> Result<(Point2, Point2), GraphError> {
        let (a, b) = self.edge_vertices(id)?;
        Ok((self.position(a)?, self.position(b)?))
    }

    /// Euclidean length of an edge.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::EdgeNotFound`] for a dead or stale id.
    pub fn edge_length(&self, id: EdgeId) -> Result<f64, GraphError> {
        let (pa, pb) = self.edge_segment(id)?;
        Ok((pb - pa).norm())
    }

    /// The edge joining `a` and `b`, if any.
    #[must_use]
    pub fn find_edge(&self, a: VertexId, b: VertexId) -> Option<EdgeId> {
        // Scan the smaller incidence list.
        let (from, to) = if self.degree(a) <= self.degree(b) {
            (a, b)
        } else {
            (b, a)
        };
        self.vertex_edges(from)
            .iter()
            .copied()
            .find(|&e| self.edges.get(e).is_some_and(|ed| ed.other(from) == Some(to)))
    }

    // --- Bulk construction ---

    /// Appends a closed loop as a single cycle and returns its vertex ids in
    /// loop order.
    ///
    /// Two points produce a single edge, fewer produce no edges.
    pub fn append_polygon(&mut self, points: &[Point2]) -> Vec<VertexId> {
        let ids = self.append_polyline(points);
        if ids.len() >= 3 {
            self.link(ids[ids.len() - 1], ids[0]);
        }
        ids
    }

    /// Appends an open chain and returns its vertex ids in order.
    pub fn append_polyline(&mut self, points: &[Point2]) -> Vec<VertexId> {
        let ids: Vec<VertexId> = points.iter().map(|&p| self.append_vertex(p)).collect();
        for w in ids.windows(2) {
            self.link(w[0], w[1]);
        }
        ids
    }

    /// Axis-aligned bounds of all vertices as `(min, max)`.
    #[must_use]
    pub fn bounds(&self) -> Option<(Point2, Point2)> {
        let mut it = self.vertices.values().map(|v| v.position);
        let first = it.next()?;
        Some(it.fold((first, first), |(lo, hi), p| {
            (
                Point2::new(lo.x.min(p.x), lo.y.min(p.y)),
                Point2::new(hi.x.max(p.x), hi.y.max(p.y)),
            )
        }))
    }

    /// Returns `true` if the graph has no vertices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }
}
