use smallvec::SmallVec;

use super::edge::EdgeId;
use crate::math::Point2;

slotmap::new_key_type! {
    /// Unique identifier for a vertex in a [`Graph2`](super::Graph2).
    pub struct VertexId;
}

/// Auxiliary per-vertex annotation (scalars or packed normals).
pub type VertexTag = SmallVec<[f64; 4]>;

/// Data associated with a graph vertex.
#[derive(Debug, Clone)]
pub struct VertexData {
    /// The 2D position of the vertex.
    pub position: Point2,
    /// Caller-defined annotation; empty when the vertex carries none.
    pub tag: VertexTag,
    /// Incident edges, in insertion order.
    pub(crate) edges: SmallVec<[EdgeId; 4]>,
}

impl VertexData {
    /// Creates an untagged vertex with no incident edges.
    #[must_use]
    pub fn new(position: Point2) -> Self {
        Self {
            position,
            tag: VertexTag::new(),
            edges: SmallVec::new(),
        }
    }

    /// Creates a vertex carrying `tag`.
    #[must_use]
    pub fn with_tag(position: Point2, tag: &[f64]) -> Self {
        Self {
            position,
            tag: VertexTag::from_slice(tag),
            edges: SmallVec::new(),
        }
    }

    /// Incident edges of this vertex.
    #[must_use]
    pub fn edges(&self) -> &[EdgeId] {
        &self.edges
    }

    #[must_use]
    pub fn degree(&self) -> usize {
        self.edges.len()
    }

    pub(crate) fn detach(&mut self, edge: EdgeId) {
        if let Some(i) = self.edges.iter().position(|&e| e == edge) {
            self.edges.remove(i);
        }
    }

    pub(crate) fn replace_edge(&mut self, old: EdgeId, new: EdgeId) {
        if let Some(slot) = self.edges.iter_mut().find(|e| **e == old) {
            *slot = new;
        }
    }
}
