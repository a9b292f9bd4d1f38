use super::vertex::VertexId;

slotmap::new_key_type! {
    /// Unique identifier for an edge in a [`Graph2`](super::Graph2).
    pub struct EdgeId;
}

/// An undirected edge between two distinct vertices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeData {
    pub a: VertexId,
    pub b: VertexId,
}

impl EdgeData {
    /// Creates an edge record. Endpoint validity is checked by the graph.
    #[must_use]
    pub fn new(a: VertexId, b: VertexId) -> Self {
        Self { a, b }
    }

    /// Returns `true` if `v` is one of the endpoints.
    #[must_use]
    pub fn has(&self, v: VertexId) -> bool {
        self.a == v || self.b == v
    }

    /// Returns the endpoint opposite to `v`, or `None` if `v` is not an
    /// endpoint.
    #[must_use]
    pub fn other(&self, v: VertexId) -> Option<VertexId> {
        if self.a == v {
            Some(self.b)
        } else if self.b == v {
            Some(self.a)
        } else {
            None
        }
    }

    /// Returns `true` if both records connect the same unordered pair.
    #[must_use]
    pub fn same_pair(&self, other: &Self) -> bool {
        (self.a == other.a && self.b == other.b) || (self.a == other.b && self.b == other.a)
    }

    pub(crate) fn repoint(&mut self, from: VertexId, to: VertexId) {
        if self.a == from {
            self.a = to;
        }
        if self.b == from {
            self.b = to;
        }
    }
}
