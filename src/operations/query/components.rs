use crate::graph::{Graph2, VertexId};

/// Connected components of a [`Graph2`].
///
/// Isolated vertices count as components of their own.
#[derive(Debug)]
pub struct ConnectedComponents<'a> {
    graph: &'a Graph2,
}

impl<'a> ConnectedComponents<'a> {
    /// Creates a new `ConnectedComponents` query.
    #[must_use]
    pub fn new(graph: &'a Graph2) -> Self {
        Self { graph }
    }

    /// Vertex ids of each component, in arena order of their first vertex.
    #[must_use]
    pub fn execute(&self) -> Vec<Vec<VertexId>> {
        self.graph.connected_components()
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.execute().len()
    }
}
