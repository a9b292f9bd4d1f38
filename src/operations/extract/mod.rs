//! Walking a finished graph into curves.

use std::collections::HashSet;

use tracing::debug;

use crate::geometry::curve::Curve2;
use crate::graph::{EdgeId, Graph2, VertexId};

/// Walks a graph into closed loops and open chains.
///
/// Chains run between vertices of degree other than two: free ends and
/// junctions. Every edge ends up in exactly one curve, so a junction starts
/// one chain per incident edge. Cycles made only of degree-2 vertices come
/// out closed, starting at their lowest vertex in arena order. Isolated
/// vertices produce nothing.
#[derive(Debug)]
pub struct ExtractCurves<'a> {
    graph: &'a Graph2,
}

impl<'a> ExtractCurves<'a> {
    /// Creates a new `ExtractCurves` operation.
    #[must_use]
    pub fn new(graph: &'a Graph2) -> Self {
        Self { graph }
    }

    #[must_use]
    pub fn execute(&self) -> Vec<Curve2> {
        let g = self.graph;
        let mut used: HashSet<EdgeId> = HashSet::with_capacity(g.edge_count());
        let mut curves = Vec::new();

        let starts = g.vertex_ids();
        for &v in starts.iter().filter(|&&v| g.degree(v) != 2) {
            for &e in g.vertex_edges(v) {
                if !used.contains(&e) {
                    curves.push(self.walk(v, e, &mut used));
                }
            }
        }
        for &v in &starts {
            for &e in g.vertex_edges(v) {
                if !used.contains(&e) {
                    curves.push(self.walk(v, e, &mut used));
                }
            }
        }

        debug!(
            curves = curves.len(),
            closed = curves.iter().filter(|c| c.closed).count(),
            "extracted curves"
        );
        curves
    }

    fn walk(&self, start: VertexId, first: EdgeId, used: &mut HashSet<EdgeId>) -> Curve2 {
        let g = self.graph;
        let mut vertices = vec![start];
        let mut closed = false;
        let mut cur = start;
        let mut e = first;
        loop {
            used.insert(e);
            let Ok(next) = g.edge_other(e, cur) else {
                break;
            };
            if next == start {
                closed = true;
                break;
            }
            vertices.push(next);
            cur = next;
            if g.degree(cur) != 2 {
                break;
            }
            match g.vertex_edges(cur).iter().find(|&&e| !used.contains(&e)) {
                Some(&n) => e = n,
                None => break,
            }
        }

        let points = vertices
            .iter()
            .filter_map(|&v| g.position(v).ok())
            .collect();
        Curve2 {
            vertices,
            points,
            closed,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::math::Point2;

    fn square(g: &mut Graph2, x: f64) -> Vec<VertexId> {
        g.append_polygon(&[
            Point2::new(x, 0.0),
            Point2::new(x + 1.0, 0.0),
            Point2::new(x + 1.0, 1.0),
            Point2::new(x, 1.0),
        ])
    }

    #[test]
    fn cycles_and_chains() {
        let mut g = Graph2::new();
        let sq = square(&mut g, 0.0);
        let chain = g.append_polyline(&[
            Point2::new(5.0, 0.0),
            Point2::new(6.0, 0.0),
            Point2::new(7.0, 0.0),
        ]);
        g.append_vertex(Point2::new(9.0, 9.0));

        let curves = ExtractCurves::new(&g).execute();
        assert_eq!(curves.len(), 2);

        // Chains are found before cycles.
        let open = &curves[0];
        assert!(!open.closed);
        assert_eq!(open.vertices, chain);
        assert_relative_eq!(open.length(), 2.0);

        let loop_ = &curves[1];
        assert!(loop_.closed);
        assert_eq!(loop_.vertices, sq);
        assert_relative_eq!(loop_.length(), 4.0);
    }

    #[test]
    fn junction_splits_into_chains() {
        // Two square lobes sharing a centre vertex: a figure eight.
        let mut g = Graph2::new();
        let c = g.append_vertex(Point2::new(0.0, 0.0));
        for s in [1.0, -1.0] {
            let lobe = [
                g.append_vertex(Point2::new(s, 0.0)),
                g.append_vertex(Point2::new(s, s)),
                g.append_vertex(Point2::new(0.0, s)),
            ];
            g.append_edge(c, lobe[0]).unwrap();
            g.append_edge(lobe[0], lobe[1]).unwrap();
            g.append_edge(lobe[1], lobe[2]).unwrap();
            g.append_edge(lobe[2], c).unwrap();
        }
        assert_eq!(g.degree(c), 4);

        let curves = ExtractCurves::new(&g).execute();
        // Each lobe leaves the junction and returns to it.
        assert_eq!(curves.len(), 2);
        assert!(curves.iter().all(|k| k.closed && k.vertices[0] == c));
        assert!(curves.iter().all(|k| k.len() == 4));
        let edges: usize = curves.iter().map(Curve2::len).sum();
        assert_eq!(edges, g.edge_count());
    }

    #[test]
    fn empty_graph_has_no_curves() {
        assert!(ExtractCurves::new(&Graph2::new()).execute().is_empty());
    }
}
