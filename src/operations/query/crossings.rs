use crate::graph::{EdgeId, Graph2};
use crate::math::intersect_2d::segments_cross_2d;
use crate::spatial::SegmentHashGrid;

/// Counts pairs of edges that cross each other.
///
/// Edges sharing an endpoint are never counted, nor are segments that only
/// touch at an end.
#[derive(Debug)]
pub struct EdgeCrossings<'a> {
    graph: &'a Graph2,
}

impl<'a> EdgeCrossings<'a> {
    /// Creates a new `EdgeCrossings` query.
    #[must_use]
    pub fn new(graph: &'a Graph2) -> Self {
        Self { graph }
    }

    /// Every crossing pair, each reported once with the smaller id first.
    #[must_use]
    pub fn pairs(&self) -> Vec<(EdgeId, EdgeId)> {
        let g = self.graph;
        let segments: Vec<_> = g
            .edge_ids()
            .into_iter()
            .filter_map(|e| Some((e, g.edge_segment(e).ok()?)))
            .collect();
        if segments.is_empty() {
            return Vec::new();
        }

        #[allow(clippy::cast_precision_loss)]
        let mean = segments
            .iter()
            .map(|(_, (a, b))| (b - a).norm())
            .sum::<f64>()
            / segments.len() as f64;
        let mut grid = SegmentHashGrid::new(mean.max(f64::MIN_POSITIVE));
        for (e, (a, b)) in &segments {
            grid.insert(*e, a, b);
        }

        let mut pairs = Vec::new();
        for (e, (a, b)) in &segments {
            let Ok(rec) = g.edge(*e) else { continue };
            let mid = nalgebra::center(a, b);
            grid.for_each_candidate(&mid, 0.5 * (b - a).norm(), |other| {
                if other <= *e {
                    return;
                }
                let Ok(o) = g.edge(other) else { return };
                if rec.has(o.a) || rec.has(o.b) {
                    return;
                }
                if let Ok((c, d)) = g.edge_segment(other) {
                    if segments_cross_2d(a, b, &c, &d) {
                        pairs.push((*e, other));
                    }
                }
            });
        }
        pairs
    }

    #[must_use]
    pub fn execute(&self) -> usize {
        self.pairs().len()
    }
}
