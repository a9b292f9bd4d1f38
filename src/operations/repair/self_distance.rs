use std::collections::HashSet;

use crate::graph::{EdgeId, Graph2, VertexId};
use crate::math::distance_2d::point_segment_distance;
use crate::math::Point2;
use crate::spatial::SegmentHashGrid;

/// Robust self-distance of `v`: the distance from `v` to the nearest edge
/// with no endpoint within `chain_radius` of `v` along the graph.
///
/// Only edges closer than `overlap_radius` are considered; `+inf` when there
/// are none, and for a dead id. Scans every edge; see [`SelfDistanceIndex`]
/// for the accelerated form.
#[must_use]
pub fn robust_self_distance(
    graph: &Graph2,
    v: VertexId,
    overlap_radius: f64,
    chain_radius: f64,
) -> f64 {
    let Ok(p) = graph.position(v) else {
        return f64::INFINITY;
    };
    let local = graph.local_vertices(v, chain_radius);
    graph
        .edges()
        .filter(|(_, e)| !local.contains(&e.a) && !local.contains(&e.b))
        .filter_map(|(id, _)| edge_distance(graph, id, &p))
        .filter(|&d| d <= overlap_radius)
        .fold(f64::INFINITY, f64::min)
}

fn edge_distance(graph: &Graph2, e: EdgeId, p: &Point2) -> Option<f64> {
    let (a, b) = graph.edge_segment(e).ok()?;
    Some(point_segment_distance(p, &a, &b))
}

/// Segment grid over a graph's edges, answering robust self-distance
/// queries without scanning the whole graph.
///
/// The index does not observe the graph; every edge removal or geometry
/// change must be reported through [`remove`](Self::remove) and
/// [`insert`](Self::insert).
#[derive(Debug, Clone)]
pub struct SelfDistanceIndex {
    grid: SegmentHashGrid<EdgeId>,
    overlap_radius: f64,
    chain_radius: f64,
}

impl SelfDistanceIndex {
    /// Indexes every edge of `graph`.
    #[must_use]
    pub fn new(graph: &Graph2, overlap_radius: f64, chain_radius: f64) -> Self {
        let mut grid = SegmentHashGrid::new(overlap_radius.max(f64::MIN_POSITIVE));
        for (id, e) in graph.edges() {
            if let (Ok(a), Ok(b)) = (graph.position(e.a), graph.position(e.b)) {
                grid.insert(id, &a, &b);
            }
        }
        Self {
            grid,
            overlap_radius,
            chain_radius,
        }
    }

    pub fn insert(&mut self, e: EdgeId, a: &Point2, b: &Point2) {
        self.grid.insert(e, a, b);
    }

    pub fn remove(&mut self, e: EdgeId, a: &Point2, b: &Point2) {
        self.grid.remove(e, a, b);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.grid.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.grid.is_empty()
    }

    /// Same value as [`robust_self_distance`] for the indexed graph.
    #[must_use]
    pub fn query(&self, graph: &Graph2, v: VertexId) -> f64 {
        let Ok(p) = graph.position(v) else {
            return f64::INFINITY;
        };
        let local: HashSet<VertexId> = graph.local_vertices(v, self.chain_radius);
        self.grid
            .find_nearest_in_radius(
                &p,
                self.overlap_radius,
                |e| edge_distance(graph, e, &p).unwrap_or(f64::INFINITY),
                |e| {
                    graph
                        .edge(e)
                        .map_or(true, |rec| local.contains(&rec.a) || local.contains(&rec.b))
                },
            )
            .map_or(f64::INFINITY, |(_, d)| d)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    /// Two parallel strands joined at one end, 0.1 apart.
    fn hairpin() -> (Graph2, Vec<VertexId>) {
        let mut g = Graph2::new();
        let mut pts: Vec<Point2> = (0..=10).map(|i| Point2::new(f64::from(i) * 0.2, 0.0)).collect();
        pts.extend((0..=10).rev().map(|i| Point2::new(f64::from(i) * 0.2, 0.1)));
        let ids = g.append_polyline(&pts);
        (g, ids)
    }

    #[test]
    fn own_chain_is_ignored() {
        let mut g = Graph2::new();
        let ids = g.append_polyline(&[
            Point2::new(0.0, 0.0),
            Point2::new(0.2, 0.0),
            Point2::new(0.4, 0.0),
        ]);
        assert!(robust_self_distance(&g, ids[1], 0.3, 0.6).is_infinite());
    }

    #[test]
    fn opposite_strand_is_detected() {
        let (g, ids) = hairpin();
        // Far end of the lower strand faces the upper strand at 0.1.
        let d = robust_self_distance(&g, ids[0], 0.3, 0.6);
        assert!((d - 0.1).abs() < 1e-12, "d={d}");
        // Near the fold the other strand is within the chain radius.
        let fold = ids[10];
        assert!(robust_self_distance(&g, fold, 0.3, 0.6).is_infinite());
    }

    #[test]
    fn index_matches_brute_force() {
        let (g, ids) = hairpin();
        let index = SelfDistanceIndex::new(&g, 0.3, 0.6);
        assert_eq!(index.len(), g.edge_count());
        for &v in &ids {
            let brute = robust_self_distance(&g, v, 0.3, 0.6);
            let fast = index.query(&g, v);
            assert!(
                (brute.is_infinite() && fast.is_infinite()) || (brute - fast).abs() < 1e-12,
                "v={v:?} brute={brute} fast={fast}"
            );
        }
    }
}
