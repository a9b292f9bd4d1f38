mod erode;
pub mod params;
pub mod self_distance;
mod state;

use tracing::{debug, info, warn};

pub use params::RepairParams;
pub use self_distance::{robust_self_distance, SelfDistanceIndex};

use crate::error::Result;
use crate::graph::Graph2;
use state::RepairState;

const MAX_SWEEPS: usize = 256;

/// Counters collected by [`OverlapRepair`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RepairStats {
    /// Sharp corners eroded before the general sweep.
    pub sharp_erosions: usize,
    /// Violating vertices handled by the general sweeps.
    pub swept_vertices: usize,
    /// Nearly straight chain points collapsed during cleanup.
    pub flat_collapses: usize,
    pub removed_edges: usize,
    pub removed_vertices: usize,
}

/// Removes the parts of an offset graph that lie too close to other parts
/// of itself.
///
/// A vertex is in violation when its robust self-distance (see
/// [`robust_self_distance`]) is below the overlap radius. Sharp overlapping
/// corners are opened first, then violators are eroded in sweeps until none
/// is left. Nearly straight points are finally collapsed and the graph is
/// swept once more. On return every vertex keeps at least the overlap radius
/// from the non-local graph.
#[derive(Debug)]
pub struct OverlapRepair {
    params: RepairParams,
}

impl OverlapRepair {
    #[must_use]
    pub fn new(params: RepairParams) -> Self {
        Self { params }
    }

    /// Repairs `graph` in place.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::InvalidInput` for invalid parameters. The
    /// graph is left untouched in that case.
    pub fn execute(&self, graph: &mut Graph2) -> Result<RepairStats> {
        self.params.validate()?;
        let p = &self.params;

        let before = (graph.vertex_count(), graph.edge_count());
        let mut state = RepairState::new(graph, p.overlap_radius, p.chain_radius);
        let mut stats = RepairStats {
            sharp_erosions: erode::sharp_pass(&mut state, p.sharp_angle_deg),
            ..RepairStats::default()
        };
        debug!(eroded = stats.sharp_erosions, "sharp corner pass");

        stats.swept_vertices += sweep_until_clean(&mut state);
        stats.flat_collapses = erode::flat_collapse(&mut state, p.flat_tolerance_deg);
        for v in state.graph.vertex_ids() {
            state.remove_if_isolated(v);
        }
        stats.swept_vertices += sweep_until_clean(&mut state);

        stats.removed_edges = state.removed_edges;
        stats.removed_vertices = state.removed_vertices;
        info!(
            vertices = before.0,
            edges = before.1,
            removed_vertices = stats.removed_vertices,
            removed_edges = stats.removed_edges,
            "overlap repair finished"
        );
        Ok(stats)
    }
}

fn sweep_until_clean(state: &mut RepairState<'_>) -> usize {
    let mut total = 0;
    for round in 0..MAX_SWEEPS {
        let handled = erode::sweep(state);
        debug!(round, handled, "overlap sweep");
        if handled == 0 {
            return total;
        }
        total += handled;
    }
    warn!(sweeps = MAX_SWEEPS, "overlap sweeps did not settle");
    total
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::polygon::Polygon2;
    use crate::math::Point2;
    use crate::operations::offset::{GraphOffset2D, OffsetParams};
    use crate::operations::query::components::ConnectedComponents;
    use crate::operations::query::is_valid::GraphIsValid;

    fn assert_clear(g: &Graph2, params: &RepairParams) {
        for v in g.vertex_ids() {
            let d = robust_self_distance(g, v, params.overlap_radius, params.chain_radius);
            assert!(d >= params.overlap_radius, "vertex {v:?} at {d}");
        }
    }

    /// A closed hairpin: two strands 0.1 apart joined by a tight fold.
    fn hairpin() -> Graph2 {
        let mut pts: Vec<Point2> = (0..=20)
            .map(|i| Point2::new(f64::from(i) * 0.2, 0.0))
            .collect();
        pts.extend((0..=20).rev().map(|i| Point2::new(f64::from(i) * 0.2, 0.1)));
        let mut g = Graph2::new();
        g.append_polygon(&pts);
        g
    }

    #[test]
    fn hairpin_is_eroded_to_a_clear_chain() {
        let mut g = hairpin();
        let params = RepairParams::new(0.3);
        let stats = OverlapRepair::new(params.clone()).execute(&mut g).unwrap();

        assert!(stats.removed_edges > 0);
        assert!(GraphIsValid::new(&g).execute().is_ok());
        assert_clear(&g, &params);
        // What survives is at most one open chain.
        assert!(ConnectedComponents::new(&g).count() <= 1);
        assert!(g.vertices().all(|(_, d)| d.degree() <= 2));
    }

    #[test]
    fn clean_graph_is_untouched() {
        let mut g = Graph2::new();
        g.append_polygon(&Polygon2::circle(Point2::new(0.0, 0.0), 5.0, 64).vertices);
        let stats = OverlapRepair::new(RepairParams::new(0.2))
            .execute(&mut g)
            .unwrap();
        assert_eq!(stats, RepairStats::default());
        assert_eq!(g.vertex_count(), 64);
    }

    #[test]
    fn untrimmed_offset_is_cleared() {
        // A U whose arms are thinner than twice the offset: with trimming off
        // the fronts fuse along the middle of each arm.
        let u = Polygon2::new(vec![
            Point2::new(0.0, 0.0),
            Point2::new(3.0, 0.0),
            Point2::new(3.0, 3.0),
            Point2::new(2.2, 3.0),
            Point2::new(2.2, 0.8),
            Point2::new(0.8, 0.8),
            Point2::new(0.8, 3.0),
            Point2::new(0.0, 3.0),
        ]);
        let params = OffsetParams::new(0.45, 0.2)
            .with_trim_unreachable(false)
            .with_resolve_junctions(false);
        let mut g = GraphOffset2D::new(u, params).execute().unwrap().graph;
        assert!(!g.is_empty());

        let repair = RepairParams::new(0.2);
        OverlapRepair::new(repair.clone()).execute(&mut g).unwrap();
        assert!(!g.is_empty());
        assert!(GraphIsValid::new(&g).execute().is_ok());
        assert_clear(&g, &repair);
    }

    #[test]
    fn invalid_radius_leaves_graph_alone() {
        let mut g = hairpin();
        let n = g.vertex_count();
        assert!(OverlapRepair::new(RepairParams::new(-1.0))
            .execute(&mut g)
            .is_err());
        assert_eq!(g.vertex_count(), n);
    }
}
