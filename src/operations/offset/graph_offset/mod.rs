mod junction;
mod remesh;
mod smooth;
pub(crate) mod state;
mod step;
mod trim;
mod weld;

use tracing::{debug, info};

use super::params::OffsetParams;
use crate::error::{OperationError, Result};
use crate::geometry::polygon::GeneralPolygon2;
use crate::graph::Graph2;
use crate::math::TOLERANCE;
use crate::spatial::BoundaryDistanceField;
use state::FrontState;

/// Counters collected while offsetting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OffsetStats {
    /// Main iterations performed (settle passes excluded).
    pub iterations: usize,
    /// Vertex pairs merged by welding.
    pub welds: usize,
    /// Edges split by remeshing, seeding included.
    pub splits: usize,
    /// Edges collapsed by remeshing.
    pub collapses: usize,
    /// Vertices removed because they could not reach the target distance.
    pub trimmed_vertices: usize,
    /// Dangling branches removed after trimming.
    pub removed_branches: usize,
    /// Edges detached from junctions.
    pub detached_branches: usize,
}

/// Result of [`GraphOffset2D::execute`].
#[derive(Debug, Clone)]
pub struct OffsetResult {
    pub graph: Graph2,
    pub stats: OffsetStats,
}

/// Offsets the boundary of a polygon with holes by evolving a planar graph.
///
/// The boundary loops are seeded into a graph that is pushed toward the
/// target signed distance in bounded steps. Each iteration steps, smooths,
/// welds fronts that meet and remeshes to keep point spacing roughly
/// uniform. The iteration count is fixed by the distance and spacing.
///
/// Positive distances offset into the material, negative ones away from it.
#[derive(Debug)]
pub struct GraphOffset2D {
    region: GeneralPolygon2,
    params: OffsetParams,
}

impl GraphOffset2D {
    /// Creates a new graph offset operation.
    #[must_use]
    pub fn new(region: impl Into<GeneralPolygon2>, params: OffsetParams) -> Self {
        Self {
            region: region.into(),
            params,
        }
    }

    /// Executes the offset.
    ///
    /// An offset deeper than the region is wide yields an empty graph; that
    /// is a normal outcome, not an error.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::InvalidInput` for invalid parameters and a
    /// `GeometryError` for a degenerate boundary loop.
    pub fn execute(&self) -> Result<OffsetResult> {
        self.params.validate()?;
        self.region.validate()?;

        let p = &self.params;
        let field = BoundaryDistanceField::new(&self.region);
        if field.segment_count() == 0 {
            return Err(OperationError::InvalidInput("region has no boundary".to_owned()).into());
        }

        let mut state = FrontState::new(p.merge_distance());
        for boundary in field.loops() {
            state.append_loop(boundary);
        }

        let mut stats = OffsetStats {
            splits: remesh::split_long_edges(&mut state, p.max_edge_length()),
            ..OffsetStats::default()
        };

        debug!(
            vertices = state.graph.vertex_count(),
            distance = p.distance,
            spacing = p.spacing,
            iterations = p.total_iterations(),
            "seeded offset front"
        );

        if p.distance.abs() < TOLERANCE {
            stats.collapses +=
                remesh::collapse_short_edges(&mut state, p.min_edge_length(), p.sharp_angle_deg);
            return Ok(OffsetResult {
                graph: state.into_graph(),
                stats,
            });
        }

        let dt = p.step_delta();
        for iteration in 0..p.total_iterations() {
            step::run(&mut state, &field, p.distance, dt, p.parallel);
            smooth::run(
                &mut state,
                p.smooth_passes,
                p.smooth_alpha,
                p.smooth_max_move(),
                p.parallel,
            );
            let welds = weld::run(&mut state, p.merge_distance());
            let collapses =
                remesh::collapse_short_edges(&mut state, p.min_edge_length(), p.sharp_angle_deg);
            let splits = remesh::split_long_edges(&mut state, p.max_edge_length());

            stats.iterations += 1;
            stats.welds += welds;
            stats.collapses += collapses;
            stats.splits += splits;

            debug!(
                iteration,
                vertices = state.graph.vertex_count(),
                edges = state.graph.edge_count(),
                welds,
                collapses,
                splits,
                "offset iteration"
            );
        }

        for _ in 0..p.settle_passes {
            step::run(&mut state, &field, p.distance, dt, p.parallel);
        }

        if p.trim_unreachable {
            let trimmed =
                trim::trim_unreachable(&mut state, &field, p.distance, p.trim_tolerance());
            stats.trimmed_vertices = trimmed.vertices;
            stats.removed_branches = trimmed.branches;
        }

        if p.resolve_junctions {
            stats.detached_branches = junction::resolve(&mut state, p.junction_step_back());
        }

        info!(
            vertices = state.graph.vertex_count(),
            edges = state.graph.edge_count(),
            welds = stats.welds,
            trimmed = stats.trimmed_vertices,
            "offset finished"
        );

        Ok(OffsetResult {
            graph: state.into_graph(),
            stats,
        })
    }
}
