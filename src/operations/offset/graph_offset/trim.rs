use smallvec::SmallVec;
use tracing::{debug, trace};

use super::state::FrontState;
use crate::graph::{EdgeId, VertexId};
use crate::spatial::BoundaryDistanceField;

/// Outcome of [`trim_unreachable`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(super) struct TrimCounts {
    pub vertices: usize,
    pub branches: usize,
}

/// Removes the parts of the front that never reached the target distance.
///
/// Where the region is thinner than twice the offset, opposite fronts fuse
/// and park around the medial axis short of `|target|`. Those vertices are
/// deleted; a dangling branch that the deletion leaves behind is deleted too
/// when it runs through plain chain vertices into a junction. Branches
/// ending at another free end are kept as open chains.
pub(super) fn trim_unreachable(
    state: &mut FrontState,
    field: &BoundaryDistanceField,
    target: f64,
    tolerance: f64,
) -> TrimCounts {
    let sign = target.signum();
    let threshold = target.abs() - tolerance;

    let unreachable: Vec<VertexId> = state
        .graph
        .vertices()
        .filter(|(_, data)| {
            field
                .signed_distance(&data.position)
                .is_some_and(|sd| sd.distance * sign < threshold)
        })
        .map(|(v, _)| v)
        .collect();

    let mut counts = TrimCounts::default();
    let mut touched: Vec<VertexId> = Vec::new();
    for v in unreachable {
        touched.extend(state.graph.neighbors(v));
        if state.remove_vertex(v).is_ok() {
            counts.vertices += 1;
        }
    }

    for t in touched {
        match state.graph.degree(t) {
            0 if state.graph.contains_vertex(t) => {
                if state.remove_vertex(t).is_ok() {
                    counts.vertices += 1;
                }
            }
            1 => {
                if let Some((vertices, edges)) = branch_into_junction(state, t) {
                    trace!(len = edges.len(), "removing dangling branch");
                    for e in edges {
                        let _ = state.remove_edge(e, false);
                    }
                    for v in &vertices {
                        let _ = state.remove_vertex(*v);
                    }
                    counts.vertices += vertices.len();
                    counts.branches += 1;
                }
            }
            _ => {}
        }
    }

    debug!(
        vertices = counts.vertices,
        branches = counts.branches,
        "trimmed unreachable front"
    );
    counts
}

/// Walks from the free end `start` through degree-2 vertices. Returns the
/// walked vertices and edges if the walk stops at a junction, `None` if it
/// stops at another free end.
fn branch_into_junction(
    state: &FrontState,
    start: VertexId,
) -> Option<(SmallVec<[VertexId; 16]>, SmallVec<[EdgeId; 16]>)> {
    let graph = &state.graph;
    let mut vertices: SmallVec<[VertexId; 16]> = SmallVec::new();
    let mut edges: SmallVec<[EdgeId; 16]> = SmallVec::new();
    let mut cur = start;
    let mut came_by: Option<EdgeId> = None;

    loop {
        vertices.push(cur);
        let e = *graph
            .vertex_edges(cur)
            .iter()
            .find(|&&e| Some(e) != came_by)?;
        edges.push(e);
        let next = graph.edge_other(e, cur).ok()?;
        match graph.degree(next) {
            2 => {
                cur = next;
                came_by = Some(e);
            }
            d if d >= 3 => return Some((vertices, edges)),
            _ => return None,
        }
    }
}
