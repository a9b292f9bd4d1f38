use smallvec::SmallVec;
use tracing::{trace, warn};

use super::state::FrontState;
use crate::graph::VertexId;

/// Passes after which welding gives up even if merges are still found.
const MAX_PASSES: usize = 64;

/// Welds vertices closer than `merge_distance` until a pass merges nothing.
///
/// Returns the number of merges.
pub(super) fn run(state: &mut FrontState, merge_distance: f64) -> usize {
    let mut total = 0;
    for pass in 0.. {
        if pass == MAX_PASSES {
            warn!(passes = MAX_PASSES, "weld pass cap reached");
            break;
        }
        let merged = weld_pass(state, merge_distance);
        total += merged;
        if merged == 0 {
            break;
        }
    }
    total
}

fn weld_pass(state: &mut FrontState, merge_distance: f64) -> usize {
    let mut merged = 0;
    for v in state.graph.vertex_ids() {
        let Ok(p) = state.graph.position(v) else {
            continue;
        };
        let graph = &state.graph;
        let found = state.grid.find_nearest_in_radius(
            &p,
            merge_distance,
            |u| graph.position(u).map_or(f64::INFINITY, |q| (q - p).norm()),
            |u| u == v || graph.find_edge(u, v).is_some(),
        );
        let Some((u, _)) = found else {
            continue;
        };
        if merge(state, v, u) {
            trace!(?v, ?u, "welded");
            merged += 1;
        }
    }
    merged
}

/// Merges `v` into `u`, keeping `u` where it is.
///
/// A common neighbour of the pair that is left dangling from `u` after the
/// merge would be a one-edge spur; it is collapsed into `u` as well.
fn merge(state: &mut FrontState, v: VertexId, u: VertexId) -> bool {
    let common: SmallVec<[VertexId; 4]> = state
        .graph
        .neighbors(v)
        .filter(|&n| state.graph.find_edge(n, u).is_some())
        .collect();

    let Ok(keep_at) = state.graph.position(u) else {
        return false;
    };
    if state.graph.append_edge(v, u).is_err() {
        return false;
    }
    if state.collapse(u, v, keep_at).is_err() {
        return false;
    }

    for c in common {
        if state.graph.degree(c) == 1 && state.graph.find_edge(c, u).is_some() {
            let _ = state.collapse(u, c, keep_at);
        }
    }
    true
}
