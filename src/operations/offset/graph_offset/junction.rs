use smallvec::SmallVec;
use tracing::trace;

use super::state::FrontState;
use crate::graph::{EdgeId, VertexId};
use crate::math::Vector2;

/// Splits every junction into one through-going pair and detached branches.
///
/// At a vertex with three or more edges the pair of edges forming the most
/// obtuse angle stays attached. Every other edge is cut loose and re-anchored
/// on a new vertex `step_back` from the junction along its own direction
/// (at most half way along the edge). Returns the number of detached edges.
pub(super) fn resolve(state: &mut FrontState, step_back: f64) -> usize {
    let mut detached = 0;
    for v in state.graph.vertex_ids() {
        if state.graph.degree(v) < 3 {
            continue;
        }
        detached += resolve_one(state, v, step_back);
    }
    detached
}

fn resolve_one(state: &mut FrontState, v: VertexId, step_back: f64) -> usize {
    let Ok(p) = state.graph.position(v) else {
        return 0;
    };
    let arms: SmallVec<[(EdgeId, VertexId, Vector2, f64); 4]> = state
        .graph
        .vertex_edges(v)
        .iter()
        .filter_map(|&e| {
            let w = state.graph.edge_other(e, v).ok()?;
            let d = state.graph.position(w).ok()? - p;
            let len = d.norm();
            let dir = if len > 0.0 { d / len } else { Vector2::zeros() };
            Some((e, w, dir, len))
        })
        .collect();

    // Most obtuse pair has the smallest cosine.
    let mut best = (0, 1);
    let mut best_cos = f64::INFINITY;
    for i in 0..arms.len() {
        for j in (i + 1)..arms.len() {
            let cos = arms[i].2.dot(&arms[j].2);
            if cos < best_cos {
                best_cos = cos;
                best = (i, j);
            }
        }
    }

    let mut detached = 0;
    for (k, &(e, w, dir, len)) in arms.iter().enumerate() {
        if k == best.0 || k == best.1 {
            continue;
        }
        if state.remove_edge(e, false).is_err() {
            continue;
        }
        detached += 1;
        if len > 0.0 && state.graph.contains_vertex(w) {
            let anchor = state.append_vertex(p + dir * step_back.min(len * 0.5));
            if state.graph.append_edge(anchor, w).is_err() {
                let _ = state.remove_vertex(anchor);
            }
        }
    }
    if detached > 0 {
        trace!(?v, detached, "resolved junction");
    }
    detached
}
