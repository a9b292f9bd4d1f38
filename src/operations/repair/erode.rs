use smallvec::SmallVec;
use tracing::trace;

use super::state::RepairState;
use crate::graph::{EdgeId, VertexId};

/// Removes `edge` from `start` and keeps eating along the chain it leads to.
///
/// The walk continues while the vertex reached is a free end that still
/// violates the overlap radius, so a spur that only existed because of the
/// overlap is removed entirely. Returns the number of edges removed.
pub(super) fn erode(state: &mut RepairState<'_>, start: VertexId, edge: EdgeId) -> usize {
    let mut cur = start;
    let mut e = edge;
    let mut removed = 0;
    loop {
        let Ok(next) = state.graph.edge_other(e, cur) else {
            break;
        };
        if state.remove_edge(e).is_err() {
            break;
        }
        removed += 1;
        state.remove_if_isolated(cur);
        if state.remove_if_isolated(next) {
            break;
        }
        if state.graph.degree(next) != 1 || !state.violates(next) {
            break;
        }
        let Some(&sole) = state.graph.vertex_edges(next).first() else {
            break;
        };
        cur = next;
        e = sole;
    }
    removed
}

/// Erodes sharp corners that overlap, sharpest first. Returns the number of
/// corners eroded.
///
/// A corner is opened on the side whose neighbour is closer to the rest of
/// the graph; on a tie the first incident edge is taken.
pub(super) fn sharp_pass(state: &mut RepairState<'_>, sharp_angle_deg: f64) -> usize {
    let mut candidates: Vec<(f64, VertexId)> = state
        .graph
        .vertex_ids()
        .into_iter()
        .filter_map(|v| {
            state
                .graph
                .opening_angle(v)
                .filter(|&a| a < sharp_angle_deg)
                .map(|a| (a, v))
        })
        .collect();
    candidates.sort_by(|x, y| x.0.total_cmp(&y.0));

    let mut eroded = 0;
    for (_, v) in candidates {
        if !state
            .graph
            .opening_angle(v)
            .is_some_and(|a| a < sharp_angle_deg)
        {
            continue;
        }
        if !state.violates(v) {
            continue;
        }
        let side = state
            .graph
            .vertex_edges(v)
            .iter()
            .filter_map(|&e| {
                let w = state.graph.edge_other(e, v).ok()?;
                Some((state.self_distance(w), e))
            })
            .min_by(|x, y| x.0.total_cmp(&y.0));
        if let Some((_, e)) = side {
            trace!(?v, "eroding sharp corner");
            erode(state, v, e);
            eroded += 1;
        }
    }
    eroded
}

/// One general pass over every vertex, sharpest corner first. Free ends and
/// junctions come last.
///
/// A violating vertex loses all of its edges, each eroded onward. Returns
/// the number of violating vertices handled; zero means the graph is clean.
pub(super) fn sweep(state: &mut RepairState<'_>) -> usize {
    let mut order: Vec<(f64, VertexId)> = state
        .graph
        .vertex_ids()
        .into_iter()
        .map(|v| (state.graph.opening_angle(v).unwrap_or(f64::MAX), v))
        .collect();
    order.sort_by(|x, y| x.0.total_cmp(&y.0));

    let mut handled = 0;
    for (_, v) in order {
        if !state.violates(v) {
            continue;
        }
        let edges: SmallVec<[EdgeId; 4]> = state.graph.vertex_edges(v).iter().copied().collect();
        for e in edges {
            if state.graph.contains_vertex(v) && state.graph.contains_edge(e) {
                erode(state, v, e);
            }
        }
        state.remove_if_isolated(v);
        handled += 1;
    }
    handled
}

/// Collapses nearly straight chain points into a neighbour. Returns the
/// number of collapses.
///
/// A collapse that would close a triangle into a doubled edge is skipped.
pub(super) fn flat_collapse(state: &mut RepairState<'_>, flat_tolerance_deg: f64) -> usize {
    let limit = 180.0 - flat_tolerance_deg;
    let mut collapsed = 0;
    for v in state.graph.vertex_ids() {
        if !state.graph.opening_angle(v).is_some_and(|a| a > limit) {
            continue;
        }
        let nbrs: SmallVec<[VertexId; 2]> = state.graph.neighbors(v).take(2).collect();
        let [n1, n2] = nbrs[..] else {
            continue;
        };
        if state.graph.find_edge(n1, n2).is_some() {
            continue;
        }
        if state.collapse(n1, v).is_ok() {
            collapsed += 1;
        }
    }
    collapsed
}
