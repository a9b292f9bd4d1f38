use tracing::warn;

use super::state::FrontState;
use crate::graph::{EdgeId, Graph2, VertexId};

/// Stride of the collapse sweep. Prime, so it visits every edge once unless
/// the edge count is a multiple of it.
const SWEEP_STRIDE: usize = 31_337;

/// Sweeps after which collapsing gives up.
const MAX_COLLAPSE_SWEEPS: usize = 64;

/// A vertex whose position must survive a collapse: any junction or end, or
/// a chain vertex sharper than `sharp_angle_deg`.
fn is_fixed(graph: &Graph2, v: VertexId, sharp_angle_deg: f64) -> bool {
    graph
        .opening_angle(v)
        .is_none_or(|angle| angle < sharp_angle_deg)
}

/// Collapses edges shorter than `min_length`.
///
/// Edges are visited in prime-stride order so that consecutive collapses
/// are spread over the graph instead of eating along one chain. Sweeps
/// repeat until one collapses nothing. Returns the number of collapses.
pub(super) fn collapse_short_edges(
    state: &mut FrontState,
    min_length: f64,
    sharp_angle_deg: f64,
) -> usize {
    let mut total = 0;
    for sweep in 0.. {
        if sweep == MAX_COLLAPSE_SWEEPS {
            warn!(sweeps = MAX_COLLAPSE_SWEEPS, "collapse sweep cap reached");
            break;
        }
        let edges = state.graph.edge_ids();
        let n = edges.len();
        if n == 0 {
            break;
        }
        let stride = if n % SWEEP_STRIDE == 0 { 1 } else { SWEEP_STRIDE };

        let mut collapsed = 0;
        for k in 0..n {
            let e = edges[(k * stride) % n];
            if try_collapse(state, e, min_length, sharp_angle_deg) {
                collapsed += 1;
            }
        }
        total += collapsed;
        if collapsed == 0 {
            break;
        }
    }
    total
}

fn try_collapse(state: &mut FrontState, e: EdgeId, min_length: f64, sharp_angle_deg: f64) -> bool {
    let graph = &state.graph;
    let Ok((a, b)) = graph.edge_vertices(e) else {
        return false;
    };
    let (Ok(pa), Ok(pb)) = (graph.position(a), graph.position(b)) else {
        return false;
    };
    if (pb - pa).norm() >= min_length {
        return false;
    }

    let (keep, remove, at) = match (
        is_fixed(graph, a, sharp_angle_deg),
        is_fixed(graph, b, sharp_angle_deg),
    ) {
        (true, true) => return false,
        (true, false) => (a, b, pa),
        (false, true) => (b, a, pb),
        (false, false) => (a, b, nalgebra::center(&pa, &pb)),
    };
    state.collapse(keep, remove, at).is_ok()
}

/// Splits edges longer than `max_length` at their midpoints until none
/// remain. Returns the number of splits.
pub(super) fn split_long_edges(state: &mut FrontState, max_length: f64) -> usize {
    let too_long = |graph: &Graph2, e: EdgeId| graph.edge_length(e).is_ok_and(|l| l > max_length);

    let mut queue: Vec<EdgeId> = state
        .graph
        .edge_ids()
        .into_iter()
        .filter(|&e| too_long(&state.graph, e))
        .collect();

    let mut splits = 0;
    while let Some(e) = queue.pop() {
        if !too_long(&state.graph, e) {
            continue;
        }
        let Ok(split) = state.split_edge(e) else {
            continue;
        };
        splits += 1;
        for half in [split.original, split.edge] {
            if too_long(&state.graph, half) {
                queue.push(half);
            }
        }
    }
    splits
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::Point2;
    use crate::operations::query::is_valid::GraphIsValid;

    fn front(points: &[Point2], closed: bool) -> FrontState {
        let mut s = FrontState::new(0.1);
        let ids = if closed {
            s.graph.append_polygon(points)
        } else {
            s.graph.append_polyline(points)
        };
        for v in ids {
            let p = s.graph.position(v).unwrap();
            s.grid.insert(v, &p);
        }
        s
    }

    #[test]
    fn split_bounds_every_edge() {
        let mut s = front(
            &[
                Point2::new(0.0, 0.0),
                Point2::new(10.0, 0.0),
                Point2::new(10.0, 1.0),
            ],
            true,
        );
        let splits = split_long_edges(&mut s, 0.3);
        assert!(splits > 0);
        assert!(s
            .graph
            .edge_ids()
            .into_iter()
            .all(|e| s.graph.edge_length(e).unwrap() <= 0.3));
        assert_eq!(s.grid.len(), s.graph.vertex_count());
        assert!(GraphIsValid::new(&s.graph).execute().is_ok());
    }

    #[test]
    fn short_edges_collapse_to_midpoint() {
        let mut s = front(
            &[
                Point2::new(0.0, 0.0),
                Point2::new(1.0, 0.0),
                Point2::new(1.05, 0.0),
                Point2::new(2.0, 0.0),
                Point2::new(1.0, 1.0),
            ],
            true,
        );
        let collapsed = collapse_short_edges(&mut s, 0.1, 140.0);
        assert_eq!(collapsed, 1);
        assert_eq!(s.graph.vertex_count(), 4);
        let mid = s
            .graph
            .vertices()
            .any(|(_, d)| (d.position - Point2::new(1.025, 0.0)).norm() < 1e-12);
        assert!(mid);
    }

    #[test]
    fn sharp_and_end_vertices_stay_in_place() {
        // Open chain: the end vertex is fixed, so the short edge collapses
        // onto it.
        let mut s = front(
            &[
                Point2::new(0.0, 0.0),
                Point2::new(0.05, 0.0),
                Point2::new(1.0, 0.0),
            ],
            false,
        );
        assert_eq!(collapse_short_edges(&mut s, 0.1, 140.0), 1);
        assert!(s
            .graph
            .vertices()
            .any(|(_, d)| d.position == Point2::new(0.0, 0.0)));

        // Two fixed endpoints: nothing happens.
        let mut s = front(&[Point2::new(0.0, 0.0), Point2::new(0.05, 0.0)], false);
        assert_eq!(collapse_short_edges(&mut s, 0.1, 140.0), 0);
        assert_eq!(s.graph.vertex_count(), 2);
    }
}
