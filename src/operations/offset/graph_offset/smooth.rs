use rayon::prelude::*;

use super::state::FrontState;
use crate::graph::{Graph2, VertexId};
use crate::math::{Point2, Vector2};

/// Bounded Laplacian smoothing.
///
/// Each pass moves every vertex with at least two neighbours a fraction
/// `alpha` toward the average of its neighbours, clamped to `max_move`.
/// Targets are computed from the positions at the start of the pass, so the
/// result does not depend on visiting order.
pub(super) fn run(
    state: &mut FrontState,
    passes: usize,
    alpha: f64,
    max_move: f64,
    parallel: bool,
) {
    for _ in 0..passes {
        let ids: Vec<VertexId> = state
            .graph
            .vertices()
            .filter(|(_, data)| data.degree() >= 2)
            .map(|(v, _)| v)
            .collect();

        let graph = &state.graph;
        let relax = |&v: &VertexId| relaxed_position(graph, v, alpha, max_move).map(|p| (v, p));
        let targets: Vec<(VertexId, Point2)> = if parallel {
            ids.par_iter().filter_map(relax).collect()
        } else {
            ids.iter().filter_map(relax).collect()
        };

        for (v, p) in targets {
            // Vertices cannot disappear between compute and write-back.
            let _ = state.move_vertex(v, p);
        }
    }
}

fn relaxed_position(graph: &Graph2, v: VertexId, alpha: f64, max_move: f64) -> Option<Point2> {
    let p = graph.position(v).ok()?;
    let mut sum = Vector2::zeros();
    let mut count = 0_u32;
    for n in graph.neighbors(v) {
        sum += graph.position(n).ok()?.coords;
        count += 1;
    }
    if count < 2 {
        return None;
    }
    let average = Point2::from(sum / f64::from(count));
    let mut delta = (average - p) * alpha;
    let len = delta.norm();
    if len > max_move {
        delta *= max_move / len;
    }
    Some(p + delta)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn zigzag_is_flattened_and_ends_stay() {
        let mut s = FrontState::new(0.5);
        let ids = s.graph.append_polyline(&[
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.4),
            Point2::new(2.0, 0.0),
        ]);
        for &v in &ids {
            let p = s.graph.position(v).unwrap();
            s.grid.insert(v, &p);
        }

        run(&mut s, 1, 0.5, 10.0, false);
        assert_relative_eq!(s.graph.position(ids[1]).unwrap().y, 0.2, epsilon = 1e-12);
        assert_eq!(s.graph.position(ids[0]).unwrap(), Point2::new(0.0, 0.0));
        assert_eq!(s.graph.position(ids[2]).unwrap(), Point2::new(2.0, 0.0));
    }

    #[test]
    fn move_is_clamped() {
        let mut s = FrontState::new(0.5);
        let ids = s.graph.append_polyline(&[
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 4.0),
            Point2::new(2.0, 0.0),
        ]);
        run(&mut s, 1, 1.0, 0.1, true);
        assert_relative_eq!(s.graph.position(ids[1]).unwrap().y, 3.9, epsilon = 1e-12);
    }
}
