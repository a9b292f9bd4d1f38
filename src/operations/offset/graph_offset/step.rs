use rayon::prelude::*;

use super::state::FrontState;
use crate::graph::VertexId;
use crate::math::Point2;
use crate::spatial::BoundaryDistanceField;

/// Lower bound on the distance error used as an inverse weight.
const ERROR_FLOOR: f64 = 1e-8;

/// Moves every vertex toward the target signed distance.
///
/// Positions are computed from a snapshot (in parallel when requested) and
/// written back sequentially. Returns the number of vertices that moved.
pub(super) fn run(
    state: &mut FrontState,
    field: &BoundaryDistanceField,
    target: f64,
    dt: f64,
    parallel: bool,
) -> usize {
    let snapshot: Vec<(VertexId, Point2)> = state
        .graph
        .vertices()
        .map(|(v, data)| (v, data.position))
        .collect();

    let solve = |&(v, p): &(VertexId, Point2)| (v, predict_correct(field, &p, target, dt));
    let moved: Vec<(VertexId, Point2)> = if parallel {
        snapshot.par_iter().map(solve).collect()
    } else {
        snapshot.iter().map(solve).collect()
    };

    let mut count = 0;
    for ((v, from), (_, to)) in snapshot.iter().zip(moved) {
        if to != *from && state.move_vertex(*v, to).is_ok() {
            count += 1;
        }
    }
    count
}

/// One bounded move from `p` given its signed distance `sd`: along the
/// gradient by `target - sd`, clamped to `dt`.
fn advance(p: &Point2, sd: f64, gradient: &crate::math::Vector2, target: f64, dt: f64) -> Point2 {
    p + gradient * (target - sd).clamp(-dt, dt)
}

/// Predictor-corrector step with inverse-error weighting.
///
/// Takes one step from `p`, a second from the predicted point, and blends
/// the two positions by the inverse of their remaining distance errors.
pub(super) fn predict_correct(
    field: &BoundaryDistanceField,
    p: &Point2,
    target: f64,
    dt: f64,
) -> Point2 {
    let Some(sd0) = field.signed_distance(p) else {
        return *p;
    };
    let p1 = advance(p, sd0.distance, &sd0.gradient, target, dt);
    let Some(sd1) = field.signed_distance(&p1) else {
        return p1;
    };
    let p2 = advance(&p1, sd1.distance, &sd1.gradient, target, dt);
    let Some(sd2) = field.signed_distance(&p2) else {
        return p1;
    };

    let w1 = 1.0 / (target - sd1.distance).abs().max(ERROR_FLOOR);
    let w2 = 1.0 / (target - sd2.distance).abs().max(ERROR_FLOOR);
    Point2::from((p1.coords * w1 + p2.coords * w2) / (w1 + w2))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::geometry::polygon::Polygon2;

    fn square_field() -> BoundaryDistanceField {
        BoundaryDistanceField::new(
            &Polygon2::new(vec![
                Point2::new(0.0, 0.0),
                Point2::new(10.0, 0.0),
                Point2::new(10.0, 10.0),
                Point2::new(0.0, 10.0),
            ])
            .into(),
        )
    }

    #[test]
    fn step_is_bounded_by_dt() {
        let field = square_field();
        // Far from the target: both sub-steps move the full dt.
        let q = predict_correct(&field, &Point2::new(5.0, 0.0), 3.0, 0.1);
        assert_relative_eq!(q.x, 5.0, epsilon = 1e-12);
        assert!(q.y > 0.1 - 1e-12 && q.y <= 0.2 + 1e-12, "y={}", q.y);
    }

    #[test]
    fn lands_on_target_when_within_reach() {
        let field = square_field();
        let q = predict_correct(&field, &Point2::new(5.0, 2.95), 3.0, 0.1);
        assert_relative_eq!(q.y, 3.0, epsilon = 1e-9);
        // Overshoot is pulled back.
        let q = predict_correct(&field, &Point2::new(5.0, 3.04), 3.0, 0.1);
        assert_relative_eq!(q.y, 3.0, epsilon = 1e-9);
    }

    #[test]
    fn negative_target_moves_outward() {
        let field = square_field();
        let q = predict_correct(&field, &Point2::new(5.0, 0.0), -1.0, 0.1);
        assert!(q.y < -0.1 + 1e-12, "y={}", q.y);
    }

    #[test]
    fn parallel_and_sequential_agree() {
        let field = square_field();
        let mut a = FrontState::new(0.1);
        a.append_loop(&[
            Point2::new(1.0, 1.0),
            Point2::new(9.0, 1.0),
            Point2::new(9.0, 9.0),
            Point2::new(1.0, 9.0),
        ]);
        let mut b = FrontState::new(0.1);
        b.append_loop(&[
            Point2::new(1.0, 1.0),
            Point2::new(9.0, 1.0),
            Point2::new(9.0, 9.0),
            Point2::new(1.0, 9.0),
        ]);
        assert_eq!(run(&mut a, &field, 2.0, 0.1, true), 4);
        assert_eq!(run(&mut b, &field, 2.0, 0.1, false), 4);
        for ((_, va), (_, vb)) in a.graph.vertices().zip(b.graph.vertices()) {
            assert_eq!(va.position, vb.position);
        }
    }
}
