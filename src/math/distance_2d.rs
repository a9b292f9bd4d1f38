use super::Point2;

/// Closest point on the segment `a`→`b` to `p`.
///
/// Returns the clamped segment parameter `t` in `[0, 1]` together with the
/// closest point itself. Zero-length segments report `t = 0` and `a`.
#[must_use]
pub fn segment_closest_point(p: &Point2, a: &Point2, b: &Point2) -> (f64, Point2) {
    let d = b - a;
    let len_sq = d.norm_squared();

    if len_sq < 1e-20 {
        // Degenerate segment (zero length).
        return (0.0, *a);
    }

    // Project point onto the infinite line, clamp to [0, 1].
    let t = ((p - a).dot(&d) / len_sq).clamp(0.0, 1.0);
    (t, a + d * t)
}

/// Returns the squared minimum distance from `p` to the segment `a`→`b`.
#[must_use]
pub fn point_segment_distance_sq(p: &Point2, a: &Point2, b: &Point2) -> f64 {
    let (_, closest) = segment_closest_point(p, a, b);
    (p - closest).norm_squared()
}

/// Returns the minimum distance from `p` to the segment `a`→`b`.
#[must_use]
pub fn point_segment_distance(p: &Point2, a: &Point2, b: &Point2) -> f64 {
    point_segment_distance_sq(p, a, b).sqrt()
}
