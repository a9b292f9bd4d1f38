use super::{Point2, Vector2, TOLERANCE};

/// Computes the signed area of a closed point loop (shoelace formula).
///
/// Positive for counter-clockwise, negative for clockwise.
#[must_use]
pub fn signed_area_2d(points: &[Point2]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        sum += points[i].x * points[j].y - points[j].x * points[i].y;
    }
    sum * 0.5
}

/// Total length of a point sequence, including the closing segment when
/// `closed` is set.
#[must_use]
pub fn polyline_length(points: &[Point2], closed: bool) -> f64 {
    let n = points.len();
    if n < 2 {
        return 0.0;
    }
    let mut length: f64 = points.windows(2).map(|w| (w[1] - w[0]).norm()).sum();
    if closed {
        length += (points[0] - points[n - 1]).norm();
    }
    length
}

/// Angle in degrees between the directions `v → a` and `v → b`, measured
/// through `v`.
///
/// 180° means `a`, `v`, `b` are collinear with `v` in the middle; small
/// values mean a sharp corner. Zero-length arms are treated as flat.
#[must_use]
pub fn opening_angle_deg(a: &Point2, v: &Point2, b: &Point2) -> f64 {
    let da = a - v;
    let db = b - v;
    let la = da.norm();
    let lb = db.norm();
    if la < TOLERANCE || lb < TOLERANCE {
        return 180.0;
    }
    let cos = (da.dot(&db) / (la * lb)).clamp(-1.0, 1.0);
    cos.acos().to_degrees()
}

/// Returns the right-pointing normal of a direction vector.
///
/// For a counter-clockwise loop this points out of the enclosed region.
#[must_use]
pub fn right_normal(dir: Vector2) -> Vector2 {
    Vector2::new(dir.y, -dir.x)
}
