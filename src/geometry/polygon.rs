use crate::error::GeometryError;
use crate::math::polygon_2d::{polyline_length, signed_area_2d};
use crate::math::{Point2, Vector2, TOLERANCE};

/// A closed loop of 2D points.
///
/// The last vertex connects back to the first; the closing point is not
/// repeated.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon2 {
    pub vertices: Vec<Point2>,
}

impl Polygon2 {
    /// Creates a polygon from its loop vertices.
    #[must_use]
    pub fn new(vertices: Vec<Point2>) -> Self {
        Self { vertices }
    }

    /// Regular polygon approximating a circle.
    ///
    /// The first vertex sits at angle 0 and the loop runs counter-clockwise.
    #[must_use]
    pub fn circle(center: Point2, radius: f64, segments: usize) -> Self {
        #[allow(clippy::cast_precision_loss)]
        let step = std::f64::consts::TAU / segments as f64;
        let vertices = (0..segments)
            .map(|i| {
                #[allow(clippy::cast_precision_loss)]
                let angle = step * i as f64;
                center + Vector2::new(angle.cos(), angle.sin()) * radius
            })
            .collect();
        Self { vertices }
    }

    /// Shoelace area, positive for counter-clockwise loops.
    #[must_use]
    pub fn signed_area(&self) -> f64 {
        signed_area_2d(&self.vertices)
    }

    #[must_use]
    pub fn is_ccw(&self) -> bool {
        self.signed_area() > 0.0
    }

    /// Reverses the winding in place.
    pub fn reverse(&mut self) {
        self.vertices.reverse();
    }

    /// Returns a copy with the opposite winding.
    #[must_use]
    pub fn reversed(&self) -> Self {
        let mut out = self.clone();
        out.reverse();
        out
    }

    /// Moves every vertex by `offset`.
    #[must_use]
    pub fn translate(mut self, offset: Vector2) -> Self {
        for v in &mut self.vertices {
            *v += offset;
        }
        self
    }

    /// Number of segments, including the closing one.
    #[must_use]
    pub fn segment_count(&self) -> usize {
        self.vertices.len()
    }

    /// Returns the endpoints of segment `i` (from vertex `i` to vertex `i + 1`,
    /// wrapping around), or `None` for an empty loop.
    #[must_use]
    pub fn segment(&self, i: usize) -> Option<(Point2, Point2)> {
        let n = self.vertices.len();
        if n == 0 {
            return None;
        }
        Some((self.vertices[i % n], self.vertices[(i + 1) % n]))
    }

    #[must_use]
    pub fn perimeter(&self) -> f64 {
        polyline_length(&self.vertices, true)
    }

    /// Checks that the loop can bound a region.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::Degenerate`] if the loop has fewer than
    /// 3 vertices, a non-finite coordinate, or zero area.
    pub fn validate(&self) -> Result<(), GeometryError> {
        if self.vertices.len() < 3 {
            return Err(GeometryError::Degenerate(format!(
                "polygon needs at least 3 vertices, got {}",
                self.vertices.len()
            )));
        }
        if self
            .vertices
            .iter()
            .any(|p| !p.x.is_finite() || !p.y.is_finite())
        {
            return Err(GeometryError::Degenerate(
                "polygon has non-finite coordinates".into(),
            ));
        }
        if self.signed_area().abs() < TOLERANCE {
            return Err(GeometryError::Degenerate("polygon has zero area".into()));
        }
        Ok(())
    }
}

/// A region bounded by one outer loop and any number of hole loops.
///
/// Winding of the input loops is not significant; consumers re-orient as
/// needed.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneralPolygon2 {
    pub outer: Polygon2,
    pub holes: Vec<Polygon2>,
}

impl GeneralPolygon2 {
    /// Creates a region without holes.
    #[must_use]
    pub fn new(outer: Polygon2) -> Self {
        Self {
            outer,
            holes: Vec::new(),
        }
    }

    pub fn add_hole(&mut self, hole: Polygon2) {
        self.holes.push(hole);
    }

    /// Builder-style variant of [`add_hole`](Self::add_hole).
    #[must_use]
    pub fn with_hole(mut self, hole: Polygon2) -> Self {
        self.holes.push(hole);
        self
    }

    /// Iterates the outer loop followed by the holes.
    pub fn loops(&self) -> impl Iterator<Item = &Polygon2> {
        std::iter::once(&self.outer).chain(self.holes.iter())
    }

    /// Validates every loop.
    ///
    /// # Errors
    ///
    /// Returns the first [`GeometryError`] reported by a loop.
    pub fn validate(&self) -> Result<(), GeometryError> {
        self.loops().try_for_each(Polygon2::validate)
    }
}

impl From<Polygon2> for GeneralPolygon2 {
    fn from(outer: Polygon2) -> Self {
        Self::new(outer)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn square(side: f64) -> Polygon2 {
        Polygon2::new(vec![
            Point2::new(0.0, 0.0),
            Point2::new(side, 0.0),
            Point2::new(side, side),
            Point2::new(0.0, side),
        ])
    }

    #[test]
    fn circle_is_ccw_and_starts_at_angle_zero() {
        let c = Polygon2::circle(Point2::new(1.0, 2.0), 3.0, 64);
        assert_eq!(c.vertices.len(), 64);
        assert!(c.is_ccw());
        assert_relative_eq!(c.vertices[0].x, 4.0, epsilon = 1e-12);
        assert_relative_eq!(c.vertices[0].y, 2.0, epsilon = 1e-12);
        // Inscribed 64-gon area is just below pi r^2.
        let area = c.signed_area();
        assert!(area < std::f64::consts::PI * 9.0 && area > 0.99 * std::f64::consts::PI * 9.0);
    }

    #[test]
    fn reversed_flips_area_sign() {
        let sq = square(2.0);
        assert_relative_eq!(sq.signed_area(), 4.0);
        assert_relative_eq!(sq.reversed().signed_area(), -4.0);
        assert!(!sq.reversed().is_ccw());
    }

    #[test]
    fn segment_wraps_around() {
        let sq = square(1.0);
        assert_eq!(sq.segment_count(), 4);
        let (a, b) = sq.segment(3).unwrap();
        assert_eq!(a, Point2::new(0.0, 1.0));
        assert_eq!(b, Point2::new(0.0, 0.0));
        assert_relative_eq!(sq.perimeter(), 4.0);
    }

    #[test]
    fn empty_loop_has_no_segment() {
        let empty = Polygon2::new(Vec::new());
        assert_eq!(empty.segment_count(), 0);
        assert!(empty.segment(0).is_none());
    }

    #[test]
    fn translate_moves_vertices() {
        let sq = square(1.0).translate(Vector2::new(5.0, -1.0));
        assert_eq!(sq.vertices[0], Point2::new(5.0, -1.0));
    }

    #[test]
    fn validate_rejects_degenerate_loops() {
        assert!(square(1.0).validate().is_ok());
        let two = Polygon2::new(vec![Point2::new(0.0, 0.0), Point2::new(1.0, 0.0)]);
        assert!(two.validate().is_err());
        let flat = Polygon2::new(vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(2.0, 0.0),
        ]);
        assert!(flat.validate().is_err());
        let nan = Polygon2::new(vec![
            Point2::new(0.0, 0.0),
            Point2::new(f64::NAN, 0.0),
            Point2::new(0.0, 1.0),
        ]);
        assert!(nan.validate().is_err());
    }

    #[test]
    fn general_polygon_loops_and_validation() {
        let region = GeneralPolygon2::new(square(10.0))
            .with_hole(square(1.0).translate(Vector2::new(2.0, 2.0)));
        assert_eq!(region.loops().count(), 2);
        assert!(region.validate().is_ok());

        let mut bad = region.clone();
        bad.add_hole(Polygon2::new(vec![Point2::new(0.0, 0.0)]));
        assert!(bad.validate().is_err());
    }
}
