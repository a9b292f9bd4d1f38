use super::cells::GridCells;
use crate::math::Point2;

/// Uniform hash grid over point payloads.
///
/// The grid stores ids only; positions are supplied by the caller on every
/// edit and distances are computed by a caller-provided function, so the
/// same grid serves graph vertices and plain point sets alike.
#[derive(Debug, Clone)]
pub struct PointHashGrid<K> {
    cells: GridCells<K>,
}

impl<K: Copy + Eq> PointHashGrid<K> {
    /// Creates an empty grid. `cell_size` should be close to the expected
    /// query radius.
    #[must_use]
    pub fn new(cell_size: f64) -> Self {
        Self {
            cells: GridCells::new(cell_size),
        }
    }

    #[must_use]
    pub fn cell_size(&self) -> f64 {
        self.cells.cell_size()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.len() == 0
    }

    pub fn insert(&mut self, id: K, position: &Point2) {
        self.cells.insert(id, position);
    }

    /// Removes `id`, which must have been inserted at `position`. Returns
    /// `false` if it was not found there.
    pub fn remove(&mut self, id: K, position: &Point2) -> bool {
        self.cells.remove(id, position)
    }

    /// Moves `id` from `old` to `new`. Returns `false` if it was not found
    /// at `old`.
    pub fn update(&mut self, id: K, old: &Point2, new: &Point2) -> bool {
        self.cells.update(id, old, new)
    }

    pub fn clear(&mut self) {
        self.cells.clear();
    }

    /// Visits every id in cells overlapping the query disc. Candidates are
    /// not filtered by distance.
    pub fn for_each_candidate(&self, query: &Point2, radius: f64, f: impl FnMut(K)) {
        self.cells.for_each_near(query, radius, f);
    }

    /// Nearest id within `radius` of `query`, with its distance.
    ///
    /// `distance` measures an id against the query and `exclude` skips ids
    /// (typically the query vertex and its graph neighbours). Returns `None`
    /// when nothing qualifies.
    pub fn find_nearest_in_radius(
        &self,
        query: &Point2,
        radius: f64,
        distance: impl Fn(K) -> f64,
        exclude: impl Fn(K) -> bool,
    ) -> Option<(K, f64)> {
        let mut best: Option<(K, f64)> = None;
        self.cells.for_each_near(query, radius, |id| {
            if exclude(id) {
                return;
            }
            let d = distance(id);
            if d <= radius && best.is_none_or(|(_, bd)| d < bd) {
                best = Some((id, d));
            }
        });
        best
    }

    /// All ids within `radius` of `query`, with their distances, in no
    /// particular order.
    pub fn find_all_in_radius(
        &self,
        query: &Point2,
        radius: f64,
        distance: impl Fn(K) -> f64,
        exclude: impl Fn(K) -> bool,
    ) -> Vec<(K, f64)> {
        let mut out = Vec::new();
        self.cells.for_each_near(query, radius, |id| {
            if exclude(id) {
                return;
            }
            let d = distance(id);
            if d <= radius {
                out.push((id, d));
            }
        });
        out
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn points() -> Vec<Point2> {
        vec![
            Point2::new(0.0, 0.0),
            Point2::new(0.3, 0.0),
            Point2::new(1.05, 0.0),
            Point2::new(-2.0, -2.0),
        ]
    }

    fn grid(pts: &[Point2]) -> PointHashGrid<usize> {
        let mut g = PointHashGrid::new(0.5);
        for (i, p) in pts.iter().enumerate() {
            g.insert(i, p);
        }
        g
    }

    #[test]
    fn nearest_respects_radius_and_exclusion() {
        let pts = points();
        let g = grid(&pts);
        let q = Point2::new(0.0, 0.0);
        let dist = |i: usize| (pts[i] - q).norm();

        let (id, d) = g.find_nearest_in_radius(&q, 1.0, dist, |_| false).unwrap();
        assert_eq!(id, 0);
        assert!(d.abs() < 1e-12);

        let (id, d) = g.find_nearest_in_radius(&q, 1.0, dist, |i| i == 0).unwrap();
        assert_eq!(id, 1);
        assert!((d - 0.3).abs() < 1e-12);

        // 1.05 is outside the radius even though its cell is scanned.
        assert!(g
            .find_nearest_in_radius(&q, 1.0, dist, |i| i < 2)
            .is_none());
    }

    #[test]
    fn update_moves_between_cells() {
        let mut pts = points();
        let mut g = grid(&pts);
        let old = pts[3];
        pts[3] = Point2::new(0.1, 0.1);
        assert!(g.update(3, &old, &pts[3]));
        assert_eq!(g.len(), 4);

        let q = Point2::new(0.1, 0.1);
        let dist = |i: usize| (pts[i] - q).norm();
        let (id, _) = g.find_nearest_in_radius(&q, 0.05, dist, |_| false).unwrap();
        assert_eq!(id, 3);

        // Stale position is not found.
        assert!(!g.remove(3, &old));
        assert!(g.remove(3, &pts[3]));
        assert_eq!(g.len(), 3);
    }

    #[test]
    fn find_all_and_unbounded_radius() {
        let pts = points();
        let g = grid(&pts);
        let q = Point2::new(0.0, 0.0);
        let dist = |i: usize| (pts[i] - q).norm();

        let mut near: Vec<usize> = g
            .find_all_in_radius(&q, 0.5, dist, |_| false)
            .into_iter()
            .map(|(i, _)| i)
            .collect();
        near.sort_unstable();
        assert_eq!(near, vec![0, 1]);

        let all = g.find_all_in_radius(&q, f64::INFINITY, dist, |_| false);
        assert_eq!(all.len(), 4);
    }
}
