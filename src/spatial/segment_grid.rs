use super::cells::GridCells;
use crate::math::Point2;

/// Uniform hash grid over segment payloads.
///
/// Segments are bucketed by their midpoint. The grid tracks the largest
/// half-length ever inserted and widens every query by it, so a segment
/// whose midpoint lies outside the query disc but whose body reaches into
/// it is still visited.
#[derive(Debug, Clone)]
pub struct SegmentHashGrid<K> {
    cells: GridCells<K>,
    max_extent: f64,
}

impl<K: Copy + Eq> SegmentHashGrid<K> {
    #[must_use]
    pub fn new(cell_size: f64) -> Self {
        Self {
            cells: GridCells::new(cell_size),
            max_extent: 0.0,
        }
    }

    #[must_use]
    pub fn cell_size(&self) -> f64 {
        self.cells.cell_size()
    }

    /// Largest half-length inserted so far. Never shrinks on removal.
    #[must_use]
    pub fn max_extent(&self) -> f64 {
        self.max_extent
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.len() == 0
    }

    pub fn insert(&mut self, id: K, a: &Point2, b: &Point2) {
        self.max_extent = self.max_extent.max(0.5 * (b - a).norm());
        self.cells.insert(id, &nalgebra::center(a, b));
    }

    /// Removes `id`, which must have been inserted with endpoints `a`, `b`.
    pub fn remove(&mut self, id: K, a: &Point2, b: &Point2) -> bool {
        self.cells.remove(id, &nalgebra::center(a, b))
    }

    /// Moves `id` from its old endpoints to new ones.
    pub fn update(&mut self, id: K, old: (&Point2, &Point2), new: (&Point2, &Point2)) -> bool {
        self.max_extent = self.max_extent.max(0.5 * (new.1 - new.0).norm());
        self.cells.update(
            id,
            &nalgebra::center(old.0, old.1),
            &nalgebra::center(new.0, new.1),
        )
    }

    pub fn clear(&mut self) {
        self.cells.clear();
        self.max_extent = 0.0;
    }

    /// Visits every segment that could lie within `radius` of `query`.
    pub fn for_each_candidate(&self, query: &Point2, radius: f64, f: impl FnMut(K)) {
        self.cells.for_each_near(query, radius + self.max_extent, f);
    }

    /// Nearest segment within `radius` of `query`, with its distance.
    ///
    /// `distance` measures a segment id against the query point and
    /// `exclude` skips ids, e.g. edges incident to the query vertex.
    pub fn find_nearest_in_radius(
        &self,
        query: &Point2,
        radius: f64,
        distance: impl Fn(K) -> f64,
        exclude: impl Fn(K) -> bool,
    ) -> Option<(K, f64)> {
        let mut best: Option<(K, f64)> = None;
        self.for_each_candidate(query, radius, |id| {
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

    /// All segments within `radius` of `query`, with their distances.
    pub fn find_all_in_radius(
        &self,
        query: &Point2,
        radius: f64,
        distance: impl Fn(K) -> f64,
        exclude: impl Fn(K) -> bool,
    ) -> Vec<(K, f64)> {
        let mut out = Vec::new();
        self.for_each_candidate(query, radius, |id| {
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
