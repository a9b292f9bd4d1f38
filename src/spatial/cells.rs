use std::collections::HashMap;

use smallvec::SmallVec;

use crate::math::Point2;

pub(crate) type CellKey = (i64, i64);

/// Uniform bucket grid shared by the point and segment indices.
///
/// Ids are bucketed by a single anchor position; callers translate their
/// geometry into an anchor and a search radius.
#[derive(Debug, Clone)]
pub(crate) struct GridCells<K> {
    cell_size: f64,
    inv: f64,
    map: HashMap<CellKey, SmallVec<[K; 4]>>,
    len: usize,
}

impl<K: Copy + Eq> GridCells<K> {
    pub(crate) fn new(cell_size: f64) -> Self {
        Self {
            cell_size,
            inv: 1.0 / cell_size,
            map: HashMap::new(),
            len: 0,
        }
    }

    pub(crate) fn cell_size(&self) -> f64 {
        self.cell_size
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    #[allow(clippy::cast_possible_truncation)]
    pub(crate) fn cell_key(&self, p: &Point2) -> CellKey {
        ((p.x * self.inv).floor() as i64, (p.y * self.inv).floor() as i64)
    }

    pub(crate) fn insert(&mut self, id: K, anchor: &Point2) {
        let key = self.cell_key(anchor);
        self.map.entry(key).or_default().push(id);
        self.len += 1;
    }

    pub(crate) fn remove(&mut self, id: K, anchor: &Point2) -> bool {
        let key = self.cell_key(anchor);
        let Some(bucket) = self.map.get_mut(&key) else {
            return false;
        };
        let Some(i) = bucket.iter().position(|&k| k == id) else {
            return false;
        };
        bucket.swap_remove(i);
        if bucket.is_empty() {
            self.map.remove(&key);
        }
        self.len -= 1;
        true
    }

    /// Moves `id` between anchors. Touches the buckets only when the cell
    /// changes.
    pub(crate) fn update(&mut self, id: K, old: &Point2, new: &Point2) -> bool {
        if self.cell_key(old) == self.cell_key(new) {
            return self
                .map
                .get(&self.cell_key(old))
                .is_some_and(|b| b.contains(&id));
        }
        if self.remove(id, old) {
            self.insert(id, new);
            true
        } else {
            false
        }
    }

    pub(crate) fn clear(&mut self) {
        self.map.clear();
        self.len = 0;
    }

    /// Visits every id whose anchor cell intersects the square of half-size
    /// `reach` around `query`.
    #[allow(clippy::cast_possible_truncation)]
    pub(crate) fn for_each_near(&self, query: &Point2, reach: f64, mut f: impl FnMut(K)) {
        let lo_x = ((query.x - reach) * self.inv).floor();
        let hi_x = ((query.x + reach) * self.inv).floor();
        let lo_y = ((query.y - reach) * self.inv).floor();
        let hi_y = ((query.y + reach) * self.inv).floor();

        // Wide queries walk the occupied buckets instead of the cell range.
        #[allow(clippy::cast_precision_loss)]
        let occupied = self.map.len() as f64;
        let span = (hi_x - lo_x + 1.0) * (hi_y - lo_y + 1.0);
        if !span.is_finite() || span > occupied {
            let (lo_x, hi_x) = (lo_x as i64, hi_x as i64);
            let (lo_y, hi_y) = (lo_y as i64, hi_y as i64);
            for (&(cx, cy), bucket) in &self.map {
                if cx >= lo_x && cx <= hi_x && cy >= lo_y && cy <= hi_y {
                    bucket.iter().copied().for_each(&mut f);
                }
            }
            return;
        }

        for cx in (lo_x as i64)..=(hi_x as i64) {
            for cy in (lo_y as i64)..=(hi_y as i64) {
                if let Some(bucket) = self.map.get(&(cx, cy)) {
                    bucket.iter().copied().for_each(&mut f);
                }
            }
        }
    }
}
