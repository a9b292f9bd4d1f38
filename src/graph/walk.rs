use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet, VecDeque};

use super::{Graph2, VertexId};
use crate::math::polygon_2d::opening_angle_deg;

/// Pending vertex in the bounded shortest-path search.
#[derive(Debug, Clone, Copy)]
struct Frontier {
    dist: f64,
    vertex: VertexId,
}

impl PartialEq for Frontier {
    fn eq(&self, other: &Self) -> bool {
        self.dist.total_cmp(&other.dist) == Ordering::Equal
    }
}

impl Eq for Frontier {}

impl PartialOrd for Frontier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Frontier {
    // Reversed so the max-heap pops the closest vertex first.
    fn cmp(&self, other: &Self) -> Ordering {
        other.dist.total_cmp(&self.dist)
    }
}

impl Graph2 {
    /// Opening angle in degrees at a degree-2 vertex.
    ///
    /// 180° is a straight pass-through, small values are sharp corners.
    /// Returns `None` for any other degree or a dead id.
    #[must_use]
    pub fn opening_angle(&self, v: VertexId) -> Option<f64> {
        if self.degree(v) != 2 {
            return None;
        }
        let mut it = self.neighbors(v);
        let a = self.position(it.next()?).ok()?;
        let b = self.position(it.next()?).ok()?;
        let p = self.position(v).ok()?;
        Some(opening_angle_deg(&a, &p, &b))
    }

    /// All vertices reachable from `v` along a path of total edge length at
    /// most `radius`, including `v` itself.
    ///
    /// Empty for a dead id.
    #[must_use]
    pub fn local_vertices(&self, v: VertexId, radius: f64) -> HashSet<VertexId> {
        let mut best: HashMap<VertexId, f64> = HashMap::new();
        if !self.contains_vertex(v) {
            return HashSet::new();
        }
        let mut heap = BinaryHeap::new();
        best.insert(v, 0.0);
        heap.push(Frontier { dist: 0.0, vertex: v });

        while let Some(Frontier { dist, vertex }) = heap.pop() {
            if best.get(&vertex).is_some_and(|&d| dist > d) {
                continue;
            }
            let Ok(p) = self.position(vertex) else {
                continue;
            };
            for n in self.neighbors(vertex) {
                let Ok(q) = self.position(n) else {
                    continue;
                };
                let nd = dist + (q - p).norm();
                if nd > radius {
                    continue;
                }
                if best.get(&n).is_none_or(|&d| nd < d) {
                    best.insert(n, nd);
                    heap.push(Frontier { dist: nd, vertex: n });
                }
            }
        }

        best.into_keys().collect()
    }

    /// Connected components, each listed in breadth-first order from its
    /// lowest arena-order vertex. Components are ordered by that vertex.
    #[must_use]
    pub fn connected_components(&self) -> Vec<Vec<VertexId>> {
        let mut seen: HashSet<VertexId> = HashSet::with_capacity(self.vertex_count());
        let mut components = Vec::new();

        for start in self.vertices.keys() {
            if !seen.insert(start) {
                continue;
            }
            let mut component = Vec::new();
            let mut queue = VecDeque::from([start]);
            while let Some(v) = queue.pop_front() {
                component.push(v);
                for n in self.neighbors(v) {
                    if seen.insert(n) {
                        queue.push_back(n);
                    }
                }
            }
            components.push(component);
        }

        components
    }
}
