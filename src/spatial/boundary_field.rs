//! Signed distance to the boundary of a polygon with holes.
//!
//! A bounding volume hierarchy over the boundary segments answers nearest
//! segment queries in logarithmic time. The field is immutable after
//! construction and is shared across threads during the parallel step phase.

use smallvec::SmallVec;

use super::aabb::Aabb;
use crate::geometry::polygon::GeneralPolygon2;
use crate::math::distance_2d::segment_closest_point;
use crate::math::polygon_2d::{right_normal, signed_area_2d};
use crate::math::{Point2, Vector2};

const MAX_LEAF_SIZE: usize = 4;

/// Parameter slack under which a hit counts as landing on a loop vertex.
const VERTEX_T_EPS: f64 = 1e-9;

/// Closest boundary location to a query point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundaryHit {
    /// Index of the loop (0 is the outer loop, then holes in input order).
    pub loop_index: usize,
    /// Segment index within the loop; segment `i` runs from vertex `i` to
    /// vertex `i + 1`.
    pub segment_index: usize,
    /// Parameter along the segment in `[0, 1]`.
    pub t: f64,
    /// Nearest point on the boundary.
    pub point: Point2,
    /// Squared distance from the query point to `point`.
    pub distance_sq: f64,
}

/// Signed distance with its gradient.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignedDistance {
    /// Positive inside the material, negative outside.
    pub distance: f64,
    /// Unit direction in which the signed distance increases.
    pub gradient: Vector2,
    pub hit: BoundaryHit,
}

#[derive(Debug, Clone, Copy)]
struct BoundarySegment {
    loop_index: usize,
    segment_index: usize,
    a: Point2,
    b: Point2,
}

/// BVH node containing either leaf segments or child nodes.
#[derive(Debug)]
enum BvhNode {
    Leaf {
        bbox: Aabb,
        segments: SmallVec<[u32; 8]>,
    },
    Internal {
        bbox: Aabb,
        left: Box<Self>,
        right: Box<Self>,
    },
}

impl BvhNode {
    fn bbox(&self) -> &Aabb {
        match self {
            Self::Leaf { bbox, .. } | Self::Internal { bbox, .. } => bbox,
        }
    }
}

/// Read-only signed distance field of a region boundary.
///
/// Loops are re-oriented on construction so the outer loop runs
/// counter-clockwise and holes run clockwise, keeping the material on the
/// left of every segment whatever the input winding was.
#[derive(Debug)]
pub struct BoundaryDistanceField {
    loops: Vec<Vec<Point2>>,
    segments: Vec<BoundarySegment>,
    root: Option<BvhNode>,
}

impl BoundaryDistanceField {
    /// Builds the field for `region`.
    #[must_use]
    pub fn new(region: &GeneralPolygon2) -> Self {
        let mut loops = Vec::with_capacity(1 + region.holes.len());
        for (i, poly) in region.loops().enumerate() {
            let mut pts = poly.vertices.clone();
            let area = signed_area_2d(&pts);
            let is_outer = i == 0;
            if (is_outer && area < 0.0) || (!is_outer && area > 0.0) {
                pts.reverse();
            }
            loops.push(pts);
        }

        let mut segments = Vec::new();
        for (loop_index, pts) in loops.iter().enumerate() {
            let n = pts.len();
            if n < 2 {
                continue;
            }
            for segment_index in 0..n {
                segments.push(BoundarySegment {
                    loop_index,
                    segment_index,
                    a: pts[segment_index],
                    b: pts[(segment_index + 1) % n],
                });
            }
        }

        let root = if segments.is_empty() {
            None
        } else {
            let boxes: Vec<Aabb> = segments
                .iter()
                .map(|s| Aabb::from_segment(&s.a, &s.b))
                .collect();
            let indices: Vec<usize> = (0..segments.len()).collect();
            Some(build_recursive(&boxes, indices))
        };

        Self {
            loops,
            segments,
            root,
        }
    }

    /// The re-oriented boundary loops.
    #[must_use]
    pub fn loops(&self) -> &[Vec<Point2>] {
        &self.loops
    }

    #[must_use]
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Unit normal of a boundary segment pointing out of the material, or
    /// `None` for an unknown segment or one of zero length.
    #[must_use]
    pub fn segment_normal(&self, loop_index: usize, segment_index: usize) -> Option<Vector2> {
        let pts = self.loops.get(loop_index)?;
        let n = pts.len();
        if segment_index >= n {
            return None;
        }
        let d = pts[(segment_index + 1) % n] - pts[segment_index];
        let len = d.norm();
        (len > 1e-12).then(|| right_normal(d) / len)
    }

    /// Nearest boundary location to `p`; `None` for an empty boundary.
    #[must_use]
    pub fn nearest(&self, p: &Point2) -> Option<BoundaryHit> {
        let root = self.root.as_ref()?;
        let mut best: Option<(usize, f64, Point2, f64)> = None;
        let mut stack: Vec<&BvhNode> = vec![root];

        while let Some(node) = stack.pop() {
            let bound = best.map_or(f64::INFINITY, |b| b.3);
            if node.bbox().distance_sq(p) > bound {
                continue;
            }
            match node {
                BvhNode::Leaf { segments, .. } => {
                    for &si in segments {
                        let seg = &self.segments[si as usize];
                        let (t, q) = segment_closest_point(p, &seg.a, &seg.b);
                        let d = (p - q).norm_squared();
                        if best.is_none_or(|b| d < b.3) {
                            best = Some((si as usize, t, q, d));
                        }
                    }
                }
                BvhNode::Internal { left, right, .. } => {
                    // Visit the closer child first.
                    let dl = left.bbox().distance_sq(p);
                    let dr = right.bbox().distance_sq(p);
                    if dl <= dr {
                        stack.push(right);
                        stack.push(left);
                    } else {
                        stack.push(left);
                        stack.push(right);
                    }
                }
            }
        }

        best.map(|(si, t, point, distance_sq)| {
            let seg = &self.segments[si];
            BoundaryHit {
                loop_index: seg.loop_index,
                segment_index: seg.segment_index,
                t,
                point,
                distance_sq,
            }
        })
    }

    /// Signed distance and gradient at `p`; `None` for an empty boundary.
    ///
    /// The side is decided against the segment normal, or against the
    /// pseudo-normal (normalised sum of both adjacent segment normals) when
    /// the nearest point is a loop vertex. On the boundary itself the
    /// gradient falls back to the inward normal.
    #[must_use]
    pub fn signed_distance(&self, p: &Point2) -> Option<SignedDistance> {
        let hit = self.nearest(p)?;
        let normal = self.hit_normal(&hit);
        let dist = hit.distance_sq.sqrt();

        if dist < 1e-9 {
            return Some(SignedDistance {
                distance: 0.0,
                gradient: -normal,
                hit,
            });
        }

        let u = (p - hit.point) / dist;
        let inside = (p - hit.point).dot(&normal) < 0.0;
        Some(if inside {
            SignedDistance {
                distance: dist,
                gradient: u,
                hit,
            }
        } else {
            SignedDistance {
                distance: -dist,
                gradient: -u,
                hit,
            }
        })
    }

    /// Outward normal used to classify a hit.
    fn hit_normal(&self, hit: &BoundaryHit) -> Vector2 {
        let own = self
            .segment_normal(hit.loop_index, hit.segment_index)
            .unwrap_or_else(Vector2::zeros);
        let n = self.loops[hit.loop_index].len();
        let adjacent = if hit.t < VERTEX_T_EPS {
            Some((hit.segment_index + n - 1) % n)
        } else if hit.t > 1.0 - VERTEX_T_EPS {
            Some((hit.segment_index + 1) % n)
        } else {
            None
        };

        let Some(adj) = adjacent else {
            return own;
        };
        let sum = own
            + self
                .segment_normal(hit.loop_index, adj)
                .unwrap_or_else(Vector2::zeros);
        let len = sum.norm();
        if len > 1e-12 {
            sum / len
        } else {
            own
        }
    }
}

fn build_recursive(boxes: &[Aabb], indices: Vec<usize>) -> BvhNode {
    let mut bbox = Aabb::empty();
    for &i in &indices {
        bbox.expand(&boxes[i]);
    }

    if indices.len() <= MAX_LEAF_SIZE {
        #[allow(clippy::cast_possible_truncation)]
        let segments = indices.iter().map(|&i| i as u32).collect();
        return BvhNode::Leaf { bbox, segments };
    }

    // Median split along the longest axis.
    let axis = bbox.longest_axis();
    let mut sorted = indices;
    sorted.sort_by(|&a, &b| {
        let ca = boxes[a].center();
        let cb = boxes[b].center();
        ca[axis].total_cmp(&cb[axis])
    });
    let right_half = sorted.split_off(sorted.len() / 2);

    BvhNode::Internal {
        bbox,
        left: Box::new(build_recursive(boxes, sorted)),
        right: Box::new(build_recursive(boxes, right_half)),
    }
}
