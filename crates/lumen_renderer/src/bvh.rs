//! Bounding Volume Hierarchy (BVH) acceleration structure.
//!
//! A binary tree of bounding spheres over one model's triangles. Nodes are
//! split top-down on the axis where triangle centroids vary most; leaves
//! hold indices into the model's triangle arena rather than triangle copies.

use crate::model::MeshGeometry;
use crate::{GeometryError, GeometryResult, Triangle};
use lumen_math::{BoundingSphere, Interval, Ray, Vec3};

/// Maximum triangles per leaf node before splitting.
const LEAF_MAX_SIZE: usize = 3;

/// Depth at which a node is made a leaf regardless of its size.
pub const MAX_DEPTH: usize = 64;

/// Nearest triangle found along a ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriangleHit {
    /// Ray parameter of the hit
    pub t: f32,
    /// Index into the model's triangle arena
    pub triangle: usize,
}

/// Split axis, ordered by tie-break priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    #[inline]
    fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

/// BVH node - either a branch with two children or a leaf with triangles.
///
/// Every node caches the model position at build time in `offset`; traversal
/// translates spheres and triangles by this snapshot, not a live position.
#[derive(Debug)]
pub enum BvhNode {
    /// Internal node with two children.
    Branch {
        left: Box<BvhNode>,
        right: Box<BvhNode>,
        bounds: BoundingSphere,
        offset: Vec3,
    },
    /// Leaf node with a small, non-empty set of triangle indices.
    Leaf {
        triangles: Vec<usize>,
        bounds: BoundingSphere,
        offset: Vec3,
    },
}

/// Shape summary of a built tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BvhStats {
    pub node_count: usize,
    pub leaf_count: usize,
    pub max_depth: usize,
}

impl BvhNode {
    /// Build a BVH over every triangle in `triangles`.
    ///
    /// `offset` is the owning model's current position.
    pub fn new(triangles: &[Triangle], geometry: &MeshGeometry, offset: Vec3) -> GeometryResult<Self> {
        if triangles.is_empty() {
            return Err(GeometryError::EmptyModel);
        }

        let indices = (0..triangles.len()).collect();
        let root = Self::build(indices, triangles, geometry, offset, 0);

        let stats = root.stats();
        log::debug!(
            "Built BVH over {} triangles: {} nodes, {} leaves, depth {}",
            triangles.len(),
            stats.node_count,
            stats.leaf_count,
            stats.max_depth
        );
        Ok(root)
    }

    /// Recursive top-down construction.
    fn build(
        indices: Vec<usize>,
        triangles: &[Triangle],
        geometry: &MeshGeometry,
        offset: Vec3,
        depth: usize,
    ) -> Self {
        let bounds = bounding_sphere(&indices, triangles, geometry);

        if indices.len() <= LEAF_MAX_SIZE {
            return BvhNode::Leaf {
                triangles: indices,
                bounds,
                offset,
            };
        }
        if depth >= MAX_DEPTH {
            log::debug!(
                "BVH depth limit reached, forcing a leaf of {} triangles",
                indices.len()
            );
            return BvhNode::Leaf {
                triangles: indices,
                bounds,
                offset,
            };
        }

        let axis = axis_of_greatest_variance(&indices, triangles);
        let (left, right) = split(indices, triangles, axis, bounds.center);

        let left = Self::build(left, triangles, geometry, offset, depth + 1);
        let right = Self::build(right, triangles, geometry, offset, depth + 1);

        BvhNode::Branch {
            left: Box::new(left),
            right: Box::new(right),
            bounds,
            offset,
        }
    }

    pub fn bounds(&self) -> BoundingSphere {
        match self {
            BvhNode::Branch { bounds, .. } | BvhNode::Leaf { bounds, .. } => *bounds,
        }
    }

    /// Model position captured when this node was built.
    pub fn offset(&self) -> Vec3 {
        match self {
            BvhNode::Branch { offset, .. } | BvhNode::Leaf { offset, .. } => *offset,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, BvhNode::Leaf { .. })
    }

    /// All triangle indices stored in leaves below this node.
    pub fn triangle_indices(&self) -> Vec<usize> {
        let mut out = Vec::new();
        self.collect_indices(&mut out);
        out
    }

    fn collect_indices(&self, out: &mut Vec<usize>) {
        match self {
            BvhNode::Leaf { triangles, .. } => out.extend_from_slice(triangles),
            BvhNode::Branch { left, right, .. } => {
                left.collect_indices(out);
                right.collect_indices(out);
            }
        }
    }

    pub fn stats(&self) -> BvhStats {
        match self {
            BvhNode::Leaf { .. } => BvhStats {
                node_count: 1,
                leaf_count: 1,
                max_depth: 0,
            },
            BvhNode::Branch { left, right, .. } => {
                let l = left.stats();
                let r = right.stats();
                BvhStats {
                    node_count: 1 + l.node_count + r.node_count,
                    leaf_count: l.leaf_count + r.leaf_count,
                    max_depth: 1 + l.max_depth.max(r.max_depth),
                }
            }
        }
    }

    /// Find the nearest triangle hit with `t` strictly inside `ray_t`.
    ///
    /// Subtrees whose bounding sphere the ray misses are skipped without
    /// touching their triangles. The right subtree is searched only up to
    /// the left subtree's hit, which yields the same nearest hit as
    /// searching both independently.
    pub fn hit(
        &self,
        ray: &Ray,
        triangles: &[Triangle],
        geometry: &MeshGeometry,
        ray_t: Interval,
    ) -> Option<TriangleHit> {
        if !self.bounds().hit(ray, self.offset()) {
            return None;
        }

        match self {
            BvhNode::Leaf {
                triangles: leaf,
                offset,
                ..
            } => {
                let mut closest = ray_t;
                let mut nearest = None;

                for &index in leaf {
                    if let Some(t) = triangles[index].intersect(geometry, ray, *offset) {
                        if closest.surrounds(t) {
                            closest = closest.with_max(t);
                            nearest = Some(TriangleHit { t, triangle: index });
                        }
                    }
                }
                nearest
            }

            BvhNode::Branch { left, right, .. } => {
                let hit_left = left.hit(ray, triangles, geometry, ray_t);

                // Only check right up to closest hit
                let right_t = match hit_left {
                    Some(hit) => ray_t.with_max(hit.t),
                    None => ray_t,
                };
                let hit_right = right.hit(ray, triangles, geometry, right_t);

                hit_right.or(hit_left)
            }
        }
    }
}

/// Sphere centered on the mean centroid, grown to enclose every vertex.
fn bounding_sphere(indices: &[usize], triangles: &[Triangle], geometry: &MeshGeometry) -> BoundingSphere {
    let center = indices
        .iter()
        .map(|&i| triangles[i].centroid())
        .sum::<Vec3>()
        / indices.len() as f32;

    let mut bounds = BoundingSphere::at(center);
    for &i in indices {
        for vertex in triangles[i].vertices(geometry) {
            bounds.expand_to(vertex);
        }
    }
    bounds
}

/// Single-pass (Welford) variance of the centroids on each axis.
///
/// Ties favour X over Y over Z.
pub fn axis_of_greatest_variance(indices: &[usize], triangles: &[Triangle]) -> Axis {
    let mut mean = Vec3::ZERO;
    let mut sum_of_squares = Vec3::ZERO;

    for (n, &i) in indices.iter().enumerate() {
        let centroid = triangles[i].centroid();
        let old_mean = mean;
        mean += (centroid - mean) / (n + 1) as f32;
        sum_of_squares += (centroid - mean) * (centroid - old_mean);
    }

    let v = sum_of_squares;
    if v.x >= v.y && v.x >= v.z {
        Axis::X
    } else if v.y >= v.z {
        Axis::Y
    } else {
        Axis::Z
    }
}

/// Partition around the node center on `axis`: strictly-less goes left.
///
/// When every centroid lands on one side (coincident centroids), falls
/// back to a median split so both children are non-empty.
fn split(
    indices: Vec<usize>,
    triangles: &[Triangle],
    axis: Axis,
    center: Vec3,
) -> (Vec<usize>, Vec<usize>) {
    let a = axis.index();
    let (left, right): (Vec<usize>, Vec<usize>) = indices
        .into_iter()
        .partition(|&i| triangles[i].centroid()[a] < center[a]);

    if !left.is_empty() && !right.is_empty() {
        return (left, right);
    }

    let mut all = if left.is_empty() { right } else { left };
    log::debug!(
        "Degenerate partition of {} triangles on {:?}, using median split",
        all.len(),
        axis
    );

    all.sort_unstable_by(|&x, &y| {
        triangles[x].centroid()[a]
            .partial_cmp(&triangles[y].centroid()[a])
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    let mid = all.len() / 2;
    let right = all.split_off(mid);
    (all, right)
}
