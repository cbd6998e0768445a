//! Axis-aligned bounding boxes and per-body bounding-volume trees.
//!
//! Trees are rebuilt from current geometry once per physics step
//! (median split on the longest centroid axis), stored flat in a `Vec`
//! for cache-friendly traversal.

use tactus_math::Vec3;
use tactus_types::Scalar;

/// An axis-aligned bounding box.
#[derive(Debug, Clone, Copy)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// An empty box (inverted bounds), identity for `union`.
    pub const EMPTY: Self = Self {
        min: Vec3::splat(Scalar::INFINITY),
        max: Vec3::splat(Scalar::NEG_INFINITY),
    };

    /// Smallest box containing the given points.
    pub fn from_points(points: &[Vec3]) -> Self {
        let mut aabb = Self::EMPTY;
        for &p in points {
            aabb.min = aabb.min.min(p);
            aabb.max = aabb.max.max(p);
        }
        aabb
    }

    /// Smallest box containing both operands.
    pub fn union(&self, other: &Self) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Box grown by `margin` on every side.
    pub fn grown(&self, margin: Scalar) -> Self {
        Self {
            min: self.min - Vec3::splat(margin),
            max: self.max + Vec3::splat(margin),
        }
    }

    /// Whether two boxes overlap (touching counts).
    pub fn overlaps(&self, other: &Self) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
            && self.min.z <= other.max.z
            && self.max.z >= other.min.z
    }

    /// Box center.
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }
}

/// Internal tree node. Leaves carry a primitive index; interior nodes
/// carry child indices into the flat node array.
#[derive(Debug, Clone, Copy)]
struct TreeNode {
    aabb: Aabb,
    /// Index of the left child, or `u32::MAX` for a leaf.
    left: u32,
    /// Index of the right child, or the primitive index for a leaf.
    right: u32,
}

const LEAF: u32 = u32::MAX;

/// A binary AABB tree over a set of primitives.
#[derive(Debug, Clone)]
pub struct AabbTree {
    nodes: Vec<TreeNode>,
    root: u32,
}

impl AabbTree {
    /// Builds a tree over the given primitive boxes. Returns an empty
    /// tree when there are no primitives.
    pub fn build(primitives: &[Aabb]) -> Self {
        let mut tree = Self {
            nodes: Vec::with_capacity(primitives.len().saturating_mul(2)),
            root: LEAF,
        };
        if primitives.is_empty() {
            return tree;
        }
        let mut order: Vec<u32> = (0..primitives.len() as u32).collect();
        tree.root = tree.build_range(primitives, &mut order);
        tree
    }

    /// True if the tree holds no primitives.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Bounding box of the whole tree.
    pub fn bounds(&self) -> Aabb {
        if self.is_empty() {
            Aabb::EMPTY
        } else {
            self.nodes[self.root as usize].aabb
        }
    }

    fn build_range(&mut self, primitives: &[Aabb], order: &mut [u32]) -> u32 {
        if order.len() == 1 {
            let prim = order[0];
            self.nodes.push(TreeNode {
                aabb: primitives[prim as usize],
                left: LEAF,
                right: prim,
            });
            return (self.nodes.len() - 1) as u32;
        }

        // Bounds of the centroids decide the split axis.
        let mut centroid_bounds = Aabb::EMPTY;
        let mut bounds = Aabb::EMPTY;
        for &p in order.iter() {
            let aabb = primitives[p as usize];
            bounds = bounds.union(&aabb);
            let c = aabb.center();
            centroid_bounds.min = centroid_bounds.min.min(c);
            centroid_bounds.max = centroid_bounds.max.max(c);
        }
        let extent = centroid_bounds.max - centroid_bounds.min;
        let axis = if extent.x >= extent.y && extent.x >= extent.z {
            0
        } else if extent.y >= extent.z {
            1
        } else {
            2
        };

        // Median split along the chosen axis.
        let mid = order.len() / 2;
        order.select_nth_unstable_by(mid, |&a, &b| {
            let ca = primitives[a as usize].center()[axis];
            let cb = primitives[b as usize].center()[axis];
            ca.partial_cmp(&cb).unwrap_or(std::cmp::Ordering::Equal)
        });

        let (lo, hi) = order.split_at_mut(mid);
        let left = self.build_range(primitives, lo);
        let right = self.build_range(primitives, hi);
        self.nodes.push(TreeNode {
            aabb: bounds,
            left,
            right,
        });
        (self.nodes.len() - 1) as u32
    }

    /// All primitive index pairs `(self, other)` whose leaf boxes overlap.
    pub fn overlapping_pairs(&self, other: &AabbTree) -> Vec<(u32, u32)> {
        let mut pairs = Vec::new();
        if self.is_empty() || other.is_empty() {
            return pairs;
        }
        let mut stack = vec![(self.root, other.root)];
        while let Some((a, b)) = stack.pop() {
            let na = self.nodes[a as usize];
            let nb = other.nodes[b as usize];
            if !na.aabb.overlaps(&nb.aabb) {
                continue;
            }
            match (na.left == LEAF, nb.left == LEAF) {
                (true, true) => pairs.push((na.right, nb.right)),
                (true, false) => {
                    stack.push((a, nb.left));
                    stack.push((a, nb.right));
                }
                (false, true) => {
                    stack.push((na.left, b));
                    stack.push((na.right, b));
                }
                (false, false) => {
                    stack.push((na.left, nb.left));
                    stack.push((na.left, nb.right));
                    stack.push((na.right, nb.left));
                    stack.push((na.right, nb.right));
                }
            }
        }
        pairs
    }
}
