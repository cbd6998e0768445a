//! Mesh topology — unique edges, node adjacency, bounded neighborhoods.
//!
//! Built once from a [`TetMesh`] at scene-load time. The haptic model
//! reduction queries `neighborhood()` every physics tick; the query only
//! walks the fixed-radius ball around the contact node, never the whole
//! mesh.

use std::collections::BTreeSet;

use crate::TetMesh;

/// Precomputed topological relations of a tetrahedral mesh.
#[derive(Debug, Clone)]
pub struct Topology {
    /// Unique undirected edges as `(lo, hi)` node index pairs, sorted.
    pub edges: Vec<(u32, u32)>,
    /// For each node, the indices of its adjacent nodes (sorted).
    pub node_neighbors: Vec<Vec<u32>>,
    /// For each node, whether it lies on the extracted surface.
    pub on_surface: Vec<bool>,
}

/// The six edges of a tetrahedron, as index pairs into its node list.
const TET_EDGES: [(usize, usize); 6] = [(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3)];

impl Topology {
    /// Builds topology from a mesh.
    pub fn build(mesh: &TetMesh) -> Self {
        let n = mesh.node_count();

        let mut edge_set: BTreeSet<(u32, u32)> = BTreeSet::new();
        for t in 0..mesh.tet_count() {
            let tet = mesh.tet(t);
            for (i, j) in TET_EDGES {
                let (a, b) = (tet[i], tet[j]);
                edge_set.insert((a.min(b), a.max(b)));
            }
        }
        let edges: Vec<(u32, u32)> = edge_set.into_iter().collect();

        let mut node_neighbors = vec![Vec::new(); n];
        for &(a, b) in &edges {
            node_neighbors[a as usize].push(b);
            node_neighbors[b as usize].push(a);
        }
        for list in &mut node_neighbors {
            list.sort_unstable();
        }

        let mut on_surface = vec![false; n];
        for &idx in &mesh.surface {
            on_surface[idx as usize] = true;
        }

        Self {
            edges,
            node_neighbors,
            on_surface,
        }
    }

    /// Returns the number of unique edges.
    #[inline]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Nodes within `radius` edge hops of `node`, including `node` itself.
    ///
    /// Breadth-first over the adjacency lists; the result is sorted. This
    /// is the neighborhood the reduced haptic model is built from, so its
    /// size depends only on local connectivity, never on total mesh size.
    pub fn neighborhood(&self, node: u32, radius: u32) -> Vec<u32> {
        let mut visited: BTreeSet<u32> = BTreeSet::new();
        visited.insert(node);
        let mut frontier = vec![node];

        for _ in 0..radius {
            let mut next = Vec::new();
            for &v in &frontier {
                for &w in &self.node_neighbors[v as usize] {
                    if visited.insert(w) {
                        next.push(w);
                    }
                }
            }
            frontier = next;
        }

        visited.into_iter().collect()
    }

    /// Edges with both endpoints inside the given (sorted) node set.
    pub fn edges_within(&self, nodes: &[u32]) -> Vec<(u32, u32)> {
        self.edges
            .iter()
            .copied()
            .filter(|&(a, b)| {
                nodes.binary_search(&a).is_ok() && nodes.binary_search(&b).is_ok()
            })
            .collect()
    }
}
