//! Core tetrahedral mesh type with SoA (Structure of Arrays) layout.
//!
//! The SoA layout stores each coordinate channel contiguously:
//! - `pos_x: [x0, x1, x2, ...]`
//! - `pos_y: [y0, y1, y2, ...]`
//! - `pos_z: [z0, z1, z2, ...]`
//!
//! These are the *reference* (undeformed) positions; the deformed state
//! lives in the owning body's state buffers. The mesh is immutable after
//! scene construction.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tactus_math::Vec3;
use tactus_types::{Scalar, TactusError, TactusResult};

/// A tetrahedral mesh stored in Structure-of-Arrays layout.
///
/// Tetrahedron indices are stored flat, four per element:
/// `[t0n0, t0n1, t0n2, t0n3, t1n0, ...]`. Surface triangles are extracted
/// once at construction and stored flat, three per triangle, wound so the
/// geometric normal points outward.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TetMesh {
    /// X coordinates of all nodes (reference configuration).
    pub pos_x: Vec<Scalar>,
    /// Y coordinates of all nodes.
    pub pos_y: Vec<Scalar>,
    /// Z coordinates of all nodes.
    pub pos_z: Vec<Scalar>,

    /// Tetrahedron node indices, four per element.
    pub tets: Vec<u32>,

    /// Surface triangle node indices, three per triangle, outward-wound.
    pub surface: Vec<u32>,
}

impl TetMesh {
    /// Builds a mesh from node positions and tetrahedron indices.
    ///
    /// Validates index ranges, fixes the orientation of negatively-oriented
    /// tetrahedra (by swapping two nodes), and extracts the boundary
    /// surface. Fails on out-of-range indices or repeated nodes within a
    /// tetrahedron.
    pub fn from_parts(positions: &[[Scalar; 3]], tets: &[[u32; 4]]) -> TactusResult<Self> {
        let n = positions.len();
        let mut mesh = Self {
            pos_x: positions.iter().map(|p| p[0]).collect(),
            pos_y: positions.iter().map(|p| p[1]).collect(),
            pos_z: positions.iter().map(|p| p[2]).collect(),
            tets: Vec::with_capacity(tets.len() * 4),
            surface: Vec::new(),
        };

        for (t, tet) in tets.iter().enumerate() {
            let [a, b, c, d] = *tet;
            for &idx in tet {
                if idx as usize >= n {
                    return Err(TactusError::InvalidMesh(format!(
                        "Tetrahedron {} references node {} (node count: {})",
                        t, idx, n
                    )));
                }
            }
            if a == b || a == c || a == d || b == c || b == d || c == d {
                return Err(TactusError::InvalidMesh(format!(
                    "Tetrahedron {} has repeated node indices: [{}, {}, {}, {}]",
                    t, a, b, c, d
                )));
            }

            // Reorder negatively-oriented tets so the signed volume is
            // positive in the reference configuration.
            let vol = mesh.signed_volume(a, b, c, d);
            if vol < 0.0 {
                mesh.tets.extend_from_slice(&[a, c, b, d]);
            } else {
                mesh.tets.extend_from_slice(&[a, b, c, d]);
            }
        }

        mesh.surface = mesh.extract_surface();
        mesh.validate()?;
        Ok(mesh)
    }

    /// Returns the number of nodes.
    #[inline]
    pub fn node_count(&self) -> usize {
        self.pos_x.len()
    }

    /// Returns the number of tetrahedra.
    #[inline]
    pub fn tet_count(&self) -> usize {
        self.tets.len() / 4
    }

    /// Returns the number of surface triangles.
    #[inline]
    pub fn surface_count(&self) -> usize {
        self.surface.len() / 3
    }

    /// Returns the four node indices of tetrahedron `t`.
    #[inline]
    pub fn tet(&self, t: usize) -> [u32; 4] {
        let base = t * 4;
        [
            self.tets[base],
            self.tets[base + 1],
            self.tets[base + 2],
            self.tets[base + 3],
        ]
    }

    /// Returns the three node indices of surface triangle `t`.
    #[inline]
    pub fn surface_triangle(&self, t: usize) -> [u32; 3] {
        let base = t * 3;
        [
            self.surface[base],
            self.surface[base + 1],
            self.surface[base + 2],
        ]
    }

    /// Returns the reference position of node `i`.
    #[inline]
    pub fn position(&self, i: usize) -> Vec3 {
        Vec3::new(self.pos_x[i], self.pos_y[i], self.pos_z[i])
    }

    /// Signed volume of the tetrahedron spanned by four node indices,
    /// via the scalar triple product of edge differences.
    pub fn signed_volume(&self, a: u32, b: u32, c: u32, d: u32) -> Scalar {
        let pa = self.position(a as usize);
        let e1 = self.position(b as usize) - pa;
        let e2 = self.position(c as usize) - pa;
        let e3 = self.position(d as usize) - pa;
        e1.cross(e2).dot(e3) / 6.0
    }

    /// Validates mesh integrity.
    ///
    /// Checks:
    /// - All SoA arrays have the same length
    /// - Tetrahedron and surface indices are within bounds
    /// - Every tetrahedron has positive reference volume
    pub fn validate(&self) -> TactusResult<()> {
        let n = self.pos_x.len();
        if self.pos_y.len() != n || self.pos_z.len() != n {
            return Err(TactusError::InvalidMesh(
                "Position arrays have inconsistent lengths".into(),
            ));
        }
        if self.tets.len() % 4 != 0 {
            return Err(TactusError::InvalidMesh(
                "Tetrahedron index count is not divisible by 4".into(),
            ));
        }
        if self.surface.len() % 3 != 0 {
            return Err(TactusError::InvalidMesh(
                "Surface index count is not divisible by 3".into(),
            ));
        }
        for (i, &idx) in self.tets.iter().chain(self.surface.iter()).enumerate() {
            if idx as usize >= n {
                return Err(TactusError::InvalidMesh(format!(
                    "Index {} at position {} is out of range (node count: {})",
                    idx, i, n
                )));
            }
        }
        for t in 0..self.tet_count() {
            let [a, b, c, d] = self.tet(t);
            if self.signed_volume(a, b, c, d) <= 0.0 {
                return Err(TactusError::InvalidMesh(format!(
                    "Tetrahedron {} has non-positive reference volume",
                    t
                )));
            }
        }
        Ok(())
    }

    /// Extracts the boundary surface: faces that appear in exactly one
    /// tetrahedron, wound outward.
    ///
    /// For a positively-oriented tet `(a, b, c, d)` the outward faces are
    /// `(a,c,b)`, `(a,b,d)`, `(b,c,d)`, `(a,d,c)`.
    fn extract_surface(&self) -> Vec<u32> {
        // BTreeMap keeps the extracted triangle order deterministic across
        // runs, which keeps collision processing order reproducible.
        let mut face_count: BTreeMap<[u32; 3], ([u32; 3], u32)> = BTreeMap::new();

        for t in 0..self.tet_count() {
            let [a, b, c, d] = self.tet(t);
            for face in [[a, c, b], [a, b, d], [b, c, d], [a, d, c]] {
                let mut key = face;
                key.sort_unstable();
                let entry = face_count.entry(key).or_insert((face, 0));
                entry.1 += 1;
            }
        }

        let mut surface = Vec::new();
        for (_key, (face, count)) in face_count {
            if count == 1 {
                surface.extend_from_slice(&face);
            }
        }
        surface
    }
}
