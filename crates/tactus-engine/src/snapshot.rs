//! Read-only geometry snapshots for the display thread.
//!
//! The renderer reads a snapshot taken after a tick; a snapshot one
//! tick stale is fine. The core does no drawing.

use tactus_body::Body;
use tactus_math::Vec3;
use tactus_types::{BodyId, Scalar};

/// Positions, surface triangles, and per-vertex normals of one body.
#[derive(Debug, Clone)]
pub struct GeometrySnapshot {
    pub body: BodyId,
    pub name: String,
    /// Current node positions.
    pub positions: Vec<[Scalar; 3]>,
    /// Surface triangles (empty for the probe; its segment is in
    /// `positions`).
    pub triangles: Vec<[u32; 3]>,
    /// Area-weighted vertex normals (zero where no surface touches).
    pub normals: Vec<[Scalar; 3]>,
}

impl GeometrySnapshot {
    /// Captures a body's renderable geometry, if it has any.
    pub fn of(body: &Body) -> Option<Self> {
        if let Some(fem) = body.as_fem() {
            let mesh = fem.mesh();
            let nodes = fem.nodes();
            let n = nodes.node_count();

            let positions: Vec<[Scalar; 3]> =
                (0..n).map(|i| nodes.position(i).to_array()).collect();

            let mut triangles = Vec::with_capacity(mesh.surface_count());
            let mut normals = vec![Vec3::ZERO; n];
            for t in 0..mesh.surface_count() {
                let tri = mesh.surface_triangle(t);
                triangles.push(tri);
                let [a, b, c] = tri.map(|i| i as usize);
                let face = (nodes.position(b) - nodes.position(a))
                    .cross(nodes.position(c) - nodes.position(a));
                normals[a] += face;
                normals[b] += face;
                normals[c] += face;
            }
            let normals = normals
                .into_iter()
                .map(|n| n.normalize_or_zero().to_array())
                .collect();

            return Some(Self {
                body: body.id,
                name: body.name.clone(),
                positions,
                triangles,
                normals,
            });
        }

        if let Some(probe) = body.as_probe() {
            let (tip, tail) = probe.segment();
            return Some(Self {
                body: body.id,
                name: body.name.clone(),
                positions: vec![tip.to_array(), tail.to_array()],
                triangles: Vec::new(),
                normals: vec![[0.0; 3]; 2],
            });
        }

        None
    }
}
