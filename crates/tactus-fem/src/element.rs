//! Linear tetrahedral element: shape matrix, strain, stress, nodal forces.
//!
//! Each element precomputes its `beta` shape-function gradient matrix once
//! from the reference (undeformed) configuration by inverting the 4×4
//! homogeneous node-position matrix. `beta` is fixed for the life of the
//! element (linear, small-rotation FEM assumption).
//!
//! Per step, given current node positions and velocities:
//! 1. Deformation map `F = Σᵢ pᵢ ⊗ βᵢ`
//! 2. Green strain `E = ½(FᵀF − I)`, strain rate `Ė = ½(FᵀḞ + ḞᵀF)`
//! 3. Stress `σ = λ·tr(E)·I + 2μ·E + φ·tr(Ė)·I + 2ν·Ė` plus any Domain
//!    stress override
//! 4. Nodal forces `fᵢ = −(V/2)·σ·βᵢ` accumulated into the global buffer

use tactus_math::tensor::{scaled_identity, trace};
use tactus_math::{Mat3, Mat4, Vec3, Vec4};
use tactus_mesh::TetMesh;
use tactus_types::constants::VOLUME_EPS;
use tactus_types::{Scalar, TactusError, TactusResult};

use crate::material::MaterialParams;

/// One linear tetrahedral element with cached per-step tensors.
#[derive(Debug, Clone)]
pub struct TetElement {
    /// Global node indices of the four corners.
    pub nodes: [u32; 4],
    /// Material constants.
    pub material: MaterialParams,
    /// Shape-function gradients: row `i` is `∇Nᵢ` in the reference frame.
    beta: [Vec3; 4],
    /// Reference (undeformed) volume.
    pub rest_volume: Scalar,
    /// Green strain from the last `update_tensors` call (symmetric).
    pub strain: Mat3,
    /// Strain rate from the last `update_tensors` call (symmetric).
    pub strain_rate: Mat3,
    /// Stress from the last `update_tensors` call.
    pub stress: Mat3,
}

impl TetElement {
    /// Builds element `t` of a mesh, precomputing `beta` from the
    /// reference configuration.
    ///
    /// Fails with a configuration error if the reference tetrahedron is
    /// degenerate (non-invertible shape matrix).
    pub fn from_mesh(mesh: &TetMesh, t: usize, material: MaterialParams) -> TactusResult<Self> {
        let nodes = mesh.tet(t);
        let p: Vec<Vec3> = nodes.iter().map(|&i| mesh.position(i as usize)).collect();

        // Homogeneous node matrix: column i is [pᵢ; 1].
        let m = Mat4::from_cols(
            Vec4::new(p[0].x, p[0].y, p[0].z, 1.0),
            Vec4::new(p[1].x, p[1].y, p[1].z, 1.0),
            Vec4::new(p[2].x, p[2].y, p[2].z, 1.0),
            Vec4::new(p[3].x, p[3].y, p[3].z, 1.0),
        );
        let det = m.determinant();
        if det.abs() < VOLUME_EPS {
            return Err(TactusError::DegenerateElement {
                element: t,
                reason: "reference nodes are coplanar (shape matrix not invertible)".into(),
            });
        }
        let inv = m.inverse();

        // Row i of the inverse, first three entries = ∇Nᵢ.
        let beta = [0, 1, 2, 3].map(|i| {
            Vec3::new(inv.x_axis[i], inv.y_axis[i], inv.z_axis[i])
        });

        let rest_volume = signed_volume(p[0], p[1], p[2], p[3]);

        Ok(Self {
            nodes,
            material,
            beta,
            rest_volume,
            strain: Mat3::ZERO,
            strain_rate: Mat3::ZERO,
            stress: Mat3::ZERO,
        })
    }

    /// Shape-function gradient of corner `i`.
    #[inline]
    pub fn beta(&self, i: usize) -> Vec3 {
        self.beta[i]
    }

    /// Signed volume in the current configuration.
    ///
    /// A value below `-VOLUME_EPS` means the element has inverted; the
    /// caller reports the warning and continues with the degenerate
    /// result (real-time constraint: the tick must not halt).
    pub fn compute_volume(
        &self,
        pos_x: &[Scalar],
        pos_y: &[Scalar],
        pos_z: &[Scalar],
    ) -> Scalar {
        let [a, b, c, d] = self.corner_positions(pos_x, pos_y, pos_z);
        signed_volume(a, b, c, d)
    }

    /// Recomputes strain, strain rate, and stress from current node
    /// positions and velocities, with an optional additive Domain stress
    /// override.
    pub fn update_tensors(
        &mut self,
        pos_x: &[Scalar],
        pos_y: &[Scalar],
        pos_z: &[Scalar],
        vel_x: &[Scalar],
        vel_y: &[Scalar],
        vel_z: &[Scalar],
        stress_override: Option<&Mat3>,
    ) {
        let p = self.corner_positions(pos_x, pos_y, pos_z);
        let v = self.corner_positions(vel_x, vel_y, vel_z);

        // Deformation map and its rate.
        let mut f = Mat3::ZERO;
        let mut f_dot = Mat3::ZERO;
        for i in 0..4 {
            f += tactus_math::tensor::outer(p[i], self.beta[i]);
            f_dot += tactus_math::tensor::outer(v[i], self.beta[i]);
        }

        let ft = f.transpose();
        self.strain = (ft * f - Mat3::IDENTITY) * 0.5;
        self.strain_rate = (ft * f_dot + f_dot.transpose() * f) * 0.5;

        let m = &self.material;
        let mut stress = scaled_identity(m.lambda * trace(&self.strain))
            + self.strain * (2.0 * m.mu)
            + scaled_identity(m.phi * trace(&self.strain_rate))
            + self.strain_rate * (2.0 * m.nu);
        if let Some(extra) = stress_override {
            stress += *extra;
        }
        self.stress = stress;
    }

    /// Contracts the cached stress against `beta` and accumulates the four
    /// nodal forces (`fᵢ = −(V/2)·σ·βᵢ`) into the global force buffers.
    ///
    /// `volume` is the current signed volume from [`compute_volume`];
    /// negative values are clamped to zero so an inverted element pushes
    /// no energy into the mesh.
    ///
    /// [`compute_volume`]: TetElement::compute_volume
    pub fn accumulate_forces(
        &self,
        volume: Scalar,
        force_x: &mut [Scalar],
        force_y: &mut [Scalar],
        force_z: &mut [Scalar],
    ) {
        let scale = -volume.max(0.0) / 2.0;
        for i in 0..4 {
            let f = self.stress * self.beta[i] * scale;
            let n = self.nodes[i] as usize;
            force_x[n] += f.x;
            force_y[n] += f.y;
            force_z[n] += f.z;
        }
    }

    fn corner_positions(
        &self,
        xs: &[Scalar],
        ys: &[Scalar],
        zs: &[Scalar],
    ) -> [Vec3; 4] {
        self.nodes.map(|i| {
            let i = i as usize;
            Vec3::new(xs[i], ys[i], zs[i])
        })
    }
}

/// Signed tetrahedron volume via the scalar triple product of edge
/// differences.
#[inline]
pub fn signed_volume(a: Vec3, b: Vec3, c: Vec3, d: Vec3) -> Scalar {
    (b - a).cross(c - a).dot(d - a) / 6.0
}

/// Lumped node masses: each element spreads `density · volume` equally
/// over its four corners.
pub fn lumped_masses(mesh: &TetMesh, elements: &[TetElement]) -> Vec<Scalar> {
    let mut masses = vec![0.0; mesh.node_count()];
    for elem in elements {
        let share = elem.material.density * elem.rest_volume / 4.0;
        for &n in &elem.nodes {
            masses[n as usize] += share;
        }
    }
    masses
}
