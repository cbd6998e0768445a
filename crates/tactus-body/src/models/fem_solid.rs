//! Finite-element solid body: tetrahedral mesh under Kelvin–Voigt law.

use std::collections::BTreeMap;

use tactus_fem::element::lumped_masses;
use tactus_fem::{MaterialParams, TetElement};
use tactus_math::Vec3;
use tactus_mesh::{TetMesh, Topology};
use tactus_types::constants::VOLUME_EPS;
use tactus_types::{Scalar, TactusResult};

use crate::boundary::Boundary;
use crate::domain::Domain;
use crate::network::{EdgeNetwork, NetworkEdge};
use crate::protocol::BodyOps;
use crate::state::{BodyState, NodeState};

/// A deformable solid discretized into linear tetrahedra.
pub struct FemSolid {
    mesh: TetMesh,
    topology: Topology,
    elements: Vec<TetElement>,
    masses: Vec<Scalar>,
    gravity: Vec3,
    /// Boundary conditions; written by collision response and couplers.
    pub boundary: Boundary,
    /// Stress override channel for cross-model coupling.
    pub domain: Domain,
    state: BodyState,

    // Scratch force buffers, reused every derivative evaluation.
    force_x: Vec<Scalar>,
    force_y: Vec<Scalar>,
    force_z: Vec<Scalar>,

    /// Incident rest volume per edge, for the haptic network's effective
    /// spring constants. Precomputed once.
    edge_volumes: BTreeMap<(u32, u32), Scalar>,

    /// Elements found inverted during the last derivative evaluation.
    inverted_elements: u32,
}

impl FemSolid {
    /// Builds a FEM solid from a mesh and one material.
    ///
    /// Fails on invalid material parameters or degenerate reference
    /// elements — configuration errors surface here, at load time.
    pub fn new(mesh: TetMesh, material: MaterialParams, gravity: Vec3) -> TactusResult<Self> {
        material.validate()?;
        if mesh.tet_count() == 0 {
            return Err(tactus_types::TactusError::InvalidMesh(
                "FEM solid needs at least one tetrahedron".into(),
            ));
        }

        let mut elements = Vec::with_capacity(mesh.tet_count());
        for t in 0..mesh.tet_count() {
            elements.push(TetElement::from_mesh(&mesh, t, material)?);
        }
        let masses = lumped_masses(&mesh, &elements);
        if masses.iter().any(|&m| !(m > 0.0)) {
            return Err(tactus_types::TactusError::InvalidMesh(
                "every node must belong to at least one tetrahedron".into(),
            ));
        }
        let topology = Topology::build(&mesh);

        // Each tetrahedron spreads its rest volume over its six edges.
        let mut edge_volumes: BTreeMap<(u32, u32), Scalar> = BTreeMap::new();
        for elem in &elements {
            let [a, b, c, d] = elem.nodes;
            let share = elem.rest_volume / 6.0;
            for (i, j) in [(a, b), (a, c), (a, d), (b, c), (b, d), (c, d)] {
                *edge_volumes.entry((i.min(j), i.max(j))).or_insert(0.0) += share;
            }
        }

        let n = mesh.node_count();
        let state = BodyState::Nodes(NodeState::from_positions(
            mesh.pos_x.clone(),
            mesh.pos_y.clone(),
            mesh.pos_z.clone(),
        ));

        Ok(Self {
            mesh,
            topology,
            elements,
            masses,
            gravity,
            boundary: Boundary::new(),
            domain: Domain::new(),
            state,
            force_x: vec![0.0; n],
            force_y: vec![0.0; n],
            force_z: vec![0.0; n],
            edge_volumes,
            inverted_elements: 0,
        })
    }

    /// The reference mesh.
    pub fn mesh(&self) -> &TetMesh {
        &self.mesh
    }

    /// Mesh topology (edges, adjacency, surface flags).
    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    /// The elements, with tensors from the last derivative evaluation.
    pub fn elements(&self) -> &[TetElement] {
        &self.elements
    }

    /// Lumped node masses.
    pub fn masses(&self) -> &[Scalar] {
        &self.masses
    }

    /// Current node positions/velocities.
    pub fn nodes(&self) -> &NodeState {
        match &self.state {
            BodyState::Nodes(ns) => ns,
            BodyState::Lumped(_) => unreachable!("FEM solid state is always node-based"),
        }
    }

    /// Elements found inverted (volume below tolerance) during the last
    /// derivative evaluation. Reported as a numerical warning by the
    /// engine; the computation proceeded with clamped volumes.
    pub fn last_inversion_count(&self) -> u32 {
        self.inverted_elements
    }

    /// Internal nodal force from the last derivative evaluation.
    pub fn nodal_force(&self, node: u32) -> Vec3 {
        let i = node as usize;
        Vec3::new(self.force_x[i], self.force_y[i], self.force_z[i])
    }

    /// Reaction force at a boundary node, per its condition kind.
    pub fn reaction_force(&self, node: u32) -> Vec3 {
        self.boundary.reaction_force(node, self.nodal_force(node))
    }

    /// The local mechanical network around `node`, out to `radius` edge
    /// hops: input for the haptic model reduction.
    ///
    /// Effective per-edge spring constants come from the edge's incident
    /// rest volume: `k = E·V/L0²`, `b = H·V/L0²`, with `E`/`H` the
    /// Young-type elastic and viscous moduli of the body material.
    pub fn local_network(&self, node: u32, radius: u32) -> EdgeNetwork {
        let nodes = self.topology.neighborhood(node, radius);
        let material = self.elements[0].material;
        let e_eff = young_modulus(material.lambda, material.mu);
        let h_eff = young_modulus(material.phi, material.nu);

        let edges = self
            .topology
            .edges_within(&nodes)
            .into_iter()
            .map(|(i, j)| {
                let rest_length = (self.mesh.position(j as usize)
                    - self.mesh.position(i as usize))
                .length();
                let vol = self.edge_volumes.get(&(i, j)).copied().unwrap_or(0.0);
                let l2 = (rest_length * rest_length).max(f64::EPSILON);
                NetworkEdge {
                    i,
                    j,
                    rest_length,
                    stiffness: e_eff * vol / l2,
                    damping: h_eff * vol / l2,
                }
            })
            .collect();

        let masses = nodes.iter().map(|&n| self.masses[n as usize]).collect();
        let fixed = nodes.iter().map(|&n| self.boundary.is_fixed(n)).collect();

        EdgeNetwork {
            contact_node: node,
            nodes,
            edges,
            masses,
            fixed,
        }
    }
}

/// Young-type modulus from a Lamé pair; zero if both moduli vanish.
fn young_modulus(lambda: Scalar, mu: Scalar) -> Scalar {
    let denom = lambda + mu;
    if denom > 0.0 {
        mu * (3.0 * lambda + 2.0 * mu) / denom
    } else {
        0.0
    }
}

impl BodyOps for FemSolid {
    fn alloc_state(&self) -> BodyState {
        self.state.zeroed_like()
    }

    fn deriv_state(&mut self, deriv: &mut BodyState, s: &BodyState) {
        let s = match s {
            BodyState::Nodes(ns) => ns,
            BodyState::Lumped(_) => panic!("FEM solid derivative on non-node state"),
        };

        self.force_x.fill(0.0);
        self.force_y.fill(0.0);
        self.force_z.fill(0.0);
        self.inverted_elements = 0;

        for (t, elem) in self.elements.iter_mut().enumerate() {
            elem.update_tensors(
                &s.pos_x,
                &s.pos_y,
                &s.pos_z,
                &s.vel_x,
                &s.vel_y,
                &s.vel_z,
                self.domain.stress_override(t as u32),
            );
            let volume = elem.compute_volume(&s.pos_x, &s.pos_y, &s.pos_z);
            if volume < -VOLUME_EPS {
                self.inverted_elements += 1;
            }
            elem.accumulate_forces(volume, &mut self.force_x, &mut self.force_y, &mut self.force_z);
        }

        let d = match deriv {
            BodyState::Nodes(ns) => ns,
            BodyState::Lumped(_) => panic!("FEM solid derivative into non-node state"),
        };
        for i in 0..s.node_count() {
            d.pos_x[i] = s.vel_x[i];
            d.pos_y[i] = s.vel_y[i];
            d.pos_z[i] = s.vel_z[i];
            let m = self.masses[i];
            d.vel_x[i] = self.force_x[i] / m + self.gravity.x;
            d.vel_y[i] = self.force_y[i] / m + self.gravity.y;
            d.vel_z[i] = self.force_z[i] / m + self.gravity.z;
        }

        self.boundary.apply_to_derivative(d, &self.masses);
    }

    fn accum_state(&self, dst: &mut BodyState, base: &BodyState, deriv: &BodyState, h: Scalar) {
        dst.combine(base, deriv, h);
        if let BodyState::Nodes(ns) = dst {
            self.boundary.apply_to_accumulation(ns);
        }
    }

    fn state(&self) -> &BodyState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut BodyState {
        &mut self.state
    }
}
