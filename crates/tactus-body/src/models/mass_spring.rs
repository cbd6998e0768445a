//! Mass-spring network body: point masses joined by damped springs.

use tactus_math::Vec3;
use tactus_types::constants::EPSILON;
use tactus_types::{Scalar, TactusError, TactusResult};

use crate::boundary::Boundary;
use crate::network::{EdgeNetwork, NetworkEdge};
use crate::protocol::BodyOps;
use crate::state::{BodyState, NodeState};

/// One damped spring between two nodes.
#[derive(Debug, Clone, Copy)]
pub struct Spring {
    pub i: u32,
    pub j: u32,
    pub rest_length: Scalar,
    pub stiffness: Scalar,
    pub damping: Scalar,
}

/// A network of point masses and damped springs.
pub struct MassSpring {
    springs: Vec<Spring>,
    masses: Vec<Scalar>,
    gravity: Vec3,
    /// Boundary conditions; a zero-mass node behaves as fixed too.
    pub boundary: Boundary,
    state: BodyState,

    /// Node adjacency for neighborhood queries (sorted per node).
    neighbors: Vec<Vec<u32>>,

    // Scratch force buffers, reused every derivative evaluation.
    force_x: Vec<Scalar>,
    force_y: Vec<Scalar>,
    force_z: Vec<Scalar>,
}

impl MassSpring {
    /// Builds a mass-spring body from node positions, springs, and
    /// per-node masses.
    ///
    /// Fails on index/length mismatches or non-physical parameters —
    /// configuration errors surface at load time.
    pub fn new(
        positions: &[[Scalar; 3]],
        springs: Vec<Spring>,
        masses: Vec<Scalar>,
        gravity: Vec3,
    ) -> TactusResult<Self> {
        let n = positions.len();
        if masses.len() != n {
            return Err(TactusError::InvalidConfig(format!(
                "mass array length ({}) != node count ({})",
                masses.len(),
                n
            )));
        }
        for (s, spring) in springs.iter().enumerate() {
            if spring.i as usize >= n || spring.j as usize >= n || spring.i == spring.j {
                return Err(TactusError::InvalidConfig(format!(
                    "spring {} endpoints ({}, {}) invalid for {} nodes",
                    s, spring.i, spring.j, n
                )));
            }
            if spring.rest_length < 0.0 || spring.stiffness < 0.0 || spring.damping < 0.0 {
                return Err(TactusError::InvalidConfig(format!(
                    "spring {} has negative parameters",
                    s
                )));
            }
        }
        if masses.iter().any(|m| !(*m >= 0.0)) {
            return Err(TactusError::InvalidConfig(
                "node masses must be non-negative".into(),
            ));
        }

        let mut neighbors = vec![Vec::new(); n];
        for spring in &springs {
            neighbors[spring.i as usize].push(spring.j);
            neighbors[spring.j as usize].push(spring.i);
        }
        for list in &mut neighbors {
            list.sort_unstable();
            list.dedup();
        }

        let state = BodyState::Nodes(NodeState::from_positions(
            positions.iter().map(|p| p[0]).collect(),
            positions.iter().map(|p| p[1]).collect(),
            positions.iter().map(|p| p[2]).collect(),
        ));

        Ok(Self {
            springs,
            masses,
            gravity,
            boundary: Boundary::new(),
            state,
            neighbors,
            force_x: vec![0.0; n],
            force_y: vec![0.0; n],
            force_z: vec![0.0; n],
        })
    }

    /// The springs.
    pub fn springs(&self) -> &[Spring] {
        &self.springs
    }

    /// Per-node masses.
    pub fn masses(&self) -> &[Scalar] {
        &self.masses
    }

    /// Current node positions/velocities.
    pub fn nodes(&self) -> &NodeState {
        match &self.state {
            BodyState::Nodes(ns) => ns,
            BodyState::Lumped(_) => unreachable!("mass-spring state is always node-based"),
        }
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

    /// The local mechanical network around `node` out to `radius` hops.
    /// Springs map directly onto network edges.
    pub fn local_network(&self, node: u32, radius: u32) -> EdgeNetwork {
        // Breadth-first over the spring adjacency.
        let mut visited = std::collections::BTreeSet::new();
        visited.insert(node);
        let mut frontier = vec![node];
        for _ in 0..radius {
            let mut next = Vec::new();
            for &v in &frontier {
                for &w in &self.neighbors[v as usize] {
                    if visited.insert(w) {
                        next.push(w);
                    }
                }
            }
            frontier = next;
        }
        let nodes: Vec<u32> = visited.into_iter().collect();

        let edges = self
            .springs
            .iter()
            .filter(|s| {
                nodes.binary_search(&s.i).is_ok() && nodes.binary_search(&s.j).is_ok()
            })
            .map(|s| NetworkEdge {
                i: s.i,
                j: s.j,
                rest_length: s.rest_length,
                stiffness: s.stiffness,
                damping: s.damping,
            })
            .collect();

        let masses = nodes.iter().map(|&n| self.masses[n as usize]).collect();
        let fixed = nodes
            .iter()
            .map(|&n| self.boundary.is_fixed(n) || self.masses[n as usize] == 0.0)
            .collect();

        EdgeNetwork {
            contact_node: node,
            nodes,
            edges,
            masses,
            fixed,
        }
    }
}

impl BodyOps for MassSpring {
    fn alloc_state(&self) -> BodyState {
        self.state.zeroed_like()
    }

    fn deriv_state(&mut self, deriv: &mut BodyState, s: &BodyState) {
        let s = match s {
            BodyState::Nodes(ns) => ns,
            BodyState::Lumped(_) => panic!("mass-spring derivative on non-node state"),
        };

        self.force_x.fill(0.0);
        self.force_y.fill(0.0);
        self.force_z.fill(0.0);

        for spring in &self.springs {
            let (i, j) = (spring.i as usize, spring.j as usize);
            let d = s.position(j) - s.position(i);
            let len = d.length();
            if len < EPSILON {
                continue; // Coincident endpoints: direction undefined
            }
            let dir = d / len;
            let rel_vel = (s.velocity(j) - s.velocity(i)).dot(dir);
            let magnitude = spring.stiffness * (len - spring.rest_length)
                + spring.damping * rel_vel;
            let f = dir * magnitude;

            self.force_x[i] += f.x;
            self.force_y[i] += f.y;
            self.force_z[i] += f.z;
            self.force_x[j] -= f.x;
            self.force_y[j] -= f.y;
            self.force_z[j] -= f.z;
        }

        let d = match deriv {
            BodyState::Nodes(ns) => ns,
            BodyState::Lumped(_) => panic!("mass-spring derivative into non-node state"),
        };
        for i in 0..s.node_count() {
            d.pos_x[i] = s.vel_x[i];
            d.pos_y[i] = s.vel_y[i];
            d.pos_z[i] = s.vel_z[i];
            let m = self.masses[i];
            if m > 0.0 {
                d.vel_x[i] = self.force_x[i] / m + self.gravity.x;
                d.vel_y[i] = self.force_y[i] / m + self.gravity.y;
                d.vel_z[i] = self.force_z[i] / m + self.gravity.z;
            } else {
                // Zero mass reads as infinite: the node does not accelerate.
                d.vel_x[i] = 0.0;
                d.vel_y[i] = 0.0;
                d.vel_z[i] = 0.0;
            }
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
