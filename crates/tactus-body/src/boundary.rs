//! Per-node boundary conditions and their algebra.
//!
//! Three kinds: traction (Neumann), fixed (Dirichlet), and mixed
//! (prescribed normal displacement + tangential traction). Kind and
//! values for a node are always set through one call, so a partially
//! updated condition is never observable.
//!
//! The algebra has two halves, mirroring the body protocol:
//! - on `deriv_state`, conditions shape the derivative
//!   (`apply_to_derivative`)
//! - on `accum_state`, Dirichlet/mixed overrides pin the accumulated
//!   state exactly (`apply_to_accumulation`)

use std::collections::BTreeMap;

use tactus_math::Vec3;
use tactus_types::Scalar;

use crate::state::NodeState;

/// Boundary-condition kind with kind-specific values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BoundaryKind {
    /// Neumann: prescribed traction; the node otherwise evolves freely.
    Traction { value: Vec3 },
    /// Dirichlet: the node is held exactly at `value`.
    Fixed { value: Vec3 },
    /// Prescribed displacement along `normal` plus tangential traction.
    Mixed {
        displacement: Scalar,
        traction: Vec3,
        normal: Vec3,
    },
}

/// One boundary node: a global node index plus its condition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundaryNode {
    pub node: u32,
    pub kind: BoundaryKind,
}

/// Ordered set of boundary nodes for one body.
#[derive(Debug, Clone, Default)]
pub struct Boundary {
    /// Condition per node index; BTreeMap keeps iteration ordered.
    nodes: BTreeMap<u32, BoundaryKind>,
}

impl Boundary {
    /// An empty boundary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets (or replaces) the condition for a node. Kind and values
    /// change together — there is no partial update.
    pub fn set(&mut self, node: u32, kind: BoundaryKind) {
        self.nodes.insert(node, kind);
    }

    /// Removes the condition for a node, returning the previous one.
    pub fn remove(&mut self, node: u32) -> Option<BoundaryKind> {
        self.nodes.remove(&node)
    }

    /// The condition on a node, if any.
    pub fn get(&self, node: u32) -> Option<&BoundaryKind> {
        self.nodes.get(&node)
    }

    /// True if the node is currently held by a Dirichlet condition.
    pub fn is_fixed(&self, node: u32) -> bool {
        matches!(self.nodes.get(&node), Some(BoundaryKind::Fixed { .. }))
    }

    /// Number of boundary nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True if no node carries a condition.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterates boundary nodes in node-index order.
    pub fn iter(&self) -> impl Iterator<Item = BoundaryNode> + '_ {
        self.nodes
            .iter()
            .map(|(&node, &kind)| BoundaryNode { node, kind })
    }

    /// Shapes a computed free-response derivative according to each
    /// node's condition.
    ///
    /// - Traction: `value / mass` is added to the velocity derivative.
    /// - Fixed: position and velocity derivatives are zeroed; the node
    ///   is held by the accumulation override instead.
    /// - Mixed: the components of the position and velocity derivatives
    ///   along the prescribed normal are removed (independently), then
    ///   the traction is added. This yields roller/contact behavior.
    pub fn apply_to_derivative(&self, deriv: &mut NodeState, masses: &[Scalar]) {
        for (&node, kind) in &self.nodes {
            let i = node as usize;
            match *kind {
                BoundaryKind::Traction { value } => {
                    let m = masses[i];
                    if m > 0.0 {
                        deriv.vel_x[i] += value.x / m;
                        deriv.vel_y[i] += value.y / m;
                        deriv.vel_z[i] += value.z / m;
                    }
                }
                BoundaryKind::Fixed { .. } => {
                    deriv.pos_x[i] = 0.0;
                    deriv.pos_y[i] = 0.0;
                    deriv.pos_z[i] = 0.0;
                    deriv.vel_x[i] = 0.0;
                    deriv.vel_y[i] = 0.0;
                    deriv.vel_z[i] = 0.0;
                }
                BoundaryKind::Mixed {
                    traction, normal, ..
                } => {
                    let n = normal.normalize_or_zero();

                    let dp = deriv.position(i);
                    deriv.set_position(i, dp - n * n.dot(dp));

                    let dv = deriv.velocity(i);
                    let mut dv = dv - n * n.dot(dv);
                    let m = masses[i];
                    if m > 0.0 {
                        dv += traction / m;
                    }
                    deriv.set_velocity(i, dv);
                }
            }
        }
    }

    /// Re-applies state overrides after a linear accumulation.
    ///
    /// Fixed nodes get their exact prescribed position and zero velocity;
    /// mixed nodes are projected onto the prescribed plane
    /// `normal · x = displacement`. Idempotent by construction.
    pub fn apply_to_accumulation(&self, state: &mut NodeState) {
        for (&node, kind) in &self.nodes {
            let i = node as usize;
            match *kind {
                BoundaryKind::Traction { .. } => {}
                BoundaryKind::Fixed { value } => {
                    state.set_position(i, value);
                    state.set_velocity(i, Vec3::ZERO);
                }
                BoundaryKind::Mixed {
                    displacement,
                    normal,
                    ..
                } => {
                    let n = normal.normalize_or_zero();
                    let p = state.position(i);
                    state.set_position(i, p + n * (displacement - n.dot(p)));
                }
            }
        }
    }

    /// Reaction force at a boundary node, given the node's accumulated
    /// internal force.
    ///
    /// By kind: zero (Traction — the node is free), the full nodal force
    /// (Fixed — the support carries everything), or the nodal force
    /// projected onto the prescribed normal (Mixed — the constraint only
    /// acts along its normal).
    pub fn reaction_force(&self, node: u32, nodal_force: Vec3) -> Vec3 {
        match self.nodes.get(&node) {
            None | Some(BoundaryKind::Traction { .. }) => Vec3::ZERO,
            Some(BoundaryKind::Fixed { .. }) => nodal_force,
            Some(BoundaryKind::Mixed { normal, .. }) => {
                let n = normal.normalize_or_zero();
                n * n.dot(nodal_force)
            }
        }
    }
}
