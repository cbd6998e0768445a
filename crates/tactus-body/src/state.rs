//! Body state — opaque aggregates of owned numeric buffers.
//!
//! Integrators only ever allocate states, combine them linearly, and
//! request derivatives through the body protocol; they never look inside.
//! The same aggregate type doubles as a state and as a state derivative
//! (the position slots of a derivative hold `d(pos)/dt`, and so on).

use tactus_math::Vec3;
use tactus_types::Scalar;

/// SoA buffers for per-node position and velocity of a mesh body.
///
/// All arrays have length `node_count`. Channels are stored contiguously
/// (`pos_x: [x0, x1, ...]`), matching the mesh layout.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeState {
    pub pos_x: Vec<Scalar>,
    pub pos_y: Vec<Scalar>,
    pub pos_z: Vec<Scalar>,
    pub vel_x: Vec<Scalar>,
    pub vel_y: Vec<Scalar>,
    pub vel_z: Vec<Scalar>,
}

impl NodeState {
    /// Zero-initialized state for `n` nodes.
    pub fn zeroed(n: usize) -> Self {
        Self {
            pos_x: vec![0.0; n],
            pos_y: vec![0.0; n],
            pos_z: vec![0.0; n],
            vel_x: vec![0.0; n],
            vel_y: vec![0.0; n],
            vel_z: vec![0.0; n],
        }
    }

    /// State with the given positions and zero velocities.
    pub fn from_positions(pos_x: Vec<Scalar>, pos_y: Vec<Scalar>, pos_z: Vec<Scalar>) -> Self {
        let n = pos_x.len();
        Self {
            pos_x,
            pos_y,
            pos_z,
            vel_x: vec![0.0; n],
            vel_y: vec![0.0; n],
            vel_z: vec![0.0; n],
        }
    }

    /// Number of nodes.
    #[inline]
    pub fn node_count(&self) -> usize {
        self.pos_x.len()
    }

    /// Position of node `i`.
    #[inline]
    pub fn position(&self, i: usize) -> Vec3 {
        Vec3::new(self.pos_x[i], self.pos_y[i], self.pos_z[i])
    }

    /// Velocity of node `i`.
    #[inline]
    pub fn velocity(&self, i: usize) -> Vec3 {
        Vec3::new(self.vel_x[i], self.vel_y[i], self.vel_z[i])
    }

    /// Sets the position of node `i`.
    #[inline]
    pub fn set_position(&mut self, i: usize, p: Vec3) {
        self.pos_x[i] = p.x;
        self.pos_y[i] = p.y;
        self.pos_z[i] = p.z;
    }

    /// Sets the velocity of node `i`.
    #[inline]
    pub fn set_velocity(&mut self, i: usize, v: Vec3) {
        self.vel_x[i] = v.x;
        self.vel_y[i] = v.y;
        self.vel_z[i] = v.z;
    }

    /// Zeroes every buffer in place.
    pub fn clear(&mut self) {
        for buf in [
            &mut self.pos_x,
            &mut self.pos_y,
            &mut self.pos_z,
            &mut self.vel_x,
            &mut self.vel_y,
            &mut self.vel_z,
        ] {
            buf.fill(0.0);
        }
    }
}

/// A body's state: tagged by model family, opaque to integrators.
#[derive(Debug, Clone, PartialEq)]
pub enum BodyState {
    /// Per-node positions and velocities (mesh models, probe).
    Nodes(NodeState),
    /// Fixed-size generalized coordinate vector (lumped models).
    Lumped(Vec<Scalar>),
}

impl BodyState {
    /// A zeroed state of the same shape as `self`.
    pub fn zeroed_like(&self) -> Self {
        match self {
            Self::Nodes(ns) => Self::Nodes(NodeState::zeroed(ns.node_count())),
            Self::Lumped(v) => Self::Lumped(vec![0.0; v.len()]),
        }
    }

    /// `self = base + h·deriv`, elementwise.
    ///
    /// Panics if the three states do not share a shape — two states of the
    /// same body always do, so a mismatch is a programming error, not a
    /// runtime condition.
    pub fn combine(&mut self, base: &BodyState, deriv: &BodyState, h: Scalar) {
        match (self, base, deriv) {
            (Self::Nodes(dst), Self::Nodes(b), Self::Nodes(d)) => {
                let n = dst.node_count();
                assert_eq!(n, b.node_count());
                assert_eq!(n, d.node_count());
                for i in 0..n {
                    dst.pos_x[i] = b.pos_x[i] + h * d.pos_x[i];
                    dst.pos_y[i] = b.pos_y[i] + h * d.pos_y[i];
                    dst.pos_z[i] = b.pos_z[i] + h * d.pos_z[i];
                    dst.vel_x[i] = b.vel_x[i] + h * d.vel_x[i];
                    dst.vel_y[i] = b.vel_y[i] + h * d.vel_y[i];
                    dst.vel_z[i] = b.vel_z[i] + h * d.vel_z[i];
                }
            }
            (Self::Lumped(dst), Self::Lumped(b), Self::Lumped(d)) => {
                assert_eq!(dst.len(), b.len());
                assert_eq!(dst.len(), d.len());
                for i in 0..dst.len() {
                    dst[i] = b[i] + h * d[i];
                }
            }
            _ => panic!("BodyState::combine on mismatched state shapes"),
        }
    }

    /// Copies another state of the same shape into `self` without
    /// allocating.
    pub fn copy_from(&mut self, src: &BodyState) {
        match (self, src) {
            (Self::Nodes(dst), Self::Nodes(s)) => {
                dst.pos_x.copy_from_slice(&s.pos_x);
                dst.pos_y.copy_from_slice(&s.pos_y);
                dst.pos_z.copy_from_slice(&s.pos_z);
                dst.vel_x.copy_from_slice(&s.vel_x);
                dst.vel_y.copy_from_slice(&s.vel_y);
                dst.vel_z.copy_from_slice(&s.vel_z);
            }
            (Self::Lumped(dst), Self::Lumped(s)) => dst.copy_from_slice(s),
            _ => panic!("BodyState::copy_from on mismatched state shapes"),
        }
    }

    /// The node buffers, if this is a mesh-family state.
    pub fn as_nodes(&self) -> Option<&NodeState> {
        match self {
            Self::Nodes(ns) => Some(ns),
            Self::Lumped(_) => None,
        }
    }

    /// Mutable node buffers, if this is a mesh-family state.
    pub fn as_nodes_mut(&mut self) -> Option<&mut NodeState> {
        match self {
            Self::Nodes(ns) => Some(ns),
            Self::Lumped(_) => None,
        }
    }

    /// The lumped coordinate vector, if this is a lumped-family state.
    pub fn as_lumped(&self) -> Option<&[Scalar]> {
        match self {
            Self::Lumped(v) => Some(v),
            Self::Nodes(_) => None,
        }
    }
}
