//! Rigid haptic probe: a kinematically-driven tool tip.
//!
//! The probe has no internal dynamics — its pose is written each tick
//! from the haptic device configuration. It participates in collision
//! as a tip segment against deformable surfaces.

use tactus_math::{Mat3, Vec3};
use tactus_types::Scalar;

use crate::protocol::BodyOps;
use crate::state::{BodyState, NodeState};

/// A rigid probe represented by its tip segment.
///
/// Node 0 is the tip, node 1 the tail; the tail sits `length` behind the
/// tip along the probe axis (the orientation's local −Z).
pub struct RigidProbe {
    length: Scalar,
    orientation: Mat3,
    state: BodyState,
}

impl RigidProbe {
    /// Creates a probe of the given shaft length, tip at the origin.
    pub fn new(length: Scalar) -> Self {
        let mut nodes = NodeState::zeroed(2);
        nodes.set_position(1, Vec3::new(0.0, 0.0, length));
        Self {
            length,
            orientation: Mat3::IDENTITY,
            state: BodyState::Nodes(nodes),
        }
    }

    /// Writes the probe pose from the device configuration. The whole
    /// segment moves rigidly.
    pub fn set_pose(&mut self, tip: Vec3, orientation: Mat3) {
        self.orientation = orientation;
        let tail = tip + orientation * Vec3::new(0.0, 0.0, self.length);
        if let BodyState::Nodes(ns) = &mut self.state {
            ns.set_position(0, tip);
            ns.set_position(1, tail);
        }
    }

    /// Current tip position.
    pub fn tip(&self) -> Vec3 {
        match &self.state {
            BodyState::Nodes(ns) => ns.position(0),
            BodyState::Lumped(_) => unreachable!("probe state is always node-based"),
        }
    }

    /// Current tip segment as `(tip, tail)`.
    pub fn segment(&self) -> (Vec3, Vec3) {
        match &self.state {
            BodyState::Nodes(ns) => (ns.position(0), ns.position(1)),
            BodyState::Lumped(_) => unreachable!("probe state is always node-based"),
        }
    }

    /// Current orientation.
    pub fn orientation(&self) -> Mat3 {
        self.orientation
    }
}

impl BodyOps for RigidProbe {
    fn alloc_state(&self) -> BodyState {
        self.state.zeroed_like()
    }

    fn deriv_state(&mut self, deriv: &mut BodyState, _s: &BodyState) {
        // Kinematically driven: no free dynamics.
        if let BodyState::Nodes(ns) = deriv {
            ns.clear();
        }
    }

    fn accum_state(&self, dst: &mut BodyState, base: &BodyState, deriv: &BodyState, h: Scalar) {
        dst.combine(base, deriv, h);
    }

    fn state(&self) -> &BodyState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut BodyState {
        &mut self.state
    }
}
