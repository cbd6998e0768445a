//! The reduced (low-order) haptic model.
//!
//! A small affine state-space approximation of the contact-force
//! response around one contact node, valid near the current operating
//! point:
//!
//! ```text
//! d(δp)/dt = v0 + δv
//! d(δv)/dt = a0 + A11·δp + A12·δv + B1·δu
//! f        = f0 + C11·δp + C12·δv + D·δu
//! ```
//!
//! where `δp`/`δv` are the free neighbor nodes' displacement and
//! velocity deltas, `δu` is the probe displacement from the build-time
//! anchor, and `(v0, a0) = zdot0` anchors the neighbors' current motion.
//! Matrix dimensions depend only on the neighbor count, never on total
//! mesh size. The model is immutable once built; the physics thread
//! rebuilds (never updates) it each tick.

use tactus_math::{Mat3, Vec3};
use tactus_types::Scalar;

/// Immutable reduced model snapshot published to the servo thread.
#[derive(Debug, Clone)]
pub struct ReducedModel {
    /// The contact node the model is centered on.
    pub contact_node: u32,
    /// Global node ids of the free neighbors, in state order.
    pub neighbors: Vec<u32>,
    /// State dimension: `3 × neighbors.len()`.
    pub dim: usize,

    /// `dim × dim` row-major: displacement → acceleration coupling.
    pub a11: Vec<Scalar>,
    /// `dim × dim` row-major: velocity → acceleration coupling.
    pub a12: Vec<Scalar>,
    /// `dim × 3` row-major: probe input → acceleration coupling.
    pub b1: Vec<Scalar>,
    /// `3 × dim` row-major: displacement → contact force.
    pub c11: Vec<Scalar>,
    /// `3 × dim` row-major: velocity → contact force.
    pub c12: Vec<Scalar>,
    /// Direct probe → force feedthrough.
    pub d: Mat3,

    /// Contact force at zero perturbation.
    pub f0: Vec3,
    /// Anchor motion: neighbor velocities followed by accelerations
    /// (`2 × dim` entries).
    pub zdot0: Vec<Scalar>,
    /// Contact surface normal at build time.
    pub normal: Vec3,
    /// Probe anchor position at build time (`δu = u − u0`).
    pub u0: Vec3,
}

impl ReducedModel {
    /// Number of free neighbor nodes in the state.
    pub fn neighbor_count(&self) -> usize {
        self.neighbors.len()
    }

    /// Force at the operating point for a probe displaced to `u`, with
    /// the neighbor state frozen (`δp = δv = 0`). The full servo
    /// evaluation lives in [`crate::servo::ServoLoop`].
    pub fn static_force(&self, u: Vec3) -> Vec3 {
        self.f0 + self.d * (u - self.u0)
    }
}
