//! Contact data produced by the narrow phase.

use serde::{Deserialize, Serialize};
use tactus_math::Vec3;
use tactus_types::{BodyId, Scalar};

/// Type of narrow-phase test that produced a contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContactKind {
    /// Surface triangle of one deformable against another's.
    TriangleTriangle,
    /// Rigid probe tip segment against a deformable surface triangle.
    ProbeTip,
}

/// A detected contact with the owning surface triangle.
#[derive(Debug, Clone, Copy)]
pub struct Contact {
    pub kind: ContactKind,
    /// The intruding body (probe, or the first body of the pair).
    pub body_a: BodyId,
    /// The body owning `triangle`.
    pub body_b: BodyId,
    /// Surface triangle index in `body_b`'s mesh.
    pub triangle: u32,
    /// Contact point in world space.
    pub point: Vec3,
    /// Barycentric coordinates of `point` in the owning triangle.
    pub barycentric: [Scalar; 3],
}

/// Request for a reduced haptic model, issued by the collision response
/// when a contact pins a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HapticRequest {
    /// The deformable body in contact.
    pub body: BodyId,
    /// The contact node the reduced model is centered on.
    pub node: u32,
    /// The probe body driving the contact, if any.
    pub probe: Option<BodyId>,
}
