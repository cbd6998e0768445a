//! Cross-body couplers.
//!
//! A connector reads one body's boundary/domain outputs and writes
//! another body's inputs, once per physics tick, in the fixed order
//! they were registered. Connectors run synchronously inside the tick
//! on the physics thread, so no cross-thread locking is involved.

use tactus_body::{Body, BoundaryKind};
use tactus_math::tensor::scaled_identity;
use tactus_math::Vec3;
use tactus_types::{BodyId, Scalar};

/// One cross-body coupler.
pub trait Connector: Send {
    /// Applies the coupling for this tick. Bodies are indexed by id.
    fn apply(&mut self, bodies: &mut [Body]);

    /// Returns the connector's name.
    fn name(&self) -> &str;
}

/// Reads a scalar from a lumped body's state and injects it as an
/// isotropic stress override into selected elements of a FEM body
/// (e.g. excitation from a zero-dimensional electrical model).
pub struct StressCoupler {
    /// Lumped source body.
    pub source: BodyId,
    /// Index into the source's state vector.
    pub source_index: usize,
    /// FEM target body.
    pub target: BodyId,
    /// Elements receiving the override.
    pub elements: Vec<u32>,
    /// Stress per unit of source state.
    pub gain: Scalar,
}

impl Connector for StressCoupler {
    fn apply(&mut self, bodies: &mut [Body]) {
        use tactus_body::BodyOps;

        let Some(value) = bodies[self.source.index()]
            .state()
            .as_lumped()
            .and_then(|v| v.get(self.source_index).copied())
        else {
            return;
        };

        let stress = scaled_identity(self.gain * value);
        if let Some(domain) = bodies[self.target.index()].domain_mut() {
            for &element in &self.elements {
                domain.set_stress_override(element, stress);
            }
        }
    }

    fn name(&self) -> &str {
        "stress_coupler"
    }
}

/// Reads the reaction force at one body's boundary node and applies it,
/// scaled, as a traction on another body's node (action–reaction
/// coupling across a shared interface).
pub struct BoundaryCoupler {
    /// Body whose reaction is read.
    pub source: BodyId,
    pub source_node: u32,
    /// Body whose boundary receives the traction.
    pub target: BodyId,
    pub target_node: u32,
    /// Scale applied to the reaction (−1 for action–reaction).
    pub gain: Scalar,
}

impl Connector for BoundaryCoupler {
    fn apply(&mut self, bodies: &mut [Body]) {
        let reaction = match &bodies[self.source.index()].model {
            tactus_body::BodyModel::FemSolid(m) => m.reaction_force(self.source_node),
            tactus_body::BodyModel::MassSpring(m) => m.reaction_force(self.source_node),
            _ => Vec3::ZERO,
        };

        if let Some(boundary) = bodies[self.target.index()].boundary_mut() {
            boundary.set(
                self.target_node,
                BoundaryKind::Traction {
                    value: reaction * self.gain,
                },
            );
        }
    }

    fn name(&self) -> &str {
        "boundary_coupler"
    }
}
