//! The `Body` wrapper: identity plus a tagged model variant.
//!
//! The model set is a closed enum: the integrators and the physics loop
//! dispatch through [`BodyOps`] on the enum, never on a concrete model.

use tactus_types::{BodyId, Scalar};

use crate::models::{FemSolid, LumpedParameter, MassSpring, RigidProbe};
use crate::network::EdgeNetwork;
use crate::protocol::BodyOps;
use crate::state::BodyState;
use crate::{Boundary, Domain};

/// The closed set of body model variants.
pub enum BodyModel {
    FemSolid(FemSolid),
    MassSpring(MassSpring),
    Lumped(LumpedParameter),
    Probe(RigidProbe),
}

/// One simulated body: stable id, unique name, model.
pub struct Body {
    pub id: BodyId,
    pub name: String,
    pub model: BodyModel,
}

impl Body {
    /// Wraps a model with its identity.
    pub fn new(id: BodyId, name: impl Into<String>, model: BodyModel) -> Self {
        Self {
            id,
            name: name.into(),
            model,
        }
    }

    /// The body's boundary, for models that have one.
    pub fn boundary(&self) -> Option<&Boundary> {
        match &self.model {
            BodyModel::FemSolid(m) => Some(&m.boundary),
            BodyModel::MassSpring(m) => Some(&m.boundary),
            BodyModel::Lumped(_) | BodyModel::Probe(_) => None,
        }
    }

    /// Mutable boundary access (collision response, couplers).
    pub fn boundary_mut(&mut self) -> Option<&mut Boundary> {
        match &mut self.model {
            BodyModel::FemSolid(m) => Some(&mut m.boundary),
            BodyModel::MassSpring(m) => Some(&mut m.boundary),
            BodyModel::Lumped(_) | BodyModel::Probe(_) => None,
        }
    }

    /// The body's domain override channel, for models that have one.
    pub fn domain(&self) -> Option<&Domain> {
        match &self.model {
            BodyModel::FemSolid(m) => Some(&m.domain),
            _ => None,
        }
    }

    /// Mutable domain access (cross-model couplers).
    pub fn domain_mut(&mut self) -> Option<&mut Domain> {
        match &mut self.model {
            BodyModel::FemSolid(m) => Some(&mut m.domain),
            _ => None,
        }
    }

    /// The FEM solid model, if this body is one.
    pub fn as_fem(&self) -> Option<&FemSolid> {
        match &self.model {
            BodyModel::FemSolid(m) => Some(m),
            _ => None,
        }
    }

    /// The probe model, if this body is one.
    pub fn as_probe(&self) -> Option<&RigidProbe> {
        match &self.model {
            BodyModel::Probe(p) => Some(p),
            _ => None,
        }
    }

    /// Mutable probe access (pose updates from the device).
    pub fn as_probe_mut(&mut self) -> Option<&mut RigidProbe> {
        match &mut self.model {
            BodyModel::Probe(p) => Some(p),
            _ => None,
        }
    }

    /// The local mechanical network around a node, for models that
    /// support haptic contact.
    pub fn local_network(&self, node: u32, radius: u32) -> Option<EdgeNetwork> {
        match &self.model {
            BodyModel::FemSolid(m) => Some(m.local_network(node, radius)),
            BodyModel::MassSpring(m) => Some(m.local_network(node, radius)),
            BodyModel::Lumped(_) | BodyModel::Probe(_) => None,
        }
    }

    /// Whether this body participates in collision at all.
    pub fn collidable(&self) -> bool {
        !matches!(self.model, BodyModel::Lumped(_))
    }
}

impl BodyOps for BodyModel {
    fn alloc_state(&self) -> BodyState {
        match self {
            Self::FemSolid(m) => m.alloc_state(),
            Self::MassSpring(m) => m.alloc_state(),
            Self::Lumped(m) => m.alloc_state(),
            Self::Probe(m) => m.alloc_state(),
        }
    }

    fn deriv_state(&mut self, deriv: &mut BodyState, s: &BodyState) {
        match self {
            Self::FemSolid(m) => m.deriv_state(deriv, s),
            Self::MassSpring(m) => m.deriv_state(deriv, s),
            Self::Lumped(m) => m.deriv_state(deriv, s),
            Self::Probe(m) => m.deriv_state(deriv, s),
        }
    }

    fn accum_state(&self, dst: &mut BodyState, base: &BodyState, deriv: &BodyState, h: Scalar) {
        match self {
            Self::FemSolid(m) => m.accum_state(dst, base, deriv, h),
            Self::MassSpring(m) => m.accum_state(dst, base, deriv, h),
            Self::Lumped(m) => m.accum_state(dst, base, deriv, h),
            Self::Probe(m) => m.accum_state(dst, base, deriv, h),
        }
    }

    fn state(&self) -> &BodyState {
        match self {
            Self::FemSolid(m) => m.state(),
            Self::MassSpring(m) => m.state(),
            Self::Lumped(m) => m.state(),
            Self::Probe(m) => m.state(),
        }
    }

    fn state_mut(&mut self) -> &mut BodyState {
        match self {
            Self::FemSolid(m) => m.state_mut(),
            Self::MassSpring(m) => m.state_mut(),
            Self::Lumped(m) => m.state_mut(),
            Self::Probe(m) => m.state_mut(),
        }
    }
}

impl BodyOps for Body {
    fn alloc_state(&self) -> BodyState {
        self.model.alloc_state()
    }

    fn deriv_state(&mut self, deriv: &mut BodyState, s: &BodyState) {
        self.model.deriv_state(deriv, s)
    }

    fn accum_state(&self, dst: &mut BodyState, base: &BodyState, deriv: &BodyState, h: Scalar) {
        self.model.accum_state(dst, base, deriv, h)
    }

    fn state(&self) -> &BodyState {
        self.model.state()
    }

    fn state_mut(&mut self) -> &mut BodyState {
        self.model.state_mut()
    }
}
