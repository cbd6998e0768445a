//! The closed set of body model variants.
//!
//! Each model implements the four-operation protocol; the integrators
//! and the physics loop only ever see [`crate::BodyOps`].

pub mod fem_solid;
pub mod lumped;
pub mod mass_spring;
pub mod probe;

pub use fem_solid::FemSolid;
pub use lumped::LumpedParameter;
pub use mass_spring::{MassSpring, Spring};
pub use probe::RigidProbe;
