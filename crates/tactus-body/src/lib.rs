//! # tactus-body
//!
//! Simulated bodies and the state/integrator protocol.
//!
//! Every body — FEM solid, mass-spring network, lumped-parameter model,
//! rigid probe — exposes the same four operations ([`BodyOps`]): allocate
//! a state, evaluate the state derivative, accumulate `base + h·deriv`,
//! and hand out the current state. Integrators are written once against
//! that protocol and never inspect state contents.
//!
//! ## Key Types
//!
//! - [`BodyState`] — opaque per-body numeric buffers (SoA node arrays or
//!   a fixed-size lumped vector)
//! - [`Boundary`] — per-node boundary-condition kinds and their algebra
//! - [`Domain`] — per-element stress override channel for cross-model
//!   coupling
//! - [`Body`] / [`BodyModel`] — the closed set of model variants

pub mod body;
pub mod boundary;
pub mod domain;
pub mod models;
pub mod network;
pub mod protocol;
pub mod state;

pub use body::{Body, BodyModel};
pub use boundary::{Boundary, BoundaryKind};
pub use domain::Domain;
pub use network::{EdgeNetwork, NetworkEdge};
pub use protocol::BodyOps;
pub use state::{BodyState, NodeState};
