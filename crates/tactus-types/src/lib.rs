//! # tactus-types
//!
//! Shared types, identifiers, error types, and physical constants
//! for the Tactus surgical simulation engine.
//!
//! This crate has zero domain logic — it defines the vocabulary
//! that all other Tactus crates share.

pub mod constants;
pub mod error;
pub mod ids;
pub mod scalar;

pub use error::{TactusError, TactusResult};
pub use ids::{BodyId, ElementId, NodeId};
pub use scalar::Scalar;
