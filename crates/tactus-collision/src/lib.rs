//! # tactus-collision
//!
//! Collision detection and response for the Tactus engine.
//!
//! The pipeline is split into phases:
//! 1. **Pair gate** — the symmetric collision rule table, checked before
//!    any geometry so disabled pairs cost O(1)
//! 2. **Broad phase** — per-body AABB trees rebuilt each step
//! 3. **Narrow phase** — triangle/triangle for body-body contact,
//!    segment/triangle for the probe tip
//! 4. **Response** — the contact triangle's nearest vertex becomes a
//!    temporary Dirichlet node and a reduced haptic model is requested

pub mod aabb;
pub mod contact;
pub mod narrow;
pub mod pipeline;
pub mod rules;

pub use aabb::{Aabb, AabbTree};
pub use contact::{Contact, ContactKind, HapticRequest};
pub use pipeline::{CollisionPipeline, CollisionStepResult};
pub use rules::{CollisionRuleTable, RuleSpec};
