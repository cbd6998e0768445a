//! # tactus-math
//!
//! Linear algebra primitives for the Tactus simulation engine.
//!
//! Provides:
//! - Re-exports of `glam` double-precision types as the canonical
//!   `Vec3` / `Mat3` / `Mat4` used throughout the engine
//! - Symmetric 3×3 tensor helpers for the viscoelastic stress law
//!   and the haptic linearization

pub mod tensor;

// Re-export the glam f64 types as the canonical math types for Tactus.
// The engine scalar is f64 (see tactus-types::scalar), so the D-variants
// are the ones every crate uses.
pub use glam::{DMat3 as Mat3, DMat4 as Mat4, DQuat as Quat, DVec3 as Vec3, DVec4 as Vec4};
