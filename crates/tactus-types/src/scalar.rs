//! Scalar type alias for the simulation.
//!
//! Set to `f64`: the haptic model linearization and the order-4 explicit
//! integrators need the precision headroom, and there is no GPU path in
//! this engine that would favor `f32`.

/// The floating-point type used throughout the simulation.
pub type Scalar = f64;
