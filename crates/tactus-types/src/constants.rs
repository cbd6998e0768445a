//! Physical constants and simulation defaults.

use crate::Scalar;

/// Gravitational acceleration (m/s²).
pub const GRAVITY: Scalar = 9.81;

/// Default physics timestep (seconds).
pub const DEFAULT_DT: Scalar = 1.0e-3;

/// Default haptic servo rate (Hz).
pub const DEFAULT_SERVO_RATE: Scalar = 1000.0;

/// Default topological radius for the reduced haptic model neighborhood.
pub const DEFAULT_HAPTIC_RADIUS: u32 = 1;

/// Epsilon for floating-point comparisons.
pub const EPSILON: Scalar = 1.0e-12;

/// Tolerance below which a signed tetrahedron volume counts as inverted
/// rather than merely degenerate.
pub const VOLUME_EPS: Scalar = 1.0e-9;

/// Epsilon for degenerate triangle detection (area threshold).
pub const DEGENERATE_AREA_THRESHOLD: Scalar = 1.0e-12;
