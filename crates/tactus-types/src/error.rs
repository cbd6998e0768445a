//! Error types for the Tactus engine.
//!
//! All crates return `TactusResult<T>` from fallible operations.
//! Configuration errors abort object construction; numerical errors are
//! reported through telemetry and never unwind a physics tick.

use thiserror::Error;

/// Unified error type for the Tactus engine.
#[derive(Debug, Error)]
pub enum TactusError {
    /// Mesh data is malformed or inconsistent.
    #[error("Invalid mesh: {0}")]
    InvalidMesh(String),

    /// Material parameter is out of valid range.
    #[error("Invalid material parameter: {0}")]
    InvalidMaterial(String),

    /// Scene or solver configuration value is invalid.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A boundary-condition kind name from scene data was not recognized.
    #[error("Unknown boundary condition kind: {0}")]
    UnknownBoundaryKind(String),

    /// A collision rule name from scene data was not recognized.
    #[error("Unknown collision rule: {0}")]
    UnknownRule(String),

    /// An element's reference configuration is degenerate
    /// (non-invertible shape matrix at load time).
    #[error("Degenerate element {element}: {reason}")]
    DegenerateElement { element: usize, reason: String },

    /// Haptic device transport failure. Force output is disabled in
    /// response; the error never crosses the servo thread boundary.
    #[error("Haptic device error: {0}")]
    Device(String),
}

/// Convenience alias for `Result<T, TactusError>`.
pub type TactusResult<T> = Result<T, TactusError>;
