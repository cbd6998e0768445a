//! Kelvin–Voigt material parameters.
//!
//! The stress law is `σ = λ·tr(E)·I + 2μ·E + φ·tr(Ė)·I + 2ν·Ė`:
//! Lamé-type elastic moduli (λ, μ) paired with their viscous
//! counterparts (φ, ν) acting on the strain rate.

use serde::{Deserialize, Serialize};
use tactus_types::{Scalar, TactusError, TactusResult};

/// Material constants for a viscoelastic tetrahedral element.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MaterialParams {
    /// Mass density (kg/m³).
    pub density: Scalar,
    /// First elastic modulus λ (volumetric stiffness).
    pub lambda: Scalar,
    /// Second elastic modulus μ (shear stiffness).
    pub mu: Scalar,
    /// First viscous modulus φ (volumetric damping).
    pub phi: Scalar,
    /// Second viscous modulus ν (shear damping).
    pub nu: Scalar,
}

impl MaterialParams {
    /// Validates that the parameters describe a physical material.
    ///
    /// Density must be strictly positive; moduli must be non-negative.
    pub fn validate(&self) -> TactusResult<()> {
        if !(self.density > 0.0) {
            return Err(TactusError::InvalidMaterial(format!(
                "density must be positive, got {}",
                self.density
            )));
        }
        for (name, value) in [
            ("lambda", self.lambda),
            ("mu", self.mu),
            ("phi", self.phi),
            ("nu", self.nu),
        ] {
            if !(value >= 0.0) {
                return Err(TactusError::InvalidMaterial(format!(
                    "{name} must be non-negative, got {value}"
                )));
            }
        }
        Ok(())
    }

    /// Generic soft tissue (parenchyma-like).
    pub const fn soft_tissue() -> Self {
        Self {
            density: 1060.0,
            lambda: 8000.0,
            mu: 6000.0,
            phi: 80.0,
            nu: 60.0,
        }
    }

    /// Liver-like tissue: softer, strongly damped.
    pub const fn liver() -> Self {
        Self {
            density: 1050.0,
            lambda: 4000.0,
            mu: 2500.0,
            phi: 120.0,
            nu: 90.0,
        }
    }

    /// Stiff connective tissue (fascia-like).
    pub const fn fascia() -> Self {
        Self {
            density: 1100.0,
            lambda: 40000.0,
            mu: 30000.0,
            phi: 150.0,
            nu: 120.0,
        }
    }
}
