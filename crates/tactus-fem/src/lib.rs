//! # tactus-fem
//!
//! Tetrahedral finite-element mechanics under a Kelvin–Voigt
//! (elastic + viscous) constitutive law.
//!
//! ## Key Types
//!
//! - [`MaterialParams`] — density plus the two elastic and two viscous moduli
//! - [`element::TetElement`] — per-element beta matrix, volume, strain,
//!   strain-rate, stress, and nodal-force assembly

pub mod element;
pub mod material;

pub use element::TetElement;
pub use material::MaterialParams;
