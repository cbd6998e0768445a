//! The four-operation state/integrator protocol.
//!
//! Integrators are written once against this trait and never against a
//! specific body model. The contract:
//!
//! ```text
//! let mut k = body.alloc_state();      // once, at integrator construction
//! body.deriv_state(&mut k, body.state());
//! body.accum_state(&mut next, base, &k, h);
//! ```
//!
//! `deriv_state` recomputes forces from the supplied state (not the
//! body's own) and applies the boundary-condition algebra to the result.
//! `accum_state` re-applies Dirichlet overrides after the linear
//! combination so held nodes are exact, never drifted.

use tactus_types::Scalar;

use crate::state::BodyState;

/// Operations every simulated body exposes to the time integrators.
pub trait BodyOps {
    /// Allocates a zeroed state with the same shape as the body's own.
    ///
    /// Called by integrators at construction time only; stepping never
    /// allocates.
    fn alloc_state(&self) -> BodyState;

    /// Evaluates the right-hand side `f(t, x)` at state `s` into `deriv`.
    ///
    /// Takes `&mut self` because force evaluation refreshes the body's
    /// cached per-element tensors.
    fn deriv_state(&mut self, deriv: &mut BodyState, s: &BodyState);

    /// `dst = base + h·deriv`, then re-applies boundary-condition
    /// overrides so prescribed nodes hold their exact values.
    fn accum_state(&self, dst: &mut BodyState, base: &BodyState, deriv: &BodyState, h: Scalar);

    /// The body's current state.
    fn state(&self) -> &BodyState;

    /// Mutable reference to the body's current state.
    fn state_mut(&mut self) -> &mut BodyState;
}
