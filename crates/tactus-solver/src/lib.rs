//! # tactus-solver
//!
//! Explicit time integrators over the four-operation body protocol.
//!
//! Every integrator is a stateless algorithm plus preallocated scratch
//! states: construction calls `alloc_state` once per scratch buffer,
//! stepping never allocates. Integrators never inspect state contents
//! and perform no bounds checking — a body whose derivative produces
//! NaN/Inf is the caller's problem to detect.
//!
//! ## Implementations
//!
//! - [`ExplicitEuler`] — order 1, one derivative evaluation
//! - [`Midpoint`] — order 2 (explicit midpoint / RK2)
//! - [`Heun3`] — order 3, weights 1/4, 0, 3/4
//! - [`RungeKutta4`] — order 4, classic 1,2,2,1 over 6

pub mod integrator;

pub use integrator::{
    ExplicitEuler, Heun3, Integrator, IntegratorKind, Midpoint, RungeKutta4,
};
