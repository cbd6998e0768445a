//! Explicit single- and multi-stage integrators.
//!
//! Each stepper follows the same pattern: snapshot the body state into
//! `y0`, sample derivatives at the stage states, accumulate the final
//! combination into a scratch state, and swap it into the body. The
//! `accum_state` calls re-apply Dirichlet overrides at every stage, so
//! held nodes stay exact through intermediate states too.

use std::mem;

use serde::{Deserialize, Serialize};
use tactus_body::{BodyOps, BodyState};
use tactus_types::Scalar;

/// A time integrator bound to one body's state shape at construction.
pub trait Integrator: Send {
    /// Advances the body's state by one step of size `h`.
    fn step(&mut self, body: &mut dyn BodyOps, h: Scalar);

    /// Returns the integrator's name.
    fn name(&self) -> &str;

    /// Formal order of accuracy.
    fn order(&self) -> u32;
}

/// Integrator selection, as it appears in scene configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntegratorKind {
    Euler,
    Midpoint,
    Heun3,
    RungeKutta4,
}

impl IntegratorKind {
    /// Builds the integrator, preallocating its scratch states from the
    /// body's own shape.
    pub fn create(self, body: &dyn BodyOps) -> Box<dyn Integrator> {
        match self {
            Self::Euler => Box::new(ExplicitEuler::new(body)),
            Self::Midpoint => Box::new(Midpoint::new(body)),
            Self::Heun3 => Box::new(Heun3::new(body)),
            Self::RungeKutta4 => Box::new(RungeKutta4::new(body)),
        }
    }
}

/// Forward Euler: `y1 = y0 + h·f(y0)`.
pub struct ExplicitEuler {
    y0: BodyState,
    k1: BodyState,
    next: BodyState,
}

impl ExplicitEuler {
    pub fn new(body: &dyn BodyOps) -> Self {
        Self {
            y0: body.alloc_state(),
            k1: body.alloc_state(),
            next: body.alloc_state(),
        }
    }
}

impl Integrator for ExplicitEuler {
    fn step(&mut self, body: &mut dyn BodyOps, h: Scalar) {
        self.y0.copy_from(body.state());
        body.deriv_state(&mut self.k1, &self.y0);
        body.accum_state(&mut self.next, &self.y0, &self.k1, h);
        mem::swap(body.state_mut(), &mut self.next);
    }

    fn name(&self) -> &str {
        "explicit_euler"
    }

    fn order(&self) -> u32 {
        1
    }
}

/// Explicit midpoint (RK2): evaluate at `t`, step half, evaluate at
/// `t + h/2`, take the full step from the midpoint derivative.
pub struct Midpoint {
    y0: BodyState,
    k1: BodyState,
    k2: BodyState,
    stage: BodyState,
    next: BodyState,
}

impl Midpoint {
    pub fn new(body: &dyn BodyOps) -> Self {
        Self {
            y0: body.alloc_state(),
            k1: body.alloc_state(),
            k2: body.alloc_state(),
            stage: body.alloc_state(),
            next: body.alloc_state(),
        }
    }
}

impl Integrator for Midpoint {
    fn step(&mut self, body: &mut dyn BodyOps, h: Scalar) {
        self.y0.copy_from(body.state());
        body.deriv_state(&mut self.k1, &self.y0);
        body.accum_state(&mut self.stage, &self.y0, &self.k1, h * 0.5);
        body.deriv_state(&mut self.k2, &self.stage);
        body.accum_state(&mut self.next, &self.y0, &self.k2, h);
        mem::swap(body.state_mut(), &mut self.next);
    }

    fn name(&self) -> &str {
        "midpoint"
    }

    fn order(&self) -> u32 {
        2
    }
}

/// Heun's third-order method: stages at `t`, `t + h/3`, `t + 2h/3`,
/// combined with weights 1/4, 0, 3/4.
pub struct Heun3 {
    y0: BodyState,
    k1: BodyState,
    k2: BodyState,
    k3: BodyState,
    stage: BodyState,
    acc: BodyState,
    next: BodyState,
}

impl Heun3 {
    pub fn new(body: &dyn BodyOps) -> Self {
        Self {
            y0: body.alloc_state(),
            k1: body.alloc_state(),
            k2: body.alloc_state(),
            k3: body.alloc_state(),
            stage: body.alloc_state(),
            acc: body.alloc_state(),
            next: body.alloc_state(),
        }
    }
}

impl Integrator for Heun3 {
    fn step(&mut self, body: &mut dyn BodyOps, h: Scalar) {
        self.y0.copy_from(body.state());

        body.deriv_state(&mut self.k1, &self.y0);
        body.accum_state(&mut self.stage, &self.y0, &self.k1, h / 3.0);
        body.deriv_state(&mut self.k2, &self.stage);
        body.accum_state(&mut self.stage, &self.y0, &self.k2, 2.0 * h / 3.0);
        body.deriv_state(&mut self.k3, &self.stage);

        // y1 = y0 + h·(k1/4 + 3·k3/4); k2 carries zero weight.
        body.accum_state(&mut self.acc, &self.y0, &self.k1, h * 0.25);
        body.accum_state(&mut self.next, &self.acc, &self.k3, h * 0.75);
        mem::swap(body.state_mut(), &mut self.next);
    }

    fn name(&self) -> &str {
        "heun3"
    }

    fn order(&self) -> u32 {
        3
    }
}

/// Classical fourth-order Runge–Kutta: weights 1, 2, 2, 1 over 6.
pub struct RungeKutta4 {
    y0: BodyState,
    k1: BodyState,
    k2: BodyState,
    k3: BodyState,
    k4: BodyState,
    stage: BodyState,
    acc_a: BodyState,
    acc_b: BodyState,
}

impl RungeKutta4 {
    pub fn new(body: &dyn BodyOps) -> Self {
        Self {
            y0: body.alloc_state(),
            k1: body.alloc_state(),
            k2: body.alloc_state(),
            k3: body.alloc_state(),
            k4: body.alloc_state(),
            stage: body.alloc_state(),
            acc_a: body.alloc_state(),
            acc_b: body.alloc_state(),
        }
    }
}

impl Integrator for RungeKutta4 {
    fn step(&mut self, body: &mut dyn BodyOps, h: Scalar) {
        self.y0.copy_from(body.state());

        body.deriv_state(&mut self.k1, &self.y0);
        body.accum_state(&mut self.stage, &self.y0, &self.k1, h * 0.5);
        body.deriv_state(&mut self.k2, &self.stage);
        body.accum_state(&mut self.stage, &self.y0, &self.k2, h * 0.5);
        body.deriv_state(&mut self.k3, &self.stage);
        body.accum_state(&mut self.stage, &self.y0, &self.k3, h);
        body.deriv_state(&mut self.k4, &self.stage);

        // y1 = y0 + h·(k1 + 2·k2 + 2·k3 + k4)/6, as a chain of
        // accumulations alternating between the two scratch states.
        body.accum_state(&mut self.acc_a, &self.y0, &self.k1, h / 6.0);
        body.accum_state(&mut self.acc_b, &self.acc_a, &self.k2, h / 3.0);
        body.accum_state(&mut self.acc_a, &self.acc_b, &self.k3, h / 3.0);
        body.accum_state(&mut self.acc_b, &self.acc_a, &self.k4, h / 6.0);
        mem::swap(body.state_mut(), &mut self.acc_b);
    }

    fn name(&self) -> &str {
        "runge_kutta4"
    }

    fn order(&self) -> u32 {
        4
    }
}
