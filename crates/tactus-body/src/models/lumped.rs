//! Lumped-parameter body: a fixed-size linear state-space model.
//!
//! Covers zero-dimensional physical models (fluid chambers, pressure
//! compartments) and doubles as the reference body for integrator
//! accuracy tests: `dx/dt = A·x + b` with a known closed form.

use tactus_types::{Scalar, TactusError, TactusResult};

use crate::protocol::BodyOps;
use crate::state::BodyState;

/// A body whose state is a fixed-size generalized coordinate vector
/// evolving as `dx/dt = A·x + b`.
pub struct LumpedParameter {
    dim: usize,
    /// Row-major `dim × dim` system matrix.
    a: Vec<Scalar>,
    /// Constant forcing term.
    b: Vec<Scalar>,
    state: BodyState,
}

impl LumpedParameter {
    /// Builds a lumped model from its system matrix, forcing term, and
    /// initial state.
    pub fn new(a: Vec<Scalar>, b: Vec<Scalar>, initial: Vec<Scalar>) -> TactusResult<Self> {
        let dim = initial.len();
        if a.len() != dim * dim {
            return Err(TactusError::InvalidConfig(format!(
                "system matrix has {} entries, expected {}",
                a.len(),
                dim * dim
            )));
        }
        if b.len() != dim {
            return Err(TactusError::InvalidConfig(format!(
                "forcing term has {} entries, expected {}",
                b.len(),
                dim
            )));
        }
        Ok(Self {
            dim,
            a,
            b,
            state: BodyState::Lumped(initial),
        })
    }

    /// A one-dimensional decaying model `dx/dt = −k·x`.
    pub fn decay(k: Scalar, x0: Scalar) -> Self {
        Self {
            dim: 1,
            a: vec![-k],
            b: vec![0.0],
            state: BodyState::Lumped(vec![x0]),
        }
    }

    /// State dimension.
    pub fn dim(&self) -> usize {
        self.dim
    }
}

impl BodyOps for LumpedParameter {
    fn alloc_state(&self) -> BodyState {
        self.state.zeroed_like()
    }

    fn deriv_state(&mut self, deriv: &mut BodyState, s: &BodyState) {
        let x = match s {
            BodyState::Lumped(v) => v,
            BodyState::Nodes(_) => panic!("lumped derivative on non-lumped state"),
        };
        let dx = match deriv {
            BodyState::Lumped(v) => v,
            BodyState::Nodes(_) => panic!("lumped derivative into non-lumped state"),
        };
        for r in 0..self.dim {
            let mut sum = self.b[r];
            for c in 0..self.dim {
                sum += self.a[r * self.dim + c] * x[c];
            }
            dx[r] = sum;
        }
    }

    fn accum_state(&self, dst: &mut BodyState, base: &BodyState, deriv: &BodyState, h: Scalar) {
        dst.combine(base, deriv, h);
    }

    fn state(&self) -> &BodyState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut BodyState {
        &mut self.state
    }
}
