//! The haptic servo loop.
//!
//! Driven by the device's own scheduler at hundreds to a few thousand
//! Hz. Each tick: read the device pose, evaluate the currently
//! published reduced model (pure algebra over preallocated scratch),
//! and write the force. The loop never calls back into the physics
//! thread; its only shared state is the [`ModelBridge`].
//!
//! Stopping discipline: disable force output first (`bridge.
//! set_force_enabled(false)`), then drop the loop — never drive a
//! closed device with stale matrices.

use std::sync::Arc;

use tactus_math::Vec3;
use tactus_types::{Scalar, TactusResult};

use crate::bridge::{ModelBridge, PoseMailbox};
use crate::device::HapticDevice;
use crate::reduced::ReducedModel;

/// Per-model servo integration state, reused across ticks.
///
/// Buffers are sized when a model is adopted; within a model's lifetime
/// every tick is allocation-free.
#[derive(Debug, Default)]
struct ServoState {
    /// Neighbor displacement deltas from the model's operating point.
    dp: Vec<Scalar>,
    /// Neighbor velocity deltas.
    dv: Vec<Scalar>,
    /// Acceleration scratch.
    acc: Vec<Scalar>,
}

impl ServoState {
    fn adopt(&mut self, dim: usize) {
        self.dp.clear();
        self.dp.resize(dim, 0.0);
        self.dv.clear();
        self.dv.resize(dim, 0.0);
        self.acc.clear();
        self.acc.resize(dim, 0.0);
    }
}

/// The servo-side evaluator bound to one device.
pub struct ServoLoop<D: HapticDevice> {
    bridge: Arc<ModelBridge>,
    device: D,
    /// Servo period (seconds).
    dt: Scalar,
    state: ServoState,
    adopted: Option<Arc<ReducedModel>>,
    adopted_version: usize,
    /// Optional pose mailbox feeding the probe body on the physics side.
    mailbox: Option<Arc<PoseMailbox>>,
}

impl<D: HapticDevice> ServoLoop<D> {
    /// Binds a device to the bridge at the given servo rate.
    pub fn new(bridge: Arc<ModelBridge>, device: D, servo_rate_hz: Scalar) -> Self {
        Self {
            bridge,
            device,
            dt: 1.0 / servo_rate_hz,
            state: ServoState::default(),
            adopted: None,
            adopted_version: usize::MAX,
            mailbox: None,
        }
    }

    /// Forwards device poses to a mailbox read by the physics thread.
    pub fn with_pose_mailbox(mut self, mailbox: Arc<PoseMailbox>) -> Self {
        self.mailbox = Some(mailbox);
        self
    }

    /// The wrapped device (for inspection in tests).
    pub fn device(&self) -> &D {
        &self.device
    }

    /// One servo tick.
    ///
    /// On a device transport error, force output is disabled at the
    /// bridge and the error is returned to the caller of `tick` — it
    /// never propagates toward the physics thread.
    pub fn tick(&mut self) -> TactusResult<()> {
        let result = self.tick_inner();
        if result.is_err() {
            self.bridge.set_force_enabled(false);
        }
        result
    }

    fn tick_inner(&mut self) -> TactusResult<()> {
        let (position, orientation) = self.device.read_configuration()?;
        if let Some(mailbox) = &self.mailbox {
            mailbox.post(position, orientation);
        }

        // Adopt a newly published model. The old snapshot stays in use
        // until this point.
        let version = self.bridge.version();
        if version != self.adopted_version {
            self.adopted = self.bridge.latest();
            self.adopted_version = version;
            if let Some(model) = &self.adopted {
                self.state.adopt(model.dim);
                self.device.use_haptic_model(model)?;
            }
        }

        let force = if !self.bridge.force_enabled() {
            Vec3::ZERO
        } else if let Some(model) = &self.adopted {
            evaluate(model, &mut self.state, position, self.dt)
        } else {
            Vec3::ZERO
        };

        self.device.send_force(force)
    }
}

/// One step of the reduced model: advance the neighbor deltas by `dt`
/// and return the contact force for probe position `u`.
///
/// Pure algebra over the preallocated state — no allocation, no locks.
fn evaluate(model: &ReducedModel, state: &mut ServoState, u: Vec3, dt: Scalar) -> Vec3 {
    let dim = model.dim;
    let du = u - model.u0;

    // acc = a0 + A11·dp + A12·dv + B1·du
    for r in 0..dim {
        let mut sum = model.zdot0[dim + r];
        let row11 = &model.a11[r * dim..(r + 1) * dim];
        let row12 = &model.a12[r * dim..(r + 1) * dim];
        for c in 0..dim {
            sum += row11[c] * state.dp[c] + row12[c] * state.dv[c];
        }
        sum += model.b1[r * 3] * du.x + model.b1[r * 3 + 1] * du.y + model.b1[r * 3 + 2] * du.z;
        state.acc[r] = sum;
    }

    // Semi-implicit advance of the neighbor deltas.
    for r in 0..dim {
        state.dv[r] += dt * state.acc[r];
        state.dp[r] += dt * (model.zdot0[r] + state.dv[r]);
    }

    // f = f0 + C11·dp + C12·dv + D·du
    let mut force = model.f0 + model.d * du;
    for c in 0..dim {
        let dp = state.dp[c];
        let dv = state.dv[c];
        force.x += model.c11[c] * dp + model.c12[c] * dv;
        force.y += model.c11[dim + c] * dp + model.c12[dim + c] * dv;
        force.z += model.c11[2 * dim + c] * dp + model.c12[2 * dim + c] * dv;
    }
    force
}
