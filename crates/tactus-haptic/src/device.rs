//! The haptic device capability pair.
//!
//! The core is agnostic to the device transport; a driver binding
//! implements this trait and the servo loop calls it — from the servo
//! thread only. Errors never cross the thread boundary: the servo
//! responds by disabling force output at the bridge.

use std::sync::Arc;

use tactus_math::{Mat3, Vec3};
use tactus_types::TactusResult;

use crate::reduced::ReducedModel;

/// Driver-side interface invoked by the haptic servo thread.
pub trait HapticDevice: Send {
    /// Reads the device end-effector pose: `(position, orientation)`.
    fn read_configuration(&mut self) -> TactusResult<(Vec3, Mat3)>;

    /// Hands the device the newly adopted reduced model. Transports
    /// with on-device evaluation forward it; others may ignore it.
    fn use_haptic_model(&mut self, model: &Arc<ReducedModel>) -> TactusResult<()>;

    /// Writes the force for this servo tick.
    fn send_force(&mut self, force: Vec3) -> TactusResult<()>;
}

/// A transportless device for tests and headless runs: pose is set by
/// the test, forces are recorded.
#[derive(Debug, Default)]
pub struct NullDevice {
    /// Pose returned by `read_configuration`.
    pub position: Vec3,
    pub orientation: Mat3,
    /// Last force written by the servo.
    pub last_force: Vec3,
    /// Number of forces written.
    pub sent: u64,
    /// Number of models adopted.
    pub models_adopted: u64,
}

impl NullDevice {
    pub fn new() -> Self {
        Self {
            orientation: Mat3::IDENTITY,
            ..Default::default()
        }
    }
}

impl HapticDevice for NullDevice {
    fn read_configuration(&mut self) -> TactusResult<(Vec3, Mat3)> {
        Ok((self.position, self.orientation))
    }

    fn use_haptic_model(&mut self, _model: &Arc<ReducedModel>) -> TactusResult<()> {
        self.models_adopted += 1;
        Ok(())
    }

    fn send_force(&mut self, force: Vec3) -> TactusResult<()> {
        self.last_force = force;
        self.sent += 1;
        Ok(())
    }
}
