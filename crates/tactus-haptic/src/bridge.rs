//! The multirate bridge: double-buffered model handoff.
//!
//! The reduced model is the only state crossing the physics/haptic
//! boundary. The physics thread writes the *inactive* slot and then
//! atomically flips which slot is active; the servo thread only ever
//! locks the active slot. Because the publisher never writes the slot
//! readers are directed to, the servo read cannot wait on a publish in
//! progress, and a snapshot stays valid until the flip replaces it.
//!
//! Force output can be disabled (the device-error path) without tearing
//! the bridge down; the servo then outputs zero force.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::reduced::ReducedModel;

/// Two-slot, swap-of-ownership handoff for reduced models.
#[derive(Debug)]
pub struct ModelBridge {
    slots: [Mutex<Option<Arc<ReducedModel>>>; 2],
    /// Index of the slot readers should take.
    active: AtomicUsize,
    /// Monotonic publish counter, for change detection on the servo side.
    version: AtomicUsize,
    force_enabled: AtomicBool,
}

impl ModelBridge {
    /// An empty bridge with force output enabled.
    pub fn new() -> Self {
        Self {
            slots: [Mutex::new(None), Mutex::new(None)],
            active: AtomicUsize::new(0),
            version: AtomicUsize::new(0),
            force_enabled: AtomicBool::new(true),
        }
    }

    /// Publishes a new model snapshot. Physics thread only.
    ///
    /// Writes the inactive slot, then flips the active index with
    /// release ordering so a reader that observes the flip also
    /// observes the write.
    pub fn publish(&self, model: ReducedModel) {
        let inactive = 1 - self.active.load(Ordering::Acquire);
        {
            let mut slot = self.slots[inactive]
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            *slot = Some(Arc::new(model));
        }
        self.active.store(inactive, Ordering::Release);
        self.version.fetch_add(1, Ordering::Release);
    }

    /// Clears both slots (no active contact). Physics thread only.
    pub fn clear(&self) {
        for slot in &self.slots {
            let mut slot = slot
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            *slot = None;
        }
        self.version.fetch_add(1, Ordering::Release);
    }

    /// The currently published model, if any. Servo thread.
    ///
    /// Locks only the active slot; the cost is one uncontended mutex
    /// acquisition and an `Arc` clone.
    pub fn latest(&self) -> Option<Arc<ReducedModel>> {
        let active = self.active.load(Ordering::Acquire);
        let slot = self.slots[active]
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        slot.clone()
    }

    /// Publish counter; changes whenever `publish` or `clear` runs.
    pub fn version(&self) -> usize {
        self.version.load(Ordering::Acquire)
    }

    /// Enables or disables force output. Disabling is the contained
    /// response to a device transport error.
    pub fn set_force_enabled(&self, enabled: bool) {
        self.force_enabled.store(enabled, Ordering::Release);
    }

    /// Whether the servo should emit forces.
    pub fn force_enabled(&self) -> bool {
        self.force_enabled.load(Ordering::Acquire)
    }
}

impl Default for ModelBridge {
    fn default() -> Self {
        Self::new()
    }
}

/// Device-pose mailbox: the servo thread posts the probe pose, the
/// physics thread reads it at each tick to drive the probe body.
///
/// The servo side uses `try_lock` and simply skips the update when the
/// physics thread happens to be reading — the next servo tick catches
/// up, and the servo never waits.
#[derive(Debug)]
pub struct PoseMailbox {
    pose: Mutex<(tactus_math::Vec3, tactus_math::Mat3)>,
}

impl PoseMailbox {
    /// A mailbox holding the identity pose.
    pub fn new() -> Self {
        Self {
            pose: Mutex::new((tactus_math::Vec3::ZERO, tactus_math::Mat3::IDENTITY)),
        }
    }

    /// Posts a new pose. Servo thread; never blocks.
    pub fn post(&self, position: tactus_math::Vec3, orientation: tactus_math::Mat3) {
        if let Ok(mut slot) = self.pose.try_lock() {
            *slot = (position, orientation);
        }
    }

    /// Reads the most recent pose. Physics thread.
    pub fn read(&self) -> (tactus_math::Vec3, tactus_math::Mat3) {
        *self
            .pose
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for PoseMailbox {
    fn default() -> Self {
        Self::new()
    }
}
