//! Simulation event types.
//!
//! Structured events emitted by the engine at various points in each
//! physics tick. Events are lightweight value types carrying just
//! enough data for monitoring and debugging.

use serde::{Deserialize, Serialize};
use tactus_types::Scalar;

/// A simulation event emitted by the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationEvent {
    /// Physics tick number (0-indexed).
    pub tick: u64,
    /// Event payload.
    pub kind: EventKind,
}

/// Event payload variants.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum EventKind {
    /// Physics tick started.
    TickBegin {
        /// Simulation time at the start of the tick (seconds).
        sim_time: Scalar,
    },

    /// Physics tick completed.
    TickEnd {
        /// Wall-clock duration of the tick (seconds).
        wall_time: f64,
    },

    /// Collision pass completed.
    Collision {
        /// Broad-phase candidate pairs tested.
        candidate_pairs: u32,
        /// Narrow-phase contacts found.
        contacts: u32,
    },

    /// A reduced haptic model was published to the bridge.
    HapticPublish {
        /// Body in contact.
        body: u32,
        /// Contact node the model is centered on.
        contact_node: u32,
        /// Free neighbors in the model state.
        neighbors: u32,
    },

    /// A numerical problem was contained (computation continued).
    NumericalWarning {
        /// Body the warning originated from.
        body: u32,
        /// Human-readable description.
        message: String,
    },

    /// Custom event for extensibility.
    Custom {
        /// Arbitrary label.
        label: String,
        /// Free-form payload.
        payload: String,
    },
}

impl SimulationEvent {
    /// Creates a new event for the given tick.
    pub fn new(tick: u64, kind: EventKind) -> Self {
        Self { tick, kind }
    }
}
