//! Event sinks.

use std::sync::{Arc, Mutex};

use crate::events::SimulationEvent;

/// Consumer side of the event bus.
pub trait EventSink: Send {
    /// Handles one event. Called from `EventBus::flush`.
    fn handle(&mut self, event: &SimulationEvent);
}

/// Writes events to stderr, one line each.
#[derive(Debug, Default)]
pub struct StderrSink;

impl EventSink for StderrSink {
    fn handle(&mut self, event: &SimulationEvent) {
        eprintln!("[tick {:>6}] {:?}", event.tick, event.kind);
    }
}

/// Collects events into a shared buffer, for tests and inspection.
#[derive(Debug, Clone, Default)]
pub struct CollectSink {
    events: Arc<Mutex<Vec<SimulationEvent>>>,
}

impl CollectSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all collected events.
    pub fn events(&self) -> Vec<SimulationEvent> {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl EventSink for CollectSink {
    fn handle(&mut self, event: &SimulationEvent) {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(event.clone());
    }
}
