//! # tactus-telemetry
//!
//! Structured telemetry for the Tactus engine: an event bus with
//! pluggable sinks. Numerical warnings (inverted elements, degenerate
//! geometry) travel through here — the physics tick reports and keeps
//! going, it never unwinds.

pub mod bus;
pub mod events;
pub mod sinks;

pub use bus::EventBus;
pub use events::{EventKind, SimulationEvent};
pub use sinks::{CollectSink, EventSink, StderrSink};
