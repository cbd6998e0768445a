//! # tactus-engine
//!
//! The simulation core that ties the subsystems together.
//!
//! A [`SimulationContext`] owns the bodies, their integrators, the
//! collision pipeline, the haptic bridge, and the telemetry bus — there
//! are no process-wide singletons; every subsystem receives the context
//! explicitly. [`scene`] builds a context from already-parsed
//! configuration values, validating every data-model invariant before
//! the first tick. [`PhysicsLoop`] runs the tick on its own thread with
//! cooperative run/stop control.

pub mod connector;
pub mod context;
pub mod physics;
pub mod scene;
pub mod snapshot;

pub use connector::{BoundaryCoupler, Connector, StressCoupler};
pub use context::SimulationContext;
pub use physics::PhysicsLoop;
pub use scene::{BodyDesc, BoundaryDesc, ModelDesc, RuleDesc, SceneDesc};
pub use snapshot::GeometrySnapshot;
