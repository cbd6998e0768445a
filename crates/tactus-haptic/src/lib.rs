//! # tactus-haptic
//!
//! The haptic side of the engine: model reduction, the multirate
//! bridge, and the servo loop.
//!
//! Every physics tick rebuilds a small linear state-space model of the
//! contact-force response around the active contact node
//! ([`reduction::reduce`]); the model is published through a two-slot
//! [`ModelBridge`] that the kHz servo thread reads without ever waiting
//! on the physics thread. The servo evaluates the published model as
//! pure algebra — no allocation, no locks shared with physics.

pub mod bridge;
pub mod device;
pub mod reduced;
pub mod reduction;
pub mod servo;

pub use bridge::{ModelBridge, PoseMailbox};
pub use device::{HapticDevice, NullDevice};
pub use reduced::ReducedModel;
pub use reduction::reduce;
pub use servo::ServoLoop;
