//! # tactus-mesh
//!
//! Tetrahedral mesh types for the Tactus simulation engine.
//!
//! Provides:
//! - [`TetMesh`] — SoA node buffers + tetrahedron indices + extracted
//!   surface triangles
//! - [`topology::Topology`] — unique edge list, node adjacency, and
//!   bounded-radius neighborhood queries (used by the haptic reduction)
//! - [`generators`] — small analytic meshes for tests and demos

pub mod generators;
pub mod mesh;
pub mod topology;

pub use mesh::TetMesh;
pub use topology::Topology;
