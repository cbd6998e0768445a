//! Per-element domain override channel for cross-model coupling.
//!
//! A Domain lets an external coupler (e.g. an electrical excitation
//! model) inject an additive stress into selected elements, and exposes
//! the element tensors for reading. It holds element indices only —
//! geometry stays with the owning body's state.

use std::collections::BTreeMap;

use tactus_math::Mat3;

/// Additive per-element stress overrides.
#[derive(Debug, Clone, Default)]
pub struct Domain {
    overrides: BTreeMap<u32, Mat3>,
}

impl Domain {
    /// An empty domain (no overrides).
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the additive stress override for an element. The whole
    /// tensor is replaced in one call.
    pub fn set_stress_override(&mut self, element: u32, stress: Mat3) {
        self.overrides.insert(element, stress);
    }

    /// Clears the override for an element.
    pub fn clear_stress_override(&mut self, element: u32) {
        self.overrides.remove(&element);
    }

    /// The override for an element, if set.
    pub fn stress_override(&self, element: u32) -> Option<&Mat3> {
        self.overrides.get(&element)
    }

    /// Number of elements carrying an override.
    pub fn override_count(&self) -> usize {
        self.overrides.len()
    }
}
