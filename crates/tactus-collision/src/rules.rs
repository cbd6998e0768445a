//! The symmetric pairwise collision rule table.
//!
//! Built once at scene-load time from a rule specification and queried
//! on every collision pass. Storage is triangular: only the canonical
//! `(lo, hi)` slot of each unordered pair exists, so symmetry holds by
//! construction. Never mutated during simulation.

use serde::{Deserialize, Serialize};
use tactus_types::{BodyId, TactusError, TactusResult};

/// How the table is populated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleSpec {
    /// Every pair collides.
    EnableAll,
    /// No pair collides.
    DisableAll,
    /// Only the listed pairs collide.
    Enable(Vec<(BodyId, BodyId)>),
    /// Every pair collides except the listed ones.
    Disable(Vec<(BodyId, BodyId)>),
}

impl RuleSpec {
    /// Parses the rule name used in scene configuration. List payloads
    /// come separately; an unrecognized name is a configuration error.
    pub fn from_name(name: &str, pairs: Vec<(BodyId, BodyId)>) -> TactusResult<Self> {
        match name {
            "enable_all" => Ok(Self::EnableAll),
            "disable_all" => Ok(Self::DisableAll),
            "enable" => Ok(Self::Enable(pairs)),
            "disable" => Ok(Self::Disable(pairs)),
            other => Err(TactusError::UnknownRule(other.to_string())),
        }
    }
}

/// Triangular 0/1 table over unordered body pairs.
#[derive(Debug, Clone)]
pub struct CollisionRuleTable {
    body_count: usize,
    /// Flag per canonical pair `(lo, hi)`, `lo < hi`.
    flags: Vec<bool>,
}

impl CollisionRuleTable {
    /// Builds the table for `body_count` bodies from a specification.
    ///
    /// Listed pairs referencing bodies outside the range are a
    /// configuration error.
    pub fn build(body_count: usize, spec: &RuleSpec) -> TactusResult<Self> {
        let slots = body_count.saturating_mul(body_count.saturating_sub(1)) / 2;
        let default = matches!(spec, RuleSpec::EnableAll | RuleSpec::Disable(_));
        let mut table = Self {
            body_count,
            flags: vec![default; slots],
        };

        let (pairs, value) = match spec {
            RuleSpec::EnableAll | RuleSpec::DisableAll => return Ok(table),
            RuleSpec::Enable(pairs) => (pairs, true),
            RuleSpec::Disable(pairs) => (pairs, false),
        };
        for &(a, b) in pairs {
            let slot = table.slot(a, b).ok_or_else(|| {
                TactusError::InvalidConfig(format!(
                    "collision rule pair ({}, {}) out of range for {} bodies",
                    a.0, b.0, body_count
                ))
            })?;
            table.flags[slot] = value;
        }
        Ok(table)
    }

    /// Whether collision testing is enabled for the pair. Symmetric;
    /// a body never collides with itself through this table.
    pub fn is_enabled(&self, a: BodyId, b: BodyId) -> bool {
        match self.slot(a, b) {
            Some(slot) => self.flags[slot],
            None => false,
        }
    }

    /// Number of bodies the table was built for.
    pub fn body_count(&self) -> usize {
        self.body_count
    }

    /// Canonical triangular slot for an unordered pair; `None` for
    /// self-pairs or out-of-range ids.
    fn slot(&self, a: BodyId, b: BodyId) -> Option<usize> {
        let (a, b) = (a.index(), b.index());
        if a == b || a >= self.body_count || b >= self.body_count {
            return None;
        }
        let (lo, hi) = (a.min(b), a.max(b));
        Some(hi * (hi - 1) / 2 + lo)
    }
}
