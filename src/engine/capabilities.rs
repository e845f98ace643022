//! engine::capabilities
//!
//! Capability system for operation gating.
//!
//! # Architecture
//!
//! Capabilities are composable proofs about world state at one instant. A
//! capability either exists or does not. The probe in
//! [`crate::engine::gate`] establishes them; each operation declares the
//! ones it needs.
//!
//! # Example
//!
//! ```
//! use shipsort::engine::capabilities::{Capability, CapabilitySet};
//!
//! let mut caps = CapabilitySet::new();
//! caps.insert(Capability::ShipPresent);
//!
//! assert!(caps.has(&Capability::ShipPresent));
//! assert_eq!(
//!     caps.missing(&[Capability::ShipPresent, Capability::ActorReady]),
//!     vec![Capability::ActorReady]
//! );
//! ```

use std::collections::HashSet;

/// A proven fact about the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// No sort or move is running.
    NoOperationInProgress,

    /// The ship is loaded.
    ShipPresent,

    /// The ship is landed or in orbit.
    ShipStationary,

    /// The local actor is spawned, alive and not being extracted.
    ActorReady,

    /// The local actor stands inside the ship.
    ActorInShip,
}

impl Capability {
    /// Human-readable description of the capability.
    pub fn description(&self) -> &'static str {
        match self {
            Capability::NoOperationInProgress => "no operation in progress",
            Capability::ShipPresent => "ship is loaded",
            Capability::ShipStationary => "ship is in orbit or landed",
            Capability::ActorReady => "local player is ready",
            Capability::ActorInShip => "local player is inside the ship",
        }
    }

    /// What the player is told when this capability is missing.
    pub fn missing_message(&self) -> &'static str {
        match self {
            Capability::NoOperationInProgress => "operation in progress",
            Capability::ShipPresent => "ship not found",
            Capability::ShipStationary => "must be in orbit or stationary at the company",
            Capability::ActorReady => "local player not ready yet",
            Capability::ActorInShip => "you must be inside the ship",
        }
    }
}

impl std::fmt::Display for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// A set of established capabilities.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapabilitySet {
    caps: HashSet<Capability>,
}

impl CapabilitySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a capability.
    pub fn insert(&mut self, cap: Capability) {
        self.caps.insert(cap);
    }

    /// Add `cap` when `holds` is true.
    pub fn insert_if(&mut self, cap: Capability, holds: bool) {
        if holds {
            self.insert(cap);
        }
    }

    /// Check for one capability.
    pub fn has(&self, cap: &Capability) -> bool {
        self.caps.contains(cap)
    }

    /// Check for all of `required`.
    pub fn has_all(&self, required: &[Capability]) -> bool {
        required.iter().all(|c| self.has(c))
    }

    /// Required capabilities not present, in `required` order.
    pub fn missing(&self, required: &[Capability]) -> Vec<Capability> {
        required.iter().filter(|c| !self.has(c)).copied().collect()
    }

    pub fn len(&self) -> usize {
        self.caps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.caps.is_empty()
    }
}
