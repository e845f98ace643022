//! engine::gate
//!
//! Precondition gating for operations.
//!
//! # Architecture
//!
//! Each operation declares a [`RequirementSet`]. [`probe`] turns the world
//! and the operation tracker into a [`CapabilitySet`]; [`gate`] checks the
//! set against the requirements and either yields a [`Ready`] context with
//! the ship handle and actor snapshot, or a [`GateError`] listing what is
//! missing.
//!
//! Gating never mutates anything, so a rejected command leaves no trace.
//!
//! # Invariants
//!
//! - Gating never produces `Ready` when requirements are not met
//! - Gating is deterministic given the same world state
//!
//! # Example
//!
//! ```
//! use shipsort::core::ops::OperationTracker;
//! use shipsort::engine::gate::{gate, probe, requirements};
//! use shipsort::world::MockWorld;
//!
//! let world = MockWorld::new();
//! let tracker = OperationTracker::new();
//!
//! let caps = probe(&world, &tracker);
//! assert!(gate(&world, &caps, &requirements::FULL_SORT).is_ok());
//!
//! world.set_ship_stationary(false);
//! let caps = probe(&world, &tracker);
//! assert!(gate(&world, &caps, &requirements::FULL_SORT).is_err());
//! ```

use thiserror::Error;

use super::capabilities::{Capability, CapabilitySet};
use crate::core::ops::OperationTracker;
use crate::world::{ActorState, ShipHandle, World};

/// Requirements for an operation.
#[derive(Debug, Clone)]
pub struct RequirementSet {
    /// Required capabilities.
    pub capabilities: &'static [Capability],
    /// Human-readable name for this requirement set.
    pub name: &'static str,
}

impl RequirementSet {
    pub const fn new(name: &'static str, capabilities: &'static [Capability]) -> Self {
        Self { capabilities, name }
    }

    /// Check if all requirements are satisfied.
    pub fn satisfied_by(&self, caps: &CapabilitySet) -> bool {
        caps.has_all(self.capabilities)
    }

    /// Get the missing capabilities.
    pub fn missing(&self, caps: &CapabilitySet) -> Vec<Capability> {
        caps.missing(self.capabilities)
    }
}

/// Predefined requirement sets.
pub mod requirements {
    use super::*;

    /// Sorting every eligible item.
    pub const FULL_SORT: RequirementSet = RequirementSet::new(
        "full sort",
        &[
            Capability::NoOperationInProgress,
            Capability::ShipPresent,
            Capability::ShipStationary,
            Capability::ActorReady,
        ],
    );

    /// Moving one item type to the player.
    pub const TARGETED_MOVE: RequirementSet = RequirementSet::new(
        "targeted move",
        &[
            Capability::NoOperationInProgress,
            Capability::ShipPresent,
            Capability::ShipStationary,
            Capability::ActorReady,
        ],
    );

    /// Saving the player's position as an override.
    ///
    /// Does not need the ship to be stationary or the tracker to be idle,
    /// but the saved spot must lie inside the ship.
    pub const SET_POSITION: RequirementSet = RequirementSet::new(
        "set position",
        &[
            Capability::ShipPresent,
            Capability::ActorReady,
            Capability::ActorInShip,
        ],
    );
}

/// Errors from gating.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GateError {
    #[error("cannot start {operation}: {}", describe(.missing))]
    Blocked {
        operation: &'static str,
        missing: Vec<Capability>,
    },
}

impl GateError {
    /// The capabilities that were missing.
    pub fn missing(&self) -> &[Capability] {
        match self {
            GateError::Blocked { missing, .. } => missing,
        }
    }
}

fn describe(missing: &[Capability]) -> String {
    missing
        .iter()
        .map(Capability::missing_message)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Context proving an operation's requirements held when gated.
#[derive(Debug, Clone)]
pub struct Ready {
    pub ship: ShipHandle,
    pub actor: ActorState,
}

/// Establish capabilities from the current world state.
pub fn probe(world: &dyn World, tracker: &OperationTracker) -> CapabilitySet {
    let mut caps = CapabilitySet::new();
    caps.insert_if(Capability::NoOperationInProgress, !tracker.is_running());
    caps.insert_if(Capability::ShipPresent, world.find_ship_root().is_some());
    caps.insert_if(Capability::ShipStationary, world.is_ship_stationary());
    caps.insert_if(
        Capability::ActorReady,
        world
            .actor()
            .map_or(false, |a| !a.dead && !a.being_extracted),
    );
    caps.insert_if(Capability::ActorInShip, world.is_actor_in_ship_volume());
    caps
}

/// Check `caps` against `requirements`.
///
/// # Errors
///
/// Returns `GateError::Blocked` naming every missing capability.
pub fn gate(
    world: &dyn World,
    caps: &CapabilitySet,
    requirements: &RequirementSet,
) -> Result<Ready, GateError> {
    let mut missing = requirements.missing(caps);

    let ship = world.find_ship_root();
    let actor = world.actor();
    for (cap, present) in [
        (Capability::ShipPresent, ship.is_some()),
        (Capability::ActorReady, actor.is_some()),
    ] {
        if !present && !missing.contains(&cap) {
            missing.push(cap);
        }
    }

    match (ship, actor) {
        (Some(ship), Some(actor)) if missing.is_empty() => Ok(Ready { ship, actor }),
        _ => {
            tracing::debug!(operation = requirements.name, ?missing, "gate blocked");
            Err(GateError::Blocked {
                operation: requirements.name,
                missing,
            })
        }
    }
}
