//! engine::motion
//!
//! Moving one item through the host's replication calls.
//!
//! # Steps
//!
//! 1. Resolve the ship; fail fast without it
//! 2. Move the item's local transform right away, before any acknowledgment
//! 3. Tell the host the actor no longer holds the item, unless the actor
//!    holds a different item (which the notification would drop)
//! 4. Try the primary placement call, then the throw fallback
//!
//! A failed placement is a soft failure: callers log it and move on.

use thiserror::Error;

use crate::core::types::{FloorRotation, ItemId, Vec3};
use crate::world::{World, WorldError};

/// Which replication call moved the item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Primary call accepted.
    Placed,
    /// Primary rejected, fallback accepted.
    Thrown,
}

/// Errors from moving an item.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum MotionError {
    #[error("ship not found")]
    ShipNotFound,

    #[error("could not move {item}: {primary}; fallback: {fallback}")]
    Rejected {
        item: ItemId,
        primary: WorldError,
        fallback: WorldError,
    },
}

/// Move `item` to ship-local `target`.
///
/// Issues one placement call on success, two when falling back.
///
/// # Errors
///
/// - `MotionError::ShipNotFound` if there is no ship
/// - `MotionError::Rejected` if both placement calls fail
pub fn place(
    world: &dyn World,
    item: ItemId,
    target: Vec3,
    rotation: FloorRotation,
) -> Result<Placement, MotionError> {
    let ship = world.find_ship_root().ok_or(MotionError::ShipNotFound)?;

    world.set_item_local_position(item, ship, target);

    let held = world.actor().and_then(|a| a.held_item);
    match held {
        Some(other) if other != item => {
            tracing::debug!(%item, holding = %other, "actor holds another item, not releasing");
        }
        _ => world.notify_actor_no_longer_holding(item, target, rotation),
    }

    let primary = match world.place_item_absolute(item, ship, target, rotation) {
        Ok(()) => return Ok(Placement::Placed),
        Err(e) => e,
    };
    tracing::debug!(%item, error = %primary, "primary placement rejected, throwing");

    match world.place_item_by_throw(item, target, rotation) {
        Ok(()) => Ok(Placement::Thrown),
        Err(fallback) => Err(MotionError::Rejected {
            item,
            primary,
            fallback,
        }),
    }
}
