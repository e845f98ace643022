//! world
//!
//! The host world as the sorter sees it.
//!
//! # Design
//!
//! The sorter never owns items, physics or replication. Everything it needs
//! from the host goes through the [`World`] capability trait: transforms,
//! the ground probe, item enumeration, the two replication primitives and
//! a handful of actor and ship flags.
//!
//! Calls are synchronous; the host answers them within the current frame.
//! Waiting across frames is the engine's job (see [`crate::engine::wait`]).
//!
//! # Modules
//!
//! - [`mock`] - Deterministic in-memory world for tests and the sandbox

pub mod mock;

pub use mock::{FailOn, MockWorld, Scene, WorldOp};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::types::{FloorRotation, ItemId, ItemState, Vec3};
use crate::ui::notice::Notice;

/// Collision layers a ground probe may hit (floor, props and colliders).
pub const GROUND_LAYER_MASK: u32 = 268_437_761;

/// Height above the pile center a ground probe starts from.
pub const PROBE_LIFT: f32 = 2.0;

/// Maximum ground probe length.
pub const PROBE_DISTANCE: f32 = 80.0;

/// Errors reported by the host world.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum WorldError {
    #[error("ship not found")]
    ShipNotFound,

    #[error("item {0} no longer exists")]
    ItemNotFound(ItemId),

    #[error("local actor unavailable")]
    ActorUnavailable,

    #[error("{call} was rejected: {message}")]
    Rejected { call: &'static str, message: String },
}

/// Opaque handle of the ship the items live in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShipHandle(pub u64);

/// Result of a ground probe.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// World-space hit point.
    pub point: Vec3,
    pub distance: f32,
}

/// Snapshot of the local actor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActorState {
    /// World-space position.
    pub position: Vec3,
    pub held_item: Option<ItemId>,
    pub carry_weight: f32,
    pub dead: bool,
    /// Playing the extraction / abduction animation.
    pub being_extracted: bool,
}

impl Default for ActorState {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            held_item: None,
            carry_weight: 1.0,
            dead: false,
            being_extracted: false,
        }
    }
}

/// Everything the sorter asks of the host.
pub trait World: Send + Sync {
    /// The ship, if one is loaded.
    fn find_ship_root(&self) -> Option<ShipHandle>;

    /// Convert a world position into the ship's local space.
    fn world_to_ship_local(&self, ship: ShipHandle, position: Vec3) -> Vec3;

    /// Convert a ship-local position into world space.
    fn ship_local_to_world(&self, ship: ShipHandle, position: Vec3) -> Vec3;

    /// Single downward ground probe.
    fn raycast_down(&self, origin: Vec3, max_distance: f32, layer_mask: u32) -> Option<RayHit>;

    /// Every item the host knows about, in host order.
    fn enumerate_items(&self) -> Vec<ItemState>;

    /// Fresh state of one item.
    fn item(&self, id: ItemId) -> Option<ItemState>;

    /// Whether the local actor may manipulate `id` this frame.
    fn is_actor_able_to_manipulate(&self, id: ItemId) -> bool;

    /// Optimistically move the item's local transform.
    fn set_item_local_position(&self, id: ItemId, ship: ShipHandle, local: Vec3);

    /// Primary replication call: parent to the ship at an absolute local position.
    fn place_item_absolute(
        &self,
        id: ItemId,
        ship: ShipHandle,
        local: Vec3,
        rotation: FloorRotation,
    ) -> Result<(), WorldError>;

    /// Fallback replication call.
    fn place_item_by_throw(
        &self,
        id: ItemId,
        local: Vec3,
        rotation: FloorRotation,
    ) -> Result<(), WorldError>;

    /// Tell the host the actor no longer holds `id`.
    fn notify_actor_no_longer_holding(&self, id: ItemId, local: Vec3, rotation: FloorRotation);

    /// Drop whatever the actor holds, returning it.
    fn drop_held_item(&self) -> Result<Option<ItemId>, WorldError>;

    /// The local actor, if spawned.
    fn actor(&self) -> Option<ActorState>;

    /// Restore the actor's carry weight.
    fn set_actor_carry_weight(&self, weight: f32);

    /// Landed or in orbit (not taking off or landing).
    fn is_ship_stationary(&self) -> bool;

    /// Whether the actor stands inside the ship volume.
    fn is_actor_in_ship_volume(&self) -> bool;

    /// Show a notice to the player.
    fn post_notice(&self, notice: &Notice);
}
