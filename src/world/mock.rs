//! world::mock
//!
//! Deterministic world for tests and the sandbox binary.
//!
//! # Design
//!
//! `MockWorld` keeps a [`Scene`] in memory and applies replication calls
//! to it immediately, as a perfectly reliable host would. Failure and
//! latency are opt-in:
//!
//! - [`FailOn`] rejects chosen replication calls
//! - [`MockWorld::set_busy`] makes an item unmanipulable for N checks
//! - [`MockWorld::on_placement`] runs a hook after every accepted placement,
//!   which lets tests interrupt an operation at an exact point
//!
//! Every call the sorter makes is recorded as a [`WorldOp`].
//!
//! The ground probe only sees the floor and static platforms, never items,
//! so probing above a finished pile returns the same height as before.
//!
//! # Example
//!
//! ```
//! use shipsort::core::types::{ItemId, ItemState, Vec3};
//! use shipsort::world::{MockWorld, Scene, World};
//!
//! let world = MockWorld::with_scene(Scene {
//!     items: vec![ItemState {
//!         id: ItemId(1),
//!         name: "Shovel".into(),
//!         ..ItemState::default()
//!     }],
//!     ..Scene::default()
//! });
//!
//! let ship = world.find_ship_root().unwrap();
//! world
//!     .place_item_absolute(ItemId(1), ship, Vec3::new(1.0, 0.0, 2.0), None)
//!     .unwrap();
//! assert_eq!(world.placement_count(), 1);
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use glam::Quat;
use serde::{Deserialize, Serialize};

use super::{ActorState, RayHit, ShipHandle, World, WorldError};
use crate::core::types::{FloorRotation, ItemId, ItemState, Vec3};
use crate::ui::notice::Notice;

const SHIP: ShipHandle = ShipHandle(1);

/// Ship placement in the scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ShipScene {
    /// World-space origin of the ship's local frame.
    pub position: Vec3,
    /// Rotation about the vertical axis.
    pub yaw_degrees: f32,
    /// Landed or in orbit.
    pub stationary: bool,
}

impl Default for ShipScene {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            yaw_degrees: 0.0,
            stationary: true,
        }
    }
}

/// A raised axis-aligned surface the ground probe can hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Platform {
    /// Minimum world X/Z corner.
    pub min: [f32; 2],
    /// Maximum world X/Z corner.
    pub max: [f32; 2],
    /// World Y of the top surface.
    pub top: f32,
}

impl Platform {
    fn covers(&self, x: f32, z: f32) -> bool {
        x >= self.min[0] && x <= self.max[0] && z >= self.min[1] && z <= self.max[1]
    }
}

/// Everything a `MockWorld` starts from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Scene {
    pub ship: Option<ShipScene>,
    /// World Y of the ship floor.
    pub floor_y: f32,
    pub platforms: Vec<Platform>,
    pub actor: Option<ActorState>,
    pub actor_in_ship: bool,
    pub items: Vec<ItemState>,
}

impl Default for Scene {
    fn default() -> Self {
        Self {
            ship: Some(ShipScene::default()),
            floor_y: 0.0,
            platforms: Vec::new(),
            actor: Some(ActorState::default()),
            actor_in_ship: true,
            items: Vec::new(),
        }
    }
}

impl Scene {
    /// Parse a scene from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Calls the mock can be told to reject.
#[derive(Debug, Clone, PartialEq)]
pub enum FailOn {
    /// Every primary placement.
    PlaceAbsolute,
    /// Every fallback placement.
    PlaceByThrow,
    /// Both placement calls for one item.
    Item(ItemId),
}

/// A recorded world call.
#[derive(Debug, Clone, PartialEq)]
pub enum WorldOp {
    Raycast { origin: Vec3 },
    SetLocal { item: ItemId, local: Vec3 },
    NotifyNoLongerHeld { item: ItemId },
    PlaceAbsolute { item: ItemId, local: Vec3, accepted: bool },
    PlaceByThrow { item: ItemId, local: Vec3, accepted: bool },
    DropHeld { item: ItemId },
    SetCarryWeight(f32),
}

impl WorldOp {
    /// Whether this is a replication placement attempt.
    pub fn is_placement(&self) -> bool {
        matches!(self, WorldOp::PlaceAbsolute { .. } | WorldOp::PlaceByThrow { .. })
    }
}

type HookFn = dyn Fn(usize) + Send + Sync;

#[derive(Clone)]
struct PlacementHook(Arc<HookFn>);

impl fmt::Debug for PlacementHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PlacementHook")
    }
}

#[derive(Debug)]
struct MockWorldInner {
    scene: Scene,
    fail_on: Vec<FailOn>,
    busy: HashMap<ItemId, u32>,
    operations: Vec<WorldOp>,
    notices: Vec<Notice>,
    accepted: usize,
    hook: Option<PlacementHook>,
}

/// Mock world.
///
/// Thread-safe via internal `Arc<Mutex<...>>` wrapping; clones share state.
#[derive(Debug, Clone)]
pub struct MockWorld {
    inner: Arc<Mutex<MockWorldInner>>,
}

impl Default for MockWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl MockWorld {
    /// An empty ship with a default actor.
    pub fn new() -> Self {
        Self::with_scene(Scene::default())
    }

    pub fn with_scene(scene: Scene) -> Self {
        Self {
            inner: Arc::new(Mutex::new(MockWorldInner {
                scene,
                fail_on: Vec::new(),
                busy: HashMap::new(),
                operations: Vec::new(),
                notices: Vec::new(),
                accepted: 0,
                hook: None,
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, MockWorldInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Reject the given calls from now on.
    pub fn fail_on(self, fail_on: FailOn) -> Self {
        self.lock().fail_on.push(fail_on);
        self
    }

    /// Accept every call again.
    pub fn clear_fail_on(&self) {
        self.lock().fail_on.clear();
    }

    /// Run `hook` with the running total after each accepted placement.
    pub fn on_placement(&self, hook: impl Fn(usize) + Send + Sync + 'static) {
        self.lock().hook = Some(PlacementHook(Arc::new(hook)));
    }

    /// Report `id` as unmanipulable for the next `checks` queries.
    pub fn set_busy(&self, id: ItemId, checks: u32) {
        self.lock().busy.insert(id, checks);
    }

    pub fn set_ship_stationary(&self, stationary: bool) {
        if let Some(ship) = self.lock().scene.ship.as_mut() {
            ship.stationary = stationary;
        }
    }

    pub fn set_actor_dead(&self, dead: bool) {
        if let Some(actor) = self.lock().scene.actor.as_mut() {
            actor.dead = dead;
        }
    }

    pub fn set_actor_extracted(&self, extracted: bool) {
        if let Some(actor) = self.lock().scene.actor.as_mut() {
            actor.being_extracted = extracted;
        }
    }

    pub fn set_actor_in_ship(&self, in_ship: bool) {
        self.lock().scene.actor_in_ship = in_ship;
    }

    /// Put `id` in the actor's hands.
    pub fn give_actor(&self, id: ItemId) {
        let mut inner = self.lock();
        if let Some(item) = inner.scene.items.iter_mut().find(|i| i.id == id) {
            item.held = true;
        }
        if let Some(actor) = inner.scene.actor.as_mut() {
            actor.held_item = Some(id);
        }
    }

    /// Insert or replace an item.
    pub fn upsert_item(&self, state: ItemState) {
        let mut inner = self.lock();
        match inner.scene.items.iter_mut().find(|i| i.id == state.id) {
            Some(item) => *item = state,
            None => inner.scene.items.push(state),
        }
    }

    /// All recorded calls.
    pub fn operations(&self) -> Vec<WorldOp> {
        self.lock().operations.clone()
    }

    pub fn clear_operations(&self) {
        self.lock().operations.clear();
    }

    /// Number of placement attempts (accepted or not) since the last clear.
    pub fn placement_count(&self) -> usize {
        self.lock()
            .operations
            .iter()
            .filter(|op| op.is_placement())
            .count()
    }

    /// Notices posted so far.
    pub fn notices(&self) -> Vec<Notice> {
        self.lock().notices.clone()
    }

    /// Snapshot of the scene.
    pub fn scene(&self) -> Scene {
        self.lock().scene.clone()
    }

    fn rejects(inner: &MockWorldInner, call: FailOn, id: ItemId) -> bool {
        inner
            .fail_on
            .iter()
            .any(|f| *f == call || *f == FailOn::Item(id))
    }

    fn place(
        &self,
        id: ItemId,
        local: Vec3,
        call: FailOn,
        name: &'static str,
    ) -> Result<(), WorldError> {
        let hook = {
            let mut inner = self.lock();
            let rejected = Self::rejects(&inner, call.clone(), id);
            let op = match call {
                FailOn::PlaceByThrow => WorldOp::PlaceByThrow {
                    item: id,
                    local,
                    accepted: !rejected,
                },
                _ => WorldOp::PlaceAbsolute {
                    item: id,
                    local,
                    accepted: !rejected,
                },
            };
            inner.operations.push(op);
            if rejected {
                return Err(WorldError::Rejected {
                    call: name,
                    message: "rejected by host".to_string(),
                });
            }

            let world = to_world(inner.scene.ship.as_ref(), local);
            let item = inner
                .scene
                .items
                .iter_mut()
                .find(|i| i.id == id)
                .ok_or(WorldError::ItemNotFound(id))?;
            item.position = world;
            item.held = false;
            if let Some(actor) = inner.scene.actor.as_mut() {
                if actor.held_item == Some(id) {
                    actor.held_item = None;
                }
            }
            inner.accepted += 1;
            inner.hook.clone().map(|h| (h, inner.accepted))
        };

        // outside the lock so the hook may call back into the world
        if let Some((PlacementHook(hook), total)) = hook {
            hook(total);
        }
        Ok(())
    }
}

fn ship_rotation(ship: Option<&ShipScene>) -> (Vec3, Quat) {
    match ship {
        Some(s) => (s.position, Quat::from_rotation_y(s.yaw_degrees.to_radians())),
        None => (Vec3::ZERO, Quat::IDENTITY),
    }
}

fn to_world(ship: Option<&ShipScene>, local: Vec3) -> Vec3 {
    let (origin, rotation) = ship_rotation(ship);
    rotation * local + origin
}

fn to_local(ship: Option<&ShipScene>, world: Vec3) -> Vec3 {
    let (origin, rotation) = ship_rotation(ship);
    rotation.inverse() * (world - origin)
}

impl World for MockWorld {
    fn find_ship_root(&self) -> Option<ShipHandle> {
        self.lock().scene.ship.as_ref().map(|_| SHIP)
    }

    fn world_to_ship_local(&self, _ship: ShipHandle, position: Vec3) -> Vec3 {
        to_local(self.lock().scene.ship.as_ref(), position)
    }

    fn ship_local_to_world(&self, _ship: ShipHandle, position: Vec3) -> Vec3 {
        to_world(self.lock().scene.ship.as_ref(), position)
    }

    fn raycast_down(&self, origin: Vec3, max_distance: f32, layer_mask: u32) -> Option<RayHit> {
        let mut inner = self.lock();
        inner.operations.push(WorldOp::Raycast { origin });
        if layer_mask == 0 {
            return None;
        }

        let scene = &inner.scene;
        let platform_tops = scene
            .platforms
            .iter()
            .filter(|p| p.covers(origin.x, origin.z))
            .map(|p| p.top);
        let top = std::iter::once(scene.floor_y)
            .chain(platform_tops)
            .filter(|&y| y <= origin.y)
            .fold(None, |best: Option<f32>, y| Some(best.map_or(y, |b| b.max(y))))?;

        let distance = origin.y - top;
        if distance > max_distance {
            return None;
        }
        Some(RayHit {
            point: Vec3::new(origin.x, top, origin.z),
            distance,
        })
    }

    fn enumerate_items(&self) -> Vec<ItemState> {
        self.lock().scene.items.clone()
    }

    fn item(&self, id: ItemId) -> Option<ItemState> {
        self.lock().scene.items.iter().find(|i| i.id == id).cloned()
    }

    fn is_actor_able_to_manipulate(&self, id: ItemId) -> bool {
        let mut inner = self.lock();
        if let Some(remaining) = inner.busy.get_mut(&id) {
            if *remaining > 0 {
                *remaining -= 1;
                return false;
            }
        }
        inner.scene.actor.is_some() && inner.scene.items.iter().any(|i| i.id == id)
    }

    fn set_item_local_position(&self, id: ItemId, _ship: ShipHandle, local: Vec3) {
        let mut inner = self.lock();
        inner.operations.push(WorldOp::SetLocal { item: id, local });
        let world = to_world(inner.scene.ship.as_ref(), local);
        if let Some(item) = inner.scene.items.iter_mut().find(|i| i.id == id) {
            item.position = world;
        }
    }

    fn place_item_absolute(
        &self,
        id: ItemId,
        _ship: ShipHandle,
        local: Vec3,
        _rotation: FloorRotation,
    ) -> Result<(), WorldError> {
        self.place(id, local, FailOn::PlaceAbsolute, "place_item_absolute")
    }

    fn place_item_by_throw(
        &self,
        id: ItemId,
        local: Vec3,
        _rotation: FloorRotation,
    ) -> Result<(), WorldError> {
        self.place(id, local, FailOn::PlaceByThrow, "place_item_by_throw")
    }

    fn notify_actor_no_longer_holding(&self, id: ItemId, _local: Vec3, _rotation: FloorRotation) {
        let mut inner = self.lock();
        inner.operations.push(WorldOp::NotifyNoLongerHeld { item: id });
        let was_held = inner
            .scene
            .actor
            .as_ref()
            .map_or(false, |a| a.held_item == Some(id));
        if was_held {
            if let Some(actor) = inner.scene.actor.as_mut() {
                actor.held_item = None;
            }
            if let Some(item) = inner.scene.items.iter_mut().find(|i| i.id == id) {
                item.held = false;
            }
        }
    }

    fn drop_held_item(&self) -> Result<Option<ItemId>, WorldError> {
        let mut inner = self.lock();
        let floor_y = inner.scene.floor_y;
        let actor = inner.scene.actor.as_mut().ok_or(WorldError::ActorUnavailable)?;
        let Some(id) = actor.held_item.take() else {
            return Ok(None);
        };
        let drop_at = Vec3::new(actor.position.x, floor_y, actor.position.z);

        inner.operations.push(WorldOp::DropHeld { item: id });
        if let Some(item) = inner.scene.items.iter_mut().find(|i| i.id == id) {
            item.held = false;
            item.position = drop_at;
        }
        Ok(Some(id))
    }

    fn actor(&self) -> Option<ActorState> {
        self.lock().scene.actor.clone()
    }

    fn set_actor_carry_weight(&self, weight: f32) {
        let mut inner = self.lock();
        inner.operations.push(WorldOp::SetCarryWeight(weight));
        if let Some(actor) = inner.scene.actor.as_mut() {
            actor.carry_weight = weight;
        }
    }

    fn is_ship_stationary(&self) -> bool {
        self.lock().scene.ship.as_ref().map_or(false, |s| s.stationary)
    }

    fn is_actor_in_ship_volume(&self) -> bool {
        self.lock().scene.actor_in_ship
    }

    fn post_notice(&self, notice: &Notice) {
        tracing::debug!(%notice, "notice");
        self.lock().notices.push(notice.clone());
    }
}
