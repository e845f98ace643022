//! engine
//!
//! Orchestrates every sort operation: Probe -> Gate -> Scan -> Plan -> Run.
//!
//! # Architecture
//!
//! [`Engine`] is the single entry point the command layer talks to. Each
//! operation follows the same lifecycle:
//!
//! 1. **Probe**: Read world state into a [`CapabilitySet`]
//! 2. **Gate**: Check the operation's requirements; refuse before mutating
//! 3. **Scan**: Group eligible items by type key
//! 4. **Plan**: Assign piles (grid slots, override positions or a point)
//! 5. **Run**: Claim the tracker, lock interactions, place item by item
//!
//! Steps 1 to 4 and the claim are synchronous, so two operations started
//! back to back can never both pass the guard.
//!
//! # Invariants
//!
//! - At most one operation runs at a time
//! - Precondition errors leave the world untouched
//! - The interaction lock is held exactly while an operation runs, and the
//!   actor's carry weight is restored when it is released
//! - Interruption is an `Ok` report with a `Cancelled` outcome
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use shipsort::core::config::Config;
//! use shipsort::engine::{Engine, FullSortOptions};
//! use shipsort::store::{MemoryBindingStore, MemoryPositionStore};
//! use shipsort::world::MockWorld;
//!
//! # tokio_test::block_on(async {
//! let engine = Engine::new(
//!     Arc::new(MockWorld::new()),
//!     Arc::new(MemoryPositionStore::new()),
//!     Arc::new(MemoryBindingStore::new()),
//!     Config::default(),
//! );
//! let report = engine.run_full_sort(FullSortOptions::default()).await.unwrap();
//! assert_eq!(report.moved, 0);
//! assert!(!engine.is_operation_in_progress());
//! # });
//! ```

pub mod capabilities;
pub mod gate;
pub mod motion;
pub mod plan;
pub mod query;
pub mod runner;
pub mod scan;
pub mod wait;

pub use capabilities::{Capability, CapabilitySet};
pub use gate::{requirements, GateError, Ready, RequirementSet};
pub use query::{BindingName, QueryError};
pub use runner::{Outcome, SortReport};
pub use scan::{ResolveError, SkipPolicy, SkipRules};
pub use wait::{FrameClock, WaitStatus, YieldClock};

use std::collections::{BTreeMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use thiserror::Error;

use crate::core::config::{Config, ConfigError};
use crate::core::naming;
use crate::core::ops::{
    ActorSnapshot, InteractionGate, OperationKind, OperationState, OperationTicket,
    OperationTracker, StateError,
};
use crate::core::types::{TypeKey, Vec3};
use crate::store::{BindingStore, PositionStore, StoreError};
use crate::ui::notice::Notice;
use crate::world::World;

use plan::{GridSpec, PilePolicy};
use runner::{PileAnchor, PileJob, RunSettings};

/// Errors from engine operations.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    InProgress(#[from] StateError),

    #[error(transparent)]
    Gate(#[from] GateError),

    #[error(transparent)]
    Query(#[from] QueryError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("invalid skip token: {0:?}")]
    InvalidToken(String),
}

impl EngineError {
    /// Whether the error is the single-operation guard firing.
    pub fn is_in_progress(&self) -> bool {
        matches!(self, EngineError::InProgress(_))
            || matches!(self, EngineError::Gate(g) if g.missing().contains(&Capability::NoOperationInProgress))
    }
}

impl From<ResolveError> for EngineError {
    fn from(e: ResolveError) -> Self {
        EngineError::Query(QueryError::Resolve(e))
    }
}

/// Flags for [`Engine::run_full_sort`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FullSortOptions {
    /// Move items even when already in place.
    pub force: bool,
    /// Sort skip-listed types too.
    pub ignore_skip: bool,
    /// Sort skip-listed types that have a saved position.
    pub include_reserved_overrides: bool,
}

/// Flags for [`Engine::run_targeted_move`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoveOptions {
    pub force: bool,
    /// Drop the held item first if it is of the requested type.
    pub drop_held_first: bool,
}

/// Current shortcut and alias bindings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BindingList {
    pub shortcuts: Vec<(u32, TypeKey)>,
    pub aliases: Vec<(String, TypeKey)>,
}

/// Holds the interaction lock for one running operation.
struct ActiveOperation<'a> {
    gate: &'a InteractionGate,
    world: &'a dyn World,
}

impl<'a> ActiveOperation<'a> {
    fn begin(gate: &'a InteractionGate, world: &'a dyn World) -> Self {
        let carry_weight = world.actor().map_or(1.0, |a| a.carry_weight);
        gate.begin_lock(ActorSnapshot { carry_weight });
        Self { gate, world }
    }
}

impl Drop for ActiveOperation<'_> {
    fn drop(&mut self) {
        if let Some(snapshot) = self.gate.end_lock() {
            self.world.set_actor_carry_weight(snapshot.carry_weight);
        }
    }
}

/// The sorter: world, stores, config and the single-operation tracker.
pub struct Engine {
    world: Arc<dyn World>,
    positions: Arc<dyn PositionStore>,
    bindings: Arc<dyn BindingStore>,
    config: Mutex<Config>,
    tracker: Arc<OperationTracker>,
    gate: Arc<InteractionGate>,
    clock: Arc<dyn FrameClock>,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("state", &self.tracker.state())
            .field("locked", &self.gate.is_locked())
            .finish_non_exhaustive()
    }
}

impl Engine {
    pub fn new(
        world: Arc<dyn World>,
        positions: Arc<dyn PositionStore>,
        bindings: Arc<dyn BindingStore>,
        config: Config,
    ) -> Self {
        Self {
            world,
            positions,
            bindings,
            config: Mutex::new(config),
            tracker: Arc::new(OperationTracker::new()),
            gate: Arc::new(InteractionGate::new()),
            clock: Arc::new(YieldClock),
        }
    }

    /// Replace the frame clock.
    pub fn with_clock(mut self, clock: Arc<dyn FrameClock>) -> Self {
        self.clock = clock;
        self
    }

    fn world(&self) -> &dyn World {
        self.world.as_ref()
    }

    fn config(&self) -> MutexGuard<'_, Config> {
        self.config.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// The lock consulted by the host's manual interaction layer.
    pub fn interaction_gate(&self) -> Arc<InteractionGate> {
        Arc::clone(&self.gate)
    }

    /// Handle for cancelling from outside the running future.
    pub fn cancel_handle(&self) -> Arc<OperationTracker> {
        Arc::clone(&self.tracker)
    }

    pub fn state(&self) -> OperationState {
        self.tracker.state()
    }

    pub fn is_operation_in_progress(&self) -> bool {
        self.tracker.is_running()
    }

    /// Ask the running operation to stop before its next item.
    ///
    /// Returns `false` if nothing is running.
    pub fn request_cancel(&self) -> bool {
        self.tracker.request_cancel()
    }

    fn ensure_idle(&self) -> Result<(), EngineError> {
        if let OperationState::Running(kind) = self.tracker.state() {
            return Err(StateError::AlreadyRunning(kind).into());
        }
        Ok(())
    }

    fn gate_for(&self, kind: OperationKind, reqs: &RequirementSet) -> Result<Ready, EngineError> {
        let caps = gate::probe(self.world(), &self.tracker);
        gate::gate(self.world(), &caps, reqs).map_err(|e| {
            self.tracker.fail_to_start(kind);
            EngineError::from(e)
        })
    }

    fn skip_rules(config: &Config) -> SkipRules {
        SkipRules::new(config.skip_tokens(), config.skip_match())
    }

    fn run_settings(config: &Config, force: bool) -> RunSettings {
        RunSettings {
            force,
            tolerance: config.placement_tolerance(),
            wait_frames: config.wait_frames(),
            pile_policy: PilePolicy::from_config(config),
        }
    }

    fn saved_positions(&self) -> BTreeMap<TypeKey, Vec3> {
        match self.positions.list() {
            Ok(list) => list.into_iter().collect(),
            Err(e) => {
                tracing::warn!(error = %e, "could not read saved positions, using grid only");
                BTreeMap::new()
            }
        }
    }

    // =========================================================================
    // Operations
    // =========================================================================

    /// Sort every eligible item into its pile.
    ///
    /// # Errors
    ///
    /// Precondition failures only; per-item failures are counted in the report.
    pub async fn run_full_sort(&self, options: FullSortOptions) -> Result<SortReport, EngineError> {
        const KIND: OperationKind = OperationKind::FullSort;
        self.ensure_idle()?;
        let ready = self.gate_for(KIND, &requirements::FULL_SORT)?;

        let config = self.config().clone();
        let rules = Self::skip_rules(&config);
        let policy = if options.ignore_skip || options.include_reserved_overrides {
            SkipPolicy::IgnoreSkipTokens
        } else {
            SkipPolicy::Default
        };

        let mut candidates = scan::scan(self.world().enumerate_items(), policy, &rules);
        let overrides = self.saved_positions();
        if options.include_reserved_overrides && !options.ignore_skip {
            candidates.retain(|g| !rules.matches(&g.key) || overrides.contains_key(&g.key));
        }

        let keys = candidates.keys();
        let reserved: HashSet<TypeKey> = keys
            .iter()
            .filter(|k| overrides.contains_key(*k))
            .cloned()
            .collect();
        let layout = plan::plan(&keys, &reserved, &GridSpec::from_config(&config));
        let origin = config.origin();

        let jobs: Vec<PileJob> = candidates
            .into_groups()
            .into_iter()
            .filter_map(|group| {
                let anchor = match overrides.get(&group.key) {
                    Some(position) => PileAnchor::Override(*position),
                    None => PileAnchor::Grid {
                        origin,
                        slot: *layout.get(&group.key)?,
                    },
                };
                Some(PileJob {
                    key: group.key,
                    anchor,
                    items: group.items,
                })
            })
            .collect();

        let ticket = self.tracker.try_begin(KIND)?;
        let lock = ActiveOperation::begin(&self.gate, self.world());

        let item_count: usize = jobs.iter().map(|j| j.items.len()).sum();
        tracing::info!(
            groups = jobs.len(),
            items = item_count,
            force = options.force,
            "full sort started"
        );
        self.world().post_notice(&Notice::info(
            "Sorting",
            format!("{} items in {} groups", item_count, jobs.len()),
        ));

        let settings = Self::run_settings(&config, options.force);
        let report = runner::run_jobs(
            self.world(),
            self.clock.as_ref(),
            &ticket,
            ready.ship,
            &jobs,
            &settings,
        )
        .await;

        drop(lock);
        self.finish(ticket, &report);
        Ok(report)
    }

    /// Move every item of one type to the actor's position.
    ///
    /// A blank query with `drop_held_first` targets the held item's type.
    ///
    /// # Errors
    ///
    /// Precondition and resolution failures.
    pub async fn run_targeted_move(
        &self,
        query: &str,
        options: MoveOptions,
    ) -> Result<SortReport, EngineError> {
        const KIND: OperationKind = OperationKind::TargetedMove;
        self.ensure_idle()?;
        let ready = self.gate_for(KIND, &requirements::TARGETED_MOVE)?;

        let config = self.config().clone();
        let rules = Self::skip_rules(&config);
        let candidates = scan::scan(
            self.world().enumerate_items(),
            SkipPolicy::ExplicitQuery,
            &rules,
        );

        let held = ready
            .actor
            .held_item
            .and_then(|id| self.world().item(id))
            .map(|item| (item.id, item.key()))
            .filter(|(_, key)| !key.is_empty() && !key.is_body());

        let mut keys = candidates.keys();
        if options.drop_held_first {
            if let Some((_, key)) = &held {
                if !keys.contains(key) {
                    keys.push(key.clone());
                }
            }
        }

        let resolved = match (query.trim().is_empty(), &held) {
            (true, Some((_, key))) if options.drop_held_first => Ok(key.clone()),
            _ => query::resolve_query(query, self.bindings.as_ref(), &keys),
        };
        let key = match resolved {
            Ok(key) => key,
            Err(e) => {
                self.tracker.fail_to_start(KIND);
                return Err(e.into());
            }
        };

        let drop_held = options.drop_held_first
            && held.as_ref().map_or(false, |(_, held_key)| *held_key == key);
        if candidates.get(&key).is_none() && !drop_held {
            self.tracker.fail_to_start(KIND);
            return Err(ResolveError::NoMatch(key.to_string()).into());
        }

        let destination = self.world().world_to_ship_local(ready.ship, ready.actor.position);

        let ticket = self.tracker.try_begin(KIND)?;
        let lock = ActiveOperation::begin(&self.gate, self.world());
        tracing::info!(%key, force = options.force, drop_held, "targeted move started");
        self.world()
            .post_notice(&Notice::info("Moving", format!("{} to your position", key)));

        if drop_held {
            let dropped = {
                let _bypass = self.gate.scoped_bypass();
                self.world().drop_held_item()
            };
            match dropped {
                Ok(item) => tracing::debug!(?item, "dropped held item before move"),
                Err(e) => tracing::warn!(error = %e, "could not drop held item"),
            }
            self.clock.next_frame().await;
        }

        // rescan: dropping changes the held item's flags
        let items = scan::scan(
            self.world().enumerate_items(),
            SkipPolicy::ExplicitQuery,
            &rules,
        )
        .get(&key)
        .map(|g| g.items.clone())
        .unwrap_or_default();

        let job = PileJob {
            key,
            anchor: PileAnchor::Point(destination),
            items,
        };
        let settings = Self::run_settings(&config, options.force);
        let report = runner::run_jobs(
            self.world(),
            self.clock.as_ref(),
            &ticket,
            ready.ship,
            std::slice::from_ref(&job),
            &settings,
        )
        .await;

        drop(lock);
        self.finish(ticket, &report);
        Ok(report)
    }

    fn finish(&self, ticket: OperationTicket<'_>, report: &SortReport) {
        let kind = ticket.kind();
        let (header_done, header_cancelled) = match kind {
            OperationKind::FullSort => ("Sort complete", "Sort cancelled"),
            OperationKind::TargetedMove => ("Move complete", "Move cancelled"),
        };
        match report.outcome {
            Outcome::Completed => {
                ticket.complete();
                tracing::info!(operation = %kind, summary = %report.summary(), "operation completed");
                self.world()
                    .post_notice(&Notice::success(header_done, report.summary()));
            }
            Outcome::Cancelled(reason) => {
                ticket.cancel(reason);
                tracing::info!(operation = %kind, %reason, moved = report.moved, "operation cancelled");
                self.world().post_notice(&Notice::warning(
                    header_cancelled,
                    format!("{} ({} moved)", reason, report.moved),
                ));
            }
        }
    }

    // =========================================================================
    // Saved positions
    // =========================================================================

    fn query_keys(&self) -> Vec<TypeKey> {
        let config = self.config().clone();
        let candidates = scan::scan(
            self.world().enumerate_items(),
            SkipPolicy::ExplicitQuery,
            &Self::skip_rules(&config),
        );
        let mut keys = candidates.keys();
        let held = self
            .world()
            .actor()
            .and_then(|a| a.held_item)
            .and_then(|id| self.world().item(id))
            .map(|item| item.key())
            .filter(|key| !key.is_empty());
        if let Some(key) = held {
            if !keys.contains(&key) {
                keys.push(key);
            }
        }
        keys
    }

    /// Resolve a query, falling back to the normalized text when nothing
    /// in the ship matches.
    fn resolve_or_literal(&self, query: &str, keys: &[TypeKey]) -> Result<TypeKey, EngineError> {
        match query::resolve_query(query, self.bindings.as_ref(), keys) {
            Ok(key) => Ok(key),
            Err(QueryError::Resolve(ResolveError::NoMatch(_))) => {
                TypeKey::new(query).map_err(|_| ResolveError::NoMatch(query.trim().to_string()).into())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Save the actor's current spot (at ground level) as the pile for a type.
    ///
    /// A blank query names the held item's type.
    pub fn set_override_position(&self, query: &str) -> Result<(TypeKey, Vec3), EngineError> {
        let caps = gate::probe(self.world(), &self.tracker);
        let ready = gate::gate(self.world(), &caps, &requirements::SET_POSITION)?;

        let held_key = ready
            .actor
            .held_item
            .and_then(|id| self.world().item(id))
            .map(|item| item.key())
            .filter(|key| !key.is_empty());
        let key = match (query.trim().is_empty(), held_key) {
            (true, Some(key)) => key,
            _ => self.resolve_or_literal(query, &self.query_keys())?,
        };

        let local = self.world().world_to_ship_local(ready.ship, ready.actor.position);
        let ground = plan::probe_ground(self.world(), ready.ship, local);
        let position = Vec3::new(local.x, ground, local.z);

        self.positions.set(&key, position)?;
        tracing::info!(%key, x = position.x, y = position.y, z = position.z, "saved pile position");
        self.world().post_notice(&Notice::success(
            "Position saved",
            format!("{} at ({:.2}, {:.2}, {:.2})", key, position.x, position.y, position.z),
        ));
        Ok((key, position))
    }

    /// Forget the saved position for a type. Returns whether one existed.
    pub fn remove_override_position(&self, query: &str) -> Result<(TypeKey, bool), EngineError> {
        let saved: Vec<TypeKey> = self.positions.list()?.into_iter().map(|(k, _)| k).collect();
        let key = self.resolve_or_literal(query, &saved)?;
        let removed = self.positions.remove(&key)?;
        tracing::info!(%key, removed, "reset pile position");
        Ok((key, removed))
    }

    /// Saved positions, sorted by key.
    pub fn list_positions(&self) -> Result<Vec<(TypeKey, Vec3)>, EngineError> {
        Ok(self.positions.list()?)
    }

    // =========================================================================
    // Bindings
    // =========================================================================

    /// Bind a shortcut id or alias to the type `query` resolves to.
    pub fn bind(&self, name: &str, query: &str) -> Result<(BindingName, TypeKey), EngineError> {
        let name = BindingName::parse(name)?;
        let key = self.resolve_or_literal(query, &self.query_keys())?;
        query::bind(self.bindings.as_ref(), &name, &key)?;
        tracing::info!(%name, %key, "binding saved");
        Ok((name, key))
    }

    /// Remove a shortcut or alias. Returns whether it was bound.
    pub fn unbind(&self, name: &str) -> Result<(BindingName, bool), EngineError> {
        let name = BindingName::parse(name)?;
        let removed = query::unbind(self.bindings.as_ref(), &name)?;
        Ok((name, removed))
    }

    pub fn list_bindings(&self) -> Result<BindingList, EngineError> {
        Ok(BindingList {
            shortcuts: self.bindings.shortcuts()?,
            aliases: self.bindings.aliases()?,
        })
    }

    // =========================================================================
    // Skip tokens
    // =========================================================================

    /// Normalized skip tokens in configured order.
    pub fn list_skip_tokens(&self) -> Vec<String> {
        self.config().skip_tokens()
    }

    /// Add a skip token. Returns `false` if it was already present.
    ///
    /// # Errors
    ///
    /// `InvalidToken` for blank input. `Config` if saving fails; the token
    /// stays active in memory.
    pub fn add_skip_token(&self, raw: &str) -> Result<bool, EngineError> {
        let token = Self::skip_token(raw)?;
        self.update_skip_tokens(|tokens| {
            if tokens.contains(&token) {
                return false;
            }
            tokens.push(token);
            true
        })
    }

    /// Remove a skip token. Returns `false` if it was not present.
    pub fn remove_skip_token(&self, raw: &str) -> Result<bool, EngineError> {
        let token = Self::skip_token(raw)?;
        self.update_skip_tokens(|tokens| {
            let before = tokens.len();
            tokens.retain(|t| *t != token);
            tokens.len() != before
        })
    }

    fn skip_token(raw: &str) -> Result<String, EngineError> {
        let token = naming::normalize(raw);
        if token.is_empty() {
            return Err(EngineError::InvalidToken(raw.to_string()));
        }
        Ok(token)
    }

    fn update_skip_tokens(&self, f: impl FnOnce(&mut Vec<String>) -> bool) -> Result<bool, EngineError> {
        let mut config = self.config();
        let mut tokens = config.skip_tokens();
        if !f(&mut tokens) {
            return Ok(false);
        }
        config.set_skip_tokens(&tokens);
        let path = config.save()?;
        tracing::info!(path = %path.display(), ?tokens, "skip list saved");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ops::{CancelReason, Interaction};
    use crate::core::types::{ItemId, ItemState};
    use crate::store::{MemoryBindingStore, MemoryPositionStore};
    use crate::world::{MockWorld, Scene, WorldOp};

    fn item(id: u64, name: &str, x: f32) -> ItemState {
        ItemState {
            id: ItemId(id),
            name: name.to_string(),
            position: Vec3::new(x, 0.0, 3.0),
            ..ItemState::default()
        }
    }

    fn engine_with(world: &MockWorld, positions: MemoryPositionStore) -> Engine {
        Engine::new(
            Arc::new(world.clone()),
            Arc::new(positions),
            Arc::new(MemoryBindingStore::new()),
            Config::default(),
        )
    }

    fn scene(items: Vec<ItemState>) -> MockWorld {
        MockWorld::with_scene(Scene {
            items,
            ..Scene::default()
        })
    }

    #[tokio::test]
    async fn full_sort_releases_lock_and_restores_weight() {
        let world = scene(vec![item(1, "shovel", 4.0)]);
        let engine = engine_with(&world, MemoryPositionStore::new());

        let report = engine.run_full_sort(FullSortOptions::default()).await.unwrap();
        assert_eq!(report.moved, 1);
        assert_eq!(engine.state(), OperationState::Completed(OperationKind::FullSort));
        assert!(engine.interaction_gate().permits(Interaction::Grab));
        assert!(world.operations().contains(&WorldOp::SetCarryWeight(1.0)));
    }

    #[tokio::test]
    async fn gate_failure_marks_failed_to_start() {
        let world = scene(vec![item(1, "shovel", 4.0)]);
        world.set_ship_stationary(false);
        let engine = engine_with(&world, MemoryPositionStore::new());

        let err = engine.run_full_sort(FullSortOptions::default()).await.unwrap_err();
        assert!(matches!(err, EngineError::Gate(_)));
        assert_eq!(engine.state(), OperationState::FailedToStart(OperationKind::FullSort));
        assert_eq!(world.placement_count(), 0);
    }

    #[tokio::test]
    async fn override_pile_uses_saved_position() {
        let world = scene(vec![item(1, "shovel", 4.0)]);
        let saved = Vec3::new(2.0, 0.0, -1.0);
        let positions =
            MemoryPositionStore::with_positions([(TypeKey::new("shovel").unwrap(), saved)]);
        let engine = engine_with(&world, positions);

        engine.run_full_sort(FullSortOptions::default()).await.unwrap();
        let placed = world.item(ItemId(1)).unwrap().position;
        assert!((placed - saved).length() < 1e-5);
    }

    #[tokio::test]
    async fn reserved_overrides_include_skipped_types_with_positions() {
        let world = scene(vec![item(1, "clipboard", 4.0), item(2, "boombox", 5.0)]);
        let positions = MemoryPositionStore::with_positions([(
            TypeKey::new("clipboard").unwrap(),
            Vec3::new(0.0, 0.0, 0.0),
        )]);
        let engine = engine_with(&world, positions);

        let report = engine
            .run_full_sort(FullSortOptions {
                include_reserved_overrides: true,
                ..FullSortOptions::default()
            })
            .await
            .unwrap();
        assert_eq!(report.moved, 1);
        assert_eq!(report.piles, 1);
    }

    #[tokio::test]
    async fn targeted_move_drops_held_item_under_bypass() {
        let world = scene(vec![item(1, "airhorn", 4.0), item(2, "airhorn", 6.0)]);
        world.give_actor(ItemId(1));
        let engine = engine_with(&world, MemoryPositionStore::new());

        let report = engine
            .run_targeted_move(
                "",
                MoveOptions {
                    drop_held_first: true,
                    ..MoveOptions::default()
                },
            )
            .await
            .unwrap();
        assert!(world.operations().contains(&WorldOp::DropHeld { item: ItemId(1) }));
        assert_eq!(report.moved + report.skipped_in_place, 2);
        assert_eq!(engine.interaction_gate().bypass_count(), 0);
    }

    #[tokio::test]
    async fn targeted_move_unknown_query_is_rejected() {
        let world = scene(vec![item(1, "shovel", 4.0)]);
        let engine = engine_with(&world, MemoryPositionStore::new());

        let err = engine
            .run_targeted_move("zzz", MoveOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::Query(ref q) if q.is_no_match()));
        assert_eq!(world.placement_count(), 0);
    }

    #[test]
    fn set_position_falls_back_to_literal_key() {
        let world = scene(vec![]);
        let engine = engine_with(&world, MemoryPositionStore::new());

        let (key, position) = engine.set_override_position("Gold Bar").unwrap();
        assert_eq!(key.as_str(), "gold_bar");
        assert_eq!(position.y, 0.0);
        assert_eq!(engine.list_positions().unwrap().len(), 1);

        let (_, removed) = engine.remove_override_position("gold").unwrap();
        assert!(removed);
    }

    #[test]
    fn cancel_without_operation_is_noop() {
        let world = scene(vec![]);
        let engine = engine_with(&world, MemoryPositionStore::new());
        assert!(!engine.request_cancel());
        assert_eq!(engine.state(), OperationState::Idle);
    }

    #[test]
    fn blank_skip_token_is_rejected() {
        let world = scene(vec![]);
        let engine = engine_with(&world, MemoryPositionStore::new());
        assert!(matches!(
            engine.add_skip_token("  "),
            Err(EngineError::InvalidToken(_))
        ));
    }

    #[test]
    fn skip_tokens_persist_to_loaded_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let world = scene(vec![]);
        let engine = Engine::new(
            Arc::new(world),
            Arc::new(MemoryPositionStore::new()),
            Arc::new(MemoryBindingStore::new()),
            Config::load_from(&path).unwrap(),
        );

        assert!(engine.add_skip_token("Red Key").unwrap());
        assert!(!engine.add_skip_token("red-key").unwrap());
        assert!(engine.list_skip_tokens().contains(&"red_key".to_string()));

        let reloaded = Config::load_from(&path).unwrap();
        assert!(reloaded.skip_tokens().contains(&"red_key".to_string()));

        assert!(engine.remove_skip_token("red key").unwrap());
        assert!(!engine.remove_skip_token("red key").unwrap());
    }

    #[test]
    fn failed_skip_save_keeps_tokens_in_memory() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not_a_dir");
        std::fs::write(&blocker, "").unwrap();
        let path = blocker.join("config.toml");
        let engine = Engine::new(
            Arc::new(scene(vec![])),
            Arc::new(MemoryPositionStore::new()),
            Arc::new(MemoryBindingStore::new()),
            Config::load_from(&path).unwrap(),
        );

        let err = engine.add_skip_token("shovel").unwrap_err();
        assert!(matches!(err, EngineError::Config(_)), "{:?}", err);
        assert!(engine.list_skip_tokens().contains(&"shovel".to_string()));
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn unreadable_positions_fall_back_to_grid() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("positions.json");
        std::fs::write(&path, "{not json").unwrap();

        let world = scene(vec![item(1, "shovel", 4.0)]);
        let engine = Engine::new(
            Arc::new(world.clone()),
            Arc::new(crate::store::JsonPositionStore::new(&path)),
            Arc::new(MemoryBindingStore::new()),
            Config::default(),
        );

        let report = engine.run_full_sort(FullSortOptions::default()).await.unwrap();
        assert_eq!(report.outcome, Outcome::Completed);
        assert_eq!(report.moved, 1);

        // grid slot 0 with the default grid: x = -3 * 1.0 from origin -2.8
        let placed = world.item(ItemId(1)).unwrap().position;
        assert!((placed.x - (-5.8)).abs() < 1e-4, "{:?}", placed);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{not json");
    }

    #[tokio::test]
    async fn departing_mid_sort_cancels() {
        let world = scene(vec![item(1, "shovel", 4.0), item(2, "shovel", 5.0)]);
        let hook_world = world.clone();
        world.on_placement(move |_| hook_world.set_ship_stationary(false));
        let engine = engine_with(&world, MemoryPositionStore::new());

        let report = engine.run_full_sort(FullSortOptions::default()).await.unwrap();
        assert_eq!(report.outcome, Outcome::Cancelled(CancelReason::ShipDeparting));
        assert_eq!(report.moved, 1);
        assert!(!engine.interaction_gate().is_locked());
        assert!(world.notices().iter().any(|n| n.is_warning()));
    }
}
