//! engine::runner
//!
//! The per-item placement loop shared by every operation.
//!
//! # Architecture
//!
//! ```text
//! for each pile:
//!     resolve ground (one probe), yield
//!     for each item:
//!         break check -> skip if in place -> wait manipulable -> place -> yield -> wait
//! ```
//!
//! # Invariants
//!
//! - The break check runs before every item, never mid-placement
//! - A failed or timed-out item is counted and skipped, never fatal
//! - Every wait is bounded by the configured frame ceiling
//! - The loop yields after each ground probe and each placement attempt

use crate::core::ops::{CancelReason, OperationKind, OperationTicket};
use crate::core::types::{ItemState, TypeKey, Vec3};
use crate::world::{ShipHandle, World};

use super::motion::{self, Placement};
use super::plan::{Pile, PilePolicy, Slot};
use super::wait::{wait_until, FrameClock, WaitStatus};

/// Where a pile's center comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum PileAnchor {
    /// A grid slot relative to the configured origin.
    Grid { origin: Vec3, slot: Slot },
    /// A saved override position, used as-is.
    Override(Vec3),
    /// An arbitrary ship-local point, probed once.
    Point(Vec3),
}

impl PileAnchor {
    /// Resolve the pile, probing the ground where the anchor calls for it.
    pub fn resolve(&self, world: &dyn World, ship: ShipHandle) -> Pile {
        match self {
            PileAnchor::Grid { origin, slot } => Pile::from_slot(world, ship, *origin, slot),
            PileAnchor::Override(position) => Pile::from_override(*position),
            PileAnchor::Point(point) => Pile::at_point(world, ship, *point),
        }
    }

    /// Whether resolving this anchor issues a ground probe.
    pub fn probes(&self) -> bool {
        !matches!(self, PileAnchor::Override(_))
    }
}

/// One type's items and where they go.
#[derive(Debug, Clone)]
pub struct PileJob {
    pub key: TypeKey,
    pub anchor: PileAnchor,
    /// Items in placement order; the index selects the in-pile offset.
    pub items: Vec<ItemState>,
}

/// Loop settings.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSettings {
    /// Move items even when already within tolerance.
    pub force: bool,
    /// World distance under which an item counts as placed.
    pub tolerance: f32,
    /// Manipulability wait ceiling, in frames.
    pub wait_frames: u32,
    pub pile_policy: PilePolicy,
}

/// How an operation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Completed,
    Cancelled(CancelReason),
}

/// Counts from one operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortReport {
    pub operation: OperationKind,
    /// Types visited.
    pub piles: usize,
    /// Items moved by either placement call.
    pub moved: usize,
    /// Of `moved`, items that needed the throw fallback.
    pub thrown: usize,
    /// Items already within tolerance.
    pub skipped_in_place: usize,
    /// Items whose placement calls were both rejected.
    pub failed: usize,
    /// Items that vanished, changed state or never became manipulable.
    pub unavailable: usize,
    pub outcome: Outcome,
}

impl SortReport {
    pub fn new(operation: OperationKind) -> Self {
        Self {
            operation,
            piles: 0,
            moved: 0,
            thrown: 0,
            skipped_in_place: 0,
            failed: 0,
            unavailable: 0,
            outcome: Outcome::Completed,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self.outcome, Outcome::Cancelled(_))
    }

    /// One-line summary for notices.
    pub fn summary(&self) -> String {
        let mut parts = vec![format!("{} moved", self.moved)];
        if self.skipped_in_place > 0 {
            parts.push(format!("{} already in place", self.skipped_in_place));
        }
        if self.failed > 0 {
            parts.push(format!("{} failed", self.failed));
        }
        if self.unavailable > 0 {
            parts.push(format!("{} unavailable", self.unavailable));
        }
        parts.join(", ")
    }
}

/// First reason the running operation must stop, if any.
pub fn break_reason(world: &dyn World, ticket: &OperationTicket<'_>) -> Option<CancelReason> {
    if ticket.cancel_requested() {
        return Some(CancelReason::Requested);
    }
    match world.actor() {
        None => return Some(CancelReason::ActorDead),
        Some(actor) if actor.being_extracted => return Some(CancelReason::ActorExtracted),
        Some(actor) if actor.dead => return Some(CancelReason::ActorDead),
        Some(_) => {}
    }
    if !world.is_ship_stationary() {
        return Some(CancelReason::ShipDeparting);
    }
    None
}

/// Place every item of every job, checking for a break before each item.
pub async fn run_jobs(
    world: &dyn World,
    clock: &dyn FrameClock,
    ticket: &OperationTicket<'_>,
    ship: ShipHandle,
    jobs: &[PileJob],
    settings: &RunSettings,
) -> SortReport {
    let mut report = SortReport::new(ticket.kind());

    for job in jobs {
        if let Some(reason) = break_reason(world, ticket) {
            report.outcome = Outcome::Cancelled(reason);
            return report;
        }

        let pile = job.anchor.resolve(world, ship);
        report.piles += 1;
        tracing::debug!(key = %job.key, items = job.items.len(), ?pile, "pile resolved");
        if job.anchor.probes() {
            clock.next_frame().await;
        }

        for (index, item) in job.items.iter().enumerate() {
            if let Some(reason) = break_reason(world, ticket) {
                report.outcome = Outcome::Cancelled(reason);
                return report;
            }
            place_one(world, clock, ship, &pile, index, item, settings, &mut report).await;
        }
    }

    report
}

#[allow(clippy::too_many_arguments)]
async fn place_one(
    world: &dyn World,
    clock: &dyn FrameClock,
    ship: ShipHandle,
    pile: &Pile,
    index: usize,
    item: &ItemState,
    settings: &RunSettings,
    report: &mut SortReport,
) {
    let id = item.id;
    let Some(current) = world.item(id) else {
        tracing::debug!(%id, "item vanished before placement");
        report.unavailable += 1;
        return;
    };

    let target = pile.target(current.vertical_offset, settings.pile_policy.offset(index));
    let target_world = world.ship_local_to_world(ship, target);
    if !settings.force && target_world.distance(current.position) < settings.tolerance {
        report.skipped_in_place += 1;
        return;
    }

    let ready = wait_until(clock, settings.wait_frames, || {
        world.is_actor_able_to_manipulate(id)
    })
    .await;
    if ready == WaitStatus::TimedOut {
        tracing::warn!(%id, name = %current.name, "item never became manipulable, skipping");
        report.unavailable += 1;
        return;
    }

    // state may have changed while waiting
    match world.item(id) {
        Some(state) if state.is_eligible() => {}
        _ => {
            tracing::debug!(%id, "item no longer eligible after wait");
            report.unavailable += 1;
            return;
        }
    }

    match motion::place(world, id, target, None) {
        Ok(placement) => {
            report.moved += 1;
            if placement == Placement::Thrown {
                report.thrown += 1;
            }
        }
        Err(e) => {
            tracing::warn!(%id, name = %current.name, error = %e, "failed to move item");
            report.failed += 1;
        }
    }
    clock.next_frame().await;

    // throttle: let replication settle before the next item
    let settled = wait_until(clock, settings.wait_frames, || {
        world.is_actor_able_to_manipulate(id)
    })
    .await;
    if settled == WaitStatus::TimedOut {
        tracing::debug!(%id, "item still busy after placement");
    }
}
