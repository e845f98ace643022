//! core::ops::gate
//!
//! Process-wide interaction lock.
//!
//! # Architecture
//!
//! While a sort or move runs, the local actor must not grab or drop items
//! by hand: the host would see weight and held-state changes the sorter
//! does not expect. The external interaction layer asks
//! [`InteractionGate::permits`] before letting a grab or drop through.
//!
//! Engine-internal interactions (dropping the held item before a move)
//! take a [`BypassGuard`], which exempts them for as long as it lives.
//!
//! # Invariants
//!
//! - `begin_lock` is idempotent and snapshots actor state only once
//! - `end_lock` clears the lock, zeroes the bypass count and hands back the
//!   snapshot for restoration
//! - The bypass count never goes below zero, even when a guard outlives
//!   the lock it was taken under
//!
//! # Example
//!
//! ```
//! use shipsort::core::ops::gate::{ActorSnapshot, Interaction, InteractionGate};
//!
//! let gate = InteractionGate::new();
//! gate.begin_lock(ActorSnapshot { carry_weight: 1.2 });
//! assert!(!gate.permits(Interaction::Grab));
//!
//! {
//!     let _bypass = gate.scoped_bypass();
//!     assert!(gate.permits(Interaction::Drop));
//! }
//! assert!(!gate.permits(Interaction::Drop));
//!
//! let restored = gate.end_lock();
//! assert_eq!(restored, Some(ActorSnapshot { carry_weight: 1.2 }));
//! assert!(gate.permits(Interaction::Grab));
//! ```

use std::sync::{Mutex, MutexGuard, PoisonError};

/// Manual interactions the gate can veto.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interaction {
    /// Picking an item up.
    Grab,
    /// Putting the held item down.
    Drop,
}

/// Actor state captured when the lock is taken.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActorSnapshot {
    /// Carry weight as the host tracks it.
    pub carry_weight: f32,
}

#[derive(Debug, Default)]
struct GateState {
    locked: bool,
    bypass: u32,
    snapshot: Option<ActorSnapshot>,
}

/// The interaction lock plus its nested bypass counter.
#[derive(Debug, Default)]
pub struct InteractionGate {
    state: Mutex<GateState>,
}

impl InteractionGate {
    /// Create an unlocked gate.
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, GateState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Lock manual interactions, remembering `snapshot` for later.
    ///
    /// Returns `false` (and keeps the first snapshot) if already locked.
    pub fn begin_lock(&self, snapshot: ActorSnapshot) -> bool {
        let mut state = self.state();
        if state.locked {
            return false;
        }
        state.locked = true;
        state.snapshot = Some(snapshot);
        true
    }

    /// Unlock, reset the bypass count and return the saved snapshot.
    pub fn end_lock(&self) -> Option<ActorSnapshot> {
        let mut state = self.state();
        state.locked = false;
        state.bypass = 0;
        state.snapshot.take()
    }

    /// Whether the lock is active.
    pub fn is_locked(&self) -> bool {
        self.state().locked
    }

    /// Number of live bypass permits.
    pub fn bypass_count(&self) -> u32 {
        self.state().bypass
    }

    /// Whether a manual interaction may proceed right now.
    ///
    /// Denied only while locked with no bypass permit outstanding.
    pub fn permits(&self, interaction: Interaction) -> bool {
        let state = self.state();
        let allowed = !state.locked || state.bypass > 0;
        if !allowed {
            tracing::debug!(?interaction, "manual interaction blocked by sort lock");
        }
        allowed
    }

    /// Take a bypass permit, released when the guard drops.
    pub fn scoped_bypass(&self) -> BypassGuard<'_> {
        self.state().bypass += 1;
        BypassGuard { gate: self }
    }
}

/// Exempts engine-driven interactions from the lock while alive.
#[derive(Debug)]
#[must_use = "the bypass ends as soon as the guard is dropped"]
pub struct BypassGuard<'a> {
    gate: &'a InteractionGate,
}

impl Drop for BypassGuard<'_> {
    fn drop(&mut self) {
        let mut state = self.gate.state();
        state.bypass = state.bypass.saturating_sub(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snap(w: f32) -> ActorSnapshot {
        ActorSnapshot { carry_weight: w }
    }

    #[test]
    fn unlocked_gate_permits_everything() {
        let gate = InteractionGate::new();
        assert!(!gate.is_locked());
        assert!(gate.permits(Interaction::Grab));
        assert!(gate.permits(Interaction::Drop));
    }

    #[test]
    fn lock_blocks_grab_and_drop() {
        let gate = InteractionGate::new();
        assert!(gate.begin_lock(snap(1.0)));
        assert!(!gate.permits(Interaction::Grab));
        assert!(!gate.permits(Interaction::Drop));
    }

    #[test]
    fn begin_lock_is_idempotent() {
        let gate = InteractionGate::new();
        assert!(gate.begin_lock(snap(1.0)));
        assert!(!gate.begin_lock(snap(9.0)));
        assert_eq!(gate.end_lock(), Some(snap(1.0)));
    }

    #[test]
    fn nested_bypass_counts() {
        let gate = InteractionGate::new();
        gate.begin_lock(snap(1.0));

        let outer = gate.scoped_bypass();
        let inner = gate.scoped_bypass();
        assert_eq!(gate.bypass_count(), 2);
        drop(inner);
        assert!(gate.permits(Interaction::Grab));
        drop(outer);
        assert_eq!(gate.bypass_count(), 0);
        assert!(!gate.permits(Interaction::Grab));
    }

    #[test]
    fn end_lock_resets_bypass_and_guard_does_not_underflow() {
        let gate = InteractionGate::new();
        gate.begin_lock(snap(1.0));
        let guard = gate.scoped_bypass();

        gate.end_lock();
        assert_eq!(gate.bypass_count(), 0);

        drop(guard);
        assert_eq!(gate.bypass_count(), 0);
    }

    #[test]
    fn end_lock_without_lock_returns_nothing() {
        let gate = InteractionGate::new();
        assert_eq!(gate.end_lock(), None);
    }
}
