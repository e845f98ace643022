//! core::ops::state
//!
//! Operation state machine.
//!
//! # States
//!
//! ```text
//! Idle ──try_begin──▶ Running ──finish──▶ Completed
//!   │                    │
//!   │                    └──cancel / drop──▶ Cancelled
//!   └──fail_to_start──▶ FailedToStart
//! ```
//!
//! At most one operation runs per process. [`OperationTracker::try_begin`]
//! is synchronous: callers must invoke it before their first `.await`, so
//! two commands issued in the same frame cannot both pass the check.
//!
//! The returned [`OperationTicket`] is an RAII guard. If the owning future
//! is dropped mid-flight, the ticket's `Drop` records the operation as
//! cancelled so the tracker never stays stuck in `Running`.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use thiserror::Error;

/// The two long-running operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    /// Sort every eligible item.
    FullSort,
    /// Move one item type.
    TargetedMove,
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperationKind::FullSort => write!(f, "full sort"),
            OperationKind::TargetedMove => write!(f, "targeted move"),
        }
    }
}

/// Why an operation stopped early.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelReason {
    /// A cancel was requested by command.
    Requested,
    /// The actor left the session.
    ActorExtracted,
    /// The actor died.
    ActorDead,
    /// The ship started leaving.
    ShipDeparting,
    /// The operation was dropped without finishing.
    Abandoned,
}

impl fmt::Display for CancelReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            CancelReason::Requested => "cancel requested",
            CancelReason::ActorExtracted => "actor left the session",
            CancelReason::ActorDead => "actor died",
            CancelReason::ShipDeparting => "ship is departing",
            CancelReason::Abandoned => "operation abandoned",
        };
        f.write_str(text)
    }
}

/// Observable state of the tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationState {
    Idle,
    Running(OperationKind),
    Completed(OperationKind),
    Cancelled(OperationKind, CancelReason),
    FailedToStart(OperationKind),
}

impl OperationState {
    /// Whether an operation currently holds the tracker.
    pub fn is_running(&self) -> bool {
        matches!(self, OperationState::Running(_))
    }
}

/// Errors from starting an operation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StateError {
    #[error("a {0} is already in progress")]
    AlreadyRunning(OperationKind),
}

/// Tracks the single in-flight operation and its cancel flag.
#[derive(Debug)]
pub struct OperationTracker {
    state: Mutex<OperationState>,
    cancel: AtomicBool,
}

impl Default for OperationTracker {
    fn default() -> Self {
        Self {
            state: Mutex::new(OperationState::Idle),
            cancel: AtomicBool::new(false),
        }
    }
}

impl OperationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, OperationState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Current state.
    pub fn state(&self) -> OperationState {
        *self.lock()
    }

    /// Whether an operation is running.
    pub fn is_running(&self) -> bool {
        self.lock().is_running()
    }

    /// Claim the tracker for `kind`.
    ///
    /// Clears any stale cancel request. The check and the transition to
    /// `Running` happen under one lock acquisition.
    ///
    /// # Errors
    ///
    /// Returns `StateError::AlreadyRunning` naming the operation in flight.
    pub fn try_begin(&self, kind: OperationKind) -> Result<OperationTicket<'_>, StateError> {
        let mut state = self.lock();
        if let OperationState::Running(current) = *state {
            return Err(StateError::AlreadyRunning(current));
        }
        *state = OperationState::Running(kind);
        self.cancel.store(false, Ordering::SeqCst);
        tracing::debug!(%kind, "operation started");
        Ok(OperationTicket {
            tracker: self,
            kind,
            settled: false,
        })
    }

    /// Record that `kind` never got going.
    ///
    /// Ignored while another operation is running.
    pub fn fail_to_start(&self, kind: OperationKind) {
        let mut state = self.lock();
        if !state.is_running() {
            *state = OperationState::FailedToStart(kind);
        }
    }

    /// Ask the running operation to stop at its next check.
    ///
    /// Returns `false` if nothing is running.
    pub fn request_cancel(&self) -> bool {
        if !self.is_running() {
            return false;
        }
        self.cancel.store(true, Ordering::SeqCst);
        true
    }

    /// Whether a cancel has been requested since the operation began.
    pub fn cancel_requested(&self) -> bool {
        self.cancel.load(Ordering::SeqCst)
    }

    fn settle(&self, next: OperationState) {
        *self.lock() = next;
        self.cancel.store(false, Ordering::SeqCst);
    }
}

/// Proof that the caller owns the running operation.
#[derive(Debug)]
#[must_use = "dropping the ticket cancels the operation"]
pub struct OperationTicket<'a> {
    tracker: &'a OperationTracker,
    kind: OperationKind,
    settled: bool,
}

impl OperationTicket<'_> {
    /// The operation this ticket was issued for.
    pub fn kind(&self) -> OperationKind {
        self.kind
    }

    /// Whether a cancel has been requested.
    pub fn cancel_requested(&self) -> bool {
        self.tracker.cancel_requested()
    }

    /// Move to `Completed`.
    pub fn complete(mut self) {
        self.settled = true;
        self.tracker.settle(OperationState::Completed(self.kind));
        tracing::debug!(kind = %self.kind, "operation completed");
    }

    /// Move to `Cancelled`.
    pub fn cancel(mut self, reason: CancelReason) {
        self.settled = true;
        self.tracker
            .settle(OperationState::Cancelled(self.kind, reason));
        tracing::debug!(kind = %self.kind, %reason, "operation cancelled");
    }
}

impl Drop for OperationTicket<'_> {
    fn drop(&mut self) {
        if !self.settled {
            self.tracker
                .settle(OperationState::Cancelled(self.kind, CancelReason::Abandoned));
        }
    }
}
