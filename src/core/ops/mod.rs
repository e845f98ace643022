//! core::ops
//!
//! Operation bookkeeping and the interaction lock.
//!
//! # Modules
//!
//! - [`state`] - Single-operation state machine with an RAII ticket
//! - [`gate`] - Interaction lock with nested bypass permits
//!
//! # Architecture
//!
//! Every sort or move:
//! 1. Claims the tracker synchronously, before yielding
//! 2. Locks manual interaction and snapshots actor state
//! 3. Runs its placements, checking for cancellation between items
//! 4. Settles the ticket and releases the lock, restoring actor state
//!
//! Steps 2 and 4 are paired through a guard, so an abandoned operation
//! still releases the lock.

pub mod gate;
pub mod state;

pub use gate::{ActorSnapshot, BypassGuard, Interaction, InteractionGate};
pub use state::{
    CancelReason, OperationKind, OperationState, OperationTicket, OperationTracker, StateError,
};
