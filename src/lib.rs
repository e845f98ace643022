//! shipsort - Deterministic pile and grid sorter for items inside a ship
//!
//! shipsort tidies a ship's cargo floor: it groups loose items by type,
//! gives every type a stable slot in a bounded grid (or a saved position),
//! and moves the items there one at a time through the host's replication
//! calls, yielding between moves so the host keeps running.
//!
//! # Architecture
//!
//! The codebase follows a layered architecture:
//!
//! - [`cli`] - Chat command layer (parses `/sort ...`, delegates to engine)
//! - [`engine`] - Orchestrates Probe -> Gate -> Scan -> Plan -> Run
//! - [`core`] - Domain types, naming, configuration and operation state
//! - [`store`] - Saved positions and bindings
//! - [`world`] - The host interface and a deterministic mock
//! - [`ui`] - Notices and terminal output
//!
//! # Correctness Invariants
//!
//! shipsort maintains the following invariants:
//!
//! 1. At most one sort or move runs at a time
//! 2. Precondition failures never move anything
//! 3. Manual grabs and drops are blocked exactly while an operation runs
//! 4. One bad item never aborts an operation
//! 5. Every wait on the host is bounded

pub mod cli;
pub mod core;
pub mod engine;
pub mod store;
pub mod ui;
pub mod world;
