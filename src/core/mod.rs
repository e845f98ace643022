//! core
//!
//! Core domain types, naming, configuration, and operation state for shipsort.
//!
//! # Modules
//!
//! - [`types`] - Strong types: TypeKey, ItemId, ItemState
//! - [`naming`] - Name canonicalization
//! - [`aliases`] - Static alternate-label tables
//! - [`config`] - Configuration schema and loading
//! - [`ops`] - Operation state and the interaction lock
//!
//! # Design Principles
//!
//! - Strong typing prevents invalid states at compile time
//! - Schemas are strict and self-describing
//! - Nothing here touches the host world

pub mod aliases;
pub mod config;
pub mod naming;
pub mod ops;
pub mod types;
