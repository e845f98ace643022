//! store
//!
//! Persistent per-type positions and query bindings.
//!
//! # Modules
//!
//! - [`traits`] - `PositionStore`, `BindingStore` and `StoreError`
//! - [`json`] - JSON-file implementations with locked atomic writes
//! - [`memory`] - In-memory implementations
//!
//! The engine only sees the traits. Which implementation backs them is
//! decided by whoever builds the [`crate::engine::Engine`].

pub mod json;
pub mod memory;
pub mod traits;

pub use json::{JsonBindingStore, JsonPositionStore};
pub use memory::{MemoryBindingStore, MemoryPositionStore};
pub use traits::{BindingStore, PositionStore, StoreError};
