//! ui
//!
//! User-facing output.
//!
//! # Modules
//!
//! - [`notice`] - Notices shown to the player through the world
//! - [`output`] - Terminal output for the sandbox binary
//!
//! # Design
//!
//! Notices are data; the host decides how to show them. Terminal output is
//! only used by the sandbox driver.

pub mod notice;
pub mod output;
