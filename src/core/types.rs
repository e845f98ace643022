//! core::types
//!
//! Strong types for core domain concepts.
//!
//! # Types
//!
//! - [`TypeKey`] - Normalized canonical identifier for an item archetype
//! - [`ItemId`] - Opaque handle of an item owned by the external world
//! - [`ItemState`] - Read-only snapshot of an item's world-owned flags
//! - [`FloorRotation`] - Optional resting yaw passed to replication calls
//!
//! # Invariants
//!
//! A `TypeKey` always holds the output of [`crate::core::naming::normalize`],
//! so two keys compare equal exactly when their archetypes are the same.
//!
//! # Examples
//!
//! ```
//! use shipsort::core::types::TypeKey;
//!
//! let key = TypeKey::new("Stun Grenade").unwrap();
//! assert_eq!(key.as_str(), "stun_grenade");
//!
//! // Localized names fold to the same key
//! assert_eq!(TypeKey::new("기절 수류탄").unwrap(), key);
//!
//! // Blank input has no archetype
//! assert!(TypeKey::new("   ").is_err());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::naming;

pub use glam::Vec3;

/// Key of the reserved "body" archetype, which is never moved.
pub const BODY_KEY: &str = "body";

/// Errors from type validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid item key: {0:?} normalizes to an empty key")]
    EmptyKey(String),
}

/// A normalized item type key.
///
/// # Example
///
/// ```
/// use shipsort::core::types::TypeKey;
///
/// let key = TypeKey::new("  Walkie-Talkie ").unwrap();
/// assert_eq!(key.as_str(), "walkie_talkie");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TypeKey(String);

impl TypeKey {
    /// Normalize `raw` into a key, rejecting input with no archetype.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::EmptyKey` if the normalized form is empty.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, TypeError> {
        let raw = raw.as_ref();
        let key = Self::from_raw(raw);
        if key.is_empty() {
            return Err(TypeError::EmptyKey(raw.to_string()));
        }
        Ok(key)
    }

    /// Normalize `raw` without validation. The result may be empty.
    pub fn from_raw(raw: &str) -> Self {
        Self(naming::normalize(raw))
    }

    /// Get the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this key carries no archetype.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether this is the reserved body archetype.
    pub fn is_body(&self) -> bool {
        self.0 == BODY_KEY
    }
}

impl TryFrom<String> for TypeKey {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TypeKey> for String {
    fn from(key: TypeKey) -> Self {
        key.0
    }
}

impl AsRef<str> for TypeKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TypeKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque handle of an item owned by the external world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub u64);

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Resting yaw for a placed item. `None` lets the host pick.
pub type FloorRotation = Option<i32>;

/// Snapshot of one item as reported by the world.
///
/// Every flag is owned by the external world; the sorter only reads them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemState {
    pub id: ItemId,
    /// Raw display name (possibly localized).
    pub name: String,
    pub scrap_value: i32,
    /// Per-archetype lift that rests the model visually on the ground.
    pub vertical_offset: f32,
    /// Bulky archetypes that need both hands; laid out first.
    pub two_handed: bool,
    pub grabbable: bool,
    pub held: bool,
    pub pocketed: bool,
    pub deactivated: bool,
    pub in_ship_room: bool,
    /// World-space position.
    pub position: Vec3,
}

impl Default for ItemState {
    fn default() -> Self {
        Self {
            id: ItemId(0),
            name: String::new(),
            scrap_value: 0,
            vertical_offset: 0.0,
            two_handed: false,
            grabbable: true,
            held: false,
            pocketed: false,
            deactivated: false,
            in_ship_room: true,
            position: Vec3::ZERO,
        }
    }
}

impl ItemState {
    /// Canonical type key derived from the display name.
    pub fn key(&self) -> TypeKey {
        TypeKey::from_raw(&self.name)
    }

    /// Baseline eligibility, applied under every skip policy.
    ///
    /// Grabbable, active, loose (neither held nor pocketed), inside the ship
    /// volume and not the reserved body archetype.
    pub fn is_eligible(&self) -> bool {
        self.grabbable
            && !self.deactivated
            && !self.held
            && !self.pocketed
            && self.in_ship_room
            && !self.key().is_body()
    }
}
