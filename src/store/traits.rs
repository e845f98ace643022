//! store::traits
//!
//! Store trait definitions.
//!
//! # Design
//!
//! Both stores are small key-value maps keyed by [`TypeKey`], so keys are
//! normalized by construction. Alias names are free text and are run
//! through [`naming::normalize`] on every access.
//!
//! Implementations must be thread-safe (Send + Sync). Listings are sorted
//! so output is stable across runs.
//!
//! # Example
//!
//! ```
//! use shipsort::core::types::{TypeKey, Vec3};
//! use shipsort::store::{MemoryPositionStore, PositionStore, StoreError};
//!
//! fn pin_shovel(store: &dyn PositionStore) -> Result<(), StoreError> {
//!     let key = TypeKey::new("Shovel").unwrap();
//!     store.set(&key, Vec3::new(1.0, 0.2, -3.0))?;
//!     assert!(store.get(&key)?.is_some());
//!     Ok(())
//! }
//!
//! pin_shovel(&MemoryPositionStore::new()).unwrap();
//! ```

use std::path::PathBuf;

use thiserror::Error;

use crate::core::naming;
use crate::core::types::{TypeKey, Vec3};

/// Errors from store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read store '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("malformed store '{path}': {message}")]
    Parse { path: PathBuf, message: String },

    #[error("failed to serialize store '{path}': {message}")]
    Serialize { path: PathBuf, message: String },

    #[error("failed to write store '{path}': {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to lock store '{path}': {source}")]
    Lock {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid alias name: {0:?}")]
    InvalidAlias(String),

    #[error("shortcut ids start at 1, got {0}")]
    InvalidShortcut(u32),

    #[error("position for '{key}' is not finite: {position}")]
    InvalidPosition { key: TypeKey, position: Vec3 },
}

/// Saved per-type ship-local positions.
pub trait PositionStore: Send + Sync {
    /// Saved position for `key`, if any.
    fn get(&self, key: &TypeKey) -> Result<Option<Vec3>, StoreError>;

    /// Save (or replace) the position for `key`.
    fn set(&self, key: &TypeKey, position: Vec3) -> Result<(), StoreError>;

    /// Forget `key`. Returns whether anything was removed.
    fn remove(&self, key: &TypeKey) -> Result<bool, StoreError>;

    /// All saved positions, sorted by key.
    fn list(&self) -> Result<Vec<(TypeKey, Vec3)>, StoreError>;
}

/// Numeric shortcuts and text aliases that resolve to a type key.
pub trait BindingStore: Send + Sync {
    /// Key bound to shortcut `id`.
    fn shortcut(&self, id: u32) -> Result<Option<TypeKey>, StoreError>;

    /// Bind shortcut `id` (>= 1) to `key`.
    fn set_shortcut(&self, id: u32, key: &TypeKey) -> Result<(), StoreError>;

    /// Unbind shortcut `id`. Returns whether it was bound.
    fn remove_shortcut(&self, id: u32) -> Result<bool, StoreError>;

    /// All shortcuts, sorted by id.
    fn shortcuts(&self) -> Result<Vec<(u32, TypeKey)>, StoreError>;

    /// Key bound to alias `name`.
    fn alias(&self, name: &str) -> Result<Option<TypeKey>, StoreError>;

    /// Bind alias `name` to `key`.
    fn set_alias(&self, name: &str, key: &TypeKey) -> Result<(), StoreError>;

    /// Unbind alias `name`. Returns whether it was bound.
    fn remove_alias(&self, name: &str) -> Result<bool, StoreError>;

    /// All aliases, sorted by name.
    fn aliases(&self) -> Result<Vec<(String, TypeKey)>, StoreError>;
}

/// Normalize an alias name, rejecting names with no content.
pub fn alias_name(raw: &str) -> Result<String, StoreError> {
    let name = naming::normalize(raw);
    if name.is_empty() {
        return Err(StoreError::InvalidAlias(raw.to_string()));
    }
    Ok(name)
}

/// Reject the reserved shortcut id 0.
pub fn shortcut_id(id: u32) -> Result<u32, StoreError> {
    if id == 0 {
        return Err(StoreError::InvalidShortcut(id));
    }
    Ok(id)
}

/// Reject positions that cannot be written back as JSON numbers.
pub fn finite_position(key: &TypeKey, position: Vec3) -> Result<Vec3, StoreError> {
    if position.is_finite() {
        Ok(position)
    } else {
        Err(StoreError::InvalidPosition {
            key: key.clone(),
            position,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alias_names_normalize() {
        assert_eq!(alias_name(" Big-Thing ").unwrap(), "big_thing");
        assert!(matches!(alias_name("  "), Err(StoreError::InvalidAlias(_))));
    }

    #[test]
    fn shortcut_zero_rejected() {
        assert!(shortcut_id(1).is_ok());
        assert!(matches!(shortcut_id(0), Err(StoreError::InvalidShortcut(0))));
    }

    #[test]
    fn error_display_names_path() {
        let err = StoreError::Parse {
            path: PathBuf::from("/tmp/positions.json"),
            message: "expected value".into(),
        };
        assert!(err.to_string().contains("/tmp/positions.json"));
    }

    #[test]
    fn non_finite_positions_rejected() {
        let key = TypeKey::new("shovel").unwrap();
        assert!(finite_position(&key, Vec3::ONE).is_ok());
        assert!(matches!(
            finite_position(&key, Vec3::new(0.0, f32::INFINITY, 0.0)),
            Err(StoreError::InvalidPosition { .. })
        ));
    }
}
