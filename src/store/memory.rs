//! store::memory
//!
//! In-memory stores for tests and the sandbox.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::traits::{
    alias_name, finite_position, shortcut_id, BindingStore, PositionStore, StoreError,
};
use crate::core::types::{TypeKey, Vec3};

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Position store backed by a map.
#[derive(Debug, Default)]
pub struct MemoryPositionStore {
    positions: Mutex<BTreeMap<TypeKey, Vec3>>,
}

impl MemoryPositionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate from pairs.
    pub fn with_positions(positions: impl IntoIterator<Item = (TypeKey, Vec3)>) -> Self {
        Self {
            positions: Mutex::new(positions.into_iter().collect()),
        }
    }
}

impl PositionStore for MemoryPositionStore {
    fn get(&self, key: &TypeKey) -> Result<Option<Vec3>, StoreError> {
        Ok(lock(&self.positions).get(key).copied())
    }

    fn set(&self, key: &TypeKey, position: Vec3) -> Result<(), StoreError> {
        let position = finite_position(key, position)?;
        lock(&self.positions).insert(key.clone(), position);
        Ok(())
    }

    fn remove(&self, key: &TypeKey) -> Result<bool, StoreError> {
        Ok(lock(&self.positions).remove(key).is_some())
    }

    fn list(&self) -> Result<Vec<(TypeKey, Vec3)>, StoreError> {
        Ok(lock(&self.positions)
            .iter()
            .map(|(k, v)| (k.clone(), *v))
            .collect())
    }
}

#[derive(Debug, Default)]
struct Bindings {
    shortcuts: BTreeMap<u32, TypeKey>,
    aliases: BTreeMap<String, TypeKey>,
}

/// Binding store backed by two maps.
#[derive(Debug, Default)]
pub struct MemoryBindingStore {
    inner: Mutex<Bindings>,
}

impl MemoryBindingStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BindingStore for MemoryBindingStore {
    fn shortcut(&self, id: u32) -> Result<Option<TypeKey>, StoreError> {
        Ok(lock(&self.inner).shortcuts.get(&id).cloned())
    }

    fn set_shortcut(&self, id: u32, key: &TypeKey) -> Result<(), StoreError> {
        let id = shortcut_id(id)?;
        lock(&self.inner).shortcuts.insert(id, key.clone());
        Ok(())
    }

    fn remove_shortcut(&self, id: u32) -> Result<bool, StoreError> {
        Ok(lock(&self.inner).shortcuts.remove(&id).is_some())
    }

    fn shortcuts(&self) -> Result<Vec<(u32, TypeKey)>, StoreError> {
        Ok(lock(&self.inner)
            .shortcuts
            .iter()
            .map(|(id, k)| (*id, k.clone()))
            .collect())
    }

    fn alias(&self, name: &str) -> Result<Option<TypeKey>, StoreError> {
        let name = alias_name(name)?;
        Ok(lock(&self.inner).aliases.get(&name).cloned())
    }

    fn set_alias(&self, name: &str, key: &TypeKey) -> Result<(), StoreError> {
        let name = alias_name(name)?;
        lock(&self.inner).aliases.insert(name, key.clone());
        Ok(())
    }

    fn remove_alias(&self, name: &str) -> Result<bool, StoreError> {
        let name = alias_name(name)?;
        Ok(lock(&self.inner).aliases.remove(&name).is_some())
    }

    fn aliases(&self) -> Result<Vec<(String, TypeKey)>, StoreError> {
        Ok(lock(&self.inner)
            .aliases
            .iter()
            .map(|(n, k)| (n.clone(), k.clone()))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(s: &str) -> TypeKey {
        TypeKey::new(s).unwrap()
    }

    #[test]
    fn positions_roundtrip_and_sorted() {
        let store = MemoryPositionStore::new();
        store.set(&key("shovel"), Vec3::new(1.0, 0.0, 0.0)).unwrap();
        store.set(&key("airhorn"), Vec3::new(2.0, 0.0, 0.0)).unwrap();

        let listed: Vec<_> = store.list().unwrap().into_iter().map(|(k, _)| k).collect();
        assert_eq!(listed, vec![key("airhorn"), key("shovel")]);

        assert!(store.remove(&key("shovel")).unwrap());
        assert!(!store.remove(&key("shovel")).unwrap());
        assert_eq!(store.get(&key("shovel")).unwrap(), None);
    }

    #[test]
    fn aliases_are_normalized_on_access() {
        let store = MemoryBindingStore::new();
        store.set_alias("Dig Thing", &key("shovel")).unwrap();
        assert_eq!(store.alias("dig-thing").unwrap(), Some(key("shovel")));
        assert!(store.remove_alias(" DIG THING ").unwrap());
        assert_eq!(store.alias("dig_thing").unwrap(), None);
    }

    #[test]
    fn shortcut_zero_is_rejected() {
        let store = MemoryBindingStore::new();
        assert!(store.set_shortcut(0, &key("key")).is_err());
        store.set_shortcut(3, &key("key")).unwrap();
        store.set_shortcut(1, &key("shovel")).unwrap();
        let ids: Vec<u32> = store.shortcuts().unwrap().into_iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec![1, 3]);
    }
}
