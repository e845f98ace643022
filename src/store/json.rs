//! store::json
//!
//! JSON-file stores.
//!
//! # File Formats
//!
//! Positions:
//!
//! ```json
//! { "positions": [ { "item": "shovel", "x": 1.0, "y": 0.2, "z": -3.0 } ] }
//! ```
//!
//! Bindings:
//!
//! ```json
//! { "shortcuts": [ { "id": 1, "item": "shovel" } ], "aliases": { "dig": "shovel" } }
//! ```
//!
//! # Durability
//!
//! - Every mutation is a read-modify-write under an exclusive `fs2` lock
//!   on a sidecar `<file>.lock`
//! - Writes go to a temp file which is synced and renamed into place
//! - The previous contents are copied to `<file>.bak` first
//! - A malformed file fails the operation and is left untouched
//!
//! Entries whose item name normalizes to nothing are dropped on read with
//! a warning; everything else is normalized the same way live keys are.

use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use fs2::FileExt;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::traits::{
    alias_name, finite_position, shortcut_id, BindingStore, PositionStore, StoreError,
};
use crate::core::types::{TypeKey, Vec3};

/// A JSON document on disk with locked read-modify-write.
#[derive(Debug, Clone)]
struct JsonFile {
    path: PathBuf,
}

/// Exclusive lock on a store's sidecar file, released on drop.
struct StoreLock {
    file: File,
}

impl Drop for StoreLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
    }
}

impl JsonFile {
    fn sidecar(&self, extension: &str) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".");
        name.push(extension);
        self.path.with_file_name(name)
    }

    fn ensure_parent(&self) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| StoreError::Write {
                path: self.path.clone(),
                source: e,
            })?;
        }
        Ok(())
    }

    fn lock(&self) -> Result<StoreLock, StoreError> {
        self.ensure_parent()?;
        let lock_path = self.sidecar("lock");
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)
            .map_err(|e| StoreError::Lock {
                path: lock_path.clone(),
                source: e,
            })?;
        file.lock_exclusive().map_err(|e| StoreError::Lock {
            path: lock_path,
            source: e,
        })?;
        Ok(StoreLock { file })
    }

    fn read<T: DeserializeOwned + Default>(&self) -> Result<T, StoreError> {
        if !self.path.exists() {
            return Ok(T::default());
        }
        let contents = fs::read_to_string(&self.path).map_err(|e| StoreError::Read {
            path: self.path.clone(),
            source: e,
        })?;
        if contents.trim().is_empty() {
            return Ok(T::default());
        }
        serde_json::from_str(&contents).map_err(|e| StoreError::Parse {
            path: self.path.clone(),
            message: e.to_string(),
        })
    }

    fn write<T: Serialize>(&self, doc: &T) -> Result<(), StoreError> {
        self.ensure_parent()?;
        let write_err = |path: &Path, e: std::io::Error| StoreError::Write {
            path: path.to_path_buf(),
            source: e,
        };

        let contents = serde_json::to_string_pretty(doc).map_err(|e| StoreError::Serialize {
            path: self.path.clone(),
            message: e.to_string(),
        })?;

        let temp_path = self.sidecar("tmp");
        {
            let mut file = File::create(&temp_path).map_err(|e| write_err(&temp_path, e))?;
            file.write_all(contents.as_bytes())
                .map_err(|e| write_err(&temp_path, e))?;
            file.sync_all().map_err(|e| write_err(&temp_path, e))?;
        }

        if self.path.exists() {
            let backup = self.sidecar("bak");
            fs::copy(&self.path, &backup).map_err(|e| write_err(&backup, e))?;
        }

        fs::rename(&temp_path, &self.path).map_err(|e| write_err(&self.path, e))?;
        tracing::debug!(path = %self.path.display(), "store written");
        Ok(())
    }

    /// Apply `f` to the current document and persist it if `f` says so.
    fn update<T, R>(&self, f: impl FnOnce(&mut T) -> (R, bool)) -> Result<R, StoreError>
    where
        T: Serialize + DeserializeOwned + Default,
    {
        let _lock = self.lock()?;
        let mut doc: T = self.read()?;
        let (result, changed) = f(&mut doc);
        if changed {
            self.write(&doc)?;
        }
        Ok(result)
    }
}

// ===== Positions

#[derive(Debug, Default, Serialize, Deserialize)]
struct PositionsDoc {
    #[serde(default)]
    positions: Vec<PositionEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
struct PositionEntry {
    item: String,
    x: f32,
    y: f32,
    z: f32,
}

impl PositionsDoc {
    /// Normalized view; later entries win over earlier duplicates.
    fn to_map(&self) -> BTreeMap<TypeKey, Vec3> {
        let mut map = BTreeMap::new();
        for entry in &self.positions {
            match TypeKey::new(&entry.item) {
                Ok(key) => {
                    map.insert(key, Vec3::new(entry.x, entry.y, entry.z));
                }
                Err(_) => tracing::warn!(item = %entry.item, "ignoring blank position entry"),
            }
        }
        map
    }

    fn from_map(map: &BTreeMap<TypeKey, Vec3>) -> Self {
        Self {
            positions: map
                .iter()
                .map(|(key, pos)| PositionEntry {
                    item: key.to_string(),
                    x: pos.x,
                    y: pos.y,
                    z: pos.z,
                })
                .collect(),
        }
    }
}

/// Saved positions in a JSON file.
#[derive(Debug, Clone)]
pub struct JsonPositionStore {
    file: JsonFile,
}

impl JsonPositionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            file: JsonFile { path: path.into() },
        }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.file.path
    }

    fn modify<R>(
        &self,
        f: impl FnOnce(&mut BTreeMap<TypeKey, Vec3>) -> (R, bool),
    ) -> Result<R, StoreError> {
        self.file.update(|doc: &mut PositionsDoc| {
            let mut map = doc.to_map();
            let (result, changed) = f(&mut map);
            if changed {
                *doc = PositionsDoc::from_map(&map);
            }
            (result, changed)
        })
    }
}

impl PositionStore for JsonPositionStore {
    fn get(&self, key: &TypeKey) -> Result<Option<Vec3>, StoreError> {
        let doc: PositionsDoc = self.file.read()?;
        Ok(doc.to_map().get(key).copied())
    }

    fn set(&self, key: &TypeKey, position: Vec3) -> Result<(), StoreError> {
        let position = finite_position(key, position)?;
        self.modify(|map| {
            map.insert(key.clone(), position);
            ((), true)
        })
    }

    fn remove(&self, key: &TypeKey) -> Result<bool, StoreError> {
        self.modify(|map| {
            let removed = map.remove(key).is_some();
            (removed, removed)
        })
    }

    fn list(&self) -> Result<Vec<(TypeKey, Vec3)>, StoreError> {
        let doc: PositionsDoc = self.file.read()?;
        Ok(doc.to_map().into_iter().collect())
    }
}

// ===== Bindings

#[derive(Debug, Default, Serialize, Deserialize)]
struct BindingsDoc {
    #[serde(default)]
    shortcuts: Vec<ShortcutEntry>,
    #[serde(default)]
    aliases: BTreeMap<String, String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ShortcutEntry {
    id: u32,
    item: String,
}

#[derive(Debug, Default)]
struct Bindings {
    shortcuts: BTreeMap<u32, TypeKey>,
    aliases: BTreeMap<String, TypeKey>,
}

impl BindingsDoc {
    fn to_bindings(&self) -> Bindings {
        let mut out = Bindings::default();
        for entry in &self.shortcuts {
            match (shortcut_id(entry.id), TypeKey::new(&entry.item)) {
                (Ok(id), Ok(key)) => {
                    out.shortcuts.insert(id, key);
                }
                _ => tracing::warn!(id = entry.id, item = %entry.item, "ignoring invalid shortcut"),
            }
        }
        for (name, item) in &self.aliases {
            match (alias_name(name), TypeKey::new(item)) {
                (Ok(name), Ok(key)) => {
                    out.aliases.insert(name, key);
                }
                _ => tracing::warn!(alias = %name, item = %item, "ignoring invalid alias"),
            }
        }
        out
    }

    fn from_bindings(bindings: &Bindings) -> Self {
        Self {
            shortcuts: bindings
                .shortcuts
                .iter()
                .map(|(id, key)| ShortcutEntry {
                    id: *id,
                    item: key.to_string(),
                })
                .collect(),
            aliases: bindings
                .aliases
                .iter()
                .map(|(name, key)| (name.clone(), key.to_string()))
                .collect(),
        }
    }
}

/// Shortcuts and aliases in a JSON file.
#[derive(Debug, Clone)]
pub struct JsonBindingStore {
    file: JsonFile,
}

impl JsonBindingStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            file: JsonFile { path: path.into() },
        }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.file.path
    }

    fn load(&self) -> Result<Bindings, StoreError> {
        let doc: BindingsDoc = self.file.read()?;
        Ok(doc.to_bindings())
    }

    fn modify<R>(&self, f: impl FnOnce(&mut Bindings) -> (R, bool)) -> Result<R, StoreError> {
        self.file.update(|doc: &mut BindingsDoc| {
            let mut bindings = doc.to_bindings();
            let (result, changed) = f(&mut bindings);
            if changed {
                *doc = BindingsDoc::from_bindings(&bindings);
            }
            (result, changed)
        })
    }
}

impl BindingStore for JsonBindingStore {
    fn shortcut(&self, id: u32) -> Result<Option<TypeKey>, StoreError> {
        Ok(self.load()?.shortcuts.get(&id).cloned())
    }

    fn set_shortcut(&self, id: u32, key: &TypeKey) -> Result<(), StoreError> {
        let id = shortcut_id(id)?;
        self.modify(|b| {
            b.shortcuts.insert(id, key.clone());
            ((), true)
        })
    }

    fn remove_shortcut(&self, id: u32) -> Result<bool, StoreError> {
        self.modify(|b| {
            let removed = b.shortcuts.remove(&id).is_some();
            (removed, removed)
        })
    }

    fn shortcuts(&self) -> Result<Vec<(u32, TypeKey)>, StoreError> {
        Ok(self.load()?.shortcuts.into_iter().collect())
    }

    fn alias(&self, name: &str) -> Result<Option<TypeKey>, StoreError> {
        let name = alias_name(name)?;
        Ok(self.load()?.aliases.get(&name).cloned())
    }

    fn set_alias(&self, name: &str, key: &TypeKey) -> Result<(), StoreError> {
        let name = alias_name(name)?;
        self.modify(|b| {
            b.aliases.insert(name, key.clone());
            ((), true)
        })
    }

    fn remove_alias(&self, name: &str) -> Result<bool, StoreError> {
        let name = alias_name(name)?;
        self.modify(|b| {
            let removed = b.aliases.remove(&name).is_some();
            (removed, removed)
        })
    }

    fn aliases(&self) -> Result<Vec<(String, TypeKey)>, StoreError> {
        Ok(self.load()?.aliases.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn key(s: &str) -> TypeKey {
        TypeKey::new(s).unwrap()
    }

    #[test]
    fn missing_file_reads_empty() {
        let temp = TempDir::new().unwrap();
        let store = JsonPositionStore::new(temp.path().join("positions.json"));
        assert!(store.list().unwrap().is_empty());
        assert!(!store.path().exists());
    }

    #[test]
    fn position_file_format() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("positions.json");
        let store = JsonPositionStore::new(&path);
        store.set(&key("Shovel"), Vec3::new(1.0, 0.5, -2.0)).unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["positions"][0]["item"], "shovel");
        assert_eq!(raw["positions"][0]["z"], -2.0);
    }

    #[test]
    fn second_write_keeps_backup() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("positions.json");
        let store = JsonPositionStore::new(&path);
        store.set(&key("shovel"), Vec3::ONE).unwrap();
        store.set(&key("airhorn"), Vec3::ZERO).unwrap();

        let backup = temp.path().join("positions.json.bak");
        assert!(backup.exists());
        let old: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(backup).unwrap()).unwrap();
        assert_eq!(old["positions"].as_array().unwrap().len(), 1);
        assert!(!temp.path().join("positions.json.tmp").exists());
    }

    #[test]
    fn malformed_file_is_not_overwritten() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("positions.json");
        fs::write(&path, "{ not json").unwrap();

        let store = JsonPositionStore::new(&path);
        assert!(matches!(store.list(), Err(StoreError::Parse { .. })));
        assert!(store.set(&key("shovel"), Vec3::ONE).is_err());
        assert_eq!(fs::read_to_string(&path).unwrap(), "{ not json");
    }

    #[test]
    fn non_finite_position_is_rejected_before_writing() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("positions.json");
        let store = JsonPositionStore::new(&path);

        let err = store
            .set(&key("shovel"), Vec3::new(f32::NAN, 0.0, 0.0))
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidPosition { .. }), "{}", err);
        assert!(!path.exists());

        store.set(&key("airhorn"), Vec3::ONE).unwrap();
        let before = fs::read_to_string(&path).unwrap();
        assert!(store.set(&key("airhorn"), Vec3::splat(f32::INFINITY)).is_err());
        assert_eq!(fs::read_to_string(&path).unwrap(), before);
        assert_eq!(store.get(&key("airhorn")).unwrap(), Some(Vec3::ONE));
    }

    #[test]
    fn serialize_failure_is_not_reported_as_parse() {
        let err = StoreError::Serialize {
            path: PathBuf::from("positions.json"),
            message: "key must be a string".into(),
        };
        assert!(err.to_string().starts_with("failed to serialize store"));
        assert!(!matches!(err, StoreError::Parse { .. }));
    }

    #[test]
    fn legacy_entries_are_normalized() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("bindings.json");
        fs::write(
            &path,
            r#"{"shortcuts":[{"id":2,"item":"Stop Sign"},{"id":0,"item":"key"}],
                "aliases":{"Mug Thing":"Coffee Mug","blank":"  "}}"#,
        )
        .unwrap();

        let store = JsonBindingStore::new(&path);
        assert_eq!(store.shortcut(2).unwrap(), Some(key("stop_sign")));
        assert_eq!(store.shortcuts().unwrap().len(), 1);
        assert_eq!(store.alias("mug thing").unwrap(), Some(key("coffee_mug")));
        assert_eq!(store.aliases().unwrap().len(), 1);
    }

    #[test]
    fn unchanged_remove_does_not_write() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("bindings.json");
        let store = JsonBindingStore::new(&path);
        assert!(!store.remove_shortcut(4).unwrap());
        assert!(!path.exists());
    }
}
