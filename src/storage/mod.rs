// TorrTide - GPL-3.0-or-later
// This file is part of TorrTide.
//
// Copyright (C) 2026 TorrTide contributors
//
// TorrTide is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// TorrTide is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with TorrTide.  If not, see <https://www.gnu.org/licenses/>.

//! Key-value persistence for per-table layout state.
//!
//! Keys are deterministic strings of the shape
//! `"{type_name}.{kind}.{table_id}"` (e.g. `torrent.column_widths.main`).
//! Failures are tolerated by design: a missing or unreadable entry makes
//! the caller fall back to computed defaults instead of blocking the
//! table.

use serde_json::Value;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Mutex;

/// Simple key-value store over JSON values.
pub trait KvStore {
    fn get(&self, key: &str) -> Option<Value>;
    fn set(&self, key: &str, value: Value);
    fn remove(&self, key: &str);
}

/// Typed read with default-on-failure semantics.
pub fn get_as<T: serde::de::DeserializeOwned>(store: &dyn KvStore, key: &str) -> Option<T> {
    let value = store.get(key)?;
    match serde_json::from_value(value) {
        Ok(v) => Some(v),
        Err(e) => {
            log::warn!("discarding unreadable stored value for '{key}': {e}");
            None
        }
    }
}

/// Typed write; serialization failure is logged and dropped.
pub fn set_from<T: serde::Serialize>(store: &dyn KvStore, key: &str, value: &T) {
    match serde_json::to_value(value) {
        Ok(v) => store.set(key, v),
        Err(e) => log::warn!("failed to serialize value for '{key}': {e}"),
    }
}

/// In-memory store for tests and for running without a config dir.
#[derive(Default)]
pub struct MemoryStore {
    cells: Mutex<BTreeMap<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.cells.lock().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: Value) {
        if let Ok(mut cells) = self.cells.lock() {
            cells.insert(key.to_string(), value);
        }
    }

    fn remove(&self, key: &str) {
        if let Ok(mut cells) = self.cells.lock() {
            cells.remove(key);
        }
    }
}

/// File-backed store: one JSON document, loaded once, rewritten on every
/// mutation. Last write wins; all IO errors degrade to defaults.
pub struct JsonFileStore {
    path: PathBuf,
    cells: Mutex<BTreeMap<String, Value>>,
}

impl JsonFileStore {
    /// Store under the user config directory (`<config>/torrtide/layout.json`).
    pub fn default_location() -> Option<Self> {
        let dir = dirs::config_dir()?.join("torrtide");
        Some(Self::at(dir.join("layout.json")))
    }

    pub fn at(path: PathBuf) -> Self {
        let cells = Self::load(&path);
        JsonFileStore {
            path,
            cells: Mutex::new(cells),
        }
    }

    fn load(path: &PathBuf) -> BTreeMap<String, Value> {
        let Ok(contents) = std::fs::read_to_string(path) else {
            log::info!("no layout store at {path:?}, starting with defaults");
            return BTreeMap::new();
        };
        match serde_json::from_str(&contents) {
            Ok(map) => map,
            Err(e) => {
                log::warn!("layout store at {path:?} unreadable ({e}), discarding");
                BTreeMap::new()
            }
        }
    }

    fn flush(&self, cells: &BTreeMap<String, Value>) {
        if let Some(parent) = self.path.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                log::warn!("cannot create layout store directory: {e}");
                return;
            }
        }
        match serde_json::to_string_pretty(cells) {
            Ok(json) => {
                if let Err(e) = std::fs::write(&self.path, json) {
                    log::warn!("failed to write layout store: {e}");
                }
            }
            Err(e) => log::warn!("failed to serialize layout store: {e}"),
        }
    }
}

impl KvStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.cells.lock().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: Value) {
        if let Ok(mut cells) = self.cells.lock() {
            cells.insert(key.to_string(), value);
            self.flush(&cells);
        }
    }

    fn remove(&self, key: &str) {
        if let Ok(mut cells) = self.cells.lock() {
            if cells.remove(key).is_some() {
                self.flush(&cells);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_memory_store_round_trip() {
        let store = MemoryStore::new();
        assert!(store.get("k").is_none());

        store.set("k", json!({"a": 1}));
        assert_eq!(store.get("k"), Some(json!({"a": 1})));

        store.remove("k");
        assert!(store.get("k").is_none());
    }

    #[test]
    fn test_typed_helpers_tolerate_mismatch() {
        let store = MemoryStore::new();
        store.set("nums", json!([1, 2, 3]));
        assert_eq!(get_as::<Vec<u32>>(&store, "nums"), Some(vec![1, 2, 3]));
        // wrong shape degrades to None, never panics
        assert_eq!(get_as::<String>(&store, "nums"), None);
        assert_eq!(get_as::<String>(&store, "missing"), None);
    }

    #[test]
    fn test_file_store_survives_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("layout.json");

        {
            let store = JsonFileStore::at(path.clone());
            store.set("torrent.sort.main", json!({"column": "name"}));
        }

        let store = JsonFileStore::at(path);
        assert_eq!(
            store.get("torrent.sort.main"),
            Some(json!({"column": "name"}))
        );
    }

    #[test]
    fn test_file_store_tolerates_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("layout.json");
        std::fs::write(&path, "not json at all").unwrap();

        let store = JsonFileStore::at(path);
        assert!(store.get("anything").is_none());
    }
}
