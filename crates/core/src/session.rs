//! Client-side session persistence.
//!
//! [`KeyValueStore`] is the persistence port: the CLI backs it with a
//! JSON file ([`FileStore`]) so state survives between invocations, and
//! tests use [`MemoryStore`]. [`Session`] layers the typed, well-known
//! keys on top.
//!
//! Persisted values are a fallback only. An identifier passed
//! explicitly always wins over what the store remembers.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::StoreError;
use crate::roles::Role;
use crate::trip::TripSummary;
use crate::vehicle::Vehicle;

pub const LAST_CONFIRMATION_ID_KEY: &str = "last_confirmation_id";
pub const SELECTED_VEHICLE_KEY: &str = "selected_vehicle";
pub const TRIP_SEND_DEFAULTS_KEY: &str = "trip_send_defaults";
pub const ROLE_KEY: &str = "role";

/// String key-value persistence.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

// ---------------------------------------------------------------------------
// In-memory store
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let entries = self.entries.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().map_err(|_| StoreError::Poisoned)?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().map_err(|_| StoreError::Poisoned)?;
        entries.remove(key);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// File-backed store
// ---------------------------------------------------------------------------

/// A flat JSON object on disk. Every write rewrites the whole file via a
/// sibling temp file and a rename.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, StoreError> {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) if raw.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn write_all(&self, entries: &BTreeMap<String, String>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, serde_json::to_vec_pretty(entries)?)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn update(
        &self,
        apply: impl FnOnce(&mut BTreeMap<String, String>),
    ) -> Result<(), StoreError> {
        let _guard = self.lock.lock().map_err(|_| StoreError::Poisoned)?;
        let mut entries = self.read_all()?;
        apply(&mut entries);
        self.write_all(&entries)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let _guard = self.lock.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(self.read_all()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.update(|entries| {
            entries.insert(key.to_string(), value.to_string());
        })
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.update(|entries| {
            entries.remove(key);
        })
    }
}

// ---------------------------------------------------------------------------
// Typed session
// ---------------------------------------------------------------------------

/// Typed access to the well-known session keys.
#[derive(Clone)]
pub struct Session {
    store: Arc<dyn KeyValueStore>,
}

impl Session {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// A session over a fresh [`MemoryStore`].
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    pub fn last_confirmation_id(&self) -> Result<Option<String>, StoreError> {
        Ok(self
            .store
            .get(LAST_CONFIRMATION_ID_KEY)?
            .filter(|id| !id.trim().is_empty()))
    }

    pub fn set_last_confirmation_id(&self, id: &str) -> Result<(), StoreError> {
        self.store.set(LAST_CONFIRMATION_ID_KEY, id)
    }

    /// Pick the confirmation to watch: the explicit id if given and
    /// non-blank, else the remembered one.
    ///
    /// A failing store is logged and treated as "nothing remembered".
    pub fn resolve_confirmation_id(&self, explicit: Option<&str>) -> Option<String> {
        if let Some(id) = explicit.map(str::trim).filter(|id| !id.is_empty()) {
            return Some(id.to_string());
        }
        match self.last_confirmation_id() {
            Ok(id) => id,
            Err(e) => {
                tracing::warn!(error = %e, "Could not read remembered confirmation id");
                None
            }
        }
    }

    pub fn selected_vehicle(&self) -> Result<Option<Vehicle>, StoreError> {
        self.load_json(SELECTED_VEHICLE_KEY)
    }

    pub fn set_selected_vehicle(&self, vehicle: &Vehicle) -> Result<(), StoreError> {
        self.save_json(SELECTED_VEHICLE_KEY, vehicle)
    }

    pub fn trip_summary(&self) -> Result<Option<TripSummary>, StoreError> {
        self.load_json(TRIP_SEND_DEFAULTS_KEY)
    }

    pub fn set_trip_summary(&self, summary: &TripSummary) -> Result<(), StoreError> {
        self.save_json(TRIP_SEND_DEFAULTS_KEY, summary)
    }

    /// Last role the auth service reported. Unknown names read as `None`.
    pub fn role(&self) -> Result<Option<Role>, StoreError> {
        Ok(self
            .store
            .get(ROLE_KEY)?
            .and_then(|name| Role::from_name(&name).ok()))
    }

    pub fn set_role(&self, role: Role) -> Result<(), StoreError> {
        self.store.set(ROLE_KEY, role.name())
    }

    fn load_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        match self.store.get(key)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    fn save_json<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        self.store.set(key, &serde_json::to_string(value)?)
    }
}
