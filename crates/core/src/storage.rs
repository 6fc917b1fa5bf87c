use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

/// Fixed storage keys, one serializable record each.
pub mod keys {
    pub const CHAT_HISTORY: &str = "chatty_history";
    pub const ORDERS: &str = "chatty_orders";
    pub const ANALYTICS: &str = "chatty_analytics";
}

/// Most recent messages kept in the history record.
pub const HISTORY_CAP: usize = 50;
/// Most recent saved orders kept.
pub const ORDERS_CAP: usize = 20;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("could not access store file `{path}`: {source}")]
    Io { path: PathBuf, source: std::io::Error },
    #[error("could not encode record `{key}`: {source}")]
    Encode { key: String, source: serde_json::Error },
    #[error("could not decode record `{key}`: {source}")]
    Decode { key: String, source: serde_json::Error },
}

/// String key-value store with local-storage semantics: one writer, fixed
/// keys, values are serialized records.
pub trait LocalStore: Send + Sync {
    fn get_raw(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set_raw(&self, key: &str, value: String) -> Result<(), StoreError>;
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

pub fn load<T: DeserializeOwned>(
    store: &dyn LocalStore,
    key: &str,
) -> Result<Option<T>, StoreError> {
    let Some(raw) = store.get_raw(key)? else {
        return Ok(None);
    };
    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|source| StoreError::Decode { key: key.to_string(), source })
}

pub fn save<T: Serialize>(
    store: &dyn LocalStore,
    key: &str,
    value: &T,
) -> Result<(), StoreError> {
    let raw = serde_json::to_string(value)
        .map_err(|source| StoreError::Encode { key: key.to_string(), source })?;
    store.set_raw(key, raw)
}

/// Appends to a list record, dropping the oldest entries past `cap`.
pub fn push_capped<T: Serialize + DeserializeOwned>(
    store: &dyn LocalStore,
    key: &str,
    item: T,
    cap: usize,
) -> Result<(), StoreError> {
    let mut items: Vec<T> = load(store, key)?.unwrap_or_default();
    items.push(item);
    if items.len() > cap {
        items.drain(..items.len() - cap);
    }
    save(store, key, &items)
}

#[derive(Clone, Default)]
pub struct InMemoryStore {
    values: Arc<Mutex<BTreeMap<String, String>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_values<T>(&self, f: impl FnOnce(&mut BTreeMap<String, String>) -> T) -> T {
        match self.values.lock() {
            Ok(mut values) => f(&mut values),
            Err(poisoned) => f(&mut poisoned.into_inner()),
        }
    }
}

impl LocalStore for InMemoryStore {
    fn get_raw(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.with_values(|values| values.get(key).cloned()))
    }

    fn set_raw(&self, key: &str, value: String) -> Result<(), StoreError> {
        self.with_values(|values| values.insert(key.to_string(), value));
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.with_values(|values| values.remove(key));
        Ok(())
    }
}

/// Whole store persisted as one JSON object per file. Every mutation
/// rewrites the file; fine for the bounded record sizes this carries.
#[derive(Clone, Debug)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, StoreError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
                return Ok(BTreeMap::new())
            }
            Err(source) => return Err(StoreError::Io { path: self.path.clone(), source }),
        };
        serde_json::from_str(&raw).map_err(|source| StoreError::Decode {
            key: self.path.display().to_string(),
            source,
        })
    }

    fn write_all(&self, values: &BTreeMap<String, String>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|source| StoreError::Io { path: parent.to_path_buf(), source })?;
            }
        }
        let raw = serde_json::to_string_pretty(values).map_err(|source| StoreError::Encode {
            key: self.path.display().to_string(),
            source,
        })?;
        std::fs::write(&self.path, raw)
            .map_err(|source| StoreError::Io { path: self.path.clone(), source })
    }
}

impl LocalStore for JsonFileStore {
    fn get_raw(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.read_all()?.get(key).cloned())
    }

    fn set_raw(&self, key: &str, value: String) -> Result<(), StoreError> {
        let mut values = self.read_all()?;
        values.insert(key.to_string(), value);
        self.write_all(&values)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut values = self.read_all()?;
        if values.remove(key).is_some() {
            self.write_all(&values)?;
        }
        Ok(())
    }
}
