//! Client-local license persistence.
//!
//! A small key/value interface mirroring browser `localStorage`: the
//! activation handler only ever writes one key, holding the most recently
//! issued token verbatim. Writes are last-writer-wins.

use crate::error::{LicenseError, LicenseResult};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use tracing::debug;

/// File name used by [`FileLicenseStorage`].
const STORAGE_FILE: &str = "license.json";

/// Application directory under the platform data dir.
const APP_DIR: &str = "LinkTopics";

/// Key/value storage for license state.
pub trait LicenseStorage: Send + Sync {
    /// Gets a value by key.
    fn get(&self, key: &str) -> Option<String>;

    /// Sets a value by key.
    fn set(&self, key: &str, value: &str) -> LicenseResult<()>;

    /// Removes a value by key.
    fn remove(&self, key: &str) -> LicenseResult<()>;
}

/// In-memory storage, lost when dropped.
#[derive(Debug, Default)]
pub struct MemoryLicenseStorage {
    values: RwLock<HashMap<String, String>>,
}

impl MemoryLicenseStorage {
    /// Creates empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates storage pre-populated with one entry.
    #[must_use]
    pub fn with_entry(key: &str, value: &str) -> Self {
        let storage = Self::default();
        if let Ok(mut values) = storage.values.write() {
            values.insert(key.to_string(), value.to_string());
        }
        storage
    }
}

impl LicenseStorage for MemoryLicenseStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.values.read().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> LicenseResult<()> {
        self.values
            .write()
            .map_err(|_| LicenseError::Storage("lock poisoned".to_string()))?
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> LicenseResult<()> {
        self.values
            .write()
            .map_err(|_| LicenseError::Storage("lock poisoned".to_string()))?
            .remove(key);
        Ok(())
    }
}

/// JSON-file storage (`license.json`) with an in-memory cache.
pub struct FileLicenseStorage {
    path: PathBuf,
    cache: RwLock<HashMap<String, String>>,
}

impl FileLicenseStorage {
    /// Opens storage in `dir`, creating the directory if needed.
    ///
    /// A corrupt file is treated as empty and overwritten on the next write.
    pub fn open(dir: &Path) -> LicenseResult<Self> {
        std::fs::create_dir_all(dir)
            .map_err(|e| LicenseError::Storage(format!("cannot create {}: {e}", dir.display())))?;

        let path = dir.join(STORAGE_FILE);
        let cache = if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .map_err(|e| LicenseError::Storage(format!("cannot read {}: {e}", path.display())))?;
            serde_json::from_str(&contents).unwrap_or_default()
        } else {
            HashMap::new()
        };

        debug!("Opened license storage at {}", path.display());
        Ok(Self {
            path,
            cache: RwLock::new(cache),
        })
    }

    /// Opens storage in the platform data directory
    /// (e.g. `~/.local/share/LinkTopics` on Linux).
    pub fn open_default() -> LicenseResult<Self> {
        let dir = dirs::data_dir()
            .ok_or_else(|| LicenseError::Storage("no data directory on this platform".to_string()))?
            .join(APP_DIR);
        Self::open(&dir)
    }

    /// Returns the backing file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self, values: &HashMap<String, String>) -> LicenseResult<()> {
        let contents = serde_json::to_string_pretty(values)?;
        std::fs::write(&self.path, contents)
            .map_err(|e| LicenseError::Storage(format!("cannot write {}: {e}", self.path.display())))
    }
}

impl LicenseStorage for FileLicenseStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.cache.read().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> LicenseResult<()> {
        let mut cache = self
            .cache
            .write()
            .map_err(|_| LicenseError::Storage("lock poisoned".to_string()))?;
        let mut next = cache.clone();
        next.insert(key.to_string(), value.to_string());
        self.save(&next)?;
        *cache = next;
        Ok(())
    }

    fn remove(&self, key: &str) -> LicenseResult<()> {
        let mut cache = self
            .cache
            .write()
            .map_err(|_| LicenseError::Storage("lock poisoned".to_string()))?;
        let mut next = cache.clone();
        next.remove(key);
        self.save(&next)?;
        *cache = next;
        Ok(())
    }
}

impl std::fmt::Debug for FileLicenseStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileLicenseStorage")
            .field("path", &self.path)
            .finish()
    }
}
