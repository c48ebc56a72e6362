//! Application data directory and key/value state persistence.
//!
//! [`DataStorage`] resolves the per-user data directory
//! (`~/.local/share/lacodda/fastline` on Linux, `~/Library/Application
//! Support/...` on macOS, `%LOCALAPPDATA%\...` on Windows). Configuration,
//! the SQLite outbox and the JSON state blobs all live there.
//!
//! State blobs go through the [`StateStore`] trait: one JSON document per
//! key. [`FileStateStore`] writes `<key>.json` files, replacing them through a
//! temporary file so a crash mid-write never leaves half a document behind.
//! [`MemoryStateStore`] keeps everything in memory for tests.

use anyhow::Result;
use std::collections::HashMap;
use std::env::consts::OS;
use std::env::var;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

include!(concat!(env!("OUT_DIR"), "/app_metadata.rs"));

pub const VENDOR_NAME: &str = APP_METADATA_OWNER;
pub const APP_NAME: &str = APP_METADATA_NAME;
pub const APP_VERSION: &str = APP_METADATA_VERSION;

#[derive(Debug, Clone)]
pub struct DataStorage {
    base_path: PathBuf,
}

impl DataStorage {
    pub fn new() -> Self {
        let base_path = match OS {
            "windows" => var("LOCALAPPDATA").unwrap_or_else(|_| ".".into()),
            "macos" => var("HOME").unwrap_or_else(|_| ".".into()) + "/Library/Application Support",
            _ => var("HOME").unwrap_or_else(|_| ".".into()) + "/.local/share",
        };
        let base_path = Path::new(&base_path).join(VENDOR_NAME).join(APP_NAME);

        Self { base_path }
    }

    /// Uses an explicit directory instead of the platform default.
    pub fn at(base_path: impl Into<PathBuf>) -> Self {
        Self { base_path: base_path.into() }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Full path of `file_name` inside the data directory, creating the
    /// directory on first use.
    pub fn get_path(&self, file_name: &str) -> Result<PathBuf> {
        if !self.base_path.exists() {
            fs::create_dir_all(&self.base_path)?;
        }
        Ok(self.base_path.join(file_name))
    }
}

impl Default for DataStorage {
    fn default() -> Self {
        Self::new()
    }
}

/// Durable storage of JSON documents addressed by key.
pub trait StateStore {
    /// Returns the stored document, or `None` if nothing was saved under `key`.
    fn load(&self, key: &str) -> Result<Option<String>>;

    /// Replaces the document stored under `key`.
    fn save(&self, key: &str, json: &str) -> Result<()>;
}

/// One `<key>.json` file per key in the data directory.
#[derive(Debug, Clone)]
pub struct FileStateStore {
    storage: DataStorage,
}

impl FileStateStore {
    pub fn new(storage: DataStorage) -> Self {
        Self { storage }
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        self.storage.get_path(&format!("{}.json", key))
    }
}

impl StateStore for FileStateStore {
    fn load(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key)?;
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(path)?))
    }

    fn save(&self, key: &str, json: &str) -> Result<()> {
        let path = self.path_for(key)?;
        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, json)?;
        fs::rename(&tmp_path, &path)?;
        Ok(())
    }
}

/// In-memory store. Clones share the same documents.
#[derive(Debug, Clone, Default)]
pub struct MemoryStateStore {
    documents: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateStore for MemoryStateStore {
    fn load(&self, key: &str) -> Result<Option<String>> {
        let documents = self.documents.lock().map_err(|e| anyhow::anyhow!("state store poisoned: {}", e))?;
        Ok(documents.get(key).cloned())
    }

    fn save(&self, key: &str, json: &str) -> Result<()> {
        let mut documents = self.documents.lock().map_err(|e| anyhow::anyhow!("state store poisoned: {}", e))?;
        documents.insert(key.to_string(), json.to_string());
        Ok(())
    }
}
