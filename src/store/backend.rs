//! Durable record storage
//!
//! A record is one named string value. The file backend keeps each record
//! in `<dir>/<key>.json`; the memory backend is shared between clones.

use crate::error::{Error, Result};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

/// Key/value storage for serialized records
pub trait RecordStorage: Send {
    /// Read a record; Ok(None) when it was never written
    fn read(&self, key: &str) -> Result<Option<String>>;

    /// Replace a record
    fn write(&self, key: &str, value: &str) -> Result<()>;
}

/// File-per-record storage under a data directory
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path of the file backing `key`
    pub fn record_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl RecordStorage for FileStorage {
    fn read(&self, key: &str) -> Result<Option<String>> {
        let path = self.record_path(key);
        if !path.exists() {
            return Ok(None);
        }
        fs::read_to_string(&path)
            .map(Some)
            .map_err(|e| Error::Storage(format!("Failed to read {}: {}", path.display(), e)))
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        fs::create_dir_all(&self.dir).map_err(|e| {
            Error::Storage(format!("Failed to create data directory: {}", e))
        })?;

        let path = self.record_path(key);
        fs::write(&path, value)
            .map_err(|e| Error::Storage(format!("Failed to write {}: {}", path.display(), e)))
    }
}

/// In-memory storage; clones see the same records
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    records: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a record, as if written by an earlier session
    pub fn with_record(self, key: &str, value: &str) -> Self {
        if let Ok(mut records) = self.records.lock() {
            records.insert(key.to_string(), value.to_string());
        }
        self
    }

    fn records(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.records
            .lock()
            .map_err(|_| Error::Storage("Memory storage poisoned".to_string()))
    }
}

impl RecordStorage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>> {
        Ok(self.records()?.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        self.records()?.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
