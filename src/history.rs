//! Request History
//!
//! Newest-first log of successful generations. The log is owned by
//! `HistoryStore`; every mutation updates memory first and then rewrites the
//! whole log under a single storage key. Persistence is best-effort: failures
//! are logged and never roll back the in-memory state, and a corrupt stored
//! payload is discarded at load time.

use crate::error::StorageError;
use crate::types::{GenerationResult, HistoryEntry, HistoryInput, ReusedInputs};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

/// Key holding the serialized log.
pub const HISTORY_KEY: &str = "history";

/// Durable single-key storage for the serialized log.
pub trait HistoryStorage: Send + Sync {
    /// Read the stored payload, if any.
    fn read(&self) -> Result<Option<Vec<u8>>, StorageError>;

    /// Overwrite the stored payload.
    fn write(&self, bytes: &[u8]) -> Result<(), StorageError>;

    /// Remove the stored payload.
    fn remove(&self) -> Result<(), StorageError>;
}

/// sled-backed storage.
pub struct SledHistoryStorage {
    db: sled::Db,
}

impl SledHistoryStorage {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        let path = path.as_ref();
        std::fs::create_dir_all(path)?;
        let db = sled::open(path)?;
        Ok(Self { db })
    }

    pub fn from_db(db: sled::Db) -> Self {
        Self { db }
    }
}

impl HistoryStorage for SledHistoryStorage {
    fn read(&self) -> Result<Option<Vec<u8>>, StorageError> {
        Ok(self.db.get(HISTORY_KEY)?.map(|value| value.to_vec()))
    }

    fn write(&self, bytes: &[u8]) -> Result<(), StorageError> {
        self.db.insert(HISTORY_KEY, bytes)?;
        self.db.flush()?;
        Ok(())
    }

    fn remove(&self) -> Result<(), StorageError> {
        self.db.remove(HISTORY_KEY)?;
        self.db.flush()?;
        Ok(())
    }
}

/// In-process storage, for tests and throwaway sessions.
#[derive(Default)]
pub struct MemoryHistoryStorage {
    value: Mutex<Option<Vec<u8>>>,
    fail_writes: bool,
}

impl MemoryHistoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage pre-populated with a raw payload.
    pub fn with_contents(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            value: Mutex::new(Some(bytes.into())),
            fail_writes: false,
        }
    }

    /// Storage whose writes always fail.
    pub fn failing() -> Self {
        Self {
            value: Mutex::new(None),
            fail_writes: true,
        }
    }

    pub fn contents(&self) -> Option<Vec<u8>> {
        self.value
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

impl HistoryStorage for MemoryHistoryStorage {
    fn read(&self) -> Result<Option<Vec<u8>>, StorageError> {
        Ok(self.contents())
    }

    fn write(&self, bytes: &[u8]) -> Result<(), StorageError> {
        if self.fail_writes {
            return Err(StorageError::Backend("write rejected".to_string()));
        }
        *self.value.lock().unwrap_or_else(|e| e.into_inner()) = Some(bytes.to_vec());
        Ok(())
    }

    fn remove(&self) -> Result<(), StorageError> {
        *self.value.lock().unwrap_or_else(|e| e.into_inner()) = None;
        Ok(())
    }
}

/// The process-wide history log.
pub struct HistoryStore {
    entries: Vec<HistoryEntry>,
    storage: Arc<dyn HistoryStorage>,
}

impl HistoryStore {
    /// Load the log from storage, discarding an unreadable payload.
    pub fn load(storage: Arc<dyn HistoryStorage>) -> Self {
        let entries = match read_entries(storage.as_ref()) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(error = %e, "Discarding unreadable history, starting empty");
                if let Err(e) = storage.remove() {
                    warn!(error = %e, "Failed to clear unreadable history");
                }
                Vec::new()
            }
        };
        debug!(entries = entries.len(), "History loaded");
        Self { entries, storage }
    }

    /// Entries, newest first.
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn get(&self, id: &str) -> Option<&HistoryEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Create an entry for a successful generation and prepend it.
    pub fn record(&mut self, inputs: HistoryInput, result: GenerationResult) -> &HistoryEntry {
        let now = chrono::Utc::now().timestamp_millis();
        let timestamp = self
            .entries
            .first()
            .map_or(now, |newest| now.max(newest.timestamp));

        let mut id = new_entry_id(timestamp);
        while self.get(&id).is_some() {
            id = new_entry_id(timestamp);
        }

        self.append(HistoryEntry {
            id,
            timestamp,
            inputs,
            result,
        });
        &self.entries[0]
    }

    /// Prepend an entry and persist.
    pub fn append(&mut self, entry: HistoryEntry) {
        info!(id = %entry.id, "History entry added");
        self.entries.insert(0, entry);
        self.persist();
    }

    /// Remove the entry with `id`. Returns whether one was removed.
    pub fn delete(&mut self, id: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.id != id);
        let removed = self.entries.len() != before;
        if removed {
            info!(id = %id, "History entry deleted");
        } else {
            debug!(id = %id, "Delete requested for unknown history entry");
        }
        self.persist();
        removed
    }

    /// Remove every entry and persist.
    pub fn clear(&mut self) {
        info!(entries = self.entries.len(), "History cleared");
        self.entries.clear();
        self.persist();
    }

    /// Form state to re-enter from an entry. Attachment bytes are never restored.
    pub fn reuse(entry: &HistoryEntry) -> ReusedInputs {
        ReusedInputs {
            form: entry.inputs.form.clone(),
            file_name: entry.inputs.file_name.clone(),
        }
    }

    fn persist(&self) {
        let result = serde_json::to_vec(&self.entries)
            .map_err(|e| StorageError::Serialization(e.to_string()))
            .and_then(|bytes| self.storage.write(&bytes));
        if let Err(e) = result {
            warn!(error = %e, entries = self.entries.len(), "Failed to persist history");
        }
    }
}

fn read_entries(storage: &dyn HistoryStorage) -> Result<Vec<HistoryEntry>, StorageError> {
    match storage.read()? {
        Some(bytes) => {
            serde_json::from_slice(&bytes).map_err(|e| StorageError::Corrupt(e.to_string()))
        }
        None => Ok(Vec::new()),
    }
}

/// Time-based id with a random suffix against same-millisecond collisions.
fn new_entry_id(timestamp_ms: i64) -> String {
    format!("{}-{:08x}", timestamp_ms, rand::random::<u32>())
}
