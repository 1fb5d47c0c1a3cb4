//! Reference in-memory [`KvStore`] with a JSONL snapshot.
//!
//! This is the storage boundary for `petadopt-registry`:
//! - ordered maps per namespace
//! - load/save JSONL snapshots
//! - no registry rules (those live in [`crate::registry`])

use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

use crate::jsonl::{JsonlError, StoredRecord, read_records_from_path, write_records_to_path};
use crate::store::{KvStore, Namespace};

/// Errors raised while loading or saving the memory store.
#[derive(Debug, thiserror::Error)]
pub enum MemoryStoreError {
    #[error(transparent)]
    Jsonl(#[from] JsonlError),
}

/// Ordered in-memory state for every namespace.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryStore {
    namespaces: BTreeMap<Namespace, BTreeMap<String, Value>>,
}

impl MemoryStore {
    /// Build a store from persisted entries.
    ///
    /// Duplicate keys resolve with last-write-wins, matching append/overlay
    /// snapshots.
    pub fn from_records(records: Vec<StoredRecord>) -> Self {
        let mut store = Self::default();
        for entry in records {
            store.insert(entry.namespace, &entry.key, entry.record);
        }
        store
    }

    /// Load store state from a JSONL file.
    pub fn load_jsonl(path: impl AsRef<Path>) -> Result<Self, MemoryStoreError> {
        let path = path.as_ref();
        let records = read_records_from_path(path)?;
        debug!(path = %path.display(), records = records.len(), "store loaded");
        Ok(Self::from_records(records))
    }

    /// Load store state, treating a missing file as an empty store.
    pub fn load_jsonl_or_empty(path: impl AsRef<Path>) -> Result<Self, MemoryStoreError> {
        let path = path.as_ref();
        if path.exists() {
            Self::load_jsonl(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Persist store state to a JSONL file.
    pub fn save_jsonl(&self, path: impl AsRef<Path>) -> Result<(), MemoryStoreError> {
        let path = path.as_ref();
        let records = self.records();
        write_records_to_path(path, &records)?;
        debug!(path = %path.display(), records = records.len(), "store saved");
        Ok(())
    }

    /// Every entry in deterministic (namespace, key) order.
    pub fn records(&self) -> Vec<StoredRecord> {
        self.namespaces
            .iter()
            .flat_map(|(namespace, entries)| {
                entries.iter().map(|(key, record)| StoredRecord {
                    namespace: *namespace,
                    key: key.clone(),
                    record: record.clone(),
                })
            })
            .collect()
    }

    /// Number of records in one namespace.
    pub fn len(&self, namespace: Namespace) -> usize {
        self.namespaces.get(&namespace).map_or(0, BTreeMap::len)
    }

    /// Whether every namespace is empty.
    pub fn is_empty(&self) -> bool {
        self.namespaces.values().all(BTreeMap::is_empty)
    }
}

impl KvStore for MemoryStore {
    fn get(&self, namespace: Namespace, key: &str) -> Option<Value> {
        self.namespaces
            .get(&namespace)
            .and_then(|entries| entries.get(key))
            .cloned()
    }

    fn insert(&mut self, namespace: Namespace, key: &str, record: Value) -> Option<Value> {
        self.namespaces
            .entry(namespace)
            .or_default()
            .insert(key.to_string(), record)
    }

    fn values(&self, namespace: Namespace) -> Vec<Value> {
        self.namespaces
            .get(&namespace)
            .map(|entries| entries.values().cloned().collect())
            .unwrap_or_default()
    }
}
