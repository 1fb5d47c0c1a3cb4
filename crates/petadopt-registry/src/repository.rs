//! Typed accessors over a [`KvStore`].
//!
//! Every entity type names its namespace through [`Entity`]; the
//! [`Repository`] extension then gives each one `fetch` / `put` / `scan`
//! without a hand-written accessor per entity.

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::StoreError;
use crate::store::{KvStore, Namespace};

/// A record type stored in its own namespace, keyed by its id.
pub trait Entity: Serialize + DeserializeOwned {
    const NAMESPACE: Namespace;
    /// Short noun used in error details ("pet", "shelter", ...).
    const LABEL: &'static str;

    fn id(&self) -> &str;
}

pub trait Repository: KvStore {
    fn fetch<T: Entity>(&self, id: &str) -> Result<Option<T>, StoreError> {
        self.get(T::NAMESPACE, id)
            .map(|value| decode::<T>(id, value))
            .transpose()
    }

    fn put<T: Entity>(&mut self, record: &T) -> Result<(), StoreError> {
        let value = serde_json::to_value(record).map_err(|e| StoreError::Encode {
            namespace: T::NAMESPACE,
            key: record.id().to_string(),
            message: e.to_string(),
        })?;
        let replaced = self.insert(T::NAMESPACE, record.id(), value).is_some();
        debug!(namespace = %T::NAMESPACE, id = record.id(), replaced, "record stored");
        Ok(())
    }

    fn scan<T: Entity>(&self) -> Result<Vec<T>, StoreError> {
        self.values(T::NAMESPACE)
            .into_iter()
            .map(|value| {
                let key = value
                    .get("id")
                    .and_then(|id| id.as_str())
                    .unwrap_or("<unknown>")
                    .to_string();
                decode::<T>(&key, value)
            })
            .collect()
    }
}

impl<S: KvStore + ?Sized> Repository for S {}

fn decode<T: Entity>(key: &str, value: serde_json::Value) -> Result<T, StoreError> {
    serde_json::from_value(value).map_err(|e| StoreError::Decode {
        namespace: T::NAMESPACE,
        key: key.to_string(),
        message: e.to_string(),
    })
}
