//! Key-value store contract the registry is written against.
//!
//! Four independent namespaces, each keyed by entity id. Records cross the
//! boundary as serialized JSON values; typed access lives in
//! [`crate::repository`].

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Namespace {
    Users,
    Pets,
    Shelters,
    Adoptions,
}

impl Namespace {
    pub const ALL: [Namespace; 4] = [Self::Users, Self::Pets, Self::Shelters, Self::Adoptions];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Users => "users",
            Self::Pets => "pets",
            Self::Shelters => "shelters",
            Self::Adoptions => "adoptions",
        }
    }
}

impl Display for Namespace {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered mapping from id to serialized record, one map per namespace.
///
/// Single-key writes are assumed atomic. Multi-key consistency is the
/// caller's job: the registry runs every operation inside one critical
/// section (see [`crate::shared`] and [`crate::atomic_store`]).
pub trait KvStore {
    fn get(&self, namespace: Namespace, key: &str) -> Option<Value>;

    /// Insert or replace; returns the previous record if present.
    fn insert(&mut self, namespace: Namespace, key: &str, record: Value) -> Option<Value>;

    /// Every record in the namespace. Callers must not rely on the order.
    fn values(&self, namespace: Namespace) -> Vec<Value>;
}

impl<S: KvStore + ?Sized> KvStore for &mut S {
    fn get(&self, namespace: Namespace, key: &str) -> Option<Value> {
        (**self).get(namespace, key)
    }

    fn insert(&mut self, namespace: Namespace, key: &str, record: Value) -> Option<Value> {
        (**self).insert(namespace, key, record)
    }

    fn values(&self, namespace: Namespace) -> Vec<Value> {
        (**self).values(namespace)
    }
}
