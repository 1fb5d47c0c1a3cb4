//! In-process serialization point for concurrent callers.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::registry::Registry;
use crate::store::KvStore;

/// A [`Registry`] behind one mutex.
///
/// Each call to [`SharedRegistry::transact`] holds the lock for the whole
/// operation, so two-record writes are never observed half-applied and
/// read-check-write sequences never interleave.
pub struct SharedRegistry<S> {
    inner: Arc<Mutex<Registry<S>>>,
}

impl<S> Clone for SharedRegistry<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: KvStore> SharedRegistry<S> {
    pub fn new(registry: Registry<S>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(registry)),
        }
    }

    /// Run `op` with exclusive access to the registry.
    ///
    /// Poisoning is ignored: registry operations finish their checks before
    /// the first write.
    pub fn transact<T>(&self, op: impl FnOnce(&mut Registry<S>) -> T) -> T {
        let mut guard = self.lock();
        op(&mut *guard)
    }

    fn lock(&self) -> MutexGuard<'_, Registry<S>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
