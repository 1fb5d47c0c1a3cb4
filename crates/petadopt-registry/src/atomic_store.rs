//! Lock-scoped atomic mutation over a JSONL-backed store.
//!
//! One mutation = acquire the lock file, load the snapshot, run the
//! operation, persist only if it succeeded, release the lock. Separate
//! processes sharing one store file are therefore serialized, and a failed
//! operation leaves the file untouched.

use chrono::Utc;
use std::error::Error as StdError;
use std::ffi::OsString;
use std::fmt::{Display, Formatter};
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};
use tracing::debug;

use crate::memory::{MemoryStore, MemoryStoreError};
use crate::registry::Registry;

pub const DEFAULT_LOCK_TIMEOUT_MS: u64 = 5_000;
pub const DEFAULT_LOCK_RETRY_MS: u64 = 25;

pub fn store_lock_path(store_path: &Path) -> PathBuf {
    let mut path: OsString = store_path.as_os_str().to_os_string();
    path.push(".lock");
    PathBuf::from(path)
}

/// How long to wait for a busy lock before giving up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockPolicy {
    pub timeout: Duration,
    pub retry_interval: Duration,
}

impl LockPolicy {
    pub fn with_timeout_ms(timeout_ms: u64) -> Self {
        Self {
            timeout: Duration::from_millis(timeout_ms),
            ..Self::default()
        }
    }
}

impl Default for LockPolicy {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(DEFAULT_LOCK_TIMEOUT_MS),
            retry_interval: Duration::from_millis(DEFAULT_LOCK_RETRY_MS),
        }
    }
}

#[derive(Debug)]
pub enum AtomicStoreMutationError<E> {
    LockBusy { lock_path: String },
    LockIo { lock_path: String, message: String },
    Store(MemoryStoreError),
    Mutation(E),
}

impl<E: Display> Display for AtomicStoreMutationError<E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LockBusy { lock_path } => write!(f, "registry store lock busy: {lock_path}"),
            Self::LockIo { lock_path, message } => {
                write!(
                    f,
                    "failed to acquire registry store lock {lock_path}: {message}"
                )
            }
            Self::Store(err) => write!(f, "{err}"),
            Self::Mutation(err) => write!(f, "{err}"),
        }
    }
}

impl<E> StdError for AtomicStoreMutationError<E> where
    E: Display + std::fmt::Debug + StdError + 'static
{
}

/// Execute one lock-scoped store mutation against a JSONL path.
///
/// The mutator returns `(value, changed)`; `changed=true` persists the store
/// before the lock is released. A missing file starts as an empty store.
pub fn mutate_store_jsonl<T, E, F>(
    path: impl AsRef<Path>,
    policy: LockPolicy,
    mutator: F,
) -> Result<T, AtomicStoreMutationError<E>>
where
    F: FnOnce(&mut MemoryStore) -> Result<(T, bool), E>,
{
    let path = path.as_ref();
    let _guard = StoreFileLockGuard::acquire(path, policy)?;

    let mut store =
        MemoryStore::load_jsonl_or_empty(path).map_err(AtomicStoreMutationError::Store)?;
    let (value, changed) = mutator(&mut store).map_err(AtomicStoreMutationError::Mutation)?;
    if changed {
        store
            .save_jsonl(path)
            .map_err(AtomicStoreMutationError::Store)?;
    }
    Ok(value)
}

/// Run one registry operation under the store lock, persisting on success.
///
/// The registry uses UUID ids and the system clock.
pub fn mutate_registry_jsonl<T, E, F>(
    path: impl AsRef<Path>,
    policy: LockPolicy,
    op: F,
) -> Result<T, AtomicStoreMutationError<E>>
where
    F: FnOnce(&mut Registry<&mut MemoryStore>) -> Result<T, E>,
{
    mutate_store_jsonl(path, policy, |store| {
        let mut registry = Registry::new(store);
        op(&mut registry).map(|value| (value, true))
    })
}

struct StoreFileLockGuard {
    lock_path: PathBuf,
    _file: File,
}

impl StoreFileLockGuard {
    fn acquire<E>(path: &Path, policy: LockPolicy) -> Result<Self, AtomicStoreMutationError<E>> {
        let lock_path = store_lock_path(path);
        if let Some(parent) = lock_path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|e| AtomicStoreMutationError::LockIo {
                lock_path: lock_path.display().to_string(),
                message: e.to_string(),
            })?;
        }

        let started = Instant::now();
        loop {
            match OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&lock_path)
            {
                Ok(mut file) => {
                    stamp_lock(&mut file, &lock_path);
                    debug!(
                        lock = %lock_path.display(),
                        waited_ms = started.elapsed().as_millis() as u64,
                        "store lock acquired"
                    );
                    return Ok(Self {
                        lock_path,
                        _file: file,
                    });
                }
                Err(err) if err.kind() == std::io::ErrorKind::AlreadyExists => {
                    if started.elapsed() >= policy.timeout {
                        return Err(AtomicStoreMutationError::LockBusy {
                            lock_path: lock_path.display().to_string(),
                        });
                    }
                    thread::sleep(policy.retry_interval);
                }
                Err(err) => {
                    return Err(AtomicStoreMutationError::LockIo {
                        lock_path: lock_path.display().to_string(),
                        message: err.to_string(),
                    });
                }
            }
        }
    }
}

/// Record the holder in the lock file. A failed stamp leaves the lock
/// valid but empty.
fn stamp_lock(writer: &mut impl Write, lock_path: &Path) -> bool {
    match writeln!(
        writer,
        "pid={}\nutc={}",
        std::process::id(),
        Utc::now().to_rfc3339()
    ) {
        Ok(()) => true,
        Err(err) => {
            debug!(
                lock = %lock_path.display(),
                error = %err,
                "lock stamp not written"
            );
            false
        }
    }
}

impl Drop for StoreFileLockGuard {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.lock_path);
    }
}
