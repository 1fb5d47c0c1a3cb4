//! # petadopt-registry
//!
//! Record management for a pet-adoption registry.
//!
//! This crate provides:
//! - `User`, `Shelter`, `Pet`, `AdoptionRecord` (the entities) and their payloads
//! - shape validation for every payload
//! - the `KvStore` contract and typed `Repository` access over it
//! - `Registry`: cross-entity rules and the adoption state machine
//! - serialization points: `SharedRegistry` (threads) and
//!   `mutate_registry_jsonl` (processes)
//!
//! ## Data model
//!
//! ```text
//! Shelter 1 ── * Pet 1 ── * AdoptionRecord * ── 1 User
//!   pets[]        shelterId      petId / userId      applications[]
//! ```
//!
//! Adoption records move `pending -> completed | failed` exactly once;
//! completion also marks the pet adopted.

pub mod adoption;
pub mod atomic_store;
pub mod caller;
pub mod clock;
pub mod error;
pub mod ids;
pub mod jsonl;
pub mod memory;
pub mod pet;
pub mod registry;
pub mod repository;
pub mod shared;
pub mod shelter;
pub mod store;
pub mod user;
pub mod validate;

pub use adoption::{AdoptionPayload, AdoptionRecord, AdoptionStatus, AdoptionUpdate};
pub use atomic_store::{
    AtomicStoreMutationError, DEFAULT_LOCK_RETRY_MS, DEFAULT_LOCK_TIMEOUT_MS, LockPolicy,
    mutate_registry_jsonl, mutate_store_jsonl, store_lock_path,
};
pub use caller::CallerId;
pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{ErrorKind, RegistryError, StoreError};
pub use ids::{IdGenerator, SequentialIds, UuidIds};
pub use jsonl::{JsonlError, StoredRecord};
pub use memory::{MemoryStore, MemoryStoreError};
pub use pet::{Pet, PetPayload, PetStatus};
pub use registry::Registry;
pub use repository::{Entity, Repository};
pub use shared::SharedRegistry;
pub use shelter::{Shelter, ShelterPatch, ShelterPayload};
pub use store::{KvStore, Namespace};
pub use user::{User, UserPatch, UserPayload};
pub use validate::ValidationError;
