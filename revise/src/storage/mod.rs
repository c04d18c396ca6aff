//! Durable key-value storage for per-user entity collections.
//!
//! Defines the [`KeyValueStore`] trait implemented by the storage backends
//! and [`Persistence`], the typed adapter the stores talk to. Every
//! collection is stored under `"<collectionKind>_<identity>"` as a JSON
//! array (see [`revise_proto::codec`]).
//!
//! Backends:
//! - [`InMemoryStore`]: process-local map, used by tests and the
//!   `memory` backend.
//! - [`FileStore`]: one JSON file per key inside a data directory.
//!
//! Stores keep their entities in a [`ResilientCollection`], which turns
//! storage failures into logged warnings.

pub mod file;
pub mod memory;
pub mod resilient;

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;

use revise_proto::codec::{self, CodecError};
use revise_proto::identity::UserId;

pub use file::FileStore;
pub use memory::InMemoryStore;
pub use resilient::{LoadOutcome, ResilientCollection};

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The underlying storage is full or unavailable.
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// A write operation failed.
    #[error("write failed: {0}")]
    WriteFailed(String),

    /// A read operation failed.
    #[error("read failed: {0}")]
    ReadFailed(String),

    /// A stored value could not be encoded or decoded.
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// Filesystem error from a file-backed store.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Which entity collection a stored value holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectionKind {
    Projects,
    Tasks,
}

impl CollectionKind {
    /// Both collections kept for every identity.
    pub const ALL: [Self; 2] = [Self::Projects, Self::Tasks];

    /// Prefix of the storage key.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Projects => "projects",
            Self::Tasks => "tasks",
        }
    }
}

impl std::fmt::Display for CollectionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Builds the storage key of one collection of one identity.
#[must_use]
pub fn storage_key(kind: CollectionKind, identity: &UserId) -> String {
    format!("{kind}_{identity}")
}

/// Raw string storage keyed by [`storage_key`].
///
/// Reads must not have side effects: calling `get` any number of times
/// leaves the store unchanged.
pub trait KeyValueStore: Send + Sync {
    /// Returns the value stored under `key`, or `None` if it was never written.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the value could not be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Deletes the value under `key`. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend refuses the removal.
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// Typed persistence adapter shared by the project and task stores.
///
/// Cheap to clone; all clones talk to the same backend.
#[derive(Clone)]
pub struct Persistence {
    backend: Arc<dyn KeyValueStore>,
}

impl Persistence {
    /// Wraps a storage backend.
    #[must_use]
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self { backend }
    }

    /// A persistence adapter over a fresh [`InMemoryStore`].
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryStore::new()))
    }

    /// Loads one collection of `identity`.
    ///
    /// Returns `Ok(None)` if the collection was never saved for this
    /// identity, which is different from a saved empty collection.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend read fails or the stored value
    /// cannot be decoded.
    pub fn load<T: DeserializeOwned>(
        &self,
        identity: &UserId,
        kind: CollectionKind,
    ) -> Result<Option<Vec<T>>, StoreError> {
        let key = storage_key(kind, identity);
        let Some(raw) = self.backend.get(&key)? else {
            return Ok(None);
        };
        let items = codec::decode(&raw)?;
        Ok(Some(items))
    }

    /// Replaces one collection of `identity` with `items`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if encoding or the backend write fails.
    pub fn save<T: Serialize>(
        &self,
        identity: &UserId,
        kind: CollectionKind,
        items: &[T],
    ) -> Result<(), StoreError> {
        let key = storage_key(kind, identity);
        let raw = codec::encode(items)?;
        self.backend.set(&key, &raw)?;
        tracing::debug!(%key, count = items.len(), "collection saved");
        Ok(())
    }

    /// Removes every collection stored for `identity`.
    ///
    /// # Errors
    ///
    /// Returns the first [`StoreError`] reported by the backend.
    pub fn clear(&self, identity: &UserId) -> Result<(), StoreError> {
        for kind in CollectionKind::ALL {
            self.backend.remove(&storage_key(kind, identity))?;
        }
        tracing::info!(%identity, "cleared stored collections");
        Ok(())
    }
}

impl std::fmt::Debug for Persistence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Persistence").finish_non_exhaustive()
    }
}
