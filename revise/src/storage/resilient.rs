//! Failure-tolerant in-memory collection backed by [`Persistence`].
//!
//! [`ResilientCollection`] holds one identity's entities of one kind and
//! writes the whole collection after every mutation. Storage failures
//! never reach the caller:
//! 1. A failed load is logged and the collection starts empty.
//! 2. A failed save is logged, the in-memory change is kept and the
//!    collection is flagged as having unsaved changes.
//! 3. The next successful save (any later mutation, or [`flush`]) clears
//!    the flag. There is no background retry.
//!
//! [`flush`]: ResilientCollection::flush

use serde::Serialize;
use serde::de::DeserializeOwned;

use revise_proto::identity::UserId;

use super::{CollectionKind, Persistence, StoreError};

/// What happened when a collection was loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// A stored collection with this many entities was read.
    Loaded(usize),
    /// Nothing was ever saved for this identity and kind.
    NeverSaved,
    /// The backend or codec failed; the collection starts empty.
    Failed,
}

/// One identity's collection of `T`, saved in full on every change.
#[derive(Debug)]
pub struct ResilientCollection<T> {
    identity: UserId,
    kind: CollectionKind,
    items: Vec<T>,
    persistence: Persistence,
    unsaved: bool,
}

impl<T: Serialize + DeserializeOwned> ResilientCollection<T> {
    /// Loads the collection, falling back to an empty one on failure.
    pub fn load(
        identity: UserId,
        kind: CollectionKind,
        persistence: Persistence,
    ) -> (Self, LoadOutcome) {
        let (items, outcome) = match persistence.load::<T>(&identity, kind) {
            Ok(Some(items)) => {
                let count = items.len();
                (items, LoadOutcome::Loaded(count))
            }
            Ok(None) => (Vec::new(), LoadOutcome::NeverSaved),
            Err(err) => {
                tracing::warn!(
                    %identity,
                    collection = %kind,
                    error = %err,
                    "collection load failed, starting empty"
                );
                (Vec::new(), LoadOutcome::Failed)
            }
        };
        tracing::info!(%identity, collection = %kind, ?outcome, "collection loaded");

        let collection = Self {
            identity,
            kind,
            items,
            persistence,
            unsaved: false,
        };
        (collection, outcome)
    }

    /// Identity owning this collection.
    pub const fn identity(&self) -> &UserId {
        &self.identity
    }

    /// Entities in insertion order.
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Mutable access for the owning store. Call [`save`](Self::save) after
    /// changing anything.
    pub(crate) const fn items_mut(&mut self) -> &mut Vec<T> {
        &mut self.items
    }

    /// Writes the whole collection, recording a failure instead of
    /// returning it.
    pub(crate) fn save(&mut self) {
        match self.persistence.save(&self.identity, self.kind, &self.items) {
            Ok(()) => {
                if self.unsaved {
                    tracing::info!(
                        identity = %self.identity,
                        collection = %self.kind,
                        "earlier unsaved changes are now persisted"
                    );
                }
                self.unsaved = false;
            }
            Err(err) => {
                tracing::warn!(
                    identity = %self.identity,
                    collection = %self.kind,
                    error = %err,
                    "collection save failed, change kept in memory"
                );
                self.unsaved = true;
            }
        }
    }

    /// Retries a failed save.
    ///
    /// # Errors
    ///
    /// Returns the [`StoreError`] of the retried save; the collection stays
    /// flagged as unsaved.
    pub fn flush(&mut self) -> Result<(), StoreError> {
        if !self.unsaved {
            return Ok(());
        }
        self.persistence
            .save(&self.identity, self.kind, &self.items)?;
        self.unsaved = false;
        tracing::info!(
            identity = %self.identity,
            collection = %self.kind,
            "flushed unsaved changes"
        );
        Ok(())
    }

    /// `true` while the last save attempt failed.
    pub const fn has_unsaved_changes(&self) -> bool {
        self.unsaved
    }
}
