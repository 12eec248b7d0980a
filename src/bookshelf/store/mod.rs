//! # Collection Store
//!
//! The store is the single source of truth for the shelf. It owns two disjoint
//! collections, `active` and `archived`, and funnels every mutation through
//! [`memory::BookStore`].
//!
//! ## Snapshots
//!
//! Both collections are published together as one [`ShelfSnapshot`] value. An
//! archive or restore removes the book from one sequence and appends it to the
//! other inside the same publish, so no observer can see a book in neither
//! collection or in both.
//!
//! ```text
//!   create/update/archive/restore/delete
//!                  │
//!                  ▼
//!        ┌───────────────────┐   one snapshot per successful mutation
//!        │     BookStore     │ ─────────────────────────────────────────┐
//!        └───────────────────┘                                          │
//!                                                   ┌──────────────────┴───────┐
//!                                                   ▼                          ▼
//!                                           SnapshotStream          CollectionStream
//! ```
//!
//! Failed mutations (unknown id, duplicate id) publish nothing.
//!
//! ## Lifecycle
//!
//! A store is built explicitly and shared by cloning its handle. When the last
//! handle is dropped, every stream sees the end of its input.

use crate::error::{Result, ShelfError};
use crate::model::{Book, Collection};
use std::sync::Arc;
use tokio::sync::watch;

pub mod memory;

pub use memory::BookStore;

/// Both collections at one instant.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShelfSnapshot {
    /// Bumped once per applied mutation.
    pub version: u64,
    pub active: Arc<Vec<Book>>,
    pub archived: Arc<Vec<Book>>,
}

impl ShelfSnapshot {
    pub fn collection(&self, collection: Collection) -> &Arc<Vec<Book>> {
        match collection {
            Collection::Active => &self.active,
            Collection::Archived => &self.archived,
        }
    }

    /// Where a book currently lives, if anywhere.
    pub fn locate(&self, id: &str) -> Option<Collection> {
        if self.active.iter().any(|b| b.id == id) {
            Some(Collection::Active)
        } else if self.archived.iter().any(|b| b.id == id) {
            Some(Collection::Archived)
        } else {
            None
        }
    }
}

/// Read-only stream of whole-shelf snapshots.
#[derive(Debug, Clone)]
pub struct SnapshotStream {
    rx: watch::Receiver<ShelfSnapshot>,
}

impl SnapshotStream {
    pub(crate) fn new(rx: watch::Receiver<ShelfSnapshot>) -> Self {
        Self { rx }
    }

    pub fn current(&self) -> ShelfSnapshot {
        self.rx.borrow().clone()
    }

    /// Waits for the next published snapshot.
    pub async fn changed(&mut self) -> Result<ShelfSnapshot> {
        self.rx.changed().await.map_err(|_| closed())?;
        Ok(self.rx.borrow_and_update().clone())
    }
}

/// Read-only stream of one collection.
///
/// Only wakes up when the watched collection actually changed, so archiving
/// wakes both streams while an update wakes only the active one.
#[derive(Debug, Clone)]
pub struct CollectionStream {
    rx: watch::Receiver<ShelfSnapshot>,
    collection: Collection,
    last: Arc<Vec<Book>>,
}

impl CollectionStream {
    pub(crate) fn new(mut rx: watch::Receiver<ShelfSnapshot>, collection: Collection) -> Self {
        let last = rx.borrow_and_update().collection(collection).clone();
        Self {
            rx,
            collection,
            last,
        }
    }

    pub fn collection(&self) -> Collection {
        self.collection
    }

    pub fn current(&self) -> Arc<Vec<Book>> {
        self.rx.borrow().collection(self.collection).clone()
    }

    /// Like [`current`](Self::current), but marks the value as seen so
    /// [`changed`](Self::changed) only wakes for later publishes.
    pub fn latest(&mut self) -> Arc<Vec<Book>> {
        self.last = self
            .rx
            .borrow_and_update()
            .collection(self.collection)
            .clone();
        self.last.clone()
    }

    pub async fn changed(&mut self) -> Result<Arc<Vec<Book>>> {
        loop {
            self.rx.changed().await.map_err(|_| closed())?;
            let next = self.rx.borrow_and_update().collection(self.collection).clone();
            if !Arc::ptr_eq(&next, &self.last) {
                self.last = next.clone();
                return Ok(next);
            }
        }
    }
}

fn closed() -> ShelfError {
    ShelfError::Task("book store was dropped".to_string())
}
