use super::{CollectionStream, ShelfSnapshot, SnapshotStream};
use crate::error::{Result, ShelfError};
use crate::model::{seed_books, Book, Collection};
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::debug;

/// In-memory shelf of books. Does NOT persist data.
///
/// Cloning yields another handle to the same shelf.
#[derive(Debug, Clone)]
pub struct BookStore {
    tx: Arc<watch::Sender<ShelfSnapshot>>,
}

impl Default for BookStore {
    fn default() -> Self {
        Self::new()
    }
}

impl BookStore {
    /// An empty shelf.
    pub fn new() -> Self {
        Self::from_books(Vec::new())
    }

    /// A shelf holding the default books.
    pub fn seeded() -> Self {
        Self::from_books(seed_books())
    }

    /// A shelf whose active collection is `books`. Archive stamps are dropped.
    pub fn from_books(books: Vec<Book>) -> Self {
        let active = books.into_iter().map(|b| b.restored()).collect();
        let (tx, _) = watch::channel(ShelfSnapshot {
            version: 0,
            active: Arc::new(active),
            archived: Arc::new(Vec::new()),
        });
        Self { tx: Arc::new(tx) }
    }

    pub fn snapshot(&self) -> ShelfSnapshot {
        self.tx.borrow().clone()
    }

    pub fn active(&self) -> Arc<Vec<Book>> {
        self.tx.borrow().active.clone()
    }

    pub fn archived(&self) -> Arc<Vec<Book>> {
        self.tx.borrow().archived.clone()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.tx.borrow().locate(id).is_some()
    }

    pub fn subscribe(&self) -> SnapshotStream {
        SnapshotStream::new(self.tx.subscribe())
    }

    pub fn stream(&self, collection: Collection) -> CollectionStream {
        CollectionStream::new(self.tx.subscribe(), collection)
    }

    /// Appends a book to the active collection.
    ///
    /// Ids are unique across both collections, so a book whose id is already
    /// active or archived is rejected.
    pub fn create(&self, book: Book) -> Result<Book> {
        self.mutate("create", |snap| {
            if snap.locate(&book.id).is_some() {
                return Err(ShelfError::DuplicateId(book.id.clone()));
            }
            let book = book.restored();
            snap.active = Arc::new(appended(&snap.active, book.clone()));
            Ok(book)
        })
    }

    /// Replaces the active book with the same id.
    pub fn update(&self, book: Book) -> Result<Book> {
        self.mutate("update", |snap| {
            if !snap.active.iter().any(|b| b.id == book.id) {
                return Err(ShelfError::NotFound(book.id.clone()));
            }
            let book = book.restored();
            let active = snap
                .active
                .iter()
                .map(|b| if b.id == book.id { book.clone() } else { b.clone() })
                .collect();
            snap.active = Arc::new(active);
            Ok(book)
        })
    }

    /// Moves a book from active to archived, stamping it with the current time.
    pub fn archive(&self, id: &str) -> Result<Book> {
        self.mutate("archive", |snap| {
            let (book, rest) = take(&snap.active, id)?;
            let archived = book.archived(Utc::now());
            snap.active = Arc::new(rest);
            snap.archived = Arc::new(appended(&snap.archived, archived.clone()));
            Ok(archived)
        })
    }

    /// Moves a book from archived back to active, clearing its archive stamp.
    pub fn restore(&self, id: &str) -> Result<Book> {
        self.mutate("restore", |snap| {
            let (book, rest) = take(&snap.archived, id)?;
            let restored = book.restored();
            snap.archived = Arc::new(rest);
            snap.active = Arc::new(appended(&snap.active, restored.clone()));
            Ok(restored)
        })
    }

    /// Removes a book from the archived collection for good.
    pub fn permanently_delete(&self, id: &str) -> Result<Book> {
        self.mutate("permanently_delete", |snap| {
            let (book, rest) = take(&snap.archived, id)?;
            snap.archived = Arc::new(rest);
            Ok(book)
        })
    }

    /// Applies `op` and publishes a single snapshot if it succeeded.
    fn mutate<F>(&self, op: &'static str, f: F) -> Result<Book>
    where
        F: FnOnce(&mut ShelfSnapshot) -> Result<Book>,
    {
        let mut outcome = None;
        self.tx.send_if_modified(|snap| {
            let res = f(snap);
            let applied = res.is_ok();
            if applied {
                snap.version += 1;
            }
            outcome = Some(res);
            applied
        });

        match outcome {
            Some(Ok(book)) => {
                debug!(op, id = %book.id, version = self.tx.borrow().version, "store mutation applied");
                Ok(book)
            }
            Some(Err(e)) => {
                debug!(op, error = %e, "store mutation rejected");
                Err(e)
            }
            None => Err(ShelfError::Task(format!("{} was not applied", op))),
        }
    }
}

fn appended(books: &[Book], book: Book) -> Vec<Book> {
    let mut next = Vec::with_capacity(books.len() + 1);
    next.extend_from_slice(books);
    next.push(book);
    next
}

/// Splits `id` out of `books`, returning it together with the remainder.
fn take(books: &[Book], id: &str) -> Result<(Book, Vec<Book>)> {
    let pos = books
        .iter()
        .position(|b| b.id == id)
        .ok_or_else(|| ShelfError::NotFound(id.to_string()))?;
    let mut rest = books.to_vec();
    let book = rest.remove(pos);
    Ok((book, rest))
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;

    pub struct StoreFixture {
        pub store: BookStore,
    }

    impl Default for StoreFixture {
        fn default() -> Self {
            Self::new()
        }
    }

    impl StoreFixture {
        pub fn new() -> Self {
            Self {
                store: BookStore::new(),
            }
        }

        /// Adds `count` active books with ids 1..=count.
        pub fn with_books(self, count: usize) -> Self {
            for i in 1..=count {
                self.store
                    .create(Book::new(i.to_string(), format!("Book {}", i)))
                    .unwrap();
            }
            self
        }

        pub fn with_active(self, id: &str, name: &str) -> Self {
            self.store.create(Book::new(id, name)).unwrap();
            self
        }

        pub fn with_archived(self, id: &str, name: &str) -> Self {
            self.store.create(Book::new(id, name)).unwrap();
            self.store.archive(id).unwrap();
            self
        }
    }
}
