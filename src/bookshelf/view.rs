//! # Derived Views
//!
//! A [`FilteredView`] combines a collection stream from the store with a live
//! [`SearchTerm`] and yields the books that match. It holds no memory of older
//! queries: the result is always `filter_books(latest collection, latest query)`.

use crate::error::{Result, ShelfError};
use crate::model::{Book, Collection};
use crate::store::CollectionStream;
use std::sync::Arc;
use tokio::sync::watch;

/// A live search box value.
#[derive(Debug, Clone)]
pub struct SearchTerm {
    tx: Arc<watch::Sender<String>>,
}

impl Default for SearchTerm {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchTerm {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(String::new());
        Self { tx: Arc::new(tx) }
    }

    pub fn set(&self, term: impl Into<String>) {
        let term = term.into();
        self.tx.send_if_modified(|current| {
            if *current == term {
                return false;
            }
            *current = term;
            true
        });
    }

    pub fn clear(&self) {
        self.set(String::new());
    }

    pub fn get(&self) -> String {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<String> {
        self.tx.subscribe()
    }
}

/// Trimmed, lowercased form of a raw query.
pub fn normalize_query(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Books whose name or id contains `query`, ignoring case.
///
/// A blank query returns every book in upstream order.
pub fn filter_books(books: &[Book], query: &str) -> Vec<Book> {
    let query = normalize_query(query);
    if query.is_empty() {
        return books.to_vec();
    }
    books
        .iter()
        .filter(|b| b.name.to_lowercase().contains(&query) || b.id.to_lowercase().contains(&query))
        .cloned()
        .collect()
}

/// A filtered, always-current view of one collection.
#[derive(Debug)]
pub struct FilteredView {
    books: CollectionStream,
    query: watch::Receiver<String>,
}

impl FilteredView {
    pub fn new(books: CollectionStream, search: &SearchTerm) -> Self {
        Self {
            books,
            query: search.subscribe(),
        }
    }

    pub fn collection(&self) -> Collection {
        self.books.collection()
    }

    pub fn query(&self) -> String {
        self.query.borrow().clone()
    }

    /// The filtered books for the latest collection and query.
    pub fn current(&self) -> Vec<Book> {
        let query = self.query.borrow().clone();
        filter_books(&self.books.current(), &query)
    }

    /// The filtered books, marking both inputs as seen.
    ///
    /// A following [`changed`](Self::changed) waits for a newer collection or query.
    pub fn latest(&mut self) -> Vec<Book> {
        let query = self.query.borrow_and_update().clone();
        filter_books(&self.books.latest(), &query)
    }

    /// Size of the collection before filtering.
    pub fn total(&self) -> usize {
        self.books.current().len()
    }

    /// Waits until the collection or the query changes and returns the new result.
    pub async fn changed(&mut self) -> Result<Vec<Book>> {
        tokio::select! {
            res = self.books.changed() => {
                res?;
            }
            res = self.query.changed() => {
                res.map_err(|_| ShelfError::Task("search term was dropped".to_string()))?;
            }
        }
        Ok(self.current())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::BookStore;

    fn shelf() -> Vec<Book> {
        vec![
            Book::new("1", "Clean Code"),
            Book::new("2", "Domain-Driven Design"),
        ]
    }

    #[test]
    fn matches_name_case_insensitively() {
        let found = filter_books(&shelf(), "clean");
        assert_eq!(found, vec![Book::new("1", "Clean Code")]);
    }

    #[test]
    fn blank_query_keeps_order() {
        assert_eq!(filter_books(&shelf(), ""), shelf());
        assert_eq!(filter_books(&shelf(), "   "), shelf());
    }

    #[test]
    fn matches_id_substring_and_trims() {
        let found = filter_books(&shelf(), "  2 ");
        assert_eq!(found, vec![Book::new("2", "Domain-Driven Design")]);
        assert!(filter_books(&shelf(), "rust").is_empty());
    }

    #[tokio::test]
    async fn recomputes_when_search_changes() {
        let store = BookStore::from_books(shelf());
        let search = SearchTerm::new();
        let mut view = FilteredView::new(store.stream(Collection::Active), &search);
        assert_eq!(view.current().len(), 2);

        search.set("DOMAIN");
        let found = view.changed().await.unwrap();
        assert_eq!(found, vec![Book::new("2", "Domain-Driven Design")]);
        assert_eq!(view.total(), 2);
    }

    #[tokio::test]
    async fn recomputes_when_collection_changes() {
        let store = BookStore::from_books(shelf());
        let search = SearchTerm::new();
        search.set("code");
        let mut view = FilteredView::new(store.stream(Collection::Active), &search);
        assert_eq!(view.current().len(), 1);

        store.create(Book::new("3", "Code Complete")).unwrap();
        let found = view.changed().await.unwrap();
        assert_eq!(found.len(), 2);
        assert_eq!(found[1].id, "3");
    }

    #[tokio::test]
    async fn latest_marks_changes_as_seen() {
        let store = BookStore::from_books(shelf());
        let search = SearchTerm::new();
        let mut view = FilteredView::new(store.stream(Collection::Active), &search);

        store.create(Book::new("3", "Code Complete")).unwrap();
        search.set("code");
        assert_eq!(view.latest().len(), 2);

        let waited = tokio::time::timeout(std::time::Duration::from_millis(50), view.changed()).await;
        assert!(waited.is_err());
    }

    #[tokio::test]
    async fn archived_view_sees_archived_books() {
        let store = BookStore::from_books(shelf());
        let search = SearchTerm::new();
        let mut view = FilteredView::new(store.stream(Collection::Archived), &search);
        assert!(view.current().is_empty());

        store.archive("1").unwrap();
        let found = view.changed().await.unwrap();
        assert_eq!(found.len(), 1);
        assert!(found[0].is_archived());
    }
}
