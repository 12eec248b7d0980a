//! # Mutation Actions
//!
//! Every user-triggered change to the shelf goes through an [`ActionRunner`].
//! A dispatched action walks a fixed state machine:
//!
//! ```text
//!   Idle ──dispatch──► Pending (busy) ──latency──► Settled (store mutated,
//!                                                   notification sent,
//!                                                   busy cleared)
//! ```
//!
//! The latency stands in for the round trip a real storage call would take;
//! [`PendingAction`] is the handle such a call would return. There is no retry
//! and no cancellation. Actions dispatched back to back overlap, each on its
//! own timer, and reach the store in the order their timers fire.
//!
//! The runner does not refuse re-entry while busy. Callers gate their own
//! controls on [`BusyFlag`].

use crate::error::{Result, ShelfError};
use crate::model::Book;
use crate::store::BookStore;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

pub const DEFAULT_LATENCY: Duration = Duration::from_millis(1500);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    Success,
    Error,
}

/// User-facing feedback about a settled action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: MessageLevel,
    pub content: String,
}

impl Notification {
    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

/// A store change requested by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    Create(Book),
    Update(Book),
    Archive(String),
    Restore(String),
    PermanentlyDelete(String),
}

impl Mutation {
    pub fn name(&self) -> &'static str {
        match self {
            Mutation::Create(_) => "create",
            Mutation::Update(_) => "update",
            Mutation::Archive(_) => "archive",
            Mutation::Restore(_) => "restore",
            Mutation::PermanentlyDelete(_) => "permanently_delete",
        }
    }

    pub fn target_id(&self) -> &str {
        match self {
            Mutation::Create(book) | Mutation::Update(book) => &book.id,
            Mutation::Archive(id) | Mutation::Restore(id) | Mutation::PermanentlyDelete(id) => id,
        }
    }

    fn success_message(&self) -> &'static str {
        match self {
            Mutation::Create(_) => "New Book created successfully",
            Mutation::Update(_) => "Book updated successfully",
            Mutation::Archive(_) => "Book deleted successfully",
            Mutation::Restore(_) => "Book restored successfully",
            Mutation::PermanentlyDelete(_) => "Book permanently deleted",
        }
    }

    fn failure_message(&self, err: &ShelfError) -> String {
        let verb = match self {
            Mutation::Create(_) => "create",
            Mutation::Update(_) => "update",
            Mutation::Archive(_) => "delete",
            Mutation::Restore(_) => "restore",
            Mutation::PermanentlyDelete(_) => "permanently delete",
        };
        format!("Could not {} book: {}", verb, err)
    }

    pub fn apply(&self, store: &BookStore) -> Result<Book> {
        match self {
            Mutation::Create(book) => store.create(book.clone()),
            Mutation::Update(book) => store.update(book.clone()),
            Mutation::Archive(id) => store.archive(id),
            Mutation::Restore(id) => store.restore(id),
            Mutation::PermanentlyDelete(id) => store.permanently_delete(id),
        }
    }
}

/// Observes whether any action is in flight.
#[derive(Debug, Clone)]
pub struct BusyFlag {
    rx: watch::Receiver<usize>,
}

impl BusyFlag {
    pub fn is_busy(&self) -> bool {
        *self.rx.borrow() > 0
    }

    /// Waits for the next in-flight count change and returns the busy state.
    pub async fn changed(&mut self) -> Result<bool> {
        self.rx
            .changed()
            .await
            .map_err(|_| ShelfError::Task("action runner was dropped".to_string()))?;
        Ok(*self.rx.borrow_and_update() > 0)
    }
}

/// An action that has been dispatched but may not have settled yet.
#[derive(Debug)]
pub struct PendingAction {
    name: &'static str,
    handle: JoinHandle<Result<Book>>,
}

impl PendingAction {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is_settled(&self) -> bool {
        self.handle.is_finished()
    }

    /// Waits for the action to settle and returns the book it touched.
    pub async fn settled(self) -> Result<Book> {
        let name = self.name;
        self.handle
            .await
            .map_err(|e| ShelfError::Task(format!("{} did not settle: {}", name, e)))?
    }
}

/// Runs mutations against a store behind a latency boundary and a busy flag.
#[derive(Debug, Clone)]
pub struct ActionRunner {
    store: BookStore,
    latency: Duration,
    in_flight: Arc<watch::Sender<usize>>,
    notifications: mpsc::UnboundedSender<Notification>,
}

impl ActionRunner {
    /// Builds a runner together with the receiving end of its notifications.
    pub fn new(store: BookStore, latency: Duration) -> (Self, mpsc::UnboundedReceiver<Notification>) {
        let (in_flight, _) = watch::channel(0);
        let (notifications, rx) = mpsc::unbounded_channel();
        let runner = Self {
            store,
            latency,
            in_flight: Arc::new(in_flight),
            notifications,
        };
        (runner, rx)
    }

    pub fn store(&self) -> &BookStore {
        &self.store
    }

    pub fn latency(&self) -> Duration {
        self.latency
    }

    pub fn in_flight(&self) -> usize {
        *self.in_flight.borrow()
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight() > 0
    }

    pub fn busy_flag(&self) -> BusyFlag {
        BusyFlag {
            rx: self.in_flight.subscribe(),
        }
    }

    /// Starts `mutation`. The busy flag is raised before this returns.
    ///
    /// Must be called from within a tokio runtime.
    pub fn dispatch(&self, mutation: Mutation) -> PendingAction {
        self.in_flight.send_modify(|n| *n += 1);
        let name = mutation.name();
        debug!(action = name, id = mutation.target_id(), "action pending");

        let runner = self.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(runner.latency).await;

            let result = mutation.apply(&runner.store);
            match &result {
                Ok(book) => {
                    info!(action = name, id = %book.id, "action settled");
                    runner.notify(Notification::success(mutation.success_message()));
                }
                Err(e) => {
                    warn!(action = name, id = mutation.target_id(), error = %e, "action failed");
                    runner.notify(Notification::error(mutation.failure_message(e)));
                }
            }

            runner.in_flight.send_modify(|n| *n = n.saturating_sub(1));
            result
        });

        PendingAction { name, handle }
    }

    fn notify(&self, notification: Notification) {
        if self.notifications.send(notification).is_err() {
            debug!("notification dropped, nobody is listening");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::fixtures::StoreFixture;
    use tokio::time::advance;

    fn runner(store: &BookStore) -> (ActionRunner, mpsc::UnboundedReceiver<Notification>) {
        ActionRunner::new(store.clone(), DEFAULT_LATENCY)
    }

    fn ids(books: &[Book]) -> Vec<&str> {
        books.iter().map(|b| b.id.as_str()).collect()
    }

    #[tokio::test(start_paused = true)]
    async fn busy_until_the_mutation_settles() {
        let store = StoreFixture::new().with_books(3).store;
        let (runner, mut notes) = runner(&store);

        let pending = runner.dispatch(Mutation::Archive("2".into()));
        assert!(runner.is_busy());

        advance(Duration::from_millis(1000)).await;
        assert!(runner.is_busy());
        assert_eq!(store.active().len(), 3);
        assert!(!pending.is_settled());

        let archived = pending.settled().await.unwrap();
        assert_eq!(archived.id, "2");
        assert!(!runner.is_busy());
        assert_eq!(ids(&store.active()), vec!["1", "3"]);
        assert_eq!(
            notes.try_recv().unwrap(),
            Notification::success("Book deleted successfully")
        );
    }

    #[tokio::test(start_paused = true)]
    async fn overlapping_actions_both_apply() {
        let store = StoreFixture::new().with_books(3).store;
        let (runner, _notes) = runner(&store);

        let first = runner.dispatch(Mutation::Archive("1".into()));
        advance(Duration::from_millis(200)).await;
        let second = runner.dispatch(Mutation::Archive("3".into()));
        assert_eq!(runner.in_flight(), 2);

        first.settled().await.unwrap();
        assert!(runner.is_busy());
        second.settled().await.unwrap();
        assert!(!runner.is_busy());

        assert_eq!(ids(&store.active()), vec!["2"]);
        assert_eq!(ids(&store.archived()), vec!["1", "3"]);
    }

    #[tokio::test(start_paused = true)]
    async fn later_dispatch_with_shorter_timer_lands_first() {
        let store = StoreFixture::new().with_books(2).store;
        let (slow, _) = ActionRunner::new(store.clone(), Duration::from_millis(1500));
        let (fast, _) = ActionRunner::new(store.clone(), Duration::from_millis(100));

        let a = slow.dispatch(Mutation::Archive("1".into()));
        let b = fast.dispatch(Mutation::Archive("2".into()));
        b.settled().await.unwrap();
        a.settled().await.unwrap();

        assert!(store.active().is_empty());
        assert_eq!(ids(&store.archived()), vec!["2", "1"]);
    }

    #[tokio::test(start_paused = true)]
    async fn failures_clear_busy_and_report_an_error() {
        let store = StoreFixture::new().with_books(1).store;
        let (runner, mut notes) = runner(&store);

        let result = runner
            .dispatch(Mutation::Restore("1".into()))
            .settled()
            .await;

        assert!(matches!(result, Err(ShelfError::NotFound(_))));
        assert!(!runner.is_busy());
        let note = notes.try_recv().unwrap();
        assert_eq!(note.level, MessageLevel::Error);
        assert!(note.content.starts_with("Could not restore book"));
    }

    #[tokio::test(start_paused = true)]
    async fn busy_flag_reports_transitions() {
        let store = StoreFixture::new().with_books(1).store;
        let (runner, _notes) = runner(&store);
        let mut flag = runner.busy_flag();

        let pending = runner.dispatch(Mutation::Update(Book::new("1", "Renamed")));
        assert!(flag.changed().await.unwrap());
        assert!(!flag.changed().await.unwrap());

        assert_eq!(pending.settled().await.unwrap().name, "Renamed");
    }

    #[tokio::test(start_paused = true)]
    async fn every_mutation_kind_announces_itself() {
        let store = StoreFixture::new().with_books(1).store;
        let (runner, mut notes) = runner(&store);

        let script = vec![
            Mutation::Create(Book::new("2", "Refactoring")),
            Mutation::Update(Book::new("2", "Refactoring, 2nd ed.")),
            Mutation::Archive("2".into()),
            Mutation::Restore("2".into()),
            Mutation::Archive("2".into()),
            Mutation::PermanentlyDelete("2".into()),
        ];
        for mutation in script {
            runner.dispatch(mutation).settled().await.unwrap();
        }

        let mut seen = Vec::new();
        while let Ok(note) = notes.try_recv() {
            seen.push(note.content);
        }
        assert_eq!(
            seen,
            vec![
                "New Book created successfully",
                "Book updated successfully",
                "Book deleted successfully",
                "Book restored successfully",
                "Book deleted successfully",
                "Book permanently deleted",
            ]
        );
        assert!(!store.contains("2"));
    }
}
