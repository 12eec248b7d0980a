//! # API Facade
//!
//! [`ShelfApi`] is the single entry point for a UI. It owns the store, the
//! action runner and both screens, and keeps track of which tab is showing.
//!
//! ## What the API Does NOT Do
//!
//! - **Business logic**: that lives in the store, the actions and the screens
//! - **I/O**: no stdout, stderr or terminal assumptions
//! - **Navigation**: the current [`Tab`] is reported, never acted upon
//!
//! Notifications from settled actions queue up until the UI drains them.

use crate::actions::{ActionRunner, BusyFlag, Notification};
use crate::config::ShelfConfig;
use crate::screens::{ArchivedScreen, BooksScreen, Tab};
use crate::store::BookStore;
use tokio::sync::mpsc;

pub struct ShelfApi {
    config: ShelfConfig,
    runner: ActionRunner,
    notifications: mpsc::UnboundedReceiver<Notification>,
    books: BooksScreen,
    archived: ArchivedScreen,
    tab: Tab,
}

impl ShelfApi {
    /// A fresh shelf, seeded with the default books unless the config says otherwise.
    pub fn new(config: ShelfConfig) -> Self {
        let store = if config.seed {
            BookStore::seeded()
        } else {
            BookStore::new()
        };
        Self::with_store(store, config)
    }

    pub fn with_store(store: BookStore, config: ShelfConfig) -> Self {
        let (runner, notifications) = ActionRunner::new(store, config.latency());
        let books = BooksScreen::new(runner.clone(), &config);
        let archived = ArchivedScreen::new(runner.clone(), &config);
        Self {
            config,
            runner,
            notifications,
            books,
            archived,
            tab: Tab::default(),
        }
    }

    pub fn config(&self) -> &ShelfConfig {
        &self.config
    }

    pub fn store(&self) -> &BookStore {
        self.runner.store()
    }

    pub fn runner(&self) -> &ActionRunner {
        &self.runner
    }

    pub fn books(&self) -> &BooksScreen {
        &self.books
    }

    pub fn books_mut(&mut self) -> &mut BooksScreen {
        &mut self.books
    }

    pub fn archived(&self) -> &ArchivedScreen {
        &self.archived
    }

    pub fn archived_mut(&mut self) -> &mut ArchivedScreen {
        &mut self.archived
    }

    pub fn tab(&self) -> Tab {
        self.tab
    }

    pub fn set_tab(&mut self, tab: Tab) {
        self.tab = tab;
        self.refresh();
    }

    /// Follows a route path to its tab.
    pub fn navigate(&mut self, path: &str) -> Tab {
        self.set_tab(Tab::from_path(path));
        self.tab
    }

    pub fn is_busy(&self) -> bool {
        self.runner.is_busy()
    }

    pub fn busy_flag(&self) -> BusyFlag {
        self.runner.busy_flag()
    }

    /// Notifications from actions settled since the last call, oldest first.
    pub fn drain_notifications(&mut self) -> Vec<Notification> {
        let mut drained = Vec::new();
        while let Ok(note) = self.notifications.try_recv() {
            drained.push(note);
        }
        drained
    }

    /// Brings both screens up to date with the store.
    pub fn refresh(&mut self) {
        self.books.refresh();
        self.archived.refresh();
    }
}
