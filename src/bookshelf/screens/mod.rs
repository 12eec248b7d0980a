//! # Screens
//!
//! The two consuming views of the shelf, written without any UI assumptions:
//!
//! - [`books::BooksScreen`]: active books, with the create/edit form.
//! - [`archived::ArchivedScreen`]: archived books, restore and permanent delete.
//!
//! Both are built on a [`Pane`]: one store collection run through a
//! [`FilteredView`] into a [`TableEngine`]. A screen declares its columns and
//! table configuration; the pane keeps the table fed.
//!
//! Which screen is showing is a [`Tab`]. The library reports the current tab;
//! navigating between them is left to the UI.

use crate::actions::{ActionRunner, Mutation};
use crate::config::ShelfConfig;
use crate::error::Result;
use crate::model::{Book, Collection};
use crate::table::{Column, RowAction, TableConfig, TableEngine, TableView};
use crate::view::{FilteredView, SearchTerm};
use tokio::sync::mpsc;

pub mod archived;
pub mod books;
pub mod form;

pub use archived::ArchivedScreen;
pub use books::BooksScreen;
pub use form::BookForm;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Tab {
    #[default]
    Books,
    Archived,
}

impl Tab {
    /// The tab a route path belongs to.
    pub fn from_path(path: &str) -> Self {
        if path.contains("/archived") {
            Tab::Archived
        } else {
            Tab::Books
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            Tab::Books => "/books",
            Tab::Archived => "/books/archived",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Tab::Books => "Books",
            Tab::Archived => "Archived",
        }
    }

    pub fn collection(&self) -> Collection {
        match self {
            Tab::Books => Collection::Active,
            Tab::Archived => Collection::Archived,
        }
    }
}

/// One collection, searched and laid out as a table.
pub struct Pane {
    runner: ActionRunner,
    search: SearchTerm,
    view: FilteredView,
    table: TableEngine<Book>,
    actions: mpsc::UnboundedReceiver<RowAction<Book>>,
}

impl Pane {
    pub fn new(
        runner: ActionRunner,
        collection: Collection,
        columns: Vec<Column<Book>>,
        table_config: TableConfig,
    ) -> Self {
        let search = SearchTerm::new();
        let view = FilteredView::new(runner.store().stream(collection), &search);
        let mut table = TableEngine::new()
            .with_columns(columns)
            .with_config(table_config);
        let actions = table
            .take_actions()
            .unwrap_or_else(|| mpsc::unbounded_channel().1);

        let mut pane = Self {
            runner,
            search,
            view,
            table,
            actions,
        };
        pane.refresh(None);
        pane
    }

    pub fn runner(&self) -> &ActionRunner {
        &self.runner
    }

    pub fn search_term(&self) -> String {
        self.search.get()
    }

    pub fn table(&self) -> &TableEngine<Book> {
        &self.table
    }

    pub fn table_mut(&mut self) -> &mut TableEngine<Book> {
        &mut self.table
    }

    /// Unfiltered size of the collection.
    pub fn total(&self) -> usize {
        self.view.total()
    }

    pub fn set_search(&mut self, term: &str, selected: Option<&Book>) {
        self.search.set(term);
        self.refresh(selected);
    }

    /// Feeds the latest filtered books, counts, selection and busy state to the table.
    pub fn refresh(&mut self, selected: Option<&Book>) {
        self.table.set_total_count(self.view.total());
        self.table.set_data(self.view.latest());
        self.table.set_selected(selected.cloned());
        self.table.set_loading(self.runner.is_busy());
    }

    /// Waits for the collection or the search to change, then refreshes.
    pub async fn next_change(&mut self, selected: Option<&Book>) -> Result<()> {
        self.view.changed().await?;
        self.refresh(selected);
        Ok(())
    }

    pub fn render(&self) -> TableView<Book> {
        self.table.render()
    }

    /// Runs `mutation` to completion with the table showing as loading.
    pub async fn run(&mut self, mutation: Mutation) -> Result<Book> {
        let pending = self.runner.dispatch(mutation);
        self.table.set_loading(true);
        pending.settled().await
    }

    /// Row actions emitted by the table since the last call.
    pub fn drain_actions(&mut self) -> Vec<RowAction<Book>> {
        let mut drained = Vec::new();
        while let Ok(action) = self.actions.try_recv() {
            drained.push(action);
        }
        drained
    }
}

/// Columns and page sizes from the shelf configuration applied to a screen's table.
pub(crate) fn with_paging(mut table_config: TableConfig, config: &ShelfConfig) -> TableConfig {
    table_config.page_size = Some(config.page_size);
    table_config.page_size_options = Some(config.page_size_options.clone());
    table_config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tab_follows_route_path() {
        assert_eq!(Tab::from_path("/books"), Tab::Books);
        assert_eq!(Tab::from_path("/books/archived"), Tab::Archived);
        assert_eq!(Tab::from_path("/books/archived?x=1"), Tab::Archived);
    }

    #[test]
    fn tab_paths_round_trip() {
        for tab in [Tab::Books, Tab::Archived] {
            assert_eq!(Tab::from_path(tab.path()), tab);
        }
        assert_eq!(Tab::Archived.collection(), Collection::Archived);
    }
}
