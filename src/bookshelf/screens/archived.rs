use super::{with_paging, Pane};
use crate::actions::{ActionRunner, Mutation};
use crate::config::ShelfConfig;
use crate::error::Result;
use crate::model::{Book, Collection};
use crate::table::{CellValue, Column, RowAction, SortDirection, TableConfig, TableEngine, TableView};
use tracing::debug;

fn columns() -> Vec<Column<Book>> {
    vec![
        Column::new("id", "ID"),
        Column::new("name", "Name"),
        Column::new("archivedAt", "Archived At")
            .with_accessor(|book: &Book| CellValue::from(book.archived_at)),
    ]
}

fn table_config() -> TableConfig {
    TableConfig {
        show_edit_button: Some(true),
        show_delete_button: Some(true),
        edit_label: Some("Restore".to_string()),
        delete_label: Some("Delete".to_string()),
        edit_icon: Some("restore".to_string()),
        delete_icon: Some("delete_forever".to_string()),
        sort_column: Some("archivedAt".to_string()),
        sort_direction: Some(SortDirection::Desc),
        item_id_key: Some("id".to_string()),
        empty_message: Some("No archived books available".to_string()),
        no_search_results_message: Some(
            "No archived books found matching your search".to_string(),
        ),
        ..TableConfig::default()
    }
}

/// Archived books, most recently archived first.
///
/// The table's edit button restores a book; its delete button removes the
/// book for good once confirmed.
pub struct ArchivedScreen {
    pane: Pane,
}

impl ArchivedScreen {
    pub fn new(runner: ActionRunner, config: &ShelfConfig) -> Self {
        Self {
            pane: Pane::new(
                runner,
                Collection::Archived,
                columns(),
                with_paging(table_config(), config),
            ),
        }
    }

    pub fn table(&self) -> &TableEngine<Book> {
        self.pane.table()
    }

    pub fn table_mut(&mut self) -> &mut TableEngine<Book> {
        self.pane.table_mut()
    }

    pub fn search_term(&self) -> String {
        self.pane.search_term()
    }

    pub fn search(&mut self, term: &str) {
        self.pane.set_search(term, None);
    }

    pub fn render(&self) -> TableView<Book> {
        self.pane.render()
    }

    pub fn refresh(&mut self) {
        self.pane.refresh(None);
    }

    pub async fn next_change(&mut self) -> Result<()> {
        self.pane.next_change(None).await
    }

    pub async fn restore(&mut self, book: &Book) -> Result<Book> {
        let result = self.pane.run(Mutation::Restore(book.id.clone())).await;
        self.refresh();
        result
    }

    /// Removes `book` for good. Returns `None` and leaves the store alone
    /// unless `confirmed`.
    pub async fn delete_permanently(&mut self, book: &Book, confirmed: bool) -> Result<Option<Book>> {
        if !confirmed {
            debug!(id = %book.id, "permanent delete not confirmed");
            return Ok(None);
        }
        let result = self
            .pane
            .run(Mutation::PermanentlyDelete(book.id.clone()))
            .await;
        self.refresh();
        result.map(Some)
    }

    /// Presses the restore button of the row at `position` on the current page.
    pub async fn press_restore(&mut self, position: usize) -> Result<Book> {
        let book = self.pane.table().edit_row(position)?;
        self.pane.drain_actions();
        self.restore(&book).await
    }

    /// Presses the delete button of the row at `position` on the current page.
    pub async fn press_delete(&mut self, position: usize, confirmed: bool) -> Result<Option<Book>> {
        let book = self.pane.table().delete_row(position)?;
        let mut deleted = None;
        for action in self.pane.drain_actions() {
            if let RowAction::Delete(item) = action {
                deleted = self.delete_permanently(&item, confirmed).await?;
            }
        }
        debug!(id = %book.id, deleted = deleted.is_some(), "archived row delete pressed");
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ShelfError;
    use crate::store::memory::fixtures::StoreFixture;
    use crate::store::BookStore;
    use crate::table::EmptyKind;
    use chrono::{TimeZone, Utc};
    use std::time::Duration;

    fn archived_screen(store: &BookStore) -> ArchivedScreen {
        let (runner, _) = ActionRunner::new(store.clone(), Duration::from_millis(1500));
        ArchivedScreen::new(runner, &ShelfConfig::default())
    }

    #[test]
    fn newest_archive_first_by_instant() {
        let at = |m, d| Utc.with_ymd_and_hms(2024, m, d, 12, 0, 0).unwrap();
        let mut table = TableEngine::new()
            .with_columns(columns())
            .with_config(table_config());
        table.set_data(vec![
            Book::new("1", "Clean Code").archived(at(2, 1)),
            Book::new("2", "Refactoring").archived(at(10, 1)),
            Book::new("3", "Accelerate").archived(at(9, 15)),
        ]);
        let view = table.render();

        let ids: Vec<&str> = view.rows.iter().map(|r| r.item.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "3", "1"]);
        assert_eq!(view.headers[2].label, "Archived At");
        assert_eq!(view.headers[2].sort, Some(SortDirection::Desc));

        let actions = view.actions.unwrap();
        assert_eq!(actions.edit.unwrap().label, "Restore");
        assert_eq!(actions.delete.unwrap().icon, "delete_forever");
    }

    #[tokio::test]
    async fn empty_archive_messages() {
        let store = StoreFixture::new()
            .with_books(1)
            .with_archived("9", "Refactoring")
            .store;
        let mut screen = archived_screen(&store);
        assert!(screen.render().empty.is_none());

        screen.search("code complete");
        let empty = screen.render().empty.unwrap();
        assert_eq!(empty.kind, EmptyKind::NoSearchResults);
        assert_eq!(empty.message, "No archived books found matching your search");

        let bare = archived_screen(&BookStore::new());
        assert_eq!(bare.render().empty.unwrap().message, "No archived books available");
    }

    #[tokio::test(start_paused = true)]
    async fn restore_moves_the_book_back() {
        let store = StoreFixture::new().with_archived("4", "Refactoring").store;
        let mut screen = archived_screen(&store);

        let restored = screen.press_restore(0).await.unwrap();
        assert!(!restored.is_archived());
        assert_eq!(store.active()[0].id, "4");
        assert!(screen.render().rows.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn permanent_delete_needs_confirmation() {
        let store = StoreFixture::new().with_archived("4", "Refactoring").store;
        let mut screen = archived_screen(&store);
        let version = store.snapshot().version;

        assert_eq!(screen.press_delete(0, false).await.unwrap(), None);
        assert_eq!(store.snapshot().version, version);
        assert!(!screen.table().is_loading());

        let deleted = screen.press_delete(0, true).await.unwrap().unwrap();
        assert_eq!(deleted.id, "4");
        assert!(!store.contains("4"));
    }

    #[tokio::test(start_paused = true)]
    async fn deleting_a_vanished_book_reports_not_found() {
        let store = StoreFixture::new().with_archived("4", "Refactoring").store;
        let mut screen = archived_screen(&store);
        let book = store.archived()[0].clone();
        store.permanently_delete("4").unwrap();

        let result = screen.delete_permanently(&book, true).await;
        assert!(matches!(result, Err(ShelfError::NotFound(_))));
    }
}
