use super::{with_paging, BookForm, Pane};
use crate::actions::{ActionRunner, Mutation};
use crate::config::ShelfConfig;
use crate::error::{Result, ShelfError};
use crate::model::{Book, Collection};
use crate::table::{Column, RowAction, SortDirection, TableConfig, TableEngine, TableView};
use tracing::debug;

fn columns() -> Vec<Column<Book>> {
    vec![Column::new("id", "ID"), Column::new("name", "Name")]
}

fn table_config() -> TableConfig {
    TableConfig {
        show_edit_button: Some(true),
        show_delete_button: Some(true),
        sort_column: Some("name".to_string()),
        sort_direction: Some(SortDirection::Asc),
        item_id_key: Some("id".to_string()),
        empty_message: Some("No books available".to_string()),
        no_search_results_message: Some("No books found matching your search".to_string()),
        ..TableConfig::default()
    }
}

/// Active books: searchable table plus the create/edit form.
pub struct BooksScreen {
    pane: Pane,
    selected: Option<Book>,
    form: BookForm,
}

impl BooksScreen {
    pub fn new(runner: ActionRunner, config: &ShelfConfig) -> Self {
        let pane = Pane::new(
            runner,
            Collection::Active,
            columns(),
            with_paging(table_config(), config),
        );
        let mut screen = Self {
            pane,
            selected: None,
            form: BookForm::default(),
        };
        screen.form.reset(screen.next_id());
        screen
    }

    pub fn selected(&self) -> Option<&Book> {
        self.selected.as_ref()
    }

    pub fn form(&self) -> &BookForm {
        &self.form
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.form.set_name(name);
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
        self.pane.set_search(term, self.selected.as_ref());
    }

    pub fn render(&self) -> TableView<Book> {
        self.pane.render()
    }

    pub fn refresh(&mut self) {
        self.pane.refresh(self.selected.as_ref());
        if !self.form.is_editing() {
            let next = self.next_id();
            if self.form.id() != next {
                let name = self.form.name().to_string();
                self.form.reset(next);
                self.form.set_name(name);
            }
        }
    }

    /// Waits for the shelf or the search to change, then refreshes.
    pub async fn next_change(&mut self) -> Result<()> {
        self.pane.next_change(self.selected.as_ref()).await?;
        self.refresh();
        Ok(())
    }

    /// One past the highest numeric id among active books.
    ///
    /// Ids that are not numbers are skipped. An empty shelf starts at "1".
    pub fn next_id(&self) -> String {
        self.pane
            .runner()
            .store()
            .active()
            .iter()
            .filter_map(|b| b.id.trim().parse::<u64>().ok())
            .max()
            // Widened so the successor of u64::MAX still fits
            .map_or(1, |n| u128::from(n) + 1)
            .to_string()
    }

    /// Puts `book` into the form for editing and highlights its row.
    pub fn select(&mut self, book: &Book) {
        self.selected = Some(book.clone());
        self.form.patch(book);
        self.pane.refresh(self.selected.as_ref());
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
        self.form.reset(self.next_id());
        self.pane.refresh(None);
    }

    /// Saves the form: an update while a book is selected, a create otherwise.
    ///
    /// The selection is cleared once the save settles. A failed save keeps the
    /// form as it was.
    pub async fn submit(&mut self) -> Result<Book> {
        let book = self.form.validate()?;
        let mutation = match &self.selected {
            Some(selected) => Mutation::Update(Book {
                id: selected.id.clone(),
                ..book
            }),
            None => Mutation::Create(book),
        };
        debug!(action = mutation.name(), id = mutation.target_id(), "form submitted");

        let result = self.pane.run(mutation).await;
        if result.is_ok() {
            self.selected = None;
            self.form.reset(self.next_id());
        }
        self.refresh();
        result
    }

    /// Moves `book` to the archive.
    pub async fn archive(&mut self, book: &Book) -> Result<Book> {
        let result = self.pane.run(Mutation::Archive(book.id.clone())).await;
        if result.is_ok() && self.selected.as_ref().is_some_and(|s| s.id == book.id) {
            self.selected = None;
            self.form.reset(self.next_id());
        }
        self.refresh();
        result
    }

    /// Presses the edit button of the row at `position` on the current page.
    pub fn press_edit(&mut self, position: usize) -> Result<Book> {
        let book = self.pane.table().edit_row(position)?;
        self.handle_row_actions();
        Ok(book)
    }

    /// Presses the delete button of the row at `position`, archiving its book.
    pub async fn press_delete(&mut self, position: usize) -> Result<Book> {
        self.pane.table().delete_row(position)?;
        let mut archived = None;
        for action in self.pane.drain_actions() {
            match action {
                RowAction::Edit(book) => self.select(&book),
                RowAction::Delete(book) => archived = Some(self.archive(&book).await?),
            }
        }
        archived.ok_or_else(|| ShelfError::Task("row action was lost".to_string()))
    }

    fn handle_row_actions(&mut self) {
        for action in self.pane.drain_actions() {
            match action {
                RowAction::Edit(book) => self.select(&book),
                RowAction::Delete(book) => debug!(id = %book.id, "delete left for the caller"),
            }
        }
    }
}
