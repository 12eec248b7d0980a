use super::{
    ActionButton, ActionButtons, CellValue, Column, EffectiveConfig, EmptyKind, EmptyState,
    HeaderCell, PageInfo, Paginator, RenderedRow, SortDirection, TableConfig, TableRow, TableView,
};
use crate::error::{Result, ShelfError};
use tokio::sync::mpsc;
use tracing::trace;

/// A row button press, carrying the item the row displays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowAction<T> {
    Edit(T),
    Delete(T),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortState {
    pub column: String,
    pub direction: SortDirection,
}

/// Sorts, paginates and projects items for display.
pub struct TableEngine<T> {
    columns: Vec<Column<T>>,
    config: TableConfig,
    effective: EffectiveConfig,
    data: Vec<T>,
    // Display order as indexes into `data`
    order: Vec<usize>,
    total_count: usize,
    selected: Option<T>,
    loading: bool,
    sort: Option<SortState>,
    paginator: Paginator,
    actions_tx: mpsc::UnboundedSender<RowAction<T>>,
    actions_rx: Option<mpsc::UnboundedReceiver<RowAction<T>>>,
}

impl<T: TableRow + Clone + PartialEq> Default for TableEngine<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: TableRow + Clone + PartialEq> TableEngine<T> {
    pub fn new() -> Self {
        let effective = EffectiveConfig::default();
        let (actions_tx, actions_rx) = mpsc::unbounded_channel();
        Self {
            columns: Vec::new(),
            config: TableConfig::default(),
            paginator: Paginator::new(effective.page_size),
            effective,
            data: Vec::new(),
            order: Vec::new(),
            total_count: 0,
            selected: None,
            loading: false,
            sort: None,
            actions_tx,
            actions_rx: Some(actions_rx),
        }
    }

    pub fn with_columns(mut self, columns: Vec<Column<T>>) -> Self {
        self.set_columns(columns);
        self
    }

    pub fn with_config(mut self, config: TableConfig) -> Self {
        self.set_config(config);
        self
    }

    /// Hands out the row action receiver. Only the first call returns it.
    pub fn take_actions(&mut self) -> Option<mpsc::UnboundedReceiver<RowAction<T>>> {
        self.actions_rx.take()
    }

    // --- Inputs ---

    pub fn set_columns(&mut self, columns: Vec<Column<T>>) {
        self.columns = columns;
        let still_valid = self
            .sort
            .as_ref()
            .is_some_and(|s| self.is_sortable_key(&s.column));
        if !still_valid {
            self.sort = self.initial_sort();
        }
        self.recompute();
    }

    /// Replaces the caller configuration and re-derives the effective one.
    ///
    /// Page size and sort go back to what the new configuration asks for.
    pub fn set_config(&mut self, config: TableConfig) {
        self.effective = config.effective();
        self.config = config;
        self.paginator.set_page_size(self.effective.page_size);
        self.sort = self.initial_sort();
        self.recompute();
    }

    pub fn set_data(&mut self, data: Vec<T>) {
        self.data = data;
        self.recompute();
    }

    /// Size of the data before any search filtering.
    pub fn set_total_count(&mut self, total: usize) {
        self.total_count = total;
    }

    pub fn set_selected(&mut self, selected: Option<T>) {
        self.selected = selected;
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    // --- Accessors ---

    pub fn columns(&self) -> &[Column<T>] {
        &self.columns
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    pub fn effective_config(&self) -> &EffectiveConfig {
        &self.effective
    }

    pub fn data(&self) -> &[T] {
        &self.data
    }

    pub fn sort(&self) -> Option<&SortState> {
        self.sort.as_ref()
    }

    pub fn paginator(&self) -> &Paginator {
        &self.paginator
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn column(&self, key: &str) -> Option<&Column<T>> {
        self.columns.iter().find(|c| c.key == key)
    }

    /// The value shown in (and sorted on for) `column` of `item`.
    pub fn cell_value(&self, item: &T, column: &Column<T>) -> CellValue {
        column.value(item)
    }

    fn value_by_key(&self, item: &T, key: &str) -> CellValue {
        match self.column(key) {
            Some(column) => column.value(item),
            None => item.field(key).unwrap_or_default(),
        }
    }

    // --- Sorting ---

    /// Both the table and the column must allow sorting.
    pub fn is_column_sortable(&self, column: &Column<T>) -> bool {
        self.effective.sortable && column.sortable
    }

    fn is_sortable_key(&self, key: &str) -> bool {
        self.column(key)
            .is_some_and(|column| self.is_column_sortable(column))
    }

    fn initial_sort(&self) -> Option<SortState> {
        let column = self.effective.sort_column.clone()?;
        self.is_sortable_key(&column).then(|| SortState {
            column,
            direction: self.effective.sort_direction,
        })
    }

    /// Sorts by `key`, flipping the direction when it is already the sort column.
    pub fn sort_by(&mut self, key: &str) -> Result<SortState> {
        let direction = match &self.sort {
            Some(current) if current.column == key => current.direction.toggled(),
            _ => SortDirection::Asc,
        };
        self.set_sort(key, direction)
    }

    pub fn set_sort(&mut self, key: &str, direction: SortDirection) -> Result<SortState> {
        if !self.is_sortable_key(key) {
            return Err(ShelfError::UnsortableColumn(key.to_string()));
        }
        let state = SortState {
            column: key.to_string(),
            direction,
        };
        self.sort = Some(state.clone());
        self.recompute();
        Ok(state)
    }

    pub fn clear_sort(&mut self) {
        self.sort = None;
        self.recompute();
    }

    fn recompute(&mut self) {
        let mut order: Vec<usize> = (0..self.data.len()).collect();

        if let Some(sort) = &self.sort {
            if let Some(column) = self.column(&sort.column) {
                let keys: Vec<CellValue> = self.data.iter().map(|item| column.value(item)).collect();
                order.sort_by(|a, b| {
                    let ord = keys[*a].sort_cmp(&keys[*b]);
                    match sort.direction {
                        SortDirection::Asc => ord,
                        SortDirection::Desc => ord.reverse(),
                    }
                });
            }
        }

        self.order = order;
        self.paginator.set_length(self.data.len());
        trace!(
            rows = self.data.len(),
            page = self.paginator.page_index(),
            "table recomputed"
        );
    }

    // --- Pagination ---

    /// Switches to one of the offered page sizes, keeping the first visible item in view.
    pub fn set_page_size(&mut self, page_size: usize) -> Result<()> {
        if !self.effective.page_size_options.contains(&page_size) {
            let offered: Vec<String> = self
                .effective
                .page_size_options
                .iter()
                .map(|n| n.to_string())
                .collect();
            return Err(ShelfError::ValidationFailed(format!(
                "Page size must be one of {}",
                offered.join(", ")
            )));
        }
        self.paginator.set_page_size(page_size);
        Ok(())
    }

    pub fn next_page(&mut self) -> bool {
        self.paginator.next()
    }

    pub fn previous_page(&mut self) -> bool {
        self.paginator.previous()
    }

    pub fn first_page(&mut self) -> bool {
        self.paginator.first()
    }

    pub fn last_page(&mut self) -> bool {
        self.paginator.last()
    }

    pub fn go_to_page(&mut self, index: usize) -> bool {
        self.paginator.go_to(index)
    }

    /// Items on the current page, in display order.
    pub fn page_items(&self) -> impl Iterator<Item = &T> + '_ {
        self.order[self.paginator.range()]
            .iter()
            .map(move |i| &self.data[*i])
    }

    /// The item at `position` on the current page.
    pub fn row_at(&self, position: usize) -> Option<&T> {
        let range = self.paginator.range();
        let idx = range.start.checked_add(position)?;
        if idx >= range.end {
            return None;
        }
        self.order.get(idx).and_then(|i| self.data.get(*i))
    }

    // --- Row actions ---

    pub fn edit_row(&self, position: usize) -> Result<T> {
        if !self.effective.show_edit_button {
            return Err(ShelfError::ValidationFailed(format!(
                "{} is not available",
                self.effective.edit_label
            )));
        }
        let item = self.item_for_action(position)?;
        self.emit(RowAction::Edit(item.clone()));
        Ok(item)
    }

    pub fn delete_row(&self, position: usize) -> Result<T> {
        if !self.effective.show_delete_button {
            return Err(ShelfError::ValidationFailed(format!(
                "{} is not available",
                self.effective.delete_label
            )));
        }
        let item = self.item_for_action(position)?;
        self.emit(RowAction::Delete(item.clone()));
        Ok(item)
    }

    fn item_for_action(&self, position: usize) -> Result<T> {
        self.row_at(position)
            .cloned()
            .ok_or_else(|| ShelfError::NotFound(format!("row {}", position + 1)))
    }

    fn emit(&self, action: RowAction<T>) {
        if self.actions_tx.send(action).is_err() {
            trace!("row action dropped, nobody is listening");
        }
    }

    // --- Presentation ---

    /// Whether `item` is the selected row.
    ///
    /// With an `item_id_key` the two items match when that column resolves to
    /// the same value; otherwise they match when equal or sharing a row id.
    pub fn is_selected(&self, item: &T) -> bool {
        let Some(selected) = &self.selected else {
            return false;
        };
        match &self.effective.item_id_key {
            Some(key) => self.value_by_key(item, key) == self.value_by_key(selected, key),
            None => {
                item == selected
                    || matches!((item.row_id(), selected.row_id()), (Some(a), Some(b)) if a == b)
            }
        }
    }

    pub fn empty_state(&self) -> Option<EmptyState> {
        if !self.data.is_empty() {
            return None;
        }
        Some(if self.total_count > 0 {
            EmptyState {
                kind: EmptyKind::NoSearchResults,
                message: self.effective.no_search_results_message.clone(),
            }
        } else {
            EmptyState {
                kind: EmptyKind::NoData,
                message: self.effective.empty_message.clone(),
            }
        })
    }

    pub fn render(&self) -> TableView<T> {
        let headers = self
            .columns
            .iter()
            .map(|column| HeaderCell {
                key: column.key.clone(),
                label: column.label.clone(),
                sortable: self.is_column_sortable(column),
                sort: self
                    .sort
                    .as_ref()
                    .filter(|s| s.column == column.key)
                    .map(|s| s.direction),
            })
            .collect();

        let rows = self
            .page_items()
            .enumerate()
            .map(|(position, item)| RenderedRow {
                position,
                item: item.clone(),
                cells: self
                    .columns
                    .iter()
                    .map(|column| self.cell_value(item, column).to_string())
                    .collect(),
                selected: self.is_selected(item),
            })
            .collect();

        let range = self.paginator.range();
        let page = PageInfo {
            index: self.paginator.page_index(),
            size: self.paginator.page_size(),
            size_options: self.effective.page_size_options.clone(),
            page_count: self.paginator.page_count(),
            length: self.paginator.length(),
            first_row: if range.is_empty() { 0 } else { range.start + 1 },
            last_row: range.end,
        };

        let actions = self.effective.shows_actions().then(|| ActionButtons {
            edit: self.effective.show_edit_button.then(|| ActionButton {
                label: self.effective.edit_label.clone(),
                icon: self.effective.edit_icon.clone(),
            }),
            delete: self.effective.show_delete_button.then(|| ActionButton {
                label: self.effective.delete_label.clone(),
                icon: self.effective.delete_icon.clone(),
            }),
        });

        TableView {
            headers,
            rows,
            page,
            actions,
            empty: self.empty_state(),
            loading: self.loading,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Book;
    use chrono::{TimeZone, Utc};

    fn books(n: usize) -> Vec<Book> {
        (1..=n)
            .map(|i| Book::new(i.to_string(), format!("Book {:02}", i)))
            .collect()
    }

    fn columns() -> Vec<Column<Book>> {
        vec![Column::new("id", "ID"), Column::new("name", "Name")]
    }

    fn actions_config() -> TableConfig {
        TableConfig {
            show_edit_button: Some(true),
            show_delete_button: Some(true),
            ..Default::default()
        }
    }

    fn engine(data: Vec<Book>) -> TableEngine<Book> {
        let mut engine = TableEngine::new()
            .with_columns(columns())
            .with_config(actions_config());
        engine.set_total_count(data.len());
        engine.set_data(data);
        engine
    }

    fn page_names(engine: &TableEngine<Book>) -> Vec<String> {
        engine.page_items().map(|b| b.name.clone()).collect()
    }

    #[test]
    fn default_sort_is_name_ascending_case_insensitive() {
        let engine = engine(vec![
            Book::new("1", "banana"),
            Book::new("2", "Apple"),
            Book::new("3", "cherry"),
        ]);
        assert_eq!(
            engine.sort(),
            Some(&SortState {
                column: "name".into(),
                direction: SortDirection::Asc
            })
        );
        assert_eq!(page_names(&engine), vec!["Apple", "banana", "cherry"]);
    }

    #[test]
    fn sort_by_toggles_direction_on_same_column() {
        let mut engine = engine(books(3));
        assert_eq!(
            engine.sort_by("name").unwrap().direction,
            SortDirection::Desc
        );
        assert_eq!(page_names(&engine), vec!["Book 03", "Book 02", "Book 01"]);

        assert_eq!(engine.sort_by("id").unwrap().direction, SortDirection::Asc);
    }

    #[test]
    fn column_can_opt_out_of_sorting() {
        let mut engine = engine(books(3));
        engine.set_columns(vec![
            Column::new("id", "ID").sortable(false),
            Column::new("name", "Name"),
        ]);
        assert!(matches!(
            engine.sort_by("id"),
            Err(ShelfError::UnsortableColumn(_))
        ));
        assert!(engine.sort_by("name").is_ok());
    }

    #[test]
    fn table_level_flag_disables_every_column() {
        let mut engine = engine(books(3));
        engine.set_config(TableConfig {
            sortable: Some(false),
            ..actions_config()
        });
        assert!(engine.sort().is_none());
        assert!(engine.sort_by("name").is_err());
        assert!(engine.render().headers.iter().all(|h| !h.sortable));
    }

    #[test]
    fn unknown_column_cannot_be_sorted() {
        let mut engine = engine(books(2));
        assert!(matches!(
            engine.set_sort("author", SortDirection::Asc),
            Err(ShelfError::UnsortableColumn(key)) if key == "author"
        ));
    }

    #[test]
    fn date_accessor_sorts_by_instant() {
        let feb = Utc.with_ymd_and_hms(2024, 2, 1, 12, 0, 0).unwrap();
        let oct = Utc.with_ymd_and_hms(2024, 10, 1, 12, 0, 0).unwrap();
        let data = vec![
            Book::new("1", "October").archived(oct),
            Book::new("2", "February").archived(feb),
        ];

        let mut engine = TableEngine::new().with_columns(vec![
            Column::new("name", "Name"),
            Column::new("archivedAt", "Archived At")
                .with_accessor(|b: &Book| CellValue::from(b.archived_at)),
        ]);
        engine.set_data(data);
        engine.set_sort("archivedAt", SortDirection::Asc).unwrap();

        assert_eq!(page_names(&engine), vec!["February", "October"]);
        let rendered = engine.render();
        assert_eq!(rendered.rows[0].cells[1], CellValue::Timestamp(feb).to_string());
    }

    #[test]
    fn display_and_sort_use_the_same_value() {
        let mut engine = TableEngine::new().with_columns(vec![Column::new("name", "Name")
            .with_accessor(|b: &Book| CellValue::text(b.name.chars().rev().collect::<String>()))]);
        engine.set_data(vec![Book::new("1", "ab"), Book::new("2", "ba")]);
        engine.set_sort("name", SortDirection::Asc).unwrap();

        let cells: Vec<_> = engine
            .render()
            .rows
            .into_iter()
            .map(|r| r.cells[0].clone())
            .collect();
        assert_eq!(cells, vec!["ab", "ba"]);
    }

    #[test]
    fn pages_through_sorted_items() {
        let mut engine = engine(books(25));
        assert_eq!(engine.render().rows.len(), 10);
        assert!(engine.next_page());
        assert!(engine.next_page());
        assert!(!engine.next_page());

        let view = engine.render();
        assert_eq!(view.rows.len(), 5);
        assert_eq!(view.page.to_string(), "21 – 25 of 25");
        assert_eq!(view.rows[0].item.name, "Book 21");
    }

    #[test]
    fn page_size_must_be_offered() {
        let mut engine = engine(books(25));
        engine.go_to_page(1);

        assert!(matches!(
            engine.set_page_size(7),
            Err(ShelfError::ValidationFailed(_))
        ));
        assert_eq!(engine.render().page.size, 10);

        engine.set_page_size(20).unwrap();
        let page = engine.render().page;
        assert_eq!(page.size, 20);
        assert!(page.size_options.contains(&page.size));
        assert_eq!(page.index, 0);
    }

    #[test]
    fn shrinking_data_clamps_page_index() {
        let mut engine = engine(books(25));
        engine.go_to_page(2);
        assert_eq!(engine.paginator().page_index(), 2);

        engine.set_data(books(5));

        let view = engine.render();
        assert_eq!(view.page.index, 0);
        assert_eq!(view.rows.len(), 5);
        assert!(view.empty.is_none());
    }

    #[test]
    fn row_actions_carry_the_displayed_item() {
        let mut engine = engine(books(15));
        let mut actions = engine.take_actions().unwrap();
        engine.sort_by("name").unwrap(); // now descending
        engine.next_page();

        let edited = engine.edit_row(0).unwrap();
        let deleted = engine.delete_row(4).unwrap();

        assert_eq!(edited.id, "5");
        assert_eq!(deleted.id, "1");
        assert_eq!(actions.try_recv().unwrap(), RowAction::Edit(edited));
        assert_eq!(actions.try_recv().unwrap(), RowAction::Delete(deleted));
        assert!(engine.take_actions().is_none());
    }

    #[test]
    fn row_actions_outside_the_page_are_not_found() {
        let engine = engine(books(3));
        assert!(matches!(engine.edit_row(3), Err(ShelfError::NotFound(_))));
    }

    #[test]
    fn hidden_buttons_do_not_dispatch() {
        let mut engine = TableEngine::new().with_columns(columns());
        engine.set_data(books(2));
        let mut actions = engine.take_actions().unwrap();

        assert!(matches!(
            engine.delete_row(0),
            Err(ShelfError::ValidationFailed(_))
        ));
        assert!(actions.try_recv().is_err());
        assert!(engine.render().actions.is_none());
    }

    #[test]
    fn empty_state_distinguishes_no_data_from_no_results() {
        let mut engine = engine(Vec::new());
        engine.set_config(TableConfig {
            empty_message: Some("No books available".into()),
            no_search_results_message: Some("No books found".into()),
            ..Default::default()
        });

        engine.set_total_count(5);
        let empty = engine.empty_state().unwrap();
        assert_eq!(empty.kind, EmptyKind::NoSearchResults);
        assert_eq!(empty.message, "No books found");

        engine.set_total_count(0);
        let empty = engine.empty_state().unwrap();
        assert_eq!(empty.kind, EmptyKind::NoData);
        assert_eq!(empty.message, "No books available");
    }

    #[test]
    fn selection_matches_by_row_id_by_default() {
        let mut engine = engine(books(3));
        engine.set_selected(Some(Book::new("2", "Stale name")));

        let selected: Vec<_> = engine
            .render()
            .rows
            .into_iter()
            .filter(|r| r.selected)
            .map(|r| r.item.id)
            .collect();
        assert_eq!(selected, vec!["2"]);
    }

    #[test]
    fn selection_uses_configured_id_key() {
        let mut engine = engine(vec![Book::new("1", "Same"), Book::new("2", "Other")]);
        engine.set_config(TableConfig {
            item_id_key: Some("name".into()),
            ..actions_config()
        });
        engine.set_selected(Some(Book::new("99", "Same")));

        assert!(engine.is_selected(&Book::new("1", "Same")));
        assert!(!engine.is_selected(&Book::new("2", "Other")));

        engine.set_selected(None);
        assert!(!engine.is_selected(&Book::new("1", "Same")));
    }

    #[test]
    fn render_describes_headers_and_buttons() {
        let mut engine = engine(books(1));
        engine.set_config(TableConfig {
            edit_label: Some("Restore".into()),
            edit_icon: Some("restore".into()),
            ..actions_config()
        });
        engine.set_loading(true);

        let view = engine.render();
        assert_eq!(view.displayed_columns(), vec!["id", "name", "actions"]);
        assert_eq!(view.headers[1].sort, Some(SortDirection::Asc));
        assert_eq!(view.headers[0].sort, None);
        let actions = view.actions.unwrap();
        assert_eq!(actions.edit.unwrap().icon, "restore");
        assert_eq!(actions.delete.unwrap().label, "Delete");
        assert!(view.loading);
    }
}
