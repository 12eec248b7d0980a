use super::SortDirection;

/// Why a table shows no rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyKind {
    /// There is nothing to show at all.
    NoData,
    /// There is data, but the current search filtered all of it out.
    NoSearchResults,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptyState {
    pub kind: EmptyKind,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderCell {
    pub key: String,
    pub label: String,
    pub sortable: bool,
    /// Set on the column the table is currently sorted by.
    pub sort: Option<SortDirection>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionButton {
    pub label: String,
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionButtons {
    pub edit: Option<ActionButton>,
    pub delete: Option<ActionButton>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedRow<T> {
    /// Position on the current page; what `edit_row`/`delete_row` take.
    pub position: usize,
    pub item: T,
    pub cells: Vec<String>,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageInfo {
    pub index: usize,
    pub size: usize,
    pub size_options: Vec<usize>,
    pub page_count: usize,
    pub length: usize,
    /// 1-based position of the first row on the page, 0 when empty.
    pub first_row: usize,
    pub last_row: usize,
}

impl std::fmt::Display for PageInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} – {} of {}", self.first_row, self.last_row, self.length)
    }
}

/// Everything needed to draw one frame of the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableView<T> {
    pub headers: Vec<HeaderCell>,
    pub rows: Vec<RenderedRow<T>>,
    pub page: PageInfo,
    pub actions: Option<ActionButtons>,
    pub empty: Option<EmptyState>,
    pub loading: bool,
}

impl<T> TableView<T> {
    /// Column keys in display order, with `actions` appended when shown.
    pub fn displayed_columns(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.headers.iter().map(|h| h.key.as_str()).collect();
        if self.actions.is_some() {
            keys.push("actions");
        }
        keys
    }
}
