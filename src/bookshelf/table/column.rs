use super::{CellValue, TableRow};
use std::sync::Arc;

/// Derives a cell value from an item.
pub type Accessor<T> = Arc<dyn Fn(&T) -> CellValue + Send + Sync>;

/// Declarative description of one table column.
///
/// Owned by the consuming screen, not by the engine.
pub struct Column<T> {
    pub key: String,
    pub label: String,
    pub sortable: bool,
    accessor: Option<Accessor<T>>,
}

impl<T> Column<T> {
    /// A sortable column reading the item field named `key`.
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            sortable: true,
            accessor: None,
        }
    }

    pub fn sortable(mut self, sortable: bool) -> Self {
        self.sortable = sortable;
        self
    }

    pub fn with_accessor<F>(mut self, accessor: F) -> Self
    where
        F: Fn(&T) -> CellValue + Send + Sync + 'static,
    {
        self.accessor = Some(Arc::new(accessor));
        self
    }
}

impl<T: TableRow> Column<T> {
    /// Resolves this column's value for `item`.
    ///
    /// The accessor wins; otherwise the item field named by the key, or an
    /// empty cell when the item has no such field.
    pub fn value(&self, item: &T) -> CellValue {
        match &self.accessor {
            Some(accessor) => accessor(item),
            None => item.field(&self.key).unwrap_or_default(),
        }
    }
}

impl<T> Clone for Column<T> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            label: self.label.clone(),
            sortable: self.sortable,
            accessor: self.accessor.clone(),
        }
    }
}

impl<T> std::fmt::Debug for Column<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Column")
            .field("key", &self.key)
            .field("label", &self.label)
            .field("sortable", &self.sortable)
            .field("accessor", &self.accessor.is_some())
            .finish()
    }
}
