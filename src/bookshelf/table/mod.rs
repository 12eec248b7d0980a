//! # Table Engine
//!
//! A render-agnostic projection of an item sequence into a sorted, paginated
//! table. The engine knows nothing about the concrete item type: columns
//! describe how to pull a [`CellValue`] out of an item, and a [`TableConfig`]
//! describes how the table behaves.
//!
//! ## Inputs and output
//!
//! ```text
//!   columns ─┐
//!   config  ─┼──► TableEngine ──► TableView (headers, page of rows, empty state)
//!   data    ─┘         │
//!                      └──► RowAction events (edit / delete, carrying the item)
//! ```
//!
//! Every input setter recomputes the projection, so [`TableEngine::render`] is
//! always consistent with the latest columns, config and data.
//!
//! ## Cell values
//!
//! A column with an accessor uses it; otherwise the engine asks the item for
//! the field named by the column key via [`TableRow::field`], falling back to
//! [`CellValue::Empty`]. The same resolved value is displayed and sorted on,
//! which is what keeps a formatted date column ordered by instant rather than
//! by its text.

pub mod cell;
pub mod column;
pub mod config;
pub mod engine;
pub mod paging;
pub mod projection;

pub use cell::CellValue;
pub use column::Column;
pub use config::{EffectiveConfig, SortDirection, TableConfig};
pub use engine::{RowAction, SortState, TableEngine};
pub use paging::Paginator;
pub use projection::{
    ActionButton, ActionButtons, EmptyKind, EmptyState, HeaderCell, PageInfo, RenderedRow,
    TableView,
};

/// An item the table can display.
pub trait TableRow {
    /// The value of the field named `key`, if the item has one.
    fn field(&self, key: &str) -> Option<CellValue>;

    /// A stable identifier used to match the selected row.
    fn row_id(&self) -> Option<String> {
        None
    }
}
