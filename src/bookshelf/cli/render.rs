//! # Rendering
//!
//! Turns a [`TableView`] into terminal lines. Functions here return strings so
//! layout can be tested without a terminal; `commands.rs` does the printing.
//!
//! ## Table Layout
//!
//! ```text
//!       ID   Name ▲                  Archived At
//!   1.  3    The Pragmatic Programmer 2 minutes ago
//! ▸ 2.  1    Clean Code
//!   1 – 2 of 2 · page 1/1 · 10 per page
//! ```
//!
//! Column widths fit the widest cell on the page, capped at [`MAX_COL_WIDTH`].

use bookshelf::actions::{MessageLevel, Notification};
use bookshelf::model::Book;
use bookshelf::screens::Tab;
use bookshelf::table::{SortDirection, TableView};
use chrono::{DateTime, Utc};
use colored::Colorize;
use timeago::Formatter;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub const MAX_COL_WIDTH: usize = 40;
pub const COL_ROW: usize = 6; // "▸ 12. "
pub const SELECTED_MARKER: &str = "▸";
const SORT_ASC: &str = "▲";
const SORT_DESC: &str = "▼";

pub fn render_messages(messages: &[Notification]) -> Vec<String> {
    messages
        .iter()
        .map(|message| match message.level {
            MessageLevel::Success => message.content.green().to_string(),
            MessageLevel::Error => message.content.red().to_string(),
        })
        .collect()
}

pub fn render_tabs(current: Tab) -> String {
    [Tab::Books, Tab::Archived]
        .iter()
        .map(|tab| {
            if *tab == current {
                format!("[{}]", tab.label()).bold().to_string()
            } else {
                format!(" {} ", tab.label()).dimmed().to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn render_table(view: &TableView<Book>, search: &str) -> Vec<String> {
    let mut lines = Vec::new();

    if !search.trim().is_empty() {
        lines.push(format!("Search: {}", search.trim()).dimmed().to_string());
    }

    // Archived rows get a relative time after the formatted stamp
    let rows: Vec<Vec<String>> = view
        .rows
        .iter()
        .map(|row| {
            row.cells
                .iter()
                .zip(&view.headers)
                .map(|(cell, header)| match (header.key.as_str(), row.item.archived_at) {
                    ("archivedAt", Some(at)) => format!("{} ({})", cell, format_time_ago(at)),
                    _ => cell.clone(),
                })
                .collect()
        })
        .collect();

    let headers: Vec<String> = view
        .headers
        .iter()
        .map(|h| match h.sort {
            Some(SortDirection::Asc) => format!("{} {}", h.label, SORT_ASC),
            Some(SortDirection::Desc) => format!("{} {}", h.label, SORT_DESC),
            None => h.label.clone(),
        })
        .collect();

    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(i, label)| {
            rows.iter()
                .filter_map(|cells| cells.get(i))
                .map(|c| c.width())
                .chain(std::iter::once(label.width()))
                .max()
                .unwrap_or(0)
                .min(MAX_COL_WIDTH)
        })
        .collect();

    lines.push(format!(
        "{}{}",
        " ".repeat(COL_ROW),
        layout(&headers, &widths).bold()
    ));

    if let Some(empty) = &view.empty {
        lines.push(format!("{}{}", " ".repeat(COL_ROW), empty.message.dimmed()));
    }

    for (row, cells) in view.rows.iter().zip(&rows) {
        let marker = if row.selected { SELECTED_MARKER } else { " " };
        let index = format!("{:>2}. ", row.position + 1);
        let line = format!("{} {}{}", marker, index, layout(cells, &widths));
        lines.push(if row.selected {
            line.yellow().to_string()
        } else {
            line
        });
    }

    if view.empty.is_none() {
        lines.push(
            format!(
                "{}{} · page {}/{} · {} per page",
                " ".repeat(COL_ROW),
                view.page,
                view.page.index + 1,
                view.page.page_count.max(1),
                view.page.size
            )
            .dimmed()
            .to_string(),
        );
    }

    if let Some(actions) = &view.actions {
        let labels: Vec<&str> = [&actions.edit, &actions.delete]
            .into_iter()
            .flatten()
            .map(|b| b.label.as_str())
            .collect();
        lines.push(
            format!("{}Row actions: {}", " ".repeat(COL_ROW), labels.join(", "))
                .dimmed()
                .to_string(),
        );
    }

    if view.loading {
        lines.push("Working…".yellow().to_string());
    }

    lines
}

fn layout(cells: &[String], widths: &[usize]) -> String {
    cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| {
            let shown = truncate_to_width(cell, *width);
            let padding = width.saturating_sub(shown.width());
            format!("{}{}", shown, " ".repeat(padding))
        })
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}

pub fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }

    let mut result = String::new();
    let mut current_width = 0;

    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            result.push('…');
            return result;
        }
        result.push(c);
        current_width += char_width;
    }

    result
}

pub fn format_time_ago(timestamp: DateTime<Utc>) -> String {
    let duration = Utc::now().signed_duration_since(timestamp);
    Formatter::new().convert(duration.to_std().unwrap_or_default())
}
