use crate::table::{CellValue, TableRow};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Which of the two store collections a book lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Collection {
    Active,
    Archived,
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Collection::Active => write!(f, "active"),
            Collection::Archived => write!(f, "archived"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: String,
    pub name: String,
    // Present only while the book sits in the archived collection
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archived_at: Option<DateTime<Utc>>,
}

impl Book {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            archived_at: None,
        }
    }

    pub fn is_archived(&self) -> bool {
        self.archived_at.is_some()
    }

    /// A copy of this book stamped as archived at `at`.
    pub fn archived(&self, at: DateTime<Utc>) -> Self {
        Self {
            archived_at: Some(at),
            ..self.clone()
        }
    }

    /// A copy of this book with the archive stamp removed.
    pub fn restored(&self) -> Self {
        Self {
            archived_at: None,
            ..self.clone()
        }
    }
}

impl TableRow for Book {
    fn field(&self, key: &str) -> Option<CellValue> {
        match key {
            "id" => Some(CellValue::Text(self.id.clone())),
            "name" => Some(CellValue::Text(self.name.clone())),
            "archivedAt" => self.archived_at.map(CellValue::Timestamp),
            _ => None,
        }
    }

    fn row_id(&self) -> Option<String> {
        Some(self.id.clone())
    }
}

/// The books every fresh shelf starts with.
pub fn seed_books() -> Vec<Book> {
    vec![
        Book::new("1", "Clean Code"),
        Book::new("2", "Domain-Driven Design"),
        Book::new("3", "The Pragmatic Programmer"),
    ]
}
