use crate::error::{Result, ShelfError};
use crate::model::Book;

pub const MIN_NAME_LENGTH: usize = 2;
pub const MAX_NAME_LENGTH: usize = 100;

/// The create/edit form of the books screen.
///
/// The id field is not editable by the user: it is filled with the next free
/// id for a new book, or the selected book's id while editing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookForm {
    id: String,
    name: String,
    editing: bool,
}

impl BookForm {
    pub fn new(next_id: impl Into<String>) -> Self {
        Self {
            id: next_id.into(),
            ..Self::default()
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Loads `book` for editing.
    pub fn patch(&mut self, book: &Book) {
        self.id = book.id.clone();
        self.name = book.name.clone();
        self.editing = true;
    }

    /// Empties the form for a new book with id `next_id`.
    pub fn reset(&mut self, next_id: impl Into<String>) {
        *self = Self::new(next_id);
    }

    pub fn id_error(&self) -> Option<&'static str> {
        self.id.trim().is_empty().then_some("ID is required")
    }

    pub fn name_error(&self) -> Option<&'static str> {
        let length = self.name.trim().chars().count();
        if length == 0 {
            Some("Name is required")
        } else if length < MIN_NAME_LENGTH {
            Some("Name must be at least 2 characters")
        } else if length > MAX_NAME_LENGTH {
            Some("Name must be less than 100 characters")
        } else {
            None
        }
    }

    pub fn errors(&self) -> Vec<&'static str> {
        self.id_error().into_iter().chain(self.name_error()).collect()
    }

    pub fn is_submit_disabled(&self) -> bool {
        !self.errors().is_empty()
    }

    /// The book this form describes, with its name trimmed.
    pub fn validate(&self) -> Result<Book> {
        if let Some(err) = self.id_error().or(self.name_error()) {
            return Err(ShelfError::ValidationFailed(err.to_string()));
        }
        Ok(Book::new(self.id.trim(), self.name.trim()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_form_needs_a_name() {
        let form = BookForm::new("4");
        assert_eq!(form.errors(), vec!["Name is required"]);
        assert!(form.is_submit_disabled());
    }

    #[test]
    fn name_length_is_checked_after_trimming() {
        let mut form = BookForm::new("4");
        form.set_name("  A  ");
        assert_eq!(form.name_error(), Some("Name must be at least 2 characters"));

        form.set_name("x".repeat(101));
        assert_eq!(form.name_error(), Some("Name must be less than 100 characters"));

        form.set_name("x".repeat(100));
        assert_eq!(form.name_error(), None);
    }

    #[test]
    fn validate_trims_the_name() {
        let mut form = BookForm::new("4");
        form.set_name("  Refactoring ");
        assert_eq!(form.validate().unwrap(), Book::new("4", "Refactoring"));
    }

    #[test]
    fn missing_id_is_reported() {
        let mut form = BookForm::new("");
        form.set_name("Refactoring");
        assert!(matches!(
            form.validate(),
            Err(ShelfError::ValidationFailed(msg)) if msg == "ID is required"
        ));
    }

    #[test]
    fn patch_and_reset() {
        let mut form = BookForm::new("4");
        form.patch(&Book::new("2", "Domain-Driven Design"));
        assert!(form.is_editing());
        assert_eq!(form.id(), "2");

        form.reset("4");
        assert!(!form.is_editing());
        assert_eq!(form.name(), "");
        assert_eq!(form.id(), "4");
    }
}
