use thiserror::Error;

#[derive(Error, Debug)]
pub enum ShelfError {
    #[error("Book not found: {0}")]
    NotFound(String),

    #[error("A book with id {0} already exists")]
    DuplicateId(String),

    #[error("{0}")]
    ValidationFailed(String),

    #[error("Column is not sortable: {0}")]
    UnsortableColumn(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Task error: {0}")]
    Task(String),
}

pub type Result<T> = std::result::Result<T, ShelfError>;
