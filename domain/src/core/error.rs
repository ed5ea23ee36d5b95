//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid model: {0}")]
    InvalidModel(String),

    #[error("Invalid todo status: {0} (expected pending, in_progress or completed)")]
    InvalidTodoStatus(String),

    #[error("Todo #{number} does not exist ({count} todos)")]
    TodoNotFound { number: usize, count: usize },

    #[error("Invalid tool marker: {0}")]
    InvalidMarker(String),
}
