//! Todo entities

use serde::{Deserialize, Serialize};

use crate::core::error::DomainError;

/// Progress state of a todo item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TodoStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
}

impl TodoStatus {
    pub fn as_str(&self) -> &str {
        match self {
            TodoStatus::Pending => "pending",
            TodoStatus::InProgress => "in_progress",
            TodoStatus::Completed => "completed",
        }
    }

    pub fn icon(&self) -> &str {
        match self {
            TodoStatus::Pending => "⏸",
            TodoStatus::InProgress => "▶",
            TodoStatus::Completed => "✓",
        }
    }
}

impl std::fmt::Display for TodoStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for TodoStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" | "todo" => Ok(TodoStatus::Pending),
            "in_progress" | "in-progress" | "inprogress" | "active" => Ok(TodoStatus::InProgress),
            "completed" | "complete" | "done" => Ok(TodoStatus::Completed),
            other => Err(DomainError::InvalidTodoStatus(other.to_string())),
        }
    }
}

/// A single task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoItem {
    pub content: String,
    pub status: TodoStatus,
    /// Present-tense description shown while the task is running
    pub active_form: String,
}

impl TodoItem {
    pub fn new(content: impl Into<String>) -> Self {
        let content = content.into();
        Self {
            active_form: format!("Working on: {}", content),
            content,
            status: TodoStatus::Pending,
        }
    }

    pub fn with_status(mut self, status: TodoStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_active_form(mut self, active_form: impl Into<String>) -> Self {
        let active_form = active_form.into();
        if !active_form.is_empty() {
            self.active_form = active_form;
        }
        self
    }
}

/// Ordered list of todos
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoList {
    items: Vec<TodoItem>,
}

impl TodoList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an item and return its 1-based number.
    pub fn add(&mut self, item: TodoItem) -> usize {
        self.items.push(item);
        self.items.len()
    }

    /// Update the item at `index` (0-based). `None` leaves a field unchanged;
    /// empty content is ignored.
    pub fn update(
        &mut self,
        index: usize,
        status: Option<TodoStatus>,
        content: Option<&str>,
    ) -> Result<&TodoItem, DomainError> {
        let count = self.items.len();
        let item = self
            .items
            .get_mut(index)
            .ok_or(DomainError::TodoNotFound {
                number: index + 1,
                count,
            })?;

        if let Some(status) = status {
            item.status = status;
        }
        if let Some(content) = content
            && !content.is_empty()
        {
            item.content = content.to_string();
        }
        Ok(item)
    }

    pub fn mark_complete(&mut self, index: usize) -> Result<&TodoItem, DomainError> {
        self.update(index, Some(TodoStatus::Completed), None)
    }

    /// The first in-progress item, if any.
    pub fn current(&self) -> Option<&TodoItem> {
        self.items
            .iter()
            .find(|item| item.status == TodoStatus::InProgress)
    }

    pub fn items(&self) -> &[TodoItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Count of items per status: (pending, in progress, completed)
    pub fn progress(&self) -> (usize, usize, usize) {
        self.items.iter().fold((0, 0, 0), |(p, i, c), item| match item.status {
            TodoStatus::Pending => (p + 1, i, c),
            TodoStatus::InProgress => (p, i + 1, c),
            TodoStatus::Completed => (p, i, c + 1),
        })
    }

    /// Plain-text listing, one `N. [status] content` line per item.
    pub fn summary(&self) -> String {
        if self.items.is_empty() {
            return "No todos".to_string();
        }

        self.items
            .iter()
            .enumerate()
            .map(|(i, item)| format!("{}. [{}] {}", i + 1, item.status, item.content))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
