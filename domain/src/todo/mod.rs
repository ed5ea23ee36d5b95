//! Todo bookkeeping for multi-step tasks
//!
//! The model keeps a running task list through the `add_todo`,
//! `update_todo` and `show_todos` tools. The list lives for the duration of
//! the process and is never persisted.

pub mod entities;

pub use entities::{TodoItem, TodoList, TodoStatus};
