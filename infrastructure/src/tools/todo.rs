//! Todo tools: add_todo, update_todo, show_todos
//!
//! The list itself lives in the executor; these handlers only parse
//! arguments and format replies.

use codeagent_domain::tool::{
    entities::{RiskLevel, ToolCall, ToolDefinition, ToolParameter},
    value_objects::{ToolError, ToolResult},
};
use codeagent_domain::{TodoItem, TodoList, TodoStatus};

/// Tool name constants
pub const ADD_TODO: &str = "add_todo";
pub const UPDATE_TODO: &str = "update_todo";
pub const SHOW_TODOS: &str = "show_todos";

/// Get the tool definition for add_todo
pub fn add_todo_definition() -> ToolDefinition {
    ToolDefinition::new(ADD_TODO, "Add a task to the todo list", RiskLevel::Low)
        .with_parameter(ToolParameter::new("task_description", "What needs doing", true).quoted())
}

/// Get the tool definition for update_todo
pub fn update_todo_definition() -> ToolDefinition {
    ToolDefinition::new(
        UPDATE_TODO,
        "Update todo status; status is pending, in_progress or completed",
        RiskLevel::Low,
    )
    .with_parameter(ToolParameter::new("task_number", "1-based task number", true))
    .with_parameter(ToolParameter::new("status", "New status", true))
}

/// Get the tool definition for show_todos
pub fn show_todos_definition() -> ToolDefinition {
    ToolDefinition::new(SHOW_TODOS, "Display the current todo list", RiskLevel::Low)
}

pub fn execute_add_todo(call: &ToolCall, todos: &mut TodoList) -> ToolResult {
    let task = match call.require(0, "task_description") {
        Ok(t) if !t.trim().is_empty() => t.trim(),
        Ok(_) => {
            return ToolResult::failure(
                ADD_TODO,
                ToolError::invalid_argument("Task description must not be empty"),
            );
        }
        Err(e) => return ToolResult::failure(ADD_TODO, ToolError::invalid_argument(e)),
    };

    let number = todos.add(TodoItem::new(task));
    ToolResult::success(ADD_TODO, format!("Added todo #{}: {}", number, task))
}

pub fn execute_update_todo(call: &ToolCall, todos: &mut TodoList) -> ToolResult {
    let number_str = match call.require(0, "task_number") {
        Ok(n) => n.trim().trim_start_matches('#'),
        Err(e) => return ToolResult::failure(UPDATE_TODO, ToolError::invalid_argument(e)),
    };
    let number: usize = match number_str.parse() {
        Ok(n) if n >= 1 => n,
        _ => {
            return ToolResult::failure(
                UPDATE_TODO,
                ToolError::invalid_argument(format!(
                    "Task number must be a positive integer, got '{}'",
                    number_str
                )),
            );
        }
    };

    let status: TodoStatus = match call.require(1, "status").map(str::parse) {
        Ok(Ok(s)) => s,
        Ok(Err(e)) => {
            return ToolResult::failure(UPDATE_TODO, ToolError::invalid_argument(e.to_string()));
        }
        Err(e) => return ToolResult::failure(UPDATE_TODO, ToolError::invalid_argument(e)),
    };

    match todos.update(number - 1, Some(status), None) {
        Ok(item) => ToolResult::success(
            UPDATE_TODO,
            format!("Updated todo #{}: [{}] {}", number, item.status, item.content),
        ),
        Err(e) => ToolResult::failure(UPDATE_TODO, ToolError::new("NOT_FOUND", e.to_string())),
    }
}

pub fn execute_show_todos(todos: &TodoList) -> ToolResult {
    ToolResult::success(SHOW_TODOS, todos.summary()).with_match_count(todos.len())
}
