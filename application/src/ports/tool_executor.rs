//! Tool Executor port
//!
//! Defines the interface for executing tools (file operations, commands,
//! todo bookkeeping).

use async_trait::async_trait;
use codeagent_domain::TodoList;
use codeagent_domain::tool::{
    entities::{ToolCall, ToolDefinition, ToolSpec},
    value_objects::ToolResult,
};
use std::path::{Path, PathBuf};

/// Port for tool execution
///
/// Handler failures are reported as [`ToolResult::failure`] values; an
/// implementation must never panic or propagate an error for a bad call.
#[async_trait]
pub trait ToolExecutorPort: Send + Sync {
    /// Get the specification of all available tools
    fn tool_spec(&self) -> &ToolSpec;

    /// Check if a tool is available
    fn has_tool(&self, name: &str) -> bool {
        self.tool_spec().contains(name)
    }

    /// Get the definition of a specific tool
    fn get_tool(&self, name: &str) -> Option<&ToolDefinition> {
        self.tool_spec().get(name)
    }

    /// Get names of all available tools
    fn available_tools(&self) -> Vec<&str> {
        self.tool_spec().names().collect()
    }

    /// Directory relative paths are resolved against
    fn working_dir(&self) -> PathBuf;

    /// Change the directory relative paths are resolved against
    fn set_working_dir(&self, dir: &Path);

    /// Snapshot of the todo list kept by the todo tools
    fn todos(&self) -> TodoList {
        TodoList::new()
    }

    /// Execute a tool call
    async fn execute(&self, call: &ToolCall) -> ToolResult;
}
