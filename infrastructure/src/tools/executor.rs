//! Local tool executor, the concrete implementation of [`ToolExecutorPort`].
//!
//! [`LocalToolExecutor`] bridges the application layer's abstract port with
//! actual system operations: file I/O, process execution, directory walks and
//! the session's todo list.
//!
//! ```text
//! ToolExecutorPort::execute()
//!   ├─ name not in spec / not a builtin → NOT_FOUND
//!   ├─ DefaultToolValidator             → INVALID_ARGUMENT
//!   └─ BuiltinTool match
//!        ├─ run_command → async (tokio::process, bounded wait)
//!        ├─ todo tools  → Mutex<TodoList>
//!        └─ others      → synchronous std::fs
//! ```

use super::{ToolContext, ToolLimits, builtin::BuiltinTool, command, directory, file, search, todo};
use async_trait::async_trait;
use codeagent_application::ports::tool_executor::ToolExecutorPort;
use codeagent_domain::TodoList;
use codeagent_domain::tool::{
    entities::{ToolCall, ToolSpec},
    traits::{DefaultToolValidator, ToolValidator},
    value_objects::{ToolError, ToolResult},
};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, RwLock};
use std::time::Instant;
use tracing::debug;

/// Executor that runs tools on the local machine.
///
/// The working directory sits behind a lock so the REPL's `/cd` and the
/// tools always agree on it.
#[derive(Debug)]
pub struct LocalToolExecutor {
    /// Available tools
    tool_spec: ToolSpec,
    working_dir: RwLock<PathBuf>,
    limits: ToolLimits,
    todos: Mutex<TodoList>,
}

impl LocalToolExecutor {
    /// Create a new executor with every builtin tool.
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        Self::with_tools(super::default_tool_spec(), working_dir)
    }

    /// Create an executor with only the read-only tools.
    pub fn read_only(working_dir: impl Into<PathBuf>) -> Self {
        Self::with_tools(super::read_only_tool_spec(), working_dir)
    }

    /// Create an executor with a custom tool spec
    pub fn with_tools(tool_spec: ToolSpec, working_dir: impl Into<PathBuf>) -> Self {
        Self {
            tool_spec,
            working_dir: RwLock::new(working_dir.into()),
            limits: ToolLimits::default(),
            todos: Mutex::new(TodoList::new()),
        }
    }

    pub fn with_limits(mut self, limits: ToolLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn limits(&self) -> &ToolLimits {
        &self.limits
    }

    fn context(&self) -> ToolContext {
        ToolContext::new(self.working_dir()).with_limits(self.limits.clone())
    }

    fn todo_list(&self) -> MutexGuard<'_, TodoList> {
        self.todos.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    async fn run(&self, tool: BuiltinTool, call: &ToolCall) -> ToolResult {
        let ctx = self.context();
        match tool {
            BuiltinTool::ReadFile => file::execute_read_file(call, &ctx),
            BuiltinTool::WriteFile => file::execute_write_file(call, &ctx),
            BuiltinTool::EditFile => file::execute_edit_file(call, &ctx),
            BuiltinTool::RunCommand => command::execute_run_command(call, &ctx).await,
            BuiltinTool::ListFiles => directory::execute_list_files(call, &ctx),
            BuiltinTool::SearchFiles => search::execute_search_files(call, &ctx),
            BuiltinTool::CreateDirectory => directory::execute_create_directory(call, &ctx),
            BuiltinTool::AddTodo | BuiltinTool::UpdateTodo | BuiltinTool::ShowTodos => {
                self.run_todo(tool, call)
            }
        }
    }

    fn run_todo(&self, tool: BuiltinTool, call: &ToolCall) -> ToolResult {
        let mut todos = self.todo_list();
        match tool {
            BuiltinTool::AddTodo => todo::execute_add_todo(call, &mut todos),
            BuiltinTool::UpdateTodo => todo::execute_update_todo(call, &mut todos),
            _ => todo::execute_show_todos(&todos),
        }
    }
}

#[async_trait]
impl ToolExecutorPort for LocalToolExecutor {
    fn tool_spec(&self) -> &ToolSpec {
        &self.tool_spec
    }

    fn working_dir(&self) -> PathBuf {
        self.working_dir
            .read()
            .map(|dir| dir.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }

    fn set_working_dir(&self, dir: &Path) {
        match self.working_dir.write() {
            Ok(mut current) => *current = dir.to_path_buf(),
            Err(poisoned) => *poisoned.into_inner() = dir.to_path_buf(),
        }
    }

    fn todos(&self) -> TodoList {
        self.todo_list().clone()
    }

    async fn execute(&self, call: &ToolCall) -> ToolResult {
        let (definition, tool) = match (
            self.tool_spec.get(&call.tool_name),
            BuiltinTool::from_name(&call.tool_name),
        ) {
            (Some(definition), Some(tool)) => (definition, tool),
            _ => {
                return ToolResult::failure(
                    &call.tool_name,
                    ToolError::not_found(format!("Unknown tool: {}", call.tool_name)),
                );
            }
        };

        if let Err(e) = DefaultToolValidator.validate(call, definition) {
            return ToolResult::failure(&call.tool_name, ToolError::invalid_argument(e));
        }

        let start = Instant::now();
        let result = self.run(tool, call).await;
        let duration_ms = start.elapsed().as_millis() as u64;
        debug!(
            tool = %tool,
            success = result.is_success(),
            duration_ms,
            "Tool finished"
        );

        result.with_duration(duration_ms)
    }
}
