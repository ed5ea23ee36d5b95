//! Tool implementations for the agent
//!
//! Concrete handlers for the tools the model can invoke with
//! `TOOL[name](args)`. Each handler takes the positional [`ToolCall`]
//! arguments plus a [`ToolContext`] (working directory and limits) and returns
//! a [`ToolResult`]; failures are results, never panics.
//!
//! | Module | Tools |
//! |--------|-------|
//! | [`file`] | `read_file`, `write_file`, `edit_file` |
//! | [`command`] | `run_command` |
//! | [`directory`] | `list_files`, `create_directory` |
//! | [`search`] | `search_files` |
//! | [`todo`] | `add_todo`, `update_todo`, `show_todos` |
//!
//! [`ToolCall`]: codeagent_domain::ToolCall
//! [`ToolResult`]: codeagent_domain::ToolResult

pub mod builtin;
pub mod command;
pub mod directory;
pub mod file;
pub mod search;
pub mod todo;

mod executor;

pub use builtin::BuiltinTool;
pub use executor::LocalToolExecutor;

use codeagent_domain::tool::entities::ToolSpec;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Resource limits applied by the handlers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolLimits {
    /// Wall-clock bound for `run_command`
    pub command_timeout: Duration,
    /// Largest file `read_file` and `edit_file` will load
    pub max_file_size: u64,
    /// Command output beyond this many bytes is cut
    pub max_output_bytes: usize,
}

impl Default for ToolLimits {
    fn default() -> Self {
        Self {
            command_timeout: Duration::from_secs(30),
            max_file_size: 10 * 1024 * 1024,
            max_output_bytes: 1024 * 1024,
        }
    }
}

/// Everything a handler needs besides its arguments
#[derive(Debug, Clone)]
pub struct ToolContext {
    pub working_dir: PathBuf,
    pub limits: ToolLimits,
}

impl ToolContext {
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        Self {
            working_dir: working_dir.into(),
            limits: ToolLimits::default(),
        }
    }

    pub fn with_limits(mut self, limits: ToolLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Resolve `path` against the working directory unless it is absolute.
    pub fn resolve(&self, path: &str) -> PathBuf {
        let path = Path::new(path);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.working_dir.join(path)
        }
    }
}

/// Create the default tool specification with every builtin tool
pub fn default_tool_spec() -> ToolSpec {
    BuiltinTool::ALL
        .iter()
        .fold(ToolSpec::new(), |spec, tool| spec.register(tool.definition()))
}

/// Only the tools that do not modify anything
pub fn read_only_tool_spec() -> ToolSpec {
    BuiltinTool::ALL
        .iter()
        .map(|tool| tool.definition())
        .filter(|definition| !definition.is_high_risk())
        .fold(ToolSpec::new(), |spec, definition| spec.register(definition))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_spec_order() {
        let spec = default_tool_spec();
        let names: Vec<_> = spec.names().collect();
        assert_eq!(
            names,
            vec![
                "read_file",
                "write_file",
                "edit_file",
                "run_command",
                "list_files",
                "search_files",
                "create_directory",
                "add_todo",
                "update_todo",
                "show_todos",
            ]
        );
    }

    #[test]
    fn test_read_only_spec() {
        let spec = read_only_tool_spec();
        assert!(spec.contains("read_file"));
        assert!(spec.contains("list_files"));
        assert!(spec.contains("show_todos"));
        assert!(!spec.contains("write_file"));
        assert!(!spec.contains("run_command"));
        assert!(!spec.contains("create_directory"));
    }

    #[test]
    fn test_resolve() {
        let ctx = ToolContext::new("/work");
        assert_eq!(ctx.resolve("src/main.rs"), PathBuf::from("/work/src/main.rs"));
        assert_eq!(ctx.resolve("/etc/hosts"), PathBuf::from("/etc/hosts"));
    }
}
