//! Directory tools: list_files, create_directory

use super::ToolContext;
use codeagent_domain::format_size;
use codeagent_domain::tool::{
    entities::{RiskLevel, ToolCall, ToolDefinition, ToolParameter},
    value_objects::{ToolError, ToolResult},
};
use std::fs;
use std::path::Path;

/// Tool name constants
pub const LIST_FILES: &str = "list_files";
pub const CREATE_DIRECTORY: &str = "create_directory";

/// Levels below the listed directory that are expanded
const MAX_DEPTH: usize = 2;

/// Entries considered per directory, before hidden ones are skipped
const MAX_ENTRIES_PER_DIR: usize = 50;

/// Get the tool definition for list_files
pub fn list_files_definition() -> ToolDefinition {
    ToolDefinition::new(LIST_FILES, "List files in a directory as a tree", RiskLevel::Low)
        .with_parameter(ToolParameter::new(
            "directory",
            "Directory to list (default: working directory)",
            false,
        ))
}

/// Get the tool definition for create_directory
pub fn create_directory_definition() -> ToolDefinition {
    ToolDefinition::new(
        CREATE_DIRECTORY,
        "Create a new directory, including missing parents",
        RiskLevel::High,
    )
    .with_parameter(ToolParameter::new("path", "Directory to create", true))
}

/// Execute the list_files tool
///
/// Output is a header line followed by an indented tree, directories first
/// and then by name. Hidden entries are not shown.
pub fn execute_list_files(call: &ToolCall, ctx: &ToolContext) -> ToolResult {
    let dir_str = call.arg_or(0, ".");
    let path = ctx.resolve(dir_str);

    if !path.is_dir() {
        return ToolResult::failure(
            LIST_FILES,
            ToolError::new("NOT_FOUND", format!("Directory not found: {}", dir_str)),
        );
    }

    let root_name = path
        .canonicalize()
        .ok()
        .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
        .unwrap_or_else(|| dir_str.to_string());

    let mut lines = vec![format!("{}/", root_name)];
    let mut count = 0;
    walk(&path, 0, &mut lines, &mut count);

    ToolResult::success(
        LIST_FILES,
        format!("Listed contents of {}\n{}", dir_str, lines.join("\n")),
    )
    .with_path(path.display().to_string())
    .with_match_count(count)
}

fn walk(dir: &Path, level: usize, lines: &mut Vec<String>, count: &mut usize) {
    let indent = "  ".repeat(level + 1);

    let mut entries: Vec<(bool, String, u64)> = match fs::read_dir(dir) {
        Ok(read_dir) => read_dir
            .filter_map(|entry| entry.ok())
            .map(|entry| {
                let metadata = entry.metadata().ok();
                let is_dir = metadata.as_ref().is_some_and(|m| m.is_dir());
                let size = metadata.map(|m| m.len()).unwrap_or(0);
                (is_dir, entry.file_name().to_string_lossy().into_owned(), size)
            })
            .collect(),
        Err(_) => {
            lines.push(format!("{}[permission denied]", indent));
            return;
        }
    };
    entries.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(&b.1)));

    for (is_dir, name, size) in entries.into_iter().take(MAX_ENTRIES_PER_DIR) {
        if name.starts_with('.') {
            continue;
        }
        *count += 1;
        if is_dir {
            lines.push(format!("{}{}/", indent, name));
            if level < MAX_DEPTH {
                walk(&dir.join(&name), level + 1, lines, count);
            }
        } else {
            lines.push(format!("{}{} ({})", indent, name, format_size(size)));
        }
    }
}

/// Execute the create_directory tool
pub fn execute_create_directory(call: &ToolCall, ctx: &ToolContext) -> ToolResult {
    let path_str = match call.require(0, "path") {
        Ok(p) if !p.trim().is_empty() => p,
        Ok(_) => {
            return ToolResult::failure(
                CREATE_DIRECTORY,
                ToolError::invalid_argument("Path must not be empty"),
            );
        }
        Err(e) => return ToolResult::failure(CREATE_DIRECTORY, ToolError::invalid_argument(e)),
    };
    let path = ctx.resolve(path_str);

    if path.exists() && !path.is_dir() {
        return ToolResult::failure(
            CREATE_DIRECTORY,
            ToolError::invalid_argument(format!("'{}' exists and is not a directory", path_str)),
        );
    }

    if let Err(e) = fs::create_dir_all(&path) {
        let error = if e.kind() == std::io::ErrorKind::PermissionDenied {
            ToolError::permission_denied(path_str)
        } else {
            ToolError::execution_failed(format!("Failed to create directory: {}", e))
        };
        return ToolResult::failure(CREATE_DIRECTORY, error);
    }

    ToolResult::success(CREATE_DIRECTORY, format!("Successfully created {}", path_str))
        .with_path(path.display().to_string())
}
