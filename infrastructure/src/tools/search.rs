//! Search tool: search_files

use super::ToolContext;
use codeagent_domain::tool::{
    entities::{RiskLevel, ToolCall, ToolDefinition, ToolParameter},
    value_objects::{ToolError, ToolResult},
};
use glob::{MatchOptions, Pattern, glob_with};
use std::path::{Component, Path};

/// Tool name constant
pub const SEARCH_FILES: &str = "search_files";

/// Maximum number of results to return
const MAX_RESULTS: usize = 50;

/// Get the tool definition for search_files
pub fn search_files_definition() -> ToolDefinition {
    ToolDefinition::new(
        SEARCH_FILES,
        "Search for files and directories whose name contains a pattern",
        RiskLevel::Low,
    )
    .with_parameter(ToolParameter::new(
        "pattern",
        "Name fragment or glob, e.g. test or *.rs",
        true,
    ))
}

/// Execute the search_files tool
///
/// Matches `**/*<pattern>*` below the working directory. Anything inside a
/// hidden directory, or itself hidden, is skipped.
pub fn execute_search_files(call: &ToolCall, ctx: &ToolContext) -> ToolResult {
    let pattern = match call.require(0, "pattern") {
        Ok(p) if !p.trim().is_empty() => p.trim(),
        Ok(_) => {
            return ToolResult::failure(
                SEARCH_FILES,
                ToolError::invalid_argument("Pattern must not be empty"),
            );
        }
        Err(e) => return ToolResult::failure(SEARCH_FILES, ToolError::invalid_argument(e)),
    };

    let root = &ctx.working_dir;
    let full_pattern = format!(
        "{}/**/*{}*",
        Pattern::escape(&root.to_string_lossy()),
        pattern
    );
    let options = MatchOptions {
        case_sensitive: true,
        require_literal_separator: false,
        require_literal_leading_dot: true,
    };

    let entries = match glob_with(&full_pattern, options) {
        Ok(paths) => paths,
        Err(e) => {
            return ToolResult::failure(
                SEARCH_FILES,
                ToolError::invalid_argument(format!("Invalid search pattern: {}", e)),
            );
        }
    };

    let mut matches: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .filter_map(|path| {
            let relative = path.strip_prefix(root).ok()?;
            if is_hidden(relative) {
                return None;
            }
            let mut display = relative.display().to_string();
            if path.is_dir() {
                display.push('/');
            }
            Some(display)
        })
        .take(MAX_RESULTS)
        .collect();

    if matches.is_empty() {
        return ToolResult::success(SEARCH_FILES, "No matches found").with_match_count(0);
    }
    matches.sort();

    let count = matches.len();
    let listing: Vec<String> = matches.iter().map(|m| format!("  {}", m)).collect();
    ToolResult::success(
        SEARCH_FILES,
        format!(
            "Found {} matches for '{}'\n{}",
            count,
            pattern,
            listing.join("\n")
        ),
    )
    .with_match_count(count)
}

fn is_hidden(relative: &Path) -> bool {
    relative.components().any(|component| match component {
        Component::Normal(part) => part.to_string_lossy().starts_with('.'),
        _ => false,
    })
}
