//! File operation tools: read_file, write_file, edit_file

use super::ToolContext;
use codeagent_domain::tool::{
    entities::{RiskLevel, ToolCall, ToolDefinition, ToolParameter},
    escape::unescape_content,
    value_objects::{ToolError, ToolResult},
};
use codeagent_domain::format_size;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Tool name constants
pub const READ_FILE: &str = "read_file";
pub const WRITE_FILE: &str = "write_file";
pub const EDIT_FILE: &str = "edit_file";

/// Get the tool definition for read_file
pub fn read_file_definition() -> ToolDefinition {
    ToolDefinition::new(READ_FILE, "Read contents of a file", RiskLevel::Low)
        .with_parameter(ToolParameter::new("filepath", "Path to the file to read", true))
}

/// Get the tool definition for write_file
pub fn write_file_definition() -> ToolDefinition {
    ToolDefinition::new(
        WRITE_FILE,
        "Write content to a file, creating parent directories as needed",
        RiskLevel::High,
    )
    .with_parameter(ToolParameter::new("filepath", "Path to the file to write", true))
    .with_parameter(ToolParameter::new("content", "Content to write; \\n for newlines", true).quoted())
}

/// Get the tool definition for edit_file
pub fn edit_file_definition() -> ToolDefinition {
    ToolDefinition::new(
        EDIT_FILE,
        "Edit a file by replacing old content with new",
        RiskLevel::High,
    )
    .with_parameter(ToolParameter::new("filepath", "Path to the file to edit", true))
    .with_parameter(ToolParameter::new("old_text", "Exact text to replace", true).quoted())
    .with_parameter(ToolParameter::new("new_text", "Replacement text", true).quoted())
}

/// Execute the read_file tool
pub fn execute_read_file(call: &ToolCall, ctx: &ToolContext) -> ToolResult {
    let path_str = match call.require(0, "filepath") {
        Ok(p) => p,
        Err(e) => return ToolResult::failure(READ_FILE, ToolError::invalid_argument(e)),
    };
    let path = ctx.resolve(path_str);

    let content = match read_limited(READ_FILE, path_str, &path, ctx) {
        Ok(c) => c,
        Err(failure) => return failure,
    };

    let bytes = content.len();
    ToolResult::success(READ_FILE, content)
        .with_path(path.display().to_string())
        .with_bytes(bytes)
}

/// Execute the write_file tool
pub fn execute_write_file(call: &ToolCall, ctx: &ToolContext) -> ToolResult {
    let path_str = match call.require(0, "filepath") {
        Ok(p) => p,
        Err(e) => return ToolResult::failure(WRITE_FILE, ToolError::invalid_argument(e)),
    };
    let raw_content = match call.require(1, "content") {
        Ok(c) => c,
        Err(e) => return ToolResult::failure(WRITE_FILE, ToolError::invalid_argument(e)),
    };

    let path = ctx.resolve(path_str);
    if path.is_dir() {
        return ToolResult::failure(
            WRITE_FILE,
            ToolError::invalid_argument(format!("'{}' is a directory", path_str)),
        );
    }

    if let Some(parent) = path.parent()
        && !parent.exists()
        && let Err(e) = fs::create_dir_all(parent)
    {
        return ToolResult::failure(
            WRITE_FILE,
            ToolError::execution_failed(format!("Failed to create parent directories: {}", e)),
        );
    }

    let content = unescape_content(raw_content);
    if let Err(e) = fs::write(&path, &content) {
        return ToolResult::failure(WRITE_FILE, io_failure(path_str, "write file", e));
    }

    ToolResult::success(WRITE_FILE, format!("Successfully wrote to {}", path_str))
        .with_path(path.display().to_string())
        .with_bytes(content.len())
}

/// Execute the edit_file tool
///
/// Every occurrence of the old text is replaced. The old text is matched as
/// written first, then with its escapes decoded, so a model quoting a
/// multi-line snippet as `"a\nb"` still finds it.
pub fn execute_edit_file(call: &ToolCall, ctx: &ToolContext) -> ToolResult {
    let path_str = match call.require(0, "filepath") {
        Ok(p) => p,
        Err(e) => return ToolResult::failure(EDIT_FILE, ToolError::invalid_argument(e)),
    };
    let old_text = match call.require(1, "old_text") {
        Ok(t) => t,
        Err(e) => return ToolResult::failure(EDIT_FILE, ToolError::invalid_argument(e)),
    };
    let new_text = match call.require(2, "new_text") {
        Ok(t) => unescape_content(t),
        Err(e) => return ToolResult::failure(EDIT_FILE, ToolError::invalid_argument(e)),
    };

    if old_text.is_empty() {
        return ToolResult::failure(
            EDIT_FILE,
            ToolError::invalid_argument("Text to replace must not be empty"),
        );
    }

    let path = ctx.resolve(path_str);
    let content = match read_limited(EDIT_FILE, path_str, &path, ctx) {
        Ok(c) => c,
        Err(failure) => return failure,
    };

    let decoded_old = unescape_content(old_text);
    let needle = if content.contains(old_text) {
        old_text
    } else if !decoded_old.is_empty() && content.contains(decoded_old.as_str()) {
        decoded_old.as_str()
    } else {
        return ToolResult::failure(
            EDIT_FILE,
            ToolError::new("NOT_FOUND", "Text to replace not found in file"),
        );
    };

    let occurrences = content.matches(needle).count();
    let updated = content.replace(needle, &new_text);
    if let Err(e) = fs::write(&path, &updated) {
        return ToolResult::failure(EDIT_FILE, io_failure(path_str, "write file", e));
    }

    ToolResult::success(EDIT_FILE, format!("Successfully edited {}", path_str))
        .with_path(path.display().to_string())
        .with_bytes(updated.len())
        .with_match_count(occurrences)
}

/// Read a UTF-8 file, enforcing existence, kind and the size limit.
fn read_limited(
    tool: &str,
    path_str: &str,
    path: &Path,
    ctx: &ToolContext,
) -> Result<String, ToolResult> {
    let metadata = match fs::metadata(path) {
        Ok(m) => m,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(ToolResult::failure(tool, ToolError::not_found(path_str)));
        }
        Err(e) => return Err(ToolResult::failure(tool, io_failure(path_str, "read file", e))),
    };

    if !metadata.is_file() {
        return Err(ToolResult::failure(
            tool,
            ToolError::invalid_argument(format!("'{}' is not a file", path_str)),
        ));
    }

    if metadata.len() > ctx.limits.max_file_size {
        return Err(ToolResult::failure(
            tool,
            ToolError::invalid_argument(format!(
                "File too large ({}). Maximum size is {}",
                format_size(metadata.len()),
                format_size(ctx.limits.max_file_size)
            )),
        ));
    }

    match fs::read(path) {
        Ok(bytes) => String::from_utf8(bytes).map_err(|_| {
            ToolResult::failure(
                tool,
                ToolError::execution_failed(format!("'{}' is not valid UTF-8 text", path_str)),
            )
        }),
        Err(e) => Err(ToolResult::failure(tool, io_failure(path_str, "read file", e))),
    }
}

fn io_failure(path_str: &str, action: &str, e: std::io::Error) -> ToolError {
    if e.kind() == ErrorKind::PermissionDenied {
        ToolError::permission_denied(path_str)
    } else {
        ToolError::execution_failed(format!("Failed to {}: {}", action, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::ToolLimits;
    use tempfile::tempdir;

    fn ctx(dir: &Path) -> ToolContext {
        ToolContext::new(dir)
    }

    #[test]
    fn test_read_file_relative_to_working_dir() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("main.py"), "print('hi')\n").unwrap();

        let call = ToolCall::new(READ_FILE).with_arg("main.py");
        let result = execute_read_file(&call, &ctx(dir.path()));

        assert!(result.is_success());
        assert_eq!(result.output(), Some("print('hi')\n"));
        assert_eq!(result.metadata.bytes, Some(12));
    }

    #[test]
    fn test_read_file_not_found() {
        let dir = tempdir().unwrap();
        let call = ToolCall::new(READ_FILE).with_arg("missing.txt");
        let result = execute_read_file(&call, &ctx(dir.path()));

        assert!(!result.is_success());
        assert_eq!(result.error().unwrap().code, "NOT_FOUND");
        assert_eq!(
            result.render(),
            "Error executing read_file: Not found: missing.txt"
        );
    }

    #[test]
    fn test_read_file_directory() {
        let dir = tempdir().unwrap();
        let call = ToolCall::new(READ_FILE).with_arg(".");
        let result = execute_read_file(&call, &ctx(dir.path()));

        assert_eq!(result.error().unwrap().code, "INVALID_ARGUMENT");
    }

    #[test]
    fn test_read_file_too_large() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("big.txt"), "x".repeat(2048)).unwrap();
        let context = ctx(dir.path()).with_limits(ToolLimits {
            max_file_size: 1024,
            ..Default::default()
        });

        let call = ToolCall::new(READ_FILE).with_arg("big.txt");
        let result = execute_read_file(&call, &context);

        let error = result.error().unwrap();
        assert_eq!(error.code, "INVALID_ARGUMENT");
        assert!(error.message.contains("2.0KB"));
    }

    #[test]
    fn test_read_file_binary() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("blob.bin"), [0xff, 0xfe, 0x00]).unwrap();

        let call = ToolCall::new(READ_FILE).with_arg("blob.bin");
        let result = execute_read_file(&call, &ctx(dir.path()));

        assert_eq!(result.error().unwrap().code, "EXECUTION_FAILED");
    }

    #[test]
    fn test_write_file_unescapes_and_creates_parents() {
        let dir = tempdir().unwrap();
        let call = ToolCall::new(WRITE_FILE)
            .with_arg("src/app.py")
            .with_arg("def main():\\n    print(\\\"hi\\\")\\n");
        let result = execute_write_file(&call, &ctx(dir.path()));

        assert!(result.is_success());
        assert_eq!(result.output(), Some("Successfully wrote to src/app.py"));
        assert_eq!(
            fs::read_to_string(dir.path().join("src/app.py")).unwrap(),
            "def main():\n    print(\"hi\")\n"
        );
    }

    #[test]
    fn test_write_file_overwrites() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), "old").unwrap();

        let call = ToolCall::new(WRITE_FILE).with_arg("a.txt").with_arg("new");
        assert!(execute_write_file(&call, &ctx(dir.path())).is_success());
        assert_eq!(fs::read_to_string(dir.path().join("a.txt")).unwrap(), "new");
    }

    #[test]
    fn test_write_file_to_directory() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();

        let call = ToolCall::new(WRITE_FILE).with_arg("sub").with_arg("x");
        let result = execute_write_file(&call, &ctx(dir.path()));
        assert_eq!(result.error().unwrap().code, "INVALID_ARGUMENT");
    }

    #[test]
    fn test_edit_file_replaces_all() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.py"), "x = 1\ny = x + 1\n").unwrap();

        let call = ToolCall::new(EDIT_FILE)
            .with_arg("a.py")
            .with_arg("x")
            .with_arg("value");
        let result = execute_edit_file(&call, &ctx(dir.path()));

        assert!(result.is_success());
        assert_eq!(result.output(), Some("Successfully edited a.py"));
        assert_eq!(result.metadata.match_count, Some(2));
        assert_eq!(
            fs::read_to_string(dir.path().join("a.py")).unwrap(),
            "value = 1\ny = value + 1\n"
        );
    }

    #[test]
    fn test_edit_file_escaped_old_text() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.py"), "a\nb\n").unwrap();

        let call = ToolCall::new(EDIT_FILE)
            .with_arg("a.py")
            .with_arg("a\\nb")
            .with_arg("c\\nd");
        assert!(execute_edit_file(&call, &ctx(dir.path())).is_success());
        assert_eq!(fs::read_to_string(dir.path().join("a.py")).unwrap(), "c\nd\n");
    }

    #[test]
    fn test_edit_file_text_not_found() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.py"), "hello").unwrap();

        let call = ToolCall::new(EDIT_FILE)
            .with_arg("a.py")
            .with_arg("goodbye")
            .with_arg("x");
        let result = execute_edit_file(&call, &ctx(dir.path()));

        assert_eq!(
            result.render(),
            "Error executing edit_file: Text to replace not found in file"
        );
        assert_eq!(fs::read_to_string(dir.path().join("a.py")).unwrap(), "hello");
    }

    #[test]
    fn test_edit_file_missing_file_and_empty_old() {
        let dir = tempdir().unwrap();

        let call = ToolCall::new(EDIT_FILE)
            .with_arg("nope.py")
            .with_arg("a")
            .with_arg("b");
        assert_eq!(
            execute_edit_file(&call, &ctx(dir.path())).error().unwrap().code,
            "NOT_FOUND"
        );

        let call = ToolCall::new(EDIT_FILE)
            .with_arg("nope.py")
            .with_arg("")
            .with_arg("b");
        assert_eq!(
            execute_edit_file(&call, &ctx(dir.path())).error().unwrap().code,
            "INVALID_ARGUMENT"
        );
    }
}
