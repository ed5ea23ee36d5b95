//! Command execution tool: run_command

use super::ToolContext;
use codeagent_domain::tool::{
    entities::{RiskLevel, ToolCall, ToolDefinition, ToolParameter},
    value_objects::{ToolError, ToolResult},
};
use codeagent_domain::truncate_bytes;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

/// Tool name constant
pub const RUN_COMMAND: &str = "run_command";

/// Get the tool definition for run_command
pub fn run_command_definition() -> ToolDefinition {
    ToolDefinition::new(
        RUN_COMMAND,
        "Execute a shell command in the working directory",
        RiskLevel::High,
    )
    .with_parameter(ToolParameter::new("command", "The command to execute", true).quoted())
}

/// Execute the run_command tool
///
/// Runs through `sh -c` (`cmd /C` on Windows) in the working directory. A
/// non-zero exit code is still a successful tool result; the model reads the
/// code from the output. The child is killed when the timeout elapses.
pub async fn execute_run_command(call: &ToolCall, ctx: &ToolContext) -> ToolResult {
    let command_str = match call.require(0, "command") {
        Ok(c) if !c.trim().is_empty() => c,
        Ok(_) => {
            return ToolResult::failure(
                RUN_COMMAND,
                ToolError::invalid_argument("Command must not be empty"),
            );
        }
        Err(e) => return ToolResult::failure(RUN_COMMAND, ToolError::invalid_argument(e)),
    };

    if !ctx.working_dir.is_dir() {
        return ToolResult::failure(
            RUN_COMMAND,
            ToolError::not_found(format!(
                "Working directory does not exist: {}",
                ctx.working_dir.display()
            )),
        );
    }

    let mut cmd = if cfg!(target_os = "windows") {
        let mut c = Command::new("cmd");
        c.args(["/C", command_str]);
        c
    } else {
        let mut c = Command::new("sh");
        c.args(["-c", command_str]);
        c
    };
    cmd.current_dir(&ctx.working_dir)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    debug!(command = %command_str, dir = %ctx.working_dir.display(), "Spawning command");
    let child = match cmd.spawn() {
        Ok(c) => c,
        Err(e) => {
            return ToolResult::failure(
                RUN_COMMAND,
                ToolError::execution_failed(format!("Failed to spawn command: {}", e)),
            );
        }
    };

    let timeout = ctx.limits.command_timeout;
    let output = match tokio::time::timeout(timeout, child.wait_with_output()).await {
        Ok(Ok(output)) => output,
        Ok(Err(e)) => {
            return ToolResult::failure(
                RUN_COMMAND,
                ToolError::execution_failed(format!("Failed to wait for command: {}", e)),
            );
        }
        // Dropping the future drops the child, which kills it
        Err(_) => {
            return ToolResult::failure(
                RUN_COMMAND,
                ToolError::timeout(format!(
                    "Command timed out after {} seconds",
                    timeout.as_secs()
                )),
            );
        }
    };

    let exit_code = output.status.code().unwrap_or(-1);
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);

    let mut combined = stdout.into_owned();
    if !stderr.is_empty() {
        combined.push_str("\n[stderr]\n");
        combined.push_str(&stderr);
    }

    let max = ctx.limits.max_output_bytes;
    if combined.len() > max {
        let kept = truncate_bytes(&combined, max).len();
        combined.truncate(kept);
        combined.push_str("\n... (output truncated)");
    }

    let bytes = combined.len();
    ToolResult::success(
        RUN_COMMAND,
        format!("Command executed. Exit code: {}\n{}", exit_code, combined),
    )
    .with_exit_code(exit_code)
    .with_bytes(bytes)
}
