//! Interactive approval of risky tool calls.
//!
//! ```text
//! ⚠ run_command needs approval (command starts with dangerous 'rm')
//!   → run_command(rm -rf target)
//! Run it? [y/N]
//! ```
//!
//! Only `y` or `yes` (any case) approve; anything else, including an empty
//! line, rejects.

use crate::output::console::ConsoleFormatter;
use async_trait::async_trait;
use codeagent_application::{ApprovalError, ApprovalRequest, ToolApprovalPort};
use colored::Colorize;
use std::io::{self, BufRead, Write};

/// Terminal y/N prompt implementing [`ToolApprovalPort`].
pub struct ConsoleApproval;

impl ConsoleApproval {
    pub fn new() -> Self {
        Self
    }

    fn display_request(request: &ApprovalRequest<'_>) {
        println!();
        println!(
            "{} {}",
            "⚠".yellow().bold(),
            format!(
                "{} needs approval ({})",
                request.call.tool_name, request.reason
            )
            .yellow()
        );
        println!(
            "{}",
            ConsoleFormatter::tool_call_line(&request.call.tool_name, &request.call.arguments)
        );
    }

    fn read_answer(input: &mut impl BufRead) -> Result<bool, ApprovalError> {
        print!("{} ", "Run it? [y/N]".bold());
        io::stdout()
            .flush()
            .map_err(|e| ApprovalError::IoError(format!("Failed to flush stdout: {}", e)))?;

        let mut line = String::new();
        let read = input
            .read_line(&mut line)
            .map_err(|e| ApprovalError::IoError(format!("Failed to read input: {}", e)))?;
        if read == 0 {
            return Err(ApprovalError::Cancelled);
        }

        Ok(is_yes(&line))
    }
}

impl Default for ConsoleApproval {
    fn default() -> Self {
        Self::new()
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

#[async_trait]
impl ToolApprovalPort for ConsoleApproval {
    async fn approve(&self, request: &ApprovalRequest<'_>) -> Result<bool, ApprovalError> {
        Self::display_request(request);
        let approved = Self::read_answer(&mut io::stdin().lock())?;
        if !approved {
            println!("{}", "Skipped".dimmed());
        }
        Ok(approved)
    }
}
