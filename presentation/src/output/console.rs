//! Console output formatting
//!
//! Every formatter returns a `String`; printing is left to the caller so the
//! REPL, the one-shot runner and tests all share the same text.

use colored::Colorize;
use codeagent_application::ModelInfo;
use codeagent_domain::{TodoList, TodoStatus, ToolResult, ToolSpec, truncate_chars};
use std::path::Path;

/// Longest argument preview shown in a tool call line
const ARG_PREVIEW_CHARS: usize = 50;

/// Output lines of a successful tool shown before eliding the rest
const RESULT_PREVIEW_LINES: usize = 12;

/// Formats agent output for the terminal
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Banner shown when the REPL starts (and for `/help`)
    pub fn welcome() -> String {
        let mut output = String::new();
        output.push_str(&Self::header("codeagent"));
        output.push_str(&format!(
            "\n{}\n",
            "Local coding agent powered by Ollama".dimmed()
        ));
        output.push_str(&Self::help());
        output.push_str(&format!(
            "\n{}\n  {}\n  {}\n  {}\n",
            "Examples:".cyan().bold(),
            "Read the contents of src/main.rs",
            "List all Rust files in this directory",
            "Run the tests with cargo test",
        ));
        output
    }

    pub fn help() -> String {
        let commands = [
            ("/help", "Show this help"),
            ("/clear", "Clear conversation history"),
            ("/model <name>", "Switch model (name or alias)"),
            ("/models", "List installed models"),
            ("/pwd", "Show working directory"),
            ("/cd <path>", "Change working directory"),
            ("/tools", "List available tools"),
            ("/todos", "Show the todo list"),
            ("/exit, /quit", "Exit"),
        ];

        let mut output = format!("\n{}\n", "Commands:".cyan().bold());
        for (command, description) in commands {
            output.push_str(&format!("  {:<16} {}\n", command.cyan(), description));
        }
        output
    }

    /// Status lines printed once the model is chosen
    pub fn ready(model: &str, working_dir: &Path) -> String {
        format!(
            "{} {}\n{}",
            "Agent ready with".cyan(),
            model.cyan().bold(),
            format!("Working directory: {}", working_dir.display()).dimmed()
        )
    }

    /// `/tools` table
    pub fn tools_table(spec: &ToolSpec) -> String {
        let mut output = format!("\n{}\n", "Available Tools".cyan().bold());
        for tool in spec.all() {
            let usage = format!("{}({})", tool.name, tool.usage_arguments());
            let risk = if tool.is_high_risk() {
                "high".yellow()
            } else {
                "low".green()
            };
            output.push_str(&format!(
                "  {:<52} {:<5} {}\n",
                usage.cyan(),
                risk,
                tool.description
            ));
        }
        output
    }

    /// `/todos` table
    pub fn todos_table(todos: &TodoList) -> String {
        if todos.is_empty() {
            return format!("{}\n", "No todos yet".dimmed());
        }

        let (pending, in_progress, completed) = todos.progress();
        let mut output = format!(
            "\n{} {}\n",
            "Task List".cyan().bold(),
            format!(
                "({} pending, {} in progress, {} completed)",
                pending, in_progress, completed
            )
            .dimmed()
        );
        for (i, item) in todos.items().iter().enumerate() {
            let status = match item.status {
                TodoStatus::Pending => item.status.as_str().normal(),
                TodoStatus::InProgress => item.status.as_str().yellow(),
                TodoStatus::Completed => item.status.as_str().green(),
            };
            output.push_str(&format!(
                "  {:>2}. {} {:<11} {}\n",
                i + 1,
                item.status.icon(),
                status,
                item.content
            ));
        }
        output
    }

    /// `/models` table; `current` is marked
    pub fn models_table(models: &[ModelInfo], current: Option<&str>) -> String {
        if models.is_empty() {
            return format!(
                "{}\n",
                "No models found. Install one with: ollama pull llama3.2".yellow()
            );
        }

        let mut output = format!("\n{}\n", "Available Models".cyan().bold());
        for model in models {
            let marker = if current == Some(model.name.as_str()) {
                "*"
            } else {
                " "
            };
            output.push_str(&format!(
                "  {} {:<40} {:>8}\n",
                marker,
                model.name.cyan(),
                format!("{:.1} GB", model.size_gb()).magenta()
            ));
        }
        output
    }

    /// `  → name(arg, ...)` with long arguments shortened
    pub fn tool_call_line(tool_name: &str, args: &[String]) -> String {
        let preview = args
            .iter()
            .map(|arg| truncate_chars(arg, ARG_PREVIEW_CHARS))
            .collect::<Vec<_>>()
            .join(", ");
        format!("  → {}({})", tool_name, preview)
    }

    /// Result of one tool, colored by outcome
    pub fn tool_result(result: &ToolResult) -> String {
        if !result.is_success() {
            return format!("    {} {}", "✗".red(), result.render().red());
        }

        let output = result.output().unwrap_or("");
        let mut lines = output.lines();
        let first = lines.next().unwrap_or("done");
        let mut text = format!("    {} {}", "✓".green(), first.green());

        let rest: Vec<&str> = lines.collect();
        for line in rest.iter().take(RESULT_PREVIEW_LINES) {
            text.push_str(&format!("\n      {}", line.dimmed()));
        }
        if rest.len() > RESULT_PREVIEW_LINES {
            text.push_str(&format!(
                "\n      {}",
                format!("... ({} more lines)", rest.len() - RESULT_PREVIEW_LINES).dimmed()
            ));
        }
        text
    }

    /// Line for a call that did not run
    pub fn tool_skipped(message: &str) -> String {
        format!("    {} {}", "✗".red(), message.red())
    }

    pub fn error(message: &str) -> String {
        format!("{} {}", "Error:".red().bold(), message)
    }

    pub fn success(message: &str) -> String {
        format!("{} {}", "✓".green(), message.green())
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
