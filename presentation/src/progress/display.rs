//! Live display of a chat turn

use crate::config::OutputConfig;
use crate::output::console::ConsoleFormatter;
use codeagent_application::{ChatTurn, ResponseDisplay};
use codeagent_domain::ToolResult;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

/// Renders a turn on the terminal: a "Thinking..." spinner until the first
/// token, the tokens themselves, then one line per tool call and result.
///
/// With `stream = false` the reply is buffered and printed once complete.
/// With `quiet` nothing is shown while the turn runs; [`Self::turn_output`]
/// then gives the reply with invocations stripped plus the tool results.
pub struct ConsoleDisplay {
    config: OutputConfig,
    spinner: Mutex<Option<ProgressBar>>,
    buffer: Mutex<String>,
}

impl ConsoleDisplay {
    pub fn new(config: OutputConfig) -> Self {
        if !config.color {
            colored::control::set_override(false);
        }
        Self {
            config,
            spinner: Mutex::new(None),
            buffer: Mutex::new(String::new()),
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
        mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn clear_spinner(&self) {
        if let Some(spinner) = Self::lock(&self.spinner).take() {
            spinner.finish_and_clear();
        }
    }

    /// Text to print after a turn. `None` unless quiet, since otherwise
    /// the reply and tool lines were already shown live.
    pub fn turn_output(&self, turn: &ChatTurn) -> Option<String> {
        if !self.config.quiet {
            return None;
        }
        let text = turn.final_text().trim();
        (!text.is_empty()).then(|| text.to_string())
    }

    fn write_out(text: &str) {
        let mut stdout = io::stdout().lock();
        let _ = stdout.write_all(text.as_bytes());
        let _ = stdout.flush();
    }
}

impl Default for ConsoleDisplay {
    fn default() -> Self {
        Self::new(OutputConfig::default())
    }
}

impl ResponseDisplay for ConsoleDisplay {
    fn on_stream_start(&self) {
        Self::lock(&self.buffer).clear();
        if self.config.quiet {
            return;
        }

        let spinner = ProgressBar::new_spinner();
        spinner.set_style(Self::spinner_style());
        spinner.set_message("Thinking...");
        spinner.enable_steady_tick(Duration::from_millis(100));
        *Self::lock(&self.spinner) = Some(spinner);
    }

    fn on_token(&self, token: &str) {
        self.clear_spinner();
        if self.config.stream && !self.config.quiet {
            Self::write_out(token);
        } else {
            Self::lock(&self.buffer).push_str(token);
        }
    }

    fn on_stream_end(&self) {
        self.clear_spinner();
        let buffered = std::mem::take(&mut *Self::lock(&self.buffer));
        if self.config.quiet {
            return;
        }
        if !buffered.is_empty() {
            Self::write_out(&buffered);
        }
        println!();
    }

    fn on_tools_start(&self, count: usize) {
        if self.config.quiet {
            return;
        }
        let noun = if count == 1 { "tool" } else { "tools" };
        println!("\n{}", format!("Executing {} {}...", count, noun).cyan());
    }

    fn on_tool_call(&self, tool_name: &str, args: &[String]) {
        if !self.config.quiet {
            println!("{}", ConsoleFormatter::tool_call_line(tool_name, args).dimmed());
        }
    }

    fn on_tool_result(&self, _tool_name: &str, result: &ToolResult) {
        if !self.config.quiet {
            println!("{}", ConsoleFormatter::tool_result(result));
        }
    }

    fn on_tool_skipped(&self, _tool_name: &str, message: &str) {
        if !self.config.quiet {
            println!("{}", ConsoleFormatter::tool_skipped(message));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use codeagent_application::{OutcomeKind, ProcessedResponse, ToolOutcome};

    fn turn_with_tool() -> ChatTurn {
        let result = ToolResult::success("read_file", "fn main() {}");
        ChatTurn {
            raw_response: "Reading it.\nTOOL[read_file](src/main.rs)".to_string(),
            processed: ProcessedResponse {
                cleaned: "Reading it.".to_string(),
                outcomes: vec![ToolOutcome {
                    tool_name: "read_file".to_string(),
                    arguments: vec!["src/main.rs".to_string()],
                    kind: OutcomeKind::Executed(result),
                    text: "fn main() {}".to_string(),
                }],
                tool_results: "fn main() {}".to_string(),
                final_text: "Reading it.\n\nfn main() {}".to_string(),
            },
        }
    }

    #[test]
    fn test_quiet_turn_output_has_cleaned_text_and_results() {
        let display = ConsoleDisplay::new(OutputConfig {
            quiet: true,
            ..Default::default()
        });

        let output = display.turn_output(&turn_with_tool()).unwrap();
        assert!(output.starts_with("Reading it."));
        assert!(output.contains("fn main() {}"));
        assert!(!output.contains("TOOL["));
    }

    #[test]
    fn test_live_display_has_no_turn_output() {
        let display = ConsoleDisplay::new(OutputConfig::default());
        assert!(display.turn_output(&turn_with_tool()).is_none());
    }

    #[test]
    fn test_quiet_buffers_streamed_tokens() {
        let display = ConsoleDisplay::new(OutputConfig {
            quiet: true,
            ..Default::default()
        });

        display.on_stream_start();
        display.on_token("TOOL[read_file](a.txt)");
        assert_eq!(*ConsoleDisplay::lock(&display.buffer), "TOOL[read_file](a.txt)");

        display.on_stream_end();
        assert!(ConsoleDisplay::lock(&display.buffer).is_empty());
    }

    #[test]
    fn test_buffered_tokens_are_flushed_at_end() {
        let display = ConsoleDisplay::new(OutputConfig {
            stream: false,
            quiet: true,
            ..Default::default()
        });

        display.on_stream_start();
        display.on_token("Hel");
        display.on_token("lo");
        assert_eq!(*ConsoleDisplay::lock(&display.buffer), "Hello");

        display.on_stream_end();
        assert!(ConsoleDisplay::lock(&display.buffer).is_empty());
    }

    #[test]
    fn test_first_token_clears_spinner() {
        let display = ConsoleDisplay::new(OutputConfig {
            stream: false,
            ..Default::default()
        });

        display.on_stream_start();
        assert!(ConsoleDisplay::lock(&display.spinner).is_some());

        display.on_token("x");
        assert!(ConsoleDisplay::lock(&display.spinner).is_none());
        display.on_stream_end();
    }

    #[test]
    fn test_quiet_has_no_spinner() {
        let display = ConsoleDisplay::new(OutputConfig {
            quiet: true,
            ..Default::default()
        });
        display.on_stream_start();
        assert!(ConsoleDisplay::lock(&display.spinner).is_none());
        display.on_stream_end();
    }
}
