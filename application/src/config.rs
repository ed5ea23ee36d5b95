//! Application-level configuration.
//!
//! [`AgentSettings`] controls how the chat and dispatch use cases behave.
//! It is filled from the file configuration by the binary; the use cases never
//! read files or environment variables themselves.

use codeagent_domain::DEFAULT_MARKER;
use std::time::Duration;

/// Commands that always need approval, matched as a leading word sequence.
pub const DEFAULT_DANGEROUS_COMMANDS: &[&str] = &[
    "rm", "rmdir", "del", "format", "dd", "mv", "chmod +x", "sudo", "su", "shutdown", "reboot",
];

/// Agent behavior configuration.
#[derive(Debug, Clone)]
pub struct AgentSettings {
    /// Number of past messages replayed to the model each turn
    pub history_window: usize,
    /// Run High-risk tools without asking
    pub auto_execute_tools: bool,
    /// Invocation marker taught to the model
    pub tool_marker: String,
    /// Command prefixes that always require approval
    pub dangerous_commands: Vec<String>,
    /// Upper bound for one generation; `None` waits indefinitely
    pub generation_timeout: Option<Duration>,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            history_window: 6,
            auto_execute_tools: true,
            tool_marker: DEFAULT_MARKER.to_string(),
            dangerous_commands: DEFAULT_DANGEROUS_COMMANDS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            generation_timeout: None,
        }
    }
}

impl AgentSettings {
    pub fn with_history_window(mut self, window: usize) -> Self {
        self.history_window = window;
        self
    }

    pub fn with_auto_execute_tools(mut self, auto: bool) -> Self {
        self.auto_execute_tools = auto;
        self
    }

    pub fn with_tool_marker(mut self, marker: impl Into<String>) -> Self {
        self.tool_marker = marker.into();
        self
    }

    pub fn with_dangerous_commands(mut self, commands: Vec<String>) -> Self {
        self.dangerous_commands = commands;
        self
    }

    pub fn with_generation_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.generation_timeout = timeout;
        self
    }

    /// The dangerous prefix any part of `command` starts with, if any.
    ///
    /// The command is split on `;`, `&`, `|` and newlines, and leading
    /// `NAME=value` assignments are skipped in each part. A prefix matches
    /// when a part equals it or continues with whitespace, so `rm` matches
    /// `ls && rm -rf x` but not `rmdir` or `format_code`.
    pub fn dangerous_prefix(&self, command: &str) -> Option<&str> {
        command
            .split([';', '&', '|', '\n'])
            .map(skip_assignments)
            .filter(|segment| !segment.is_empty())
            .find_map(|segment| {
                self.dangerous_commands
                    .iter()
                    .map(|p| p.trim())
                    .filter(|p| !p.is_empty())
                    .find(|prefix| {
                        segment.strip_prefix(prefix).is_some_and(|rest| {
                            rest.is_empty() || rest.starts_with(char::is_whitespace)
                        })
                    })
            })
    }
}

/// Drop leading `NAME=value` words from a command segment.
fn skip_assignments(segment: &str) -> &str {
    let mut rest = segment.trim_start();
    loop {
        let word_end = rest.find(char::is_whitespace).unwrap_or(rest.len());
        let is_assignment = rest[..word_end].split_once('=').is_some_and(|(name, _)| {
            !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        });
        if !is_assignment {
            return rest;
        }
        rest = rest[word_end..].trim_start();
    }
}
