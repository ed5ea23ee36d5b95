//! Presentation-level configuration
//!
//! What the terminal front end needs to know, already resolved from the
//! config file and CLI flags by the binary.

use std::path::PathBuf;

/// Output configuration for the presentation layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputConfig {
    /// Enable colored terminal output
    pub color: bool,
    /// Print tokens as they arrive instead of the whole reply at the end
    pub stream: bool,
    /// Hide the spinner and tool progress lines
    pub quiet: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            color: true,
            stream: true,
            quiet: false,
        }
    }
}

/// REPL configuration for the presentation layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplConfig {
    /// Where input history is kept; `None` disables it
    pub history_file: Option<PathBuf>,
    pub max_history: usize,
}

impl Default for ReplConfig {
    fn default() -> Self {
        Self {
            history_file: None,
            max_history: 1000,
        }
    }
}
