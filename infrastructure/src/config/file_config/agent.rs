//! Agent behavior from TOML (`[agent]` section)

use serde::{Deserialize, Serialize};

/// Raw agent configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAgentConfig {
    /// Past messages replayed to the model each turn
    pub history_window: usize,
    /// Run modifying tools without asking
    pub auto_execute_tools: bool,
    /// Invocation marker, e.g. `TOOL` for `TOOL[read_file](main.py)`
    pub tool_marker: String,
    /// Give up on a generation after this many seconds (unset: no limit)
    pub generation_timeout_secs: Option<u64>,
}

impl Default for FileAgentConfig {
    fn default() -> Self {
        Self {
            history_window: 6,
            auto_execute_tools: true,
            tool_marker: "TOOL".to_string(),
            generation_timeout_secs: None,
        }
    }
}
