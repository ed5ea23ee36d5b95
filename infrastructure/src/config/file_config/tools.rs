//! Tool limits from TOML (`[tools]` section)

use codeagent_application::DEFAULT_DANGEROUS_COMMANDS;
use serde::{Deserialize, Serialize};

/// Raw tools configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileToolsConfig {
    /// `run_command` wall-clock limit
    pub command_timeout_secs: u64,
    /// Largest file `read_file`/`edit_file` will load
    pub max_file_size_mb: u64,
    /// Command output cap
    pub max_output_kb: usize,
    /// Command prefixes that always need approval
    pub dangerous_commands: Vec<String>,
}

impl Default for FileToolsConfig {
    fn default() -> Self {
        Self {
            command_timeout_secs: 30,
            max_file_size_mb: 10,
            max_output_kb: 1024,
            dangerous_commands: DEFAULT_DANGEROUS_COMMANDS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}
