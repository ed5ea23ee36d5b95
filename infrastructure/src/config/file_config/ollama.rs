//! Ollama connection from TOML (`[ollama]` section)

use serde::{Deserialize, Serialize};

/// Raw Ollama configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOllamaConfig {
    /// Server URL
    pub base_url: String,
    /// Model to use when none is given on the command line (alias allowed)
    pub model: Option<String>,
    /// Connect/read timeout for generation, in seconds
    pub timeout_secs: u64,
}

impl Default for FileOllamaConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            model: None,
            timeout_secs: 60,
        }
    }
}
