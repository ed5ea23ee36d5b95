//! REPL configuration from TOML (`[repl]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw REPL configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileReplConfig {
    /// Path to history file (`~` is expanded)
    pub history_file: Option<String>,
    /// Lines of input history kept
    pub max_history: usize,
}

impl Default for FileReplConfig {
    fn default() -> Self {
        Self {
            history_file: None,
            max_history: 1000,
        }
    }
}

impl FileReplConfig {
    /// Where input history is saved; `~/.codeagent_history` unless configured.
    pub fn history_path(&self) -> Option<PathBuf> {
        match &self.history_file {
            Some(path) => Some(expand_home(path)),
            None => dirs::home_dir().map(|home| home.join(".codeagent_history")),
        }
    }
}

/// Expand a leading `~/` to the home directory.
pub fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest);
    }
    PathBuf::from(path)
}
