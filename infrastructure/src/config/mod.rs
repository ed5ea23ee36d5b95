//! Configuration file loading for codeagent
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `CODEAGENT_*` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./codeagent.toml` or `./.codeagent.toml`
//! 4. Global: `$XDG_CONFIG_HOME/codeagent/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, FileAgentConfig, FileConfig, FileLoggingConfig, FileOllamaConfig,
    FileOutputConfig, FileReplConfig, FileToolsConfig, expand_home,
};
pub use loader::ConfigLoader;
