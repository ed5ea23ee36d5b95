//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and converted into application settings
//! by the helpers on [`FileConfig`].

mod agent;
mod logging;
mod ollama;
mod output;
mod repl;
mod tools;

pub use agent::FileAgentConfig;
pub use logging::FileLoggingConfig;
pub use ollama::FileOllamaConfig;
pub use output::FileOutputConfig;
pub use repl::{FileReplConfig, expand_home};
pub use tools::FileToolsConfig;

use crate::tools::ToolLimits;
use codeagent_application::AgentSettings;
use codeagent_domain::ModelOptions;
use codeagent_domain::tool::invocation::is_valid_marker;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;
use thiserror::Error;

/// A problem found by [`FileConfig::validate`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigValidationError {
    #[error("{0} cannot be 0")]
    ZeroValue(String),

    #[error("{0}: model name cannot be empty")]
    EmptyModelName(String),

    #[error("agent.tool_marker cannot be empty")]
    EmptyMarker,

    #[error("agent.tool_marker '{0}' may only contain letters, digits and '_'")]
    InvalidMarker(String),

    #[error("models.\"{model}\": {message}")]
    InvalidModelOption { model: String, message: String },
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Server connection
    pub ollama: FileOllamaConfig,
    /// Sampling options per model name (or family, e.g. `qwen2.5-coder`)
    pub models: BTreeMap<String, ModelOptions>,
    /// Short names for models, e.g. `fast = "llama3.2:3b"`
    pub aliases: BTreeMap<String, String>,
    /// Agent behavior
    pub agent: FileAgentConfig,
    /// Tool limits
    pub tools: FileToolsConfig,
    /// Output settings
    pub output: FileOutputConfig,
    /// REPL settings
    pub repl: FileReplConfig,
    /// Log destinations
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut issues = Vec::new();

        let zero_checks = [
            ("ollama.timeout_secs", self.ollama.timeout_secs == 0),
            ("tools.command_timeout_secs", self.tools.command_timeout_secs == 0),
            ("tools.max_file_size_mb", self.tools.max_file_size_mb == 0),
            ("tools.max_output_kb", self.tools.max_output_kb == 0),
            (
                "agent.generation_timeout_secs",
                self.agent.generation_timeout_secs == Some(0),
            ),
        ];
        for (field, is_zero) in zero_checks {
            if is_zero {
                issues.push(ConfigValidationError::ZeroValue(field.to_string()));
            }
        }

        if let Some(model) = &self.ollama.model
            && model.trim().is_empty()
        {
            issues.push(ConfigValidationError::EmptyModelName("ollama.model".to_string()));
        }
        for (alias, target) in &self.aliases {
            if target.trim().is_empty() {
                issues.push(ConfigValidationError::EmptyModelName(format!("aliases.{}", alias)));
            }
        }

        let marker = &self.agent.tool_marker;
        if marker.is_empty() {
            issues.push(ConfigValidationError::EmptyMarker);
        } else if !is_valid_marker(marker) {
            issues.push(ConfigValidationError::InvalidMarker(marker.clone()));
        }

        for (model, options) in &self.models {
            if let Some(t) = options.temperature
                && !(0.0..=2.0).contains(&t)
            {
                issues.push(ConfigValidationError::InvalidModelOption {
                    model: model.clone(),
                    message: format!("temperature {} is outside 0.0..=2.0", t),
                });
            }
            if let Some(p) = options.top_p
                && !(0.0..=1.0).contains(&p)
            {
                issues.push(ConfigValidationError::InvalidModelOption {
                    model: model.clone(),
                    message: format!("top_p {} is outside 0.0..=1.0", p),
                });
            }
        }

        issues
    }

    /// Follow an alias to the model it names; other names pass through.
    pub fn resolve_alias<'a>(&'a self, name: &'a str) -> &'a str {
        self.aliases
            .get(name.trim())
            .map(|target| target.as_str())
            .unwrap_or(name.trim())
    }

    /// Sampling options for `model`: its `[models]` entry (exact name first,
    /// then family) over the agent defaults.
    pub fn model_options(&self, model: &str) -> ModelOptions {
        let family = model.split(':').next().unwrap_or(model);
        self.models
            .get(model)
            .or_else(|| self.models.get(family))
            .cloned()
            .unwrap_or_default()
            .merged_over(&ModelOptions::agent_defaults())
    }

    /// Settings for the chat and dispatch use cases.
    pub fn agent_settings(&self) -> AgentSettings {
        AgentSettings::default()
            .with_history_window(self.agent.history_window)
            .with_auto_execute_tools(self.agent.auto_execute_tools)
            .with_tool_marker(self.agent.tool_marker.clone())
            .with_dangerous_commands(self.tools.dangerous_commands.clone())
            .with_generation_timeout(self.agent.generation_timeout_secs.map(Duration::from_secs))
    }

    /// Limits for the local tool handlers.
    pub fn tool_limits(&self) -> ToolLimits {
        ToolLimits {
            command_timeout: Duration::from_secs(self.tools.command_timeout_secs),
            max_file_size: self.tools.max_file_size_mb * 1024 * 1024,
            max_output_bytes: self.tools.max_output_kb * 1024,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_full_config() {
        let toml_str = r#"
[ollama]
base_url = "http://gpu-box:11434"
model = "balanced"
timeout_secs = 120

[models."qwen2.5-coder:7b"]
temperature = 0.5
num_predict = 3072
context_window = 8192

[aliases]
fast = "llama3.2:3b"
balanced = "qwen2.5-coder:7b"

[agent]
history_window = 10
auto_execute_tools = false

[tools]
command_timeout_secs = 10
dangerous_commands = ["rm", "git push"]

[output]
color = false

[repl]
history_file = "~/.local/share/codeagent/history.txt"

[logging]
conversation_log = "transcript.jsonl"
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.ollama.base_url, "http://gpu-box:11434");
        assert_eq!(config.ollama.timeout_secs, 120);
        assert_eq!(config.resolve_alias("balanced"), "qwen2.5-coder:7b");
        assert_eq!(config.models["qwen2.5-coder:7b"].num_ctx, Some(8192));
        assert_eq!(config.agent.history_window, 10);
        assert!(!config.agent.auto_execute_tools);
        assert_eq!(config.agent.tool_marker, "TOOL");
        assert_eq!(config.tools.dangerous_commands, vec!["rm", "git push"]);
        assert_eq!(config.tools.max_file_size_mb, 10);
        assert!(!config.output.color);
        assert!(config.output.stream);
        assert_eq!(
            config.logging.conversation_log.as_deref(),
            Some("transcript.jsonl")
        );
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_default_config() {
        let config = FileConfig::default();
        assert_eq!(config.ollama.base_url, "http://localhost:11434");
        assert_eq!(config.ollama.timeout_secs, 60);
        assert!(config.ollama.model.is_none());
        assert_eq!(config.agent.history_window, 6);
        assert!(config.agent.auto_execute_tools);
        assert_eq!(config.tools.command_timeout_secs, 30);
        assert!(config.tools.dangerous_commands.contains(&"sudo".to_string()));
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_validate_reports_every_issue() {
        let toml_str = r#"
[ollama]
timeout_secs = 0
model = "  "

[aliases]
fast = ""

[agent]
tool_marker = "TO OL"

[tools]
command_timeout_secs = 0

[models.llama3]
temperature = 3.5
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        let issues = config.validate();

        assert!(issues.contains(&ConfigValidationError::ZeroValue("ollama.timeout_secs".into())));
        assert!(issues.contains(&ConfigValidationError::ZeroValue(
            "tools.command_timeout_secs".into()
        )));
        assert!(issues.contains(&ConfigValidationError::EmptyModelName("ollama.model".into())));
        assert!(issues.contains(&ConfigValidationError::EmptyModelName("aliases.fast".into())));
        assert!(issues.contains(&ConfigValidationError::InvalidMarker("TO OL".into())));
        assert!(issues.iter().any(|i| matches!(
            i,
            ConfigValidationError::InvalidModelOption { model, .. } if model == "llama3"
        )));
        assert_eq!(issues.len(), 6);
    }

    #[test]
    fn test_validate_empty_marker() {
        let mut config = FileConfig::default();
        config.agent.tool_marker = String::new();
        assert_eq!(config.validate(), vec![ConfigValidationError::EmptyMarker]);
    }

    #[test]
    fn test_resolve_alias_passthrough() {
        let config = FileConfig::default();
        assert_eq!(config.resolve_alias("llama3:8b"), "llama3:8b");
        assert_eq!(config.resolve_alias(" llama3:8b "), "llama3:8b");
    }

    #[test]
    fn test_model_options_lookup() {
        let toml_str = r#"
[models."qwen2.5-coder:7b"]
temperature = 0.5

[models.deepseek-coder-v2]
num_predict = 4096
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();

        let exact = config.model_options("qwen2.5-coder:7b");
        assert_eq!(exact.temperature, Some(0.5));
        assert_eq!(exact.num_predict, Some(2048));

        let family = config.model_options("deepseek-coder-v2:16b");
        assert_eq!(family.num_predict, Some(4096));
        assert_eq!(family.temperature, Some(0.7));

        assert_eq!(config.model_options("llama3:8b"), ModelOptions::agent_defaults());
    }

    #[test]
    fn test_agent_settings_and_limits() {
        let mut config = FileConfig::default();
        config.agent.tool_marker = "ACT".into();
        config.agent.generation_timeout_secs = Some(90);
        config.tools.max_file_size_mb = 2;

        let settings = config.agent_settings();
        assert_eq!(settings.tool_marker, "ACT");
        assert_eq!(settings.generation_timeout, Some(Duration::from_secs(90)));
        assert_eq!(settings.dangerous_prefix("sudo ls"), Some("sudo"));

        let limits = config.tool_limits();
        assert_eq!(limits.max_file_size, 2 * 1024 * 1024);
        assert_eq!(limits.command_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_example_config_is_valid() {
        let config: FileConfig =
            toml::from_str(include_str!("../../../../codeagent.example.toml")).unwrap();

        assert!(config.validate().is_empty());
        let model = config.resolve_alias(config.ollama.model.as_deref().unwrap());
        assert_eq!(model, "qwen2.5-coder:7b");
        assert_eq!(config.model_options(model).num_ctx, Some(8192));
        assert_eq!(config.tools.dangerous_commands.len(), 11);
    }

    #[test]
    fn test_expand_home() {
        let home = dirs::home_dir().unwrap();
        assert_eq!(expand_home("~/x/history"), home.join("x/history"));
        assert_eq!(expand_home("/tmp/history"), std::path::PathBuf::from("/tmp/history"));
    }
}
