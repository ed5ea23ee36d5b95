//! CLI command definitions

use clap::Parser;
use std::path::PathBuf;

/// CLI arguments for codeagent
#[derive(Parser, Debug)]
#[command(name = "codeagent")]
#[command(author, version, about = "Local coding agent powered by Ollama")]
#[command(long_about = r#"
codeagent chats with a model served by a local Ollama instance. The model can
read and edit files, run shell commands, search the tree and keep a todo list
by writing TOOL[name](args) into its reply; codeagent runs those tools in the
working directory and shows the results.

Configuration files are loaded from (in priority order):
1. CODEAGENT_* env vars   e.g. CODEAGENT_OLLAMA__BASE_URL
2. --config <path>        Explicit config file
3. ./codeagent.toml       Project-level config
4. ~/.config/codeagent/config.toml   Global config

Example:
  codeagent
  codeagent -m qwen2.5-coder:7b
  codeagent -m fast "List the Rust files in src and summarize main.rs"
"#)]
pub struct Cli {
    /// Run a single prompt and exit instead of starting the REPL
    pub prompt: Option<String>,

    /// Model name or alias (default: config, then first installed model)
    #[arg(short, long, value_name = "MODEL")]
    pub model: Option<String>,

    /// Ollama server URL
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Print only the final reply (tool calls stripped, results appended)
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Working directory for tools (default: current directory)
    #[arg(long, value_name = "DIR")]
    pub cwd: Option<PathBuf>,

    /// Approve every tool call without asking
    #[arg(short, long)]
    pub yes: bool,
}
