//! REPL (Read-Eval-Print Loop) for the coding agent

use crate::config::ReplConfig;
use crate::output::console::ConsoleFormatter;
use crate::progress::display::ConsoleDisplay;
use codeagent_application::{ChatError, ChatSession, GatewayError, LlmGateway};
use codeagent_domain::{Model, ModelOptions};
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::{Config, DefaultEditor, Result as RlResult};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

/// Maps a name typed by the user (possibly an alias) to the model name and
/// its sampling options.
pub type ModelResolver = Box<dyn Fn(&str) -> (String, ModelOptions) + Send + Sync>;

/// A slash command typed at the prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Help,
    Clear,
    /// `/model` alone shows the current model
    Model(Option<String>),
    Models,
    Pwd,
    Cd(Option<String>),
    Tools,
    Todos,
    Exit,
    Unknown(String),
}

impl ReplCommand {
    /// Parse a line starting with `/`; other lines are not commands.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        if !line.starts_with('/') {
            return None;
        }

        let (command, args) = match line.split_once(char::is_whitespace) {
            Some((command, args)) => (command, args.trim()),
            None => (line, ""),
        };
        let arg = (!args.is_empty()).then(|| args.to_string());

        Some(match command {
            "/help" | "/h" | "/?" => ReplCommand::Help,
            "/clear" => ReplCommand::Clear,
            "/model" => ReplCommand::Model(arg),
            "/models" => ReplCommand::Models,
            "/pwd" => ReplCommand::Pwd,
            "/cd" => ReplCommand::Cd(arg),
            "/tools" => ReplCommand::Tools,
            "/todos" => ReplCommand::Todos,
            "/exit" | "/quit" | "/q" => ReplCommand::Exit,
            other => ReplCommand::Unknown(other.to_string()),
        })
    }
}

enum CommandResult {
    Continue,
    Exit,
}

/// Interactive REPL around a [`ChatSession`]
pub struct AgentRepl {
    session: ChatSession,
    gateway: Arc<dyn LlmGateway>,
    display: ConsoleDisplay,
    config: ReplConfig,
    model_resolver: ModelResolver,
}

impl AgentRepl {
    pub fn new(session: ChatSession, gateway: Arc<dyn LlmGateway>) -> Self {
        Self {
            session,
            gateway,
            display: ConsoleDisplay::default(),
            config: ReplConfig::default(),
            model_resolver: Box::new(|name| (name.to_string(), ModelOptions::agent_defaults())),
        }
    }

    pub fn with_display(mut self, display: ConsoleDisplay) -> Self {
        self.display = display;
        self
    }

    pub fn with_config(mut self, config: ReplConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_model_resolver(mut self, resolver: ModelResolver) -> Self {
        self.model_resolver = resolver;
        self
    }

    pub fn session(&self) -> &ChatSession {
        &self.session
    }

    /// Run the interactive REPL
    pub async fn run(&mut self) -> RlResult<()> {
        let editor_config = Config::builder()
            .max_history_size(self.config.max_history)?
            .build();
        let mut rl = DefaultEditor::with_config(editor_config)?;

        if let Some(path) = &self.config.history_file {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            if let Err(e) = rl.load_history(path) {
                debug!("No input history loaded from {}: {}", path.display(), e);
            }
        }

        println!("{}", ConsoleFormatter::welcome());
        println!(
            "{}\n",
            ConsoleFormatter::ready(self.session.model().as_str(), &self.session.working_dir())
        );

        loop {
            let readline = rl.readline(&format!("{} ", "❯".cyan().bold()));

            match readline {
                Ok(line) => {
                    let line = line.trim();

                    // Skip empty lines
                    if line.is_empty() {
                        continue;
                    }

                    let _ = rl.add_history_entry(line);

                    if let Some(command) = ReplCommand::parse(line) {
                        match self.handle_command(command).await {
                            CommandResult::Exit => break,
                            CommandResult::Continue => continue,
                        }
                    }

                    self.process_request(line).await;
                }
                Err(ReadlineError::Interrupted) => {
                    println!("{}", "Use /exit to quit".yellow());
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!("{}", "Goodbye!".yellow());
                    break;
                }
                Err(err) => {
                    eprintln!("{}", ConsoleFormatter::error(&format!("{:?}", err)));
                    break;
                }
            }
        }

        if let Some(path) = &self.config.history_file
            && let Err(e) = rl.save_history(path)
        {
            warn!("Could not save input history to {}: {}", path.display(), e);
        }

        Ok(())
    }

    /// Handle slash commands. Returns whether to continue or exit.
    async fn handle_command(&mut self, command: ReplCommand) -> CommandResult {
        match command {
            ReplCommand::Exit => {
                println!("{}", "Goodbye!".yellow());
                return CommandResult::Exit;
            }
            ReplCommand::Help => println!("{}", ConsoleFormatter::welcome()),
            ReplCommand::Clear => {
                self.session.clear_history();
                println!("{}", ConsoleFormatter::success("Conversation cleared"));
            }
            ReplCommand::Model(None) => {
                println!("Current model: {}", self.session.model().as_str().cyan());
                println!("Usage: {}", "/model <name>".cyan());
            }
            ReplCommand::Model(Some(name)) => self.switch_model(&name).await,
            ReplCommand::Models => match self.gateway.available_models().await {
                Ok(models) => println!(
                    "{}",
                    ConsoleFormatter::models_table(&models, Some(self.session.model().as_str()))
                ),
                Err(e) => println!("{}", ConsoleFormatter::error(&e.to_string())),
            },
            ReplCommand::Pwd => println!("{}", self.session.working_dir().display().to_string().blue()),
            ReplCommand::Cd(None) => println!("Usage: {}", "/cd <path>".cyan()),
            ReplCommand::Cd(Some(path)) => {
                match resolve_directory(&self.session.working_dir(), &path) {
                    Some(dir) => {
                        self.session.set_working_dir(&dir);
                        println!(
                            "{}",
                            ConsoleFormatter::success(&format!("Changed to {}", dir.display()))
                        );
                    }
                    None => println!("{}", ConsoleFormatter::error("Directory not found")),
                }
            }
            ReplCommand::Tools => {
                println!("{}", ConsoleFormatter::tools_table(self.session.tool_spec()))
            }
            ReplCommand::Todos => {
                println!("{}", ConsoleFormatter::todos_table(&self.session.todos()))
            }
            ReplCommand::Unknown(cmd) => {
                println!("Unknown command: {}", cmd);
                println!("Type {} for available commands", "/help".cyan());
            }
        }
        CommandResult::Continue
    }

    async fn switch_model(&mut self, requested: &str) {
        let (name, options) = (self.model_resolver)(requested);
        let model = match Model::new(&name) {
            Ok(model) => model,
            Err(e) => {
                println!("{}", ConsoleFormatter::error(&e.to_string()));
                return;
            }
        };

        match self.gateway.available_models().await {
            Ok(models) if !models.iter().any(|m| model.matches(&m.name)) => {
                println!(
                    "{}",
                    ConsoleFormatter::error(&format!(
                        "Model '{}' is not installed. Use /models to list installed models.",
                        model
                    ))
                );
                return;
            }
            Ok(_) => {}
            Err(e) => warn!("Could not verify model {}: {}", model, e),
        }

        self.session.set_model(model, options);
        println!(
            "{}",
            ConsoleFormatter::success(&format!("Switched to {}", self.session.model()))
        );
    }

    async fn process_request(&mut self, request: &str) {
        println!("\n{}", "Assistant".green().bold());

        match self.session.send(request, &self.display).await {
            Ok(turn) => {
                if let Some(output) = self.display.turn_output(&turn) {
                    println!("{}", output);
                }
            }
            Err(e) => {
                println!("{}", ConsoleFormatter::error(&e.to_string()));
                if let ChatError::Gateway(GatewayError::ConnectionError(_)) = e {
                    println!("Make sure Ollama is running: {}", "ollama serve".yellow());
                }
            }
        }
        println!();
    }
}

/// Resolve `/cd` input against the current directory; `None` unless the
/// result is an existing directory.
pub fn resolve_directory(current: &Path, input: &str) -> Option<PathBuf> {
    let input = input.trim();
    let path = if input == "~" {
        dirs::home_dir()?
    } else if let Some(rest) = input.strip_prefix("~/") {
        dirs::home_dir()?.join(rest)
    } else {
        current.join(input)
    };

    path.canonicalize().ok().filter(|p| p.is_dir())
}
