//! CLI entrypoint for codeagent
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use codeagent_application::{
    AutoApprove, ChatSession, ConversationLogger, DispatchToolsUseCase, LlmGateway, ModelInfo,
    NoConversationLogger, ToolApprovalPort,
};
use codeagent_domain::Model;
use codeagent_infrastructure::{
    ConfigLoader, FileConfig, JsonlConversationLogger, LocalToolExecutor, OllamaGateway,
    expand_home,
};
use codeagent_presentation::{
    AgentRepl, Cli, ConsoleApproval, ConsoleDisplay, ConsoleFormatter, OutputConfig, ReplConfig,
};
use colored::Colorize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_ref());
        return Ok(());
    }

    // === Configuration ===
    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow!("Failed to load configuration: {}", e))?
    };

    let _log_guard = init_tracing(cli.verbose, config.logging.file.as_deref())?;
    info!("Starting codeagent");

    let issues = config.validate();
    if !issues.is_empty() {
        for issue in &issues {
            eprintln!("{}", ConsoleFormatter::error(&issue.to_string()));
        }
        bail!("Invalid configuration ({} issue(s))", issues.len());
    }

    // Applies the color setting, so it must precede any output
    let display = ConsoleDisplay::new(OutputConfig {
        color: !cli.no_color && config.output.color,
        stream: config.output.stream,
        quiet: cli.quiet,
    });

    // === Backend ===
    let base_url = cli.base_url.as_deref().unwrap_or(&config.ollama.base_url);
    let ollama = OllamaGateway::new(base_url, Duration::from_secs(config.ollama.timeout_secs))?;
    let base_url = ollama.base_url().to_string();
    let gateway: Arc<dyn LlmGateway> = Arc::new(ollama);

    let installed = check_connection(gateway.as_ref(), &base_url).await?;
    if installed.is_empty() {
        println!("{}", ConsoleFormatter::models_table(&installed, None));
        return Ok(());
    }

    let interactive = cli.prompt.is_none();
    if interactive && !cli.quiet {
        println!("{}", ConsoleFormatter::success("Connected to Ollama"));
    }

    let model = select_model(&cli, &config, &installed)?;
    info!("Using model {}", model);

    // === Tools ===
    let working_dir = match &cli.cwd {
        Some(dir) => dir
            .canonicalize()
            .with_context(|| format!("Working directory not found: {}", dir.display()))?,
        None => std::env::current_dir().context("Cannot determine current directory")?,
    };
    let executor =
        Arc::new(LocalToolExecutor::new(&working_dir).with_limits(config.tool_limits()));

    let approval: Arc<dyn ToolApprovalPort> = if cli.yes {
        Arc::new(AutoApprove)
    } else {
        Arc::new(ConsoleApproval::new())
    };
    let conversation_logger = open_conversation_log(&config);

    // === Dependency Injection ===
    let settings = config.agent_settings();
    let dispatch = DispatchToolsUseCase::new(executor, settings.clone())
        .with_approval(approval)
        .with_conversation_logger(conversation_logger.clone());
    let options = config.model_options(model.as_str());
    let mut session = ChatSession::new(gateway.clone(), dispatch, model, settings)
        .with_options(options)
        .with_conversation_logger(conversation_logger);

    // Single prompt mode
    if let Some(prompt) = cli.prompt.as_deref() {
        let turn = session.send(prompt, &display).await?;
        if let Some(output) = display.turn_output(&turn) {
            println!("{}", output);
        }
        return Ok(());
    }

    // Interactive mode
    let resolver_config = config.clone();
    let mut repl = AgentRepl::new(session, gateway)
        .with_display(display)
        .with_config(ReplConfig {
            history_file: config.repl.history_path(),
            max_history: config.repl.max_history,
        })
        .with_model_resolver(Box::new(move |name| {
            let resolved = resolver_config.resolve_alias(name).to_string();
            let options = resolver_config.model_options(&resolved);
            (resolved, options)
        }));

    if !cli.quiet {
        println!(
            "{}",
            ConsoleFormatter::models_table(&installed, Some(repl.session().model().as_str()))
        );
    }

    repl.run().await?;
    Ok(())
}

/// Stderr logging filtered by `-v` (or `RUST_LOG`), plus an optional plain
/// file sink.
fn init_tracing(verbose: u8, log_file: Option<&str>) -> Result<Option<WorkerGuard>> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace", // -vvv or more
    };
    let filter = if verbose == 0 {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
    } else {
        EnvFilter::new(level)
    };

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    let (file_layer, guard) = match log_file {
        Some(path) => {
            let path = expand_home(path);
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or(Path::new("."))
                .to_path_buf();
            std::fs::create_dir_all(&dir)
                .with_context(|| format!("Cannot create log directory {}", dir.display()))?;
            let file_name = path
                .file_name()
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("codeagent.log"));

            let appender = tracing_appender::rolling::never(dir, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();

    Ok(guard)
}

/// List installed models, failing with a readable error when the server
/// cannot be reached.
async fn check_connection(gateway: &dyn LlmGateway, base_url: &str) -> Result<Vec<ModelInfo>> {
    match gateway.available_models().await {
        Ok(models) => Ok(models),
        Err(e) => {
            error!("Ollama health check failed: {}", e);
            eprintln!("Make sure Ollama is running: {}", "ollama serve".yellow());
            bail!("Could not connect to Ollama at {}: {}", base_url, e)
        }
    }
}

/// CLI flag, then config, then the first installed model. Aliases are
/// resolved before checking the name is installed.
fn select_model(cli: &Cli, config: &FileConfig, installed: &[ModelInfo]) -> Result<Model> {
    let requested = cli.model.as_deref().or(config.ollama.model.as_deref());

    let Some(requested) = requested else {
        let first = installed
            .first()
            .ok_or_else(|| anyhow!("No models installed"))?;
        return Ok(Model::new(first.name.as_str())?);
    };

    let model = Model::new(config.resolve_alias(requested))?;
    if !installed.iter().any(|m| model.matches(&m.name)) {
        bail!(
            "Model '{}' is not installed. Install it with: ollama pull {}",
            model,
            model
        );
    }
    Ok(model)
}

fn open_conversation_log(config: &FileConfig) -> Arc<dyn ConversationLogger> {
    let Some(path) = config.logging.conversation_log.as_deref() else {
        return Arc::new(NoConversationLogger);
    };

    match JsonlConversationLogger::open(expand_home(path)) {
        Ok(logger) => {
            info!("Conversation log: {}", logger.path().display());
            Arc::new(logger)
        }
        Err(e) => {
            warn!("Could not open conversation log {}: {}", path, e);
            Arc::new(NoConversationLogger)
        }
    }
}
