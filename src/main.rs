use clap::Parser;
use eyre::{Context, Result};
use log::info;
use std::fs;
use std::path::PathBuf;

mod cli;
mod commands;

use cli::{Cli, Commands};
use mixkit::config::{Config, LogLevel};

fn setup_logging(log_level: &LogLevel) -> Result<()> {
    // Create log directory
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("mixkit")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("mixkit.log");

    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    // RUST_LOG env var takes precedence, otherwise use config log_level
    let mut builder = env_logger::Builder::new();

    if std::env::var("RUST_LOG").is_ok() {
        builder.parse_default_env();
    } else {
        builder.filter_level(log_level.to_level_filter());
    }

    builder.target(env_logger::Target::Pipe(target)).init();

    info!("Logging initialized, writing to: {}", log_file.display());
    info!(
        "Log level: {} (from {})",
        log_level.as_filter(),
        if std::env::var("RUST_LOG").is_ok() { "RUST_LOG env" } else { "config" }
    );
    Ok(())
}

fn run(cli: Cli, config: Config) -> Result<()> {
    match cli.command {
        Commands::Types { manifest, format } => commands::types::run(&manifest, format, &config),
        Commands::Resolve {
            manifest,
            r#type,
            member,
            format,
        } => commands::resolve::run(&manifest, &r#type, member.as_deref(), format, &config),
        Commands::Ledger {
            manifest,
            r#type,
            format,
        } => commands::ledger::run(&manifest, &r#type, format, &config),
        Commands::Call {
            manifest,
            r#type,
            member,
            wrapped,
            init,
            args,
        } => commands::call::run(&manifest, &r#type, &member, wrapped, &init, &args, &config),
        Commands::Attrs {
            manifest,
            r#type,
            with,
            format,
        } => commands::attrs::run(&manifest, &r#type, with.as_ref(), format, &config),
        Commands::Tree { manifest, mermaid } => commands::tree::run(&manifest, mermaid, &config),
        Commands::Merge { files, mode, format } => commands::merge::run(&files, mode, format, &config),
        Commands::Config { action } => commands::config::run(action, &config),
        Commands::Completions { shell } => commands::completions::run(shell),
    }
}

fn main() -> Result<()> {
    // Parse CLI arguments first
    let cli = Cli::parse();

    // Load configuration (before logging, so log messages in Config::load are silent)
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    setup_logging(&config.log_level).context("Failed to setup logging")?;

    info!("Starting mixkit with config from: {:?}", cli.config);

    run(cli, config).context("Command failed")?;

    Ok(())
}
