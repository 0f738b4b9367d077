use colored::*;
use eyre::Result;

use crate::cli::{ConfigAction, OutputFormat};
use mixkit::config::Config;

pub fn run(action: ConfigAction, config: &Config) -> Result<()> {
    match action {
        ConfigAction::Show { format } => show(OutputFormat::resolve(format), config),
        ConfigAction::Get { key } => get(&key, config),
    }
}

fn show(format: OutputFormat, config: &Config) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(config)?);
        }
        OutputFormat::Yaml => {
            println!("{}", serde_yaml::to_string(config)?);
        }
        OutputFormat::Text => {
            println!("{}", "mixkit Configuration".bold());
            println!();

            println!("{}: {}", "log_level".cyan(), config.log_level.as_filter());
            println!();

            println!("{}:", "compose".cyan());
            println!("  max_chain_depth: {}", config.compose.max_chain_depth);
            println!();

            println!("{}:", "merge".cyan());
            println!("  mode: {}", config.get("merge.mode").unwrap_or_default());
            println!();

            println!("{}:", "paths".cyan());
            println!("  manifests: {}", config.paths.manifests.display());
        }
    }

    Ok(())
}

fn get(key: &str, config: &Config) -> Result<()> {
    match config.get(key) {
        Some(v) => println!("{}", v),
        None => eyre::bail!("Unknown config key: {}", key),
    }

    Ok(())
}
