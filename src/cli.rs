use clap::{Parser, Subcommand, ValueEnum};
use std::io::IsTerminal;
use std::path::PathBuf;

use mixkit::MixMode;

/// Output format for commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text
    Text,
    /// JSON format
    Json,
    /// YAML format
    Yaml,
}

impl OutputFormat {
    /// Resolve the effective output format.
    /// If user specified a format, use it.
    /// Otherwise: TTY → Text, non-TTY (pipe) → Json
    pub fn resolve(user_choice: Option<OutputFormat>) -> OutputFormat {
        match user_choice {
            Some(fmt) => fmt,
            None => {
                if std::io::stdout().is_terminal() {
                    OutputFormat::Text
                } else {
                    OutputFormat::Json
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MergeMode {
    Shallow,
    Deep,
}

impl From<MergeMode> for MixMode {
    fn from(mode: MergeMode) -> Self {
        match mode {
            MergeMode::Shallow => MixMode::Shallow,
            MergeMode::Deep => MixMode::Deep,
        }
    }
}

#[derive(Parser)]
#[command(
    name = "mixkit",
    about = "Inspect and exercise runtime type compositions",
    version = env!("CARGO_PKG_VERSION"),
    after_help = "Logs are written to: ~/.local/share/mixkit/logs/mixkit.log"
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to mixkit.yaml config file")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the types of a manifest with their superclass and mixins
    Types {
        /// Manifest file (or name under paths.manifests)
        manifest: PathBuf,

        /// Output format (default: text for TTY, json for pipes)
        #[arg(long, short = 'o', value_enum)]
        format: Option<OutputFormat>,
    },

    /// Show every member reachable on a type and where it comes from
    Resolve {
        manifest: PathBuf,

        /// Type name
        r#type: String,

        /// Only explain this member
        #[arg(long, short = 'm')]
        member: Option<String>,

        /// Output format (default: text for TTY, json for pipes)
        #[arg(long, short = 'o', value_enum)]
        format: Option<OutputFormat>,
    },

    /// Show the mixin ledger of a type
    Ledger {
        manifest: PathBuf,

        /// Type name
        r#type: String,

        /// Output format (default: text for TTY, json for pipes)
        #[arg(long, short = 'o', value_enum)]
        format: Option<OutputFormat>,
    },

    /// Construct an instance and call one of its members
    Call {
        manifest: PathBuf,

        /// Type name
        r#type: String,

        /// Member to call
        member: String,

        /// Call through a wrapped behavior instead of directly
        #[arg(long)]
        wrapped: bool,

        /// Constructor argument (repeatable, parsed like call arguments)
        #[arg(long, value_name = "ARG")]
        init: Vec<String>,

        /// Arguments (parsed as JSON, plain strings otherwise)
        #[arg(trailing_var_arg = true)]
        args: Vec<String>,
    },

    /// Show the default attributes of a type, optionally merged with a config file
    Attrs {
        manifest: PathBuf,

        /// Type name
        r#type: String,

        /// JSON or YAML file deep-merged over the defaults
        #[arg(long)]
        with: Option<PathBuf>,

        /// Output format (default: text for TTY, json for pipes)
        #[arg(long, short = 'o', value_enum)]
        format: Option<OutputFormat>,
    },

    /// Print the inheritance hierarchy
    Tree {
        manifest: PathBuf,

        /// Emit a mermaid class diagram instead of text
        #[arg(long)]
        mermaid: bool,
    },

    /// Merge JSON/YAML documents: the first is the target
    Merge {
        /// Target document followed by sources
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Merge mode (defaults to merge.mode from config)
        #[arg(long, value_enum)]
        mode: Option<MergeMode>,

        /// Output format (default: text for TTY, json for pipes)
        #[arg(long, short = 'o', value_enum)]
        format: Option<OutputFormat>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show {
        /// Output format (default: text for TTY, json for pipes)
        #[arg(long, short = 'o', value_enum)]
        format: Option<OutputFormat>,
    },

    /// Get a configuration value
    Get {
        /// Configuration key (dot notation)
        key: String,
    },
}
