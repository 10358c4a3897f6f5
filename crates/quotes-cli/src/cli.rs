use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use quotes_core::Resolution;

#[derive(Parser)]
#[command(name = "quotes")]
#[command(about = "Collect quotes locally and keep them in step with a remote feed")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Optional path to local database file
    #[arg(long, global = true, value_name = "PATH")]
    pub db_path: Option<PathBuf>,

    /// Optional path to the config file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Quick capture: quotes "words worth keeping"
    #[arg(trailing_var_arg = true)]
    pub quote: Vec<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add a quote
    #[command(alias = "new")]
    Add {
        /// Quote text (read from stdin when omitted)
        text: Vec<String>,
        /// Who said it
        #[arg(short, long)]
        author: Option<String>,
        /// Category used for filtering
        #[arg(short, long)]
        category: Option<String>,
    },
    /// List quotes
    List {
        /// Only this category (defaults to the saved filter)
        #[arg(short, long)]
        category: Option<String>,
        /// Number of quotes to show
        #[arg(short, long)]
        limit: Option<usize>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List known categories
    Categories,
    /// Show or change the saved category filter
    Filter {
        /// Category to select (`all` clears the filter)
        category: Option<String>,
        /// Clear the saved filter
        #[arg(long, conflicts_with = "category")]
        clear: bool,
    },
    /// Show a random quote
    Random {
        /// Only this category (defaults to the saved filter)
        #[arg(short, long)]
        category: Option<String>,
    },
    /// Import quotes from a JSON array file
    Import {
        /// File holding a JSON array of quotes
        path: PathBuf,
    },
    /// Export quotes
    Export {
        /// Export format
        #[arg(long, value_enum, default_value_t = ExportFormat::Json)]
        format: ExportFormat,
        /// Optional output path (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
    /// Generate shell completion scripts
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: CompletionShell,
        /// Optional output path (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
    /// Reconcile the local collection with the remote feed
    Sync {
        /// Sync against a JSON snapshot file instead of the configured feed
        #[arg(long, global = true, value_name = "PATH")]
        remote_file: Option<PathBuf>,
        #[command(subcommand)]
        command: Option<SyncCommands>,
    },
    /// Inspect or initialize the config file
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum ExportFormat {
    Json,
    Markdown,
}

impl From<ExportFormat> for quotes_core::export::ExportFormat {
    fn from(format: ExportFormat) -> Self {
        match format {
            ExportFormat::Json => Self::Json,
            ExportFormat::Markdown => Self::Markdown,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum CompletionShell {
    Bash,
    Zsh,
    Fish,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum KeepSide {
    Local,
    Server,
}

impl From<KeepSide> for Resolution {
    fn from(side: KeepSide) -> Self {
        match side {
            KeepSide::Local => Self::Local,
            KeepSide::Server => Self::Server,
        }
    }
}

#[derive(Subcommand)]
pub enum SyncCommands {
    /// Keep syncing on an interval until interrupted
    Watch {
        /// Seconds between cycles (defaults to the configured interval)
        #[arg(short, long, value_name = "SECS")]
        interval: Option<u64>,
    },
    /// List open sync conflicts
    Conflicts {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Resolve an open sync conflict
    Resolve {
        /// Quote id of the conflict
        id: String,
        /// Which version to keep
        #[arg(long, value_enum)]
        keep: KeepSide,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the effective configuration
    Show,
    /// Create or update the config file
    Init {
        /// Remote feed URL
        #[arg(long, value_name = "URL")]
        remote_url: Option<String>,
        /// Seconds between scheduled sync cycles
        #[arg(long, value_name = "SECS")]
        interval: Option<u64>,
        /// Fetch timeout in seconds
        #[arg(long, value_name = "SECS")]
        timeout: Option<u64>,
        /// Do not seed default quotes into an empty collection
        #[arg(long)]
        no_seed: bool,
        /// Start from defaults instead of the existing file
        #[arg(long)]
        force: bool,
    },
}
