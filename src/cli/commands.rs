//! CLI command definitions and argument parsing

use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;

use crate::analysis::DEFAULT_TOP_N;

#[derive(Parser)]
#[command(name = "feedback-analytics")]
#[command(about = "Sentiment and keyword analytics over customer feedback")]
#[command(version)]
pub struct Cli {
    /// Enable verbose debug logging (default: info level)
    #[arg(short, long)]
    pub verbose: bool,

    /// Path to a TOML config file (default: config.toml, then config.example.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the REST API server
    Serve {
        /// Override the configured host
        #[arg(long)]
        host: Option<String>,
        /// Override the configured port
        #[arg(short, long)]
        port: Option<u16>,
        /// Disable CORS regardless of configuration
        #[arg(long)]
        no_cors: bool,
        /// Skip the background cache warm-up
        #[arg(long)]
        no_warm_up: bool,
    },
    /// Create the feedback table and indexes
    Init {
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
        /// Drop the existing table first
        #[arg(long)]
        drop: bool,
    },
    /// Load feedback documents from a JSON array file
    Import {
        /// File containing an array of feedback objects
        file: PathBuf,
    },
    /// Collection-wide statistics and sentiment counts
    Analysis {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Statistics for a single service
    Service {
        /// Service name
        name: String,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Precompute sentiment and keywords for every stored document
    Warmup,
    /// List feedback documents with their analysis
    Feedbacks {
        /// Maximum number of documents
        #[arg(short, long, default_value = "10")]
        limit: i64,
        /// Number of documents to skip
        #[arg(short, long, default_value = "0")]
        skip: i64,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Score the sentiment of a piece of text (no database needed)
    Sentiment {
        /// Text to score
        text: String,
    },
    /// Extract the top keywords of a piece of text (no database needed)
    Keywords {
        /// Text to analyze
        text: String,
        /// Number of keywords
        #[arg(short = 'n', long, default_value_t = DEFAULT_TOP_N)]
        top: usize,
    },
    /// Show the effective configuration
    Config,
}

impl Commands {
    /// Commands that never touch the database
    pub const fn is_offline(&self) -> bool {
        matches!(
            self,
            Self::Sentiment { .. } | Self::Keywords { .. } | Self::Config
        )
    }
}
