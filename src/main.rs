use std::sync::Arc;

use clap::Parser;
use feedback_analytics::analysis;
use feedback_analytics::analysis::Aggregator;
use feedback_analytics::analysis::FeedbackAnalyzer;
use feedback_analytics::cli::*;
use feedback_analytics::config::AppConfig;
use feedback_analytics::database::Database;
use tracing::info;

/// Database plus an aggregator with caches sized from configuration
async fn connect(config: &AppConfig) -> feedback_analytics::Result<(Database, Aggregator)> {
    let database = Database::from_config(config).await?;
    analysis::initialize();
    let analyzer = Arc::new(FeedbackAnalyzer::from_config(&config.cache));
    Ok((database, Aggregator::new(analyzer, config.analysis.clone())))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = match &cli.config {
        Some(path) => AppConfig::load_layered(Some(&*path.to_string_lossy()))?,
        None => AppConfig::load()?,
    };

    // Initialize logging
    if cli.verbose {
        feedback_analytics::logging::init_logging_with_level("debug")?;
    } else if cli.command.is_offline() {
        feedback_analytics::logging::init_simple_logging()?;
    } else {
        feedback_analytics::logging::init_logging_with_config(Some(&config))?;
    }
    info!("Configuration loaded successfully");

    // Execute the requested command
    match cli.command {
        Commands::Serve {
            host,
            port,
            no_cors,
            no_warm_up,
        } => {
            handle_serve_api(&config, host, port, no_cors, no_warm_up).await?;
        }
        Commands::Init { force, drop } => {
            let database = Database::from_config(&config).await?;
            handle_init_command(&database, force, drop).await?;
        }
        Commands::Import { file } => {
            let database = Database::from_config(&config).await?;
            handle_import_command(&database, &file).await?;
        }
        Commands::Analysis { json } => {
            let (database, aggregator) = connect(&config).await?;
            handle_analysis_command(&database, &aggregator, json).await?;
        }
        Commands::Service { name, json } => {
            let (database, aggregator) = connect(&config).await?;
            handle_service_command(&database, &aggregator, &name, json).await?;
        }
        Commands::Warmup => {
            let (database, aggregator) = connect(&config).await?;
            handle_warmup_command(&database, &aggregator).await?;
        }
        Commands::Feedbacks { limit, skip, json } => {
            let (database, aggregator) = connect(&config).await?;
            handle_feedbacks_command(&database, &aggregator, limit, skip, json).await?;
        }
        Commands::Sentiment { text } => {
            analysis::initialize();
            handle_sentiment_command(&text)?;
        }
        Commands::Keywords { text, top } => {
            analysis::initialize();
            handle_keywords_command(&text, top)?;
        }
        Commands::Config => {
            handle_config_command(&config)?;
        }
    }

    Ok(())
}
