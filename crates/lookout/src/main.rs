//! Lookout - streaming web search from the command line
//!
//! Main entry point for the Lookout CLI.

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;

use commands::{config, search, tools};

// ─────────────────────────────────────────────────────────────────────────────
// CLI Structure
// ─────────────────────────────────────────────────────────────────────────────

/// Lookout - streaming web search from the command line
#[derive(Parser)]
#[command(name = "lookout")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output as JSON (for scripting)
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Search the web and render the results
    Search(search::SearchArgs),

    /// List the registered tools
    Tools(tools::ToolsArgs),

    /// Configuration management
    Config(config::ConfigArgs),
}

// ─────────────────────────────────────────────────────────────────────────────
// Main
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let loaded = lookout_config::load_config(None)?;
    let logging = loaded.config.logging();

    // Console (human-readable) + optional rotating JSON file
    let filter = if cli.verbose {
        "lookout=debug,lookout_agent=debug,lookout_search=debug,lookout_config=debug,info"
    } else {
        "lookout=info,lookout_agent=info,lookout_search=info,warn"
    };

    use tracing_subscriber::prelude::*;
    let (file_layer, _guard) = if logging.json_file_enabled() {
        let log_dir = logging
            .directory
            .clone()
            .or_else(|| lookout_config::xdg_config_dir().map(|d| d.join("logs")))
            .unwrap_or_else(|| std::path::PathBuf::from("logs"));
        let file_appender = tracing_appender::rolling::daily(&log_dir, "lookout.log");
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
        let layer = tracing_subscriber::fmt::layer()
            .json()
            .with_writer(non_blocking)
            .with_filter(tracing_subscriber::EnvFilter::new(
                "lookout=trace,lookout_agent=trace,lookout_search=trace,lookout_config=trace,info",
            ));
        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr)
                .with_filter(tracing_subscriber::EnvFilter::new(filter)),
        )
        .with(file_layer)
        .init();

    for warning in &loaded.warnings {
        tracing::warn!("{}", warning);
    }
    loaded.config.validate()?;

    let ctx = commands::Context {
        json_output: cli.json,
        verbose: cli.verbose,
        loaded,
    };

    match cli.command {
        Commands::Search(args) => search::run(args, &ctx).await,
        Commands::Tools(args) => tools::run(args, &ctx).await,
        Commands::Config(args) => config::run(args, &ctx).await,
    }
}
