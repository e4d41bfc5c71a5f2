//! Config command - configuration management.

use anyhow::Result;
use clap::{Args, Subcommand};
use serde_json::json;

use lookout_config::{SearchBackend, require_api_key, search_order};
use lookout_search::tavily::DEFAULT_ENDPOINT;

use super::Context;

/// Arguments for the config command.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show resolved configuration (API keys are never printed)
    Show,

    /// Show which config files are loaded and their precedence
    Which,
}

/// Run the config command.
pub async fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => cmd_show(ctx).await,
        ConfigCommand::Which => cmd_which(ctx).await,
    }
}

/// Describe where the API key comes from without revealing it.
fn key_status(backend: &SearchBackend, config_value: Option<&str>) -> (bool, String) {
    match require_api_key(backend, config_value) {
        Ok(secret) => (true, format!("✓ set ({})", secret.source)),
        Err(_) => (false, format!("✗ not set (export {})", backend.env_var())),
    }
}

async fn cmd_show(ctx: &Context) -> Result<()> {
    let loaded = &ctx.loaded;
    let search = loaded.config.search();
    let logging = loaded.config.logging();
    let backend = search.backend();
    let endpoint = search.endpoint.as_deref().unwrap_or(DEFAULT_ENDPOINT);
    let (key_present, status) = key_status(&backend, search.api_key.as_deref());

    if ctx.json_output {
        let sources: Vec<String> = loaded
            .loaded_from()
            .iter()
            .map(|p| p.display().to_string())
            .collect();
        let value = json!({
            "sources": sources,
            "search": {
                "provider": backend.name(),
                "endpoint": endpoint,
                "timeout_secs": search.timeout().as_secs(),
                "max_results": search.max_results(),
                "search_depth": search.search_depth(),
                "api_key_set": key_present,
            },
            "logging": {
                "directory": logging.directory.as_ref().map(|d| d.display().to_string()),
                "json_file": logging.json_file_enabled(),
            },
            "warnings": loaded.warnings,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!("# Lookout Configuration\n");

    // Sources
    let sources = loaded.loaded_from();
    if sources.is_empty() {
        println!("No config files loaded (using defaults)\n");
    } else {
        println!("Config files:");
        for source in &sources {
            println!("  {}", source.display());
        }
        println!();
    }

    println!("Search:");
    println!("  provider:     {}", backend);
    println!("  endpoint:     {}", endpoint);
    println!("  timeout:      {}s", search.timeout().as_secs());
    println!("  max_results:  {}", search.max_results());
    println!("  search_depth: {}", search.search_depth());
    println!("  api key:      {}", status);
    println!();

    println!("Logging:");
    match logging.directory {
        Some(ref dir) => println!("  directory: {}", dir.display()),
        None => println!("  directory: <config dir>/logs"),
    }
    println!("  json_file: {}", logging.json_file_enabled());
    println!();

    // Warnings
    if !loaded.warnings.is_empty() {
        println!("Warnings:");
        for w in &loaded.warnings {
            println!("  ⚠ {}", w);
        }
        println!();
    }

    if ctx.verbose {
        println!("---\nRaw config:\n");
        if let Ok(toml_str) = loaded.config.redacted().to_toml() {
            println!("{}", toml_str);
        }
    }

    Ok(())
}

async fn cmd_which(ctx: &Context) -> Result<()> {
    println!("Config file search order (later overrides earlier):\n");

    for path in search_order(None, None) {
        let loaded = ctx
            .loaded
            .sources
            .iter()
            .any(|s| s.loaded && s.path == path);
        let status = if loaded { "✓ loaded" } else { "· not found" };
        println!("  {} {}", status, path.display());
    }

    println!();
    let loaded_count = ctx.loaded.loaded_from().len();
    if loaded_count == 0 {
        println!("No config files found.");
    } else {
        println!("{} config file(s) loaded.", loaded_count);
    }

    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
