//! Search command - run the search tool with a console surface.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Result, anyhow};
use clap::Args;
use console::{Style, style};
use indicatif::{ProgressBar, ProgressStyle};
use lookout_agent::{SEARCH_TOOL_NAME, ToolContext, ToolResult, UiNode, UiSurface};
use lookout_search::{SearchDepth, SearchResults};
use parking_lot::Mutex;
use serde_json::{Map, Value, json};
use tokio_util::sync::CancellationToken;

use super::Context;

/// Arguments for the search command.
#[derive(Args, Debug)]
pub struct SearchArgs {
    /// The search query
    #[arg(required = true)]
    pub query: String,

    /// Maximum number of results (defaults to `[search] max_results`)
    #[arg(short = 'n', long)]
    pub max_results: Option<u32>,

    /// Search depth: basic or advanced (defaults to `[search] search_depth`)
    #[arg(short, long)]
    pub depth: Option<SearchDepth>,

    /// Only return results from this domain (repeatable)
    #[arg(long = "include-domain", value_name = "DOMAIN")]
    pub include_domains: Vec<String>,

    /// Never return results from this domain (repeatable)
    #[arg(long = "exclude-domain", value_name = "DOMAIN")]
    pub exclude_domains: Vec<String>,
}

impl SearchArgs {
    /// Tool parameters, with unset flags filled from the config.
    fn to_params(&self, ctx: &Context) -> Value {
        let settings = ctx.search_settings();
        let depth = self.depth.unwrap_or_else(|| settings.search_depth());
        json!({
            "query": self.query,
            "max_results": self.max_results.unwrap_or_else(|| settings.max_results()),
            "search_depth": depth.as_str(),
            "include_domains": self.include_domains,
            "exclude_domains": self.exclude_domains,
        })
    }
}

/// Run the search command.
pub async fn run(args: SearchArgs, ctx: &Context) -> Result<()> {
    let registry = ctx.registry()?;
    let params = args.to_params(ctx);

    if ctx.verbose {
        let dim = Style::new().dim();
        eprintln!("{}", dim.apply_to(format!("Parameters: {}", params)));
    }

    let cancellation = CancellationToken::new();
    let interrupt = cancellation.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            interrupt.cancel();
        }
    });

    let surface = Arc::new(ConsoleSurface::new(!ctx.json_output));
    let tool_ctx = ToolContext::new()
        .with_cancellation(cancellation)
        .with_ui(surface.clone());

    let result = registry.execute(SEARCH_TOOL_NAME, params, &tool_ctx).await;
    surface.clear();

    let (content, narrative) = match result? {
        ToolResult::Json { content, narrative } => (content, narrative),
        ToolResult::Error { message, .. } => return Err(anyhow!(message)),
        ToolResult::Text { content } => (Value::String(content), None),
    };

    if ctx.json_output {
        println!("{}", serde_json::to_string_pretty(&content)?);
    } else if narrative.is_none() {
        let results: SearchResults = serde_json::from_value(content)?;
        render(&results, ctx.verbose);
    }

    match narrative {
        Some(narrative) => Err(anyhow!(narrative)),
        None => Ok(()),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Rendering
// ─────────────────────────────────────────────────────────────────────────────

fn render(results: &SearchResults, verbose: bool) {
    let dim = Style::new().dim();

    if let Some(answer) = results.answer() {
        println!("{}", style("Answer").bold());
        println!("  {}", answer);
        println!();
    }

    if results.results.is_empty() {
        println!("{}", dim.apply_to("No results."));
    }

    for (i, record) in results.results.iter().enumerate() {
        let Some(record) = record.as_object() else {
            continue;
        };
        let title = field(record, "title").unwrap_or("(untitled)");
        println!("{:>3}. {}", i + 1, style(title).bold());
        if let Some(url) = field(record, "url") {
            println!("     {}", style(url).cyan());
        }
        if verbose && let Some(content) = field(record, "content") {
            println!("     {}", dim.apply_to(content));
        }
    }

    if !results.images.is_empty() {
        println!();
        println!("{}", style("Images").bold());
        for image in &results.images {
            match image.description() {
                Some(description) => {
                    println!("  {} {}", style(image.url()).cyan(), dim.apply_to(description))
                }
                None => println!("  {}", style(image.url()).cyan()),
            }
        }
    }

    println!();
    println!(
        "{}",
        dim.apply_to(format!(
            "{} result(s) for \"{}\"",
            results.number_of_results, results.query
        ))
    );
}

fn field<'a>(record: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    record
        .get(key)
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
}

// ─────────────────────────────────────────────────────────────────────────────
// Console Surface
// ─────────────────────────────────────────────────────────────────────────────

/// Renders a spinner on stderr while a pushed section is still streaming.
struct ConsoleSurface {
    enabled: bool,
    spinner: Mutex<Option<ProgressBar>>,
}

impl ConsoleSurface {
    fn new(enabled: bool) -> Self {
        Self {
            enabled,
            spinner: Mutex::new(None),
        }
    }

    fn clear(&self) {
        if let Some(spinner) = self.spinner.lock().take() {
            spinner.finish_and_clear();
        }
    }
}

impl UiSurface for ConsoleSurface {
    fn update(&self, node: Option<UiNode>) {
        let Some(node) = node else {
            self.clear();
            return;
        };
        if !self.enabled || node.value().is_closed() {
            return;
        }

        let UiNode::SearchSection {
            include_domains, ..
        } = &node;
        let message = if include_domains.is_empty() {
            "Searching...".to_string()
        } else {
            format!("Searching {}...", include_domains.join(", "))
        };

        let spinner = ProgressBar::new_spinner();
        if let Ok(template) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
            spinner.set_style(template);
        }
        spinner.set_message(message);
        spinner.enable_steady_tick(Duration::from_millis(100));

        if let Some(previous) = self.spinner.lock().replace(spinner) {
            previous.finish_and_clear();
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use lookout_agent::streamable_value;

    #[test]
    fn test_surface_spinner_lifecycle() {
        let surface = ConsoleSurface::new(true);
        let (writer, value) = streamable_value();

        surface.update(Some(UiNode::search_section(value, Vec::new())));
        assert!(surface.spinner.lock().is_some());

        surface.update(None);
        assert!(surface.spinner.lock().is_none());
        writer.done(None);
    }

    #[test]
    fn test_disabled_surface_never_spins() {
        let surface = ConsoleSurface::new(false);
        let (_writer, value) = streamable_value();
        surface.update(Some(UiNode::search_section(value, vec!["arxiv.org".into()])));
        assert!(surface.spinner.lock().is_none());
    }

    #[test]
    fn test_closed_section_is_not_spun() {
        let surface = ConsoleSurface::new(true);
        let (writer, value) = streamable_value();
        writer.done(Some("{}".into()));
        surface.update(Some(UiNode::search_section(value, Vec::new())));
        assert!(surface.spinner.lock().is_none());
    }

    #[test]
    fn test_field_skips_empty_and_non_string() {
        let record = json!({"title": "", "url": "https://a.com", "score": 0.9});
        let record = record.as_object().unwrap();
        assert_eq!(field(record, "title"), None);
        assert_eq!(field(record, "url"), Some("https://a.com"));
        assert_eq!(field(record, "score"), None);
    }
}
