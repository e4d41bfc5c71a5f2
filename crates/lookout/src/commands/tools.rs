//! Tools command - print the registered tool definitions as JSON.

use anyhow::Result;
use clap::Args;

use super::Context;

/// Arguments for the tools command.
#[derive(Args, Debug)]
pub struct ToolsArgs {
    /// Only show the named tool
    pub name: Option<String>,
}

/// Run the tools command.
pub async fn run(args: ToolsArgs, ctx: &Context) -> Result<()> {
    let registry = ctx.registry()?;
    let definitions: Vec<_> = registry
        .definitions()
        .into_iter()
        .filter(|d| args.name.as_deref().is_none_or(|name| d.name == name))
        .collect();

    if let Some(ref name) = args.name
        && definitions.is_empty()
    {
        anyhow::bail!(
            "Unknown tool: {} (available: {})",
            name,
            registry.names().join(", ")
        );
    }

    println!("{}", serde_json::to_string_pretty(&definitions)?);
    Ok(())
}
