//! Serve command: run the MCP server on stdio.

use anyhow::Context;
use clap::Args;
use rmcp::ServiceExt;
use tracing::{info, instrument};

use lemmatch_core::RuleAnnotator;
use lemmatch_core::config::Config;

use crate::server::ProjectServer;

/// Arguments for the `serve` subcommand.
#[derive(Args, Debug, Default)]
pub struct ServeArgs {}

/// Start the MCP server and block until the client disconnects.
///
/// `max_input_bytes` replaces the configured input limit for tool calls.
#[instrument(name = "cmd_serve", skip_all)]
pub async fn cmd_serve(
    _args: ServeArgs,
    max_input_bytes: Option<usize>,
    mut config: Config,
) -> anyhow::Result<()> {
    config.disable_input_limit = max_input_bytes.is_none();
    config.max_input_bytes = max_input_bytes;

    let lexicon = config.lexicon.clone();
    let annotator = tokio::task::spawn_blocking(move || RuleAnnotator::from_config(&lexicon))
        .await
        .context("lexicon loader task failed")?
        .context("failed to load the lexicon")?;

    info!(mode = %config.mode, "starting MCP server on stdio");
    let service = ProjectServer::new(config, annotator)
        .serve(rmcp::transport::stdio())
        .await
        .context("failed to start MCP server")?;
    service.waiting().await.context("MCP server stopped with an error")?;
    Ok(())
}
