//! MCP (Model Context Protocol) server implementation.
//!
//! Exposes phrase finding and highlighting over stdio so AI assistants can
//! call the same core library the CLI commands use.
//!
//! Tools that may reach the generative collaborator run on the blocking
//! thread pool; the HTTP client is synchronous.

use std::sync::Arc;

use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{CallToolResult, Content, Implementation, ServerCapabilities, ServerInfo};
use rmcp::schemars;
use rmcp::{ErrorData as McpError, ServerHandler, tool, tool_handler, tool_router};

use lemmatch_core::config::{Config, MatchMode};
use lemmatch_core::highlight::{HighlightStyle, highlight_spans, render};
use lemmatch_core::{RuleAnnotator, parse_phrase_list};

use crate::commands::find::{AnalysisOptions, run_analysis};

/// Parameters for the `get_info` tool.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct GetInfoParams {
    /// Output format: "text" or "json"
    #[serde(default = "default_format")]
    pub format: String,
}

fn default_format() -> String {
    "text".to_string()
}

/// Parameters for the `find_phrases` tool.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct FindPhrasesParams {
    /// The text to search.
    pub text: String,
    /// Key phrases, one entry per phrase.
    pub phrases: Vec<String>,
    /// "full" (lemma matcher plus generative collaborator) or "offline".
    pub mode: Option<MatchMode>,
    /// Punctuation tokens allowed between phrase words.
    pub max_punct_skips: Option<usize>,
}

/// Parameters for the `highlight_text` tool.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct HighlightTextParams {
    /// The text to render.
    pub text: String,
    /// Fragments to mark, usually taken from a `find_phrases` result.
    pub fragments: Vec<String>,
}

/// MCP server exposing phrase finding to AI assistants.
#[derive(Clone)]
pub struct ProjectServer {
    config: Arc<Config>,
    annotator: Arc<RuleAnnotator>,
    tool_router: rmcp::handler::server::router::tool::ToolRouter<Self>,
}

impl Default for ProjectServer {
    fn default() -> Self {
        Self::new(Config::default(), RuleAnnotator::default())
    }
}

#[tool_router]
impl ProjectServer {
    /// Create a server that analyzes with `config` and `annotator`.
    pub fn new(config: Config, annotator: RuleAnnotator) -> Self {
        Self {
            config: Arc::new(config),
            annotator: Arc::new(annotator),
            tool_router: Self::tool_router(),
        }
    }

    /// Get project information.
    #[tool(description = "Get project name, version, and description")]
    #[tracing::instrument(skip(self), fields(otel.kind = "server"))]
    fn get_info(
        &self,
        Parameters(params): Parameters<GetInfoParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::debug!(tool = "get_info", format = %params.format, "executing MCP tool");

        let info = serde_json::json!({
            "name": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION"),
            "description": env!("CARGO_PKG_DESCRIPTION"),
            "mode": self.config.mode.as_str(),
        });

        let text = if params.format == "json" {
            serde_json::to_string_pretty(&info)
                .map_err(|e| McpError::internal_error(format!("serialization error: {e}"), None))?
        } else {
            format!(
                "{} v{}\n{}",
                env!("CARGO_PKG_NAME"),
                env!("CARGO_PKG_VERSION"),
                env!("CARGO_PKG_DESCRIPTION"),
            )
        };

        tracing::info!(tool = "get_info", "MCP tool completed");
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    /// Find phrases and their variants in a text.
    #[tool(
        description = "Find key phrases in Polish text, including inflected, split, reordered and extended variants. Returns occurrences, per-type counts and notices as JSON."
    )]
    #[tracing::instrument(skip(self, params), fields(otel.kind = "server", phrases = params.phrases.len()))]
    async fn find_phrases(
        &self,
        Parameters(params): Parameters<FindPhrasesParams>,
    ) -> Result<CallToolResult, McpError> {
        let mut options = AnalysisOptions::from_config(&self.config);
        if let Some(mode) = params.mode {
            options.mode = mode;
        }
        if let Some(skips) = params.max_punct_skips {
            options.max_punct_skips = skips;
        }
        tracing::debug!(tool = "find_phrases", ?options, "executing MCP tool");

        let phrases = parse_phrase_list(&params.phrases.join("\n"));
        let config = Arc::clone(&self.config);
        let annotator = Arc::clone(&self.annotator);
        let text = params.text;

        let report = tokio::task::spawn_blocking(move || {
            run_analysis(
                &text,
                &phrases,
                annotator.as_ref(),
                &config.generative,
                options,
                |_, _, _| {},
            )
        })
        .await
        .map_err(|e| McpError::internal_error(format!("analysis task failed: {e}"), None))?
        .map_err(|e| McpError::invalid_params(format!("{e:#}"), None))?;

        let json = serde_json::to_string_pretty(&report)
            .map_err(|e| McpError::internal_error(format!("serialization error: {e}"), None))?;

        tracing::info!(
            tool = "find_phrases",
            total = report.counts.total,
            notices = report.notices.len(),
            "MCP tool completed"
        );
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    /// Mark fragments in a text as HTML.
    #[tool(
        description = "Render text as HTML with the given fragments wrapped in mark tags. Overlapping fragments are merged, longest first."
    )]
    #[tracing::instrument(skip(self, params), fields(otel.kind = "server"))]
    fn highlight_text(
        &self,
        Parameters(params): Parameters<HighlightTextParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::debug!(
            tool = "highlight_text",
            fragments = params.fragments.len(),
            "executing MCP tool"
        );

        let spans = highlight_spans(&params.text, params.fragments.iter().map(String::as_str));
        let html = render(&params.text, &spans, &HighlightStyle::html());

        tracing::info!(tool = "highlight_text", spans = spans.len(), "MCP tool completed");
        Ok(CallToolResult::success(vec![Content::text(html)]))
    }
}

#[tool_handler]
impl ServerHandler for ProjectServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: Default::default(),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: env!("CARGO_PKG_NAME").to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Default::default()
            },
            instructions: Some(format!(
                "{} MCP server. Use find_phrases to locate key phrases and their variants, then highlight_text to render the fragments.",
                env!("CARGO_PKG_NAME"),
            )),
        }
    }
}
