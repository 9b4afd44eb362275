//! HTTP client for OpenAI-compatible chat completion endpoints.

use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use super::GenerativeClient;
use crate::config::GenerativeConfig;
use crate::error::{ResolveError, ResolveResult};

/// Longest error body kept in [`ResolveError::Status`].
const MAX_ERROR_BODY: usize = 512;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    temperature: f64,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ReplyMessage>,
}

#[derive(Debug, Deserialize)]
struct ReplyMessage {
    content: Option<String>,
}

/// Blocking chat completions client.
///
/// Sends one user message per call with the configured model and temperature.
/// No retries: a failed call is reported to the caller as is.
#[derive(Debug, Clone)]
pub struct ChatClient {
    config: GenerativeConfig,
    http: Client,
}

impl ChatClient {
    /// Build a client from explicit configuration.
    pub fn new(config: GenerativeConfig) -> ResolveResult<Self> {
        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder.build()?;
        Ok(Self { config, http })
    }

    /// The configuration this client sends with.
    pub const fn config(&self) -> &GenerativeConfig {
        &self.config
    }
}

impl GenerativeClient for ChatClient {
    #[tracing::instrument(skip_all, fields(endpoint = %self.config.endpoint, model = %self.config.model))]
    fn complete(&self, prompt: &str) -> ResolveResult<String> {
        let api_key = self
            .config
            .credential()
            .ok_or(ResolveError::MissingCredential)?;

        let request = ChatRequest {
            model: &self.config.model,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: self.config.temperature,
        };

        let response = self
            .http
            .post(&self.config.endpoint)
            .bearer_auth(api_key)
            .json(&request)
            .send()?;

        let status = response.status();
        if matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
            return Err(ResolveError::Unauthorized {
                status: status.as_u16(),
            });
        }
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(ResolveError::Status {
                status: status.as_u16(),
                body: truncate(&body, MAX_ERROR_BODY).to_string(),
            });
        }

        let parsed: ChatResponse = response.json()?;
        let content = parsed
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ResolveError::Malformed("response has no choices".into()))?
            .message
            .and_then(|m| m.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| ResolveError::Malformed("first choice has no content".into()))?;

        tracing::debug!(reply_len = content.len(), "completion received");
        Ok(content)
    }
}

/// Cut `s` to at most `max` bytes on a character boundary.
fn truncate(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}
