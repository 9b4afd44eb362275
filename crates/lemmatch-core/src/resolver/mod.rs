//! Fuzzy variant resolver.
//!
//! Asks a generative collaborator for every variant of a phrase in a text and
//! parses the free-form reply into claimed `(fragment, type)` pairs. Claims
//! are not verified here; the engine checks them against the text.

pub mod client;
pub mod parse;
pub mod prompt;

use crate::config::GenerativeConfig;
use crate::error::ResolveResult;

pub use client::ChatClient;
pub use parse::{ClaimedVariant, ParsedReply, ReportedStats, parse_reply};
pub use prompt::build_prompt;

/// Sends a prompt to a generative model and returns its text reply.
pub trait GenerativeClient: Send + Sync {
    /// Complete `prompt`.
    fn complete(&self, prompt: &str) -> ResolveResult<String>;
}

/// Variants the collaborator claims for one phrase.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    /// Claimed variants, in reply order.
    pub variants: Vec<ClaimedVariant>,
    /// The collaborator's own count breakdown.
    pub reported: ReportedStats,
}

impl From<ParsedReply> for Resolution {
    fn from(reply: ParsedReply) -> Self {
        Self {
            variants: reply.variants,
            reported: reply.reported,
        }
    }
}

/// Finds fuzzy variants of a phrase in a text.
pub trait VariantResolver: Send + Sync {
    /// Resolve variants of `phrase` in `text`.
    fn resolve(&self, text: &str, phrase: &str) -> ResolveResult<Resolution>;
}

/// [`VariantResolver`] backed by a [`GenerativeClient`].
#[derive(Debug, Clone)]
pub struct FuzzyResolver<C = ChatClient> {
    client: C,
}

impl FuzzyResolver<ChatClient> {
    /// Build a resolver that talks to the configured chat endpoint.
    pub fn from_config(config: &GenerativeConfig) -> ResolveResult<Self> {
        ChatClient::new(config.clone()).map(Self::new)
    }
}

impl<C: GenerativeClient> FuzzyResolver<C> {
    /// Wrap a client.
    pub const fn new(client: C) -> Self {
        Self { client }
    }
}

impl<C: GenerativeClient> VariantResolver for FuzzyResolver<C> {
    #[tracing::instrument(skip(self, text), fields(text_len = text.len()))]
    fn resolve(&self, text: &str, phrase: &str) -> ResolveResult<Resolution> {
        let reply = self.client.complete(&build_prompt(text, phrase))?;
        let resolution = Resolution::from(parse_reply(&reply));
        tracing::debug!(claimed = resolution.variants.len(), "reply parsed");
        Ok(resolution)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ResolveError;
    use crate::occurrence::VariantType;
    use std::sync::Mutex;

    struct ScriptedClient {
        reply: ResolveResult<String>,
        prompts: Mutex<Vec<String>>,
    }

    impl GenerativeClient for ScriptedClient {
        fn complete(&self, prompt: &str) -> ResolveResult<String> {
            self.prompts
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .push(prompt.to_string());
            match &self.reply {
                Ok(reply) => Ok(reply.clone()),
                Err(_) => Err(ResolveError::Malformed("scripted failure".into())),
            }
        }
    }

    #[test]
    fn resolve_builds_prompt_and_parses_reply() {
        let client = ScriptedClient {
            reply: Ok("ZNALEZIONE FRAGMENTY:\n1. \"Inteligencja sztuczna\" (typ: przestawione)\n\
                 STATYSTYKI ZNALEZIONYCH WYSTĄPIEŃ:\nŁącznie znaleziono: 1\n"
                .into()),
            prompts: Mutex::new(Vec::new()),
        };
        let resolver = FuzzyResolver::new(client);

        let resolution = resolver
            .resolve("Inteligencja sztuczna też.", "sztuczna inteligencja")
            .unwrap();
        assert_eq!(resolution.variants.len(), 1);
        assert_eq!(resolution.variants[0].variant_type, VariantType::Reordered);
        assert_eq!(resolution.reported.total, Some(1));

        let prompts = resolver.client.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("\"sztuczna inteligencja\""));
        assert!(prompts[0].contains("Inteligencja sztuczna też."));
    }

    #[test]
    fn client_failure_propagates() {
        let resolver = FuzzyResolver::new(ScriptedClient {
            reply: Err(ResolveError::MissingCredential),
            prompts: Mutex::new(Vec::new()),
        });
        assert!(resolver.resolve("tekst", "fraza").is_err());
    }
}
