use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::analysis::AnalysisResult;
use crate::llm::models::{ChatOptions, Message};
use crate::llm::LlmProvider;

pub const LOCAL_SOURCE: &str = "local";

const NARRATIVE_SYSTEM_PROMPT: &str = "You are a social media behavioral analyst. Rewrite the scored \
BIAS framework analysis you are given as a short, encouraging narrative of at most 120 words. \
Keep every number exactly as given and do not invent new metrics.";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CascadeOutcome {
    pub content: String,
    /// Provider name, or `"local"` for the deterministic fallback.
    pub source: String,
}

impl CascadeOutcome {
    pub fn is_local(&self) -> bool {
        self.source == LOCAL_SOURCE
    }
}

/// Tries each provider in order and falls back to a local answer.
/// Never fails.
#[derive(Clone, Default)]
pub struct AiCascade {
    providers: Vec<Arc<dyn LlmProvider>>,
    defaults: ChatOptions,
}

impl AiCascade {
    pub fn new(providers: Vec<Arc<dyn LlmProvider>>) -> Self {
        Self {
            providers,
            defaults: ChatOptions::default(),
        }
    }

    pub fn with_defaults(mut self, defaults: ChatOptions) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn provider_names(&self) -> Vec<String> {
        self.providers.iter().map(|p| p.name().to_string()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    pub async fn complete<F>(
        &self,
        messages: &[Message],
        options: ChatOptions,
        fallback: F,
    ) -> CascadeOutcome
    where
        F: FnOnce() -> String,
    {
        let options = ChatOptions {
            model: options.model,
            temperature: options.temperature.or(self.defaults.temperature),
            max_tokens: options.max_tokens.or(self.defaults.max_tokens),
            system_prompt: options.system_prompt.or_else(|| self.defaults.system_prompt.clone()),
        };

        for provider in &self.providers {
            match provider.chat(messages, options.clone()).await {
                Ok(response) => {
                    debug!(
                        provider = provider.name(),
                        model = %response.model,
                        "cascade tier succeeded"
                    );
                    return CascadeOutcome {
                        content: response.content,
                        source: provider.name().to_string(),
                    };
                }
                Err(e) => {
                    warn!(
                        provider = provider.name(),
                        error = %e,
                        "cascade tier failed, trying next"
                    );
                }
            }
        }

        CascadeOutcome {
            content: fallback(),
            source: LOCAL_SOURCE.to_string(),
        }
    }

    /// Rewrites the deterministic summary of `result`; the summary itself is
    /// the local fallback.
    pub async fn narrate(&self, result: &AnalysisResult, subject: &str) -> CascadeOutcome {
        let layers: Vec<String> = result
            .layers
            .iter()
            .map(|l| format!("{} {}: {} ({})", l.layer.code(), l.layer.name(), l.score, l.finding))
            .collect();
        let prompt = format!(
            "Subject: {}\nOverall score: {}/100\nLayers:\n{}\nRecommendations:\n{}\nSummary: {}",
            subject,
            result.overall_score,
            layers.join("\n"),
            result.recommendations.join("\n"),
            result.summary
        );
        let options = ChatOptions {
            system_prompt: Some(NARRATIVE_SYSTEM_PROMPT.to_string()),
            ..Default::default()
        };

        self.complete(&[Message::user(prompt)], options, || result.summary.clone())
            .await
    }
}
