pub mod cascade;
pub mod gemini;
pub mod models;
pub mod openai;

use gemini::GeminiProvider;
use openai::OpenAiProvider;

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

use crate::config::AppConfig;
use cascade::AiCascade;
use models::{ChatOptions, ChatResponse, Message};

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("Network Error: {0}")]
    Network(String),
    #[error("API Error: {0}")]
    Api(String),
    #[error("Invalid Response: {0}")]
    InvalidResponse(String),
    #[error("Rate Limited")]
    RateLimited,
    #[error("Request Timed Out")]
    Timeout,
    #[error("Provider Not Configured")]
    NotConfigured,
}

impl LlmError {
    pub(crate) fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            LlmError::Timeout
        } else {
            LlmError::Network(err.without_url().to_string())
        }
    }
}

#[async_trait]
pub trait LlmProvider: Send + Sync {
    fn name(&self) -> &str;

    async fn chat(
        &self,
        messages: &[Message],
        options: ChatOptions,
    ) -> Result<ChatResponse, LlmError>;
}

pub(crate) fn http_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}

/// Builds providers from config in cascade order, skipping any without a key.
pub struct ProviderFactory;

impl ProviderFactory {
    pub fn create_all(config: &AppConfig) -> Vec<Arc<dyn LlmProvider>> {
        let timeout = Duration::from_secs(config.llm.timeout_secs.max(1));
        let mut providers: Vec<Arc<dyn LlmProvider>> = Vec::new();

        let openai = &config.llm.openai;
        if !openai.api_key.is_empty() {
            providers.push(Arc::new(OpenAiProvider::new(
                openai.api_key.clone(),
                openai.api_base.clone(),
                openai.default_model.clone(),
                timeout,
            )));
        }

        let gemini = &config.llm.gemini;
        if !gemini.api_key.is_empty() {
            providers.push(Arc::new(GeminiProvider::new(
                gemini.api_key.clone(),
                gemini.api_base.clone(),
                gemini.default_model.clone(),
                timeout,
            )));
        }

        providers
    }

    pub fn create_cascade(config: &AppConfig) -> AiCascade {
        let providers = Self::create_all(config);
        let names: Vec<&str> = providers.iter().map(|p| p.name()).collect();
        if names.is_empty() {
            info!("No LLM providers configured; narratives use the local fallback only");
        } else {
            info!("LLM cascade: {} -> local", names.join(" -> "));
        }

        AiCascade::new(providers).with_defaults(ChatOptions {
            temperature: Some(config.llm.temperature),
            max_tokens: Some(config.llm.max_tokens),
            ..Default::default()
        })
    }
}
