//! The remote transformation seam and its edgequake-llm implementation.
//!
//! The pipeline only ever talks to a [`TextTransformer`]: one system prompt
//! plus one user message in, one reply out. Keeping the seam this narrow
//! lets tests drive every stage with a deterministic mock, and lets the
//! production [`LlmTransformer`] stay a thin adapter over whatever provider
//! edgequake-llm resolves.
//!
//! ## Concurrency
//!
//! Chunks of a stage call `transform` concurrently through a shared
//! reference. Implementations must not keep per-call mutable state: the
//! edgequake-llm providers hold an immutable configuration plus a
//! connection-pooled HTTP client, so every call gets an independent request.

use crate::config::PipelineConfig;
use crate::error::{PlainLangError, TransformError};
use edgequake_llm::{ChatMessage, CompletionOptions, LLMProvider, ProviderFactory};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// One request to the transformation service.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformRequest<'a> {
    pub system_prompt: &'a str,
    pub user_text: &'a str,
    pub model: &'a str,
    pub max_output_tokens: usize,
    /// Upper bound for the call; the invoker enforces it as well.
    pub timeout: Duration,
}

/// An opaque, fallible text-to-text service.
pub trait TextTransformer: Send + Sync {
    /// Send one request and return the raw reply text.
    ///
    /// # Errors
    ///
    /// Returns a [`TransformError`] if the service cannot be reached or
    /// rejects the request.
    fn transform(
        &self,
        request: &TransformRequest<'_>,
    ) -> impl Future<Output = Result<String, TransformError>> + Send;
}

impl<T: TextTransformer + ?Sized> TextTransformer for Arc<T> {
    fn transform(
        &self,
        request: &TransformRequest<'_>,
    ) -> impl Future<Output = Result<String, TransformError>> + Send {
        (**self).transform(request)
    }
}

/// [`TextTransformer`] backed by an edgequake-llm chat provider.
#[derive(Clone)]
pub struct LlmTransformer {
    provider: Arc<dyn LLMProvider>,
    temperature: Option<f32>,
}

impl LlmTransformer {
    pub fn new(provider: Arc<dyn LLMProvider>) -> Self {
        Self {
            provider,
            temperature: None,
        }
    }

    pub fn with_temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature;
        self
    }

    /// Resolve the provider named by `config` (see [`resolve_provider`]).
    pub fn from_config(config: &PipelineConfig) -> Result<Self, PlainLangError> {
        Ok(Self::new(resolve_provider(config)?).with_temperature(config.temperature))
    }
}

impl TextTransformer for LlmTransformer {
    async fn transform(&self, request: &TransformRequest<'_>) -> Result<String, TransformError> {
        let messages = vec![
            ChatMessage::system(request.system_prompt),
            ChatMessage::user(request.user_text),
        ];
        let options = CompletionOptions {
            temperature: self.temperature,
            max_tokens: Some(request.max_output_tokens),
            ..Default::default()
        };

        let response = tokio::time::timeout(
            request.timeout,
            self.provider.chat(&messages, Some(&options)),
        )
        .await
        .map_err(|_| TransformError::Timeout {
            secs: request.timeout.as_secs(),
        })?
        .map_err(|e| TransformError::Api(e.to_string()))?;

        debug!(
            "{}: {} input tokens, {} output tokens",
            request.model, response.prompt_tokens, response.completion_tokens
        );
        Ok(response.content)
    }
}

/// Instantiate a named provider with the given model.
fn create_provider(provider_name: &str, model: &str) -> Result<Arc<dyn LLMProvider>, PlainLangError> {
    ProviderFactory::create_llm_provider(provider_name, model).map_err(|e| {
        PlainLangError::ProviderNotConfigured {
            provider: provider_name.to_string(),
            hint: format!("{e}"),
        }
    })
}

/// Resolve the LLM provider, from most-specific to least-specific.
///
/// 1. **Pre-built provider** (`config.provider`): used as-is.
/// 2. **Named provider** (`config.provider_name`) with `config.model`.
/// 3. **Environment pair** (`EDGEQUAKE_LLM_PROVIDER` + `EDGEQUAKE_MODEL`).
/// 4. **OpenAI key** (`OPENAI_API_KEY`) with `config.model`.
/// 5. **Full auto-detection** (`ProviderFactory::from_env`).
pub fn resolve_provider(config: &PipelineConfig) -> Result<Arc<dyn LLMProvider>, PlainLangError> {
    if let Some(ref provider) = config.provider {
        return Ok(Arc::clone(provider));
    }

    if let Some(ref name) = config.provider_name {
        return create_provider(name, &config.model);
    }

    if let (Ok(prov), Ok(model)) = (
        std::env::var("EDGEQUAKE_LLM_PROVIDER"),
        std::env::var("EDGEQUAKE_MODEL"),
    ) {
        if !prov.is_empty() && !model.is_empty() {
            return create_provider(&prov, &model);
        }
    }

    if let Ok(openai_key) = std::env::var("OPENAI_API_KEY") {
        if !openai_key.is_empty() {
            return create_provider("openai", &config.model);
        }
    }

    let (llm_provider, _embedding) =
        ProviderFactory::from_env().map_err(|e| PlainLangError::ProviderNotConfigured {
            provider: "auto".to_string(),
            hint: format!(
                "No LLM provider could be auto-detected from environment.\n\
                Set OPENAI_API_KEY (and optionally OPENAI_MODEL), or configure a provider.\n\
                Error: {e}"
            ),
        })?;

    Ok(llm_provider)
}
