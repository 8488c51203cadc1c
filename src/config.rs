//! Configuration types for the plain-language pipeline.
//!
//! All run behaviour is controlled through [`PipelineConfig`], built via its
//! [`PipelineConfigBuilder`]. Keeping every knob in one struct makes it
//! trivial to share the config across concurrent chunk calls and to inject
//! it instead of reading ambient global state.
//!
//! Per-stage constants (chunk ceiling, output ceiling, prompt, retry policy,
//! fallback ratio) live in [`StageConfig`], one instance per [`Stage`].

use crate::error::PlainLangError;
use crate::progress::ProgressCallback;
use crate::prompts;
use edgequake_llm::LLMProvider;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Model used when neither the caller nor `OPENAI_MODEL` names one.
pub const DEFAULT_MODEL: &str = "gpt-5-mini";

/// One of the three document-wide transformations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    /// Strip navigation, ads and other page furniture (web input only).
    Clean,
    /// Reduce the document to its core ideas.
    Summarize,
    /// Rewrite at a 7th-grade reading level.
    Simplify,
}

impl Stage {
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Clean => "clean",
            Stage::Summarize => "summarize",
            Stage::Simplify => "simplify",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-stage constants. Not mutated once the pipeline starts.
#[derive(Debug, Clone, PartialEq)]
pub struct StageConfig {
    pub stage: Stage,

    /// Chunk-size ceiling in estimated tokens (`chars / 4`).
    pub max_chunk_tokens: usize,

    /// Output-size ceiling passed to the service.
    pub max_output_tokens: usize,

    /// System prompt sent with every chunk of this stage.
    pub system_prompt: String,

    /// Instruction prepended to the chunk in the user message.
    pub user_prefix: String,

    /// Total attempts per chunk (1 = no retry).
    ///
    /// Empty replies and call failures are retried; once attempts run out an
    /// empty reply falls back to the original chunk while a call failure is
    /// fatal for the stage.
    pub max_attempts: u32,

    /// Replies shorter than `ratio × input length` are rejected as
    /// over-aggressive and replaced by the original chunk.
    pub min_output_ratio: Option<f64>,
}

impl StageConfig {
    /// Web-page cleaning: 3 000-token chunks, no retry, 10 % length guard.
    pub fn clean() -> Self {
        Self {
            stage: Stage::Clean,
            max_chunk_tokens: 3_000,
            max_output_tokens: 4_000,
            system_prompt: prompts::CLEAN_SYSTEM_PROMPT.to_string(),
            user_prefix: prompts::CLEAN_USER_PREFIX.to_string(),
            max_attempts: 1,
            min_output_ratio: Some(0.1),
        }
    }

    /// Summarisation: effectively whole-document chunks, no retry.
    pub fn summarize() -> Self {
        Self {
            stage: Stage::Summarize,
            max_chunk_tokens: 100_000,
            max_output_tokens: 16_000,
            system_prompt: prompts::SUMMARIZE_SYSTEM_PROMPT.to_string(),
            user_prefix: prompts::SUMMARIZE_USER_PREFIX.to_string(),
            max_attempts: 1,
            min_output_ratio: None,
        }
    }

    /// Simplification: small chunks, three attempts each.
    pub fn simplify() -> Self {
        Self {
            stage: Stage::Simplify,
            max_chunk_tokens: 300,
            max_output_tokens: 4_000,
            system_prompt: prompts::SIMPLIFY_SYSTEM_PROMPT.to_string(),
            user_prefix: prompts::SIMPLIFY_USER_PREFIX.to_string(),
            max_attempts: 3,
            min_output_ratio: None,
        }
    }

    /// Build the user message for one chunk.
    pub fn user_text(&self, chunk: &str) -> String {
        format!("{}\n\n{}", self.user_prefix, chunk)
    }
}

/// Configuration for one pipeline run.
///
/// Built via [`PipelineConfig::builder()`] or using
/// [`PipelineConfig::default()`].
///
/// # Example
/// ```rust
/// use plainlang::PipelineConfig;
///
/// let config = PipelineConfig::builder()
///     .max_workers(3)
///     .model("gpt-4.1-mini")
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct PipelineConfig {
    /// LLM model identifier. Default: `OPENAI_MODEL` or [`DEFAULT_MODEL`].
    pub model: String,

    /// LLM provider name (e.g. "openai", "anthropic", "ollama").
    /// If None along with `provider`, the provider is auto-detected.
    pub provider_name: Option<String>,

    /// Pre-constructed LLM provider. Takes precedence over `provider_name`.
    pub provider: Option<Arc<dyn LLMProvider>>,

    /// Sampling temperature. Default: None (provider default).
    ///
    /// Left unset because some reasoning models reject any explicit value.
    pub temperature: Option<f32>,

    /// Upper bound on concurrent calls within one stage. Default: 5.
    ///
    /// The pool for a stage is `min(chunk count, max_workers)`.
    pub max_workers: usize,

    /// Per-call timeout in seconds. Default: 300.
    ///
    /// Long chunks on a slow service routinely take minutes.
    pub api_timeout_secs: u64,

    /// Base delay before a retry, doubled after each attempt. Default: 500.
    pub retry_backoff_ms: u64,

    /// Navigation timeout for web-page rendering in milliseconds. Default: 15 000.
    pub render_timeout_ms: u64,

    /// Cleaned documents shorter than this many characters trigger a warning.
    /// Default: 100.
    pub short_document_chars: usize,

    /// Headless Chromium executable used to render web pages. Default: "chromium".
    pub chromium_path: String,

    pub clean: StageConfig,
    pub summarize: StageConfig,
    pub simplify: StageConfig,

    /// Receives chunk-level sub-progress. Default: None.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            model: std::env::var("OPENAI_MODEL")
                .ok()
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            provider_name: None,
            provider: None,
            temperature: None,
            max_workers: 5,
            api_timeout_secs: 300,
            retry_backoff_ms: 500,
            render_timeout_ms: 15_000,
            short_document_chars: 100,
            chromium_path: "chromium".to_string(),
            clean: StageConfig::clean(),
            summarize: StageConfig::summarize(),
            simplify: StageConfig::simplify(),
            progress_callback: None,
        }
    }
}

impl fmt::Debug for PipelineConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PipelineConfig")
            .field("model", &self.model)
            .field("provider_name", &self.provider_name)
            .field("provider", &self.provider.as_ref().map(|_| "<dyn LLMProvider>"))
            .field("temperature", &self.temperature)
            .field("max_workers", &self.max_workers)
            .field("api_timeout_secs", &self.api_timeout_secs)
            .field("retry_backoff_ms", &self.retry_backoff_ms)
            .field("render_timeout_ms", &self.render_timeout_ms)
            .field("short_document_chars", &self.short_document_chars)
            .field("chromium_path", &self.chromium_path)
            .field("clean", &self.clean)
            .field("summarize", &self.summarize)
            .field("simplify", &self.simplify)
            .finish()
    }
}

impl PipelineConfig {
    /// Create a new builder for `PipelineConfig`.
    pub fn builder() -> PipelineConfigBuilder {
        PipelineConfigBuilder {
            config: Self::default(),
        }
    }

    /// The constants for `stage`.
    pub fn stage(&self, stage: Stage) -> &StageConfig {
        match stage {
            Stage::Clean => &self.clean,
            Stage::Summarize => &self.summarize,
            Stage::Simplify => &self.simplify,
        }
    }
}

/// Builder for [`PipelineConfig`].
pub struct PipelineConfigBuilder {
    config: PipelineConfig,
}

impl fmt::Debug for PipelineConfigBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PipelineConfigBuilder")
            .field(&self.config)
            .finish()
    }
}

impl PipelineConfigBuilder {
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    pub fn provider_name(mut self, name: impl Into<String>) -> Self {
        self.config.provider_name = Some(name.into());
        self
    }

    pub fn provider(mut self, provider: Arc<dyn LLMProvider>) -> Self {
        self.config.provider = Some(provider);
        self
    }

    pub fn temperature(mut self, t: f32) -> Self {
        self.config.temperature = Some(t.clamp(0.0, 2.0));
        self
    }

    pub fn max_workers(mut self, n: usize) -> Self {
        self.config.max_workers = n;
        self
    }

    pub fn api_timeout_secs(mut self, secs: u64) -> Self {
        self.config.api_timeout_secs = secs;
        self
    }

    pub fn retry_backoff_ms(mut self, ms: u64) -> Self {
        self.config.retry_backoff_ms = ms;
        self
    }

    pub fn render_timeout_ms(mut self, ms: u64) -> Self {
        self.config.render_timeout_ms = ms;
        self
    }

    pub fn short_document_chars(mut self, n: usize) -> Self {
        self.config.short_document_chars = n;
        self
    }

    pub fn chromium_path(mut self, path: impl Into<String>) -> Self {
        self.config.chromium_path = path.into();
        self
    }

    /// Replace the constants of one stage.
    pub fn stage_config(mut self, stage_config: StageConfig) -> Self {
        match stage_config.stage {
            Stage::Clean => self.config.clean = stage_config,
            Stage::Summarize => self.config.summarize = stage_config,
            Stage::Simplify => self.config.simplify = stage_config,
        }
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<PipelineConfig, PlainLangError> {
        let c = &self.config;
        if c.max_workers == 0 {
            return Err(PlainLangError::InvalidConfig(
                "max_workers must be ≥ 1".into(),
            ));
        }
        if c.api_timeout_secs == 0 {
            return Err(PlainLangError::InvalidConfig(
                "api_timeout_secs must be ≥ 1".into(),
            ));
        }
        if c.model.trim().is_empty() {
            return Err(PlainLangError::InvalidConfig("model must not be empty".into()));
        }
        for sc in [&c.clean, &c.summarize, &c.simplify] {
            if sc.max_attempts == 0 {
                return Err(PlainLangError::InvalidConfig(format!(
                    "{} stage needs at least one attempt",
                    sc.stage
                )));
            }
            if sc.max_chunk_tokens == 0 {
                return Err(PlainLangError::InvalidConfig(format!(
                    "{} stage chunk ceiling must be ≥ 1",
                    sc.stage
                )));
            }
            if let Some(ratio) = sc.min_output_ratio {
                if !(0.0..1.0).contains(&ratio) {
                    return Err(PlainLangError::InvalidConfig(format!(
                        "{} stage output ratio must be in [0, 1), got {ratio}",
                        sc.stage
                    )));
                }
            }
        }
        Ok(self.config)
    }
}
