//! Transform Invoker: one chunk, one stage, with validation and fallback.
//!
//! ## Policy
//!
//! | reply                         | attempts left | outcome                     |
//! |-------------------------------|---------------|-----------------------------|
//! | call error / timeout          | yes           | back off, retry             |
//! | call error / timeout          | no            | `TransformFailed` (fatal)   |
//! | empty after normalisation     | yes           | back off, retry             |
//! | empty after normalisation     | no            | fall back to original chunk |
//! | below `min_output_ratio`      | any           | fall back to original chunk |
//! | anything else                 | any           | accept                      |
//!
//! Clean and summarize allow a single attempt, so an empty reply falls back
//! immediately; simplify allows three.
//!
//! ## Retry Strategy
//!
//! Exponential backoff (`retry_backoff_ms * 2^(attempt-1)`) keeps concurrent
//! chunks from retrying in lock-step against a service that is already
//! struggling: with the 500 ms default the waits are 500 ms then 1 s.

use crate::config::{PipelineConfig, StageConfig};
use crate::error::{PlainLangError, TransformError};
use crate::output::{FallbackReason, TransformResult};
use crate::pipeline::llm::{TextTransformer, TransformRequest};
use crate::pipeline::postprocess::tidy_reply;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, warn};

/// Settings shared by every chunk call of a run.
#[derive(Debug, Clone)]
pub struct CallSettings {
    pub model: String,
    pub timeout: Duration,
    pub retry_backoff: Duration,
}

impl CallSettings {
    pub fn from_config(config: &PipelineConfig) -> Self {
        Self {
            model: config.model.clone(),
            timeout: Duration::from_secs(config.api_timeout_secs),
            retry_backoff: Duration::from_millis(config.retry_backoff_ms),
        }
    }

    fn backoff(&self, attempt: u32) -> Duration {
        self.retry_backoff * 2u32.saturating_pow(attempt.saturating_sub(1))
    }
}

/// Transform chunk `index` of `total` for one stage.
///
/// # Errors
///
/// Returns [`PlainLangError::TransformFailed`] when the last allowed attempt
/// ends in a call error or timeout. Empty or over-aggressive replies never
/// error; they fall back to the original chunk.
pub async fn invoke<T>(
    transformer: &T,
    chunk: &str,
    index: usize,
    total: usize,
    stage: &StageConfig,
    settings: &CallSettings,
) -> Result<TransformResult, PlainLangError>
where
    T: TextTransformer + ?Sized,
{
    let label = format!("[{} {}/{}]", stage.stage, index + 1, total);
    let user_text = stage.user_text(chunk);
    let request = TransformRequest {
        system_prompt: &stage.system_prompt,
        user_text: &user_text,
        model: &settings.model,
        max_output_tokens: stage.max_output_tokens,
        timeout: settings.timeout,
    };
    let input_chars = chunk.trim().chars().count();
    let max_attempts = stage.max_attempts.max(1);

    let mut last_err: Option<TransformError> = None;

    for attempt in 1..=max_attempts {
        if attempt > 1 {
            let backoff = settings.backoff(attempt - 1);
            warn!(
                "{label} retry {}/{} after {}ms",
                attempt,
                max_attempts,
                backoff.as_millis()
            );
            sleep(backoff).await;
        }

        debug!("{label} sending request ({} chars)", chunk.chars().count());
        let reply = match tokio::time::timeout(settings.timeout, transformer.transform(&request)).await
        {
            Ok(Ok(reply)) => reply,
            Ok(Err(e)) => {
                warn!("{label} attempt {attempt} failed: {e}");
                last_err = Some(e);
                continue;
            }
            Err(_) => {
                let e = TransformError::Timeout {
                    secs: settings.timeout.as_secs(),
                };
                warn!("{label} attempt {attempt} failed: {e}");
                last_err = Some(e);
                continue;
            }
        };

        let reply = tidy_reply(&reply);
        if reply.trim().is_empty() {
            if attempt < max_attempts {
                warn!("{label} returned empty content");
                last_err = None;
                continue;
            }
            warn!("{label} returned empty content after {attempt} attempt(s), using original chunk");
            return Ok(fallback(chunk, FallbackReason::EmptyReply));
        }

        if let Some(ratio) = stage.min_output_ratio {
            let output_chars = reply.trim().chars().count();
            if (output_chars as f64) < (input_chars as f64) * ratio {
                warn!(
                    "{label} removed too much content ({output_chars} vs {input_chars} chars), using original chunk"
                );
                return Ok(fallback(chunk, FallbackReason::TooShort));
            }
        }

        info!(
            "{label} {} -> {} characters",
            chunk.chars().count(),
            reply.chars().count()
        );
        return Ok(TransformResult::Transformed(reply));
    }

    // The loop only falls through when the final attempt was a call failure;
    // a final empty reply returns a fallback above.
    let detail = last_err
        .map(|e| e.to_string())
        .unwrap_or_else(|| "unknown error".to_string());
    Err(PlainLangError::TransformFailed {
        stage: stage.stage,
        chunk: index + 1,
        attempts: max_attempts,
        detail,
    })
}

fn fallback(chunk: &str, reason: FallbackReason) -> TransformResult {
    TransformResult::Fallback {
        original: chunk.to_string(),
        reason,
    }
}
