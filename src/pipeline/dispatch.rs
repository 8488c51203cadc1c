//! Parallel Dispatcher: fan chunks out, collect results in input order.
//!
//! A single chunk is invoked inline. Several chunks run through a bounded
//! `buffer_unordered` pool of `min(chunks, max_workers)` in-flight calls;
//! every completed result is written into the slot of its original index,
//! never appended in completion order, so the output is identical however
//! the calls race.
//!
//! The first unrecoverable chunk error aborts the stage: the stream is
//! dropped, which cancels sibling calls still in flight, and the error is
//! returned. A stage never degrades to partial output.

use crate::config::StageConfig;
use crate::error::PlainLangError;
use crate::output::TransformResult;
use crate::pipeline::invoke::{invoke, CallSettings};
use crate::pipeline::llm::TextTransformer;
use crate::progress::ProgressCallback;
use futures::stream::{self, StreamExt};
use tracing::{debug, error, info};

/// Transform every chunk, returning one result per chunk in input order.
pub async fn dispatch<T>(
    transformer: &T,
    chunks: &[String],
    stage: &StageConfig,
    settings: &CallSettings,
    max_workers: usize,
    progress: Option<&ProgressCallback>,
) -> Result<Vec<TransformResult>, PlainLangError>
where
    T: TextTransformer + ?Sized,
{
    let total = chunks.len();

    if total <= 1 {
        info!("{}: processing 1 chunk", stage.stage);
        let chunk = chunks.first().map(String::as_str).unwrap_or("");
        let result = run_chunk(transformer, chunk, 0, 1, stage, settings, progress).await?;
        return Ok(vec![result]);
    }

    let workers = total.min(max_workers.max(1));
    info!(
        "{}: processing {} chunks with {} workers",
        stage.stage, total, workers
    );

    let mut slots: Vec<Option<TransformResult>> = vec![None; total];
    // Collected first: a lazily mapped iterator here makes the run future
    // fail the `Send` bound of `tokio::spawn`.
    let calls: Vec<_> = chunks
        .iter()
        .enumerate()
        .map(|(index, chunk)| async move {
            run_chunk(transformer, chunk.as_str(), index, total, stage, settings, progress)
                .await
                .map(|result| (index, result))
        })
        .collect();
    let mut pending = stream::iter(calls).buffer_unordered(workers);

    let mut completed = 0usize;
    while let Some(outcome) = pending.next().await {
        let (index, result) = outcome?;
        completed += 1;
        debug!(
            "{}: chunk {} completed ({}/{} total)",
            stage.stage,
            index + 1,
            completed,
            total
        );
        slots[index] = Some(result);
    }

    slots
        .into_iter()
        .enumerate()
        .map(|(index, slot)| {
            slot.ok_or_else(|| {
                PlainLangError::Internal(format!(
                    "{}: chunk {} produced no result",
                    stage.stage,
                    index + 1
                ))
            })
        })
        .collect()
}

/// Invoke one chunk and report it to the progress callback.
async fn run_chunk<T>(
    transformer: &T,
    chunk: &str,
    index: usize,
    total: usize,
    stage: &StageConfig,
    settings: &CallSettings,
    progress: Option<&ProgressCallback>,
) -> Result<TransformResult, PlainLangError>
where
    T: TextTransformer + ?Sized,
{
    if let Some(cb) = progress {
        cb.on_chunk_start(stage.stage, index, total);
    }
    let outcome = invoke(transformer, chunk, index, total, stage, settings).await;
    if let Some(cb) = progress {
        match &outcome {
            Ok(TransformResult::Transformed(text)) => cb.on_chunk_complete(
                stage.stage,
                index,
                total,
                chunk.chars().count(),
                text.chars().count(),
            ),
            Ok(TransformResult::Fallback { reason, .. }) => {
                cb.on_chunk_fallback(stage.stage, index, total, *reason)
            }
            Err(e) => cb.on_chunk_error(stage.stage, index, total, &e.to_string()),
        }
    }
    if let Err(ref e) = outcome {
        error!("{}: chunk {} failed: {}", stage.stage, index + 1, e);
    }
    outcome
}
