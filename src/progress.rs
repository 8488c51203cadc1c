//! Progress-callback trait for chunk-level pipeline events.
//!
//! Inject an [`Arc<dyn StageProgressCallback>`] via
//! [`crate::config::PipelineConfigBuilder::progress_callback`] to receive
//! advisory sub-progress (chunk index, size before/after) while a stage runs.
//! Milestones that every consumer must see travel as
//! [`crate::output::PipelineEvent`]s instead; callbacks are purely
//! observational.
//!
//! # Example
//!
//! ```rust
//! use plainlang::{PipelineConfig, Stage, StageProgressCallback};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     completed: AtomicUsize,
//! }
//!
//! impl StageProgressCallback for CountingCallback {
//!     fn on_chunk_complete(&self, stage: Stage, index: usize, total: usize, before: usize, after: usize) {
//!         self.completed.fetch_add(1, Ordering::SeqCst);
//!         eprintln!("{stage} chunk {}/{total}: {before} -> {after} chars", index + 1);
//!     }
//! }
//!
//! let config = PipelineConfig::builder()
//!     .progress_callback(Arc::new(CountingCallback { completed: AtomicUsize::new(0) }))
//!     .build()
//!     .unwrap();
//! ```

use crate::config::Stage;
use crate::output::FallbackReason;
use std::sync::Arc;

/// Called by the pipeline as each stage processes its chunks.
///
/// # Thread safety
///
/// Chunks of a stage run concurrently, so `on_chunk_*` methods may be called
/// concurrently and in completion order. Implementations must protect shared
/// mutable state with appropriate synchronisation primitives.
pub trait StageProgressCallback: Send + Sync {
    /// Called once a stage has split its input.
    fn on_stage_start(&self, stage: Stage, total_chunks: usize) {
        let _ = (stage, total_chunks);
    }

    /// Called just before the first request for a chunk is sent.
    ///
    /// `index` is zero-based.
    fn on_chunk_start(&self, stage: Stage, index: usize, total: usize) {
        let _ = (stage, index, total);
    }

    /// Called when a chunk was transformed and accepted.
    fn on_chunk_complete(
        &self,
        stage: Stage,
        index: usize,
        total: usize,
        before_chars: usize,
        after_chars: usize,
    ) {
        let _ = (stage, index, total, before_chars, after_chars);
    }

    /// Called when a chunk fell back to its original text.
    fn on_chunk_fallback(&self, stage: Stage, index: usize, total: usize, reason: FallbackReason) {
        let _ = (stage, index, total, reason);
    }

    /// Called when a chunk failed on every attempt; the stage aborts.
    fn on_chunk_error(&self, stage: Stage, index: usize, total: usize, error: &str) {
        let _ = (stage, index, total, error);
    }

    /// Called once a stage has reassembled its output.
    fn on_stage_complete(&self, stage: Stage, before_chars: usize, after_chars: usize) {
        let _ = (stage, before_chars, after_chars);
    }
}

/// A no-op implementation for callers that don't need sub-progress.
pub struct NoopProgressCallback;

impl StageProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::PipelineConfig`].
pub type ProgressCallback = Arc<dyn StageProgressCallback>;
