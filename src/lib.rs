//! # plainlang
//!
//! Rewrite health documents (web pages or PDF files) as plain language at a
//! 7th-grade reading level, preserving their structure.
//!
//! ## Pipeline Overview
//!
//! ```text
//! URL or PDF
//!  │
//!  ├─ 1. Detect     classify the input, derive the output name
//!  ├─ 2. Render     web pages only: headless Chromium prints a temporary PDF
//!  ├─ 3. Extract    pdfium pulls text from every page (spawn_blocking)
//!  ├─ 4. Clean      web pages only: drop navigation, ads and boilerplate
//!  ├─ 5. Summarize  keep the core ideas
//!  ├─ 6. Simplify   rewrite at a 7th-grade level
//!  └─ 7. Output     Result event, text file or NDJSON relay
//! ```
//!
//! Stages 4–6 split the document into size-bounded chunks, send up to five
//! chunks concurrently to an LLM, and reassemble the replies in their
//! original order. A chunk whose reply is empty (or, when cleaning, removes
//! more than 90% of the text) keeps its original text instead; a chunk whose
//! call keeps failing aborts the run.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use plainlang::{Pipeline, PipelineConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Provider auto-detected from OPENAI_API_KEY / EDGEQUAKE_LLM_PROVIDER / ...
//!     let pipeline = Pipeline::from_config(PipelineConfig::default())?;
//!     let path = pipeline.process_to_file("leaflet.pdf", None).await?;
//!     eprintln!("saved to {}", path.display());
//!     Ok(())
//! }
//! ```
//!
//! To drive a progress UI instead, use [`event_stream`] (or
//! [`ndjson_stream`]) and forward each [`PipelineEvent`] as it arrives.
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `plainlang` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! plainlang = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod prompts;
pub mod stream;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{PipelineConfig, PipelineConfigBuilder, Stage, StageConfig, DEFAULT_MODEL};
pub use convert::{EventSender, Pipeline};
pub use error::{PlainLangError, TransformError};
pub use output::{
    Document, FallbackReason, PipelineEvent, PipelineReport, Provenance, SimplifiedText,
    StageStats, TransformResult,
};
pub use pipeline::extract::{PdfiumExtractor, TextExtractor};
pub use pipeline::input::InputSource;
pub use pipeline::llm::{LlmTransformer, TextTransformer, TransformRequest};
pub use pipeline::render::{ChromiumRenderer, PageRenderer};
pub use progress::{NoopProgressCallback, ProgressCallback, StageProgressCallback};
pub use stream::{event_stream, ndjson_stream, EventStream, LineStream};
