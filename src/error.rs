//! Error types for the plainlang library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`PlainLangError`]: **Fatal**: the pipeline run cannot continue (bad
//!   input, nothing extractable, a chunk that failed after every retry, a
//!   mandatory stage that produced nothing). Returned as
//!   `Err(PlainLangError)` from [`crate::convert::Pipeline::run`] and
//!   surfaced once as a `PipelineEvent::Error`.
//!
//! * [`TransformError`]: **Per call**: one request to the remote
//!   transformation service failed. The invoker decides whether to retry,
//!   fall back, or escalate it to [`PlainLangError::TransformFailed`].

use crate::config::Stage;
use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the plainlang library.
#[derive(Debug, Error)]
pub enum PlainLangError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// The input string was empty or whitespace.
    #[error("input cannot be empty; pass a PDF file path or an http(s) URL")]
    EmptyInput,

    /// The input is neither a valid http(s) URL nor a PDF path.
    #[error("invalid input '{input}': {reason}")]
    InvalidInput { input: String, reason: String },

    /// Input file was not found at the given path.
    #[error("PDF file not found: '{path}'")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("permission denied reading '{path}'")]
    PermissionDenied { path: PathBuf },

    /// The file does not carry a `.pdf` extension.
    #[error("file is not a PDF: '{path}'")]
    NotAPdf { path: PathBuf },

    // ── Extraction errors ─────────────────────────────────────────────────
    /// The PDF could be opened but no page yielded any text.
    #[error("no text could be extracted from '{path}'")]
    ExtractionFailed { path: PathBuf },

    /// pdfium refused to open the document.
    #[error("PDF '{path}' is unreadable: {detail}")]
    CorruptPdf { path: PathBuf, detail: String },

    /// Could not bind to a pdfium library.
    #[error(
        "failed to bind to pdfium library: {0}\n\
Set PDFIUM_LIB_PATH to the directory containing libpdfium, or install it system-wide."
    )]
    PdfiumBindingFailed(String),

    // ── Render errors ─────────────────────────────────────────────────────
    /// Page navigation did not finish within the render timeout.
    #[error("timed out after {timeout_ms}ms while rendering '{url}'")]
    RenderTimeout { url: String, timeout_ms: u64 },

    /// The headless browser failed or produced no PDF.
    #[error("failed to render '{url}' to PDF: {reason}")]
    RenderFailed { url: String, reason: String },

    // ── Transformation errors ─────────────────────────────────────────────
    /// A chunk's remote call failed on every allowed attempt.
    #[error("{stage} failed for chunk {chunk} after {attempts} attempt(s): {detail}")]
    TransformFailed {
        stage: Stage,
        chunk: usize,
        attempts: u32,
        detail: String,
    },

    /// A mandatory stage reassembled to an empty document.
    #[error("{stage} produced empty text; check the transformation service response")]
    EmptyOutput { stage: Stage },

    /// The configured provider is not initialised (missing API key etc.).
    #[error("LLM provider '{provider}' is not configured.\n{hint}")]
    ProviderNotConfigured { provider: String, hint: String },

    // ── Output errors ─────────────────────────────────────────────────────
    /// The event sequence finished without a `Result` event.
    #[error("pipeline did not return a result")]
    NoResult,

    /// Could not create or write the output text file.
    #[error("failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("internal error: {0}")]
    Internal(String),
}

/// A single failed call to the transformation service.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransformError {
    /// No reply arrived before the per-call timeout.
    #[error("call timed out after {secs}s")]
    Timeout { secs: u64 },

    /// The service (or the client) returned an error.
    #[error("{0}")]
    Api(String),
}
