//! The stage pipeline and its synchronous-collect consumer.
//!
//! ## Run sequence
//!
//! ```text
//! detect ──▶ render? ──▶ extract ──▶ clean? ──▶ summarize ──▶ simplify ──▶ cleanup
//!            (web only)              (web only)
//! ```
//!
//! Each stage splits the current [`Document`], dispatches its chunks through
//! the bounded pool and reassembles the results in order; stage N+1 starts
//! only once stage N's whole document is available. Milestones are sent on
//! an [`EventSender`] as they are reached. Any error emits exactly one
//! `Error` event naming the phase that failed, removes the rendered PDF (if
//! any) and is returned to the caller.
//!
//! [`Pipeline::process_to_file`] drains the events itself and persists the
//! simplified text; [`crate::stream::event_stream`] hands them to a remote
//! listener instead.

use crate::config::{PipelineConfig, Stage};
use crate::error::PlainLangError;
use crate::output::{
    Document, PipelineEvent, PipelineReport, Provenance, SimplifiedText, StageStats,
    TransformResult,
};
use crate::pipeline::chunk;
use crate::pipeline::dispatch::dispatch;
use crate::pipeline::extract::{PdfiumExtractor, TextExtractor};
use crate::pipeline::input::InputSource;
use crate::pipeline::invoke::CallSettings;
use crate::pipeline::llm::{LlmTransformer, TextTransformer};
use crate::pipeline::render::{ChromiumRenderer, PageRenderer};
use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

/// Producer side of a run's event sequence.
///
/// Send failures (the consumer has gone away) are ignored; the run itself
/// still completes and returns its outcome.
pub type EventSender = mpsc::UnboundedSender<PipelineEvent>;

/// Where a run is, for error attribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Detect,
    Render,
    Extract,
    Stage(Stage),
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Detect => f.write_str("input detection"),
            Phase::Render => f.write_str("URL to PDF conversion"),
            Phase::Extract => f.write_str("text extraction"),
            Phase::Stage(Stage::Clean) => f.write_str("cleaning"),
            Phase::Stage(Stage::Summarize) => f.write_str("summarization"),
            Phase::Stage(Stage::Simplify) => f.write_str("simplification"),
        }
    }
}

/// Mutable bookkeeping for one run.
struct RunState {
    phase: Phase,
    artifact: Option<PathBuf>,
}

/// A configured plain-language pipeline.
///
/// The collaborators are type parameters so tests (and embedders) can swap
/// the remote service, the PDF extractor or the page renderer. One
/// `Pipeline` can serve any number of sequential or concurrent runs.
pub struct Pipeline<T = LlmTransformer, X = PdfiumExtractor, R = ChromiumRenderer> {
    config: PipelineConfig,
    settings: CallSettings,
    transformer: T,
    extractor: X,
    renderer: R,
}

impl Pipeline {
    /// Build the production pipeline: an edgequake-llm provider resolved from
    /// `config`, pdfium extraction and headless Chromium rendering.
    ///
    /// # Errors
    ///
    /// [`PlainLangError::ProviderNotConfigured`] when no provider can be resolved.
    pub fn from_config(config: PipelineConfig) -> Result<Self, PlainLangError> {
        let transformer = LlmTransformer::from_config(&config)?;
        let renderer = ChromiumRenderer::new(&config.chromium_path);
        Ok(Self::new(config, transformer, PdfiumExtractor::new(), renderer))
    }
}

impl<T, X, R> Pipeline<T, X, R> {
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn transformer(&self) -> &T {
        &self.transformer
    }

    pub fn extractor(&self) -> &X {
        &self.extractor
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }
}

impl<T, X, R> Pipeline<T, X, R>
where
    T: TextTransformer,
    X: TextExtractor,
    R: PageRenderer,
{
    pub fn new(config: PipelineConfig, transformer: T, extractor: X, renderer: R) -> Self {
        let settings = CallSettings::from_config(&config);
        Self {
            config,
            settings,
            transformer,
            extractor,
            renderer,
        }
    }

    /// Run the full pipeline on `input`, sending every milestone to `events`.
    ///
    /// On success the last two events are the `Result` and a final
    /// `Progress`. On failure the last event is a single `Error`.
    pub async fn run(
        &self,
        input: &str,
        events: &EventSender,
    ) -> Result<PipelineReport, PlainLangError> {
        let started = Instant::now();
        let mut state = RunState {
            phase: Phase::Detect,
            artifact: None,
        };

        match self.execute(input, events, &mut state).await {
            Ok((provenance, text, stages)) => {
                self.remove_artifact(&mut state, Some(events)).await;
                let report = PipelineReport {
                    provenance,
                    text,
                    stages,
                    total_duration_ms: started.elapsed().as_millis() as u64,
                };
                info!(
                    "Pipeline complete: {} -> {} characters in {}ms",
                    report.text.original.chars().count(),
                    report.text.simplified.chars().count(),
                    report.total_duration_ms
                );
                emit(events, PipelineEvent::Result(report.text.clone()));
                emit(events, PipelineEvent::progress("Pipeline completed successfully!"));
                Ok(report)
            }
            Err(e) => {
                error!("Pipeline failed during {}: {}", state.phase, e);
                emit(
                    events,
                    PipelineEvent::error(format!("Error during {}: {}", state.phase, e)),
                );
                self.remove_artifact(&mut state, None).await;
                Err(e)
            }
        }
    }

    async fn execute(
        &self,
        input: &str,
        events: &EventSender,
        state: &mut RunState,
    ) -> Result<(Provenance, SimplifiedText, Vec<StageStats>), PlainLangError> {
        let source = InputSource::parse(input)?;
        let provenance = source.provenance();

        let pdf_path = match &source {
            InputSource::Url(url) => {
                emit(events, PipelineEvent::progress(format!("Detected URL input: {}", input.trim())));
                state.phase = Phase::Render;
                emit(events, PipelineEvent::progress("Converting URL to PDF..."));
                let path = self.renderer.render(url, self.config.render_timeout_ms).await?;
                state.artifact = Some(path.clone());
                emit(events, PipelineEvent::progress("URL converted to PDF successfully"));
                path
            }
            InputSource::File(path) => {
                emit(
                    events,
                    PipelineEvent::progress(format!("Detected file input: {}", path.display())),
                );
                path.clone()
            }
        };

        state.phase = Phase::Extract;
        emit(events, PipelineEvent::progress("Extracting text from PDF..."));
        let mut document = Document::new(self.extractor.extract(&pdf_path).await?, provenance);
        emit(
            events,
            PipelineEvent::progress(format!(
                "Successfully extracted {} characters",
                document.char_len()
            )),
        );

        let mut stages = Vec::with_capacity(3);

        if provenance == Provenance::Web {
            state.phase = Phase::Stage(Stage::Clean);
            emit(events, PipelineEvent::progress("Cleaning extracted text..."));
            let (cleaned, stats) = self.transform_stage(Stage::Clean, &document).await?;
            emit(
                events,
                PipelineEvent::progress(format!(
                    "Text cleaning completed: {} -> {} characters",
                    stats.input_chars, stats.output_chars
                )),
            );
            stages.push(stats);

            if cleaned.is_blank() {
                emit(
                    events,
                    PipelineEvent::progress(
                        "WARNING: Cleaned text is empty! Re-extracting without cleaning.",
                    ),
                );
                state.phase = Phase::Extract;
                document = Document::new(self.extractor.extract(&pdf_path).await?, provenance);
            } else {
                let kept = cleaned.text().trim().chars().count();
                if kept < self.config.short_document_chars {
                    warn!("Cleaned text is only {} characters", kept);
                    emit(
                        events,
                        PipelineEvent::progress(format!(
                            "WARNING: Cleaned text is very short ({} chars). Consider checking the output.",
                            cleaned.char_len()
                        )),
                    );
                }
                document = cleaned;
            }
        }

        let original = document.text().to_string();

        state.phase = Phase::Stage(Stage::Summarize);
        emit(events, PipelineEvent::progress("Summarizing text to extract core ideas..."));
        let (summary, stats) = self.transform_stage(Stage::Summarize, &document).await?;
        emit(
            events,
            PipelineEvent::progress(format!(
                "Summarization completed: {} -> {} characters",
                stats.input_chars, stats.output_chars
            )),
        );
        stages.push(stats);
        if summary.is_blank() {
            return Err(PlainLangError::EmptyOutput {
                stage: Stage::Summarize,
            });
        }

        state.phase = Phase::Stage(Stage::Simplify);
        emit(
            events,
            PipelineEvent::progress("Simplifying summary to 7th grade reading level..."),
        );
        let (simplified, stats) = self.transform_stage(Stage::Simplify, &summary).await?;
        emit(
            events,
            PipelineEvent::progress(format!(
                "Simplification completed: {} -> {} characters",
                stats.input_chars, stats.output_chars
            )),
        );
        stages.push(stats);
        if simplified.is_blank() {
            return Err(PlainLangError::EmptyOutput {
                stage: Stage::Simplify,
            });
        }

        Ok((
            provenance,
            SimplifiedText {
                original,
                simplified: simplified.into_text(),
            },
            stages,
        ))
    }

    /// Run one stage over a whole document: split, dispatch, reassemble.
    ///
    /// # Errors
    ///
    /// Returns the first unrecoverable chunk error; no partial document is
    /// ever produced.
    pub async fn transform_stage(
        &self,
        stage: Stage,
        document: &Document,
    ) -> Result<(Document, StageStats), PlainLangError> {
        let started = Instant::now();
        let stage_config = self.config.stage(stage);
        let chunks = chunk::split(document.text(), stage_config.max_chunk_tokens);
        info!(
            "{}: {} characters in {} chunk(s)",
            stage,
            document.char_len(),
            chunks.len()
        );

        let progress = self.config.progress_callback.as_ref();
        if let Some(cb) = progress {
            cb.on_stage_start(stage, chunks.len());
        }

        let results = dispatch(
            &self.transformer,
            &chunks,
            stage_config,
            &self.settings,
            self.config.max_workers,
            progress,
        )
        .await?;

        let fallbacks = results.iter().filter(|r| r.is_fallback()).count();
        if fallbacks > 0 {
            warn!("{}: {} of {} chunk(s) kept their original text", stage, fallbacks, chunks.len());
        }
        let output = document.replaced(chunk::join(
            results.into_iter().map(TransformResult::into_text),
        ));

        if let Some(cb) = progress {
            cb.on_stage_complete(stage, document.char_len(), output.char_len());
        }

        let stats = StageStats {
            stage,
            chunks: chunks.len(),
            fallbacks,
            input_chars: document.char_len(),
            output_chars: output.char_len(),
            duration_ms: started.elapsed().as_millis() as u64,
        };
        debug!("{}: finished in {}ms", stage, stats.duration_ms);
        Ok((output, stats))
    }

    /// Best-effort removal of the rendered PDF. Failures are warnings only.
    async fn remove_artifact(&self, state: &mut RunState, events: Option<&EventSender>) {
        let Some(path) = state.artifact.take() else {
            return;
        };
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                debug!("Removed {}", path.display());
                if let Some(events) = events {
                    emit(events, PipelineEvent::progress("Cleaned up temporary PDF file"));
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                warn!("Could not delete temporary PDF {}: {}", path.display(), e);
                if let Some(events) = events {
                    emit(
                        events,
                        PipelineEvent::progress(format!(
                            "Warning: Could not delete temporary PDF {}: {}",
                            path.display(),
                            e
                        )),
                    );
                }
            }
        }
    }

    /// Run `input`, print progress to stderr, and save the simplified text.
    ///
    /// The file goes to `output` or, when `None`, to the path derived from
    /// the input (see [`InputSource::default_output_path`]). Parent
    /// directories are created as needed and the write is atomic (temp file
    /// + rename), so a failed run never leaves a partial file behind.
    ///
    /// # Errors
    ///
    /// Any error of the run itself, [`PlainLangError::NoResult`] when the
    /// run produced no `Result` event, or
    /// [`PlainLangError::OutputWriteFailed`].
    pub async fn process_to_file(
        &self,
        input: &str,
        output: Option<&Path>,
    ) -> Result<PathBuf, PlainLangError> {
        let (tx, mut rx) = mpsc::unbounded_channel();

        let producer = async move {
            let outcome = self.run(input, &tx).await;
            drop(tx);
            outcome
        };
        let consumer = async {
            let mut result = None;
            while let Some(event) = rx.recv().await {
                match event {
                    PipelineEvent::Progress(message) | PipelineEvent::Error(message) => {
                        eprintln!("{message}");
                    }
                    PipelineEvent::Result(text) => result = Some(text),
                }
            }
            result
        };

        let (outcome, result) = tokio::join!(producer, consumer);
        outcome?;
        let text = result.ok_or(PlainLangError::NoResult)?;

        let path = match output {
            Some(p) => p.to_path_buf(),
            None => InputSource::parse(input)?.default_output_path(),
        };
        write_atomic(&path, text.simplified).await?;
        eprintln!("Simplified text saved to: {}", path.display());
        Ok(path)
    }
}

/// Write `contents` to `path` through a sibling temp file.
async fn write_atomic(path: &Path, contents: String) -> Result<(), PlainLangError> {
    let target = path.to_path_buf();
    let write_failed = |source: std::io::Error| PlainLangError::OutputWriteFailed {
        path: path.to_path_buf(),
        source,
    };

    tokio::task::spawn_blocking(move || -> std::io::Result<()> {
        let parent = match target.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&parent)?;
        let mut tmp = tempfile::NamedTempFile::new_in(&parent)?;
        tmp.write_all(contents.as_bytes())?;
        tmp.persist(&target).map_err(|e| e.error)?;
        Ok(())
    })
    .await
    .map_err(|e| PlainLangError::Internal(format!("output write task panicked: {e}")))?
    .map_err(write_failed)
}

fn emit(events: &EventSender, event: PipelineEvent) {
    if let PipelineEvent::Progress(ref message) = event {
        debug!("{message}");
    }
    let _ = events.send(event);
}
