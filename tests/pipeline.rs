//! Integration tests for the full pipeline.
//!
//! The remote service, PDF extraction and page rendering are replaced by
//! deterministic in-process mocks, so these tests need no API key, no
//! pdfium library and no browser, and never touch the network.

use futures::StreamExt;
use plainlang::pipeline::chunk;
use plainlang::prompts::{
    CLEAN_SYSTEM_PROMPT, CLEAN_USER_PREFIX, SIMPLIFY_SYSTEM_PROMPT, SIMPLIFY_USER_PREFIX,
    SUMMARIZE_SYSTEM_PROMPT, SUMMARIZE_USER_PREFIX,
};
use plainlang::{
    event_stream, ndjson_stream, FallbackReason, InputSource, PageRenderer, Pipeline,
    PipelineConfig, PipelineEvent, PipelineReport, PlainLangError, Provenance, Stage,
    StageConfig, StageProgressCallback, TextExtractor, TextTransformer, TransformError,
    TransformRequest,
};
use reqwest::Url;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;

// ── Mocks ────────────────────────────────────────────────────────────────────

type Reply = Box<dyn Fn(&str) -> Result<String, TransformError> + Send + Sync>;

/// Remote service stand-in: one reply function per stage, keyed by prompt.
struct MockService {
    clean: Reply,
    summarize: Reply,
    simplify: Reply,
    calls: Mutex<Vec<(Stage, String)>>,
}

impl MockService {
    fn new(
        clean: impl Fn(&str) -> Result<String, TransformError> + Send + Sync + 'static,
        summarize: impl Fn(&str) -> Result<String, TransformError> + Send + Sync + 'static,
        simplify: impl Fn(&str) -> Result<String, TransformError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            clean: Box::new(clean),
            summarize: Box::new(summarize),
            simplify: Box::new(simplify),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn calls_for(&self, stage: Stage) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(s, _)| *s == stage)
            .map(|(_, chunk)| chunk.clone())
            .collect()
    }
}

impl TextTransformer for MockService {
    async fn transform(&self, request: &TransformRequest<'_>) -> Result<String, TransformError> {
        let (stage, prefix, reply) = if request.system_prompt == CLEAN_SYSTEM_PROMPT {
            (Stage::Clean, CLEAN_USER_PREFIX, &self.clean)
        } else if request.system_prompt == SUMMARIZE_SYSTEM_PROMPT {
            (Stage::Summarize, SUMMARIZE_USER_PREFIX, &self.summarize)
        } else if request.system_prompt == SIMPLIFY_SYSTEM_PROMPT {
            (Stage::Simplify, SIMPLIFY_USER_PREFIX, &self.simplify)
        } else {
            return Err(TransformError::Api("unknown system prompt".into()));
        };
        let chunk = request
            .user_text
            .strip_prefix(&format!("{prefix}\n\n"))
            .unwrap_or(request.user_text)
            .to_string();
        self.calls.lock().unwrap().push((stage, chunk.clone()));
        reply(&chunk)
    }
}

/// Returns scripted texts in order, repeating the last one.
struct MockExtractor {
    texts: Mutex<VecDeque<Result<String, String>>>,
    paths: Mutex<Vec<PathBuf>>,
}

impl MockExtractor {
    fn new(texts: &[&str]) -> Self {
        Self {
            texts: Mutex::new(texts.iter().map(|t| Ok(t.to_string())).collect()),
            paths: Mutex::new(Vec::new()),
        }
    }

    fn failing(path: &str) -> Self {
        Self {
            texts: Mutex::new(VecDeque::from([Err(path.to_string())])),
            paths: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> Vec<PathBuf> {
        self.paths.lock().unwrap().clone()
    }
}

impl TextExtractor for MockExtractor {
    async fn extract(&self, path: &Path) -> Result<String, PlainLangError> {
        self.paths.lock().unwrap().push(path.to_path_buf());
        let mut texts = self.texts.lock().unwrap();
        let next = if texts.len() > 1 {
            texts.pop_front().unwrap()
        } else {
            texts.front().cloned().unwrap()
        };
        next.map_err(|p| PlainLangError::FileNotFound { path: p.into() })
    }
}

/// Writes a small "RAW_PDF" artifact into its own temp directory.
struct MockRenderer {
    dir: tempfile::TempDir,
    fail: bool,
    calls: AtomicUsize,
}

impl MockRenderer {
    fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
            fail: false,
            calls: AtomicUsize::new(0),
        }
    }

    fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new()
        }
    }

    fn artifact(&self) -> PathBuf {
        self.dir.path().join("rendered.pdf")
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl PageRenderer for MockRenderer {
    async fn render(&self, url: &Url, timeout_ms: u64) -> Result<PathBuf, PlainLangError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(PlainLangError::RenderTimeout {
                url: url.to_string(),
                timeout_ms,
            });
        }
        let path = self.artifact();
        std::fs::write(&path, "RAW_PDF").unwrap();
        Ok(path)
    }
}

// ── Helpers ──────────────────────────────────────────────────────────────────

const ARTICLE: &str = "Ad banner\n\nMain article body text here.\n\nSubscribe now!";

fn config() -> PipelineConfig {
    PipelineConfig::builder()
        .model("mock-model")
        .retry_backoff_ms(0)
        .api_timeout_secs(5)
        .build()
        .unwrap()
}

fn ok(text: &str) -> impl Fn(&str) -> Result<String, TransformError> + Send + Sync + 'static {
    let text = text.to_string();
    move |_| Ok(text.clone())
}

fn unreachable_stage(_: &str) -> Result<String, TransformError> {
    panic!("stage should not run")
}

fn article_service() -> MockService {
    MockService::new(
        ok("Main article body text here."),
        ok("MAIN ARTICLE BODY."),
        ok("Here is the main idea in simple words."),
    )
}

async fn run_collect<T, X, R>(
    pipeline: &Pipeline<T, X, R>,
    input: &str,
) -> (Result<PipelineReport, PlainLangError>, Vec<PipelineEvent>)
where
    T: TextTransformer,
    X: TextExtractor,
    R: PageRenderer,
{
    let (tx, mut rx) = mpsc::unbounded_channel();
    let outcome = pipeline.run(input, &tx).await;
    drop(tx);
    let mut events = Vec::new();
    while let Some(event) = rx.recv().await {
        events.push(event);
    }
    (outcome, events)
}

fn progress_messages(events: &[PipelineEvent]) -> Vec<&str> {
    events
        .iter()
        .filter_map(|e| match e {
            PipelineEvent::Progress(m) => Some(m.as_str()),
            _ => None,
        })
        .collect()
}

// ── Scenarios ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn web_article_runs_all_three_stages() {
    let pipeline = Pipeline::new(
        config(),
        article_service(),
        MockExtractor::new(&[ARTICLE]),
        MockRenderer::new(),
    );

    let (outcome, events) = run_collect(&pipeline, "http://example.com/article").await;
    let report = outcome.unwrap();

    assert_eq!(report.provenance, Provenance::Web);
    assert_eq!(report.text.original, "Main article body text here.");
    assert_eq!(report.text.simplified, "Here is the main idea in simple words.");
    assert_eq!(report.stages.len(), 3);

    let n = events.len();
    assert_eq!(events[n - 2], PipelineEvent::Result(report.text.clone()));
    assert_eq!(
        events[n - 1],
        PipelineEvent::progress("Pipeline completed successfully!")
    );
    assert!(!events.iter().any(|e| matches!(e, PipelineEvent::Error(_))));

    let messages = progress_messages(&events);
    assert_eq!(messages[0], "Detected URL input: http://example.com/article");
    assert!(messages.contains(&"Cleaning extracted text..."));
    assert!(messages
        .iter()
        .any(|m| m.starts_with("WARNING: Cleaned text is very short")));
    assert!(messages.contains(&"Cleaned up temporary PDF file"));

    assert_eq!(
        InputSource::parse("http://example.com/article")
            .unwrap()
            .default_output_path(),
        PathBuf::from("example_com_article_simplified.txt")
    );
}

#[tokio::test]
async fn rendered_pdf_is_extracted_then_deleted() {
    let renderer = MockRenderer::new();
    let artifact = renderer.artifact();
    let extractor = MockExtractor::new(&[ARTICLE]);
    let pipeline = Pipeline::new(config(), article_service(), extractor, renderer);

    let (outcome, _) = run_collect(&pipeline, "https://example.com/article").await;
    outcome.unwrap();
    assert!(!artifact.exists(), "temporary PDF left behind");
}

#[tokio::test]
async fn local_file_skips_cleaning() {
    let service = MockService::new(
        unreachable_stage,
        ok("REPORT SUMMARY."),
        ok("The report in easy words."),
    );
    let renderer = MockRenderer::new();
    let pipeline = Pipeline::new(
        config(),
        service,
        MockExtractor::new(&["Ad banner\n\nQuarterly report body.\n\nSubscribe now!"]),
        renderer,
    );

    let (outcome, events) = run_collect(&pipeline, "/tmp/report.pdf").await;
    let report = outcome.unwrap();

    assert_eq!(report.provenance, Provenance::File);
    // Extracted text goes to summarize untouched, boilerplate included.
    assert_eq!(
        report.text.original,
        "Ad banner\n\nQuarterly report body.\n\nSubscribe now!"
    );
    assert_eq!(report.text.simplified, "The report in easy words.");
    assert_eq!(report.stages.len(), 2);
    assert!(!progress_messages(&events).contains(&"Cleaning extracted text..."));
    assert_eq!(pipeline.renderer().calls(), 0);
    assert_eq!(pipeline.extractor().calls(), vec![PathBuf::from("/tmp/report.pdf")]);
}

#[tokio::test]
async fn local_file_progress_sequence() {
    let pipeline = Pipeline::new(
        config(),
        MockService::new(unreachable_stage, ok("SHORT."), ok("Easy.")),
        MockExtractor::new(&["Long report text."]),
        MockRenderer::new(),
    );

    let (outcome, events) = run_collect(&pipeline, "/tmp/report.pdf").await;
    outcome.unwrap();

    assert_eq!(
        progress_messages(&events),
        vec![
            "Detected file input: /tmp/report.pdf",
            "Extracting text from PDF...",
            "Successfully extracted 17 characters",
            "Summarizing text to extract core ideas...",
            "Summarization completed: 17 -> 6 characters",
            "Simplifying summary to 7th grade reading level...",
            "Simplification completed: 6 -> 5 characters",
            "Pipeline completed successfully!",
        ]
    );
    let result_at = events
        .iter()
        .position(|e| matches!(e, PipelineEvent::Result(_)))
        .unwrap();
    assert_eq!(result_at, events.len() - 2);
}

#[tokio::test]
async fn empty_input_reports_error_and_writes_nothing() {
    let pipeline = Pipeline::new(
        config(),
        article_service(),
        MockExtractor::new(&[ARTICLE]),
        MockRenderer::new(),
    );

    let (outcome, events) = run_collect(&pipeline, "").await;
    assert!(matches!(outcome, Err(PlainLangError::EmptyInput)));
    assert_eq!(events.len(), 1);
    match &events[0] {
        PipelineEvent::Error(message) => {
            assert!(message.contains("input cannot be empty"), "got: {message}")
        }
        other => panic!("expected error event, got {other:?}"),
    }

    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out.txt");
    let err = pipeline.process_to_file("", Some(&out)).await.unwrap_err();
    assert!(matches!(err, PlainLangError::EmptyInput));
    assert!(!out.exists());
}

#[tokio::test]
async fn empty_cleaned_document_is_re_extracted() {
    let service = MockService::new(ok(""), ok("SUMMARY."), ok("Simple summary."));
    let renderer = MockRenderer::new();
    let artifact = renderer.artifact();
    let extractor = MockExtractor::new(&["  \n\n  ", "Real article text after re-extraction."]);
    let pipeline = Pipeline::new(config(), service, extractor, renderer);

    let (outcome, events) = run_collect(&pipeline, "https://example.com/flu").await;
    let report = outcome.unwrap();

    assert_eq!(report.text.original, "Real article text after re-extraction.");
    assert!(progress_messages(&events)
        .contains(&"WARNING: Cleaned text is empty! Re-extracting without cleaning."));
    assert_eq!(pipeline.extractor().calls(), vec![artifact.clone(), artifact]);
}

#[tokio::test]
async fn blank_summary_is_an_error_and_writes_nothing() {
    let service = MockService::new(ok(""), ok(""), unreachable_stage);
    let pipeline = Pipeline::new(
        config(),
        service,
        MockExtractor::new(&["  \n\n  "]),
        MockRenderer::new(),
    );

    let (outcome, events) = run_collect(&pipeline, "https://example.com/flu").await;
    assert!(
        matches!(
            outcome,
            Err(PlainLangError::EmptyOutput {
                stage: Stage::Summarize
            })
        ),
        "got: {outcome:?}"
    );

    let errors: Vec<&str> = events
        .iter()
        .filter_map(|e| match e {
            PipelineEvent::Error(m) => Some(m.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].starts_with("Error during summarization:"), "got: {}", errors[0]);
    assert!(matches!(events.last(), Some(PipelineEvent::Error(_))));
    assert!(!events.iter().any(|e| matches!(e, PipelineEvent::Result(_))));
    assert!(pipeline.transformer().calls_for(Stage::Simplify).is_empty());

    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("flu.txt");
    let err = pipeline
        .process_to_file("https://example.com/flu", Some(&out))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        PlainLangError::EmptyOutput {
            stage: Stage::Summarize
        }
    ));
    assert!(!out.exists());
}

#[tokio::test]
async fn over_aggressive_cleaning_falls_back_per_chunk() {
    let mut clean = StageConfig::clean();
    clean.max_chunk_tokens = 10;
    let config = PipelineConfig::builder()
        .retry_backoff_ms(0)
        .stage_config(clean)
        .build()
        .unwrap();

    let paragraphs = [
        "alpha paragraph number one here",
        "bravo paragraph number two here",
        "delta paragraph number six here",
    ];
    let text = paragraphs.join("\n\n");
    let service = MockService::new(
        |chunk: &str| {
            if chunk.starts_with("bravo") {
                Ok("x".to_string())
            } else {
                Ok(chunk.to_uppercase())
            }
        },
        |chunk: &str| Ok(chunk.to_string()),
        |chunk: &str| Ok(chunk.to_string()),
    );
    let pipeline = Pipeline::new(config, service, MockExtractor::new(&[&text]), MockRenderer::new());

    let (outcome, _) = run_collect(&pipeline, "https://example.com/page").await;
    let report = outcome.unwrap();

    assert_eq!(
        report.text.original,
        "ALPHA PARAGRAPH NUMBER ONE HERE\n\n\
         bravo paragraph number two here\n\n\
         DELTA PARAGRAPH NUMBER SIX HERE"
    );
    let clean_stats = &report.stages[0];
    assert_eq!(clean_stats.stage, Stage::Clean);
    assert_eq!(clean_stats.chunks, 3);
    assert_eq!(clean_stats.fallbacks, 1);
}

#[tokio::test]
async fn empty_summary_chunk_keeps_original_text() {
    let pipeline = Pipeline::new(
        config(),
        MockService::new(unreachable_stage, ok("   "), |chunk: &str| Ok(chunk.to_string())),
        MockExtractor::new(&["Original body."]),
        MockRenderer::new(),
    );

    let (outcome, _) = run_collect(&pipeline, "/tmp/report.pdf").await;
    let report = outcome.unwrap();
    assert_eq!(report.text.simplified, "Original body.");
    assert_eq!(report.stages[0].fallbacks, 1);
}

#[tokio::test]
async fn simplify_falls_back_only_after_three_attempts() {
    let service = MockService::new(unreachable_stage, ok("THE SUMMARY."), ok(""));
    let pipeline = Pipeline::new(
        config(),
        service,
        MockExtractor::new(&["Body."]),
        MockRenderer::new(),
    );

    let (outcome, _) = run_collect(&pipeline, "/tmp/report.pdf").await;
    let report = outcome.unwrap();
    assert_eq!(report.text.simplified, "THE SUMMARY.");
    assert_eq!(pipeline.transformer().calls_for(Stage::Simplify).len(), 3);
}

#[tokio::test]
async fn summarize_failure_aborts_run() {
    let service = MockService::new(
        ok("Main article body text here."),
        |_: &str| Err(TransformError::Api("HTTP 500".into())),
        unreachable_stage,
    );
    let renderer = MockRenderer::new();
    let artifact = renderer.artifact();
    let pipeline = Pipeline::new(config(), service, MockExtractor::new(&[ARTICLE]), renderer);

    let (outcome, events) = run_collect(&pipeline, "http://example.com/article").await;
    let err = outcome.unwrap_err();
    assert!(matches!(
        err,
        PlainLangError::TransformFailed {
            stage: Stage::Summarize,
            chunk: 1,
            attempts: 1,
            ..
        }
    ));

    assert!(!events.iter().any(|e| matches!(e, PipelineEvent::Result(_))));
    match events.last().unwrap() {
        PipelineEvent::Error(message) => {
            assert!(message.starts_with("Error during summarization:"), "got: {message}");
            assert!(message.contains("HTTP 500"), "got: {message}");
        }
        other => panic!("expected error event, got {other:?}"),
    }
    assert!(!artifact.exists(), "temporary PDF left behind after failure");
}

#[tokio::test]
async fn render_failure_stops_before_extraction() {
    let renderer = MockRenderer::failing();
    let pipeline = Pipeline::new(
        config(),
        article_service(),
        MockExtractor::new(&[ARTICLE]),
        renderer,
    );

    let (outcome, events) = run_collect(&pipeline, "https://example.com/slow").await;
    assert!(matches!(outcome, Err(PlainLangError::RenderTimeout { .. })));
    assert!(pipeline.extractor().calls().is_empty());
    match events.last().unwrap() {
        PipelineEvent::Error(message) => {
            assert!(message.starts_with("Error during URL to PDF conversion:"), "got: {message}")
        }
        other => panic!("expected error event, got {other:?}"),
    }
}

#[tokio::test]
async fn extraction_failure_is_attributed() {
    let pipeline = Pipeline::new(
        config(),
        article_service(),
        MockExtractor::failing("/tmp/missing.pdf"),
        MockRenderer::new(),
    );
    let (outcome, events) = run_collect(&pipeline, "/tmp/missing.pdf").await;
    assert!(matches!(outcome, Err(PlainLangError::FileNotFound { .. })));
    assert!(matches!(
        events.last(),
        Some(PipelineEvent::Error(m)) if m.starts_with("Error during text extraction:")
    ));
}

#[tokio::test]
async fn simplify_output_follows_chunk_order() {
    // Long enough for several simplify chunks (ceiling 300 est. tokens).
    let summary: String = (0..12)
        .map(|i| format!("Section {i}: {}", "word ".repeat(100).trim_end()))
        .collect::<Vec<_>>()
        .join("\n\n");
    let expected_chunks = chunk::split(&summary, StageConfig::simplify().max_chunk_tokens);
    assert!(expected_chunks.len() > 3);
    let expected = chunk::join(expected_chunks.iter().map(|c| c.to_uppercase()));

    let summary_reply = summary.clone();
    let service = MockService::new(
        unreachable_stage,
        move |_: &str| Ok(summary_reply.clone()),
        |chunk: &str| Ok(chunk.to_uppercase()),
    );
    let pipeline = Pipeline::new(
        config(),
        Jittered(service),
        MockExtractor::new(&["Body."]),
        MockRenderer::new(),
    );

    for _ in 0..3 {
        let (outcome, _) = run_collect(&pipeline, "/tmp/report.pdf").await;
        assert_eq!(outcome.unwrap().text.simplified, expected);
    }
}

/// Delays each reply by a chunk-dependent amount so later chunks often finish first.
struct Jittered(MockService);

impl TextTransformer for Jittered {
    async fn transform(&self, request: &TransformRequest<'_>) -> Result<String, TransformError> {
        let len = request.user_text.len() as u64;
        tokio::time::sleep(Duration::from_millis(len.wrapping_mul(7919) % 15)).await;
        self.0.transform(request).await
    }
}

#[tokio::test]
async fn process_to_file_writes_simplified_text() {
    let pipeline = Pipeline::new(
        config(),
        article_service(),
        MockExtractor::new(&[ARTICLE]),
        MockRenderer::new(),
    );
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("nested/dir/article.txt");

    let path = pipeline
        .process_to_file("http://example.com/article", Some(&out))
        .await
        .unwrap();
    assert_eq!(path, out);
    assert_eq!(
        std::fs::read_to_string(&out).unwrap(),
        "Here is the main idea in simple words."
    );
}

#[tokio::test]
async fn ndjson_relay_forwards_every_event() {
    let pipeline = Arc::new(Pipeline::new(
        config(),
        article_service(),
        MockExtractor::new(&[ARTICLE]),
        MockRenderer::new(),
    ));

    let lines: Vec<String> =
        ndjson_stream(event_stream(pipeline, "http://example.com/article")).collect().await;

    assert!(lines.len() > 5);
    assert!(lines.iter().all(|l| l.ends_with('\n') && !l.trim_end().contains('\n')));

    let parsed: Vec<serde_json::Value> = lines
        .iter()
        .map(|l| serde_json::from_str(l.trim_end()).unwrap())
        .collect();
    assert_eq!(parsed[0]["type"], "progress");
    assert_eq!(parsed[0]["message"], "Detected URL input: http://example.com/article");

    let result = parsed.iter().find(|v| v["type"] == "result").unwrap();
    assert_eq!(result["message"]["simplified"], "Here is the main idea in simple words.");
    assert_eq!(result["message"]["original"], "Main article body text here.");

    let last = parsed.last().unwrap();
    assert_eq!(last["type"], "progress");
    assert_eq!(last["message"], "Pipeline completed successfully!");
}

#[tokio::test]
async fn relay_ends_with_error_on_failure() {
    let pipeline = Arc::new(Pipeline::new(
        config(),
        article_service(),
        MockExtractor::new(&[ARTICLE]),
        MockRenderer::failing(),
    ));

    let events: Vec<PipelineEvent> = event_stream(pipeline, "https://example.com/x").collect().await;
    assert!(matches!(events.last(), Some(PipelineEvent::Error(_))));
    assert!(!events.iter().any(|e| matches!(e, PipelineEvent::Result(_))));
}

#[derive(Default)]
struct StageLog {
    entries: Mutex<Vec<String>>,
}

impl StageProgressCallback for StageLog {
    fn on_stage_start(&self, stage: Stage, total_chunks: usize) {
        self.entries
            .lock()
            .unwrap()
            .push(format!("start {stage} {total_chunks}"));
    }

    fn on_chunk_fallback(&self, stage: Stage, index: usize, _total: usize, reason: FallbackReason) {
        self.entries
            .lock()
            .unwrap()
            .push(format!("fallback {stage} {index} {reason}"));
    }

    fn on_stage_complete(&self, stage: Stage, _before: usize, _after: usize) {
        self.entries.lock().unwrap().push(format!("done {stage}"));
    }
}

#[tokio::test]
async fn progress_callback_brackets_each_stage() {
    let log = Arc::new(StageLog::default());
    let config = PipelineConfig::builder()
        .retry_backoff_ms(0)
        .progress_callback(log.clone())
        .build()
        .unwrap();
    let pipeline = Pipeline::new(
        config,
        MockService::new(unreachable_stage, ok(""), ok("Easy.")),
        MockExtractor::new(&["Body."]),
        MockRenderer::new(),
    );

    let (outcome, _) = run_collect(&pipeline, "/tmp/report.pdf").await;
    outcome.unwrap();
    assert_eq!(
        *log.entries.lock().unwrap(),
        vec![
            "start summarize 1",
            "fallback summarize 0 empty reply",
            "done summarize",
            "start simplify 1",
            "done simplify",
        ]
    );
}
