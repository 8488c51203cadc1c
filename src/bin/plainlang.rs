//! CLI binary for plainlang.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `PipelineConfig`, then either saves the simplified text to a file or
//! relays the run's events to stdout as newline-delimited JSON.

use anyhow::{Context, Result};
use clap::Parser;
use futures::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use plainlang::{
    event_stream, FallbackReason, InputSource, Pipeline, PipelineConfig, PipelineEvent,
    ProgressCallback, Stage, StageProgressCallback,
};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers ──────────────────────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn yellow(s: &str) -> String {
    format!("\x1b[33m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// One progress bar per stage, shown while its chunks are in flight.
///
/// The bar is created when a stage starts and cleared when it completes, so
/// the pipeline's own milestone lines print between bars rather than through
/// them. Chunks finish out of order; the bar only counts.
struct CliProgressCallback {
    bar: Mutex<Option<ProgressBar>>,
    fallbacks: AtomicUsize,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            bar: Mutex::new(None),
            fallbacks: AtomicUsize::new(0),
        })
    }

    fn with_bar(&self, f: impl FnOnce(&ProgressBar)) {
        if let Ok(guard) = self.bar.lock() {
            if let Some(bar) = guard.as_ref() {
                f(bar);
            }
        }
    }

    fn take_bar(&self) -> Option<ProgressBar> {
        self.bar.lock().ok().and_then(|mut guard| guard.take())
    }
}

impl StageProgressCallback for CliProgressCallback {
    fn on_stage_start(&self, stage: Stage, total_chunks: usize) {
        let bar = ProgressBar::new(total_chunks as u64);
        bar.set_style(
            ProgressStyle::with_template(
                "{spinner:.cyan} {prefix:.bold}  [{bar:32.green/238}] {pos:>3}/{len} chunks  ⏱ {elapsed_precise}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▉▊▋▌▍▎▏  ")
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]),
        );
        bar.set_prefix(stage.to_string());
        bar.enable_steady_tick(Duration::from_millis(80));
        self.fallbacks.store(0, Ordering::SeqCst);
        if let Ok(mut guard) = self.bar.lock() {
            *guard = Some(bar);
        }
    }

    fn on_chunk_complete(
        &self,
        _stage: Stage,
        index: usize,
        total: usize,
        before_chars: usize,
        after_chars: usize,
    ) {
        self.with_bar(|bar| {
            bar.println(format!(
                "  {} chunk {:>3}/{:<3}  {}",
                green("✓"),
                index + 1,
                total,
                dim(&format!("{before_chars:>6} → {after_chars:<6} chars")),
            ));
            bar.inc(1);
        });
    }

    fn on_chunk_fallback(&self, _stage: Stage, index: usize, total: usize, reason: FallbackReason) {
        self.fallbacks.fetch_add(1, Ordering::SeqCst);
        self.with_bar(|bar| {
            bar.println(format!(
                "  {} chunk {:>3}/{:<3}  {}",
                yellow("↺"),
                index + 1,
                total,
                yellow(&format!("{reason}, kept original")),
            ));
            bar.inc(1);
        });
    }

    fn on_chunk_error(&self, _stage: Stage, index: usize, total: usize, error: &str) {
        let msg: String = if error.chars().count() > 80 {
            format!("{}\u{2026}", error.chars().take(79).collect::<String>())
        } else {
            error.to_string()
        };
        self.with_bar(|bar| {
            bar.println(format!(
                "  {} chunk {:>3}/{:<3}  {}",
                red("✗"),
                index + 1,
                total,
                red(&msg)
            ));
        });
        if let Some(bar) = self.take_bar() {
            bar.abandon();
        }
    }

    fn on_stage_complete(&self, stage: Stage, _before_chars: usize, _after_chars: usize) {
        if let Some(bar) = self.take_bar() {
            bar.finish_and_clear();
        }
        let fallbacks = self.fallbacks.load(Ordering::SeqCst);
        if fallbacks > 0 {
            eprintln!(
                "{} {stage}: {fallbacks} chunk(s) kept their original text",
                yellow("⚠")
            );
        }
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Simplify a web page (saved as www_cdc_gov_flu_index_html_simplified.txt)
  plainlang https://www.cdc.gov/flu/index.html

  # Simplify a PDF (saved next to it as leaflet_simplified.txt)
  plainlang leaflet.pdf

  # Choose the output file and model
  plainlang leaflet.pdf -o out/leaflet.txt --model gpt-4.1-mini

  # Stream progress events as JSON lines for a UI
  plainlang --ndjson https://example.com/article

ENVIRONMENT VARIABLES:
  OPENAI_API_KEY          OpenAI API key
  OPENAI_MODEL            Default model (otherwise gpt-5-mini)
  EDGEQUAKE_LLM_PROVIDER  Override provider (openai, anthropic, gemini, ollama)
  EDGEQUAKE_MODEL         Override model ID (with EDGEQUAKE_LLM_PROVIDER)
  PDFIUM_LIB_PATH         Directory containing libpdfium
  RUST_LOG                Log filter, overrides -v / -q
"#;

/// Rewrite health documents in plain language.
#[derive(Parser, Debug)]
#[command(
    name = "plainlang",
    version,
    about = "Rewrite health documents (web pages or PDFs) at a 7th-grade reading level",
    long_about = "Clean, summarize and simplify a health document supplied as a web page URL \
or a PDF file. Web pages are rendered with headless Chromium; text is extracted with pdfium; \
each stage is sent to an LLM in parallel chunks.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Local PDF file path or HTTP/HTTPS URL.
    input: String,

    /// Write the simplified text here instead of the derived path.
    #[arg(short, long, env = "PLAINLANG_OUTPUT")]
    output: Option<PathBuf>,

    /// LLM model ID (default: OPENAI_MODEL or gpt-5-mini).
    #[arg(long, env = "PLAINLANG_MODEL")]
    model: Option<String>,

    /// LLM provider: openai, anthropic, gemini, ollama, azure.
    #[arg(long, env = "PLAINLANG_PROVIDER")]
    provider: Option<String>,

    /// Maximum concurrent LLM calls per stage.
    #[arg(long, env = "PLAINLANG_MAX_WORKERS", default_value_t = 5)]
    max_workers: usize,

    /// Per-call LLM timeout in seconds.
    #[arg(long, env = "PLAINLANG_API_TIMEOUT", default_value_t = 300)]
    api_timeout: u64,

    /// Web page render timeout in milliseconds.
    #[arg(long, env = "PLAINLANG_RENDER_TIMEOUT", default_value_t = 15_000)]
    render_timeout: u64,

    /// Base retry backoff in milliseconds (doubled per attempt).
    #[arg(long, env = "PLAINLANG_RETRY_BACKOFF", default_value_t = 500)]
    retry_backoff: u64,

    /// LLM temperature (0.0–2.0); provider default when unset.
    #[arg(long, env = "PLAINLANG_TEMPERATURE")]
    temperature: Option<f32>,

    /// Headless Chromium executable.
    #[arg(long, env = "PLAINLANG_CHROMIUM", default_value = "chromium")]
    chromium: String,

    /// Relay events to stdout as JSON lines instead of writing a file.
    #[arg(long, env = "PLAINLANG_NDJSON")]
    ndjson: bool,

    /// Disable the per-stage progress bar.
    #[arg(long, env = "PLAINLANG_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PLAINLANG_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "PLAINLANG_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The progress bar and milestone lines cover normal feedback, so library
    // INFO logs only show when the bar is off.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.ndjson;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress || cli.ndjson {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let progress_cb: Option<ProgressCallback> = if show_progress {
        Some(CliProgressCallback::new() as ProgressCallback)
    } else {
        None
    };

    // Bad input is reported before a provider is resolved.
    check_input(&cli.input)?;

    let config = build_config(&cli, progress_cb)?;
    let pipeline = Pipeline::from_config(config).context("Failed to initialise the LLM provider")?;

    if cli.ndjson {
        return relay(Arc::new(pipeline), cli.input).await;
    }

    let path = pipeline
        .process_to_file(&cli.input, cli.output.as_deref())
        .await
        .context("Pipeline failed")?;

    if !cli.quiet {
        eprintln!("{} {}", green("✔"), path.display());
    }
    Ok(())
}

/// Forward every event to stdout as one JSON line, flushing as it arrives.
async fn relay(pipeline: Arc<Pipeline>, input: String) -> Result<()> {
    let mut events = event_stream(pipeline, input);
    let mut failed = false;
    let stdout = io::stdout();

    while let Some(event) = events.next().await {
        failed |= matches!(event, PipelineEvent::Error(_));
        let mut handle = stdout.lock();
        handle
            .write_all(event.to_json_line().as_bytes())
            .and_then(|_| handle.flush())
            .context("Failed to write to stdout")?;
    }

    if failed {
        anyhow::bail!("Pipeline failed");
    }
    Ok(())
}

fn check_input(input: &str) -> Result<InputSource> {
    InputSource::parse(input).context("Invalid input")
}

/// Map CLI args to `PipelineConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<PipelineConfig> {
    let mut builder = PipelineConfig::builder()
        .max_workers(cli.max_workers)
        .api_timeout_secs(cli.api_timeout)
        .render_timeout_ms(cli.render_timeout)
        .retry_backoff_ms(cli.retry_backoff)
        .chromium_path(cli.chromium.clone());

    if let Some(ref model) = cli.model {
        builder = builder.model(model.clone());
    }
    if let Some(ref provider) = cli.provider {
        builder = builder.provider_name(provider.clone());
    }
    if let Some(t) = cli.temperature {
        builder = builder.temperature(t);
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}
