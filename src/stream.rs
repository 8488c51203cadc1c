//! Asynchronous relay: hand a run's events to a remote listener as they occur.
//!
//! [`event_stream`] spawns the run on its own tokio task and returns the
//! receiving end of its event channel as a `Stream`. Events are forwarded the
//! moment the pipeline emits them; nothing is buffered beyond the channel
//! itself, so a progress UI sees each milestone live. The stream ends when
//! the run finishes (successfully or not).
//!
//! [`ndjson_stream`] re-serialises that stream as newline-delimited JSON,
//! one `{"type": ..., "message": ...}` object per line, without touching
//! the event content.

use crate::convert::Pipeline;
use crate::output::PipelineEvent;
use crate::pipeline::extract::TextExtractor;
use crate::pipeline::llm::TextTransformer;
use crate::pipeline::render::PageRenderer;
use futures::stream::StreamExt;
use std::pin::Pin;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;
use tokio_stream::Stream;
use tracing::{debug, info};

/// A boxed stream of pipeline events, in emission order.
pub type EventStream = Pin<Box<dyn Stream<Item = PipelineEvent> + Send>>;

/// A boxed stream of newline-terminated JSON lines.
pub type LineStream = Pin<Box<dyn Stream<Item = String> + Send>>;

/// Start a run of `pipeline` on `input` and stream its events.
///
/// Must be called from within a tokio runtime. Dropping the stream does not
/// cancel the run; its remaining events are discarded.
pub fn event_stream<T, X, R>(pipeline: Arc<Pipeline<T, X, R>>, input: impl Into<String>) -> EventStream
where
    T: TextTransformer + 'static,
    X: TextExtractor + 'static,
    R: PageRenderer + 'static,
{
    let input = input.into();
    let (tx, rx) = mpsc::unbounded_channel();
    info!("Starting streamed run: {}", input);

    tokio::spawn(async move {
        match pipeline.run(&input, &tx).await {
            Ok(report) => debug!("Streamed run finished in {}ms", report.total_duration_ms),
            // Already reported to the listener as an Error event.
            Err(e) => debug!("Streamed run failed: {}", e),
        }
    });

    Box::pin(UnboundedReceiverStream::new(rx))
}

/// Serialise each event as one line of JSON.
pub fn ndjson_stream(events: EventStream) -> LineStream {
    Box::pin(events.map(|event| event.to_json_line()))
}
