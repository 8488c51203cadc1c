//! Data types that flow between pipeline stages and out to consumers.

use crate::config::Stage;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a document's text came from. Governs whether cleaning applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provenance {
    /// Extracted from a PDF supplied by the caller.
    File,
    /// Extracted from a PDF rendered from a web page.
    Web,
}

/// The text of a document at one pipeline stage.
///
/// Stages never mutate a `Document`; each produces a new one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    text: String,
    provenance: Provenance,
}

impl Document {
    pub fn new(text: impl Into<String>, provenance: Provenance) -> Self {
        Self {
            text: text.into(),
            provenance,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn into_text(self) -> String {
        self.text
    }

    pub fn provenance(&self) -> Provenance {
        self.provenance
    }

    /// Length in characters (not bytes).
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    /// True when the text holds nothing but whitespace.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// A successor document with the same provenance.
    pub fn replaced(&self, text: impl Into<String>) -> Self {
        Self::new(text, self.provenance)
    }
}

/// Why a chunk kept its original text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackReason {
    /// The reply was empty or whitespace on every allowed attempt.
    EmptyReply,
    /// The reply was below the stage's minimum output ratio.
    TooShort,
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FallbackReason::EmptyReply => f.write_str("empty reply"),
            FallbackReason::TooShort => f.write_str("reply removed too much content"),
        }
    }
}

/// Outcome of transforming one chunk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransformResult {
    /// The service's (normalised) reply was accepted.
    Transformed(String),
    /// The original chunk text was kept.
    Fallback {
        original: String,
        reason: FallbackReason,
    },
}

impl TransformResult {
    pub fn text(&self) -> &str {
        match self {
            TransformResult::Transformed(text) => text,
            TransformResult::Fallback { original, .. } => original,
        }
    }

    pub fn into_text(self) -> String {
        match self {
            TransformResult::Transformed(text) => text,
            TransformResult::Fallback { original, .. } => original,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, TransformResult::Fallback { .. })
    }
}

/// Payload of the terminal `Result` event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimplifiedText {
    /// Extracted (and, for web input, cleaned) text before summarising.
    pub original: String,
    /// Final plain-language text.
    pub simplified: String,
}

/// One entry of the ordered event sequence produced by a pipeline run.
///
/// Serialises as `{"type": "...", "message": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message", rename_all = "lowercase")]
pub enum PipelineEvent {
    Progress(String),
    Error(String),
    Result(SimplifiedText),
}

impl PipelineEvent {
    pub fn progress(message: impl Into<String>) -> Self {
        PipelineEvent::Progress(message.into())
    }

    pub fn error(message: impl Into<String>) -> Self {
        PipelineEvent::Error(message.into())
    }

    /// Render as one line of newline-delimited JSON (trailing `\n` included).
    pub fn to_json_line(&self) -> String {
        // Serialising plain strings into a map cannot fail.
        let mut line = serde_json::to_string(self).unwrap_or_else(|e| {
            format!(r#"{{"type":"error","message":"event serialisation failed: {e}"}}"#)
        });
        line.push('\n');
        line
    }
}

/// Size of a document before and after one stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageStats {
    pub stage: Stage,
    pub chunks: usize,
    pub fallbacks: usize,
    pub input_chars: usize,
    pub output_chars: usize,
    pub duration_ms: u64,
}

/// Everything a successful run produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineReport {
    pub provenance: Provenance,
    pub text: SimplifiedText,
    pub stages: Vec<StageStats>,
    pub total_duration_ms: u64,
}
