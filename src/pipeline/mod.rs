//! Building blocks of the plain-language pipeline.
//!
//! Each submodule implements exactly one step, so each can be tested on its
//! own and swapped (another renderer, another service) without touching the
//! others.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ render? ──▶ extract ──▶ ┌ chunk ──▶ dispatch ──▶ invoke ──▶ llm ┐ ──▶ text
//! (URL/path) (chromium)  (pdfium)   └──────── once per stage, x3 ───────────┘
//! ```
//!
//! 1. [`input`]   : classify the user-supplied string, derive output names
//! 2. [`render`]  : print a web page to a temporary PDF
//! 3. [`extract`] : pull plain text out of a PDF; `spawn_blocking` because
//!    pdfium is not async-safe
//! 4. [`chunk`]   : split a document into size-bounded, ordered pieces
//! 5. [`dispatch`]: fan chunks out over a bounded pool, collect in order
//! 6. [`invoke`]  : one chunk, one call, retry and fallback policy
//! 7. [`llm`]     : the remote transformation seam; the only step with
//!    network I/O
//! 8. [`postprocess`]: deterministic cleanup of service replies

pub mod chunk;
pub mod dispatch;
pub mod extract;
pub mod input;
pub mod invoke;
pub mod llm;
pub mod postprocess;
pub mod render;
