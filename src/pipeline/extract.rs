//! PDF text extraction via pdfium.
//!
//! ## Why spawn_blocking?
//!
//! `pdfium-render` wraps the pdfium C++ library, which keeps thread-local
//! state and blocks while parsing. Extraction therefore runs on tokio's
//! blocking pool so the async workers driving concurrent chunk calls are
//! never stalled.
//!
//! A page that fails to yield text is logged and skipped; extraction only
//! fails when no page at all produced text.

use crate::error::PlainLangError;
use pdfium_render::prelude::*;
use std::future::Future;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Separator placed between the text of consecutive pages.
const PAGE_SEPARATOR: &str = "\n\n";

/// Turns a PDF on disk into plain text.
pub trait TextExtractor: Send + Sync {
    /// # Errors
    ///
    /// Fails when the file is missing, unreadable, not a PDF, or has no
    /// extractable text on any page.
    fn extract(&self, path: &Path) -> impl Future<Output = Result<String, PlainLangError>> + Send;
}

/// [`TextExtractor`] backed by pdfium.
///
/// The library is located through `PDFIUM_LIB_PATH` (a directory holding
/// the platform library) and otherwise through the system loader.
#[derive(Debug, Clone, Default)]
pub struct PdfiumExtractor {
    library_dir: Option<PathBuf>,
}

impl PdfiumExtractor {
    pub fn new() -> Self {
        Self {
            library_dir: std::env::var_os("PDFIUM_LIB_PATH").map(PathBuf::from),
        }
    }

    /// Bind to the pdfium library in `dir` instead of consulting the environment.
    pub fn with_library_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            library_dir: Some(dir.into()),
        }
    }
}

impl TextExtractor for PdfiumExtractor {
    async fn extract(&self, path: &Path) -> Result<String, PlainLangError> {
        validate_pdf_path(path)?;

        let path = path.to_path_buf();
        let library_dir = self.library_dir.clone();
        tokio::task::spawn_blocking(move || extract_blocking(&path, library_dir.as_deref()))
            .await
            .map_err(|e| PlainLangError::Internal(format!("extraction task panicked: {e}")))?
    }
}

/// Check existence, readability and extension before handing the file to pdfium.
pub fn validate_pdf_path(path: &Path) -> Result<(), PlainLangError> {
    if !path.exists() {
        return Err(PlainLangError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    if let Err(e) = std::fs::File::open(path) {
        return Err(match e.kind() {
            std::io::ErrorKind::PermissionDenied => PlainLangError::PermissionDenied {
                path: path.to_path_buf(),
            },
            _ => PlainLangError::FileNotFound {
                path: path.to_path_buf(),
            },
        });
    }
    let is_pdf = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
    if !is_pdf {
        return Err(PlainLangError::NotAPdf {
            path: path.to_path_buf(),
        });
    }
    Ok(())
}

fn bind(library_dir: Option<&Path>) -> Result<Pdfium, PlainLangError> {
    let bindings = match library_dir {
        Some(dir) => Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(dir))
            .or_else(|e| {
                warn!(
                    "pdfium not found in {} ({e:?}), trying system library",
                    dir.display()
                );
                Pdfium::bind_to_system_library()
            }),
        None => Pdfium::bind_to_system_library(),
    }
    .map_err(|e| PlainLangError::PdfiumBindingFailed(format!("{e:?}")))?;
    Ok(Pdfium::new(bindings))
}

fn extract_blocking(path: &Path, library_dir: Option<&Path>) -> Result<String, PlainLangError> {
    let pdfium = bind(library_dir)?;
    let document = pdfium
        .load_pdf_from_file(path, None)
        .map_err(|e| PlainLangError::CorruptPdf {
            path: path.to_path_buf(),
            detail: format!("{e:?}"),
        })?;

    let pages = document.pages();
    info!("PDF loaded: {} pages", pages.len());

    let mut parts = Vec::new();
    for (index, page) in pages.iter().enumerate() {
        match page.text() {
            Ok(text) => {
                let text = text.all();
                if text.trim().is_empty() {
                    debug!("page {} has no text", index + 1);
                } else {
                    parts.push(text);
                }
            }
            Err(e) => warn!("could not extract text from page {}: {e:?}", index + 1),
        }
    }

    if parts.is_empty() {
        return Err(PlainLangError::ExtractionFailed {
            path: path.to_path_buf(),
        });
    }
    Ok(join_pages(&parts))
}

fn join_pages(parts: &[String]) -> String {
    parts.join(PAGE_SEPARATOR)
}
