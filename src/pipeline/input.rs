//! Input detection: classify a user-supplied string as a web page or a PDF.
//!
//! URL validity is purely syntactic (an `http`/`https` scheme and a
//! non-empty host); reachability is only discovered when the page is
//! rendered. Anything else is treated as a local path and must carry a
//! `.pdf` extension. Existence and permissions are checked by the extractor.

use crate::error::PlainLangError;
use crate::output::Provenance;
use reqwest::Url;
use std::fmt;
use std::path::{Path, PathBuf};

const OUTPUT_SUFFIX: &str = "_simplified.txt";
const MAX_PATH_PART_CHARS: usize = 50;

/// A classified pipeline input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    /// A web page to render before extraction.
    Url(Url),
    /// A local PDF file.
    File(PathBuf),
}

impl InputSource {
    /// Classify `input`.
    ///
    /// # Errors
    ///
    /// * [`PlainLangError::EmptyInput`] for an empty or whitespace string.
    /// * [`PlainLangError::InvalidInput`] for a URL-like string that is not a
    ///   usable http(s) URL.
    /// * [`PlainLangError::NotAPdf`] for a path without a `.pdf` extension.
    pub fn parse(input: &str) -> Result<Self, PlainLangError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(PlainLangError::EmptyInput);
        }

        if let Some(url) = parse_web_url(input) {
            return Ok(InputSource::Url(url));
        }
        if input.contains("://") {
            return Err(PlainLangError::InvalidInput {
                input: input.to_string(),
                reason: "URL must start with http:// or https:// and name a host".to_string(),
            });
        }

        let path = PathBuf::from(input);
        if !has_pdf_extension(&path) {
            return Err(PlainLangError::NotAPdf { path });
        }
        Ok(InputSource::File(path))
    }

    /// Web pages are cleaned; caller-supplied files are not.
    pub fn provenance(&self) -> Provenance {
        match self {
            InputSource::Url(_) => Provenance::Web,
            InputSource::File(_) => Provenance::File,
        }
    }

    /// Where the simplified text goes when the caller names no path.
    ///
    /// * URL: `{host}_{path}_simplified.txt` in the working directory.
    /// * File: `{stem}_simplified.txt` next to the PDF.
    pub fn default_output_path(&self) -> PathBuf {
        match self {
            InputSource::Url(url) => PathBuf::from(format!("{}{OUTPUT_SUFFIX}", url_stem(url))),
            InputSource::File(path) => {
                let stem = path
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "document".to_string());
                path.with_file_name(format!("{stem}{OUTPUT_SUFFIX}"))
            }
        }
    }
}

impl fmt::Display for InputSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputSource::Url(url) => write!(f, "{url}"),
            InputSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// True for an absolute `http`/`https` URL with a non-empty host.
pub fn is_valid_url(input: &str) -> bool {
    parse_web_url(input.trim()).is_some()
}

fn parse_web_url(input: &str) -> Option<Url> {
    let url = Url::parse(input).ok()?;
    let web = matches!(url.scheme(), "http" | "https");
    let has_host = url.host_str().is_some_and(|h| !h.is_empty());
    (web && has_host).then_some(url)
}

fn has_pdf_extension(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}

/// Filesystem-safe name derived from a URL's host and path.
///
/// `.` and `:` in the host become `_`; the path loses its outer slashes,
/// inner slashes become `_`, and it is cut to 50 characters (`page` when
/// nothing is left).
pub fn url_stem(url: &Url) -> String {
    let mut host = url.host_str().unwrap_or_default().to_string();
    if let Some(port) = url.port() {
        host.push_str(&format!(":{port}"));
    }
    let host = host.replace(['.', ':'], "_");

    let path: String = url
        .path()
        .trim_matches('/')
        .replace('/', "_")
        .chars()
        .take(MAX_PATH_PART_CHARS)
        .collect();
    let path = if path.is_empty() { "page".to_string() } else { path };

    format!("{host}_{path}")
}
