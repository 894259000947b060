//! Filename resolution for downloads.
//!
//! Derives one safe filename from a material's URL, its display title and
//! type token, and (when a response is at hand) the upstream
//! Content-Disposition header. Results only contain `[A-Za-z0-9._-]`.

mod content_disposition;
mod path;
mod sanitize;

pub use content_disposition::{parse_content_disposition_filename, PercentDecodeError};
pub use path::{last_path_segment, path_extension, strip_extension};
pub use sanitize::{collapse_extension_artifact, sanitize_filename};

use crate::fetch::ResponseHeaders;
use path::{extension_of, is_extension_token};

/// Base name used when neither the title nor the URL yields one.
pub const DEFAULT_BASE: &str = "file";

/// Extension used when nothing else determines one.
pub const DEFAULT_EXTENSION: &str = "pdf";

/// Inputs to [`resolve_filename`].
#[derive(Debug, Clone, Copy, Default)]
pub struct FilenameRequest<'a> {
    pub source_url: &'a str,
    /// Human-readable document title, e.g. "Anatomy Notes Unit 1.pdf".
    pub suggested_title: Option<&'a str>,
    /// Short file type token such as "pdf" or "doc".
    pub suggested_type: Option<&'a str>,
    /// Headers of the fetched response, when the bytes are already in hand.
    pub upstream_headers: Option<&'a ResponseHeaders>,
}

impl<'a> FilenameRequest<'a> {
    pub fn new(source_url: &'a str) -> Self {
        Self {
            source_url,
            ..Self::default()
        }
    }

    pub fn title(mut self, title: Option<&'a str>) -> Self {
        self.suggested_title = title;
        self
    }

    pub fn file_type(mut self, file_type: Option<&'a str>) -> Self {
        self.suggested_type = file_type;
        self
    }

    pub fn headers(mut self, headers: Option<&'a ResponseHeaders>) -> Self {
        self.upstream_headers = headers;
        self
    }
}

/// A sanitized filename split into base and extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedFilename {
    pub base: String,
    /// Lower-case, 1 to 10 ASCII alphanumerics.
    pub extension: String,
    /// `base.extension`, only `[A-Za-z0-9._-]`.
    pub full: String,
}

/// Resolves the save-as filename for a download. Never fails.
///
/// Precedence for the name: Content-Disposition filename (overrides
/// everything it provides), then the title, then the last URL path segment,
/// then `file`. Precedence for the extension: Content-Disposition, URL path
/// extension, `suggested_type`, then `pdf`. A `name.pdf.` artifact in a
/// candidate name is collapsed before its extension is split off.
///
/// # Examples
///
/// - `("https://x/y/report.final.PDF", no title)` -> `report.final.pdf`
/// - `("not a url", title "My Notes.pdf")` -> `My_Notes.pdf`
pub fn resolve_filename(request: &FilenameRequest<'_>) -> ResolvedFilename {
    let fallback_extension = || {
        path_extension(request.source_url)
            .or_else(|| request.suggested_type.and_then(type_extension))
            .unwrap_or_else(|| DEFAULT_EXTENSION.to_string())
    };

    let disposition = request
        .upstream_headers
        .and_then(|h| h.get("content-disposition"))
        .and_then(parse_content_disposition_filename)
        .map(|name| collapse_extension_artifact(&name));

    let (base, extension) = match disposition {
        Some(name) => match extension_of(&name) {
            Some(ext) => (strip_extension(&name).to_string(), ext.to_ascii_lowercase()),
            None => (name, fallback_extension()),
        },
        None => (
            base_name(request.suggested_title, request.source_url),
            fallback_extension(),
        ),
    };

    let base = if base.trim().is_empty() {
        DEFAULT_BASE.to_string()
    } else {
        sanitize_filename(&base)
    };
    let full = format!("{}.{}", base, extension);

    ResolvedFilename {
        base,
        extension,
        full,
    }
}

/// Names an attachment the way the download proxy does.
///
/// Uses the `name` hint (sanitized) if non-empty, else the last path segment
/// of `url` (sanitized, default `file`). A filename in the upstream
/// `content_disposition` overrides both. The result has trailing-dot
/// artifacts collapsed and is sanitized.
pub fn attachment_filename(url: &str, name_hint: Option<&str>, content_disposition: Option<&str>) -> String {
    let inferred = match name_hint.filter(|n| !n.is_empty()) {
        Some(hint) => sanitize_filename(hint),
        None => sanitize_filename(&last_path_segment(url).unwrap_or_else(|| DEFAULT_BASE.to_string())),
    };

    let name = content_disposition
        .and_then(parse_content_disposition_filename)
        .unwrap_or(inferred);

    let name = sanitize_filename(&collapse_extension_artifact(&name));
    if name.is_empty() {
        DEFAULT_BASE.to_string()
    } else {
        name
    }
}

fn base_name(title: Option<&str>, url: &str) -> String {
    let from_title = title
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(|t| strip_extension(&collapse_extension_artifact(t)).to_string());

    from_title
        .or_else(|| {
            last_path_segment(url).map(|s| strip_extension(&collapse_extension_artifact(&s)).to_string())
        })
        .filter(|b| !b.is_empty())
        .unwrap_or_else(|| DEFAULT_BASE.to_string())
}

fn type_extension(token: &str) -> Option<String> {
    let token = token.trim();
    is_extension_token(token).then(|| token.to_ascii_lowercase())
}
