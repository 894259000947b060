//! Download-safe filename sanitization.

/// Document extensions whose trailing-dot artifact (`name.pdf.`) is collapsed.
const DOCUMENT_EXTENSIONS: &[&str] = &["pdf", "doc", "docx", "ppt", "pptx"];

/// Replaces every run of characters outside `[A-Za-z0-9._-]` with a single `_`.
pub fn sanitize_filename(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut in_run = false;

    for c in name.chars() {
        if c.is_ascii_alphanumeric() || c == '.' || c == '_' || c == '-' {
            out.push(c);
            in_run = false;
        } else if !in_run {
            out.push('_');
            in_run = true;
        }
    }

    out
}

/// Collapses `name.pdf.` (any case, for the document extensions) into `name.pdf`.
pub fn collapse_extension_artifact(name: &str) -> String {
    let Some(stem) = name.strip_suffix('.') else {
        return name.to_string();
    };
    let is_artifact = stem
        .rsplit_once('.')
        .map(|(_, ext)| DOCUMENT_EXTENSIONS.iter().any(|d| d.eq_ignore_ascii_case(ext)))
        .unwrap_or(false);
    if is_artifact {
        stem.to_string()
    } else {
        name.to_string()
    }
}
