//! Delivery strategies and their ordering per runtime mode.

use crate::config::RuntimeMode;

use super::shell::ShellError;

/// One way of getting a file onto the user's device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Navigate to the attachment proxy.
    Proxy,
    /// Fetch in-process, hand the bytes over via a temporary object URL.
    Blob,
    /// Open the source URL directly. Cannot fail.
    NewTab,
}

impl Strategy {
    /// Strategies in the order they are tried. Always ends with `NewTab`.
    pub fn plan(mode: RuntimeMode) -> Vec<Strategy> {
        match mode {
            RuntimeMode::Prod => vec![Strategy::Proxy, Strategy::Blob, Strategy::NewTab],
            // No proxy route in dev.
            RuntimeMode::Dev => vec![Strategy::Blob, Strategy::NewTab],
        }
    }
}

/// Why a strategy did not deliver the file.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StrategyFailure {
    #[error("upstream returned HTTP {0}")]
    Upstream(u32),
    #[error("transport: {0}")]
    Transport(String),
    #[error("object url: {0}")]
    ObjectUrl(ShellError),
    #[error("trigger: {0}")]
    Trigger(ShellError),
    #[error("revoke: {0}")]
    Revoke(ShellError),
}

/// Builds `<route>?url=<encoded source>&name=<encoded filename>`.
pub fn proxy_url(route: &str, source_url: &str, filename: &str) -> String {
    let query = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("url", source_url)
        .append_pair("name", filename)
        .finish();
    let sep = if route.contains('?') { '&' } else { '?' };
    format!("{}{}{}", route, sep, query)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plans_end_with_new_tab() {
        assert_eq!(
            Strategy::plan(RuntimeMode::Prod),
            vec![Strategy::Proxy, Strategy::Blob, Strategy::NewTab]
        );
        assert_eq!(Strategy::plan(RuntimeMode::Dev), vec![Strategy::Blob, Strategy::NewTab]);
    }

    #[test]
    fn proxy_url_encodes_both_params() {
        assert_eq!(
            proxy_url(
                "/api/download",
                "https://res.cloudinary.com/x/raw/upload/a b.pdf?v=1&dl=1",
                "Unit_1.pdf"
            ),
            "/api/download?url=https%3A%2F%2Fres.cloudinary.com%2Fx%2Fraw%2Fupload%2Fa+b.pdf%3Fv%3D1%26dl%3D1&name=Unit_1.pdf"
        );
    }

    #[test]
    fn proxy_url_appends_to_existing_query() {
        assert_eq!(
            proxy_url("/api/download?v=2", "https://x/a.pdf", "a.pdf"),
            "/api/download?v=2&url=https%3A%2F%2Fx%2Fa.pdf&name=a.pdf"
        );
    }
}
