//! Materials REST API base URL validation.

use super::RuntimeMode;

/// Relative base used in dev, forwarded to the API by the dev server.
pub const DEFAULT_DEV_API_BASE: &str = "/api";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("api_base_url is required in prod")]
    MissingApiBase,
    #[error("invalid api_base_url: {0}")]
    InvalidApiBase(String),
    #[error("api_base_url must use https in prod")]
    InsecureApiBase,
    #[error("localhost api_base_url is not allowed in prod")]
    LocalApiBase,
}

/// Validates and normalizes the REST API base URL.
///
/// Prod: required, https only, never localhost; reduced to its origin.
/// Dev: defaults to `/api`; relative bases are kept as-is; `https://localhost`
/// is downgraded to `http`; other URLs are reduced to their origin.
pub fn normalize_api_base(candidate: Option<&str>, mode: RuntimeMode) -> Result<String, ConfigError> {
    let candidate = match (candidate.map(str::trim).filter(|c| !c.is_empty()), mode) {
        (Some(c), _) => c,
        (None, RuntimeMode::Dev) => DEFAULT_DEV_API_BASE,
        (None, RuntimeMode::Prod) => return Err(ConfigError::MissingApiBase),
    };

    if mode == RuntimeMode::Dev && candidate.starts_with('/') {
        return Ok(candidate.to_string());
    }

    let parsed = url::Url::parse(candidate)
        .map_err(|e| ConfigError::InvalidApiBase(format!("{candidate}: {e}")))?;
    if !parsed.has_host() {
        return Err(ConfigError::InvalidApiBase(candidate.to_string()));
    }
    let is_local = matches!(parsed.host_str(), Some("localhost") | Some("127.0.0.1"));

    match mode {
        RuntimeMode::Prod => {
            if parsed.scheme() != "https" {
                return Err(ConfigError::InsecureApiBase);
            }
            if is_local {
                return Err(ConfigError::LocalApiBase);
            }
            Ok(origin_of(&parsed))
        }
        RuntimeMode::Dev => {
            if is_local && parsed.scheme() == "https" {
                Ok(format!("http://{}", host_and_port(&parsed)))
            } else {
                Ok(origin_of(&parsed))
            }
        }
    }
}

fn origin_of(url: &url::Url) -> String {
    url.origin().ascii_serialization().trim_end_matches('/').to_string()
}

fn host_and_port(url: &url::Url) -> String {
    let host = url.host_str().unwrap_or_default();
    match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    }
}
