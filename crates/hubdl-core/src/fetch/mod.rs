//! HTTP GET of a whole resource into memory.
//!
//! Uses the curl crate (libcurl). Redirects are followed, no cookies or other
//! credentials are sent, and connect/total timeouts come from [`FetchConfig`].
//! Calls block; use [`fetch_in_background`] from async code.

mod error;
mod parse;

pub use error::FetchError;
pub use parse::ResponseHeaders;

use std::str;
use std::sync::Arc;
use std::time::Duration;

use crate::config::FetchConfig;

/// A fully buffered HTTP response.
#[derive(Debug, Clone)]
pub struct FetchedResponse {
    pub status: u32,
    pub headers: ResponseHeaders,
    pub body: Vec<u8>,
}

impl FetchedResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Turns a non-2xx response into `FetchError::Http`.
    pub fn error_for_status(self) -> Result<Self, FetchError> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(FetchError::Http(self.status))
        }
    }
}

/// Blocking GET capability, shared by the proxy and the dispatcher.
pub trait Fetcher: Send + Sync {
    /// Fetches `url`. Non-2xx statuses are returned as `Ok` responses.
    fn fetch(&self, url: &str) -> Result<FetchedResponse, FetchError>;
}

impl<T: Fetcher + ?Sized> Fetcher for &T {
    fn fetch(&self, url: &str) -> Result<FetchedResponse, FetchError> {
        (**self).fetch(url)
    }
}

impl<T: Fetcher + ?Sized> Fetcher for Arc<T> {
    fn fetch(&self, url: &str) -> Result<FetchedResponse, FetchError> {
        (**self).fetch(url)
    }
}

/// [`Fetcher`] backed by libcurl.
#[derive(Debug, Clone, Default)]
pub struct CurlFetcher {
    config: FetchConfig,
}

impl CurlFetcher {
    pub fn new(config: FetchConfig) -> Self {
        Self { config }
    }
}

impl Fetcher for CurlFetcher {
    fn fetch(&self, url: &str) -> Result<FetchedResponse, FetchError> {
        fetch(url, &self.config)
    }
}

/// Performs a GET request and buffers the full body.
pub fn fetch(url: &str, config: &FetchConfig) -> Result<FetchedResponse, FetchError> {
    let mut header_lines: Vec<String> = Vec::new();
    let mut body: Vec<u8> = Vec::new();

    let mut easy = curl::easy::Easy::new();
    easy.url(url)?;
    easy.get(true)?;
    easy.follow_location(true)?;
    easy.max_redirections(config.max_redirections)?;
    easy.connect_timeout(Duration::from_secs(config.connect_timeout_secs))?;
    if let Some(secs) = config.timeout_secs {
        easy.timeout(Duration::from_secs(secs))?;
    }
    easy.useragent(concat!("hubdl/", env!("CARGO_PKG_VERSION")))?;

    {
        let mut transfer = easy.transfer();
        transfer.header_function(|data| {
            if let Ok(s) = str::from_utf8(data) {
                header_lines.push(s.trim_end().to_string());
            }
            true
        })?;
        transfer.write_function(|data| {
            body.extend_from_slice(data);
            Ok(data.len())
        })?;
        transfer.perform()?;
    }

    let status = easy.response_code()?;
    tracing::debug!(url, status, bytes = body.len(), "fetch complete");

    Ok(FetchedResponse {
        status,
        headers: parse::parse_header_lines(&header_lines),
        body,
    })
}

/// Runs `fetcher.fetch(url)` on the blocking thread pool.
pub async fn fetch_in_background(
    fetcher: Arc<dyn Fetcher>,
    url: String,
) -> Result<FetchedResponse, FetchError> {
    tokio::task::spawn_blocking(move || fetcher.fetch(&url))
        .await
        .map_err(|e| FetchError::Task(e.to_string()))?
}
