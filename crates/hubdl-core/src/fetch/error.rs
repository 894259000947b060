//! Fetch error type.

/// Error returned by a fetch (curl failure or a non-2xx HTTP status).
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Curl reported an error (invalid URL, timeout, connection, etc.).
    #[error("{0}")]
    Curl(#[from] curl::Error),
    /// HTTP response had a non-2xx status.
    #[error("HTTP {0}")]
    Http(u32),
    /// The blocking fetch task did not complete (panicked or was cancelled).
    #[error("fetch task failed: {0}")]
    Task(String),
}

impl FetchError {
    /// True for a timed-out transfer.
    pub fn is_timeout(&self) -> bool {
        matches!(self, FetchError::Curl(e) if e.is_operation_timedout())
    }
}
