//! Download dispatch: choose how a material's bytes reach the user.
//!
//! A [`Dispatcher`] resolves the filename, then walks the [`Strategy`] plan
//! for its runtime mode, stopping at the first strategy that delivers. Each
//! strategy is tried at most once per request and nothing is retried. A
//! request without a usable URL is rejected with a notice before any strategy
//! runs.

mod object_url;
mod shell;
mod strategy;

pub use object_url::{ObjectUrlRegistry, OBJECT_URL_PREFIX};
pub use shell::{BrowserShell, Notice, NoticeLevel, ShellError};
pub use strategy::{proxy_url, Strategy, StrategyFailure};

use crate::config::RuntimeMode;
use crate::fetch::Fetcher;
use crate::filename::{resolve_filename, FilenameRequest};

/// A user's request to download one material.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DownloadRequest {
    pub source_url: String,
    pub suggested_title: Option<String>,
    pub suggested_type: Option<String>,
}

impl DownloadRequest {
    pub fn new(source_url: impl Into<String>) -> Self {
        Self {
            source_url: source_url.into(),
            ..Self::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.suggested_title = Some(title.into());
        self
    }

    pub fn with_type(mut self, file_type: impl Into<String>) -> Self {
        self.suggested_type = Some(file_type.into());
        self
    }

    /// True for the empty or `#` links the API uses for missing files.
    pub fn is_placeholder(&self) -> bool {
        let url = self.source_url.trim();
        url.is_empty() || url == "#"
    }

    fn filename_request(&self) -> FilenameRequest<'_> {
        FilenameRequest::new(&self.source_url)
            .title(self.suggested_title.as_deref())
            .file_type(self.suggested_type.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchConfig {
    pub mode: RuntimeMode,
    /// Same-origin route of the attachment proxy, e.g. `/api/download`.
    pub proxy_route: String,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            mode: RuntimeMode::default(),
            proxy_route: "/api/download".to_string(),
        }
    }
}

/// How a dispatch ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// No usable URL; the user was notified and nothing was fetched.
    Rejected,
    Proxy,
    Blob,
    NewTab,
}

impl From<Strategy> for Delivery {
    fn from(s: Strategy) -> Self {
        match s {
            Strategy::Proxy => Delivery::Proxy,
            Strategy::Blob => Delivery::Blob,
            Strategy::NewTab => Delivery::NewTab,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchOutcome {
    pub delivery: Delivery,
    /// Filename handed to the delivering strategy (None when rejected).
    pub filename: Option<String>,
    /// Failures of the strategies tried before the delivering one, in order.
    pub failures: Vec<(Strategy, StrategyFailure)>,
}

pub struct Dispatcher<S, F> {
    config: DispatchConfig,
    shell: S,
    fetcher: F,
}

impl<S: BrowserShell, F: Fetcher> Dispatcher<S, F> {
    pub fn new(config: DispatchConfig, shell: S, fetcher: F) -> Self {
        Self {
            config,
            shell,
            fetcher,
        }
    }

    pub fn shell(&self) -> &S {
        &self.shell
    }

    pub fn plan(&self) -> Vec<Strategy> {
        Strategy::plan(self.config.mode)
    }

    /// Delivers `request` through the first strategy that succeeds. Never fails.
    pub fn dispatch(&self, request: &DownloadRequest) -> DispatchOutcome {
        if request.is_placeholder() {
            tracing::info!(url = %request.source_url, "rejecting download without a usable url");
            self.shell.notify(&Notice::file_not_found());
            return DispatchOutcome {
                delivery: Delivery::Rejected,
                filename: None,
                failures: Vec::new(),
            };
        }

        let filename = resolve_filename(&request.filename_request()).full;
        let mut failures = Vec::new();

        for strategy in self.plan() {
            match self.attempt(strategy, request, &filename) {
                Ok(delivered_as) => {
                    tracing::info!(
                        url = %request.source_url,
                        filename = %delivered_as,
                        ?strategy,
                        "download dispatched"
                    );
                    return DispatchOutcome {
                        delivery: strategy.into(),
                        filename: Some(delivered_as),
                        failures,
                    };
                }
                Err(failure) => {
                    tracing::warn!(url = %request.source_url, ?strategy, "strategy failed: {}", failure);
                    failures.push((strategy, failure));
                }
            }
        }

        // Plans end with NewTab, so this is only reached for a plan without it.
        self.shell.open_in_new_tab(&request.source_url);
        DispatchOutcome {
            delivery: Delivery::NewTab,
            filename: Some(filename),
            failures,
        }
    }

    fn attempt(
        &self,
        strategy: Strategy,
        request: &DownloadRequest,
        filename: &str,
    ) -> Result<String, StrategyFailure> {
        match strategy {
            Strategy::Proxy => self.via_proxy(request, filename),
            Strategy::Blob => self.via_blob(request),
            Strategy::NewTab => {
                self.shell.open_in_new_tab(&request.source_url);
                Ok(filename.to_string())
            }
        }
    }

    fn via_proxy(&self, request: &DownloadRequest, filename: &str) -> Result<String, StrategyFailure> {
        let url = proxy_url(&self.config.proxy_route, &request.source_url, filename);
        self.shell
            .trigger_browser_download(&url, filename)
            .map_err(StrategyFailure::Trigger)?;
        Ok(filename.to_string())
    }

    /// Fetch, hand over via an object URL, revoke. The object URL is revoked
    /// exactly once after the trigger, whatever the trigger returned.
    fn via_blob(&self, request: &DownloadRequest) -> Result<String, StrategyFailure> {
        let response = self
            .fetcher
            .fetch(&request.source_url)
            .map_err(|e| StrategyFailure::Transport(e.to_string()))?;
        if !response.is_success() {
            return Err(StrategyFailure::Upstream(response.status));
        }

        let filename = resolve_filename(&request.filename_request().headers(Some(&response.headers))).full;

        let object_url = self
            .shell
            .create_object_url(response.body)
            .map_err(StrategyFailure::ObjectUrl)?;
        let triggered = self.shell.trigger_browser_download(&object_url, &filename);
        let revoked = self.shell.revoke_object_url(&object_url);

        triggered.map_err(StrategyFailure::Trigger)?;
        revoked.map_err(StrategyFailure::Revoke)?;
        Ok(filename)
    }
}
