//! CLI command handlers, one file per command.

mod get;
mod materials;
mod resolve;
mod serve;

pub use get::run_get;
pub use materials::run_materials;
pub use resolve::run_resolve;
pub use serve::run_serve;

use anyhow::{Context, Result};
use hubdl_core::config::{HubdlConfig, RuntimeMode};
use hubdl_core::dispatch::{Delivery, DispatchConfig, DispatchOutcome, Dispatcher, DownloadRequest};
use hubdl_core::fetch::{CurlFetcher, Fetcher};
use std::path::PathBuf;
use std::sync::Arc;

use super::shell::DiskShell;

/// Download directory: flag, then config, then the current directory.
fn download_dir(cfg: &HubdlConfig, flag: Option<PathBuf>) -> Result<PathBuf> {
    match flag.or_else(|| cfg.download_dir.clone()) {
        Some(dir) => Ok(dir),
        None => std::env::current_dir().context("current directory"),
    }
}

/// Dispatches `request` through a [`DiskShell`] and reports where it went.
/// A rejected request is an error (the notice has already been shown).
async fn dispatch_download(
    cfg: &HubdlConfig,
    mode: RuntimeMode,
    download_dir_flag: Option<PathBuf>,
    request: DownloadRequest,
) -> Result<DispatchOutcome> {
    let dir = download_dir(cfg, download_dir_flag)?;
    std::fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;

    let fetcher: Arc<dyn Fetcher> = Arc::new(CurlFetcher::new(cfg.fetch.clone()));
    let shell = DiskShell::new(dir, cfg.proxy.public_origin.clone(), fetcher.clone());
    let dispatch_config = DispatchConfig {
        mode,
        proxy_route: cfg.proxy.route.clone(),
    };

    // Dispatch blocks on curl.
    let (outcome, saved) = tokio::task::spawn_blocking(move || {
        let dispatcher = Dispatcher::new(dispatch_config, shell, fetcher);
        let outcome = dispatcher.dispatch(&request);
        (outcome, dispatcher.shell().saved())
    })
    .await
    .context("dispatch task")?;

    for (strategy, failure) in &outcome.failures {
        println!("{:?} failed: {}", strategy, failure);
    }
    match outcome.delivery {
        Delivery::Rejected => anyhow::bail!("nothing to download"),
        Delivery::NewTab => {}
        Delivery::Proxy | Delivery::Blob => {
            for path in &saved {
                println!("Saved {}", path.display());
            }
        }
    }
    Ok(outcome)
}
