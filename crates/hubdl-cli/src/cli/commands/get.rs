//! `hubdl get` – dispatch a single download.

use anyhow::Result;
use hubdl_core::config::{HubdlConfig, RuntimeMode};
use hubdl_core::dispatch::DownloadRequest;
use std::path::PathBuf;

use super::dispatch_download;

pub async fn run_get(
    cfg: &HubdlConfig,
    mode: RuntimeMode,
    download_dir: Option<PathBuf>,
    request: DownloadRequest,
) -> Result<()> {
    tracing::info!(url = %request.source_url, ?mode, "get");
    dispatch_download(cfg, mode, download_dir, request).await?;
    Ok(())
}
