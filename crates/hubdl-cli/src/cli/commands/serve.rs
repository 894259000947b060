//! `hubdl serve` – run the download proxy until Ctrl-C.

use anyhow::Result;
use hubdl_core::config::HubdlConfig;
use hubdl_core::fetch::{CurlFetcher, Fetcher};
use hubdl_core::proxy;
use std::sync::Arc;

pub async fn run_serve(cfg: &HubdlConfig, bind: Option<String>) -> Result<()> {
    let mut proxy_cfg = cfg.proxy.clone();
    if let Some(bind) = bind {
        proxy_cfg.bind_addr = bind;
    }

    let fetcher: Arc<dyn Fetcher> = Arc::new(CurlFetcher::new(cfg.fetch.clone()));
    let shutdown = async {
        if tokio::signal::ctrl_c().await.is_err() {
            tracing::warn!("ctrl-c handler unavailable; stop the proxy with a signal");
            std::future::pending::<()>().await;
        }
        tracing::info!("shutdown requested");
    };

    println!(
        "Serving downloads on http://{}{} (Ctrl-C to stop)",
        proxy_cfg.bind_addr, proxy_cfg.route
    );
    proxy::serve(&proxy_cfg, fetcher, shutdown).await
}
