//! Attachment download proxy.
//!
//! Some upstream hosts serve documents inline, so browsers preview them
//! instead of saving. The proxy fetches the upstream URL server-side and
//! answers with `Content-Disposition: attachment` and a sanitized filename.
//! Each request is independent; no state is shared between requests.

mod handler;

pub use handler::{attachment_reply, DownloadParams, ProxyReply};

use anyhow::{Context, Result};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::config::ProxyConfig;
use crate::fetch::Fetcher;

#[derive(Clone)]
pub struct ProxyState {
    fetcher: Arc<dyn Fetcher>,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Builds the proxy router: `GET <route>` for downloads and `GET /health`.
///
/// `route` must start with `/`.
pub fn router(route: &str, fetcher: Arc<dyn Fetcher>) -> Router {
    Router::new()
        .route(route, get(handler::download))
        .route("/health", get(health))
        .with_state(ProxyState { fetcher })
        .layer(TraceLayer::new_for_http())
}

/// Binds `config.bind_addr` and serves until `shutdown` resolves.
pub async fn serve<S>(config: &ProxyConfig, fetcher: Arc<dyn Fetcher>, shutdown: S) -> Result<()>
where
    S: Future<Output = ()> + Send + 'static,
{
    if !config.route.starts_with('/') || config.route == "/health" {
        anyhow::bail!("proxy route must start with '/' and not be /health: {:?}", config.route);
    }

    let listener = TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("bind download proxy on {}", config.bind_addr))?;
    tracing::info!(
        "download proxy listening on {} (route {})",
        listener.local_addr()?,
        config.route
    );

    axum::serve(listener, router(&config.route, fetcher))
        .with_graceful_shutdown(shutdown)
        .await
        .context("download proxy server")?;

    tracing::info!("download proxy stopped");
    Ok(())
}
