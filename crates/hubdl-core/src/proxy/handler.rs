//! `GET <route>?url=&name=`: fetch upstream and re-emit it as an attachment.

use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::fetch::{fetch_in_background, FetchedResponse};
use crate::filename::attachment_filename;

use super::ProxyState;

#[derive(Debug, Default, PartialEq, Eq)]
pub struct DownloadParams {
    /// Absolute URL of the file to fetch.
    pub url: Option<String>,
    /// Desired filename.
    pub name: Option<String>,
}

impl DownloadParams {
    /// Picks `url` and `name` from decoded query pairs. The first occurrence
    /// of a repeated key wins; other keys are ignored.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut params = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "url" => &mut params.url,
                "name" => &mut params.name,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }
        params
    }
}

/// Outcome of one proxied download.
#[derive(Debug, PartialEq, Eq)]
pub enum ProxyReply {
    /// 400: no `url` parameter; upstream never contacted.
    MissingUrl,
    /// Upstream answered non-2xx; mirrored with a short text body.
    UpstreamStatus(u32),
    /// 500: transport or transfer failure.
    Failed,
    Attachment {
        status: u32,
        filename: String,
        body: Vec<u8>,
    },
}

pub(super) async fn download(
    State(state): State<ProxyState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> ProxyReply {
    let params = DownloadParams::from_pairs(pairs);
    let Some(url) = params.url.filter(|u| !u.is_empty()) else {
        return ProxyReply::MissingUrl;
    };

    match fetch_in_background(state.fetcher.clone(), url.clone()).await {
        Ok(response) => attachment_reply(&url, params.name.as_deref(), response),
        Err(e) => {
            tracing::warn!(%url, timeout = e.is_timeout(), "upstream fetch failed: {}", e);
            ProxyReply::Failed
        }
    }
}

/// Maps a fetched upstream response to the proxy's reply.
pub fn attachment_reply(url: &str, name: Option<&str>, response: FetchedResponse) -> ProxyReply {
    if !response.is_success() {
        tracing::info!(%url, status = response.status, "upstream returned an error status");
        return ProxyReply::UpstreamStatus(response.status);
    }

    let filename = attachment_filename(url, name, response.headers.get("content-disposition"));
    tracing::debug!(%url, %filename, bytes = response.body.len(), "serving attachment");
    ProxyReply::Attachment {
        status: response.status,
        filename,
        body: response.body,
    }
}

fn status_code(code: u32, fallback: StatusCode) -> StatusCode {
    u16::try_from(code)
        .ok()
        .and_then(|c| StatusCode::from_u16(c).ok())
        .unwrap_or(fallback)
}

impl IntoResponse for ProxyReply {
    fn into_response(self) -> Response {
        match self {
            ProxyReply::MissingUrl => (StatusCode::BAD_REQUEST, "Missing url").into_response(),
            ProxyReply::UpstreamStatus(code) => (
                status_code(code, StatusCode::BAD_GATEWAY),
                format!("Upstream error {}", code),
            )
                .into_response(),
            ProxyReply::Failed => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Download proxy error").into_response()
            }
            ProxyReply::Attachment {
                status,
                filename,
                body,
            } => (
                status_code(status, StatusCode::OK),
                [
                    (header::CONTENT_TYPE, "application/octet-stream".to_string()),
                    (
                        header::CONTENT_DISPOSITION,
                        format!("attachment; filename=\"{}\"", filename),
                    ),
                ],
                body,
            )
                .into_response(),
        }
    }
}
