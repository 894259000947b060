//! Study-material listings from the hub's REST API.
//!
//! `GET <api_base>/materials/?subject=<slug>&type=<slug>` answers either with
//! a paginated envelope `{"results": [...]}` or with a bare array.

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::dispatch::DownloadRequest;
use crate::fetch::Fetcher;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MaterialType {
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Material {
    pub id: i64,
    pub title: String,
    /// Download URL; may be empty or `#` for materials without a file.
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub material_type: Option<MaterialType>,
    #[serde(default)]
    pub subject_code: Option<String>,
    #[serde(default)]
    pub subject_name: Option<String>,
    #[serde(default)]
    pub year: Option<u16>,
    #[serde(default)]
    pub month: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl Material {
    /// Download request for this material. The type token is taken from the
    /// URL's extension when the API gives none.
    pub fn download_request(&self) -> DownloadRequest {
        let request = DownloadRequest::new(self.url.clone()).with_title(self.title.clone());
        match crate::filename::path_extension(&self.url) {
            Some(ext) => request.with_type(ext),
            None => request,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Listing {
    Paged { results: Vec<Material> },
    Bare(Vec<Material>),
}

/// Parses a listing body in either envelope.
pub fn parse_listing(body: &[u8]) -> Result<Vec<Material>> {
    let listing: Listing = serde_json::from_slice(body).context("parse materials listing")?;
    Ok(match listing {
        Listing::Paged { results } => results,
        Listing::Bare(items) => items,
    })
}

/// Builds the listing URL for optional subject and material-type slugs.
pub fn materials_url(api_base: &str, subject: Option<&str>, material_type: Option<&str>) -> String {
    let mut query = url::form_urlencoded::Serializer::new(String::new());
    if let Some(subject) = subject {
        query.append_pair("subject", subject);
    }
    if let Some(material_type) = material_type {
        query.append_pair("type", material_type);
    }
    let query = query.finish();

    let base = api_base.trim_end_matches('/');
    if query.is_empty() {
        format!("{}/materials/", base)
    } else {
        format!("{}/materials/?{}", base, query)
    }
}

/// Fetches and parses a listing; inactive materials are dropped.
pub fn fetch_materials(fetcher: &dyn Fetcher, url: &str) -> Result<Vec<Material>> {
    let response = fetcher
        .fetch(url)
        .and_then(|r| r.error_for_status())
        .with_context(|| format!("GET {}", url))?;
    let materials = parse_listing(&response.body)?;
    Ok(materials.into_iter().filter(|m| m.is_active).collect())
}
