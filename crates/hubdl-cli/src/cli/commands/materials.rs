//! `hubdl materials` – list materials and optionally download one.

use anyhow::{Context, Result};
use hubdl_core::config::HubdlConfig;
use hubdl_core::fetch::CurlFetcher;
use hubdl_core::materials::{fetch_materials, materials_url, Material};
use std::path::PathBuf;

use super::dispatch_download;

pub async fn run_materials(
    cfg: &HubdlConfig,
    subject: Option<&str>,
    material_type: Option<&str>,
    download: Option<i64>,
    download_dir: Option<PathBuf>,
) -> Result<()> {
    let api_base = cfg.api_base()?;
    if api_base.starts_with('/') {
        anyhow::bail!(
            "API base {} is relative to a web origin; set api_base_url in the config",
            api_base
        );
    }

    let url = materials_url(&api_base, subject, material_type);
    let fetcher = CurlFetcher::new(cfg.fetch.clone());
    let materials = tokio::task::spawn_blocking(move || fetch_materials(&fetcher, &url))
        .await
        .context("materials task")??;

    match download {
        None => print_table(&materials),
        Some(id) => {
            let material = materials
                .iter()
                .find(|m| m.id == id)
                .with_context(|| format!("no active material with id {}", id))?;
            dispatch_download(cfg, cfg.runtime_mode, download_dir, material.download_request()).await?;
        }
    }
    Ok(())
}

fn print_table(materials: &[Material]) {
    if materials.is_empty() {
        println!("No materials found.");
        return;
    }
    println!("{:<6} {:<10} {:<6} {:<10} {}", "ID", "TYPE", "YEAR", "SUBJECT", "TITLE");
    for m in materials {
        let kind = m.material_type.as_ref().map(|t| t.slug.as_str()).unwrap_or("-");
        let year = m.year.map(|y| y.to_string()).unwrap_or_else(|| "-".to_string());
        println!(
            "{:<6} {:<10} {:<6} {:<10} {}",
            m.id,
            kind,
            year,
            m.subject_code.as_deref().unwrap_or("-"),
            m.title
        );
    }
}
