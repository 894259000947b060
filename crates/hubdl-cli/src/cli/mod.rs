//! CLI for hubdl: run the download proxy, dispatch downloads, browse materials.

mod commands;
mod shell;

use anyhow::Result;
use clap::{Parser, Subcommand};
use hubdl_core::config::{self, RuntimeMode};
use hubdl_core::dispatch::DownloadRequest;
use std::path::PathBuf;

use commands::{run_get, run_materials, run_resolve, run_serve};

/// Top-level CLI for hubdl.
#[derive(Debug, Parser)]
#[command(name = "hubdl")]
#[command(about = "hubdl: study-material downloads with proper filenames", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Run the attachment download proxy.
    Serve {
        /// Listen address (overrides `proxy.bind_addr`).
        #[arg(long, value_name = "ADDR")]
        bind: Option<String>,
    },

    /// Download one file, trying proxy, in-process fetch, then a browser link.
    Get {
        /// Source URL of the document.
        url: String,
        /// Human title, used as the filename base.
        #[arg(long)]
        title: Option<String>,
        /// Type token such as "pdf" or "docx", used when the URL has no extension.
        #[arg(long = "type", value_name = "EXT")]
        file_type: Option<String>,
        /// Skip the proxy (development mode).
        #[arg(long, conflicts_with = "prod")]
        dev: bool,
        /// Try the proxy first (production mode).
        #[arg(long)]
        prod: bool,
        /// Directory to save into (default: config or current directory).
        #[arg(long, value_name = "DIR")]
        download_dir: Option<PathBuf>,
    },

    /// Print the filename a download would be saved under.
    Resolve {
        url: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long = "type", value_name = "EXT")]
        file_type: Option<String>,
    },

    /// List study materials from the hub API, optionally downloading one.
    Materials {
        /// Subject slug filter.
        #[arg(long)]
        subject: Option<String>,
        /// Material type slug filter (e.g. "pyq", "notes").
        #[arg(long = "type", value_name = "SLUG")]
        material_type: Option<String>,
        /// Download the material with this id.
        #[arg(long, value_name = "ID")]
        download: Option<i64>,
        /// Directory to save into (default: config or current directory).
        #[arg(long, value_name = "DIR")]
        download_dir: Option<PathBuf>,
    },
}

/// `--dev`/`--prod` override of the configured runtime mode.
fn mode_override(dev: bool, prod: bool) -> Option<RuntimeMode> {
    match (dev, prod) {
        (true, _) => Some(RuntimeMode::Dev),
        (_, true) => Some(RuntimeMode::Prod),
        _ => None,
    }
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Serve { bind } => run_serve(&cfg, bind).await?,
            CliCommand::Get {
                url,
                title,
                file_type,
                dev,
                prod,
                download_dir,
            } => {
                let mut request = DownloadRequest::new(url);
                request.suggested_title = title;
                request.suggested_type = file_type;
                let mode = mode_override(dev, prod).unwrap_or(cfg.runtime_mode);
                run_get(&cfg, mode, download_dir, request).await?;
            }
            CliCommand::Resolve { url, title, file_type } => {
                run_resolve(&url, title.as_deref(), file_type.as_deref());
            }
            CliCommand::Materials {
                subject,
                material_type,
                download,
                download_dir,
            } => {
                run_materials(
                    &cfg,
                    subject.as_deref(),
                    material_type.as_deref(),
                    download,
                    download_dir,
                )
                .await?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
